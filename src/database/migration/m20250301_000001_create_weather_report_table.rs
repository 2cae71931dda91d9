use super::WeatherReport;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WeatherReport::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WeatherReport::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(WeatherReport::ZipCode).string().not_null())
                    .col(
                        ColumnDef::new(WeatherReport::CreatedOn)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    // Decimal columns hold canonical text
                    .col(ColumnDef::new(WeatherReport::AverageHigh).text().not_null())
                    .col(ColumnDef::new(WeatherReport::AverageLow).text().not_null())
                    .col(
                        ColumnDef::new(WeatherReport::RainfallTotalInches)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WeatherReport::SnowTotalInches)
                            .text()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Lookups of recent reports per zip
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_weather_report_zip_created_on")
                    .table(WeatherReport::Table)
                    .col(WeatherReport::ZipCode)
                    .col(WeatherReport::CreatedOn)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WeatherReport::Table).to_owned())
            .await
    }
}
