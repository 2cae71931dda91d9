use crate::database::{DatabaseError, DatabaseResult};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

/// Row of the `weather_report` table.
///
/// Decimal columns are stored as their canonical text form so that unrounded
/// means survive backends that would otherwise coerce them to floats.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "weather_report")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub zip_code: String,
    pub created_on: DateTime<Utc>,
    #[sea_orm(column_type = "Text")]
    pub average_high: String,
    #[sea_orm(column_type = "Text")]
    pub average_low: String,
    #[sea_orm(column_type = "Text")]
    pub rainfall_total_inches: String,
    #[sea_orm(column_type = "Text")]
    pub snow_total_inches: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Persisted weather report for one zip code over a day window
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    pub id: i32,
    pub zip_code: String,
    pub created_on: DateTime<Utc>,
    /// Mean of the daily highs, unrounded
    pub average_high: Decimal,
    /// Mean of the daily lows, unrounded
    pub average_low: Decimal,
    /// Total rainfall, rounded to one decimal place
    pub rainfall_total_inches: Decimal,
    /// Total snowfall, rounded to one decimal place
    pub snow_total_inches: Decimal,
}

fn parse_column(column: &str, value: &str) -> DatabaseResult<Decimal> {
    Decimal::from_str(value).map_err(|e| {
        DatabaseError::Database(format!("Invalid decimal in {}: {:?} ({})", column, value, e))
    })
}

impl TryFrom<Model> for WeatherReport {
    type Error = DatabaseError;

    fn try_from(model: Model) -> DatabaseResult<Self> {
        Ok(Self {
            average_high: parse_column("average_high", &model.average_high)?,
            average_low: parse_column("average_low", &model.average_low)?,
            rainfall_total_inches: parse_column(
                "rainfall_total_inches",
                &model.rainfall_total_inches,
            )?,
            snow_total_inches: parse_column("snow_total_inches", &model.snow_total_inches)?,
            id: model.id,
            zip_code: model.zip_code,
            created_on: model.created_on,
        })
    }
}
