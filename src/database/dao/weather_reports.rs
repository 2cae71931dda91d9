use crate::database::entities::{WeatherReport, weather_reports};
use crate::database::{DatabaseError, DatabaseResult};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

/// Weather reports DAO for database operations.
///
/// Reports are append-only: there is no update or delete path.
pub struct WeatherReportsDao {
    db: DatabaseConnection,
}

impl WeatherReportsDao {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Insert a report and return it with its assigned id.
    ///
    /// The `id` on the passed report is ignored.
    pub async fn save(&self, report: &WeatherReport) -> DatabaseResult<WeatherReport> {
        let active_model = weather_reports::ActiveModel {
            id: ActiveValue::NotSet,
            zip_code: Set(report.zip_code.clone()),
            created_on: Set(report.created_on),
            average_high: Set(report.average_high.to_string()),
            average_low: Set(report.average_low.to_string()),
            rainfall_total_inches: Set(report.rainfall_total_inches.to_string()),
            snow_total_inches: Set(report.snow_total_inches.to_string()),
        };

        let saved = active_model
            .insert(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        WeatherReport::try_from(saved)
    }

    /// Get report by ID
    pub async fn find_by_id(&self, id: i32) -> DatabaseResult<Option<WeatherReport>> {
        let row = weather_reports::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        row.map(WeatherReport::try_from).transpose()
    }

    /// Most recent reports for a zip code, newest first
    pub async fn find_recent_by_zip(
        &self,
        zip_code: &str,
        limit: u64,
    ) -> DatabaseResult<Vec<WeatherReport>> {
        let rows = weather_reports::Entity::find()
            .filter(weather_reports::Column::ZipCode.eq(zip_code))
            .order_by_desc(weather_reports::Column::CreatedOn)
            .order_by_desc(weather_reports::Column::Id)
            .limit(Some(limit))
            .all(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        rows.into_iter().map(WeatherReport::try_from).collect()
    }
}
