pub mod weather_reports;

pub use weather_reports::Entity as WeatherReports;
pub use weather_reports::WeatherReport;
