pub mod weather_reports;

pub use weather_reports::WeatherReportsDao;
