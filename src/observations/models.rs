use rust_decimal::Decimal;
use serde::de::{Error as _, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Which upstream dataset a request targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    Precipitation,
    Temperature,
}

impl Dataset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dataset::Precipitation => "precipitation",
            Dataset::Temperature => "temperature",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of precipitation reported by the precipitation service.
///
/// Matching is case-insensitive. Unrecognised kinds (sleet, hail, ...) map to
/// `Other` and count towards neither total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeatherType {
    Rain,
    Snow,
    Other,
}

impl WeatherType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherType::Rain => "rain",
            WeatherType::Snow => "snow",
            WeatherType::Other => "other",
        }
    }
}

impl From<&str> for WeatherType {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "rain" => WeatherType::Rain,
            "snow" => WeatherType::Snow,
            _ => WeatherType::Other,
        }
    }
}

impl Serialize for WeatherType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for WeatherType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(WeatherType::from(value.as_str()))
    }
}

/// Upstream field names are matched case-insensitively
fn folded_key(key: &str) -> String {
    key.to_ascii_lowercase()
}

/// Read the next map value into `slot`, rejecting a field seen twice
fn next_once<'de, A, T>(
    map: &mut A,
    slot: &mut Option<T>,
    name: &'static str,
) -> Result<(), A::Error>
where
    A: MapAccess<'de>,
    T: Deserialize<'de>,
{
    if slot.is_some() {
        return Err(A::Error::duplicate_field(name));
    }
    *slot = Some(map.next_value()?);
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrecipObservation {
    pub weather_type: WeatherType,
    pub amount_inches: Decimal,
}

impl PrecipObservation {
    pub fn new(weather_type: WeatherType, amount_inches: Decimal) -> Self {
        Self {
            weather_type,
            amount_inches,
        }
    }
}

impl<'de> Deserialize<'de> for PrecipObservation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PrecipVisitor;

        impl<'de> Visitor<'de> for PrecipVisitor {
            type Value = PrecipObservation;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a precipitation observation object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut weather_type = None;
                let mut amount_inches = None;

                while let Some(key) = map.next_key::<String>()? {
                    match folded_key(&key).as_str() {
                        "weathertype" => next_once(&mut map, &mut weather_type, "weatherType")?,
                        "amountinches" => next_once(&mut map, &mut amount_inches, "amountInches")?,
                        _ => {
                            map.next_value::<IgnoredAny>()?;
                        }
                    }
                }

                Ok(PrecipObservation {
                    weather_type: weather_type
                        .ok_or_else(|| A::Error::missing_field("weatherType"))?,
                    amount_inches: amount_inches
                        .ok_or_else(|| A::Error::missing_field("amountInches"))?,
                })
            }
        }

        deserializer.deserialize_map(PrecipVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemperatureObservation {
    pub temp_high_f: Decimal,
    pub temp_low_f: Decimal,
}

impl TemperatureObservation {
    pub fn new(temp_high_f: Decimal, temp_low_f: Decimal) -> Self {
        Self {
            temp_high_f,
            temp_low_f,
        }
    }
}

impl<'de> Deserialize<'de> for TemperatureObservation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TemperatureVisitor;

        impl<'de> Visitor<'de> for TemperatureVisitor {
            type Value = TemperatureObservation;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a temperature observation object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut temp_high_f = None;
                let mut temp_low_f = None;

                while let Some(key) = map.next_key::<String>()? {
                    match folded_key(&key).as_str() {
                        "temphighf" => next_once(&mut map, &mut temp_high_f, "tempHighF")?,
                        "templowf" => next_once(&mut map, &mut temp_low_f, "tempLowF")?,
                        _ => {
                            map.next_value::<IgnoredAny>()?;
                        }
                    }
                }

                Ok(TemperatureObservation {
                    temp_high_f: temp_high_f
                        .ok_or_else(|| A::Error::missing_field("tempHighF"))?,
                    temp_low_f: temp_low_f.ok_or_else(|| A::Error::missing_field("tempLowF"))?,
                })
            }
        }

        deserializer.deserialize_map(TemperatureVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_weather_type_is_case_insensitive() {
        assert_eq!(WeatherType::from("rain"), WeatherType::Rain);
        assert_eq!(WeatherType::from("Rain"), WeatherType::Rain);
        assert_eq!(WeatherType::from("SNOW"), WeatherType::Snow);
        assert_eq!(WeatherType::from(" snow "), WeatherType::Snow);
        assert_eq!(WeatherType::from("sleet"), WeatherType::Other);
    }

    #[test]
    fn test_precip_observation_camel_case() {
        let json = r#"[
            {"id": "a1", "zipCode": "98101", "weatherType": "rain", "amountInches": 1.25},
            {"weatherType": "snow", "amountInches": 0.75, "createdOn": "2024-01-02T00:00:00Z"}
        ]"#;
        let observations: Vec<PrecipObservation> = serde_json::from_str(json).unwrap();
        assert_eq!(
            observations,
            vec![
                PrecipObservation::new(WeatherType::Rain, dec!(1.25)),
                PrecipObservation::new(WeatherType::Snow, dec!(0.75)),
            ]
        );
    }

    #[test]
    fn test_precip_observation_pascal_case() {
        let json = r#"{"WeatherType": "Snow", "AmountInches": 2}"#;
        let observation: PrecipObservation = serde_json::from_str(json).unwrap();
        assert_eq!(observation.weather_type, WeatherType::Snow);
        assert_eq!(observation.amount_inches, dec!(2));
    }

    #[test]
    fn test_temperature_observation_parsing() {
        let json = r#"[{"tempHighF": 71.5, "tempLowF": 50}, {"TempHighF": 68, "TempLowF": 49.5}]"#;
        let observations: Vec<TemperatureObservation> = serde_json::from_str(json).unwrap();
        assert_eq!(observations.len(), 2);
        assert_eq!(observations[0].temp_high_f, dec!(71.5));
        assert_eq!(observations[1].temp_low_f, dec!(49.5));
    }

    #[test]
    fn test_field_names_match_in_any_case() {
        let json = r#"[
            {"weathertype": "rain", "amountinches": 0.5},
            {"WEATHERTYPE": "SNOW", "AMOUNTINCHES": 1.5, "ZIPCODE": "98101"}
        ]"#;
        let observations: Vec<PrecipObservation> = serde_json::from_str(json).unwrap();
        assert_eq!(
            observations,
            vec![
                PrecipObservation::new(WeatherType::Rain, dec!(0.5)),
                PrecipObservation::new(WeatherType::Snow, dec!(1.5)),
            ]
        );

        let json = r#"[{"temphighf": 70, "templowf": 50}, {"TEMPHIGHF": 71, "TEMPLOWF": 51}]"#;
        let observations: Vec<TemperatureObservation> = serde_json::from_str(json).unwrap();
        assert_eq!(
            observations,
            vec![
                TemperatureObservation::new(dec!(70), dec!(50)),
                TemperatureObservation::new(dec!(71), dec!(51)),
            ]
        );
    }

    #[test]
    fn test_same_field_in_two_cases_is_rejected() {
        let json = r#"{"tempHighF": 70, "TEMPHIGHF": 71, "tempLowF": 50}"#;
        let err = serde_json::from_str::<TemperatureObservation>(json).unwrap_err();
        assert!(err.to_string().contains("duplicate field"));
    }

    #[test]
    fn test_missing_low_is_rejected() {
        let json = r#"{"TempHighF": 70}"#;
        let err = serde_json::from_str::<TemperatureObservation>(json).unwrap_err();
        assert!(err.to_string().contains("tempLowF"));
    }

    #[test]
    fn test_missing_amount_is_rejected() {
        let json = r#"{"weatherType": "rain"}"#;
        assert!(serde_json::from_str::<PrecipObservation>(json).is_err());
    }
}
