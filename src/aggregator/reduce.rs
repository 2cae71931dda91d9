//! Reductions from raw observation series to report statistics

use crate::observations::{
    Dataset, ObservationError, ObservationResult, PrecipObservation, TemperatureObservation,
    WeatherType,
};
use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places kept on precipitation totals
pub const TOTAL_DECIMAL_PLACES: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PrecipitationTotals {
    pub rain_inches: Decimal,
    pub snow_inches: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TemperatureAverages {
    pub high_f: Decimal,
    pub low_f: Decimal,
    pub samples: usize,
}

/// Round half away from zero, so 1.25 becomes 1.3
pub fn round_total(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(TOTAL_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Overflow-checked sum; upstream values are untrusted
fn checked_sum(
    dataset: Dataset,
    mut values: impl Iterator<Item = Decimal>,
) -> ObservationResult<Decimal> {
    values.try_fold(Decimal::ZERO, |acc, value| {
        acc.checked_add(value)
            .ok_or(ObservationError::OutOfRange { dataset })
    })
}

/// Sum amounts per weather type, each sum rounded independently.
///
/// Records of any other type are ignored.
pub fn precipitation_totals(
    records: &[PrecipObservation],
) -> ObservationResult<PrecipitationTotals> {
    let sum_of = |kind: WeatherType| -> ObservationResult<Decimal> {
        checked_sum(
            Dataset::Precipitation,
            records
                .iter()
                .filter(|r| r.weather_type == kind)
                .map(|r| r.amount_inches),
        )
    };

    Ok(PrecipitationTotals {
        rain_inches: round_total(sum_of(WeatherType::Rain)?),
        snow_inches: round_total(sum_of(WeatherType::Snow)?),
    })
}

/// Arithmetic means of the highs and lows, unrounded.
///
/// An empty series averages to zero with `samples == 0`.
pub fn temperature_averages(
    records: &[TemperatureObservation],
) -> ObservationResult<TemperatureAverages> {
    if records.is_empty() {
        return Ok(TemperatureAverages::default());
    }

    let count = Decimal::from(records.len());
    let high = checked_sum(Dataset::Temperature, records.iter().map(|r| r.temp_high_f))?;
    let low = checked_sum(Dataset::Temperature, records.iter().map(|r| r.temp_low_f))?;
    let mean = |sum: Decimal| {
        sum.checked_div(count)
            .map(|m| m.normalize())
            .ok_or(ObservationError::OutOfRange {
                dataset: Dataset::Temperature,
            })
    };

    Ok(TemperatureAverages {
        high_f: mean(high)?,
        low_f: mean(low)?,
        samples: records.len(),
    })
}
