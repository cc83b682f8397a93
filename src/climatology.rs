//! Climatological baselines: pentad climatologies and monthly means.

use crate::error::{IndexError, Result};
use crate::pentad::{self, Aggregation, LeapDay, PENTADS_PER_YEAR, PentadSeries, PentadValue};
use crate::series::DailySeries;
use crate::stats::Accumulator;
use chrono::NaiveDate;

/// Shortest daily record a climatology is computed from.
pub const MIN_DAYS: usize = 365;

/// Fail unless a daily record spans at least [`MIN_DAYS`].
pub fn check_record_len(n_days: usize) -> Result<()> {
    if n_days < MIN_DAYS {
        return Err(IndexError::insufficient(format!(
            "{n_days} days supplied, at least {MIN_DAYS} needed for a climatology"
        )));
    }
    Ok(())
}

/// Mean over years of each pentad number.
///
/// Every pentad number must occur at least once; otherwise the baseline is
/// incomplete and [`IndexError::InsufficientData`] is returned.
pub fn pentad_climatology(series: &PentadSeries) -> Result<Vec<f64>> {
    per_pentad_mean(series, |p| p.value)
}

/// Mean number of days aggregated into each pentad number.
///
/// 5 everywhere except pentad 12 when leap days are folded into it.
pub fn pentad_day_counts(series: &PentadSeries) -> Result<Vec<f64>> {
    per_pentad_mean(series, |p| p.days as f64)
}

/// Pentad day counts of the calendar span `n_days` from `start`.
pub fn calendar_day_counts(start: NaiveDate, n_days: usize, leap: LeapDay) -> Result<Vec<f64>> {
    let days = start.iter_days().take(n_days).map(|date| (date, 0.0));
    let pentads = pentad::aggregate_days(days, Aggregation::Sum, leap);
    pentad_day_counts(&pentads)
}

fn per_pentad_mean(series: &PentadSeries, value: impl Fn(&PentadValue) -> f64) -> Result<Vec<f64>> {
    let mut acc_vec = vec![Accumulator::new(); PENTADS_PER_YEAR];
    for p in &series.pentads {
        let Some(acc) = p.pentad.checked_sub(1).and_then(|i| acc_vec.get_mut(i)) else {
            return Err(IndexError::mismatch(
                "pentad number",
                &[PENTADS_PER_YEAR],
                &[p.pentad],
            ));
        };
        acc.add(value(p));
    }

    let missing: Vec<usize> = acc_vec
        .iter()
        .enumerate()
        .filter(|(_, acc)| acc.count() == 0)
        .map(|(i_pentad, _)| i_pentad + 1)
        .collect();
    if !missing.is_empty() {
        return Err(IndexError::insufficient(format!(
            "{} of {PENTADS_PER_YEAR} pentads never fully observed (first: {})",
            missing.len(),
            missing[0]
        )));
    }

    Ok(acc_vec.iter().map(Accumulator::mean).collect())
}

/// Pentad climatology straight from daily data.
///
/// The record must span at least one year.
pub fn daily_pentad_climatology(
    series: &DailySeries,
    aggregation: Aggregation,
    leap: LeapDay,
) -> Result<Vec<f64>> {
    check_record_len(series.len())?;
    let pentads = pentad::aggregate(series, aggregation, leap);
    pentad_climatology(&pentads)
}

/// Long-term mean over the given calendar months.
pub fn monthly_reference(series: &DailySeries, months: &[u32]) -> Result<f64> {
    series.month_mean(months)
}
