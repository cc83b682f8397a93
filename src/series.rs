//! Daily time series on an implicit, evenly spaced calendar.

use crate::error::{IndexError, Result};
use crate::stats::Accumulator;
use chrono::{Datelike, NaiveDate};

/// One value per day starting at `start`.
///
/// Timestamps are implicit, so the series is always monotonic and evenly
/// spaced; missing days are stored as NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySeries {
    start: NaiveDate,
    values: Vec<f64>,
}

impl DailySeries {
    pub fn new(start: NaiveDate, values: Vec<f64>) -> Self {
        Self { start, values }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over `(date, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.start.iter_days().zip(self.values.iter().copied())
    }

    /// Mean over every day whose month is in `months` (1-12).
    ///
    /// NaN days poison the result.
    pub fn month_mean(&self, months: &[u32]) -> Result<f64> {
        month_mean(self.iter(), months)
    }
}

pub(crate) fn month_mean(
    days: impl Iterator<Item = (NaiveDate, f64)>,
    months: &[u32],
) -> Result<f64> {
    let mut acc = Accumulator::new();
    for (date, val) in days {
        if months.contains(&date.month()) {
            acc.add(val);
        }
    }
    if acc.count() == 0 {
        return Err(IndexError::insufficient(format!(
            "no days in months {months:?}"
        )));
    }
    Ok(acc.mean())
}

/// Indices of the days falling in `months`, in calendar order.
pub(crate) fn month_indices(start: NaiveDate, len: usize, months: &[u32]) -> Vec<usize> {
    start
        .iter_days()
        .take(len)
        .enumerate()
        .filter(|(_, date)| months.contains(&date.month()))
        .map(|(i_day, _)| i_day)
        .collect()
}
