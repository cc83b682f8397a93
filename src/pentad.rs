//! Calendar pentads: fixed 5-day windows, 73 per year.
//!
//! Pentad `n` (1-based) covers days `5(n-1)..5n` of a 365-day year. In leap
//! years 29 February either joins pentad 12 (which then spans 25 February to
//! 1 March, six days) or is dropped, according to [`LeapDay`].

use crate::series::DailySeries;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

pub const PENTADS_PER_YEAR: usize = 73;
pub const PENTAD_DAYS: usize = 5;

/// Ordinal (0-based) of 29 February in a leap year.
const LEAP_DAY_ORDINAL0: u32 = 59;
/// Pentad (0-based) that absorbs 29 February.
const LEAP_PENTAD: usize = 11;

/// What to do with 29 February.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeapDay {
    /// Count it in pentad 12, which becomes six days long.
    #[default]
    Fold,
    /// Discard it.
    Drop,
}

/// How the days of a pentad are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    #[default]
    Mean,
    Sum,
}

impl Aggregation {
    pub(crate) fn apply(self, sum: f64, n_days: usize) -> f64 {
        match self {
            Aggregation::Mean => sum / n_days as f64,
            Aggregation::Sum => sum,
        }
    }

    /// Per-pentad reference in the units of this aggregation, from a daily
    /// rate and the mean day count of each pentad.
    pub fn reference_curve(self, daily_rate: f64, day_counts: &[f64]) -> Vec<f64> {
        match self {
            Aggregation::Mean => vec![daily_rate; day_counts.len()],
            Aggregation::Sum => day_counts.iter().map(|n| daily_rate * n).collect(),
        }
    }
}

/// Zero-based pentad of `date`, or `None` if the day is dropped.
pub fn pentad_index(date: NaiveDate, leap: LeapDay) -> Option<usize> {
    let mut ordinal0 = date.ordinal0();
    if date.leap_year() && ordinal0 >= LEAP_DAY_ORDINAL0 {
        if ordinal0 == LEAP_DAY_ORDINAL0 {
            return match leap {
                LeapDay::Fold => Some(LEAP_PENTAD),
                LeapDay::Drop => None,
            };
        }
        ordinal0 -= 1;
    }
    Some(ordinal0 as usize / PENTAD_DAYS)
}

/// Number of days pentad `index` (0-based) spans in `year`.
pub fn pentad_len(year: i32, index: usize, leap: LeapDay) -> usize {
    let is_leap = NaiveDate::from_ymd_opt(year, 1, 1).is_some_and(|date| date.leap_year());
    if is_leap && index == LEAP_PENTAD && leap == LeapDay::Fold {
        PENTAD_DAYS + 1
    } else {
        PENTAD_DAYS
    }
}

/// One aggregated pentad.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PentadValue {
    pub year: i32,
    /// Pentad number, 1-73.
    pub pentad: usize,
    /// Days aggregated into this pentad (5, or 6 for a folded leap pentad).
    pub days: usize,
    pub value: f64,
}

/// Pentads fully covered by a daily series, in calendar order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PentadSeries {
    pub aggregation: Aggregation,
    pub pentads: Vec<PentadValue>,
}

impl PentadSeries {
    pub fn values(&self) -> Vec<f64> {
        self.pentads.iter().map(|p| p.value).collect()
    }

    pub fn len(&self) -> usize {
        self.pentads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pentads.is_empty()
    }

    /// The 73 pentads of `year`, if all of them are present.
    pub fn year(&self, year: i32) -> Option<Vec<f64>> {
        let vals: Vec<f64> = self
            .pentads
            .iter()
            .filter(|p| p.year == year)
            .map(|p| p.value)
            .collect();
        (vals.len() == PENTADS_PER_YEAR).then_some(vals)
    }
}

/// Aggregate a daily series into calendar pentads.
///
/// Pentads only partly covered by the series (at either end) are omitted.
/// A NaN day makes its pentad NaN.
pub fn aggregate(series: &DailySeries, aggregation: Aggregation, leap: LeapDay) -> PentadSeries {
    aggregate_days(series.iter(), aggregation, leap)
}

pub(crate) fn aggregate_days(
    days: impl Iterator<Item = (NaiveDate, f64)>,
    aggregation: Aggregation,
    leap: LeapDay,
) -> PentadSeries {
    let mut pentads = Vec::new();
    // (year, index, sum, n_days) of the pentad being filled.
    let mut current: Option<(i32, usize, f64, usize)> = None;

    let mut close = |window: Option<(i32, usize, f64, usize)>| {
        if let Some((year, index, sum, n_days)) = window {
            if n_days == pentad_len(year, index, leap) {
                pentads.push(PentadValue {
                    year,
                    pentad: index + 1,
                    days: n_days,
                    value: aggregation.apply(sum, n_days),
                });
            }
        }
    };

    for (date, val) in days {
        let Some(index) = pentad_index(date, leap) else {
            continue;
        };
        let year = date.year();
        let same_window = matches!(current, Some((y, i, _, _)) if y == year && i == index);
        if same_window {
            if let Some((_, _, sum, n_days)) = current.as_mut() {
                *sum += val;
                *n_days += 1;
            }
        } else {
            close(current.take());
            current = Some((year, index, val, 1));
        }
    }
    close(current);

    PentadSeries {
        aggregation,
        pentads,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn pentad_boundaries() {
        assert_eq!(pentad_index(ymd(2001, 1, 1), LeapDay::Fold), Some(0));
        assert_eq!(pentad_index(ymd(2001, 1, 5), LeapDay::Fold), Some(0));
        assert_eq!(pentad_index(ymd(2001, 1, 6), LeapDay::Fold), Some(1));
        assert_eq!(pentad_index(ymd(2001, 12, 31), LeapDay::Fold), Some(72));
        assert_eq!(pentad_index(ymd(2004, 12, 31), LeapDay::Fold), Some(72));
    }

    #[test]
    fn leap_day_policy() {
        assert_eq!(pentad_index(ymd(2004, 2, 29), LeapDay::Fold), Some(11));
        assert_eq!(pentad_index(ymd(2004, 2, 29), LeapDay::Drop), None);
        assert_eq!(pentad_index(ymd(2004, 3, 1), LeapDay::Drop), Some(11));
        assert_eq!(pentad_len(2004, 11, LeapDay::Fold), 6);
        assert_eq!(pentad_len(2004, 11, LeapDay::Drop), 5);
        assert_eq!(pentad_len(2001, 11, LeapDay::Fold), 5);
    }

    #[test]
    fn full_years_give_73_pentads() {
        let start = ymd(2003, 1, 1);
        let n_days = 365 + 366;
        let series = DailySeries::new(start, vec![1.0; n_days]);
        for leap in [LeapDay::Fold, LeapDay::Drop] {
            let pentads = aggregate(&series, Aggregation::Mean, leap);
            assert_eq!(pentads.len(), 2 * PENTADS_PER_YEAR);
            assert!(pentads.year(2003).is_some());
            assert!(pentads.year(2004).is_some());
        }
    }

    #[test]
    fn folded_leap_pentad_has_six_days() {
        let series = DailySeries::new(ymd(2004, 1, 1), vec![2.0; 366]);
        let pentads = aggregate(&series, Aggregation::Sum, LeapDay::Fold);
        let leap_pentad = pentads.pentads[11];
        assert_eq!(leap_pentad.days, 6);
        assert_relative_eq!(leap_pentad.value, 12.0);
    }

    #[test]
    fn partial_pentads_are_omitted() {
        // 3 January to 16 January: pentads 2 and 3 complete only.
        let series = DailySeries::new(ymd(2001, 1, 3), vec![1.0; 14]);
        let pentads = aggregate(&series, Aggregation::Mean, LeapDay::Fold);
        let numbers: Vec<_> = pentads.pentads.iter().map(|p| p.pentad).collect();
        assert_eq!(numbers, vec![2, 3]);
    }

    #[test]
    fn sum_is_mean_times_length() {
        let values: Vec<f64> = (0..366).map(|i| (i as f64 * 0.37).sin() + 2.0).collect();
        let series = DailySeries::new(ymd(2004, 1, 1), values);
        let means = aggregate(&series, Aggregation::Mean, LeapDay::Fold);
        let sums = aggregate(&series, Aggregation::Sum, LeapDay::Fold);
        for (mean, sum) in means.pentads.iter().zip(&sums.pentads) {
            assert_relative_eq!(sum.value, mean.value * mean.days as f64, epsilon = 1e-10);
        }
    }

    #[test]
    fn nan_poisons_its_pentad_only() {
        let mut values = vec![1.0; 365];
        values[7] = f64::NAN;
        let series = DailySeries::new(ymd(2001, 1, 1), values);
        let pentads = aggregate(&series, Aggregation::Mean, LeapDay::Fold).values();
        assert_relative_eq!(pentads[0], 1.0);
        assert!(pentads[1].is_nan());
        assert_relative_eq!(pentads[2], 1.0);
    }

    #[test]
    fn reference_follows_aggregation() {
        let counts = [5.0, 5.25, 5.0];
        assert_eq!(Aggregation::Mean.reference_curve(4.0, &counts), vec![4.0; 3]);
        assert_eq!(Aggregation::Sum.reference_curve(4.0, &counts), vec![20.0, 21.0, 20.0]);
    }
}
