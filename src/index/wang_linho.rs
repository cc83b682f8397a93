//! Wang & LinHo (2002) rainy season from relative precipitation.
//!
//! Pentad precipitation climatology, smoothed to 12 harmonics, minus the
//! January mean (northern hemisphere) or July mean (southern hemisphere).
//! The season is where this excess reaches 5 mm/day.

use super::smooth_field;
use crate::climatology;
use crate::detect::{Condition, Detector, Reference, Season, SeasonMap};
use crate::error::{IndexError, Result};
use crate::grid::{Field, PentadField, TimeAxis};
use crate::pentad::{self, Aggregation, LeapDay};
use crate::series::DailySeries;
use crate::smooth::harmonic_smooth;
use ndarray::{Array3, ArrayView1, s};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WangLinHoParams {
    /// Excess over the reference month that counts as rainy season, in the
    /// units of `aggregation` (mm/day for means, mm/pentad for sums).
    pub margin: f64,
    pub sustain: usize,
    pub harmonics: usize,
    pub aggregation: Aggregation,
    pub leap: LeapDay,
    /// Reference months north of the equator.
    pub north_months: Vec<u32>,
    /// Reference months south of the equator.
    pub south_months: Vec<u32>,
}

impl WangLinHoParams {
    pub fn detector(&self) -> Detector {
        Detector::new(
            Condition::Excess {
                margin: self.margin,
            },
            self.sustain,
        )
    }

    fn reference_months(&self, lat: f64) -> &[u32] {
        if lat >= 0.0 {
            &self.north_months
        } else {
            &self.south_months
        }
    }
}

/// Seasons from a pentad precipitation climatology and a per-pentad
/// reference of the same shape.
pub fn wang_linho(
    p_pentad: &PentadField,
    reference: &PentadField,
    params: &WangLinHoParams,
) -> Result<SeasonMap> {
    let smoothed = smooth_field(p_pentad, params.harmonics);
    params.detector().detect_field_against(&smoothed, reference)
}

/// Reference-month mean of daily precipitation at every point, expressed
/// per pentad in the units of `params.aggregation`.
pub fn wang_linho_reference(p_daily: &Field, params: &WangLinHoParams) -> Result<PentadField> {
    let TimeAxis::Daily(start) = p_daily.time else {
        return Err(IndexError::MissingCalendar("Wang & LinHo reference"));
    };
    let north = p_daily.month_mean(&params.north_months)?;
    let south = p_daily.month_mean(&params.south_months)?;
    let day_counts = climatology::calendar_day_counts(start, p_daily.n_times(), params.leap)?;

    let (n_lat, n_lon) = p_daily.grid.shape();
    let mut data = Array3::zeros((day_counts.len(), n_lat, n_lon));
    for ((j, k), &rate_north) in north.indexed_iter() {
        let rate = if p_daily.grid.lat[j] >= 0.0 { rate_north } else { south[[j, k]] };
        let curve = params.aggregation.reference_curve(rate, &day_counts);
        data.slice_mut(s![.., j, k])
            .assign(&ArrayView1::from(curve.as_slice()));
    }
    PentadField::new(p_daily.grid.clone(), data)
}

/// Full pipeline from daily precipitation (mm/day) on a grid.
pub fn wang_linho_daily(p_daily: &Field, params: &WangLinHoParams) -> Result<SeasonMap> {
    let p_pentad = p_daily.pentad_climatology(params.aggregation, params.leap)?;
    let reference = wang_linho_reference(p_daily, params)?;
    wang_linho(&p_pentad, &reference, params)
}

/// Full pipeline for a single daily precipitation record at latitude `lat`.
pub fn wang_linho_series(
    p_daily: &DailySeries,
    lat: f64,
    params: &WangLinHoParams,
) -> Result<Option<Season>> {
    climatology::check_record_len(p_daily.len())?;
    let pentads = pentad::aggregate(p_daily, params.aggregation, params.leap);
    let clim = climatology::pentad_climatology(&pentads)?;
    let day_counts = climatology::pentad_day_counts(&pentads)?;

    let rate = climatology::monthly_reference(p_daily, params.reference_months(lat))?;
    let reference = params.aggregation.reference_curve(rate, &day_counts);
    let smoothed = harmonic_smooth(&clim, params.harmonics);
    let season = params
        .detector()
        .detect(&smoothed, Reference::Curve(&reference))?;
    log::debug!("Wang & LinHo season at {lat}N: {season:?}");
    Ok(season)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Catalog;
    use crate::grid::Grid;
    use chrono::NaiveDate;

    fn params() -> WangLinHoParams {
        Catalog::builtin().unwrap().wang_linho_2002
    }

    fn jan_first() -> NaiveDate {
        NaiveDate::from_ymd_opt(2001, 1, 1).unwrap()
    }

    #[test]
    fn constant_rain_has_no_season() {
        let series = DailySeries::new(jan_first(), vec![6.0; 365]);
        assert_eq!(wang_linho_series(&series, 20.0, &params()), Ok(None));
    }

    #[test]
    fn short_record_is_insufficient() {
        let series = DailySeries::new(jan_first(), vec![6.0; 200]);
        let err = wang_linho_series(&series, 20.0, &params()).unwrap_err();
        assert!(matches!(err, IndexError::InsufficientData(_)));
    }

    #[test]
    fn smooth_summer_peak_is_centred() {
        // Annual cycle peaking in pentad 37 (late June / early July).
        let vals: Vec<f64> = (0..365)
            .map(|d| {
                let phase = 2.0 * std::f64::consts::PI * (d as f64 - 182.0) / 365.0;
                8.0 + 8.0 * phase.cos()
            })
            .collect();
        let series = DailySeries::new(jan_first(), vals);
        let season = wang_linho_series(&series, 20.0, &params()).unwrap().unwrap();
        assert!(season.onset < 37 && season.withdrawal > 37);
        assert!((season.peak as i64 - 37).abs() <= 1);
        assert_eq!(season.withdrawal + season.onset, 2 * season.peak);
    }

    #[test]
    fn southern_points_use_july() {
        let start = jan_first();
        let grid = Grid::new(vec![-10.0, 10.0], vec![100.0]);
        let data = Array3::from_shape_fn((365, 2, 1), |(d, _, _)| if d < 31 { 1.0 } else { 3.0 });
        let field = Field::new(TimeAxis::Daily(start), grid, data).unwrap();
        let reference = wang_linho_reference(&field, &params()).unwrap();
        assert_eq!(reference.n_pentads(), 73);
        assert!(reference.data.slice(s![.., 0, 0]).iter().all(|&r| r == 3.0));
        assert!(reference.data.slice(s![.., 1, 0]).iter().all(|&r| r == 1.0));
    }

    fn summed() -> WangLinHoParams {
        WangLinHoParams {
            aggregation: Aggregation::Sum,
            ..params()
        }
    }

    #[test]
    fn summed_constant_rain_has_no_season() {
        let series = DailySeries::new(jan_first(), vec![6.0; 730]);
        assert_eq!(wang_linho_series(&series, 20.0, &summed()), Ok(None));

        // Folded leap days make pentad 12 longer than the others.
        let start = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        let series = DailySeries::new(start, vec![6.0; 1461]);
        assert_eq!(wang_linho_series(&series, 20.0, &summed()), Ok(None));
    }

    #[test]
    fn summed_reference_scales_with_pentad_length() {
        let start = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        let grid = Grid::new(vec![10.0], vec![100.0]);
        let field = Field::new(TimeAxis::Daily(start), grid, Array3::from_elem((1461, 1, 1), 2.0))
            .unwrap();

        let reference = wang_linho_reference(&field, &summed()).unwrap();
        assert_eq!(reference.data[[0, 0, 0]], 10.0);
        assert_eq!(reference.data[[11, 0, 0]], 10.5);

        let map = wang_linho_daily(&field, &summed()).unwrap();
        assert_eq!(map.seasons[[0, 0]], None);
    }

    #[test]
    fn step_field_needs_calendar() {
        let grid = Grid::new(vec![10.0], vec![100.0]);
        let field = Field::new(TimeAxis::Steps, grid, Array3::zeros((365, 1, 1))).unwrap();
        let err = wang_linho_reference(&field, &params()).unwrap_err();
        assert!(matches!(err, IndexError::MissingCalendar(_)));
    }
}
