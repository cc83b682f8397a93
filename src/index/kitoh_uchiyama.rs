//! Kitoh & Uchiyama (2006) normalized pentad precipitation index.
//!
//! NPI = (P - P_min) / (P_max - P_min) over the smoothed annual cycle of
//! each grid point; the rainy season is where NPI reaches 0.618.

use super::smooth_field;
use crate::climatology;
use crate::detect::{Condition, Detector, Reference, Season, SeasonMap};
use crate::error::Result;
use crate::grid::{Field, PentadField};
use crate::pentad::{Aggregation, LeapDay};
use crate::series::DailySeries;
use crate::smooth::harmonic_smooth;
use ndarray::{ArrayView1, Axis};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KitohUchiyamaParams {
    pub threshold: f64,
    pub sustain: usize,
    pub harmonics: usize,
    pub aggregation: Aggregation,
    pub leap: LeapDay,
}

impl KitohUchiyamaParams {
    pub fn detector(&self) -> Detector {
        Detector::new(
            Condition::Above {
                threshold: self.threshold,
            },
            self.sustain,
        )
    }
}

/// Min-max normalization of one annual cycle.
///
/// NaN pentads are ignored when finding the extremes. A flat or all-NaN
/// cycle normalizes to NaN everywhere.
pub fn normalize(vals: &[f64]) -> Vec<f64> {
    let (lo, hi) = vals
        .iter()
        .filter(|val| !val.is_nan())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &val| {
            (lo.min(val), hi.max(val))
        });
    let range = hi - lo;
    // Smoothing leaves rounding noise on a flat cycle.
    if range.is_nan() || range <= 1e-12 * lo.abs().max(hi.abs()) {
        return vec![f64::NAN; vals.len()];
    }
    vals.iter().map(|val| (val - lo) / range).collect()
}

/// Normalized precipitation index of a pentad climatology field.
pub fn npi_field(p_pentad: &PentadField, harmonics: usize) -> PentadField {
    let mut npi = smooth_field(p_pentad, harmonics);
    for mut lane in npi.data.lanes_mut(Axis(0)) {
        let normalized = normalize(&lane.to_vec());
        lane.assign(&ArrayView1::from(normalized.as_slice()));
    }
    npi
}

/// Seasons from a pentad precipitation climatology.
pub fn kitoh_uchiyama(p_pentad: &PentadField, params: &KitohUchiyamaParams) -> Result<SeasonMap> {
    let npi = npi_field(p_pentad, params.harmonics);
    params.detector().detect_field(&npi, None)
}

/// Full pipeline from daily precipitation on a grid.
pub fn kitoh_uchiyama_daily(p_daily: &Field, params: &KitohUchiyamaParams) -> Result<SeasonMap> {
    let p_pentad = p_daily.pentad_climatology(params.aggregation, params.leap)?;
    kitoh_uchiyama(&p_pentad, params)
}

/// Full pipeline for one daily precipitation record.
pub fn kitoh_uchiyama_series(
    p_daily: &DailySeries,
    params: &KitohUchiyamaParams,
) -> Result<Option<Season>> {
    let clim = climatology::daily_pentad_climatology(p_daily, params.aggregation, params.leap)?;
    let npi = normalize(&harmonic_smooth(&clim, params.harmonics));
    params.detector().detect(&npi, Reference::Scalar(0.0))
}
