//! Wang et al. (2004) South China Sea summer monsoon onset.
//!
//! The onset is the first pentad from pentad 24 on where the box-mean
//! U850 over (5-15N, 110-120E) turns westerly and stays predominantly so.

use super::pentad_labels;
use crate::error::Result;
use crate::grid::{Field, Weighting};
use crate::region::Region;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wang2004Params {
    pub level_hpa: f64,
    pub region: Region,
    /// Earliest pentad number considered.
    pub first_pentad: usize,
    /// Pentads (starting at the candidate) checked for persistence.
    pub window: usize,
    /// The window's summed wind must exceed this, m/s.
    pub window_sum_threshold: f64,
    /// Westerly pentads required within the window.
    pub min_positive: usize,
}

/// Box-mean zonal wind and the onset pentad of one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScsOnset {
    pub u_mean: Vec<f64>,
    pub onset: Option<usize>,
}

/// `u` holds one year of pentad-mean 850 hPa zonal wind.
pub fn wang_2004(u: &Field, params: &Wang2004Params, weighting: Weighting) -> Result<ScsOnset> {
    let labels = pentad_labels(u, "Wang et al. 2004 onset")?;
    let u_mean = u.region_mean(&params.region, weighting)?;
    let onset = scan_onset(&u_mean, &labels, params);
    match onset {
        Some(pentad) => log::info!("SCS monsoon onset at pentad {pentad}"),
        None => log::info!("no SCS monsoon onset found"),
    }
    Ok(ScsOnset { u_mean, onset })
}

fn scan_onset(u_mean: &[f64], labels: &[usize], params: &Wang2004Params) -> Option<usize> {
    let candidates: Vec<usize> = (0..u_mean.len())
        .filter(|&i| labels[i] >= params.first_pentad)
        .collect();

    for (i_cand, &i_pentad) in candidates.iter().enumerate() {
        let end = (i_cand + params.window).min(candidates.len());
        let window: Vec<f64> = candidates[i_cand..end].iter().map(|&i| u_mean[i]).collect();
        let window_sum: f64 = window.iter().sum();
        let n_positive = window.iter().filter(|&&val| val > 0.0).count();
        if u_mean[i_pentad] > 0.0
            && window_sum > params.window_sum_threshold
            && n_positive >= params.min_positive
        {
            return Some(labels[i_pentad]);
        }
    }
    None
}
