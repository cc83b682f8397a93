//! Li & Zhang (2009) monsoon onset and withdrawal from wind rotation.
//!
//! beta is the angle between the daily 850 hPa wind and its January mean.
//! A point is monsoonal while beta exceeds half the July-August angle. The
//! onset (withdrawal) day is where the slope of beta changes fastest at or
//! after (before) the first (last) sustained exceedance.

use crate::climatology;
use crate::error::{IndexError, Result};
use crate::grid::{Field, Grid, TimeAxis};
use crate::pentad::PENTAD_DAYS;
use crate::region::Region;
use crate::series::{self, DailySeries};
use crate::smooth::harmonic_smooth;
use crate::stats::{compute_mean, unit_gradient};
use crate::wind::rotation_angle;
use chrono::NaiveDate;
use ndarray::{Array2, s};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiZhangParams {
    pub level_hpa: f64,
    pub region: Region,
    /// Days beta must stay above the reference.
    pub sustain_days: usize,
    /// Days either side of a candidate used for the slope change.
    pub slope_window: usize,
    /// Smooth the winds to `harmonics` harmonics first.
    pub smooth: bool,
    pub harmonics: usize,
    pub reference_months: Vec<u32>,
    pub summer_months: Vec<u32>,
    pub onset_months: Vec<u32>,
    pub withdrawal_months: Vec<u32>,
}

/// Onset and withdrawal pentads at one point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RotationSeason {
    pub onset: Option<usize>,
    pub withdrawal: Option<usize>,
}

/// Per-point results over the region box.
#[derive(Debug, Clone, PartialEq)]
pub struct RotationSeasonMap {
    /// The part of the input grid inside the region.
    pub grid: Grid,
    pub seasons: Array2<RotationSeason>,
}

impl RotationSeasonMap {
    fn map_f64(&self, f: impl Fn(&RotationSeason) -> Option<usize>) -> Array2<f64> {
        self.seasons
            .map(|season| f(season).map_or(f64::NAN, |pentad| pentad as f64))
    }

    /// Onset pentads, NaN where none was found.
    pub fn onset(&self) -> Array2<f64> {
        self.map_f64(|s| s.onset)
    }

    pub fn withdrawal(&self) -> Array2<f64> {
        self.map_f64(|s| s.withdrawal)
    }
}

/// Narrowest slope window with at least two days after the candidate.
pub const MIN_SLOPE_WINDOW: usize = 3;

/// Onset and withdrawal at one point from daily `u` and `v` (m/s).
///
/// The record must cover at least a year.
pub fn li_zhang_point(
    u: &DailySeries,
    v: &DailySeries,
    params: &LiZhangParams,
) -> Result<RotationSeason> {
    if u.len() != v.len() || u.start() != v.start() {
        return Err(IndexError::mismatch(
            "Li & Zhang 2009 winds",
            &[u.len()],
            &[v.len()],
        ));
    }
    climatology::check_record_len(u.len())?;
    if params.slope_window < MIN_SLOPE_WINDOW {
        return Err(IndexError::insufficient(format!(
            "slope window of {} days, at least {MIN_SLOPE_WINDOW} needed",
            params.slope_window
        )));
    }
    let (u_vals, v_vals) = if params.smooth {
        (
            harmonic_smooth(u.values(), params.harmonics),
            harmonic_smooth(v.values(), params.harmonics),
        )
    } else {
        (u.values().to_vec(), v.values().to_vec())
    };
    scan_point(u.start(), &u_vals, &v_vals, params)
}

/// Onset and withdrawal at every point of the region from daily `u` and `v`.
pub fn li_zhang(u: &Field, v: &Field, params: &LiZhangParams) -> Result<RotationSeasonMap> {
    u.check_compatible(v, "zonal and meridional wind")?;
    let TimeAxis::Daily(start) = u.time else {
        return Err(IndexError::MissingCalendar("Li & Zhang 2009"));
    };
    let (i_lats, i_lons) = u.grid.select(&params.region)?;
    let grid = Grid::new(
        i_lats.iter().map(|&j| u.grid.lat[j]).collect(),
        i_lons.iter().map(|&k| u.grid.lon[k]).collect(),
    );

    let mut seasons = Array2::from_elem((i_lats.len(), i_lons.len()), RotationSeason::default());
    for ((j, k), slot) in seasons.indexed_iter_mut() {
        let u_point = u.data.slice(s![.., i_lats[j], i_lons[k]]).to_vec();
        let v_point = v.data.slice(s![.., i_lats[j], i_lons[k]]).to_vec();
        *slot = li_zhang_point(
            &DailySeries::new(start, u_point),
            &DailySeries::new(start, v_point),
            params,
        )?;
    }
    log::info!(
        "Li & Zhang 2009: onset found at {} of {} points",
        seasons.iter().filter(|s| s.onset.is_some()).count(),
        seasons.len()
    );
    Ok(RotationSeasonMap { grid, seasons })
}

fn scan_point(
    start: NaiveDate,
    u: &[f64],
    v: &[f64],
    params: &LiZhangParams,
) -> Result<RotationSeason> {
    let month_mean = |vals: &[f64], months: &[u32]| {
        series::month_mean(start.iter_days().zip(vals.iter().copied()), months)
    };
    let u_ref = month_mean(u, &params.reference_months)?;
    let v_ref = month_mean(v, &params.reference_months)?;
    let u_summer = month_mean(u, &params.summer_months)?;
    let v_summer = month_mean(v, &params.summer_months)?;

    let beta: Vec<f64> = u
        .iter()
        .zip(v)
        .map(|(&u, &v)| rotation_angle(u, v, u_ref, v_ref))
        .collect();
    let threshold = rotation_angle(u_summer, v_summer, u_ref, v_ref) / 2.0;

    let onset_days = series::month_indices(start, beta.len(), &params.onset_months);
    let withdrawal_days = series::month_indices(start, beta.len(), &params.withdrawal_months);
    let pick = |days: &[usize], withdrawal: bool| {
        let beta_sub: Vec<f64> = days.iter().map(|&d| beta[d]).collect();
        let above: Vec<bool> = beta_sub.iter().map(|&b| b > threshold).collect();
        let found = if withdrawal {
            last_run_end(&above, params.sustain_days)
        } else {
            first_run_start(&above, params.sustain_days)
        };
        let anchor = found?;
        let i_best = steepest_turn(&beta_sub, params.slope_window, |i| {
            if withdrawal { i <= anchor } else { i >= anchor }
        })?;
        Some(day_to_pentad(days[i_best]))
    };

    Ok(RotationSeason {
        onset: pick(&onset_days, false),
        withdrawal: pick(&withdrawal_days, true),
    })
}

/// First day, from the second on, that starts `sustain` qualifying days.
fn first_run_start(above: &[bool], sustain: usize) -> Option<usize> {
    let sustain = sustain.max(1);
    (1..above.len().saturating_sub(sustain)).find(|&i| above[i..i + sustain].iter().all(|&a| a))
}

/// Last day that ends `sustain` qualifying days.
fn last_run_end(above: &[bool], sustain: usize) -> Option<usize> {
    let sustain = sustain.max(1);
    (sustain..above.len())
        .rev()
        .find(|&i| above[i + 1 - sustain..=i].iter().all(|&a| a))
}

/// Day where `atan(slope before) - atan(slope after)` is largest.
///
/// The slope before day `i` is the mean gradient over the `window` days up
/// to `i - 1`, the slope after over days `i + 1 .. i + window - 1`.
fn steepest_turn(beta: &[f64], window: usize, allowed: impl Fn(usize) -> bool) -> Option<usize> {
    if window < MIN_SLOPE_WINDOW {
        return None;
    }
    let mut best: Option<(usize, f64)> = None;
    for i in window..beta.len().saturating_sub(window) {
        if !allowed(i) {
            continue;
        }
        let before = compute_mean(&unit_gradient(&beta[i - window..i]));
        let after = compute_mean(&unit_gradient(&beta[i + 1..i + window]));
        let score = before.atan() - after.atan();
        if score.is_nan() {
            continue;
        }
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((i, score));
        }
    }
    best.map(|(i, _)| i)
}

fn day_to_pentad(i_day: usize) -> usize {
    ((i_day + 1) as f64 / PENTAD_DAYS as f64).round() as usize
}
