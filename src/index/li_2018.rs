//! Li et al. (2018) Meiyu-Baiu front detection from the meridional gradient
//! of 850 hPa equivalent potential temperature over (22-40N, 105-145E).
//!
//! Thresholds were set on a 0.5 degree grid; on coarser grids the gradient
//! threshold is relaxed in proportion to the latitude spacing. Unlike the
//! other indices, NaN cells are skipped rather than propagated.

use super::gao_2001::theta_e_field;
use crate::error::{IndexError, Result};
use crate::grid::{Field, Grid};
use crate::region::Region;
use crate::stats::{compute_nan_mean, gradient};
use crate::thermo::EARTH_RADIUS;
use ndarray::{Array2, Array3, Axis, s};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiMeiyuParams {
    pub level_hpa: f64,
    pub region: Region,
    /// |d theta_e / dy| threshold on the reference grid, K/km.
    pub gradient_threshold: f64,
    /// Latitude spacing the thresholds were tuned on, degrees.
    pub reference_resolution: f64,
    /// Fraction of the box's cells that must exceed the threshold.
    pub cell_fraction: f64,
}

/// Detected front for every time step and longitude of the box.
#[derive(Debug, Clone, PartialEq)]
pub struct MeiyuFront {
    /// Grid of the box.
    pub grid: Grid,
    /// Front latitude, shape `(time, lon)`; NaN where no front was found.
    pub latitude: Array2<f64>,
    /// |d theta_e / dy| in K/km, shape `(time, lat, lon)`.
    pub gradient: Array3<f64>,
}

impl MeiyuFront {
    /// Whether a front was found at time step `i_time`.
    pub fn detected(&self, i_time: usize) -> bool {
        self.latitude.row(i_time).iter().any(|lat| !lat.is_nan())
    }
}

/// `t` (K) and `q` (kg/kg) at 850 hPa.
pub fn li_2018(t: &Field, q: &Field, params: &LiMeiyuParams) -> Result<MeiyuFront> {
    let theta_e = theta_e_field(t, q, "Li et al. 2018 front")?;
    let lat_res = t
        .grid
        .lat_resolution()
        .ok_or_else(|| IndexError::insufficient("at least two latitudes needed"))?;

    let (gradient_threshold, continuity_threshold) = if lat_res > params.reference_resolution {
        (params.gradient_threshold / lat_res, lat_res)
    } else {
        (params.gradient_threshold, 1.0)
    };

    let (i_lats, i_lons) = t.grid.select(&params.region)?;
    let n_lats = i_lats.len();
    let n_lons = i_lons.len();
    let cell_threshold = params.cell_fraction * (n_lats * n_lons) as f64;

    // Gradient on the full grid, then restricted to the box.
    let full_gradient = meridional_gradient(&theta_e);
    let box_gradient = full_gradient
        .select(Axis(1), &i_lats)
        .select(Axis(2), &i_lons);
    let box_lats: Vec<f64> = i_lats.iter().map(|&i| t.grid.lat[i]).collect();
    let box_lons: Vec<f64> = i_lons.iter().map(|&i| t.grid.lon[i]).collect();

    let n_times = theta_e.n_times();
    let mut latitude = Array2::from_elem((n_times, n_lons), f64::NAN);
    for (i_time, step) in box_gradient.outer_iter().enumerate() {
        let n_exceed = step.iter().filter(|&&g| g > gradient_threshold).count();
        if n_exceed as f64 <= cell_threshold {
            continue;
        }

        let front: Vec<f64> = (0..n_lons)
            .map(|k| {
                compute_nan_mean(
                    step.column(k)
                        .iter()
                        .zip(&box_lats)
                        .filter(|&(&g, _)| g > gradient_threshold)
                        .map(|(_, &lat)| lat),
                )
            })
            .collect();

        let wiggle: f64 = front
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).abs())
            .filter(|d| !d.is_nan())
            .sum::<f64>()
            / (n_lats as f64 - 1.0);
        if wiggle < continuity_threshold {
            latitude.row_mut(i_time).assign(&ndarray::ArrayView1::from(front.as_slice()));
        }
    }
    log::debug!(
        "Meiyu front found at {} of {n_times} time steps",
        (0..n_times)
            .filter(|&i| latitude.row(i).iter().any(|lat| !lat.is_nan()))
            .count()
    );

    Ok(MeiyuFront {
        grid: Grid::new(box_lats, box_lons),
        latitude,
        gradient: box_gradient,
    })
}

/// |d theta / dy| in K/km along latitude, for every time and longitude.
fn meridional_gradient(theta: &Field) -> Array3<f64> {
    let lat = &theta.grid.lat;
    let mut grad = Array3::from_elem(theta.data.dim(), f64::NAN);
    let (n_times, _, n_lons) = theta.data.dim();
    let per_degree_to_per_km = 180.0 / std::f64::consts::PI / EARTH_RADIUS * 1000.0;
    for i_time in 0..n_times {
        for i_lon in 0..n_lons {
            let column = theta.data.slice(s![i_time, .., i_lon]).to_vec();
            let d_dlat = gradient(&column, lat);
            for (i_lat, val) in d_dlat.into_iter().enumerate() {
                grad[[i_time, i_lat, i_lon]] = (val * per_degree_to_per_km).abs();
            }
        }
    }
    grad
}
