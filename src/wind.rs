//! Wind-vector rotation and box-difference shear.

use crate::error::Result;
use crate::grid::{Field, Weighting};
use crate::region::Region;

/// Angle (radians, 0..pi) between the wind `(u, v)` and a reference wind.
///
/// NaN if either vector has zero length.
pub fn rotation_angle(u: f64, v: f64, u_ref: f64, v_ref: f64) -> f64 {
    let mag = u.hypot(v);
    let mag_ref = u_ref.hypot(v_ref);
    if mag == 0.0 || mag_ref == 0.0 {
        return f64::NAN;
    }
    let cos = (u_ref * u + v_ref * v) / (mag * mag_ref);
    cos.clamp(-1.0, 1.0).acos()
}

/// Area-mean zonal wind over `primary` minus that over `secondary`.
///
/// Without a secondary box the primary mean is returned as is.
pub fn box_shear(
    u: &Field,
    primary: &Region,
    secondary: Option<&Region>,
    weighting: Weighting,
) -> Result<Vec<f64>> {
    let u_primary = u.region_mean(primary, weighting)?;
    let Some(secondary) = secondary else {
        return Ok(u_primary);
    };
    let u_secondary = u.region_mean(secondary, weighting)?;
    Ok(u_primary
        .iter()
        .zip(&u_secondary)
        .map(|(a, b)| a - b)
        .collect())
}
