//! Gao et al. (2001) South China Sea monsoon onset from equivalent potential
//! temperature and zonal wind over (10-20N, 110-120E) at 850 hPa.
//!
//! Uses the 335 K threshold.

use super::pentad_labels;
use crate::error::{IndexError, Result};
use crate::grid::{Field, Weighting};
use crate::region::Region;
use crate::thermo;
use ndarray::Zip;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaoParams {
    pub level_hpa: f64,
    pub region: Region,
    /// Box-mean theta_e must exceed this, K.
    pub theta_e_threshold: f64,
}

/// Equivalent potential temperature of a temperature/humidity level pair.
pub fn theta_e_field(t: &Field, q: &Field, what: &'static str) -> Result<Field> {
    t.check_compatible(q, "temperature and humidity")?;
    let pressure = t.pressure.or(q.pressure).ok_or(IndexError::MissingPressure(what))?;
    let data = Zip::from(&t.data)
        .and(&q.data)
        .map_collect(|&t, &q| thermo::equivalent_potential_temperature(t, q, pressure).0);
    Ok(Field::new(t.time, t.grid.clone(), data)?.with_pressure(pressure))
}

/// Onset pentad of one year of pentad-mean `t` (K), `q` (kg/kg) and `u` (m/s).
pub fn gao_2001(
    t: &Field,
    q: &Field,
    u: &Field,
    params: &GaoParams,
    weighting: Weighting,
) -> Result<Option<usize>> {
    t.check_compatible(u, "temperature and zonal wind")?;
    let labels = pentad_labels(u, "Gao et al. 2001 onset")?;

    let theta_e = theta_e_field(t, q, "Gao et al. 2001 onset")?;
    let theta_e_mean = theta_e.region_mean(&params.region, weighting)?;
    let u_mean = u.region_mean(&params.region, weighting)?;

    let onset = scan_onset(&theta_e_mean, &u_mean, params.theta_e_threshold).map(|i| labels[i]);
    log::info!("Gao et al. 2001 onset pentad: {onset:?}");
    Ok(onset)
}

fn scan_onset(theta_e: &[f64], u: &[f64], threshold: f64) -> Option<usize> {
    let westerly = |i: usize| u.get(i).is_some_and(|&val| val > 0.0);

    (0..u.len()).find(|&i| {
        if !(theta_e[i] > threshold && westerly(i) && westerly(i + 1)) {
            return false;
        }
        // Steady for three pentads, then a break of at most two.
        let steady = westerly(i + 2) && (i + 3..i + 6).any(westerly);
        // Or steady for two, then a break of one.
        let brief_break = !westerly(i + 2) && westerly(i + 3);
        steady || brief_break
    })
}
