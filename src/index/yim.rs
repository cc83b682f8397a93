//! Yim et al. (2014) regional monsoon indices.
//!
//! Eight precipitation boxes and seven 850 hPa zonal wind shear
//! (vorticity) box pairs, looked up by region key.

use crate::error::{IndexError, Result};
use crate::grid::{Field, Weighting};
use crate::region::Region;
use crate::wind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Box pair of a vorticity index; the secondary box is subtracted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YimVorticityRegion {
    pub primary: Region,
    #[serde(default)]
    pub secondary: Option<Region>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YimParams {
    pub level_hpa: f64,
    pub precip: BTreeMap<String, Region>,
    pub vorticity: BTreeMap<String, YimVorticityRegion>,
}

impl YimParams {
    fn precip_region(&self, key: &str) -> Result<&Region> {
        self.precip
            .get(key)
            .ok_or_else(|| IndexError::UnknownRegion(key.to_string()))
    }

    fn vorticity_region(&self, key: &str) -> Result<&YimVorticityRegion> {
        self.vorticity
            .get(key)
            .ok_or_else(|| IndexError::UnknownRegion(key.to_string()))
    }
}

/// Area-mean precipitation over the box named `key`.
pub fn yim_precip(p: &Field, key: &str, params: &YimParams, weighting: Weighting) -> Result<Vec<f64>> {
    let region = params.precip_region(key)?;
    log::debug!("Yim et al. 2014 precipitation index {key} over {region}");
    p.region_mean(region, weighting)
}

/// Zonal wind shear between the boxes named `key`.
///
/// Regions with a single box return its area-mean wind.
pub fn yim_vorticity(
    u: &Field,
    key: &str,
    params: &YimParams,
    weighting: Weighting,
) -> Result<Vec<f64>> {
    let boxes = params.vorticity_region(key)?;
    wind::box_shear(u, &boxes.primary, boxes.secondary.as_ref(), weighting)
}
