//! Wang & Fan (1999) East Asian summer monsoon shear index.
//!
//! U850 over (5-15N, 90-130E) minus U850 over (22.5-32.5N, 110-140E).

use crate::error::Result;
use crate::grid::{Field, Weighting};
use crate::region::Region;
use crate::wind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WangFanParams {
    pub level_hpa: f64,
    pub primary: Region,
    pub secondary: Region,
}

/// Index time series, one value per time step of `u`.
pub fn wang_fan(u: &Field, params: &WangFanParams, weighting: Weighting) -> Result<Vec<f64>> {
    wind::box_shear(u, &params.primary, Some(&params.secondary), weighting)
}
