use serde::{Deserialize, Serialize};
use std::fmt;

/// Latitude/longitude box with inclusive bounds, in degrees.
///
/// Longitudes are compared modulo 360, so a box written for a 0-360 grid
/// also selects the right points on a -180-180 grid. A box whose western
/// bound exceeds its eastern bound wraps through the meridian.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub lat: [f64; 2],
    pub lon: [f64; 2],
}

impl Region {
    pub const fn new(lat_min: f64, lat_max: f64, lon_min: f64, lon_max: f64) -> Self {
        Self {
            lat: [lat_min, lat_max],
            lon: [lon_min, lon_max],
        }
    }

    pub fn contains_lat(&self, lat: f64) -> bool {
        lat >= self.lat[0] && lat <= self.lat[1]
    }

    pub fn contains_lon(&self, lon: f64) -> bool {
        if self.is_full_circle() {
            return true;
        }
        let west = self.lon[0];
        let span = (self.lon[1] - west).rem_euclid(360.0);
        (lon - west).rem_euclid(360.0) <= span
    }

    /// Whether the box spans every longitude, e.g. `[-180, 180]`.
    pub fn is_full_circle(&self) -> bool {
        self.lon[1] - self.lon[0] >= 360.0
    }

    pub fn wraps(&self) -> bool {
        !self.is_full_circle() && self.lon[0].rem_euclid(360.0) > self.lon[1].rem_euclid(360.0)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}..{}N, {}..{}E)",
            self.lat[0], self.lat[1], self.lon[0], self.lon[1]
        )
    }
}
