//! Fields with a pressure dimension.

use crate::error::{IndexError, Result};
use crate::grid::{Field, Grid, TimeAxis};
use ndarray::{Array4, Axis};
use std::str::FromStr;

/// Units of a pressure coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressureUnits {
    Pa,
    HPa,
}

impl PressureUnits {
    fn to_pa(self, val: f64) -> f64 {
        match self {
            PressureUnits::Pa => val,
            PressureUnits::HPa => val * 100.0,
        }
    }
}

impl FromStr for PressureUnits {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Pa" => Ok(PressureUnits::Pa),
            "hPa" | "mb" | "mbar" => Ok(PressureUnits::HPa),
            _ => Err(IndexError::UnknownUnits(s.to_string())),
        }
    }
}

/// A `(time, level, lat, lon)` field.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelField {
    pub time: TimeAxis,
    pub grid: Grid,
    pub levels: Vec<f64>,
    pub units: PressureUnits,
    pub data: Array4<f64>,
}

impl LevelField {
    pub fn new(
        time: TimeAxis,
        grid: Grid,
        levels: Vec<f64>,
        units: PressureUnits,
        data: Array4<f64>,
    ) -> Result<Self> {
        let (_, d_lev, d_lat, d_lon) = data.dim();
        let (n_lat, n_lon) = grid.shape();
        if (d_lev, d_lat, d_lon) != (levels.len(), n_lat, n_lon) {
            return Err(IndexError::mismatch(
                "level field",
                &[levels.len(), n_lat, n_lon],
                &[d_lev, d_lat, d_lon],
            ));
        }
        Ok(Self {
            time,
            grid,
            levels,
            units,
            data,
        })
    }

    /// Extract the level at `target_hpa`, or the nearest one available.
    ///
    /// The returned field carries the pressure of the level actually used.
    pub fn select_level(&self, target_hpa: f64) -> Result<Field> {
        let target_pa = target_hpa * 100.0;
        let (i_lev, level_pa) = self
            .levels
            .iter()
            .map(|&lev| self.units.to_pa(lev))
            .enumerate()
            .min_by(|(_, a), (_, b)| (a - target_pa).abs().total_cmp(&(b - target_pa).abs()))
            .ok_or(IndexError::MissingLevel)?;

        if level_pa != target_pa {
            log::warn!(
                "{target_hpa} hPa level not found, using nearest level {} hPa",
                level_pa / 100.0
            );
        }

        let data = self.data.index_axis(Axis(1), i_lev).to_owned();
        let field = Field::new(self.time, self.grid.clone(), data)?;
        Ok(field.with_pressure(level_pa))
    }
}
