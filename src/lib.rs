//! Monsoon onset, withdrawal and intensity indices.
//!
//! Precipitation, wind, temperature and humidity fields are supplied as
//! in-memory arrays ([`DailySeries`], [`Field`], [`LevelField`],
//! [`PentadField`]). Index constants come from a [`Catalog`].
//!
//! ```no_run
//! use monsoon_indices::{Catalog, DailySeries, wang_linho_series};
//! # fn main() -> anyhow::Result<()> {
//! let catalog = Catalog::builtin()?;
//! let start = chrono::NaiveDate::from_ymd_opt(2001, 1, 1).unwrap();
//! let precip = DailySeries::new(start, vec![0.0; 365]);
//! let season = wang_linho_series(&precip, 20.0, &catalog.wang_linho_2002)?;
//! println!("{season:?}");
//! # Ok(())
//! # }
//! ```

pub mod climatology;
pub mod config;
pub mod detect;
pub mod error;
pub mod grid;
pub mod index;
pub mod level;
pub mod pentad;
pub mod region;
pub mod series;
pub mod smooth;
pub mod stats;
pub mod thermo;
pub mod wind;

pub use config::Catalog;
pub use detect::{Condition, Detector, Reference, Season, SeasonMap};
pub use error::{IndexError, Result};
pub use grid::{CellAreas, Field, Grid, PentadField, TimeAxis, Weighting};
pub use index::*;
pub use level::{LevelField, PressureUnits};
pub use pentad::{Aggregation, LeapDay, PentadSeries};
pub use region::Region;
pub use series::DailySeries;
