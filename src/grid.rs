//! Gridded fields and area averaging.

use crate::climatology;
use crate::error::{IndexError, Result};
use crate::pentad::{Aggregation, LeapDay, PENTADS_PER_YEAR};
use crate::region::Region;
use crate::series::{self, DailySeries};
use chrono::NaiveDate;
use ndarray::{Array2, Array3, ArrayView1, Axis, s};

/// Latitude and longitude coordinates, in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub lat: Vec<f64>,
    pub lon: Vec<f64>,
}

impl Grid {
    pub fn new(lat: Vec<f64>, lon: Vec<f64>) -> Self {
        Self { lat, lon }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.lat.len(), self.lon.len())
    }

    /// Indices of the latitudes and longitudes inside `region`.
    pub fn select(&self, region: &Region) -> Result<(Vec<usize>, Vec<usize>)> {
        let i_lats: Vec<usize> = (0..self.lat.len())
            .filter(|&i| region.contains_lat(self.lat[i]))
            .collect();
        let i_lons: Vec<usize> = (0..self.lon.len())
            .filter(|&i| region.contains_lon(self.lon[i]))
            .collect();
        if i_lats.is_empty() || i_lons.is_empty() {
            return Err(IndexError::EmptyRegion {
                region: region.to_string(),
            });
        }
        Ok((i_lats, i_lons))
    }

    /// Latitude spacing, taken from the first two points.
    pub fn lat_resolution(&self) -> Option<f64> {
        match self.lat.as_slice() {
            [first, second, ..] => Some((second - first).abs()),
            _ => None,
        }
    }

    fn matches(&self, other: &Grid) -> bool {
        let same = |a: &[f64], b: &[f64]| {
            a.len() == b.len()
                && a.iter()
                    .zip(b)
                    .all(|(x, y)| ((x - y) * 100.0).round() == 0.0)
        };
        same(&self.lat, &other.lat) && same(&self.lon, &other.lon)
    }
}

/// Per-cell area weights.
#[derive(Debug, Clone, PartialEq)]
pub struct CellAreas {
    pub grid: Grid,
    /// Shape `(lat, lon)`.
    pub area: Array2<f64>,
}

/// How grid cells are weighted in an area mean.
#[derive(Debug, Clone, Copy, Default)]
pub enum Weighting<'a> {
    /// Weight by the cosine of latitude.
    #[default]
    CosLat,
    /// Weight by cell area; falls back to `CosLat` if the grids differ.
    Area(&'a CellAreas),
}

/// Labels of the time axis of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeAxis {
    /// One step per day from the given date.
    Daily(NaiveDate),
    /// One step per pentad, numbered from the given pentad (1-based).
    Pentad(usize),
    /// Unlabelled steps.
    Steps,
}

/// A `(time, lat, lon)` field of one physical variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub time: TimeAxis,
    pub grid: Grid,
    pub data: Array3<f64>,
    /// Pressure of the field's level, in Pa, if known.
    pub pressure: Option<f64>,
}

impl Field {
    /// Build a field, checking that `data` matches the grid.
    pub fn new(time: TimeAxis, grid: Grid, data: Array3<f64>) -> Result<Self> {
        let (n_lat, n_lon) = grid.shape();
        let (_, d_lat, d_lon) = data.dim();
        if (d_lat, d_lon) != (n_lat, n_lon) {
            return Err(IndexError::mismatch(
                "field grid",
                &[n_lat, n_lon],
                &[d_lat, d_lon],
            ));
        }
        Ok(Self {
            time,
            grid,
            data,
            pressure: None,
        })
    }

    pub fn with_pressure(mut self, pressure_pa: f64) -> Self {
        self.pressure = Some(pressure_pa);
        self
    }

    pub fn n_times(&self) -> usize {
        self.data.len_of(Axis(0))
    }

    /// Fail unless `other` has the same shape and grid.
    pub fn check_compatible(&self, other: &Field, what: &'static str) -> Result<()> {
        if self.data.shape() != other.data.shape() {
            return Err(IndexError::mismatch(
                what,
                self.data.shape(),
                other.data.shape(),
            ));
        }
        if self.grid != other.grid {
            return Err(IndexError::mismatch(
                what,
                &[self.grid.lat.len(), self.grid.lon.len()],
                &[other.grid.lat.len(), other.grid.lon.len()],
            ));
        }
        Ok(())
    }

    /// Daily series at one grid point.
    pub fn point_series(&self, i_lat: usize, i_lon: usize) -> Result<DailySeries> {
        let TimeAxis::Daily(start) = self.time else {
            return Err(IndexError::MissingCalendar("point series"));
        };
        let vals = self.data.slice(s![.., i_lat, i_lon]).to_vec();
        Ok(DailySeries::new(start, vals))
    }

    /// Weighted mean over `region` at every time step.
    ///
    /// NaN anywhere in the box poisons that time step.
    pub fn region_mean(&self, region: &Region, weighting: Weighting) -> Result<Vec<f64>> {
        let (i_lats, i_lons) = self.grid.select(region)?;
        let weights = self.weights(&i_lats, &i_lons, weighting);
        let weight_sum: f64 = weights.iter().sum();

        let means = self
            .data
            .outer_iter()
            .map(|step| {
                let mut sum = 0.0;
                for (w_row, &i_lat) in weights.outer_iter().zip(&i_lats) {
                    for (&w, &i_lon) in w_row.iter().zip(&i_lons) {
                        sum += w * step[[i_lat, i_lon]];
                    }
                }
                sum / weight_sum
            })
            .collect();
        Ok(means)
    }

    fn weights(&self, i_lats: &[usize], i_lons: &[usize], weighting: Weighting) -> Array2<f64> {
        if let Weighting::Area(areas) = weighting {
            if areas.grid.matches(&self.grid) && areas.area.dim() == self.grid.shape() {
                return Array2::from_shape_fn((i_lats.len(), i_lons.len()), |(j, k)| {
                    areas.area[[i_lats[j], i_lons[k]]]
                });
            }
            log::warn!(
                "cell area grid does not match the field grid, using cosine-latitude weights"
            );
        }
        Array2::from_shape_fn((i_lats.len(), i_lons.len()), |(j, _)| {
            self.grid.lat[i_lats[j]].to_radians().cos()
        })
    }

    /// Mean over the given months at every grid point.
    pub fn month_mean(&self, months: &[u32]) -> Result<Array2<f64>> {
        let TimeAxis::Daily(start) = self.time else {
            return Err(IndexError::MissingCalendar("monthly mean"));
        };
        let idxs = series::month_indices(start, self.n_times(), months);
        if idxs.is_empty() {
            return Err(IndexError::insufficient(format!(
                "no days in months {months:?}"
            )));
        }
        let selected = self.data.select(Axis(0), &idxs);
        Ok(selected
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array2::from_elem(self.grid.shape(), f64::NAN)))
    }

    /// Pentad climatology at every grid point.
    pub fn pentad_climatology(&self, aggregation: Aggregation, leap: LeapDay) -> Result<PentadField> {
        let TimeAxis::Daily(_) = self.time else {
            return Err(IndexError::MissingCalendar("pentad climatology"));
        };
        let (n_lat, n_lon) = self.grid.shape();
        let mut data = Array3::from_elem((PENTADS_PER_YEAR, n_lat, n_lon), f64::NAN);
        for i_lat in 0..n_lat {
            for i_lon in 0..n_lon {
                let series = self.point_series(i_lat, i_lon)?;
                let clim = climatology::daily_pentad_climatology(&series, aggregation, leap)?;
                data.slice_mut(s![.., i_lat, i_lon])
                    .assign(&ArrayView1::from(clim.as_slice()));
            }
        }
        Ok(PentadField {
            grid: self.grid.clone(),
            data,
        })
    }
}

/// A `(pentad, lat, lon)` field, usually a 73-pentad climatology.
#[derive(Debug, Clone, PartialEq)]
pub struct PentadField {
    pub grid: Grid,
    pub data: Array3<f64>,
}

impl PentadField {
    pub fn new(grid: Grid, data: Array3<f64>) -> Result<Self> {
        let (_, d_lat, d_lon) = data.dim();
        if (d_lat, d_lon) != grid.shape() {
            return Err(IndexError::mismatch(
                "pentad field grid",
                &[grid.lat.len(), grid.lon.len()],
                &[d_lat, d_lon],
            ));
        }
        Ok(Self { grid, data })
    }

    pub fn n_pentads(&self) -> usize {
        self.data.len_of(Axis(0))
    }
}
