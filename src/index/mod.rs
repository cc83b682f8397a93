//! The monsoon indices.

mod gao_2001;
mod kitoh_uchiyama;
mod li_2018;
mod li_zhang;
mod wang_2004;
mod wang_fan;
mod wang_linho;
mod yim;

pub use gao_2001::{GaoParams, gao_2001, theta_e_field};
pub use kitoh_uchiyama::{
    KitohUchiyamaParams, kitoh_uchiyama, kitoh_uchiyama_daily, kitoh_uchiyama_series, normalize,
    npi_field,
};
pub use li_2018::{LiMeiyuParams, MeiyuFront, li_2018};
pub use li_zhang::{
    LiZhangParams, MIN_SLOPE_WINDOW, RotationSeason, RotationSeasonMap, li_zhang, li_zhang_point,
};
pub use wang_2004::{ScsOnset, Wang2004Params, wang_2004};
pub use wang_fan::{WangFanParams, wang_fan};
pub use wang_linho::{
    WangLinHoParams, wang_linho, wang_linho_daily, wang_linho_reference, wang_linho_series,
};
pub use yim::{YimParams, YimVorticityRegion, yim_precip, yim_vorticity};

use crate::error::{IndexError, Result};
use crate::grid::{Field, PentadField, TimeAxis};
use crate::smooth::harmonic_smooth;
use ndarray::{ArrayView1, Axis};

/// 1-based pentad numbers of the time steps of a pentad-mean field.
///
/// Unlabelled steps are numbered from 1.
pub(crate) fn pentad_labels(field: &Field, what: &'static str) -> Result<Vec<usize>> {
    let first = match field.time {
        TimeAxis::Pentad(first) => first,
        TimeAxis::Steps => 1,
        TimeAxis::Daily(_) => return Err(IndexError::MissingCalendar(what)),
    };
    Ok((first..first + field.n_times()).collect())
}

/// Harmonic smoothing along the pentad axis at every grid point.
pub(crate) fn smooth_field(field: &PentadField, harmonics: usize) -> PentadField {
    let mut smoothed = field.clone();
    for mut lane in smoothed.data.lanes_mut(Axis(0)) {
        let vals = harmonic_smooth(&lane.to_vec(), harmonics);
        lane.assign(&ArrayView1::from(vals.as_slice()));
    }
    smoothed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use chrono::NaiveDate;
    use ndarray::Array3;

    #[test]
    fn labels_follow_time_axis() {
        let grid = Grid::new(vec![0.0], vec![0.0]);
        let data = Array3::zeros((3, 1, 1));
        let mut field = Field::new(TimeAxis::Pentad(20), grid, data).unwrap();
        assert_eq!(pentad_labels(&field, "test").unwrap(), vec![20, 21, 22]);

        field.time = TimeAxis::Steps;
        assert_eq!(pentad_labels(&field, "test").unwrap(), vec![1, 2, 3]);

        field.time = TimeAxis::Daily(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
        assert_eq!(
            pentad_labels(&field, "test"),
            Err(IndexError::MissingCalendar("test"))
        );
    }

    #[test]
    fn smoothing_keeps_lanes_apart() {
        let grid = Grid::new(vec![0.0, 10.0], vec![0.0]);
        let data = Array3::from_shape_fn((73, 2, 1), |(p, j, _)| {
            if j == 0 { 1.0 } else if p % 2 == 0 { 3.0 } else { -3.0 }
        });
        let field = PentadField::new(grid, data).unwrap();
        let smoothed = smooth_field(&field, 12);
        for p in 0..73 {
            assert!((smoothed.data[[p, 0, 0]] - 1.0).abs() < 1e-9);
            assert!(smoothed.data[[p, 1, 0]].abs() < 1.5);
        }
    }
}
