//! Onset/withdrawal detection by threshold crossing.
//!
//! A pentad series is scanned once, front to back, against a reference. The
//! season opens at the first pentad of the first sustained run of
//! qualifying pentads and closes at the last pentad of the last sustained
//! run. Pentad numbers are 1-based and the withdrawal pentad is inclusive:
//! it is the last pentad that still qualifies.

use crate::error::{IndexError, Result};
use crate::grid::PentadField;
use ndarray::{Array2, s};
use serde::{Deserialize, Serialize};

/// When a pentad counts as "in season".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Condition {
    /// `value - reference >= margin`.
    Excess { margin: f64 },
    /// `value >= factor * reference`.
    Ratio { factor: f64 },
    /// `value >= threshold`; the reference is ignored.
    Above { threshold: f64 },
}

impl Condition {
    fn holds(&self, val: f64, reference: f64) -> bool {
        match *self {
            Condition::Excess { margin } => val - reference >= margin,
            Condition::Ratio { factor } => val >= factor * reference,
            Condition::Above { threshold } => val >= threshold,
        }
    }

    /// How far into the season a pentad is, for picking the peak.
    fn strength(&self, val: f64, reference: f64) -> f64 {
        match *self {
            Condition::Excess { .. } => val - reference,
            Condition::Ratio { .. } => val / reference,
            Condition::Above { .. } => val,
        }
    }
}

/// What each pentad is compared against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reference<'a> {
    Scalar(f64),
    /// One reference value per pentad.
    Curve(&'a [f64]),
}

impl Reference<'_> {
    fn at(&self, i_pentad: usize) -> f64 {
        match self {
            Reference::Scalar(val) => *val,
            Reference::Curve(curve) => curve[i_pentad],
        }
    }
}

/// Scan parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detector {
    pub condition: Condition,
    /// Consecutive qualifying pentads needed to open (or extend) a season.
    pub sustain: usize,
}

/// A detected monsoon season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Season {
    /// First pentad of the season (1-based).
    pub onset: usize,
    /// Last pentad of the season (1-based, inclusive).
    pub withdrawal: usize,
    /// Qualifying pentad of greatest strength.
    pub peak: usize,
}

impl Season {
    pub fn duration(&self) -> usize {
        self.withdrawal - self.onset
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ScanState {
    SearchingOnset { run_start: usize, run_len: usize },
    InSeason { onset: usize, last: usize },
    SearchingWithdrawal { onset: usize, last: usize, run_len: usize },
    Done { season: Option<(usize, usize)> },
}

impl ScanState {
    fn step(self, i_pentad: usize, qualifies: bool, sustain: usize) -> Self {
        match self {
            ScanState::SearchingOnset { run_start, run_len } => {
                if !qualifies {
                    return ScanState::SearchingOnset {
                        run_start: i_pentad + 1,
                        run_len: 0,
                    };
                }
                let run_len = run_len + 1;
                if run_len >= sustain {
                    ScanState::InSeason {
                        onset: run_start,
                        last: i_pentad,
                    }
                } else {
                    ScanState::SearchingOnset { run_start, run_len }
                }
            }
            ScanState::InSeason { onset, last } => {
                if qualifies {
                    ScanState::InSeason {
                        onset,
                        last: i_pentad,
                    }
                } else {
                    ScanState::SearchingWithdrawal {
                        onset,
                        last,
                        run_len: 0,
                    }
                }
            }
            ScanState::SearchingWithdrawal {
                onset,
                last,
                run_len,
            } => {
                if !qualifies {
                    return ScanState::SearchingWithdrawal {
                        onset,
                        last,
                        run_len: 0,
                    };
                }
                let run_len = run_len + 1;
                if run_len >= sustain {
                    ScanState::InSeason {
                        onset,
                        last: i_pentad,
                    }
                } else {
                    ScanState::SearchingWithdrawal {
                        onset,
                        last,
                        run_len,
                    }
                }
            }
            done @ ScanState::Done { .. } => done,
        }
    }

    fn finish(self) -> Self {
        match self {
            ScanState::SearchingOnset { .. } => ScanState::Done { season: None },
            ScanState::InSeason { onset, last }
            | ScanState::SearchingWithdrawal { onset, last, .. } => ScanState::Done {
                season: Some((onset, last)),
            },
            done @ ScanState::Done { .. } => done,
        }
    }
}

impl Detector {
    pub fn new(condition: Condition, sustain: usize) -> Self {
        Self {
            condition,
            sustain: sustain.max(1),
        }
    }

    /// Scan `vals` against `reference`.
    ///
    /// Returns `Ok(None)` when no sustained run qualifies. NaN pentads never
    /// qualify.
    pub fn detect(&self, vals: &[f64], reference: Reference) -> Result<Option<Season>> {
        if vals.is_empty() {
            return Err(IndexError::insufficient("empty pentad series"));
        }
        if let Reference::Curve(curve) = reference {
            if curve.len() != vals.len() {
                return Err(IndexError::mismatch(
                    "reference curve",
                    &[vals.len()],
                    &[curve.len()],
                ));
            }
        }

        let qualifies: Vec<bool> = vals
            .iter()
            .enumerate()
            .map(|(i, &val)| self.condition.holds(val, reference.at(i)))
            .collect();

        let mut state = ScanState::SearchingOnset {
            run_start: 0,
            run_len: 0,
        };
        for (i_pentad, &q) in qualifies.iter().enumerate() {
            state = state.step(i_pentad, q, self.sustain);
        }
        let season = match state.finish() {
            ScanState::Done { season } => season,
            _ => None,
        };
        let Some((onset, withdrawal)) = season else {
            return Ok(None);
        };

        let mut peak = onset;
        let mut peak_strength = f64::NEG_INFINITY;
        for i_pentad in onset..=withdrawal {
            if !qualifies[i_pentad] {
                continue;
            }
            let strength = self.condition.strength(vals[i_pentad], reference.at(i_pentad));
            if strength > peak_strength {
                peak_strength = strength;
                peak = i_pentad;
            }
        }

        Ok(Some(Season {
            onset: onset + 1,
            withdrawal: withdrawal + 1,
            peak: peak + 1,
        }))
    }

    /// Scan every grid point of a pentad field.
    ///
    /// `reference` gives one scalar per grid point, or `None` when the
    /// condition needs no reference.
    pub fn detect_field(
        &self,
        field: &PentadField,
        reference: Option<&Array2<f64>>,
    ) -> Result<SeasonMap> {
        let (n_lat, n_lon) = field.grid.shape();
        if let Some(reference) = reference {
            if reference.dim() != (n_lat, n_lon) {
                let (r_lat, r_lon) = reference.dim();
                return Err(IndexError::mismatch(
                    "reference map",
                    &[n_lat, n_lon],
                    &[r_lat, r_lon],
                ));
            }
        }

        let n_pentads = field.n_pentads();
        self.scan_field(field, |i_lat, i_lon| {
            vec![reference.map_or(0.0, |r| r[[i_lat, i_lon]]); n_pentads]
        })
    }

    /// Scan every grid point against its own per-pentad reference curve.
    pub fn detect_field_against(
        &self,
        field: &PentadField,
        reference: &PentadField,
    ) -> Result<SeasonMap> {
        if reference.data.dim() != field.data.dim() {
            return Err(IndexError::mismatch(
                "reference field",
                field.data.shape(),
                reference.data.shape(),
            ));
        }
        self.scan_field(field, |i_lat, i_lon| {
            reference.data.slice(s![.., i_lat, i_lon]).to_vec()
        })
    }

    fn scan_field(
        &self,
        field: &PentadField,
        curve_at: impl Fn(usize, usize) -> Vec<f64>,
    ) -> Result<SeasonMap> {
        let mut seasons = Array2::from_elem(field.grid.shape(), None);
        for ((i_lat, i_lon), slot) in seasons.indexed_iter_mut() {
            let lane = field.data.slice(s![.., i_lat, i_lon]).to_vec();
            let curve = curve_at(i_lat, i_lon);
            *slot = self.detect(&lane, Reference::Curve(&curve))?;
        }
        log::debug!(
            "detected seasons at {} of {} grid points",
            seasons.iter().filter(|s| s.is_some()).count(),
            seasons.len()
        );
        Ok(SeasonMap { seasons })
    }
}

/// Seasons detected at every grid point.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonMap {
    pub seasons: Array2<Option<Season>>,
}

impl SeasonMap {
    fn map_f64(&self, f: impl Fn(&Season) -> f64) -> Array2<f64> {
        self.seasons.map(|season| season.as_ref().map_or(f64::NAN, &f))
    }

    /// Onset pentads, NaN where no season was found.
    pub fn onset(&self) -> Array2<f64> {
        self.map_f64(|s| s.onset as f64)
    }

    pub fn withdrawal(&self) -> Array2<f64> {
        self.map_f64(|s| s.withdrawal as f64)
    }

    pub fn peak(&self) -> Array2<f64> {
        self.map_f64(|s| s.peak as f64)
    }

    pub fn duration(&self) -> Array2<f64> {
        self.map_f64(|s| s.duration() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use ndarray::Array3;

    fn excess(margin: f64, sustain: usize) -> Detector {
        Detector::new(Condition::Excess { margin }, sustain)
    }

    #[test]
    fn single_block_season() {
        let mut vals = vec![0.0; 73];
        for val in &mut vals[29..40] {
            *val = 8.0;
        }
        vals[34] = 9.0;
        let season = excess(5.0, 1)
            .detect(&vals, Reference::Scalar(1.0))
            .unwrap()
            .unwrap();
        assert_eq!(season.onset, 30);
        assert_eq!(season.withdrawal, 40);
        assert_eq!(season.peak, 35);
        assert_eq!(season.duration(), 10);
    }

    #[test]
    fn no_qualifying_pentad() {
        let vals = vec![1.0; 73];
        assert_eq!(excess(5.0, 1).detect(&vals, Reference::Scalar(1.0)), Ok(None));
    }

    #[test]
    fn sustain_skips_short_bursts() {
        let mut vals = vec![0.0; 30];
        vals[3] = 10.0; // single-pentad burst
        for val in &mut vals[10..14] {
            *val = 10.0;
        }
        vals[20] = 10.0; // late burst after the season
        let season = excess(5.0, 3)
            .detect(&vals, Reference::Scalar(0.0))
            .unwrap()
            .unwrap();
        assert_eq!(season.onset, 11);
        assert_eq!(season.withdrawal, 14);
    }

    #[test]
    fn break_then_revival_extends_withdrawal() {
        let mut vals = vec![0.0; 40];
        let (head, tail) = vals.split_at_mut(10);
        for val in head[5..10].iter_mut().chain(tail[5..8].iter_mut()) {
            *val = 10.0;
        }
        let season = excess(5.0, 2)
            .detect(&vals, Reference::Scalar(0.0))
            .unwrap()
            .unwrap();
        assert_eq!(season.onset, 6);
        assert_eq!(season.withdrawal, 18);
    }

    #[test]
    fn ratio_against_curve() {
        let curve = vec![2.0; 10];
        let mut vals = vec![2.0; 10];
        vals[4] = 4.0;
        vals[5] = 4.0;
        let season = Detector::new(Condition::Ratio { factor: 2.0 }, 1)
            .detect(&vals, Reference::Curve(&curve))
            .unwrap()
            .unwrap();
        assert_eq!((season.onset, season.withdrawal), (5, 6));
    }

    #[test]
    fn curve_length_mismatch() {
        let err = excess(1.0, 1)
            .detect(&[1.0, 2.0], Reference::Curve(&[1.0]))
            .unwrap_err();
        assert!(matches!(err, IndexError::ShapeMismatch { .. }));
    }

    #[test]
    fn empty_series_is_insufficient() {
        let err = excess(1.0, 1).detect(&[], Reference::Scalar(0.0)).unwrap_err();
        assert!(matches!(err, IndexError::InsufficientData(_)));
    }

    #[test]
    fn nan_never_qualifies() {
        let vals = [f64::NAN, 10.0, f64::NAN];
        let season = Detector::new(Condition::Above { threshold: 5.0 }, 1)
            .detect(&vals, Reference::Scalar(0.0))
            .unwrap()
            .unwrap();
        assert_eq!((season.onset, season.withdrawal), (2, 2));
    }

    #[test]
    fn field_scan() {
        let grid = Grid::new(vec![0.0, 10.0], vec![100.0]);
        let data = Array3::from_shape_fn((20, 2, 1), |(p, j, _)| {
            if j == 0 && (5..9).contains(&p) { 1.0 } else { 0.0 }
        });
        let field = PentadField::new(grid, data).unwrap();
        let map = Detector::new(Condition::Above { threshold: 0.5 }, 1)
            .detect_field(&field, None)
            .unwrap();
        assert_eq!(map.onset()[[0, 0]], 6.0);
        assert_eq!(map.duration()[[0, 0]], 3.0);
        assert!(map.onset()[[1, 0]].is_nan());
        assert_eq!(map.seasons.dim(), (2, 1));
    }

    #[test]
    fn field_scan_against_curves() {
        let grid = Grid::new(vec![0.0], vec![100.0, 110.0]);
        let data = Array3::from_elem((10, 1, 2), 6.0);
        let field = PentadField::new(grid.clone(), data).unwrap();
        // Second point's reference dips below 1 in pentads 4-6.
        let reference = Array3::from_shape_fn((10, 1, 2), |(p, _, k)| {
            if k == 1 && (3..6).contains(&p) { 0.5 } else { 3.0 }
        });
        let reference = PentadField::new(grid, reference).unwrap();
        let map = excess(5.0, 1).detect_field_against(&field, &reference).unwrap();
        assert_eq!(map.seasons[[0, 0]], None);
        let season = map.seasons[[0, 1]].unwrap();
        assert_eq!((season.onset, season.withdrawal), (4, 6));

        let short = PentadField::new(field.grid.clone(), Array3::zeros((9, 1, 2))).unwrap();
        let err = excess(5.0, 1).detect_field_against(&field, &short).unwrap_err();
        assert!(matches!(err, IndexError::ShapeMismatch { .. }));
    }
}
