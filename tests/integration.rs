use chrono::NaiveDate;
use monsoon_indices::{
    Aggregation, Catalog, DailySeries, Field, Grid, IndexError, LevelField, PressureUnits,
    TimeAxis, WangLinHoParams, Weighting, kitoh_uchiyama_series, li_zhang_point, wang_fan,
    wang_linho_daily, wang_linho_series,
};
use ndarray::{Array3, Array4};
use rand::prelude::*;
use rand_chacha::ChaCha12Rng;
use rand_distr::Gamma;
use std::f64::consts::PI;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn jan_first() -> NaiveDate {
    NaiveDate::from_ymd_opt(2001, 1, 1).unwrap()
}

/// Two years of daily rain: `base` mm/day, doubled in pentads 30-40.
fn wet_season_record(base: f64) -> Vec<f64> {
    (0..730)
        .map(|d| {
            let i_pentad = (d % 365) / 5;
            if (29..40).contains(&i_pentad) { 2.0 * base } else { base }
        })
        .collect()
}

/// Wang & LinHo without harmonic smoothing, so a square pulse stays square.
///
/// The exact pentads 30-40 below depend on this. With the catalog's 12
/// harmonics the edges of the pulse are rounded off and the season shrinks
/// to pentads 31-39.
fn unsmoothed() -> WangLinHoParams {
    let catalog = Catalog::builtin().unwrap();
    WangLinHoParams {
        harmonics: 73,
        ..catalog.wang_linho_2002
    }
}

/// Synthetic daily rain with a summer peak and gamma-distributed noise.
fn noisy_record(seed: u64) -> DailySeries {
    let mut rng = ChaCha12Rng::seed_from_u64(seed);
    let noise = Gamma::new(2.0, 0.5).unwrap();
    let vals = (0..3 * 365)
        .map(|d| {
            let phase = 2.0 * PI * ((d % 365) as f64 - 200.0) / 365.0;
            let cycle = 7.0 + 6.0 * phase.cos();
            cycle * noise.sample(&mut rng)
        })
        .collect();
    DailySeries::new(jan_first(), vals)
}

#[test]
fn constant_rain_at_january_mean_has_no_onset() {
    init_logger();
    let catalog = Catalog::builtin().unwrap();
    let series = DailySeries::new(jan_first(), vec![6.0; 730]);
    let season = wang_linho_series(&series, 25.0, &catalog.wang_linho_2002).unwrap();
    assert_eq!(season, None);
}

#[test]
fn doubled_rain_gives_pentads_30_to_40() {
    init_logger();
    let series = DailySeries::new(jan_first(), wet_season_record(6.0));
    let season = wang_linho_series(&series, 25.0, &unsmoothed())
        .unwrap()
        .unwrap();
    assert_eq!(season.onset, 30);
    assert_eq!(season.withdrawal, 40);
    assert_eq!(season.duration(), 10);
}

#[test]
fn summed_pentads_match_mean_pentads() {
    init_logger();
    let constant = DailySeries::new(jan_first(), vec![6.0; 730]);
    let doubled = DailySeries::new(jan_first(), wet_season_record(6.0));
    let summed = WangLinHoParams {
        aggregation: Aggregation::Sum,
        ..unsmoothed()
    };
    assert_eq!(wang_linho_series(&constant, 25.0, &summed).unwrap(), None);
    assert_eq!(
        wang_linho_series(&doubled, 25.0, &summed).unwrap(),
        wang_linho_series(&doubled, 25.0, &unsmoothed()).unwrap()
    );
}

#[test]
fn gridded_wang_linho_uses_hemisphere_reference() {
    init_logger();
    let record = wet_season_record(6.0);
    let grid = Grid::new(vec![-15.0, 15.0], vec![100.0, 110.0]);
    let data = Array3::from_shape_fn((730, 2, 2), |(d, _, _)| record[d]);
    let field = Field::new(TimeAxis::Daily(jan_first()), grid, data).unwrap();

    let map = wang_linho_daily(&field, &unsmoothed()).unwrap();
    let onset = map.onset();
    // July is partly inside the wet pentads, so the southern reference is
    // too high for a 5 mm/day excess.
    assert!(onset.row(0).iter().all(|p| p.is_nan()));
    assert!(onset.row(1).iter().all(|&p| p == 30.0));
    assert!(map.duration().row(1).iter().all(|&d| d == 10.0));
}

#[test]
fn short_record_is_insufficient() {
    init_logger();
    let catalog = Catalog::builtin().unwrap();
    let series = DailySeries::new(jan_first(), vec![3.0; 200]);

    let err = wang_linho_series(&series, 25.0, &catalog.wang_linho_2002).unwrap_err();
    assert!(matches!(err, IndexError::InsufficientData(_)));

    let err = kitoh_uchiyama_series(&series, &catalog.kitoh_uchiyama_2006).unwrap_err();
    assert!(matches!(err, IndexError::InsufficientData(_)));

    let err = li_zhang_point(&series, &series, &catalog.li_zhang_2009).unwrap_err();
    assert!(matches!(err, IndexError::InsufficientData(_)));
}

#[test]
fn identical_inputs_give_identical_outputs() {
    init_logger();
    let catalog = Catalog::builtin().unwrap();
    let first = noisy_record(7);
    let second = noisy_record(7);
    assert_eq!(first, second);

    let params = &catalog.wang_linho_2002;
    assert_eq!(
        wang_linho_series(&first, 25.0, params).unwrap(),
        wang_linho_series(&second, 25.0, params).unwrap()
    );
    let params = &catalog.kitoh_uchiyama_2006;
    assert_eq!(
        kitoh_uchiyama_series(&first, params).unwrap(),
        kitoh_uchiyama_series(&second, params).unwrap()
    );
}

#[test]
fn onset_never_follows_withdrawal() {
    init_logger();
    let catalog = Catalog::builtin().unwrap();
    for seed in 0..20 {
        let series = noisy_record(seed);
        let seasons = [
            wang_linho_series(&series, 25.0, &catalog.wang_linho_2002).unwrap(),
            kitoh_uchiyama_series(&series, &catalog.kitoh_uchiyama_2006).unwrap(),
        ];
        for season in seasons.into_iter().flatten() {
            assert!(season.onset <= season.peak, "seed {seed}: {season:?}");
            assert!(season.peak <= season.withdrawal, "seed {seed}: {season:?}");
        }
    }
}

#[test]
fn summer_peak_is_detected_through_noise() {
    init_logger();
    let catalog = Catalog::builtin().unwrap();
    let season = kitoh_uchiyama_series(&noisy_record(42), &catalog.kitoh_uchiyama_2006)
        .unwrap()
        .unwrap();
    // The underlying cycle peaks on day 200, in pentad 41.
    assert!(season.onset < 41 && 41 < season.withdrawal, "{season:?}");
}

#[test]
fn shear_index_from_pressure_levels() {
    init_logger();
    let catalog = Catalog::builtin().unwrap();
    let params = &catalog.wang_fan_1999;

    let lat: Vec<f64> = (0..=8).map(|j| 5.0 * j as f64).collect();
    let lon: Vec<f64> = (0..=14).map(|k| 80.0 + 5.0 * k as f64).collect();
    let grid = Grid::new(lat.clone(), lon);
    // 850 hPa: westerlies south of 15N, easterlies north of it. Other
    // levels are calm.
    let data = Array4::from_shape_fn((4, 3, 9, 15), |(t, l, j, _)| match l {
        1 if lat[j] <= 15.0 => 4.0 + t as f64,
        1 => -3.0,
        _ => 0.0,
    });
    let u = LevelField::new(
        TimeAxis::Steps,
        grid,
        vec![1000.0, 850.0, 200.0],
        "hPa".parse::<PressureUnits>().unwrap(),
        data,
    )
    .unwrap();

    let u850 = u.select_level(params.level_hpa).unwrap();
    let index = wang_fan(&u850, params, Weighting::CosLat).unwrap();
    assert_eq!(index.len(), 4);
    for (t, val) in index.iter().enumerate() {
        assert!((val - (7.0 + t as f64)).abs() < 1e-12);
    }
}
