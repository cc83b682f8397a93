//! Harmonic smoothing of periodic series.

use num_complex::Complex64;
use std::f64::consts::PI;

/// Keep the mean and the lowest `n_harmonics` Fourier harmonics of `vals`.
///
/// Bins `n_harmonics..len - n_harmonics` of the discrete Fourier transform
/// are zeroed and the real part of the inverse transform returned. Bin
/// `len - n_harmonics` survives while its conjugate does not, so harmonic
/// `n_harmonics` contributes at half amplitude. Series no longer than
/// `2 * n_harmonics` are returned unchanged. Any NaN poisons the output.
pub fn harmonic_smooth(vals: &[f64], n_harmonics: usize) -> Vec<f64> {
    let n_vals = vals.len();
    if n_vals <= 2 * n_harmonics {
        return vals.to_vec();
    }
    if vals.iter().any(|val| val.is_nan()) {
        return vec![f64::NAN; n_vals];
    }

    let kept: Vec<usize> = (0..n_harmonics)
        .chain(n_vals - n_harmonics..n_vals)
        .collect();

    let omega = 2.0 * PI / n_vals as f64;
    let coeffs: Vec<(usize, Complex64)> = kept
        .iter()
        .map(|&k| {
            let coeff = vals
                .iter()
                .enumerate()
                .map(|(n, &val)| val * Complex64::from_polar(1.0, -omega * (k * n % n_vals) as f64))
                .sum::<Complex64>();
            (k, coeff)
        })
        .collect();

    (0..n_vals)
        .map(|n| {
            let sum: Complex64 = coeffs
                .iter()
                .map(|&(k, coeff)| coeff * Complex64::from_polar(1.0, omega * (k * n % n_vals) as f64))
                .sum();
            sum.re / n_vals as f64
        })
        .collect()
}
