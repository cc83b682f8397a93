/// Running mean over a stream of values.
///
/// Uses Welford's update, so a single NaN poisons the mean.
#[derive(Debug, Clone, Default)]
pub struct Accumulator {
    n_vals: usize,
    mean: f64,
}

impl Accumulator {
    pub fn new() -> Self {
        Self {
            n_vals: 0,
            mean: 0.0,
        }
    }

    pub fn add(&mut self, val: f64) {
        self.n_vals += 1;

        let diff = val - self.mean;
        self.mean += diff / self.n_vals as f64;
    }

    pub fn count(&self) -> usize {
        self.n_vals
    }

    /// Mean of the values seen so far, or NaN if none were added.
    pub fn mean(&self) -> f64 {
        if self.n_vals == 0 {
            f64::NAN
        } else {
            self.mean
        }
    }
}

/// Arithmetic mean; NaN for an empty slice or if any value is NaN.
pub fn compute_mean(vals: &[f64]) -> f64 {
    if vals.is_empty() {
        return f64::NAN;
    }
    vals.iter().sum::<f64>() / vals.len() as f64
}

/// Mean of the finite values only; NaN if there are none.
pub fn compute_nan_mean(vals: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, n_vals) = vals
        .into_iter()
        .filter(|val| !val.is_nan())
        .fold((0.0, 0usize), |(sum, n), val| (sum + val, n + 1));
    if n_vals == 0 {
        f64::NAN
    } else {
        sum / n_vals as f64
    }
}

/// Derivative of `vals` sampled at `coords`.
///
/// Second-order central differences in the interior and first-order
/// one-sided differences at both ends. Coordinates need not be evenly
/// spaced. Fewer than two samples give NaN.
pub fn gradient(vals: &[f64], coords: &[f64]) -> Vec<f64> {
    let n_vals = vals.len();
    if n_vals < 2 || coords.len() != n_vals {
        return vec![f64::NAN; n_vals];
    }

    let mut grad = Vec::with_capacity(n_vals);
    grad.push((vals[1] - vals[0]) / (coords[1] - coords[0]));
    for i in 1..n_vals - 1 {
        let h_lo = coords[i] - coords[i - 1];
        let h_hi = coords[i + 1] - coords[i];
        let val = (h_lo.powi(2) * vals[i + 1] - h_hi.powi(2) * vals[i - 1]
            + (h_hi.powi(2) - h_lo.powi(2)) * vals[i])
            / (h_lo * h_hi * (h_lo + h_hi));
        grad.push(val);
    }
    grad.push((vals[n_vals - 1] - vals[n_vals - 2]) / (coords[n_vals - 1] - coords[n_vals - 2]));
    grad
}

/// Derivative of evenly spaced samples with unit spacing.
pub fn unit_gradient(vals: &[f64]) -> Vec<f64> {
    let coords: Vec<f64> = (0..vals.len()).map(|i| i as f64).collect();
    gradient(vals, &coords)
}
