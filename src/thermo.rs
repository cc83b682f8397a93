//! Moist thermodynamics for the equivalent-potential-temperature indices.

/// Specific heat of dry air at constant pressure, J/kg/K.
pub const CP_AIR: f64 = 1004.6;
/// Latent heat of vaporization, J/kg.
pub const LATENT_HEAT: f64 = 2.507e6;
/// Gas constant of dry air, J/kg/K.
pub const R_DRY: f64 = 287.04;
/// Gas constant of water vapour, J/kg/K.
pub const R_VAPOUR: f64 = 461.50;
/// Freezing point, K.
pub const T_FREEZE: f64 = 273.16;
/// Heat capacity of liquid water at 0 C, J/kg/K.
pub const C_LIQUID: f64 = 4217.0;
/// Reference pressure, Pa.
pub const P_REF: f64 = 100_000.0;
/// Earth radius, m.
pub const EARTH_RADIUS: f64 = 6371.0e3;

/// Saturation vapour pressure (Pa) and saturation mixing ratio at `t` (K)
/// and pressure `p` (Pa).
pub fn saturation(t: f64, p: f64) -> (f64, f64) {
    let es = 610.78 * (-LATENT_HEAT / R_VAPOUR * (1.0 / t - 1.0 / T_FREEZE)).exp();
    let rs = 0.622 * es / p;
    (es, rs)
}

/// Equivalent and saturated equivalent potential temperature (K).
///
/// `t` in K, `q` specific humidity in kg/kg, `p` in Pa. All water is taken
/// to be vapour.
pub fn equivalent_potential_temperature(t: f64, q: f64, p: f64) -> (f64, f64) {
    let r = q / (1.0 - q);
    let denom = CP_AIR + r * C_LIQUID;

    let (_, rs) = saturation(t, p);
    let rh = r / rs;
    let denom_s = CP_AIR + rs * C_LIQUID;

    let theta_e = t
        * (P_REF / p).powf(R_DRY / denom)
        * rh.powf(-r * R_VAPOUR / denom)
        * (LATENT_HEAT * r / denom / t).exp();
    let theta_es = t * (P_REF / p).powf(R_DRY / denom_s) * (LATENT_HEAT * rs / denom_s / t).exp();
    (theta_e, theta_es)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn saturation_at_freezing() {
        let (es, rs) = saturation(T_FREEZE, P_REF);
        assert_relative_eq!(es, 610.78, epsilon = 1e-9);
        assert_relative_eq!(rs, 0.622 * 610.78 / P_REF, epsilon = 1e-12);
    }

    #[test]
    fn dry_air_is_potential_temperature() {
        let (theta_e, _) = equivalent_potential_temperature(290.0, 0.0, 85_000.0);
        let theta = 290.0 * (P_REF / 85_000.0).powf(R_DRY / CP_AIR);
        assert_relative_eq!(theta_e, theta, epsilon = 1e-9);
    }

    #[test]
    fn moisture_raises_theta_e() {
        let (dry, _) = equivalent_potential_temperature(295.0, 0.002, 85_000.0);
        let (moist, saturated) = equivalent_potential_temperature(295.0, 0.015, 85_000.0);
        assert!(moist > dry);
        assert!(saturated >= moist - 1e-9);
    }

    #[test]
    fn tropical_850_hpa_value_is_plausible() {
        let (theta_e, _) = equivalent_potential_temperature(293.0, 0.015, 85_000.0);
        assert!(theta_e > 330.0 && theta_e < 360.0);
    }
}
