//! Physical and numerical constants shared by the diagnostic readers.
//!
//! Physical values are CGS, matching the units the simulation writes its
//! histogram temperatures in.

/// Boltzmann constant in erg/K.
pub const BOLTZMANN_ERG_PER_K: f64 = 1.380_649e-16;
/// One electron volt in erg.
pub const ELECTRON_VOLT_ERG: f64 = 1.602_176_634e-12;

/// Value substituted for a process ratio whose scattering count is zero.
pub const RATIO_FLOOR: f64 = 1.0e-10;

/// Initial running maximum when scaling the expected energy curve.
pub const EXPECTED_CURVE_YMAX_SEED: f64 = 1.0e-20;

/// Thermal energy `k_B T` expressed in eV.
pub fn thermal_energy_ev(temperature_k: f64) -> f64 {
    BOLTZMANN_ERG_PER_K * temperature_k / ELECTRON_VOLT_ERG
}

#[cfg(test)]
mod tests {
    use super::{BOLTZMANN_ERG_PER_K, ELECTRON_VOLT_ERG, RATIO_FLOOR, thermal_energy_ev};

    #[test]
    fn boltzmann_over_ev_matches_known_ratio() {
        let ratio = BOLTZMANN_ERG_PER_K / ELECTRON_VOLT_ERG;
        assert!((ratio - 8.617_333e-5).abs() < 1.0e-10);
    }

    #[test]
    fn thermal_energy_scales_linearly() {
        let one = thermal_energy_ev(1.0e4);
        let two = thermal_energy_ev(2.0e4);
        assert!((two - 2.0 * one).abs() <= 1.0e-15);
        assert!((one - 0.861_733).abs() < 1.0e-5);
    }

    #[test]
    fn floor_is_positive_and_tiny() {
        assert!(RATIO_FLOOR > 0.0);
        assert!(RATIO_FLOOR < 1.0e-6);
    }
}
