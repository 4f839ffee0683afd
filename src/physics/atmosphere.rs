use crate::config::{AtmosphereConstants, PhysicalConfig};
use crate::constants::{LOWER_STRATOSPHERE_TOP, TROPOPAUSE_ALTITUDE};

/// Layers of the piecewise atmosphere, selected by absolute altitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtmosphericLayer {
    /// Linear temperature lapse, up to and including 11 km.
    Troposphere,
    /// Isothermal, above 11 km up to and including 20 km.
    LowerStratosphere,
    /// Linear temperature lapse above 20 km.
    UpperStratosphere,
}

impl AtmosphericLayer {
    /// First layer whose upper bound contains `absolute_altitude`.
    pub fn at(absolute_altitude: f64) -> Self {
        if absolute_altitude <= TROPOPAUSE_ALTITUDE {
            AtmosphericLayer::Troposphere
        } else if absolute_altitude <= LOWER_STRATOSPHERE_TOP {
            AtmosphericLayer::LowerStratosphere
        } else {
            AtmosphericLayer::UpperStratosphere
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AirConditions {
    pub temperature: f64, // K
    pub pressure: f64,    // Pa
    pub density: f64,     // kg/m³
}

/// Air density as a function of the height above the ground reference.
///
/// The ground reference sits `ground_altitude` metres above sea level, so the
/// layer boundaries (defined at absolute altitude) are crossed at
/// `y = boundary - ground_altitude`. Reference states at the boundaries are
/// recomputed on every call from the same constants, which keeps the result
/// a pure function of `y`.
#[derive(Debug, Clone, Copy)]
pub struct AtmosphereModel<'a> {
    constants: &'a AtmosphereConstants,
    gravity: f64,
}

impl<'a> AtmosphereModel<'a> {
    pub fn new(config: &'a PhysicalConfig) -> Self {
        Self {
            constants: &config.atmosphere,
            gravity: config.gravity,
        }
    }

    pub fn absolute_altitude(&self, y: f64) -> f64 {
        y + self.constants.ground_altitude
    }

    pub fn layer(&self, y: f64) -> AtmosphericLayer {
        AtmosphericLayer::at(self.absolute_altitude(y))
    }

    pub fn density(&self, y: f64) -> f64 {
        self.conditions(y).density
    }

    pub fn conditions(&self, y: f64) -> AirConditions {
        self.conditions_in(self.layer(y), y)
    }

    /// Evaluates the formula of `layer` at `y`, whether or not `y` lies in it.
    pub fn conditions_in(&self, layer: AtmosphericLayer, y: f64) -> AirConditions {
        let h = self.absolute_altitude(y);
        let (temperature, pressure) = match layer {
            AtmosphericLayer::Troposphere => self.troposphere(y),
            AtmosphericLayer::LowerStratosphere => self.lower_stratosphere(h),
            AtmosphericLayer::UpperStratosphere => self.upper_stratosphere(h),
        };

        let c = self.constants;
        AirConditions {
            temperature,
            pressure,
            density: pressure * c.molar_mass / (c.gas_constant * temperature),
        }
    }

    /// Barometric exponent -g·M/(R·L) for a lapse rate L.
    fn exponent(&self, lapse_rate: f64) -> f64 {
        let c = self.constants;
        -self.gravity * c.molar_mass / (c.gas_constant * lapse_rate)
    }

    fn troposphere(&self, y: f64) -> (f64, f64) {
        let c = self.constants;
        let temperature = c.ground_temperature + c.troposphere_lapse_rate * y;
        let pressure = c.ground_pressure
            * (temperature / c.ground_temperature).powf(self.exponent(c.troposphere_lapse_rate));
        (temperature, pressure)
    }

    fn lower_stratosphere(&self, h: f64) -> (f64, f64) {
        let c = self.constants;
        let (t_trop, p_trop) = self.troposphere(TROPOPAUSE_ALTITUDE - c.ground_altitude);
        let pressure = p_trop
            * (-self.gravity * c.molar_mass * (h - TROPOPAUSE_ALTITUDE)
                / (c.gas_constant * t_trop))
                .exp();
        (t_trop, pressure)
    }

    fn upper_stratosphere(&self, h: f64) -> (f64, f64) {
        let c = self.constants;
        let (t_base, p_base) = self.lower_stratosphere(LOWER_STRATOSPHERE_TOP);
        let temperature = t_base + c.stratosphere_lapse_rate * (h - LOWER_STRATOSPHERE_TOP);
        let pressure = p_base
            * (temperature / t_base).powf(self.exponent(c.stratosphere_lapse_rate));
        (temperature, pressure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use test_case::test_case;

    #[test_case(0.0, AtmosphericLayer::Troposphere; "ground")]
    #[test_case(11_000.0, AtmosphericLayer::Troposphere; "tropopause belongs to troposphere")]
    #[test_case(11_000.1, AtmosphericLayer::LowerStratosphere; "just above tropopause")]
    #[test_case(20_000.0, AtmosphericLayer::LowerStratosphere; "top of lower stratosphere")]
    #[test_case(25_000.0, AtmosphericLayer::UpperStratosphere; "upper stratosphere")]
    fn layer_selection(absolute_altitude: f64, expected: AtmosphericLayer) {
        assert_eq!(AtmosphericLayer::at(absolute_altitude), expected);
    }

    #[test]
    fn ground_conditions_match_reference_state() {
        let config = PhysicalConfig::default();
        let atmosphere = AtmosphereModel::new(&config);
        let air = atmosphere.conditions(0.0);

        assert_abs_diff_eq!(air.temperature, 295.15, epsilon = 1e-12);
        assert_abs_diff_eq!(air.pressure, 92_000.0, epsilon = 1e-9);
        assert_abs_diff_eq!(air.density, 1.08586, epsilon = 1e-4);
    }

    #[test]
    fn stratosphere_is_isothermal_at_tropopause_temperature() {
        let config = PhysicalConfig::default();
        let atmosphere = AtmosphereModel::new(&config);
        // 295.15 - 0.0065 * (11000 - 856)
        let expected = 229.214;

        for y in [10_200.0, 12_000.0, 15_000.0, 19_144.0] {
            assert_eq!(atmosphere.layer(y), AtmosphericLayer::LowerStratosphere);
            assert_abs_diff_eq!(atmosphere.conditions(y).temperature, expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn upper_stratosphere_warms_with_altitude() {
        let config = PhysicalConfig::default();
        let atmosphere = AtmosphereModel::new(&config);
        let y = 25_000.0 - config.atmosphere.ground_altitude;

        assert_abs_diff_eq!(atmosphere.conditions(y).temperature, 234.214, epsilon = 1e-9);
    }

    #[test_case(TROPOPAUSE_ALTITUDE, AtmosphericLayer::Troposphere, AtmosphericLayer::LowerStratosphere; "tropopause")]
    #[test_case(LOWER_STRATOSPHERE_TOP, AtmosphericLayer::LowerStratosphere, AtmosphericLayer::UpperStratosphere; "twenty km")]
    fn density_is_continuous_across_layers(
        boundary: f64,
        below: AtmosphericLayer,
        above: AtmosphericLayer,
    ) {
        let config = PhysicalConfig::default();
        let atmosphere = AtmosphereModel::new(&config);
        let y = boundary - config.atmosphere.ground_altitude;

        let lower = atmosphere.conditions_in(below, y);
        let upper = atmosphere.conditions_in(above, y);

        assert_relative_eq!(lower.density, upper.density, max_relative = 1e-12);
        assert_relative_eq!(lower.pressure, upper.pressure, max_relative = 1e-12);
        assert_relative_eq!(lower.temperature, upper.temperature, max_relative = 1e-12);
    }

    #[test]
    fn density_decreases_through_troposphere() {
        let config = PhysicalConfig::default();
        let atmosphere = AtmosphereModel::new(&config);

        let mut previous = atmosphere.density(0.0);
        for i in 1..=100 {
            let y = i as f64 * 100.0;
            let rho = atmosphere.density(y);
            assert!(rho <= previous, "density rose at y = {y}: {rho} > {previous}");
            previous = rho;
        }
    }

    #[test]
    fn density_is_repeatable() {
        let config = PhysicalConfig::default();
        let atmosphere = AtmosphereModel::new(&config);

        for y in [0.0, 5_000.0, 15_000.0, 22_000.0] {
            assert_eq!(atmosphere.density(y).to_bits(), atmosphere.density(y).to_bits());
        }
    }
}
