use super::config_errors::{finite, non_negative, positive, ConfigError};
use crate::constants::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Drag coefficient and reference area of one aerodynamic configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragStage {
    pub drag_coefficient: f64,
    pub reference_area: f64, // m²
}

impl DragStage {
    pub const fn new(drag_coefficient: f64, reference_area: f64) -> Self {
        Self {
            drag_coefficient,
            reference_area,
        }
    }

    /// Drag coefficient-area product cd·A [m²].
    pub fn cda(&self) -> f64 {
        self.drag_coefficient * self.reference_area
    }

    fn validate(&self, cd_field: &'static str, area_field: &'static str) -> Result<(), ConfigError> {
        non_negative(cd_field, self.drag_coefficient)?;
        non_negative(area_field, self.reference_area)?;
        Ok(())
    }
}

/// Reference state of the ground level and the gas constants used by the
/// layered atmosphere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtmosphereConstants {
    pub gas_constant: f64,            // J/(mol·K)
    pub molar_mass: f64,              // kg/mol
    pub troposphere_lapse_rate: f64,  // K/m
    pub stratosphere_lapse_rate: f64, // K/m
    pub ground_temperature: f64,      // K
    pub ground_pressure: f64,         // Pa
    pub ground_altitude: f64,         // m above sea level
}

impl Default for AtmosphereConstants {
    fn default() -> Self {
        Self {
            gas_constant: GAS_CONSTANT,
            molar_mass: MOLAR_MASS_AIR,
            troposphere_lapse_rate: TROPOSPHERE_LAPSE_RATE,
            stratosphere_lapse_rate: STRATOSPHERE_LAPSE_RATE,
            ground_temperature: GROUND_TEMPERATURE,
            ground_pressure: GROUND_PRESSURE,
            ground_altitude: GROUND_ALTITUDE_MSL,
        }
    }
}

impl AtmosphereConstants {
    fn validate(&self) -> Result<(), ConfigError> {
        positive("atmosphere.gas_constant", self.gas_constant)?;
        positive("atmosphere.molar_mass", self.molar_mass)?;
        positive("atmosphere.ground_temperature", self.ground_temperature)?;
        positive("atmosphere.ground_pressure", self.ground_pressure)?;
        finite("atmosphere.ground_altitude", self.ground_altitude)?;
        if finite("atmosphere.troposphere_lapse_rate", self.troposphere_lapse_rate)? == 0.0 {
            return Err(ConfigError::ZeroLapseRate {
                field: "atmosphere.troposphere_lapse_rate",
            });
        }
        if finite("atmosphere.stratosphere_lapse_rate", self.stratosphere_lapse_rate)? == 0.0 {
            return Err(ConfigError::ZeroLapseRate {
                field: "atmosphere.stratosphere_lapse_rate",
            });
        }
        Ok(())
    }
}

/// Immutable description of the descending body, its recovery system and
/// the environment it falls through. Built once and shared by reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicalConfig {
    pub mass: f64,             // kg
    pub apogee: f64,           // m
    pub drogue_altitude: f64,  // m
    pub reefing_altitude: f64, // m
    pub main_altitude: f64,    // m

    pub body: DragStage,
    pub drogue: DragStage,
    pub reefing: DragStage,
    pub main: DragStage,

    pub gravity: f64,         // m/s²
    pub wind_horizontal: f64, // m/s
    pub wind_vertical: f64,   // m/s

    pub atmosphere: AtmosphereConstants,
}

impl Default for PhysicalConfig {
    fn default() -> Self {
        Self {
            mass: MASS,
            apogee: APOGEE,
            drogue_altitude: DROGUE_DEPLOY_ALTITUDE,
            reefing_altitude: REEFING_DEPLOY_ALTITUDE,
            main_altitude: MAIN_DEPLOY_ALTITUDE,
            body: DragStage::new(BODY_C_D, BODY_AREA),
            drogue: DragStage::new(DROGUE_C_D, DROGUE_AREA),
            reefing: DragStage::new(REEFING_C_D, REEFING_AREA),
            main: DragStage::new(MAIN_C_D, MAIN_AREA),
            gravity: GRAVITY,
            wind_horizontal: WIND_HORIZONTAL,
            wind_vertical: WIND_VERTICAL,
            atmosphere: AtmosphereConstants::default(),
        }
    }
}

impl PhysicalConfig {
    /// Parses a JSON document; absent keys keep their reference values.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Deployment altitudes as (drogue, reefing, main).
    pub fn deployment_altitudes(&self) -> [f64; 3] {
        [self.drogue_altitude, self.reefing_altitude, self.main_altitude]
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("mass", self.mass)?;
        positive("apogee", self.apogee)?;
        positive("gravity", self.gravity)?;
        finite("wind_horizontal", self.wind_horizontal)?;
        finite("wind_vertical", self.wind_vertical)?;

        // Altitudes at or above apogee disarm their stage and take no part
        // in the ordering.
        let armed: Vec<(&'static str, f64)> = [
            ("drogue_altitude", self.drogue_altitude),
            ("reefing_altitude", self.reefing_altitude),
            ("main_altitude", self.main_altitude),
        ]
        .into_iter()
        .map(|(field, altitude)| positive(field, altitude).map(|a| (field, a)))
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .filter(|&(_, altitude)| altitude < self.apogee)
        .collect();
        for pair in armed.windows(2) {
            let ((upper, high), (lower, low)) = (pair[0], pair[1]);
            if high <= low {
                return Err(ConfigError::DeploymentOrder { upper, lower });
            }
        }

        self.body.validate("body.drag_coefficient", "body.reference_area")?;
        self.drogue.validate("drogue.drag_coefficient", "drogue.reference_area")?;
        self.reefing.validate("reefing.drag_coefficient", "reefing.reference_area")?;
        self.main.validate("main.drag_coefficient", "main.reference_area")?;

        self.atmosphere.validate()
    }
}
