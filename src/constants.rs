// Recovery system reference configuration (SI units)
pub const MASS: f64 = 5.0; // kg
pub const APOGEE: f64 = 20_650.0; // m above the ground reference
pub const DROGUE_DEPLOY_ALTITUDE: f64 = 10_000.0; // m
pub const REEFING_DEPLOY_ALTITUDE: f64 = 1_000.0; // m
pub const MAIN_DEPLOY_ALTITUDE: f64 = 500.0; // m

// Drag parameters
pub const BODY_C_D: f64 = 0.5;
pub const BODY_AREA: f64 = 0.1; // m²
pub const DROGUE_C_D: f64 = 0.75;
pub const DROGUE_AREA: f64 = 0.3; // m²
pub const REEFING_C_D: f64 = 0.75;
pub const REEFING_AREA: f64 = 1.0; // m²
pub const MAIN_C_D: f64 = 0.75;
pub const MAIN_AREA: f64 = 3.0; // m²

// Environment
pub const GRAVITY: f64 = 9.8; // m/s²
pub const WIND_HORIZONTAL: f64 = 13.0 / 3.6; // m/s
pub const WIND_VERTICAL: f64 = 0.0; // m/s

// Atmosphere
pub const GAS_CONSTANT: f64 = 8.3144598; // J/(mol·K)
pub const MOLAR_MASS_AIR: f64 = 0.0289644; // kg/mol
pub const TROPOSPHERE_LAPSE_RATE: f64 = -0.0065; // K/m
pub const STRATOSPHERE_LAPSE_RATE: f64 = 0.001; // K/m
pub const GROUND_TEMPERATURE: f64 = 295.15; // K at y = 0 (not sea level)
pub const GROUND_PRESSURE: f64 = 92_000.0; // Pa at y = 0 (not sea level)
pub const GROUND_ALTITUDE_MSL: f64 = 856.0; // m above sea level of y = 0

// Layer boundaries, absolute altitude above sea level
pub const TROPOPAUSE_ALTITUDE: f64 = 11_000.0; // m
pub const LOWER_STRATOSPHERE_TOP: f64 = 20_000.0; // m

// Solver defaults
pub const RELATIVE_TOLERANCE: f64 = 1e-6;
pub const ABSOLUTE_TOLERANCE: f64 = 1e-8;
pub const OUTPUT_STEP: f64 = 0.001; // s
pub const MAX_SIMULATION_TIME: f64 = 1000.0; // s
