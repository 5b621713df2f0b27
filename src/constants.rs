//! Physical constants used by the derived quantities.
#![allow(non_upper_case_globals)]

/// Standard gravity (m s-2)
pub const g: f64 = 9.806_65;

/// Specific gas constant for dry air (J kg-1 K-1)
pub const R_d: f64 = 287.05;
/// Specific gas constant for water vapour (J kg-1 K-1)
pub const R_v: f64 = 461.51;
/// Specific heat capacity of dry air at constant pressure (J kg-1 K-1)
pub const cp_d: f64 = 1005.0;

/// Ratio of the gas constants of dry air and water vapour.
pub const rdv: f64 = R_d / R_v;
/// `R_d / cp_d`, the exponent of the potential temperature.
pub const rdocp: f64 = R_d / cp_d;

/// Reference pressure of the potential temperature (Pa)
pub const P0: f64 = 1.0e5;

// Tetens's formula for the saturation vapour pressure over water.
/// Saturation vapour pressure at the triple point of water (Pa)
pub const b1: f64 = 611.21;
/// Tetens's coefficient over water
pub const b2w: f64 = 17.502;
/// Temperature at the triple point of water (K)
pub const b3: f64 = 273.16;
/// Tetens's temperature offset over water (K)
pub const b4w: f64 = 32.19;
