//! Enums used as keys for setting options in functions.
//!
//! Every key has a canonical name, the string used to select it in product definitions and
//! configuration files. Use `from_name` to look one up; unknown names map to the matching
//! `AnalysisError` variant.
use crate::error::{AnalysisError, Result};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

macro_rules! key_from_name {
    ($(#[$attr:meta])* $key:ty => $err:ident) => {
        impl $key {
            $(#[$attr])*
            pub fn from_name(name: &str) -> Result<Self> {
                name.parse()
                    .map_err(|_| AnalysisError::$err(name.to_owned()))
            }

            /// The canonical name of this key.
            pub fn name(&self) -> &str {
                self.as_ref()
            }
        }
    };
}

/// Interpolation algorithms for interpolating model levels to pressure levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, AsRefStr, Display, EnumIter)]
pub enum PressureInterpolation {
    /// Linear in pressure.
    #[strum(serialize = "linear_in_p")]
    LinearInP,
    /// Linear in the natural logarithm of pressure.
    #[strum(serialize = "linear_in_lnp")]
    LinearInLnP,
    /// Take the value of the bracketing level nearest the target, ties go to the level closer to
    /// the surface.
    #[strum(serialize = "nearest_sfc")]
    NearestSfc,
}

key_from_name!(
    /// Look up a pressure interpolation mode by name, e.g. `"linear_in_p"`.
    PressureInterpolation => UnsupportedMode
);

/// How to resolve a target value that is crossed more than once in a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, AsRefStr, Display, EnumIter)]
pub enum FoldMode {
    /// Use the crossing at the lowest height.
    #[strum(serialize = "low_fold")]
    LowFold,
    /// Use the crossing at the greatest height.
    #[strum(serialize = "high_fold")]
    HighFold,
    /// Missing value wherever there is more than one crossing, otherwise like `LowFold`.
    #[strum(serialize = "undef_fold")]
    UndefFold,
}

key_from_name!(
    /// Look up a fold mode by name, e.g. `"low_fold"`.
    FoldMode => UnsupportedMode
);

/// Units accepted for pressure target coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, AsRefStr, Display, EnumIter)]
pub enum PressureUnit {
    /// Pascals
    #[strum(serialize = "Pa")]
    Pa,
    /// Hectopascals
    #[strum(serialize = "hPa")]
    HPa,
}

key_from_name!(
    /// Look up a pressure unit by name, `"Pa"` or `"hPa"`.
    PressureUnit => UnsupportedUnit
);

impl PressureUnit {
    /// Factor converting a value in this unit to Pa.
    pub fn to_pascals(self) -> f64 {
        match self {
            PressureUnit::Pa => 1.0,
            PressureUnit::HPa => 100.0,
        }
    }
}

/// Units accepted for potential temperature target coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, AsRefStr, Display, EnumIter)]
pub enum ThetaUnit {
    /// Kelvin
    #[strum(serialize = "K")]
    K,
    /// Centi-Kelvin, used by some NetCDF products.
    #[strum(serialize = "cK")]
    CK,
}

key_from_name!(
    /// Look up a potential temperature unit by name, `"K"` or `"cK"`.
    ThetaUnit => UnsupportedUnit
);

impl ThetaUnit {
    /// Factor converting a value in this unit to K.
    pub fn to_kelvin(self) -> f64 {
        match self {
            ThetaUnit::K => 1.0,
            ThetaUnit::CK => 0.01,
        }
    }
}

/// Extremum reduction operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, AsRefStr, Display, EnumIter)]
pub enum ExtremumOperator {
    /// Largest value in the interval.
    #[strum(serialize = "maximum")]
    Maximum,
    /// Smallest value in the interval.
    #[strum(serialize = "minimum")]
    Minimum,
}

key_from_name!(
    /// Look up an extremum operator by name, `"maximum"` or `"minimum"`.
    ExtremumOperator => UnsupportedMode
);

/// Integral reduction operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, AsRefStr, Display, EnumIter)]
pub enum IntegralOperator {
    /// Integral over height.
    #[strum(serialize = "integral")]
    Integral,
    /// Integral over height divided by the interval thickness.
    #[strum(serialize = "normed_integral")]
    NormedIntegral,
}

key_from_name!(
    /// Look up an integral operator by name, `"integral"` or `"normed_integral"`.
    IntegralOperator => UnsupportedMode
);

/// How the bottom and top of a height interval are given. The first letter describes the bottom
/// bound and the second the top bound, `h` is height above ground and `z` is height above mean
/// sea level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, AsRefStr, Display, EnumIter)]
pub enum HeightIntervalMode {
    /// Above ground to above ground.
    #[strum(serialize = "h2h")]
    H2H,
    /// Above ground to above mean sea level.
    #[strum(serialize = "h2z")]
    H2Z,
    /// Above mean sea level to above ground.
    #[strum(serialize = "z2h")]
    Z2H,
    /// Above mean sea level to above mean sea level.
    #[strum(serialize = "z2z")]
    Z2Z,
}

key_from_name!(
    /// Look up a height interval mode by name, e.g. `"z2z"`.
    HeightIntervalMode => UnsupportedMode
);

impl HeightIntervalMode {
    /// Whether the bottom bound is given above ground level.
    pub fn bottom_above_ground(self) -> bool {
        matches!(self, HeightIntervalMode::H2H | HeightIntervalMode::H2Z)
    }

    /// Whether the top bound is given above ground level.
    pub fn top_above_ground(self) -> bool {
        matches!(self, HeightIntervalMode::H2H | HeightIntervalMode::Z2H)
    }

    /// Whether the surface height is needed to convert the bounds.
    pub fn needs_surface_height(self) -> bool {
        self.bottom_above_ground() || self.top_above_ground()
    }
}

/// Axes a field can be destaggered along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, AsRefStr, Display, EnumIter)]
pub enum Dimension {
    /// West-east horizontal axis
    #[strum(serialize = "x")]
    X,
    /// South-north horizontal axis
    #[strum(serialize = "y")]
    Y,
    /// Vertical axis
    #[strum(serialize = "z")]
    Z,
}

key_from_name!(
    /// Look up an axis by name, `"x"`, `"y"`, or `"z"`.
    Dimension => UnsupportedDimension
);

/// Phase of water used as the reference for saturation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, AsRefStr, Display, EnumIter)]
pub enum Phase {
    /// Saturation over liquid water.
    #[strum(serialize = "water")]
    Water,
    /// Saturation over ice.
    #[strum(serialize = "ice")]
    Ice,
    /// Saturation over a mixed phase.
    #[strum(serialize = "water+ice")]
    WaterIce,
}

key_from_name!(
    /// Look up a phase by name, e.g. `"water"`.
    Phase => UnsupportedMode
);
