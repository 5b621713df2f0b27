//! Error types for the field-analysis crate.
use std::{error::Error, fmt::Display};

/// Error type for the crate.
///
/// Every variant is a validation failure raised before an operator does any computation. Problems
/// at individual grid points (no bracketing levels, zero gradients, columns full of missing
/// values) are never errors, they show up as NaN in the output field.
#[derive(Clone, PartialEq, Debug)]
pub enum AnalysisError {
    /// The interpolation or reduction mode name is not recognized.
    UnsupportedMode(String),
    /// The unit of the target coordinate values is not recognized.
    UnsupportedUnit(String),
    /// A target coordinate value is outside the physically sensible range.
    OutOfRangeTarget {
        /// The offending value, after unit conversion.
        value: f64,
        /// Smallest allowed value.
        min: f64,
        /// Largest allowed value.
        max: f64,
    },
    /// Input fields do not share the required vertical coordinate type or staggering.
    IncompatibleLevelType(&'static str),
    /// A field required for the requested mode was not supplied.
    MissingRequiredInput(&'static str),
    /// Destagger was asked to work along an axis it does not know about.
    UnsupportedDimension(String),
    /// The requested mode exists but has not been implemented.
    NotImplemented(&'static str),
    /// Bad or invalid input, such as mismatched array shapes.
    InvalidInput(&'static str),
    /// No field matched a data source request.
    FieldNotFound(String),
}

impl Display for AnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use crate::AnalysisError::*;

        match self {
            UnsupportedMode(mode) => write!(f, "unsupported mode: {}", mode),
            UnsupportedUnit(unit) => write!(f, "unsupported unit: {}", unit),
            OutOfRangeTarget { value, min, max } => write!(
                f,
                "target coordinate value {} out of range (must be in interval [{}, {}])",
                value, min, max
            ),
            IncompatibleLevelType(msg) => write!(f, "incompatible level type: {}", msg),
            MissingRequiredInput(msg) => write!(f, "missing required input: {}", msg),
            UnsupportedDimension(dim) => write!(f, "unsupported dimension: {}", dim),
            NotImplemented(msg) => write!(f, "not implemented: {}", msg),
            InvalidInput(msg) => write!(f, "invalid input: {}", msg),
            FieldNotFound(req) => write!(f, "no field matches request: {}", req),
        }
    }
}

impl Error for AnalysisError {}

/// Shorthand for results.
pub type Result<T> = std::result::Result<T, AnalysisError>;
