#![warn(missing_docs)]
//! Operators for gridded numerical weather prediction output.
//!
//! Fields on the terrain following model levels are interpolated to isosurfaces of pressure,
//! potential temperature, or any other field, reduced over height intervals, destaggered, and
//! combined into derived quantities. Every operator is a plain function from borrowed
//! [`Field`]s to a new `Field`; inputs are never modified.
//!
//! Options are passed as typed keys from the [`keys`] module. Each key can also be looked up by
//! the name used in product definitions, e.g. `PressureInterpolation::from_name("linear_in_p")`.
//!
//! Invalid requests fail with an [`AnalysisError`] before any computation. Grid points where a
//! result does not exist, such as targets that are not bracketed by any pair of levels, are NaN in
//! the output.
//!
//! The crate logs through [`tracing`] and never installs a subscriber.

//
// API
//
pub use crate::{
    destagger::destagger,
    error::{AnalysisError, Result},
    extrapolation::{
        extrapolate_geopotential_sfc2p, extrapolate_k2p, extrapolate_temperature_sfc2p,
    },
    field::{Field, FieldAttrs, LevelType, Parameter, VectorReference},
    interpolation::{interpolate_k2any, interpolate_k2p, interpolate_k2theta},
    keys::{
        Dimension, ExtremumOperator, FoldMode, HeightIntervalMode, IntegralOperator, Phase,
        PressureInterpolation, PressureUnit, ThetaUnit,
    },
    levels::zero_degree_isotherm_height,
    profile::{
        bulk_richardson_number, potential_temperature, relative_humidity,
        virtual_potential_temperature,
    },
    reduction::{integrate_k, minmax_k, HeightBounds},
    support::{init_field_with_vcoord, Positive, TargetCoordinates, TargetCoordinatesAttrs},
    wind::{wind_direction, wind_speed},
};

pub mod constants;
pub mod destagger;
pub mod field;
pub mod keys;
pub mod source;
pub mod support;

//
// Internal use only
//

// Modules
mod error;
mod extrapolation;
mod interpolation;
mod levels;
mod profile;
mod reduction;
#[cfg(test)]
mod test_data;
mod utility;
mod wind;
