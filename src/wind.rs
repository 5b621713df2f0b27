//! Horizontal wind speed and direction from wind components.
use crate::{
    error::{AnalysisError, Result},
    field::{Field, VectorReference},
};
use metfor::{MetersPSec, Quantity, WindSpdDir, WindUV};
use tracing::debug;

/// Horizontal wind speed.
///
/// The components must be on the mass points. The short name of the output is `SP` for model
/// level winds (`U`) and `SP_10M` for 10 m winds (`U_10M`).
///
/// # Errors
///
/// * `IncompatibleLevelType` if either component is on the staggered grid.
/// * `InvalidInput` if the components are not on the same grid.
pub fn wind_speed(u: &Field, v: &Field) -> Result<Field> {
    debug!(shape = ?u.shape(), "wind_speed");

    check_components(u, v)?;

    let speed = u.zip_with(v, |u, v| {
        let WindSpdDir { speed, .. }: WindSpdDir<MetersPSec> = WindSpdDir::from(WindUV {
            u: MetersPSec(u),
            v: MetersPSec(v),
        });
        speed.unpack()
    })?;

    let name = output_name(u, "SP");
    let mut attrs = u.attrs().with_short_name(name);
    attrs.parameter.name = "Wind speed".to_owned();

    let mut speed = speed;
    speed.set_attrs(attrs);
    Ok(speed)
}

/// Direction the horizontal wind blows from, in degrees clockwise from north.
///
/// The short name of the output is `DD` for model level winds (`U`) and `DD_10M` for 10 m
/// winds (`U_10M`).
///
/// # Errors
///
/// * `IncompatibleLevelType` if either component is on the staggered grid.
/// * `NotImplemented` unless both components are relative to geographic north, rotating grid
///   relative components is not supported.
/// * `InvalidInput` if the components are not on the same grid.
pub fn wind_direction(u: &Field, v: &Field) -> Result<Field> {
    debug!(shape = ?u.shape(), "wind_direction");

    check_components(u, v)?;
    if u.attrs().vref != VectorReference::Geo || v.attrs().vref != VectorReference::Geo {
        return Err(AnalysisError::NotImplemented(
            "wind direction from grid relative components",
        ));
    }

    let direction = u.zip_with(v, |u, v| u.atan2(v).to_degrees() + 180.0)?;

    let name = output_name(u, "DD");
    let mut attrs = u.attrs().with_short_name(name);
    attrs.parameter.name = "Wind direction".to_owned();
    attrs.parameter.units = "degrees".to_owned();

    let mut direction = direction;
    direction.set_attrs(attrs);
    Ok(direction)
}

fn check_components(u: &Field, v: &Field) -> Result<()> {
    if u.attrs().is_staggered_horizontal() || v.attrs().is_staggered_horizontal() {
        return Err(AnalysisError::IncompatibleLevelType(
            "wind components must be on the mass points",
        ));
    }
    u.check_same_grid(v)
}

// Anything other than U_10M is treated as a model level wind.
fn output_name(u: &Field, base: &str) -> String {
    match u.attrs().parameter.short_name.as_str() {
        "U_10M" => format!("{}_10M", base),
        _ => base.to_owned(),
    }
}
