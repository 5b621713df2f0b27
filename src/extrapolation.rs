//! Extrapolate fields below the model orography to a pressure level.
//!
//! These fill pressure levels that are below the surface, where interpolation leaves missing
//! values, for applications that cannot deal with missing values. The results follow a standard
//! atmosphere and carry no physical meaning.
use crate::{
    constants::{g, R_d},
    error::{AnalysisError, Result},
    field::{Field, LevelType},
    support::{init_field_with_vcoord, Positive, TargetCoordinates, TargetCoordinatesAttrs},
};
use ndarray::{Axis, Zip};
use tracing::debug;

/// Standard atmosphere lapse rate (K m-1)
const LAPSE_RATE: f64 = 0.0065;
/// Below this surface height the standard lapse rate is used.
const H1: f64 = 2000.0;
/// Above this surface height the extrapolated mean sea level temperature is capped at `T1`.
const H2: f64 = 2500.0;
const T1: f64 = 298.0;

/// Copy the lowest model level of a field to the pressure level `p_target` (Pa).
///
/// # Errors
///
/// * `OutOfRangeTarget` if `p_target` is not within [1, 120000] Pa.
/// * `IncompatibleLevelType` unless the field is on model levels.
pub fn extrapolate_k2p(field: &Field, p_target: f64) -> Result<Field> {
    debug!(p_target, shape = ?field.shape(), "extrapolate_k2p");

    check_target(p_target)?;
    if *field.level_type() != LevelType::ModelLevel {
        return Err(AnalysisError::IncompatibleLevelType(
            "field must be defined on model levels",
        ));
    }

    let ax = field.vertical_axis()?;
    let n = field.data().len_of(ax);
    if n == 0 {
        return Err(AnalysisError::InvalidInput("field has no levels"));
    }

    let lowest = field.data().select(ax, &[n - 1]);
    let out = init_field_with_vcoord(field, &pressure_level(p_target), f64::NAN);
    Ok(out.with_data(lowest))
}

/// Extrapolate the surface temperature (K) to the pressure level `p_target` (Pa).
///
/// `h_sfc` is the surface height (m) and `p_sfc` the surface pressure (Pa), all on the same
/// grid. The lapse rate is the standard 0.0065 K m-1 over low terrain, and over high terrain is
/// derived from a mean sea level temperature that is capped for surfaces above 2500 m.
///
/// The output has short name `T` and a leading vertical axis with the single pressure level.
pub fn extrapolate_temperature_sfc2p(
    t_sfc: &Field,
    h_sfc: &Field,
    p_sfc: &Field,
    p_target: f64,
) -> Result<Field> {
    debug!(p_target, shape = ?t_sfc.shape(), "extrapolate_temperature_sfc2p");

    check_target(p_target)?;
    t_sfc.check_same_grid(h_sfc)?;
    t_sfc.check_same_grid(p_sfc)?;

    let mut data = t_sfc.data().clone();
    Zip::from(&mut data)
        .and(h_sfc.data())
        .and(p_sfc.data())
        .for_each(|t, &h, &p| {
            let y = y_term(lapse_rate(*t, h), p, p_target);
            *t *= 1.0 + y + y * y / 2.0 + y * y * y / 6.0;
        });

    Ok(on_pressure_level(t_sfc, data, "T", p_target))
}

/// Extrapolate the surface geopotential to the pressure level `p_target` (Pa).
///
/// `h_sfc` is the surface height (m), `t_sfc` the surface temperature (K), and `p_sfc` the
/// surface pressure (Pa). The output has short name `FI`, in m2 s-2.
pub fn extrapolate_geopotential_sfc2p(
    h_sfc: &Field,
    t_sfc: &Field,
    p_sfc: &Field,
    p_target: f64,
) -> Result<Field> {
    debug!(p_target, shape = ?t_sfc.shape(), "extrapolate_geopotential_sfc2p");

    check_target(p_target)?;
    t_sfc.check_same_grid(h_sfc)?;
    t_sfc.check_same_grid(p_sfc)?;

    let mut data = h_sfc.data().clone();
    Zip::from(&mut data)
        .and(t_sfc.data())
        .and(p_sfc.data())
        .for_each(|fi, &t, &p| {
            let y = y_term(LAPSE_RATE, p, p_target);
            let h = *fi;
            *fi = h * g - R_d * t * (p_target / p).ln() * (1.0 + y / 2.0 + y * y / 6.0);
        });

    Ok(on_pressure_level(t_sfc, data, "FI", p_target))
}

fn lapse_rate(t_sfc: f64, h_sfc: f64) -> f64 {
    if h_sfc < H1 {
        return LAPSE_RATE;
    }

    let t0 = t_sfc + LAPSE_RATE * h_sfc;
    let t_capped = t0.min(T1);
    let t0_prime = if h_sfc > H2 {
        t_capped
    } else {
        0.5 * (t_capped + t0)
    };

    (t0_prime - t_sfc).max(0.0) / h_sfc
}

fn y_term(lapse_rate: f64, p_sfc: f64, p_target: f64) -> f64 {
    lapse_rate * R_d / g * (p_target / p_sfc).ln()
}

fn check_target(p_target: f64) -> Result<()> {
    let (min, max) = (1.0, 120_000.0);
    if (min..=max).contains(&p_target) {
        Ok(())
    } else {
        Err(AnalysisError::OutOfRangeTarget {
            value: p_target,
            min,
            max,
        })
    }
}

fn pressure_level(p_target: f64) -> TargetCoordinates {
    TargetCoordinates {
        type_of_level: LevelType::Pressure,
        values: vec![p_target],
        attrs: TargetCoordinatesAttrs {
            standard_name: "air_pressure".to_owned(),
            long_name: "pressure".to_owned(),
            units: "Pa".to_owned(),
            positive: Positive::Down,
        },
    }
}

// Surface fields gain a leading pressure axis.
fn on_pressure_level(
    template: &Field,
    data: ndarray::ArrayD<f64>,
    short_name: &str,
    p_target: f64,
) -> Field {
    let tc = pressure_level(p_target);
    let vdim = tc.type_of_level.name().to_owned();

    let dims = std::iter::once(vdim.clone())
        .chain(template.dims().iter().cloned())
        .collect();
    let mut coords = template.coords().clone();
    coords.insert(vdim, tc.values.clone());

    let attrs = template
        .attrs()
        .with_short_name(short_name)
        .with_level_type(LevelType::Pressure);

    Field::from_parts(template, data.insert_axis(Axis(0)), dims, coords, attrs)
        .with_vertical_attrs(tc.attrs)
}
