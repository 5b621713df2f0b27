//! Interpolate fields on model levels to isosurfaces of another quantity.
//!
//! All operators work column by column. Every axis other than `"z"` is treated as an independent
//! column index, so ensemble members and lead times are carried through untouched. The vertical
//! axis of the output replaces `"z"` in place and is named after the target level type.
use crate::{
    error::{AnalysisError, Result},
    field::{Field, LevelType},
    keys::{FoldMode, PressureInterpolation, PressureUnit, ThetaUnit},
    support::{init_field_with_vcoord, Positive, TargetCoordinates, TargetCoordinatesAttrs},
    utility::warn_if_missing,
};
use itertools::izip;
use ndarray::{ArrayView1, Zip};
use tracing::debug;

mod bracket;

use self::bracket::{fold_bracket, pressure_bracket};

const PRESSURE_RANGE: (f64, f64) = (1.0, 120_000.0);
const THETA_RANGE: (f64, f64) = (1.0, 1000.0);

/// Interpolate a field from model levels to pressure levels.
///
/// `p_field` is the pressure on the same model levels as `field`, in Pa. Target values are given
/// in `p_tc_units` and converted to Pa; the output levels are sorted by increasing pressure.
///
/// At each grid point the bracketing pair of levels is the shallowest pair where pressure goes
/// from at most the target to above it. Grid points where the target is not bracketed, including
/// targets at or below the pressure of the lowest level, are NaN.
///
/// # Errors
///
/// * `OutOfRangeTarget` if a target is not within [1, 120000] Pa.
/// * `IncompatibleLevelType` unless both fields are on the same model levels.
/// * `InvalidInput` if the fields are not on the same grid.
///
/// # Examples
///
/// ```rust
/// use field_analysis::{interpolate_k2p, Field, PressureInterpolation, PressureUnit};
/// use ndarray::ArrayD;
///
/// let p = ArrayD::from_shape_vec(vec![3, 1], vec![90000.0, 95000.0, 100000.0]).unwrap();
/// let t = ArrayD::from_shape_vec(vec![3, 1], vec![300.0, 290.0, 280.0]).unwrap();
/// let p = Field::new(p, vec!["z", "x"]).unwrap();
/// let t = Field::new(t, vec!["z", "x"]).unwrap();
///
/// let t_p = interpolate_k2p(&t, PressureInterpolation::LinearInP, &p, &[925.0], PressureUnit::HPa)
///     .unwrap();
/// assert_eq!(t_p.dims(), &["pressure", "x"]);
/// assert!((t_p.data()[[0, 0]] - 295.0).abs() < 1.0e-9);
/// ```
pub fn interpolate_k2p(
    field: &Field,
    mode: PressureInterpolation,
    p_field: &Field,
    p_tc_values: &[f64],
    p_tc_units: PressureUnit,
) -> Result<Field> {
    debug!(
        mode = mode.name(),
        targets = ?p_tc_values,
        units = p_tc_units.name(),
        shape = ?field.shape(),
        "interpolate_k2p"
    );

    let mut values: Vec<f64> = p_tc_values
        .iter()
        .map(|v| v * p_tc_units.to_pascals())
        .collect();
    check_range(&values, PRESSURE_RANGE)?;
    values.sort_by(|a, b| a.total_cmp(b));

    if *field.level_type() != LevelType::ModelLevel
        || *p_field.level_type() != LevelType::ModelLevel
        || field.origin_z() != p_field.origin_z()
    {
        return Err(AnalysisError::IncompatibleLevelType(
            "field and pressure must be defined on the same model levels",
        ));
    }
    field.check_same_grid(p_field)?;
    let ax = field.vertical_axis()?;

    let tc = TargetCoordinates {
        type_of_level: LevelType::Pressure,
        values,
        attrs: TargetCoordinatesAttrs {
            standard_name: "air_pressure".to_owned(),
            long_name: "pressure".to_owned(),
            units: "Pa".to_owned(),
            positive: Positive::Down,
        },
    };

    let mut out = init_field_with_vcoord(field, &tc, f64::NAN);
    let mut data = out.data().clone();

    Zip::from(data.lanes_mut(ax))
        .and(field.data().lanes(ax))
        .and(p_field.data().lanes(ax))
        .for_each(|mut col, f, p| {
            for (o, &p0) in col.iter_mut().zip(&tc.values) {
                *o = pressure_bracket(p, p0)
                    .map(|k| {
                        let ratio = pressure_ratio(mode, p0, p[k - 1], p[k]);
                        (1.0 - ratio) * f[k - 1] + ratio * f[k]
                    })
                    .unwrap_or(f64::NAN);
            }
        });

    out = out.with_data(data);
    warn_if_missing("interpolate_k2p", &out);
    Ok(out)
}

fn pressure_ratio(mode: PressureInterpolation, p0: f64, p1: f64, p2: f64) -> f64 {
    match mode {
        PressureInterpolation::LinearInP => (p0 - p1) / (p2 - p1),
        PressureInterpolation::LinearInLnP => (p0.ln() - p1.ln()) / (p2.ln() - p1.ln()),
        PressureInterpolation::NearestSfc => {
            if (p0 - p1).abs() >= (p0 - p2).abs() {
                1.0
            } else {
                0.0
            }
        }
    }
}

/// Interpolate a field from model levels to isentropic surfaces.
///
/// `th_field` is the potential temperature in K on the full model levels of `field`, and
/// `h_field` the height of those levels, used only to choose between several crossings of the
/// same target in one column according to `mode`. Target values are given in `th_tc_units` and
/// converted to K, the output levels keep the order of the targets.
///
/// # Errors
///
/// * `OutOfRangeTarget` if a target is not within [1, 1000] K.
/// * `IncompatibleLevelType` unless all fields are on full model levels.
/// * `InvalidInput` if the fields are not on the same grid.
pub fn interpolate_k2theta(
    field: &Field,
    mode: FoldMode,
    th_field: &Field,
    th_tc_values: &[f64],
    th_tc_units: ThetaUnit,
    h_field: &Field,
) -> Result<Field> {
    debug!(
        mode = mode.name(),
        targets = ?th_tc_values,
        units = th_tc_units.name(),
        shape = ?field.shape(),
        "interpolate_k2theta"
    );

    let values: Vec<f64> = th_tc_values
        .iter()
        .map(|v| v * th_tc_units.to_kelvin())
        .collect();
    check_range(&values, THETA_RANGE)?;

    let tc = TargetCoordinates {
        type_of_level: LevelType::Theta,
        values,
        attrs: TargetCoordinatesAttrs {
            standard_name: "air_potential_temperature".to_owned(),
            long_name: "potential temperature".to_owned(),
            units: "K".to_owned(),
            positive: Positive::Up,
        },
    };

    let out = interpolate_folded(field, mode, th_field, h_field, &tc)?;
    warn_if_missing("interpolate_k2theta", &out);
    Ok(out)
}

/// Interpolate a field from model levels to isosurfaces of an arbitrary target field.
///
/// Works like [`interpolate_k2theta`] except that the target values are taken as they are, in the
/// units of `tc_field`, and the output vertical axis is named after the short name of
/// `tc_field`. Only `LowFold` and `HighFold` are supported.
///
/// # Errors
///
/// * `UnsupportedMode` for `UndefFold`.
/// * `IncompatibleLevelType` unless all fields are on full model levels.
/// * `InvalidInput` if the fields are not on the same grid.
pub fn interpolate_k2any(
    field: &Field,
    mode: FoldMode,
    tc_field: &Field,
    tc_values: &[f64],
    h_field: &Field,
) -> Result<Field> {
    debug!(
        mode = mode.name(),
        target = tc_field.attrs().parameter.short_name.as_str(),
        targets = ?tc_values,
        shape = ?field.shape(),
        "interpolate_k2any"
    );

    if mode == FoldMode::UndefFold {
        return Err(AnalysisError::UnsupportedMode(mode.name().to_owned()));
    }

    let parameter = &tc_field.attrs().parameter;
    let tc = TargetCoordinates {
        type_of_level: LevelType::Named(parameter.short_name.clone()),
        values: tc_values.to_vec(),
        attrs: TargetCoordinatesAttrs {
            standard_name: String::new(),
            long_name: parameter.name.clone(),
            units: parameter.units.clone(),
            positive: Positive::Up,
        },
    };

    let out = interpolate_folded(field, mode, tc_field, h_field, &tc)?;
    warn_if_missing("interpolate_k2any", &out);
    Ok(out)
}

// Shared by the theta and arbitrary target interpolations, the target values in `tc` are already
// validated and in the units of `target`.
fn interpolate_folded(
    field: &Field,
    mode: FoldMode,
    target: &Field,
    height: &Field,
    tc: &TargetCoordinates,
) -> Result<Field> {
    if !(field.is_model_level(0.0) && target.is_model_level(0.0) && height.is_model_level(0.0)) {
        return Err(AnalysisError::IncompatibleLevelType(
            "field, target, and height must be defined on full model levels",
        ));
    }
    field.check_same_grid(target)?;
    field.check_same_grid(height)?;
    let ax = field.vertical_axis()?;

    let mut out = init_field_with_vcoord(field, tc, f64::NAN);
    let mut data = out.data().clone();

    Zip::from(data.lanes_mut(ax))
        .and(field.data().lanes(ax))
        .and(target.data().lanes(ax))
        .and(height.data().lanes(ax))
        .for_each(|mut col, f, t, h| {
            for (o, &v0) in izip!(col.iter_mut(), &tc.values) {
                *o = fold_bracket(t, h, v0, mode)
                    .map(|k| interpolate_at_bracket(f, t, k, v0))
                    .unwrap_or(f64::NAN);
            }
        });

    out = out.with_data(data);
    Ok(out)
}

// Linear in the target quantity between levels k - 1 and k. Equal target values at both levels
// give the value at k - 1.
fn interpolate_at_bracket(f: ArrayView1<f64>, t: ArrayView1<f64>, k: usize, v0: f64) -> f64 {
    let (v1, v2) = (t[k - 1], t[k]);
    let ratio = if (v2 - v1).abs() > 0.0 {
        (v0 - v1) / (v2 - v1)
    } else {
        0.0
    };

    (1.0 - ratio) * f[k - 1] + ratio * f[k]
}

// NaN targets fail the check as well.
fn check_range(values: &[f64], (min, max): (f64, f64)) -> Result<()> {
    match values.iter().find(|v| !(min..=max).contains(*v)) {
        Some(&value) => Err(AnalysisError::OutOfRangeTarget { value, min, max }),
        None => Ok(()),
    }
}
