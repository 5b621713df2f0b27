//! Move fields from staggered grid positions to mass points.
//!
//! Horizontally staggered fields (wind components on cell faces) are averaged onto cell centers,
//! and fields on layer interfaces (half levels) are averaged onto layer mid points (full levels).
use crate::{
    error::{AnalysisError, Result},
    field::{Field, LevelType},
    keys::Dimension,
};
use ndarray::{ArrayD, ArrayView1, ArrayViewMut1, Axis, Zip};
use tracing::debug;

/// Which end values to keep when interpolating to mid points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extend {
    /// Keep the first value, the output has as many values as the input.
    Left,
    /// Keep the last value, the output has as many values as the input.
    Right,
    /// Keep both end values, the output has one more value than the input.
    Both,
}

/// Interpolate a sequence of values onto the mid points between them.
///
/// Without `extend` the output has one value less than the input.
///
/// # Examples
///
/// ```rust
/// use field_analysis::destagger::{interpolate_midpoint, Extend};
///
/// assert_eq!(interpolate_midpoint(&[1.0, 2.0, 4.0], None), vec![1.5, 3.0]);
/// assert_eq!(interpolate_midpoint(&[1.0, 2.0, 4.0], Some(Extend::Left)), vec![1.0, 1.5, 3.0]);
/// assert_eq!(interpolate_midpoint(&[1.0, 2.0, 4.0], Some(Extend::Right)), vec![1.5, 3.0, 4.0]);
/// assert_eq!(
///     interpolate_midpoint(&[1.0, 2.0, 4.0], Some(Extend::Both)),
///     vec![1.0, 1.5, 3.0, 4.0]
/// );
/// ```
pub fn interpolate_midpoint(values: &[f64], extend: Option<Extend>) -> Vec<f64> {
    if values.is_empty() {
        return vec![];
    }

    let mut out = vec![f64::NAN; extended_len(values.len(), extend)];
    midpoints_into(
        ArrayView1::from(values),
        ArrayViewMut1::from(out.as_mut_slice()),
        extend,
    );
    out
}

fn extended_len(n: usize, extend: Option<Extend>) -> usize {
    match extend {
        None => n.saturating_sub(1),
        Some(Extend::Left) | Some(Extend::Right) => n,
        Some(Extend::Both) => n + 1,
    }
}

// `out` must have the length given by `extended_len`.
fn midpoints_into(values: ArrayView1<f64>, mut out: ArrayViewMut1<f64>, extend: Option<Extend>) {
    let n = values.len();
    debug_assert_eq!(out.len(), extended_len(n, extend));
    if n == 0 {
        return;
    }

    let offset = match extend {
        Some(Extend::Left) | Some(Extend::Both) => {
            out[0] = values[0];
            1
        }
        _ => 0,
    };

    match extend {
        Some(Extend::Right) | Some(Extend::Both) => {
            let last = out.len() - 1;
            out[last] = values[n - 1];
        }
        _ => {}
    }

    for k in 0..n.saturating_sub(1) {
        out[k + offset] = 0.5 * (values[k] + values[k + 1]);
    }
}

/// Destagger a field along a dimension.
///
/// Along `x` or `y` the field must be on cell faces (origin 0.5). The output has the same shape,
/// value `i` is the mean of input values `i - 1` and `i`, and the first value, which has no left
/// neighbor, is copied from the input. Coordinates along the axis, if any, are shifted back by half
/// a grid spacing.
///
/// Along `z` the field must be on model level interfaces (origin -0.5). The output has one level
/// less, level `k` being the mean of interfaces `k` and `k + 1`, and keeps the coordinates of the
/// first `n - 1` interfaces.
///
/// The input field is never modified.
pub fn destagger(field: &Field, dim: Dimension) -> Result<Field> {
    debug!(dim = dim.name(), shape = ?field.shape(), "destagger");

    let ax = field
        .axis(dim.name())
        .ok_or_else(|| AnalysisError::UnsupportedDimension(dim.name().to_owned()))?;

    match dim {
        Dimension::X | Dimension::Y => destagger_horizontal(field, dim, ax),
        Dimension::Z => destagger_vertical(field, ax),
    }
}

fn destagger_horizontal(field: &Field, dim: Dimension, ax: Axis) -> Result<Field> {
    let mut attrs = field.attrs().clone();
    let origin = match dim {
        Dimension::X => &mut attrs.origin_x,
        _ => &mut attrs.origin_y,
    };
    if *origin != 0.5 {
        return Err(AnalysisError::IncompatibleLevelType(
            "field must be staggered along the horizontal dimension",
        ));
    }
    *origin = 0.0;

    let mut out = ArrayD::from_elem(field.data().raw_dim(), f64::NAN);
    Zip::from(out.lanes_mut(ax))
        .and(field.data().lanes(ax))
        .for_each(|o, v| midpoints_into(v, o, Some(Extend::Left)));

    let mut destaggered = field.with_data(out);
    destaggered.set_attrs(attrs);

    if let Some(coord) = field.coord(dim.name()) {
        if coord.len() > 1 {
            let half = 0.5 * (coord[1] - coord[0]);
            let shifted = coord
                .iter()
                .map(|c| ((c - half) * 1.0e6).round() / 1.0e6)
                .collect();
            destaggered = destaggered.with_coord(dim.name(), shifted)?;
        }
    }

    Ok(destaggered)
}

fn destagger_vertical(field: &Field, ax: Axis) -> Result<Field> {
    if *field.level_type() != LevelType::ModelLevel || field.origin_z() != -0.5 {
        return Err(AnalysisError::IncompatibleLevelType(
            "field must be defined on model level interfaces",
        ));
    }

    let n = field.data().len_of(ax);
    if n < 2 {
        return Err(AnalysisError::InvalidInput(
            "at least two half levels are required to destagger",
        ));
    }

    let mut shape = field.shape().to_vec();
    shape[ax.index()] = n - 1;

    let mut out = ArrayD::from_elem(shape, f64::NAN);
    Zip::from(out.lanes_mut(ax))
        .and(field.data().lanes(ax))
        .for_each(|o, v| midpoints_into(v, o, None));

    let mut coords = field.coords().clone();
    if let Some(levels) = coords.get_mut(crate::field::VERTICAL_DIM) {
        levels.truncate(n - 1);
    }

    let mut attrs = field.attrs().clone();
    attrs.origin_z = 0.0;

    Ok(Field::from_parts(
        field,
        out,
        field.dims().to_vec(),
        coords,
        attrs,
    ))
}
