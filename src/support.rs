//! Types and helpers shared by the operators that build a new vertical axis.
use crate::field::{Field, LevelType, VERTICAL_DIM};
use ndarray::{ArrayD, IxDyn};
use std::fmt::Display;

/// Direction in which the values of a vertical coordinate increase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Positive {
    /// Values increase with height.
    Up,
    /// Values increase towards the ground.
    Down,
}

impl Display for Positive {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Positive::Up => write!(f, "up"),
            Positive::Down => write!(f, "down"),
        }
    }
}

/// Attributes of a target vertical coordinate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetCoordinatesAttrs {
    /// CF standard name, may be empty.
    pub standard_name: String,
    /// Descriptive name.
    pub long_name: String,
    /// Unit of the coordinate values.
    pub units: String,
    /// Sign convention.
    pub positive: Positive,
}

/// The vertical axis of the output of an interpolation operator.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetCoordinates {
    /// Level type, also the name of the output vertical axis.
    pub type_of_level: LevelType,
    /// Target values, in the unit given by `attrs`.
    pub values: Vec<f64>,
    /// Coordinate attributes.
    pub attrs: TargetCoordinatesAttrs,
}

impl TargetCoordinates {
    /// Number of target levels.
    #[inline]
    pub fn size(&self) -> usize {
        self.values.len()
    }
}

/// Create a field with new vertical coordinates, filled with `fill_value`.
///
/// Dimension order, horizontal coordinates, and metadata are inherited from `parent`, except the
/// `"z"` axis is replaced by an axis named after the target level type with one entry per target
/// value. The level type of the new field is the target level type.
pub fn init_field_with_vcoord(
    parent: &Field,
    vcoord: &TargetCoordinates,
    fill_value: f64,
) -> Field {
    let vdim = vcoord.type_of_level.name();

    let (dims, shape): (Vec<String>, Vec<usize>) = parent
        .dims()
        .iter()
        .zip(parent.shape())
        .map(|(dim, &size)| {
            if dim == VERTICAL_DIM {
                (vdim.to_owned(), vcoord.size())
            } else {
                (dim.clone(), size)
            }
        })
        .unzip();

    let mut coords = parent.coords().clone();
    coords.remove(VERTICAL_DIM);
    coords.insert(vdim.to_owned(), vcoord.values.clone());

    let attrs = parent.attrs().with_level_type(vcoord.type_of_level.clone());

    Field::from_parts(
        parent,
        ArrayD::from_elem(IxDyn(&shape), fill_value),
        dims,
        coords,
        attrs,
    )
    .with_vertical_attrs(vcoord.attrs.clone())
}

/// Coordinates of an equally spaced grid, `x0 + i * dx` for `i` in `0..n`.
///
/// Values are rounded to 6 decimal places since GRIB stores grid coordinates as integer
/// micro-degrees.
pub fn grid_coords(n: usize, x0: f64, dx: f64) -> Vec<f64> {
    (0..n)
        .map(|i| x0 + i as f64 * dx)
        .map(|x| (x * 1.0e6).round() / 1.0e6)
        .collect()
}
