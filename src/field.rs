//! Data type and methods to store a gridded field of model output.

use crate::{
    error::{AnalysisError, Result},
    support::TargetCoordinatesAttrs,
};
use ndarray::{ArrayD, Axis, Zip};
use std::collections::HashMap;

pub use self::attributes::{FieldAttrs, LevelType, Parameter, VectorReference};

mod attributes;

/// Name of the vertical model level axis.
pub const VERTICAL_DIM: &str = "z";

/// A labeled multi-dimensional array of model output.
///
/// Each axis of the data array has a name. The model level axis is always called `"z"`, with
/// index 0 at the top of the atmosphere. The horizontal axes are usually `"y"` and `"x"`, and any
/// other axes (ensemble members, lead times) are carried along untouched by the operators.
///
/// Missing values are stored as NaN.
#[derive(Clone, Debug)]
pub struct Field {
    // Optional variable name, passed through operators.
    name: Option<String>,

    data: ArrayD<f64>,
    dims: Vec<String>,

    // 1-D coordinates by axis name, not every axis needs one.
    coords: HashMap<String, Vec<f64>>,

    attrs: FieldAttrs,
    // Attributes of the vertical axis when it is a target coordinate of an interpolation.
    vertical_attrs: Option<TargetCoordinatesAttrs>,
}

impl Field {
    /// Create a new field from a data array and one name per axis.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use field_analysis::Field;
    /// use ndarray::ArrayD;
    ///
    /// let data = ArrayD::from_elem(vec![3, 2, 2], 280.0);
    /// let fld = Field::new(data, vec!["z", "y", "x"]).unwrap();
    /// assert_eq!(fld.shape(), &[3, 2, 2]);
    ///
    /// let bad = Field::new(ArrayD::from_elem(vec![3, 2], 0.0), vec!["z", "y", "x"]);
    /// assert!(bad.is_err());
    /// ```
    pub fn new<D, S>(data: ArrayD<f64>, dims: D) -> Result<Self>
    where
        D: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let dims: Vec<String> = dims.into_iter().map(Into::into).collect();

        if dims.len() != data.ndim() {
            return Err(AnalysisError::InvalidInput(
                "number of dimension names does not match array rank",
            ));
        }

        for (i, dim) in dims.iter().enumerate() {
            if dims[..i].contains(dim) {
                return Err(AnalysisError::InvalidInput("duplicate dimension name"));
            }
        }

        Ok(Field {
            name: None,
            data,
            dims,
            coords: HashMap::new(),
            attrs: FieldAttrs::default(),
            vertical_attrs: None,
        })
    }

    /// Builder function for setting the coordinate values of an axis.
    pub fn with_coord<S: Into<String>>(mut self, dim: S, values: Vec<f64>) -> Result<Self> {
        let dim = dim.into();
        let ax = self
            .axis(&dim)
            .ok_or(AnalysisError::InvalidInput("coordinate for unknown dimension"))?;

        if self.data.len_of(ax) != values.len() {
            return Err(AnalysisError::InvalidInput(
                "coordinate length does not match dimension size",
            ));
        }

        self.coords.insert(dim, values);
        Ok(self)
    }

    /// Builder function for setting the metadata.
    #[inline]
    pub fn with_attrs(self, attrs: FieldAttrs) -> Self {
        Field { attrs, ..self }
    }

    /// Builder function for setting the variable name.
    #[inline]
    pub fn with_name<S>(mut self, name: S) -> Self
    where
        Option<String>: From<S>,
    {
        self.name = Option::from(name);
        self
    }

    /// Builder function for setting the attributes of the vertical axis.
    #[inline]
    pub fn with_vertical_attrs(self, vertical_attrs: TargetCoordinatesAttrs) -> Self {
        Field {
            vertical_attrs: Some(vertical_attrs),
            ..self
        }
    }

    /// Variable name, if any.
    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The data array.
    #[inline]
    pub fn data(&self) -> &ArrayD<f64> {
        &self.data
    }

    /// Consume the field and keep only the data array.
    #[inline]
    pub fn into_data(self) -> ArrayD<f64> {
        self.data
    }

    /// Axis names, in array order.
    #[inline]
    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    /// Size of each axis.
    #[inline]
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// Coordinate values of an axis, if they were set.
    #[inline]
    pub fn coord(&self, dim: &str) -> Option<&[f64]> {
        self.coords.get(dim).map(|c| c.as_slice())
    }

    /// Metadata of the field.
    #[inline]
    pub fn attrs(&self) -> &FieldAttrs {
        &self.attrs
    }

    /// Attributes of the vertical axis, set on the output of the interpolation operators.
    #[inline]
    pub fn vertical_attrs(&self) -> Option<&TargetCoordinatesAttrs> {
        self.vertical_attrs.as_ref()
    }

    /// Shorthand for the vertical level type.
    #[inline]
    pub fn level_type(&self) -> &LevelType {
        &self.attrs.level_type
    }

    /// Shorthand for the vertical staggering offset.
    #[inline]
    pub fn origin_z(&self) -> f64 {
        self.attrs.origin_z
    }

    /// Look up the array axis for a dimension name.
    #[inline]
    pub fn axis(&self, dim: &str) -> Option<Axis> {
        self.dims.iter().position(|d| d == dim).map(Axis)
    }

    /// The model level axis.
    pub fn vertical_axis(&self) -> Result<Axis> {
        self.axis(VERTICAL_DIM)
            .ok_or(AnalysisError::InvalidInput("field has no vertical dimension"))
    }

    /// Number of vertical levels, 0 if the field has no vertical axis.
    pub fn num_levels(&self) -> usize {
        self.axis(VERTICAL_DIM)
            .map(|ax| self.data.len_of(ax))
            .unwrap_or(0)
    }

    /// Whether the field is on model levels with the given staggering.
    pub fn is_model_level(&self, origin_z: f64) -> bool {
        self.attrs.level_type == LevelType::ModelLevel && self.attrs.origin_z == origin_z
    }

    /// Number of grid points with a missing value.
    pub fn count_missing(&self) -> usize {
        self.data.iter().filter(|v| v.is_nan()).count()
    }

    /// Extract a single vertical level as a field without a vertical axis.
    ///
    /// Negative indexes count from the bottom of the column, so `-1` is the lowest level.
    pub fn select_level(&self, level: isize) -> Result<Field> {
        let ax = self.vertical_axis()?;
        let n = self.data.len_of(ax) as isize;
        let k = if level < 0 { n + level } else { level };
        if k < 0 || k >= n {
            return Err(AnalysisError::InvalidInput("level index out of range"));
        }

        Ok(self.without_vertical(self.data.index_axis(ax, k as usize).to_owned()))
    }

    /// Check that another field has exactly the same dimensions and shape as this one.
    pub fn check_same_grid(&self, other: &Field) -> Result<()> {
        if self.dims != other.dims || self.shape() != other.shape() {
            Err(AnalysisError::InvalidInput(
                "fields must have the same dimensions and shape",
            ))
        } else {
            Ok(())
        }
    }

    /// Check that `other` has the dimensions and shape of this field without its vertical axis.
    pub fn check_horizontal_grid(&self, other: &Field) -> Result<()> {
        let ax = self.vertical_axis()?;

        let same_dims = self
            .dims
            .iter()
            .filter(|d| *d != VERTICAL_DIM)
            .eq(other.dims.iter());
        let same_shape = self
            .shape()
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != ax.index())
            .map(|(_, s)| s)
            .eq(other.shape().iter());

        if same_dims && same_shape {
            Ok(())
        } else {
            Err(AnalysisError::InvalidInput(
                "field must match the horizontal grid of the reduced field",
            ))
        }
    }

    /// Apply a function to every value, keeping the grid and metadata.
    pub fn map<F>(&self, f: F) -> Field
    where
        F: Fn(f64) -> f64,
    {
        self.with_data(self.data.mapv(f))
    }

    /// Combine this field with another on the same grid point by point.
    pub fn zip_with<F>(&self, other: &Field, f: F) -> Result<Field>
    where
        F: Fn(f64, f64) -> f64,
    {
        self.check_same_grid(other)?;

        let mut out = ArrayD::from_elem(self.data.raw_dim(), f64::NAN);
        Zip::from(&mut out)
            .and(&self.data)
            .and(&other.data)
            .for_each(|o, &a, &b| *o = f(a, b));

        Ok(self.with_data(out))
    }

    /// A copy of this field with new data of the same shape.
    pub(crate) fn with_data(&self, data: ArrayD<f64>) -> Field {
        debug_assert_eq!(data.shape(), self.shape());
        Field {
            name: self.name.clone(),
            data,
            dims: self.dims.clone(),
            coords: self.coords.clone(),
            attrs: self.attrs.clone(),
            vertical_attrs: self.vertical_attrs.clone(),
        }
    }

    /// A copy of this field with the vertical axis removed, `data` must have the remaining shape.
    pub(crate) fn without_vertical(&self, data: ArrayD<f64>) -> Field {
        let dims: Vec<String> = self
            .dims
            .iter()
            .filter(|d| *d != VERTICAL_DIM)
            .cloned()
            .collect();
        debug_assert_eq!(dims.len(), data.ndim());

        let coords = self
            .coords
            .iter()
            .filter(|(d, _)| *d != VERTICAL_DIM)
            .map(|(d, c)| (d.clone(), c.clone()))
            .collect();

        Field {
            name: self.name.clone(),
            data,
            dims,
            coords,
            attrs: self.attrs.clone(),
            vertical_attrs: None,
        }
    }

    /// Assemble a field from parts that are already known to be consistent.
    pub(crate) fn from_parts(
        template: &Field,
        data: ArrayD<f64>,
        dims: Vec<String>,
        coords: HashMap<String, Vec<f64>>,
        attrs: FieldAttrs,
    ) -> Field {
        debug_assert_eq!(dims.len(), data.ndim());
        Field {
            name: template.name.clone(),
            data,
            dims,
            coords,
            attrs,
            vertical_attrs: None,
        }
    }

    pub(crate) fn coords(&self) -> &HashMap<String, Vec<f64>> {
        &self.coords
    }

    pub(crate) fn set_attrs(&mut self, attrs: FieldAttrs) {
        self.attrs = attrs;
    }
}
