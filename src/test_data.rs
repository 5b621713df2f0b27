//! Synthetic fields for unit tests.
use crate::field::{Field, FieldAttrs, Parameter};
use ndarray::{ArrayD, IxDyn};

/// A single column on full model levels, values listed top to bottom, dims `z, y, x`.
pub fn column_field(values: &[f64]) -> Field {
    let n = values.len();
    let data = ArrayD::from_shape_vec(IxDyn(&[n, 1, 1]), values.to_vec()).unwrap();

    Field::new(data, vec!["z", "y", "x"])
        .unwrap()
        .with_coord("z", (1..=n).map(|k| k as f64).collect())
        .unwrap()
}

/// A single column on half model levels, values listed top to bottom.
pub fn half_level_field(values: &[f64]) -> Field {
    column_field(values).with_attrs(FieldAttrs::half_level(Parameter::new(
        "HHL",
        "Geometric height of half levels",
        "m",
    )))
}

/// A single grid point surface field with dims `y, x`.
pub fn surface_field(value: f64) -> Field {
    let data = ArrayD::from_elem(IxDyn(&[1, 1]), value);
    Field::new(data, vec!["y", "x"]).unwrap()
}

/// Columns side by side along `x`, each given top to bottom, all of the same length.
pub fn columns_field(columns: &[&[f64]]) -> Field {
    let nx = columns.len();
    let nz = columns[0].len();
    let data = ArrayD::from_shape_fn(IxDyn(&[nz, 1, nx]), |ix| columns[ix[2]][ix[0]]);

    Field::new(data, vec!["z", "y", "x"]).unwrap()
}

/// Half level heights of an evenly spaced column, top to bottom, above the given ground height.
pub fn even_hhl(nlevels: usize, dz: f64, ground: f64) -> Field {
    let values: Vec<f64> = (0..=nlevels)
        .rev()
        .map(|k| ground + k as f64 * dz)
        .collect();
    half_level_field(&values)
}
