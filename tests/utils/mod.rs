#![allow(dead_code)]

use field_analysis::{Field, FieldAttrs, LevelType, Parameter};
use ndarray::{ArrayD, IxDyn};

pub const NX: usize = 4;
pub const NY: usize = 3;

/// Standard atmosphere lapse rate
const LAPSE: f64 = 0.0065;
const T_MSL: f64 = 288.15;
const P_MSL: f64 = 101_325.0;
const EXPONENT: f64 = 5.255_877;

/// Log operator calls while running the tests, filtered by `RUST_LOG`.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn approx_equal(val1: f64, val2: f64, eps: f64) -> bool {
    assert!(eps > 0.0);
    (val1 - val2).abs() < eps
}

/// A 3D field with dims `z, y, x`, values from a function of level, row and column.
pub fn grid_field<F>(nz: usize, f: F) -> Field
where
    F: Fn(usize, usize, usize) -> f64,
{
    let data = ArrayD::from_shape_fn(IxDyn(&[nz, NY, NX]), |ix| f(ix[0], ix[1], ix[2]));
    Field::new(data, vec!["z", "y", "x"])
        .unwrap()
        .with_coord("z", (1..=nz).map(|k| k as f64).collect())
        .unwrap()
}

/// A 2D field with dims `y, x`.
pub fn surface_field<F>(f: F) -> Field
where
    F: Fn(usize, usize) -> f64,
{
    let data = ArrayD::from_shape_fn(IxDyn(&[NY, NX]), |ix| f(ix[0], ix[1]));
    Field::new(data, vec!["y", "x"]).unwrap()
}

pub fn constant_surface(value: f64) -> Field {
    surface_field(|_, _| value)
}

/// A single column with dims `z, y, x`, values top to bottom.
pub fn column(values: &[f64]) -> Field {
    let n = values.len();
    let data = ArrayD::from_shape_vec(IxDyn(&[n, 1, 1]), values.to_vec()).unwrap();
    Field::new(data, vec!["z", "y", "x"]).unwrap()
}

pub fn full_level(field: Field, short_name: &str, units: &str) -> Field {
    field.with_attrs(FieldAttrs::model_level(Parameter::new(
        short_name, short_name, units,
    )))
}

/// Model atmosphere on evenly spaced levels over a terrain sloping along x.
pub struct Atmosphere {
    pub nlevels: usize,
    pub hsurf: Field,
    pub hhl: Field,
    pub hfl: Field,
    pub t: Field,
    pub p: Field,
    pub qv: Field,
}

pub fn terrain_height(i: usize) -> f64 {
    100.0 * i as f64
}

pub fn standard_temperature(h: f64) -> f64 {
    T_MSL - LAPSE * h
}

pub fn standard_pressure(h: f64) -> f64 {
    P_MSL * (standard_temperature(h) / T_MSL).powf(EXPONENT)
}

impl Atmosphere {
    /// `nlevels` layers of thickness `dz` above the terrain.
    pub fn new(nlevels: usize, dz: f64) -> Self {
        let interface = move |k: usize, i: usize| terrain_height(i) + (nlevels - k) as f64 * dz;
        let mid = move |k: usize, i: usize| 0.5 * (interface(k, i) + interface(k + 1, i));

        let hhl = grid_field(nlevels + 1, |k, _, i| interface(k, i)).with_attrs(
            FieldAttrs::half_level(Parameter::new("HHL", "Geometric height", "m")),
        );
        let hfl = full_level(grid_field(nlevels, |k, _, i| mid(k, i)), "HFL", "m");
        let t = full_level(
            grid_field(nlevels, |k, _, i| standard_temperature(mid(k, i))),
            "T",
            "K",
        );
        let p = full_level(
            grid_field(nlevels, |k, _, i| standard_pressure(mid(k, i))),
            "P",
            "Pa",
        );
        let qv = full_level(
            grid_field(nlevels, |k, _, i| 0.01 * (-mid(k, i) / 2500.0).exp()),
            "QV",
            "kg kg-1",
        );
        let hsurf = surface_field(|_, i| terrain_height(i)).with_attrs(FieldAttrs {
            level_type: LevelType::Surface,
            ..FieldAttrs::model_level(Parameter::new("HSURF", "Surface height", "m"))
        });

        Atmosphere {
            nlevels,
            hsurf,
            hhl,
            hfl,
            t,
            p,
            qv,
        }
    }
}
