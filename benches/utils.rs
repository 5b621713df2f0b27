#![allow(dead_code)]
use field_analysis::{Field, FieldAttrs, LevelType, Parameter};
use ndarray::{ArrayD, IxDyn};

pub const NX: usize = 120;
pub const NY: usize = 100;
pub const NZ: usize = 60;

/// Synthetic model atmosphere, standard lapse rate over hilly terrain.
pub struct Model {
    pub hsurf: Field,
    pub hhl: Field,
    pub hfl: Field,
    pub t: Field,
    pub p: Field,
    pub theta: Field,
}

fn terrain(j: usize, i: usize) -> f64 {
    800.0 + 600.0 * ((i as f64 / 15.0).sin() * (j as f64 / 20.0).cos())
}

// Layers thicken towards the top
fn interface(k: usize, j: usize, i: usize) -> f64 {
    let s = (NZ - k) as f64 / NZ as f64;
    terrain(j, i) + 22_000.0 * s * s
}

fn field<F>(nz: usize, f: F, parameter: Parameter, half: bool) -> Field
where
    F: Fn(usize, usize, usize) -> f64,
{
    let data = ArrayD::from_shape_fn(IxDyn(&[nz, NY, NX]), |ix| f(ix[0], ix[1], ix[2]));
    let attrs = if half {
        FieldAttrs::half_level(parameter)
    } else {
        FieldAttrs::model_level(parameter)
    };
    Field::new(data, vec!["z", "y", "x"])
        .expect("bad field")
        .with_attrs(attrs)
}

impl Model {
    pub fn new() -> Self {
        let mid = |k, j, i| 0.5 * (interface(k, j, i) + interface(k + 1, j, i));
        let temperature = |h: f64| (288.15 - 0.0065 * h).max(216.65);
        let pressure = |h: f64| 101_325.0 * (-h / 8000.0).exp();

        let hhl = field(NZ + 1, interface, Parameter::new("HHL", "Height", "m"), true);
        let hfl = field(NZ, mid, Parameter::new("HFL", "Height", "m"), false);
        let t = field(
            NZ,
            |k, j, i| temperature(mid(k, j, i)),
            Parameter::new("T", "Temperature", "K"),
            false,
        );
        let p = field(
            NZ,
            |k, j, i| pressure(mid(k, j, i)),
            Parameter::new("P", "Pressure", "Pa"),
            false,
        );
        let theta = field(
            NZ,
            |k, j, i| {
                let h = mid(k, j, i);
                temperature(h) * (1.0e5 / pressure(h)).powf(0.2857)
            },
            Parameter::new("PT", "Potential temperature", "K"),
            false,
        );

        let data = ArrayD::from_shape_fn(IxDyn(&[NY, NX]), |ix| terrain(ix[0], ix[1]));
        let hsurf = Field::new(data, vec!["y", "x"])
            .expect("bad field")
            .with_attrs(FieldAttrs::surface(Parameter::new("HSURF", "Surface height", "m")));
        assert_eq!(hsurf.level_type(), &LevelType::Surface);

        Model {
            hsurf,
            hhl,
            hfl,
            t,
            p,
            theta,
        }
    }
}
