//! Find the height of significant levels in each column.
use crate::{
    destagger::destagger,
    error::{AnalysisError, Result},
    field::{Field, LevelType},
    keys::Dimension,
    utility::warn_if_missing,
};
use itertools::Itertools;
use metfor::{Kelvin, Quantity, FREEZING};
use ndarray::{ArrayD, ArrayView1, Zip};
use optional::{none, some, Optioned};
use tracing::debug;

/// Height of the 0°C isotherm in m above mean sea level.
///
/// `t` is the temperature in K on full model levels and `hhl` the height of the model level
/// interfaces. The search runs from the top of the model down, and where the temperature goes
/// above freezing more than once the highest crossing is used.
///
/// With `extrapolate`, columns that are below freezing everywhere but warm towards the ground are
/// extrapolated linearly from the two lowest levels. Heights at or below mean sea level are
/// reported as missing. The output is a surface field with short name `HZEROCL`.
///
/// # Errors
///
/// * `IncompatibleLevelType` unless `t` is on full and `hhl` on half model levels.
/// * `InvalidInput` if the grids do not match.
pub fn zero_degree_isotherm_height(t: &Field, hhl: &Field, extrapolate: bool) -> Result<Field> {
    debug!(extrapolate, shape = ?t.shape(), "zero_degree_isotherm_height");

    if !t.is_model_level(0.0) {
        return Err(AnalysisError::IncompatibleLevelType(
            "temperature must be defined on full model levels",
        ));
    }

    // Checks the staggering of hhl
    let hfl = destagger(hhl, Dimension::Z)?;
    t.check_same_grid(&hfl)?;

    let ax = t.vertical_axis()?;
    let t0 = Kelvin::from(FREEZING).unpack();

    let mut out = ArrayD::from_elem(t.data().index_axis(ax, 0).raw_dim(), f64::NAN);
    Zip::from(&mut out)
        .and(t.data().lanes(ax))
        .and(hfl.data().lanes(ax))
        .for_each(|o, t, h| {
            *o = column_isotherm(t, h, t0, extrapolate)
                .into_option()
                .filter(|&height| height > 0.0)
                .unwrap_or(f64::NAN);
        });

    let attrs = t
        .attrs()
        .with_short_name("HZEROCL")
        .with_level_type(LevelType::Surface);
    let mut out = t.without_vertical(out);
    out.set_attrs(attrs);

    warn_if_missing("zero_degree_isotherm_height", &out);
    Ok(out)
}

fn column_isotherm(
    t: ArrayView1<f64>,
    h: ArrayView1<f64>,
    t0: f64,
    extrapolate: bool,
) -> Optioned<f64> {
    let n = t.len();

    let crossing = (0..n)
        .tuple_windows::<(_, _)>()
        // Warm below a cold level
        .filter(|&(k_above, k)| t[k] >= t0 && t[k_above] < t0)
        .filter(|&(_, k)| !h[k].is_nan())
        .fold(None, |best: Option<usize>, (_, k)| match best {
            Some(b) if h[b] >= h[k] => Some(b),
            _ => Some(k),
        });

    let k = match crossing {
        Some(k) => k,
        None if extrapolate && n >= 2 => {
            let all_cold = t.iter().all(|&tk| tk < t0);
            let warming_down = t[n - 1] - t[n - 2] > 1.0e-10;
            if all_cold && warming_down {
                n - 1
            } else {
                return none();
            }
        }
        None => return none(),
    };

    let (h1, h2) = (h[k - 1], h[k]);
    let (t1, t2) = (t[k - 1], t[k]);
    some(h1 + (h2 - h1) * (t0 - t1) / (t2 - t1))
}
