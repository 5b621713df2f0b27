//! Derived thermodynamic quantities.
//!
//! All functions work point by point on fields sharing one grid, except the Bulk Richardson
//! Number which needs whole columns. Pressure is in Pa, temperature in K, and specific humidity
//! is dimensionless.
use crate::{
    constants::{b1, b2w, b3, b4w, g, rdocp, rdv, R_d, R_v, P0},
    destagger::destagger,
    error::{AnalysisError, Result},
    field::{Field, Parameter},
    keys::{Dimension, Phase},
    utility::warn_if_missing,
};
use ndarray::{ArrayD, Zip};
use tracing::debug;

/// Potential temperature in K, short name `PT`.
pub fn potential_temperature(p: &Field, t: &Field) -> Result<Field> {
    debug!(shape = ?t.shape(), "potential_temperature");

    let pt = p.zip_with(t, theta)?;
    Ok(derived(
        pt,
        p,
        Parameter::new("PT", "Potential temperature", "K"),
    ))
}

/// Virtual potential temperature in K, short name `THETA_V`.
pub fn virtual_potential_temperature(p: &Field, t: &Field, qv: &Field) -> Result<Field> {
    debug!(shape = ?t.shape(), "virtual_potential_temperature");

    p.check_same_grid(t)?;
    p.check_same_grid(qv)?;

    let mut out = ArrayD::from_elem(p.data().raw_dim(), f64::NAN);
    Zip::from(&mut out)
        .and(p.data())
        .and(t.data())
        .and(qv.data())
        .for_each(|o, &p, &t, &qv| *o = theta_v(p, t, qv));

    Ok(derived(
        p.with_data(out),
        p,
        Parameter::new("THETA_V", "Virtual potential temperature", "K"),
    ))
}

/// Relative humidity in %, short name `RELHUM`.
///
/// The saturation vapour pressure follows Tetens's formula over water. Values are clipped below
/// at 0 and, with `clipping`, above at 100.
///
/// # Errors
///
/// * `NotImplemented` for saturation over ice or mixed phase.
/// * `InvalidInput` if the fields are not on the same grid.
pub fn relative_humidity(
    qv: &Field,
    t: &Field,
    p: &Field,
    clipping: bool,
    phase: Phase,
) -> Result<Field> {
    debug!(clipping, phase = phase.name(), shape = ?t.shape(), "relative_humidity");

    if phase != Phase::Water {
        return Err(AnalysisError::NotImplemented(
            "relative humidity is only available over water",
        ));
    }
    t.check_same_grid(qv)?;
    t.check_same_grid(p)?;

    let upper = if clipping { 100.0 } else { f64::INFINITY };

    let mut out = ArrayD::from_elem(t.data().raw_dim(), f64::NAN);
    Zip::from(&mut out)
        .and(qv.data())
        .and(t.data())
        .and(p.data())
        .for_each(|o, &qv, &t, &p| {
            let rh = 100.0 * qv / qv_from_vapour_pressure(saturation_vapour_pressure(t), p);
            // NaN passes through the clipping
            *o = if rh < 0.0 {
                0.0
            } else if rh > upper {
                upper
            } else {
                rh
            };
        });

    Ok(derived(
        t.with_data(out),
        t,
        Parameter::new("RELHUM", "Relative humidity", "%"),
    ))
}

/// Bulk Richardson Number on full model levels, short name `BRN`.
///
/// `u` and `v` may be on the staggered grid, `hhl` is the height of the model level interfaces
/// and `hsurf` the surface height, both in m above mean sea level. Level `k` compares the
/// virtual potential temperature at `k` to its mean over the levels from `k` down to the lowest
/// level.
///
/// # Errors
///
/// * `IncompatibleLevelType` if `hhl` is not on model level interfaces.
/// * `InvalidInput` if the grids do not match.
pub fn bulk_richardson_number(
    p: &Field,
    t: &Field,
    qv: &Field,
    u: &Field,
    v: &Field,
    hhl: &Field,
    hsurf: &Field,
) -> Result<Field> {
    debug!(shape = ?p.shape(), "bulk_richardson_number");

    let thv = virtual_potential_temperature(p, t, qv)?;
    let u = destagger_if_needed(u, Dimension::X)?;
    let v = destagger_if_needed(v, Dimension::Y)?;
    let hfl = destagger(hhl, Dimension::Z)?;

    p.check_same_grid(&u)?;
    p.check_same_grid(&v)?;
    p.check_same_grid(&hfl)?;
    p.check_horizontal_grid(hsurf)?;

    let ax = p.vertical_axis()?;
    let mut out = ArrayD::from_elem(p.data().raw_dim(), f64::NAN);

    Zip::from(out.lanes_mut(ax))
        .and(thv.data().lanes(ax))
        .and(hfl.data().lanes(ax))
        .and(u.data().lanes(ax))
        .and(v.data().lanes(ax))
        .and(hsurf.data())
        .for_each(|mut brn, thv, hfl, u, v, &hsurf| {
            let n = thv.len();
            if n == 0 {
                return;
            }
            let thv_lowest = thv[n - 1];

            // Running sum from the lowest level up
            let mut thv_sum = 0.0;
            for k in (0..n).rev() {
                thv_sum += thv[k];
                let n_below = (n - k) as f64;
                brn[k] = g * (hfl[k] - hsurf) * (thv[k] - thv_lowest) * n_below
                    / (thv_sum * (u[k] * u[k] + v[k] * v[k]));
            }
        });

    let out = derived(
        p.with_data(out),
        p,
        Parameter::new("BRN", "Bulk Richardson number", "1"),
    );
    warn_if_missing("bulk_richardson_number", &out);
    Ok(out)
}

fn destagger_if_needed(field: &Field, dim: Dimension) -> Result<Field> {
    let origin = match dim {
        Dimension::X => field.attrs().origin_x,
        _ => field.attrs().origin_y,
    };

    if origin == 0.0 {
        Ok(field.clone())
    } else {
        destagger(field, dim)
    }
}

// Replace the parameter of a derived field, everything else comes from `template`.
fn derived(mut field: Field, template: &Field, parameter: Parameter) -> Field {
    let mut attrs = template.attrs().clone();
    attrs.parameter = parameter;
    field.set_attrs(attrs);
    field
}

#[inline]
fn theta(p: f64, t: f64) -> f64 {
    (P0 / p).powf(rdocp) * t
}

#[inline]
fn theta_v(p: f64, t: f64, qv: f64) -> f64 {
    theta(p, t) * (1.0 + (R_v / R_d - 1.0) * qv / (1.0 - qv))
}

/// Saturation vapour pressure over water in Pa.
#[inline]
fn saturation_vapour_pressure(t: f64) -> f64 {
    b1 * (b2w * (t - b3) / (t - b4w)).exp()
}

/// Specific humidity for a given vapour pressure and pressure.
#[inline]
fn qv_from_vapour_pressure(pv: f64, p: f64) -> f64 {
    rdv * pv / (p - (1.0 - rdv) * pv).max(1.0)
}
