//! Reduce fields on model levels over a height interval.
//!
//! Heights decrease with the level index, level 0 being the top of the model. The interval is
//! given per column by a pair of bound fields, see [`HeightBounds`].
use crate::{
    destagger::destagger,
    error::{AnalysisError, Result},
    field::Field,
    keys::{Dimension, ExtremumOperator, HeightIntervalMode, IntegralOperator},
    utility::{fold_extremum, warn_if_missing},
};
use itertools::Itertools;
use ndarray::{ArrayD, ArrayView1, Axis, Zip};
use optional::{none, some, Optioned};
use tracing::debug;

pub use self::bounds::HeightBounds;

mod bounds;

/// Maximum or minimum of a field over a height interval.
///
/// `height` is the height above mean sea level of the levels of `field` and must be on the same
/// levels. The extremum at a grid point is taken over the levels inside the interval and the
/// values linearly extrapolated to the interval bounds from the levels straddling them. Grid
/// points with no such values are NaN.
///
/// # Errors
///
/// * `MissingRequiredInput` if `mode` needs the surface height and `hsurf` is `None`.
/// * `NotImplemented` for modes other than `Z2Z`.
/// * `IncompatibleLevelType` if `field` and `height` are not on the same levels.
/// * `InvalidInput` if the grids of the inputs do not match.
pub fn minmax_k(
    field: &Field,
    operator: ExtremumOperator,
    mode: HeightIntervalMode,
    height: &Field,
    h_bounds: HeightBounds,
    hsurf: Option<&Field>,
) -> Result<Field> {
    debug!(
        operator = operator.name(),
        mode = mode.name(),
        shape = ?field.shape(),
        "minmax_k"
    );

    HeightBounds::check_mode(mode, hsurf)?;

    if field.level_type() != height.level_type() || field.origin_z() != height.origin_z() {
        return Err(AnalysisError::IncompatibleLevelType(
            "field and height must be defined on the same levels",
        ));
    }
    field.check_same_grid(height)?;
    h_bounds.check_grid(field, hsurf)?;

    let ax = field.vertical_axis()?;
    let (h_bottom, h_top) = h_bounds.amsl();

    let mut out = reduced_array(field, ax);
    Zip::from(&mut out)
        .and(field.data().lanes(ax))
        .and(height.data().lanes(ax))
        .and(&h_bottom)
        .and(&h_top)
        .for_each(|o, f, h, &bottom, &top| {
            *o = column_extremum(f, h, bottom, top, operator)
                .into_option()
                .unwrap_or(f64::NAN);
        });

    let out = field.without_vertical(out);
    warn_if_missing("minmax_k", &out);
    Ok(out)
}

/// Integral of a field over a height interval.
///
/// `height` is the height above mean sea level of the model level interfaces. `field` may be on
/// the interfaces as well, in which case it is destaggered first. The integral sums the layers
/// whose mid point lies inside the interval, weighted by their thickness clipped to the
/// interval. Missing values in the field do not contribute, and grid points with no valid layer
/// inside the interval are NaN.
///
/// # Errors
///
/// * `MissingRequiredInput` if `mode` needs the surface height and `hsurf` is `None`.
/// * `NotImplemented` for modes other than `Z2Z`.
/// * `IncompatibleLevelType` unless `field` is on full or half model levels and `height` on model
///   level interfaces.
/// * `InvalidInput` if the grids of the inputs do not match.
pub fn integrate_k(
    field: &Field,
    operator: IntegralOperator,
    mode: HeightIntervalMode,
    height: &Field,
    h_bounds: HeightBounds,
    hsurf: Option<&Field>,
) -> Result<Field> {
    debug!(
        operator = operator.name(),
        mode = mode.name(),
        shape = ?field.shape(),
        "integrate_k"
    );

    HeightBounds::check_mode(mode, hsurf)?;

    let on_interfaces = field.is_model_level(-0.5);
    if !(field.is_model_level(0.0) || on_interfaces) || !height.is_model_level(-0.5) {
        return Err(AnalysisError::IncompatibleLevelType(
            "field must be on model levels and height on model level interfaces",
        ));
    }

    check_interfaces(field, height, on_interfaces)?;
    h_bounds.check_grid(field, hsurf)?;

    let destaggered;
    let field = if on_interfaces {
        destaggered = destagger(field, Dimension::Z)?;
        &destaggered
    } else {
        field
    };

    let ax = field.vertical_axis()?;
    let (h_bottom, h_top) = h_bounds.amsl();

    let mut out = reduced_array(field, ax);
    Zip::from(&mut out)
        .and(field.data().lanes(ax))
        .and(height.data().lanes(ax))
        .and(&h_bottom)
        .and(&h_top)
        .for_each(|o, f, hhl, &bottom, &top| {
            let integral = column_integral(f, hhl, bottom, top);
            *o = match operator {
                IntegralOperator::Integral => integral,
                IntegralOperator::NormedIntegral => integral.map_t(|val| val / (top - bottom)),
            }
            .into_option()
            .unwrap_or(f64::NAN);
        });

    let out = field.without_vertical(out);
    warn_if_missing("integrate_k", &out);
    Ok(out)
}

fn reduced_array(field: &Field, ax: Axis) -> ArrayD<f64> {
    ArrayD::from_elem(field.data().index_axis(ax, 0).raw_dim(), f64::NAN)
}

// Interfaces have the dims of the field and one more level, unless the field is on the
// interfaces itself.
fn check_interfaces(field: &Field, height: &Field, on_interfaces: bool) -> Result<()> {
    let ax = field.vertical_axis()?;
    let extra = if on_interfaces { 0 } else { 1 };
    let matches = field.dims() == height.dims()
        && field
            .shape()
            .iter()
            .zip(height.shape())
            .enumerate()
            .all(|(i, (&nf, &nh))| {
                if i == ax.index() {
                    nh == nf + extra
                } else {
                    nh == nf
                }
            });

    if matches {
        Ok(())
    } else {
        Err(AnalysisError::InvalidInput(
            "height must be on the interfaces of the levels of the field",
        ))
    }
}

/// Extremum of one column over `[bottom, top]`, including the values extrapolated to the bounds.
fn column_extremum(
    f: ArrayView1<f64>,
    h: ArrayView1<f64>,
    bottom: f64,
    top: f64,
    operator: ExtremumOperator,
) -> Optioned<f64> {
    let n = f.len();

    let in_bounds = (0..n)
        .filter(|&k| h[k] >= bottom && h[k] <= top)
        .map(|k| f[k]);

    // Pairs of adjacent levels, (upper, lower).
    let pairs = || (0..n).tuple_windows::<(_, _)>();
    let gradient = |k0: usize, k1: usize| (f[k0] - f[k1]) / (h[k0] - h[k1]);

    let at_top = pairs()
        .filter(|&(k, kb)| h[k] > top && h[kb] < top)
        .map(|(k, kb)| f[k] + gradient(k, kb) * (top - h[k]));

    // Extrapolate from the lowest level above the bottom bound using the gradient of the layer
    // above it.
    let at_bottom = pairs()
        .filter(|&(k, kb)| k > 0 && h[kb] < bottom && h[k] > bottom)
        .map(|(k, _)| f[k] + gradient(k - 1, k) * (bottom - h[k]));

    let pick: fn(f64, f64) -> bool = match operator {
        ExtremumOperator::Maximum => |a: f64, b: f64| a > b,
        ExtremumOperator::Minimum => |a: f64, b: f64| a < b,
    };

    in_bounds
        .chain(at_top)
        .chain(at_bottom)
        .fold(None, |acc, val| fold_extremum(acc, val, pick))
        .map_or_else(none, some)
}

/// Integral of one column over `[bottom, top]`, `hhl` are the interface heights.
fn column_integral(
    f: ArrayView1<f64>,
    hhl: ArrayView1<f64>,
    bottom: f64,
    top: f64,
) -> Optioned<f64> {
    hhl.iter()
        .tuple_windows::<(_, _)>()
        .zip(f.iter())
        // Only layers with the mid point inside the interval
        .filter(|&((&h_above, &h_below), _)| {
            let hfl = 0.5 * (h_above + h_below);
            hfl >= bottom && hfl <= top
        })
        // Missing values do not count
        .filter(|&(_, f)| !f.is_nan())
        // Clip the layer to the interval
        .map(|((&h_above, &h_below), &f)| f * (h_above.min(top) - h_below.max(bottom)))
        .fold(none(), |acc: Optioned<f64>, val| {
            some(acc.into_option().unwrap_or(0.0) + val)
        })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        field::{FieldAttrs, LevelType, Parameter},
        test_data::{column_field, columns_field, even_hhl, half_level_field, surface_field},
        utility::test_tools::approx_equal,
    };

    fn bounds(bottom: f64, top: f64) -> (Field, Field) {
        (surface_field(bottom), surface_field(top))
    }

    fn heights() -> Field {
        column_field(&[4000.0, 3000.0, 2000.0, 1000.0, 0.0])
    }

    fn values() -> Field {
        column_field(&[-20.0, -10.0, 5.0, 10.0, 12.0])
    }

    fn extremum(operator: ExtremumOperator, hb: HeightBounds) -> Field {
        minmax_k(&values(), operator, HeightIntervalMode::Z2Z, &heights(), hb, None).unwrap()
    }

    fn integral(
        f: &Field,
        operator: IntegralOperator,
        hhl: &Field,
        hb: HeightBounds,
    ) -> Result<Field> {
        integrate_k(f, operator, HeightIntervalMode::Z2Z, hhl, hb, None)
    }

    #[test]
    fn test_minmax_in_bounds() {
        let (b, t) = bounds(500.0, 3500.0);
        let hb = HeightBounds::new(&b, &t);

        // Extrapolated from level 0 down to the top bound: -20 + (-10 / 1000) * -500
        let min = extremum(ExtremumOperator::Minimum, hb);
        assert!(approx_equal(min.data()[[0, 0]], -15.0, 1.0e-10));

        // Bottom extrapolation from level 3 with the gradient of layer 2-3:
        // 10 + (5 - 10) / 1000 * (500 - 1000) = 12.5
        let max = extremum(ExtremumOperator::Maximum, hb);
        assert!(approx_equal(max.data()[[0, 0]], 12.5, 1.0e-10));
        assert_eq!(max.dims(), &["y", "x"]);
    }

    #[test]
    fn test_minmax_bounds_the_samples() {
        let (b, t) = bounds(1500.0, 2500.0);
        let hb = HeightBounds::new(&b, &t);

        let max = extremum(ExtremumOperator::Maximum, hb);
        let min = extremum(ExtremumOperator::Minimum, hb);

        // Only level 2 inside. Both bounds use the gradient of layer 1-2, -15 per 1000 m.
        assert!(approx_equal(max.data()[[0, 0]], 12.5, 1.0e-10));
        assert!(approx_equal(min.data()[[0, 0]], -2.5, 1.0e-10));
        assert!(max.data()[[0, 0]] >= 5.0);
    }

    #[test]
    fn test_minmax_outside_column() {
        let (b, t) = bounds(5000.0, 6000.0);
        let max = extremum(ExtremumOperator::Maximum, HeightBounds::new(&b, &t));
        assert!(max.data()[[0, 0]].is_nan());
    }

    #[test]
    fn test_minmax_skips_missing() {
        let f = columns_field(&[&[1.0, f64::NAN, 3.0], &[f64::NAN, f64::NAN, f64::NAN]]);
        let h = columns_field(&[&[300.0, 200.0, 100.0], &[300.0, 200.0, 100.0]]);
        let b = Field::new(ndarray::ArrayD::from_elem(vec![1, 2], 50.0), vec!["y", "x"]).unwrap();
        let t = Field::new(ndarray::ArrayD::from_elem(vec![1, 2], 350.0), vec!["y", "x"]).unwrap();

        let max = minmax_k(
            &f,
            ExtremumOperator::Maximum,
            HeightIntervalMode::Z2Z,
            &h,
            HeightBounds::new(&b, &t),
            None,
        )
        .unwrap();
        assert_eq!(max.data()[[0, 0]], 3.0);
        assert!(max.data()[[0, 1]].is_nan());
    }

    #[test]
    fn test_minmax_validation() {
        let (b, t) = bounds(500.0, 3500.0);
        let hb = HeightBounds::new(&b, &t);
        let f = values();
        let max = ExtremumOperator::Maximum;

        assert!(matches!(
            minmax_k(&f, max, HeightIntervalMode::H2H, &heights(), hb, None),
            Err(AnalysisError::MissingRequiredInput(_))
        ));
        assert!(matches!(
            minmax_k(&f, max, HeightIntervalMode::Z2H, &heights(), hb, Some(&b)),
            Err(AnalysisError::NotImplemented(_))
        ));

        let hhl = half_level_field(&[4500.0, 3500.0, 2500.0, 1500.0, 500.0]);
        assert!(matches!(
            minmax_k(&f, max, HeightIntervalMode::Z2Z, &hhl, hb, None),
            Err(AnalysisError::IncompatibleLevelType(_))
        ));
    }

    #[test]
    fn test_integrate_constant() {
        let hhl = even_hhl(10, 100.0, 0.0);
        let f = column_field(&[2.0; 10]);
        let (b, t) = bounds(220.0, 780.0);
        let hb = HeightBounds::new(&b, &t);

        let total = integral(&f, IntegralOperator::Integral, &hhl, hb).unwrap();
        assert!(approx_equal(total.data()[[0, 0]], 2.0 * 560.0, 1.0e-9));

        let normed = integral(&f, IntegralOperator::NormedIntegral, &hhl, hb).unwrap();
        assert!(approx_equal(normed.data()[[0, 0]], 2.0, 1.0e-12));
    }

    #[test]
    fn test_integrate_half_level_field() {
        // Linear profile on interfaces, destaggered to layer means
        let hhl = even_hhl(4, 250.0, 100.0);
        let f = half_level_field(&[4.0, 3.0, 2.0, 1.0, 0.0]);
        let (b, t) = bounds(100.0, 1100.0);

        let hb = HeightBounds::new(&b, &t);
        let total = integral(&f, IntegralOperator::Integral, &hhl, hb).unwrap();
        assert!(approx_equal(total.data()[[0, 0]], 250.0 * 8.0, 1.0e-9));
    }

    #[test]
    fn test_integrate_half_level_field_validation() {
        let hhl = even_hhl(4, 250.0, 100.0);
        let (b, t) = bounds(100.0, 1100.0);
        let hb = HeightBounds::new(&b, &t);

        // Interfaces of a field on interfaces have the same number of levels
        let extra = half_level_field(&[5.0, 4.0, 3.0, 2.0, 1.0, 0.0]);
        assert!(matches!(
            integral(&extra, IntegralOperator::Integral, &hhl, hb),
            Err(AnalysisError::InvalidInput(_))
        ));

        // Bounds off the grid are rejected without destaggering first
        let f = half_level_field(&[4.0, 3.0, 2.0, 1.0, 0.0]);
        let wide = Field::new(ndarray::ArrayD::from_elem(vec![1, 2], 0.0), vec!["y", "x"]).unwrap();
        assert!(matches!(
            integral(&f, IntegralOperator::Integral, &hhl, HeightBounds::new(&wide, &t)),
            Err(AnalysisError::InvalidInput(_))
        ));

        // Neither full nor half levels
        let mut attrs = FieldAttrs::model_level(Parameter::new("W", "Vertical velocity", "m s-1"));
        attrs.origin_z = 0.5;
        let shifted = column_field(&[1.0, 1.0, 1.0, 1.0]).with_attrs(attrs);
        assert!(matches!(
            integral(&shifted, IntegralOperator::Integral, &hhl, hb),
            Err(AnalysisError::IncompatibleLevelType(_))
        ));
    }

    #[test]
    fn test_integrate_missing() {
        let hhl = even_hhl(3, 100.0, 0.0);
        let f = column_field(&[f64::NAN, 1.0, f64::NAN]);

        let (b, t) = bounds(0.0, 300.0);
        let hb = HeightBounds::new(&b, &t);
        let out = integral(&f, IntegralOperator::Integral, &hhl, hb).unwrap();
        assert!(approx_equal(out.data()[[0, 0]], 100.0, 1.0e-12));

        // Only missing values in the interval
        let (b, t) = bounds(210.0, 300.0);
        let hb = HeightBounds::new(&b, &t);
        let out = integral(&f, IntegralOperator::Integral, &hhl, hb).unwrap();
        assert!(out.data()[[0, 0]].is_nan());
    }

    #[test]
    fn test_integrate_validation() {
        let hhl = even_hhl(3, 100.0, 0.0);
        let f = column_field(&[1.0, 1.0, 1.0]);
        let (b, t) = bounds(0.0, 300.0);
        let hb = HeightBounds::new(&b, &t);
        let op = IntegralOperator::Integral;

        // Heights on full levels
        assert!(matches!(
            integral(&f, op, &f, hb),
            Err(AnalysisError::IncompatibleLevelType(_))
        ));

        let p = column_field(&[1.0, 1.0, 1.0]).with_attrs(
            FieldAttrs::model_level(Parameter::new("P", "Pressure", "Pa"))
                .with_level_type(LevelType::Pressure),
        );
        assert!(matches!(
            integral(&p, op, &hhl, hb),
            Err(AnalysisError::IncompatibleLevelType(_))
        ));

        let short = column_field(&[1.0, 1.0]);
        assert!(matches!(
            integral(&short, op, &hhl, hb),
            Err(AnalysisError::InvalidInput(_))
        ));

        assert!(matches!(
            integrate_k(
                &f,
                IntegralOperator::NormedIntegral,
                HeightIntervalMode::H2Z,
                &hhl,
                hb,
                Some(&b)
            ),
            Err(AnalysisError::NotImplemented(_))
        ));
    }
}
