//! Small helpers shared by the operators.
use crate::field::Field;
use tracing::warn;

/// Log a warning if an operator produced missing values.
///
/// Missing values are a normal outcome at grid points where a target surface does not intersect
/// the column, so this only reports how many there were.
pub(crate) fn warn_if_missing(operator: &str, field: &Field) {
    let missing = field.count_missing();
    if missing > 0 {
        warn!(
            operator,
            missing,
            total = field.data().len(),
            "result contains missing values"
        );
    }
}

/// Fold a value into a running extremum, skipping NaN.
///
/// `pick` returns true when its first argument should replace the second.
#[inline]
pub(crate) fn fold_extremum<F>(acc: Option<f64>, val: f64, pick: F) -> Option<f64>
where
    F: Fn(f64, f64) -> bool,
{
    if val.is_nan() {
        return acc;
    }

    match acc {
        Some(best) if !pick(val, best) => Some(best),
        _ => Some(val),
    }
}
