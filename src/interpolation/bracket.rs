//! Per-column search for the pair of model levels that brackets a target value.
//!
//! Columns are ordered top to bottom, so level `k - 1` is directly above level `k`. A bracket is
//! identified by the index `k` of its lower level; the upper level is always `k - 1`, which means
//! the top level can never be the lower end of a bracket.
use crate::keys::FoldMode;
use itertools::Itertools;
use ndarray::ArrayView1;

/// Find the shallowest level `k` where pressure exceeds `p0` while it did not at `k - 1`.
///
/// Among all such levels the one with the lowest pressure wins, which for pressure increasing
/// downward is the first one found scanning from the top.
pub(crate) fn pressure_bracket(pressure: ArrayView1<f64>, p0: f64) -> Option<usize> {
    pressure
        .iter()
        .enumerate()
        .tuple_windows::<(_, _)>()
        .filter(|&((_, &p_above), (_, &p))| p > p0 && p_above <= p0)
        .map(|(_, (k, &p))| (k, p))
        .fold(None, |best: Option<(usize, f64)>, (k, p)| match best {
            Some((_, best_p)) if best_p <= p => best,
            _ => Some((k, p)),
        })
        .map(|(k, _)| k)
}

/// Levels `k` where the target field crosses `v0` between `k - 1` and `k`, in either direction.
///
/// A level whose value equals `v0` exactly satisfies the condition from both sides.
pub(crate) fn crossings<'a>(
    target: ArrayView1<'a, f64>,
    v0: f64,
) -> impl Iterator<Item = usize> + 'a {
    target
        .into_iter()
        .enumerate()
        .tuple_windows::<(_, _)>()
        .filter(move |&((_, &t_above), (_, &t))| {
            (t >= v0 && t_above <= v0) || (t <= v0 && t_above >= v0)
        })
        .map(|(_, (k, _))| k)
}

/// Choose among the crossings of `v0` in a column according to the fold mode.
///
/// Crossings are ranked by `height`, crossings where the height is missing are ignored. Returns
/// `None` when there is no crossing, or when the mode is `UndefFold` and there is more than one.
pub(crate) fn fold_bracket(
    target: ArrayView1<f64>,
    height: ArrayView1<f64>,
    v0: f64,
    mode: FoldMode,
) -> Option<usize> {
    debug_assert_eq!(target.len(), height.len());

    let candidates = crossings(target, v0)
        .map(|k| (k, height[k]))
        .filter(|&(_, h)| !h.is_nan());

    let selected = match mode {
        FoldMode::LowFold => lowest(candidates),
        FoldMode::HighFold => highest(candidates),
        FoldMode::UndefFold => {
            let all: Vec<(usize, f64)> = candidates.collect();
            if all.len() > 1 {
                None
            } else {
                lowest(all.into_iter())
            }
        }
    };

    selected.map(|(k, _)| k)
}

// On equal heights the first level found wins.
fn lowest<I>(candidates: I) -> Option<(usize, f64)>
where
    I: Iterator<Item = (usize, f64)>,
{
    candidates.fold(None, |best, (k, h)| match best {
        Some((_, best_h)) if best_h <= h => best,
        _ => Some((k, h)),
    })
}

fn highest<I>(candidates: I) -> Option<(usize, f64)>
where
    I: Iterator<Item = (usize, f64)>,
{
    candidates.fold(None, |best, (k, h)| match best {
        Some((_, best_h)) if best_h >= h => best,
        _ => Some((k, h)),
    })
}
