//! Eta measure over dense preference matrices.
//!
//! Identifiers in the ranking are direct indices into the matrix. Every pair
//! of ranked items is looked up, so an identifier outside the matrix shape is
//! an error rather than missing evidence.

use crate::measure::EtaComponents;
use ndarray::Array2;
use single_utilities::traits::FloatOps;

fn preference_at<T>(matrix: &Array2<T>, x: usize, y: usize, name: &str) -> anyhow::Result<T>
where
    T: FloatOps,
{
    matrix.get((x, y)).copied().ok_or_else(|| {
        anyhow::anyhow!(
            "Ranking index pair ({}, {}) is out of bounds for {} matrix of shape {:?}",
            x,
            y,
            name,
            matrix.shape()
        )
    })
}

/// Compute the eta accumulators for a ranking under a dense preference matrix.
///
/// # Arguments
///
/// * `ranking` - Item indices in predicted order
/// * `pref` - Preference matrix with `pref[[x, y]] == 1 - pref[[y, x]]` and entries in `[0, 1]`
///
/// # Returns
///
/// `EtaComponents` holding the observed and ideal sums over all `N(N-1)/2` pairs.
pub fn eta_components<T>(ranking: &[usize], pref: &Array2<T>) -> anyhow::Result<EtaComponents<T>>
where
    T: FloatOps,
{
    let one = T::one();
    let two = one + one;
    let half = one / two;

    let n = ranking.len();
    let mut components = EtaComponents::new();
    for i in 0..n {
        for j in (i + 1)..n {
            let x = ranking[i];
            let y = ranking[j];
            let p = preference_at(pref, x, y, "preference")?;

            // i < j, so the ranking always predicts x before y
            let delta = one;
            let true_delta = if p > half { one } else { -one };
            let label = two * p - one;

            components.observed_sum += label * delta;
            components.ideal_sum += label * true_delta;
            components.compared_pairs += 1;
        }
    }

    Ok(components)
}

/// Return the normalised eta measure for a ranking under a dense preference matrix.
///
/// A ranking agreeing with every preferred direction scores 1.0 and its
/// reversal scores -1.0. A probability of exactly 0.5 counts as preferring
/// the opposite of the ranked order.
///
/// # Example
///
/// ```
/// use ndarray::array;
/// use eta_measure::eta;
///
/// let pref = array![
///     [0.5, 0.2, 0.4, 0.3],
///     [0.8, 0.5, 0.1, 0.4],
///     [0.6, 0.9, 0.5, 0.4],
///     [0.7, 0.6, 0.6, 0.5],
/// ];
/// assert_eq!(eta(&[2, 1, 3, 0], &pref).unwrap(), 0.6666666666666667);
/// ```
pub fn eta<T>(ranking: &[usize], pref: &Array2<T>) -> anyhow::Result<T>
where
    T: FloatOps,
{
    eta_components(ranking, pref)?.measure()
}

/// Compute the variance-weighted eta accumulators for a dense matrix.
///
/// Each pair's label `2p - 1` is divided by `1 + v`, so uncertain
/// preferences contribute less to both sums.
pub fn eta_variance_weighted_components<T>(
    ranking: &[usize],
    ep: &Array2<T>,
    vp: &Array2<T>,
) -> anyhow::Result<EtaComponents<T>>
where
    T: FloatOps,
{
    if ep.shape() != vp.shape() {
        return Err(anyhow::anyhow!(
            "Variance matrix shape {:?} does not match preference matrix shape {:?}",
            vp.shape(),
            ep.shape()
        ));
    }

    let one = T::one();
    let two = one + one;
    let half = one / two;

    let n = ranking.len();
    let mut components = EtaComponents::new();
    for i in 0..n {
        for j in (i + 1)..n {
            let x = ranking[i];
            let y = ranking[j];
            let p = preference_at(ep, x, y, "preference")?;
            let v = preference_at(vp, x, y, "variance")?;

            let delta = one;
            let true_delta = if p > half { one } else { -one };
            let label = (two * p - one) / (one + v);

            components.observed_sum += label * delta;
            components.ideal_sum += label * true_delta;
            components.compared_pairs += 1;
        }
    }

    Ok(components)
}

/// Return the normalised eta measure with per-pair variance down-weighting.
///
/// With an all-zero variance matrix this equals [`eta`] exactly.
pub fn eta_variance_weighted<T>(
    ranking: &[usize],
    ep: &Array2<T>,
    vp: &Array2<T>,
) -> anyhow::Result<T>
where
    T: FloatOps,
{
    eta_variance_weighted_components(ranking, ep, vp)?.measure()
}
