//! Eta measure over sparse preference mappings keyed by ordered identifier pairs.
//!
//! Only one direction of each pair needs to be stored: when `(x, y)` is
//! absent the mirrored `(y, x)` entry is used with the direction reversed.
//! Pairs absent in both directions carry no evidence and are skipped.

use crate::measure::EtaComponents;
use single_utilities::traits::FloatOps;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use tracing::debug;

/// Compute the eta accumulators for a ranking under a sparse preference mapping.
///
/// # Arguments
///
/// * `ranking` - Item keys in predicted order
/// * `pref` - Mapping `(x, y) -> P(x preferred over y)`; `(y, x)` may be omitted
///
/// # Returns
///
/// `EtaComponents` with the number of pairs that had no evidence in `skipped_pairs`.
pub fn eta_sparse_components<K, T>(
    ranking: &[K],
    pref: &HashMap<(K, K), T>,
) -> anyhow::Result<EtaComponents<T>>
where
    K: Eq + Hash + Clone,
    T: FloatOps,
{
    let one = T::one();
    let two = one + one;
    let half = one / two;

    let n = ranking.len();
    let mut components = EtaComponents::new();
    for i in 0..n {
        for j in (i + 1)..n {
            let x = &ranking[i];
            let y = &ranking[j];

            let (p, delta) = if let Some(&p_xy) = pref.get(&(x.clone(), y.clone())) {
                (p_xy, one)
            } else if let Some(&p_yx) = pref.get(&(y.clone(), x.clone())) {
                // stored direction is y before x, opposite to the ranking
                (p_yx, -one)
            } else {
                components.skipped_pairs += 1;
                continue;
            };

            let true_delta = if p > half { one } else { -one };
            let label = two * p - one;

            components.observed_sum += label * delta;
            components.ideal_sum += label * true_delta;
            components.compared_pairs += 1;
        }
    }

    debug!(
        compared = components.compared_pairs,
        skipped = components.skipped_pairs,
        "sparse eta accumulated"
    );
    Ok(components)
}

/// Return the normalised eta measure for a ranking under a sparse preference mapping.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use eta_measure::eta_sparse;
///
/// let pref: HashMap<(&str, &str), f64> = HashMap::from([
///     (("b", "a"), 0.8),
///     (("c", "a"), 0.6),
///     (("d", "a"), 0.7),
///     (("c", "b"), 0.9),
///     (("b", "d"), 0.4),
///     (("c", "d"), 0.4),
/// ]);
/// assert_eq!(eta_sparse(&["c", "b", "d", "a"], &pref).unwrap(), 0.6666666666666667);
/// ```
pub fn eta_sparse<K, T>(ranking: &[K], pref: &HashMap<(K, K), T>) -> anyhow::Result<T>
where
    K: Eq + Hash + Clone,
    T: FloatOps,
{
    eta_sparse_components(ranking, pref)?.measure()
}

/// Compute the variance-weighted eta accumulators for a sparse mapping.
///
/// The variance is read under the same key as the preference that was found,
/// so `vp` must hold an entry for every key of `ep` that the ranking touches.
pub fn eta_sparse_variance_weighted_components<K, T>(
    ranking: &[K],
    ep: &HashMap<(K, K), T>,
    vp: &HashMap<(K, K), T>,
) -> anyhow::Result<EtaComponents<T>>
where
    K: Eq + Hash + Clone + Debug,
    T: FloatOps,
{
    let one = T::one();
    let two = one + one;
    let half = one / two;

    let n = ranking.len();
    let mut components = EtaComponents::new();
    for i in 0..n {
        for j in (i + 1)..n {
            let forward = (ranking[i].clone(), ranking[j].clone());
            let backward = (ranking[j].clone(), ranking[i].clone());

            let (key, p, delta) = if let Some(&p_xy) = ep.get(&forward) {
                (forward, p_xy, one)
            } else if let Some(&p_yx) = ep.get(&backward) {
                (backward, p_yx, -one)
            } else {
                components.skipped_pairs += 1;
                continue;
            };

            let v = *vp
                .get(&key)
                .ok_or_else(|| anyhow::anyhow!("Missing variance for preference pair {:?}", key))?;

            let true_delta = if p > half { one } else { -one };
            let label = (two * p - one) / (one + v);

            components.observed_sum += label * delta;
            components.ideal_sum += label * true_delta;
            components.compared_pairs += 1;
        }
    }

    debug!(
        compared = components.compared_pairs,
        skipped = components.skipped_pairs,
        "sparse variance-weighted eta accumulated"
    );
    Ok(components)
}

/// Return the normalised eta measure for a sparse mapping with variance down-weighting.
pub fn eta_sparse_variance_weighted<K, T>(
    ranking: &[K],
    ep: &HashMap<(K, K), T>,
    vp: &HashMap<(K, K), T>,
) -> anyhow::Result<T>
where
    K: Eq + Hash + Clone + Debug,
    T: FloatOps,
{
    eta_sparse_variance_weighted_components(ranking, ep, vp)?.measure()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn certain_abc() -> HashMap<(&'static str, &'static str), f64> {
        HashMap::from([(("a", "b"), 1.0), (("a", "c"), 1.0), (("b", "c"), 1.0)])
    }

    fn noisy_forward() -> HashMap<(&'static str, &'static str), f64> {
        HashMap::from([
            (("a", "b"), 0.2),
            (("a", "c"), 0.4),
            (("a", "d"), 0.3),
            (("b", "c"), 0.1),
            (("b", "d"), 0.4),
            (("c", "d"), 0.4),
        ])
    }

    fn noisy_mixed() -> HashMap<(&'static str, &'static str), f64> {
        HashMap::from([
            (("b", "a"), 0.8),
            (("c", "a"), 0.6),
            (("d", "a"), 0.7),
            (("c", "b"), 0.9),
            (("b", "d"), 0.4),
            (("c", "d"), 0.4),
        ])
    }

    fn zero_variance(
        pref: &HashMap<(&'static str, &'static str), f64>,
    ) -> HashMap<(&'static str, &'static str), f64> {
        pref.keys().map(|&k| (k, 0.0)).collect()
    }

    #[test]
    fn test_documented_examples() {
        assert_eq!(eta_sparse(&["a", "b", "c"], &certain_abc()).unwrap(), 1.0);
        assert_eq!(eta_sparse(&["c", "b", "a"], &certain_abc()).unwrap(), -1.0);
        assert_eq!(
            eta_sparse(&["c", "b", "d", "a"], &noisy_forward()).unwrap(),
            0.6666666666666667
        );
        assert_eq!(
            eta_sparse(&["c", "b", "d", "a"], &noisy_mixed()).unwrap(),
            0.6666666666666667
        );
    }

    #[test]
    fn test_variance_weighted_documented_examples() {
        let certain = certain_abc();
        let forward = noisy_forward();
        let mixed = noisy_mixed();
        assert_eq!(
            eta_sparse_variance_weighted(&["a", "b", "c"], &certain, &zero_variance(&certain)).unwrap(),
            1.0
        );
        assert_eq!(
            eta_sparse_variance_weighted(&["c", "b", "a"], &certain, &zero_variance(&certain)).unwrap(),
            -1.0
        );
        assert_eq!(
            eta_sparse_variance_weighted(&["c", "b", "d", "a"], &forward, &zero_variance(&forward))
                .unwrap(),
            0.6666666666666667
        );
        assert_eq!(
            eta_sparse_variance_weighted(&["c", "b", "d", "a"], &mixed, &zero_variance(&mixed))
                .unwrap(),
            0.6666666666666667
        );
    }

    #[test]
    fn test_missing_pairs_are_skipped() {
        let pref = HashMap::from([(("a", "b"), 0.9), (("c", "b"), 0.7)]);
        let components = eta_sparse_components(&["a", "b", "c"], &pref).unwrap();
        assert_eq!(components.compared_pairs, 2);
        assert_eq!(components.skipped_pairs, 1);
        // (a, b) agrees, (b, c) is stored as (c, b) and disagrees
        assert_abs_diff_eq!(components.observed_sum, 0.8 - 0.4, epsilon = 1e-12);
        assert_abs_diff_eq!(components.ideal_sum, 0.8 + 0.4, epsilon = 1e-12);
    }

    #[test]
    fn test_unknown_keys_are_skipped_not_errors() {
        let components = eta_sparse_components(&["a", "b", "z"], &certain_abc()).unwrap();
        assert_eq!(components.compared_pairs, 1);
        assert_eq!(components.skipped_pairs, 2);
        assert_eq!(eta_sparse(&["a", "b", "z"], &certain_abc()).unwrap(), 1.0);
    }

    #[test]
    fn test_no_evidence_is_undefined() {
        let err = eta_sparse(&["x", "y"], &certain_abc()).unwrap_err();
        assert!(err.to_string().contains("ideal sum is zero"));
    }

    #[test]
    fn test_storage_direction_does_not_matter() {
        let forward = HashMap::from([(("a", "b"), 0.8), (("b", "c"), 0.3), (("a", "c"), 0.6)]);
        let backward = HashMap::from([(("b", "a"), 0.2), (("c", "b"), 0.7), (("c", "a"), 0.4)]);
        for ranking in [["a", "b", "c"], ["c", "a", "b"], ["b", "c", "a"]] {
            let f = eta_sparse(&ranking, &forward).unwrap();
            let b = eta_sparse(&ranking, &backward).unwrap();
            assert_abs_diff_eq!(f, b, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_missing_variance_is_error() {
        let ep = certain_abc();
        let vp = HashMap::from([(("a", "b"), 0.0)]);
        let err = eta_sparse_variance_weighted(&["a", "b", "c"], &ep, &vp).unwrap_err();
        assert!(err.to_string().contains("Missing variance"));
    }

    #[test]
    fn test_mirrored_variance_uses_stored_key() {
        let ep = HashMap::from([(("b", "a"), 0.0)]);
        let vp = HashMap::from([(("b", "a"), 3.0)]);
        let components = eta_sparse_variance_weighted_components(&["a", "b"], &ep, &vp).unwrap();
        // label = -1 / 4, delta = -1, true_delta = -1
        assert_abs_diff_eq!(components.observed_sum, 0.25);
        assert_abs_diff_eq!(components.ideal_sum, 0.25);
    }
}
