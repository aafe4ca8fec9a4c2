use ndarray::Array2;
use num_traits::NumCast;
use single_utilities::traits::FloatOps;
use std::collections::HashMap;
use std::hash::Hash;

/// Build a certain (0/1) dense preference matrix from a reference ranking.
///
/// `reference` must be a permutation of `0..reference.len()`. Items earlier in
/// the reference are preferred with probability 1; the diagonal is 1.
pub fn preferences_from_ranking<T>(reference: &[usize]) -> anyhow::Result<Array2<T>>
where
    T: FloatOps,
{
    let n = reference.len();
    let mut seen = vec![false; n];
    for &idx in reference {
        if idx >= n {
            return Err(anyhow::anyhow!(
                "Reference index {} is out of range for {} items",
                idx,
                n
            ));
        }
        if seen[idx] {
            return Err(anyhow::anyhow!("Duplicate reference index {}", idx));
        }
        seen[idx] = true;
    }

    let mut pref = Array2::from_elem((n, n), T::zero());
    for i in 0..n {
        pref[[reference[i], reference[i]]] = T::one();
        for &y in &reference[(i + 1)..] {
            pref[[reference[i], y]] = T::one();
        }
    }

    Ok(pref)
}

/// Kendall's tau-a between two rankings of the same items.
///
/// Eta under a certain preference matrix reduces to this coefficient, so
/// `eta(a, preferences_from_ranking(b))` equals `kendall_tau(a, b)`.
pub fn kendall_tau<K, T>(ranking: &[K], reference: &[K]) -> anyhow::Result<T>
where
    K: Eq + Hash,
    T: FloatOps,
{
    let n = ranking.len();
    if n < 2 {
        return Err(anyhow::anyhow!("Kendall's tau needs at least 2 items, got {}", n));
    }
    if reference.len() != n {
        return Err(anyhow::anyhow!(
            "Rankings have different lengths: {} vs {}",
            n,
            reference.len()
        ));
    }

    let positions: HashMap<&K, usize> = reference.iter().enumerate().map(|(i, k)| (k, i)).collect();
    if positions.len() != n {
        return Err(anyhow::anyhow!("Reference ranking contains duplicate items"));
    }

    let ranked_positions = ranking
        .iter()
        .map(|k| positions.get(k).copied())
        .collect::<Option<Vec<usize>>>()
        .ok_or_else(|| anyhow::anyhow!("Ranking contains items missing from the reference"))?;

    let mut concordant: i64 = 0;
    let mut discordant: i64 = 0;
    for i in 0..n {
        for j in (i + 1)..n {
            match ranked_positions[i].cmp(&ranked_positions[j]) {
                std::cmp::Ordering::Less => concordant += 1,
                std::cmp::Ordering::Greater => discordant += 1,
                std::cmp::Ordering::Equal => {
                    return Err(anyhow::anyhow!("Ranking contains duplicate items"));
                }
            }
        }
    }

    let total_pairs = (n * (n - 1) / 2) as i64;
    let numerator = <T as NumCast>::from(concordant - discordant)
        .ok_or_else(|| anyhow::anyhow!("Pair count does not fit the float type"))?;
    let denominator = <T as NumCast>::from(total_pairs)
        .ok_or_else(|| anyhow::anyhow!("Pair count does not fit the float type"))?;

    Ok(numerator / denominator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_preferences_from_ranking() {
        let pref: Array2<f64> = preferences_from_ranking(&[2, 0, 1]).unwrap();
        assert_eq!(pref[[2, 0]], 1.0);
        assert_eq!(pref[[0, 2]], 0.0);
        assert_eq!(pref[[0, 1]], 1.0);
        assert_eq!(pref[[1, 2]], 0.0);
        for x in 0..3 {
            assert_eq!(pref[[x, x]], 1.0);
            for y in 0..3 {
                if x != y {
                    assert_eq!(pref[[x, y]] + pref[[y, x]], 1.0);
                }
            }
        }
    }

    #[test]
    fn test_preferences_from_ranking_rejects_bad_input() {
        assert!(preferences_from_ranking::<f64>(&[0, 3, 1]).is_err());
        assert!(preferences_from_ranking::<f64>(&[0, 1, 1]).is_err());
    }

    #[test]
    fn test_kendall_tau_known_values() {
        let tau: f64 = kendall_tau(&["a", "b", "c"], &["a", "b", "c"]).unwrap();
        assert_eq!(tau, 1.0);
        let tau: f64 = kendall_tau(&["c", "b", "a"], &["a", "b", "c"]).unwrap();
        assert_eq!(tau, -1.0);
        // one swapped pair out of six
        let tau: f64 = kendall_tau(&[0, 1, 3, 2], &[0, 1, 2, 3]).unwrap();
        assert_abs_diff_eq!(tau, 4.0 / 6.0);
    }

    #[test]
    fn test_kendall_tau_errors() {
        assert!(kendall_tau::<_, f64>(&[1], &[1]).is_err());
        assert!(kendall_tau::<_, f64>(&[1, 2], &[1, 2, 3]).is_err());
        assert!(kendall_tau::<_, f64>(&[1, 4], &[1, 2]).is_err());
        assert!(kendall_tau::<_, f64>(&[1, 2], &[2, 2]).is_err());
        assert!(kendall_tau::<_, f64>(&[1, 1], &[1, 2]).is_err());
    }
}
