//! Eta measure over integer-keyed sparse preferences stored as `CsrMatrix`.
//!
//! Only explicitly stored entries count as evidence. A pair follows the same
//! lookup as the hash-map variants: `(x, y)` first, then the mirrored
//! `(y, x)` with the direction reversed, otherwise the pair is skipped.

use crate::measure::EtaComponents;
use nalgebra_sparse::{CsrMatrix, SparseEntry};
use single_utilities::traits::FloatOps;
use tracing::debug;

fn stored_value<T>(matrix: &CsrMatrix<T>, row: usize, col: usize) -> Option<T>
where
    T: FloatOps,
{
    match matrix.get_entry(row, col) {
        Some(SparseEntry::NonZero(value)) => Some(*value),
        _ => None,
    }
}

pub fn eta_csr_components<T>(
    ranking: &[usize],
    pref: &CsrMatrix<T>,
) -> anyhow::Result<EtaComponents<T>>
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

            let (p, delta) = if let Some(p_xy) = stored_value(pref, x, y) {
                (p_xy, one)
            } else if let Some(p_yx) = stored_value(pref, y, x) {
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
        "csr eta accumulated"
    );
    Ok(components)
}

/// Return the normalised eta measure under a CSR preference matrix.
///
/// Indices outside the matrix shape are treated like unstored entries.
pub fn eta_csr<T>(ranking: &[usize], pref: &CsrMatrix<T>) -> anyhow::Result<T>
where
    T: FloatOps,
{
    eta_csr_components(ranking, pref)?.measure()
}

/// Variance-weighted accumulators under CSR preference and variance matrices.
///
/// The variance is read at the position where the preference was found; an
/// unstored variance entry is an implicit zero.
pub fn eta_csr_variance_weighted_components<T>(
    ranking: &[usize],
    ep: &CsrMatrix<T>,
    vp: &CsrMatrix<T>,
) -> anyhow::Result<EtaComponents<T>>
where
    T: FloatOps,
{
    if ep.nrows() != vp.nrows() || ep.ncols() != vp.ncols() {
        return Err(anyhow::anyhow!(
            "Variance matrix shape ({}, {}) does not match preference matrix shape ({}, {})",
            vp.nrows(),
            vp.ncols(),
            ep.nrows(),
            ep.ncols()
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

            let (row, col, p, delta) = if let Some(p_xy) = stored_value(ep, x, y) {
                (x, y, p_xy, one)
            } else if let Some(p_yx) = stored_value(ep, y, x) {
                (y, x, p_yx, -one)
            } else {
                components.skipped_pairs += 1;
                continue;
            };
            let v = stored_value(vp, row, col).unwrap_or_else(T::zero);

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
        "csr variance-weighted eta accumulated"
    );
    Ok(components)
}

pub fn eta_csr_variance_weighted<T>(
    ranking: &[usize],
    ep: &CsrMatrix<T>,
    vp: &CsrMatrix<T>,
) -> anyhow::Result<T>
where
    T: FloatOps,
{
    eta_csr_variance_weighted_components(ranking, ep, vp)?.measure()
}
