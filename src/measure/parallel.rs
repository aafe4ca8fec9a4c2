//! Multithreaded dense eta computations.
//!
//! Rows of the pair triangle are distributed over the rayon pool and their
//! partial sums reduced afterwards. The reduction order depends on the
//! scheduler, so the last bits of the result may differ between runs and
//! from the sequential functions in [`crate::measure::dense`].

use crate::measure::EtaComponents;
use ndarray::Array2;
use rayon::iter::IntoParallelIterator;
use rayon::iter::ParallelIterator;
use single_utilities::traits::FloatOpsTS;

fn check_ranking_bounds<T>(ranking: &[usize], matrix: &Array2<T>, name: &str) -> anyhow::Result<()> {
    let (nrows, ncols) = matrix.dim();
    if let Some(&idx) = ranking.iter().find(|&&idx| idx >= nrows || idx >= ncols) {
        return Err(anyhow::anyhow!(
            "Ranking index {} is out of bounds for {} matrix of shape ({}, {})",
            idx,
            name,
            nrows,
            ncols
        ));
    }
    Ok(())
}

/// Parallel counterpart of [`crate::measure::dense::eta_components`].
pub fn par_eta_components<T>(ranking: &[usize], pref: &Array2<T>) -> anyhow::Result<EtaComponents<T>>
where
    T: FloatOpsTS,
{
    check_ranking_bounds(ranking, pref, "preference")?;

    let one = T::one();
    let two = one + one;
    let half = one / two;

    let n = ranking.len();
    let components = (0..n)
        .into_par_iter()
        .map(|i| {
            let x = ranking[i];
            let mut row = EtaComponents::new();
            for &y in &ranking[(i + 1)..] {
                let p = pref[[x, y]];
                let true_delta = if p > half { one } else { -one };
                let label = two * p - one;

                row.observed_sum += label;
                row.ideal_sum += label * true_delta;
                row.compared_pairs += 1;
            }
            row
        })
        .reduce(EtaComponents::new, EtaComponents::merge);

    Ok(components)
}

/// Parallel counterpart of [`crate::measure::dense::eta`].
pub fn par_eta<T>(ranking: &[usize], pref: &Array2<T>) -> anyhow::Result<T>
where
    T: FloatOpsTS,
{
    par_eta_components(ranking, pref)?.measure()
}

/// Parallel counterpart of [`crate::measure::dense::eta_variance_weighted_components`].
pub fn par_eta_variance_weighted_components<T>(
    ranking: &[usize],
    ep: &Array2<T>,
    vp: &Array2<T>,
) -> anyhow::Result<EtaComponents<T>>
where
    T: FloatOpsTS,
{
    if ep.shape() != vp.shape() {
        return Err(anyhow::anyhow!(
            "Variance matrix shape {:?} does not match preference matrix shape {:?}",
            vp.shape(),
            ep.shape()
        ));
    }
    check_ranking_bounds(ranking, ep, "preference")?;

    let one = T::one();
    let two = one + one;
    let half = one / two;

    let n = ranking.len();
    let components = (0..n)
        .into_par_iter()
        .map(|i| {
            let x = ranking[i];
            let mut row = EtaComponents::new();
            for &y in &ranking[(i + 1)..] {
                let p = ep[[x, y]];
                let v = vp[[x, y]];
                let true_delta = if p > half { one } else { -one };
                let label = (two * p - one) / (one + v);

                row.observed_sum += label;
                row.ideal_sum += label * true_delta;
                row.compared_pairs += 1;
            }
            row
        })
        .reduce(EtaComponents::new, EtaComponents::merge);

    Ok(components)
}

/// Parallel counterpart of [`crate::measure::dense::eta_variance_weighted`].
pub fn par_eta_variance_weighted<T>(
    ranking: &[usize],
    ep: &Array2<T>,
    vp: &Array2<T>,
) -> anyhow::Result<T>
where
    T: FloatOpsTS,
{
    par_eta_variance_weighted_components(ranking, ep, vp)?.measure()
}
