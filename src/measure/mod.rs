//! Eta measure computations over dense, sparse and CSR preference sources.
//!
//! Every variant walks the pairs of ranked positions `i < j` and compares the
//! predicted order of `ranking[i]` and `ranking[j]` against the preferred
//! direction implied by the preference probability. The per-pair label is
//! `2p - 1`, optionally divided by `1 + v` when a variance source is given.
//!
//! ## Available Sources
//!
//! - **Dense** (`dense`): `Array2` matrices indexed by `usize` identifiers
//! - **Sparse** (`sparse`): `HashMap` keyed by ordered identifier pairs
//! - **CSR** (`csr`): `CsrMatrix` where only stored entries are evidence
//! - **Parallel** (`parallel`): rayon variants of the dense computations

use std::collections::HashMap;
use std::hash::Hash;

use nalgebra_sparse::CsrMatrix;
use ndarray::Array2;
use single_utilities::traits::FloatOps;

pub mod csr;
pub mod dense;
pub mod parallel;
pub mod sparse;

pub mod utils;

/// Raw accumulators of one eta evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EtaComponents<T> {
    /// Weighted agreement achieved by the ranking
    pub observed_sum: T,
    /// Maximum achievable weighted agreement for the preference data
    pub ideal_sum: T,
    /// Number of pairs that contributed to both sums
    pub compared_pairs: usize,
    /// Number of pairs without evidence (sparse sources only)
    pub skipped_pairs: usize,
}

impl<T> EtaComponents<T>
where
    T: FloatOps,
{
    /// Create empty accumulators
    pub fn new() -> Self {
        EtaComponents {
            observed_sum: T::zero(),
            ideal_sum: T::zero(),
            compared_pairs: 0,
            skipped_pairs: 0,
        }
    }

    /// Combine accumulators of two disjoint sets of pairs
    pub fn merge(mut self, other: Self) -> Self {
        self.observed_sum += other.observed_sum;
        self.ideal_sum += other.ideal_sum;
        self.compared_pairs += other.compared_pairs;
        self.skipped_pairs += other.skipped_pairs;
        self
    }

    /// Total number of position pairs visited
    pub fn total_pairs(&self) -> usize {
        self.compared_pairs + self.skipped_pairs
    }

    /// The normalised eta measure, `observed_sum / ideal_sum`.
    ///
    /// Fails when the ideal sum is exactly zero, which happens for rankings
    /// with fewer than two items, for data where every probability is 0.5,
    /// and for sparse data that covers none of the ranked pairs.
    pub fn measure(&self) -> anyhow::Result<T> {
        if self.ideal_sum == T::zero() {
            return Err(anyhow::anyhow!(
                "eta measure is undefined: ideal sum is zero ({} compared pairs, {} skipped)",
                self.compared_pairs,
                self.skipped_pairs
            ));
        }
        Ok(self.observed_sum / self.ideal_sum)
    }
}

impl<T> Default for EtaComponents<T>
where
    T: FloatOps,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Eta evaluation against a preference source.
///
/// Implemented for every supported source type so callers can evaluate a
/// ranking without picking the matching free function.
pub trait EtaMeasure<T>
where
    T: FloatOps,
{
    /// Identifier type stored in the ranking
    type Id;

    fn eta(&self, ranking: &[Self::Id]) -> anyhow::Result<T>;

    fn eta_variance_weighted(&self, ranking: &[Self::Id], variance: &Self) -> anyhow::Result<T>;
}

impl<T> EtaMeasure<T> for Array2<T>
where
    T: FloatOps,
{
    type Id = usize;

    fn eta(&self, ranking: &[usize]) -> anyhow::Result<T> {
        dense::eta(ranking, self)
    }

    fn eta_variance_weighted(&self, ranking: &[usize], variance: &Self) -> anyhow::Result<T> {
        dense::eta_variance_weighted(ranking, self, variance)
    }
}

impl<T> EtaMeasure<T> for CsrMatrix<T>
where
    T: FloatOps,
{
    type Id = usize;

    fn eta(&self, ranking: &[usize]) -> anyhow::Result<T> {
        csr::eta_csr(ranking, self)
    }

    fn eta_variance_weighted(&self, ranking: &[usize], variance: &Self) -> anyhow::Result<T> {
        csr::eta_csr_variance_weighted(ranking, self, variance)
    }
}

impl<K, T> EtaMeasure<T> for HashMap<(K, K), T>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
    T: FloatOps,
{
    type Id = K;

    fn eta(&self, ranking: &[K]) -> anyhow::Result<T> {
        sparse::eta_sparse(ranking, self)
    }

    fn eta_variance_weighted(&self, ranking: &[K], variance: &Self) -> anyhow::Result<T> {
        sparse::eta_sparse_variance_weighted(ranking, self, variance)
    }
}
