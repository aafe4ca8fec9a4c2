//! # eta-measure
//!
//! The eta measure: a generalisation of Kendall's tau for noisy and incomplete pairwise judgements.
//!
//! Eta scores how well a produced ranking agrees with a ground-truth pairwise preference model in
//! which each preference is a probability, possibly carries an estimation variance, and may be
//! missing altogether. It is intended for information-retrieval evaluation, where judgements are
//! collected as pairwise comparisons rather than graded labels. See
//! <http://doi.acm.org/10.1145/3341981.3344246> for the definition.
//!
//! ## Core Features
//!
//! - **Dense preferences**: `ndarray` matrices indexed by item id
//! - **Sparse preferences**: `HashMap` keyed by ordered item pairs, with the mirrored direction implied
//! - **Variance weighting**: uncertain preferences are down-weighted by `1 / (1 + v)`
//! - **CSR and parallel variants**: `CsrMatrix` sources from nalgebra-sparse and rayon-parallel dense evaluation
//!
//! ## Quick Start
//!
//! Call [`eta`] or [`eta_sparse`] directly, or use the [`EtaMeasure`] trait implemented for every
//! supported preference source. A ranking that agrees with every preferred direction scores 1.0,
//! its reversal scores -1.0.
//!
//! ## Module Organization
//!
//! - **[`measure`]**: the measure computations, their accumulators and helpers

pub mod measure;

pub use measure::dense::{eta, eta_variance_weighted};
pub use measure::sparse::{eta_sparse, eta_sparse_variance_weighted};
pub use measure::{EtaComponents, EtaMeasure};
