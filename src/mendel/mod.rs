//! Mendelian consistency of tandem repeat genotypes.
//!
//! Exact allele lengths and their confidence intervals are checked separately
//! against the parental genotypes; the two verdicts can disagree and are
//! reported side by side.

mod classify;
mod distance;
mod error;
mod genotype;
mod interval;
mod ploidy;
mod transmission;

pub use classify::{check_inheritance, classify_ci, classify_exact, Inheritance};
pub use distance::{matches_any, min_distance, nearest, AlleleMetric};
pub use error::TrioError;
pub use genotype::{Allele, ConfidenceIntervals, Genotype, MAX_ALLELES};
pub use interval::Interval;
pub use ploidy::Ploidy;
pub use transmission::{assign_transmission, Transmission};
