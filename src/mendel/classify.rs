use super::{matches_any, min_distance, AlleleMetric, ConfidenceIntervals, Genotype, Ploidy, TrioError};
use std::cmp::min;

/// Outcome of checking one proband call against its parents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inheritance {
    /// Proband alleles can be explained by one allele from each parent
    pub consistent: bool,
    /// Smallest summed distance over parental assignments; 0 when consistent
    pub distance: u64,
}

impl Inheritance {
    pub fn is_violation(&self) -> bool {
        !self.consistent
    }
}

/// Checks a proband call against the parental calls.
///
/// A haploid proband on chrX is a hemizygous male and can only have inherited
/// the allele from the mother. A haploid proband elsewhere may match either
/// parent. A diploid proband must be explained by one allele from each parent,
/// trying both assignments of its two alleles.
pub fn check_inheritance<T: AlleleMetric>(
    proband: &[T],
    father: &[T],
    mother: &[T],
    is_chrx_locus: bool,
) -> Result<Inheritance, TrioError> {
    let inheritance = match Ploidy::from_allele_count(proband.len())? {
        Ploidy::One if is_chrx_locus => {
            let allele = &proband[0];
            Inheritance {
                consistent: matches_any(allele, mother),
                distance: u64::from(min_distance(allele, mother)?),
            }
        }
        Ploidy::One => {
            let allele = &proband[0];
            Inheritance {
                consistent: matches_any(allele, father) || matches_any(allele, mother),
                distance: u64::from(min(
                    min_distance(allele, father)?,
                    min_distance(allele, mother)?,
                )),
            }
        }
        Ploidy::Two => {
            let (first, second) = (&proband[0], &proband[1]);
            let consistent = (matches_any(first, father) && matches_any(second, mother))
                || (matches_any(second, father) && matches_any(first, mother));
            let distance = min(
                pairing_distance(first, second, father, mother)?,
                pairing_distance(second, first, father, mother)?,
            );
            Inheritance {
                consistent,
                distance,
            }
        }
    };

    if inheritance.consistent && inheritance.distance != 0 {
        return Err(TrioError::ConsistencyViolation(format!(
            "consistent trio with distance {}",
            inheritance.distance
        )));
    }
    Ok(inheritance)
}

fn pairing_distance<T: AlleleMetric>(
    from_father: &T,
    from_mother: &T,
    father: &[T],
    mother: &[T],
) -> Result<u64, TrioError> {
    let paternal = u64::from(min_distance(from_father, father)?);
    let maternal = u64::from(min_distance(from_mother, mother)?);
    Ok(paternal + maternal)
}

pub fn classify_exact(
    proband: &Genotype,
    father: &Genotype,
    mother: &Genotype,
    is_chrx_locus: bool,
) -> Result<Inheritance, TrioError> {
    check_inheritance(
        proband.alleles(),
        father.alleles(),
        mother.alleles(),
        is_chrx_locus,
    )
}

pub fn classify_ci(
    proband: &ConfidenceIntervals,
    father: &ConfidenceIntervals,
    mother: &ConfidenceIntervals,
    is_chrx_locus: bool,
) -> Result<Inheritance, TrioError> {
    check_inheritance(
        proband.intervals(),
        father.intervals(),
        mother.intervals(),
        is_chrx_locus,
    )
}
