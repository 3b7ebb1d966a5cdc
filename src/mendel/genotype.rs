use super::{Interval, Ploidy, TrioError};
use arrayvec::ArrayVec;
use itertools::Itertools;
use std::{fmt, str::FromStr};

/// Repeat-unit count of one allele.
pub type Allele = u32;

pub const MAX_ALLELES: usize = 2;

/// Allele lengths of one call, e.g. `17/19`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genotype(ArrayVec<Allele, MAX_ALLELES>);

/// Per-allele confidence intervals of one call, e.g. `15-19/20-22`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfidenceIntervals(ArrayVec<Interval, MAX_ALLELES>);

fn check_allele_count(count: usize, encoding: &str) -> Result<(), TrioError> {
    if count == 0 || count > MAX_ALLELES {
        return Err(TrioError::invalid_input(format!(
            "'{}' has {} alleles, expected 1 or 2",
            encoding, count
        )));
    }
    Ok(())
}

fn split_alleles<T>(
    encoding: &str,
    parse: impl Fn(&str) -> Result<T, TrioError>,
) -> Result<ArrayVec<T, MAX_ALLELES>, TrioError> {
    let fields: Vec<&str> = encoding.trim().split('/').collect();
    check_allele_count(fields.len(), encoding)?;
    fields.into_iter().map(parse).collect()
}

impl Genotype {
    pub fn new(alleles: &[Allele]) -> Result<Self, TrioError> {
        check_allele_count(alleles.len(), &format!("{:?}", alleles))?;
        Ok(Self(alleles.iter().copied().collect()))
    }

    pub fn alleles(&self) -> &[Allele] {
        &self.0
    }

    pub fn ploidy(&self) -> Ploidy {
        if self.0.len() == 1 {
            Ploidy::One
        } else {
            Ploidy::Two
        }
    }

    pub fn is_homozygous_for(&self, allele: Allele) -> bool {
        self.0.iter().all(|&a| a == allele)
    }
}

impl FromStr for Genotype {
    type Err = TrioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        split_alleles(s, |field| {
            field.trim().parse::<Allele>().map_err(|_| {
                TrioError::invalid_input(format!("allele '{}' in '{}' is not an integer", field, s))
            })
        })
        .map(Self)
    }
}

impl fmt::Display for Genotype {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0.iter().join("/"))
    }
}

impl ConfidenceIntervals {
    pub fn new(intervals: &[Interval]) -> Result<Self, TrioError> {
        check_allele_count(intervals.len(), &format!("{:?}", intervals))?;
        Ok(Self(intervals.iter().copied().collect()))
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Width of the last interval, which belongs to the longer allele in caller output.
    pub fn last_width(&self) -> u32 {
        self.0.last().map_or(0, |ci| ci.width())
    }
}

impl FromStr for ConfidenceIntervals {
    type Err = TrioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        split_alleles(s, |field| field.parse::<Interval>()).map(Self)
    }
}

impl fmt::Display for ConfidenceIntervals {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0.iter().join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_genotype() {
        let gt: Genotype = "17/19".parse().unwrap();
        assert_eq!(gt.alleles(), &[17, 19]);
        assert_eq!(gt.ploidy(), Ploidy::Two);
        assert_eq!(gt.to_string(), "17/19");

        let gt: Genotype = "23".parse().unwrap();
        assert_eq!(gt.alleles(), &[23]);
        assert_eq!(gt.ploidy(), Ploidy::One);
    }

    #[test]
    fn test_three_alleles_is_invalid() {
        assert!(matches!(
            "17/18/19".parse::<Genotype>(),
            Err(TrioError::InvalidInput(_))
        ));
        assert!(matches!(
            Genotype::new(&[17, 18, 19]),
            Err(TrioError::InvalidInput(_))
        ));
        assert!(matches!(
            Genotype::new(&[]),
            Err(TrioError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_non_integer_allele_is_invalid() {
        assert!(matches!(
            "17/x".parse::<Genotype>(),
            Err(TrioError::InvalidInput(_))
        ));
        assert!(matches!(
            "".parse::<Genotype>(),
            Err(TrioError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_homozygous() {
        let gt: Genotype = "20/20".parse().unwrap();
        assert!(gt.is_homozygous_for(20));
        assert!(!gt.is_homozygous_for(21));
    }

    #[test]
    fn test_parse_confidence_intervals() {
        let cis: ConfidenceIntervals = "15-19/20-22".parse().unwrap();
        assert_eq!(
            cis.intervals(),
            &[Interval::new(15, 19).unwrap(), Interval::new(20, 22).unwrap()]
        );
        assert_eq!(cis.len(), 2);
        assert_eq!(cis.last_width(), 2);
        assert_eq!(cis.to_string(), "15-19/20-22");

        assert!(matches!(
            "15-19/20-22/30-31".parse::<ConfidenceIntervals>(),
            Err(TrioError::InvalidInput(_))
        ));
        assert!(matches!(
            "15:19".parse::<ConfidenceIntervals>(),
            Err(TrioError::InvalidInput(_))
        ));
    }
}
