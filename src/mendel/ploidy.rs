use super::TrioError;

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Ploidy {
    One,
    Two,
}

impl Ploidy {
    pub fn from_allele_count(count: usize) -> Result<Self, TrioError> {
        match count {
            1 => Ok(Ploidy::One),
            2 => Ok(Ploidy::Two),
            _ => Err(TrioError::invalid_input(format!(
                "expected 1 or 2 alleles, found {}",
                count
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ploidy_from_allele_count() {
        assert_eq!(Ploidy::from_allele_count(1), Ok(Ploidy::One));
        assert_eq!(Ploidy::from_allele_count(2), Ok(Ploidy::Two));
        assert!(matches!(
            Ploidy::from_allele_count(0),
            Err(TrioError::InvalidInput(_))
        ));
        assert!(matches!(
            Ploidy::from_allele_count(3),
            Err(TrioError::InvalidInput(_))
        ));
    }
}
