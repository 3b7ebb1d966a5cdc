use super::{nearest, Allele, Ploidy, TrioError};

/// Parent of origin of the proband alleles.
///
/// `father_allele`/`mother_allele` are the parental alleles closest to what the
/// proband received; `from_father`/`from_mother` are the proband's own repeat
/// counts attributed to each parent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Transmission {
    pub father_allele: Option<Allele>,
    pub mother_allele: Option<Allele>,
    pub from_father: Option<Allele>,
    pub from_mother: Option<Allele>,
}

/// Assigns each proband allele to a parent using the minimum total distance.
///
/// Diploid pairings are compared in the same order as the violation distance so
/// both agree on which assignment is best. A haploid allele off chrX that is
/// equally close to both parents is attributed to the mother.
pub fn assign_transmission(
    proband: &[Allele],
    father: &[Allele],
    mother: &[Allele],
    is_chrx_locus: bool,
) -> Result<Transmission, TrioError> {
    let transmission = match Ploidy::from_allele_count(proband.len())? {
        Ploidy::One if is_chrx_locus => {
            let (maternal, _) = nearest(&proband[0], mother)?;
            Transmission {
                mother_allele: Some(maternal),
                from_mother: Some(proband[0]),
                ..Default::default()
            }
        }
        Ploidy::One => {
            let allele = proband[0];
            let (paternal, paternal_diff) = nearest(&allele, father)?;
            let (maternal, maternal_diff) = nearest(&allele, mother)?;
            if paternal_diff < maternal_diff {
                Transmission {
                    father_allele: Some(paternal),
                    from_father: Some(allele),
                    ..Default::default()
                }
            } else {
                Transmission {
                    mother_allele: Some(maternal),
                    from_mother: Some(allele),
                    ..Default::default()
                }
            }
        }
        Ploidy::Two => {
            let (first, second) = (proband[0], proband[1]);
            let (paternal_to_first, diff_p1) = nearest(&first, father)?;
            let (maternal_to_first, diff_m1) = nearest(&first, mother)?;
            let (paternal_to_second, diff_p2) = nearest(&second, father)?;
            let (maternal_to_second, diff_m2) = nearest(&second, mother)?;

            let maternal_first = u64::from(diff_m1) + u64::from(diff_p2);
            let paternal_first = u64::from(diff_p1) + u64::from(diff_m2);
            if maternal_first < paternal_first {
                Transmission {
                    father_allele: Some(paternal_to_second),
                    mother_allele: Some(maternal_to_first),
                    from_father: Some(second),
                    from_mother: Some(first),
                }
            } else {
                Transmission {
                    father_allele: Some(paternal_to_first),
                    mother_allele: Some(maternal_to_second),
                    from_father: Some(first),
                    from_mother: Some(second),
                }
            }
        }
    };
    Ok(transmission)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mendel::check_inheritance;

    #[test]
    fn test_haploid_chrx_comes_from_mother() {
        let result = assign_transmission(&[18], &[18, 21], &[17, 19], true).unwrap();
        assert_eq!(
            result,
            Transmission {
                father_allele: None,
                mother_allele: Some(17),
                from_father: None,
                from_mother: Some(18),
            }
        );
    }

    #[test]
    fn test_haploid_autosomal_closer_parent() {
        let result = assign_transmission(&[21], &[20, 30], &[10, 12], false).unwrap();
        assert_eq!(result.father_allele, Some(20));
        assert_eq!(result.from_father, Some(21));
        assert_eq!(result.mother_allele, None);

        let result = assign_transmission(&[11], &[20, 30], &[10, 12], false).unwrap();
        assert_eq!(result.mother_allele, Some(10));
        assert_eq!(result.from_mother, Some(11));
        assert_eq!(result.father_allele, None);
    }

    #[test]
    fn test_haploid_autosomal_tie_goes_to_mother() {
        let result = assign_transmission(&[15], &[13], &[17], false).unwrap();
        assert_eq!(result.mother_allele, Some(17));
        assert_eq!(result.from_mother, Some(15));
        assert_eq!(result.father_allele, None);
        assert_eq!(result.from_father, None);
    }

    #[test]
    fn test_diploid_assignment() {
        let result = assign_transmission(&[17, 19], &[19, 30], &[17, 40], false).unwrap();
        assert_eq!(
            result,
            Transmission {
                father_allele: Some(19),
                mother_allele: Some(17),
                from_father: Some(19),
                from_mother: Some(17),
            }
        );

        let result = assign_transmission(&[17, 19], &[15, 16], &[20, 21], false).unwrap();
        assert_eq!(
            result,
            Transmission {
                father_allele: Some(16),
                mother_allele: Some(20),
                from_father: Some(17),
                from_mother: Some(19),
            }
        );
    }

    #[test]
    fn test_diploid_tie_keeps_first_allele_paternal() {
        let result = assign_transmission(&[20, 20], &[20], &[20], false).unwrap();
        assert_eq!(result.from_father, Some(20));
        assert_eq!(result.from_mother, Some(20));
        assert_eq!(result.father_allele, Some(20));
        assert_eq!(result.mother_allele, Some(20));
    }

    #[test]
    fn test_assignment_agrees_with_violation_distance() {
        let cases: [(&[Allele], &[Allele], &[Allele]); 4] = [
            (&[17, 19], &[15, 16], &[20, 21]),
            (&[17, 19], &[19, 30], &[17, 40]),
            (&[5, 40], &[41, 6], &[3, 39]),
            (&[10, 10], &[8, 15], &[12, 9]),
        ];
        for (proband, father, mother) in cases {
            let transmission = assign_transmission(proband, father, mother, false).unwrap();
            let inheritance = check_inheritance(proband, father, mother, false).unwrap();
            let assigned = u64::from(
                transmission
                    .from_father
                    .unwrap()
                    .abs_diff(transmission.father_allele.unwrap()),
            ) + u64::from(
                transmission
                    .from_mother
                    .unwrap()
                    .abs_diff(transmission.mother_allele.unwrap()),
            );
            assert_eq!(assigned, inheritance.distance);
        }
    }

    #[test]
    fn test_large_alleles_do_not_overflow() {
        let result =
            assign_transmission(&[u32::MAX, 1], &[2, 5], &[u32::MAX - 1, 0], false).unwrap();
        assert_eq!(result.from_father, Some(1));
        assert_eq!(result.father_allele, Some(2));
        assert_eq!(result.from_mother, Some(u32::MAX));
        assert_eq!(result.mother_allele, Some(u32::MAX - 1));

        let result = assign_transmission(&[u32::MAX, u32::MAX], &[0], &[0], false).unwrap();
        assert_eq!(result.from_father, Some(u32::MAX));
        assert_eq!(result.from_mother, Some(u32::MAX));
    }

    #[test]
    fn test_three_alleles_is_invalid() {
        let result = assign_transmission(&[1, 2, 3], &[1], &[2], false);
        assert!(matches!(result, Err(TrioError::InvalidInput(_))));
    }
}
