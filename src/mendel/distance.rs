use super::{Allele, Interval, TrioError};
use itertools::Itertools;

/// How a proband allele is compared against a parental one.
///
/// Exact allele lengths match on equality and are separated by their absolute
/// difference; confidence intervals match on overlap and are separated by the
/// gap between them.
pub trait AlleleMetric: Copy {
    fn distance(&self, other: &Self) -> u32;
    fn matches(&self, other: &Self) -> bool;
}

impl AlleleMetric for Allele {
    fn distance(&self, other: &Self) -> u32 {
        self.abs_diff(*other)
    }

    fn matches(&self, other: &Self) -> bool {
        self == other
    }
}

impl AlleleMetric for Interval {
    fn distance(&self, other: &Self) -> u32 {
        Interval::distance(self, other)
    }

    fn matches(&self, other: &Self) -> bool {
        self.overlaps(other)
    }
}

pub fn matches_any<T: AlleleMetric>(query: &T, candidates: &[T]) -> bool {
    candidates.iter().any(|c| query.matches(c))
}

pub fn min_distance<T: AlleleMetric>(query: &T, candidates: &[T]) -> Result<u32, TrioError> {
    candidates
        .iter()
        .map(|c| query.distance(c))
        .min()
        .ok_or(TrioError::MissingCandidates)
}

/// Closest candidate and its distance; ties go to the earliest candidate.
pub fn nearest<T: AlleleMetric>(query: &T, candidates: &[T]) -> Result<(T, u32), TrioError> {
    let index = candidates
        .iter()
        .position_min_by_key(|c| query.distance(c))
        .ok_or(TrioError::MissingCandidates)?;
    let closest = candidates[index];
    Ok((closest, query.distance(&closest)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_distance_matches_brute_force() {
        let candidate_sets: [&[Allele]; 4] = [&[5], &[3, 9], &[12, 0], &[7, 7]];
        for x in 0..15u32 {
            for candidates in candidate_sets {
                let expected = candidates
                    .iter()
                    .map(|&c| (x as i64 - c as i64).unsigned_abs() as u32)
                    .min()
                    .unwrap();
                assert_eq!(min_distance(&x, candidates), Ok(expected));
            }
        }
    }

    #[test]
    fn test_empty_candidates() {
        let empty: [Allele; 0] = [];
        assert_eq!(min_distance(&17, &empty), Err(TrioError::MissingCandidates));
        assert_eq!(nearest(&17, &empty), Err(TrioError::MissingCandidates));
        assert!(!matches_any(&17, &empty));
    }

    #[test]
    fn test_nearest_prefers_first_on_ties() {
        assert_eq!(nearest(&17u32, &[15, 19]), Ok((15, 2)));
        assert_eq!(nearest(&17u32, &[19, 15]), Ok((19, 2)));
        assert_eq!(nearest(&17u32, &[30, 18, 16]), Ok((18, 1)));
    }

    #[test]
    fn test_interval_metric() {
        let proband = Interval::new(15, 19).unwrap();
        let father = [Interval::new(10, 14).unwrap()];
        let mother = [Interval::new(16, 20).unwrap(), Interval::new(30, 35).unwrap()];
        assert!(!matches_any(&proband, &father));
        assert!(matches_any(&proband, &mother));
        assert_eq!(min_distance(&proband, &father), Ok(1));
        assert_eq!(min_distance(&proband, &mother), Ok(0));
        assert_eq!(nearest(&proband, &mother), Ok((mother[0], 0)));
    }
}
