use crate::mendel::{Allele, TrioError};
use crate::utils::GenomicRegion;

/// Reference context shared by all calls at one locus.
#[derive(Debug, Clone, PartialEq)]
pub struct LocusContext {
    pub region: GenomicRegion,
    pub repeat_unit_len: usize,
    pub is_chrx: bool,
}

impl LocusContext {
    pub fn new(reference_region: &str, repeat_unit: &str) -> Result<Self, TrioError> {
        let region = GenomicRegion::from_string(reference_region).map_err(TrioError::InvalidInput)?;
        let repeat_unit_len = repeat_unit.trim().len();
        if repeat_unit_len == 0 {
            return Err(TrioError::invalid_input(format!(
                "empty repeat unit for {}",
                reference_region
            )));
        }
        let is_chrx = region.is_chrx();
        Ok(Self {
            region,
            repeat_unit_len,
            is_chrx,
        })
    }

    pub fn spans_whole_repeat_units(&self) -> bool {
        self.region.span() as usize % self.repeat_unit_len == 0
    }

    /// Number of complete repeat units in the reference allele.
    pub fn reference_repeat_count(&self) -> Allele {
        (self.region.span() as usize / self.repeat_unit_len) as Allele
    }
}
