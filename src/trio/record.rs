use super::{LocusContext, Parents};
use crate::mendel::{ConfidenceIntervals, Genotype, TrioError};
use serde::Deserialize;

/// One line of the calls table as written by the upstream caller.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallRow {
    #[serde(rename = "SampleId")]
    pub sample_id: String,
    #[serde(rename = "LocusId")]
    pub locus_id: String,
    #[serde(rename = "VariantId")]
    pub variant_id: String,
    #[serde(rename = "Genotype", default)]
    pub genotype: String,
    #[serde(rename = "GenotypeConfidenceInterval", default)]
    pub genotype_ci: String,
    #[serde(rename = "ReferenceRegion")]
    pub reference_region: String,
    #[serde(rename = "RepeatUnit")]
    pub repeat_unit: String,
    #[serde(rename = "Sex", default)]
    pub sex: String,
    #[serde(rename = "Num Repeats: Allele 2", default)]
    pub num_repeats_allele2: String,
    #[serde(rename = "Coverage", default)]
    pub coverage: String,
    #[serde(rename = "NumSpanningReads", default)]
    pub num_spanning_reads: Option<String>,
    #[serde(rename = "NumFlankingReads", default)]
    pub num_flanking_reads: Option<String>,
    #[serde(rename = "NumInrepeatReads", default)]
    pub num_inrepeat_reads: Option<String>,
    #[serde(rename = "NumAllelesSupportedBySpanningReads", default)]
    pub num_alleles_spanning: Option<String>,
    #[serde(rename = "NumAllelesSupportedByFlankingReads", default)]
    pub num_alleles_flanking: Option<String>,
    #[serde(rename = "NumAllelesSupportedByInrepeatReads", default)]
    pub num_alleles_inrepeat: Option<String>,
}

/// Read counts backing a call, present only when the caller reported them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadSupport {
    pub spanning_reads: u32,
    pub flanking_reads: u32,
    pub inrepeat_reads: u32,
    pub alleles_by_spanning: u32,
    pub alleles_by_flanking: u32,
    pub alleles_by_inrepeat: u32,
}

impl ReadSupport {
    fn from_row(row: &CallRow) -> Result<Option<Self>, TrioError> {
        let fields = [
            &row.num_spanning_reads,
            &row.num_flanking_reads,
            &row.num_inrepeat_reads,
            &row.num_alleles_spanning,
            &row.num_alleles_flanking,
            &row.num_alleles_inrepeat,
        ];
        if fields.iter().any(|f| f.is_none()) {
            return Ok(None);
        }
        let mut counts = [0u32; 6];
        for (count, field) in counts.iter_mut().zip(fields) {
            let value = field.as_deref().unwrap_or_default().trim();
            *count = value.parse().map_err(|_| {
                TrioError::invalid_input(format!("read count '{}' is not an integer", value))
            })?;
        }
        Ok(Some(Self {
            spanning_reads: counts[0],
            flanking_reads: counts[1],
            inrepeat_reads: counts[2],
            alleles_by_spanning: counts[3],
            alleles_by_flanking: counts[4],
            alleles_by_inrepeat: counts[5],
        }))
    }

    pub fn supported_alleles(&self) -> u64 {
        [
            self.alleles_by_spanning,
            self.alleles_by_flanking,
            self.alleles_by_inrepeat,
        ]
        .into_iter()
        .map(u64::from)
        .sum()
    }
}

/// Parsed and validated genotype call.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub genotype: Genotype,
    pub confidence: ConfidenceIntervals,
    pub locus: LocusContext,
    pub coverage: f64,
    pub read_support: Option<ReadSupport>,
}

impl Call {
    pub fn from_row(row: &CallRow) -> Result<Self, TrioError> {
        let genotype: Genotype = row.genotype.parse()?;
        let confidence: ConfidenceIntervals = row.genotype_ci.parse()?;
        if genotype.alleles().len() != confidence.len() {
            return Err(TrioError::invalid_input(format!(
                "genotype '{}' and confidence interval '{}' have different allele counts",
                row.genotype, row.genotype_ci
            )));
        }
        let locus = LocusContext::new(&row.reference_region, &row.repeat_unit)?;
        let coverage = row.coverage.trim().parse::<f64>().map_err(|_| {
            TrioError::invalid_input(format!("coverage '{}' is not a number", row.coverage))
        })?;
        let read_support = ReadSupport::from_row(row)?;

        Ok(Self {
            genotype,
            confidence,
            locus,
            coverage,
            read_support,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CallStatus {
    Called(Call),
    NoCall,
    Invalid(TrioError),
}

/// (sample, locus, variant)
pub type CallKey<'a> = (&'a str, &'a str, &'a str);

/// A calls-table row with its pedigree parents joined in.
#[derive(Debug, Clone)]
pub struct CallRecord {
    pub row: CallRow,
    pub father_id: Option<String>,
    pub mother_id: Option<String>,
    pub status: CallStatus,
}

impl CallRecord {
    pub fn new(row: CallRow, parents: Option<&Parents>) -> Self {
        let status = if row.genotype.trim().is_empty() {
            CallStatus::NoCall
        } else {
            match Call::from_row(&row) {
                Ok(call) => CallStatus::Called(call),
                Err(e) => CallStatus::Invalid(e),
            }
        };
        Self {
            father_id: parents.map(|p| p.father_id.clone()),
            mother_id: parents.map(|p| p.mother_id.clone()),
            row,
            status,
        }
    }

    /// A row that could not be read into a call at all.
    pub fn invalid(row: CallRow, parents: Option<&Parents>, error: TrioError) -> Self {
        Self {
            father_id: parents.map(|p| p.father_id.clone()),
            mother_id: parents.map(|p| p.mother_id.clone()),
            row,
            status: CallStatus::Invalid(error),
        }
    }

    pub fn key(&self) -> CallKey<'_> {
        (
            self.row.sample_id.as_str(),
            self.row.locus_id.as_str(),
            self.row.variant_id.as_str(),
        )
    }

    pub fn call(&self) -> Option<&Call> {
        match &self.status {
            CallStatus::Called(call) => Some(call),
            _ => None,
        }
    }
}
