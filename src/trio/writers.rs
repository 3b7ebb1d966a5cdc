//! Tab-separated result tables.

use super::{LocusStats, Unpaired, ViolationRecord, REQUIRED_COLUMNS};
use crate::utils::Result;
use csv::{Writer, WriterBuilder};
use std::{fs::File, io::Write};

const VIOLATION_COLUMNS: [&str; 36] = [
    "LocusId",
    "ReferenceRegion",
    "VariantId",
    "RepeatUnit",
    "RepeatUnitLength",
    "IsMendelianViolation",
    "IsMendelianViolationCI",
    "MendelianViolationDistance",
    "MendelianViolationDistanceCI",
    "MendelianViolationSummary",
    "ProbandGenotype",
    "ProbandGenotypeCI",
    "ProbandGenotypeCI_size",
    "FatherGenotype",
    "FatherGenotypeCI",
    "MotherGenotype",
    "MotherGenotypeCI",
    "AllGenotypesAreTheSame",
    "AllGenotypesAreHomozygousReference",
    "ProbandSampleId",
    "FatherSampleId",
    "MotherSampleId",
    "ProbandSex",
    "ProbandNumRepeatsAllele2",
    "FatherNumRepeatsAllele2",
    "MotherNumRepeatsAllele2",
    "ProbandCoverage",
    "FatherCoverage",
    "MotherCoverage",
    "MinCoverage",
    "MendelianResultsSummary",
    "MendelianCIResultsSummary",
    "FatherTransmittedAllele",
    "MotherTransmittedAllele",
    "ProbandNumRepeatsFromFather",
    "ProbandNumRepeatsFromMother",
];

const READ_SUPPORT_MEMBERS: [&str; 3] = ["Proband", "Father", "Mother"];

const LOCUS_STATS_COLUMNS: [&str; 10] = [
    "LocusId",
    "ReferenceRegion",
    "VariantId",
    "RepeatUnit",
    "RepeatUnitLength",
    "IsMendelianViolation",
    "IsMendelianViolationCI",
    "MendelianViolationDistance",
    "MendelianViolationDistanceCI",
    "ProbandSampleId",
];

fn tsv_writer<W: Write>(writer: W) -> Writer<W> {
    WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(writer)
}

fn open_tsv(path: &str) -> Result<Writer<File>> {
    let file = File::create(path).map_err(|e| format!("Failed to create {}: {}", path, e))?;
    Ok(tsv_writer(file))
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Writes one row per classified trio.
pub struct ViolationWriter<W: Write> {
    writer: Writer<W>,
    with_read_support: bool,
    num_written: usize,
}

impl ViolationWriter<File> {
    pub fn new(path: &str, with_read_support: bool) -> Result<Self> {
        let file = File::create(path).map_err(|e| format!("Failed to create {}: {}", path, e))?;
        Self::from_writer(file, with_read_support)
    }
}

impl<W: Write> ViolationWriter<W> {
    pub fn from_writer(writer: W, with_read_support: bool) -> Result<Self> {
        let mut writer = tsv_writer(writer);
        let mut header: Vec<String> = VIOLATION_COLUMNS.iter().map(|c| c.to_string()).collect();
        if with_read_support {
            for member in READ_SUPPORT_MEMBERS {
                header.push(format!("{}NumSpanningReads", member));
                header.push(format!("{}NumFlankingReads", member));
                header.push(format!("{}NumInrepeatReads", member));
            }
            for member in READ_SUPPORT_MEMBERS {
                header.push(format!("{}NumSupportedAlleles", member));
            }
        }
        writer.write_record(&header).map_err(|e| e.to_string())?;
        Ok(Self {
            writer,
            with_read_support,
            num_written: 0,
        })
    }

    pub fn write(&mut self, record: &ViolationRecord) -> Result<()> {
        let t = &record.transmission;
        let mut fields = vec![
            record.locus_label(),
            record.reference_region.clone(),
            record.variant_id.clone(),
            record.repeat_unit.clone(),
            record.repeat_unit_len().to_string(),
            record.exact.is_violation().to_string(),
            record.ci.is_violation().to_string(),
            record.exact.distance.to_string(),
            record.ci.distance.to_string(),
            record.summary().to_string(),
            record.proband.genotype.clone(),
            record.proband.genotype_ci.clone(),
            record.proband_ci_width.to_string(),
            record.father.genotype.clone(),
            record.father.genotype_ci.clone(),
            record.mother.genotype.clone(),
            record.mother.genotype_ci.clone(),
            record.all_genotypes_same.to_string(),
            record.all_homozygous_reference.to_string(),
            record.proband.sample_id.clone(),
            record.father.sample_id.clone(),
            record.mother.sample_id.clone(),
            record.proband_sex.clone(),
            record.proband.num_repeats_allele2.clone(),
            record.father.num_repeats_allele2.clone(),
            record.mother.num_repeats_allele2.clone(),
            record.proband.coverage.to_string(),
            record.father.coverage.to_string(),
            record.mother.coverage.to_string(),
            record.min_coverage().to_string(),
            record.results_summary(),
            record.ci_results_summary(),
            optional(t.father_allele),
            optional(t.mother_allele),
            optional(t.from_father),
            optional(t.from_mother),
        ];
        if self.with_read_support {
            let support = record.read_support();
            for member in 0..3 {
                let s = support.map(|s| s[member]);
                fields.push(optional(s.map(|s| s.spanning_reads)));
                fields.push(optional(s.map(|s| s.flanking_reads)));
                fields.push(optional(s.map(|s| s.inrepeat_reads)));
            }
            for member in 0..3 {
                fields.push(optional(support.map(|s| s[member].supported_alleles())));
            }
        }
        self.writer
            .write_record(&fields)
            .map_err(|e| format!("Failed to write record: {}", e))?;
        self.num_written += 1;
        Ok(())
    }

    pub fn num_written(&self) -> usize {
        self.num_written
    }

    pub fn finish(mut self) -> Result<()> {
        self.writer.flush().map_err(|e| e.to_string())
    }
}

/// Writes rows that were not the proband of a complete trio, with the reason.
pub fn write_non_trio_rows(
    path: &str,
    sample_id_column: &str,
    rows: &[Unpaired],
    with_read_support: bool,
) -> Result<()> {
    write_non_trio_rows_to(open_tsv(path)?, sample_id_column, rows, with_read_support)
}

fn write_non_trio_rows_to<W: Write>(
    mut writer: Writer<W>,
    sample_id_column: &str,
    rows: &[Unpaired],
    with_read_support: bool,
) -> Result<()> {
    let mut header: Vec<&str> = REQUIRED_COLUMNS.to_vec();
    header[0] = sample_id_column;
    if with_read_support {
        header.extend([
            "NumSpanningReads",
            "NumFlankingReads",
            "NumInrepeatReads",
            "NumAllelesSupportedBySpanningReads",
            "NumAllelesSupportedByFlankingReads",
            "NumAllelesSupportedByInrepeatReads",
        ]);
    }
    header.extend(["father_id", "mother_id", "Reason"]);
    writer.write_record(&header).map_err(|e| e.to_string())?;

    for unpaired in rows {
        let row = &unpaired.record.row;
        let mut fields: Vec<&str> = vec![
            row.sample_id.as_str(),
            row.locus_id.as_str(),
            row.variant_id.as_str(),
            row.genotype.as_str(),
            row.genotype_ci.as_str(),
            row.reference_region.as_str(),
            row.repeat_unit.as_str(),
            row.sex.as_str(),
            row.num_repeats_allele2.as_str(),
            row.coverage.as_str(),
        ];
        if with_read_support {
            for value in [
                &row.num_spanning_reads,
                &row.num_flanking_reads,
                &row.num_inrepeat_reads,
                &row.num_alleles_spanning,
                &row.num_alleles_flanking,
                &row.num_alleles_inrepeat,
            ] {
                fields.push(value.as_deref().unwrap_or_default());
            }
        }
        fields.push(unpaired.record.father_id.as_deref().unwrap_or_default());
        fields.push(unpaired.record.mother_id.as_deref().unwrap_or_default());
        fields.push(unpaired.reason.as_str());
        writer
            .write_record(&fields)
            .map_err(|e| format!("Failed to write record: {}", e))?;
    }
    writer.flush().map_err(|e| e.to_string())
}

pub fn write_locus_stats(path: &str, stats: &[LocusStats]) -> Result<()> {
    write_locus_stats_to(open_tsv(path)?, stats)
}

fn write_locus_stats_to<W: Write>(mut writer: Writer<W>, stats: &[LocusStats]) -> Result<()> {
    writer
        .write_record(LOCUS_STATS_COLUMNS)
        .map_err(|e| e.to_string())?;
    for locus in stats {
        writer
            .write_record([
                locus.locus_label.clone(),
                locus.reference_region.clone(),
                locus.variant_id.clone(),
                locus.repeat_unit.clone(),
                locus.repeat_unit_len.to_string(),
                locus.num_violations.to_string(),
                locus.num_violations_ci.to_string(),
                locus.total_distance.to_string(),
                locus.total_distance_ci.to_string(),
                locus.num_trios.to_string(),
            ])
            .map_err(|e| format!("Failed to write locus stats: {}", e))?;
    }
    writer.flush().map_err(|e| e.to_string())
}
