use super::{Call, ReadSupport, Trio, TrioMember};
use crate::mendel::{
    assign_transmission, classify_ci, classify_exact, Inheritance, Transmission, TrioError,
};
use itertools::Itertools;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Per-sample columns reported for each trio member.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberSummary {
    pub sample_id: String,
    pub genotype: String,
    pub genotype_ci: String,
    pub num_repeats_allele2: String,
    pub coverage: f64,
    pub read_support: Option<ReadSupport>,
}

impl MemberSummary {
    fn new(member: &TrioMember) -> Self {
        Self {
            sample_id: member.record.row.sample_id.clone(),
            genotype: member.call.genotype.to_string(),
            genotype_ci: member.call.confidence.to_string(),
            num_repeats_allele2: member.record.row.num_repeats_allele2.clone(),
            coverage: member.call.coverage,
            read_support: member.call.read_support,
        }
    }
}

/// Classification of one trio at one locus and variant.
#[derive(Debug, Clone, PartialEq)]
pub struct ViolationRecord {
    pub locus_id: String,
    pub variant_id: String,
    pub reference_region: String,
    pub repeat_unit: String,
    pub exact: Inheritance,
    pub ci: Inheritance,
    pub transmission: Transmission,
    pub proband: MemberSummary,
    pub father: MemberSummary,
    pub mother: MemberSummary,
    pub proband_sex: String,
    pub proband_ci_width: u32,
    pub all_genotypes_same: bool,
    pub all_homozygous_reference: bool,
}

impl ViolationRecord {
    /// `<locus> (<variant>)`, the grouping label used in the output tables.
    pub fn locus_label(&self) -> String {
        format!("{} ({})", self.locus_id, self.variant_id)
    }

    pub fn repeat_unit_len(&self) -> usize {
        self.repeat_unit.len()
    }

    pub fn summary(&self) -> &'static str {
        if self.ci.is_violation() {
            "MV-CI!"
        } else if self.exact.is_violation() {
            "MV"
        } else {
            "ok"
        }
    }

    pub fn min_coverage(&self) -> f64 {
        self.proband
            .coverage
            .min(self.father.coverage)
            .min(self.mother.coverage)
    }

    pub fn results_summary(&self) -> String {
        format!(
            "{}  d:{}  ({} + {} => {}) {}  {}  {}",
            self.locus_id,
            self.exact.distance,
            self.father.genotype,
            self.mother.genotype,
            self.proband.genotype,
            self.proband.sample_id,
            self.father.sample_id,
            self.mother.sample_id
        )
    }

    pub fn ci_results_summary(&self) -> String {
        format!(
            "{}   ({} + {} => {})  {}  {}  {}",
            self.locus_id,
            self.father.genotype_ci,
            self.mother.genotype_ci,
            self.proband.genotype_ci,
            self.proband.sample_id,
            self.father.sample_id,
            self.mother.sample_id
        )
    }

    /// Read support of all three members, when every one of them has it.
    pub fn read_support(&self) -> Option<[ReadSupport; 3]> {
        Some([
            self.proband.read_support?,
            self.father.read_support?,
            self.mother.read_support?,
        ])
    }
}

/// Classifies a trio with exact genotypes and with confidence intervals.
pub fn classify_trio(trio: &Trio) -> Result<ViolationRecord, TrioError> {
    let (proband, father, mother) = (trio.proband.call, trio.father.call, trio.mother.call);
    let locus = &proband.locus;
    let row = &trio.proband.record.row;

    let exact = classify_exact(
        &proband.genotype,
        &father.genotype,
        &mother.genotype,
        locus.is_chrx,
    )?;
    let ci = classify_ci(
        &proband.confidence,
        &father.confidence,
        &mother.confidence,
        locus.is_chrx,
    )?;
    let transmission = assign_transmission(
        proband.genotype.alleles(),
        father.genotype.alleles(),
        mother.genotype.alleles(),
        locus.is_chrx,
    )?;

    if !locus.spans_whole_repeat_units() {
        log::warn!(
            "{} is not a multiple of the repeat unit size ({})",
            row.reference_region,
            locus.repeat_unit_len
        );
    }
    let reference_count = locus.reference_repeat_count();
    let allele_set = |call: &Call| -> HashSet<u32> {
        call.genotype.alleles().iter().copied().collect()
    };
    let all_genotypes_same =
        allele_set(proband) == allele_set(mother) && allele_set(proband) == allele_set(father);
    let all_homozygous_reference = [proband, father, mother]
        .iter()
        .all(|call| call.genotype.is_homozygous_for(reference_count));

    Ok(ViolationRecord {
        locus_id: row.locus_id.clone(),
        variant_id: row.variant_id.clone(),
        reference_region: row.reference_region.clone(),
        repeat_unit: row.repeat_unit.clone(),
        exact,
        ci,
        transmission,
        proband: MemberSummary::new(&trio.proband),
        father: MemberSummary::new(&trio.father),
        mother: MemberSummary::new(&trio.mother),
        proband_sex: row.sex.clone(),
        proband_ci_width: proband.confidence.last_width(),
        all_genotypes_same,
        all_homozygous_reference,
    })
}

/// Violation counts per `<locus> (<repeat unit>)`, built from classified trios.
///
/// Percentages are taken over every trio that was paired, including trios
/// that failed classification.
#[derive(Debug, Default)]
pub struct ViolationTally {
    pub num_trios: usize,
    pub num_classified: usize,
    exact: HashMap<String, usize>,
    ci: HashMap<String, usize>,
    exact_summaries: Vec<String>,
    ci_summaries: Vec<String>,
}

impl ViolationTally {
    pub fn from_records(records: &[ViolationRecord], num_trios: usize) -> Self {
        let mut tally = Self::default();
        for record in records {
            tally.add(record);
        }
        tally.num_trios = num_trios.max(tally.num_classified);
        tally
    }

    pub fn add(&mut self, record: &ViolationRecord) {
        self.num_classified += 1;
        self.num_trios = self.num_trios.max(self.num_classified);
        let label = format!("{} ({})", record.locus_id, record.repeat_unit);
        if record.exact.is_violation() {
            *self.exact.entry(label.clone()).or_default() += 1;
            self.exact_summaries.push(record.results_summary());
        }
        if record.ci.is_violation() {
            *self.ci.entry(label).or_default() += 1;
            self.ci_summaries.push(record.ci_results_summary());
        }
    }

    pub fn exact_counts(&self) -> Vec<(&str, usize)> {
        Self::sorted_counts(&self.exact)
    }

    pub fn ci_counts(&self) -> Vec<(&str, usize)> {
        Self::sorted_counts(&self.ci)
    }

    fn sorted_counts(counts: &HashMap<String, usize>) -> Vec<(&str, usize)> {
        counts
            .iter()
            .map(|(label, &count)| (label.as_str(), count))
            .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)))
            .collect()
    }

    pub fn percentage(&self, count: usize) -> f64 {
        if self.num_trios == 0 {
            0.0
        } else {
            100.0 * count as f64 / self.num_trios as f64
        }
    }

    pub fn log_report(&self) {
        for (kind, counts, summaries) in [
            ("exact", self.exact_counts(), &self.exact_summaries),
            ("CI", self.ci_counts(), &self.ci_summaries),
        ] {
            log::info!(
                "Mendelian violations ({}) in {} trio calls ({} classified):",
                kind,
                self.num_trios,
                self.num_classified
            );
            for (label, count) in counts {
                log::info!("{:5}  ({:.0}%) {}", count, self.percentage(count), label);
            }
            for summary in summaries.iter().sorted() {
                log::debug!("{}", summary);
            }
        }
    }
}

/// Aggregate of all trios classified at one locus and variant.
#[derive(Debug, Clone, PartialEq)]
pub struct LocusStats {
    pub locus_label: String,
    pub reference_region: String,
    pub variant_id: String,
    pub repeat_unit: String,
    pub repeat_unit_len: usize,
    pub num_violations: usize,
    pub num_violations_ci: usize,
    pub total_distance: u64,
    pub total_distance_ci: u64,
    pub num_trios: usize,
}

/// Groups records by locus, reference region, variant and repeat unit, in sorted key order.
pub fn summarize_loci(records: &[ViolationRecord]) -> Vec<LocusStats> {
    let mut groups: BTreeMap<(String, String, String, String), LocusStats> = BTreeMap::new();
    for record in records {
        let key = (
            record.locus_label(),
            record.reference_region.clone(),
            record.variant_id.clone(),
            record.repeat_unit.clone(),
        );
        let stats = groups.entry(key).or_insert_with(|| LocusStats {
            locus_label: record.locus_label(),
            reference_region: record.reference_region.clone(),
            variant_id: record.variant_id.clone(),
            repeat_unit: record.repeat_unit.clone(),
            repeat_unit_len: record.repeat_unit_len(),
            num_violations: 0,
            num_violations_ci: 0,
            total_distance: 0,
            total_distance_ci: 0,
            num_trios: 0,
        });
        stats.num_violations += usize::from(record.exact.is_violation());
        stats.num_violations_ci += usize::from(record.ci.is_violation());
        stats.total_distance += record.exact.distance;
        stats.total_distance_ci += record.ci.distance;
        stats.num_trios += 1;
    }
    groups.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trio::{group_by_trio, read_calls, Pedigree};

    const HEADER: &str = "SampleId\tLocusId\tVariantId\tGenotype\tGenotypeConfidenceInterval\tReferenceRegion\tRepeatUnit\tSex\tNum Repeats: Allele 2\tCoverage";

    const FAM: &str = "\
f1 kid dad mom 2 2
f2 son dad2 mom2 1 2
";

    fn classify(rows: &str) -> Vec<ViolationRecord> {
        let pedigree = Pedigree::from_reader(std::io::Cursor::new(FAM)).unwrap();
        let data = format!("{}\n{}", HEADER, rows);
        let table = read_calls(data.as_bytes(), "SampleId", &pedigree).unwrap();
        let grouping = group_by_trio(&table.records);
        grouping
            .trios
            .iter()
            .map(|trio| classify_trio(trio).unwrap())
            .collect()
    }

    #[test]
    fn test_classify_consistent_trio() {
        let records = classify(
            "\
kid\tHTT\tHTT\t17/19\t17-17/19-19\tchr4:3074876-3074933\tCAG\tfemale\t19\t30
dad\tHTT\tHTT\t19/30\t19-19/30-31\tchr4:3074876-3074933\tCAG\tmale\t30\t28
mom\tHTT\tHTT\t17/40\t17-17/38-42\tchr4:3074876-3074933\tCAG\tfemale\t40\t12.5
",
        );
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert!(record.exact.consistent);
        assert!(record.ci.consistent);
        assert_eq!(record.summary(), "ok");
        assert_eq!(record.locus_label(), "HTT (HTT)");
        assert_eq!(record.transmission.from_father, Some(19));
        assert_eq!(record.transmission.from_mother, Some(17));
        assert_eq!(record.min_coverage(), 12.5);
        assert_eq!(record.proband_ci_width, 0);
        assert!(!record.all_genotypes_same);
        assert!(!record.all_homozygous_reference);
        assert!(record.read_support().is_none());
        assert_eq!(
            record.results_summary(),
            "HTT  d:0  (19/30 + 17/40 => 17/19) kid  dad  mom"
        );
    }

    #[test]
    fn test_classify_violation_with_overlapping_ci() {
        let records = classify(
            "\
kid\tHTT\tHTT\t17/19\t16-18/19-21\tchr4:3074876-3074933\tCAG\tfemale\t19\t30
dad\tHTT\tHTT\t15/16\t15-15/16-16\tchr4:3074876-3074933\tCAG\tmale\t16\t28
mom\tHTT\tHTT\t20/21\t20-20/21-21\tchr4:3074876-3074933\tCAG\tfemale\t21\t31
",
        );
        let record = &records[0];
        assert!(record.exact.is_violation());
        assert_eq!(record.exact.distance, 2);
        assert!(record.ci.consistent);
        assert_eq!(record.summary(), "MV");
        assert_eq!(record.proband_ci_width, 2);
    }

    #[test]
    fn test_classify_hemizygous_son() {
        let records = classify(
            "\
son\tAR\tAR\t23\t22-24\tchrX:67545316-67545385\tGCA\tmale\t23\t15
dad2\tAR\tAR\t23\t23-23\tchrX:67545316-67545385\tGCA\tmale\t23\t15
mom2\tAR\tAR\t23/23\t23-23/23-23\tchrX:67545316-67545385\tGCA\tfemale\t23\t30
",
        );
        let record = &records[0];
        assert!(record.exact.consistent);
        assert!(record.ci.consistent);
        assert_eq!(record.transmission.mother_allele, Some(23));
        assert_eq!(record.transmission.from_mother, Some(23));
        assert_eq!(record.transmission.father_allele, None);
        assert!(record.all_homozygous_reference);
        assert!(record.all_genotypes_same);
    }

    #[test]
    fn test_tally_and_locus_stats() {
        let records = classify(
            "\
kid\tHTT\tHTT\t17/19\t17-17/19-19\tchr4:3074876-3074933\tCAG\tfemale\t19\t30
dad\tHTT\tHTT\t15/16\t15-15/16-16\tchr4:3074876-3074933\tCAG\tmale\t16\t28
mom\tHTT\tHTT\t20/21\t20-20/21-21\tchr4:3074876-3074933\tCAG\tfemale\t21\t31
son\tHTT\tHTT\t19/19\t19-19/19-19\tchr4:3074876-3074933\tCAG\tmale\t19\t30
dad2\tHTT\tHTT\t19/19\t19-19/19-19\tchr4:3074876-3074933\tCAG\tmale\t19\t28
mom2\tHTT\tHTT\t19/19\t19-19/19-19\tchr4:3074876-3074933\tCAG\tfemale\t19\t31
",
        );
        assert_eq!(records.len(), 2);
        assert!(records[1].all_genotypes_same);
        assert!(records[1].all_homozygous_reference);

        let tally = ViolationTally::from_records(&records, records.len());
        assert_eq!(tally.num_trios, 2);
        assert_eq!(tally.exact_counts(), vec![("HTT (CAG)", 1)]);
        assert_eq!(tally.ci_counts(), vec![("HTT (CAG)", 1)]);
        assert_eq!(tally.percentage(1), 50.0);

        // Two more trios were paired but failed to classify
        let tally = ViolationTally::from_records(&records, 4);
        assert_eq!(tally.num_classified, 2);
        assert_eq!(tally.num_trios, 4);
        assert_eq!(tally.percentage(1), 25.0);
        assert_eq!(
            records[0].ci_results_summary(),
            "HTT   (15-15/16-16 + 20-20/21-21 => 17-17/19-19)  kid  dad  mom"
        );

        let stats = summarize_loci(&records);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].locus_label, "HTT (HTT)");
        assert_eq!(stats[0].repeat_unit_len, 3);
        assert_eq!(stats[0].num_violations, 1);
        assert_eq!(stats[0].num_violations_ci, 1);
        assert_eq!(stats[0].total_distance, 2);
        assert_eq!(stats[0].total_distance_ci, 2);
        assert_eq!(stats[0].num_trios, 2);
    }
}
