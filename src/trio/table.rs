use super::{CallKey, CallRecord, CallRow, CallStatus, Pedigree};
use crate::mendel::TrioError;
use crate::utils::{format_number_with_commas, open_table_reader, Result};
use csv::{ReaderBuilder, StringRecord};
use std::{collections::HashMap, io::Read, path::Path};

const SAMPLE_ID_COLUMN: &str = "SampleId";

pub const REQUIRED_COLUMNS: [&str; 10] = [
    SAMPLE_ID_COLUMN,
    "LocusId",
    "VariantId",
    "Genotype",
    "GenotypeConfidenceInterval",
    "ReferenceRegion",
    "RepeatUnit",
    "Sex",
    "Num Repeats: Allele 2",
    "Coverage",
];

const READ_SUPPORT_COLUMNS: [&str; 6] = [
    "NumSpanningReads",
    "NumFlankingReads",
    "NumInrepeatReads",
    "NumAllelesSupportedBySpanningReads",
    "NumAllelesSupportedByFlankingReads",
    "NumAllelesSupportedByInrepeatReads",
];

/// All rows of a calls table, in input order.
#[derive(Debug, Clone)]
pub struct CallTable {
    pub records: Vec<CallRecord>,
    pub has_read_support: bool,
}

impl CallTable {
    pub fn num_called(&self) -> usize {
        self.records.iter().filter(|r| r.call().is_some()).count()
    }

    pub fn num_invalid(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r.status, CallStatus::Invalid(_)))
            .count()
    }
}

pub fn read_calls_from_path(
    path: &Path,
    sample_id_column: &str,
    pedigree: &Pedigree,
) -> Result<CallTable> {
    let reader = open_table_reader(path)?;
    let table = read_calls(reader, sample_id_column, pedigree)
        .map_err(|e| format!("{}: {}", path.display(), e))?;
    log::info!(
        "Parsed {} rows from {}",
        format_number_with_commas(table.records.len()),
        path.display()
    );
    Ok(table)
}

/// Reads a tab-separated calls table and joins pedigree parents onto each row.
///
/// Rows that fail validation, including rows with the wrong number of fields,
/// are kept with an invalid status so they can be reported; a repeated
/// (sample, locus, variant) key fails the whole table.
pub fn read_calls<R: Read>(
    reader: R,
    sample_id_column: &str,
    pedigree: &Pedigree,
) -> Result<CallTable> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .quoting(false)
        .flexible(true)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| format!("Error reading header: {}", e))?
        .clone();
    let headers = rename_sample_id_column(&headers, sample_id_column);
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            let column = if column == SAMPLE_ID_COLUMN {
                sample_id_column
            } else {
                column
            };
            return Err(format!("Missing column: {}", column));
        }
    }
    let has_read_support = READ_SUPPORT_COLUMNS
        .iter()
        .all(|column| headers.iter().any(|h| h == *column));
    let mut records = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let line_number = index + 2;
        let fields = result.map_err(|e| format!("Error reading line {}: {}", line_number, e))?;
        let record = match parse_row(&headers, &fields) {
            Ok(row) => {
                let parents = pedigree.parents(&row.sample_id);
                CallRecord::new(row, parents)
            }
            Err(e) => {
                let row = partial_row(&headers, &fields);
                let parents = pedigree.parents(&row.sample_id);
                CallRecord::invalid(row, parents, e)
            }
        };
        if let CallStatus::Invalid(e) = &record.status {
            log::warn!(
                "Line {}: skipping {} {} {}: {}",
                line_number,
                record.row.sample_id,
                record.row.locus_id,
                record.row.variant_id,
                e
            );
        }
        records.push(record);
    }

    check_for_duplicate_keys(&records)?;
    Ok(CallTable {
        records,
        has_read_support,
    })
}

fn parse_row(
    headers: &StringRecord,
    fields: &StringRecord,
) -> std::result::Result<CallRow, TrioError> {
    if fields.len() != headers.len() {
        return Err(TrioError::invalid_input(format!(
            "expected {} fields, found {}",
            headers.len(),
            fields.len()
        )));
    }
    fields
        .deserialize(Some(headers))
        .map_err(|e| TrioError::invalid_input(e.to_string()))
}

/// Whatever required fields a malformed row has, so it can still be reported.
fn partial_row(headers: &StringRecord, fields: &StringRecord) -> CallRow {
    let field = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .and_then(|index| fields.get(index))
            .unwrap_or_default()
            .to_string()
    };
    CallRow {
        sample_id: field(SAMPLE_ID_COLUMN),
        locus_id: field("LocusId"),
        variant_id: field("VariantId"),
        genotype: field("Genotype"),
        genotype_ci: field("GenotypeConfidenceInterval"),
        reference_region: field("ReferenceRegion"),
        repeat_unit: field("RepeatUnit"),
        sex: field("Sex"),
        num_repeats_allele2: field("Num Repeats: Allele 2"),
        coverage: field("Coverage"),
        ..Default::default()
    }
}

fn rename_sample_id_column(headers: &StringRecord, sample_id_column: &str) -> StringRecord {
    if sample_id_column == SAMPLE_ID_COLUMN {
        return headers.clone();
    }
    headers
        .iter()
        .map(|h| {
            if h == sample_id_column {
                SAMPLE_ID_COLUMN
            } else if h == SAMPLE_ID_COLUMN {
                "OriginalSampleId"
            } else {
                h
            }
        })
        .collect()
}

fn check_for_duplicate_keys(records: &[CallRecord]) -> Result<()> {
    let mut seen: HashMap<CallKey, usize> = HashMap::with_capacity(records.len());
    let mut num_duplicates = 0;
    for (index, record) in records.iter().enumerate() {
        if let Some(&first) = seen.get(&record.key()) {
            num_duplicates += 1;
            log::error!(
                "Duplicate key {:?} at rows {} and {}",
                record.key(),
                first + 2,
                index + 2
            );
        } else {
            seen.insert(record.key(), index);
        }
    }
    if num_duplicates > 0 {
        return Err(format!("Found {} duplicate keys", num_duplicates));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "SampleId\tLocusId\tVariantId\tGenotype\tGenotypeConfidenceInterval\tReferenceRegion\tRepeatUnit\tSex\tNum Repeats: Allele 2\tCoverage";

    fn pedigree() -> Pedigree {
        Pedigree::from_reader(std::io::Cursor::new("f kid dad mom 1 2\n")).unwrap()
    }

    #[test]
    fn test_read_calls() {
        let data = format!(
            "{}\n\
kid\tHTT\tHTT\t17/19\t17-17/19-19\tchr4:3074876-3074933\tCAG\tfemale\t19\t30.2\n\
dad\tHTT\tHTT\t19/21\t19-19/21-22\tchr4:3074876-3074933\tCAG\tmale\t21\t28\n\
mom\tHTT\tHTT\t\t\tchr4:3074876-3074933\tCAG\tfemale\t\t3\n\
mom\tFMR1\tFMR1\t30/x\t30-30/1-2\tchrX:147912050-147912110\tCGG\tfemale\t\t25\n",
            HEADER
        );
        let table = read_calls(data.as_bytes(), "SampleId", &pedigree()).unwrap();
        assert_eq!(table.records.len(), 4);
        assert!(!table.has_read_support);
        assert_eq!(table.num_called(), 2);
        assert_eq!(table.num_invalid(), 1);

        let kid = &table.records[0];
        assert_eq!(kid.father_id.as_deref(), Some("dad"));
        assert_eq!(kid.call().unwrap().genotype.to_string(), "17/19");
        assert!(table.records[1].father_id.is_none());
        assert_eq!(table.records[2].status, CallStatus::NoCall);
        assert!(matches!(
            table.records[3].status,
            CallStatus::Invalid(TrioError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_custom_sample_id_column() {
        let data = "\
Sample\tLocusId\tVariantId\tGenotype\tGenotypeConfidenceInterval\tReferenceRegion\tRepeatUnit\tSex\tNum Repeats: Allele 2\tCoverage\tSampleId\n\
kid\tHTT\tHTT\t17/19\t17-17/19-19\tchr4:3074876-3074933\tCAG\tfemale\t19\t30\tkid.bam\n";
        let table = read_calls(data.as_bytes(), "Sample", &pedigree()).unwrap();
        assert_eq!(table.records[0].row.sample_id, "kid");
        assert_eq!(table.records[0].mother_id.as_deref(), Some("mom"));
    }

    #[test]
    fn test_missing_column_err() {
        let data = "SampleId\tLocusId\tVariantId\tGenotype\n";
        let result = read_calls(data.as_bytes(), "SampleId", &pedigree());
        assert_eq!(
            result.unwrap_err(),
            "Missing column: GenotypeConfidenceInterval"
        );

        let result = read_calls(data.as_bytes(), "Sample", &pedigree());
        assert_eq!(result.unwrap_err(), "Missing column: Sample");
    }

    #[test]
    fn test_short_row_is_invalid_not_fatal() {
        let data = format!(
            "{}\n\
kid\tHTT\tHTT\t17/19\t17-17/19-19\tchr4:3074876-3074933\tCAG\tfemale\t19\t30\n\
dad\tHTT\tHTT\n\
mom\tHTT\tHTT\t17/20\t17-17/20-20\tchr4:3074876-3074933\tCAG\tfemale\t20\t30\textra\n",
            HEADER
        );
        let table = read_calls(data.as_bytes(), "SampleId", &pedigree()).unwrap();
        assert_eq!(table.records.len(), 3);
        assert_eq!(table.num_called(), 1);
        assert_eq!(table.num_invalid(), 2);

        let short = &table.records[1];
        assert_eq!(short.key(), ("dad", "HTT", "HTT"));
        assert_eq!(short.row.genotype, "");
        assert!(matches!(
            short.status,
            CallStatus::Invalid(TrioError::InvalidInput(_))
        ));
        assert_eq!(table.records[2].row.genotype, "17/20");
    }

    #[test]
    fn test_duplicate_keys_err() {
        let data = format!(
            "{}\n\
kid\tHTT\tHTT\t17/19\t17-17/19-19\tchr4:3074876-3074933\tCAG\tfemale\t19\t30\n\
kid\tHTT\tHTT\t17/20\t17-17/20-20\tchr4:3074876-3074933\tCAG\tfemale\t20\t30\n",
            HEADER
        );
        let result = read_calls(data.as_bytes(), "SampleId", &pedigree());
        assert_eq!(result.unwrap_err(), "Found 1 duplicate keys");
    }

    #[test]
    fn test_read_support_columns() {
        let data = format!(
            "{}\tNumSpanningReads\tNumFlankingReads\tNumInrepeatReads\tNumAllelesSupportedBySpanningReads\tNumAllelesSupportedByFlankingReads\tNumAllelesSupportedByInrepeatReads\n\
kid\tHTT\tHTT\t17/19\t17-17/19-19\tchr4:3074876-3074933\tCAG\tfemale\t19\t30\t12\t3\t0\t2\t0\t0\n",
            HEADER
        );
        let table = read_calls(data.as_bytes(), "SampleId", &pedigree()).unwrap();
        assert!(table.has_read_support);
        let support = table.records[0].call().unwrap().read_support.unwrap();
        assert_eq!(support.spanning_reads, 12);
        assert_eq!(support.supported_alleles(), 2);
    }
}
