use crate::cli::ValidateArgs;
use crate::trio::{group_by_trio, read_calls_from_path, CallStatus, CallTable, Pedigree};
use crate::utils::{format_number_with_commas, Result};

pub fn validate(args: ValidateArgs) -> Result<()> {
    let pedigree = match &args.fam_path {
        Some(path) => {
            let pedigree = Pedigree::from_path(path)?;
            log::info!(
                "Pedigree lists {} individuals with known parents",
                format_number_with_commas(pedigree.len())
            );
            pedigree
        }
        None => Pedigree::default(),
    };
    let table = read_calls_from_path(&args.calls_path, &args.sample_id_column, &pedigree)?;
    let summary = summarize_table(&table);

    if let Some(stats) = &summary.repeat_unit_stats {
        log::info!(
            "Repeat Unit Lengths - Range: [{},{}], Median: {:.2}, Mean: {:.2}, StdDev: {:.2}",
            stats.min,
            stats.max,
            stats.median,
            stats.mean,
            stats.std_dev
        );
    }
    if let Some(stats) = &summary.reference_count_stats {
        log::info!(
            "Reference Repeat Counts - Range: [{},{}], Median: {:.2}, Mean: {:.2}, StdDev: {:.2}",
            stats.min,
            stats.max,
            stats.median,
            stats.mean,
            stats.std_dev
        );
    }
    if summary.partial_repeat_units > 0 {
        log::warn!(
            "{} called rows have a reference region that is not a multiple of the repeat unit size",
            format_number_with_commas(summary.partial_repeat_units)
        );
    }
    if args.fam_path.is_some() {
        let grouping = group_by_trio(&table.records);
        log::info!(
            "Found {} trio calls from {} families",
            format_number_with_commas(grouping.trios.len()),
            format_number_with_commas(grouping.num_families)
        );
    }

    let total = table.records.len();
    match summary.invalid {
        0 => log::info!(
            "Validation successful. Rows called={}, no call={}",
            summary.called,
            summary.no_call
        ),
        _ => log::info!(
            "Validation failed. Rows called={}, no call={}, invalid={} ({:.2}%)",
            summary.called,
            summary.no_call,
            summary.invalid,
            (summary.invalid as f64 / total as f64) * 100.0
        ),
    }
    Ok(())
}

#[derive(Debug, Default)]
struct TableSummary {
    called: usize,
    no_call: usize,
    invalid: usize,
    partial_repeat_units: usize,
    repeat_unit_stats: Option<Stats>,
    reference_count_stats: Option<Stats>,
}

fn summarize_table(table: &CallTable) -> TableSummary {
    let mut summary = TableSummary::default();
    let mut repeat_unit_lengths = Vec::new();
    let mut reference_counts = Vec::new();
    for record in &table.records {
        match &record.status {
            CallStatus::Called(call) => {
                summary.called += 1;
                repeat_unit_lengths.push(call.locus.repeat_unit_len);
                reference_counts.push(call.locus.reference_repeat_count() as usize);
                if !call.locus.spans_whole_repeat_units() {
                    summary.partial_repeat_units += 1;
                }
            }
            CallStatus::NoCall => summary.no_call += 1,
            CallStatus::Invalid(_) => summary.invalid += 1,
        }
    }
    summary.repeat_unit_stats = calculate_stats(&repeat_unit_lengths);
    summary.reference_count_stats = calculate_stats(&reference_counts);
    summary
}

fn calculate_stats(data: &[usize]) -> Option<Stats> {
    if data.is_empty() {
        return None;
    }
    let mut sorted = data.to_vec();
    sorted.sort_unstable();
    let len = sorted.len();
    let median = if len % 2 == 0 {
        (sorted[len / 2 - 1] + sorted[len / 2]) as f64 / 2.0
    } else {
        sorted[len / 2] as f64
    };
    let sum: usize = sorted.iter().sum();
    let mean = sum as f64 / len as f64;
    let std_dev = (sorted
        .iter()
        .map(|&x| (x as f64 - mean).powi(2))
        .sum::<f64>()
        / len as f64)
        .sqrt();
    Some(Stats {
        min: sorted[0],
        max: sorted[len - 1],
        mean,
        median,
        std_dev,
    })
}

#[derive(Debug, PartialEq)]
struct Stats {
    min: usize,
    max: usize,
    mean: f64,
    median: f64,
    std_dev: f64,
}
