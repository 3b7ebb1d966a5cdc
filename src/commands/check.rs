use crate::cli::CheckArgs;
use crate::mendel::TrioError;
use crate::trio::{
    classify_trio, group_by_trio, read_calls_from_path, summarize_loci, write_locus_stats,
    write_non_trio_rows, Pedigree, Trio, ViolationRecord, ViolationTally, ViolationWriter,
};
use crate::utils::{create_writer, default_output_prefix, format_number_with_commas, Result};
use rayon::{
    iter::{IntoParallelRefIterator, ParallelIterator},
    ThreadPoolBuilder,
};
use std::{path::PathBuf, time};

#[derive(Debug, Clone)]
pub struct CheckParams {
    pub calls_path: PathBuf,
    pub fam_path: PathBuf,
    pub sample_id_column: String,
    pub output_prefix: String,
    pub locus_stats: bool,
    pub num_threads: usize,
}

impl CheckParams {
    pub fn from_args(args: CheckArgs) -> Self {
        let output_prefix = args
            .output_prefix
            .unwrap_or_else(|| default_output_prefix(&args.calls_path));
        Self {
            calls_path: args.calls_path,
            fam_path: args.fam_path,
            sample_id_column: args.sample_id_column,
            output_prefix,
            locus_stats: args.locus_stats,
            num_threads: args.num_threads,
        }
    }
}

pub fn check(args: CheckArgs) -> Result<()> {
    let start_timer = time::Instant::now();
    let params = CheckParams::from_args(args);
    run_check(&params)?;
    log::info!("Total execution time: {:.2?}", start_timer.elapsed());
    Ok(())
}

/// Classifies every complete trio in the calls table and writes the result tables.
pub fn run_check(params: &CheckParams) -> Result<ViolationTally> {
    let pedigree = Pedigree::from_path(&params.fam_path)?;
    log::info!(
        "Parsed {} individuals with known parents from {}",
        format_number_with_commas(pedigree.len()),
        params.fam_path.display()
    );

    let table = read_calls_from_path(&params.calls_path, &params.sample_id_column, &pedigree)?;
    log::info!(
        "Kept {} called rows ({} invalid)",
        format_number_with_commas(table.num_called()),
        format_number_with_commas(table.num_invalid())
    );

    let grouping = group_by_trio(&table.records);
    log::info!(
        "Found {} trio calls from {} families",
        format_number_with_commas(grouping.trios.len()),
        format_number_with_commas(grouping.num_families)
    );

    log::debug!(
        "Initializing thread pool with {} threads...",
        params.num_threads
    );
    let pool = initialize_thread_pool(params.num_threads)?;
    let records = pool.install(|| classify_trios(&grouping.trios))?;

    let tally = ViolationTally::from_records(&records, grouping.trios.len());
    tally.log_report();

    let mut writer = create_writer(&params.output_prefix, "mendelian_violations.tsv", |path| {
        ViolationWriter::new(path, table.has_read_support)
    })?;
    for record in &records {
        writer.write(record)?;
    }
    log::info!(
        "Wrote {} rows to {}.mendelian_violations.tsv",
        format_number_with_commas(writer.num_written()),
        params.output_prefix
    );
    writer.finish()?;

    create_writer(&params.output_prefix, "non_trio_rows.tsv", |path| {
        write_non_trio_rows(
            path,
            &params.sample_id_column,
            &grouping.unpaired,
            table.has_read_support,
        )
    })?;
    log::info!(
        "Wrote {} rows to {}.non_trio_rows.tsv",
        format_number_with_commas(grouping.unpaired.len()),
        params.output_prefix
    );

    if params.locus_stats {
        let stats = summarize_loci(&records);
        create_writer(&params.output_prefix, "locus_stats.tsv", |path| {
            write_locus_stats(path, &stats)
        })?;
        log::info!(
            "Wrote {} loci to {}.locus_stats.tsv",
            format_number_with_commas(stats.len()),
            params.output_prefix
        );
    }

    Ok(tally)
}

/// Classifies trios in parallel, keeping input order.
///
/// A trio that fails the consistency check aborts the run; any other error
/// only drops that trio.
fn classify_trios(trios: &[Trio]) -> Result<Vec<ViolationRecord>> {
    let results: Vec<_> = trios.par_iter().map(classify_trio).collect();
    let mut records = Vec::with_capacity(results.len());
    for (trio, result) in trios.iter().zip(results) {
        match result {
            Ok(record) => records.push(record),
            Err(e @ TrioError::ConsistencyViolation(_)) => return Err(e.into()),
            Err(e) => log::error!(
                "Skipping {} at {}: {}",
                trio.proband.sample_id(),
                trio.proband.record.row.locus_id,
                e
            ),
        }
    }
    Ok(records)
}

fn initialize_thread_pool(num_threads: usize) -> Result<rayon::ThreadPool> {
    ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .thread_name(|i| format!("trmv-{}", i))
        .build()
        .map_err(|e| format!("Failed to initialize thread pool: {}", e))
}
