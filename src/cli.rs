use crate::utils::Result;
use clap::{ArgAction, ArgGroup, Parser, Subcommand};
use env_logger::fmt::Color;
use log::{Level, LevelFilter};
use once_cell::sync::Lazy;
use std::{
    io::Write,
    path::{Path, PathBuf},
};

pub static FULL_VERSION: Lazy<String> = Lazy::new(|| {
    format!(
        "{}-{}",
        env!("CARGO_PKG_VERSION"),
        env!("VERGEN_GIT_DESCRIBE")
    )
});

#[derive(Parser)]
#[command(name="trmv",
          version=&**FULL_VERSION,
          about="Mendelian consistency checks for tandem repeat genotypes in trios",
          long_about = None,
          disable_help_subcommand = true,
          help_template = "{name} {version}\n{about-section}\n{usage-heading}\n    {usage}\n\n{all-args}{after-help}",
          )]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = ArgAction::Count, help = "Specify multiple times to increase verbosity level (e.g., -vv for more verbosity)")]
    pub verbosity: u8,
}

#[derive(Subcommand)]
pub enum Command {
    #[clap(about = "Trio Mendelian Violation Checker")]
    Check(CheckArgs),
    #[clap(about = "Calls Table and Pedigree Validator")]
    Validate(ValidateArgs),
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("check")))]
#[command(arg_required_else_help(true))]
pub struct CheckArgs {
    #[clap(required = true)]
    #[clap(short = 'c')]
    #[clap(long = "calls")]
    #[clap(help = "Tab-separated table of per-sample repeat genotypes (optionally gzipped)")]
    #[clap(value_name = "CALLS")]
    #[arg(value_parser = check_file_exists)]
    pub calls_path: PathBuf,

    #[clap(required = true)]
    #[clap(short = 'f')]
    #[clap(long = "fam-file")]
    #[clap(help = "Pedigree file in PLINK .fam format")]
    #[clap(value_name = "FAM")]
    #[arg(value_parser = check_file_exists)]
    pub fam_path: PathBuf,

    #[clap(short = 'o')]
    #[clap(long = "output-prefix")]
    #[clap(help = "Prefix for output files [default: calls path without .tsv/.tsv.gz]")]
    #[clap(value_name = "OUTPUT_PREFIX")]
    #[arg(value_parser = check_prefix_path)]
    pub output_prefix: Option<String>,

    #[clap(long = "locus-stats")]
    #[clap(help = "Also write violation counts and distances per locus")]
    pub locus_stats: bool,

    #[clap(short = 't')]
    #[clap(long = "threads")]
    #[clap(help = "Number of threads")]
    #[clap(value_name = "THREADS")]
    #[clap(default_value = "1")]
    #[arg(value_parser = threads_in_range)]
    pub num_threads: usize,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "sample-id-column")]
    #[clap(value_name = "COLUMN")]
    #[clap(help = "Name of the column holding sample ids")]
    #[clap(default_value = "SampleId")]
    #[arg(value_parser = check_column_name_nonempty)]
    pub sample_id_column: String,
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("validate")))]
#[command(arg_required_else_help(true))]
pub struct ValidateArgs {
    #[clap(required = true)]
    #[clap(short = 'c')]
    #[clap(long = "calls")]
    #[clap(help = "Tab-separated table of per-sample repeat genotypes (optionally gzipped)")]
    #[clap(value_name = "CALLS")]
    #[arg(value_parser = check_file_exists)]
    pub calls_path: PathBuf,

    #[clap(short = 'f')]
    #[clap(long = "fam-file")]
    #[clap(help = "Pedigree file in PLINK .fam format")]
    #[clap(value_name = "FAM")]
    #[arg(value_parser = check_file_exists)]
    pub fam_path: Option<PathBuf>,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "sample-id-column")]
    #[clap(value_name = "COLUMN")]
    #[clap(help = "Name of the column holding sample ids")]
    #[clap(default_value = "SampleId")]
    #[arg(value_parser = check_column_name_nonempty)]
    pub sample_id_column: String,
}

pub fn init_verbose(args: &Cli) {
    let filter_level: LevelFilter = match args.verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            let level = record.level();
            let mut style = buf.style();
            match record.level() {
                Level::Error => style.set_color(Color::Red),
                Level::Warn => style.set_color(Color::Yellow),
                Level::Info => style.set_color(Color::Green),
                Level::Debug => style.set_color(Color::Blue),
                Level::Trace => style.set_color(Color::Cyan),
            };

            writeln!(
                buf,
                "{} [{}] - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                style.value(level),
                record.args()
            )
        })
        .filter_level(filter_level)
        .init();
}

fn check_prefix_path(s: &str) -> Result<String> {
    let path = Path::new(s);
    if let Some(parent_dir) = path.parent() {
        if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
            return Err(format!("Path does not exist: {}", parent_dir.display()));
        }
    }
    Ok(s.to_string())
}

fn threads_in_range(s: &str) -> Result<usize> {
    let thread: usize = s
        .parse()
        .map_err(|_| format!("`{}` is not a valid thread number", s))?;
    if thread >= 1 {
        Ok(thread)
    } else {
        Err("Number of threads must be at least 1".into())
    }
}

fn check_file_exists(s: &str) -> Result<PathBuf> {
    let path = Path::new(s);
    if !path.exists() {
        Err(format!("File does not exist: {}", path.display()))
    } else {
        Ok(path.to_path_buf())
    }
}

fn check_column_name_nonempty(s: &str) -> Result<String> {
    if s.trim().is_empty() {
        Err("Column name cannot be an empty string".to_string())
    } else {
        Ok(s.to_string())
    }
}
