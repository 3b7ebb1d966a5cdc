use crate::utils::Result;
use std::path::Path;

pub fn create_writer<T, F>(output_prefix: &str, output_suffix: &str, f: F) -> Result<T>
where
    F: FnOnce(&str) -> Result<T>,
{
    let output_path = format!("{}.{}", output_prefix, output_suffix);
    f(&output_path)
}

/// Strips a trailing `.tsv` or `.tsv.gz` from the input table path.
pub fn default_output_prefix(input_path: &Path) -> String {
    let path = input_path.to_string_lossy();
    path.strip_suffix(".tsv.gz")
        .or_else(|| path.strip_suffix(".tsv"))
        .unwrap_or(&path)
        .to_string()
}
