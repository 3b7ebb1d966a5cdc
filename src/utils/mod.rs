mod io_utils;
mod readers;
mod region;
mod util;

pub use io_utils::{create_writer, default_output_prefix};
pub use readers::open_table_reader;
pub use region::GenomicRegion;
pub use util::{format_number_with_commas, handle_error_and_exit, Result};
