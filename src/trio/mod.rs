mod grouping;
mod locus;
mod pedigree;
mod record;
mod report;
mod table;
mod writers;

pub use grouping::{group_by_trio, Trio, TrioGrouping, TrioMember, Unpaired, UnpairedReason};
pub use locus::LocusContext;
pub use pedigree::{Parents, Pedigree};
pub use record::{Call, CallKey, CallRecord, CallRow, CallStatus, ReadSupport};
pub use report::{
    classify_trio, summarize_loci, LocusStats, MemberSummary, ViolationRecord, ViolationTally,
};
pub use table::{read_calls, read_calls_from_path, CallTable, REQUIRED_COLUMNS};
pub use writers::{write_locus_stats, write_non_trio_rows, ViolationWriter};
