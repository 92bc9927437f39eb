//! Duplicate detection: content grouping and canonical ordering.
//!
//! The pipeline hands every scanned [`crate::scanner::FileRecord`] to the
//! [`ContentGrouper`], which partitions files by content checksum into
//! [`FileGroup`]s. Groups with more than one member are duplicates; the
//! first file in each group is the canonical candidate kept in place.

pub mod grouper;
pub mod groups;

pub use grouper::ContentGrouper;
pub use groups::{filter_duplicates, total_reclaimable_size, FileGroup};
