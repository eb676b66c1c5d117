//! Pure query engine over annotation sequences.
//!
//! Every operation takes a slice and returns a new collection, leaving the
//! input untouched, so callers can layer filters, sorts, and range queries
//! without defensive copies.

mod filter;
mod ranges;
mod sort;
mod types;

pub use filter::{filter, matches_criteria};
pub use ranges::{merge_overlapping_ranges, point_lookup, range_overlap};
pub use sort::{compare, sort};
pub use types::{
    ConfigurationError, FilterCriteria, MergedRange, SortDirection, SortField, SortSpec,
};
