//! Reconciliation rules: duplicate detection, join-on-read mapping
//! resolution, tag instructions, and display classification.
//!
//! Everything here is pure. Storage calls live in `db`, and the handlers in
//! `api` glue the two together.

pub mod classification;
pub mod dedup;
pub mod resolution;
pub mod tags;

pub use classification::{bucket_of, classify, DisplayBucket, PendingSummary, WaitingBuckets};
pub use dedup::{find_duplicates, natural_key};
pub use resolution::resolve_mappings;
pub use tags::TagUpdate;
