// src/batch/mod.rs

//! Batch generation: many independent DAG builds written into a sharded
//! directory tree, plus the listing file the replayer reads back.

pub mod listing;
pub mod runner;
pub mod shard;
pub mod summary;

pub use listing::{LISTING_FILE, ListingEntry, parse_listing};
pub use runner::{BatchOptions, DAG_DIR, LOCK_FILE, generate_batch};
pub use shard::{MAX_DAGS, ShardSlot, shard_for};
pub use summary::{BatchSummary, SizeStats};
