//! # sift
//!
//! Sorts syndication feed entries into per-file buckets using substring
//! matching rules.
//!
//! One run processes one feed: its raw XML is decoded (RSS-like
//! "standard" or Atom-like "alternate" shape), every entry is normalized
//! into a single canonical item shape despite the divergent vocabularies,
//! and each item is assigned to the first configured output file whose
//! rules match it.
//!
//! ```text
//! bytes → decode → normalize → match → report
//! ```
//!
//! - [`config`]: Per-feed JSON configuration (source, shape, rule sets)
//! - [`feed`]: Source loading, decoding, and field normalization
//! - [`matcher`]: First-match-wins assignment of items to output files
//! - [`report`]: Console rendering of the match results
//! - [`util`]: Terminal-safe text helpers

pub mod config;
pub mod feed;
pub mod matcher;
pub mod report;
pub mod util;
