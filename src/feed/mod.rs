//! Feed ingestion: decoding, normalization, and source loading.
//!
//! This module turns one configured feed into an ordered list of
//! canonical items:
//!
//! - [`fetcher`] - Loads raw bytes from an http(s) URL or a local path
//! - [`decoder`] - Parses the standard (RSS-like) or alternate
//!   (Atom-like) XML shape
//! - [`normalizer`] - Resolves each canonical field from its synonym
//!   tags, first non-empty wins
//! - [`model`] - The canonical [`Item`] every shape reduces to
//!
//! Decoding is deliberately forgiving: empty feeds, unknown feed types,
//! and malformed XML all degrade to fewer items with a warning, never an
//! error — the failure modes that abort a run (unreadable config,
//! unreachable source) live with the collaborators, not here.

mod decoder;
mod fetcher;
mod model;
mod normalizer;

pub use decoder::decode;
pub use fetcher::{load, SourceError};
pub use model::{Item, MatchCategory, MatchReason};

use crate::config::Config;

/// Checks the config's expectation flags against the decoded items.
///
/// A flag says "this feed is known to carry that field"; if no item
/// resolved it, the field mapping has probably regressed and a warning is
/// logged. Diagnostic only — items and matching are untouched.
pub fn verify_expectations(config: &Config, items: &[Item]) {
    if items.is_empty() {
        return;
    }
    if config.should_find_author && items.iter().all(|i| i.author.is_empty()) {
        tracing::warn!("expected an author but no item resolved one");
    }
    if config.should_find_content && items.iter().all(|i| i.content.is_empty()) {
        tracing::warn!("expected content but no item resolved any");
    }
    if config.should_find_id && items.iter().all(|i| i.id.is_empty()) {
        tracing::warn!("expected an id but no item resolved one");
    }
}
