//! Rule matching: assigns each item to at most one output file.
//!
//! Rule sets are evaluated in configuration order, and an item belongs to
//! the first rule set that matches it — earlier files have priority claim
//! on ambiguous items, and an included item is never reconsidered. Within
//! a rule set the categories are tested in fixed order (titles, authors,
//! content, links) with case-sensitive substring containment.
//!
//! The matcher is the sole writer of `match_reason`; the `&mut [Item]`
//! borrow makes that exclusivity a compile-time fact rather than a
//! convention.

use crate::config::FileRules;
use crate::feed::{Item, MatchCategory, MatchReason};

/// Items matched for one output file: indices into the shared item
/// slice, in item order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAssignment {
    pub filename: String,
    pub items: Vec<usize>,
}

/// Runs every rule set over the item slice, in order, and returns the
/// per-file assignments. Single sequential pass; each item ends up in at
/// most one assignment.
pub fn assign(files: &[FileRules], items: &mut [Item]) -> Vec<FileAssignment> {
    files
        .iter()
        .map(|file| {
            let mut matched = Vec::new();
            for (idx, item) in items.iter_mut().enumerate() {
                if item.included() {
                    continue;
                }
                apply_rules(file, item);
                if item.included() {
                    matched.push(idx);
                }
            }
            tracing::debug!(file = %file.filename, matched = matched.len(), "rule set evaluated");
            FileAssignment {
                filename: file.filename.clone(),
                items: matched,
            }
        })
        .collect()
}

fn apply_rules(file: &FileRules, item: &mut Item) {
    if file.include_all {
        include(item, MatchCategory::All, "all");
        return;
    }
    for needle in &file.titles {
        if item.title.contains(needle.as_str()) {
            include(item, MatchCategory::Title, needle);
        }
    }
    if !item.included() {
        for needle in &file.authors {
            if item.author.contains(needle.as_str()) {
                include(item, MatchCategory::Author, needle);
            }
        }
    }
    if !item.included() {
        for needle in &file.content {
            if item.content.contains(needle.as_str()) {
                include(item, MatchCategory::Content, needle);
            }
        }
    }
    if !item.included() {
        for needle in &file.links {
            if item.link.contains(needle.as_str()) {
                include(item, MatchCategory::Link, needle);
            }
        }
    }
}

/// Records the inclusion exactly once. Later matches within the same
/// category are no-ops, so the first matching substring in configured
/// order determines the recorded reason.
fn include(item: &mut Item, category: MatchCategory, matched: &str) {
    if item.included() {
        return;
    }
    item.match_reason = Some(MatchReason {
        category,
        matched: matched.to_string(),
    });
}
