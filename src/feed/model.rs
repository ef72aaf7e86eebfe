use std::fmt;

/// A feed entry after normalization.
///
/// Every source vocabulary (RSS-like or Atom-like) is reduced to this one
/// shape before matching. Field values are taken verbatim from the feed:
/// `date` in particular is the raw textual timestamp, never parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Item {
    pub title: String,
    /// Resolved link. Non-empty whenever any source link field was present.
    pub link: String,
    /// Resolved identifier (guid-equivalent).
    pub id: String,
    /// Raw publish/updated timestamp text from the feed.
    pub date: String,
    pub author: String,
    pub content: String,
    /// Set exactly once, by the rule matcher, when the item is assigned to
    /// an output file. `None` means not yet (or never) assigned.
    pub match_reason: Option<MatchReason>,
}

impl Item {
    /// Whether this item has been assigned to an output file.
    ///
    /// Assignment is exclusive and permanent within a run: once included,
    /// an item is never reconsidered by later rule sets.
    pub fn included(&self) -> bool {
        self.match_reason.is_some()
    }
}

/// The rule category that caused an item's inclusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchCategory {
    All,
    Title,
    Author,
    Content,
    Link,
}

impl fmt::Display for MatchCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MatchCategory::All => "all",
            MatchCategory::Title => "title",
            MatchCategory::Author => "author",
            MatchCategory::Content => "content",
            MatchCategory::Link => "link",
        };
        f.write_str(name)
    }
}

/// Why an item was included: the category that matched and the configured
/// value that matched it. Recorded for reporting and audit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchReason {
    pub category: MatchCategory,
    pub matched: String,
}

impl fmt::Display for MatchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Matched on {}: {}", self.category, self.matched)
    }
}
