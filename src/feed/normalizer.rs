//! Field resolution for standard-shape items.
//!
//! RSS-flavored feeds spell the same logical attribute several ways
//! (`<link>` vs feedburner's `<origLink>` vs an enclosure's `url`
//! attribute, `<guid>` vs `<id>`, `<dc:creator>` vs `<author><name>`).
//! Each canonical field is resolved from an ordered candidate chain,
//! first non-empty value wins. The chains are load-bearing: podcast feeds
//! only carry a usable link in the enclosure, Atom-flavored feeds only
//! carry an id in `<guid>`.

use crate::feed::Item;

/// A `<content>` sub-element: its `type` attribute and inner value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ContentBlock {
    pub(crate) kind: String,
    pub(crate) value: String,
}

/// A standard-shape item as decoded, synonym fields still unresolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct RawItem {
    pub(crate) title: String,
    pub(crate) link: String,
    pub(crate) orig_link: String,
    pub(crate) enclosure_url: String,
    pub(crate) pub_date: String,
    pub(crate) published: String,
    pub(crate) id: String,
    pub(crate) guid: String,
    pub(crate) author_name: String,
    pub(crate) creator: String,
    pub(crate) content_blocks: Vec<ContentBlock>,
    pub(crate) encoded: String,
}

impl RawItem {
    /// Resolves the synonym chains into a canonical [`Item`].
    ///
    /// Resolution is a pure function of the raw fields, so resolving the
    /// same raw item twice yields identical output.
    pub(crate) fn resolve(self) -> Item {
        let content = resolve_content(&self.content_blocks, self.encoded);
        Item {
            title: self.title,
            link: first_non_empty([self.link, self.orig_link, self.enclosure_url]),
            id: first_non_empty([self.id, self.guid]),
            date: first_non_empty([self.pub_date, self.published]),
            author: first_non_empty([self.author_name, self.creator]),
            content,
            match_reason: None,
        }
    }
}

/// The last html-typed content block wins; only when no block is
/// html-typed does `<content:encoded>` apply. An html block with an empty
/// value still counts as a match and suppresses the fallback.
fn resolve_content(blocks: &[ContentBlock], encoded: String) -> String {
    let mut html = None;
    for block in blocks {
        if block.kind == "html" {
            html = Some(&block.value);
        }
    }
    match html {
        Some(value) => value.clone(),
        None => encoded,
    }
}

fn first_non_empty<const N: usize>(candidates: [String; N]) -> String {
    candidates
        .into_iter()
        .find(|value| !value.is_empty())
        .unwrap_or_default()
}
