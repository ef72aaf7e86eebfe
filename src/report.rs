//! Console rendering of match results.
//!
//! The matcher returns structure; this module is the only place that
//! formats it for humans. Everything printed here came out of a feed, so
//! text passes through [`crate::util::preview`]-style sanitizing before
//! it reaches the terminal.

use std::io::{self, Write};

use crate::feed::Item;
use crate::matcher::FileAssignment;
use crate::util::{preview, strip_control_chars};

/// Content previews are capped at 100 display columns.
const PREVIEW_WIDTH: usize = 100;

/// Renders the per-file assignments in match order.
pub fn render<W: Write>(
    out: &mut W,
    assignments: &[FileAssignment],
    items: &[Item],
) -> io::Result<()> {
    for assignment in assignments {
        writeln!(out, "Looking for items for file {}", assignment.filename)?;
        for &idx in &assignment.items {
            write_item(out, &items[idx])?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn write_item<W: Write>(out: &mut W, item: &Item) -> io::Result<()> {
    writeln!(
        out,
        "Item found: {} by {} ({})",
        strip_control_chars(&item.title),
        strip_control_chars(&item.author),
        strip_control_chars(&item.link),
    )?;
    writeln!(out, "   ID: {}", strip_control_chars(&item.id))?;
    writeln!(out, "   Published: {}", strip_control_chars(&item.date))?;
    writeln!(out, "   Content: {}", preview(&item.content, PREVIEW_WIDTH))?;
    if let Some(reason) = &item.match_reason {
        writeln!(out, "   {}", reason)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{MatchCategory, MatchReason};
    use pretty_assertions::assert_eq;

    fn matched_item(title: &str, category: MatchCategory, matched: &str) -> Item {
        Item {
            title: title.to_string(),
            link: "https://example.com/1".to_string(),
            id: "ep-1".to_string(),
            date: "Tue, 02 Jan 2024 00:00:00 GMT".to_string(),
            author: "Jane".to_string(),
            content: "<p>Show notes</p>".to_string(),
            match_reason: Some(MatchReason {
                category,
                matched: matched.to_string(),
            }),
        }
    }

    #[test]
    fn test_render_matched_item() {
        let items = vec![matched_item("Episode One", MatchCategory::Title, "Episode")];
        let assignments = vec![FileAssignment {
            filename: "main".to_string(),
            items: vec![0],
        }];

        let mut out = Vec::new();
        render(&mut out, &assignments, &items).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(
            text,
            "Looking for items for file main\n\
             Item found: Episode One by Jane (https://example.com/1)\n\
             \x20  ID: ep-1\n\
             \x20  Published: Tue, 02 Jan 2024 00:00:00 GMT\n\
             \x20  Content: <p>Show notes</p>\n\
             \x20  Matched on title: Episode\n\
             \n"
        );
    }

    #[test]
    fn test_render_empty_assignment_prints_header_only() {
        let assignments = vec![FileAssignment {
            filename: "excluded".to_string(),
            items: vec![],
        }];

        let mut out = Vec::new();
        render(&mut out, &assignments, &[]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "Looking for items for file excluded\n\n");
    }

    #[test]
    fn test_render_truncates_long_content() {
        let mut item = matched_item("Ep", MatchCategory::All, "all");
        item.content = "x".repeat(500);
        let assignments = vec![FileAssignment {
            filename: "main".to_string(),
            items: vec![0],
        }];

        let mut out = Vec::new();
        render(&mut out, &assignments, &[item]).unwrap();
        let text = String::from_utf8(out).unwrap();

        let content_line = text
            .lines()
            .find(|l| l.trim_start().starts_with("Content:"))
            .unwrap();
        let rendered = content_line.trim_start().trim_start_matches("Content: ");
        assert_eq!(rendered.len(), 100);
        assert!(rendered.ends_with("..."));
    }

    #[test]
    fn test_render_strips_terminal_escapes() {
        let mut item = matched_item("Ep\u{1b}[31m", MatchCategory::All, "all");
        item.author = "Jane\u{0}Doe".to_string();
        let assignments = vec![FileAssignment {
            filename: "main".to_string(),
            items: vec![0],
        }];

        let mut out = Vec::new();
        render(&mut out, &assignments, &[item]).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Item found: Ep by JaneDoe"));
        assert!(!text.contains('\u{1b}'));
    }
}
