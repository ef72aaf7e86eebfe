//! Feed decoding for the two supported XML vocabularies.
//!
//! The standard shape is `rss > channel > item` with per-field synonym
//! tags that the normalizer resolves afterwards. The alternate shape is
//! `feed > entry` with a fixed field layout converted 1:1 into canonical
//! items. Element matching uses local names throughout, so namespace
//! prefixes (`dc:creator`, `content:encoded`, `feedburner:origLink`,
//! `media:content`) are transparent.
//!
//! Decoding never hard-fails: an unknown feed type, an empty feed, or
//! malformed XML all degrade to fewer (possibly zero) items with a
//! warning logged.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::config::FeedType;
use crate::feed::normalizer::{ContentBlock, RawItem};
use crate::feed::Item;

type XmlResult<T> = Result<T, quick_xml::Error>;

/// Decodes raw feed bytes into canonical items, in document order.
pub fn decode(feed_type: FeedType, bytes: &[u8]) -> Vec<Item> {
    let text = String::from_utf8_lossy(bytes);
    let items = match feed_type {
        FeedType::Standard => decode_standard(&text),
        FeedType::Alternate => decode_alternate(&text),
        FeedType::Unknown => {
            tracing::warn!("unrecognized feed type, nothing decoded");
            return Vec::new();
        }
    };
    if items.is_empty() {
        tracing::warn!("no items found in feed");
    }
    items
}

fn decode_standard(text: &str) -> Vec<Item> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut items = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"item" => {
                match read_raw_item(&mut reader) {
                    Ok(raw) => items.push(raw.resolve()),
                    Err(e) => {
                        warn_truncated(&e, items.len());
                        break;
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                warn_truncated(&e, items.len());
                break;
            }
            Ok(_) => {}
        }
    }
    items
}

fn decode_alternate(text: &str) -> Vec<Item> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut items = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"entry" => {
                match read_entry(&mut reader) {
                    Ok(item) => items.push(item),
                    Err(e) => {
                        warn_truncated(&e, items.len());
                        break;
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                warn_truncated(&e, items.len());
                break;
            }
            Ok(_) => {}
        }
    }
    items
}

fn warn_truncated(error: &quick_xml::Error, decoded: usize) {
    tracing::warn!(error = %error, decoded = decoded, "malformed feed XML, keeping items decoded so far");
}

/// Reads one standard-shape `<item>` element, collecting every synonym
/// field for the normalizer. Unknown child elements are skipped whole.
fn read_raw_item(reader: &mut Reader<&[u8]>) -> XmlResult<RawItem> {
    let mut raw = RawItem::default();
    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"title" => raw.title = element_text(reader)?,
                b"link" => raw.link = element_text(reader)?,
                b"origLink" => raw.orig_link = element_text(reader)?,
                b"enclosure" => {
                    raw.enclosure_url = attr_value(reader, &e, b"url")?.unwrap_or_default();
                    reader.read_to_end(e.name())?;
                }
                b"pubDate" => raw.pub_date = element_text(reader)?,
                b"published" => raw.published = element_text(reader)?,
                b"id" => raw.id = element_text(reader)?,
                b"guid" => raw.guid = element_text(reader)?,
                b"author" => raw.author_name = read_author_name(reader)?,
                b"creator" => raw.creator = element_text(reader)?,
                b"content" => {
                    let kind = attr_value(reader, &e, b"type")?.unwrap_or_default();
                    let value = element_text(reader)?;
                    raw.content_blocks.push(ContentBlock { kind, value });
                }
                b"encoded" => raw.encoded = element_text(reader)?,
                _ => {
                    reader.read_to_end(e.name())?;
                }
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"enclosure" => {
                    raw.enclosure_url = attr_value(reader, &e, b"url")?.unwrap_or_default();
                }
                b"content" => {
                    let kind = attr_value(reader, &e, b"type")?.unwrap_or_default();
                    raw.content_blocks.push(ContentBlock {
                        kind,
                        value: String::new(),
                    });
                }
                _ => {}
            },
            Event::End(e) if e.local_name().as_ref() == b"item" => break,
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(raw)
}

/// Reads one alternate-shape `<entry>` element and converts it directly:
/// title, link, date, author, id copied; content from the first
/// html-typed block, otherwise empty.
fn read_entry(reader: &mut Reader<&[u8]>) -> XmlResult<Item> {
    let mut item = Item::default();
    let mut blocks: Vec<ContentBlock> = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"title" => item.title = element_text(reader)?,
                b"link" => {
                    // Entries may carry the target as element text or as
                    // an href attribute; first non-empty occurrence wins.
                    let href = attr_value(reader, &e, b"href")?;
                    let text = element_text(reader)?;
                    if item.link.is_empty() {
                        item.link = if text.is_empty() {
                            href.unwrap_or_default()
                        } else {
                            text
                        };
                    }
                }
                b"published" => item.date = element_text(reader)?,
                b"id" => item.id = element_text(reader)?,
                b"author" => item.author = read_author_name(reader)?,
                b"content" => {
                    let kind = attr_value(reader, &e, b"type")?.unwrap_or_default();
                    let value = element_text(reader)?;
                    blocks.push(ContentBlock { kind, value });
                }
                _ => {
                    reader.read_to_end(e.name())?;
                }
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"link" => {
                    if item.link.is_empty() {
                        item.link = attr_value(reader, &e, b"href")?.unwrap_or_default();
                    }
                }
                b"content" => {
                    let kind = attr_value(reader, &e, b"type")?.unwrap_or_default();
                    blocks.push(ContentBlock {
                        kind,
                        value: String::new(),
                    });
                }
                _ => {}
            },
            Event::End(e) if e.local_name().as_ref() == b"entry" => break,
            Event::Eof => break,
            _ => {}
        }
    }
    item.content = blocks
        .into_iter()
        .find(|b| b.kind == "html")
        .map(|b| b.value)
        .unwrap_or_default();
    Ok(item)
}

/// Reads `<name>` from inside an `<author>` element. Plain-text authors
/// (the RSS email form) have no `<name>` child and yield an empty string,
/// letting the creator fallback apply.
fn read_author_name(reader: &mut Reader<&[u8]>) -> XmlResult<String> {
    let mut name = String::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) if e.local_name().as_ref() == b"name" => {
                name = element_text(reader)?;
            }
            Event::Start(e) => {
                reader.read_to_end(e.name())?;
            }
            Event::End(_) | Event::Eof => break,
            _ => {}
        }
    }
    Ok(name)
}

/// Accumulates the text content of the current element (entities
/// resolved, CDATA included, nested markup dropped) up to its end tag.
fn element_text(reader: &mut Reader<&[u8]>) -> XmlResult<String> {
    let mut text = String::new();
    let mut depth = 0usize;
    loop {
        match reader.read_event()? {
            Event::Text(t) => text.push_str(&t.unescape().map_err(quick_xml::Error::from)?),
            Event::CData(c) => text.push_str(&String::from_utf8_lossy(&c.into_inner())),
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(text)
}

fn attr_value(reader: &Reader<&[u8]>, e: &BytesStart<'_>, name: &[u8]) -> XmlResult<Option<String>> {
    let decoder = reader.decoder();
    for attr in e.attributes() {
        let attr = match attr {
            Ok(attr) => attr,
            Err(err) => {
                tracing::warn!(error = %err, "skipping malformed attribute");
                continue;
            }
        };
        if attr.key.local_name().as_ref() == name {
            let value = attr
                .decode_and_unescape_value(decoder)
                .map_err(quick_xml::Error::from)?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_standard_feed() {
        let feed = br#"<?xml version="1.0"?>
<rss version="2.0">
  <channel>
    <title>Example Cast</title>
    <link>https://example.com</link>
    <item>
      <title>Episode One</title>
      <link>https://example.com/1</link>
      <guid isPermaLink="false">ep-1</guid>
      <pubDate>Tue, 02 Jan 2024 00:00:00 GMT</pubDate>
      <dc:creator>Jane Doe</dc:creator>
      <content:encoded><![CDATA[<p>Show notes</p>]]></content:encoded>
    </item>
    <item>
      <title>Episode Two</title>
      <enclosure url="https://cdn.example.com/2.mp3" length="123" type="audio/mpeg"/>
      <guid>ep-2</guid>
    </item>
  </channel>
</rss>"#;

        let items = decode(FeedType::Standard, feed);
        assert_eq!(items.len(), 2);

        assert_eq!(items[0].title, "Episode One");
        assert_eq!(items[0].link, "https://example.com/1");
        assert_eq!(items[0].id, "ep-1");
        assert_eq!(items[0].date, "Tue, 02 Jan 2024 00:00:00 GMT");
        assert_eq!(items[0].author, "Jane Doe");
        assert_eq!(items[0].content, "<p>Show notes</p>");
        assert!(!items[0].included());

        // Channel-level <title>/<link> must not bleed into items
        assert_eq!(items[1].title, "Episode Two");
        assert_eq!(items[1].link, "https://cdn.example.com/2.mp3");
        assert_eq!(items[1].id, "ep-2");
    }

    #[test]
    fn test_decode_preserves_document_order() {
        let feed = br#"<rss><channel>
            <item><title>a</title></item>
            <item><title>b</title></item>
            <item><title>c</title></item>
        </channel></rss>"#;

        let titles: Vec<String> = decode(FeedType::Standard, feed)
            .into_iter()
            .map(|i| i.title)
            .collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_feedburner_orig_link_fallback() {
        let feed = br#"<rss><channel><item>
            <title>Ep</title>
            <feedburner:origLink>https://origin.example.com/ep</feedburner:origLink>
        </item></channel></rss>"#;

        let items = decode(FeedType::Standard, feed);
        assert_eq!(items[0].link, "https://origin.example.com/ep");
    }

    #[test]
    fn test_media_content_blocks() {
        // media:content carries a type attribute; the last html-typed
        // block supplies the content
        let feed = br#"<rss><channel><item>
            <title>Ep</title>
            <media:content type="text">plain</media:content>
            <media:content type="html">&lt;p&gt;one&lt;/p&gt;</media:content>
            <media:content type="html">&lt;p&gt;two&lt;/p&gt;</media:content>
        </item></channel></rss>"#;

        let items = decode(FeedType::Standard, feed);
        assert_eq!(items[0].content, "<p>two</p>");
    }

    #[test]
    fn test_title_entities_and_cdata() {
        let feed = br#"<rss><channel>
            <item><title>AT&amp;T News</title></item>
            <item><title><![CDATA[Ampersand & Co]]></title></item>
        </channel></rss>"#;

        let items = decode(FeedType::Standard, feed);
        assert_eq!(items[0].title, "AT&T News");
        assert_eq!(items[1].title, "Ampersand & Co");
    }

    #[test]
    fn test_plain_text_author_yields_empty_name() {
        // The RSS email form has no <name> child; dc:creator wins
        let feed = br#"<rss><channel><item>
            <author>host@example.com</author>
            <dc:creator>Jane</dc:creator>
        </item></channel></rss>"#;

        let items = decode(FeedType::Standard, feed);
        assert_eq!(items[0].author, "Jane");
    }

    #[test]
    fn test_decode_alternate_feed() {
        let feed = br#"<?xml version="1.0"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Example Blog</title>
  <entry>
    <title>Post One</title>
    <link>https://example.com/posts/1</link>
    <id>urn:uuid:1</id>
    <published>2024-01-02T03:04:05Z</published>
    <author><name>Jane Doe</name></author>
    <content type="text">plain summary</content>
    <content type="html">&lt;p&gt;body&lt;/p&gt;</content>
  </entry>
</feed>"#;

        let items = decode(FeedType::Alternate, feed);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Post One");
        assert_eq!(items[0].link, "https://example.com/posts/1");
        assert_eq!(items[0].id, "urn:uuid:1");
        assert_eq!(items[0].date, "2024-01-02T03:04:05Z");
        assert_eq!(items[0].author, "Jane Doe");
        // First html-typed block wins; the text block is ignored
        assert_eq!(items[0].content, "<p>body</p>");
    }

    #[test]
    fn test_alternate_entry_without_html_content_is_empty() {
        let feed = br#"<feed><entry>
            <title>Post</title>
            <content type="text">plain only</content>
        </entry></feed>"#;

        let items = decode(FeedType::Alternate, feed);
        assert_eq!(items[0].content, "");
    }

    #[test]
    fn test_alternate_link_href_attribute() {
        let feed = br#"<feed><entry>
            <title>Post</title>
            <link rel="alternate" href="https://example.com/posts/2"/>
        </entry></feed>"#;

        let items = decode(FeedType::Alternate, feed);
        assert_eq!(items[0].link, "https://example.com/posts/2");
    }

    #[test]
    fn test_unknown_feed_type_decodes_nothing() {
        let feed = br#"<rss><channel><item><title>Ep</title></item></channel></rss>"#;
        let items = decode(FeedType::Unknown, feed);
        assert!(items.is_empty());
    }

    #[test]
    fn test_empty_channel_decodes_nothing() {
        let feed = br#"<rss version="2.0"><channel><title>Empty</title></channel></rss>"#;
        let items = decode(FeedType::Standard, feed);
        assert!(items.is_empty());
    }

    #[test]
    fn test_malformed_xml_keeps_decoded_prefix() {
        let feed = br#"<rss><channel>
            <item><title>Good</title></item>
            <item><title>Bad</junk"#;

        let items = decode(FeedType::Standard, feed);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Good");
    }

    #[test]
    fn test_not_xml_at_all_decodes_nothing() {
        let items = decode(FeedType::Standard, b"this is not xml");
        assert!(items.is_empty());
    }

    #[test]
    fn test_unknown_child_elements_skipped_whole() {
        // itunes blocks contain nested elements that must not bleed into
        // the item's fields
        let feed = br#"<rss><channel><item>
            <title>Ep</title>
            <itunes:owner>
                <itunes:name>Wrong Author</itunes:name>
            </itunes:owner>
        </item></channel></rss>"#;

        let items = decode(FeedType::Standard, feed);
        assert_eq!(items[0].author, "");
        assert_eq!(items[0].title, "Ep");
    }
}
