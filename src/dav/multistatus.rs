//! PROPFIND multistatus parsing.
//!
//! A depth-1 PROPFIND answers with one `<response>` per resource: the queried
//! collection itself first, then each immediate child. Element names are
//! matched by local name so the `DAV:` namespace prefix the server picked
//! (`d:`, `D:`, a default namespace...) does not matter.

use std::borrow::Cow;

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::warn;

use crate::error::{DavError, Result};
use crate::fs::{Entry, EntryKind};

/// One `<response>` element of a multistatus document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRecord {
    /// Raw `href` text, still percent-encoded
    pub href: String,
    /// `resourcetype` contained a `collection` marker
    pub is_collection: bool,
    /// `getcontentlength`, if reported
    pub content_length: Option<u64>,
}

impl ListingRecord {
    /// Percent-decoded href.
    pub fn decoded_href(&self) -> String {
        match urlencoding::decode(&self.href) {
            Ok(decoded) => decoded.into_owned(),
            Err(_) => String::from_utf8_lossy(&urlencoding::decode_binary(self.href.as_bytes()))
                .into_owned(),
        }
    }

    /// Last non-empty segment of the decoded href.
    pub fn name(&self) -> Option<String> {
        let decoded = self.decoded_href();
        decoded
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }
}

#[derive(Clone, Copy)]
enum Field {
    Href,
    ContentLength,
}

#[derive(Default)]
struct RecordBuilder {
    href: Option<String>,
    is_collection: bool,
    content_length: Option<u64>,
}

impl RecordBuilder {
    fn finish(self, index: usize) -> Result<ListingRecord> {
        let href = self
            .href
            .filter(|h| !h.trim().is_empty())
            .ok_or_else(|| DavError::Protocol(format!("response #{} has no href", index)))?;
        Ok(ListingRecord {
            href: href.trim().to_string(),
            is_collection: self.is_collection,
            content_length: self.content_length,
        })
    }
}

/// Parse a multistatus document into its records, in document order.
///
/// Fails with [`DavError::Protocol`] when the document is not well-formed XML
/// or holds no `<response>` at all: a depth-1 listing always contains at least
/// the queried collection.
pub fn parse_multistatus(xml: &str) -> Result<Vec<ListingRecord>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut records = Vec::new();
    let mut current: Option<RecordBuilder> = None;
    let mut field: Option<Field> = None;
    let mut depth: usize = 0;

    loop {
        let event = reader.read_event().map_err(|e| {
            DavError::Protocol(format!(
                "malformed multistatus at byte {}: {}",
                reader.buffer_position(),
                e
            ))
        })?;

        match event {
            Event::Start(e) => {
                depth += 1;
                match e.local_name().as_ref() {
                    b"response" => current = Some(RecordBuilder::default()),
                    b"href" if current.is_some() => field = Some(Field::Href),
                    b"getcontentlength" if current.is_some() => {
                        field = Some(Field::ContentLength)
                    }
                    b"collection" => {
                        if let Some(record) = current.as_mut() {
                            record.is_collection = true;
                        }
                    }
                    _ => {}
                }
            }
            Event::Empty(e) => {
                if e.local_name().as_ref() == b"collection" {
                    if let Some(record) = current.as_mut() {
                        record.is_collection = true;
                    }
                }
            }
            Event::Text(t) => {
                if let (Some(f), Some(record)) = (field, current.as_mut()) {
                    let text = t
                        .unescape()
                        .map_err(|e| DavError::Protocol(format!("bad text node: {}", e)))?;
                    apply_text(record, f, text);
                }
            }
            Event::CData(t) => {
                if let (Some(f), Some(record)) = (field, current.as_mut()) {
                    let raw = t.into_inner();
                    apply_text(record, f, String::from_utf8_lossy(&raw));
                }
            }
            Event::End(e) => {
                depth = depth.saturating_sub(1);
                match e.local_name().as_ref() {
                    b"response" => {
                        if let Some(record) = current.take() {
                            records.push(record.finish(records.len())?);
                        }
                    }
                    b"href" | b"getcontentlength" => field = None,
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if depth != 0 {
        return Err(DavError::Protocol(
            "truncated multistatus document".to_string(),
        ));
    }
    if records.is_empty() {
        return Err(DavError::Protocol(
            "listing contains no response records".to_string(),
        ));
    }
    Ok(records)
}

fn apply_text(record: &mut RecordBuilder, field: Field, text: Cow<'_, str>) {
    match field {
        Field::Href => record.href.get_or_insert_with(String::new).push_str(&text),
        Field::ContentLength => record.content_length = text.trim().parse().ok(),
    }
}

/// Turn records into entries, dropping the leading self-entry.
pub fn entries_from_records(records: &[ListingRecord]) -> Vec<Entry> {
    records
        .iter()
        .skip(1)
        .filter_map(|record| {
            let Some(name) = record.name() else {
                warn!(href = %record.href, "skipping listing record without a name");
                return None;
            };
            let kind = if record.is_collection {
                EntryKind::Directory
            } else {
                EntryKind::File
            };
            Some(Entry {
                name,
                kind,
                size: record.content_length.filter(|_| !record.is_collection),
            })
        })
        .collect()
}

/// Parse a depth-1 listing straight into entries.
pub fn parse_listing(xml: &str) -> Result<Vec<Entry>> {
    let records = parse_multistatus(xml)?;
    Ok(entries_from_records(&records))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(href: &str, collection: bool) -> String {
        let rt = if collection {
            "<d:resourcetype><d:collection/></d:resourcetype>"
        } else {
            "<d:resourcetype/><d:getcontentlength>42</d:getcontentlength>"
        };
        format!(
            "<d:response><d:href>{href}</d:href><d:propstat><d:prop>{rt}</d:prop>\
             <d:status>HTTP/1.1 200 OK</d:status></d:propstat></d:response>"
        )
    }

    fn multistatus(body: &str) -> String {
        format!(
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\
             <d:multistatus xmlns:d=\"DAV:\">{body}</d:multistatus>"
        )
    }

    #[test]
    fn test_children_plus_self() {
        let xml = multistatus(&format!(
            "{}{}{}{}",
            response("/dav/docs/", true),
            response("/dav/docs/report.txt", false),
            response("/dav/docs/images/", true),
            response("/dav/docs/notes.md", false),
        ));
        let entries = parse_listing(&xml).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0], Entry {
            name: "report.txt".into(),
            kind: EntryKind::File,
            size: Some(42),
        });
        assert_eq!(entries[1], Entry::directory("images"));
        assert_eq!(entries[2].name, "notes.md");
    }

    #[test]
    fn test_only_self_entry() {
        let xml = multistatus(&response("/dav/empty/", true));
        assert!(parse_listing(&xml).unwrap().is_empty());
    }

    #[test]
    fn test_zero_records_is_protocol_error() {
        let xml = multistatus("");
        assert!(matches!(parse_listing(&xml), Err(DavError::Protocol(_))));
    }

    #[test]
    fn test_malformed_is_protocol_error() {
        let err = parse_listing("<d:multistatus xmlns:d=\"DAV:\"><d:response></d:href>");
        assert!(matches!(err, Err(DavError::Protocol(_))));

        let truncated = "<d:multistatus xmlns:d=\"DAV:\"><d:response><d:href>/dav/</d:href></d:response>";
        assert!(matches!(parse_listing(truncated), Err(DavError::Protocol(_))));

        assert!(matches!(parse_listing("not xml"), Err(DavError::Protocol(_))));
        assert!(matches!(parse_listing(""), Err(DavError::Protocol(_))));
    }

    #[test]
    fn test_missing_href_is_protocol_error() {
        let xml = multistatus("<d:response><d:propstat/></d:response>");
        assert!(matches!(parse_listing(&xml), Err(DavError::Protocol(_))));
    }

    #[test]
    fn test_percent_decoding() {
        let xml = multistatus(&format!(
            "{}{}{}",
            response("/dav/", true),
            response("/dav/my%20file%20%26%20more.txt", false),
            response("/dav/%C3%BCber/", true),
        ));
        let entries = parse_listing(&xml).unwrap();
        assert_eq!(entries[0].name, "my file & more.txt");
        assert_eq!(entries[1].name, "über");
        assert!(entries[1].is_directory());
    }

    #[test]
    fn test_namespace_prefix_agnostic() {
        let xml = "<multistatus xmlns=\"DAV:\">\
            <response><href>http://host/dav/</href><propstat><prop><resourcetype><collection/></resourcetype></prop></propstat></response>\
            <response><href>http://host/dav/a.txt</href><propstat><prop><resourcetype/></prop></propstat></response>\
            </multistatus>";
        let entries = parse_listing(xml).unwrap();
        assert_eq!(entries, vec![Entry::file("a.txt")]);

        let upper = "<D:multistatus xmlns:D=\"DAV:\">\
            <D:response><D:href>/dav/</D:href></D:response>\
            <D:response><D:href>/dav/sub/</D:href><D:propstat><D:prop><D:resourcetype><D:collection></D:collection></D:resourcetype></D:prop></D:propstat></D:response>\
            </D:multistatus>";
        let entries = parse_listing(upper).unwrap();
        assert_eq!(entries, vec![Entry::directory("sub")]);
    }

    #[test]
    fn test_escaped_href_text() {
        let xml = multistatus(&format!(
            "{}{}",
            response("/dav/", true),
            response("/dav/a&amp;b.txt", false),
        ));
        let entries = parse_listing(&xml).unwrap();
        assert_eq!(entries[0].name, "a&b.txt");
    }

    #[test]
    fn test_records_keep_document_order() {
        let xml = multistatus(&format!(
            "{}{}",
            response("/dav/x/", true),
            response("/dav/x/y", false),
        ));
        let records = parse_multistatus(&xml).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].href, "/dav/x/");
        assert!(records[0].is_collection);
        assert_eq!(records[1].content_length, Some(42));
    }
}
