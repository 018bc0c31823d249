use std::ops::Range;

use log::trace;
use memchr::memmem;

use super::cursor::Cursor;
use crate::Result;

/// Byte offsets of a `"key": value` pair inside a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct KeyMatch {
    pub start: usize,
    pub value_start: usize,
    pub end: usize,
}

/// Finds the first occurrence of `"key"` that is followed by a colon and
/// scans the value after it.
///
/// The match is textual: a nested object that repeats the key name before
/// the top-level occurrence wins. BIOM documents do not repeat their
/// top-level key names inside metadata, and callers rely on that.
pub(crate) fn locate_key(doc: &str, key: &str) -> Result<Option<KeyMatch>> {
    let needle = format!("\"{key}\"");
    let finder = memmem::Finder::new(needle.as_bytes());
    for start in finder.find_iter(doc.as_bytes()) {
        let mut cursor = Cursor::at(doc, start + needle.len());
        cursor.skip_whitespace();
        if !cursor.eat(b':') {
            continue;
        }
        cursor.skip_whitespace();
        let value_start = cursor.position();
        let end = cursor.scan_value()?;
        trace!("located key {key:?} at {start}..{end}");
        return Ok(Some(KeyMatch {
            start,
            value_start,
            end,
        }));
    }
    trace!("key {key:?} not present");
    Ok(None)
}

/// Returns the raw value text for `key`, without the key and colon.
pub(crate) fn field_value<'a>(doc: &'a str, key: &str) -> Result<Option<&'a str>> {
    Ok(locate_key(doc, key)?.map(|found| &doc[found.value_start..found.end]))
}

/// Extracts the exact `"key": value` text for one field of a document.
///
/// The result is a slice of `doc` with its original spacing, so it can be
/// spliced into another document as is. A key that does not occur yields
/// an empty string.
///
/// ```
/// let doc = r#"{"a":{"b":[1,2]},"X":10.123}"#;
/// assert_eq!(biom_parse::direct_parse_key(doc, "X").unwrap(), r#""X":10.123"#);
/// assert_eq!(biom_parse::direct_parse_key(doc, "missing").unwrap(), "");
/// ```
pub fn direct_parse_key<'a>(doc: &'a str, key: &str) -> Result<&'a str> {
    Ok(direct_parse_key_span(doc, key)?
        .map(|range| &doc[range])
        .unwrap_or(""))
}

/// Byte range of the text [`direct_parse_key`] would return.
pub fn direct_parse_key_span(doc: &str, key: &str) -> Result<Option<Range<usize>>> {
    Ok(locate_key(doc, key)?.map(|found| found.start..found.end))
}
