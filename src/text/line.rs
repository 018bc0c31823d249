use smallvec::SmallVec;

pub(crate) type FieldBuf<'a> = SmallVec<[&'a str; 16]>;

pub(crate) fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Drops a trailing `\r\n` or `\n` left by callers that split on `\n` only.
pub(crate) fn strip_line_ending(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

pub(crate) fn split_fields(line: &str) -> FieldBuf<'_> {
    line.split('\t').collect()
}

/// Text after the comment marker if `line` is a comment.
pub(crate) fn comment_body(line: &str, marker: char) -> Option<&str> {
    line.trim_start().strip_prefix(marker)
}

/// Like [`comment_body`], but also accepts a comment wrapped in double
/// quotes (`"#note"`), as spreadsheet exports write them. The result is
/// trimmed.
pub(crate) fn quoted_comment_body(line: &str, marker: char) -> Option<&str> {
    let line = line.trim();
    if let Some(body) = comment_body(line, marker) {
        return Some(body.trim());
    }
    let body = line.strip_prefix('"')?.strip_prefix(marker)?;
    Some(body.strip_suffix('"').unwrap_or(body).trim())
}

/// Trims whitespace, removes one enclosing pair of double quotes and trims
/// again.
pub(crate) fn clean_field(field: &str) -> &str {
    let field = field.trim();
    match field
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
    {
        Some(inner) => inner.trim(),
        None => field,
    }
}
