use memchr::{memchr, memchr2, memchr3};
use smallvec::SmallVec;

use crate::{Error, Result};

/// Byte cursor over a JSON document that locates value boundaries without
/// building a parse tree.
///
/// Every boundary the cursor reports sits on an ASCII structural byte, so
/// slicing the input at those offsets is always valid UTF-8.
pub(crate) struct Cursor<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(input: &'a str) -> Self {
        Self::at(input, 0)
    }

    pub fn at(input: &'a str, position: usize) -> Self {
        Self { input, position }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.input[start..end]
    }

    pub fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.position).copied()
    }

    pub fn advance(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.position += 1;
        Some(byte)
    }

    pub fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.position += 1;
            return true;
        }
        false
    }

    pub fn expect(&mut self, byte: u8) -> Result<()> {
        if self.eat(byte) {
            return Ok(());
        }
        let found = match self.peek() {
            Some(other) => format!("'{}'", other as char),
            None => "end of input".to_string(),
        };
        Err(Error::malformed(format!("expected '{}', found {found}", byte as char))
            .at_offset(self.position))
    }

    pub fn skip_whitespace(&mut self) {
        let bytes = self.input.as_bytes();
        while self.position < bytes.len() && bytes[self.position].is_ascii_whitespace() {
            self.position += 1;
        }
    }

    /// Moves to the next occurrence of `byte` and returns its offset. The
    /// cursor is left on the byte itself.
    pub fn seek(&mut self, byte: u8) -> Result<usize> {
        let bytes = self.input.as_bytes();
        match memchr(byte, &bytes[self.position..]) {
            Some(offset) => {
                self.position += offset;
                Ok(self.position)
            }
            None => Err(
                Error::malformed(format!("missing '{}'", byte as char)).at_offset(self.position)
            ),
        }
    }

    /// Scans the value starting at the cursor and returns the offset just
    /// past its end.
    pub fn scan_value(&mut self) -> Result<usize> {
        match self.peek() {
            Some(b'{') | Some(b'[') => self.scan_balanced(),
            Some(b'"') => self.scan_string(),
            Some(b',') | Some(b'}') | Some(b']') | None => {
                Err(Error::malformed("missing value").at_offset(self.position))
            }
            Some(_) => self.scan_scalar(),
        }
    }

    /// Cursor on an opening quote. Honors backslash escapes.
    pub fn scan_string(&mut self) -> Result<usize> {
        let start = self.position;
        self.expect(b'"')?;
        let bytes = self.input.as_bytes();
        loop {
            let Some(offset) = memchr2(b'"', b'\\', &bytes[self.position..]) else {
                return Err(Error::malformed("unterminated string").at_offset(start));
            };
            let idx = self.position + offset;
            if bytes[idx] == b'"' {
                self.position = idx + 1;
                return Ok(self.position);
            }
            if idx + 2 > bytes.len() {
                return Err(Error::malformed("unterminated string").at_offset(start));
            }
            self.position = idx + 2;
        }
    }

    /// Cursor on `{` or `[`. Tracks the expected closers so that a `]`
    /// closing a `{` is reported instead of silently balancing; brackets
    /// inside string literals are ignored.
    pub fn scan_balanced(&mut self) -> Result<usize> {
        let start = self.position;
        let mut closers: SmallVec<[u8; 16]> = SmallVec::new();
        let bytes = self.input.as_bytes();
        loop {
            match bytes.get(self.position).copied() {
                None => {
                    return Err(Error::malformed("unbalanced brackets").at_offset(start));
                }
                Some(b'"') if !closers.is_empty() => {
                    self.scan_string()?;
                }
                Some(b'[') => {
                    closers.push(b']');
                    self.position += 1;
                }
                Some(b'{') => {
                    closers.push(b'}');
                    self.position += 1;
                }
                Some(close @ (b']' | b'}')) if !closers.is_empty() => {
                    if closers.pop() != Some(close) {
                        return Err(Error::malformed(format!(
                            "mismatched '{}'",
                            close as char
                        ))
                        .at_offset(self.position));
                    }
                    self.position += 1;
                    if closers.is_empty() {
                        return Ok(self.position);
                    }
                }
                Some(other) if closers.is_empty() => {
                    return Err(Error::malformed(format!(
                        "expected '[' or '{{', found '{}'",
                        other as char
                    ))
                    .at_offset(self.position));
                }
                Some(_) => self.position += 1,
            }
        }
    }

    /// Numbers, booleans and null run until the next `,`, `}` or `]` at the
    /// current depth. The returned end excludes trailing whitespace; the
    /// cursor stops on the delimiter.
    pub fn scan_scalar(&mut self) -> Result<usize> {
        let start = self.position;
        let bytes = self.input.as_bytes();
        let stop = memchr3(b',', b'}', b']', &bytes[start..])
            .map(|offset| start + offset)
            .unwrap_or(bytes.len());
        self.position = stop;
        let mut end = stop;
        while end > start && bytes[end - 1].is_ascii_whitespace() {
            end -= 1;
        }
        if end == start {
            return Err(Error::malformed("missing value").at_offset(start));
        }
        Ok(end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn scan(input: &str) -> Result<&str> {
        let mut cursor = Cursor::new(input);
        let end = cursor.scan_value()?;
        Ok(cursor.slice(0, end))
    }

    #[rstest::rstest]
    #[case(r#"{"a":[1,2]} tail"#, r#"{"a":[1,2]}"#)]
    #[case("[[0,1,2],\n  [3,4,5]],", "[[0,1,2],\n  [3,4,5]]")]
    #[case(r#""plain", 1"#, r#""plain""#)]
    #[case(r#""esc \" quote""#, r#""esc \" quote""#)]
    #[case("10.123}", "10.123")]
    #[case("null  ,", "null")]
    #[case("42", "42")]
    fn test_scan_value(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(scan(input).unwrap(), expected);
    }

    #[rstest::rstest]
    fn test_brackets_inside_strings_are_ignored() {
        let input = r#"{"id":"odd ] name {", "v":[1]}, "next""#;
        assert_eq!(scan(input).unwrap(), r#"{"id":"odd ] name {", "v":[1]}"#);
    }

    #[rstest::rstest]
    fn test_escaped_backslash_before_quote() {
        let input = r#"["a\\", "b"]"#;
        assert_eq!(scan(input).unwrap(), input);
    }

    #[rstest::rstest]
    #[case("[1,2")]
    #[case(r#"{"a":"open}"#)]
    #[case("[1,2}")]
    #[case(r#""never closed"#)]
    #[case(r#""trailing escape\"#)]
    #[case(",")]
    #[case("")]
    fn test_malformed_values(#[case] input: &str) {
        let err = scan(input).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Malformed);
        assert!(err.location.is_some());
    }

    #[rstest::rstest]
    fn test_seek_and_expect() {
        let mut cursor = Cursor::new("  [1, 2]");
        cursor.skip_whitespace();
        cursor.expect(b'[').unwrap();
        assert_eq!(cursor.seek(b']').unwrap(), 7);
        assert!(cursor.expect(b',').is_err());
        assert_eq!(cursor.advance(), Some(b']'));
        assert_eq!(cursor.advance(), None);
    }
}
