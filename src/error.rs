#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A field the operation depends on is absent from the document.
    MissingField,
    /// Unbalanced brackets, unterminated strings, rows of the wrong width.
    Malformed,
    /// An index outside the declared axis dimension.
    OutOfRange,
    InvalidKeepList,
    InvalidNumber,
    UnknownAxis,
    DuplicateId,
}

/// Where in the input an error was detected.
///
/// Document scans report a byte `offset`; line parsers report a 1-based
/// `line`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub offset: Option<usize>,
    pub line: Option<usize>,
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
    pub location: Option<Location>,
}

impl Error {
    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            location: None,
        }
    }

    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorKind::MissingField,
            format!("document does not have a \"{field}\" field"),
        )
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Malformed, message)
    }

    pub fn out_of_range(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::OutOfRange, message)
    }

    pub fn invalid_keep_list(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidKeepList, message)
    }

    pub fn invalid_number(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidNumber, message)
    }

    pub fn unknown_axis(token: &str) -> Self {
        Self::new(
            ErrorKind::UnknownAxis,
            format!("unknown axis {token:?}, expected \"observations\" or \"samples\""),
        )
    }

    pub fn duplicate_id(id: &str) -> Self {
        Self::new(ErrorKind::DuplicateId, format!("duplicate id {id:?}"))
    }

    pub fn at_offset(mut self, offset: usize) -> Self {
        self.location = Some(Location {
            offset: Some(offset),
            line: None,
        });
        self
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.location = Some(Location {
            offset: None,
            line: Some(line),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    fn test_display_is_message() {
        let err = Error::missing_field("shape");
        assert_eq!(err.to_string(), "document does not have a \"shape\" field");
        assert_eq!(err.kind, ErrorKind::MissingField);
        assert!(err.location.is_none());
    }

    #[rstest::rstest]
    fn test_locations() {
        let err = Error::malformed("unterminated string").at_offset(12);
        assert_eq!(err.location.and_then(|loc| loc.offset), Some(12));

        let err = Error::invalid_number("bad count").at_line(3);
        assert_eq!(err.location.and_then(|loc| loc.line), Some(3));
        assert_eq!(err.location.and_then(|loc| loc.offset), None);
    }
}
