use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::Error;

pub const DEFAULT_COMMENT_MARKER: char = '#';
pub const DEFAULT_HEADER_MARK: &str = "OTU ID";

/// Numeric type the count fields of a classic table are parsed as.
///
/// Names follow the `matrix_element_type` values of BIOM documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ElementType {
    Int,
    #[default]
    Float,
}

impl ElementType {
    pub fn as_str(self) -> &'static str {
        match self {
            ElementType::Int => "int",
            ElementType::Float => "float",
        }
    }
}

impl FromStr for ElementType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "int" => Ok(ElementType::Int),
            "float" => Ok(ElementType::Float),
            other => Err(Error::malformed(format!(
                "unknown element type {other:?}, expected \"int\" or \"float\""
            ))),
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct ClassicTableOptions {
    pub element_type: ElementType,
    /// First header field that marks the header line. `None` falls back to
    /// the last comment line before the first data row.
    pub header_mark: Option<String>,
    pub comment_marker: char,
    pub exclude_observations: HashSet<String>,
    pub exclude_samples: HashSet<String>,
}

impl ClassicTableOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_element_type(mut self, element_type: ElementType) -> Self {
        self.element_type = element_type;
        self
    }

    pub fn with_header_mark(mut self, header_mark: Option<&str>) -> Self {
        self.header_mark = header_mark.map(str::to_string);
        self
    }

    pub fn with_comment_marker(mut self, marker: char) -> Self {
        self.comment_marker = marker;
        self
    }

    pub fn with_excluded_observations<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_observations = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_excluded_samples<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_samples = ids.into_iter().map(Into::into).collect();
        self
    }
}

impl Default for ClassicTableOptions {
    fn default() -> Self {
        Self {
            element_type: ElementType::default(),
            header_mark: Some(DEFAULT_HEADER_MARK.to_string()),
            comment_marker: DEFAULT_COMMENT_MARKER,
            exclude_observations: HashSet::new(),
            exclude_samples: HashSet::new(),
        }
    }
}

/// Per-column transform applied to cleaned metadata values.
pub type Transform = Arc<dyn Fn(&str) -> String + Send + Sync>;

#[derive(Clone)]
pub struct MetadataMapOptions {
    /// Overrides any in-file header. The first entry names the id column.
    pub header: Option<Vec<String>>,
    pub transforms: HashMap<String, Transform>,
    pub comment_marker: char,
    pub reject_duplicate_ids: bool,
}

impl MetadataMapOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header<I, S>(mut self, header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.header = Some(header.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_transform<F>(mut self, column: impl Into<String>, transform: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.transforms.insert(column.into(), Arc::new(transform));
        self
    }

    pub fn with_comment_marker(mut self, marker: char) -> Self {
        self.comment_marker = marker;
        self
    }

    pub fn with_reject_duplicate_ids(mut self, reject: bool) -> Self {
        self.reject_duplicate_ids = reject;
        self
    }
}

impl Default for MetadataMapOptions {
    fn default() -> Self {
        Self {
            header: None,
            transforms: HashMap::new(),
            comment_marker: DEFAULT_COMMENT_MARKER,
            reject_duplicate_ids: false,
        }
    }
}

impl fmt::Debug for MetadataMapOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut columns: Vec<&String> = self.transforms.keys().collect();
        columns.sort();
        f.debug_struct("MetadataMapOptions")
            .field("header", &self.header)
            .field("transforms", &columns)
            .field("comment_marker", &self.comment_marker)
            .field("reject_duplicate_ids", &self.reject_duplicate_ids)
            .finish()
    }
}
