//! Id-keyed metadata loaded from tab-delimited mapping files.

pub mod kind;

use indexmap::IndexMap;
use log::{debug, warn};

use crate::options::MetadataMapOptions;
use crate::text::line::{clean_field, is_blank, quoted_comment_body, split_fields, strip_line_ending};
use crate::{Error, Result};

/// Column name to value for one id, in header order.
pub type MetadataRecord = IndexMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataMap {
    records: IndexMap<String, MetadataRecord>,
    header: Vec<String>,
    comments: Vec<String>,
}

impl MetadataMap {
    pub fn from_lines<I, S>(lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_lines_with_options(lines, &MetadataMapOptions::default())
    }

    /// Loads a mapping file.
    ///
    /// The first comment line is the header unless `options.header` is
    /// given. An explicit header replaces the in-file one: a first comment
    /// line that starts with the explicit id column name is dropped, any
    /// other is kept as a comment. Rows keep only as many fields as the
    /// header has columns.
    ///
    /// Data rows may come before the header line; they are held until the
    /// whole input is read. Data rows with no header anywhere are
    /// `Malformed`, reported at the first such row.
    pub fn from_lines_with_options<I, S>(lines: I, options: &MetadataMapOptions) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let marker = options.comment_marker;
        let mut header = options.header.clone();
        let mut seen_comment = false;
        let mut comments = Vec::new();
        let mut rows: Vec<(usize, Vec<String>)> = Vec::new();

        for (idx, line) in lines.into_iter().enumerate() {
            let line_no = idx + 1;
            let line = strip_line_ending(line.as_ref());
            if is_blank(line) {
                continue;
            }

            if let Some(body) = quoted_comment_body(line, marker) {
                let first = !seen_comment;
                seen_comment = true;
                if first {
                    let fields: Vec<String> = split_fields(body)
                        .iter()
                        .map(|field| clean_field(field).to_string())
                        .collect();
                    if header.is_none() {
                        debug!("metadata header at line {line_no}: {fields:?}");
                        header = Some(fields);
                        continue;
                    }
                    if header.as_ref().and_then(|explicit| explicit.first()) == fields.first() {
                        debug!("in-file header at line {line_no} replaced by explicit header");
                        continue;
                    }
                }
                comments.push(body.to_string());
                continue;
            }

            let fields: Vec<String> = split_fields(line)
                .iter()
                .map(|field| clean_field(field).to_string())
                .collect();
            rows.push((line_no, fields));
        }

        let columns: &[String] = match header.as_deref() {
            Some(columns) => columns,
            None => match rows.first() {
                Some(&(line_no, _)) => {
                    return Err(
                        Error::malformed("metadata file has no header line").at_line(line_no)
                    );
                }
                None => &[],
            },
        };

        let mut records: IndexMap<String, MetadataRecord> = IndexMap::with_capacity(rows.len());
        for (line_no, fields) in rows {
            let mut fields = fields.into_iter();
            let Some(id) = fields.next() else {
                continue;
            };

            let mut record = MetadataRecord::with_capacity(columns.len().saturating_sub(1));
            for (column, value) in columns.iter().skip(1).zip(fields) {
                let value = match options.transforms.get(column) {
                    Some(transform) => transform(value.as_str()),
                    None => value,
                };
                record.insert(column.clone(), value);
            }

            if records.contains_key(&id) {
                if options.reject_duplicate_ids {
                    return Err(Error::duplicate_id(&id).at_line(line_no));
                }
                warn!("duplicate metadata id {id:?} at line {line_no}, keeping the later row");
            }
            records.insert(id, record);
        }

        debug!(
            "loaded metadata for {} ids, {} comment lines",
            records.len(),
            comments.len()
        );
        Ok(Self {
            records,
            header: header.unwrap_or_default(),
            comments,
        })
    }

    pub fn get(&self, id: &str) -> Option<&MetadataRecord> {
        self.records.get(id)
    }

    pub fn value(&self, id: &str, column: &str) -> Option<&str> {
        self.records.get(id)?.get(column).map(String::as_str)
    }

    /// Ids in the order they first appear.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetadataRecord)> {
        self.records.iter().map(|(id, record)| (id.as_str(), record))
    }

    /// Column names, the id column first.
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Comment lines other than the header, marker and whitespace removed.
    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    pub fn records(&self) -> &IndexMap<String, MetadataRecord> {
        &self.records
    }

    pub fn into_records(self) -> IndexMap<String, MetadataRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
