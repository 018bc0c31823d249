//! Parser for the legacy tab-delimited "classic" OTU table.
//!
//! ```text
//! # optional comments
//! #OTU ID	Sample1	Sample2	Consensus Lineage
//! 0	19111	44536	Bacteria; Actinobacteria
//! ```
//!
//! The header may be commented or not. Blank lines and other comment lines
//! are skipped wherever they appear.

pub mod matrix;
pub mod writer;

use log::debug;

pub use matrix::DenseMatrix;

use crate::metadata::kind::{ObservationMetadata, ObservationMetadataType};
use crate::options::ClassicTableOptions;
use crate::text::line::{comment_body, is_blank, split_fields, strip_line_ending};
use crate::{Error, Result};

/// Trailing header names recognized as a metadata column, compared
/// case-insensitively.
const METADATA_COLUMN_NAMES: &[&str] = &[
    "consensus lineage",
    "consensuslineage",
    "taxonomy",
    "otu metadata",
];

#[derive(Debug, Clone, PartialEq)]
pub struct ClassicTable {
    pub sample_ids: Vec<String>,
    pub observation_ids: Vec<String>,
    pub data: DenseMatrix,
    /// One entry per observation when the table has a metadata column,
    /// empty otherwise.
    pub metadata: Vec<String>,
    pub metadata_name: Option<String>,
}

impl ClassicTable {
    pub fn has_metadata(&self) -> bool {
        self.metadata_name.is_some()
    }

    /// Interprets every metadata string with `kind`, e.g. splitting a
    /// taxonomy on `;`.
    pub fn typed_metadata(&self, kind: ObservationMetadataType) -> Vec<ObservationMetadata> {
        self.metadata.iter().map(|value| kind.apply(value)).collect()
    }
}

/// Parses classic table lines.
///
/// Count fields are parsed as `options.element_type`; a field that does not
/// parse aborts with [`ErrorKind::InvalidNumber`](crate::ErrorKind). Ids in
/// the exclusion sets are dropped together with their matrix cells and
/// metadata.
///
/// When the header does not name a metadata column, a first data row with
/// one extra non-numeric trailing field makes that column metadata. If the
/// next data row holds a number there instead, the column is counts after
/// all and the first row's field is reported as `InvalidNumber`.
pub fn parse_classic_table<I, S>(lines: I, options: &ClassicTableOptions) -> Result<ClassicTable>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parser = ClassicParser::new(options);
    for (idx, line) in lines.into_iter().enumerate() {
        parser.feed(strip_line_ending(line.as_ref()), idx + 1)?;
    }
    parser.finish()
}

struct Header {
    columns: Vec<String>,
    line: usize,
    layout: Option<Layout>,
}

/// Column roles, fixed by the header and the first data row.
struct Layout {
    sample_count: usize,
    metadata_name: Option<String>,
    /// The metadata column was inferred from the first data row rather
    /// than named by the header.
    inferred_metadata: bool,
    /// Positions among the sample columns that survive exclusion.
    kept: Vec<usize>,
    sample_ids: Vec<String>,
}

impl Header {
    fn parse(text: &str, line: usize) -> Self {
        let columns = split_fields(text)
            .iter()
            .skip(1)
            .map(|field| field.trim().to_string())
            .collect();
        Self {
            columns,
            line,
            layout: None,
        }
    }

    fn names_metadata_column(&self) -> bool {
        self.columns.last().is_some_and(|last| {
            let last = last.to_ascii_lowercase();
            METADATA_COLUMN_NAMES.contains(&last.as_str())
        })
    }

    /// Fixes the layout. Without a recognized metadata column name, a
    /// trailing field that is not a count marks the last column as
    /// metadata.
    fn resolve(&mut self, first_row: Option<&[&str]>, options: &ClassicTableOptions) -> &Layout {
        let named = self.names_metadata_column();
        let inferred = !named
            && first_row.is_some_and(|fields| {
                !self.columns.is_empty()
                    && fields.len() == self.columns.len() + 1
                    && fields.last().is_some_and(|last| {
                        !matrix::is_numeric(last.trim(), options.element_type)
                    })
            });
        let has_metadata = named || inferred;
        let sample_count = self.columns.len() - usize::from(has_metadata);
        let metadata_name = has_metadata.then(|| self.columns[sample_count].clone());
        let kept: Vec<usize> = (0..sample_count)
            .filter(|&idx| !options.exclude_samples.contains(&self.columns[idx]))
            .collect();
        let sample_ids = kept.iter().map(|&idx| self.columns[idx].clone()).collect();
        debug!(
            "classic header at line {}: {sample_count} samples, metadata column {:?}",
            self.line, metadata_name
        );
        self.layout.insert(Layout {
            sample_count,
            metadata_name,
            inferred_metadata: inferred,
            kept,
            sample_ids,
        })
    }
}

struct ClassicParser<'o> {
    options: &'o ClassicTableOptions,
    header: Option<Header>,
    last_comment: Option<(String, usize)>,
    /// Trailing field and line of the first data row while an inferred
    /// metadata column awaits the second row.
    unconfirmed_metadata: Option<(String, usize)>,
    observation_ids: Vec<String>,
    metadata: Vec<String>,
    data: DenseMatrix,
}

impl<'o> ClassicParser<'o> {
    fn new(options: &'o ClassicTableOptions) -> Self {
        Self {
            options,
            header: None,
            last_comment: None,
            unconfirmed_metadata: None,
            observation_ids: Vec::new(),
            metadata: Vec::new(),
            data: DenseMatrix::new(options.element_type),
        }
    }

    fn is_header_mark(&self, text: &str) -> bool {
        let Some(mark) = self.options.header_mark.as_deref() else {
            return false;
        };
        text.split('\t').next().is_some_and(|first| first.trim() == mark)
    }

    fn feed(&mut self, line: &str, line_no: usize) -> Result<()> {
        if is_blank(line) {
            return Ok(());
        }
        if let Some(body) = comment_body(line, self.options.comment_marker) {
            if self.header.is_none() {
                if self.is_header_mark(body) {
                    self.header = Some(Header::parse(body, line_no));
                } else {
                    self.last_comment = Some((body.to_string(), line_no));
                }
            }
            return Ok(());
        }
        if self.header.is_none() && self.is_header_mark(line) {
            self.header = Some(Header::parse(line, line_no));
            return Ok(());
        }
        self.push_row(line, line_no)
    }

    fn push_row(&mut self, line: &str, line_no: usize) -> Result<()> {
        let options = self.options;
        let fields = split_fields(line);
        let header =
            header_for_data(&mut self.header, &mut self.last_comment, options, line_no)?;
        let first_row = header.layout.is_none();
        let layout = match header.layout {
            Some(ref layout) => layout,
            None => header.resolve(Some(fields.as_slice()), options),
        };

        let expected = 1 + layout.sample_count + usize::from(layout.metadata_name.is_some());
        if fields.len() != expected {
            return Err(Error::malformed(format!(
                "expected {expected} fields, found {}",
                fields.len()
            ))
            .at_line(line_no));
        }

        let metadata_field = layout
            .metadata_name
            .as_ref()
            .map(|_| fields[expected - 1].trim());
        if let Some((guessed, guessed_line)) = self.unconfirmed_metadata.take() {
            if metadata_field.is_some_and(|field| matrix::is_numeric(field, options.element_type)) {
                return Err(Error::invalid_number(format!(
                    "invalid {} count {guessed:?}",
                    options.element_type
                ))
                .at_line(guessed_line));
            }
        }
        if first_row && layout.inferred_metadata {
            self.unconfirmed_metadata = metadata_field.map(|field| (field.to_string(), line_no));
        }

        let id = fields[0].trim();
        if options.exclude_observations.contains(id) {
            return Ok(());
        }
        let counts = &fields[1..1 + layout.sample_count];
        self.data
            .push_row(layout.kept.iter().map(|&idx| counts[idx].trim()))
            .map_err(|err| err.at_line(line_no))?;
        if let Some(field) = metadata_field {
            self.metadata.push(field.to_string());
        }
        self.observation_ids.push(id.to_string());
        Ok(())
    }

    fn finish(self) -> Result<ClassicTable> {
        let mut header = self
            .header
            .ok_or_else(|| Error::malformed("classic table has no header line"))?;
        if header.layout.is_none() {
            header.resolve(None, self.options);
        }
        let Some(layout) = header.layout else {
            return Err(Error::malformed("classic table header could not be resolved"));
        };
        debug!(
            "parsed classic table: {} observations x {} samples",
            self.observation_ids.len(),
            layout.sample_ids.len()
        );
        Ok(ClassicTable {
            sample_ids: layout.sample_ids,
            observation_ids: self.observation_ids,
            data: self.data,
            metadata: self.metadata,
            metadata_name: layout.metadata_name,
        })
    }
}

/// Header that applies to a data row at `line_no`. Without a header mark,
/// the last comment line seen so far is promoted to header.
fn header_for_data<'h>(
    header: &'h mut Option<Header>,
    last_comment: &mut Option<(String, usize)>,
    options: &ClassicTableOptions,
    line_no: usize,
) -> Result<&'h mut Header> {
    match *header {
        Some(ref mut found) => Ok(found),
        None => {
            let fallback = match options.header_mark {
                None => last_comment.take(),
                Some(_) => None,
            };
            let (comment, comment_line) = fallback.ok_or_else(|| {
                Error::malformed("data row before the header line").at_line(line_no)
            })?;
            Ok(header.insert(Header::parse(&comment, comment_line)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ElementType;
    use crate::ErrorKind;

    fn int_options() -> ClassicTableOptions {
        ClassicTableOptions::new().with_element_type(ElementType::Int)
    }

    #[rstest::rstest]
    fn test_commented_header_with_metadata() {
        let lines = [
            "# some comment",
            "#OTU ID\tA\tB\tConsensus Lineage",
            "o1\t1\t2\tk__Bacteria",
            "",
            "o2\t3\t4\tk__Archaea",
        ];
        let table = parse_classic_table(lines, &int_options()).unwrap();
        assert_eq!(table.sample_ids, ["A", "B"]);
        assert_eq!(table.observation_ids, ["o1", "o2"]);
        assert_eq!(table.data, DenseMatrix::Int(vec![vec![1, 2], vec![3, 4]]));
        assert_eq!(table.metadata, ["k__Bacteria", "k__Archaea"]);
        assert_eq!(table.metadata_name.as_deref(), Some("Consensus Lineage"));
    }

    #[rstest::rstest]
    fn test_no_metadata_column() {
        let lines = ["#OTU ID\tA\tB", "o1\t1\t2", "o2\t3\t4"];
        let table = parse_classic_table(lines, &int_options()).unwrap();
        assert!(!table.has_metadata());
        assert!(table.metadata.is_empty());
        assert_eq!(table.data.n_rows(), 2);
    }

    #[rstest::rstest]
    fn test_unnamed_metadata_column_detected_from_data() {
        let lines = ["#OTU ID\tA\tNotes", "o1\t1\tfirst", "o2\t3\tsecond"];
        let table = parse_classic_table(lines, &int_options()).unwrap();
        assert_eq!(table.sample_ids, ["A"]);
        assert_eq!(table.metadata_name.as_deref(), Some("Notes"));
        assert_eq!(table.metadata, ["first", "second"]);
    }

    #[rstest::rstest]
    #[case(vec!["#OTU ID\tA\tB", "o1\t1\tx", "o2\t3\t4"], 2)]
    #[case(vec!["#OTU ID\tA\tB", "", "o1\t1\t2x", "# note", "o2\t3\t4", "o3\t5\t6"], 3)]
    fn test_bad_count_in_first_row_not_taken_for_metadata(
        #[case] lines: Vec<&str>,
        #[case] line: usize,
    ) {
        let err = parse_classic_table(lines, &int_options()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidNumber);
        assert_eq!(err.location.and_then(|loc| loc.line), Some(line));
    }

    #[rstest::rstest]
    fn test_inferred_metadata_single_row() {
        let table = parse_classic_table(["#OTU ID\tA\tB", "o1\t1\tx"], &int_options()).unwrap();
        assert_eq!(table.sample_ids, ["A"]);
        assert_eq!(table.metadata, ["x"]);
    }

    #[rstest::rstest]
    fn test_named_metadata_column_may_hold_numbers() {
        let lines = ["#OTU ID\tA\ttaxonomy", "o1\t1\tk__Bacteria", "o2\t3\t4"];
        let table = parse_classic_table(lines, &int_options()).unwrap();
        assert_eq!(table.metadata, ["k__Bacteria", "4"]);
    }

    #[rstest::rstest]
    fn test_header_from_last_comment_without_mark() {
        let lines = ["#Full OTU Counts", "#Taxon\tA\tB", "o1\t1\t2"];
        let options = int_options().with_header_mark(None);
        let table = parse_classic_table(lines, &options).unwrap();
        assert_eq!(table.sample_ids, ["A", "B"]);
        assert_eq!(table.observation_ids, ["o1"]);
    }

    #[rstest::rstest]
    fn test_data_before_header() {
        let err = parse_classic_table(["o1\t1\t2", "#OTU ID\tA\tB"], &int_options()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Malformed);
        assert_eq!(err.location.and_then(|loc| loc.line), Some(1));
    }

    #[rstest::rstest]
    fn test_missing_header() {
        let err = parse_classic_table(["# only comments", ""], &int_options()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Malformed);
    }

    #[rstest::rstest]
    fn test_header_only() {
        let table = parse_classic_table(["#OTU ID\tA\tB\ttaxonomy"], &int_options()).unwrap();
        assert_eq!(table.sample_ids, ["A", "B"]);
        assert_eq!(table.metadata_name.as_deref(), Some("taxonomy"));
        assert!(table.data.is_empty());
    }

    #[rstest::rstest]
    fn test_invalid_count() {
        let lines = ["#OTU ID\tA\tB", "o1\t1\t2", "o2\t3\tx"];
        let err = parse_classic_table(lines, &int_options()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidNumber);
        assert_eq!(err.location.and_then(|loc| loc.line), Some(3));
    }

    #[rstest::rstest]
    fn test_wrong_width() {
        let lines = ["#OTU ID\tA\tB", "o1\t1\t2\t3"];
        let err = parse_classic_table(lines, &int_options()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Malformed);
    }

    #[rstest::rstest]
    fn test_exclusions() {
        let lines = [
            "#OTU ID\tA\tB\tC\ttaxonomy",
            "o1\t1\t2\t3\tt1",
            "o2\t4\t5\t6\tt2",
            "o3\t7\t8\t9\tt3",
        ];
        let options = int_options()
            .with_excluded_observations(["o2"])
            .with_excluded_samples(["B"]);
        let table = parse_classic_table(lines, &options).unwrap();
        assert_eq!(table.sample_ids, ["A", "C"]);
        assert_eq!(table.observation_ids, ["o1", "o3"]);
        assert_eq!(table.data, DenseMatrix::Int(vec![vec![1, 3], vec![7, 9]]));
        assert_eq!(table.metadata, ["t1", "t3"]);
    }

    #[rstest::rstest]
    fn test_crlf_lines() {
        let lines = ["#OTU ID\tA\r\n", "o1\t2.5\r\n"];
        let table = parse_classic_table(lines, &ClassicTableOptions::default()).unwrap();
        assert_eq!(table.data, DenseMatrix::Float(vec![vec![2.5]]));
    }

    #[rstest::rstest]
    fn test_typed_metadata() {
        let lines = ["#OTU ID\tA\ttaxonomy", "o1\t1\tk__Bacteria; p__Firmicutes"];
        let table = parse_classic_table(lines, &int_options()).unwrap();
        assert_eq!(
            table.typed_metadata(ObservationMetadataType::Taxonomy),
            [ObservationMetadata::List(vec![
                "k__Bacteria".to_string(),
                "p__Firmicutes".to_string()
            ])]
        );
    }
}
