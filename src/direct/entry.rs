use std::collections::HashMap;

use super::axis::Axis;
use crate::{Error, Result};

/// One `row,col,value` triple of a sparse `data` array, borrowed from the
/// document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SparseEntry<'a> {
    pub row: &'a str,
    pub col: &'a str,
    pub value: &'a str,
}

impl<'a> SparseEntry<'a> {
    /// Parses the text between the brackets of a triple. Whitespace around
    /// each field is dropped; the fields are otherwise kept verbatim.
    pub fn parse(text: &'a str) -> Result<Self> {
        let mut fields = text.split(',').map(str::trim);
        match (fields.next(), fields.next(), fields.next(), fields.next()) {
            (Some(row), Some(col), Some(value), None)
                if !row.is_empty() && !col.is_empty() && !value.is_empty() =>
            {
                Ok(Self { row, col, value })
            }
            _ => Err(Error::malformed(format!(
                "expected a [row,col,value] triple, found [{}]",
                text.trim()
            ))),
        }
    }

    pub fn coordinate(&self, axis: Axis) -> &'a str {
        match axis {
            Axis::Observations => self.row,
            Axis::Samples => self.col,
        }
    }

    pub fn coordinate_index(&self, axis: Axis) -> Result<usize> {
        let text = self.coordinate(axis);
        text.parse().map_err(|_| {
            Error::malformed(format!("invalid {} index {text:?}", axis.as_str()))
        })
    }

    /// Writes `row,col,value` with the `axis` coordinate replaced.
    pub(crate) fn write_remapped(&self, out: &mut String, axis: Axis, coordinate: &str) {
        let (row, col) = match axis {
            Axis::Observations => (coordinate, self.col),
            Axis::Samples => (self.row, coordinate),
        };
        out.push_str(row);
        out.push(',');
        out.push_str(col);
        out.push(',');
        out.push_str(self.value);
    }
}

/// Rewrites the `axis` coordinate of one `"r,c,v"` triple through a
/// string-keyed old to new index lookup.
///
/// The other coordinate and the value are copied without interpretation.
///
/// This is a standalone helper for callers holding single triples.
/// [`direct_slice_data`](crate::direct_slice_data) does not go through it:
/// the slicer renumbers with an [`IndexRemap`](crate::IndexRemap) table and
/// shares only the triple rewrite itself, so both produce the same output
/// for the same keep list.
pub fn remap_sparse_entry(
    entry: &str,
    axis: Axis,
    lookup: &HashMap<String, String>,
) -> Result<String> {
    let parsed = SparseEntry::parse(entry)?;
    let original = parsed.coordinate(axis);
    let replacement = lookup.get(original).ok_or_else(|| {
        Error::out_of_range(format!(
            "{} index {original} has no new index",
            axis.as_str()
        ))
    })?;
    let mut out = String::with_capacity(entry.len() + replacement.len());
    parsed.write_remapped(&mut out, axis, replacement);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn lookup() -> HashMap<String, String> {
        HashMap::from([
            ("5".to_string(), "3".to_string()),
            ("10".to_string(), "0".to_string()),
        ])
    }

    #[rstest::rstest]
    #[case("5,2,3", "3,2,3")]
    #[case("10,5,10", "0,5,10")]
    #[case("5,4,6", "3,4,6")]
    fn test_remap_observations(#[case] entry: &str, #[case] expected: &str) {
        assert_eq!(
            remap_sparse_entry(entry, Axis::Observations, &lookup()).unwrap(),
            expected
        );
    }

    #[rstest::rstest]
    #[case("5,5,3", "5,3,3")]
    #[case("10,10,10", "10,0,10")]
    #[case("doesn't matter,10,6", "doesn't matter,0,6")]
    fn test_remap_samples(#[case] entry: &str, #[case] expected: &str) {
        assert_eq!(
            remap_sparse_entry(entry, Axis::Samples, &lookup()).unwrap(),
            expected
        );
    }

    #[rstest::rstest]
    fn test_remap_missing_index() {
        let err = remap_sparse_entry("7,1,1", Axis::Observations, &lookup()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::OutOfRange);
    }

    #[rstest::rstest]
    #[case("1,2")]
    #[case("1,2,3,4")]
    #[case("1,,3")]
    fn test_parse_rejects_non_triples(#[case] text: &str) {
        assert_eq!(SparseEntry::parse(text).unwrap_err().kind, ErrorKind::Malformed);
    }

    #[rstest::rstest]
    fn test_parse_trims_fields() {
        let entry = SparseEntry::parse(" 1 ,\n 2, 0.5 ").unwrap();
        assert_eq!((entry.row, entry.col, entry.value), ("1", "2", "0.5"));
        assert_eq!(entry.coordinate_index(Axis::Samples).unwrap(), 2);
        assert!(SparseEntry::parse("a,2,3")
            .unwrap()
            .coordinate_index(Axis::Observations)
            .is_err());
    }
}
