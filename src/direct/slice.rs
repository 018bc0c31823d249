use log::debug;
use smallvec::SmallVec;

use super::axis::{Axis, Shape};
use super::cursor::Cursor;
use super::entry::SparseEntry;
use super::key::field_value;
use crate::{Error, Result};

type RowValues<'a> = SmallVec<[&'a str; 16]>;

/// Lookup from an original axis index to its position in a keep list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRemap {
    slots: Vec<Option<usize>>,
    kept: usize,
}

impl IndexRemap {
    /// Builds the lookup for an axis of `dimension` entries. New indices
    /// follow the order of `keep`, not numeric order.
    ///
    /// Every keep value is range-checked before the table is touched; a
    /// value listed twice is rejected. A dimension too large to allocate a
    /// table for is `Malformed`.
    pub fn new(dimension: usize, keep: &[usize]) -> Result<Self> {
        if let Some(&bad) = keep.iter().find(|&&index| index >= dimension) {
            return Err(Error::out_of_range(format!(
                "keep index {bad} is out of range for an axis of {dimension}"
            )));
        }
        let mut slots = Vec::new();
        slots.try_reserve_exact(dimension).map_err(|_| {
            Error::malformed(format!("axis dimension {dimension} is too large to index"))
        })?;
        slots.resize(dimension, None);
        for (position, &index) in keep.iter().enumerate() {
            if slots[index].replace(position).is_some() {
                return Err(Error::invalid_keep_list(format!(
                    "keep index {index} is listed more than once"
                )));
            }
        }
        Ok(Self {
            slots,
            kept: keep.len(),
        })
    }

    pub fn dimension(&self) -> usize {
        self.slots.len()
    }

    pub fn kept(&self) -> usize {
        self.kept
    }

    /// New index for `original`, `None` if it is excluded. An `original`
    /// outside the axis means the data disagrees with the declared shape.
    pub fn lookup(&self, original: usize) -> Result<Option<usize>> {
        self.slots.get(original).copied().ok_or_else(|| {
            Error::malformed(format!(
                "entry index {original} exceeds the declared dimension {}",
                self.dimension()
            ))
        })
    }
}

/// Layout of the `data` field, named by `matrix_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatrixType {
    #[default]
    Sparse,
    Dense,
}

impl MatrixType {
    /// Reads `matrix_type` from the document; documents without one are
    /// sparse.
    pub fn detect(doc: &str) -> Result<Self> {
        let Some(raw) = field_value(doc, "matrix_type")? else {
            return Ok(MatrixType::Sparse);
        };
        let name: String = serde_json::from_str(raw)
            .map_err(|err| Error::malformed(format!("invalid matrix_type {raw}: {err}")))?;
        match name.as_str() {
            "sparse" => Ok(MatrixType::Sparse),
            "dense" => Ok(MatrixType::Dense),
            other => Err(Error::malformed(format!("unknown matrix_type {other:?}"))),
        }
    }
}

/// Restricts a document's matrix to the `keep` indices along `axis`.
///
/// Returns the replacement text for the `data` and `shape` fields,
/// formatted as `"data": [[r,c,v],...], "shape": [d0, d1]`. The kept axis is
/// renumbered `0..keep.len()` in keep-list order and the relative order of
/// the retained entries is unchanged.
///
/// ```
/// use biom_parse::{direct_slice_data, Axis};
///
/// let doc = r#"{"shape": [2, 3], "data": [[0,0,1],[0,2,4],[1,1,7]]}"#;
/// let sliced = direct_slice_data(doc, &[2, 0], Axis::Samples).unwrap();
/// assert_eq!(sliced, r#""data": [[0,1,1],[0,0,4]], "shape": [2, 2]"#);
/// ```
pub fn direct_slice_data(doc: &str, keep: &[usize], axis: Axis) -> Result<String> {
    let raw_shape = field_value(doc, "shape")?.ok_or_else(|| Error::missing_field("shape"))?;
    let shape = Shape::parse(raw_shape)?;
    let remap = IndexRemap::new(axis.dimension(shape), keep)?;
    let matrix_type = MatrixType::detect(doc)?;
    let data = field_value(doc, "data")?.ok_or_else(|| Error::missing_field("data"))?;

    let mut out = String::with_capacity(data.len() + 32);
    out.push_str("\"data\": ");
    let entries = match matrix_type {
        MatrixType::Sparse => slice_sparse(data, axis, &remap, &mut out)?,
        MatrixType::Dense => slice_dense(data, axis, shape, keep, &mut out)?,
    };
    out.push_str(", \"shape\": ");
    shape.with_dimension(axis, remap.kept()).write_into(&mut out);

    debug!(
        "sliced {matrix_type:?} data along {axis}: kept {} of {} indices, {entries} entries written",
        remap.kept(),
        remap.dimension()
    );
    Ok(out)
}

/// Filters and renumbers a sparse `[[r,c,v], ...]` array into `out`,
/// returning the number of triples written.
pub(crate) fn slice_sparse(
    data: &str,
    axis: Axis,
    remap: &IndexRemap,
    out: &mut String,
) -> Result<usize> {
    let mut cursor = Cursor::new(data);
    let mut index_buf = itoa::Buffer::new();
    let mut written = 0;

    cursor.skip_whitespace();
    cursor.expect(b'[')?;
    out.push('[');
    cursor.skip_whitespace();
    if cursor.eat(b']') {
        out.push(']');
        return Ok(0);
    }
    loop {
        cursor.skip_whitespace();
        cursor.expect(b'[')?;
        let inner_start = cursor.position();
        let inner_end = cursor.seek(b']')?;
        let entry = SparseEntry::parse(cursor.slice(inner_start, inner_end))
            .map_err(|err| err.at_offset(inner_start))?;
        cursor.advance();

        let original = entry
            .coordinate_index(axis)
            .map_err(|err| err.at_offset(inner_start))?;
        if let Some(new_index) = remap
            .lookup(original)
            .map_err(|err| err.at_offset(inner_start))?
        {
            if written > 0 {
                out.push(',');
            }
            out.push('[');
            entry.write_remapped(out, axis, index_buf.format(new_index));
            out.push(']');
            written += 1;
        }

        cursor.skip_whitespace();
        match cursor.advance() {
            Some(b',') => continue,
            Some(b']') => break,
            _ => {
                return Err(Error::malformed("expected ',' or ']' between entries")
                    .at_offset(cursor.position()))
            }
        }
    }
    out.push(']');
    Ok(written)
}

/// Selects rows or columns of a dense `[[v, ...], ...]` array in keep-list
/// order, returning the number of rows written.
pub(crate) fn slice_dense(
    data: &str,
    axis: Axis,
    shape: Shape,
    keep: &[usize],
    out: &mut String,
) -> Result<usize> {
    let rows = parse_dense_rows(data)?;
    if rows.len() != shape.observations {
        return Err(Error::malformed(format!(
            "dense data has {} rows, shape declares {}",
            rows.len(),
            shape.observations
        )));
    }
    if let Some((idx, row)) = rows
        .iter()
        .enumerate()
        .find(|(_, row)| row.len() != shape.samples)
    {
        return Err(Error::malformed(format!(
            "dense row {idx} has {} values, shape declares {}",
            row.len(),
            shape.samples
        )));
    }

    out.push('[');
    let written = match axis {
        Axis::Observations => {
            for (position, &index) in keep.iter().enumerate() {
                if position > 0 {
                    out.push(',');
                }
                write_dense_row(out, rows[index].iter().copied());
            }
            keep.len()
        }
        Axis::Samples => {
            for (position, row) in rows.iter().enumerate() {
                if position > 0 {
                    out.push(',');
                }
                write_dense_row(out, keep.iter().map(|&index| row[index]));
            }
            rows.len()
        }
    };
    out.push(']');
    Ok(written)
}

fn parse_dense_rows(data: &str) -> Result<Vec<RowValues<'_>>> {
    let mut cursor = Cursor::new(data);
    let mut rows = Vec::new();

    cursor.skip_whitespace();
    cursor.expect(b'[')?;
    cursor.skip_whitespace();
    if cursor.eat(b']') {
        return Ok(rows);
    }
    loop {
        cursor.skip_whitespace();
        cursor.expect(b'[')?;
        let inner_start = cursor.position();
        let inner_end = cursor.seek(b']')?;
        let inner = cursor.slice(inner_start, inner_end);
        cursor.advance();

        let mut values = RowValues::new();
        if !inner.trim().is_empty() {
            for value in inner.split(',').map(str::trim) {
                if value.is_empty() {
                    return Err(Error::malformed("empty value in dense row").at_offset(inner_start));
                }
                values.push(value);
            }
        }
        rows.push(values);

        cursor.skip_whitespace();
        match cursor.advance() {
            Some(b',') => continue,
            Some(b']') => break,
            _ => {
                return Err(Error::malformed("expected ',' or ']' between rows")
                    .at_offset(cursor.position()))
            }
        }
    }
    Ok(rows)
}

fn write_dense_row<'a>(out: &mut String, values: impl Iterator<Item = &'a str>) {
    out.push('[');
    for (position, value) in values.enumerate() {
        if position > 0 {
            out.push(',');
        }
        out.push_str(value);
    }
    out.push(']');
}
