use std::collections::HashMap;

use serde::Deserialize;

use super::axis::Axis;
use super::key::field_value;
use crate::{Error, Result};

#[derive(Debug, Deserialize)]
struct AxisEntry {
    id: String,
}

/// Reads the ids of one axis from the `rows` or `columns` field.
///
/// Only that field is decoded; the rest of the document, including `data`,
/// is never deserialized.
pub fn direct_parse_ids(doc: &str, axis: Axis) -> Result<Vec<String>> {
    let field = axis.ids_field();
    let raw = field_value(doc, field)?.ok_or_else(|| Error::missing_field(field))?;
    let entries: Vec<AxisEntry> = serde_json::from_str(raw)
        .map_err(|err| Error::malformed(format!("invalid \"{field}\" field: {err}")))?;
    Ok(entries.into_iter().map(|entry| entry.id).collect())
}

/// Turns wanted ids into a keep list of positions within `ids`, in the
/// order they are wanted.
pub fn keep_indices<S: AsRef<str>>(ids: &[String], wanted: &[S]) -> Result<Vec<usize>> {
    let positions: HashMap<&str, usize> = ids
        .iter()
        .enumerate()
        .map(|(idx, id)| (id.as_str(), idx))
        .collect();
    wanted
        .iter()
        .map(|id| {
            let id = id.as_ref();
            positions
                .get(id)
                .copied()
                .ok_or_else(|| Error::out_of_range(format!("unknown id {id:?}")))
        })
        .collect()
}
