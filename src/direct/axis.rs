use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Rows of the matrix.
    Observations,
    /// Columns of the matrix.
    Samples,
}

impl Axis {
    pub fn index(self) -> usize {
        match self {
            Axis::Observations => 0,
            Axis::Samples => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Axis::Observations => "observations",
            Axis::Samples => "samples",
        }
    }

    pub fn dimension(self, shape: Shape) -> usize {
        match self {
            Axis::Observations => shape.observations,
            Axis::Samples => shape.samples,
        }
    }

    /// Name of the top-level field listing this axis' ids.
    pub(crate) fn ids_field(self) -> &'static str {
        match self {
            Axis::Observations => "rows",
            Axis::Samples => "columns",
        }
    }
}

impl FromStr for Axis {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "observations" => Ok(Axis::Observations),
            "samples" => Ok(Axis::Samples),
            other => Err(Error::unknown_axis(other)),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared `[n_observations, n_samples]` of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    pub observations: usize,
    pub samples: usize,
}

impl Shape {
    pub fn new(observations: usize, samples: usize) -> Self {
        Self {
            observations,
            samples,
        }
    }

    /// Parses the raw value of a `shape` field, e.g. `[5, 6]`.
    pub fn parse(raw: &str) -> Result<Self> {
        let [observations, samples]: [usize; 2] = serde_json::from_str(raw)
            .map_err(|err| Error::malformed(format!("invalid shape {raw}: {err}")))?;
        Ok(Self::new(observations, samples))
    }

    pub fn with_dimension(self, axis: Axis, dimension: usize) -> Self {
        match axis {
            Axis::Observations => Self::new(dimension, self.samples),
            Axis::Samples => Self::new(self.observations, dimension),
        }
    }

    pub(crate) fn write_into(self, out: &mut String) {
        let mut buf = itoa::Buffer::new();
        out.push('[');
        out.push_str(buf.format(self.observations));
        out.push_str(", ");
        out.push_str(buf.format(self.samples));
        out.push(']');
    }
}

/// Resolves an axis token to its position in `shape` and its dimension.
pub fn axis_indices(token: &str, shape: Shape) -> Result<(usize, usize)> {
    let axis: Axis = token.parse()?;
    Ok((axis.index(), axis.dimension(shape)))
}
