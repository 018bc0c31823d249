use crate::options::ElementType;
use crate::{Error, Result};

/// Dense observation x sample counts, typed by the parse mode.
#[derive(Debug, Clone, PartialEq)]
pub enum DenseMatrix {
    Int(Vec<Vec<i64>>),
    Float(Vec<Vec<f64>>),
}

impl DenseMatrix {
    pub fn new(element_type: ElementType) -> Self {
        match element_type {
            ElementType::Int => DenseMatrix::Int(Vec::new()),
            ElementType::Float => DenseMatrix::Float(Vec::new()),
        }
    }

    pub fn element_type(&self) -> ElementType {
        match self {
            DenseMatrix::Int(_) => ElementType::Int,
            DenseMatrix::Float(_) => ElementType::Float,
        }
    }

    pub fn n_rows(&self) -> usize {
        match self {
            DenseMatrix::Int(rows) => rows.len(),
            DenseMatrix::Float(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows() == 0
    }

    /// Cell value widened to `f64`.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        match self {
            DenseMatrix::Int(rows) => rows.get(row)?.get(col).map(|&value| value as f64),
            DenseMatrix::Float(rows) => rows.get(row)?.get(col).copied(),
        }
    }

    /// Parses `fields` in the matrix' element type and appends them as a row.
    pub(crate) fn push_row<'a>(&mut self, fields: impl Iterator<Item = &'a str>) -> Result<()> {
        match self {
            DenseMatrix::Int(rows) => {
                let row = fields
                    .map(|field| {
                        field.parse::<i64>().map_err(|_| {
                            Error::invalid_number(format!("invalid int count {field:?}"))
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                rows.push(row);
            }
            DenseMatrix::Float(rows) => {
                let row = fields
                    .map(|field| {
                        field.parse::<f64>().map_err(|_| {
                            Error::invalid_number(format!("invalid float count {field:?}"))
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                rows.push(row);
            }
        }
        Ok(())
    }
}

/// Whether `field` parses in `element_type`.
pub(crate) fn is_numeric(field: &str, element_type: ElementType) -> bool {
    match element_type {
        ElementType::Int => field.parse::<i64>().is_ok(),
        ElementType::Float => field.parse::<f64>().is_ok(),
    }
}
