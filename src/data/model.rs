use std::collections::HashMap;
use std::fmt;

use super::error::DataError;

// ---------------------------------------------------------------------------
// ColumnData – the values of a single column
// ---------------------------------------------------------------------------

/// Values of one column. The type is inferred once per column at load time.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<f64>),
    Text(Vec<String>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_numeric(&self) -> Option<&[f64]> {
        match self {
            ColumnData::Numeric(v) => Some(v),
            ColumnData::Text(_) => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnData::Numeric(_))
    }

    /// The cell at `row`, or `None` if out of range.
    pub fn cell(&self, row: usize) -> Option<CellValue<'_>> {
        match self {
            ColumnData::Numeric(v) => v.get(row).copied().map(CellValue::Number),
            ColumnData::Text(v) => v.get(row).map(|s| CellValue::Text(s)),
        }
    }
}

/// A borrowed view on one cell, used for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellValue<'a> {
    Number(f64),
    Text(&'a str),
}

impl fmt::Display for CellValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(v) => write!(f, "{v:.4}"),
            CellValue::Text(s) => write!(f, "{s}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// An immutable, rectangular table. Row order is load order and encodes the
/// sample sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
    index: HashMap<String, usize>,
    rows: usize,
}

impl Dataset {
    /// Build a dataset from columns of equal length.
    ///
    /// Returns `None` if the columns disagree on their length or a name is
    /// repeated; the loader checks both before calling this.
    pub fn from_columns(columns: Vec<Column>) -> Option<Self> {
        let rows = columns.first().map_or(0, |c| c.data.len());
        if columns.iter().any(|c| c.data.len() != rows) {
            return None;
        }
        let mut index = HashMap::with_capacity(columns.len());
        for (i, col) in columns.iter().enumerate() {
            if index.insert(col.name.clone(), i).is_some() {
                return None;
            }
        }
        Some(Dataset {
            columns,
            index,
            rows,
        })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in file order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn column(&self, name: &str) -> Result<&Column, DataError> {
        self.index
            .get(name)
            .map(|&i| &self.columns[i])
            .ok_or_else(|| DataError::MissingColumn(name.to_string()))
    }

    /// Values of a numeric column, failing on absent or text columns.
    pub fn numeric(&self, name: &str) -> Result<&[f64], DataError> {
        self.column(name)?
            .data
            .as_numeric()
            .ok_or_else(|| DataError::NonNumericColumn(name.to_string()))
    }

    pub fn row_value(&self, name: &str, row: usize) -> Option<CellValue<'_>> {
        self.column(name).ok()?.data.cell(row)
    }
}
