//! The host's table contract: a column schema plus positionally-indexed rows.
//!
//! View widgets receive their input data as a serialized table: a spec
//! listing column names and a sequence of rows whose cells line up with that
//! spec. Builders resolve the column names they need to positional indices
//! once, then read rows positionally.
//!
//! Derived count columns follow the host's naming convention: for an event
//! column `evt`, the event and censor counts live in `#True(evt)` and
//! `#False(evt)` respectively ([`event_true_column`], [`event_false_column`]).
//!
//! # Examples
//!
//! ```
//! use statview_table::{Cell, DataTable, Row, TableSpec};
//!
//! let table = DataTable {
//!     spec: TableSpec::new(["Time", "#True(Death)", "#False(Death)"]),
//!     rows: vec![Row::new([
//!         Cell::Number(3.0),
//!         Cell::Number(1.0),
//!         Cell::Number(0.0),
//!     ])],
//! };
//! let time_idx = table.spec.find_column("Time")?;
//! assert_eq!(table.rows[0].data[time_idx], Cell::Number(3.0));
//! # Ok::<(), statview_table::MissingColumnError>(())
//! ```

use serde::{Deserialize, Serialize};

/// A single table cell.
///
/// Cells serialize untagged, so the JSON shape is the host's native one:
/// numbers, strings, booleans, and `null` for missing values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Bool(bool),
    Number(f64),
    Text(String),
    /// A missing value, serialized as `null`.
    Missing,
}

impl Cell {
    /// Returns the numeric value, or `None` for non-numeric cells.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Bool(_) | Self::Text(_) | Self::Missing => None,
        }
    }

    /// Returns the text value, or `None` for non-text cells.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            Self::Bool(_) | Self::Number(_) | Self::Missing => None,
        }
    }

    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

/// A required column name is absent from the table spec.
///
/// Callers must refuse to build chart data for the malformed table rather
/// than silently defaulting.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("column '{name}' not found in table spec")]
pub struct MissingColumnError {
    pub name: String,
}

/// Column schema of a table: the ordered list of column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSpec {
    pub col_names: Vec<String>,
}

impl TableSpec {
    #[must_use]
    pub fn new<I, S>(col_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            col_names: col_names.into_iter().map(Into::into).collect(),
        }
    }

    /// Resolves a column name to its positional index.
    pub fn find_column(&self, name: &str) -> Result<usize, MissingColumnError> {
        self.column_index(name).ok_or_else(|| MissingColumnError {
            name: name.to_owned(),
        })
    }

    /// Like [`find_column`](Self::find_column), but absence is not an error.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.col_names.iter().position(|col| col == name)
    }

    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.col_names.len()
    }
}

/// One table row: positional cells aligned to the table spec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    /// Host-assigned row identifier, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_key: Option<String>,
    pub data: Vec<Cell>,
}

impl Row {
    #[must_use]
    pub fn new<I>(data: I) -> Self
    where
        I: IntoIterator<Item = Cell>,
    {
        Self {
            row_key: None,
            data: data.into_iter().collect(),
        }
    }

    /// Returns the cell at `index`, treating out-of-range reads as missing.
    ///
    /// Ragged rows show up in hand-written test fixtures; treating the
    /// absent tail as missing keeps positional reads total.
    #[must_use]
    pub fn cell(&self, index: usize) -> &Cell {
        static MISSING: Cell = Cell::Missing;
        self.data.get(index).unwrap_or(&MISSING)
    }
}

/// A table: spec plus rows. Row order is meaningful and preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataTable {
    pub spec: TableSpec,
    pub rows: Vec<Row>,
}

/// Derived column holding per-time event counts for `event_col`.
#[must_use]
pub fn event_true_column(event_col: &str) -> String {
    format!("#True({event_col})")
}

/// Derived column holding per-time censor counts for `event_col`.
#[must_use]
pub fn event_false_column(event_col: &str) -> String {
    format!("#False({event_col})")
}
