use std::fmt;

use serde::Serialize;

use crate::error::DataError;

// ---------------------------------------------------------------------------
// Cell – a single value in a survey column
// ---------------------------------------------------------------------------

/// A dynamically-typed survey answer.
/// Used as a `BTreeMap` / `BTreeSet` key downstream so `Cell` must be `Ord`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Number(f64),
    /// Missing-value sentinel, blank field or null.
    Absent,
}

// -- Manual Eq/Ord so we can put Cell in BTreeSet --

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}

impl Eq for Cell {}

impl PartialOrd for Cell {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cell {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        fn discriminant(v: &Cell) -> u8 {
            match v {
                Cell::Absent => 0,
                Cell::Number(_) => 1,
                Cell::Text(_) => 2,
            }
        }
        match (self, other) {
            (Cell::Number(a), Cell::Number(b)) => a.total_cmp(b),
            (Cell::Text(a), Cell::Text(b)) => a.cmp(b),
            _ => discriminant(self).cmp(&discriminant(other)),
        }
    }
}

impl std::hash::Hash for Cell {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Cell::Text(s) => s.hash(state),
            Cell::Number(f) => f.to_bits().hash(state),
            Cell::Absent => {}
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Number(v) if v.fract() == 0.0 && v.abs() < 1e15 => write!(f, "{v:.0}"),
            Cell::Number(v) => write!(f, "{v}"),
            Cell::Absent => write!(f, "<absent>"),
        }
    }
}

impl Cell {
    pub fn is_absent(&self) -> bool {
        matches!(self, Cell::Absent)
    }
}

// ---------------------------------------------------------------------------
// Column – one named variable of the survey
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub cells: Vec<Cell>,
}

impl Column {
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        Column {
            name: name.into(),
            cells,
        }
    }
}

// ---------------------------------------------------------------------------
// SurveyTable – the complete cleaned dataset
// ---------------------------------------------------------------------------

/// Column-oriented survey table. Built once at startup and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyTable {
    columns: Vec<Column>,
    rows: usize,
}

impl SurveyTable {
    /// Assemble a table, rejecting columns of differing lengths.
    pub fn new(columns: Vec<Column>) -> Result<Self, DataError> {
        let rows = columns.first().map_or(0, |c| c.cells.len());
        if let Some(bad) = columns.iter().find(|c| c.cells.len() != rows) {
            return Err(DataError::RaggedColumn {
                column: bad.name.clone(),
                expected: rows,
                found: bad.cells.len(),
            });
        }
        Ok(SurveyTable { columns, rows })
    }

    /// Number of respondents.
    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Result<&Column, DataError> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| DataError::MissingColumn(name.to_string()))
    }

    /// The column as floats, `None` for absent cells.
    ///
    /// Fails on the first text cell, naming its row.
    pub fn numeric(&self, name: &str) -> Result<Vec<Option<f64>>, DataError> {
        let column = self.column(name)?;
        column
            .cells
            .iter()
            .enumerate()
            .map(|(row, cell)| match cell {
                Cell::Number(v) => Ok(Some(*v)),
                Cell::Absent => Ok(None),
                Cell::Text(s) => Err(DataError::NotNumeric {
                    column: name.to_string(),
                    row,
                    value: s.clone(),
                }),
            })
            .collect()
    }
}
