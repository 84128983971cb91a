/// Core data structures for report datasets
///
/// This module defines the tabular dataset that flows from the database
/// query through enrichment to the spreadsheet publisher: an ordered
/// column schema shared by every row, with cells that are text, numeric,
/// or null.

use std::collections::HashMap;

/// A single cell value in a report dataset
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Null,
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Cell {
        Cell::Text(s.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Text content, if this is a text cell
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Numeric value, if this is a number cell
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Render for a spreadsheet body write. Null becomes an empty string
    /// so the backend leaves the cell blank instead of printing a marker.
    pub fn to_cell_string(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => format!("{}", n),
            Cell::Null => String::new(),
        }
    }

    /// Wrap an optional number, mapping None to Null
    pub fn from_option(value: Option<f64>) -> Cell {
        match value {
            Some(n) => Cell::Number(n),
            None => Cell::Null,
        }
    }
}

/// An ordered tabular dataset: one column schema, many rows
///
/// Columns keep insertion order (the order the query returned them, then
/// the order enrichment appended them), which is also the order the
/// publisher writes them in.
#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<Cell>>,
}

impl Dataset {
    pub fn with_columns(columns: Vec<String>) -> Dataset {
        let index = columns.iter().enumerate().map(|(i, c)| (c.clone(), i)).collect();
        Dataset { columns, index, rows: Vec::new() }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Append a row; the row must match the current schema width
    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<(), String> {
        if row.len() != self.columns.len() {
            return Err(format!(
                "Row has {} cells but the dataset has {} columns",
                row.len(),
                self.columns.len()
            ));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Append a column with one value per existing row
    pub fn add_column(&mut self, name: &str, values: Vec<Cell>) -> Result<(), String> {
        if values.len() != self.rows.len() {
            return Err(format!(
                "Column '{}' has {} values but the dataset has {} rows",
                name,
                values.len(),
                self.rows.len()
            ));
        }
        if self.index.contains_key(name) {
            return Err(format!("Column '{}' already exists", name));
        }
        self.index.insert(name.to_string(), self.columns.len());
        self.columns.push(name.to_string());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
        Ok(())
    }

    /// Cell at (row, column name), if both exist
    pub fn value(&self, row: usize, column: &str) -> Option<&Cell> {
        let idx = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(idx))
    }

    /// All rows rendered to strings, in schema order (for the body write)
    pub fn rows_as_strings(&self) -> Vec<Vec<String>> {
        self.rows.iter().map(|row| row.iter().map(|c| c.to_cell_string()).collect()).collect()
    }
}
