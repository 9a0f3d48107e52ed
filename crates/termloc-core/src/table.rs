//! Core table types for term registries and Crowdin files

use crate::error::{Error, Result};
use std::path::PathBuf;

/// A parsed table from a single CSV file
#[derive(Debug, Clone)]
pub struct Table {
    /// Column definitions
    pub columns: Vec<Column>,
    /// Row data
    pub rows: Vec<Row>,
    /// Source file path
    pub source_path: PathBuf,
}

impl Table {
    /// Create a new empty table
    pub fn new(source_path: PathBuf) -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
            source_path,
        }
    }

    /// Get the number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get the number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Find a column by name
    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Index of a column the caller cannot do without
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.find_column(name)
            .map(|c| c.index)
            .ok_or_else(|| Error::MissingColumn {
                path: self.source_path.clone(),
                column: name.to_string(),
            })
    }
}

/// A column definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Column name (e.g., "term_localName")
    pub name: String,
    /// Column index (0-based)
    pub index: usize,
}

impl Column {
    /// Create a new column
    pub fn new(name: String, index: usize) -> Self {
        Self { name, index }
    }
}

/// A row of text cells, padded to the table's column count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub cells: Vec<String>,
}

impl Row {
    /// Create a new row
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }

    /// Get a cell by column index
    pub fn get(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(String::as_str)
    }

    /// Get a cell by column index, treating an absent cell as empty
    pub fn text(&self, index: usize) -> &str {
        self.get(index).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut table = Table::new(PathBuf::from("terms.csv"));
        table.columns = vec![
            Column::new("term_localName".to_string(), 0),
            Column::new("label".to_string(), 1),
        ];
        table.rows = vec![Row::new(vec!["basisOfRecord".to_string(), "Basis Of Record".to_string()])];
        table
    }

    #[test]
    fn test_require_column_found() {
        let table = sample();
        assert_eq!(table.require_column("label").unwrap(), 1);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn test_require_column_missing() {
        let table = sample();
        match table.require_column("term_deprecated") {
            Err(Error::MissingColumn { column, path }) => {
                assert_eq!(column, "term_deprecated");
                assert_eq!(path, PathBuf::from("terms.csv"));
            }
            other => panic!("expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_row_text_out_of_range() {
        let row = Row::new(vec!["a".to_string()]);
        assert_eq!(row.text(0), "a");
        assert_eq!(row.text(5), "");
        assert_eq!(row.get(5), None);
    }
}
