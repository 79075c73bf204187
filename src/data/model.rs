use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;

use crate::error::{ConfigError, DimensionError, Result};

// ---------------------------------------------------------------------------
// Column – one typed sequence of values
// ---------------------------------------------------------------------------

/// A single column of the table.  Every variant holds one entry per row.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// Text exactly as read from the file.
    Raw(Vec<String>),
    Float(Vec<f64>),
    Integer(Vec<i64>),
    Date(Vec<NaiveDate>),
    /// 0/1 categorical indicator.
    Indicator(Vec<u8>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Raw(v) => v.len(),
            Column::Float(v) => v.len(),
            Column::Integer(v) => v.len(),
            Column::Date(v) => v.len(),
            Column::Indicator(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short type name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Column::Raw(_) => "text",
            Column::Float(_) => "float",
            Column::Integer(_) => "integer",
            Column::Date(_) => "date",
            Column::Indicator(_) => "indicator",
        }
    }

    /// Numeric view for columns that may enter the design matrix.
    pub fn as_f64(&self) -> Option<Vec<f64>> {
        match self {
            Column::Float(v) => Some(v.clone()),
            Column::Integer(v) => Some(v.iter().map(|&i| i as f64).collect()),
            Column::Indicator(v) => Some(v.iter().map(|&b| f64::from(b)).collect()),
            Column::Raw(_) | Column::Date(_) => None,
        }
    }

    /// Render the entry at `row` as text (for value counts and diagnostics).
    pub fn display_at(&self, row: usize) -> Option<String> {
        match self {
            Column::Raw(v) => v.get(row).cloned(),
            Column::Float(v) => v.get(row).map(|x| x.to_string()),
            Column::Integer(v) => v.get(row).map(|x| x.to_string()),
            Column::Date(v) => v.get(row).map(|d| d.format("%Y-%m-%d").to_string()),
            Column::Indicator(v) => v.get(row).map(|x| x.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Table – ordered, equal-length named columns
// ---------------------------------------------------------------------------

/// Column-oriented table.  Column order is insertion order and every column
/// has exactly `n_rows` entries.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    n_rows: usize,
    names: Vec<String>,
    columns: Vec<Column>,
}

impl Table {
    /// An empty table that will hold `n_rows` rows.
    pub fn with_rows(n_rows: usize) -> Self {
        Table {
            n_rows,
            names: Vec::new(),
            columns: Vec::new(),
        }
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Column names in table order.
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn get(&self, name: &str) -> Option<&Column> {
        self.position(name).map(|i| &self.columns[i])
    }

    /// Like [`Table::get`] but a missing column is a configuration error.
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.get(name)
            .ok_or_else(|| ConfigError::MissingColumn(name.to_string()).into())
    }

    /// Append a new column at the end.
    pub fn push(&mut self, name: impl Into<String>, column: Column) -> Result<()> {
        let name = name.into();
        if self.contains(&name) {
            return Err(ConfigError::ColumnExists(name).into());
        }
        self.check_len(&name, &column)?;
        self.names.push(name);
        self.columns.push(column);
        Ok(())
    }

    /// Replace an existing column in place, keeping its position.
    pub fn replace(&mut self, name: &str, column: Column) -> Result<()> {
        let idx = self
            .position(name)
            .ok_or_else(|| ConfigError::MissingColumn(name.to_string()))?;
        self.check_len(name, &column)?;
        self.columns[idx] = column;
        Ok(())
    }

    fn check_len(&self, name: &str, column: &Column) -> Result<()> {
        if column.len() != self.n_rows {
            return Err(DimensionError::ColumnLength {
                column: name.to_string(),
                expected: self.n_rows,
                found: column.len(),
            }
            .into());
        }
        Ok(())
    }

    /// Iterate `(name, column)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.names.iter().map(String::as_str).zip(self.columns.iter())
    }

    /// Distinct values of a column with their row counts, sorted by value text.
    pub fn value_counts(&self, name: &str) -> Result<BTreeMap<String, usize>> {
        let column = self.column(name)?;
        let mut counts = BTreeMap::new();
        for row in 0..column.len() {
            if let Some(value) = column.display_at(row) {
                *counts.entry(value).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} rows x {} columns", self.n_rows, self.columns.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;

    fn raw(values: &[&str]) -> Column {
        Column::Raw(values.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn push_keeps_insertion_order() {
        let mut table = Table::with_rows(2);
        table.push("b", raw(&["1", "2"])).unwrap();
        table.push("a", Column::Float(vec![1.0, 2.0])).unwrap();
        assert_eq!(table.column_names(), ["b", "a"]);
        assert_eq!(table.n_columns(), 2);
    }

    #[test]
    fn push_rejects_wrong_length() {
        let mut table = Table::with_rows(3);
        let err = table.push("x", Column::Float(vec![1.0])).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Dimension(DimensionError::ColumnLength { expected: 3, found: 1, .. })
        ));
    }

    #[test]
    fn push_rejects_duplicate_name() {
        let mut table = Table::with_rows(1);
        table.push("x", raw(&["a"])).unwrap();
        let err = table.push("x", raw(&["b"])).unwrap_err();
        assert!(matches!(err, PipelineError::Config(ConfigError::ColumnExists(_))));
    }

    #[test]
    fn replace_keeps_position() {
        let mut table = Table::with_rows(1);
        table.push("a", raw(&["1"])).unwrap();
        table.push("b", raw(&["2"])).unwrap();
        table.replace("a", Column::Integer(vec![1])).unwrap();
        assert_eq!(table.column_names(), ["a", "b"]);
        assert_eq!(table.get("a"), Some(&Column::Integer(vec![1])));
    }

    #[test]
    fn numeric_view() {
        assert_eq!(Column::Indicator(vec![0, 1]).as_f64(), Some(vec![0.0, 1.0]));
        assert_eq!(Column::Integer(vec![2015]).as_f64(), Some(vec![2015.0]));
        assert_eq!(raw(&["x"]).as_f64(), None);
    }

    #[test]
    fn value_counts_are_sorted() {
        let mut table = Table::with_rows(4);
        table.push("type", raw(&["organic", "conventional", "organic", "organic"])).unwrap();
        let counts = table.value_counts("type").unwrap();
        let pairs: Vec<_> = counts.into_iter().collect();
        assert_eq!(
            pairs,
            vec![("conventional".to_string(), 1), ("organic".to_string(), 3)]
        );
    }
}
