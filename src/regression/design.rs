use nalgebra::{DMatrix, DVector};

use crate::data::model::{Column, Table};
use crate::error::{ConfigError, DimensionError, PipelineError, Result};

/// Feature matrix, response vector and the feature names labelling the
/// matrix columns.  Shapes are checked once, at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Design {
    names: Vec<String>,
    x: DMatrix<f64>,
    y: DVector<f64>,
}

impl Design {
    pub fn new(names: Vec<String>, x: DMatrix<f64>, y: DVector<f64>) -> Result<Self> {
        if names.is_empty() {
            return Err(DimensionError::NoFeatures.into());
        }
        if x.ncols() != names.len() {
            return Err(DimensionError::FeatureCount {
                columns: x.ncols(),
                names: names.len(),
            }
            .into());
        }
        if x.nrows() != y.len() {
            return Err(DimensionError::RowMismatch {
                rows: x.nrows(),
                response: y.len(),
            }
            .into());
        }
        if x.nrows() == 0 {
            return Err(DimensionError::NoRows.into());
        }
        Ok(Design { names, x, y })
    }

    /// Stack the named table columns, in the given order, into X and take
    /// `target` as y.
    pub fn from_table(table: &Table, features: &[String], target: &str) -> Result<Self> {
        if features.is_empty() {
            return Err(DimensionError::NoFeatures.into());
        }
        let n = table.n_rows();
        if n == 0 {
            return Err(DimensionError::NoRows.into());
        }

        let columns = features
            .iter()
            .map(|name| numeric(table, name))
            .collect::<Result<Vec<_>>>()?;
        let x = DMatrix::from_fn(n, columns.len(), |i, j| columns[j][i]);
        let y = DVector::from_vec(numeric(table, target)?);

        log::info!(
            "Design matrix: {} rows x {} features, target '{target}'",
            x.nrows(),
            x.ncols()
        );
        Design::new(features.to_vec(), x, y)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn x(&self) -> &DMatrix<f64> {
        &self.x
    }

    pub fn y(&self) -> &DVector<f64> {
        &self.y
    }

    pub fn n_rows(&self) -> usize {
        self.x.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }
}

fn numeric(table: &Table, name: &str) -> Result<Vec<f64>> {
    let column: &Column = table.column(name)?;
    column.as_f64().ok_or_else(|| {
        PipelineError::from(ConfigError::NonNumeric {
            column: name.to_string(),
            kind: column.kind(),
        })
    })
}
