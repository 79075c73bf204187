use std::io::{self, Write};

use serde::{Serialize, Serializer};

use crate::regression::{Design, Fit, SolveDiagnostics};

// ---------------------------------------------------------------------------
// ModelResult – named coefficients
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Coefficient {
    pub feature: String,
    pub value: f64,
}

/// Fitted coefficients paired with their feature names, in design order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelResult {
    pub coefficients: Vec<Coefficient>,
    #[serde(serialize_with = "nan_as_null")]
    pub r_squared: f64,
    pub observations: usize,
    pub diagnostics: SolveDiagnostics,
}

fn nan_as_null<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else {
        serializer.serialize_none()
    }
}

impl ModelResult {
    pub fn from_fit(design: &Design, fit: &Fit) -> Self {
        let coefficients = design
            .names()
            .iter()
            .zip(fit.coefficients.iter())
            .map(|(name, &value)| Coefficient {
                feature: name.clone(),
                value,
            })
            .collect();
        ModelResult {
            coefficients,
            r_squared: fit.r_squared,
            observations: design.n_rows(),
            diagnostics: fit.diagnostics.clone(),
        }
    }

    pub fn coefficient(&self, feature: &str) -> Option<f64> {
        self.coefficients
            .iter()
            .find(|c| c.feature == feature)
            .map(|c| c.value)
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Human-readable listing: one `name  coefficient` line per feature, then R².
pub fn write_text<W: Write>(out: &mut W, result: &ModelResult, precision: usize) -> io::Result<()> {
    let width = result
        .coefficients
        .iter()
        .map(|c| c.feature.len())
        .max()
        .unwrap_or(0);

    writeln!(
        out,
        "OLS fit: {} observations, {} features",
        result.observations,
        result.coefficients.len()
    )?;
    for c in &result.coefficients {
        writeln!(out, "{:<width$}  {:.precision$}", c.feature, c.value)?;
    }
    writeln!(out, "R^2 = {:.precision$}", result.r_squared)?;
    Ok(())
}

pub fn write_json<W: Write>(out: &mut W, result: &ModelResult) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, result)?;
    writeln!(out)
}
