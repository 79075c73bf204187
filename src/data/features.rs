use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};

use super::model::{Column, Table};
use crate::config::{BinaryEncoding, FeatureConfig, MultiEncoding};
use crate::error::{ConfigError, ParseError, PipelineError, Result};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Turn a raw table into the enriched table the fitter reads from.
///
/// Steps run in a fixed order because later ones read what earlier ones
/// produce:
/// 1. coerce numeric, integer and date columns in place
/// 2. derive the month of the date column
/// 3. binary indicator
/// 4. one-hot indicators (baseline dropped)
/// 5. intercept
pub fn build_features(mut table: Table, config: &FeatureConfig) -> Result<Table> {
    for name in &config.numeric_columns {
        let parsed = parse_column::<f64>(&table, name, "a number")?;
        table.replace(name, Column::Float(parsed))?;
    }
    for name in &config.integer_columns {
        let parsed = parse_column::<i64>(&table, name, "an integer")?;
        table.replace(name, Column::Integer(parsed))?;
    }
    let dates = parse_dates(&table, &config.date_column.name, &config.date_column.format)?;
    table.replace(&config.date_column.name, Column::Date(dates.clone()))?;

    let months = dates.iter().map(|d| i64::from(d.month())).collect();
    table.push(config.month_column.clone(), Column::Integer(months))?;

    let binary = encode_binary(&table, &config.binary)?;
    table.push(config.binary.output.clone(), Column::Indicator(binary))?;

    for (name, indicator) in encode_one_hot(&table, &config.multi)? {
        table.push(name, Column::Indicator(indicator))?;
    }

    let n = table.n_rows();
    table.push(config.intercept_column.clone(), Column::Float(vec![1.0; n]))?;

    log::info!("Built features: {table}");
    Ok(table)
}

// ---------------------------------------------------------------------------
// Type coercion
// ---------------------------------------------------------------------------

fn raw_values<'a>(table: &'a Table, name: &str) -> Result<&'a [String]> {
    match table.column(name)? {
        Column::Raw(values) => Ok(values.as_slice()),
        other => Err(ConfigError::WrongKind {
            column: name.to_string(),
            kind: other.kind(),
            expected: "text",
        }
        .into()),
    }
}

fn parse_column<T: FromStr>(table: &Table, name: &str, expected: &'static str) -> Result<Vec<T>> {
    raw_values(table, name)?
        .iter()
        .enumerate()
        .map(|(row, value)| {
            value.trim().parse::<T>().map_err(|_| {
                PipelineError::from(ParseError {
                    column: name.to_string(),
                    row,
                    value: value.clone(),
                    expected,
                })
            })
        })
        .collect()
}

fn parse_dates(table: &Table, name: &str, format: &str) -> Result<Vec<NaiveDate>> {
    raw_values(table, name)?
        .iter()
        .enumerate()
        .map(|(row, value)| {
            NaiveDate::parse_from_str(value.trim(), format).map_err(|_| {
                PipelineError::from(ParseError {
                    column: name.to_string(),
                    row,
                    value: value.clone(),
                    expected: "a date",
                })
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Categorical encodings
// ---------------------------------------------------------------------------

fn encode_binary(table: &Table, encoding: &BinaryEncoding) -> Result<Vec<u8>> {
    let values = raw_values(table, &encoding.source)?;
    Ok(values
        .iter()
        .map(|v| u8::from(*v == encoding.true_label))
        .collect())
}

/// One indicator per non-baseline label, in label order.
fn encode_one_hot(table: &Table, encoding: &MultiEncoding) -> Result<Vec<(String, Vec<u8>)>> {
    if encoding.labels.is_empty() {
        return Err(ConfigError::EmptyLabels(encoding.source.clone()).into());
    }
    let mut label_index = BTreeMap::new();
    for (i, label) in encoding.labels.iter().enumerate() {
        if label_index.insert(label.as_str(), i).is_some() {
            return Err(ConfigError::DuplicateLabel(label.clone()).into());
        }
    }

    let values = raw_values(table, &encoding.source)?;
    let names = encoding.indicator_names();
    let mut indicators = vec![vec![0u8; values.len()]; names.len()];
    let mut unmatched = BTreeSet::new();
    let mut n_unmatched = 0usize;

    for (row, value) in values.iter().enumerate() {
        match label_index.get(value.as_str()).copied() {
            Some(0) => {}
            Some(i) => indicators[i - 1][row] = 1,
            None => {
                n_unmatched += 1;
                unmatched.insert(value.as_str());
            }
        }
    }

    if n_unmatched > 0 {
        log::warn!(
            "{n_unmatched} rows of '{}' match no configured label and are encoded like the baseline: {unmatched:?}",
            encoding.source
        );
    }
    log::debug!(
        "One-hot '{}': baseline {:?}, {} indicators",
        encoding.source,
        encoding.baseline(),
        names.len()
    );

    Ok(names.into_iter().zip(indicators).collect())
}
