//! Pipeline configuration.
//!
//! Column names, labels and the design-matrix layout are data, not code:
//! `PipelineConfig::default()` describes the avocado dataset and a JSON file
//! can override any field.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::regression::Solver;

/// Regions of the avocado dataset.  The first entry is the baseline.
pub const AVOCADO_REGIONS: &[&str] = &[
    "Albany",
    "Atlanta",
    "BaltimoreWashington",
    "Boise",
    "Boston",
    "BuffaloRochester",
    "California",
    "Charlotte",
    "Chicago",
    "CincinnatiDayton",
    "Columbus",
    "DallasFtWorth",
    "Denver",
    "Detroit",
    "GrandRapids",
    "GreatLakes",
    "HarrisburgScranton",
    "HartfordSpringfield",
    "Houston",
    "Indianapolis",
    "Jacksonville",
    "LasVegas",
    "LosAngeles",
    "Louisville",
    "MiamiFtLauderdale",
    "Midsouth",
    "Nashville",
    "NewOrleansMobile",
    "NewYork",
    "Northeast",
    "NorthernNewEngland",
    "Orlando",
    "Philadelphia",
    "PhoenixTucson",
    "Pittsburgh",
    "Plains",
    "Portland",
    "RaleighGreensboro",
    "RichmondNorfolk",
    "Roanoke",
    "Sacramento",
    "SanDiego",
    "SanFrancisco",
    "Seattle",
    "SouthCarolina",
    "SouthCentral",
    "Southeast",
    "Spokane",
    "StLouis",
    "Syracuse",
    "Tampa",
    "TotalUS",
    "West",
    "WestTexNewMexico",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateColumn {
    pub name: String,
    /// `chrono` strftime format, e.g. `%Y-%m-%d`.
    pub format: String,
}

impl Default for DateColumn {
    fn default() -> Self {
        Self {
            name: "Date".into(),
            format: "%Y-%m-%d".into(),
        }
    }
}

/// Two-level encoding: `true_label` → 1, anything else → 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinaryEncoding {
    pub source: String,
    pub true_label: String,
    pub output: String,
}

impl Default for BinaryEncoding {
    fn default() -> Self {
        Self {
            source: "type".into(),
            true_label: "organic".into(),
            output: "type_dummy".into(),
        }
    }
}

/// One-hot encoding with an explicit baseline.
///
/// `labels[0]` is the baseline and gets no column.  Each other label gets a
/// column named `prefix + label`.  Values missing from `labels` encode as
/// all zeros.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiEncoding {
    pub source: String,
    pub labels: Vec<String>,
    pub prefix: String,
}

impl MultiEncoding {
    pub fn baseline(&self) -> Option<&str> {
        self.labels.first().map(String::as_str)
    }

    /// Names of the indicator columns, in label order.
    pub fn indicator_names(&self) -> Vec<String> {
        self.labels
            .iter()
            .skip(1)
            .map(|l| format!("{}{l}", self.prefix))
            .collect()
    }
}

impl Default for MultiEncoding {
    fn default() -> Self {
        Self {
            source: "region".into(),
            labels: AVOCADO_REGIONS.iter().map(|s| s.to_string()).collect(),
            prefix: String::new(),
        }
    }
}

/// Everything the feature builder needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    pub numeric_columns: Vec<String>,
    pub integer_columns: Vec<String>,
    pub date_column: DateColumn,
    pub month_column: String,
    pub binary: BinaryEncoding,
    pub multi: MultiEncoding,
    pub intercept_column: String,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        let numeric = [
            "AveragePrice",
            "Total Volume",
            "4046",
            "4225",
            "4770",
            "Total Bags",
            "Small Bags",
            "Large Bags",
            "XLarge Bags",
        ];
        Self {
            numeric_columns: numeric.iter().map(|s| s.to_string()).collect(),
            integer_columns: vec!["year".into()],
            date_column: DateColumn::default(),
            month_column: "Month".into(),
            binary: BinaryEncoding::default(),
            multi: MultiEncoding::default(),
            intercept_column: "intercept".into(),
        }
    }
}

/// Top-level configuration of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    #[serde(flatten)]
    pub features: FeatureConfig,
    /// Design-matrix columns, in order.  Empty means the default layout
    /// derived from `features` (see [`PipelineConfig::feature_order`]).
    pub feature_order: Vec<String>,
    pub target_column: String,
    pub solver: Solver,
    /// Decimal places in the text report.
    pub precision: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            features: FeatureConfig::default(),
            feature_order: Vec::new(),
            target_column: "AveragePrice".into(),
            solver: Solver::default(),
            precision: 6,
        }
    }
}

impl PipelineConfig {
    /// Read a JSON config.  Fields left out keep their default values.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: PipelineConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// The design-matrix layout: the explicit `feature_order` when given,
    /// otherwise month, integer columns, the first numeric predictor after
    /// the target, the binary indicator, every one-hot indicator and the
    /// intercept.
    pub fn feature_order(&self) -> Vec<String> {
        if !self.feature_order.is_empty() {
            return self.feature_order.clone();
        }
        let f = &self.features;
        let mut order = vec![f.month_column.clone()];
        order.extend(f.integer_columns.iter().cloned());
        if let Some(volume) = f.numeric_columns.iter().find(|c| **c != self.target_column) {
            order.push(volume.clone());
        }
        order.push(f.binary.output.clone());
        order.extend(f.multi.indicator_names());
        order.push(f.intercept_column.clone());
        order
    }
}
