use std::path::Path;

use crate::config::PipelineConfig;
use crate::data::features::build_features;
use crate::data::loader::load_csv;
use crate::data::model::Table;
use crate::error::Result;
use crate::regression::{fit, Design};
use crate::report::ModelResult;

/// Load, transform, fit.  Any error aborts the run before anything is
/// reported.
pub fn run(path: &Path, config: &PipelineConfig) -> Result<ModelResult> {
    let table = load_csv(path)?;
    run_table(table, config)
}

/// Everything after loading, for callers that already hold a raw table.
pub fn run_table(table: Table, config: &PipelineConfig) -> Result<ModelResult> {
    let enriched = build_features(table, &config.features)?;
    let design = Design::from_table(&enriched, &config.feature_order(), &config.target_column)?;
    let fit = fit(&design, config.solver)?;
    if fit.is_rank_deficient() {
        log::warn!("Coefficients are one of many least-squares solutions; compare fitted values, not weights");
    }
    Ok(ModelResult::from_fit(&design, &fit))
}
