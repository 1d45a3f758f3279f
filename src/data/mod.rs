/// Data layer: core types, loading, cleaning and row selection.
///
/// Architecture:
/// ```text
///  gss2018.csv (URL or path) / .parquet snapshot
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  fetch + decode + parse → raw SurveyTable (sentinels → Absent)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  clean    │  subset, numeric columns, rename, recode sex, cast age
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ SurveyTable   │  immutable, shared behind an Arc
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  rows complete in the requested columns
///   └──────────┘
/// ```

pub mod clean;
pub mod filter;
pub mod loader;
pub mod model;

use anyhow::{Context, Result};

use model::SurveyTable;

/// Load and clean the survey once. Any failure here is fatal for startup.
pub fn load_survey(source: &str) -> Result<SurveyTable> {
    let raw = loader::load_source(source).with_context(|| format!("loading survey from {source}"))?;
    log::info!(
        "Loaded raw extract: {} rows, {} columns",
        raw.len(),
        raw.columns().len()
    );
    clean::clean(&raw).context("cleaning survey extract")
}
