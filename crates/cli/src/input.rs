//! Loading CLI inputs: plan JSON files and the section catalog.
//!
//! Errors are returned as human-readable strings for `report_error`.

use std::path::Path;

use gymplan_core::{PlanInput, SectionCatalog};
use serde::de::DeserializeOwned;

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("error reading '{}': {}", path.display(), e))?;
    serde_json::from_str(&content)
        .map_err(|e| format!("error parsing '{}': {}", path.display(), e))
}

/// A single plan (current membership or candidate).
pub(crate) fn read_plan(path: &Path) -> Result<PlanInput, String> {
    read_json(path)
}

/// A JSON array of candidate plans.
pub(crate) fn read_candidates(path: &Path) -> Result<Vec<PlanInput>, String> {
    read_json(path)
}

pub(crate) fn read_catalog(path: Option<&Path>) -> Result<Option<SectionCatalog>, String> {
    path.map(|p| SectionCatalog::load(p).map_err(|e| e.to_string()))
        .transpose()
}
