pub mod json;
pub mod md;

use crate::error::{QuiverError, Result};
use crate::practice::PracticeReport;
use crate::scoring::rings::RingBand;
use crate::store::{QuiverListing, StoredScore};
use crate::types::geometry::{ShotRecord, TargetGeometry};

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Json,
    Md,
}

pub fn render_shot(
    shot: &ShotRecord,
    geometry: &TargetGeometry,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Json => json::to_json(shot).map_err(QuiverError::Json),
        OutputFormat::Md => Ok(md::shot_markdown(shot, geometry)),
    }
}

pub fn render_rings(
    layout: &[RingBand],
    geometry: &TargetGeometry,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Json => json::to_json(layout).map_err(QuiverError::Json),
        OutputFormat::Md => Ok(md::rings_markdown(layout, geometry)),
    }
}

pub fn render_inventory(inventory: &[QuiverListing], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json::to_json(inventory).map_err(QuiverError::Json),
        OutputFormat::Md => Ok(md::inventory_markdown(inventory)),
    }
}

pub fn render_scores(
    arrow_id: &str,
    scores: &[StoredScore],
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Json => json::to_json(scores).map_err(QuiverError::Json),
        OutputFormat::Md => Ok(md::scores_markdown(arrow_id, scores)),
    }
}

pub fn render_practice(report: &PracticeReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json::to_json(report).map_err(QuiverError::Json),
        OutputFormat::Md => Ok(md::practice_markdown(report)),
    }
}
