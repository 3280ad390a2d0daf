//! Replays a recorded practice script against a session buffer and a store.
//!
//! A script is a TOML file of `[[step]]` tables. The quiver/arrow selection is local to one
//! replay and is passed into every buffer call explicitly.

use crate::error::{QuiverError, Result};
use crate::scoring;
use crate::session::{ConfirmReport, ConfirmStatus, DiscardOutcome, SessionScoreBuffer, UndoOutcome};
use crate::store::ScoreStore;
use crate::types::geometry::{RawPointerEvent, SessionShot, SurfaceBounds, TargetGeometry};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct PracticeScript {
    /// Device-space bounds of the target surface; defaults to the canonical square.
    pub surface: Option<SurfaceBounds>,
    #[serde(rename = "step", default)]
    pub steps: Vec<PracticeStep>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PracticeStep {
    Select {
        quiver: Option<String>,
        arrow: Option<String>,
    },
    Shot {
        x: f64,
        y: f64,
        surface: Option<SurfaceBounds>,
    },
    Undo,
    Confirm {
        quiver: Option<String>,
    },
    Discard {
        quiver: Option<String>,
    },
    DiscardAll,
    /// Deletes an arrow from the store, as another client would mid-session.
    RemoveArrow {
        arrow: String,
    },
}

impl PracticeStep {
    fn action(&self) -> &'static str {
        match self {
            Self::Select { .. } => "select",
            Self::Shot { .. } => "shot",
            Self::Undo => "undo",
            Self::Confirm { .. } => "confirm",
            Self::Discard { .. } => "discard",
            Self::DiscardAll => "discard_all",
            Self::RemoveArrow { .. } => "remove_arrow",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum StepOutcome {
    Selected {
        quiver: Option<String>,
        arrow: Option<String>,
    },
    Buffered {
        quiver: String,
        arrow: String,
        shot: SessionShot,
    },
    Skipped {
        reason: String,
    },
    Undo(UndoOutcome),
    Confirm(ConfirmReport),
    Discard(DiscardOutcome),
    ArrowRemoved {
        arrow: String,
        quiver: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepReport {
    pub index: usize,
    pub action: &'static str,
    pub outcome: StepOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PracticeReport {
    pub geometry: TargetGeometry,
    pub steps: Vec<StepReport>,
    /// Shots still buffered when the script ended, unconfirmed.
    pub left_pending: usize,
}

impl PracticeReport {
    pub fn skipped(&self) -> usize {
        self.steps
            .iter()
            .filter(|step| matches!(step.outcome, StepOutcome::Skipped { .. }))
            .count()
    }

    pub fn confirms(&self) -> impl Iterator<Item = &ConfirmReport> {
        self.steps.iter().filter_map(|step| match &step.outcome {
            StepOutcome::Confirm(report) => Some(report),
            _ => None,
        })
    }

    pub fn any_confirm_with(&self, status: ConfirmStatus) -> bool {
        self.confirms().any(|report| report.status == status)
    }
}

pub fn load_script(path: &Path) -> Result<PracticeScript> {
    if !path.exists() {
        return Err(QuiverError::PathNotFound(path.display().to_string()));
    }
    let raw = fs::read_to_string(path).map_err(QuiverError::Io)?;
    toml::from_str(&raw)
        .map_err(|e| QuiverError::ConfigParse(format!("{}: {}", path.display(), e)))
}

#[derive(Debug, Default)]
struct Selection {
    quiver: Option<String>,
    arrow: Option<String>,
}

pub fn run_script<S>(
    script: &PracticeScript,
    geometry: &TargetGeometry,
    buffer: &SessionScoreBuffer,
    store: &mut S,
) -> PracticeReport
where
    S: ScoreStore + ?Sized,
{
    let default_surface = script
        .surface
        .unwrap_or_else(|| geometry.canonical_surface());
    let mut selection = Selection::default();
    let mut steps = Vec::with_capacity(script.steps.len());

    for (index, step) in script.steps.iter().enumerate() {
        let outcome = match step {
            PracticeStep::Select { quiver, arrow } => {
                select(&mut selection, quiver.as_deref(), arrow.as_deref(), store)
            }
            PracticeStep::Shot { x, y, surface } => {
                let event = RawPointerEvent {
                    client_x: *x,
                    client_y: *y,
                    surface: surface.unwrap_or(default_surface),
                };
                shoot(&selection, &event, geometry, buffer)
            }
            PracticeStep::Undo => match (&selection.quiver, &selection.arrow) {
                (Some(quiver), Some(arrow)) => StepOutcome::Undo(buffer.undo_last(quiver, arrow)),
                _ => skipped(QuiverError::SelectionRequired(
                    "select a quiver and an arrow to undo a score".to_string(),
                )),
            },
            PracticeStep::Confirm { quiver } => {
                match quiver.as_ref().or(selection.quiver.as_ref()) {
                    Some(quiver) => StepOutcome::Confirm(buffer.confirm(quiver, store)),
                    None => skipped(QuiverError::SelectionRequired(
                        "no quiver to confirm".to_string(),
                    )),
                }
            }
            PracticeStep::Discard { quiver } => {
                match quiver.as_ref().or(selection.quiver.as_ref()) {
                    Some(quiver) => StepOutcome::Discard(buffer.discard(quiver)),
                    None => skipped(QuiverError::SelectionRequired(
                        "no quiver to discard".to_string(),
                    )),
                }
            }
            PracticeStep::DiscardAll => StepOutcome::Discard(buffer.discard_all()),
            PracticeStep::RemoveArrow { arrow } => match store.remove_item(arrow) {
                Ok(item) => StepOutcome::ArrowRemoved {
                    arrow: item.id,
                    quiver: item.container_id,
                },
                Err(error) => skipped(error),
            },
        };
        steps.push(StepReport {
            index: index + 1,
            action: step.action(),
            outcome,
        });
    }

    let left_pending = buffer
        .container_ids()
        .iter()
        .map(|quiver| buffer.pending_count(quiver))
        .sum();
    PracticeReport {
        geometry: *geometry,
        steps,
        left_pending,
    }
}

fn select<S>(
    selection: &mut Selection,
    quiver: Option<&str>,
    arrow: Option<&str>,
    store: &S,
) -> StepOutcome
where
    S: ScoreStore + ?Sized,
{
    let Some(quiver) = quiver else {
        *selection = Selection::default();
        return StepOutcome::Selected {
            quiver: None,
            arrow: None,
        };
    };

    let quiver_known = match store.list_containers() {
        Ok(containers) => containers.iter().any(|container| container.id == quiver),
        Err(error) => return skipped(error),
    };
    if !quiver_known {
        return skipped(QuiverError::UnknownContainer(quiver.to_string()));
    }
    if let Some(arrow) = arrow {
        match store.list_items(quiver) {
            Ok(items) if items.iter().any(|item| item.id == arrow) => {}
            Ok(_) => return skipped(QuiverError::UnknownItem(arrow.to_string())),
            Err(error) => return skipped(error),
        }
    }

    selection.quiver = Some(quiver.to_string());
    selection.arrow = arrow.map(ToString::to_string);
    StepOutcome::Selected {
        quiver: selection.quiver.clone(),
        arrow: selection.arrow.clone(),
    }
}

fn shoot(
    selection: &Selection,
    event: &RawPointerEvent,
    geometry: &TargetGeometry,
    buffer: &SessionScoreBuffer,
) -> StepOutcome {
    let record = match scoring::score_from_event(event, geometry) {
        Ok(record) => record,
        Err(error) => return skipped(error),
    };
    let quiver = selection.quiver.clone().unwrap_or_default();
    let arrow = selection.arrow.clone().unwrap_or_default();
    match buffer.append(&quiver, &arrow, record) {
        Ok(shot) => StepOutcome::Buffered {
            quiver,
            arrow,
            shot,
        },
        Err(error) => skipped(error),
    }
}

fn skipped(error: QuiverError) -> StepOutcome {
    tracing::warn!(error = %error, "practice step skipped");
    StepOutcome::Skipped {
        reason: error.to_string(),
    }
}
