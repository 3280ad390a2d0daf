use crate::practice::{PracticeReport, StepOutcome};
use crate::scoring::rings::{marker_arm, RingBand};
use crate::session::{DiscardOutcome, UndoOutcome};
use crate::store::{QuiverListing, StoredScore};
use crate::types::geometry::{ShotRecord, TargetGeometry};

pub fn shot_markdown(shot: &ShotRecord, geometry: &TargetGeometry) -> String {
    let mut output = String::new();
    output.push_str("# Shot\n\n");
    output.push_str(&format!(
        "Score: {} of {}\n\nPosition: ({:.1}, {:.1}) on a {:.1}-unit face\n",
        shot.score,
        geometry.ring_count(),
        shot.x,
        shot.y,
        geometry.total_size()
    ));
    output
}

pub fn rings_markdown(layout: &[RingBand], geometry: &TargetGeometry) -> String {
    let mut output = String::new();
    output.push_str("# Target Rings\n\n");
    output.push_str(&geometry_line(geometry));
    output.push_str(&format!("Marker arm: {:.3}\n\n", marker_arm(geometry)));
    output.push_str("| score | outer radius | band | colour |\n");
    output.push_str("|---|---|---|---|\n");
    for band in layout {
        output.push_str(&format!(
            "| {} | {:.3} | {} | {} |\n",
            band.score, band.radius, band.band, band.colour
        ));
    }
    output
}

pub fn inventory_markdown(inventory: &[QuiverListing]) -> String {
    let mut output = String::new();
    output.push_str("# Quivers\n\n");
    if inventory.is_empty() {
        output.push_str("- none\n");
        return output;
    }
    for listing in inventory {
        output.push_str(&format!(
            "## {} (id {})\n\n",
            listing.quiver.name, listing.quiver.id
        ));
        if listing.arrows.is_empty() {
            output.push_str("- no arrows\n\n");
            continue;
        }
        for arrow in &listing.arrows {
            output.push_str(&format!(
                "- {} (id {}): {} score(s)\n",
                arrow.arrow.name, arrow.arrow.id, arrow.scores
            ));
        }
        output.push('\n');
    }
    output
}

pub fn scores_markdown(arrow_id: &str, scores: &[StoredScore]) -> String {
    let mut output = String::new();
    output.push_str(&format!("# Scores for arrow {arrow_id}\n\n"));
    if scores.is_empty() {
        output.push_str("- none\n");
        return output;
    }
    for score in scores {
        output.push_str(&format!(
            "- #{} score {} at ({:.1}, {:.1}), recorded {}\n",
            score.sequence, score.value, score.x, score.y, score.recorded_at
        ));
    }
    output
}

pub fn practice_markdown(report: &PracticeReport) -> String {
    let mut output = String::new();
    output.push_str("# Practice Session\n\n");
    output.push_str(&geometry_line(&report.geometry));

    output.push_str("## Steps\n\n");
    if report.steps.is_empty() {
        output.push_str("- none\n");
    }
    for step in &report.steps {
        output.push_str(&format!("- {} {}: ", step.index, step.action));
        match &step.outcome {
            StepOutcome::Selected { quiver, arrow } => output.push_str(&format!(
                "quiver {} / arrow {}\n",
                quiver.as_deref().unwrap_or("-"),
                arrow.as_deref().unwrap_or("-")
            )),
            StepOutcome::Buffered {
                quiver,
                arrow,
                shot,
            } => output.push_str(&format!(
                "quiver {quiver} / arrow {arrow} #{} score {} at ({:.1}, {:.1})\n",
                shot.sequence, shot.record.score, shot.record.x, shot.record.y
            )),
            StepOutcome::Skipped { reason } => {
                output.push_str(&format!("skipped ({reason})\n"));
            }
            StepOutcome::Undo(UndoOutcome::Removed(shot)) => output.push_str(&format!(
                "removed #{} (score {})\n",
                shot.sequence, shot.record.score
            )),
            StepOutcome::Undo(UndoOutcome::NothingToUndo) => {
                output.push_str("nothing to undo\n");
            }
            StepOutcome::Confirm(confirm) => {
                output.push_str(&format!(
                    "quiver {} {} ({} saved, {} failed",
                    confirm.container_id,
                    confirm.status.as_str(),
                    confirm.success_count,
                    confirm.error_count
                ));
                if confirm.retained > 0 {
                    output.push_str(&format!(", {} kept for retry", confirm.retained));
                }
                output.push_str(")\n");
                for failure in &confirm.failures {
                    output.push_str(&format!(
                        "  - arrow {} #{}: {}\n",
                        failure.item_id, failure.sequence, failure.reason
                    ));
                }
            }
            StepOutcome::Discard(DiscardOutcome::Discarded { shots }) => {
                output.push_str(&format!("discarded {shots} shot(s)\n"));
            }
            StepOutcome::Discard(DiscardOutcome::NothingToDiscard) => {
                output.push_str("nothing to discard\n");
            }
            StepOutcome::ArrowRemoved { arrow, quiver } => {
                output.push_str(&format!("arrow {arrow} removed from quiver {quiver}\n"));
            }
        }
    }

    output.push_str("\n## Summary\n\n");
    output.push_str(&format!(
        "- skipped steps: {}\n- unconfirmed shots: {}\n",
        report.skipped(),
        report.left_pending
    ));
    output
}

fn geometry_line(geometry: &TargetGeometry) -> String {
    format!(
        "Face: {:.1} units, {} rings, pitch {:.3}\n\n",
        geometry.total_size(),
        geometry.ring_count(),
        geometry.pitch()
    )
}
