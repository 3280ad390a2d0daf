//! Pending scores for the current practice session.
//!
//! Shots are grouped by quiver (container) and arrow (item) and only reach the store on
//! [`SessionScoreBuffer::confirm`]. Every operation takes one lock, so calls made from
//! different threads against the same quiver never lose an update.

pub mod confirm;
pub mod outcome;

pub use outcome::{ConfirmReport, ConfirmStatus, DiscardOutcome, SubmissionFailure, UndoOutcome};

use crate::error::{QuiverError, Result};
use crate::types::config::FailedSubmissionPolicy;
use crate::types::geometry::{SessionShot, ShotRecord};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Default)]
struct ItemLane {
    shots: Vec<SessionShot>,
    /// Last sequence handed out; never moves backwards while the lane exists.
    last_sequence: u64,
}

#[derive(Debug, Clone)]
struct ContainerEntry {
    /// Unique per entry, so a quiver discarded and re-created mid-confirm is told apart.
    epoch: u64,
    items: BTreeMap<String, ItemLane>,
}

impl ContainerEntry {
    fn new(epoch: u64) -> Self {
        Self {
            epoch,
            items: BTreeMap::new(),
        }
    }

    fn pending(&self) -> usize {
        self.items.values().map(|lane| lane.shots.len()).sum()
    }
}

#[derive(Debug, Default)]
pub struct SessionScoreBuffer {
    policy: FailedSubmissionPolicy,
    containers: Mutex<BTreeMap<String, ContainerEntry>>,
    next_epoch: AtomicU64,
}

impl SessionScoreBuffer {
    pub fn new(policy: FailedSubmissionPolicy) -> Self {
        Self {
            policy,
            containers: Mutex::new(BTreeMap::new()),
            next_epoch: AtomicU64::new(0),
        }
    }

    fn next_epoch(&self) -> u64 {
        self.next_epoch.fetch_add(1, Ordering::Relaxed)
    }

    /// Buffers `record` under the given quiver and arrow and returns it with its sequence.
    pub fn append(
        &self,
        container_id: &str,
        item_id: &str,
        record: ShotRecord,
    ) -> Result<SessionShot> {
        if container_id.trim().is_empty() {
            return Err(QuiverError::SelectionRequired(
                "no quiver selected".to_string(),
            ));
        }
        if item_id.trim().is_empty() {
            return Err(QuiverError::SelectionRequired(
                "no arrow selected".to_string(),
            ));
        }

        let mut containers = self.containers.lock();
        let lane = containers
            .entry(container_id.to_string())
            .or_insert_with(|| ContainerEntry::new(self.next_epoch()))
            .items
            .entry(item_id.to_string())
            .or_default();
        lane.last_sequence += 1;
        let shot = SessionShot {
            sequence: lane.last_sequence,
            record,
        };
        lane.shots.push(shot);
        tracing::debug!(
            container = container_id,
            item = item_id,
            sequence = shot.sequence,
            score = record.score,
            "shot buffered"
        );
        Ok(shot)
    }

    pub fn undo_last(&self, container_id: &str, item_id: &str) -> UndoOutcome {
        let mut containers = self.containers.lock();
        let removed = containers
            .get_mut(container_id)
            .and_then(|entry| entry.items.get_mut(item_id))
            .and_then(|lane| lane.shots.pop());
        match removed {
            Some(shot) => {
                tracing::debug!(
                    container = container_id,
                    item = item_id,
                    sequence = shot.sequence,
                    "shot undone"
                );
                UndoOutcome::Removed(shot)
            }
            None => UndoOutcome::NothingToUndo,
        }
    }

    pub fn discard(&self, container_id: &str) -> DiscardOutcome {
        let removed = self.containers.lock().remove(container_id);
        let shots = removed.map(|entry| entry.pending()).unwrap_or(0);
        if shots == 0 {
            return DiscardOutcome::NothingToDiscard;
        }
        tracing::info!(container = container_id, shots, "session scores discarded");
        DiscardOutcome::Discarded { shots }
    }

    pub fn discard_all(&self) -> DiscardOutcome {
        let drained = std::mem::take(&mut *self.containers.lock());
        let shots: usize = drained.values().map(ContainerEntry::pending).sum();
        if shots == 0 {
            return DiscardOutcome::NothingToDiscard;
        }
        tracing::info!(shots, "all session scores discarded");
        DiscardOutcome::Discarded { shots }
    }

    /// Snapshot of every arrow lane under `container_id`, including lanes emptied by undo.
    pub fn pending(&self, container_id: &str) -> BTreeMap<String, Vec<SessionShot>> {
        self.containers
            .lock()
            .get(container_id)
            .map(|entry| {
                entry
                    .items
                    .iter()
                    .map(|(item_id, lane)| (item_id.clone(), lane.shots.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn pending_count(&self, container_id: &str) -> usize {
        self.containers
            .lock()
            .get(container_id)
            .map(ContainerEntry::pending)
            .unwrap_or(0)
    }

    pub fn container_ids(&self) -> Vec<String> {
        self.containers.lock().keys().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.containers
            .lock()
            .values()
            .all(|entry| entry.pending() == 0)
    }
}
