use super::{Container, Item, ScoreStore, StoreDocument, StoredScore};
use crate::error::{QuiverError, Result};
use crate::types::geometry::SessionShot;
use std::collections::BTreeSet;

/// In-process store. Failures can be injected per arrow or per (arrow, sequence) pair.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub document: StoreDocument,
    failing_items: BTreeSet<String>,
    failing_shots: BTreeSet<(String, u64)>,
    submissions: Vec<(String, u64)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_document(document: StoreDocument) -> Self {
        Self {
            document,
            ..Self::default()
        }
    }

    pub fn add_container(&mut self, name: &str) -> Result<Container> {
        self.document.add_container(name)
    }

    pub fn add_item(&mut self, container_id: &str, name: &str) -> Result<Item> {
        self.document.add_item(container_id, name)
    }

    pub fn fail_item(&mut self, item_id: &str) {
        self.failing_items.insert(item_id.to_string());
    }

    pub fn fail_shot(&mut self, item_id: &str, sequence: u64) {
        self.failing_shots.insert((item_id.to_string(), sequence));
    }

    /// Every submission attempt in call order, including refused ones.
    pub fn submissions(&self) -> &[(String, u64)] {
        &self.submissions
    }

    pub fn stored_scores(&self) -> &[StoredScore] {
        &self.document.scores
    }
}

impl ScoreStore for MemoryStore {
    fn list_containers(&self) -> Result<Vec<Container>> {
        Ok(self.document.containers.clone())
    }

    fn list_items(&self, container_id: &str) -> Result<Vec<Item>> {
        self.document.items_of(container_id)
    }

    fn submit_score(&mut self, item_id: &str, shot: &SessionShot) -> Result<StoredScore> {
        self.submissions.push((item_id.to_string(), shot.sequence));
        if self.failing_items.contains(item_id)
            || self
                .failing_shots
                .contains(&(item_id.to_string(), shot.sequence))
        {
            return Err(QuiverError::Submission {
                item_id: item_id.to_string(),
                reason: "store refused the score".to_string(),
            });
        }
        self.document.record_score(item_id, shot)
    }

    fn remove_item(&mut self, item_id: &str) -> Result<Item> {
        self.document.remove_item(item_id)
    }
}
