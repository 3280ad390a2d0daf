pub mod json;
pub mod memory;

use crate::error::{QuiverError, Result};
use crate::types::geometry::SessionShot;
use chrono::Utc;
use serde::{Deserialize, Serialize};

pub use json::JsonFileStore;
pub use memory::MemoryStore;

/// A quiver: the group of arrows scores are confirmed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    pub id: String,
    pub name: String,
}

/// An arrow inside a quiver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    #[serde(rename = "quiver_id")]
    pub container_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredScore {
    pub id: u64,
    #[serde(rename = "arrow_id")]
    pub item_id: String,
    pub value: u32,
    pub x: f64,
    pub y: f64,
    pub sequence: u64,
    pub recorded_at: String,
}

/// A quiver with its arrows and how many scores each arrow holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuiverListing {
    pub quiver: Container,
    pub arrows: Vec<ArrowListing>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrowListing {
    pub arrow: Item,
    pub scores: usize,
}

/// Durable home for confirmed scores.
pub trait ScoreStore {
    fn list_containers(&self) -> Result<Vec<Container>>;

    fn list_items(&self, container_id: &str) -> Result<Vec<Item>>;

    fn submit_score(&mut self, item_id: &str, shot: &SessionShot) -> Result<StoredScore>;

    /// Deletes an arrow and its scores; buffered shots for it become orphans.
    fn remove_item(&mut self, item_id: &str) -> Result<Item>;
}

/// Quivers, arrows and scores as one serializable document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreDocument {
    #[serde(default, rename = "next_quiver_id")]
    pub next_container_id: u64,
    #[serde(default, rename = "next_arrow_id")]
    pub next_item_id: u64,
    #[serde(default)]
    pub next_score_id: u64,
    #[serde(default, rename = "quivers")]
    pub containers: Vec<Container>,
    #[serde(default, rename = "arrows")]
    pub items: Vec<Item>,
    #[serde(default)]
    pub scores: Vec<StoredScore>,
}

impl StoreDocument {
    pub fn add_container(&mut self, name: &str) -> Result<Container> {
        let name = require_name(name, "quiver")?;
        self.next_container_id += 1;
        let container = Container {
            id: self.next_container_id.to_string(),
            name,
        };
        self.containers.push(container.clone());
        Ok(container)
    }

    pub fn add_item(&mut self, container_id: &str, name: &str) -> Result<Item> {
        self.container(container_id)?;
        let name = require_name(name, "arrow")?;
        self.next_item_id += 1;
        let item = Item {
            id: self.next_item_id.to_string(),
            name,
            container_id: container_id.to_string(),
        };
        self.items.push(item.clone());
        Ok(item)
    }

    pub fn rename_container(&mut self, container_id: &str, name: &str) -> Result<Container> {
        let name = require_name(name, "quiver")?;
        let container = self
            .containers
            .iter_mut()
            .find(|container| container.id == container_id)
            .ok_or_else(|| QuiverError::UnknownContainer(container_id.to_string()))?;
        container.name = name;
        Ok(container.clone())
    }

    /// Removes the quiver together with its arrows and their scores.
    pub fn remove_container(&mut self, container_id: &str) -> Result<Container> {
        let position = self
            .containers
            .iter()
            .position(|container| container.id == container_id)
            .ok_or_else(|| QuiverError::UnknownContainer(container_id.to_string()))?;
        let orphaned = self
            .items
            .iter()
            .filter(|item| item.container_id == container_id)
            .map(|item| item.id.clone())
            .collect::<Vec<_>>();
        self.scores
            .retain(|score| !orphaned.contains(&score.item_id));
        self.items.retain(|item| item.container_id != container_id);
        Ok(self.containers.remove(position))
    }

    pub fn rename_item(&mut self, item_id: &str, name: &str) -> Result<Item> {
        let name = require_name(name, "arrow")?;
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id == item_id)
            .ok_or_else(|| QuiverError::UnknownItem(item_id.to_string()))?;
        item.name = name;
        Ok(item.clone())
    }

    pub fn remove_score(&mut self, score_id: u64) -> Result<StoredScore> {
        let position = self
            .scores
            .iter()
            .position(|score| score.id == score_id)
            .ok_or(QuiverError::UnknownScore(score_id))?;
        Ok(self.scores.remove(position))
    }

    /// Removes the arrow and its scores.
    pub fn remove_item(&mut self, item_id: &str) -> Result<Item> {
        let position = self
            .items
            .iter()
            .position(|item| item.id == item_id)
            .ok_or_else(|| QuiverError::UnknownItem(item_id.to_string()))?;
        self.scores.retain(|score| score.item_id != item_id);
        Ok(self.items.remove(position))
    }

    pub fn container(&self, container_id: &str) -> Result<&Container> {
        self.containers
            .iter()
            .find(|container| container.id == container_id)
            .ok_or_else(|| QuiverError::UnknownContainer(container_id.to_string()))
    }

    pub fn items_of(&self, container_id: &str) -> Result<Vec<Item>> {
        self.container(container_id)?;
        Ok(self
            .items
            .iter()
            .filter(|item| item.container_id == container_id)
            .cloned()
            .collect())
    }

    pub fn scores_of(&self, item_id: &str) -> Result<Vec<StoredScore>> {
        if !self.items.iter().any(|item| item.id == item_id) {
            return Err(QuiverError::UnknownItem(item_id.to_string()));
        }
        Ok(self
            .scores
            .iter()
            .filter(|score| score.item_id == item_id)
            .cloned()
            .collect())
    }

    pub fn inventory(&self) -> Vec<QuiverListing> {
        self.containers
            .iter()
            .map(|container| QuiverListing {
                quiver: container.clone(),
                arrows: self
                    .items
                    .iter()
                    .filter(|item| item.container_id == container.id)
                    .map(|item| ArrowListing {
                        arrow: item.clone(),
                        scores: self
                            .scores
                            .iter()
                            .filter(|score| score.item_id == item.id)
                            .count(),
                    })
                    .collect(),
            })
            .collect()
    }

    pub fn record_score(&mut self, item_id: &str, shot: &SessionShot) -> Result<StoredScore> {
        if !self.items.iter().any(|item| item.id == item_id) {
            return Err(QuiverError::UnknownItem(item_id.to_string()));
        }
        self.next_score_id += 1;
        let stored = StoredScore {
            id: self.next_score_id,
            item_id: item_id.to_string(),
            value: shot.record.score,
            x: shot.record.x,
            y: shot.record.y,
            sequence: shot.sequence,
            recorded_at: Utc::now().to_rfc3339(),
        };
        self.scores.push(stored.clone());
        Ok(stored)
    }
}

fn require_name(name: &str, kind: &'static str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(QuiverError::MissingName(kind));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::geometry::ShotRecord;

    fn shot(sequence: u64, score: u32) -> SessionShot {
        SessionShot {
            sequence,
            record: ShotRecord {
                x: 61.0,
                y: 61.0,
                score,
            },
        }
    }

    #[test]
    fn ids_are_assigned_per_kind() {
        let mut doc = StoreDocument::default();
        let first = doc.add_container("Indoor").expect("quiver should be added");
        let second = doc.add_container("Field").expect("quiver should be added");
        let arrow = doc.add_item(&first.id, "A1").expect("arrow should be added");
        assert_eq!(first.id, "1");
        assert_eq!(second.id, "2");
        assert_eq!(arrow.id, "1");
        assert_eq!(arrow.container_id, "1");
    }

    #[test]
    fn blank_names_and_unknown_parents_are_rejected() {
        let mut doc = StoreDocument::default();
        assert!(matches!(
            doc.add_container("   "),
            Err(QuiverError::MissingName("quiver"))
        ));
        assert!(matches!(
            doc.add_item("9", "A1"),
            Err(QuiverError::UnknownContainer(_))
        ));
    }

    #[test]
    fn record_score_keeps_value_position_and_sequence() {
        let mut doc = StoreDocument::default();
        let quiver = doc.add_container("Indoor").expect("quiver should be added");
        let arrow = doc.add_item(&quiver.id, "A1").expect("arrow should be added");

        let stored = doc
            .record_score(&arrow.id, &shot(3, 9))
            .expect("score should be recorded");
        assert_eq!(stored.value, 9);
        assert_eq!(stored.sequence, 3);
        assert_eq!(doc.scores_of(&arrow.id).expect("arrow exists").len(), 1);
        assert!(matches!(
            doc.record_score("42", &shot(1, 1)),
            Err(QuiverError::UnknownItem(_))
        ));
    }

    #[test]
    fn inventory_counts_scores_per_arrow() {
        let mut doc = StoreDocument::default();
        let quiver = doc.add_container("Indoor").expect("quiver should be added");
        let first = doc.add_item(&quiver.id, "A1").expect("arrow should be added");
        doc.add_item(&quiver.id, "A2").expect("arrow should be added");
        doc.record_score(&first.id, &shot(1, 5))
            .expect("score should be recorded");
        doc.record_score(&first.id, &shot(2, 7))
            .expect("score should be recorded");

        let inventory = doc.inventory();
        assert_eq!(inventory.len(), 1);
        let counts = inventory[0]
            .arrows
            .iter()
            .map(|arrow| arrow.scores)
            .collect::<Vec<_>>();
        assert_eq!(counts, vec![2, 0]);
    }

    #[test]
    fn removing_an_arrow_drops_its_scores() {
        let mut doc = StoreDocument::default();
        let quiver = doc.add_container("Indoor").expect("quiver should be added");
        let arrow = doc.add_item(&quiver.id, "A1").expect("arrow should be added");
        doc.record_score(&arrow.id, &shot(1, 5))
            .expect("score should be recorded");

        doc.remove_item(&arrow.id).expect("arrow should be removed");
        assert!(doc.items_of(&quiver.id).expect("quiver exists").is_empty());
        assert!(doc.scores.is_empty());
    }

    #[test]
    fn renames_keep_ids_and_reject_blank_names() {
        let mut doc = StoreDocument::default();
        let quiver = doc.add_container("Indoor").expect("quiver should be added");
        let arrow = doc.add_item(&quiver.id, "A1").expect("arrow should be added");

        let renamed = doc
            .rename_container(&quiver.id, " Field ")
            .expect("quiver should be renamed");
        assert_eq!((renamed.id.as_str(), renamed.name.as_str()), ("1", "Field"));
        let renamed = doc.rename_item(&arrow.id, "X10").expect("arrow should be renamed");
        assert_eq!(renamed.container_id, quiver.id);
        assert_eq!(doc.items_of(&quiver.id).expect("quiver exists")[0].name, "X10");

        assert!(matches!(
            doc.rename_item(&arrow.id, ""),
            Err(QuiverError::MissingName("arrow"))
        ));
        assert!(matches!(
            doc.rename_container("9", "Outdoor"),
            Err(QuiverError::UnknownContainer(_))
        ));
    }

    #[test]
    fn removing_a_quiver_drops_its_arrows_and_their_scores() {
        let mut doc = StoreDocument::default();
        let indoor = doc.add_container("Indoor").expect("quiver should be added");
        let field = doc.add_container("Field").expect("quiver should be added");
        let a1 = doc.add_item(&indoor.id, "A1").expect("arrow should be added");
        let f1 = doc.add_item(&field.id, "F1").expect("arrow should be added");
        doc.record_score(&a1.id, &shot(1, 5))
            .expect("score should be recorded");
        doc.record_score(&f1.id, &shot(1, 8))
            .expect("score should be recorded");

        doc.remove_container(&indoor.id)
            .expect("quiver should be removed");

        assert_eq!(doc.containers, vec![field]);
        assert_eq!(doc.items, vec![f1.clone()]);
        assert_eq!(doc.scores.len(), 1);
        assert_eq!(doc.scores[0].item_id, f1.id);
        assert!(matches!(
            doc.items_of(&indoor.id),
            Err(QuiverError::UnknownContainer(_))
        ));
    }

    #[test]
    fn removing_a_score_leaves_the_others() {
        let mut doc = StoreDocument::default();
        let quiver = doc.add_container("Indoor").expect("quiver should be added");
        let arrow = doc.add_item(&quiver.id, "A1").expect("arrow should be added");
        let first = doc
            .record_score(&arrow.id, &shot(1, 5))
            .expect("score should be recorded");
        doc.record_score(&arrow.id, &shot(2, 9))
            .expect("score should be recorded");

        let removed = doc.remove_score(first.id).expect("score should be removed");
        assert_eq!(removed.value, 5);
        let left = doc.scores_of(&arrow.id).expect("arrow exists");
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].value, 9);
        assert!(matches!(
            doc.remove_score(first.id),
            Err(QuiverError::UnknownScore(1))
        ));
    }
}
