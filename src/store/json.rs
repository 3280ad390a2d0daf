use super::{Container, Item, ScoreStore, StoreDocument, StoredScore};
use crate::error::{QuiverError, Result};
use crate::types::geometry::SessionShot;
use std::fs;
use std::path::{Path, PathBuf};

/// Store backed by a single JSON document, rewritten after every mutation.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    document: StoreDocument,
}

impl JsonFileStore {
    /// Opens the store at `path`, starting empty when the file does not exist yet.
    pub fn open(path: &Path) -> Result<Self> {
        let document = if path.exists() {
            let raw = fs::read_to_string(path).map_err(QuiverError::Io)?;
            serde_json::from_str(&raw)?
        } else {
            StoreDocument::default()
        };
        Ok(Self {
            path: path.to_path_buf(),
            document,
        })
    }

    pub fn document(&self) -> &StoreDocument {
        &self.document
    }

    pub fn add_container(&mut self, name: &str) -> Result<Container> {
        let container = self.document.add_container(name)?;
        self.save()?;
        Ok(container)
    }

    pub fn add_item(&mut self, container_id: &str, name: &str) -> Result<Item> {
        let item = self.document.add_item(container_id, name)?;
        self.save()?;
        Ok(item)
    }

    pub fn rename_container(&mut self, container_id: &str, name: &str) -> Result<Container> {
        let container = self.document.rename_container(container_id, name)?;
        self.save()?;
        Ok(container)
    }

    pub fn remove_container(&mut self, container_id: &str) -> Result<Container> {
        let container = self.document.remove_container(container_id)?;
        self.save()?;
        Ok(container)
    }

    pub fn rename_item(&mut self, item_id: &str, name: &str) -> Result<Item> {
        let item = self.document.rename_item(item_id, name)?;
        self.save()?;
        Ok(item)
    }

    pub fn remove_score(&mut self, score_id: u64) -> Result<StoredScore> {
        let score = self.document.remove_score(score_id)?;
        self.save()?;
        Ok(score)
    }

    pub fn scores_for(&self, item_id: &str) -> Result<Vec<StoredScore>> {
        self.document.scores_of(item_id)
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(QuiverError::Io)?;
        }
        let json = serde_json::to_string_pretty(&self.document)?;
        fs::write(&self.path, json).map_err(QuiverError::Io)?;
        tracing::debug!(path = %self.path.display(), "store saved");
        Ok(())
    }
}

impl ScoreStore for JsonFileStore {
    fn list_containers(&self) -> Result<Vec<Container>> {
        Ok(self.document.containers.clone())
    }

    fn list_items(&self, container_id: &str) -> Result<Vec<Item>> {
        self.document.items_of(container_id)
    }

    fn submit_score(&mut self, item_id: &str, shot: &SessionShot) -> Result<StoredScore> {
        let stored = self.document.record_score(item_id, shot)?;
        if let Err(error) = self.save() {
            self.document.scores.retain(|score| score.id != stored.id);
            return Err(QuiverError::Submission {
                item_id: item_id.to_string(),
                reason: error.to_string(),
            });
        }
        Ok(stored)
    }

    fn remove_item(&mut self, item_id: &str) -> Result<Item> {
        let item = self.document.remove_item(item_id)?;
        self.save()?;
        Ok(item)
    }
}
