//! In-memory collaborators

use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use crate::source::{PreferenceStore, RouteSheetSource};
use crate::types::ReferencePoint;
use crate::{PaceError, Result};

#[derive(Debug, Clone)]
struct CheckpointEntry {
    race_id: i64,
    checkpoint_id: i64,
    references: Vec<ReferencePoint>,
}

/// Route sheets held in memory.
///
/// Checkpoints of a race follow each other in insertion order.
#[derive(Debug, Default)]
pub struct MemoryRouteSheets {
    checkpoints: RwLock<Vec<CheckpointEntry>>,
}

impl MemoryRouteSheets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(race_id, checkpoint_id, references)` in race order.
    pub fn from_checkpoints<I>(checkpoints: I) -> Self
    where
        I: IntoIterator<Item = (i64, i64, Vec<ReferencePoint>)>,
    {
        let entries = checkpoints
            .into_iter()
            .map(|(race_id, checkpoint_id, references)| CheckpointEntry {
                race_id,
                checkpoint_id,
                references,
            })
            .collect();
        Self { checkpoints: RwLock::new(entries) }
    }

    /// Add a checkpoint, or replace the references of an existing one.
    pub async fn insert_checkpoint(
        &self,
        race_id: i64,
        checkpoint_id: i64,
        references: Vec<ReferencePoint>,
    ) {
        let mut checkpoints = self.checkpoints.write().await;
        match checkpoints.iter_mut().find(|c| c.checkpoint_id == checkpoint_id) {
            Some(existing) => {
                existing.race_id = race_id;
                existing.references = references;
            }
            None => checkpoints.push(CheckpointEntry { race_id, checkpoint_id, references }),
        }
        debug!(race_id, checkpoint_id, "Checkpoint stored");
    }

    pub async fn remove_checkpoint(&self, checkpoint_id: i64) -> bool {
        let mut checkpoints = self.checkpoints.write().await;
        let before = checkpoints.len();
        checkpoints.retain(|c| c.checkpoint_id != checkpoint_id);
        checkpoints.len() != before
    }
}

#[async_trait::async_trait]
impl RouteSheetSource for MemoryRouteSheets {
    async fn list_references(&self, checkpoint_id: i64) -> Result<Vec<ReferencePoint>> {
        let checkpoints = self.checkpoints.read().await;
        let entry = checkpoints
            .iter()
            .find(|c| c.checkpoint_id == checkpoint_id)
            .ok_or_else(|| PaceError::source_failed(format!("unknown checkpoint {}", checkpoint_id)))?;

        let mut references = entry.references.clone();
        references.sort_by_key(|r| r.order_index);
        Ok(references)
    }

    async fn next_checkpoint_id(&self, checkpoint_id: i64) -> Result<Option<i64>> {
        let checkpoints = self.checkpoints.read().await;
        let position = checkpoints
            .iter()
            .position(|c| c.checkpoint_id == checkpoint_id)
            .ok_or_else(|| PaceError::source_failed(format!("unknown checkpoint {}", checkpoint_id)))?;

        let race_id = checkpoints[position].race_id;
        Ok(checkpoints[position + 1..].iter().find(|c| c.race_id == race_id).map(|c| c.checkpoint_id))
    }
}

/// Preferences held in memory.
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl PreferenceStore for MemoryPreferences {
    async fn get_preference(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set_preference(&self, key: &str, value: &str) -> Result<()> {
        self.values.write().await.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
