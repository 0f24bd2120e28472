//! Collaborator interfaces for route sheets and preferences

use crate::Result;
use crate::types::ReferencePoint;

/// Source of checkpoint route sheets
///
/// Persistence and editing of races, checkpoints and references live outside
/// the engine; this is the narrow read interface the session needs.
#[async_trait::async_trait]
pub trait RouteSheetSource: Send + Sync + 'static {
    /// Reference points of a checkpoint, ordered by `order_index`.
    ///
    /// Returns:
    /// - `Ok(refs)` - Possibly empty list
    /// - `Err(e)` - The checkpoint does not exist or the store failed
    async fn list_references(&self, checkpoint_id: i64) -> Result<Vec<ReferencePoint>>;

    /// The checkpoint that follows `checkpoint_id` in its race, if any.
    async fn next_checkpoint_id(&self, checkpoint_id: i64) -> Result<Option<i64>>;
}

/// Key/value preference store
#[async_trait::async_trait]
pub trait PreferenceStore: Send + Sync + 'static {
    async fn get_preference(&self, key: &str) -> Result<Option<String>>;

    async fn set_preference(&self, key: &str, value: &str) -> Result<()>;
}
