//! Route sheets loaded from a YAML race book
//!
//! ```yaml
//! race_id: 1
//! name: Rally de las Sierras
//! checkpoints:
//!   - id: 8
//!     references:
//!       - { time: "08:30:00:00", kind: LAR, speed: 82 }
//!       - { time: "08:31:46:55", kind: REF, speed: 82 }
//!       - { time: "08:35:34:18", kind: REF, speed: 82, control_zone: true }
//!       - { time: "08:40:00:00", kind: CVD, speed: 60, extra: 2.5 }
//! ```
//!
//! Rows are numbered in file order. Every checkpoint is validated on load.

use serde::Deserialize;
use std::path::Path;
use tracing::info;

use super::MemoryRouteSheets;
use crate::route_sheet::RouteSheet;
use crate::source::RouteSheetSource;
use crate::types::{EventKind, RaceTime, ReferencePoint};
use crate::{PaceError, Result};

/// Parsed race book.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RaceBook {
    #[serde(default)]
    pub race_id: i64,
    #[serde(default)]
    pub name: Option<String>,
    pub checkpoints: Vec<CheckpointRows>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckpointRows {
    pub id: i64,
    #[serde(default)]
    pub references: Vec<ReferenceRow>,
}

/// One route-sheet row as written in the file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReferenceRow {
    /// `HH:MM:SS:CC`
    pub time: String,
    pub kind: EventKind,
    pub speed: u32,
    #[serde(default)]
    pub extra: Option<f64>,
    #[serde(default)]
    pub control_zone: bool,
}

impl ReferenceRow {
    fn into_reference(self, order_index: i32) -> Result<ReferencePoint> {
        let time: RaceTime = self.time.parse()?;
        Ok(ReferencePoint {
            order_index,
            time,
            kind: self.kind,
            instructed_speed: self.speed,
            extra_value: self.extra,
            is_control_zone: self.control_zone,
        })
    }
}

impl RaceBook {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml_ng::from_str(yaml).map_err(|e| PaceError::config("race book", e.to_string()))
    }
}

/// [`RouteSheetSource`] backed by a YAML race book.
#[derive(Debug)]
pub struct YamlRouteSheets {
    name: Option<String>,
    sheets: MemoryRouteSheets,
}

impl YamlRouteSheets {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let book = RaceBook::from_yaml_str(yaml)?;
        let name = book.name.clone();
        let mut checkpoints = Vec::with_capacity(book.checkpoints.len());

        for checkpoint in book.checkpoints {
            let references = checkpoint
                .references
                .into_iter()
                .enumerate()
                .map(|(i, row)| row.into_reference(i as i32))
                .collect::<Result<Vec<_>>>()?;

            // Fail at load time rather than when the crew opens the leg
            RouteSheet::new(checkpoint.id, references.clone())?;

            if checkpoints.iter().any(|(_, id, _)| *id == checkpoint.id) {
                return Err(PaceError::invalid_route_sheet(format!(
                    "checkpoint {} listed twice",
                    checkpoint.id
                )));
            }
            checkpoints.push((book.race_id, checkpoint.id, references));
        }

        info!(race = ?name, checkpoints = checkpoints.len(), "Race book loaded");
        Ok(Self { name, sheets: MemoryRouteSheets::from_checkpoints(checkpoints) })
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| PaceError::file_error(path.to_path_buf(), e))?;
        Self::from_yaml_str(&yaml)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

#[async_trait::async_trait]
impl RouteSheetSource for YamlRouteSheets {
    async fn list_references(&self, checkpoint_id: i64) -> Result<Vec<ReferencePoint>> {
        self.sheets.list_references(checkpoint_id).await
    }

    async fn next_checkpoint_id(&self, checkpoint_id: i64) -> Result<Option<i64>> {
        self.sheets.next_checkpoint_id(checkpoint_id).await
    }
}
