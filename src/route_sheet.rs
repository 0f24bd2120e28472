//! Route sheet model and speed-segment derivation
//!
//! A [`RouteSheet`] is the validated, ordered reference list of one checkpoint.
//! It is immutable once loaded; segments are derived on construction and looked
//! up with a binary search, so nothing is cached incrementally.

use tracing::debug;

use crate::types::{EventKind, ReferencePoint, SpeedSegment};
use crate::{PaceError, Result};

/// Split a reference list into runs of constant instructed speed.
///
/// A segment starts at index 0 and wherever the instructed speed differs from
/// the previous reference.
pub fn derive_segments(references: &[ReferencePoint]) -> Vec<SpeedSegment> {
    let mut segments: Vec<SpeedSegment> = Vec::new();
    for (index, reference) in references.iter().enumerate() {
        match segments.last() {
            Some(last) if last.speed == reference.instructed_speed => {}
            _ => segments
                .push(SpeedSegment { speed: reference.instructed_speed, start_reference_index: index }),
        }
    }
    segments
}

/// Index of the segment a reference belongs to: the last segment starting at
/// or before `reference_index`.
///
/// `segments` must be ordered by start index, as [`derive_segments`] returns them.
pub fn segment_index_for(segments: &[SpeedSegment], reference_index: usize) -> Option<usize> {
    let after = segments.partition_point(|s| s.start_reference_index <= reference_index);
    after.checked_sub(1)
}

/// Ordered, validated reference list for one checkpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSheet {
    checkpoint_id: i64,
    references: Vec<ReferencePoint>,
    segments: Vec<SpeedSegment>,
}

impl RouteSheet {
    /// Order references by `order_index` and check the sheet invariants.
    ///
    /// An empty list is accepted; recording against it fails later with
    /// [`PaceError::EmptyReferenceList`].
    pub fn new(checkpoint_id: i64, mut references: Vec<ReferencePoint>) -> Result<Self> {
        references.sort_by_key(|r| r.order_index);

        if let Some(first) = references.first() {
            if first.kind != EventKind::StartOfLeg {
                return Err(PaceError::invalid_route_sheet(format!(
                    "checkpoint {} starts with {} instead of LAR",
                    checkpoint_id, first.kind
                )));
            }
        }

        for pair in references.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if prev.order_index == next.order_index {
                return Err(PaceError::invalid_route_sheet(format!(
                    "duplicate order index {} in checkpoint {}",
                    next.order_index, checkpoint_id
                )));
            }
            if next.time <= prev.time {
                return Err(PaceError::invalid_route_sheet(format!(
                    "reference {} at {} is not after {}",
                    next.order_index, next.time, prev.time
                )));
            }
        }

        let segments = derive_segments(&references);
        debug!(
            checkpoint_id,
            references = references.len(),
            segments = segments.len(),
            "Route sheet loaded"
        );

        Ok(Self { checkpoint_id, references, segments })
    }

    pub fn checkpoint_id(&self) -> i64 {
        self.checkpoint_id
    }

    pub fn references(&self) -> &[ReferencePoint] {
        &self.references
    }

    pub fn segments(&self) -> &[SpeedSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    /// Reference at `index`.
    pub fn get(&self, index: usize) -> Result<&ReferencePoint> {
        self.references
            .get(index)
            .ok_or(PaceError::ReferenceIndexOutOfRange { index, len: self.references.len() })
    }

    /// The start-of-leg reference, if the sheet has any rows.
    pub fn start(&self) -> Option<&ReferencePoint> {
        self.references.first()
    }

    /// Segment index for a reference index.
    pub fn segment_index_for(&self, reference_index: usize) -> Option<usize> {
        segment_index_for(&self.segments, reference_index)
    }

    /// Segment containing a reference index.
    pub fn segment_for(&self, reference_index: usize) -> Option<&SpeedSegment> {
        self.segment_index_for(reference_index).map(|k| &self.segments[k])
    }
}
