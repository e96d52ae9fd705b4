use crate::common::Action;
use crate::pipeline::context::metrics::FrameMetrics;
use std::time::Instant;
use uuid::Uuid;

/// At most this many players are resolved per frame.
pub const MAX_PLAYERS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerAssignment {
    pub slot: usize,
    pub action: Action,
    pub head_x: f32,
}

/// Assignments accumulated in body iteration order, capped at [`MAX_PLAYERS`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerRoster {
    assignments: Vec<PlayerAssignment>,
}

impl PlayerRoster {
    pub fn new() -> Self {
        Self {
            assignments: Vec::with_capacity(MAX_PLAYERS),
        }
    }

    /// Hands the assignment back when the roster is already full.
    pub fn try_push(&mut self, assignment: PlayerAssignment) -> Result<(), PlayerAssignment> {
        if self.is_full() {
            return Err(assignment);
        }
        self.assignments.push(assignment);
        Ok(())
    }

    pub fn is_full(&self) -> bool {
        self.assignments.len() >= MAX_PLAYERS
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn assignments(&self) -> &[PlayerAssignment] {
        &self.assignments
    }
}

/// State owned by one frame cycle. A new context is built for every frame
/// and consumed when the frame finishes, so nothing carries over.
pub struct FrameContext {
    id: Uuid,
    roster: PlayerRoster,
    metrics: FrameMetrics,
    processing_start: Instant,
}

impl FrameContext {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            roster: PlayerRoster::new(),
            metrics: FrameMetrics::new(),
            processing_start: Instant::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn roster(&self) -> &PlayerRoster {
        &self.roster
    }

    pub fn roster_mut(&mut self) -> &mut PlayerRoster {
        &mut self.roster
    }

    pub fn metrics_mut(&mut self) -> &mut FrameMetrics {
        &mut self.metrics
    }

    pub fn into_metrics(mut self) -> FrameMetrics {
        self.metrics.finalize(self.processing_start);
        self.metrics
    }
}

impl Default for FrameContext {
    fn default() -> Self {
        Self::new()
    }
}
