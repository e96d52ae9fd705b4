use crate::common::BodySnapshot;
use crate::error::AppError;
use crate::pipeline::classifier::Detection;
use crate::pipeline::context::{PlayerAssignment, PlayerRoster};
use crate::pipeline::motion_table::MotionTable;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    Assigned(PlayerAssignment),
    /// The head joint exists but is not tracked, so the body cannot be placed.
    HeadNotTracked,
    RosterFull,
}

/// Turns a body's detection into a player assignment for the current frame.
pub struct PlayerResolver {
    motion_table: MotionTable,
}

impl PlayerResolver {
    pub fn new(motion_table: MotionTable) -> Self {
        Self { motion_table }
    }

    pub fn resolve(
        &self,
        roster: &mut PlayerRoster,
        body: &BodySnapshot,
        detection: Detection,
    ) -> Result<Resolution, AppError> {
        if roster.is_full() {
            return Ok(Resolution::RosterFull);
        }
        let action = self.motion_table.action_for(detection.gesture_index)?;
        let head = body.head.clone()?;
        if !head.is_tracked() {
            return Ok(Resolution::HeadNotTracked);
        }

        let assignment = PlayerAssignment {
            slot: body.slot,
            action,
            head_x: head.x,
        };
        match roster.try_push(assignment) {
            Ok(()) => Ok(Resolution::Assigned(assignment)),
            Err(_) => Ok(Resolution::RosterFull),
        }
    }
}
