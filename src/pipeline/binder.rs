use crate::common::TrackingId;
use crate::error::ProviderError;
use crate::sensor::SensorProvider;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindOutcome {
    Unchanged,
    Rebound {
        previous: TrackingId,
        current: TrackingId,
    },
}

/// Keeps each slot's gesture session pointed at the body currently in that slot.
#[derive(Debug, Clone, Default)]
pub struct IdentityBinder;

impl IdentityBinder {
    pub fn new() -> Self {
        Self
    }

    pub fn bind<P: SensorProvider>(
        &self,
        provider: &mut P,
        slot: usize,
        current: TrackingId,
    ) -> Result<BindOutcome, ProviderError> {
        let previous = provider.gesture_tracking_id(slot)?;
        if previous == current {
            return Ok(BindOutcome::Unchanged);
        }
        provider.bind_gesture_session(slot, current)?;
        info!("Gesture source {} start to track user {}", slot, current);
        Ok(BindOutcome::Rebound { previous, current })
    }
}
