use crate::error::ProviderError;

/// Opaque per-person identifier assigned by the tracking provider.
pub type TrackingId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JointTrackingState {
    NotTracked,
    Inferred,
    Tracked,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Joint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub state: JointTrackingState,
}

impl Joint {
    pub fn is_tracked(&self) -> bool {
        self.state != JointTrackingState::NotTracked
    }
}

/// One body slot as reported by a refreshed body frame.
///
/// The identity and head queries are kept as results since the provider can
/// fail either of them independently of the tracked flag.
#[derive(Debug, Clone, PartialEq)]
pub struct BodySnapshot {
    pub slot: usize,
    pub tracked: bool,
    pub tracking_id: Result<TrackingId, ProviderError>,
    pub head: Result<Joint, ProviderError>,
}

impl BodySnapshot {
    pub fn untracked(slot: usize) -> Self {
        Self {
            slot,
            tracked: false,
            tracking_id: Err(ProviderError::TrackingId {
                slot,
                reason: "body is not tracked".to_string(),
            }),
            head: Err(ProviderError::Joint {
                slot,
                reason: "body is not tracked".to_string(),
            }),
        }
    }
}
