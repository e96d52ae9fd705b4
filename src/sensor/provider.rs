use crate::common::{BodySnapshot, TrackingId};
use crate::error::ProviderError;

/// Result of one discrete gesture for one body in one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscreteResult {
    pub detected: bool,
    pub confidence: f32,
}

/// A body frame handed out by [`SensorProvider::poll_frame`].
///
/// Implementations release their provider-side resources on `Drop`, so a
/// frame is returned to the provider on every exit path of the frame cycle.
pub trait BodyFrame {
    /// Refresh the body slots from this frame. One snapshot per slot, in slot order.
    fn refresh_bodies(&mut self) -> Result<Vec<BodySnapshot>, ProviderError>;
}

/// Per-slot gesture frame. Released on `Drop` like [`BodyFrame`].
pub trait GestureFrame {
    /// Whether the gesture session is following a valid tracked body.
    fn is_tracking_id_valid(&self) -> bool;

    /// Sparse lookup keyed by catalog index.
    fn discrete_result(&self, gesture_index: usize) -> Option<DiscreteResult>;
}

/// Capability interface over the skeletal tracking and gesture recognition hardware.
pub trait SensorProvider {
    type Frame: BodyFrame;
    type Gesture: GestureFrame;

    /// Fixed for the lifetime of the provider.
    fn body_count(&self) -> usize;

    /// Non-blocking; `Ok(None)` when no new frame is ready.
    fn poll_frame(&mut self) -> Result<Option<Self::Frame>, ProviderError>;

    /// Tracking identity the slot's gesture session is currently bound to.
    fn gesture_tracking_id(&self, slot: usize) -> Result<TrackingId, ProviderError>;

    fn bind_gesture_session(
        &mut self,
        slot: usize,
        tracking_id: TrackingId,
    ) -> Result<(), ProviderError>;

    /// Latest gesture frame for the slot, `Ok(None)` if the session has none yet.
    fn acquire_gesture_frame(&mut self, slot: usize)
        -> Result<Option<Self::Gesture>, ProviderError>;
}
