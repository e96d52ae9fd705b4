pub mod frame_context;
pub mod metrics;

pub use frame_context::{FrameContext, PlayerAssignment, PlayerRoster, MAX_PLAYERS};
pub use metrics::FrameMetrics;
