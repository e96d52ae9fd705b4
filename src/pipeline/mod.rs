pub mod binder;
pub mod classifier;
pub mod context;
pub mod frame_processor;
pub mod mapper;
pub mod motion_table;
pub mod resolver;

pub use binder::{BindOutcome, IdentityBinder};
pub use classifier::{Detection, GestureClassifier};
pub use context::{FrameContext, FrameMetrics, PlayerAssignment, PlayerRoster};
pub use frame_processor::{FrameOutcome, FrameProcessor};
pub use mapper::ActionMapper;
pub use motion_table::MotionTable;
pub use resolver::{PlayerResolver, Resolution};
