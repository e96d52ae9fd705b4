//! Fuses per-frame skeletal tracking and discrete gesture detection into a
//! two-player action signal, then turns that signal into key presses.

pub mod common;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod input;
pub mod pipeline;
pub mod sensor;

pub use error::{AppError, InputError, MappingError, ProviderError, StartupError};

pub use coordinator::{Coordinator, CoordinatorBuilder, RunSummary};
pub use pipeline::FrameProcessor;
