pub mod gesture_database;
pub mod provider;
pub mod scripted;

pub use gesture_database::{GestureDatabase, JsonGestureDatabase};
pub use provider::{BodyFrame, DiscreteResult, GestureFrame, SensorProvider};
pub use scripted::{ResourceLedger, ScriptedBody, ScriptedFrame, ScriptedProvider, SensorScript};
