pub mod action;
pub mod body;
pub mod gesture;

pub use action::{Action, Player, PlayerActions};
pub use body::{BodySnapshot, Joint, JointTrackingState, TrackingId};
pub use gesture::{GestureCatalog, GestureCategory, GestureDefinition};
