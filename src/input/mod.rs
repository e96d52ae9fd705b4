pub mod injector;
pub mod key_map;

pub use injector::{ChannelKeySink, KeyEvent, KeyPhase, KeySink, KeyboardInjector, RecordingKeySink};
pub use key_map::{KeyMap, PlayerKeys};
