use crate::common::{Action, Player, PlayerActions};
use crate::error::InputError;
use crate::input::key_map::KeyMap;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPhase {
    Press,
    Release,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key_code: u16,
    pub scan_code: u16,
    pub phase: KeyPhase,
}

/// Destination for synthetic key events. A batch is accepted whole or not
/// at all, so a press never goes out without its release.
pub trait KeySink {
    fn send(&mut self, events: &[KeyEvent]) -> Result<(), InputError>;
}

/// Translates a pair of player actions into press/release key events.
pub struct KeyboardInjector<S: KeySink> {
    keys: KeyMap,
    sink: S,
}

impl<S: KeySink> KeyboardInjector<S> {
    pub fn new(keys: KeyMap, sink: S) -> Self {
        Self { keys, sink }
    }

    /// Player one's key is pressed and released before player two's.
    pub fn inject(&mut self, actions: PlayerActions) -> Result<(), InputError> {
        let mut events = Vec::with_capacity(4);
        for player in [Player::One, Player::Two] {
            self.press(player, actions.for_player(player), &mut events);
        }
        self.sink.send(&events)
    }

    fn press(&self, player: Player, action: Action, events: &mut Vec<KeyEvent>) {
        let key_code = self.keys.key_for(player, action);
        debug!("Pressing {:#04x} for {:?} {:?}", key_code, player, action);
        events.extend([KeyPhase::Press, KeyPhase::Release].map(|phase| KeyEvent {
            key_code,
            scan_code: self.keys.scan_code,
            phase,
        }));
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

/// Forwards key events to an mpsc channel without blocking the frame loop.
pub struct ChannelKeySink {
    tx: mpsc::Sender<KeyEvent>,
}

impl ChannelKeySink {
    pub fn new(tx: mpsc::Sender<KeyEvent>) -> Self {
        Self { tx }
    }
}

impl KeySink for ChannelKeySink {
    fn send(&mut self, events: &[KeyEvent]) -> Result<(), InputError> {
        match self.tx.try_reserve_many(events.len()) {
            Ok(permits) => {
                for (permit, event) in permits.zip(events) {
                    permit.send(*event);
                }
                Ok(())
            }
            Err(TrySendError::Full(_)) => {
                warn!("Dropping {} key events: channel full", events.len());
                Err(InputError::Send("channel full".to_string()))
            }
            Err(TrySendError::Closed(_)) => Err(InputError::ChannelClosed),
        }
    }
}

#[derive(Debug, Default)]
pub struct RecordingKeySink {
    pub events: Vec<KeyEvent>,
}

impl KeySink for RecordingKeySink {
    fn send(&mut self, events: &[KeyEvent]) -> Result<(), InputError> {
        self.events.extend_from_slice(events);
        Ok(())
    }
}
