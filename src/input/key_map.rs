use crate::common::{Action, Player};
use serde::{Deserialize, Serialize};

/// Virtual key codes for one player's three moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerKeys {
    pub down_kick: u16,
    pub up_kick: u16,
    pub defense: u16,
}

impl PlayerKeys {
    pub fn key_for(&self, action: Action) -> u16 {
        match action {
            Action::DownKick => self.down_kick,
            Action::UpKick => self.up_kick,
            Action::Defense => self.defense,
        }
    }

    fn codes(&self) -> [u16; 3] {
        [self.down_kick, self.up_kick, self.defense]
    }
}

/// Static action to key table for both players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyMap {
    pub player_one: PlayerKeys,
    pub player_two: PlayerKeys,
    pub scan_code: u16,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            // W, Q, E
            player_one: PlayerKeys {
                down_kick: 0x57,
                up_kick: 0x51,
                defense: 0x45,
            },
            // U, Y, I
            player_two: PlayerKeys {
                down_kick: 0x55,
                up_kick: 0x59,
                defense: 0x49,
            },
            scan_code: 0x1E,
        }
    }
}

impl KeyMap {
    pub fn key_for(&self, player: Player, action: Action) -> u16 {
        match player {
            Player::One => self.player_one.key_for(action),
            Player::Two => self.player_two.key_for(action),
        }
    }

    /// Every action must resolve to a distinct key, within and across players.
    pub fn validate(&self) -> Result<(), String> {
        let mut codes: Vec<u16> = self
            .player_one
            .codes()
            .into_iter()
            .chain(self.player_two.codes())
            .collect();
        codes.sort_unstable();
        if let Some(pair) = codes.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(format!("Key code {:#04x} is bound more than once", pair[0]));
        }
        Ok(())
    }
}
