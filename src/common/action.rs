use serde::{Deserialize, Serialize};

/// Symbolic moves a detected gesture can translate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    DownKick,
    UpKick,
    Defense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    One,
    Two,
}

/// The per-frame output of the action mapper, already ordered left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerActions {
    pub player_one: Action,
    pub player_two: Action,
}

impl PlayerActions {
    pub fn new(player_one: Action, player_two: Action) -> Self {
        Self {
            player_one,
            player_two,
        }
    }

    pub fn for_player(&self, player: Player) -> Action {
        match player {
            Player::One => self.player_one,
            Player::Two => self.player_two,
        }
    }
}
