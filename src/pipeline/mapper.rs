use crate::common::PlayerActions;
use crate::pipeline::context::PlayerRoster;

/// Orders the frame's two players left to right by head position.
#[derive(Debug, Clone, Default)]
pub struct ActionMapper;

impl ActionMapper {
    pub fn new() -> Self {
        Self
    }

    /// Emits only when exactly two players were resolved. Equal head positions
    /// fall back to slot order.
    pub fn map(&self, roster: &PlayerRoster) -> Option<PlayerActions> {
        let [first, second] = roster.assignments() else {
            return None;
        };
        let mut players = [first, second];
        players.sort_by(|a, b| a.head_x.total_cmp(&b.head_x).then(a.slot.cmp(&b.slot)));
        Some(PlayerActions::new(players[0].action, players[1].action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Action;
    use crate::pipeline::context::PlayerAssignment;

    fn roster(entries: &[(usize, Action, f32)]) -> PlayerRoster {
        let mut roster = PlayerRoster::new();
        for &(slot, action, head_x) in entries {
            roster
                .try_push(PlayerAssignment {
                    slot,
                    action,
                    head_x,
                })
                .unwrap();
        }
        roster
    }

    #[test]
    fn smaller_head_x_is_player_one_regardless_of_slot_order() {
        let mapper = ActionMapper::new();
        let left_first = roster(&[(0, Action::Defense, -0.5), (1, Action::UpKick, 0.5)]);
        let right_first = roster(&[(0, Action::UpKick, 0.5), (1, Action::Defense, -0.5)]);

        let expected = PlayerActions::new(Action::Defense, Action::UpKick);
        assert_eq!(mapper.map(&left_first), Some(expected));
        assert_eq!(mapper.map(&right_first), Some(expected));
    }

    #[test]
    fn equal_head_x_uses_slot_order() {
        let mapper = ActionMapper::new();
        let tied = roster(&[(4, Action::DownKick, 0.0), (1, Action::Defense, 0.0)]);
        assert_eq!(
            mapper.map(&tied),
            Some(PlayerActions::new(Action::Defense, Action::DownKick))
        );
    }

    #[test]
    fn fewer_than_two_players_emit_nothing() {
        let mapper = ActionMapper::new();
        assert_eq!(mapper.map(&PlayerRoster::new()), None);
        assert_eq!(mapper.map(&roster(&[(0, Action::UpKick, 0.1)])), None);
    }
}
