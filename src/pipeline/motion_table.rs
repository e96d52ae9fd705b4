use crate::common::{Action, GestureCatalog};
use crate::error::MappingError;

/// Maps a gesture's catalog index to the action it triggers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotionTable {
    entries: Vec<Action>,
}

impl MotionTable {
    pub fn new(entries: Vec<Action>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn action_for(&self, gesture_index: usize) -> Result<Action, MappingError> {
        self.entries
            .get(gesture_index)
            .copied()
            .ok_or(MappingError::UnmappedGesture {
                index: gesture_index,
                table_len: self.entries.len(),
            })
    }

    /// Discrete catalog entries that have no action.
    pub fn uncovered(&self, catalog: &GestureCatalog) -> Vec<usize> {
        catalog
            .discrete()
            .map(|(index, _)| index)
            .filter(|index| *index >= self.entries.len())
            .collect()
    }
}

impl Default for MotionTable {
    fn default() -> Self {
        Self::new(vec![
            Action::Defense,
            Action::DownKick,
            Action::DownKick,
            Action::UpKick,
            Action::UpKick,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{GestureCategory, GestureDefinition};

    #[test]
    fn lookup_beyond_table_fails_closed() {
        let table = MotionTable::default();
        assert_eq!(table.action_for(3), Ok(Action::UpKick));
        assert_eq!(
            table.action_for(5),
            Err(MappingError::UnmappedGesture {
                index: 5,
                table_len: 5
            })
        );
    }

    #[test]
    fn uncovered_ignores_continuous_gestures() {
        let table = MotionTable::new(vec![Action::Defense]);
        let catalog = GestureCatalog::new(vec![
            GestureDefinition::new("Defense", GestureCategory::Discrete),
            GestureDefinition::new("Lean", GestureCategory::Continuous),
            GestureDefinition::new("UpKick", GestureCategory::Discrete),
        ]);
        assert_eq!(table.uncovered(&catalog), vec![2]);
    }
}
