use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GestureCategory {
    Discrete,
    Continuous,
}

impl GestureCategory {
    /// Short tag used when the catalog is listed at startup.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Discrete => "D",
            Self::Continuous => "C",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GestureDefinition {
    pub name: String,
    pub category: GestureCategory,
}

impl GestureDefinition {
    pub fn new(name: impl Into<String>, category: GestureCategory) -> Self {
        Self {
            name: name.into(),
            category,
        }
    }

    pub fn is_discrete(&self) -> bool {
        self.category == GestureCategory::Discrete
    }
}

/// Immutable, declaration-ordered list of gestures loaded once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GestureCatalog {
    gestures: Vec<GestureDefinition>,
}

impl GestureCatalog {
    pub fn new(gestures: Vec<GestureDefinition>) -> Self {
        Self { gestures }
    }

    pub fn len(&self) -> usize {
        self.gestures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gestures.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &GestureDefinition)> {
        self.gestures.iter().enumerate()
    }

    pub fn discrete(&self) -> impl Iterator<Item = (usize, &GestureDefinition)> {
        self.iter().filter(|(_, gesture)| gesture.is_discrete())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discrete_skips_continuous_entries_and_keeps_indices() {
        let catalog = GestureCatalog::new(vec![
            GestureDefinition::new("Defense", GestureCategory::Discrete),
            GestureDefinition::new("Lean", GestureCategory::Continuous),
            GestureDefinition::new("UpKick", GestureCategory::Discrete),
        ]);
        let indices: Vec<usize> = catalog.discrete().map(|(i, _)| i).collect();
        assert_eq!(indices, vec![0, 2]);
    }

    #[test]
    fn category_tags() {
        assert_eq!(GestureCategory::Discrete.tag(), "D");
        assert_eq!(GestureCategory::Continuous.tag(), "C");
    }
}
