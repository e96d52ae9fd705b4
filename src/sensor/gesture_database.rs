use crate::common::{GestureCatalog, GestureDefinition};
use crate::error::StartupError;
use serde::Deserialize;
use std::path::Path;

/// Loads the gesture catalog once at startup.
pub trait GestureDatabase {
    fn load(&self, path: &Path) -> Result<GestureCatalog, StartupError>;
}

#[derive(Debug, Deserialize)]
struct DatabaseFile {
    gestures: Vec<GestureDefinition>,
}

/// Gesture database stored as a JSON document: `{"gestures": [{"name", "category"}]}`.
#[derive(Debug, Clone, Default)]
pub struct JsonGestureDatabase;

impl JsonGestureDatabase {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, path: &Path, contents: &str) -> Result<GestureCatalog, StartupError> {
        let file: DatabaseFile =
            serde_json::from_str(contents).map_err(|e| StartupError::DatabaseLoad {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        let catalog = GestureCatalog::new(file.gestures);
        if catalog.is_empty() {
            return Err(StartupError::EmptyDatabase {
                path: path.to_path_buf(),
            });
        }
        Ok(catalog)
    }
}

impl GestureDatabase for JsonGestureDatabase {
    fn load(&self, path: &Path) -> Result<GestureCatalog, StartupError> {
        let contents = std::fs::read_to_string(path).map_err(|e| StartupError::DatabaseLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        self.parse(path, &contents)
    }
}
