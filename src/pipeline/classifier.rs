use crate::common::GestureCatalog;
use crate::sensor::GestureFrame;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    pub gesture_index: usize,
    pub confidence: f32,
}

/// Picks the gesture a body performed in one frame.
pub struct GestureClassifier {
    catalog: Arc<GestureCatalog>,
}

impl GestureClassifier {
    pub fn new(catalog: Arc<GestureCatalog>) -> Self {
        Self { catalog }
    }

    /// Scans discrete gestures in catalog order and keeps the last one
    /// reported as detected. Confidence is reported, never compared.
    pub fn classify<G: GestureFrame>(&self, slot: usize, frame: &G) -> Option<Detection> {
        if !frame.is_tracking_id_valid() {
            return None;
        }

        let mut last = None;
        for (index, gesture) in self.catalog.discrete() {
            let Some(result) = frame.discrete_result(index) else {
                continue;
            };
            if !result.detected {
                continue;
            }
            info!(
                "Detected gesture {} @{} (slot {})",
                gesture.name, result.confidence, slot
            );
            last = Some(Detection {
                gesture_index: index,
                confidence: result.confidence,
            });
        }
        last
    }
}
