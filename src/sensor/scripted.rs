//! Deterministic sensor provider driven by a prerecorded script.
//!
//! Used by the binary's replay mode and as the fake provider in tests. The
//! script is a list of polls; `null` entries are polls with no frame ready.
//! Every frame handed out is counted in a [`ResourceLedger`] on acquisition
//! and again on drop, so callers can check that nothing leaks.

use crate::common::{BodySnapshot, Joint, JointTrackingState, TrackingId};
use crate::error::{ProviderError, StartupError};
use crate::sensor::provider::{BodyFrame, DiscreteResult, GestureFrame, SensorProvider};
use serde::Deserialize;
use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn default_true() -> bool {
    true
}

fn default_confidence() -> f32 {
    1.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct SensorScript {
    pub body_count: usize,
    #[serde(default)]
    pub frames: Vec<Option<ScriptedFrame>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScriptedFrame {
    pub refresh_fails: bool,
    pub bodies: Vec<ScriptedBody>,
}

impl ScriptedFrame {
    pub fn with_bodies(bodies: Vec<ScriptedBody>) -> Self {
        Self {
            refresh_fails: false,
            bodies,
        }
    }

    pub fn refresh_failure() -> Self {
        Self {
            refresh_fails: true,
            bodies: Vec::new(),
        }
    }

    fn body(&self, slot: usize) -> Option<&ScriptedBody> {
        self.bodies.iter().find(|body| body.slot == slot)
    }
}

/// A tracked body in one scripted frame. Slots without an entry are untracked.
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptedBody {
    pub slot: usize,
    /// `None` makes the identity query fail.
    #[serde(default)]
    pub tracking_id: Option<TrackingId>,
    /// `None` makes the joint query fail.
    #[serde(default)]
    pub head_x: Option<f32>,
    #[serde(default = "default_true")]
    pub head_tracked: bool,
    #[serde(default = "default_true")]
    pub gesture_valid: bool,
    #[serde(default)]
    pub gesture_frame_fails: bool,
    #[serde(default)]
    pub session_query_fails: bool,
    #[serde(default)]
    pub detections: Vec<ScriptedDetection>,
}

/// Builders for scripted scenarios in unit tests. Replay scripts are read from JSON.
#[cfg(test)]
impl ScriptedBody {
    pub fn new(slot: usize, tracking_id: TrackingId) -> Self {
        Self {
            slot,
            tracking_id: Some(tracking_id),
            head_x: Some(0.0),
            head_tracked: true,
            gesture_valid: true,
            gesture_frame_fails: false,
            session_query_fails: false,
            detections: Vec::new(),
        }
    }

    pub fn head_x(mut self, x: f32) -> Self {
        self.head_x = Some(x);
        self
    }

    pub fn detects(mut self, index: usize, confidence: f32) -> Self {
        self.detections.push(ScriptedDetection {
            index,
            confidence,
            detected: true,
        });
        self
    }

    pub fn reports(mut self, index: usize, confidence: f32) -> Self {
        self.detections.push(ScriptedDetection {
            index,
            confidence,
            detected: false,
        });
        self
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScriptedDetection {
    pub index: usize,
    #[serde(default = "default_confidence")]
    pub confidence: f32,
    #[serde(default = "default_true")]
    pub detected: bool,
}

/// Acquisition and release counters for provider-owned frames.
#[derive(Debug, Default)]
pub struct ResourceLedger {
    body_frames_acquired: AtomicUsize,
    body_frames_released: AtomicUsize,
    gesture_frames_acquired: AtomicUsize,
    gesture_frames_released: AtomicUsize,
}

impl ResourceLedger {
    pub fn body_frames_acquired(&self) -> usize {
        self.body_frames_acquired.load(Ordering::SeqCst)
    }

    pub fn gesture_frames_acquired(&self) -> usize {
        self.gesture_frames_acquired.load(Ordering::SeqCst)
    }

    pub fn outstanding(&self) -> usize {
        let acquired = self.body_frames_acquired() + self.gesture_frames_acquired();
        let released = self.body_frames_released.load(Ordering::SeqCst)
            + self.gesture_frames_released.load(Ordering::SeqCst);
        acquired - released
    }
}

pub struct ScriptedBodyFrame {
    frame: ScriptedFrame,
    body_count: usize,
    ledger: Arc<ResourceLedger>,
}

impl BodyFrame for ScriptedBodyFrame {
    fn refresh_bodies(&mut self) -> Result<Vec<BodySnapshot>, ProviderError> {
        if self.frame.refresh_fails {
            return Err(ProviderError::BodyRefresh(
                "scripted refresh failure".to_string(),
            ));
        }
        let snapshots = (0..self.body_count)
            .map(|slot| match self.frame.body(slot) {
                Some(body) => BodySnapshot {
                    slot,
                    tracked: true,
                    tracking_id: body.tracking_id.ok_or_else(|| ProviderError::TrackingId {
                        slot,
                        reason: "scripted identity failure".to_string(),
                    }),
                    head: body
                        .head_x
                        .map(|x| Joint {
                            x,
                            y: 0.0,
                            z: 0.0,
                            state: if body.head_tracked {
                                JointTrackingState::Tracked
                            } else {
                                JointTrackingState::NotTracked
                            },
                        })
                        .ok_or_else(|| ProviderError::Joint {
                            slot,
                            reason: "scripted joint failure".to_string(),
                        }),
                },
                None => BodySnapshot::untracked(slot),
            })
            .collect();
        Ok(snapshots)
    }
}

impl Drop for ScriptedBodyFrame {
    fn drop(&mut self) {
        self.ledger
            .body_frames_released
            .fetch_add(1, Ordering::SeqCst);
    }
}

pub struct ScriptedGestureFrame {
    tracking_id_valid: bool,
    results: HashMap<usize, DiscreteResult>,
    ledger: Arc<ResourceLedger>,
}

impl GestureFrame for ScriptedGestureFrame {
    fn is_tracking_id_valid(&self) -> bool {
        self.tracking_id_valid
    }

    fn discrete_result(&self, gesture_index: usize) -> Option<DiscreteResult> {
        self.results.get(&gesture_index).copied()
    }
}

impl Drop for ScriptedGestureFrame {
    fn drop(&mut self) {
        self.ledger
            .gesture_frames_released
            .fetch_add(1, Ordering::SeqCst);
    }
}

pub struct ScriptedProvider {
    body_count: usize,
    polls: VecDeque<Option<ScriptedFrame>>,
    current: Option<ScriptedFrame>,
    sessions: Vec<TrackingId>,
    ledger: Arc<ResourceLedger>,
}

impl ScriptedProvider {
    pub fn new(script: SensorScript) -> Self {
        Self {
            body_count: script.body_count,
            polls: script.frames.into(),
            current: None,
            sessions: vec![0; script.body_count],
            ledger: Arc::new(ResourceLedger::default()),
        }
    }

    pub fn from_frames(body_count: usize, frames: Vec<ScriptedFrame>) -> Self {
        Self::new(SensorScript {
            body_count,
            frames: frames.into_iter().map(Some).collect(),
        })
    }

    pub fn from_path(path: &Path) -> Result<Self, StartupError> {
        let script_error = |reason: String| StartupError::Script {
            path: path.to_path_buf(),
            reason,
        };
        let contents = std::fs::read_to_string(path).map_err(|e| script_error(e.to_string()))?;
        let script: SensorScript =
            serde_json::from_str(&contents).map_err(|e| script_error(e.to_string()))?;
        if script.body_count == 0 {
            return Err(StartupError::BodySource(format!(
                "script {} reports no body slots",
                path.display()
            )));
        }
        Ok(Self::new(script))
    }

    pub fn ledger(&self) -> Arc<ResourceLedger> {
        self.ledger.clone()
    }

    pub fn remaining_polls(&self) -> usize {
        self.polls.len()
    }

    fn check_slot(&self, slot: usize) -> Result<(), String> {
        if slot < self.body_count {
            Ok(())
        } else {
            Err(format!("slot {} out of range ({} slots)", slot, self.body_count))
        }
    }

    fn current_body(&self, slot: usize) -> Option<&ScriptedBody> {
        self.current.as_ref().and_then(|frame| frame.body(slot))
    }
}

impl SensorProvider for ScriptedProvider {
    type Frame = ScriptedBodyFrame;
    type Gesture = ScriptedGestureFrame;

    fn body_count(&self) -> usize {
        self.body_count
    }

    fn poll_frame(&mut self) -> Result<Option<Self::Frame>, ProviderError> {
        let Some(Some(frame)) = self.polls.pop_front() else {
            return Ok(None);
        };
        self.current = Some(frame.clone());
        self.ledger
            .body_frames_acquired
            .fetch_add(1, Ordering::SeqCst);
        Ok(Some(ScriptedBodyFrame {
            frame,
            body_count: self.body_count,
            ledger: self.ledger.clone(),
        }))
    }

    fn gesture_tracking_id(&self, slot: usize) -> Result<TrackingId, ProviderError> {
        self.check_slot(slot)
            .map_err(|reason| ProviderError::TrackingId { slot, reason })?;
        if self
            .current_body(slot)
            .is_some_and(|body| body.session_query_fails)
        {
            return Err(ProviderError::TrackingId {
                slot,
                reason: "scripted session query failure".to_string(),
            });
        }
        Ok(self.sessions[slot])
    }

    fn bind_gesture_session(
        &mut self,
        slot: usize,
        tracking_id: TrackingId,
    ) -> Result<(), ProviderError> {
        self.check_slot(slot)
            .map_err(|reason| ProviderError::GestureBinding { slot, reason })?;
        self.sessions[slot] = tracking_id;
        Ok(())
    }

    fn acquire_gesture_frame(
        &mut self,
        slot: usize,
    ) -> Result<Option<Self::Gesture>, ProviderError> {
        self.check_slot(slot)
            .map_err(|reason| ProviderError::GestureFrame { slot, reason })?;
        if self.current.is_none() {
            return Ok(None);
        }
        let body = self.current_body(slot);
        if body.is_some_and(|body| body.gesture_frame_fails) {
            return Err(ProviderError::GestureFrame {
                slot,
                reason: "scripted gesture frame failure".to_string(),
            });
        }
        let (tracking_id_valid, results) = match body {
            Some(body) => (
                body.gesture_valid && body.tracking_id == Some(self.sessions[slot]),
                body.detections
                    .iter()
                    .map(|d| {
                        (
                            d.index,
                            DiscreteResult {
                                detected: d.detected,
                                confidence: d.confidence,
                            },
                        )
                    })
                    .collect(),
            ),
            None => (false, HashMap::new()),
        };
        self.ledger
            .gesture_frames_acquired
            .fetch_add(1, Ordering::SeqCst);
        Ok(Some(ScriptedGestureFrame {
            tracking_id_valid,
            results,
            ledger: self.ledger.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untracked_slots_fill_the_refresh() {
        let mut provider = ScriptedProvider::from_frames(
            3,
            vec![ScriptedFrame::with_bodies(vec![ScriptedBody::new(1, 42)])],
        );
        let mut frame = provider.poll_frame().unwrap().unwrap();
        let bodies = frame.refresh_bodies().unwrap();
        assert_eq!(bodies.len(), 3);
        assert!(!bodies[0].tracked);
        assert!(bodies[1].tracked);
        assert_eq!(bodies[1].tracking_id, Ok(42));
        assert!(!bodies[2].tracked);
    }

    #[test]
    fn null_polls_yield_no_frame() {
        let script: SensorScript = serde_json::from_str(
            r#"{"body_count": 2, "frames": [null, {"bodies": [{"slot": 0, "tracking_id": 7}]}]}"#,
        )
        .unwrap();
        let mut provider = ScriptedProvider::new(script);
        assert!(provider.poll_frame().unwrap().is_none());
        assert!(provider.poll_frame().unwrap().is_some());
        assert!(provider.poll_frame().unwrap().is_none());
    }

    #[test]
    fn gesture_frame_is_valid_only_once_session_is_bound() {
        let mut provider = ScriptedProvider::from_frames(
            1,
            vec![ScriptedFrame::with_bodies(vec![
                ScriptedBody::new(0, 9).reports(1, 0.4).detects(2, 0.8)
            ])],
        );
        let _frame = provider.poll_frame().unwrap().unwrap();
        let unbound = provider.acquire_gesture_frame(0).unwrap().unwrap();
        assert!(!unbound.is_tracking_id_valid());

        provider.bind_gesture_session(0, 9).unwrap();
        let bound = provider.acquire_gesture_frame(0).unwrap().unwrap();
        assert!(bound.is_tracking_id_valid());
        assert_eq!(
            bound.discrete_result(2),
            Some(DiscreteResult {
                detected: true,
                confidence: 0.8
            })
        );
        assert!(!bound.discrete_result(1).unwrap().detected);
        assert_eq!(bound.discrete_result(0), None);
    }

    #[test]
    fn ledger_balances_after_frames_drop() {
        let mut provider = ScriptedProvider::from_frames(
            1,
            vec![ScriptedFrame::with_bodies(vec![ScriptedBody::new(0, 1)])],
        );
        let ledger = provider.ledger();
        {
            let _frame = provider.poll_frame().unwrap().unwrap();
            let _gesture = provider.acquire_gesture_frame(0).unwrap().unwrap();
            assert_eq!(ledger.outstanding(), 2);
        }
        assert_eq!(ledger.outstanding(), 0);
        assert_eq!(ledger.body_frames_acquired(), 1);
        assert_eq!(ledger.gesture_frames_acquired(), 1);
    }

    #[test]
    fn out_of_range_slot_is_an_error() {
        let mut provider = ScriptedProvider::from_frames(2, vec![]);
        assert!(provider.gesture_tracking_id(5).is_err());
        assert!(provider.bind_gesture_session(5, 1).is_err());
    }
}
