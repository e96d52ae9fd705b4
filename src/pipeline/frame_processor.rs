use crate::common::{BodySnapshot, GestureCatalog, PlayerActions};
use crate::input::{KeySink, KeyboardInjector};
use crate::pipeline::binder::{BindOutcome, IdentityBinder};
use crate::pipeline::classifier::GestureClassifier;
use crate::pipeline::context::{FrameContext, FrameMetrics};
use crate::pipeline::mapper::ActionMapper;
use crate::pipeline::motion_table::MotionTable;
use crate::pipeline::resolver::{PlayerResolver, Resolution};
use crate::sensor::{BodyFrame, SensorProvider};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// What one frame cycle produced.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutcome {
    pub frame_id: Uuid,
    pub players: usize,
    pub emitted: Option<PlayerActions>,
    pub metrics: FrameMetrics,
}

/// Runs bind, classify and resolve for every tracked body of a frame, then
/// maps and injects the result. Owns no per-frame state between calls.
pub struct FrameProcessor<S: KeySink> {
    binder: IdentityBinder,
    classifier: GestureClassifier,
    resolver: PlayerResolver,
    mapper: ActionMapper,
    injector: KeyboardInjector<S>,
}

impl<S: KeySink> FrameProcessor<S> {
    pub fn new(
        catalog: Arc<GestureCatalog>,
        motion_table: MotionTable,
        injector: KeyboardInjector<S>,
    ) -> Self {
        Self {
            binder: IdentityBinder::new(),
            classifier: GestureClassifier::new(catalog),
            resolver: PlayerResolver::new(motion_table),
            mapper: ActionMapper::new(),
            injector,
        }
    }

    /// Takes ownership of the frame so it is released when this returns,
    /// whichever path is taken.
    pub fn process<P: SensorProvider>(
        &mut self,
        provider: &mut P,
        mut frame: P::Frame,
    ) -> FrameOutcome {
        let mut context = FrameContext::new();

        let bodies = match frame.refresh_bodies() {
            Ok(bodies) => bodies,
            Err(e) => {
                warn!("Frame {}: {}", context.id(), e);
                context.metrics_mut().recoverable_errors += 1;
                return Self::finish(context, None);
            }
        };

        for body in bodies.iter().filter(|body| body.tracked) {
            // Slots after the second player are neither bound nor classified.
            if context.roster().is_full() {
                debug!(
                    "Frame {}: two players resolved, skipping slots from {}",
                    context.id(),
                    body.slot
                );
                break;
            }
            context.metrics_mut().bodies_tracked += 1;
            self.process_body(provider, &mut context, body);
        }

        let emitted = match self.mapper.map(context.roster()) {
            Some(actions) => {
                debug!(
                    "Frame {}: player 1 {:?}, player 2 {:?}",
                    context.id(),
                    actions.player_one,
                    actions.player_two
                );
                match self.injector.inject(actions) {
                    Ok(()) => Some(actions),
                    Err(e) => {
                        warn!("Frame {}: {}", context.id(), e);
                        context.metrics_mut().recoverable_errors += 1;
                        None
                    }
                }
            }
            None => None,
        };

        Self::finish(context, emitted)
    }

    fn process_body<P: SensorProvider>(
        &self,
        provider: &mut P,
        context: &mut FrameContext,
        body: &BodySnapshot,
    ) {
        let tracking_id = match &body.tracking_id {
            Ok(id) => *id,
            Err(e) => {
                warn!("Frame {}: {}", context.id(), e);
                context.metrics_mut().recoverable_errors += 1;
                return;
            }
        };

        match self.binder.bind(provider, body.slot, tracking_id) {
            Ok(BindOutcome::Rebound { .. }) => context.metrics_mut().rebinds += 1,
            Ok(BindOutcome::Unchanged) => {}
            Err(e) => {
                warn!("Frame {}: {}", context.id(), e);
                context.metrics_mut().recoverable_errors += 1;
                return;
            }
        }

        let gesture_frame = match provider.acquire_gesture_frame(body.slot) {
            Ok(Some(gesture_frame)) => gesture_frame,
            Ok(None) => return,
            Err(e) => {
                warn!("Frame {}: {}", context.id(), e);
                context.metrics_mut().recoverable_errors += 1;
                return;
            }
        };
        let Some(detection) = self.classifier.classify(body.slot, &gesture_frame) else {
            return;
        };
        drop(gesture_frame);
        context.metrics_mut().detections += 1;

        match self.resolver.resolve(context.roster_mut(), body, detection) {
            Ok(Resolution::Assigned(assignment)) => debug!(
                "Frame {}: slot {} resolved to {:?} at x={}",
                context.id(),
                assignment.slot,
                assignment.action,
                assignment.head_x
            ),
            Ok(Resolution::HeadNotTracked) => {
                debug!(
                    "Frame {}: head of slot {} not tracked, detection dropped",
                    context.id(),
                    body.slot
                );
                context.metrics_mut().dropped_detections += 1;
            }
            Ok(Resolution::RosterFull) => context.metrics_mut().dropped_detections += 1,
            Err(e) => {
                warn!("Frame {}: {}", context.id(), e);
                let metrics = context.metrics_mut();
                metrics.dropped_detections += 1;
                metrics.recoverable_errors += 1;
            }
        }
    }

    fn finish(context: FrameContext, emitted: Option<PlayerActions>) -> FrameOutcome {
        let frame_id = context.id();
        let players = context.roster().len();
        let metrics = context.into_metrics();
        debug!(
            "Frame {} processed in {}us",
            frame_id, metrics.total_processing_duration_us
        );
        FrameOutcome {
            frame_id,
            players,
            emitted,
            metrics,
        }
    }

    pub fn injector(&self) -> &KeyboardInjector<S> {
        &self.injector
    }
}
