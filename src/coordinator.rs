use crate::{
    config::Configuration,
    error::{AppError, StartupError},
    input::KeySink,
    pipeline::{FrameOutcome, FrameProcessor},
    sensor::SensorProvider,
};
use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub frames_processed: u64,
    pub emissions: u64,
    pub rebinds: u64,
    pub dropped_detections: u64,
    pub recoverable_errors: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunSummary {
    fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            frames_processed: 0,
            emissions: 0,
            rebinds: 0,
            dropped_detections: 0,
            recoverable_errors: 0,
            started_at,
            finished_at: None,
        }
    }

    fn record(&mut self, outcome: &FrameOutcome) {
        self.frames_processed += 1;
        if outcome.emitted.is_some() {
            self.emissions += 1;
        }
        self.rebinds += outcome.metrics.rebinds as u64;
        self.dropped_detections += outcome.metrics.dropped_detections as u64;
        self.recoverable_errors += outcome.metrics.recoverable_errors as u64;
    }
}

/// Drives the poll loop: one frame is fully processed before the next poll.
pub struct Coordinator<P: SensorProvider, S: KeySink> {
    provider: P,
    processor: FrameProcessor<S>,
    max_frames: Option<u64>,
    poll_interval: Duration,
    idle_timeout: Option<Duration>,
    cancel_token: CancellationToken,
}

impl<P: SensorProvider, S: KeySink> Coordinator<P, S> {
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn processor(&self) -> &FrameProcessor<S> {
        &self.processor
    }

    /// Runs until cancelled, the frame budget is spent, or no frame has
    /// arrived for the idle timeout.
    pub async fn run(&mut self) -> RunSummary {
        let mut summary = RunSummary::new(Utc::now());
        let mut last_frame_at = Instant::now();
        info!("Frame loop started");

        loop {
            if self.cancel_token.is_cancelled() {
                info!("Frame loop cancelled");
                break;
            }
            if let Some(max_frames) = self.max_frames {
                if summary.frames_processed >= max_frames {
                    info!("Processed frame budget of {}", max_frames);
                    break;
                }
            }

            match self.provider.poll_frame() {
                Ok(Some(frame)) => {
                    last_frame_at = Instant::now();
                    let outcome = self.processor.process(&mut self.provider, frame);
                    summary.record(&outcome);
                    // Back-to-back frames must still let the key consumer run.
                    tokio::task::yield_now().await;
                    continue;
                }
                Ok(None) => {}
                Err(e) => {
                    warn!("Poll failed: {}", e);
                    summary.recoverable_errors += 1;
                }
            }

            if let Some(idle_timeout) = self.idle_timeout {
                if last_frame_at.elapsed() >= idle_timeout {
                    info!("No frame for {:?}, stopping", idle_timeout);
                    break;
                }
            }

            tokio::select! {
                _ = self.cancel_token.cancelled() => {}
                _ = tokio::time::sleep(self.poll_interval) => {}
            }
        }

        summary.finished_at = Some(Utc::now());
        info!(
            "Frame loop stopped after {} frames: {} emissions, {} rebinds, {} dropped detections, {} recoverable errors",
            summary.frames_processed,
            summary.emissions,
            summary.rebinds,
            summary.dropped_detections,
            summary.recoverable_errors
        );
        summary
    }

    pub fn stop(&self) {
        self.cancel_token.cancel();
    }
}

impl<P: SensorProvider, S: KeySink> Drop for Coordinator<P, S> {
    fn drop(&mut self) {
        self.stop();
    }
}

pub struct CoordinatorBuilder<P: SensorProvider, S: KeySink> {
    configuration: Configuration,
    provider: Option<P>,
    processor: Option<FrameProcessor<S>>,
    cancel_token: Option<CancellationToken>,
}

impl<P: SensorProvider, S: KeySink> CoordinatorBuilder<P, S> {
    pub fn new(configuration: Configuration) -> Self {
        Self {
            configuration,
            provider: None,
            processor: None,
            cancel_token: None,
        }
    }

    // Caps the number of processed frames, this will override the default configuration.
    pub fn max_frames(mut self, max_frames: Option<u64>) -> Self {
        self.configuration.max_frames = max_frames;
        self
    }

    // Adjusts the wait between empty polls, this will override the default configuration.
    pub fn poll_interval_ms(mut self, poll_interval_ms: u64) -> Self {
        self.configuration.poll_interval_ms = poll_interval_ms;
        self
    }

    // Sets the idle timeout, this will override the default configuration.
    pub fn idle_timeout_ms(mut self, idle_timeout_ms: Option<u64>) -> Self {
        self.configuration.idle_timeout_ms = idle_timeout_ms;
        self
    }

    pub fn provider(mut self, provider: P) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn processor(mut self, processor: FrameProcessor<S>) -> Self {
        self.processor = Some(processor);
        self
    }

    pub fn cancel_token(mut self, cancel_token: CancellationToken) -> Self {
        self.cancel_token = Some(cancel_token);
        self
    }

    pub fn build(self) -> Result<Coordinator<P, S>, AppError> {
        self.configuration.validate()?;
        let provider = self.provider.ok_or_else(|| {
            StartupError::SensorUnavailable("No sensor provider configured".to_string())
        })?;
        let processor = self.processor.ok_or_else(|| {
            AppError::InvalidConfiguration("Frame processor not set".to_string())
        })?;
        Ok(Coordinator {
            provider,
            processor,
            max_frames: self.configuration.max_frames,
            poll_interval: self.configuration.poll_interval(),
            idle_timeout: self.configuration.idle_timeout(),
            cancel_token: self.cancel_token.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{GestureCatalog, GestureCategory, GestureDefinition};
    use crate::input::{ChannelKeySink, KeyMap, KeyboardInjector, RecordingKeySink};
    use crate::pipeline::MotionTable;
    use crate::sensor::{ScriptedBody, ScriptedFrame, ScriptedProvider, SensorScript};
    use std::sync::Arc;
    use tokio::sync::mpsc;

    fn processor_with<S: KeySink>(sink: S) -> FrameProcessor<S> {
        let catalog = GestureCatalog::new(
            ["Defense", "DownKick_L", "DownKick_R", "UpKick_L", "UpKick_R"]
                .into_iter()
                .map(|name| GestureDefinition::new(name, GestureCategory::Discrete))
                .collect(),
        );
        FrameProcessor::new(
            Arc::new(catalog),
            MotionTable::default(),
            KeyboardInjector::new(KeyMap::default(), sink),
        )
    }

    fn processor() -> FrameProcessor<RecordingKeySink> {
        processor_with(RecordingKeySink::default())
    }

    fn duel_frame() -> ScriptedFrame {
        ScriptedFrame::with_bodies(vec![
            ScriptedBody::new(0, 21).head_x(0.3).detects(1, 0.8),
            ScriptedBody::new(1, 22).head_x(-0.2).detects(3, 0.6),
        ])
    }

    fn builder(
        provider: ScriptedProvider,
    ) -> CoordinatorBuilder<ScriptedProvider, RecordingKeySink> {
        CoordinatorBuilder::new(Configuration::default())
            .poll_interval_ms(1)
            .provider(provider)
            .processor(processor())
    }

    #[tokio::test]
    async fn stops_at_frame_budget() {
        let provider = ScriptedProvider::from_frames(6, vec![duel_frame(); 3]);
        let mut coordinator = builder(provider).max_frames(Some(2)).build().unwrap();

        let summary = coordinator.run().await;

        assert_eq!(summary.frames_processed, 2);
        assert_eq!(summary.emissions, 2);
        assert_eq!(summary.rebinds, 2);
        assert_eq!(coordinator.provider().remaining_polls(), 1);
        assert_eq!(coordinator.processor().injector().sink().events.len(), 8);
    }

    #[tokio::test]
    async fn key_consumer_keeps_up_with_back_to_back_frames() {
        let (key_tx, mut key_rx) = mpsc::channel(64);
        let consumer = tokio::spawn(async move {
            let mut received = 0u64;
            while key_rx.recv().await.is_some() {
                received += 1;
            }
            received
        });
        let provider = ScriptedProvider::from_frames(6, vec![duel_frame(); 40]);
        let mut coordinator = CoordinatorBuilder::new(Configuration::default())
            .max_frames(Some(40))
            .poll_interval_ms(1)
            .provider(provider)
            .processor(processor_with(ChannelKeySink::new(key_tx)))
            .build()
            .unwrap();

        let summary = coordinator.run().await;
        drop(coordinator);
        let received = consumer.await.unwrap();

        assert_eq!(summary.frames_processed, 40);
        assert_eq!(summary.emissions, 40);
        assert_eq!(summary.recoverable_errors, 0);
        assert_eq!(received, 4 * summary.emissions);
    }

    #[tokio::test]
    async fn empty_polls_are_not_counted_as_frames() {
        let provider = ScriptedProvider::new(SensorScript {
            body_count: 6,
            frames: vec![None, Some(duel_frame()), None, None, Some(duel_frame())],
        });
        let ledger = provider.ledger();
        let mut coordinator = builder(provider).max_frames(Some(2)).build().unwrap();

        let summary = coordinator.run().await;

        assert_eq!(summary.frames_processed, 2);
        assert_eq!(summary.emissions, 2);
        assert_eq!(ledger.outstanding(), 0);
    }

    #[tokio::test]
    async fn idle_timeout_ends_the_run() {
        let provider = ScriptedProvider::from_frames(6, vec![duel_frame()]);
        let mut coordinator = builder(provider)
            .max_frames(None)
            .idle_timeout_ms(Some(20))
            .build()
            .unwrap();

        let summary = coordinator.run().await;

        assert_eq!(summary.frames_processed, 1);
        assert!(summary.finished_at.is_some());
    }

    #[tokio::test]
    async fn cancellation_stops_an_idle_loop() {
        let cancel_token = CancellationToken::new();
        let provider = ScriptedProvider::from_frames(6, vec![]);
        let mut coordinator = builder(provider)
            .max_frames(None)
            .cancel_token(cancel_token.clone())
            .build()
            .unwrap();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            cancel_token.cancel();
        });
        let summary = coordinator.run().await;

        assert_eq!(summary.frames_processed, 0);
    }

    #[test]
    fn build_requires_a_provider() {
        let result = CoordinatorBuilder::<ScriptedProvider, RecordingKeySink>::new(
            Configuration::default(),
        )
        .processor(processor())
        .build();
        assert!(matches!(
            result,
            Err(AppError::Startup(StartupError::SensorUnavailable(_)))
        ));
    }

    #[test]
    fn build_rejects_invalid_overrides() {
        let provider = ScriptedProvider::from_frames(6, vec![]);
        let result = builder(provider).poll_interval_ms(0).build();
        assert!(matches!(result, Err(AppError::InvalidConfiguration(_))));
    }
}
