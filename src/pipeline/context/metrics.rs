use std::time::Instant;

/// Counters collected while a single frame is processed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameMetrics {
    pub bodies_tracked: usize,
    pub rebinds: usize,
    pub detections: usize,
    pub dropped_detections: usize,
    pub recoverable_errors: usize,
    pub total_processing_duration_us: u64,
}

impl FrameMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finalize(&mut self, start_time: Instant) {
        self.total_processing_duration_us = start_time.elapsed().as_micros() as u64;
    }
}
