use std::path::PathBuf;
use thiserror::Error;

// Main Application Error Type

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Startup Error: {0}")]
    Startup(#[from] StartupError),
    #[error("Provider Error: {0}")]
    Provider(#[from] ProviderError),
    #[error("Mapping Error: {0}")]
    Mapping(#[from] MappingError),
    #[error("Input Error: {0}")]
    Input(#[from] InputError),
    #[error("Configuration Error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("I/O Error: {0}")]
    Io(#[from] std::io::Error),
}

// Fatal errors, raised before the frame loop starts

#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Get sensor failed: {0}")]
    SensorUnavailable(String),
    #[error("Can't get body frame source: {0}")]
    BodySource(String),
    #[error("Can't read database file {path}: {reason}")]
    DatabaseLoad { path: PathBuf, reason: String },
    #[error("There is no gesture in the database {path}")]
    EmptyDatabase { path: PathBuf },
    #[error("Can't read the gesture list: {0}")]
    GestureList(String),
    #[error("Can't load sensor script {path}: {reason}")]
    Script { path: PathBuf, reason: String },
    #[error("Motion table has {table_len} entries but discrete gesture {index} needs one")]
    MotionTableIncomplete { index: usize, table_len: usize },
}

// Recoverable per-frame errors reported by the sensor provider

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("Failed to acquire body frame: {0}")]
    FrameAcquisition(String),
    #[error("Can't read body data: {0}")]
    BodyRefresh(String),
    #[error("Failed to query tracking id for slot {slot}: {reason}")]
    TrackingId { slot: usize, reason: String },
    #[error("Failed to bind gesture source {slot}: {reason}")]
    GestureBinding { slot: usize, reason: String },
    #[error("Failed to acquire gesture frame for slot {slot}: {reason}")]
    GestureFrame { slot: usize, reason: String },
    #[error("Failed to read joints for slot {slot}: {reason}")]
    Joint { slot: usize, reason: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    #[error("Gesture index {index} has no entry in the motion table ({table_len} entries)")]
    UnmappedGesture { index: usize, table_len: usize },
}

#[derive(Error, Debug)]
pub enum InputError {
    #[error("Failed to send key event: {0}")]
    Send(String),
    #[error("Key event channel is closed")]
    ChannelClosed,
}
