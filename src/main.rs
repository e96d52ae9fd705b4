use motion_duel::common::GestureCatalog;
use motion_duel::config::{Configuration, DEFAULT_CONFIG_PATH};
use motion_duel::input::{ChannelKeySink, KeyEvent, KeyboardInjector};
use motion_duel::sensor::{GestureDatabase, JsonGestureDatabase, ScriptedProvider, SensorProvider};
use motion_duel::{AppError, CoordinatorBuilder, FrameProcessor, StartupError};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn, Level};

const KEY_EVENT_BUFFER: usize = 64;

fn init_logging(level: &str) {
    let level = level.parse::<Level>().unwrap_or(Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let configuration = Configuration::load(&config_path)?;
    init_logging(&configuration.log_level);

    if let Err(e) = run(configuration).await {
        error!("{}", e);
        return Err(e);
    }
    Ok(())
}

async fn run(configuration: Configuration) -> Result<(), AppError> {
    info!("Try to get default sensor");
    let replay_path = configuration.replay_path.clone().ok_or_else(|| {
        StartupError::SensorUnavailable("no sensor session configured (replay_path)".to_string())
    })?;
    info!("Try to open sensor {}", replay_path.display());
    let provider = ScriptedProvider::from_path(&replay_path)?;
    info!(" > Can trace {} bodies", provider.body_count());

    let database_path = match &configuration.database_path {
        Some(path) => path.clone(),
        None => prompt_database_path()?,
    };
    info!("Try to load gesture database file {}", database_path.display());
    let catalog = JsonGestureDatabase::new().load(&database_path)?;
    log_catalog(&catalog);

    let motion_table = configuration.motion_table();
    let uncovered = motion_table.uncovered(&catalog);
    if let Some(&index) = uncovered.first() {
        if configuration.strict_motion_table {
            return Err(StartupError::MotionTableIncomplete {
                index,
                table_len: motion_table.len(),
            }
            .into());
        }
        warn!(
            "Discrete gestures {:?} have no motion table entry, their detections will be dropped",
            uncovered
        );
    }

    let (key_tx, key_rx) = mpsc::channel(KEY_EVENT_BUFFER);
    let key_task = tokio::spawn(log_key_events(key_rx));
    let processor = FrameProcessor::new(
        Arc::new(catalog),
        motion_table,
        KeyboardInjector::new(configuration.keys, ChannelKeySink::new(key_tx)),
    );

    let cancel_token = CancellationToken::new();
    let ctrl_c_token = cancel_token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, stopping");
            ctrl_c_token.cancel();
        }
    });

    let mut coordinator = CoordinatorBuilder::new(configuration)
        .provider(provider)
        .processor(processor)
        .cancel_token(cancel_token)
        .build()?;
    coordinator.run().await;
    drop(coordinator);

    if let Err(e) = key_task.await {
        warn!("Key event task failed: {}", e);
    }
    Ok(())
}

fn log_catalog(catalog: &GestureCatalog) {
    info!("There are {} gestures in the database:", catalog.len());
    for (_, gesture) in catalog.iter() {
        info!("\t[{}] {}", gesture.category.tag(), gesture.name);
    }
}

/// Stands in for the OS keyboard: every synthetic key event is logged.
async fn log_key_events(mut key_rx: mpsc::Receiver<KeyEvent>) {
    while let Some(event) = key_rx.recv().await {
        info!(
            "Key {:#04x} {:?} (scan {:#04x})",
            event.key_code, event.phase, event.scan_code
        );
    }
}

fn prompt_database_path() -> Result<PathBuf, AppError> {
    print!("DataBase: ");
    io::stdout().flush()?;
    let mut buf = String::new();
    io::stdin().read_line(&mut buf)?;
    let path = buf.trim();
    if path.is_empty() {
        return Err(StartupError::DatabaseLoad {
            path: PathBuf::new(),
            reason: "no database path given".to_string(),
        }
        .into());
    }
    Ok(PathBuf::from(path))
}
