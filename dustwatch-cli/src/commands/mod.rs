pub mod analyze;
pub mod classify;
pub mod render;
pub mod select;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use dustwatch_common::config::{default_config_path, EngineConfig};
use dustwatch_common::error::{DustwatchError, ErrorCategory};
use dustwatch_common::logging::{self, LogLevel};
use dustwatch_common::wallet_client::SnapshotFile;

/// Input rejected before any analysis ran.
pub const EXIT_INVALID_INPUT: i32 = 1;
/// The analysis could not be completed.
pub const EXIT_INCOMPLETE: i32 = 2;

/// Arguments shared by every subcommand.
#[derive(Clone, Debug, Args)]
pub struct SnapshotArgs {
    /// UTXO snapshot exported by the wallet client (JSON).
    #[arg(long, value_name = "FILE")]
    pub snapshot: PathBuf,
    /// Engine configuration (TOML). Falls back to the per-user config file,
    /// then to built-in defaults.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

pub struct Loaded {
    pub config: EngineConfig,
    pub snapshot: SnapshotFile,
}

fn resolve_config_path(explicit: Option<&PathBuf>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.clone()),
        None => Some(default_config_path()).filter(|path| path.is_file()),
    }
}

/// Load configuration, initialise logging and read the snapshot.
pub fn load(args: &SnapshotArgs, verbose: bool) -> Result<Loaded> {
    let mut config = match resolve_config_path(args.config.as_ref()) {
        Some(path) => EngineConfig::load(&path)
            .with_context(|| format!("could not load configuration {}", path.display()))?,
        None => {
            let mut config = EngineConfig::default();
            config.logging.level = LogLevel::Warn;
            config
        }
    };
    if verbose {
        config.logging.level = LogLevel::Debug;
    }
    if let Err(e) = logging::init(&config.logging) {
        eprintln!("warning: {e}");
    }

    let snapshot = SnapshotFile::load(&args.snapshot)?;
    Ok(Loaded { config, snapshot })
}

pub fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<DustwatchError>() {
        Some(e) if matches!(e.category(), ErrorCategory::Validation | ErrorCategory::Config) => {
            EXIT_INVALID_INPUT
        }
        _ => EXIT_INCOMPLETE,
    }
}

pub fn describe_error(err: &anyhow::Error) -> String {
    match err.downcast_ref::<DustwatchError>() {
        Some(e) => e.user_message(),
        None => format!("{err:#}"),
    }
}
