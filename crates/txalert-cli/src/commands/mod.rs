pub mod batch;
pub mod classify;
pub mod config;
pub mod sources;
pub mod watch;

use std::path::{Path, PathBuf};

use tracing::debug;

use txalert_core::{TransactionClassifier, TxAlertConfig};

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("txalert")
        .join("config.json")
}

/// Resolve the config file: the explicit path, else the default location.
pub fn config_path(explicit: Option<&str>) -> PathBuf {
    explicit.map(PathBuf::from).unwrap_or_else(default_config_path)
}

/// Load configuration, falling back to defaults when no file exists yet.
pub fn load_config(explicit: Option<&str>) -> anyhow::Result<TxAlertConfig> {
    let path = config_path(explicit);

    if path.exists() {
        debug!("Loading config from {}", path.display());
        Ok(TxAlertConfig::load(&path)?)
    } else if explicit.is_some() {
        anyhow::bail!("Config file not found: {}", path.display());
    } else {
        Ok(TxAlertConfig::default())
    }
}

/// Load the config at `path` for editing; a missing file yields defaults.
pub fn load_or_default(path: &Path) -> anyhow::Result<TxAlertConfig> {
    if path.exists() {
        Ok(TxAlertConfig::from_file(path)?)
    } else {
        Ok(TxAlertConfig::default())
    }
}

/// Build a classifier from the resolved configuration.
pub fn load_classifier(explicit: Option<&str>) -> anyhow::Result<TransactionClassifier> {
    let config = load_config(explicit)?;
    Ok(TransactionClassifier::from_config(&config)?)
}

/// Write `config` to `path`, creating parent directories.
pub fn save_config(config: &TxAlertConfig, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    config.save(path)?;
    Ok(())
}
