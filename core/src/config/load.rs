use anyhow::Context;
use std::path::{Path, PathBuf};

use super::types::AppConfig;

/// Get the default folio data directory: ~/.folio
pub fn get_folio_data_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(PathBuf::from(home).join(".folio"))
}

pub fn load_default() -> anyhow::Result<AppConfig> {
    // Priority 1: ~/.folio/config.toml (highest)
    let folio_config = get_folio_data_dir()?.join("config.toml");

    // Priority 2: ./config.toml (current directory)
    let local_config = Path::new("config.toml");

    let mut cfg = if folio_config.exists() {
        load_from_file(&folio_config)?
    } else if local_config.exists() {
        load_from_file(local_config)?
    } else {
        AppConfig::default()
    };

    apply_env_overrides(&mut cfg)?;
    Ok(cfg)
}

pub fn load_from_file(path: &Path) -> anyhow::Result<AppConfig> {
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {:?}", path))?;
    toml::from_str::<AppConfig>(&s).with_context(|| format!("Invalid config file {:?}", path))
}

// Environment variable overrides (Priority 0: highest)
fn apply_env_overrides(cfg: &mut AppConfig) -> anyhow::Result<()> {
    if let Ok(v) = std::env::var("FOLIO_LOG_LEVEL") {
        if !v.trim().is_empty() {
            cfg.logging.level = v;
        }
    }

    if let Ok(v) = std::env::var("FOLIO_IMPORT_FETCH_TIMEOUT_MS") {
        let v = v.trim();
        if !v.is_empty() {
            let ms = v
                .parse::<u64>()
                .with_context(|| format!("FOLIO_IMPORT_FETCH_TIMEOUT_MS is not a number: {v}"))?;
            cfg.import.fetch_timeout_ms = Some(ms);
        }
    }

    Ok(())
}
