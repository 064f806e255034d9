use crate::error::{PaceError, Result};
use crate::models::TrackerConfig;
use log::{info, warn};
use std::path::Path;

/// Leser inn konfigurasjon fra disk (JSON).
/// Hvis filen ikke finnes, returneres standardoppsettet.
pub fn load_config(path: &str) -> Result<TrackerConfig> {
    if !Path::new(path).exists() {
        warn!("config not found at {}, using defaults", path);
        return Ok(TrackerConfig::default());
    }

    let contents = std::fs::read_to_string(path).map_err(|source| PaceError::Io {
        path: path.to_string(),
        source,
    })?;
    let cfg = parse_config(&contents).map_err(|e| match e {
        PaceError::ConfigParse { at, message, .. } => PaceError::ConfigParse {
            path: path.to_string(),
            at,
            message,
        },
        other => other,
    })?;
    info!(
        "config loaded from {} (alpha={}, window={} ms, locale={})",
        path, cfg.smoothing_alpha, cfg.window_ms, cfg.speech.locale
    );
    Ok(cfg)
}

/// Parser og validerer JSON. Feil peker på feltet som feilet.
pub fn parse_config(json: &str) -> Result<TrackerConfig> {
    let mut de = serde_json::Deserializer::from_str(json);
    let cfg: TrackerConfig =
        serde_path_to_error::deserialize(&mut de).map_err(|e| PaceError::ConfigParse {
            path: "<inline>".to_string(),
            at: e.path().to_string(),
            message: e.inner().to_string(),
        })?;
    cfg.validate()?;
    Ok(cfg)
}

/// Lagrer konfigurasjon til disk som JSON (pretty-print).
pub fn save_config(cfg: &TrackerConfig, path: &str) -> Result<()> {
    let json = serde_json::to_string_pretty(cfg)?;
    std::fs::write(path, json).map_err(|source| PaceError::Io {
        path: path.to_string(),
        source,
    })?;
    info!("config saved to {}", path);
    Ok(())
}
