//! Loading `EmbedSettings` from RON files.
//!
//! Every field is optional in the file; omitted ones keep their defaults:
//!
//! ```ron
//! (
//!     domain_marker: "powerbi.com",
//!     quick: (timeout_ms: 5000),
//! )
//! ```

use std::io;
use std::path::{Path, PathBuf};

use embed_core::EmbedSettings;
use embed_logging::{embed_info, embed_warn};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings from {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse settings: {0}")]
    Parse(String),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

pub fn parse_settings(text: &str) -> Result<EmbedSettings, ConfigError> {
    let settings: EmbedSettings =
        ron::from_str(text).map_err(|err| ConfigError::Parse(err.to_string()))?;
    validate(&settings)?;
    Ok(settings)
}

pub fn load_settings(path: &Path) -> Result<EmbedSettings, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_settings(&text)
}

/// Missing file means defaults; an unreadable or invalid one is logged and
/// replaced by defaults.
pub fn load_settings_or_default(path: &Path) -> EmbedSettings {
    match load_settings(path) {
        Ok(settings) => {
            embed_info!("loaded settings from {:?}", path);
            settings
        }
        Err(ConfigError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            embed_info!("no settings at {:?}, using defaults", path);
            EmbedSettings::default()
        }
        Err(err) => {
            embed_warn!("{err}; using defaults");
            EmbedSettings::default()
        }
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn positive(field: &'static str, value: u64) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(invalid(field, "must be greater than zero"));
    }
    Ok(())
}

pub fn validate(settings: &EmbedSettings) -> Result<(), ConfigError> {
    let marker = settings.domain_marker.trim();
    if marker.is_empty() || marker.contains('/') || marker.contains(char::is_whitespace) {
        return Err(invalid("domain_marker", "must be a bare host name"));
    }

    positive("quick.timeout_ms", settings.quick.timeout_ms)?;
    let auth = &settings.authenticated;
    positive("authenticated.timeout_ms", auth.timeout_ms)?;
    positive("authenticated.poll_interval_ms", auth.poll_interval_ms)?;
    if auth.poll_max_checks == 0 {
        return Err(invalid("authenticated.poll_max_checks", "must be at least one"));
    }
    if auth.first_check_ms >= auth.timeout_ms {
        return Err(invalid(
            "authenticated.first_check_ms",
            "must be shorter than the authenticated timeout",
        ));
    }
    positive("forced.reveal_ms", settings.forced.reveal_ms)?;

    let popup = &settings.popup;
    if !(popup.screen_fraction > 0.0 && popup.screen_fraction <= 1.0) {
        return Err(invalid("popup.screen_fraction", "must be in (0, 1]"));
    }
    if popup.max_width == 0 || popup.max_height == 0 {
        return Err(invalid("popup.max_width", "popup caps must be non-zero"));
    }
    if popup.window_name.is_empty() {
        return Err(invalid("popup.window_name", "must not be empty"));
    }
    positive("popup.closure_poll_ms", popup.closure_poll_ms)?;
    Ok(())
}
