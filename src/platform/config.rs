// ClassDesk - platform/config.rs
//
// Platform directory resolution and config.toml loading with startup
// validation. Every value is checked against the named constants in
// util::constants; bad values produce a warning and keep the default.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::api::client::parse_base_url;
use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for ClassDesk configuration and data.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/classdesk/ or %APPDATA%\ClassDesk\config\)
    pub config_dir: PathBuf,

    /// Data directory for the session file.
    pub data_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            let data_dir = proj_dirs.data_dir().to_path_buf();

            tracing::debug!(
                config = %config_dir.display(),
                data = %data_dir.display(),
                "Platform paths resolved"
            );

            Self {
                config_dir,
                data_dir,
            }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            let fallback = PathBuf::from(".");
            Self {
                config_dir: fallback.clone(),
                data_dir: fallback,
            }
        }
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are ignored so a newer config file still loads in an older
/// binary.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    pub server: ServerSection,
    pub ui: UiSection,
    pub logging: LoggingSection,
}

/// `[server]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// Base URL of the classroom API, e.g. "https://school.example".
    pub base_url: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

/// `[ui]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct UiSection {
    /// Theme: "dark" or "light".
    pub theme: Option<String>,
    /// Body font size in points.
    pub font_size: Option<f32>,
    /// Seconds between classroom summary refreshes.
    pub refresh_interval_secs: Option<u64>,
    /// Seconds a success or info banner stays visible.
    pub banner_timeout_secs: Option<u64>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    // -- Server --
    pub base_url: String,
    pub timeout_secs: u64,

    // -- UI --
    /// Dark mode (true) or light mode (false).
    pub dark_mode: bool,
    pub font_size: f32,
    pub refresh_interval_secs: u64,
    pub banner_timeout_secs: u64,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: constants::DEFAULT_BASE_URL.to_string(),
            timeout_secs: constants::DEFAULT_REQUEST_TIMEOUT_SECS,
            dark_mode: true,
            font_size: constants::DEFAULT_FONT_SIZE,
            refresh_interval_secs: constants::SUMMARY_REFRESH_SECS,
            banner_timeout_secs: constants::BANNER_TIMEOUT_SECS,
            log_level: None,
        }
    }
}

/// Path of config.toml inside `config_dir`.
pub fn config_path(config_dir: &Path) -> PathBuf {
    config_dir.join(constants::CONFIG_FILE_NAME)
}

/// Read and parse config.toml. `Ok(None)` when the file does not exist.
pub fn read_raw_config(path: &Path) -> Result<Option<RawConfig>, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };
    toml::from_str(&content)
        .map(Some)
        .map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Load and validate `config.toml` from the given config directory.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// A missing file yields defaults with no warnings (first run). An unreadable
/// or unparseable file yields defaults with one warning; the application still
/// starts but the user is told.
pub fn load_config(config_dir: &Path) -> (AppConfig, Vec<String>) {
    let path = config_path(config_dir);
    let mut warnings: Vec<String> = Vec::new();

    let raw = match read_raw_config(&path) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::debug!(path = %path.display(), "No config.toml found; using defaults");
            return (AppConfig::default(), warnings);
        }
        Err(e) => {
            let msg = format!("{e}. Using defaults.");
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (AppConfig::default(), warnings);
        }
    };

    tracing::info!(path = %path.display(), "Loaded config.toml");
    let config = validate(raw, &mut warnings);

    if !warnings.is_empty() {
        tracing::warn!(
            count = warnings.len(),
            "Config validation produced warnings"
        );
    }
    (config, warnings)
}

/// Check each field against named constants, accumulating all warnings.
pub fn validate(raw: RawConfig, warnings: &mut Vec<String>) -> AppConfig {
    let mut config = AppConfig::default();

    // -- Server: base_url --
    if let Some(url) = raw.server.base_url {
        match parse_base_url(&url) {
            Ok(_) => config.base_url = url.trim().to_string(),
            Err(e) => warnings.push(format!(
                "[server] base_url: {e}. Using default ({}).",
                constants::DEFAULT_BASE_URL,
            )),
        }
    }

    // -- Server: timeout_secs --
    if let Some(secs) = raw.server.timeout_secs {
        if (constants::MIN_REQUEST_TIMEOUT_SECS..=constants::MAX_REQUEST_TIMEOUT_SECS)
            .contains(&secs)
        {
            config.timeout_secs = secs;
        } else {
            warnings.push(format!(
                "[server] timeout_secs = {secs} is out of range ({}-{}). Using default ({}).",
                constants::MIN_REQUEST_TIMEOUT_SECS,
                constants::MAX_REQUEST_TIMEOUT_SECS,
                constants::DEFAULT_REQUEST_TIMEOUT_SECS,
            ));
        }
    }

    // -- UI: theme --
    if let Some(ref theme) = raw.ui.theme {
        match theme.to_lowercase().as_str() {
            "dark" => config.dark_mode = true,
            "light" => config.dark_mode = false,
            other => {
                warnings.push(format!(
                    "[ui] theme = \"{other}\" is not recognised. Expected \"dark\" or \"light\". Using default (dark).",
                ));
            }
        }
    }

    // -- UI: font_size --
    if let Some(size) = raw.ui.font_size {
        if (constants::MIN_FONT_SIZE..=constants::MAX_FONT_SIZE).contains(&size) {
            config.font_size = size;
        } else {
            warnings.push(format!(
                "[ui] font_size = {size} is out of range ({}-{}). Using default ({}).",
                constants::MIN_FONT_SIZE,
                constants::MAX_FONT_SIZE,
                constants::DEFAULT_FONT_SIZE,
            ));
        }
    }

    // -- UI: refresh_interval_secs --
    if let Some(secs) = raw.ui.refresh_interval_secs {
        if (constants::MIN_SUMMARY_REFRESH_SECS..=constants::MAX_SUMMARY_REFRESH_SECS)
            .contains(&secs)
        {
            config.refresh_interval_secs = secs;
        } else {
            warnings.push(format!(
                "[ui] refresh_interval_secs = {secs} is out of range ({}-{}). Using default ({}).",
                constants::MIN_SUMMARY_REFRESH_SECS,
                constants::MAX_SUMMARY_REFRESH_SECS,
                constants::SUMMARY_REFRESH_SECS,
            ));
        }
    }

    // -- UI: banner_timeout_secs --
    if let Some(secs) = raw.ui.banner_timeout_secs {
        if (constants::MIN_BANNER_TIMEOUT_SECS..=constants::MAX_BANNER_TIMEOUT_SECS)
            .contains(&secs)
        {
            config.banner_timeout_secs = secs;
        } else {
            warnings.push(format!(
                "[ui] banner_timeout_secs = {secs} is out of range ({}-{}). Using default ({}).",
                constants::MIN_BANNER_TIMEOUT_SECS,
                constants::MAX_BANNER_TIMEOUT_SECS,
                constants::BANNER_TIMEOUT_SECS,
            ));
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.clone());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default ({}).",
                constants::DEFAULT_LOG_LEVEL,
            ));
        }
    }

    config
}
