// ClassDesk - util/logging.rs
//
// stderr logging through tracing-subscriber. The level comes from, in order:
// RUST_LOG, --debug, `[logging] level` in config.toml, then the default.
//
// Debug output is for ClassDesk itself. The HTTP stack and the windowing
// crates stay at their quieter levels unless RUST_LOG asks otherwise.
//
// Bearer tokens and student personal data are never logged; ids and counts
// are.

use super::constants::{APP_NAME, APP_VERSION, DEFAULT_LOG_LEVEL};
use tracing_subscriber::EnvFilter;

/// Per-crate levels applied on top of the chosen ClassDesk level.
const DEPENDENCY_LEVELS: &str = "reqwest=info,hyper=warn,hyper_util=warn,winit=warn,eframe=info,egui_glow=warn";

/// The filter directive to use. `rust_log` wins outright; otherwise the
/// app runs at `debug` (with `--debug`), the configured level, or the
/// default, with dependency crates held back.
pub fn filter_directive(
    rust_log: Option<&str>,
    debug_flag: bool,
    config_level: Option<&str>,
) -> String {
    if let Some(directive) = rust_log.map(str::trim).filter(|d| !d.is_empty()) {
        return directive.to_string();
    }
    let level = if debug_flag {
        "debug"
    } else {
        config_level
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(DEFAULT_LOG_LEVEL)
    };
    format!("{level},{DEPENDENCY_LEVELS}")
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init(debug_flag: bool, config_level: Option<&str>) {
    let rust_log = std::env::var("RUST_LOG").ok();
    let directive = filter_directive(rust_log.as_deref(), debug_flag, config_level);
    let (filter, rejected) = match EnvFilter::try_new(&directive) {
        Ok(filter) => (filter, None),
        Err(e) => (
            EnvFilter::new(filter_directive(None, debug_flag, None)),
            Some((directive, e)),
        ),
    };

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .compact()
        .try_init()
        .is_ok();

    if installed {
        if let Some((directive, error)) = rejected {
            tracing::warn!(%directive, %error, "Invalid log filter, using default level");
        }
        tracing::debug!(app = APP_NAME, version = APP_VERSION, "Logging initialised");
    }
}
