// ClassDesk - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading and logging initialisation
// 3. Session restore and CLI connection overrides
// 4. eframe GUI launch

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod gui;

// Re-export modules from the library crate so that `gui.rs` can still use
// `crate::app::...`, `crate::core::...` etc.
pub use classdesk::api;
pub use classdesk::app;
pub use classdesk::core;
pub use classdesk::platform;
pub use classdesk::ui;
pub use classdesk::util;

use clap::Parser;
use std::time::{Duration, Instant};

/// ClassDesk - desktop classroom manager.
///
/// Connect to a classroom server to manage students, course content, bulk
/// imports and classroom settings.
#[derive(Parser, Debug)]
#[command(name = "ClassDesk", version, about)]
struct Cli {
    /// Server base URL (overrides the saved session and config.toml).
    #[arg(short = 's', long = "server")]
    server: Option<String>,

    /// Bearer token for the server.
    #[arg(short = 't', long = "token", env = util::constants::TOKEN_ENV_VAR, hide_env_values = true)]
    token: Option<String>,

    /// Classroom to open on launch.
    #[arg(short = 'c', long = "classroom")]
    classroom: Option<String>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    let paths = platform::config::PlatformPaths::resolve();
    let (config, config_warnings) = platform::config::load_config(&paths.config_dir);

    util::logging::init(cli.debug, config.log_level.as_deref());

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "ClassDesk starting"
    );
    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Config warning");
    }

    let banners = core::banner::BannerBoard::new(
        Duration::from_secs(config.banner_timeout_secs),
        Duration::from_secs(util::constants::ERROR_BANNER_TIMEOUT_SECS),
    );
    let mut state = app::state::AppState::new(
        Duration::from_secs(config.refresh_interval_secs),
        banners,
        cli.debug,
    );
    state.connection_form.base_url = config.base_url.clone();

    let session_path = app::session::session_path(&paths.data_dir);
    let now = Instant::now();
    let overrides = app::session::LaunchOverrides {
        server: cli.server,
        token: cli.token,
        classroom: cli.classroom,
    };
    state.start_session(app::session::load(&session_path), overrides, now);
    state.session_path = Some(session_path);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!(
                "{} v{}",
                util::constants::APP_NAME,
                util::constants::APP_VERSION
            ))
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    let result = eframe::run_native(
        util::constants::APP_NAME,
        native_options,
        Box::new(move |cc| {
            ui::theme::apply(&cc.egui_ctx, config.dark_mode, config.font_size);
            Ok(Box::new(gui::ClassDeskApp::new(state, config)))
        }),
    );

    if let Err(e) = result {
        tracing::error!(error = %e, "Failed to launch GUI");
        eprintln!("Error: Failed to launch ClassDesk: {e}");
        std::process::exit(1);
    }
}
