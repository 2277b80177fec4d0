// ClassDesk - tests/e2e_local_files.rs
//
// End-to-end tests for everything ClassDesk reads or writes on the local
// disk: import template and preview, roster export, config.toml, and the
// session file. Real files in a temp directory, no mocks.

use classdesk::app::session::{self, LaunchOverrides, SessionData, SESSION_VERSION};
use classdesk::app::state::AppState;
use classdesk::core::banner::BannerBoard;
use classdesk::core::export::ExportFormat;
use classdesk::core::import;
use classdesk::core::model::{ApiEvent, Panel, Student};
use classdesk::platform::config;
use std::time::{Duration, Instant};

// =============================================================================
// Helpers
// =============================================================================

fn connected_state() -> AppState {
    let mut state = AppState::new(Duration::from_secs(30), BannerBoard::default(), false);
    state.connection_form.base_url = "http://localhost:5000".to_string();
    state.connection_form.classroom_id = "c1".to_string();
    assert!(state.connect(Instant::now()));
    state
}

fn student(id: &str, name: &str, roll: &str) -> Student {
    Student {
        id: id.to_string(),
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        roll_number: roll.to_string(),
        created_at: None,
    }
}

// =============================================================================
// Bulk import
// =============================================================================

/// The saved template must itself be a valid import file.
#[test]
fn e2e_template_round_trips_through_preview() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("students_template.csv");

    let mut state = connected_state();
    state.save_import_template(&path, Instant::now());
    assert!(path.exists());

    state.set_import_file(path.clone());
    assert!(state.import_ready());
    let preview = state.import_preview.clone().unwrap().unwrap();
    assert_eq!(preview.total_rows, 1);
    assert!(preview.has_roll_column);
    assert_eq!(preview.rows[0].name, "Ada Lovelace");
}

#[test]
fn e2e_import_preview_rejects_bad_files() {
    let dir = tempfile::tempdir().unwrap();

    let txt = dir.path().join("students.txt");
    std::fs::write(&txt, "name,email\n").unwrap();
    assert!(import::preview_file(&txt).is_err());

    let no_email = dir.path().join("no_email.csv");
    std::fs::write(&no_email, "name,grade\nAda,A\n").unwrap();
    let err = import::preview_file(&no_email).unwrap_err();
    assert!(err.to_string().contains("email"), "got: {err}");

    let mut state = connected_state();
    state.set_import_file(no_email);
    assert!(!state.import_ready());
    state.submit_import(Instant::now());
    assert!(state.drain_outbox().iter().all(|r| r.name() != "import_students"));
    assert!(state.banners.get(Panel::Import).is_some());
}

#[test]
fn e2e_import_queues_request_for_valid_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("class.csv");
    std::fs::write(
        &path,
        "Full Name,E-mail,Roll No\nAda,ada@example.com,1\nGrace,grace@example.com,2\n",
    )
    .unwrap();

    let mut state = connected_state();
    state.drain_outbox();
    state.set_import_file(path);
    state.submit_import(Instant::now());

    let queued = state.drain_outbox();
    assert_eq!(queued.len(), 1);
    assert_eq!(queued[0].name(), "import_students");
    assert!(state.in_flight.import);
}

// =============================================================================
// Roster export
// =============================================================================

#[test]
fn e2e_export_writes_only_visible_students() {
    let dir = tempfile::tempdir().unwrap();
    let mut state = connected_state();
    state.handle_event(
        ApiEvent::StudentsLoaded(Ok(vec![
            student("s1", "Ada", "3"),
            student("s2", "Grace", "1"),
            student("s3", "Alan", "2"),
        ])),
        Instant::now(),
    );
    state.roster_filter.search = "grace".to_string();
    state.apply_roster_filter();

    let csv_path = dir.path().join(ExportFormat::Csv.default_file_name("Physics 101"));
    state.export_students(&csv_path, ExportFormat::Csv, Instant::now());
    let csv = std::fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "name,email,roll_number,joined_at");
    assert_eq!(lines.len(), 2);
    assert!(lines[1].starts_with("Grace,grace@example.com,1"));

    state.roster_filter.search.clear();
    state.apply_roster_filter();
    let json_path = dir.path().join("roster.json");
    state.export_students(&json_path, ExportFormat::Json, Instant::now());
    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(parsed.as_array().map(Vec::len), Some(3));
}

#[test]
fn e2e_export_to_missing_directory_raises_banner() {
    let dir = tempfile::tempdir().unwrap();
    let mut state = connected_state();
    state.handle_event(
        ApiEvent::StudentsLoaded(Ok(vec![student("s1", "Ada", "1")])),
        Instant::now(),
    );
    let path = dir.path().join("missing").join("roster.csv");
    state.export_students(&path, ExportFormat::Csv, Instant::now());
    assert!(!path.exists());
    assert!(state.banners.get(Panel::Students).is_some());
}

// =============================================================================
// Config and session
// =============================================================================

#[test]
fn e2e_config_file_values_and_warnings() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        config::config_path(dir.path()),
        r#"
[server]
base_url = "https://school.example/api-root"
timeout_secs = 0

[ui]
theme = "light"
refresh_interval_secs = 60
"#,
    )
    .unwrap();

    let (cfg, warnings) = config::load_config(dir.path());
    assert_eq!(cfg.base_url, "https://school.example/api-root");
    assert!(!cfg.dark_mode);
    assert_eq!(cfg.refresh_interval_secs, 60);
    assert_eq!(
        cfg.timeout_secs,
        classdesk::util::constants::DEFAULT_REQUEST_TIMEOUT_SECS
    );
    assert_eq!(warnings.len(), 1, "warnings: {warnings:?}");
}

#[test]
fn e2e_session_restores_connection_on_launch() {
    let dir = tempfile::tempdir().unwrap();
    let path = session::session_path(dir.path());

    let mut first = connected_state();
    first.active_tab = Panel::Settings;
    first.session_path = Some(path.clone());
    first.save_session();

    let saved = session::load(&path).unwrap();
    assert_eq!(
        saved,
        SessionData {
            version: SESSION_VERSION,
            base_url: "http://localhost:5000".to_string(),
            token: None,
            classroom_id: Some("c1".to_string()),
            active_tab: Panel::Settings,
        }
    );

    let mut second = AppState::new(Duration::from_secs(30), BannerBoard::default(), false);
    second.restore_session(saved, Instant::now());
    assert_eq!(second.active_tab, Panel::Settings);
    assert!(second.connection.is_some());
    assert!(second.reconnect_requested);
    assert!(!second.drain_outbox().is_empty());
}

/// A token from the environment only swaps the token; the saved classroom
/// still opens and survives the next save.
#[test]
fn e2e_token_override_keeps_saved_classroom() {
    let dir = tempfile::tempdir().unwrap();
    let path = session::session_path(dir.path());
    session::save(
        &SessionData {
            base_url: "http://localhost:5000".to_string(),
            classroom_id: Some("c42".to_string()),
            active_tab: Panel::Content,
            ..Default::default()
        },
        &path,
    )
    .unwrap();

    let mut state = AppState::new(Duration::from_secs(30), BannerBoard::default(), false);
    state.start_session(
        session::load(&path),
        LaunchOverrides {
            token: Some("env-token".to_string()),
            ..Default::default()
        },
        Instant::now(),
    );
    state.session_path = Some(path.clone());

    let conn = state.connection.clone().unwrap();
    assert_eq!(conn.classroom_id, "c42");
    assert_eq!(conn.token.as_deref(), Some("env-token"));
    assert_eq!(state.active_tab, Panel::Content);

    state.save_session();
    let saved = session::load(&path).unwrap();
    assert_eq!(saved.classroom_id.as_deref(), Some("c42"));
}

#[test]
fn e2e_classroom_override_replaces_saved_classroom() {
    let saved = SessionData {
        base_url: "http://localhost:5000".to_string(),
        classroom_id: Some("c42".to_string()),
        ..Default::default()
    };
    let mut state = AppState::new(Duration::from_secs(30), BannerBoard::default(), false);
    state.start_session(
        Some(saved),
        LaunchOverrides {
            classroom: Some("c7".to_string()),
            ..Default::default()
        },
        Instant::now(),
    );
    assert_eq!(state.connection.unwrap().classroom_id, "c7");
}
