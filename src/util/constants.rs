// ClassDesk - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "ClassDesk";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "ClassDesk";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// User agent sent with every API request.
pub const USER_AGENT: &str = concat!("ClassDesk/", env!("CARGO_PKG_VERSION"));

// =============================================================================
// Server / HTTP
// =============================================================================

/// Base URL used when neither the CLI, the session, nor config.toml set one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Per-request timeout for API calls.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Bounds for the user-configurable request timeout.
pub const MIN_REQUEST_TIMEOUT_SECS: u64 = 1;
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;

/// Environment variable consulted for the bearer token.
pub const TOKEN_ENV_VAR: &str = "CLASSDESK_TOKEN";

// =============================================================================
// Summary refresh
// =============================================================================

/// How often the classroom detail shell refreshes the summary counts.
pub const SUMMARY_REFRESH_SECS: u64 = 30;

pub const MIN_SUMMARY_REFRESH_SECS: u64 = 5;
pub const MAX_SUMMARY_REFRESH_SECS: u64 = 3_600;

/// Repaint cadence while any request is in flight (ms).
pub const IN_FLIGHT_REPAINT_MS: u64 = 100;

// =============================================================================
// Banners
// =============================================================================

/// Success and info banners dismiss themselves after this many seconds.
pub const BANNER_TIMEOUT_SECS: u64 = 4;

/// Error banners stay up longer so the server message can be read.
pub const ERROR_BANNER_TIMEOUT_SECS: u64 = 8;

pub const MIN_BANNER_TIMEOUT_SECS: u64 = 1;
pub const MAX_BANNER_TIMEOUT_SECS: u64 = 60;

// =============================================================================
// Form limits
// =============================================================================

/// Maximum number of words in a classroom description.
pub const DESCRIPTION_MAX_WORDS: usize = 100;

pub const CLASSROOM_NAME_MAX_CHARS: usize = 100;
pub const SUBJECT_MAX_CHARS: usize = 60;
pub const STUDENT_NAME_MAX_CHARS: usize = 80;
pub const ROLL_NUMBER_MAX_CHARS: usize = 32;
pub const CONTENT_TITLE_MAX_CHARS: usize = 120;

// =============================================================================
// Upload limits
// =============================================================================

/// Largest course content file accepted for upload.
pub const MAX_CONTENT_UPLOAD_BYTES: u64 = 50 * 1024 * 1024; // 50 MB

/// Largest cover image accepted for upload.
pub const MAX_COVER_IMAGE_BYTES: u64 = 5 * 1024 * 1024; // 5 MB

/// Largest spreadsheet accepted for bulk import.
pub const MAX_IMPORT_FILE_BYTES: u64 = 5 * 1024 * 1024; // 5 MB

/// Cover image extensions accepted by the settings panel.
pub const COVER_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

// =============================================================================
// Bulk import
// =============================================================================

/// Spreadsheet extensions accepted by the bulk import panel.
pub const IMPORT_EXTENSIONS: &[&str] = &["csv", "xlsx"];

/// Maximum data rows in a single import file.
pub const MAX_IMPORT_ROWS: usize = 1_000;

/// Number of rows shown in the local preview table.
pub const IMPORT_PREVIEW_ROWS: usize = 10;

/// Default file name offered when saving the import template.
pub const IMPORT_TEMPLATE_FILE_NAME: &str = "students_template.csv";

// =============================================================================
// Content preview
// =============================================================================

/// Text previews are truncated after this many bytes.
pub const MAX_TEXT_PREVIEW_BYTES: u64 = 256 * 1024; // 256 KB

// =============================================================================
// UI
// =============================================================================

/// Default body font size in points.
pub const DEFAULT_FONT_SIZE: f32 = 14.0;
pub const MIN_FONT_SIZE: f32 = 10.0;
pub const MAX_FONT_SIZE: f32 = 24.0;

// =============================================================================
// Files
// =============================================================================

/// Config file name inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Session file name inside the data directory.
pub const SESSION_FILE_NAME: &str = "session.json";

// =============================================================================
// Logging
// =============================================================================

/// Default log level when no override is given.
pub const DEFAULT_LOG_LEVEL: &str = "info";
