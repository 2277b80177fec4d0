// ClassDesk - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// Each subsystem owns its error enum; `ClassDeskError` covers the app's own
// local files.
// Display strings are what the user sees in banners, so they stay short.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors for local files ClassDesk owns outright (the session file).
#[derive(Debug, Error)]
pub enum ClassDeskError {
    /// I/O error with path context.
    #[error("I/O error during {operation} on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        operation: &'static str,
        #[source]
        source: io::Error,
    },

    /// JSON (de)serialisation of a local file failed.
    #[error("Invalid JSON in '{}': {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

// ---------------------------------------------------------------------------
// API errors
// ---------------------------------------------------------------------------

/// Errors produced by the REST client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The configured server URL (or a file URL) could not be parsed.
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The HTTP client itself could not be constructed.
    #[error("Could not initialise HTTP client: {source}")]
    Client {
        #[source]
        source: reqwest::Error,
    },

    /// The request never produced a response (DNS, connect, timeout, ...).
    #[error("Request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status. `message` is the
    /// server's own message string and is shown to the user verbatim.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// The response body did not match the expected shape.
    #[error("Unexpected response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    /// A success envelope arrived without its `data` payload.
    #[error("Response from {endpoint} contained no data")]
    MissingData { endpoint: String },

    /// A file to upload could not be read.
    #[error("Cannot read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A file to upload exceeds the client-side limit.
    #[error("'{}' is {size} bytes, exceeds the limit of {max} bytes", .path.display())]
    FileTooLarge { path: PathBuf, size: u64, max: u64 },
}

// ---------------------------------------------------------------------------
// Import errors
// ---------------------------------------------------------------------------

/// Errors raised while reading a spreadsheet for the import preview.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Only .csv and .xlsx are understood.
    #[error("Unsupported file type '.{extension}'. Use .csv or .xlsx")]
    UnsupportedFormat { extension: String },

    #[error("Cannot read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("File is {size} bytes, exceeds the limit of {max} bytes")]
    FileTooLarge { size: u64, max: u64 },

    #[error("CSV parse error: {source}")]
    Csv {
        #[source]
        source: csv::Error,
    },

    #[error("Spreadsheet parse error: {source}")]
    Xlsx {
        #[source]
        source: calamine::XlsxError,
    },

    #[error("Workbook contains no worksheets")]
    NoWorksheet,

    #[error("Missing required column '{column}'")]
    MissingColumn { column: &'static str },

    #[error("File contains no data rows")]
    Empty,

    #[error("File has {count} data rows, at most {max} can be imported at once")]
    TooManyRows { count: usize, max: usize },
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to exporting the student roster.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV export to '{}' failed: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("JSON export to '{}' failed: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error writing '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to reading config.toml.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

// ---------------------------------------------------------------------------
// Form validation errors
// ---------------------------------------------------------------------------

/// Client-side form validation failures. The backend remains authoritative;
/// these only catch obvious mistakes before a request is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("{field} must be at most {max} words")]
    TooManyWords { field: &'static str, max: usize },

    #[error("'{email}' is not a valid email address")]
    InvalidEmail { email: String },

    #[error("A student with email '{email}' is already enrolled")]
    DuplicateEmail { email: String },

    #[error("Unsupported file type '.{extension}' (expected {expected})")]
    UnsupportedFile {
        extension: String,
        expected: String,
    },

    #[error("File is {size} bytes, exceeds the limit of {max} bytes")]
    FileTooLarge { size: u64, max: u64 },

    #[error("Nothing to save")]
    NoChanges,
}
