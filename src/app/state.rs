// ClassDesk - app/state.rs
//
// Application state. Holds the transient copies of the classroom, roster
// and content list, per-panel form state, filters, banners and in-flight
// flags. Owned by the eframe::App implementation.
//
// Panels never perform network I/O: they call methods here, which queue
// `ApiRequest`s in `outbox`. The GUI drains the outbox each frame into the
// `RequestManager` and feeds completions back through `handle_event`.

use crate::api::client::{parse_base_url, resolve_file_url};
use crate::app::refresh::RefreshTimer;
use crate::app::session::{self, LaunchOverrides, SessionData, SESSION_VERSION};
use crate::core::banner::BannerBoard;
use crate::core::content::{self, ContentFilter, PreviewKind};
use crate::core::export::{self, ExportFormat};
use crate::core::forms::{self, SettingsDraft, StudentDraft};
use crate::core::import::{self, ImportPreview};
use crate::core::model::{
    ApiEvent, ApiRequest, Classroom, ClassroomSummary, ContentUpload, CourseContentItem,
    ImportSummary, Panel, Student, TextPreview,
};
use crate::core::roster::{self, RosterFilter};
use crate::core::text::trim_to_words;
use crate::util::constants::DESCRIPTION_MAX_WORDS;
use crate::util::error::{ExportError, FormError};
use chrono::Utc;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

// =============================================================================
// Supporting types
// =============================================================================

/// The server and classroom the app is currently talking to.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub base_url: String,
    pub token: Option<String>,
    pub classroom_id: String,
}

/// Connection panel inputs as typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectionForm {
    pub base_url: String,
    pub token: String,
    pub classroom_id: String,
}

/// Course content upload form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadDraft {
    pub title: String,
    pub description: String,
    pub is_public: bool,
    pub path: Option<PathBuf>,
    /// Size of `path` in bytes, read when the file was picked.
    pub size: u64,
}

/// Requests currently running, one flag per kind. A flag being set blocks
/// a second request of the same kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InFlight {
    pub classroom: bool,
    pub summary: bool,
    pub students: bool,
    pub content: bool,
    pub add_student: bool,
    pub settings: bool,
    pub cover_image: bool,
    pub import: bool,
    pub upload: bool,
}

impl InFlight {
    pub fn any(&self) -> bool {
        self.classroom
            || self.summary
            || self.students
            || self.content
            || self.add_student
            || self.settings
            || self.cover_image
            || self.import
            || self.upload
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PreviewStatus {
    Loading,
    Ready(TextPreview),
    Failed(String),
}

/// The text preview window.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewWindow {
    pub content_id: String,
    pub title: String,
    pub status: PreviewStatus,
}

/// A destructive action waiting for the user to confirm it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirm {
    RemoveStudent { id: String, name: String },
    DeleteContent { id: String, title: String },
}

/// Local outcome of picking an import file.
pub type ImportPreviewResult = Result<ImportPreview, String>;

// =============================================================================
// AppState
// =============================================================================

/// Top-level application state.
#[derive(Debug)]
pub struct AppState {
    // -- Connection --
    pub connection_form: ConnectionForm,
    pub connection: Option<Connection>,
    /// Set when `connection` changed; the GUI rebuilds its client and clears it.
    pub reconnect_requested: bool,

    // -- Fetched copies --
    pub classroom: Option<Classroom>,
    pub students: Vec<Student>,
    /// True once the roster endpoint has answered for this classroom.
    pub students_loaded: bool,
    pub contents: Vec<CourseContentItem>,
    pub summary: ClassroomSummary,

    // -- Shell --
    pub active_tab: Panel,
    pub refresh: RefreshTimer,

    // -- Students --
    pub roster_filter: RosterFilter,
    /// Indices into `students` in display order.
    pub filtered_students: Vec<usize>,
    pub student_draft: StudentDraft,

    // -- Course content --
    pub content_filter: ContentFilter,
    /// Indices into `contents` in display order.
    pub filtered_content: Vec<usize>,
    pub upload: UploadDraft,
    pub preview: Option<PreviewWindow>,
    /// File URL an External preview wants opened; consumed by the GUI.
    pub pending_open_url: Option<String>,
    /// Most recent roster export, offered as "Show in folder".
    pub last_export: Option<PathBuf>,
    /// Set by the students panel; gui.rs opens the file manager.
    pub pending_reveal: Option<PathBuf>,

    // -- Bulk import --
    pub import_path: Option<PathBuf>,
    pub import_preview: Option<ImportPreviewResult>,
    pub import_summary: Option<ImportSummary>,

    // -- Settings --
    pub settings_draft: SettingsDraft,
    /// The description was cut at the word limit since the last edit.
    pub description_truncated: bool,
    pub cover_image: Option<PathBuf>,

    // -- Optimistic removals awaiting confirmation, keyed by id --
    removed_students: HashMap<String, (usize, Student)>,
    removed_contents: HashMap<String, (usize, CourseContentItem)>,

    pub confirm: Option<Confirm>,
    pub in_flight: InFlight,
    pub banners: BannerBoard,

    /// Requests queued by panels, drained by the GUI each frame.
    pub outbox: Vec<ApiRequest>,

    /// Status message for the status bar.
    pub status_message: String,
    pub show_about: bool,
    pub debug_mode: bool,

    /// Where the session is persisted; `None` disables persistence.
    pub session_path: Option<PathBuf>,
}

impl AppState {
    pub fn new(refresh_interval: Duration, banners: BannerBoard, debug_mode: bool) -> Self {
        Self {
            connection_form: ConnectionForm::default(),
            connection: None,
            reconnect_requested: false,
            classroom: None,
            students: Vec::new(),
            students_loaded: false,
            contents: Vec::new(),
            summary: ClassroomSummary::default(),
            active_tab: Panel::default(),
            refresh: RefreshTimer::new(refresh_interval),
            roster_filter: RosterFilter::default(),
            filtered_students: Vec::new(),
            student_draft: StudentDraft::default(),
            content_filter: ContentFilter::default(),
            filtered_content: Vec::new(),
            upload: UploadDraft::default(),
            preview: None,
            pending_open_url: None,
            last_export: None,
            pending_reveal: None,
            import_path: None,
            import_preview: None,
            import_summary: None,
            settings_draft: SettingsDraft::default(),
            description_truncated: false,
            cover_image: None,
            removed_students: HashMap::new(),
            removed_contents: HashMap::new(),
            confirm: None,
            in_flight: InFlight::default(),
            banners,
            outbox: Vec::new(),
            status_message: "Not connected. Enter a server and classroom to begin.".to_string(),
            show_about: false,
            debug_mode,
            session_path: None,
        }
    }

    fn classroom_id(&self) -> Option<String> {
        self.connection.as_ref().map(|c| c.classroom_id.clone())
    }

    // =========================================================================
    // Connection and session
    // =========================================================================

    /// Validate the connection form and switch to that server and classroom.
    ///
    /// Clears every fetched copy and queues the initial loads. Returns false
    /// (with an error banner) when the form is invalid.
    pub fn connect(&mut self, now: Instant) -> bool {
        let base_url = self.connection_form.base_url.trim().to_string();
        let classroom_id = self.connection_form.classroom_id.trim().to_string();
        let token = self.connection_form.token.trim();

        if let Err(e) = parse_base_url(&base_url) {
            self.banners.error(Panel::Detail, e.to_string(), now);
            return false;
        }
        if classroom_id.is_empty() {
            self.banners.error(
                Panel::Detail,
                FormError::Required {
                    field: "Classroom ID",
                }
                .to_string(),
                now,
            );
            return false;
        }

        tracing::info!(
            base_url = %base_url,
            classroom = %classroom_id,
            authenticated = !token.is_empty(),
            "Connecting"
        );

        self.connection = Some(Connection {
            base_url,
            token: (!token.is_empty()).then(|| token.to_string()),
            classroom_id,
        });
        self.reconnect_requested = true;
        self.clear_classroom_data();
        self.banners.dismiss(Panel::Detail);
        self.load_all();
        // The initial loads stand in for the first summary refresh.
        self.refresh.mark(now);
        self.status_message = "Loading classroom\u{2026}".to_string();
        true
    }

    /// Drop every fetched copy and per-classroom form.
    pub fn clear_classroom_data(&mut self) {
        self.classroom = None;
        self.students.clear();
        self.students_loaded = false;
        self.contents.clear();
        self.summary = ClassroomSummary::default();
        self.filtered_students.clear();
        self.filtered_content.clear();
        self.student_draft.clear();
        self.upload = UploadDraft::default();
        self.preview = None;
        self.pending_open_url = None;
        self.last_export = None;
        self.pending_reveal = None;
        self.import_path = None;
        self.import_preview = None;
        self.import_summary = None;
        self.settings_draft = SettingsDraft::default();
        self.description_truncated = false;
        self.cover_image = None;
        self.removed_students.clear();
        self.removed_contents.clear();
        self.confirm = None;
        self.in_flight = InFlight::default();
        self.outbox.clear();
    }

    /// Seed the connection form and tab from a saved session, connecting
    /// straight away when the session names a classroom.
    pub fn restore_session(&mut self, data: SessionData, now: Instant) {
        self.start_session(Some(data), LaunchOverrides::default(), now);
    }

    /// Launch-time connection setup: the saved session seeds the form, any
    /// command-line values replace individual fields, and the app connects
    /// when a classroom is named by either.
    pub fn start_session(
        &mut self,
        saved: Option<SessionData>,
        overrides: LaunchOverrides,
        now: Instant,
    ) {
        if let Some(data) = saved {
            if !data.base_url.trim().is_empty() {
                self.connection_form.base_url = data.base_url;
            }
            if let Some(token) = data.token {
                self.connection_form.token = token;
            }
            self.active_tab = if data.active_tab == Panel::Detail {
                Panel::default()
            } else {
                data.active_tab
            };
            if let Some(id) = data.classroom_id {
                self.connection_form.classroom_id = id;
            }
        }

        if let Some(server) = overrides.server {
            self.connection_form.base_url = server;
        }
        if let Some(token) = overrides.token {
            self.connection_form.token = token;
        }
        if let Some(classroom) = overrides.classroom {
            self.connection_form.classroom_id = classroom;
        }

        if !self.connection_form.classroom_id.trim().is_empty() {
            self.connect(now);
        }
    }

    pub fn session_snapshot(&self) -> SessionData {
        let (base_url, token, classroom_id) = match &self.connection {
            Some(c) => (
                c.base_url.clone(),
                c.token.clone(),
                Some(c.classroom_id.clone()),
            ),
            // A failed connect keeps the classroom so the next launch retries it.
            None => (
                self.connection_form.base_url.trim().to_string(),
                None,
                Some(self.connection_form.classroom_id.trim().to_string())
                    .filter(|id| !id.is_empty()),
            ),
        };
        SessionData {
            version: SESSION_VERSION,
            base_url,
            token,
            classroom_id,
            active_tab: self.active_tab,
        }
    }

    /// Persist the session if a session path is configured. Failures are
    /// logged and otherwise ignored.
    pub fn save_session(&self) {
        if let Some(path) = &self.session_path {
            if let Err(e) = session::save(&self.session_snapshot(), path) {
                tracing::warn!(error = %e, "Could not save session");
            }
        }
    }

    // =========================================================================
    // Fetching
    // =========================================================================

    pub fn load_all(&mut self) {
        self.request_classroom();
        self.request_students();
        self.request_content();
    }

    pub fn request_classroom(&mut self) {
        if self.in_flight.classroom {
            return;
        }
        if let Some(classroom_id) = self.classroom_id() {
            self.in_flight.classroom = true;
            self.outbox.push(ApiRequest::LoadClassroom { classroom_id });
        }
    }

    pub fn request_students(&mut self) {
        if self.in_flight.students {
            return;
        }
        if let Some(classroom_id) = self.classroom_id() {
            self.in_flight.students = true;
            self.outbox.push(ApiRequest::LoadStudents { classroom_id });
        }
    }

    pub fn request_content(&mut self) {
        if self.in_flight.content {
            return;
        }
        if let Some(classroom_id) = self.classroom_id() {
            self.in_flight.content = true;
            self.outbox.push(ApiRequest::LoadContent { classroom_id });
        }
    }

    /// Queue a summary refresh when the timer is due and none is running.
    /// Returns true when a refresh was queued.
    pub fn tick_refresh(&mut self, now: Instant) -> bool {
        if self.in_flight.summary || self.in_flight.classroom || !self.refresh.is_due(now) {
            return false;
        }
        let Some(classroom_id) = self.classroom_id() else {
            return false;
        };
        self.in_flight.summary = true;
        self.refresh.mark(now);
        self.outbox.push(ApiRequest::RefreshSummary { classroom_id });
        true
    }

    /// Take every queued request.
    pub fn drain_outbox(&mut self) -> Vec<ApiRequest> {
        std::mem::take(&mut self.outbox)
    }

    // =========================================================================
    // Filters and derived data
    // =========================================================================

    pub fn apply_roster_filter(&mut self) {
        self.filtered_students = roster::apply(&self.students, &self.roster_filter, Utc::now());
    }

    pub fn apply_content_filter(&mut self) {
        self.filtered_content = content::apply_filter(&self.contents, &self.content_filter);
    }

    /// Students in the current filtered and sorted order.
    pub fn visible_students(&self) -> Vec<&Student> {
        self.filtered_students
            .iter()
            .filter_map(|&i| self.students.get(i))
            .collect()
    }

    /// Recompute the header counts. The roster list is authoritative once
    /// loaded; before that the classroom record's student list is used.
    fn recompute_summary(&mut self) {
        let students: &[Student] = if self.students_loaded {
            &self.students
        } else {
            self.classroom
                .as_ref()
                .map(|c| c.students.as_slice())
                .unwrap_or_default()
        };
        self.summary = ClassroomSummary::compute(students, &self.contents, Utc::now());
    }

    /// Replace the classroom copy. The settings form is reseeded only when
    /// it holds no unsaved edits.
    fn set_classroom(&mut self, classroom: Classroom) {
        let pristine = match &self.classroom {
            Some(old) => self.settings_draft.changes(old).is_none(),
            None => true,
        };
        if pristine {
            self.settings_draft = SettingsDraft::from_classroom(&classroom);
            self.description_truncated = false;
        }
        self.classroom = Some(classroom);
    }

    // =========================================================================
    // Students
    // =========================================================================

    pub fn submit_student(&mut self, now: Instant) {
        if self.in_flight.add_student {
            return;
        }
        let Some(classroom_id) = self.classroom_id() else {
            return;
        };
        match self.student_draft.validate(&self.students) {
            Ok(student) => {
                self.in_flight.add_student = true;
                self.outbox.push(ApiRequest::AddStudent {
                    classroom_id,
                    student,
                });
            }
            Err(e) => self.banners.error(Panel::Students, e.to_string(), now),
        }
    }

    /// Ask for confirmation before removing a student.
    pub fn ask_remove_student(&mut self, student_id: &str) {
        if let Some(s) = self.students.iter().find(|s| s.id == student_id) {
            self.confirm = Some(Confirm::RemoveStudent {
                id: s.id.clone(),
                name: s.name.clone(),
            });
        }
    }

    /// Remove a student from the roster immediately and queue the request.
    /// The student is put back if the server refuses.
    pub fn remove_student(&mut self, student_id: &str) {
        let Some(classroom_id) = self.classroom_id() else {
            return;
        };
        let Some(index) = self.students.iter().position(|s| s.id == student_id) else {
            return;
        };
        let student = self.students.remove(index);
        self.removed_students
            .insert(student_id.to_string(), (index, student));
        self.outbox.push(ApiRequest::RemoveStudent {
            classroom_id,
            student_id: student_id.to_string(),
        });
        self.apply_roster_filter();
        self.recompute_summary();
    }

    // =========================================================================
    // Course content
    // =========================================================================

    /// Record the picked upload file and its size. An empty title is filled
    /// from the file name.
    pub fn set_upload_file(&mut self, path: PathBuf, now: Instant) {
        match std::fs::metadata(&path) {
            Ok(meta) => {
                if self.upload.title.trim().is_empty() {
                    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                        self.upload.title = stem.to_string();
                    }
                }
                self.upload.size = meta.len();
                self.upload.path = Some(path);
            }
            Err(e) => self.banners.error(
                Panel::Content,
                format!("Cannot read '{}': {e}", path.display()),
                now,
            ),
        }
    }

    pub fn submit_upload(&mut self, now: Instant) {
        if self.in_flight.upload {
            return;
        }
        let Some(classroom_id) = self.classroom_id() else {
            return;
        };
        if let Err(e) = content::validate_upload(
            &self.upload.title,
            self.upload.path.as_deref(),
            self.upload.size,
        ) {
            self.banners.error(Panel::Content, e.to_string(), now);
            return;
        }
        let Some(path) = self.upload.path.clone() else {
            return;
        };
        self.in_flight.upload = true;
        self.outbox.push(ApiRequest::UploadContent {
            classroom_id,
            upload: ContentUpload {
                path,
                title: self.upload.title.trim().to_string(),
                description: self.upload.description.trim().to_string(),
                is_public: self.upload.is_public,
            },
        });
    }

    pub fn ask_delete_content(&mut self, content_id: &str) {
        if let Some(item) = self.contents.iter().find(|c| c.id == content_id) {
            self.confirm = Some(Confirm::DeleteContent {
                id: item.id.clone(),
                title: item.title.clone(),
            });
        }
    }

    /// Remove a content item immediately and queue the request. The item is
    /// put back if the server refuses.
    pub fn delete_content(&mut self, content_id: &str) {
        let Some(classroom_id) = self.classroom_id() else {
            return;
        };
        let Some(index) = self.contents.iter().position(|c| c.id == content_id) else {
            return;
        };
        let item = self.contents.remove(index);
        self.removed_contents
            .insert(content_id.to_string(), (index, item));
        if self
            .preview
            .as_ref()
            .is_some_and(|p| p.content_id == content_id)
        {
            self.preview = None;
        }
        self.outbox.push(ApiRequest::DeleteContent {
            classroom_id,
            content_id: content_id.to_string(),
        });
        self.apply_content_filter();
        self.recompute_summary();
    }

    /// Preview a content item: text is fetched into the preview window,
    /// anything else is handed to the browser.
    pub fn preview_content(&mut self, content_id: &str, now: Instant) {
        let Some(item) = self.contents.iter().find(|c| c.id == content_id) else {
            return;
        };
        if item.file_url.trim().is_empty() {
            self.banners
                .error(Panel::Content, "This item has no file to preview.", now);
            return;
        }
        if PreviewKind::for_item(item).is_inline() {
            self.preview = Some(PreviewWindow {
                content_id: item.id.clone(),
                title: item.title.clone(),
                status: PreviewStatus::Loading,
            });
            self.outbox.push(ApiRequest::PreviewContent {
                content_id: item.id.clone(),
                file_url: item.file_url.clone(),
            });
        } else {
            self.pending_open_url = Some(item.file_url.clone());
        }
    }

    // =========================================================================
    // Confirmation
    // =========================================================================

    /// Carry out the pending confirmation.
    pub fn confirm_pending(&mut self) {
        match self.confirm.take() {
            Some(Confirm::RemoveStudent { id, .. }) => self.remove_student(&id),
            Some(Confirm::DeleteContent { id, .. }) => self.delete_content(&id),
            None => {}
        }
    }

    pub fn cancel_confirm(&mut self) {
        self.confirm = None;
    }

    // =========================================================================
    // Bulk import
    // =========================================================================

    /// Read the picked spreadsheet locally and keep its preview.
    pub fn set_import_file(&mut self, path: PathBuf) {
        let preview = import::preview_file(&path).map_err(|e| e.to_string());
        if let Err(e) = &preview {
            tracing::warn!(file = %path.display(), error = %e, "Import file rejected");
        }
        self.import_preview = Some(preview);
        self.import_path = Some(path);
        self.import_summary = None;
    }

    /// Whether the picked file previewed cleanly and can be posted.
    pub fn import_ready(&self) -> bool {
        self.import_path.is_some() && matches!(self.import_preview, Some(Ok(_)))
    }

    pub fn submit_import(&mut self, now: Instant) {
        if self.in_flight.import {
            return;
        }
        let Some(classroom_id) = self.classroom_id() else {
            return;
        };
        if !self.import_ready() {
            self.banners.error(
                Panel::Import,
                "Choose a valid CSV or XLSX file first.",
                now,
            );
            return;
        }
        let Some(path) = self.import_path.clone() else {
            return;
        };
        self.in_flight.import = true;
        self.import_summary = None;
        self.outbox.push(ApiRequest::ImportStudents { classroom_id, path });
    }

    // =========================================================================
    // Settings
    // =========================================================================

    /// Cut the description back to the word limit after an edit.
    pub fn enforce_description_limit(&mut self) {
        let trimmed = trim_to_words(&self.settings_draft.description, DESCRIPTION_MAX_WORDS);
        if trimmed.truncated {
            self.settings_draft.description = trimmed.text;
        }
        self.description_truncated = trimmed.truncated;
    }

    /// Whether Save should be enabled: valid, changed, and not already saving.
    pub fn settings_savable(&self) -> bool {
        !self.in_flight.settings
            && self
                .classroom
                .as_ref()
                .is_some_and(|c| self.settings_draft.to_update(c).is_ok())
    }

    pub fn save_settings(&mut self, now: Instant) {
        if self.in_flight.settings {
            return;
        }
        let (Some(classroom_id), Some(classroom)) = (self.classroom_id(), &self.classroom) else {
            return;
        };
        match self.settings_draft.to_update(classroom) {
            Ok(update) => {
                self.in_flight.settings = true;
                self.outbox.push(ApiRequest::UpdateClassroom {
                    classroom_id,
                    update,
                });
            }
            Err(FormError::NoChanges) => {
                self.banners
                    .info(Panel::Settings, FormError::NoChanges.to_string(), now)
            }
            Err(e) => self.banners.error(Panel::Settings, e.to_string(), now),
        }
    }

    /// Discard unsaved settings edits.
    pub fn reset_settings(&mut self) {
        if let Some(classroom) = &self.classroom {
            self.settings_draft = SettingsDraft::from_classroom(classroom);
        }
        self.description_truncated = false;
    }

    pub fn set_cover_image(&mut self, path: PathBuf, now: Instant) {
        let checked = std::fs::metadata(&path)
            .map_err(|e| format!("Cannot read '{}': {e}", path.display()))
            .and_then(|meta| {
                forms::validate_cover_image(&path, meta.len()).map_err(|e| e.to_string())
            });
        match checked {
            Ok(()) => self.cover_image = Some(path),
            Err(e) => {
                self.cover_image = None;
                self.banners.error(Panel::Settings, e, now);
            }
        }
    }

    pub fn upload_cover_image(&mut self) {
        if self.in_flight.cover_image {
            return;
        }
        let (Some(classroom_id), Some(path)) = (self.classroom_id(), self.cover_image.clone())
        else {
            return;
        };
        self.in_flight.cover_image = true;
        self.outbox
            .push(ApiRequest::UploadCoverImage { classroom_id, path });
    }

    // =========================================================================
    // Local files
    // =========================================================================

    /// Write the visible roster to `path`.
    pub fn export_students(&mut self, path: &Path, format: ExportFormat, now: Instant) {
        let result = std::fs::File::create(path)
            .map_err(|e| ExportError::Io {
                path: path.to_path_buf(),
                source: e,
            })
            .and_then(|file| {
                export::export(format, &self.visible_students(), std::io::BufWriter::new(file), path)
            });
        match result {
            Ok(n) => {
                tracing::info!(count = n, format = format.label(), "Roster exported");
                self.status_message = format!("Exported {n} students to {}.", path.display());
                self.last_export = Some(path.to_path_buf());
                self.banners.success(
                    Panel::Students,
                    format!("Exported {n} students as {}.", format.label()),
                    now,
                );
            }
            Err(e) => self.banners.error(Panel::Students, e.to_string(), now),
        }
    }

    /// Write the CSV import template to `path`.
    pub fn save_import_template(&mut self, path: &Path, now: Instant) {
        let result = std::fs::File::create(path)
            .map_err(|e| ExportError::Io {
                path: path.to_path_buf(),
                source: e,
            })
            .and_then(|file| import::write_template(file, path));
        match result {
            Ok(()) => self.banners.success(
                Panel::Import,
                format!("Template saved to {}.", path.display()),
                now,
            ),
            Err(e) => self.banners.error(Panel::Import, e.to_string(), now),
        }
    }

    /// Absolute URL for a server-relative file URL, using the current
    /// connection's base URL.
    pub fn resolve_url(&self, file_url: &str) -> Option<url::Url> {
        let connection = self.connection.as_ref()?;
        let base = parse_base_url(&connection.base_url).ok()?;
        resolve_file_url(&base, file_url).ok()
    }

    // =========================================================================
    // Completions
    // =========================================================================

    /// Apply one completed request.
    pub fn handle_event(&mut self, event: ApiEvent, now: Instant) {
        match event {
            ApiEvent::ClassroomLoaded(result) => {
                self.in_flight.classroom = false;
                match result {
                    Ok(classroom) => {
                        self.status_message = format!("Classroom \"{}\" loaded.", classroom.name);
                        self.set_classroom(classroom);
                        self.recompute_summary();
                    }
                    Err(e) => {
                        self.status_message = "Could not load classroom.".to_string();
                        self.banners
                            .error(Panel::Detail, format!("Could not load classroom: {e}"), now);
                    }
                }
            }

            ApiEvent::SummaryRefreshed(result) => {
                self.in_flight.summary = false;
                match result {
                    Ok((classroom, contents)) => {
                        let drifted = self.students_loaded
                            && classroom.students.len() != self.students.len()
                            && self.removed_students.is_empty()
                            && !self.in_flight.add_student;
                        self.set_classroom(classroom);
                        self.replace_contents(contents);
                        if drifted {
                            tracing::debug!("Roster size changed on the server, reloading");
                            self.request_students();
                        }
                        self.recompute_summary();
                    }
                    Err(e) => {
                        self.banners
                            .error(Panel::Detail, format!("Refresh failed: {e}"), now);
                    }
                }
            }

            ApiEvent::ClassroomUpdated(result) => {
                self.in_flight.settings = false;
                match result {
                    Ok(classroom) => {
                        self.settings_draft = SettingsDraft::from_classroom(&classroom);
                        self.description_truncated = false;
                        self.merge_classroom(classroom);
                        self.banners
                            .success(Panel::Settings, "Classroom settings saved.", now);
                    }
                    Err(e) => self.banners.error(Panel::Settings, e, now),
                }
            }

            ApiEvent::CoverImageUploaded(result) => {
                self.in_flight.cover_image = false;
                match result {
                    Ok(classroom) => {
                        self.cover_image = None;
                        self.merge_classroom(classroom);
                        self.banners
                            .success(Panel::Settings, "Cover image updated.", now);
                    }
                    Err(e) => self
                        .banners
                        .error(Panel::Settings, format!("Cover image upload failed: {e}"), now),
                }
            }

            ApiEvent::StudentsLoaded(result) => {
                self.in_flight.students = false;
                match result {
                    Ok(students) => {
                        let removed = &self.removed_students;
                        self.students = students
                            .into_iter()
                            .filter(|s| !removed.contains_key(&s.id))
                            .collect();
                        self.students_loaded = true;
                        self.apply_roster_filter();
                        self.recompute_summary();
                    }
                    Err(e) => self.banners.error(
                        Panel::Students,
                        format!("Could not load students: {e}"),
                        now,
                    ),
                }
            }

            ApiEvent::StudentAdded(result) => {
                self.in_flight.add_student = false;
                match result {
                    Ok(student) => {
                        self.banners
                            .success(Panel::Students, format!("Added {}.", student.name), now);
                        self.students.push(student);
                        self.student_draft.clear();
                        self.apply_roster_filter();
                        self.recompute_summary();
                    }
                    Err(e) => self.banners.error(Panel::Students, e, now),
                }
            }

            ApiEvent::StudentRemoved { student_id, result } => {
                let removed = self.removed_students.remove(&student_id);
                match result {
                    Ok(()) => {
                        let name = removed.map(|(_, s)| s.name).unwrap_or_default();
                        self.banners
                            .success(Panel::Students, format!("Removed {name}."), now);
                    }
                    Err(e) => {
                        if let Some((index, student)) = removed {
                            self.banners.error(
                                Panel::Students,
                                format!("Could not remove {}: {e}", student.name),
                                now,
                            );
                            let index = index.min(self.students.len());
                            self.students.insert(index, student);
                            self.apply_roster_filter();
                            self.recompute_summary();
                        } else {
                            self.banners.error(Panel::Students, e, now);
                        }
                    }
                }
            }

            ApiEvent::StudentsImported(result) => {
                self.in_flight.import = false;
                match result {
                    Ok(summary) => {
                        let message = format!(
                            "Imported {} of {} rows ({} skipped, {} failed).",
                            summary.imported, summary.total_rows, summary.skipped, summary.failed
                        );
                        if summary.failed > 0 {
                            self.banners.info(Panel::Import, message, now);
                        } else {
                            self.banners.success(Panel::Import, message, now);
                        }
                        self.import_summary = Some(summary);
                        self.request_students();
                    }
                    Err(e) => self
                        .banners
                        .error(Panel::Import, format!("Import failed: {e}"), now),
                }
            }

            ApiEvent::ContentLoaded(result) => {
                self.in_flight.content = false;
                match result {
                    Ok(contents) => {
                        self.replace_contents(contents);
                        self.recompute_summary();
                    }
                    Err(e) => self.banners.error(
                        Panel::Content,
                        format!("Could not load course content: {e}"),
                        now,
                    ),
                }
            }

            ApiEvent::ContentUploaded(result) => {
                self.in_flight.upload = false;
                match result {
                    Ok(item) => {
                        self.banners
                            .success(Panel::Content, format!("Uploaded \"{}\".", item.title), now);
                        self.contents.push(item);
                        self.upload = UploadDraft::default();
                        self.apply_content_filter();
                        self.recompute_summary();
                    }
                    Err(e) => self
                        .banners
                        .error(Panel::Content, format!("Upload failed: {e}"), now),
                }
            }

            ApiEvent::ContentDeleted { content_id, result } => {
                let removed = self.removed_contents.remove(&content_id);
                match result {
                    Ok(()) => {
                        let title = removed.map(|(_, c)| c.title).unwrap_or_default();
                        self.banners
                            .success(Panel::Content, format!("Deleted \"{title}\"."), now);
                    }
                    Err(e) => {
                        if let Some((index, item)) = removed {
                            self.banners.error(
                                Panel::Content,
                                format!("Could not delete \"{}\": {e}", item.title),
                                now,
                            );
                            let index = index.min(self.contents.len());
                            self.contents.insert(index, item);
                            self.apply_content_filter();
                            self.recompute_summary();
                        } else {
                            self.banners.error(Panel::Content, e, now);
                        }
                    }
                }
            }

            ApiEvent::PreviewLoaded { content_id, result } => {
                // Ignore previews for a window that was closed or replaced.
                if let Some(window) = self
                    .preview
                    .as_mut()
                    .filter(|w| w.content_id == content_id)
                {
                    window.status = match result {
                        Ok(text) => PreviewStatus::Ready(text),
                        Err(e) => PreviewStatus::Failed(e),
                    };
                }
            }
        }
    }

    /// Take a classroom returned by an update endpoint. Such responses may
    /// carry the roster as bare ids, so an already-populated roster is kept.
    fn merge_classroom(&mut self, mut classroom: Classroom) {
        if let Some(old) = &self.classroom {
            if classroom.students.is_empty() {
                classroom.students = old.students.clone();
            }
        }
        self.classroom = Some(classroom);
        self.recompute_summary();
    }

    /// Replace the content list, leaving out items deleted optimistically
    /// whose deletion has not been confirmed yet.
    fn replace_contents(&mut self, contents: Vec<CourseContentItem>) {
        let removed = &self.removed_contents;
        self.contents = contents
            .into_iter()
            .filter(|c| !removed.contains_key(&c.id))
            .collect();
        self.apply_content_filter();
    }

    /// Whether any request is running or queued; drives repaint scheduling.
    pub fn is_busy(&self) -> bool {
        self.in_flight.any()
            || !self.outbox.is_empty()
            || !self.removed_students.is_empty()
            || !self.removed_contents.is_empty()
            || matches!(
                self.preview,
                Some(PreviewWindow {
                    status: PreviewStatus::Loading,
                    ..
                })
            )
    }

    /// Path of the picked upload file, for display.
    pub fn upload_file_name(&self) -> Option<&str> {
        self.upload
            .path
            .as_deref()
            .and_then(Path::file_name)
            .and_then(|n| n.to_str())
    }
}
