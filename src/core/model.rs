// ClassDesk - core/model.rs
//
// Core data model types. Pure data definitions with no I/O, no UI,
// no platform dependencies.
//
// Records mirror what the classroom REST API returns. They are transient,
// re-fetchable copies: the backend owns them and nothing here enforces
// invariants beyond "reflects the last successful fetch".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

// =============================================================================
// Lenient field decoders
// =============================================================================

/// Treat `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept a string, a number, or null (roll numbers arrive as either).
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

/// Classroom `students` may be populated records or bare id strings.
fn students_lenient<'de, D>(deserializer: D) -> Result<Vec<Student>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StudentOrId {
        Id(String),
        Student(Student),
    }

    let items = Option::<Vec<StudentOrId>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(items
        .into_iter()
        .map(|item| match item {
            StudentOrId::Id(id) => Student {
                id,
                ..Default::default()
            },
            StudentOrId::Student(s) => s,
        })
        .collect())
}

// =============================================================================
// Student
// =============================================================================

/// An enrolled student.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Student {
    #[serde(rename = "_id", alias = "id", deserialize_with = "null_as_default")]
    pub id: String,

    #[serde(deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(deserialize_with = "null_as_default")]
    pub email: String,

    /// Free-form roll number; empty when the school does not use them.
    #[serde(deserialize_with = "string_or_number")]
    pub roll_number: String,

    /// Enrolment time. `None` for records created before the backend tracked it.
    pub created_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Classroom
// =============================================================================

/// A classroom: a grouping of students and content managed by a teacher.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Classroom {
    #[serde(rename = "_id", alias = "id", deserialize_with = "null_as_default")]
    pub id: String,

    #[serde(deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(deserialize_with = "null_as_default")]
    pub description: String,

    #[serde(deserialize_with = "null_as_default")]
    pub subject: String,

    /// URL of the cover image, absolute or relative to the server.
    pub cover_image: Option<String>,

    #[serde(deserialize_with = "students_lenient")]
    pub students: Vec<Student>,
}

/// Fields sent to `PUT /api/classrooms/{id}`. Only changed fields are set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassroomUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

impl ClassroomUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.subject.is_none()
    }
}

/// Body of `POST /api/classrooms/{id}/students`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStudent {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roll_number: Option<String>,
}

// =============================================================================
// Course content
// =============================================================================

/// Who uploaded a content item: either a bare user id or an embedded user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Uploader {
    Id(String),
    User {
        #[serde(rename = "_id", alias = "id", default)]
        id: String,
        #[serde(default)]
        name: String,
    },
}

impl Uploader {
    /// Name to show in the content list.
    pub fn display_name(&self) -> &str {
        match self {
            Self::User { name, .. } if !name.is_empty() => name,
            Self::User { id, .. } => id,
            Self::Id(id) => id,
        }
    }
}

/// An uploaded file resource associated with a classroom.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CourseContentItem {
    #[serde(rename = "_id", alias = "id", deserialize_with = "null_as_default")]
    pub id: String,

    #[serde(deserialize_with = "null_as_default")]
    pub title: String,

    #[serde(deserialize_with = "null_as_default")]
    pub description: String,

    /// Backend content category ("document", "video", ...). May be empty.
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub content_type: String,

    #[serde(deserialize_with = "null_as_default")]
    pub mime_type: String,

    #[serde(deserialize_with = "null_as_default")]
    pub file_url: String,

    #[serde(deserialize_with = "null_as_default")]
    pub file_size: u64,

    #[serde(deserialize_with = "null_as_default")]
    pub is_public: bool,

    pub uploaded_by: Option<Uploader>,

    pub created_at: Option<DateTime<Utc>>,
}

/// A content upload request assembled by the content panel.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentUpload {
    pub path: PathBuf,
    pub title: String,
    pub description: String,
    pub is_public: bool,
}

/// A fetched text preview of a content file.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPreview {
    pub text: String,
    /// True when the file was larger than the preview cap.
    pub truncated: bool,
}

// =============================================================================
// Bulk import
// =============================================================================

/// Result of a server-side bulk import.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImportSummary {
    pub total_rows: usize,
    pub imported: usize,
    pub skipped: usize,
    pub failed: usize,
    pub errors: Vec<ImportRowError>,
}

/// A per-row problem reported by the import endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImportRowError {
    pub row: usize,
    pub field: String,
    pub message: String,
}

// =============================================================================
// Classroom summary
// =============================================================================

/// Summary counts shown in the classroom detail header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassroomSummary {
    pub student_count: usize,
    pub content_count: usize,
    pub public_content_count: usize,
    pub total_content_bytes: u64,
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl ClassroomSummary {
    /// Derive counts from the latest classroom and content copies.
    pub fn compute(
        students: &[Student],
        contents: &[CourseContentItem],
        refreshed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            student_count: students.len(),
            content_count: contents.len(),
            public_content_count: contents.iter().filter(|c| c.is_public).count(),
            total_content_bytes: contents.iter().map(|c| c.file_size).sum(),
            refreshed_at: Some(refreshed_at),
        }
    }
}

// =============================================================================
// Panels
// =============================================================================

/// The panels of the classroom detail shell. The last four are tabs;
/// `Detail` is the shell itself (connection and refresh banners).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Panel {
    Detail,
    #[default]
    Students,
    Content,
    Import,
    Settings,
}

impl Panel {
    /// Tabs in display order.
    pub fn tabs() -> &'static [Panel] {
        &[
            Panel::Students,
            Panel::Content,
            Panel::Import,
            Panel::Settings,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Panel::Detail => "Classroom",
            Panel::Students => "Students",
            Panel::Content => "Course Content",
            Panel::Import => "Bulk Import",
            Panel::Settings => "Settings",
        }
    }
}

// =============================================================================
// Background request messages
// =============================================================================

/// A request queued by a panel and executed on a background thread.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiRequest {
    LoadClassroom {
        classroom_id: String,
    },
    /// Re-fetch classroom and content together for the summary counts.
    RefreshSummary {
        classroom_id: String,
    },
    UpdateClassroom {
        classroom_id: String,
        update: ClassroomUpdate,
    },
    UploadCoverImage {
        classroom_id: String,
        path: PathBuf,
    },
    LoadStudents {
        classroom_id: String,
    },
    AddStudent {
        classroom_id: String,
        student: NewStudent,
    },
    RemoveStudent {
        classroom_id: String,
        student_id: String,
    },
    ImportStudents {
        classroom_id: String,
        path: PathBuf,
    },
    LoadContent {
        classroom_id: String,
    },
    UploadContent {
        classroom_id: String,
        upload: ContentUpload,
    },
    DeleteContent {
        classroom_id: String,
        content_id: String,
    },
    PreviewContent {
        content_id: String,
        file_url: String,
    },
}

impl ApiRequest {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoadClassroom { .. } => "load_classroom",
            Self::RefreshSummary { .. } => "refresh_summary",
            Self::UpdateClassroom { .. } => "update_classroom",
            Self::UploadCoverImage { .. } => "upload_cover_image",
            Self::LoadStudents { .. } => "load_students",
            Self::AddStudent { .. } => "add_student",
            Self::RemoveStudent { .. } => "remove_student",
            Self::ImportStudents { .. } => "import_students",
            Self::LoadContent { .. } => "load_content",
            Self::UploadContent { .. } => "upload_content",
            Self::DeleteContent { .. } => "delete_content",
            Self::PreviewContent { .. } => "preview_content",
        }
    }
}

/// Completion of an `ApiRequest`, sent from the worker to the UI thread.
///
/// Errors are carried as display strings: the UI only ever shows them.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiEvent {
    ClassroomLoaded(Result<Classroom, String>),
    SummaryRefreshed(Result<(Classroom, Vec<CourseContentItem>), String>),
    ClassroomUpdated(Result<Classroom, String>),
    CoverImageUploaded(Result<Classroom, String>),
    StudentsLoaded(Result<Vec<Student>, String>),
    StudentAdded(Result<Student, String>),
    StudentRemoved {
        student_id: String,
        result: Result<(), String>,
    },
    StudentsImported(Result<ImportSummary, String>),
    ContentLoaded(Result<Vec<CourseContentItem>, String>),
    ContentUploaded(Result<CourseContentItem, String>),
    ContentDeleted {
        content_id: String,
        result: Result<(), String>,
    },
    PreviewLoaded {
        content_id: String,
        result: Result<TextPreview, String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_accepts_mongo_style_ids_and_numeric_roll() {
        let json = r#"{"_id":"s1","name":"Ada","email":"ada@example.com","rollNumber":42,
                       "createdAt":"2024-09-01T08:00:00Z","extra":true}"#;
        let s: Student = serde_json::from_str(json).unwrap();
        assert_eq!(s.id, "s1");
        assert_eq!(s.roll_number, "42");
        assert!(s.created_at.is_some());
    }

    #[test]
    fn test_student_tolerates_nulls_and_plain_id() {
        let json = r#"{"id":"s2","name":null,"email":"b@example.com","rollNumber":null}"#;
        let s: Student = serde_json::from_str(json).unwrap();
        assert_eq!(s.id, "s2");
        assert_eq!(s.name, "");
        assert_eq!(s.roll_number, "");
        assert!(s.created_at.is_none());
    }

    #[test]
    fn test_classroom_students_may_be_ids() {
        let json = r#"{"_id":"c1","name":"Physics","students":["a","b",{"_id":"c","name":"Cy"}]}"#;
        let c: Classroom = serde_json::from_str(json).unwrap();
        assert_eq!(c.students.len(), 3);
        assert_eq!(c.students[0].id, "a");
        assert_eq!(c.students[2].name, "Cy");
        assert!(c.cover_image.is_none());
    }

    #[test]
    fn test_content_uploader_shapes() {
        let by_id: CourseContentItem =
            serde_json::from_str(r#"{"_id":"x","title":"T","uploadedBy":"u1"}"#).unwrap();
        assert_eq!(by_id.uploaded_by.unwrap().display_name(), "u1");

        let by_user: CourseContentItem = serde_json::from_str(
            r#"{"_id":"y","title":"T","type":"video","uploadedBy":{"_id":"u2","name":"Ms. Lee"}}"#,
        )
        .unwrap();
        assert_eq!(by_user.content_type, "video");
        assert_eq!(by_user.uploaded_by.unwrap().display_name(), "Ms. Lee");
    }

    #[test]
    fn test_classroom_update_serialises_only_changed_fields() {
        let update = ClassroomUpdate {
            subject: Some("Chemistry".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(json, r#"{"subject":"Chemistry"}"#);
        assert!(!update.is_empty());
        assert!(ClassroomUpdate::default().is_empty());
    }

    #[test]
    fn test_summary_counts() {
        let students = vec![Student::default(), Student::default()];
        let contents = vec![
            CourseContentItem {
                file_size: 100,
                is_public: true,
                ..Default::default()
            },
            CourseContentItem {
                file_size: 50,
                ..Default::default()
            },
        ];
        let now = Utc::now();
        let summary = ClassroomSummary::compute(&students, &contents, now);
        assert_eq!(summary.student_count, 2);
        assert_eq!(summary.content_count, 2);
        assert_eq!(summary.public_content_count, 1);
        assert_eq!(summary.total_content_bytes, 150);
        assert_eq!(summary.refreshed_at, Some(now));
    }
}
