// ClassDesk - core/content.rs
//
// Course content helpers: kind classification, MIME lookup for uploads,
// size formatting, preview selection, list filtering, upload validation.
// Core layer: pure logic, no I/O.

use crate::core::model::CourseContentItem;
use crate::util::constants::{CONTENT_TITLE_MAX_CHARS, MAX_CONTENT_UPLOAD_BYTES};
use crate::util::error::FormError;
use std::path::Path;

// =============================================================================
// Content kind
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Document,
    Image,
    Video,
    Audio,
    Archive,
    Other,
}

impl ContentKind {
    pub fn all() -> &'static [ContentKind] {
        &[
            ContentKind::Document,
            ContentKind::Image,
            ContentKind::Video,
            ContentKind::Audio,
            ContentKind::Archive,
            ContentKind::Other,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Document => "Document",
            Self::Image => "Image",
            Self::Video => "Video",
            Self::Audio => "Audio",
            Self::Archive => "Archive",
            Self::Other => "Other",
        }
    }

    /// Classify from the backend `type` field, falling back to the MIME type.
    pub fn classify(content_type: &str, mime_type: &str) -> Self {
        match content_type.trim().to_lowercase().as_str() {
            "document" | "pdf" | "doc" | "text" | "presentation" | "spreadsheet" => {
                return Self::Document
            }
            "image" => return Self::Image,
            "video" => return Self::Video,
            "audio" => return Self::Audio,
            "archive" | "zip" => return Self::Archive,
            _ => {}
        }

        let mime = mime_type.trim().to_lowercase();
        let (top, sub) = mime.split_once('/').unwrap_or((mime.as_str(), ""));
        match top {
            "image" => Self::Image,
            "video" => Self::Video,
            "audio" => Self::Audio,
            "text" => Self::Document,
            "application" => match sub {
                "pdf" | "msword" | "json" | "rtf" => Self::Document,
                s if s.starts_with("vnd.openxmlformats")
                    || s.starts_with("vnd.ms-")
                    || s.starts_with("vnd.oasis.opendocument") =>
                {
                    Self::Document
                }
                "zip" | "x-zip-compressed" | "x-7z-compressed" | "x-tar" | "gzip"
                | "x-rar-compressed" => Self::Archive,
                _ => Self::Other,
            },
            _ => Self::Other,
        }
    }

    pub fn of(item: &CourseContentItem) -> Self {
        Self::classify(&item.content_type, &item.mime_type)
    }
}

// =============================================================================
// MIME lookup
// =============================================================================

/// Extension -> MIME type table used for multipart uploads.
const MIME_TABLE: &[(&str, &str)] = &[
    ("pdf", "application/pdf"),
    ("doc", "application/msword"),
    (
        "docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
    ("ppt", "application/vnd.ms-powerpoint"),
    (
        "pptx",
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    ),
    ("xls", "application/vnd.ms-excel"),
    (
        "xlsx",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    ),
    ("csv", "text/csv"),
    ("txt", "text/plain"),
    ("md", "text/markdown"),
    ("json", "application/json"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("svg", "image/svg+xml"),
    ("mp4", "video/mp4"),
    ("webm", "video/webm"),
    ("mov", "video/quicktime"),
    ("mp3", "audio/mpeg"),
    ("wav", "audio/wav"),
    ("zip", "application/zip"),
];

/// Lower-cased extension of `path`, empty if none.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default()
}

/// MIME type for an upload, `application/octet-stream` when unknown.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = extension_of(path);
    MIME_TABLE
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, m)| *m)
        .unwrap_or("application/octet-stream")
}

// =============================================================================
// Formatting
// =============================================================================

/// Human-readable file size.
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    let b = bytes as f64;
    if b < KB {
        format!("{bytes} B")
    } else if b < KB * KB {
        format!("{:.1} KB", b / KB)
    } else if b < KB * KB * KB {
        format!("{:.1} MB", b / (KB * KB))
    } else {
        format!("{:.1} GB", b / (KB * KB * KB))
    }
}

// =============================================================================
// Preview
// =============================================================================

/// How a content item is previewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewKind {
    /// Fetched and shown inline in a monospace window.
    Text,
    Image,
    Pdf,
    /// Opened in the system browser.
    External,
}

impl PreviewKind {
    pub fn for_item(item: &CourseContentItem) -> Self {
        let mime = item.mime_type.trim().to_lowercase();
        let url_ext = item
            .file_url
            .rsplit('/')
            .next()
            .and_then(|name| name.split('?').next())
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();

        if mime.starts_with("text/")
            || mime == "application/json"
            || matches!(url_ext.as_str(), "txt" | "md" | "csv" | "json")
        {
            Self::Text
        } else if mime.starts_with("image/") {
            Self::Image
        } else if mime == "application/pdf" || url_ext == "pdf" {
            Self::Pdf
        } else {
            Self::External
        }
    }

    /// Whether the preview is fetched into the app rather than opened externally.
    pub fn is_inline(&self) -> bool {
        matches!(self, Self::Text)
    }
}

// =============================================================================
// Filtering
// =============================================================================

/// Content list filter. All fields are AND-combined.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentFilter {
    /// Case-insensitive substring over title and description.
    pub search: String,
    pub kind: Option<ContentKind>,
    pub public_only: bool,
}

/// Indices of matching items, newest first (undated last, stable).
pub fn apply_filter(items: &[CourseContentItem], filter: &ContentFilter) -> Vec<usize> {
    let needle = filter.search.trim().to_lowercase();
    let mut indices: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| {
            if filter.public_only && !item.is_public {
                return false;
            }
            if let Some(kind) = filter.kind {
                if ContentKind::of(item) != kind {
                    return false;
                }
            }
            needle.is_empty()
                || item.title.to_lowercase().contains(&needle)
                || item.description.to_lowercase().contains(&needle)
        })
        .map(|(idx, _)| idx)
        .collect();

    indices.sort_by(|&a, &b| items[b].created_at.cmp(&items[a].created_at));
    indices
}

// =============================================================================
// Upload validation
// =============================================================================

/// Check an upload before it is queued.
pub fn validate_upload(title: &str, path: Option<&Path>, size: u64) -> Result<(), FormError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(FormError::Required { field: "Title" });
    }
    if title.chars().count() > CONTENT_TITLE_MAX_CHARS {
        return Err(FormError::TooLong {
            field: "Title",
            max: CONTENT_TITLE_MAX_CHARS,
        });
    }
    if path.is_none() {
        return Err(FormError::Required { field: "File" });
    }
    if size > MAX_CONTENT_UPLOAD_BYTES {
        return Err(FormError::FileTooLarge {
            size,
            max: MAX_CONTENT_UPLOAD_BYTES,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::path::PathBuf;

    fn item(title: &str, ty: &str, mime: &str, public: bool, day: Option<u32>) -> CourseContentItem {
        CourseContentItem {
            id: title.to_string(),
            title: title.to_string(),
            content_type: ty.to_string(),
            mime_type: mime.to_string(),
            is_public: public,
            created_at: day.map(|d| Utc.with_ymd_and_hms(2024, 9, d, 0, 0, 0).unwrap()),
            ..Default::default()
        }
    }

    #[test]
    fn test_classify_prefers_type_then_mime() {
        assert_eq!(ContentKind::classify("video", "application/pdf"), ContentKind::Video);
        assert_eq!(ContentKind::classify("", "application/pdf"), ContentKind::Document);
        assert_eq!(ContentKind::classify("", "image/png"), ContentKind::Image);
        assert_eq!(
            ContentKind::classify(
                "",
                "application/vnd.openxmlformats-officedocument.presentationml.presentation"
            ),
            ContentKind::Document
        );
        assert_eq!(ContentKind::classify("", "application/zip"), ContentKind::Archive);
        assert_eq!(ContentKind::classify("", ""), ContentKind::Other);
    }

    #[test]
    fn test_mime_for_path() {
        assert_eq!(mime_for_path(&PathBuf::from("notes.PDF")), "application/pdf");
        assert_eq!(mime_for_path(&PathBuf::from("photo.jpeg")), "image/jpeg");
        assert_eq!(
            mime_for_path(&PathBuf::from("blob.bin")),
            "application/octet-stream"
        );
        assert_eq!(mime_for_path(&PathBuf::from("README")), "application/octet-stream");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.0 GB");
    }

    #[test]
    fn test_preview_kind() {
        let mut i = item("a", "", "text/plain", true, None);
        assert_eq!(PreviewKind::for_item(&i), PreviewKind::Text);
        i.mime_type = String::new();
        i.file_url = "/uploads/syllabus.md?v=2".to_string();
        assert_eq!(PreviewKind::for_item(&i), PreviewKind::Text);
        i.file_url = "/uploads/unit1.pdf".to_string();
        assert_eq!(PreviewKind::for_item(&i), PreviewKind::Pdf);
        i.mime_type = "image/png".to_string();
        i.file_url = "/uploads/diagram".to_string();
        assert_eq!(PreviewKind::for_item(&i), PreviewKind::Image);
        i.mime_type = "video/mp4".to_string();
        assert_eq!(PreviewKind::for_item(&i), PreviewKind::External);
        assert!(!PreviewKind::External.is_inline());
    }

    #[test]
    fn test_filter_newest_first() {
        let items = vec![
            item("Syllabus", "document", "", true, Some(1)),
            item("Lecture video", "video", "", false, Some(5)),
            item("Lab sheet", "", "application/pdf", true, None),
            item("Diagram", "", "image/png", true, Some(3)),
        ];
        assert_eq!(apply_filter(&items, &ContentFilter::default()), vec![1, 3, 0, 2]);

        let f = ContentFilter {
            public_only: true,
            kind: Some(ContentKind::Document),
            ..Default::default()
        };
        assert_eq!(apply_filter(&items, &f), vec![0, 2]);

        let f = ContentFilter {
            search: "SHEET".to_string(),
            ..Default::default()
        };
        assert_eq!(apply_filter(&items, &f), vec![2]);
    }

    #[test]
    fn test_validate_upload() {
        let p = PathBuf::from("a.pdf");
        assert!(validate_upload("Week 1", Some(&p), 10).is_ok());
        assert_eq!(
            validate_upload("  ", Some(&p), 10),
            Err(FormError::Required { field: "Title" })
        );
        assert_eq!(
            validate_upload("Week 1", None, 0),
            Err(FormError::Required { field: "File" })
        );
        assert!(matches!(
            validate_upload("Week 1", Some(&p), MAX_CONTENT_UPLOAD_BYTES + 1),
            Err(FormError::FileTooLarge { .. })
        ));
    }
}
