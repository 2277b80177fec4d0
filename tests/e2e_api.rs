// ClassDesk - tests/e2e_api.rs
//
// End-to-end tests for the classroom API client against a local mock
// server: real HTTP, real JSON decoding, real multipart bodies.

use classdesk::api::{ApiClient, ApiConfig};
use classdesk::app::requests::{execute, RequestManager};
use classdesk::core::model::{
    ApiEvent, ApiRequest, ClassroomUpdate, ContentUpload, NewStudent,
};
use classdesk::util::error::ApiError;
use httpmock::prelude::*;
use serde_json::json;
use std::time::{Duration, Instant};

// =============================================================================
// Helpers
// =============================================================================

fn client(server: &MockServer, token: Option<&str>) -> ApiClient {
    ApiClient::new(&ApiConfig {
        base_url: server.base_url(),
        token: token.map(str::to_string),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

fn classroom_json() -> serde_json::Value {
    json!({
        "_id": "c1",
        "name": "Physics 101",
        "description": "Mechanics and waves",
        "subject": "Physics",
        "coverImage": "/uploads/covers/c1.png",
        "students": ["s1", "s2"]
    })
}

// =============================================================================
// Classroom
// =============================================================================

#[test]
fn e2e_get_classroom_sends_bearer_and_unwraps_envelope() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/classrooms/c1")
            .header("authorization", "Bearer secret-token");
        then.status(200)
            .json_body(json!({ "success": true, "data": classroom_json() }));
    });

    let classroom = client(&server, Some("secret-token"))
        .get_classroom("c1")
        .unwrap();

    mock.assert();
    assert_eq!(classroom.id, "c1");
    assert_eq!(classroom.name, "Physics 101");
    assert_eq!(classroom.subject, "Physics");
    assert_eq!(classroom.cover_image.as_deref(), Some("/uploads/covers/c1.png"));
    assert_eq!(classroom.students.len(), 2);
}

#[test]
fn e2e_update_classroom_sends_only_changed_fields() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(PUT)
            .path("/api/classrooms/c1")
            .json_body(json!({ "name": "Physics II" }));
        then.status(200).json_body(json!({
            "success": true,
            "message": "Classroom updated",
            "data": { "_id": "c1", "name": "Physics II", "subject": "Physics" }
        }));
    });

    let update = ClassroomUpdate {
        name: Some("Physics II".to_string()),
        ..Default::default()
    };
    let classroom = client(&server, None).update_classroom("c1", &update).unwrap();

    mock.assert();
    assert_eq!(classroom.name, "Physics II");
}

#[test]
fn e2e_cover_image_upload_is_multipart() {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("cover.png");
    std::fs::write(&image, "fake png bytes").unwrap();

    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/classrooms/c1/cover-image")
            .header_exists("content-type")
            .body_contains("name=\"coverImage\"")
            .body_contains("filename=\"cover.png\"");
        then.status(200).json_body(json!({
            "success": true,
            "data": { "_id": "c1", "name": "Physics 101", "coverImage": "/uploads/covers/new.png" }
        }));
    });

    let classroom = client(&server, None).upload_cover_image("c1", &image).unwrap();
    mock.assert();
    assert_eq!(classroom.cover_image.as_deref(), Some("/uploads/covers/new.png"));
}

// =============================================================================
// Students
// =============================================================================

#[test]
fn e2e_list_students_accepts_bare_array() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/classrooms/c1/students");
        then.status(200).json_body(json!([
            { "_id": "s1", "name": "Ada", "email": "ada@example.com", "rollNumber": 7,
              "createdAt": "2026-09-01T10:00:00Z" },
            { "_id": "s2", "name": "Grace", "email": "grace@example.com" }
        ]));
    });

    let students = client(&server, None).list_students("c1").unwrap();
    assert_eq!(students.len(), 2);
    assert_eq!(students[0].roll_number, "7");
    assert!(students[0].created_at.is_some());
    assert_eq!(students[1].roll_number, "");
    assert!(students[1].created_at.is_none());
}

#[test]
fn e2e_add_student_conflict_message_is_forwarded() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/classrooms/c1/students")
            .json_body(json!({ "name": "Ada", "email": "ada@example.com" }));
        then.status(409)
            .json_body(json!({ "success": false, "message": "Student already enrolled" }));
    });

    let err = client(&server, None)
        .add_student(
            "c1",
            &NewStudent {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                roll_number: None,
            },
        )
        .unwrap_err();

    mock.assert();
    assert!(matches!(err, ApiError::Status { status: 409, .. }));
    assert_eq!(err.to_string(), "Student already enrolled");
}

#[test]
fn e2e_remove_student_ignores_response_body() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(DELETE).path("/api/classrooms/c1/students/s1");
        then.status(204);
    });

    client(&server, None).remove_student("c1", "s1").unwrap();
    mock.assert();
}

#[test]
fn e2e_import_students_returns_summary() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("students.csv");
    std::fs::write(&csv, "name,email\nAda,ada@example.com\nBob,\n").unwrap();

    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/classrooms/c1/students/import")
            .body_contains("filename=\"students.csv\"")
            .body_contains("ada@example.com");
        then.status(200).json_body(json!({
            "success": true,
            "data": {
                "totalRows": 2,
                "imported": 1,
                "skipped": 0,
                "failed": 1,
                "errors": [{ "row": 3, "field": "email", "message": "Email is required" }]
            }
        }));
    });

    let summary = client(&server, None).import_students("c1", &csv).unwrap();
    mock.assert();
    assert_eq!(summary.total_rows, 2);
    assert_eq!(summary.imported, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.errors[0].row, 3);
    assert_eq!(summary.errors[0].field, "email");
}

// =============================================================================
// Course content
// =============================================================================

#[test]
fn e2e_upload_content_sends_fields_and_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("notes.txt");
    std::fs::write(&file, "Newton's laws").unwrap();

    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/classrooms/c1/content")
            .body_contains("name=\"title\"")
            .body_contains("Week 1 notes")
            .body_contains("name=\"isPublic\"")
            .body_contains("Newton's laws");
        then.status(201).json_body(json!({
            "success": true,
            "data": {
                "_id": "k1",
                "title": "Week 1 notes",
                "mimeType": "text/plain",
                "fileUrl": "/uploads/content/notes.txt",
                "fileSize": 13,
                "isPublic": true,
                "uploadedBy": { "_id": "t1", "name": "Ms Noether" }
            }
        }));
    });

    let item = client(&server, None)
        .upload_content(
            "c1",
            &ContentUpload {
                path: file,
                title: " Week 1 notes ".to_string(),
                description: String::new(),
                is_public: true,
            },
        )
        .unwrap();

    mock.assert();
    assert_eq!(item.id, "k1");
    assert!(item.is_public);
    assert_eq!(
        item.uploaded_by.as_ref().map(|u| u.display_name()),
        Some("Ms Noether")
    );
}

#[test]
fn e2e_upload_rejects_oversized_file_before_sending() {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("huge.png");
    let file = std::fs::File::create(&image).unwrap();
    file.set_len(classdesk::util::constants::MAX_COVER_IMAGE_BYTES + 1)
        .unwrap();

    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/api/classrooms/c1/cover-image");
        then.status(200);
    });

    let err = client(&server, None)
        .upload_cover_image("c1", &image)
        .unwrap_err();
    assert!(matches!(err, ApiError::FileTooLarge { .. }));
    assert_eq!(mock.hits(), 0);
}

#[test]
fn e2e_fetch_text_resolves_relative_url_with_token() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/uploads/content/notes.txt")
            .header("authorization", "Bearer tok");
        then.status(200).body("line one\nline two\n");
    });

    let preview = client(&server, Some("tok"))
        .fetch_text("/uploads/content/notes.txt")
        .unwrap();
    mock.assert();
    assert_eq!(preview.text, "line one\nline two\n");
    assert!(!preview.truncated);
}

#[test]
fn e2e_fetch_text_truncates_large_files() {
    let limit = classdesk::util::constants::MAX_TEXT_PREVIEW_BYTES as usize;
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/big.txt");
        then.status(200).body("x".repeat(limit + 100));
    });

    let preview = client(&server, None).fetch_text("/big.txt").unwrap();
    assert!(preview.truncated);
    assert_eq!(preview.text.len(), limit);
}

// =============================================================================
// Request pipeline
// =============================================================================

#[test]
fn e2e_refresh_summary_fetches_classroom_and_content() {
    let server = MockServer::start();
    let classroom = server.mock(|when, then| {
        when.method(GET).path("/api/classrooms/c1");
        then.status(200).json_body(json!({ "data": classroom_json() }));
    });
    let content = server.mock(|when, then| {
        when.method(GET).path("/api/classrooms/c1/content");
        then.status(200).json_body(json!({ "data": [
            { "_id": "k1", "title": "A", "fileSize": 10, "isPublic": true },
            { "_id": "k2", "title": "B", "fileSize": 5 }
        ]}));
    });

    let event = execute(
        &client(&server, None),
        ApiRequest::RefreshSummary {
            classroom_id: "c1".to_string(),
        },
    );

    classroom.assert();
    content.assert();
    match event {
        ApiEvent::SummaryRefreshed(Ok((c, items))) => {
            assert_eq!(c.students.len(), 2);
            assert_eq!(items.len(), 2);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn e2e_request_manager_reports_server_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(DELETE).path("/api/classrooms/c1/content/k1");
        then.status(403).json_body(json!({ "message": "Not your classroom" }));
    });

    let manager = RequestManager::new();
    manager.dispatch(
        client(&server, None),
        ApiRequest::DeleteContent {
            classroom_id: "c1".to_string(),
            content_id: "k1".to_string(),
        },
    );

    let deadline = Instant::now() + Duration::from_secs(10);
    let mut events = Vec::new();
    while events.is_empty() && Instant::now() < deadline {
        events = manager.poll_events();
        std::thread::sleep(Duration::from_millis(10));
    }
    match events.as_slice() {
        [ApiEvent::ContentDeleted { content_id, result }] => {
            assert_eq!(content_id, "k1");
            assert_eq!(result.as_ref().unwrap_err(), "Not your classroom");
        }
        other => panic!("unexpected events {other:?}"),
    }
}
