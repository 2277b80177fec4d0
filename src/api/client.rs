// ClassDesk - api/client.rs
//
// Blocking HTTP client for the external classroom REST API.
//
// Every call is a single request/response: no retries, no caching. Calls are
// made from background worker threads (see app::requests), never from the
// UI thread.
//
// Response bodies are JSON. Successful responses are normally wrapped as
// `{ "success": true, "message": "...", "data": <payload> }`; a bare payload
// is accepted too. Error responses carry the server's message in `message`
// (or `error`), which is surfaced to the user unchanged.
//
// The bearer token is attached to API calls and to same-origin file fetches
// only, and is never logged.

use crate::core::content::mime_for_path;
use crate::core::model::{
    Classroom, ClassroomUpdate, ContentUpload, CourseContentItem, ImportSummary, NewStudent,
    Student, TextPreview,
};
use crate::util::constants::{
    MAX_CONTENT_UPLOAD_BYTES, MAX_COVER_IMAGE_BYTES, MAX_IMPORT_FILE_BYTES,
    MAX_TEXT_PREVIEW_BYTES, USER_AGENT,
};
use crate::util::error::ApiError;
use reqwest::blocking::{multipart, Client, RequestBuilder};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::io::Read;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Connection settings for `ApiClient`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

/// Parse and normalise a server base URL so relative joins keep its path.
pub fn parse_base_url(raw: &str) -> Result<Url, ApiError> {
    let raw = raw.trim();
    let mut base = Url::parse(raw).map_err(|e| ApiError::InvalidUrl {
        url: raw.to_string(),
        source: e,
    })?;
    if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
        return Err(ApiError::InvalidUrl {
            url: raw.to_string(),
            source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
        });
    }
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base)
}

/// Resolve a content `fileUrl` (absolute, or relative to the server).
pub fn resolve_file_url(base: &Url, file_url: &str) -> Result<Url, ApiError> {
    base.join(file_url.trim()).map_err(|e| ApiError::InvalidUrl {
        url: file_url.to_string(),
        source: e,
    })
}

/// Client for the classroom REST API. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base: Url,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let base = parse_base_url(&config.base_url)?;
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ApiError::Client { source: e })?;

        let token = config
            .token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);

        tracing::debug!(
            base_url = %base,
            authenticated = token.is_some(),
            "API client initialised"
        );

        Ok(Self {
            client,
            base,
            token,
        })
    }

    // -------------------------------------------------------------------------
    // Classroom
    // -------------------------------------------------------------------------

    pub fn get_classroom(&self, classroom_id: &str) -> Result<Classroom, ApiError> {
        let url = self.url(&["api", "classrooms", classroom_id])?;
        self.fetch(self.client.get(url))
    }

    pub fn update_classroom(
        &self,
        classroom_id: &str,
        update: &ClassroomUpdate,
    ) -> Result<Classroom, ApiError> {
        let url = self.url(&["api", "classrooms", classroom_id])?;
        self.fetch(self.client.put(url).json(update))
    }

    pub fn upload_cover_image(
        &self,
        classroom_id: &str,
        path: &Path,
    ) -> Result<Classroom, ApiError> {
        let url = self.url(&["api", "classrooms", classroom_id, "cover-image"])?;
        let form = multipart::Form::new().part(
            "coverImage",
            file_part(path, MAX_COVER_IMAGE_BYTES)?,
        );
        self.fetch(self.client.post(url).multipart(form))
    }

    // -------------------------------------------------------------------------
    // Students
    // -------------------------------------------------------------------------

    pub fn list_students(&self, classroom_id: &str) -> Result<Vec<Student>, ApiError> {
        let url = self.url(&["api", "classrooms", classroom_id, "students"])?;
        self.fetch(self.client.get(url))
    }

    pub fn add_student(&self, classroom_id: &str, student: &NewStudent) -> Result<Student, ApiError> {
        let url = self.url(&["api", "classrooms", classroom_id, "students"])?;
        self.fetch(self.client.post(url).json(student))
    }

    pub fn remove_student(&self, classroom_id: &str, student_id: &str) -> Result<(), ApiError> {
        let url = self.url(&["api", "classrooms", classroom_id, "students", student_id])?;
        self.send(self.client.delete(url))
    }

    pub fn import_students(&self, classroom_id: &str, path: &Path) -> Result<ImportSummary, ApiError> {
        let url = self.url(&["api", "classrooms", classroom_id, "students", "import"])?;
        let form = multipart::Form::new().part("file", file_part(path, MAX_IMPORT_FILE_BYTES)?);
        self.fetch(self.client.post(url).multipart(form))
    }

    // -------------------------------------------------------------------------
    // Course content
    // -------------------------------------------------------------------------

    pub fn list_content(&self, classroom_id: &str) -> Result<Vec<CourseContentItem>, ApiError> {
        let url = self.url(&["api", "classrooms", classroom_id, "content"])?;
        self.fetch(self.client.get(url))
    }

    pub fn upload_content(
        &self,
        classroom_id: &str,
        upload: &ContentUpload,
    ) -> Result<CourseContentItem, ApiError> {
        let url = self.url(&["api", "classrooms", classroom_id, "content"])?;
        let form = multipart::Form::new()
            .text("title", upload.title.trim().to_string())
            .text("description", upload.description.trim().to_string())
            .text("isPublic", upload.is_public.to_string())
            .part("file", file_part(&upload.path, MAX_CONTENT_UPLOAD_BYTES)?);
        self.fetch(self.client.post(url).multipart(form))
    }

    pub fn delete_content(&self, classroom_id: &str, content_id: &str) -> Result<(), ApiError> {
        let url = self.url(&["api", "classrooms", classroom_id, "content", content_id])?;
        self.send(self.client.delete(url))
    }

    /// Fetch the start of a text file for inline preview.
    pub fn fetch_text(&self, file_url: &str) -> Result<TextPreview, ApiError> {
        let url = resolve_file_url(&self.base, file_url)?;
        let endpoint = format!("GET {}", url.path());
        let same_origin = url.origin() == self.base.origin();

        let mut request = self.client.get(url);
        if same_origin {
            if let Some(token) = &self.token {
                request = request.bearer_auth(token);
            }
        }

        let response = request.send().map_err(|e| ApiError::Transport {
            endpoint: endpoint.clone(),
            source: e,
        })?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }

        let mut bytes = Vec::new();
        response
            .take(MAX_TEXT_PREVIEW_BYTES + 1)
            .read_to_end(&mut bytes)
            .map_err(|e| ApiError::Io {
                path: endpoint.clone().into(),
                source: e,
            })?;
        let truncated = bytes.len() as u64 > MAX_TEXT_PREVIEW_BYTES;
        bytes.truncate(MAX_TEXT_PREVIEW_BYTES as usize);

        tracing::debug!(endpoint = %endpoint, bytes = bytes.len(), truncated, "Text preview fetched");
        Ok(TextPreview {
            text: String::from_utf8_lossy(&bytes).into_owned(),
            truncated,
        })
    }

    // -------------------------------------------------------------------------
    // Plumbing
    // -------------------------------------------------------------------------

    /// Base URL plus percent-encoded path segments.
    fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl {
                url: self.base.to_string(),
                source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request, returning the endpoint label and the raw body of a
    /// success response.
    fn execute(&self, request: RequestBuilder) -> Result<(String, String), ApiError> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let request = request.build().map_err(|e| ApiError::Client { source: e })?;
        let endpoint = format!("{} {}", request.method(), request.url().path());

        let response = self
            .client
            .execute(request)
            .map_err(|e| ApiError::Transport {
                endpoint: endpoint.clone(),
                source: e,
            })?;
        let status = response.status();
        let body = response.text().map_err(|e| ApiError::Transport {
            endpoint: endpoint.clone(),
            source: e,
        })?;

        if !status.is_success() {
            let message = error_message(status, &body);
            tracing::warn!(
                endpoint = %endpoint,
                status = status.as_u16(),
                %message,
                "API request rejected"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        tracing::debug!(
            endpoint = %endpoint,
            status = status.as_u16(),
            bytes = body.len(),
            "API request ok"
        );
        Ok((endpoint, body))
    }

    /// Send a request whose response body is ignored.
    fn send(&self, request: RequestBuilder) -> Result<(), ApiError> {
        self.execute(request).map(|_| ())
    }

    /// Send a request and decode its payload.
    fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let (endpoint, body) = self.execute(request)?;
        decode_payload(&endpoint, &body)
    }
}

/// Read a file into a multipart part, enforcing `max` bytes.
fn file_part(path: &Path, max: u64) -> Result<multipart::Part, ApiError> {
    let io_err = |e| ApiError::Io {
        path: path.to_path_buf(),
        source: e,
    };
    let size = std::fs::metadata(path).map_err(io_err)?.len();
    if size > max {
        return Err(ApiError::FileTooLarge {
            path: path.to_path_buf(),
            size,
            max,
        });
    }
    let bytes = std::fs::read(path).map_err(io_err)?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload")
        .to_string();

    multipart::Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(mime_for_path(path))
        .map_err(|e| ApiError::Client { source: e })
}

/// Unwrap the `data` field of a response envelope, or take the body as-is.
fn decode_payload<T: DeserializeOwned>(endpoint: &str, body: &str) -> Result<T, ApiError> {
    let decode_err = |e| ApiError::Decode {
        endpoint: endpoint.to_string(),
        source: e,
    };
    let value: Value = serde_json::from_str(body).map_err(decode_err)?;
    let payload = match value {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    };
    if payload.is_null() {
        return Err(ApiError::MissingData {
            endpoint: endpoint.to_string(),
        });
    }
    serde_json::from_value(payload).map_err(decode_err)
}

/// The server's own error message, or the HTTP reason phrase.
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            ["message", "error"].iter().find_map(|key| {
                v.get(key)
                    .and_then(Value::as_str)
                    .filter(|m| !m.trim().is_empty())
                    .map(str::to_string)
            })
        })
        .unwrap_or_else(|| match status.canonical_reason() {
            Some(reason) => format!("{} {reason}", status.as_u16()),
            None => format!("HTTP {}", status.as_u16()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_base_url_normalises_trailing_slash() {
        let base = parse_base_url(" https://school.example/v1 ").unwrap();
        assert_eq!(base.as_str(), "https://school.example/v1/");
        assert!(parse_base_url("not a url").is_err());
        assert!(parse_base_url("ftp://school.example").is_err());
    }

    #[test]
    fn test_resolve_file_url() {
        let base = parse_base_url("http://localhost:5000").unwrap();
        assert_eq!(
            resolve_file_url(&base, "/uploads/a.pdf").unwrap().as_str(),
            "http://localhost:5000/uploads/a.pdf"
        );
        assert_eq!(
            resolve_file_url(&base, "https://cdn.example/a.pdf").unwrap().as_str(),
            "https://cdn.example/a.pdf"
        );
    }

    #[test]
    fn test_url_segments_are_encoded() {
        let client = ApiClient::new(&ApiConfig {
            base_url: "http://localhost:5000/school".to_string(),
            token: None,
            timeout: Duration::from_secs(5),
        })
        .unwrap();
        let url = client.url(&["api", "classrooms", "a b/c"]).unwrap();
        assert_eq!(url.path(), "/school/api/classrooms/a%20b%2Fc");
    }

    #[test]
    fn test_decode_payload_envelope_and_bare() {
        let s: Student =
            decode_payload("GET /x", r#"{"success":true,"data":{"_id":"1","name":"A"}}"#).unwrap();
        assert_eq!(s.id, "1");
        let s: Student = decode_payload("GET /x", r#"{"_id":"2","name":"B"}"#).unwrap();
        assert_eq!(s.id, "2");
        let err = decode_payload::<Student>("GET /x", r#"{"success":true,"data":null}"#);
        assert!(matches!(err, Err(ApiError::MissingData { .. })));
        let err = decode_payload::<Vec<Student>>("GET /x", "<html>");
        assert!(matches!(err, Err(ApiError::Decode { .. })));
    }

    #[test]
    fn test_error_message_prefers_server_text() {
        assert_eq!(
            error_message(StatusCode::CONFLICT, r#"{"message":"Email already exists"}"#),
            "Email already exists"
        );
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, r#"{"error":"Bad file"}"#),
            "Bad file"
        );
        assert_eq!(error_message(StatusCode::NOT_FOUND, ""), "404 Not Found");
    }

    #[test]
    fn test_error_message_skips_blank_message() {
        assert_eq!(
            error_message(
                StatusCode::BAD_REQUEST,
                r#"{"message":"","error":"Bad classroom id"}"#
            ),
            "Bad classroom id"
        );
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, r#"{"message":"  "}"#),
            "400 Bad Request"
        );
    }
}
