// ClassDesk - app/requests.rs
//
// Background execution of API requests. Each request runs on its own worker
// thread and reports a single `ApiEvent` back to the UI thread over an mpsc
// channel.
//
// Architecture:
//   - `RequestManager` lives on the UI thread; `execute` runs on a worker.
//   - The UI polls `poll_events` once per frame and never blocks.
//   - There is no cancellation. Switching classroom replaces the manager;
//     workers of the old one finish and their sends fail silently.

use crate::api::ApiClient;
use crate::core::model::{ApiEvent, ApiRequest};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};

/// Dispatches requests to worker threads and collects their results.
pub struct RequestManager {
    tx: mpsc::Sender<ApiEvent>,
    rx: mpsc::Receiver<ApiEvent>,

    /// Requests dispatched whose event has not been sent yet.
    pending: Arc<AtomicUsize>,
}

impl RequestManager {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            tx,
            rx,
            pending: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Run `request` on a background thread using `client`.
    pub fn dispatch(&self, client: ApiClient, request: ApiRequest) {
        let tx = self.tx.clone();
        let pending = Arc::clone(&self.pending);
        pending.fetch_add(1, Ordering::SeqCst);

        let name = request.name();
        tracing::debug!(request = name, "Dispatching API request");
        let fallback = request.clone();

        let spawned = std::thread::Builder::new()
            .name(format!("api-{name}"))
            .spawn(move || {
                let event = execute(&client, request);
                pending.fetch_sub(1, Ordering::SeqCst);
                // Receiver dropped means the UI closed; nothing to report.
                let _ = tx.send(event);
            });

        if let Err(e) = spawned {
            self.pending.fetch_sub(1, Ordering::SeqCst);
            tracing::error!(request = name, error = %e, "Failed to spawn API worker thread");
            let _ = self.tx.send(failure_event(
                fallback,
                format!("Could not start request: {e}"),
            ));
        }
    }

    /// Drain all completed events without blocking.
    pub fn poll_events(&self) -> Vec<ApiEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }

    /// Number of requests still running.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }
}

impl Default for RequestManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Perform one request synchronously and wrap the outcome as an event.
///
/// Errors become their display strings: the server's message for rejected
/// requests, a transport description otherwise.
pub fn execute(client: &ApiClient, request: ApiRequest) -> ApiEvent {
    fn msg<T, E: std::fmt::Display>(result: Result<T, E>) -> Result<T, String> {
        result.map_err(|e| e.to_string())
    }

    let name = request.name();
    let event = match request {
        ApiRequest::LoadClassroom { classroom_id } => {
            ApiEvent::ClassroomLoaded(msg(client.get_classroom(&classroom_id)))
        }
        ApiRequest::RefreshSummary { classroom_id } => {
            let result = client
                .get_classroom(&classroom_id)
                .and_then(|classroom| {
                    client
                        .list_content(&classroom_id)
                        .map(|content| (classroom, content))
                });
            ApiEvent::SummaryRefreshed(msg(result))
        }
        ApiRequest::UpdateClassroom {
            classroom_id,
            update,
        } => ApiEvent::ClassroomUpdated(msg(client.update_classroom(&classroom_id, &update))),
        ApiRequest::UploadCoverImage { classroom_id, path } => {
            ApiEvent::CoverImageUploaded(msg(client.upload_cover_image(&classroom_id, &path)))
        }
        ApiRequest::LoadStudents { classroom_id } => {
            ApiEvent::StudentsLoaded(msg(client.list_students(&classroom_id)))
        }
        ApiRequest::AddStudent {
            classroom_id,
            student,
        } => ApiEvent::StudentAdded(msg(client.add_student(&classroom_id, &student))),
        ApiRequest::RemoveStudent {
            classroom_id,
            student_id,
        } => {
            let result = msg(client.remove_student(&classroom_id, &student_id));
            ApiEvent::StudentRemoved { student_id, result }
        }
        ApiRequest::ImportStudents { classroom_id, path } => {
            ApiEvent::StudentsImported(msg(client.import_students(&classroom_id, &path)))
        }
        ApiRequest::LoadContent { classroom_id } => {
            ApiEvent::ContentLoaded(msg(client.list_content(&classroom_id)))
        }
        ApiRequest::UploadContent {
            classroom_id,
            upload,
        } => ApiEvent::ContentUploaded(msg(client.upload_content(&classroom_id, &upload))),
        ApiRequest::DeleteContent {
            classroom_id,
            content_id,
        } => {
            let result = msg(client.delete_content(&classroom_id, &content_id));
            ApiEvent::ContentDeleted { content_id, result }
        }
        ApiRequest::PreviewContent {
            content_id,
            file_url,
        } => {
            let result = msg(client.fetch_text(&file_url));
            ApiEvent::PreviewLoaded { content_id, result }
        }
    };

    if let Some(error) = event_error(&event) {
        tracing::warn!(request = name, %error, "API request failed");
    } else {
        tracing::info!(request = name, "API request completed");
    }
    event
}

/// The event `request` would produce had it failed with `error`.
pub fn failure_event(request: ApiRequest, error: String) -> ApiEvent {
    match request {
        ApiRequest::LoadClassroom { .. } => ApiEvent::ClassroomLoaded(Err(error)),
        ApiRequest::RefreshSummary { .. } => ApiEvent::SummaryRefreshed(Err(error)),
        ApiRequest::UpdateClassroom { .. } => ApiEvent::ClassroomUpdated(Err(error)),
        ApiRequest::UploadCoverImage { .. } => ApiEvent::CoverImageUploaded(Err(error)),
        ApiRequest::LoadStudents { .. } => ApiEvent::StudentsLoaded(Err(error)),
        ApiRequest::AddStudent { .. } => ApiEvent::StudentAdded(Err(error)),
        ApiRequest::RemoveStudent { student_id, .. } => ApiEvent::StudentRemoved {
            student_id,
            result: Err(error),
        },
        ApiRequest::ImportStudents { .. } => ApiEvent::StudentsImported(Err(error)),
        ApiRequest::LoadContent { .. } => ApiEvent::ContentLoaded(Err(error)),
        ApiRequest::UploadContent { .. } => ApiEvent::ContentUploaded(Err(error)),
        ApiRequest::DeleteContent { content_id, .. } => ApiEvent::ContentDeleted {
            content_id,
            result: Err(error),
        },
        ApiRequest::PreviewContent { content_id, .. } => ApiEvent::PreviewLoaded {
            content_id,
            result: Err(error),
        },
    }
}

/// The error message carried by `event`, if it reports a failure.
pub fn event_error(event: &ApiEvent) -> Option<&str> {
    fn err<T>(r: &Result<T, String>) -> Option<&str> {
        r.as_ref().err().map(String::as_str)
    }
    match event {
        ApiEvent::ClassroomLoaded(r)
        | ApiEvent::ClassroomUpdated(r)
        | ApiEvent::CoverImageUploaded(r) => err(r),
        ApiEvent::SummaryRefreshed(r) => err(r),
        ApiEvent::StudentsLoaded(r) => err(r),
        ApiEvent::StudentAdded(r) => err(r),
        ApiEvent::StudentRemoved { result, .. } | ApiEvent::ContentDeleted { result, .. } => {
            err(result)
        }
        ApiEvent::StudentsImported(r) => err(r),
        ApiEvent::ContentLoaded(r) => err(r),
        ApiEvent::ContentUploaded(r) => err(r),
        ApiEvent::PreviewLoaded { result, .. } => err(result),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiConfig;
    use std::time::{Duration, Instant};

    /// A client pointed at a port nothing listens on.
    fn unreachable_client() -> ApiClient {
        ApiClient::new(&ApiConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            token: None,
            timeout: Duration::from_secs(2),
        })
        .unwrap()
    }

    #[test]
    fn test_transport_failure_becomes_error_event() {
        let event = execute(
            &unreachable_client(),
            ApiRequest::RemoveStudent {
                classroom_id: "c1".to_string(),
                student_id: "s1".to_string(),
            },
        );
        match &event {
            ApiEvent::StudentRemoved { student_id, result } => {
                assert_eq!(student_id, "s1");
                assert!(result.is_err());
            }
            other => panic!("unexpected event {other:?}"),
        }
        assert!(event_error(&event).is_some());
    }

    #[test]
    fn test_dispatch_delivers_one_event_per_request() {
        let manager = RequestManager::new();
        let client = unreachable_client();
        manager.dispatch(
            client.clone(),
            ApiRequest::LoadStudents {
                classroom_id: "c1".to_string(),
            },
        );
        manager.dispatch(
            client,
            ApiRequest::LoadContent {
                classroom_id: "c1".to_string(),
            },
        );

        let deadline = Instant::now() + Duration::from_secs(10);
        let mut events = Vec::new();
        while events.len() < 2 && Instant::now() < deadline {
            events.extend(manager.poll_events());
            std::thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(events.len(), 2);
        assert_eq!(manager.pending(), 0);
        assert!(events
            .iter()
            .any(|e| matches!(e, ApiEvent::StudentsLoaded(Err(_)))));
        assert!(events
            .iter()
            .any(|e| matches!(e, ApiEvent::ContentLoaded(Err(_)))));
    }

    #[test]
    fn test_failure_event_keeps_item_ids() {
        let event = failure_event(
            ApiRequest::DeleteContent {
                classroom_id: "c1".to_string(),
                content_id: "k1".to_string(),
            },
            "Could not start request".to_string(),
        );
        assert_eq!(
            event,
            ApiEvent::ContentDeleted {
                content_id: "k1".to_string(),
                result: Err("Could not start request".to_string()),
            }
        );
        let event = failure_event(
            ApiRequest::RefreshSummary {
                classroom_id: "c1".to_string(),
            },
            "boom".to_string(),
        );
        assert_eq!(event_error(&event), Some("boom"));
    }

    #[test]
    fn test_event_error_ignores_successes() {
        let ok = ApiEvent::ContentDeleted {
            content_id: "x".to_string(),
            result: Ok(()),
        };
        assert_eq!(event_error(&ok), None);
        let failed = ApiEvent::StudentsLoaded(Err("Forbidden".to_string()));
        assert_eq!(event_error(&failed), Some("Forbidden"));
    }
}
