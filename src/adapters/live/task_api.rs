//! Live adapter for the `TaskApi` port over HTTP.

use std::time::Instant;

use reqwest::header::ACCEPT;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace, warn};
use uuid::Uuid;

use crate::api::{parse_acknowledgement, parse_payload, ApiError};
use crate::config::ClientConfig;
use crate::model::{
    Acknowledgement, CreateTaskRequest, RunningCount, SystemStatus, Task, TaskId,
    TaskStatistics, TaskStatus,
};
use crate::ports::task_api::{ApiFuture, TaskApi};

/// Task service client backed by `reqwest`.
pub struct LiveTaskApi {
    client: Client,
    base_url: String,
    timeout_ms: u128,
}

impl LiveTaskApi {
    /// Creates a client for the configured base URL and timeout.
    ///
    /// # Errors
    ///
    /// Returns an error string if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {e}"))?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            timeout_ms: config.timeout.as_millis(),
        })
    }

    /// Sends one request and returns the status and body of a success response.
    ///
    /// Both directions are logged with a shared correlation id.
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<(u16, String), ApiError> {
        let request_id = Uuid::new_v4();
        let url = format!("{}{path}", self.base_url);
        debug!(%request_id, %method, path, "api request");
        if let Some(body) = &body {
            trace!(%request_id, %body, "api request body");
        }

        let mut request =
            self.client.request(method.clone(), &url).header(ACCEPT, "application/json");
        if let Some(body) = &body {
            request = request.json(body);
        }

        let started = Instant::now();
        let response = request.send().await.map_err(|e| {
            let err = if e.is_timeout() {
                ApiError::transport(format!("timeout of {}ms exceeded", self.timeout_ms))
            } else {
                ApiError::transport(e.to_string())
            };
            warn!(%request_id, %method, path, error = %err, "api request failed");
            err
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            warn!(%request_id, path, error = %e, "failed to read api response body");
            ApiError::transport(format!("failed to read response body: {e}"))
        })?;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        debug!(%request_id, status = status.as_u16(), elapsed_ms, path, "api response");
        trace!(%request_id, body = %text, "api response body");

        if !status.is_success() {
            let err = ApiError::server(status.as_u16(), &text);
            warn!(%request_id, status = status.as_u16(), path, error = %err, "api error response");
            return Err(err);
        }
        Ok((status.as_u16(), text))
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, ApiError> {
        let (status, text) = self.send(method, path, body).await?;
        parse_payload(status, &text)
    }

    async fn acknowledge(&self, method: Method, path: &str) -> Result<Acknowledgement, ApiError> {
        let (status, text) = self.send(method, path, None).await?;
        parse_acknowledgement(status, &text)
    }
}

impl TaskApi for LiveTaskApi {
    fn create_task(&self, request: &CreateTaskRequest) -> ApiFuture<'_, Task> {
        let body = serde_json::to_value(request);
        Box::pin(async move {
            let body =
                body.map_err(|e| ApiError::unknown(format!("failed to encode request: {e}")))?;
            self.fetch(Method::POST, "/tasks", Some(body)).await
        })
    }

    fn list_tasks(&self) -> ApiFuture<'_, Vec<Task>> {
        Box::pin(self.fetch(Method::GET, "/tasks", None))
    }

    fn list_recent_tasks(&self, limit: usize) -> ApiFuture<'_, Vec<Task>> {
        Box::pin(async move {
            self.fetch(Method::GET, &format!("/tasks/recent?limit={limit}"), None).await
        })
    }

    fn get_task(&self, id: TaskId) -> ApiFuture<'_, Task> {
        Box::pin(async move { self.fetch(Method::GET, &format!("/tasks/{id}"), None).await })
    }

    fn list_tasks_by_status(&self, status: TaskStatus) -> ApiFuture<'_, Vec<Task>> {
        Box::pin(async move {
            self.fetch(Method::GET, &format!("/tasks/status/{status}"), None).await
        })
    }

    fn cancel_task(&self, id: TaskId) -> ApiFuture<'_, Acknowledgement> {
        Box::pin(async move { self.acknowledge(Method::PUT, &format!("/tasks/{id}/cancel")).await })
    }

    fn stop_task(&self, id: TaskId) -> ApiFuture<'_, Acknowledgement> {
        Box::pin(async move { self.acknowledge(Method::POST, &format!("/tasks/{id}/stop")).await })
    }

    fn retry_task(&self, id: TaskId) -> ApiFuture<'_, Task> {
        Box::pin(async move {
            self.fetch(Method::POST, &format!("/tasks/{id}/retry"), None).await
        })
    }

    fn delete_task(&self, id: TaskId) -> ApiFuture<'_, Acknowledgement> {
        Box::pin(async move { self.acknowledge(Method::DELETE, &format!("/tasks/{id}")).await })
    }

    fn statistics(&self) -> ApiFuture<'_, TaskStatistics> {
        Box::pin(self.fetch(Method::GET, "/tasks/statistics", None))
    }

    fn running_count(&self) -> ApiFuture<'_, RunningCount> {
        Box::pin(self.fetch(Method::GET, "/tasks/running/count", None))
    }

    fn system_status(&self) -> ApiFuture<'_, SystemStatus> {
        Box::pin(self.fetch(Method::GET, "/system/status", None))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    use super::*;
    use crate::api::ApiErrorKind;

    const TASK: &str = r#"{"id":7,"reelsUrl":"https://x/reel/7","viewCount":50,
        "completedCount":0,"status":"PENDING","createdAt":"2024-05-01T10:00:00"}"#;

    /// Serves one canned `(status, body)` response per connection, in order,
    /// and hands back every raw request it read.
    async fn serve(
        responses: Vec<(u16, &'static str)>,
    ) -> (LiveTaskApi, JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let mut requests = Vec::new();
            for (status, body) in responses {
                let (mut stream, _) = listener.accept().await.unwrap();
                requests.push(read_request(&mut stream).await);
                let response = format!(
                    "HTTP/1.1 {status} {}\r\nContent-Type: application/json\r\n\
                     Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    if status < 300 { "OK" } else { "Error" },
                    body.len()
                );
                stream.write_all(response.as_bytes()).await.unwrap();
                stream.shutdown().await.unwrap();
            }
            requests
        });
        let config = ClientConfig {
            base_url: format!("http://{addr}/api"),
            timeout: Duration::from_secs(5),
            ..ClientConfig::default()
        };
        (LiveTaskApi::new(&config).unwrap(), server)
    }

    async fn read_request(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
                continue;
            };
            let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
            let length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + length {
                break;
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn request_line(request: &str) -> &str {
        request.lines().next().unwrap_or_default()
    }

    #[tokio::test]
    async fn every_operation_hits_its_route() {
        let (api, server) = serve(vec![
            (200, TASK),
            (200, "[]"),
            (200, r#"{"success":true,"data":[]}"#),
            (200, TASK),
            (200, "[]"),
            (200, ""),
            (200, r#"{"message":"任務已停止"}"#),
            (200, TASK),
            (200, r#"{"success":true,"message":"任務已刪除"}"#),
            (200, r#"{"success":true,"data":{"runningCount":2}}"#),
            (200, r#"{"count":3}"#),
            (200, r#"{"status":"UP"}"#),
        ])
        .await;
        let id = TaskId(7);

        let created = api.create_task(&CreateTaskRequest::new("https://x/reel/7", 50)).await;
        assert_eq!(created.unwrap().id, id);
        assert!(api.list_tasks().await.unwrap().is_empty());
        assert!(api.list_recent_tasks(5).await.unwrap().is_empty());
        assert_eq!(api.get_task(id).await.unwrap().status, TaskStatus::Pending);
        assert!(api.list_tasks_by_status(TaskStatus::Running).await.unwrap().is_empty());
        assert_eq!(api.cancel_task(id).await.unwrap(), Acknowledgement::default());
        assert_eq!(api.stop_task(id).await.unwrap().message.as_deref(), Some("任務已停止"));
        assert_eq!(api.retry_task(id).await.unwrap().id, id);
        assert_eq!(api.delete_task(id).await.unwrap().message.as_deref(), Some("任務已刪除"));
        let stats = api.statistics().await.unwrap();
        assert_eq!((stats.running_count, stats.total_count), (2, 2));
        assert_eq!(api.running_count().await.unwrap().count, 3);
        assert_eq!(api.system_status().await.unwrap().get("status"), Some(&json!("UP")));

        let requests = server.await.unwrap();
        let lines: Vec<&str> = requests.iter().map(String::as_str).map(request_line).collect();
        assert_eq!(
            lines,
            [
                "POST /api/tasks HTTP/1.1",
                "GET /api/tasks HTTP/1.1",
                "GET /api/tasks/recent?limit=5 HTTP/1.1",
                "GET /api/tasks/7 HTTP/1.1",
                "GET /api/tasks/status/RUNNING HTTP/1.1",
                "PUT /api/tasks/7/cancel HTTP/1.1",
                "POST /api/tasks/7/stop HTTP/1.1",
                "POST /api/tasks/7/retry HTTP/1.1",
                "DELETE /api/tasks/7 HTTP/1.1",
                "GET /api/tasks/statistics HTTP/1.1",
                "GET /api/tasks/running/count HTTP/1.1",
                "GET /api/system/status HTTP/1.1",
            ]
        );
        let body = requests[0].split("\r\n\r\n").nth(1).unwrap();
        let body: Value = serde_json::from_str(body).unwrap();
        assert_eq!(body, json!({"reelsUrl": "https://x/reel/7", "viewCount": 50}));
    }

    #[tokio::test]
    async fn error_responses_carry_status_and_message() {
        let (api, server) = serve(vec![
            (400, r#"{"error":"輸入錯誤","message":"觀看次數必須大於0"}"#),
            (404, r#"{"error":"Not Found"}"#),
            (500, "<html>oops</html>"),
        ])
        .await;

        let err = api.create_task(&CreateTaskRequest::new("https://x/reel/7", 0)).await;
        let err = err.unwrap_err();
        assert_eq!((err.kind, err.status), (ApiErrorKind::Server, Some(400)));
        assert_eq!(err.message, "觀看次數必須大於0");

        let err = api.get_task(TaskId(9)).await.unwrap_err();
        assert_eq!((err.status, err.message.as_str()), (Some(404), "Not Found"));

        let err = api.cancel_task(TaskId(9)).await.unwrap_err();
        assert_eq!(err.status, Some(500));
        assert_eq!(err.message, "Request failed with status code 500");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn malformed_success_bodies_are_parse_errors() {
        let (api, server) = serve(vec![
            (200, r#"{"id":"seven"}"#),
            (200, r#"{"success":false,"message":"任務不存在"}"#),
            (200, r#"{"pendingCount":18446744073709551615,"runningCount":1}"#),
        ])
        .await;

        assert_eq!(api.get_task(TaskId(7)).await.unwrap_err().kind, ApiErrorKind::Parse);
        let err = api.retry_task(TaskId(7)).await.unwrap_err();
        assert_eq!((err.kind, err.message.as_str()), (ApiErrorKind::Server, "任務不存在"));
        assert_eq!(api.statistics().await.unwrap_err().kind, ApiErrorKind::Parse);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_error() {
        // Port 9 (discard) on localhost is closed in test environments.
        let config = ClientConfig {
            base_url: "http://127.0.0.1:9/api".to_string(),
            timeout: Duration::from_secs(2),
            ..ClientConfig::default()
        };
        let api = LiveTaskApi::new(&config).unwrap();
        let err = api.list_tasks().await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Transport);
        assert!(!err.message.is_empty());
        assert!(err.status.is_none());
    }
}
