use async_trait::async_trait;
use fdbvault_core::{Notifier, ToolResult};
use fdbvault_model::{DatadogConfig, NotificationEvent};
use tracing::debug;

use crate::{DatadogEvent, NotifyError};

const API_KEY_HEADER: &str = "DD-API-KEY";
const APP_KEY_HEADER: &str = "DD-APPLICATION-KEY";
const USER_AGENT: &str = concat!("fdbvault/", env!("CARGO_PKG_VERSION"));

/// Posts one event per call to the Datadog events API. No batching, no retry.
#[derive(Debug, Clone)]
pub struct DatadogNotifier {
    client: reqwest::Client,
    url: String,
    api_key: String,
    app_key: String,
}

impl DatadogNotifier {
    pub fn new(cfg: &DatadogConfig) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(cfg.timeout())
            .build()
            .map_err(NotifyError::Client)?;
        Ok(Self {
            client,
            url: cfg.events_url(),
            api_key: cfg.api_key.clone(),
            app_key: cfg.app_key.clone(),
        })
    }

    /// Submit one event.
    pub async fn send(&self, event: &NotificationEvent) -> Result<(), NotifyError> {
        let payload = DatadogEvent::from_event(event);
        let response = self
            .client
            .post(&self.url)
            .header(API_KEY_HEADER, &self.api_key)
            .header(APP_KEY_HEADER, &self.app_key)
            .json(&payload)
            .send()
            .await
            .map_err(NotifyError::Request)?;

        let status = response.status();
        if status.is_success() {
            debug!(status = status.as_u16(), title = %payload.title, "event accepted");
            return Ok(());
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "response body cannot be decoded".into());
        Err(NotifyError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl Notifier for DatadogNotifier {
    async fn notify(&self, event: &NotificationEvent) -> ToolResult<()> {
        Ok(self.send(event).await?)
    }
}

#[cfg(test)]
mod tests {
    use fdbvault_model::Tags;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    use super::*;

    /// Accept one request, answer with `status_line`, and return the raw request.
    async fn one_shot_server(status_line: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let site = format!("http://{}", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                raw.extend_from_slice(&chunk[..n]);
                if n == 0 || request_complete(&raw) {
                    break;
                }
            }
            let body = "{\"status\":\"ok\"}";
            let response = format!(
                "{status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&raw).into_owned()
        });
        (site, handle)
    }

    fn request_complete(raw: &[u8]) -> bool {
        let text = String::from_utf8_lossy(raw);
        let Some(split) = text.find("\r\n\r\n") else {
            return false;
        };
        let length = text[..split]
            .lines()
            .find_map(|l| {
                let (name, value) = l.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())?
            })
            .unwrap_or(0);
        raw.len() >= split + 4 + length
    }

    fn config(site: String) -> DatadogConfig {
        DatadogConfig {
            api_key: "api-123".into(),
            app_key: "app-456".into(),
            site,
            timeout_ms: 5_000,
        }
    }

    #[tokio::test]
    async fn posts_event_with_credentials() {
        let (site, server) = one_shot_server("HTTP/1.1 202 Accepted").await;
        let notifier = DatadogNotifier::new(&config(site)).unwrap();

        let event = NotificationEvent::success("FDB Backup Success", "done", Tags::default());
        notifier.notify(&event).await.unwrap();

        let request = server.await.unwrap();
        let lower = request.to_ascii_lowercase();
        assert!(request.starts_with("POST /api/v1/events HTTP/1.1"));
        assert!(lower.contains("dd-api-key: api-123"));
        assert!(lower.contains("dd-application-key: app-456"));

        let (_, body) = request.split_once("\r\n\r\n").unwrap();
        let body: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(body["title"], "FDB Backup Success");
        assert_eq!(body["alert_type"], "success");
        assert_eq!(body["priority"], "low");
    }

    #[tokio::test]
    async fn rejected_event_is_a_delivery_error() {
        let (site, server) = one_shot_server("HTTP/1.1 403 Forbidden").await;
        let notifier = DatadogNotifier::new(&config(site)).unwrap();

        let event = NotificationEvent::error("FDB Backup Error", "x", Tags::default());
        let err = notifier.send(&event).await.unwrap_err();
        assert!(matches!(err, NotifyError::Status { status: 403, .. }));

        let tool_err: fdbvault_core::ToolError = err.into();
        assert!(tool_err.to_string().contains("HTTP 403"));
        server.await.unwrap();
    }
}
