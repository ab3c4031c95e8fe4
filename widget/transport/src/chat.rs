use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use docwing_core::{SessionId, WidgetConfig, WidgetError};

/// Fixed backend path for widget conversations.
pub const CHAT_ENDPOINT_PATH: &str = "/chats/widget/chat";

/// Base URL used when the embedding config does not override it.
pub const DEFAULT_API_BASE_URL: &str = "https://api.docwing.app";

/// Tenant id and API key travel as headers, not in the body, so request
/// logging never echoes them alongside user content.
const TENANT_HEADER: &str = "x-tenant-id";
const API_KEY_HEADER: &str = "x-api-key";

/// Answer payload from the chat endpoint.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ChatAnswer {
    pub answer: String,
    /// Document references backing the answer; shape is owned by the
    /// backend and passed through untouched.
    #[serde(default)]
    pub sources: Vec<serde_json::Value>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    query: &'a str,
    session_id: &'a str,
    // Absent options go out as explicit nulls.
    model: Option<&'a str>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
}

/// Seam between the widget controller and the chat service.
///
/// Futures stay on the browser main thread, hence no `Send` bound.
#[async_trait(?Send)]
pub trait ChatBackend {
    /// Send one user query for the given tab session.
    async fn ask(
        &self,
        query: &str,
        session: &SessionId,
        config: &WidgetConfig,
    ) -> Result<ChatAnswer, WidgetError>;
}

/// Production transport over HTTP.
pub struct HttpChatClient {
    client: Client,
}

impl HttpChatClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for HttpChatClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl ChatBackend for HttpChatClient {
    async fn ask(
        &self,
        query: &str,
        session: &SessionId,
        config: &WidgetConfig,
    ) -> Result<ChatAnswer, WidgetError> {
        // Fail fast; no request leaves without credentials.
        config.validate()?;

        let base = config
            .api_base_url
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE_URL)
            .trim_end_matches('/');
        let url = format!("{base}{CHAT_ENDPOINT_PATH}");

        let body = ChatRequest {
            query,
            session_id: session.as_str(),
            model: config.model.as_deref(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        };

        debug!(tenant = %config.tenant_id, %url, "sending widget chat request");

        let response = self
            .client
            .post(&url)
            .header(TENANT_HEADER, &config.tenant_id)
            .header(API_KEY_HEADER, &config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| WidgetError::Connection(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            return Err(WidgetError::Transport {
                status: status.as_u16(),
                body: error_detail(&raw, status.canonical_reason().unwrap_or("unknown error")),
            });
        }

        response.json::<ChatAnswer>().await.map_err(|err| {
            WidgetError::Transport {
                status: status.as_u16(),
                body: format!("response body did not decode: {err}"),
            }
        })
    }
}

/// Pull a human-readable detail out of an error body.
///
/// Backends answer with `{"error": "..."}` or `{"message": "..."}`; raw
/// text is kept as-is, and an empty body falls back to the status text.
fn error_detail(raw: &str, status_text: &str) -> String {
    if raw.trim().is_empty() {
        return status_text.to_string();
    }
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(raw) {
        for key in ["error", "message", "detail"] {
            if let Some(detail) = value.get(key).and_then(|v| v.as_str()) {
                return detail.to_string();
            }
        }
    }
    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_absent_options_as_null() {
        let body = ChatRequest {
            query: "how do refunds work?",
            session_id: "s-1",
            model: None,
            max_tokens: None,
            temperature: Some(0.2),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["query"], "how do refunds work?");
        assert_eq!(json["session_id"], "s-1");
        assert!(json["model"].is_null());
        assert!(json["max_tokens"].is_null());
        assert_eq!(json["temperature"], 0.2);
    }

    #[test]
    fn test_answer_tolerates_missing_sources() {
        let answer: ChatAnswer =
            serde_json::from_str(r#"{"answer": "See the refunds page."}"#).unwrap();
        assert_eq!(answer.answer, "See the refunds page.");
        assert!(answer.sources.is_empty());
    }

    #[test]
    fn test_error_detail_prefers_structured_fields() {
        assert_eq!(
            error_detail(r#"{"error": "tenant suspended"}"#, "Forbidden"),
            "tenant suspended"
        );
        assert_eq!(
            error_detail(r#"{"message": "try later"}"#, "Too Many Requests"),
            "try later"
        );
        assert_eq!(error_detail("plain text", "Bad Gateway"), "plain text");
        assert_eq!(error_detail("  ", "Bad Gateway"), "Bad Gateway");
    }

    #[tokio::test]
    async fn test_missing_credentials_fail_before_any_request() {
        let client = HttpChatClient::new();
        let config = WidgetConfig {
            tenant_id: "acme".into(),
            // apiKey intentionally unset; an unroutable base url would fail
            // with Connection if a request were ever attempted
            api_base_url: Some("http://127.0.0.1:1".into()),
            ..Default::default()
        };

        let err = client
            .ask("hello", &SessionId::generate(), &config)
            .await
            .unwrap_err();
        assert!(matches!(err, WidgetError::Configuration(_)));
    }
}
