//! Chat webhook client.
//!
//! Each user question becomes a single `POST` carrying `{"chatInput": …}`.
//! There are no retries. Whatever happens on the wire, callers get back a
//! displayable string through [`answer_for`]:
//!
//! - a JSON body with a string `answer` yields that answer
//! - any other JSON body, or an empty body, yields [`FALLBACK_ANSWER`]
//! - a body that is not JSON is shown verbatim
//! - non-2xx statuses and transport failures yield [`APOLOGY`]

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, header};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

/// Shown when the webhook answered but without a usable `answer`.
pub const FALLBACK_ANSWER: &str = "Sorry, something went wrong.";

/// Shown when the webhook could not be reached or returned an error status.
pub const APOLOGY: &str = "Oops! I couldn't reach the assistant service. Please try again.";

/// Why a chat request failed.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("chat webhook responded with HTTP {0}")]
    Status(u16),
    #[error("chat webhook request failed: {0}")]
    Transport(String),
}

/// Something that can answer a documentation question.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Sends one question and returns the answer text.
    async fn ask(&self, question: &str) -> Result<String, ChatError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatRequest<'a> {
    chat_input: &'a str,
}

/// [`ChatTransport`] backed by an HTTP webhook.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    pub url: Url,
    pub http: Client,
    pub user_agent: String,
}

impl WebhookClient {
    /// Builds a client for `url`. `timeout` of `None` keeps reqwest's default.
    pub fn new(url: Url, timeout: Option<Duration>) -> Result<Self> {
        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json, text/plain"));

        let mut builder = Client::builder().default_headers(default_headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("build http client")?;

        Ok(Self {
            url,
            http,
            user_agent: format!("docent/{}; {}", env!("CARGO_PKG_VERSION"), env::consts::OS),
        })
    }
}

#[async_trait]
impl ChatTransport for WebhookClient {
    async fn ask(&self, question: &str) -> Result<String, ChatError> {
        debug!(url = %self.url, "posting chat question");
        let response = self
            .http
            .post(self.url.clone())
            .header(header::USER_AGENT, &self.user_agent)
            .json(&ChatRequest { chat_input: question })
            .send()
            .await
            .map_err(|err| ChatError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChatError::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(|err| ChatError::Transport(err.to_string()))?;
        Ok(interpret_body(&body))
    }
}

/// Turns a successful response body into the text shown to the user.
pub fn interpret_body(body: &str) -> String {
    if body.trim().is_empty() {
        return FALLBACK_ANSWER.to_string();
    }
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => value
            .get("answer")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| FALLBACK_ANSWER.to_string()),
        Err(_) => body.to_string(),
    }
}

/// Asks `transport` and always returns something to append to the transcript.
pub async fn answer_for(transport: &dyn ChatTransport, question: &str) -> String {
    match transport.ask(question).await {
        Ok(answer) => answer,
        Err(err) => {
            warn!(error = %err, "chat request failed");
            APOLOGY.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    struct StaticTransport(Result<String, u16>);

    #[async_trait]
    impl ChatTransport for StaticTransport {
        async fn ask(&self, _question: &str) -> Result<String, ChatError> {
            match &self.0 {
                Ok(body) => Ok(interpret_body(body)),
                Err(status) => Err(ChatError::Status(*status)),
            }
        }
    }

    #[test]
    fn answer_field_is_extracted() {
        assert_eq!(interpret_body(r#"{"answer":"Hello"}"#), "Hello");
    }

    #[test]
    fn non_json_body_is_used_verbatim() {
        assert_eq!(interpret_body("plain text"), "plain text");
    }

    #[test]
    fn json_without_answer_falls_back() {
        assert_eq!(interpret_body(r#"{"output":"Hello"}"#), FALLBACK_ANSWER);
        assert_eq!(interpret_body(r#"{"answer":null}"#), FALLBACK_ANSWER);
        assert_eq!(interpret_body("[1,2]"), FALLBACK_ANSWER);
        assert_eq!(interpret_body(""), FALLBACK_ANSWER);
    }

    #[tokio::test]
    async fn failures_become_the_apology() {
        let transport = StaticTransport(Err(502));
        assert_eq!(answer_for(&transport, "hi").await, APOLOGY);

        let transport = StaticTransport(Ok(r#"{"answer":"Hello"}"#.into()));
        assert_eq!(answer_for(&transport, "hi").await, "Hello");
    }

    /// Serves exactly one HTTP response and records the request body.
    async fn serve_once(status_line: &'static str, body: &'static str) -> (Url, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.expect("write");
            socket.shutdown().await.ok();
            request
        });
        let url = Url::parse(&format!("http://{addr}/webhook/docs-chat")).expect("url");
        (url, handle)
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut buffer = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let read = socket.read(&mut chunk).await.expect("read");
            if read == 0 {
                break;
            }
            buffer.extend_from_slice(&chunk[..read]);
            let text = String::from_utf8_lossy(&buffer);
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buffer.len() >= header_end + 4 + content_length {
                    return text[header_end + 4..].to_string();
                }
            }
        }
        String::from_utf8_lossy(&buffer).into_owned()
    }

    #[tokio::test]
    async fn posts_chat_input_and_reads_answer() {
        let (url, server) = serve_once("200 OK", r#"{"answer":"Use the Agency space."}"#).await;
        let client = WebhookClient::new(url, Some(Duration::from_secs(5))).expect("client");

        let answer = answer_for(&client, "Where do I add users?").await;
        assert_eq!(answer, "Use the Agency space.");

        let request_body = server.await.expect("server task");
        let sent: serde_json::Value = serde_json::from_str(&request_body).expect("json body");
        assert_eq!(sent, serde_json::json!({"chatInput": "Where do I add users?"}));
    }

    #[tokio::test]
    async fn plain_text_reply_is_shown_verbatim() {
        let (url, server) = serve_once("200 OK", "plain text").await;
        let client = WebhookClient::new(url, None).expect("client");
        assert_eq!(client.ask("q").await.expect("ok"), "plain text");
        server.await.expect("server task");
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let (url, server) = serve_once("500 Internal Server Error", "boom").await;
        let client = WebhookClient::new(url, None).expect("client");
        let err = client.ask("q").await.unwrap_err();
        assert!(matches!(err, ChatError::Status(500)));
        server.await.expect("server task");
    }

    #[tokio::test]
    async fn unreachable_endpoint_yields_apology() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);

        let url = Url::parse(&format!("http://{addr}/hook")).expect("url");
        let client = WebhookClient::new(url, Some(Duration::from_secs(2))).expect("client");
        assert!(matches!(client.ask("q").await, Err(ChatError::Transport(_))));
        assert_eq!(answer_for(&client, "q").await, APOLOGY);
    }
}
