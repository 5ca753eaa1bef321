//! Backend chat service client.
//!
//! The controller talks to the backend through the `ChatBackend` capability
//! trait so tests can script replies without a network. `HttpChatBackend` is
//! the real transport over the three plain-text endpoints.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use tokio::time::Duration;
use tracing::debug;

use crate::classify::Category;

/// Interrogative segments: opening inverted question mark through the
/// closing question mark.
static FAQ_QUESTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"¿[^?]+\?").expect("valid question regex"));

/// Pull the `¿…?` delimited FAQ suggestions out of a category response body.
pub fn extract_faq_questions(body: &str) -> Vec<String> {
    FAQ_QUESTION_RE
        .find_iter(body)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// The remote chat service, reduced to its three operations.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// GET the session greeting.
    async fn greeting(&self) -> Result<String>;

    /// POST a category selection; the body holds the FAQ suggestions.
    async fn category(&self, category: Category) -> Result<String>;

    /// POST free text; returns the bot's reply.
    async fn respond(&self, message: &str) -> Result<String>;
}

/// HTTP transport for the backend endpoints.
pub struct HttpChatBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpChatBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    async fn read_text(response: reqwest::Response) -> Result<String> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Backend returned {}: {}", status, body));
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn greeting(&self) -> Result<String> {
        let url = format!("{}/chat/start", self.base_url);
        debug!(%url, "fetching greeting");

        let response = self.client.get(&url).send().await?;
        Self::read_text(response).await
    }

    async fn category(&self, category: Category) -> Result<String> {
        // The canonical accented name goes on the wire, URL-encoded.
        let url = format!(
            "{}/chat/category/{}",
            self.base_url,
            encode_path_segment(category.canonical_name())
        );
        debug!(%url, "fetching category FAQ");

        let response = self.client.post(&url).send().await?;
        Self::read_text(response).await
    }

    async fn respond(&self, message: &str) -> Result<String> {
        let url = format!("{}/chat/respond", self.base_url);
        debug!(%url, "sending free-text message");

        let payload = serde_json::json!({ "message": message });
        let response = self.client.post(&url).json(&payload).send().await?;
        Self::read_text(response).await
    }
}

/// Percent-encode a path segment (RFC 3986 unreserved set kept verbatim).
fn encode_path_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            other => out.push_str(&format!("%{:02X}", other)),
        }
    }
    out
}
