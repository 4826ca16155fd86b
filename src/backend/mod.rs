/// Backend collaborator contract for NewsHub
///
/// The session core never talks HTTP directly; everything goes through the
/// [`NewsBackend`] trait so the engine and flows can be driven against a
/// mock in tests.
///
/// # Architecture
///
/// - `NewsBackend` - the six operations the backend exposes
/// - `http` - reqwest-based implementation against a Flask-style JSON API
mod http;

pub use http::{DEFAULT_ENDPOINT, HttpBackend};

use crate::types::{Identity, SavedItem, Source};
use async_trait::async_trait;
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{endpoint} returned {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The backend refused the operation and supplied a human-readable
    /// message (login/signup rejections).
    #[error("{0}")]
    Rejected(String),
}

pub type BackendResult<T> = Result<T, BackendError>;

/// Reply to `POST /chat`. `response` may still embed the citation marker;
/// callers run it through [`crate::parser::parse_response`].
#[derive(Clone, Debug, Deserialize)]
pub struct ChatReply {
    pub response: String,
    #[serde(default)]
    pub articles: Option<Vec<Source>>,
}

#[async_trait]
pub trait NewsBackend: Send + Sync {
    async fn chat(&self, question: &str) -> BackendResult<ChatReply>;

    async fn login(&self, email: &str, password: &str) -> BackendResult<Identity>;

    async fn signup(&self, username: &str, email: &str, password: &str) -> BackendResult<()>;

    async fn save_news(
        &self,
        user_id: i64,
        question: &str,
        summary: &str,
        sources: &[Source],
    ) -> BackendResult<()>;

    async fn saved_news(&self, user_id: i64) -> BackendResult<Vec<SavedItem>>;

    async fn delete_news(&self, id: i64) -> BackendResult<()>;
}
