use super::{BackendError, BackendResult, ChatReply, NewsBackend};
use crate::types::{Identity, SavedItem, Source};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000";

pub struct HttpBackend {
    client: Client,
    base: String,
}

impl HttpBackend {
    pub fn new(base: impl Into<String>) -> Self {
        let mut base = base.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self {
            client: Client::new(),
            base,
        }
    }

    /// Endpoint comes from `NEWSHUB_ENDPOINT`, defaulting to the local
    /// development server.
    pub fn from_env() -> Self {
        let base =
            std::env::var("NEWSHUB_ENDPOINT").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());
        Self::new(base)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    question: &'a str,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct SignupRequest<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct SaveRequest<'a> {
    user_id: i64,
    question: &'a str,
    summary: &'a str,
    sources: &'a [Source],
}

#[derive(Deserialize)]
struct LoginResponse {
    user: Identity,
}

/// Failure bodies are `{message}` on login and `{message|error}` on signup.
#[derive(Deserialize)]
struct RejectionBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

fn rejection(body: &str, fallback: &str) -> BackendError {
    let message = serde_json::from_str::<RejectionBody>(body)
        .ok()
        .and_then(|parsed| parsed.message.or(parsed.error))
        .unwrap_or_else(|| fallback.to_string());
    BackendError::Rejected(message)
}

#[async_trait]
impl NewsBackend for HttpBackend {
    async fn chat(&self, question: &str) -> BackendResult<ChatReply> {
        let response = self
            .client
            .post(self.url("/chat"))
            .json(&ChatRequest { question })
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            Ok(serde_json::from_str(&body)?)
        } else {
            Err(BackendError::Status {
                endpoint: "/chat",
                status,
                body,
            })
        }
    }

    async fn login(&self, email: &str, password: &str) -> BackendResult<Identity> {
        let response = self
            .client
            .post(self.url("/login"))
            .json(&LoginRequest { email, password })
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            let parsed: LoginResponse = serde_json::from_str(&body)?;
            Ok(parsed.user)
        } else {
            Err(rejection(&body, "Login failed"))
        }
    }

    async fn signup(&self, username: &str, email: &str, password: &str) -> BackendResult<()> {
        let response = self
            .client
            .post(self.url("/signup"))
            .json(&SignupRequest {
                username,
                email,
                password,
            })
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await?;
            Err(rejection(&body, "Signup failed"))
        }
    }

    async fn save_news(
        &self,
        user_id: i64,
        question: &str,
        summary: &str,
        sources: &[Source],
    ) -> BackendResult<()> {
        let response = self
            .client
            .post(self.url("/save_news"))
            .json(&SaveRequest {
                user_id,
                question,
                summary,
                sources,
            })
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(BackendError::Status {
                endpoint: "/save_news",
                status,
                body,
            })
        }
    }

    async fn saved_news(&self, user_id: i64) -> BackendResult<Vec<SavedItem>> {
        let response = self
            .client
            .get(self.url(&format!("/saved_news/{user_id}")))
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            Ok(serde_json::from_str(&body)?)
        } else {
            Err(BackendError::Status {
                endpoint: "/saved_news",
                status,
                body,
            })
        }
    }

    async fn delete_news(&self, id: i64) -> BackendResult<()> {
        let response = self
            .client
            .delete(self.url(&format!("/delete_news/{id}")))
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(BackendError::Status {
                endpoint: "/delete_news",
                status,
                body,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_slash_from_base() {
        let backend = HttpBackend::new("http://localhost:5000/");
        assert_eq!(backend.url("/chat"), "http://localhost:5000/chat");
    }

    #[test]
    fn rejection_prefers_message_field() {
        let err = rejection(r#"{"message":"Invalid credentials"}"#, "Login failed");
        assert_eq!(err.to_string(), "Invalid credentials");
    }

    #[test]
    fn rejection_falls_back_to_error_field() {
        let err = rejection(r#"{"error":"Email already registered"}"#, "Signup failed");
        assert_eq!(err.to_string(), "Email already registered");
    }

    #[test]
    fn rejection_handles_unparsable_body() {
        let err = rejection("<html>502</html>", "Login failed");
        assert_eq!(err.to_string(), "Login failed");
    }

    #[test]
    fn chat_reply_defaults_missing_articles() {
        let reply: ChatReply = serde_json::from_str(r#"{"response":"hi"}"#).expect("parse");
        assert!(reply.articles.is_none());
    }
}
