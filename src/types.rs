use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A cited article attached to an assistant turn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub url: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One turn in the conversation thread. Never mutated after being appended.
#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub sources: Vec<Source>,
    pub created_at: OffsetDateTime,
    /// The verbatim user text that produced this assistant turn.
    /// `None` for user turns.
    pub question: Option<String>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            sources: Vec::new(),
            created_at: OffsetDateTime::now_utc(),
            question: None,
        }
    }

    pub fn assistant(
        content: impl Into<String>,
        sources: Vec<Source>,
        question: impl Into<String>,
    ) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            sources,
            created_at: OffsetDateTime::now_utc(),
            question: Some(question.into()),
        }
    }
}

/// An authenticated user. Absence of an `Identity` means a guest session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub id: i64,
    pub username: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }
}

/// A bookmarked answer as returned by the backend.
#[derive(Clone, Debug, Deserialize)]
pub struct SavedItem {
    pub id: i64,
    #[serde(default)]
    pub question: Option<String>,
    pub summary: String,
    #[serde(default)]
    pub sources: Vec<Source>,
    pub saved_at: String,
}
