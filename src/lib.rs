//! NewsHub session core.
//!
//! The client-side engine behind a news-oriented chat assistant: the
//! conversation thread and its request/response cycle, the citation
//! parser, the bookmark flow, auth flows and durable session preferences.
//! Presentation is a collaborator that reads engine state and calls these
//! operations; the `newshub` binary ships a minimal terminal front-end.

pub mod auth;
pub mod backend;
pub mod bookmark;
pub mod engine;
pub mod parser;
pub mod prefs;
pub mod types;

pub use auth::{AuthError, AuthFlow, AuthNavigation};
pub use backend::{BackendError, HttpBackend, NewsBackend};
pub use bookmark::{BookmarkFlow, SaveOutcome};
pub use engine::{ConversationEngine, SubmitOutcome};
pub use parser::{parse_response, source_hostname};
pub use prefs::PreferenceStore;
pub use types::{Identity, Message, Role, SavedItem, Source, ThemeMode};
