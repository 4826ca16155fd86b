//! Bookmarking of assistant turns, gated by authentication state.
//!
//! A successful save shows a transient notification that clears itself
//! after [`NOTIFICATION_TTL`]. Each save arms a fresh dismiss timer and
//! invalidates the previous one, so rapid saves never let a stale timer
//! hide a newer notification early.

use crate::backend::{BackendResult, NewsBackend};
use crate::prefs::PreferenceStore;
use crate::types::{Message, SavedItem};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

/// How long the saved-successfully notification stays visible.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// No identity present; the caller should navigate to the login entry
    /// point. The save is abandoned, not queued.
    RedirectToLogin,
    /// Persistence failed; logged, with no user-visible error surface.
    Failed,
}

#[derive(Default)]
struct Notification {
    visible: AtomicBool,
    /// Bumped on every save; a dismiss timer only fires for its own epoch.
    epoch: AtomicU64,
}

pub struct BookmarkFlow {
    backend: Arc<dyn NewsBackend>,
    prefs: PreferenceStore,
    notification: Arc<Notification>,
}

impl BookmarkFlow {
    pub fn new(backend: Arc<dyn NewsBackend>, prefs: PreferenceStore) -> Self {
        Self {
            backend,
            prefs,
            notification: Arc::new(Notification::default()),
        }
    }

    pub fn notification_visible(&self) -> bool {
        self.notification.visible.load(Ordering::SeqCst)
    }

    /// Persists one assistant turn for the logged-in user.
    pub async fn save(&self, message: &Message) -> SaveOutcome {
        let Some(user) = self.prefs.identity() else {
            return SaveOutcome::RedirectToLogin;
        };

        let question = message.question.as_deref().unwrap_or_default();
        match self
            .backend
            .save_news(user.id, question, &message.content, &message.sources)
            .await
        {
            Ok(()) => {
                self.show_notification();
                SaveOutcome::Saved
            }
            Err(err) => {
                tracing::error!("error saving news: {err}");
                SaveOutcome::Failed
            }
        }
    }

    fn show_notification(&self) {
        let notification = self.notification.clone();
        let epoch = notification.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        notification.visible.store(true, Ordering::SeqCst);
        tokio::spawn(async move {
            tokio::time::sleep(NOTIFICATION_TTL).await;
            if notification.epoch.load(Ordering::SeqCst) == epoch {
                notification.visible.store(false, Ordering::SeqCst);
            }
        });
    }

    /// Everything the user has bookmarked, newest first per the backend.
    pub async fn list(&self, user_id: i64) -> BackendResult<Vec<SavedItem>> {
        self.backend.saved_news(user_id).await
    }

    pub async fn remove(&self, id: i64) -> BackendResult<()> {
        self.backend.delete_news(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendError, BackendResult, ChatReply, NewsBackend};
    use crate::types::{Identity, Source};
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;

    struct MockBackend {
        saves: AtomicUsize,
        fail_save: bool,
    }

    impl MockBackend {
        fn new() -> Self {
            Self {
                saves: AtomicUsize::new(0),
                fail_save: false,
            }
        }

        fn failing() -> Self {
            Self {
                saves: AtomicUsize::new(0),
                fail_save: true,
            }
        }

        fn saves(&self) -> usize {
            self.saves.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl NewsBackend for MockBackend {
        async fn chat(&self, _: &str) -> BackendResult<ChatReply> {
            unreachable!("bookmark flow never chats")
        }

        async fn login(&self, _: &str, _: &str) -> BackendResult<Identity> {
            unreachable!("bookmark flow never logs in")
        }

        async fn signup(&self, _: &str, _: &str, _: &str) -> BackendResult<()> {
            unreachable!("bookmark flow never signs up")
        }

        async fn save_news(&self, _: i64, _: &str, _: &str, _: &[Source]) -> BackendResult<()> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            if self.fail_save {
                return Err(BackendError::Rejected("storage offline".to_string()));
            }
            Ok(())
        }

        async fn saved_news(&self, _: i64) -> BackendResult<Vec<SavedItem>> {
            Ok(Vec::new())
        }

        async fn delete_news(&self, _: i64) -> BackendResult<()> {
            Ok(())
        }
    }

    fn answer() -> Message {
        Message::assistant(
            "Paris hosts summit.",
            vec![Source {
                url: "https://a.com".to_string(),
                title: "a".to_string(),
                description: None,
            }],
            "What happened in Paris?",
        )
    }

    fn logged_in_flow(backend: Arc<MockBackend>) -> (BookmarkFlow, tempfile::TempDir) {
        let dir = tempfile::tempdir().expect("tempdir");
        let prefs = PreferenceStore::open(dir.path());
        prefs.set_identity(Identity {
            id: 1,
            username: "ada".to_string(),
        });
        (BookmarkFlow::new(backend, prefs), dir)
    }

    #[tokio::test]
    async fn guest_save_redirects_without_network_call() {
        let backend = Arc::new(MockBackend::new());
        let dir = tempfile::tempdir().expect("tempdir");
        let flow = BookmarkFlow::new(backend.clone(), PreferenceStore::open(dir.path()));

        let outcome = flow.save(&answer()).await;

        assert_eq!(outcome, SaveOutcome::RedirectToLogin);
        assert_eq!(backend.saves(), 0);
        assert!(!flow.notification_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn successful_save_shows_then_clears_notification() {
        let backend = Arc::new(MockBackend::new());
        let (flow, _dir) = logged_in_flow(backend.clone());

        assert_eq!(flow.save(&answer()).await, SaveOutcome::Saved);
        assert_eq!(backend.saves(), 1);
        assert!(flow.notification_visible());

        tokio::time::sleep(NOTIFICATION_TTL + Duration::from_millis(50)).await;
        assert!(!flow.notification_visible());

        // And it stays cleared; the timer is one-shot.
        tokio::time::sleep(NOTIFICATION_TTL).await;
        assert!(!flow.notification_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn second_save_supersedes_first_dismiss_timer() {
        let backend = Arc::new(MockBackend::new());
        let (flow, _dir) = logged_in_flow(backend);

        flow.save(&answer()).await;
        tokio::time::sleep(Duration::from_secs(2)).await;
        flow.save(&answer()).await;

        // First timer expires now, but its epoch is stale.
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(flow.notification_visible());

        // Second timer runs out.
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(!flow.notification_visible());
    }

    #[tokio::test]
    async fn failed_save_is_silent() {
        let backend = Arc::new(MockBackend::failing());
        let (flow, _dir) = logged_in_flow(backend.clone());

        assert_eq!(flow.save(&answer()).await, SaveOutcome::Failed);
        assert_eq!(backend.saves(), 1);
        assert!(!flow.notification_visible());
    }
}
