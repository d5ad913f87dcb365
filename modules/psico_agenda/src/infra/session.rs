use std::sync::Arc;

use arc_swap::ArcSwapOption;
use tracing::info;

use crate::contract::model::{Session, User};
use crate::domain::ports::AuthPort;

/// Process-wide session store. Readers get a cheap snapshot; `login` swaps
/// the whole session atomically.
#[derive(Default)]
pub struct InMemoryAuth {
    session: ArcSwapOption<Session>,
}

impl InMemoryAuth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session: ArcSwapOption::from_pointee(session),
        }
    }

    /// Shared handle to the current session, for consumers that keep it.
    pub fn session_arc(&self) -> Option<Arc<Session>> {
        self.session.load_full()
    }
}

impl AuthPort for InMemoryAuth {
    fn current_session(&self) -> Option<Session> {
        self.session.load().as_deref().cloned()
    }

    fn login(&self, user: User, token: String) {
        info!(user_id = %user.id, role = %user.role, "session started");
        self.session.store(Some(Arc::new(Session::new(user, token))));
    }

    fn logout(&self) {
        if self.session.swap(None).is_some() {
            info!("session ended");
        }
    }
}
