//! InMemoryIdentity - process-local identity provider for testing and development.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use async_trait::async_trait;
use tracing::info;

use super::{AuthListener, IdentityError, IdentityProvider, Subscription, User};

type SharedListener = Arc<dyn Fn(Option<&User>) + Send + Sync>;

#[derive(Default)]
struct Inner {
    current: RwLock<Option<User>>,
    listeners: Mutex<Vec<(u64, SharedListener)>>,
    next_listener: AtomicU64,
}

impl Inner {
    fn current(&self) -> Option<User> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Listeners run outside the registry lock so they may (un)subscribe.
    fn notify(&self, user: Option<&User>) {
        let listeners: Vec<SharedListener> = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in listeners {
            listener(user);
        }
    }

    fn transition(&self, user: Option<User>) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = user.clone();
        self.notify(user.as_ref());
    }
}

/// Identity provider holding the session in memory.
///
/// Clone-friendly via Arc; clones share the same session and listeners.
#[derive(Clone, Default)]
pub struct InMemoryIdentity {
    inner: Arc<Inner>,
}

impl InMemoryIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session for `user`, replacing any current one.
    pub fn sign_in(&self, user: User) {
        info!(user_id = %user.id, "user signed in");
        self.inner.transition(Some(user));
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentity {
    fn current_user(&self) -> Option<User> {
        self.inner.current()
    }

    fn subscribe(&self, listener: AuthListener) -> Subscription {
        let id = self.inner.next_listener.fetch_add(1, Ordering::Relaxed);
        let listener: SharedListener = Arc::from(listener);

        self.inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::clone(&listener)));

        listener(self.inner.current().as_ref());

        let registry = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = registry.upgrade() {
                inner
                    .listeners
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .retain(|(listener_id, _)| *listener_id != id);
            }
        })
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        if let Some(user) = self.inner.current() {
            info!(user_id = %user.id, "user signed out");
        }
        self.inner.transition(None);
        Ok(())
    }
}
