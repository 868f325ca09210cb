//! Identity - the signed-in user and sign-in/sign-out transitions.
//!
//! The storefront never authenticates anyone itself. An `IdentityProvider`
//! wraps the external auth service; `InMemoryIdentity` stands in for it in
//! development and tests.
//!
//! ```ignore
//! let identity = InMemoryIdentity::new();
//! let _sub = identity.subscribe(Box::new(|user: Option<&User>| match user {
//!     Some(user) => println!("signed in: {}", user.id),
//!     None => println!("signed out"),
//! }));
//! identity.sign_in(User::new("uid-1").with_email("ana@campus.edu"));
//! ```

mod in_memory;
mod user;

use async_trait::async_trait;
use thiserror::Error;

pub use in_memory::InMemoryIdentity;
pub use user::{AuthProvider, User};

/// Callback invoked with the new user (or `None`) on every auth transition.
pub type AuthListener = Box<dyn Fn(Option<&User>) + Send + Sync>;

/// Error type for identity provider operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("sign out failed: {0}")]
    SignOutFailed(String),
}

/// Session source backed by the external auth service.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// The signed-in user, if any.
    fn current_user(&self) -> Option<User>;

    /// Register a listener for sign-in/sign-out transitions.
    ///
    /// The listener is called once right away with the current state, then on
    /// every transition, until the returned handle is dropped.
    fn subscribe(&self, listener: AuthListener) -> Subscription;

    /// End the current session.
    async fn sign_out(&self) -> Result<(), IdentityError>;
}

/// Handle for a registered auth listener. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes the listener"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Wrap the provider-specific removal of a listener.
    pub fn new(cancel: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Stop receiving transitions.
    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}
