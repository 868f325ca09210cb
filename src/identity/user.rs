//! The authenticated user as reported by the identity provider.

use serde::{Deserialize, Serialize};

/// How the user signed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AuthProvider {
    /// Email and password.
    Password,
    /// Google account.
    Google,
    /// Any other provider id.
    Other(String),
}

impl From<String> for AuthProvider {
    fn from(provider_id: String) -> Self {
        match provider_id.as_str() {
            "password" => AuthProvider::Password,
            "google.com" => AuthProvider::Google,
            _ => AuthProvider::Other(provider_id),
        }
    }
}

impl From<AuthProvider> for String {
    fn from(provider: AuthProvider) -> Self {
        match provider {
            AuthProvider::Password => "password".to_string(),
            AuthProvider::Google => "google.com".to_string(),
            AuthProvider::Other(id) => id,
        }
    }
}

/// A signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Stable identifier issued by the provider.
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub providers: Vec<AuthProvider>,
}

impl User {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: None,
            display_name: None,
            providers: Vec::new(),
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_provider(mut self, provider: AuthProvider) -> Self {
        self.providers.push(provider);
        self
    }

    /// Signed in with email and password.
    pub fn is_email_user(&self) -> bool {
        self.providers.contains(&AuthProvider::Password)
    }

    /// Signed in with a Google account.
    pub fn is_google_user(&self) -> bool {
        self.providers.contains(&AuthProvider::Google)
    }

    /// Display name, else email.
    pub fn label(&self) -> Option<&str> {
        self.display_name.as_deref().or(self.email.as_deref())
    }

    /// How the user is recorded as a seller: email, else user id.
    pub fn seller_key(&self) -> &str {
        self.email.as_deref().unwrap_or(&self.id)
    }
}
