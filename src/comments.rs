//! Comments - signed-in users' remarks on a product.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::MarketConfig;
use crate::document::{DocumentStore, DocumentsExt, StoreError};
use crate::identity::User;
use crate::Document;

/// A stored comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Document)]
#[document(collection = "comments")]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub product_id: String,
    pub content: String,
    pub user_id: String,
    /// Author label at posting time.
    pub user_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CommentFields<'a> {
    product_id: &'a str,
    content: &'a str,
    user_id: &'a str,
    user_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_email: Option<&'a str>,
}

/// Error type for comment operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommentError {
    #[error("sign in required to comment")]
    SignInRequired,
    #[error("comment is empty")]
    EmptyContent,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Reads and writes the `comments` collection.
pub struct CommentBoard<S> {
    store: S,
    config: MarketConfig,
}

impl<S: DocumentStore> CommentBoard<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, MarketConfig::default())
    }

    pub fn with_config(store: S, config: MarketConfig) -> Self {
        Self { store, config }
    }

    /// Comments on `product_id`, newest first.
    pub async fn load(&self, product_id: &str) -> Result<Vec<Comment>, CommentError> {
        let mut comments: Vec<Comment> = self
            .store
            .documents::<Comment>()
            .list_all()
            .await
            .map_err(|err| {
                warn!(product_id, error = %err, "failed to load comments");
                err
            })?
            .into_iter()
            .filter(|comment| comment.product_id == product_id)
            .collect();

        // Stable: equal timestamps keep store order.
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(comments)
    }

    /// Post `content` on `product_id` as `user`.
    pub async fn post(
        &self,
        product_id: &str,
        content: &str,
        user: Option<&User>,
    ) -> Result<Comment, CommentError> {
        let user = user.ok_or(CommentError::SignInRequired)?;
        let content = content.trim();
        if content.is_empty() {
            return Err(CommentError::EmptyContent);
        }

        let fields = CommentFields {
            product_id,
            content,
            user_id: &user.id,
            user_name: user.label().unwrap_or(&self.config.anonymous_name),
            user_email: user.email.as_deref(),
        };

        let comment: Comment = self
            .store
            .documents::<Comment>()
            .create(&fields)
            .await
            .map_err(|err| {
                warn!(product_id, user_id = %user.id, error = %err, "failed to post comment");
                err
            })?;

        info!(id = %comment.id, product_id, "comment posted");
        Ok(comment)
    }
}
