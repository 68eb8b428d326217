//! The current user's tickets and most recent comments.

use serde_json::Value;

use reybex_api_types::EntityId;

use crate::{
    application::{error::AppError, session::require_user_id},
    domain::session::Session,
    infra::http::ReybexClient,
};

#[derive(Debug, Clone)]
pub struct InboxService {
    client: ReybexClient,
    last_comments_export_id: EntityId,
}

impl InboxService {
    pub fn new(client: ReybexClient, last_comments_export_id: EntityId) -> Self {
        Self {
            client,
            last_comments_export_id,
        }
    }

    pub async fn tickets(&self, session: &Session) -> Result<Vec<Value>, AppError> {
        let user_id = require_user_id(session)?;
        Ok(self.client.tickets(user_id).await?)
    }

    /// First page of the last-comments export for the current user.
    pub async fn last_comments(&self, session: &Session) -> Result<Vec<Value>, AppError> {
        let user_id = require_user_id(session)?;
        Ok(self
            .client
            .export_table(&self.last_comments_export_id, user_id)
            .await?)
    }
}
