//! Task detail with rendered rich text, comments and time history.

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use reybex_api_types::{EntityId, HistoryItem, TaskDetail};

use crate::{
    application::{error::AppError, render::render_description_value},
    domain::{booking::DurationSnapshot, error::DomainError},
    infra::http::ReybexClient,
};

/// Comment fields that may hold the rich-text body, in lookup order.
const COMMENT_BODY_FIELDS: [&str; 4] = ["comment", "description", "text", "content"];

#[derive(Debug, Clone, Copy, Default)]
pub struct TaskQuery {
    pub comments: bool,
    pub history: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    pub task_id: EntityId,
    pub is_tracking: bool,
    pub description_html: String,
    pub detail: TaskDetail,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<CommentView>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<HistoryEntryView>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub html: String,
    pub comment: Value,
}

impl CommentView {
    pub fn from_value(comment: Value) -> Self {
        let html = comment_body(&comment)
            .map(render_description_value)
            .unwrap_or_default();
        Self { html, comment }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryTime {
    pub value: f64,
    pub approved: bool,
}

impl HistoryTime {
    /// Approved cost when present, else the unapproved tracked time, else
    /// an approved zero.
    pub fn of(item: &HistoryItem) -> Self {
        match (item.task_cost_cost, item.task_cost_time_tracked) {
            (Some(value), _) => Self {
                value,
                approved: true,
            },
            (None, Some(value)) => Self {
                value,
                approved: false,
            },
            (None, None) => Self {
                value: 0.0,
                approved: true,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntryView {
    pub time: HistoryTime,
    pub entry: HistoryItem,
}

#[derive(Debug, Clone)]
pub struct TaskService {
    client: ReybexClient,
}

impl TaskService {
    pub fn new(client: ReybexClient) -> Self {
        Self { client }
    }

    pub async fn task(&self, task_id: &EntityId, query: TaskQuery) -> Result<TaskView, AppError> {
        let detail = self.client.task(task_id).await?;
        let Some(task) = detail.task.as_ref() else {
            return Err(DomainError::not_found("task").into());
        };
        let description_html = task
            .description
            .as_ref()
            .map(render_description_value)
            .unwrap_or_default();
        let is_tracking = self.is_tracking(task_id).await;

        let comments = if query.comments {
            Some(self.comments(task_id).await?)
        } else {
            None
        };
        let history = if query.history {
            Some(self.history(task_id).await?)
        } else {
            None
        };

        Ok(TaskView {
            task_id: task_id.clone(),
            is_tracking,
            description_html,
            detail,
            comments,
            history,
        })
    }

    pub async fn comments(&self, task_id: &EntityId) -> Result<Vec<CommentView>, AppError> {
        let comments = self.client.task_comments(task_id).await?;
        Ok(comments.into_iter().map(CommentView::from_value).collect())
    }

    pub async fn history(&self, task_id: &EntityId) -> Result<Vec<HistoryEntryView>, AppError> {
        let items = self.client.task_history(task_id).await?;
        Ok(items
            .into_iter()
            .map(|entry| HistoryEntryView {
                time: HistoryTime::of(&entry),
                entry,
            })
            .collect())
    }

    /// Whether the backend currently books time on `task_id`. A failed
    /// booking fetch counts as not tracking.
    pub async fn is_tracking(&self, task_id: &EntityId) -> bool {
        match self.client.booking_time().await {
            Ok(booking) => DurationSnapshot::from(&booking).is_tracking(task_id),
            Err(err) => {
                warn!(
                    target = "reybex::tasks",
                    task_id = %task_id,
                    error = %err,
                    "Failed to fetch booking time"
                );
                false
            }
        }
    }
}

fn comment_body(comment: &Value) -> Option<&Value> {
    let object = comment.as_object()?;
    COMMENT_BODY_FIELDS
        .iter()
        .find_map(|field| object.get(*field).filter(|value| !value.is_null()))
}
