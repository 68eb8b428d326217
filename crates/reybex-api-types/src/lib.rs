//! Wire types shared by the Reybex client and its tests.
//!
//! The backend is loosely typed: identifiers arrive as numbers or strings,
//! most fields are optional, and payloads carry many fields the client never
//! reads. Every struct therefore keeps unknown fields in a flattened map so
//! they survive a round trip through the client untouched.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Identifier as the backend sends it: a JSON number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<u64> for EntityId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Numeric ids go back out as numbers; the backend compares them by type.
        match self.0.parse::<i64>() {
            Ok(number) if number.to_string() == self.0 => serializer.serialize_i64(number),
            _ => serializer.serialize_str(&self.0),
        }
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(serde_json::Number),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(number) => Self(number.to_string()),
            RawId::Text(text) => Self(text),
        })
    }
}

/// `{ "data": ... }` response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// Error body returned alongside non-success statuses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ApiMessage {
    /// The most specific human-readable message, if the server sent one.
    pub fn text(&self) -> Option<&str> {
        self.message
            .as_deref()
            .or(self.error.as_deref())
            .filter(|text| !text.trim().is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user_id: Option<EntityId>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileRef {
    #[serde(default)]
    pub id: Option<EntityId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<EntityId>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub surname: Option<String>,
    #[serde(default)]
    pub file: Option<FileRef>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: EntityId,
}

/// Board query for one user's tasks in one sprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KanbanRequest {
    pub users: Vec<UserRef>,
    pub responsible_users: Option<Value>,
    pub department: Option<Value>,
    pub project_id: Option<Value>,
    pub customer_id: Option<Value>,
    pub sprint_id: EntityId,
    pub tags: Vec<Value>,
    pub show_tickets: bool,
    pub group_by_users: bool,
    pub group_by_responsible_users: bool,
}

impl KanbanRequest {
    pub fn for_user(user_id: EntityId, sprint_id: EntityId) -> Self {
        Self {
            users: vec![UserRef { id: user_id }],
            responsible_users: None,
            department: None,
            project_id: None,
            customer_id: None,
            sprint_id,
            tags: Vec::new(),
            show_tickets: false,
            group_by_users: false,
            group_by_responsible_users: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KanbanColumnType {
    #[serde(default)]
    pub translated_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KanbanGroup {
    #[serde(default)]
    pub total_task_count: Option<u64>,
    #[serde(default)]
    pub tasks: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KanbanColumn {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub kanban_column_type: Option<KanbanColumnType>,
    #[serde(default)]
    pub groups: Option<Vec<KanbanGroup>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskSummary {
    #[serde(default)]
    pub id: Option<EntityId>,
    /// Rich-text description; usually a JSON document encoded as a string.
    #[serde(default)]
    pub description: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskDetail {
    #[serde(default)]
    pub task: Option<TaskSummary>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryItem {
    #[serde(rename = "taskCost_cost", default)]
    pub task_cost_cost: Option<f64>,
    #[serde(rename = "taskCost_timeTracked", default)]
    pub task_cost_time_tracked: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Current booking as reported by `GET /taskHistory/bookingTime`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingTime {
    /// Task currently booked, if any.
    #[serde(default)]
    pub id: Option<EntityId>,
    /// Elapsed milliseconds of the running booking.
    #[serde(default)]
    pub booking_time: Option<i64>,
    #[serde(default)]
    pub show_current_booking: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
