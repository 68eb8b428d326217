use std::time::Duration;

use reqwest::{Client, Method, Response, StatusCode, Url, header};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use reybex_api_types::{
    ApiMessage, BookingTime, EntityId, HistoryItem, KanbanColumn, KanbanRequest, LoginRequest,
    LoginResponse, TaskDetail, UserProfile,
};

const LAST_COMMENTS_PAGE_SIZE: &str = "25";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("session expired or not authorised")]
    Unauthorized { message: Option<String> },
    #[error("server returned {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Server {
        status: StatusCode,
        message: Option<String>,
        body: String,
    },
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// The transport never produced a response (connection refused, DNS,
    /// timeout).
    pub fn is_connection(&self) -> bool {
        matches!(self, ClientError::Http(err) if err.is_connect() || err.is_timeout() || err.is_request())
    }

    /// Human-readable message the server attached to an error response.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Server { message, .. } | ClientError::Unauthorized { message } => {
                message.as_deref()
            }
            _ => None,
        }
    }
}

/// Typed client for the Reybex backend.
///
/// Requests carry `Authorization: Basic <token>` with the stored token used
/// verbatim. Most endpoints wrap their payload in `{ "data": ... }`; both the
/// wrapped and the flat form are accepted.
#[derive(Clone, Debug)]
pub struct ReybexClient {
    client: Client,
    base: Url,
    token: Option<String>,
}

impl ReybexClient {
    pub fn new(base: Url, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder()
            .user_agent(Self::user_agent())
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base,
            token: None,
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("reybex/", env!("CARGO_PKG_VERSION"))
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn url(&self, path: &str) -> Result<Url, ClientError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(ClientError::Url)
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ClientError> {
        let value = self
            .request(Method::POST, "login", None, Some(request))
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn user(&self, user_id: &EntityId) -> Result<UserProfile, ClientError> {
        self.get_data(&format!("user/{user_id}")).await
    }

    pub async fn logout(&self) -> Result<(), ClientError> {
        self.request::<()>(Method::GET, "logout", None, None)
            .await
            .map(|_| ())
    }

    pub async fn kanban(&self, request: &KanbanRequest) -> Result<Vec<KanbanColumn>, ClientError> {
        let value = self
            .request(Method::POST, "kanban", None, Some(request))
            .await?;
        decode_list(unwrap_data(value))
    }

    pub async fn task(&self, task_id: &EntityId) -> Result<TaskDetail, ClientError> {
        self.get_data(&format!("task/{task_id}")).await
    }

    pub async fn task_comments(&self, task_id: &EntityId) -> Result<Vec<Value>, ClientError> {
        let value = self
            .request::<()>(Method::GET, &format!("taskComment/{task_id}"), None, None)
            .await?;
        decode_list(unwrap_data(value))
    }

    pub async fn task_history(&self, task_id: &EntityId) -> Result<Vec<HistoryItem>, ClientError> {
        let query = [("taskId", task_id.to_string())];
        let value = self
            .request::<()>(Method::GET, "taskHistory", Some(&query), None)
            .await?;
        decode_list(unwrap_data(value))
    }

    /// Current booking; an empty body means nothing is booked.
    pub async fn booking_time(&self) -> Result<BookingTime, ClientError> {
        let value = self
            .request::<()>(Method::GET, "taskHistory/bookingTime", None, None)
            .await?;
        match unwrap_data(value) {
            Value::Null => Ok(BookingTime::default()),
            value => Ok(serde_json::from_value(value)?),
        }
    }

    pub async fn book_task(&self, task_id: &EntityId) -> Result<(), ClientError> {
        self.request::<()>(
            Method::GET,
            &format!("taskHistory/bookTask/{task_id}"),
            None,
            None,
        )
        .await
        .map(|_| ())
    }

    pub async fn end_task(&self) -> Result<(), ClientError> {
        self.request::<()>(Method::GET, "taskHistory/endTask", None, None)
            .await
            .map(|_| ())
    }

    pub async fn tickets(&self, user_id: &EntityId) -> Result<Vec<Value>, ClientError> {
        let query = [
            ("taskStatus", "mine".to_string()),
            ("user_hid", user_id.to_string()),
            ("isMyTickets", "1".to_string()),
        ];
        let value = self
            .request::<()>(Method::GET, "ticket/listTickets", Some(&query), None)
            .await?;
        decode_list(unwrap_data(value))
    }

    /// First page of a data export table filtered to one user.
    pub async fn export_table(
        &self,
        export_id: &EntityId,
        user_id: &EntityId,
    ) -> Result<Vec<Value>, ClientError> {
        let query = [
            ("page", "1".to_string()),
            (
                "filter[filters][0][advancedFilter][field]",
                "userId".to_string(),
            ),
            (
                "filter[filters][0][advancedFilter][value]",
                user_id.to_string(),
            ),
            ("skip", "0".to_string()),
            ("take", LAST_COMMENTS_PAGE_SIZE.to_string()),
            ("pageSize", LAST_COMMENTS_PAGE_SIZE.to_string()),
        ];
        let value = self
            .request::<()>(
                Method::GET,
                &format!("dataExport/{export_id}/showTable"),
                Some(&query),
                None,
            )
            .await?;
        decode_list(unwrap_data(value))
    }

    async fn get_data<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let value = self.request::<()>(Method::GET, path, None, None).await?;
        Ok(serde_json::from_value(unwrap_data(value))?)
    }

    async fn request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        query: Option<&[(&str, String)]>,
        body: Option<&B>,
    ) -> Result<Value, ClientError> {
        let mut url = self.url(path)?;
        if let Some(q) = query {
            url.set_query(None);
            let mut qp = url.query_pairs_mut();
            for (k, v) in q {
                qp.append_pair(k, v);
            }
        }

        debug!(target = "reybex::http", method = %method, path, "Sending request");

        let mut req = self
            .client
            .request(method, url)
            .header(header::ACCEPT, "application/json");
        if let Some(token) = self.token.as_deref() {
            req = req.header(header::AUTHORIZATION, format!("Basic {token}"));
        }
        if let Some(b) = body {
            req = req.json(b);
        }

        let resp = req.send().await?;
        Self::handle(resp).await
    }

    async fn handle(resp: Response) -> Result<Value, ClientError> {
        let status = resp.status();
        let bytes = resp.bytes().await?;

        if status.is_success() {
            if bytes.iter().all(u8::is_ascii_whitespace) {
                return Ok(Value::Null);
            }
            return Ok(serde_json::from_slice(&bytes)?);
        }

        let message = serde_json::from_slice::<ApiMessage>(&bytes)
            .ok()
            .and_then(|body| body.text().map(str::to_string));
        if status == StatusCode::UNAUTHORIZED {
            return Err(ClientError::Unauthorized { message });
        }
        Err(ClientError::Server {
            status,
            message,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}

/// Strip a `{ "data": ... }` envelope when present.
fn unwrap_data(value: Value) -> Value {
    match value {
        Value::Object(mut object) if object.contains_key("data") => {
            object.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Decode a list payload; a missing or `null` list is empty.
fn decode_list<T: DeserializeOwned>(value: Value) -> Result<Vec<T>, ClientError> {
    if value.is_null() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_value(value)?)
}
