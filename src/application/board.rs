use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use reybex_api_types::{EntityId, KanbanRequest};

use crate::{
    application::error::AppError,
    domain::board::{BoardCounts, KanbanTab, tasks_for_tab},
    infra::http::ReybexClient,
};

/// Sprint board for one user: per-tab totals plus the selected tab's tasks.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardView {
    pub tab: KanbanTab,
    pub counts: BoardCounts,
    pub tasks: Vec<Value>,
}

#[derive(Debug, Clone)]
pub struct BoardService {
    client: ReybexClient,
    sprint_id: EntityId,
}

impl BoardService {
    pub fn new(client: ReybexClient, sprint_id: EntityId) -> Self {
        Self { client, sprint_id }
    }

    pub async fn board(&self, user_id: &EntityId, tab: KanbanTab) -> Result<BoardView, AppError> {
        let request = KanbanRequest::for_user(user_id.clone(), self.sprint_id.clone());
        let columns = self.client.kanban(&request).await?;

        let counts = BoardCounts::from_columns(&columns);
        let tasks = tasks_for_tab(&columns, tab);
        debug!(
            target = "reybex::board",
            columns = columns.len(),
            tab = %tab,
            tasks = tasks.len(),
            "Board loaded"
        );

        Ok(BoardView { tab, counts, tasks })
    }
}
