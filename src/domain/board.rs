//! Sprint board tabs and how backend kanban columns map onto them.

use std::{fmt, str::FromStr};

use reybex_api_types::KanbanColumn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KanbanTab {
    Todo,
    InProcess,
    Wfc,
    B2r,
    Done,
}

impl KanbanTab {
    pub const ALL: [KanbanTab; 5] = [
        KanbanTab::Todo,
        KanbanTab::InProcess,
        KanbanTab::Wfc,
        KanbanTab::B2r,
        KanbanTab::Done,
    ];

    pub fn key(self) -> &'static str {
        match self {
            KanbanTab::Todo => "todo",
            KanbanTab::InProcess => "inProcess",
            KanbanTab::Wfc => "wfc",
            KanbanTab::B2r => "b2r",
            KanbanTab::Done => "done",
        }
    }

    /// Column names (lowercased) that belong to this tab.
    fn matches_name(self, name: &str) -> bool {
        match self {
            KanbanTab::Todo => name.contains("todo"),
            KanbanTab::InProcess => name.contains("in process") || name.contains("inprocess"),
            KanbanTab::Wfc => name.contains("wfc") || name.contains("wcf"),
            KanbanTab::B2r => name.contains("b2r"),
            KanbanTab::Done => name.contains("done") || name.contains("erledigt"),
        }
    }

    /// First tab (in board order) claiming the column, if any.
    pub fn for_column(column: &KanbanColumn) -> Option<Self> {
        let name = column_search_name(column);
        Self::ALL.into_iter().find(|tab| tab.matches_name(&name))
    }

    /// Whether this tab lists the column's tasks. Unlike [`Self::for_column`]
    /// a column may be claimed by several tabs.
    pub fn claims(self, column: &KanbanColumn) -> bool {
        self.matches_name(&column_search_name(column))
    }
}

impl fmt::Display for KanbanTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for KanbanTab {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace(['-', '_', ' '], "");
        match normalized.as_str() {
            "todo" => Ok(KanbanTab::Todo),
            "inprocess" => Ok(KanbanTab::InProcess),
            "wfc" => Ok(KanbanTab::Wfc),
            "b2r" => Ok(KanbanTab::B2r),
            "done" => Ok(KanbanTab::Done),
            _ => Err(DomainError::validation(format!("unknown board tab `{value}`"))),
        }
    }
}

/// Lowercased column `name`, falling back to the column type's translated name.
fn column_search_name(column: &KanbanColumn) -> String {
    let name = column.name.as_deref().unwrap_or("").to_lowercase();
    if !name.is_empty() {
        return name;
    }
    column
        .kanban_column_type
        .as_ref()
        .and_then(|kind| kind.translated_name.as_deref())
        .unwrap_or("")
        .to_lowercase()
}

/// Task totals per tab. A tab claimed by several columns keeps the count of
/// the last one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardCounts {
    pub todo: u64,
    pub in_process: u64,
    pub wfc: u64,
    pub b2r: u64,
    pub done: u64,
}

impl BoardCounts {
    pub fn from_columns(columns: &[KanbanColumn]) -> Self {
        let mut counts = Self::default();
        for column in columns {
            if let Some(tab) = KanbanTab::for_column(column) {
                *counts.slot(tab) = column_task_count(column);
            }
        }
        counts
    }

    pub fn get(&self, tab: KanbanTab) -> u64 {
        match tab {
            KanbanTab::Todo => self.todo,
            KanbanTab::InProcess => self.in_process,
            KanbanTab::Wfc => self.wfc,
            KanbanTab::B2r => self.b2r,
            KanbanTab::Done => self.done,
        }
    }

    fn slot(&mut self, tab: KanbanTab) -> &mut u64 {
        match tab {
            KanbanTab::Todo => &mut self.todo,
            KanbanTab::InProcess => &mut self.in_process,
            KanbanTab::Wfc => &mut self.wfc,
            KanbanTab::B2r => &mut self.b2r,
            KanbanTab::Done => &mut self.done,
        }
    }
}

fn column_task_count(column: &KanbanColumn) -> u64 {
    column
        .groups
        .iter()
        .flatten()
        .map(|group| group.total_task_count.unwrap_or(0))
        .sum()
}

/// Tasks of the last column claimed by `tab`, concatenated across its groups.
pub fn tasks_for_tab(columns: &[KanbanColumn], tab: KanbanTab) -> Vec<Value> {
    columns
        .iter()
        .rev()
        .find(|column| tab.claims(column))
        .map(|column| {
            column
                .groups
                .iter()
                .flatten()
                .flat_map(|group| group.tasks.iter().flatten().cloned())
                .collect()
        })
        .unwrap_or_default()
}
