use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueFilter {
    pub first: Option<u32>,
    pub after: Option<String>,
    pub team_id: Option<String>,
    pub project_id: Option<String>,
    pub state_name: Option<String>,
    pub query: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFilter {
    pub first: Option<u32>,
    pub after: Option<String>,
    pub team_id: Option<String>,
    pub query: Option<String>,
}

/// Health snapshot of an issue list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSummary {
    pub total: usize,
    pub blocked: usize,
    pub overdue: usize,
    pub stale: usize,
    pub completion_pct: u32,
}
