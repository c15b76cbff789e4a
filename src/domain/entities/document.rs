use crate::domain::values::provider_kind::DocumentSourceKind;
use serde::Serialize;

/// Plain-text extraction of a remote document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPayload {
    pub source_type: DocumentSourceKind,
    pub source_id: String,
    pub title: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSearchItem {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_view_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceHealth {
    pub provider: String,
    pub configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl SourceHealth {
    pub fn check(provider: &str, configured: bool, missing_reason: &str) -> Self {
        Self {
            provider: provider.to_string(),
            configured,
            reason: (!configured).then(|| missing_reason.to_string()),
        }
    }
}
