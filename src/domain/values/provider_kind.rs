//! Provider keys taken from route paths.
//!
//! Each REST area resolves its `{provider}` segment case-insensitively; the
//! error strings are returned to callers verbatim.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectManagerKind {
    Linear,
}

impl FromStr for ProjectManagerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "linear" => Ok(ProjectManagerKind::Linear),
            _ => Err(format!(
                "Unsupported provider '{s}'. Supported providers: linear"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DocumentSourceKind {
    #[serde(rename = "notion")]
    Notion,
    #[serde(rename = "google_docs")]
    GoogleDocs,
}

impl fmt::Display for DocumentSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentSourceKind::Notion => write!(f, "notion"),
            DocumentSourceKind::GoogleDocs => write!(f, "google-docs"),
        }
    }
}

impl FromStr for DocumentSourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "notion" => Ok(DocumentSourceKind::Notion),
            "google-docs" | "google_docs" | "googledocs" => Ok(DocumentSourceKind::GoogleDocs),
            _ => Err(format!(
                "Unsupported provider '{s}'. Supported providers: notion, google-docs"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommunicationKind {
    Gmail,
}

impl FromStr for CommunicationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gmail" => Ok(CommunicationKind::Gmail),
            _ => Err(format!(
                "Unsupported communication provider '{s}'. Supported providers: gmail"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OAuthProviderKind {
    Linear,
    Notion,
    GoogleDocs,
    Gmail,
    Slack,
}

impl OAuthProviderKind {
    /// Human label used in provider error messages.
    pub fn label(&self) -> &'static str {
        match self {
            OAuthProviderKind::Linear => "Linear",
            OAuthProviderKind::Notion => "Notion",
            OAuthProviderKind::GoogleDocs => "Google",
            OAuthProviderKind::Gmail => "Gmail",
            OAuthProviderKind::Slack => "Slack",
        }
    }
}

impl fmt::Display for OAuthProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OAuthProviderKind::Linear => write!(f, "linear"),
            OAuthProviderKind::Notion => write!(f, "notion"),
            OAuthProviderKind::GoogleDocs => write!(f, "google-docs"),
            OAuthProviderKind::Gmail => write!(f, "gmail"),
            OAuthProviderKind::Slack => write!(f, "slack"),
        }
    }
}

impl FromStr for OAuthProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "linear" => Ok(OAuthProviderKind::Linear),
            "notion" => Ok(OAuthProviderKind::Notion),
            "google-docs" | "google_docs" | "googledocs" => Ok(OAuthProviderKind::GoogleDocs),
            "gmail" => Ok(OAuthProviderKind::Gmail),
            "slack" => Ok(OAuthProviderKind::Slack),
            _ => Err(format!(
                "Unsupported provider '{s}'. Supported providers: linear, notion, google-docs, gmail, slack"
            )),
        }
    }
}
