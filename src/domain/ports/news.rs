use crate::domain::error::DomainError;
use crate::domain::values::query_params::QueryParams;
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewsEndpoint {
    Latest,
    Archive,
    Market,
    Crypto,
    Sources,
}

impl NewsEndpoint {
    pub fn path(&self) -> &'static str {
        match self {
            NewsEndpoint::Latest => "latest",
            NewsEndpoint::Archive => "archive",
            NewsEndpoint::Market => "market",
            NewsEndpoint::Crypto => "crypto",
            NewsEndpoint::Sources => "sources",
        }
    }
}

impl fmt::Display for NewsEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// News search (NewsData).
#[async_trait::async_trait]
pub trait NewsSource: Send + Sync {
    async fn fetch(
        &self,
        endpoint: NewsEndpoint,
        params: &QueryParams,
    ) -> Result<Value, DomainError>;
}
