use crate::domain::entities::activity::{ActivityEvent, StandupResponse};
use crate::domain::error::DomainError;

/// Platform API that receives normalised webhook traffic.
#[async_trait::async_trait]
pub trait ActivitySink: Send + Sync {
    async fn forward_activity(&self, event: &ActivityEvent) -> Result<(), DomainError>;
    async fn forward_standup(&self, response: &StandupResponse) -> Result<(), DomainError>;
}
