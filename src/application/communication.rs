use crate::domain::entities::email::{EmailMessage, EmailThread, OutgoingEmail};
use crate::domain::error::DomainError;
use crate::domain::ports::communication::CommunicationProvider;
use crate::domain::values::provider_kind::CommunicationKind;
use serde_json::Value;
use std::sync::Arc;

pub const DEFAULT_MAX_RESULTS: u32 = 20;

pub struct CommunicationUseCase {
    gmail: Arc<dyn CommunicationProvider>,
}

impl CommunicationUseCase {
    pub fn new(gmail: Arc<dyn CommunicationProvider>) -> Self {
        Self { gmail }
    }

    pub fn resolve(&self, provider: &str) -> Result<&dyn CommunicationProvider, DomainError> {
        match provider.parse::<CommunicationKind>()? {
            CommunicationKind::Gmail => Ok(self.gmail.as_ref()),
        }
    }

    pub async fn list_threads(
        &self,
        provider: &str,
        token: Option<&str>,
        query: Option<&str>,
        max_results: Option<u32>,
    ) -> Result<Value, DomainError> {
        tracing::info!(provider, ?query, ?max_results, "communication list threads");
        self.resolve(provider)?
            .list_threads(token, query, max_results.unwrap_or(DEFAULT_MAX_RESULTS))
            .await
    }

    pub async fn get_thread(
        &self,
        provider: &str,
        token: Option<&str>,
        id: &str,
    ) -> Result<EmailThread, DomainError> {
        tracing::info!(provider, id, "communication get thread");
        self.resolve(provider)?.get_thread(token, id).await
    }

    pub async fn search_messages(
        &self,
        provider: &str,
        token: Option<&str>,
        query: &str,
        max_results: Option<u32>,
    ) -> Result<Value, DomainError> {
        tracing::info!(provider, query, ?max_results, "communication search messages");
        self.resolve(provider)?
            .search_messages(token, query, max_results.unwrap_or(DEFAULT_MAX_RESULTS))
            .await
    }

    pub async fn get_message(
        &self,
        provider: &str,
        token: Option<&str>,
        id: &str,
    ) -> Result<EmailMessage, DomainError> {
        tracing::info!(provider, id, "communication get message");
        self.resolve(provider)?.get_message(token, id).await
    }

    pub async fn send_message(
        &self,
        provider: &str,
        token: Option<&str>,
        message: &OutgoingEmail,
    ) -> Result<Value, DomainError> {
        let required = [
            ("to", &message.to),
            ("subject", &message.subject),
            ("body", &message.body),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(DomainError::InvalidInput(format!("{field} is required.")));
            }
        }
        tracing::info!(provider, thread_id = ?message.thread_id, "communication send message");
        self.resolve(provider)?.send_message(token, message).await
    }
}
