use crate::domain::entities::email::{EmailMessage, EmailThread, OutgoingEmail};
use crate::domain::error::DomainError;
use serde_json::Value;

/// Mailbox access. List and search calls return the provider listing as-is;
/// single items are parsed.
#[async_trait::async_trait]
pub trait CommunicationProvider: Send + Sync {
    async fn list_threads(
        &self,
        token: Option<&str>,
        query: Option<&str>,
        max_results: u32,
    ) -> Result<Value, DomainError>;
    async fn get_thread(&self, token: Option<&str>, id: &str) -> Result<EmailThread, DomainError>;
    async fn search_messages(
        &self,
        token: Option<&str>,
        query: &str,
        max_results: u32,
    ) -> Result<Value, DomainError>;
    async fn get_message(&self, token: Option<&str>, id: &str) -> Result<EmailMessage, DomainError>;
    async fn send_message(
        &self,
        token: Option<&str>,
        message: &OutgoingEmail,
    ) -> Result<Value, DomainError>;
}
