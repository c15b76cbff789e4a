use crate::domain::entities::oauth::{AuthorizationUrl, TokenGrant};
use crate::domain::error::DomainError;

/// Authorization-code flow for one provider.
#[async_trait::async_trait]
pub trait OAuthProvider: Send + Sync {
    fn authorization_url(
        &self,
        redirect_uri: &str,
        state: &str,
    ) -> Result<AuthorizationUrl, DomainError>;
    async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<TokenGrant, DomainError>;
    async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant, DomainError>;
}
