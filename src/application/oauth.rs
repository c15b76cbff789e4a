use crate::domain::entities::oauth::{AuthorizationUrl, TokenGrant};
use crate::domain::error::DomainError;
use crate::domain::ports::oauth::OAuthProvider;
use crate::domain::values::provider_kind::OAuthProviderKind;
use std::collections::HashMap;
use std::sync::Arc;

/// Authorization-code flows keyed by provider.
pub struct OAuthUseCase {
    providers: HashMap<OAuthProviderKind, Arc<dyn OAuthProvider>>,
}

impl OAuthUseCase {
    pub fn new(providers: HashMap<OAuthProviderKind, Arc<dyn OAuthProvider>>) -> Self {
        Self { providers }
    }

    pub fn resolve(&self, provider: &str) -> Result<&dyn OAuthProvider, DomainError> {
        let kind = provider.parse::<OAuthProviderKind>()?;
        self.providers
            .get(&kind)
            .map(|p| p.as_ref())
            .ok_or_else(|| {
                DomainError::NotConfigured(format!("{} OAuth is not available", kind.label()))
            })
    }

    pub fn authorization_url(
        &self,
        provider: &str,
        redirect_uri: &str,
        state: &str,
    ) -> Result<AuthorizationUrl, DomainError> {
        tracing::info!(provider, redirect_uri, "oauth authorize");
        self.resolve(provider)?
            .authorization_url(redirect_uri, state)
    }

    pub async fn exchange_code(
        &self,
        provider: &str,
        code: &str,
        redirect_uri: &str,
    ) -> Result<TokenGrant, DomainError> {
        tracing::info!(provider, redirect_uri, "oauth code exchange");
        self.resolve(provider)?
            .exchange_code(code, redirect_uri)
            .await
    }

    pub async fn refresh(
        &self,
        provider: &str,
        refresh_token: &str,
    ) -> Result<TokenGrant, DomainError> {
        tracing::info!(provider, "oauth refresh");
        self.resolve(provider)?.refresh(refresh_token).await
    }
}
