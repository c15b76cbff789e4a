//! Authorization-code flow against every supported provider.
//!
//! The providers differ only in authorize-URL parameters, token request
//! encoding and a few error strings, so a single client switches on
//! [`OAuthProviderKind`].

use crate::config::OAuthClientConfig;
use crate::domain::entities::oauth::{AuthorizationUrl, TokenGrant};
use crate::domain::error::DomainError;
use crate::domain::ports::oauth::OAuthProvider;
use crate::domain::values::numeric::parse_int;
use crate::domain::values::provider_kind::OAuthProviderKind;
use crate::infrastructure::http::{build_client, decode_body, transport_error, truthy_text};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::{json, Value};
use std::time::Duration;

const SLACK_SCOPES: &str = concat!(
    "chat:write,channels:read,im:write,im:read,",
    "users:read,users:read.email,commands",
);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GrantKind {
    Exchange,
    Refresh,
}

pub struct OAuthClient {
    kind: OAuthProviderKind,
    config: OAuthClientConfig,
    client: Client,
}

impl OAuthClient {
    pub fn new(
        kind: OAuthProviderKind,
        config: &OAuthClientConfig,
        timeout: Duration,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            kind,
            config: config.clone(),
            client: build_client(timeout)?,
        })
    }

    fn env_prefix(&self) -> &'static str {
        match self.kind {
            OAuthProviderKind::Linear => "LINEAR",
            OAuthProviderKind::Notion => "NOTION",
            OAuthProviderKind::GoogleDocs => "GOOGLE",
            OAuthProviderKind::Gmail => "GMAIL",
            OAuthProviderKind::Slack => "SLACK",
        }
    }

    fn client_id(&self) -> Result<&str, DomainError> {
        match self.config.client_id.as_deref() {
            Some(id) => Ok(id),
            None if self.kind == OAuthProviderKind::Linear => Err(DomainError::InvalidInput(
                "LINEAR_OAUTH_CLIENT_ID is missing. Add it to the gateway environment.".to_string(),
            )),
            None => Err(DomainError::InvalidInput(format!(
                "{}_OAUTH_CLIENT_ID is not configured",
                self.env_prefix()
            ))),
        }
    }

    fn credentials(&self) -> Result<(&str, &str), DomainError> {
        let pair = (
            self.config.client_id.as_deref(),
            self.config.client_secret.as_deref(),
        );
        match pair {
            (Some(id), Some(secret)) => Ok((id, secret)),
            _ => {
                let prefix = self.env_prefix();
                Err(DomainError::InvalidInput(format!(
                    "{} OAuth is not configured. Missing {prefix}_OAUTH_CLIENT_ID/{prefix}_OAUTH_CLIENT_SECRET",
                    self.kind.label()
                )))
            }
        }
    }

    fn authorize_params(
        &self,
        client_id: &str,
        redirect_uri: &str,
        state: &str,
    ) -> Vec<(&'static str, String)> {
        let mut params: Vec<(&'static str, String)> = Vec::new();
        match self.kind {
            OAuthProviderKind::Linear => {
                params.push(("response_type", "code".into()));
                params.push(("client_id", client_id.into()));
                params.push(("redirect_uri", redirect_uri.into()));
                params.push(("state", state.into()));
                if let Some(scope) = &self.config.scopes {
                    params.push(("scope", scope.clone()));
                }
            }
            OAuthProviderKind::Notion => {
                params.push(("client_id", client_id.into()));
                params.push(("response_type", "code".into()));
                params.push(("owner", "user".into()));
                params.push(("redirect_uri", redirect_uri.into()));
                params.push(("state", state.into()));
            }
            OAuthProviderKind::GoogleDocs | OAuthProviderKind::Gmail => {
                params.push(("client_id", client_id.into()));
                params.push(("response_type", "code".into()));
                params.push(("redirect_uri", redirect_uri.into()));
                params.push(("scope", self.config.scopes.clone().unwrap_or_default()));
                params.push(("access_type", "offline".into()));
                params.push(("include_granted_scopes", "true".into()));
                params.push(("prompt", "consent".into()));
                params.push(("state", state.into()));
            }
            OAuthProviderKind::Slack => {
                params.push(("client_id", client_id.into()));
                params.push(("scope", SLACK_SCOPES.into()));
                params.push(("redirect_uri", redirect_uri.into()));
                params.push(("state", state.into()));
            }
        }
        params
    }

    async fn post_token(
        &self,
        fields: Vec<(&'static str, String)>,
    ) -> Result<(u16, Value), DomainError> {
        let request = self.client.post(&self.config.token_url);
        let request = if self.kind == OAuthProviderKind::Notion {
            let (id, secret) = self.credentials()?;
            let body: serde_json::Map<String, Value> = fields
                .into_iter()
                .filter(|(k, _)| *k != "client_id" && *k != "client_secret")
                .map(|(k, v)| (k.to_string(), Value::String(v)))
                .collect();
            request.basic_auth(id, Some(secret)).json(&body)
        } else {
            request.form(&fields)
        };

        let label = format!("{} OAuth", self.kind.label());
        let resp = request
            .send()
            .await
            .map_err(|e| transport_error(&label, e))?;
        let status = resp.status().as_u16();
        let raw = resp.text().await.map_err(|e| transport_error(&label, e))?;
        let payload = match decode_body(&raw) {
            Value::Object(map) => Value::Object(map),
            _ => json!({}),
        };
        Ok((status, payload))
    }

    async fn token_grant(
        &self,
        fields: Vec<(&'static str, String)>,
        grant: GrantKind,
    ) -> Result<TokenGrant, DomainError> {
        let (status, payload) = self.post_token(fields).await?;
        let label = self.kind.label();

        if self.kind == OAuthProviderKind::Slack {
            if payload.get("ok").and_then(Value::as_bool) != Some(true) {
                let error = truthy_text(payload.get("error"))
                    .unwrap_or_else(|| "unknown_error".into());
                tracing::warn!(status, error = %error, "Slack OAuth exchange rejected");
                return Err(DomainError::InvalidInput(format!("Slack OAuth error: {error}")));
            }
            return slack_grant(payload);
        }

        if !(200..300).contains(&status) {
            let fallback = match grant {
                GrantKind::Exchange => format!("{label} OAuth token exchange failed"),
                GrantKind::Refresh => format!("{label} OAuth refresh failed"),
            };
            let message = truthy_text(payload.get("error_description"))
                .or_else(|| truthy_text(payload.get("error")))
                .unwrap_or(fallback);
            tracing::warn!(
                provider = %self.kind,
                status,
                message = %message,
                "token endpoint rejected request"
            );
            return Err(DomainError::InvalidInput(message));
        }

        let mut token = parse_grant(self.kind, payload).map_err(|_| {
            let message = match grant {
                GrantKind::Exchange => format!("{label} OAuth response is missing access_token"),
                GrantKind::Refresh => format!("{label} OAuth refresh is missing access_token"),
            };
            if self.kind == OAuthProviderKind::Linear {
                DomainError::Gateway(message)
            } else {
                DomainError::InvalidInput(message)
            }
        })?;

        if self.kind == OAuthProviderKind::Notion && grant == GrantKind::Exchange {
            token.metadata = Some(notion_metadata(&token.raw));
        }
        Ok(token)
    }
}

/// Normalise a standard token endpoint payload. Fails when there is no
/// usable access token.
pub fn parse_grant(kind: OAuthProviderKind, payload: Value) -> Result<TokenGrant, DomainError> {
    let text = |key: &str| {
        truthy_text(payload.get(key))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };
    let access_token = text("access_token")
        .ok_or_else(|| DomainError::Gateway("missing access_token".to_string()))?;

    let expires_in = match payload.get("expires_in") {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Some(other) => parse_int(other).filter(|n| *n != 0),
        None => None,
    };

    Ok(TokenGrant {
        provider: kind,
        access_token,
        refresh_token: text("refresh_token"),
        token_type: text("token_type"),
        scope: text("scope"),
        expires_in,
        metadata: None,
        raw: payload,
    })
}

fn notion_metadata(raw: &Value) -> Value {
    let field = |key: &str| match raw.get(key) {
        Some(v) if truthy_text(Some(v)).is_some() => v.clone(),
        _ => Value::Null,
    };
    json!({
        "workspaceId": field("workspace_id"),
        "workspaceName": field("workspace_name"),
        "workspaceIcon": field("workspace_icon"),
        "owner": field("owner"),
    })
}

fn slack_grant(payload: Value) -> Result<TokenGrant, DomainError> {
    let mut grant = parse_grant(OAuthProviderKind::Slack, payload).map_err(|_| {
        DomainError::InvalidInput("Slack OAuth response is missing access_token".to_string())
    })?;
    grant.metadata = Some(json!({
        "team": grant.raw.get("team").cloned().unwrap_or(Value::Null),
        "authed_user": grant.raw.get("authed_user").cloned().unwrap_or(Value::Null),
    }));
    Ok(grant)
}

#[async_trait]
impl OAuthProvider for OAuthClient {
    fn authorization_url(
        &self,
        redirect_uri: &str,
        state: &str,
    ) -> Result<AuthorizationUrl, DomainError> {
        let client_id = self.client_id()?;
        let suffix = if self.kind == OAuthProviderKind::Linear { " for OAuth" } else { "" };
        if redirect_uri.trim().is_empty() {
            return Err(DomainError::InvalidInput(format!("redirectUri is required{suffix}")));
        }
        if state.trim().is_empty() {
            return Err(DomainError::InvalidInput(format!("state is required{suffix}")));
        }

        let mut url = Url::parse(&self.config.authorize_url).map_err(|e| {
            DomainError::Internal(format!("Invalid {} authorize URL: {e}", self.kind.label()))
        })?;
        url.query_pairs_mut()
            .extend_pairs(self.authorize_params(client_id, redirect_uri, state));

        Ok(AuthorizationUrl {
            provider: self.kind,
            authorization_url: url.to_string(),
        })
    }

    async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<TokenGrant, DomainError> {
        let (id, secret) = self.credentials()?;
        let mut fields = Vec::new();
        if self.kind != OAuthProviderKind::Slack {
            fields.push(("grant_type", "authorization_code".to_string()));
        }
        fields.push(("client_id", id.to_string()));
        fields.push(("client_secret", secret.to_string()));
        fields.push(("code", code.to_string()));
        fields.push(("redirect_uri", redirect_uri.to_string()));
        self.token_grant(fields, GrantKind::Exchange).await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant, DomainError> {
        if self.kind == OAuthProviderKind::Slack {
            return Err(DomainError::InvalidInput(
                "Slack bot tokens do not require refresh".to_string(),
            ));
        }
        let (id, secret) = self.credentials()?;
        if refresh_token.trim().is_empty() {
            return Err(DomainError::InvalidInput("refreshToken is required".to_string()));
        }
        let fields = vec![
            ("grant_type", "refresh_token".to_string()),
            ("client_id", id.to_string()),
            ("client_secret", secret.to_string()),
            ("refresh_token", refresh_token.to_string()),
        ];
        self.token_grant(fields, GrantKind::Refresh).await
    }
}
