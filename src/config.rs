//! Environment configuration.
//!
//! Every provider reads its credentials, base URL and timeout from the process
//! environment (optionally seeded from a `.env` file). `Config::from_lookup`
//! takes any key lookup so tests can build a config without touching the
//! real environment.

use std::time::Duration;

const DEFAULT_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_PORT: u16 = 3001;
const GOOGLE_DOCS_SCOPES: &str = concat!(
    "https://www.googleapis.com/auth/documents.readonly ",
    "https://www.googleapis.com/auth/drive.readonly",
);
const GMAIL_SCOPES: &str = concat!(
    "https://www.googleapis.com/auth/gmail.readonly ",
    "https://www.googleapis.com/auth/gmail.send ",
    "https://www.googleapis.com/auth/gmail.modify",
);

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// API-key authenticated data provider (FMP, Twelve Data, NewsData).
#[derive(Debug, Clone)]
pub struct KeyedApiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct OAuthClientConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub authorize_url: String,
    pub token_url: String,
    pub scopes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LinearConfig {
    pub api_key: Option<String>,
    pub api_url: String,
    pub oauth: OAuthClientConfig,
    pub webhook_secret: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NotionConfig {
    pub api_key: Option<String>,
    pub api_url: String,
    pub version: String,
    pub oauth: OAuthClientConfig,
}

#[derive(Debug, Clone)]
pub struct GoogleDocsConfig {
    pub access_token: Option<String>,
    pub docs_url: String,
    pub drive_url: String,
    pub oauth: OAuthClientConfig,
}

#[derive(Debug, Clone)]
pub struct GmailConfig {
    pub access_token: Option<String>,
    pub api_url: String,
    pub oauth: OAuthClientConfig,
}

#[derive(Debug, Clone)]
pub struct SlackConfig {
    pub api_url: String,
    pub oauth: OAuthClientConfig,
}

/// Internal platform API that receives activity events and standup replies.
#[derive(Debug, Clone)]
pub struct InternalApiConfig {
    pub activity_url: String,
    pub standup_url: String,
    pub api_key: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub twelvedata: KeyedApiConfig,
    pub fmp: KeyedApiConfig,
    pub newsdata: KeyedApiConfig,
    pub linear: LinearConfig,
    pub notion: NotionConfig,
    pub google_docs: GoogleDocsConfig,
    pub gmail: GmailConfig,
    pub slack: SlackConfig,
    pub internal_api: InternalApiConfig,
    /// Timeout for SaaS providers without a dedicated `_TIMEOUT_MS` variable.
    pub outbound_timeout: Duration,
}

impl Config {
    /// Load `.env` (if present) and read the process environment.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());
        let timeout = |key: &str| {
            let ms = get(key)
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|ms| *ms > 0)
                .unwrap_or(DEFAULT_TIMEOUT_MS);
            Duration::from_millis(ms)
        };

        let port = get("PORT")
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let notion_api = or("NOTION_API_URL", "https://api.notion.com/v1");
        let google_authorize = or(
            "GOOGLE_OAUTH_AUTHORIZE_URL",
            "https://accounts.google.com/o/oauth2/v2/auth",
        );
        let google_token = or(
            "GOOGLE_OAUTH_TOKEN_URL",
            "https://oauth2.googleapis.com/token",
        );
        let google_client_id = get("GOOGLE_OAUTH_CLIENT_ID");
        let google_client_secret = get("GOOGLE_OAUTH_CLIENT_SECRET");
        let slack_api = or("SLACK_API_URL", "https://slack.com/api");

        Self {
            server: ServerConfig {
                host: or("HOST", "0.0.0.0"),
                port,
            },
            twelvedata: KeyedApiConfig {
                api_key: get("TWELVEDATA_API_KEY"),
                base_url: or("TWELVEDATA_BASE_URL", "https://api.twelvedata.com"),
                timeout: timeout("TWELVEDATA_TIMEOUT_MS"),
            },
            fmp: KeyedApiConfig {
                api_key: get("FMP_API_KEY"),
                base_url: or("FMP_BASE_URL", "https://financialmodelingprep.com/stable"),
                timeout: timeout("FMP_TIMEOUT_MS"),
            },
            newsdata: KeyedApiConfig {
                api_key: get("NEWSDATA_API_KEY"),
                base_url: or("NEWSDATA_BASE_URL", "https://newsdata.io/api/1"),
                timeout: timeout("NEWSDATA_TIMEOUT_MS"),
            },
            linear: LinearConfig {
                api_key: get("LINEAR_API_KEY"),
                api_url: or("LINEAR_API_URL", "https://api.linear.app/graphql"),
                oauth: OAuthClientConfig {
                    client_id: get("LINEAR_OAUTH_CLIENT_ID"),
                    client_secret: get("LINEAR_OAUTH_CLIENT_SECRET"),
                    authorize_url: or(
                        "LINEAR_OAUTH_AUTHORIZE_URL",
                        "https://linear.app/oauth/authorize",
                    ),
                    token_url: or(
                        "LINEAR_OAUTH_TOKEN_URL",
                        "https://api.linear.app/oauth/token",
                    ),
                    scopes: get("LINEAR_OAUTH_SCOPES"),
                },
                webhook_secret: get("LINEAR_WEBHOOK_SIGNING_SECRET"),
            },
            notion: NotionConfig {
                api_key: get("NOTION_API_KEY"),
                version: or("NOTION_API_VERSION", "2022-06-28"),
                oauth: OAuthClientConfig {
                    client_id: get("NOTION_OAUTH_CLIENT_ID"),
                    client_secret: get("NOTION_OAUTH_CLIENT_SECRET"),
                    authorize_url: or(
                        "NOTION_OAUTH_AUTHORIZE_URL",
                        &format!("{notion_api}/oauth/authorize"),
                    ),
                    token_url: or(
                        "NOTION_OAUTH_TOKEN_URL",
                        &format!("{notion_api}/oauth/token"),
                    ),
                    scopes: None,
                },
                api_url: notion_api,
            },
            google_docs: GoogleDocsConfig {
                access_token: get("GOOGLE_DOCS_ACCESS_TOKEN"),
                docs_url: or("GOOGLE_DOCS_API_URL", "https://docs.googleapis.com/v1"),
                drive_url: or(
                    "GOOGLE_DRIVE_API_URL",
                    "https://www.googleapis.com/drive/v3",
                ),
                oauth: OAuthClientConfig {
                    client_id: google_client_id.clone(),
                    client_secret: google_client_secret.clone(),
                    authorize_url: google_authorize.clone(),
                    token_url: google_token.clone(),
                    scopes: Some(or("GOOGLE_OAUTH_SCOPES", GOOGLE_DOCS_SCOPES)),
                },
            },
            gmail: GmailConfig {
                access_token: get("GMAIL_ACCESS_TOKEN"),
                api_url: or(
                    "GMAIL_API_URL",
                    "https://gmail.googleapis.com/gmail/v1/users/me",
                ),
                oauth: OAuthClientConfig {
                    client_id: get("GMAIL_OAUTH_CLIENT_ID").or(google_client_id),
                    client_secret: get("GMAIL_OAUTH_CLIENT_SECRET").or(google_client_secret),
                    authorize_url: google_authorize,
                    token_url: google_token,
                    scopes: Some(or("GMAIL_OAUTH_SCOPES", GMAIL_SCOPES)),
                },
            },
            slack: SlackConfig {
                oauth: OAuthClientConfig {
                    client_id: get("SLACK_OAUTH_CLIENT_ID"),
                    client_secret: get("SLACK_OAUTH_CLIENT_SECRET"),
                    authorize_url: or(
                        "SLACK_OAUTH_AUTHORIZE_URL",
                        "https://slack.com/oauth/v2/authorize",
                    ),
                    token_url: format!("{slack_api}/oauth.v2.access"),
                    scopes: None,
                },
                api_url: slack_api,
            },
            internal_api: InternalApiConfig {
                activity_url: or("API_ACTIVITY_URL", "http://localhost:6000/api/activity"),
                standup_url: or(
                    "API_STANDUP_URL",
                    "http://localhost:6000/api/standups/responses",
                ),
                api_key: or("INTERNAL_API_KEY", "dev-internal-key"),
            },
            outbound_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}
