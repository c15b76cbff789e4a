pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod http;
pub mod infrastructure;

use crate::application::communication::CommunicationUseCase;
use crate::application::document_sources::DocumentSourcesUseCase;
use crate::application::instruments::InstrumentsUseCase;
use crate::application::market_data::MarketDataUseCase;
use crate::application::market_prices::MarketPricesUseCase;
use crate::application::news::NewsUseCase;
use crate::application::oauth::OAuthUseCase;
use crate::application::project_manager::ProjectManagerUseCase;
use crate::application::webhooks::WebhooksUseCase;
use crate::config::Config;
use crate::domain::error::DomainError;
use crate::domain::ports::activity_sink::ActivitySink;
use crate::domain::ports::communication::CommunicationProvider;
use crate::domain::ports::document_source::DocumentSourceProvider;
use crate::domain::ports::fundamentals::FundamentalsSource;
use crate::domain::ports::market_data::MarketDataSource;
use crate::domain::ports::news::NewsSource;
use crate::domain::ports::oauth::OAuthProvider;
use crate::domain::ports::project_manager::{ProjectManagerProvider, WebhookNotifier};
use crate::domain::values::provider_kind::OAuthProviderKind;
use crate::infrastructure::internal_api::InternalApiClient;
use crate::infrastructure::market::fmp::FmpClient;
use crate::infrastructure::market::newsdata::NewsDataClient;
use crate::infrastructure::market::twelvedata::TwelveDataClient;
use crate::infrastructure::oauth::OAuthClient;
use crate::infrastructure::saas::gmail::GmailClient;
use crate::infrastructure::saas::google_docs::GoogleDocsClient;
use crate::infrastructure::saas::linear::LinearClient;
use crate::infrastructure::saas::notion::NotionClient;
use crate::infrastructure::saas::slack::SlackWebhookClient;
use std::collections::HashMap;
use std::sync::Arc;

/// Every outbound dependency the gateway talks to.
pub struct Providers {
    pub market: Arc<dyn MarketDataSource>,
    pub fundamentals: Arc<dyn FundamentalsSource>,
    pub news: Arc<dyn NewsSource>,
    pub project_manager: Arc<dyn ProjectManagerProvider>,
    pub notifier: Arc<dyn WebhookNotifier>,
    pub notion: Arc<dyn DocumentSourceProvider>,
    pub google_docs: Arc<dyn DocumentSourceProvider>,
    pub mail: Arc<dyn CommunicationProvider>,
    pub oauth: HashMap<OAuthProviderKind, Arc<dyn OAuthProvider>>,
    pub activity: Arc<dyn ActivitySink>,
    pub linear_webhook_secret: Option<String>,
}

impl Providers {
    /// Real HTTP clients built from configuration.
    pub fn from_config(config: &Config) -> Result<Self, DomainError> {
        let timeout = config.outbound_timeout;

        let oauth_clients = [
            (OAuthProviderKind::Linear, &config.linear.oauth),
            (OAuthProviderKind::Notion, &config.notion.oauth),
            (OAuthProviderKind::GoogleDocs, &config.google_docs.oauth),
            (OAuthProviderKind::Gmail, &config.gmail.oauth),
            (OAuthProviderKind::Slack, &config.slack.oauth),
        ];
        let mut oauth = HashMap::new();
        for (kind, oauth_config) in oauth_clients {
            let client = OAuthClient::new(kind, oauth_config, timeout)?;
            oauth.insert(kind, Arc::new(client) as Arc<dyn OAuthProvider>);
        }

        Ok(Self {
            market: Arc::new(TwelveDataClient::new(&config.twelvedata)?),
            fundamentals: Arc::new(FmpClient::new(&config.fmp)?),
            news: Arc::new(NewsDataClient::new(&config.newsdata)?),
            project_manager: Arc::new(LinearClient::new(&config.linear, timeout)?),
            notifier: Arc::new(SlackWebhookClient::new(timeout)?),
            notion: Arc::new(NotionClient::new(&config.notion, timeout)?),
            google_docs: Arc::new(GoogleDocsClient::new(&config.google_docs, timeout)?),
            mail: Arc::new(GmailClient::new(&config.gmail, timeout)?),
            oauth,
            activity: Arc::new(InternalApiClient::new(&config.internal_api, timeout)?),
            linear_webhook_secret: config.linear.webhook_secret.clone(),
        })
    }
}

/// Use cases wired to their providers, one per REST area.
pub struct IntegrationGateway {
    instruments: InstrumentsUseCase,
    market_data: MarketDataUseCase,
    market_prices: MarketPricesUseCase,
    news: NewsUseCase,
    project_manager: ProjectManagerUseCase,
    document_sources: DocumentSourcesUseCase,
    communication: CommunicationUseCase,
    oauth: OAuthUseCase,
    webhooks: WebhooksUseCase,
}

impl IntegrationGateway {
    pub fn new(config: &Config) -> Result<Self, DomainError> {
        Ok(Self::with_providers(Providers::from_config(config)?))
    }

    pub fn with_providers(providers: Providers) -> Self {
        Self {
            instruments: InstrumentsUseCase::new(providers.market.clone()),
            market_data: MarketDataUseCase::new(providers.market.clone(), providers.fundamentals),
            market_prices: MarketPricesUseCase::new(providers.market),
            news: NewsUseCase::new(providers.news),
            project_manager: ProjectManagerUseCase::new(
                providers.project_manager,
                providers.notifier,
            ),
            document_sources: DocumentSourcesUseCase::new(providers.notion, providers.google_docs),
            communication: CommunicationUseCase::new(providers.mail),
            oauth: OAuthUseCase::new(providers.oauth),
            webhooks: WebhooksUseCase::new(providers.activity, providers.linear_webhook_secret),
        }
    }

    pub fn instruments(&self) -> &InstrumentsUseCase {
        &self.instruments
    }

    pub fn market_data(&self) -> &MarketDataUseCase {
        &self.market_data
    }

    pub fn market_prices(&self) -> &MarketPricesUseCase {
        &self.market_prices
    }

    pub fn news(&self) -> &NewsUseCase {
        &self.news
    }

    pub fn project_manager(&self) -> &ProjectManagerUseCase {
        &self.project_manager
    }

    pub fn document_sources(&self) -> &DocumentSourcesUseCase {
        &self.document_sources
    }

    pub fn communication(&self) -> &CommunicationUseCase {
        &self.communication
    }

    pub fn oauth(&self) -> &OAuthUseCase {
        &self.oauth
    }

    pub fn webhooks(&self) -> &WebhooksUseCase {
        &self.webhooks
    }
}
