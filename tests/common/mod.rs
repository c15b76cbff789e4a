//! Shared test helpers: fake providers, configuration and HTTP plumbing.
#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use integration_gateway::config::Config;
use integration_gateway::domain::entities::activity::{ActivityEvent, StandupResponse};
use integration_gateway::domain::entities::document::{
    DocumentPayload, DocumentSearchItem, SourceHealth,
};
use integration_gateway::domain::entities::email::{EmailMessage, EmailThread, OutgoingEmail};
use integration_gateway::domain::entities::market::TimeSeriesRequest;
use integration_gateway::domain::entities::project::{IssueFilter, ProjectFilter};
use integration_gateway::domain::error::DomainError;
use integration_gateway::domain::ports::activity_sink::ActivitySink;
use integration_gateway::domain::ports::communication::CommunicationProvider;
use integration_gateway::domain::ports::document_source::DocumentSourceProvider;
use integration_gateway::domain::ports::fundamentals::FundamentalsSource;
use integration_gateway::domain::ports::market_data::MarketDataSource;
use integration_gateway::domain::ports::news::{NewsEndpoint, NewsSource};
use integration_gateway::domain::ports::project_manager::{ProjectManagerProvider, WebhookNotifier};
use integration_gateway::domain::values::provider_kind::DocumentSourceKind;
use integration_gateway::domain::values::query_params::QueryParams;
use integration_gateway::domain::values::statement_period::StatementPeriod;
use integration_gateway::{http, IntegrationGateway, Providers};
use serde_json::{json, Map, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

/// Configuration whose every provider points at `base` with a test key.
pub fn config_for(base: &str) -> Config {
    let pairs: HashMap<&str, String> = [
        ("TWELVEDATA_API_KEY", "td-key".to_string()),
        ("TWELVEDATA_BASE_URL", base.to_string()),
        ("FMP_API_KEY", "fmp-key".to_string()),
        ("FMP_BASE_URL", base.to_string()),
        ("NEWSDATA_API_KEY", "nd-key".to_string()),
        ("NEWSDATA_BASE_URL", base.to_string()),
        ("LINEAR_API_KEY", "lin-key".to_string()),
        ("LINEAR_API_URL", format!("{base}/graphql")),
        ("LINEAR_OAUTH_CLIENT_ID", "lin-client".to_string()),
        ("LINEAR_OAUTH_CLIENT_SECRET", "lin-secret".to_string()),
        ("LINEAR_OAUTH_TOKEN_URL", format!("{base}/linear/token")),
        ("NOTION_API_KEY", "notion-key".to_string()),
        ("NOTION_API_URL", base.to_string()),
        ("NOTION_OAUTH_CLIENT_ID", "notion-client".to_string()),
        ("NOTION_OAUTH_CLIENT_SECRET", "notion-secret".to_string()),
        ("GOOGLE_DOCS_ACCESS_TOKEN", "gdocs-token".to_string()),
        ("GOOGLE_DOCS_API_URL", base.to_string()),
        ("GOOGLE_DRIVE_API_URL", base.to_string()),
        ("GOOGLE_OAUTH_CLIENT_ID", "google-client".to_string()),
        ("GOOGLE_OAUTH_CLIENT_SECRET", "google-secret".to_string()),
        ("GOOGLE_OAUTH_TOKEN_URL", format!("{base}/google/token")),
        ("GMAIL_ACCESS_TOKEN", "gmail-token".to_string()),
        ("GMAIL_API_URL", base.to_string()),
        ("SLACK_API_URL", base.to_string()),
        ("SLACK_OAUTH_CLIENT_ID", "slack-client".to_string()),
        ("SLACK_OAUTH_CLIENT_SECRET", "slack-secret".to_string()),
        ("API_ACTIVITY_URL", format!("{base}/api/activity")),
        ("API_STANDUP_URL", format!("{base}/api/standups/responses")),
        ("INTERNAL_API_KEY", "internal-key".to_string()),
    ]
    .into_iter()
    .collect();
    Config::from_lookup(|key| pairs.get(key).cloned())
}

/// Configuration with nothing set.
pub fn empty_config() -> Config {
    Config::from_lookup(|_| None)
}

// --- market data ---

pub struct FakeMarket {
    pub search: Value,
    pub quote: Value,
    pub calls: Mutex<Vec<String>>,
}

impl FakeMarket {
    pub fn with_search(search: Value) -> Self {
        Self {
            search,
            quote: json!({}),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_quote(quote: Value) -> Self {
        Self {
            search: json!({ "data": [] }),
            quote,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MarketDataSource for FakeMarket {
    async fn search_symbols(
        &self,
        query: &str,
        _: Option<&str>,
        _: Option<&str>,
    ) -> Result<Value, DomainError> {
        self.record(format!("search:{query}"));
        Ok(self.search.clone())
    }
    async fn list_stocks(&self, exchange: Option<&str>) -> Result<Value, DomainError> {
        self.record(format!("stocks:{}", exchange.unwrap_or_default()));
        Ok(json!({ "data": [{ "symbol": "AAPL" }] }))
    }
    async fn list_crypto_pairs(&self) -> Result<Value, DomainError> {
        Ok(json!({ "data": "unavailable" }))
    }
    async fn list_commodity_pairs(&self) -> Result<Value, DomainError> {
        Ok(json!({ "data": [{ "symbol": "XAU/USD" }] }))
    }
    async fn live_price(&self, symbol: &str) -> Result<Value, DomainError> {
        self.record(format!("price:{symbol}"));
        Ok(json!({ "price": "187.50" }))
    }
    async fn quote(&self, symbol: &str) -> Result<Value, DomainError> {
        self.record(format!("quote:{symbol}"));
        Ok(self.quote.clone())
    }
    async fn time_series(&self, request: &TimeSeriesRequest) -> Result<Value, DomainError> {
        let size = request.outputsize.map(|n| n.to_string());
        self.record(format!(
            "series:{}:{}:{}",
            request.symbol,
            request.interval,
            size.unwrap_or_default()
        ));
        Ok(json!({ "meta": { "symbol": request.symbol }, "values": [] }))
    }
    async fn earliest_timestamp(&self, symbol: &str, interval: &str) -> Result<Value, DomainError> {
        self.record(format!("earliest:{symbol}:{interval}"));
        Ok(json!({ "datetime": "1980-12-12" }))
    }
    async fn batch_price(&self, symbols: &[String], _: &QueryParams) -> Result<Value, DomainError> {
        self.record(format!("batch-price:{}", symbols.join(",")));
        Ok(json!({}))
    }
    async fn batch_quote(&self, symbols: &[String], _: &QueryParams) -> Result<Value, DomainError> {
        self.record(format!("batch-quote:{}", symbols.join(",")));
        Ok(json!({}))
    }
    async fn exchange_rate(&self, pair: &str) -> Result<Value, DomainError> {
        self.record(format!("rate:{pair}"));
        Ok(json!({ "symbol": pair, "rate": 1.08 }))
    }
    async fn convert_currency(
        &self,
        amount: f64,
        from: &str,
        to: &str,
    ) -> Result<Value, DomainError> {
        self.record(format!("convert:{amount}:{from}:{to}"));
        Ok(json!({ "amount": amount * 2.0 }))
    }
}

pub struct FakeFundamentals {
    pub income: Value,
    pub calendar: Value,
    pub fail_balance_sheet: bool,
    pub periods: Mutex<Vec<Option<StatementPeriod>>>,
}

impl Default for FakeFundamentals {
    fn default() -> Self {
        Self {
            income: json!([]),
            calendar: json!([]),
            fail_balance_sheet: false,
            periods: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl FundamentalsSource for FakeFundamentals {
    async fn profile(&self, symbol: &str) -> Result<Value, DomainError> {
        Ok(json!([{ "symbol": symbol, "companyName": "Apple Inc." }]))
    }
    async fn income_statement(
        &self,
        _: &str,
        period: Option<StatementPeriod>,
    ) -> Result<Value, DomainError> {
        self.periods.lock().unwrap().push(period);
        Ok(self.income.clone())
    }
    async fn balance_sheet(&self, _: &str) -> Result<Value, DomainError> {
        if self.fail_balance_sheet {
            return Err(DomainError::Upstream {
                status: 429,
                message: "FMP rate limit".into(),
            });
        }
        Ok(json!([{ "totalAssets": 1 }]))
    }
    async fn cash_flow(&self, _: &str) -> Result<Value, DomainError> {
        Ok(json!([{ "freeCashFlow": 2 }]))
    }
    async fn financial_growth(&self, _: &str) -> Result<Value, DomainError> {
        Ok(json!([{ "revenueGrowth": 0.1 }]))
    }
    async fn earnings(&self, symbol: &str) -> Result<Value, DomainError> {
        Ok(json!([{ "symbol": symbol, "epsActual": 1.5 }]))
    }
    async fn earnings_calendar(&self) -> Result<Value, DomainError> {
        Ok(self.calendar.clone())
    }
    async fn analyst_estimates(
        &self,
        symbol: &str,
        period: StatementPeriod,
        page: u32,
        limit: u32,
    ) -> Result<Value, DomainError> {
        Ok(json!({ "symbol": symbol, "period": period.as_str(), "page": page, "limit": limit }))
    }
}

// --- news ---

/// Answers queued results in order and records the parameters it saw.
#[derive(Default)]
pub struct FakeNews {
    pub answers: Mutex<VecDeque<Result<Value, DomainError>>>,
    pub calls: Mutex<Vec<(NewsEndpoint, Vec<(String, String)>)>>,
}

impl FakeNews {
    pub fn answering(answers: Vec<Result<Value, DomainError>>) -> Self {
        Self {
            answers: Mutex::new(answers.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(NewsEndpoint, Vec<(String, String)>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl NewsSource for FakeNews {
    async fn fetch(
        &self,
        endpoint: NewsEndpoint,
        params: &QueryParams,
    ) -> Result<Value, DomainError> {
        let seen = params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.calls.lock().unwrap().push((endpoint, seen));
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(json!({ "status": "success", "results": [] })))
    }
}

// --- project management ---

#[derive(Default)]
pub struct FakeLinear {
    pub issues: Value,
    pub tokens: Mutex<Vec<Option<String>>>,
    pub filters: Mutex<Vec<IssueFilter>>,
}

impl FakeLinear {
    pub fn with_issues(nodes: Value) -> Self {
        Self {
            issues: json!({ "issues": { "nodes": nodes } }),
            ..Default::default()
        }
    }

    fn seen(&self, token: Option<&str>) {
        self.tokens.lock().unwrap().push(token.map(str::to_string));
    }
}

#[async_trait]
impl ProjectManagerProvider for FakeLinear {
    async fn viewer(&self, token: Option<&str>) -> Result<Value, DomainError> {
        self.seen(token);
        Ok(json!({ "viewer": { "id": "u1", "name": "Ada" } }))
    }
    async fn list_teams(
        &self,
        token: Option<&str>,
        first: Option<u32>,
    ) -> Result<Value, DomainError> {
        self.seen(token);
        Ok(json!({ "teams": { "nodes": [], "first": first } }))
    }
    async fn list_users(
        &self,
        token: Option<&str>,
        _: Option<u32>,
        _: Option<&str>,
        _: Option<&str>,
    ) -> Result<Value, DomainError> {
        self.seen(token);
        Ok(json!({ "users": { "nodes": [] } }))
    }
    async fn list_projects(
        &self,
        token: Option<&str>,
        filter: &ProjectFilter,
    ) -> Result<Value, DomainError> {
        self.seen(token);
        Ok(json!({ "projects": { "nodes": [], "teamId": filter.team_id } }))
    }
    async fn get_project(&self, token: Option<&str>, id: &str) -> Result<Value, DomainError> {
        self.seen(token);
        Ok(json!({ "project": { "id": id } }))
    }
    async fn create_project(
        &self,
        token: Option<&str>,
        input: &Map<String, Value>,
    ) -> Result<Value, DomainError> {
        self.seen(token);
        Ok(json!({ "projectCreate": { "success": true, "project": input } }))
    }
    async fn update_project(
        &self,
        token: Option<&str>,
        id: &str,
        input: &Map<String, Value>,
    ) -> Result<Value, DomainError> {
        self.seen(token);
        Ok(json!({ "projectUpdate": { "id": id, "input": input } }))
    }
    async fn list_issues(
        &self,
        token: Option<&str>,
        filter: &IssueFilter,
    ) -> Result<Value, DomainError> {
        self.seen(token);
        self.filters.lock().unwrap().push(filter.clone());
        Ok(self.issues.clone())
    }
    async fn get_issue(&self, token: Option<&str>, id: &str) -> Result<Value, DomainError> {
        self.seen(token);
        Ok(json!({ "issue": { "id": id } }))
    }
    async fn create_issue(
        &self,
        token: Option<&str>,
        input: &Map<String, Value>,
    ) -> Result<Value, DomainError> {
        self.seen(token);
        Ok(json!({ "issueCreate": { "issue": input } }))
    }
    async fn update_issue(
        &self,
        token: Option<&str>,
        id: &str,
        input: &Map<String, Value>,
    ) -> Result<Value, DomainError> {
        self.seen(token);
        Ok(json!({ "issueUpdate": { "id": id, "input": input } }))
    }
    async fn create_comment(
        &self,
        token: Option<&str>,
        issue_id: &str,
        body: &str,
    ) -> Result<Value, DomainError> {
        self.seen(token);
        Ok(json!({ "commentCreate": { "issueId": issue_id, "body": body } }))
    }
    async fn list_cycles(
        &self,
        token: Option<&str>,
        team_id: &str,
        first: Option<u32>,
    ) -> Result<Value, DomainError> {
        self.seen(token);
        Ok(json!({ "team": { "id": team_id, "first": first } }))
    }
    async fn raw_query(
        &self,
        token: Option<&str>,
        query: &str,
        variables: Option<Value>,
    ) -> Result<Value, DomainError> {
        self.seen(token);
        Ok(json!({ "query": query, "variables": variables }))
    }
}

pub struct RecordingNotifier {
    pub status: u16,
    pub posts: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn answering(status: u16) -> Self {
        Self {
            status,
            posts: Mutex::new(Vec::new()),
        }
    }

    pub fn posts(&self) -> Vec<(String, String)> {
        self.posts.lock().unwrap().clone()
    }
}

#[async_trait]
impl WebhookNotifier for RecordingNotifier {
    async fn post_webhook(&self, url: &str, text: &str) -> Result<u16, DomainError> {
        self.posts
            .lock()
            .unwrap()
            .push((url.to_string(), text.to_string()));
        Ok(self.status)
    }
}

// --- documents and mail ---

pub struct FakeDocuments {
    pub kind: DocumentSourceKind,
}

#[async_trait]
impl DocumentSourceProvider for FakeDocuments {
    async fn fetch(&self, source: &str, _: Option<&str>) -> Result<DocumentPayload, DomainError> {
        Ok(DocumentPayload {
            source_type: self.kind,
            source_id: source.to_string(),
            title: format!("Doc {source}"),
            text: "hello".to_string(),
        })
    }
    fn health(&self, token: Option<&str>) -> SourceHealth {
        SourceHealth::check(&self.kind.to_string(), token.is_some(), "token is missing")
    }
    async fn search(
        &self,
        query: &str,
        _: Option<&str>,
        limit: Option<i64>,
    ) -> Result<Vec<DocumentSearchItem>, DomainError> {
        Ok(vec![DocumentSearchItem {
            id: format!("{query}-{}", limit.unwrap_or_default()),
            name: query.to_string(),
            web_view_link: None,
            modified_time: None,
        }])
    }
}

#[derive(Default)]
pub struct FakeMail {
    pub sent: Mutex<Vec<OutgoingEmail>>,
    pub max_results: Mutex<Vec<u32>>,
}

fn message(id: &str) -> EmailMessage {
    EmailMessage {
        id: json!(id),
        thread_id: json!("t1"),
        label_ids: vec!["INBOX".to_string()],
        snippet: String::new(),
        from: "a@example.com".to_string(),
        to: "b@example.com".to_string(),
        subject: "Hi".to_string(),
        date: String::new(),
        body: "Hello".to_string(),
        internal_date: Value::Null,
    }
}

#[async_trait]
impl CommunicationProvider for FakeMail {
    async fn list_threads(
        &self,
        _: Option<&str>,
        _: Option<&str>,
        max_results: u32,
    ) -> Result<Value, DomainError> {
        self.max_results.lock().unwrap().push(max_results);
        Ok(json!({ "threads": [] }))
    }
    async fn get_thread(&self, _: Option<&str>, id: &str) -> Result<EmailThread, DomainError> {
        Ok(EmailThread {
            id: json!(id),
            history_id: json!("1"),
            messages: vec![message("m1")],
        })
    }
    async fn search_messages(
        &self,
        _: Option<&str>,
        _: &str,
        max_results: u32,
    ) -> Result<Value, DomainError> {
        self.max_results.lock().unwrap().push(max_results);
        Ok(json!({ "messages": [] }))
    }
    async fn get_message(&self, _: Option<&str>, id: &str) -> Result<EmailMessage, DomainError> {
        Ok(message(id))
    }
    async fn send_message(
        &self,
        _: Option<&str>,
        email: &OutgoingEmail,
    ) -> Result<Value, DomainError> {
        self.sent.lock().unwrap().push(email.clone());
        Ok(json!({ "id": "sent-1" }))
    }
}

// --- activity sink ---

#[derive(Default)]
pub struct RecordingSink {
    pub fail: bool,
    pub activities: Mutex<Vec<ActivityEvent>>,
    pub standups: Mutex<Vec<StandupResponse>>,
}

impl RecordingSink {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn activities(&self) -> Vec<ActivityEvent> {
        self.activities.lock().unwrap().clone()
    }

    pub fn standups(&self) -> Vec<StandupResponse> {
        self.standups.lock().unwrap().clone()
    }
}

#[async_trait]
impl ActivitySink for RecordingSink {
    async fn forward_activity(&self, event: &ActivityEvent) -> Result<(), DomainError> {
        self.activities.lock().unwrap().push(event.clone());
        if self.fail {
            return Err(DomainError::Gateway("Internal API request failed.".into()));
        }
        Ok(())
    }
    async fn forward_standup(&self, response: &StandupResponse) -> Result<(), DomainError> {
        self.standups.lock().unwrap().push(response.clone());
        if self.fail {
            return Err(DomainError::Gateway("Internal API request failed.".into()));
        }
        Ok(())
    }
}

/// Fakes for every port; tests swap in the ones they inspect.
pub fn fake_providers() -> Providers {
    Providers {
        market: Arc::new(FakeMarket::with_search(json!({ "data": [] }))),
        fundamentals: Arc::new(FakeFundamentals::default()),
        news: Arc::new(FakeNews::default()),
        project_manager: Arc::new(FakeLinear::default()),
        notifier: Arc::new(RecordingNotifier::answering(200)),
        notion: Arc::new(FakeDocuments {
            kind: DocumentSourceKind::Notion,
        }),
        google_docs: Arc::new(FakeDocuments {
            kind: DocumentSourceKind::GoogleDocs,
        }),
        mail: Arc::new(FakeMail::default()),
        oauth: HashMap::new(),
        activity: Arc::new(RecordingSink::default()),
        linear_webhook_secret: None,
    }
}

pub fn app(providers: Providers) -> Router {
    http::router(Arc::new(IntegrationGateway::with_providers(providers)))
}

/// Send a request through the router and decode the JSON answer.
pub async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    headers: &[(&str, &str)],
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, value)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    call(app, Method::GET, uri, None, &[]).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    call(app, Method::POST, uri, Some(body), &[]).await
}

/// POST a raw body with an explicit content type.
pub async fn post_raw(
    app: &Router,
    uri: &str,
    content_type: &str,
    body: &str,
    headers: &[(&str, &str)],
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", content_type);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let response = app
        .clone()
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}
