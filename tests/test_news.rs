mod common;

use common::{app, config_for, fake_providers, get, FakeNews};
use integration_gateway::application::news::NewsQuery;
use integration_gateway::domain::error::{DomainError, ProviderRejection};
use integration_gateway::domain::ports::news::NewsEndpoint;
use integration_gateway::IntegrationGateway;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
    raw.iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn unsupported_filter() -> DomainError {
    DomainError::Rejected(ProviderRejection {
        message: "Symbol filter not available on your plan".to_string(),
        code: Some("UnsupportedFilter".to_string()),
        status: 422,
        invalid_ticker: None,
    })
}

#[tokio::test]
async fn test_market_news_retries_without_symbol() {
    let news = Arc::new(FakeNews::answering(vec![
        Err(unsupported_filter()),
        Ok(json!({
            "status": "success", "totalResults": 1,
            "results": [{ "title": "Apple earnings" }], "nextPage": "p2"
        })),
    ]));
    let mut providers = fake_providers();
    providers.news = news.clone();
    let app = app(providers);

    let (status, body) = get(&app, "/integration/tools/news/market?symbol=aapl&size=5").await;

    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({
            "success": true, "message": "Success", "totalResults": 1,
            "nextPage": "p2", "data": [{ "title": "Apple earnings" }]
        })
    );
    let calls = news.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(
        calls[0],
        (NewsEndpoint::Market, pairs(&[("symbol", "AAPL"), ("size", "5")]))
    );
    assert_eq!(
        calls[1],
        (NewsEndpoint::Market, pairs(&[("size", "5"), ("q", "AAPL")]))
    );
}

#[tokio::test]
async fn test_retry_keeps_existing_search_text() {
    let news = Arc::new(FakeNews::answering(vec![Err(unsupported_filter())]));
    let mut providers = fake_providers();
    providers.news = news.clone();
    let gateway = IntegrationGateway::with_providers(providers);

    let query = NewsQuery {
        q: Some("halving".into()),
        symbol: Some("btc".into()),
        ..Default::default()
    };
    gateway
        .news()
        .fetch(NewsEndpoint::Crypto, &query)
        .await
        .unwrap();

    let calls = news.calls();
    assert_eq!(calls[1].1, pairs(&[("q", "halving")]));
}

#[tokio::test]
async fn test_other_rejections_are_not_retried() {
    let news = Arc::new(FakeNews::answering(vec![Err(DomainError::Rejected(ProviderRejection {
        message: "API key invalid".to_string(),
        code: Some("Unauthorized".to_string()),
        status: 401,
        invalid_ticker: None,
    }))]));
    let mut providers = fake_providers();
    providers.news = news.clone();
    let app = app(providers);

    let (status, body) = get(&app, "/integration/tools/news/market?symbol=AAPL").await;
    assert_eq!(status, 400);
    assert_eq!(body["message"], json!("API key invalid"));
    assert_eq!(news.calls().len(), 1);
}

#[tokio::test]
async fn test_latest_news_is_never_retried() {
    let news = Arc::new(FakeNews::answering(vec![Err(unsupported_filter())]));
    let mut providers = fake_providers();
    providers.news = news.clone();
    let app = app(providers);

    let (status, _) = get(&app, "/integration/tools/news/latest?q=fed").await;
    assert_eq!(status, 400);
    assert_eq!(news.calls().len(), 1);
}

#[tokio::test]
async fn test_invalid_symbol_list_is_rejected_locally() {
    let news = Arc::new(FakeNews::default());
    let mut providers = fake_providers();
    providers.news = news.clone();
    let app = app(providers);

    let (status, body) = get(&app, "/integration/tools/news/market?symbol=%24%24%24").await;
    assert_eq!(status, 400);
    assert_eq!(
        body["message"],
        json!("symbol must contain a valid ticker format.")
    );
    assert!(news.calls().is_empty());
}

#[tokio::test]
async fn test_newsdata_fallback_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/1/market"))
        .and(query_param("symbol", "TSLA"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "status": "error",
            "results": { "message": "The symbol paramter is invalid.", "code": "UnsupportedFilter" }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/1/market"))
        .and(query_param_is_missing("symbol"))
        .and(query_param("q", "TSLA"))
        .and(query_param("apikey", "nd-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success", "totalResults": "3", "results": [{}, {}, {}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = IntegrationGateway::new(&config_for(&server.uri())).unwrap();
    let query = NewsQuery { symbol: Some("tsla".into()), ..Default::default() };
    let page = gateway
        .news()
        .fetch(NewsEndpoint::Market, &query)
        .await
        .unwrap();

    assert_eq!(page["totalResults"], json!(3));
    assert_eq!(page["nextPage"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_newsdata_non_json_answer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/1/sources"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html>login</html>", "text/html"))
        .mount(&server)
        .await;

    let gateway = IntegrationGateway::new(&config_for(&server.uri())).unwrap();
    let err = gateway
        .news()
        .fetch(NewsEndpoint::Sources, &NewsQuery::default())
        .await
        .unwrap_err();
    assert_eq!(err.status(), 502);
    assert_eq!(
        err.to_string(),
        "NewsData returned a non-JSON response. Check NEWSDATA_API_KEY and endpoint access."
    );
}

#[tokio::test]
async fn test_newsdata_redirect_is_reported() {
    let server = MockServer::start().await;
    let redirect =
        ResponseTemplate::new(302).insert_header("location", "https://newsdata.io/login");
    Mock::given(method("GET"))
        .and(path("/api/1/latest"))
        .respond_with(redirect)
        .expect(1)
        .mount(&server)
        .await;

    let gateway = IntegrationGateway::new(&config_for(&server.uri())).unwrap();
    let err = gateway
        .news()
        .fetch(NewsEndpoint::Latest, &NewsQuery::default())
        .await
        .unwrap_err();
    assert_eq!(err.status(), 502);
    assert_eq!(
        err.to_string(),
        "NewsData redirected (302). Location: https://newsdata.io/login."
    );
}

#[tokio::test]
async fn test_error_status_in_success_body_triggers_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/1/crypto"))
        .and(query_param("symbol", "BTC"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error",
            "message": "The symbol parameter is invalid"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/1/crypto"))
        .and(query_param_is_missing("symbol"))
        .and(query_param("q", "BTC"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success", "totalResults": 1, "results": [{}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = IntegrationGateway::new(&config_for(&server.uri())).unwrap();
    let query = NewsQuery { symbol: Some("btc".into()), ..Default::default() };
    let page = gateway
        .news()
        .fetch(NewsEndpoint::Crypto, &query)
        .await
        .unwrap();
    assert_eq!(page["totalResults"], json!(1));
}
