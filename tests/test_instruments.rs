mod common;

use common::{app, config_for, fake_providers, get, FakeMarket};
use integration_gateway::IntegrationGateway;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_search_ranks_and_dedups() {
    let mut providers = fake_providers();
    providers.market = Arc::new(FakeMarket::with_search(json!({
        "data": [
            {
                "symbol": "AAPL", "instrument_name": "Apple Inc", "exchange": "OTC",
                "instrument_type": "Common Stock"
            },
            {
                "symbol": "AAPL", "instrument_name": "Apple Inc", "exchange": "NASDAQ",
                "instrument_type": "Common Stock", "country": "United States", "currency": "USD"
            },
            {
                "symbol": "AAPL", "instrument_name": "Apple Inc", "exchange": "LSE",
                "instrument_type": "Common Stock", "country": "United Kingdom"
            },
            {
                "symbol": "APLE", "instrument_name": "Apple Hospitality 2x", "exchange": "NYSE",
                "instrument_type": "Common Stock", "country": "United States"
            }
        ]
    })));
    let app = app(providers);

    let (status, body) = get(&app, "/integration/instruments/search?query=apple").await;

    assert_eq!(status, 200);
    assert_eq!(body["success"], json!(true));
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["symbol"], json!("AAPL"));
    assert_eq!(data[0]["exchange"], json!("NASDAQ"));
    assert_eq!(data[0]["assetType"], json!("STOCK"));
    assert_eq!(data[1]["symbol"], json!("APLE"));
}

#[tokio::test]
async fn test_search_requires_query() {
    let app = app(fake_providers());
    let (status, body) = get(&app, "/integration/instruments/search?query=").await;
    assert_eq!(status, 400);
    assert_eq!(body["success"], json!(false));
    assert_eq!(
        body["message"],
        json!("Query parameter \"query\" is required")
    );
}

#[tokio::test]
async fn test_whitespace_query_is_forwarded() {
    let market = Arc::new(FakeMarket::with_search(json!({ "data": [] })));
    let mut providers = fake_providers();
    providers.market = market.clone();
    let app = app(providers);

    let (status, body) = get(&app, "/integration/instruments/search?query=%20").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"], json!([]));
    assert_eq!(market.calls(), vec!["search: ".to_string()]);
}

#[tokio::test]
async fn test_resolve_uses_quote() {
    let mut providers = fake_providers();
    providers.market = Arc::new(FakeMarket::with_quote(json!({
        "symbol": "BTC/USD", "name": "Bitcoin US Dollar", "exchange": "Coinbase Pro",
        "type": "Digital Currency", "close": "64000.5"
    })));
    let app = app(providers);

    let (status, body) = get(&app, "/integration/instruments/resolve?symbol=BTC/USD").await;

    assert_eq!(status, 200);
    assert_eq!(body["data"]["symbol"], json!("BTC/USD"));
    assert_eq!(body["data"]["assetType"], json!("CRYPTO"));
    assert_eq!(body["data"]["latestPrice"], json!(64000.5));
}

#[tokio::test]
async fn test_resolve_unknown_symbol_is_404() {
    let mut providers = fake_providers();
    let missing = json!({ "code": 404, "message": "not found" });
    providers.market = Arc::new(FakeMarket::with_quote(missing));
    let app = app(providers);

    let (status, body) = get(&app, "/integration/instruments/resolve?symbol=ZZZZ").await;
    assert_eq!(status, 404);
    assert_eq!(body["message"], json!("Instrument not found"));
}

#[tokio::test]
async fn test_search_against_twelve_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/symbol_search"))
        .and(query_param("symbol", "spy"))
        .and(query_param("apikey", "td-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {
                    "symbol": "SPY", "instrument_name": "SPDR S&P 500 ETF Trust",
                    "exchange": "NYSE ARCA", "instrument_type": "ETF", "country": "United States"
                },
                {
                    "symbol": "SPY", "instrument_name": "SPDR S&P 500 ETF Trust",
                    "exchange": "BMV", "instrument_type": "ETF", "country": "Mexico"
                }
            ],
            "status": "ok"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = IntegrationGateway::new(&config_for(&server.uri())).unwrap();
    let results = gateway
        .instruments()
        .search("spy", Some("etf"))
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].exchange, "NYSE ARCA");
}

#[tokio::test]
async fn test_search_provider_failure_is_masked() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/symbol_search"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let gateway = IntegrationGateway::new(&config_for(&server.uri())).unwrap();
    let err = gateway.instruments().search("spy", None).await.unwrap_err();

    assert_eq!(err.status(), 502);
    assert_eq!(err.to_string(), "Failed to search instruments");
}
