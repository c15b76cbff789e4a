mod common;

use common::{app, config_for, fake_providers, get, FakeMarket};
use integration_gateway::IntegrationGateway;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn market_app() -> (Arc<FakeMarket>, axum::Router) {
    let market = Arc::new(FakeMarket::with_quote(json!({ "symbol": "AAPL" })));
    let mut providers = fake_providers();
    providers.market = market.clone();
    (market, app(providers))
}

#[tokio::test]
async fn test_time_series_range_shortcut() {
    let (market, app) = market_app();

    let (status, _) = get(
        &app,
        "/integration/tools/market-prices/time-series?symbol=aapl&range=1W",
    )
    .await;
    assert_eq!(status, 200);
    let (status, _) = get(
        &app,
        "/integration/tools/market-prices/time-series?symbol=aapl&range=1D&interval=5min",
    )
    .await;
    assert_eq!(status, 200);

    assert_eq!(
        market.calls(),
        vec!["series:AAPL:1day:7", "series:AAPL:5min:24"]
    );
}

#[tokio::test]
async fn test_time_series_validation() {
    let (market, app) = market_app();

    let (status, body) = get(
        &app,
        "/integration/tools/market-prices/time-series?symbol=AAPL",
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["message"], json!("interval or range is required."));

    let (status, body) = get(
        &app,
        "/integration/tools/market-prices/time-series?symbol=AAPL&range=5Y",
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(
        body["message"],
        json!("range must be one of: 1D, 1W, 1M, 3M, 1Y, MAX.")
    );

    assert!(market.calls().is_empty());
}

#[tokio::test]
async fn test_list_endpoints_normalize_data() {
    let (_, app) = market_app();

    let (status, body) = get(&app, "/integration/tools/market-prices/list-crypto-pairs").await;
    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({ "success": true, "message": "Success", "data": [] })
    );

    let (_, body) = get(
        &app,
        "/integration/tools/market-prices/list-commodity-pairs",
    )
    .await;
    assert_eq!(body["data"][0]["symbol"], json!("XAU/USD"));
}

#[tokio::test]
async fn test_convert_currency_validation() {
    let (market, app) = market_app();

    let (status, body) = get(
        &app,
        "/integration/tools/market-prices/convert-currency?amount=10&from=usd&to=eur",
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["amount"], json!(20.0));

    let (status, body) = get(
        &app,
        "/integration/tools/market-prices/convert-currency?amount=-1&from=usd&to=eur",
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["message"], json!("amount must be a positive number."));

    let (status, body) = get(
        &app,
        "/integration/tools/market-prices/convert-currency?amount=5&from=usd",
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["message"], json!("to is required."));

    assert_eq!(market.calls(), vec!["convert:10:USD:EUR"]);
}

#[tokio::test]
async fn test_batch_and_rate_parameters() {
    let (market, app) = market_app();

    get(
        &app,
        "/integration/tools/market-prices/batch-quote?symbols=aapl,%20msft",
    )
    .await;
    get(
        &app,
        "/integration/tools/market-prices/exchange-rate?pair=eur/usd",
    )
    .await;
    get(
        &app,
        "/integration/tools/market-prices/earliest-timestamp?symbol=tsla&interval=1day",
    )
    .await;

    let (status, body) = get(
        &app,
        "/integration/tools/market-prices/batch-price?symbols=,",
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(
        body["message"],
        json!("symbols must include at least one symbol.")
    );

    assert_eq!(
        market.calls(),
        vec!["batch-quote:AAPL,MSFT", "rate:EUR/USD", "earliest:TSLA:1day"]
    );
}

#[tokio::test]
async fn test_twelve_data_error_status_in_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/quote"))
        .and(query_param("symbol", "NOPE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 400, "message": "**symbol** not found: NOPE", "status": "error"
        })))
        .mount(&server)
        .await;

    let gateway = IntegrationGateway::new(&config_for(&server.uri())).unwrap();
    let err = gateway.market_prices().quote("NOPE").await.unwrap_err();
    assert_eq!(err.status(), 400);
    assert_eq!(err.to_string(), "**symbol** not found: NOPE");
}

#[tokio::test]
async fn test_twelve_data_batch_forces_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/price"))
        .and(query_param("symbol", "AAPL,MSFT"))
        .and(query_param("format", "json"))
        .and(query_param("apikey", "td-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "AAPL": { "price": "187.1" }, "MSFT": { "price": "410.2" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = IntegrationGateway::new(&config_for(&server.uri())).unwrap();
    let symbols = vec!["AAPL".to_string(), "MSFT".to_string()];
    let prices = gateway
        .market_prices()
        .batch_price(&symbols, &Default::default())
        .await
        .unwrap();
    assert_eq!(prices["MSFT"]["price"], json!("410.2"));
}
