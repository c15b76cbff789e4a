use crate::domain::entities::instrument::{Instrument, ResolvedInstrument, SymbolMatch};
use crate::domain::error::DomainError;
use crate::domain::ports::market_data::MarketDataSource;
use crate::domain::values::asset_type::AssetType;
use crate::domain::values::numeric::parse_float;
use crate::infrastructure::http::str_field;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;

pub const MAX_RESULTS: usize = 15;

const MAJOR_US_EXCHANGES: [&str; 4] = ["NASDAQ", "NYSE", "AMEX", "ARCA"];
const MAJOR_INTL_EXCHANGES: [&str; 5] = ["LSE", "TSX", "XETRA", "SIX", "HKEX"];
const CRYPTO_VENUES: [&str; 6] = [
    "COINBASE", "BINANCE", "KRAKEN", "COINBASE PRO", "CC", "CRYPTO",
];
const US_VENUES: [&str; 11] = [
    "NASDAQ", "NYSE", "NYSE MKT", "NYSE ARCA", "ARCA", "AMEX", "BATS", "IEX", "OTC", "OTCBB",
    "PINK",
];
const LEVERAGE_MARKERS: [&str; 5] = ["3x", "2x", "Inverse", "Bear", "Bull"];

pub struct InstrumentsUseCase {
    market: Arc<dyn MarketDataSource>,
}

impl InstrumentsUseCase {
    pub fn new(market: Arc<dyn MarketDataSource>) -> Self {
        Self { market }
    }

    /// Ranked instruments in the tradable universe matching `query`.
    pub async fn search(
        &self,
        query: &str,
        asset_type: Option<&str>,
    ) -> Result<Vec<Instrument>, DomainError> {
        tracing::info!(query, asset_type = ?asset_type, "instrument search");
        let outcome = async {
            let payload = self.market.search_symbols(query, None, None).await?;
            let rows = symbol_rows(&payload)?;
            Ok::<_, DomainError>(rank(rows, asset_type))
        }
        .await;

        outcome.map_err(|e| {
            tracing::error!(error = %e, query, "instrument search failed");
            DomainError::Gateway("Failed to search instruments".to_string())
        })
    }

    pub async fn resolve(&self, symbol: &str) -> Result<ResolvedInstrument, DomainError> {
        tracing::info!(symbol, "instrument resolve");
        let quote = self.market.quote(symbol).await?;
        resolve_quote(&quote)
    }
}

/// Rows of a symbol search payload; anything without an array `data` is empty.
pub fn symbol_rows(payload: &Value) -> Result<Vec<SymbolMatch>, DomainError> {
    let Some(rows) = payload.get("data").and_then(Value::as_array) else {
        return Ok(vec![]);
    };
    rows.iter()
        .map(|row| {
            serde_json::from_value(row.clone())
                .map_err(|e| DomainError::Gateway(format!("Unexpected symbol search row: {e}")))
        })
        .collect()
}

/// Filter to the tradable universe, score, stable-sort, dedup by symbol and
/// keep the best [`MAX_RESULTS`].
pub fn rank(rows: Vec<SymbolMatch>, asset_type: Option<&str>) -> Vec<Instrument> {
    let target = asset_type
        .filter(|t| !t.is_empty())
        .unwrap_or("ALL")
        .to_uppercase();

    let mut scored: Vec<(i32, Instrument)> = rows
        .into_iter()
        .map(Instrument::from)
        .filter(|item| in_universe(item, &target))
        .map(|item| (score(&item), item))
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    let mut seen = HashSet::new();
    scored
        .into_iter()
        .map(|(_, item)| item)
        .filter(|item| seen.insert(item.symbol.clone()))
        .take(MAX_RESULTS)
        .collect()
}

fn in_universe(item: &Instrument, target: &str) -> bool {
    let is_crypto = item.asset_type == AssetType::Crypto;
    let is_stock = item.asset_type == AssetType::Stock;
    let is_etf = item.asset_type == AssetType::Etf;
    let us_listed = (is_stock || is_etf) && is_us_market(&item.exchange, item.country.as_deref());

    match target {
        "CRYPTO" => is_crypto,
        "STOCK" => is_stock && us_listed,
        "ETF" => is_etf && us_listed,
        _ => is_crypto || us_listed,
    }
}

pub fn is_us_market(exchange: &str, country: Option<&str>) -> bool {
    let nation = country.unwrap_or_default().to_uppercase();
    if matches!(nation.as_str(), "UNITED STATES" | "USA" | "US") {
        return true;
    }
    US_VENUES.contains(&exchange.to_uppercase().as_str())
}

pub fn score(item: &Instrument) -> i32 {
    let exchange = item.exchange.to_uppercase();
    let country = item.country.as_deref().unwrap_or_default().to_uppercase();
    let kind = item.instrument_type.to_uppercase();
    let name = item.name.as_deref().unwrap_or_default();

    let mut score = 0;
    if MAJOR_US_EXCHANGES.contains(&exchange.as_str()) {
        score += 50;
    }
    if MAJOR_INTL_EXCHANGES.contains(&exchange.as_str()) {
        score += 30;
    }
    if CRYPTO_VENUES.contains(&exchange.as_str()) {
        score += 40;
    }
    if country == "UNITED STATES" || country == "USA" {
        score += 20;
    }
    if kind == "COMMON STOCK" || kind == "ETF" {
        score += 10;
    }
    if kind == "DIGITAL CURRENCY" {
        score += 10;
    }
    if LEVERAGE_MARKERS.iter().any(|m| name.contains(m)) {
        score -= 20;
    }
    score
}

pub fn resolve_quote(quote: &Value) -> Result<ResolvedInstrument, DomainError> {
    let symbol = str_field(quote, "symbol")
        .ok_or_else(|| DomainError::NotFound("Instrument not found".to_string()))?;
    let text = |key: &str| str_field(quote, key).map(str::to_string);

    let instrument_type = text("type");
    let exchange = text("exchange");
    let asset_type = AssetType::classify(
        instrument_type.as_deref().unwrap_or_default(),
        exchange.as_deref().unwrap_or_default(),
        symbol,
    );
    let latest_price = ["close", "previous_close"]
        .iter()
        .filter_map(|key| quote.get(*key).and_then(parse_float))
        .find(|price| price.is_finite() && *price != 0.0)
        .unwrap_or(0.0);

    Ok(ResolvedInstrument {
        symbol: symbol.to_string(),
        name: text("name"),
        exchange,
        mic_code: text("mic_code"),
        currency: text("currency"),
        country: text("country"),
        instrument_type,
        asset_type,
        latest_price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(symbol: &str, name: &str, exchange: &str, kind: &str, country: &str) -> SymbolMatch {
        SymbolMatch {
            symbol: Some(symbol.to_string()),
            instrument_name: Some(name.to_string()),
            exchange: Some(exchange.to_string()),
            mic_code: None,
            instrument_type: Some(kind.to_string()),
            country: Some(country.to_string()),
            currency: Some("USD".to_string()),
        }
    }

    #[test]
    fn test_rank_prefers_primary_listing() {
        let rows = vec![
            row("AAPL", "Apple Inc", "OTC", "Common Stock", ""),
            row("AAPL", "Apple Inc", "NASDAQ", "Common Stock", "USA"),
            row("AAPL", "Apple Inc", "LSE", "Common Stock", "United Kingdom"),
        ];
        let ranked = rank(rows, None);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].exchange, "NASDAQ");
    }

    #[test]
    fn test_rank_filters_universe() {
        let rows = vec![
            row("VOD", "Vodafone", "LSE", "Common Stock", "United Kingdom"),
            row("BTC/USD", "Bitcoin", "Coinbase Pro", "Digital Currency", ""),
            row("SPY", "SPDR S&P 500", "NYSE ARCA", "ETF", "United States"),
            row("EUR/USD", "Euro", "FOREX", "Physical Currency", ""),
        ];
        let all: Vec<_> = rank(rows.clone(), None)
            .into_iter()
            .map(|i| i.symbol)
            .collect();
        assert_eq!(all, vec!["BTC/USD", "SPY"]);

        let crypto: Vec<_> = rank(rows.clone(), Some("crypto"))
            .into_iter()
            .map(|i| i.symbol)
            .collect();
        assert_eq!(crypto, vec!["BTC/USD"]);

        assert!(rank(rows, Some("stock")).is_empty());
    }

    #[test]
    fn test_leveraged_names_score_lower() {
        let plain = Instrument::from(row("TQQQ", "ProShares Nasdaq", "NASDAQ", "ETF", "USA"));
        let leveraged_row = row("TQQQ", "ProShares UltraPro 3x", "NASDAQ", "ETF", "USA");
        let leveraged = Instrument::from(leveraged_row);
        assert_eq!(score(&plain), 80);
        assert_eq!(score(&plain) - score(&leveraged), 20);
    }

    #[test]
    fn test_rank_keeps_input_order_on_ties_and_truncates() {
        let rows: Vec<_> = (0..20)
            .map(|i| row(&format!("S{i}"), "Name", "NYSE", "Common Stock", "USA"))
            .collect();
        let ranked = rank(rows, Some("STOCK"));
        assert_eq!(ranked.len(), MAX_RESULTS);
        assert_eq!(ranked[0].symbol, "S0");
        assert_eq!(ranked[14].symbol, "S14");
    }

    #[test]
    fn test_missing_name_does_not_fail() {
        let mut nameless = row("ETH/USD", "", "Binance", "Digital Currency", "");
        nameless.instrument_name = None;
        let ranked = rank(vec![nameless], None);
        assert_eq!(ranked.len(), 1);
        assert_eq!(score(&ranked[0]), 50);
    }

    #[test]
    fn test_symbol_rows_without_data() {
        assert!(symbol_rows(&json!({ "status": "ok" })).unwrap().is_empty());
        assert!(symbol_rows(&json!({ "data": "nope" })).unwrap().is_empty());
        assert!(symbol_rows(&Value::Null).unwrap().is_empty());
    }

    #[test]
    fn test_resolve_quote_price_fallback() {
        let quote = json!({
            "symbol": "MSFT", "name": "Microsoft", "exchange": "NASDAQ",
            "mic_code": "XNGS", "type": "Common Stock",
            "close": "0", "previous_close": "410.25"
        });
        let resolved = resolve_quote(&quote).unwrap();
        assert_eq!(resolved.asset_type, AssetType::Stock);
        assert_eq!(resolved.latest_price, 410.25);
        assert_eq!(resolved.mic_code.as_deref(), Some("XNGS"));

        let err = resolve_quote(&json!({ "code": 404 })).unwrap_err();
        assert_eq!(err.status(), 404);
        assert_eq!(err.to_string(), "Instrument not found");
    }
}
