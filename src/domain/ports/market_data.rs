use crate::domain::entities::market::TimeSeriesRequest;
use crate::domain::error::DomainError;
use crate::domain::values::query_params::QueryParams;
use serde_json::Value;

/// Quotes, prices and reference lists (Twelve Data).
///
/// Payloads are returned as the provider sent them; shaping happens in the
/// use cases.
#[async_trait::async_trait]
pub trait MarketDataSource: Send + Sync {
    async fn search_symbols(
        &self,
        query: &str,
        exchange: Option<&str>,
        country: Option<&str>,
    ) -> Result<Value, DomainError>;
    async fn list_stocks(&self, exchange: Option<&str>) -> Result<Value, DomainError>;
    async fn list_crypto_pairs(&self) -> Result<Value, DomainError>;
    async fn list_commodity_pairs(&self) -> Result<Value, DomainError>;
    async fn live_price(&self, symbol: &str) -> Result<Value, DomainError>;
    async fn quote(&self, symbol: &str) -> Result<Value, DomainError>;
    async fn time_series(&self, request: &TimeSeriesRequest) -> Result<Value, DomainError>;
    async fn earliest_timestamp(&self, symbol: &str, interval: &str) -> Result<Value, DomainError>;
    async fn batch_price(
        &self,
        symbols: &[String],
        extra: &QueryParams,
    ) -> Result<Value, DomainError>;
    async fn batch_quote(
        &self,
        symbols: &[String],
        extra: &QueryParams,
    ) -> Result<Value, DomainError>;
    async fn exchange_rate(&self, pair: &str) -> Result<Value, DomainError>;
    async fn convert_currency(
        &self,
        amount: f64,
        from: &str,
        to: &str,
    ) -> Result<Value, DomainError>;
}
