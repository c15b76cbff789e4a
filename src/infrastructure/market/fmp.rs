use super::keyed::KeyedApiClient;
use crate::config::KeyedApiConfig;
use crate::domain::error::DomainError;
use crate::domain::ports::fundamentals::FundamentalsSource;
use crate::domain::values::query_params::QueryParams;
use crate::domain::values::statement_period::StatementPeriod;
use async_trait::async_trait;
use serde_json::Value;

/// Financial Modeling Prep `stable` API client.
pub struct FmpClient {
    http: KeyedApiClient,
}

impl FmpClient {
    pub fn new(config: &KeyedApiConfig) -> Result<Self, DomainError> {
        Ok(Self {
            http: KeyedApiClient::new("FMP", "FMP", config)?,
        })
    }

    async fn by_symbol(&self, path: &str, symbol: &str) -> Result<Value, DomainError> {
        self.http
            .get(path, &QueryParams::new().with("symbol", symbol))
            .await
    }
}

#[async_trait]
impl FundamentalsSource for FmpClient {
    async fn profile(&self, symbol: &str) -> Result<Value, DomainError> {
        self.by_symbol("/profile", symbol).await
    }

    async fn income_statement(
        &self,
        symbol: &str,
        period: Option<StatementPeriod>,
    ) -> Result<Value, DomainError> {
        let params = QueryParams::new()
            .with("symbol", symbol)
            .with_opt("period", period);
        self.http.get("/income-statement", &params).await
    }

    async fn balance_sheet(&self, symbol: &str) -> Result<Value, DomainError> {
        self.by_symbol("/balance-sheet-statement", symbol).await
    }

    async fn cash_flow(&self, symbol: &str) -> Result<Value, DomainError> {
        self.by_symbol("/cash-flow-statement", symbol).await
    }

    async fn financial_growth(&self, symbol: &str) -> Result<Value, DomainError> {
        self.by_symbol("/financial-growth", symbol).await
    }

    async fn earnings(&self, symbol: &str) -> Result<Value, DomainError> {
        self.by_symbol("/earnings", symbol).await
    }

    async fn earnings_calendar(&self) -> Result<Value, DomainError> {
        self.http
            .get("/earnings-calendar", &QueryParams::new())
            .await
    }

    async fn analyst_estimates(
        &self,
        symbol: &str,
        period: StatementPeriod,
        page: u32,
        limit: u32,
    ) -> Result<Value, DomainError> {
        let params = QueryParams::new()
            .with("symbol", symbol)
            .with("period", period)
            .with("page", page)
            .with("limit", limit);
        self.http.get("/analyst-estimates", &params).await
    }
}
