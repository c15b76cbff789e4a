use crate::domain::error::DomainError;
use crate::domain::values::statement_period::StatementPeriod;
use serde_json::Value;

/// Company fundamentals (FMP).
#[async_trait::async_trait]
pub trait FundamentalsSource: Send + Sync {
    async fn profile(&self, symbol: &str) -> Result<Value, DomainError>;
    async fn income_statement(
        &self,
        symbol: &str,
        period: Option<StatementPeriod>,
    ) -> Result<Value, DomainError>;
    async fn balance_sheet(&self, symbol: &str) -> Result<Value, DomainError>;
    async fn cash_flow(&self, symbol: &str) -> Result<Value, DomainError>;
    async fn financial_growth(&self, symbol: &str) -> Result<Value, DomainError>;
    async fn earnings(&self, symbol: &str) -> Result<Value, DomainError>;
    /// Full upcoming calendar; date filtering is left to the caller.
    async fn earnings_calendar(&self) -> Result<Value, DomainError>;
    async fn analyst_estimates(
        &self,
        symbol: &str,
        period: StatementPeriod,
        page: u32,
        limit: u32,
    ) -> Result<Value, DomainError>;
}
