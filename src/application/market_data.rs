use crate::application::instruments::symbol_rows;
use crate::domain::entities::instrument::SymbolMatch;
use crate::domain::entities::revenue::{RevenuePoint, RevenueSeries};
use crate::domain::error::DomainError;
use crate::domain::ports::fundamentals::FundamentalsSource;
use crate::domain::ports::market_data::MarketDataSource;
use crate::domain::values::dates::{parse_loose, timestamp};
use crate::domain::values::numeric::coerce_number;
use crate::domain::values::statement_period::StatementPeriod;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Name search hit in the shape the research tools expect.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NameMatch {
    pub symbol: Option<String>,
    pub name: Option<String>,
    pub currency: Option<String>,
    pub stock_exchange: Option<String>,
    pub exchange_short_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Fundamentals {
    pub symbol: String,
    pub income_statement: Value,
    pub balance_sheet: Value,
    pub cash_flow: Value,
    pub financial_growth: Value,
}

/// Inclusive date window for the earnings calendar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateBounds {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl DateBounds {
    pub fn parse(from: Option<&str>, to: Option<&str>) -> Result<Self, DomainError> {
        let bound = |raw: Option<&str>, label: &str| {
            raw.filter(|r| !r.is_empty())
                .map(|r| {
                    let message = format!("Invalid {label} date. Expected YYYY-MM-DD.");
                    parse_loose(r).ok_or(DomainError::InvalidInput(message))
                })
                .transpose()
        };
        Ok(Self {
            from: bound(from, "from")?,
            to: bound(to, "to")?,
        })
    }

    pub fn is_open(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    fn contains(&self, at: DateTime<Utc>) -> bool {
        self.from.map_or(true, |from| at >= from) && self.to.map_or(true, |to| at <= to)
    }
}

pub struct MarketDataUseCase {
    market: Arc<dyn MarketDataSource>,
    fundamentals: Arc<dyn FundamentalsSource>,
}

impl MarketDataUseCase {
    pub fn new(
        market: Arc<dyn MarketDataSource>,
        fundamentals: Arc<dyn FundamentalsSource>,
    ) -> Self {
        Self { market, fundamentals }
    }

    pub async fn search_name(
        &self,
        query: &str,
        asset_type: Option<&str>,
    ) -> Result<Vec<NameMatch>, DomainError> {
        tracing::info!(query, asset_type = ?asset_type, "market-data name search");
        let payload = self.market.search_symbols(query, None, None).await?;
        let rows = symbol_rows(&payload)?;
        let matches: Vec<_> = filter_by_type(rows, asset_type)
            .into_iter()
            .map(name_match)
            .collect();
        Ok(matches)
    }

    pub async fn profile(&self, symbol: &str) -> Result<Value, DomainError> {
        tracing::info!(symbol, "market-data profile");
        self.fundamentals.profile(symbol).await
    }

    pub async fn earnings(&self, symbol: &str) -> Result<Value, DomainError> {
        tracing::info!(symbol, "market-data earnings");
        self.fundamentals.earnings(symbol).await
    }

    pub async fn fundamentals(&self, symbol: &str) -> Result<Fundamentals, DomainError> {
        tracing::info!(symbol, "market-data fundamentals");
        let source = &self.fundamentals;
        let (income_statement, balance_sheet, cash_flow, financial_growth) = tokio::try_join!(
            source.income_statement(symbol, None),
            source.balance_sheet(symbol),
            source.cash_flow(symbol),
            source.financial_growth(symbol),
        )?;
        Ok(Fundamentals {
            symbol: symbol.to_string(),
            income_statement,
            balance_sheet,
            cash_flow,
            financial_growth,
        })
    }

    pub async fn earnings_calendar(&self, bounds: DateBounds) -> Result<Value, DomainError> {
        tracing::info!(from = ?bounds.from, to = ?bounds.to, "market-data earnings calendar");
        let payload = self.fundamentals.earnings_calendar().await?;
        Ok(filter_calendar(payload, &bounds))
    }

    pub async fn analyst_estimates(
        &self,
        symbol: &str,
        period: StatementPeriod,
        page: u32,
        limit: u32,
    ) -> Result<Value, DomainError> {
        tracing::info!(symbol, %period, page, limit, "market-data analyst estimates");
        self.fundamentals
            .analyst_estimates(symbol, period, page, limit)
            .await
    }

    pub async fn revenue_series(
        &self,
        symbol: &str,
        period: StatementPeriod,
        limit: Option<usize>,
    ) -> Result<RevenueSeries, DomainError> {
        tracing::info!(symbol, %period, limit = ?limit, "market-data revenue series");
        let statement = self
            .fundamentals
            .income_statement(symbol, Some(period))
            .await?;
        Ok(normalize_revenue(symbol, period, &statement, limit, Utc::now()))
    }
}

fn filter_by_type(rows: Vec<SymbolMatch>, asset_type: Option<&str>) -> Vec<SymbolMatch> {
    let Some(wanted) = asset_type.filter(|t| !t.is_empty()).map(str::to_lowercase) else {
        return rows;
    };
    rows.into_iter()
        .filter(|row| {
            let kind = row
                .instrument_type
                .as_deref()
                .unwrap_or_default()
                .to_lowercase();
            match wanted.as_str() {
                "stock" => matches!(kind.as_str(), "common stock" | "preferred stock" | "stock"),
                "etf" => matches!(kind.as_str(), "etf" | "etn"),
                "crypto" => matches!(kind.as_str(), "digital currency" | "cryptocurrency"),
                "bond" => kind.contains("bond"),
                _ => true,
            }
        })
        .collect()
}

fn name_match(row: SymbolMatch) -> NameMatch {
    let non_empty = |s: Option<String>| s.filter(|v| !v.is_empty());
    NameMatch {
        symbol: row.symbol,
        name: non_empty(row.instrument_name).or(row.instrument_type),
        currency: row.currency,
        stock_exchange: row.exchange,
        exchange_short_name: row.mic_code,
    }
}

fn calendar_date(entry: &Value) -> Option<DateTime<Utc>> {
    ["date", "earningsDate", "reportDate", "epsDate"]
        .iter()
        .filter_map(|key| entry.get(*key).and_then(Value::as_str))
        .filter(|s| !s.trim().is_empty())
        .find_map(parse_loose)
}

/// Keep calendar entries whose date falls inside `bounds`. Payloads that are
/// not arrays, and open bounds, pass through untouched.
pub fn filter_calendar(payload: Value, bounds: &DateBounds) -> Value {
    if bounds.is_open() {
        return payload;
    }
    match payload {
        Value::Array(entries) => Value::Array(
            entries
                .into_iter()
                .filter(|entry| calendar_date(entry).is_some_and(|at| bounds.contains(at)))
                .collect(),
        ),
        other => other,
    }
}

struct RevenueRow {
    date: String,
    revenue: f64,
    currency: Option<String>,
    fiscal_period: Option<String>,
}

fn first_text(row: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| row.get(*key).and_then(Value::as_str))
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// Chart-ready revenue history from an FMP income statement.
pub fn normalize_revenue(
    symbol: &str,
    period: StatementPeriod,
    statement: &Value,
    limit: Option<usize>,
    now: DateTime<Utc>,
) -> RevenueSeries {
    let mut series = RevenueSeries {
        symbol: symbol.to_string(),
        period,
        currency: None,
        data: vec![],
        as_of: timestamp(now),
    };
    let Some(rows) = statement.as_array() else {
        return series;
    };

    let mut kept: Vec<RevenueRow> = rows
        .iter()
        .filter_map(|row| {
            let date = first_text(row, &["date", "fillingDate", "acceptedDate"])?;
            let raw = ["revenue", "totalRevenue", "revenueUSD"]
                .iter()
                .filter_map(|key| row.get(*key))
                .find(|v| !v.is_null())
                .unwrap_or(&Value::Null);
            let revenue = coerce_number(raw);
            if !revenue.is_finite() {
                return None;
            }
            Some(RevenueRow {
                date,
                revenue,
                currency: first_text(row, &["reportedCurrency", "currency"]),
                fiscal_period: first_text(row, &["period", "fiscalPeriod"]),
            })
        })
        .collect();
    kept.sort_by(|a, b| a.date.cmp(&b.date));

    // zero keeps the whole history
    if let Some(limit) = limit.filter(|n| *n > 0) {
        let skip = kept.len().saturating_sub(limit);
        kept.drain(..skip);
    }

    series.currency = kept.iter().find_map(|row| row.currency.clone());
    series.data = kept
        .into_iter()
        .map(|row| RevenuePoint {
            date: row.date,
            revenue: row.revenue,
            fiscal_period: row.fiscal_period,
        })
        .collect();
    series
}
