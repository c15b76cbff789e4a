use crate::application::params;
use crate::domain::error::DomainError;
use crate::domain::ports::news::{NewsEndpoint, NewsSource};
use crate::domain::values::numeric::{coerce_number, json_number};
use crate::domain::values::query_params::QueryParams;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::Arc;

static TICKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z0-9.\-:]{1,20}$").expect("valid ticker regex"));
static CRYPTO_TICKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z0-9.\-/:]{1,20}$").expect("valid crypto ticker regex"));

/// Query string accepted by every news route; each endpoint forwards the
/// subset it supports.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewsQuery {
    pub q: Option<String>,
    pub symbol: Option<String>,
    pub country: Option<String>,
    pub language: Option<String>,
    pub category: Option<String>,
    pub domain: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub page: Option<String>,
    pub size: Option<String>,
}

impl NewsQuery {
    /// Validated provider parameters for `endpoint`, in request order.
    pub fn to_params(&self, endpoint: NewsEndpoint) -> Result<QueryParams, DomainError> {
        let size = match endpoint {
            NewsEndpoint::Sources => None,
            _ => params::positive_int(self.size.as_deref(), "size")?,
        };
        let q = self.q.as_deref();
        let symbols = || normalize_symbols(self.symbol.as_deref(), endpoint);
        let params = match endpoint {
            NewsEndpoint::Latest => QueryParams::new()
                .with_opt("q", q)
                .with_opt("country", self.country.as_deref())
                .with_opt("language", self.language.as_deref())
                .with_opt("category", self.category.as_deref())
                .with_opt("domain", self.domain.as_deref())
                .with_opt("page", self.page.as_deref())
                .with_opt("size", size),
            NewsEndpoint::Archive => QueryParams::new()
                .with_opt("q", q)
                .with_opt("from_date", self.from_date.as_deref())
                .with_opt("to_date", self.to_date.as_deref())
                .with_opt("country", self.country.as_deref())
                .with_opt("language", self.language.as_deref())
                .with_opt("category", self.category.as_deref())
                .with_opt("domain", self.domain.as_deref())
                .with_opt("page", self.page.as_deref())
                .with_opt("size", size),
            NewsEndpoint::Market => QueryParams::new()
                .with_opt("q", q)
                .with_opt("symbol", symbols()?)
                .with_opt("country", self.country.as_deref())
                .with_opt("language", self.language.as_deref())
                .with_opt("page", self.page.as_deref())
                .with_opt("size", size),
            NewsEndpoint::Crypto => QueryParams::new()
                .with_opt("q", q)
                .with_opt("symbol", symbols()?)
                .with_opt("page", self.page.as_deref())
                .with_opt("size", size),
            NewsEndpoint::Sources => QueryParams::new()
                .with_opt("country", self.country.as_deref())
                .with_opt("language", self.language.as_deref())
                .with_opt("category", self.category.as_deref()),
        };
        Ok(params)
    }
}

/// Upper-case, validate and dedup a comma-separated ticker filter.
pub fn normalize_symbols(
    raw: Option<&str>,
    endpoint: NewsEndpoint,
) -> Result<Option<String>, DomainError> {
    let Some(raw) = raw.filter(|r| !r.is_empty()) else {
        return Ok(None);
    };
    let pattern = if endpoint == NewsEndpoint::Crypto { &CRYPTO_TICKER } else { &TICKER };

    let items: Vec<String> = raw
        .split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect();
    let valid: Vec<&String> = items.iter().filter(|s| pattern.is_match(s)).collect();
    if valid.is_empty() {
        return Err("symbol must contain a valid ticker format.".into());
    }
    if valid.len() != items.len() {
        tracing::warn!(%endpoint, raw, "dropped invalid symbol values");
    }

    let mut seen = HashSet::new();
    let unique: Vec<&str> = valid
        .into_iter()
        .filter(|s| seen.insert(s.as_str()))
        .map(String::as_str)
        .collect();
    Ok(Some(unique.join(",")))
}

/// Whether a provider refusal is about the symbol filter itself. NewsData
/// reports it either as a 4xx rejection or as a 2xx `status: "error"` body.
pub fn is_unsupported_symbol(err: &DomainError) -> bool {
    let (message, code) = if let Some(rejection) = err.rejection() {
        (rejection.message.as_str(), rejection.code.as_deref())
    } else if let DomainError::InvalidInput(message) = err {
        (message.as_str(), None)
    } else {
        return false;
    };
    let message = message.to_lowercase();
    code == Some("UnsupportedFilter")
        || message.contains("symbol paramter is invalid")
        || message.contains("symbol parameter is invalid")
}

/// `{success, message, totalResults, nextPage, data}` from a NewsData payload.
pub fn normalize_response(payload: &Value) -> Value {
    let data = ["results", "sources"]
        .iter()
        .filter_map(|key| payload.get(*key))
        .find(|v| v.is_array())
        .cloned()
        .unwrap_or_else(|| json!([]));
    let total = match payload.get("totalResults") {
        Some(n @ Value::Number(_)) => n.clone(),
        Some(s @ Value::String(_)) => json_number(coerce_number(s)),
        _ => json!(data.as_array().map_or(0, Vec::len)),
    };
    let next_page = payload.get("nextPage").cloned().unwrap_or(Value::Null);

    json!({
        "success": true,
        "message": "Success",
        "totalResults": total,
        "nextPage": next_page,
        "data": data,
    })
}

pub struct NewsUseCase {
    news: Arc<dyn NewsSource>,
}

impl NewsUseCase {
    pub fn new(news: Arc<dyn NewsSource>) -> Self {
        Self { news }
    }

    pub async fn fetch(
        &self,
        endpoint: NewsEndpoint,
        query: &NewsQuery,
    ) -> Result<Value, DomainError> {
        tracing::info!(
            %endpoint,
            q = ?query.q,
            symbol = ?query.symbol,
            page = ?query.page,
            size = ?query.size,
            "news request"
        );
        let params = query.to_params(endpoint)?;
        let payload = match endpoint {
            NewsEndpoint::Market | NewsEndpoint::Crypto => {
                self.with_symbol_fallback(endpoint, params).await?
            }
            _ => self.news.fetch(endpoint, &params).await?,
        };
        Ok(normalize_response(&payload))
    }

    /// Retry once without the symbol filter when the provider refuses it,
    /// searching for the symbol text instead.
    async fn with_symbol_fallback(
        &self,
        endpoint: NewsEndpoint,
        params: QueryParams,
    ) -> Result<Value, DomainError> {
        let first = self.news.fetch(endpoint, &params).await;
        match first {
            Err(err) if is_unsupported_symbol(&err) && params.get("symbol").is_some() => {
                let mut retry = params;
                let symbol = retry.remove("symbol").unwrap_or_default();
                tracing::warn!(
                    %endpoint,
                    %symbol,
                    "provider rejected symbol filter, retrying without it"
                );
                if retry.get("q").is_none() {
                    retry.set("q", &symbol);
                }
                self.news.fetch(endpoint, &retry).await
            }
            other => other,
        }
    }
}
