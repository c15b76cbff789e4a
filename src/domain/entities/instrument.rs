use crate::domain::values::asset_type::AssetType;
use serde::{Deserialize, Serialize};

/// One row of a Twelve Data `symbol_search` answer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SymbolMatch {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub instrument_name: Option<String>,
    #[serde(default)]
    pub exchange: Option<String>,
    #[serde(default)]
    pub mic_code: Option<String>,
    #[serde(default)]
    pub instrument_type: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
}

/// A ranked search hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Instrument {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub exchange: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub instrument_type: String,
    pub asset_type: AssetType,
}

impl From<SymbolMatch> for Instrument {
    fn from(row: SymbolMatch) -> Self {
        let symbol = row.symbol.unwrap_or_default();
        let exchange = row.exchange.unwrap_or_default();
        let instrument_type = row.instrument_type.unwrap_or_default();
        let asset_type = AssetType::classify(&instrument_type, &exchange, &symbol);
        Self {
            symbol,
            name: row.instrument_name,
            exchange,
            currency: row.currency,
            country: row.country,
            instrument_type,
            asset_type,
        }
    }
}

/// Quote-backed description of a single symbol.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedInstrument {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mic_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instrument_type: Option<String>,
    pub asset_type: AssetType,
    pub latest_price: f64,
}
