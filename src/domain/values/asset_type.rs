use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const STOCK_VENUES: &[&str] = &[
    "NASDAQ", "NYSE", "AMEX", "ARCA", "LSE", "TSX", "XETRA", "SIX", "HKEX",
];
const CRYPTO_VENUES: &[&str] = &[
    "COINBASE", "BINANCE", "KRAKEN", "KUCOIN", "OKX", "CRYPTO", "CC",
];
const STOCK_TYPES: &[&str] = &[
    "COMMON STOCK",
    "PREFERRED STOCK",
    "REIT",
    "DEPOSITARY RECEIPT",
    "WARRANT",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AssetType {
    Stock,
    Etf,
    Forex,
    Crypto,
    Fund,
    Bond,
    Commodity,
    Other,
}

impl AssetType {
    /// Classify a provider row from its raw instrument type, exchange and symbol.
    ///
    /// Rows without a type are guessed from the venue, then from the symbol shape
    /// (`BTC/USD`, or long dot-free tickers, read as crypto pairs).
    pub fn classify(instrument_type: &str, exchange: &str, symbol: &str) -> Self {
        let kind = instrument_type.to_uppercase();

        if kind.is_empty() {
            let venue = exchange.to_uppercase();
            if STOCK_VENUES.contains(&venue.as_str()) {
                return AssetType::Stock;
            }
            if CRYPTO_VENUES.contains(&venue.as_str()) {
                return AssetType::Crypto;
            }
            if symbol.contains('/') || (symbol.chars().count() > 6 && !symbol.contains('.')) {
                return AssetType::Crypto;
            }
            return AssetType::Other;
        }

        if STOCK_TYPES.contains(&kind.as_str()) || kind.contains("STOCK") {
            AssetType::Stock
        } else if kind.contains("ETF") {
            AssetType::Etf
        } else if kind == "FOREX" || kind == "PHYSICAL CURRENCY" || exchange == "FOREX" {
            AssetType::Forex
        } else if kind == "DIGITAL CURRENCY" || kind == "CRYPTOCURRENCY" || exchange == "CRYPTO" {
            AssetType::Crypto
        } else if kind.contains("FUND") {
            AssetType::Fund
        } else if kind.contains("BOND") {
            AssetType::Bond
        } else if kind.contains("COMMODITY") {
            AssetType::Commodity
        } else {
            AssetType::Other
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetType::Stock => write!(f, "STOCK"),
            AssetType::Etf => write!(f, "ETF"),
            AssetType::Forex => write!(f, "FOREX"),
            AssetType::Crypto => write!(f, "CRYPTO"),
            AssetType::Fund => write!(f, "FUND"),
            AssetType::Bond => write!(f, "BOND"),
            AssetType::Commodity => write!(f, "COMMODITY"),
            AssetType::Other => write!(f, "OTHER"),
        }
    }
}

impl FromStr for AssetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "STOCK" => Ok(AssetType::Stock),
            "ETF" => Ok(AssetType::Etf),
            "FOREX" => Ok(AssetType::Forex),
            "CRYPTO" => Ok(AssetType::Crypto),
            "FUND" => Ok(AssetType::Fund),
            "BOND" => Ok(AssetType::Bond),
            "COMMODITY" => Ok(AssetType::Commodity),
            "OTHER" => Ok(AssetType::Other),
            _ => Err(format!("Unknown asset type: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untyped_rows_use_venue() {
        assert_eq!(AssetType::classify("", "nasdaq", "AAPL"), AssetType::Stock);
        assert_eq!(
            AssetType::classify("", "Binance", "BTCUSDT"),
            AssetType::Crypto
        );
        assert_eq!(AssetType::classify("", "", "ETH/USD"), AssetType::Crypto);
        assert_eq!(AssetType::classify("", "", "DOGEUSDT"), AssetType::Crypto);
        assert_eq!(AssetType::classify("", "", "BRK.B"), AssetType::Other);
        assert_eq!(AssetType::classify("", "", "MSFT"), AssetType::Other);
    }

    #[test]
    fn test_typed_rows_in_priority_order() {
        assert_eq!(
            AssetType::classify("Common Stock", "NYSE", "IBM"),
            AssetType::Stock
        );
        assert_eq!(AssetType::classify("REIT", "NYSE", "O"), AssetType::Stock);
        assert_eq!(
            AssetType::classify("ETF", "NYSE ARCA", "SPY"),
            AssetType::Etf
        );
        assert_eq!(
            AssetType::classify("Physical Currency", "", "EUR/USD"),
            AssetType::Forex
        );
        assert_eq!(
            AssetType::classify("Index", "FOREX", "DXY"),
            AssetType::Forex
        );
        assert_eq!(
            AssetType::classify("Digital Currency", "", "BTC/USD"),
            AssetType::Crypto
        );
        assert_eq!(
            AssetType::classify("Mutual Fund", "", "VFIAX"),
            AssetType::Fund
        );
        assert_eq!(AssetType::classify("Bond", "", "US10Y"), AssetType::Bond);
        assert_eq!(
            AssetType::classify("Commodity", "", "XAU/USD"),
            AssetType::Commodity
        );
        assert_eq!(AssetType::classify("Index", "", "SPX"), AssetType::Other);
    }

    #[test]
    fn test_blank_type_still_counts_as_typed() {
        assert_eq!(AssetType::classify(" ", "NASDAQ", "AAPL"), AssetType::Other);
        assert_eq!(AssetType::classify(" ", "", "ETH/USD"), AssetType::Other);
        assert_eq!(AssetType::classify("", " NASDAQ", "AAPL"), AssetType::Other);
    }

    #[test]
    fn test_raw_exchange_check_is_case_sensitive() {
        assert_eq!(
            AssetType::classify("Index", "crypto", "X"),
            AssetType::Other
        );
        assert_eq!(
            AssetType::classify("Index", "CRYPTO", "X"),
            AssetType::Crypto
        );
    }

    #[test]
    fn test_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&AssetType::Etf).unwrap(), "\"ETF\"");
        assert_eq!("crypto".parse::<AssetType>().unwrap(), AssetType::Crypto);
    }
}
