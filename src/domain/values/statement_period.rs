use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reporting period of a financial statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementPeriod {
    #[default]
    Annual,
    Quarter,
}

impl StatementPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatementPeriod::Annual => "annual",
            StatementPeriod::Quarter => "quarter",
        }
    }
}

impl fmt::Display for StatementPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatementPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "annual" => Ok(StatementPeriod::Annual),
            "quarter" => Ok(StatementPeriod::Quarter),
            _ => Err("period must be one of: annual, quarter.".to_string()),
        }
    }
}
