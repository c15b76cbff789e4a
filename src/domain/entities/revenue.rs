use crate::domain::values::numeric::json_number;
use crate::domain::values::statement_period::StatementPeriod;
use serde::{Serialize, Serializer};

fn serialize_amount<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    json_number(*value).serialize(serializer)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenuePoint {
    pub date: String,
    #[serde(serialize_with = "serialize_amount")]
    pub revenue: f64,
    pub fiscal_period: Option<String>,
}

/// Chart-ready revenue history, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueSeries {
    pub symbol: String,
    pub period: StatementPeriod,
    pub currency: Option<String>,
    pub data: Vec<RevenuePoint>,
    pub as_of: String,
}
