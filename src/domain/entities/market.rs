use crate::domain::values::query_params::QueryParams;

/// Fully resolved time-series query (range shortcuts already expanded).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSeriesRequest {
    pub symbol: String,
    pub interval: String,
    pub outputsize: Option<u32>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl TimeSeriesRequest {
    pub fn to_params(&self) -> QueryParams {
        QueryParams::new()
            .with("symbol", &self.symbol)
            .with("interval", &self.interval)
            .with_opt("outputsize", self.outputsize)
            .with_opt("start_date", self.start_date.as_deref())
            .with_opt("end_date", self.end_date.as_deref())
    }
}
