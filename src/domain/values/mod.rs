pub mod asset_type;
pub mod dates;
pub mod numeric;
pub mod provider_kind;
pub mod query_params;
pub mod statement_period;
pub mod time_range;
