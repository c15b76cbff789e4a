//! API-key authenticated market data vendors.

pub mod fmp;
pub mod keyed;
pub mod newsdata;
pub mod twelvedata;
