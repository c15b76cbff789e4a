pub mod activity_sink;
pub mod communication;
pub mod document_source;
pub mod fundamentals;
pub mod market_data;
pub mod news;
pub mod oauth;
pub mod project_manager;
