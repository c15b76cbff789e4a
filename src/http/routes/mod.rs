pub mod communication;
pub mod document_sources;
pub mod instruments;
pub mod market_data;
pub mod market_prices;
pub mod news;
pub mod oauth;
pub mod project_manager;
pub mod webhooks;
