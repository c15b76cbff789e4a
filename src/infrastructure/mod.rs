pub mod http;
pub mod internal_api;
pub mod market;
pub mod oauth;
pub mod saas;
