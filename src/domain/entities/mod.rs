pub mod activity;
pub mod document;
pub mod email;
pub mod instrument;
pub mod market;
pub mod oauth;
pub mod project;
pub mod revenue;
