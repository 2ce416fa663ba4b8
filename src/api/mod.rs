pub mod api_model;
pub mod client;
pub mod enum_cache;
pub mod error;
