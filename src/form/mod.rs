pub mod debounce;
pub mod error;
pub mod form_model;
pub mod generator;
pub mod store;
