// Library exports for testing
pub mod api;
pub mod config;
pub mod errors;
pub mod media;
pub mod metrics;
pub mod models;
pub mod settings;
