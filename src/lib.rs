// Library exports for the binary and tests
pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod notify;
pub mod views;
