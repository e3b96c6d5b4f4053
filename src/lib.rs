pub mod api;
pub mod app;
pub mod config;
pub mod extract;
pub mod fetch_error;
pub mod fetcher;
pub mod importers;
pub mod scheduler;
pub mod services;
pub mod store;
pub mod utils;
