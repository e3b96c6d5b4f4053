pub mod error;
pub mod history;
pub mod indicators_repository;
pub mod models;
pub mod rates_repository;

pub use error::StoreError;
pub use history::{merge_history, HistoryEntry};
pub use indicators_repository::IndicatorsRepository;
pub use models::*;
pub use rates_repository::RatesRepository;
