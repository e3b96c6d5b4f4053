pub mod error;
pub mod indicators_service;
pub mod rates_service;

pub use error::PublishError;
pub use indicators_service::IndicatorsService;
pub use rates_service::RatesService;
