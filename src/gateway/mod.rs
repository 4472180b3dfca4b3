pub mod client;
pub mod error;
pub mod source;

pub use client::PredictionClient;
pub use error::FetchError;
pub use source::PredictionSource;
