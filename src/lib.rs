pub mod alerts;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod enrich;
pub mod error;
pub mod fetch;
pub mod history;
pub mod notify;
pub mod render;

pub use error::{AppError, Result};
