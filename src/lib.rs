pub mod cli;
pub mod common;
pub mod models;
pub mod operations;
pub mod setup;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;
