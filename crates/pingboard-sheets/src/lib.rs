// pingboard-sheets: Async client for the Google Sheets values API (read-only)

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::{SheetsAuth, SheetsClient};
pub use error::Error;
pub use models::ValueRange;
