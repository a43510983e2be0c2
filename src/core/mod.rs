pub mod error;

pub use error::{InsightError, Result};
