//! sheetline_engine - Tabular projection and range addressing.

pub mod engine;
pub mod error;

pub use error::{EngineError, Result};
