pub mod cli;
pub mod cli_handlers;
pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod prompt;
pub mod store;

pub use error::{ErrorPolicy, Result, TodoError};
pub use models::*;
