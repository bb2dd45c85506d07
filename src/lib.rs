pub mod capture;
pub mod config;
pub mod decode;
pub mod editor;
pub mod error;
pub mod generator;
pub mod history;
pub mod http;
pub mod inspector;
pub mod logger;
pub mod runner;
pub mod search;
pub mod utils;

// Re-export commonly used types
pub use error::{ReprobeError, Result};
pub use inspector::Inspector;
