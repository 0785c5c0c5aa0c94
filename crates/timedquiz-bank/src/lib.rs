//! timedquiz-bank — Question sources and user configuration.
//!
//! Implements the `QuestionSource` trait for local files, HTTP(S) URLs, and
//! in-memory banks, and loads the `timedquiz.toml` configuration.

pub mod config;
pub mod error;
pub mod file;
pub mod fixed;
pub mod http;

pub use config::{create_source, load_config_from, QuizConfig};
pub use error::SourceError;
