//! Keyconf core — a tree of configuration nodes with prefix routing.
//!
//! This crate contains:
//! - **config**: the [`Configuration`] node and the parsing helpers that feed it
//! - **setting**: the [`Setting`] wrapper, which can carry a "leave unchanged" marker
//! - **error**: [`ConfigError`] and the crate-wide [`Result`] alias

pub mod config;
pub mod error;
pub mod setting;

pub use config::Configuration;
pub use error::{ConfigError, KeyKind, Result};
pub use setting::Setting;
