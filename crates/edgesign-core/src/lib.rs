//! Configuration and core error types for edgesign.
//!
//! This crate holds the settings every other edgesign crate is built from.
//! Environment variables are read exactly once, into [`EdgesignConfig`], and
//! the resulting value is passed down explicitly; nothing below this crate
//! touches the process environment.

mod config;
mod error;

pub use config::{EdgesignConfig, StorageConfig};
pub use error::{EdgesignError, EdgesignResult};
