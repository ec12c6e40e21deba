//! Core types, configuration, and error handling for the culprit pipeline.
//!
//! This crate provides the shared foundation used by all other culprit crates:
//! - [`CulpritError`] — unified error type using `thiserror`
//! - [`CulpritConfig`] — configuration loaded from `.culprit.toml`
//! - [`History`] — capability trait over a version-controlled history
//! - Shared types: [`CommitMeta`], [`ChangeMap`], [`Candidate`],
//!   [`IssueRecord`], [`OutputFormat`]

mod config;
mod error;
mod history;
mod types;

pub use config::{CulpritConfig, HuntConfig, IssueConfig};
pub use error::CulpritError;
pub use history::History;
pub use types::{Candidate, ChangeMap, CommitMeta, IssueRecord, OutputFormat};

/// A convenience `Result` type for culprit operations.
pub type Result<T> = std::result::Result<T, CulpritError>;
