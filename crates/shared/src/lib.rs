//! Shared identifiers, errors, and configuration for tbfx.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for accounts, account groups, and currencies
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use self::config::{AppConfig, ReportConfig, SnapshotConfig};
pub use error::{AppError, AppResult};
