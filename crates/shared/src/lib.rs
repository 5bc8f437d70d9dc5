//! Shared types, configuration, and telemetry for Saldo.
//!
//! This crate provides common types used across all other crates:
//! - Currency codes
//! - Typed IDs for type-safe entity references
//! - The tenant context threaded through every ledger call
//! - Configuration management
//! - Tracing/logging bootstrap

pub mod config;
pub mod telemetry;
pub mod types;

pub use config::AppConfig;
