//! # Société Dashboard Shared Library
//!
//! This crate contains the types, authentication primitives and data access
//! layer shared by the dashboard API server and its HTTP client.
//!
//! ## Module Organization
//!
//! - `models`: Client records, pagination, dashboard statistics and the response envelope
//! - `auth`: Password hashing, JWT tokens, the configured account and bearer extraction
//! - `db`: MySQL connection pool management
//! - `repository`: The `ClientStore` seam and its MySQL implementation
//! - `fallback`: Static sample data served while the stores are unreachable

pub mod auth;
pub mod db;
pub mod fallback;
pub mod models;
pub mod repository;

/// Current version of the shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
