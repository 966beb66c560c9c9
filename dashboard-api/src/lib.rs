//! # Société Dashboard API Server Library
//!
//! This library provides the core functionality for the dashboard API server.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Tower middleware (security headers)
//! - `reconnect`: Background task re-establishing lost store connections
//! - `routes`: API route handlers
//! - `services`: Live-or-fallback listing and stats

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod reconnect;
pub mod routes;
pub mod services;
