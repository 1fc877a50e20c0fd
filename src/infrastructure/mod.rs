//! Infrastructure layer - External adapters and implementations
//!
//! This layer contains:
//! - Catalog: the static enemy, item, skill and dungeon tables
//! - Persistence: in-memory and SQLite repositories
//! - HTTP: REST API routes
//! - Config: Application configuration
//! - State: Shared application state

pub mod catalog;
pub mod config;
pub mod http;
pub mod persistence;
pub mod state;
