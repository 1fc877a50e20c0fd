//! Data Transfer Objects - For API boundaries
//!
//! Request and response shapes for the transport layer, built from domain
//! entities and service outcomes.

pub mod character;
pub mod combat;
pub mod dungeon;
pub mod equipment;

pub use character::*;
pub use combat::*;
pub use dungeon::*;
pub use equipment::*;
