//! Application layer - Use cases orchestrating the domain rule engines
//!
//! Services load state through outbound ports, run the pure domain
//! transitions, and persist the result in a single write.

pub mod dto;
pub mod ports;
pub mod services;
