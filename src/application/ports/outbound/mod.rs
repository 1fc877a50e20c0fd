//! Outbound ports - Interfaces that the application requires from external systems

mod catalog_port;
mod repository_port;

pub use catalog_port::CatalogPort;
pub use repository_port::{CharacterRepositoryPort, CombatSessionRepositoryPort, RepositoryError};
