//! Application services - Use case implementations
//!
//! Each service holds its outbound ports behind `Arc<dyn ...>` and exposes a
//! trait so the transport layer can depend on the use case, not the wiring.

pub mod character_locks;
pub mod character_service;
pub mod combat_service;
pub mod dice;
pub mod dungeon_service;
pub mod equipment_service;

pub use character_locks::CharacterLocks;
pub use character_service::{CharacterService, CharacterServiceImpl, CreateCharacterRequest};
pub use combat_service::{ActionOutcome, CombatService, CombatServiceImpl};
pub use dice::Dice;
pub use dungeon_service::{DungeonContinuation, DungeonService, DungeonServiceImpl};
pub use equipment_service::{EquipmentService, EquipmentServiceImpl};
