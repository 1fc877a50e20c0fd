//! Domain services - Stateless rule engines over domain entities

pub mod attribute_calculator;
pub mod combat_engine;
pub mod dungeon_progression;
pub mod enemy_scaler;
pub mod equipment;
pub mod lookup;
pub mod progression;
