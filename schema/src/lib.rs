// Creature Battle Schema - Shared content definitions
// This crate contains the read-only vocabulary supplied by the content
// repository: types, stat lines, move/species/ability/item definitions and
// the type chart. The battle engine snapshots these at battle start.

// Re-export the main types
pub use battle_data::*;
pub use move_data::*;
pub use pokemon_types::*;
pub use species_data::*;
pub use stats::*;

pub mod battle_data;
pub mod move_data;
pub mod pokemon_types;
pub mod species_data;
pub mod stats;
