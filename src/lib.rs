// In: src/lib.rs

//! Creature Battle Engine
//!
//! A deterministic, single-threaded battle core for one-on-one creature
//! battles. Status conditions, abilities, held items and weather plug into
//! the turn loop through named, prioritized hooks.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod config;
pub mod content;
pub mod errors;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::{
    AbilityData, AilmentId, DamageClass, ItemData, MoveData, MoveId, MoveMetaCategory, PokemonType, SpeciesData,
    SpeciesId, StatType, Stats, TypeChart, WeatherKind,
};

// --- From this crate's modules (`src/`) ---

// Core battle engine functions and state.
pub use battle::engine::{
    forfeit, handle_battle_start, legal_moves, queue_action, run_to_completion, run_turn, run_turn_with_logger,
    start_battle, start_battle_with_config, FinalResult, TurnResult,
};
pub use battle::state::{BattlePhase, BattleState, PlayerAction, Side, TurnRng};

// Combatants and narration.
pub use battle::combatant::{CombatantSnapshot, CombatantState, MoveSlot};
pub use battle::logger::{BattleLogger, ListBattleLogger, NoOpBattleLogger};

// Content, configuration and errors.
pub use config::BattleConfig;
pub use content::{ContentRepository, StaticContent};
pub use errors::{ActionError, BattleEngineError, BattleResult, BattleStateError, ContentError, ContentResult};
