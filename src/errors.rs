use crate::battle::state::Side;
use schema::{MoveId, SpeciesId};
use thiserror::Error;

/// Main error type for the battle engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleEngineError {
    /// Error related to content lookup or parsing
    #[error("Content error: {0}")]
    Content(#[from] ContentError),
    /// Error related to invalid battle state
    #[error("Battle state error: {0}")]
    BattleState(#[from] BattleStateError),
    /// Error related to invalid player actions
    #[error("Action error: {0}")]
    Action(#[from] ActionError),
    /// Error related to battle configuration text
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors raised by a content repository
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    #[error("Move not found: {0}")]
    MoveNotFound(MoveId),
    #[error("Species not found: {0}")]
    SpeciesNotFound(SpeciesId),
    #[error("Ability not found: {0}")]
    AbilityNotFound(u16),
    #[error("Item not found: {0}")]
    ItemNotFound(u16),
    /// Content text is malformed or inconsistent
    #[error("Malformed content: {0}")]
    MalformedData(String),
}

/// Errors related to battle state validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleStateError {
    /// The battle already reached its end state
    #[error("The battle is already over")]
    BattleOver,
    /// A persisted snapshot cannot take part in a battle
    #[error("Invalid combatant: {0}")]
    InvalidCombatant(String),
    /// Battle state is in an inconsistent or corrupted state
    #[error("Inconsistent battle state: {0}")]
    InconsistentState(String),
}

/// Errors related to player actions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// Move index is out of bounds
    #[error("Invalid move index: {0}")]
    InvalidMoveIndex(usize),
    #[error("Move {0} has no PP left")]
    NoPpRemaining(usize),
    #[error("{side} is locked into another move")]
    MoveLocked { side: Side },
    /// Action is not valid in the current battle state
    #[error("Invalid action: {0}")]
    InvalidAction(String),
}

/// Result type for battle engine operations
pub type BattleResult<T> = Result<T, BattleEngineError>;

/// Result type for content lookups
pub type ContentResult<T> = Result<T, ContentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = BattleEngineError::from(ContentError::MoveNotFound(MoveId(999)));
        assert_eq!(error.to_string(), "Content error: Move not found: #999");

        let error = BattleEngineError::from(ActionError::NoPpRemaining(2));
        assert_eq!(error.to_string(), "Action error: Move 2 has no PP left");
    }

    #[test]
    fn test_error_conversion() {
        let state_error = BattleStateError::BattleOver;
        let engine_error: BattleEngineError = state_error.clone().into();
        assert_eq!(engine_error, BattleEngineError::BattleState(state_error));
    }
}
