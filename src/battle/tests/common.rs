use crate::battle::combatant::{CombatantSnapshot, MoveSlot};
use crate::battle::effects::StatusCondition;
use crate::battle::state::{BattleState, Side, TurnRng};
use crate::config::BattleConfig;
use crate::content::{ContentRepository, StaticContent};
use schema::{MoveData, MoveId, SpeciesId, Stats};

/// The bundled content pack, optionally extended with test-only moves.
pub fn test_content() -> StaticContent {
    match StaticContent::bundled() {
        Ok(content) => content,
        Err(err) => panic!("bundled content failed to load: {}", err),
    }
}

/// A builder for test combatant snapshots with common defaults.
///
/// # Example
/// ```ignore
/// let pikachu = TestCombatantBuilder::new(25, 50)
///     .with_moves(&[85])
///     .with_status(StatusCondition::Paralysis)
///     .build();
/// ```
pub struct TestCombatantBuilder {
    species: u16,
    level: u8,
    moves: Vec<u16>,
    stats: Option<Stats>,
    current_hp: Option<u16>,
    ability: Option<u16>,
    held_item: Option<u16>,
    status: Option<StatusCondition>,
}

impl TestCombatantBuilder {
    /// Creates a new builder for a given species id and level.
    pub fn new(species: u16, level: u8) -> Self {
        Self {
            species,
            level,
            moves: vec![33],
            stats: None,
            current_hp: None,
            ability: None,
            held_item: None,
            status: None,
        }
    }

    /// Sets the move ids. PP starts full.
    pub fn with_moves(mut self, moves: &[u16]) -> Self {
        self.moves = moves.to_vec();
        self
    }

    /// Overrides the level-derived stat line.
    pub fn with_stats(mut self, stats: Stats) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Sets the current HP. If not set, HP will be max.
    pub fn with_hp(mut self, hp: u16) -> Self {
        self.current_hp = Some(hp);
        self
    }

    pub fn with_ability(mut self, ability: u16) -> Self {
        self.ability = Some(ability);
        self
    }

    pub fn with_item(mut self, item: u16) -> Self {
        self.held_item = Some(item);
        self
    }

    pub fn with_status(mut self, status: StatusCondition) -> Self {
        self.status = Some(status);
        self
    }

    pub fn build(self) -> CombatantSnapshot {
        self.build_with(&test_content())
    }

    /// Builds against a specific repository, for tests that add moves.
    pub fn build_with(self, content: &dyn ContentRepository) -> CombatantSnapshot {
        let moves: Vec<MoveId> = self.moves.iter().map(|id| MoveId(*id)).collect();
        let mut snapshot = match CombatantSnapshot::from_species(content, SpeciesId(self.species), self.level, &moves) {
            Ok(snapshot) => snapshot,
            Err(err) => panic!("failed to build species {}: {}", self.species, err),
        };
        if let Some(stats) = self.stats {
            snapshot.stats = stats;
            snapshot.current_hp = stats.hp;
        }
        if let Some(hp) = self.current_hp {
            snapshot.current_hp = hp;
        }
        snapshot.ability = self.ability;
        snapshot.held_item = self.held_item;
        snapshot.status = self.status;
        snapshot
    }
}

/// Uniform stat line: `hp` plus every other stat at `value`.
pub fn flat_stats(hp: u16, value: u16) -> Stats {
    Stats::new(hp, value, value, value, value, value)
}

/// Every roll comes up 50: no crits, no secondary effects below 50%,
/// full accuracy, and the player wins speed ties.
pub fn predictable_rng() -> TurnRng {
    TurnRng::new_for_test(vec![50])
}

pub fn create_test_battle(player: CombatantSnapshot, opponent: CombatantSnapshot) -> BattleState {
    create_battle_with_rng(player, opponent, predictable_rng())
}

pub fn create_battle_with_rng(player: CombatantSnapshot, opponent: CombatantSnapshot, rng: TurnRng) -> BattleState {
    create_battle_with_content(&test_content(), player, opponent, rng)
}

pub fn create_battle_with_content(
    content: &dyn ContentRepository,
    player: CombatantSnapshot,
    opponent: CombatantSnapshot,
    rng: TurnRng,
) -> BattleState {
    match BattleState::new(content, player, opponent, BattleConfig::default(), rng) {
        Ok(state) => state,
        Err(err) => panic!("failed to create test battle: {}", err),
    }
}

/// A test-only move cloned from Struggle's shape and overridden per test.
pub fn custom_move(id: u16, name: &str, configure: impl FnOnce(&mut MoveData)) -> MoveData {
    let mut data = MoveData {
        id: MoveId(id),
        name: name.to_string(),
        pp: 10,
        accuracy: Some(100),
        contact: false,
        ..MoveData::struggle()
    };
    configure(&mut data);
    data
}

pub fn hp_of(state: &BattleState, side: Side) -> u16 {
    state.combatant(side).current_hp()
}

pub fn move_slot(state: &BattleState, side: Side, index: usize) -> MoveSlot {
    state.combatant(side).to_snapshot().moves[index]
}
