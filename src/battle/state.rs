use crate::battle::combatant::{CombatantSnapshot, CombatantState};
use crate::battle::effects::{self, EffectId};
use crate::battle::hooks::{HookHost, HookKind, HookRegistry};
use crate::battle::stats;
use crate::config::BattleConfig;
use crate::content::ContentRepository;
use crate::errors::BattleResult;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use schema::{TypeChart, WeatherKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::trace;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Player,
    Opponent,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Player, Side::Opponent];

    pub fn index(self) -> usize {
        match self {
            Side::Player => 0,
            Side::Opponent => 1,
        }
    }

    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Opponent,
            Side::Opponent => Side::Player,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Player => write!(f, "Player"),
            Side::Opponent => write!(f, "Opponent"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattlePhase {
    BattleStart,
    TurnLoop,
    BattleEnd,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    UseMove { move_index: usize },
    /// Only legal when no move has PP left.
    Struggle,
    Forfeit,
}

/// Addresses one of the registries a battle owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookHolder {
    Combatant(Side),
    Field,
}

/// Battle-scoped, non-combatant state: weather and its hooks.
#[derive(Debug, Clone, Default)]
pub struct FieldState {
    pub weather: Option<WeatherKind>,
    pub weather_turns: u8,
    pub hooks: HookRegistry,
}

#[derive(Debug, Clone)]
enum RngSource {
    Seeded(StdRng),
    Scripted { outcomes: Vec<u8>, index: usize },
}

/// The single source of randomness for a battle.
///
/// Every draw is a percent roll in `1..=100` (or derived from one). Scripted
/// mode replays a fixed list, cycling when it runs out.
#[derive(Debug, Clone)]
pub struct TurnRng {
    source: RngSource,
}

impl TurnRng {
    pub fn seeded(seed: u64) -> Self {
        Self {
            source: RngSource::Seeded(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn new_random() -> Self {
        Self {
            source: RngSource::Seeded(StdRng::from_os_rng()),
        }
    }

    pub fn new_for_test(outcomes: Vec<u8>) -> Self {
        Self {
            source: RngSource::Scripted { outcomes, index: 0 },
        }
    }

    pub fn next_outcome(&mut self, reason: &str) -> u8 {
        let outcome = match &mut self.source {
            RngSource::Seeded(rng) => rng.random_range(1..=100),
            RngSource::Scripted { outcomes, index } => {
                let outcome = if outcomes.is_empty() {
                    50
                } else {
                    outcomes[*index % outcomes.len()].clamp(1, 100)
                };
                *index += 1;
                outcome
            }
        };
        trace!(outcome, reason, "rng draw");
        outcome
    }

    /// True with `percent`% probability. 0 and 100+ are decided without a draw.
    pub fn chance(&mut self, percent: u8, reason: &str) -> bool {
        match percent {
            0 => false,
            _ if percent >= 100 => true,
            _ => self.next_outcome(reason) <= percent,
        }
    }

    /// Uniform value in [0, 1).
    pub fn next_unit(&mut self, reason: &str) -> f64 {
        if let RngSource::Seeded(rng) = &mut self.source {
            let value: f64 = rng.random();
            trace!(value, reason, "rng draw");
            return value;
        }
        (self.next_outcome(reason) - 1) as f64 / 100.0
    }

    pub fn range_inclusive(&mut self, low: u8, high: u8, reason: &str) -> u8 {
        if high <= low {
            return low;
        }
        if let RngSource::Seeded(rng) = &mut self.source {
            let value = rng.random_range(low..=high);
            trace!(value, reason, "rng draw");
            return value;
        }
        let span = (high - low) as u16 + 1;
        let outcome = self.next_outcome(reason) as u16;
        low + ((outcome - 1) % span) as u8
    }
}

#[derive(Debug, Clone)]
pub struct BattleState {
    pub combatants: [CombatantState; 2],
    pub field: FieldState,
    pub type_chart: Arc<TypeChart>,
    pub config: Arc<BattleConfig>,
    pub turn_number: u32,
    pub phase: BattlePhase,
    pub winner: Option<Side>,
    pub action_queue: [Option<PlayerAction>; 2],
    pub rng: TurnRng,
}

impl BattleState {
    /// Snapshots both combatants and installs the hooks of any pre-existing
    /// status, ability and held item.
    pub fn new(
        content: &dyn ContentRepository,
        player: CombatantSnapshot,
        opponent: CombatantSnapshot,
        config: BattleConfig,
        rng: TurnRng,
    ) -> BattleResult<Self> {
        let player = CombatantState::from_snapshot(content, Side::Player, player)?;
        let opponent = CombatantState::from_snapshot(content, Side::Opponent, opponent)?;

        let mut state = Self {
            combatants: [player, opponent],
            field: FieldState::default(),
            type_chart: Arc::new(content.get_type_chart()),
            config: Arc::new(config),
            turn_number: 1,
            phase: BattlePhase::BattleStart,
            winner: None,
            action_queue: [None, None],
            rng,
        };

        for side in Side::BOTH {
            let combatant = state.combatant(side);
            let mut owners: Vec<EffectId> = Vec::new();
            if let Some(status) = &combatant.status {
                owners.push(EffectId::Status(status.kind()));
            }
            if let Some(ability) = combatant.ability {
                owners.push(EffectId::Ability(ability));
            }
            if let Some(kind) = combatant.held_item.as_ref().and_then(|item| item.kind) {
                owners.push(EffectId::Item(kind));
            }
            for owner in owners {
                effects::attach(&mut state.combatant_mut(side).hooks, owner);
            }
        }

        Ok(state)
    }

    pub fn combatant(&self, side: Side) -> &CombatantState {
        &self.combatants[side.index()]
    }

    pub fn combatant_mut(&mut self, side: Side) -> &mut CombatantState {
        &mut self.combatants[side.index()]
    }

    pub fn is_over(&self) -> bool {
        self.phase == BattlePhase::BattleEnd
    }

    /// Stage-adjusted stats passed through the combatant's and the field's
    /// `on_stat_calc` hooks.
    pub fn effective_stats(&self, side: Side) -> schema::Stats {
        let combatant = self.combatant(side);
        let staged = stats::effective_stats(&combatant.stats, &combatant.stat_stages);
        let adjusted = combatant.hooks.fold(HookKind::OnStatCalc, staged, |entry, current| {
            effects::on_stat_calc(self, side, entry.owner, current)
        });
        self.field.hooks.fold(HookKind::OnStatCalc, adjusted, |entry, current| {
            effects::on_stat_calc(self, side, entry.owner, current)
        })
    }

    pub fn effective_speed(&self, side: Side) -> u16 {
        self.effective_stats(side).speed
    }

    pub fn end_battle(&mut self, winner: Option<Side>) {
        self.phase = BattlePhase::BattleEnd;
        self.winner = winner;
        self.action_queue = [None, None];
    }
}

impl HookHost for BattleState {
    type Holder = HookHolder;

    fn registry(&self, holder: HookHolder) -> &HookRegistry {
        match holder {
            HookHolder::Combatant(side) => &self.combatant(side).hooks,
            HookHolder::Field => &self.field.hooks,
        }
    }

    fn registry_mut(&mut self, holder: HookHolder) -> &mut HookRegistry {
        match holder {
            HookHolder::Combatant(side) => &mut self.combatant_mut(side).hooks,
            HookHolder::Field => &mut self.field.hooks,
        }
    }
}
