use super::{hook, BeforeMoveContext, EffectId, HookSpec};
use crate::battle::hooks::HookKind;
use crate::battle::logger::BattleLogger;
use crate::battle::state::{BattleState, Side};
use schema::{AilmentId, PokemonType, Stats};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatusKind {
    Paralysis,
    Sleep,
    Freeze,
    Burn,
    Poison,
}

/// The single non-volatile status a combatant may carry, with its counter.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCondition {
    Paralysis,
    Sleep { turns_remaining: u8 },
    Freeze,
    Burn,
    /// `toxic_stacks` is 0 for regular poison.
    Poison { toxic_stacks: u8 },
}

impl StatusCondition {
    pub fn kind(&self) -> StatusKind {
        match self {
            StatusCondition::Paralysis => StatusKind::Paralysis,
            StatusCondition::Sleep { .. } => StatusKind::Sleep,
            StatusCondition::Freeze => StatusKind::Freeze,
            StatusCondition::Burn => StatusKind::Burn,
            StatusCondition::Poison { .. } => StatusKind::Poison,
        }
    }
}

const PARALYSIS_HOOKS: &[HookSpec] = &[hook(HookKind::BeforeMove, 20), hook(HookKind::OnStatCalc, 0)];
const SLEEP_HOOKS: &[HookSpec] = &[hook(HookKind::BeforeMove, 0)];
const FREEZE_HOOKS: &[HookSpec] = &[hook(HookKind::BeforeMove, 0)];
const BURN_HOOKS: &[HookSpec] = &[hook(HookKind::OnStatCalc, 0), hook(HookKind::TurnEnd, 10)];
const POISON_HOOKS: &[HookSpec] = &[hook(HookKind::TurnEnd, 10)];

impl StatusKind {
    pub fn id(self) -> u8 {
        match self {
            StatusKind::Paralysis => 1,
            StatusKind::Sleep => 2,
            StatusKind::Freeze => 3,
            StatusKind::Burn => 4,
            StatusKind::Poison => 5,
        }
    }

    fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(StatusKind::Paralysis),
            2 => Some(StatusKind::Sleep),
            3 => Some(StatusKind::Freeze),
            4 => Some(StatusKind::Burn),
            5 => Some(StatusKind::Poison),
            _ => None,
        }
    }

    pub fn from_ailment(ailment: AilmentId) -> Option<Self> {
        Self::from_id(ailment.id())
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusKind::Paralysis => "paralysis",
            StatusKind::Sleep => "sleep",
            StatusKind::Freeze => "freeze",
            StatusKind::Burn => "burn",
            StatusKind::Poison => "poison",
        }
    }

    pub(crate) fn hook_specs(self) -> &'static [HookSpec] {
        match self {
            StatusKind::Paralysis => PARALYSIS_HOOKS,
            StatusKind::Sleep => SLEEP_HOOKS,
            StatusKind::Freeze => FREEZE_HOOKS,
            StatusKind::Burn => BURN_HOOKS,
            StatusKind::Poison => POISON_HOOKS,
        }
    }

    fn immune_type(self) -> &'static [PokemonType] {
        match self {
            StatusKind::Paralysis => &[PokemonType::Electric],
            StatusKind::Sleep => &[],
            StatusKind::Freeze => &[PokemonType::Ice],
            StatusKind::Burn => &[PokemonType::Fire],
            StatusKind::Poison => &[PokemonType::Poison, PokemonType::Steel],
        }
    }
}

/// Type- or ability-based immunity, checked where a status is applied.
pub fn is_immune(state: &BattleState, side: Side, kind: StatusKind) -> bool {
    let target = state.combatant(side);
    let type_immune = kind.immune_type().iter().any(|t| target.has_type(*t));
    let ability_immune = target
        .ability
        .is_some_and(|ability| ability.blocks_status(kind));
    type_immune || ability_immune
}

/// Whether `apply_status` could succeed right now.
pub fn can_apply(state: &BattleState, side: Side, kind: StatusKind) -> bool {
    let target = state.combatant(side);
    !target.is_fainted() && target.status.is_none() && !is_immune(state, side, kind)
}

/// Applies a status if the target has none and is not immune. Returns whether
/// it took hold; re-applying the active status is a no-op.
pub fn apply_status(
    state: &mut BattleState,
    side: Side,
    kind: StatusKind,
    badly_poisons: bool,
    logger: &mut dyn BattleLogger,
) -> bool {
    if !can_apply(state, side, kind) {
        return false;
    }

    let condition = match kind {
        StatusKind::Paralysis => StatusCondition::Paralysis,
        StatusKind::Sleep => {
            let (low, high) = state.config.sleep_turns;
            StatusCondition::Sleep {
                turns_remaining: state.rng.range_inclusive(low, high, "Sleep Duration"),
            }
        }
        StatusKind::Freeze => StatusCondition::Freeze,
        StatusKind::Burn => StatusCondition::Burn,
        StatusKind::Poison => StatusCondition::Poison {
            toxic_stacks: u8::from(badly_poisons),
        },
    };
    install_status(state, side, condition);
    debug!(%side, status_id = kind.id(), "status applied");

    let name = &state.combatant(side).name;
    let line = match condition {
        StatusCondition::Paralysis => format!("{} is paralyzed! It may be unable to move!", name),
        StatusCondition::Sleep { .. } => format!("{} fell asleep!", name),
        StatusCondition::Freeze => format!("{} was frozen solid!", name),
        StatusCondition::Burn => format!("{} was burned!", name),
        StatusCondition::Poison { toxic_stacks: 0 } => format!("{} was poisoned!", name),
        StatusCondition::Poison { .. } => format!("{} was badly poisoned!", name),
    };
    logger.log(&line);
    true
}

/// Sets the status and registers its hooks without checks or narration.
pub fn install_status(state: &mut BattleState, side: Side, condition: StatusCondition) {
    let combatant = state.combatant_mut(side);
    if let Some(previous) = combatant.status.take() {
        super::detach(&mut combatant.hooks, EffectId::Status(previous.kind()));
    }
    combatant.status = Some(condition);
    super::attach(&mut combatant.hooks, EffectId::Status(condition.kind()));
}

/// Clears the status and its hooks. No-op when there is none.
pub fn remove_status(state: &mut BattleState, side: Side) -> Option<StatusCondition> {
    let combatant = state.combatant_mut(side);
    let removed = combatant.status.take()?;
    super::detach(&mut combatant.hooks, EffectId::Status(removed.kind()));
    Some(removed)
}

// --- Hook behavior ---

pub(super) fn before_move(
    state: &mut BattleState,
    side: Side,
    kind: StatusKind,
    context: &BeforeMoveContext,
    logger: &mut dyn BattleLogger,
) -> bool {
    let name = state.combatant(side).name.clone();
    match kind {
        StatusKind::Paralysis => {
            let chance = state.config.paralysis_chance;
            if state.rng.chance(chance, "Paralysis Full Stop") {
                logger.log(&format!("{} is fully paralyzed!", name));
                return false;
            }
            true
        }
        StatusKind::Sleep => {
            let Some(StatusCondition::Sleep { turns_remaining }) = state.combatant(side).status else {
                return true;
            };
            let turns_remaining = turns_remaining.saturating_sub(1);
            if turns_remaining == 0 {
                remove_status(state, side);
                logger.log(&format!("{} woke up!", name));
                return true;
            }
            state.combatant_mut(side).status = Some(StatusCondition::Sleep { turns_remaining });
            logger.log(&format!("{} is fast asleep.", name));
            false
        }
        StatusKind::Freeze => {
            let fire_attack = context.mv.move_type == PokemonType::Fire && context.mv.is_damaging();
            let chance = state.config.freeze_thaw_chance;
            if fire_attack || state.rng.chance(chance, "Freeze Thaw") {
                remove_status(state, side);
                logger.log(&format!("{} thawed out!", name));
                return true;
            }
            logger.log(&format!("{} is frozen solid!", name));
            false
        }
        StatusKind::Burn | StatusKind::Poison => true,
    }
}

pub(super) fn on_stat_calc(state: &BattleState, side: Side, kind: StatusKind, mut stats: Stats) -> Stats {
    match kind {
        StatusKind::Paralysis => stats.speed /= 2,
        StatusKind::Burn => {
            if !state.combatant(side).has_ability(super::Ability::Guts) {
                stats.attack /= 2;
            }
        }
        _ => {}
    }
    stats
}

pub(super) fn turn_end(state: &mut BattleState, side: Side, kind: StatusKind, logger: &mut dyn BattleLogger) {
    let combatant = state.combatant_mut(side);
    let (damage, line) = match (kind, combatant.status) {
        (StatusKind::Burn, _) => (
            combatant.fraction_of_max(16),
            format!("{} is hurt by its burn!", combatant.name),
        ),
        (StatusKind::Poison, Some(StatusCondition::Poison { toxic_stacks })) if toxic_stacks > 0 => {
            let damage = ((combatant.max_hp() as u32 * toxic_stacks as u32 / 16) as u16).max(1);
            combatant.status = Some(StatusCondition::Poison {
                toxic_stacks: toxic_stacks.saturating_add(1).min(15),
            });
            (damage, format!("{} is hurt by poison!", combatant.name))
        }
        (StatusKind::Poison, _) => (
            combatant.fraction_of_max(8),
            format!("{} is hurt by poison!", combatant.name),
        ),
        _ => return,
    };
    combatant.take_damage(damage);
    logger.log(&line);
}
