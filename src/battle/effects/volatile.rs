use super::{hook, single_use_hook, Ability, BeforeMoveContext, EffectId, HookSpec};
use crate::battle::damage;
use crate::battle::hooks::HookKind;
use crate::battle::logger::BattleLogger;
use crate::battle::state::{BattleState, Side};
use schema::{AilmentId, PokemonType};

/// Stackable conditions. Each kind is present at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VolatileKind {
    Confusion,
    Infatuation,
    Trapped,
    LeechSeed,
    Flinch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolatileCondition {
    pub turns_remaining: Option<u8>,
    /// The combatant that inflicted it; Leech Seed heals this side.
    pub source: Option<Side>,
}

const CONFUSION_HOOKS: &[HookSpec] = &[hook(HookKind::BeforeMove, 10)];
const INFATUATION_HOOKS: &[HookSpec] = &[hook(HookKind::BeforeMove, 15)];
const TRAPPED_HOOKS: &[HookSpec] = &[hook(HookKind::TurnEnd, 25)];
const LEECH_SEED_HOOKS: &[HookSpec] = &[hook(HookKind::TurnEnd, 20)];
const FLINCH_HOOKS: &[HookSpec] = &[single_use_hook(HookKind::BeforeMove, 5)];

impl VolatileKind {
    pub fn id(self) -> u8 {
        match self {
            VolatileKind::Confusion => 6,
            VolatileKind::Infatuation => 7,
            VolatileKind::Trapped => 8,
            VolatileKind::LeechSeed => 18,
            VolatileKind::Flinch => 100,
        }
    }

    pub fn from_ailment(ailment: AilmentId) -> Option<Self> {
        match ailment {
            AilmentId::Confusion => Some(VolatileKind::Confusion),
            AilmentId::Infatuation => Some(VolatileKind::Infatuation),
            AilmentId::Trap => Some(VolatileKind::Trapped),
            AilmentId::LeechSeed => Some(VolatileKind::LeechSeed),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            VolatileKind::Confusion => "confusion",
            VolatileKind::Infatuation => "infatuation",
            VolatileKind::Trapped => "trapped",
            VolatileKind::LeechSeed => "leech-seed",
            VolatileKind::Flinch => "flinch",
        }
    }

    pub(crate) fn hook_specs(self) -> &'static [HookSpec] {
        match self {
            VolatileKind::Confusion => CONFUSION_HOOKS,
            VolatileKind::Infatuation => INFATUATION_HOOKS,
            VolatileKind::Trapped => TRAPPED_HOOKS,
            VolatileKind::LeechSeed => LEECH_SEED_HOOKS,
            VolatileKind::Flinch => FLINCH_HOOKS,
        }
    }
}

pub fn can_apply(state: &BattleState, side: Side, kind: VolatileKind) -> bool {
    let target = state.combatant(side);
    if target.is_fainted() || target.has_volatile(kind) {
        return false;
    }
    match kind {
        VolatileKind::LeechSeed => !target.has_type(PokemonType::Grass),
        VolatileKind::Confusion => !target.has_ability(Ability::OwnTempo),
        _ => true,
    }
}

/// Applies a volatile condition. Already-active kinds are left untouched.
pub fn apply_volatile(
    state: &mut BattleState,
    side: Side,
    kind: VolatileKind,
    source: Side,
    logger: &mut dyn BattleLogger,
) -> bool {
    if !can_apply(state, side, kind) {
        return false;
    }

    let turns_remaining = match kind {
        VolatileKind::Confusion => {
            let (low, high) = state.config.confusion_turns;
            Some(state.rng.range_inclusive(low, high, "Confusion Duration"))
        }
        VolatileKind::Trapped => {
            let (low, high) = state.config.trap_turns;
            Some(state.rng.range_inclusive(low, high, "Trap Duration"))
        }
        _ => None,
    };

    let target = state.combatant_mut(side);
    target.volatiles.insert(
        kind,
        VolatileCondition {
            turns_remaining,
            source: Some(source),
        },
    );
    super::attach(&mut target.hooks, EffectId::Volatile(kind));

    let name = target.name.clone();
    let line = match kind {
        VolatileKind::Confusion => Some(format!("{} became confused!", name)),
        VolatileKind::Infatuation => Some(format!("{} fell in love!", name)),
        VolatileKind::Trapped => Some(format!("{} was trapped!", name)),
        VolatileKind::LeechSeed => Some(format!("{} was seeded!", name)),
        VolatileKind::Flinch => None,
    };
    if let Some(line) = line {
        logger.log(&line);
    }
    true
}

pub fn remove_volatile(state: &mut BattleState, side: Side, kind: VolatileKind) -> bool {
    let target = state.combatant_mut(side);
    if target.volatiles.remove(&kind).is_none() {
        return false;
    }
    super::detach(&mut target.hooks, EffectId::Volatile(kind));
    true
}

/// Counts a timed condition down by one and returns the turns left.
fn tick(state: &mut BattleState, side: Side, kind: VolatileKind) -> u8 {
    let Some(condition) = state.combatant_mut(side).volatiles.get_mut(&kind) else {
        return 0;
    };
    let remaining = condition.turns_remaining.unwrap_or(1).saturating_sub(1);
    condition.turns_remaining = Some(remaining);
    remaining
}

// --- Hook behavior ---

pub(super) fn before_move(
    state: &mut BattleState,
    side: Side,
    kind: VolatileKind,
    _context: &BeforeMoveContext,
    logger: &mut dyn BattleLogger,
) -> bool {
    let name = state.combatant(side).name.clone();
    match kind {
        VolatileKind::Confusion => {
            if tick(state, side, kind) == 0 {
                remove_volatile(state, side, kind);
                logger.log(&format!("{} snapped out of its confusion!", name));
                return true;
            }
            logger.log(&format!("{} is confused!", name));
            let chance = state.config.confusion_self_hit_chance;
            if !state.rng.chance(chance, "Confusion Self Hit") {
                return true;
            }
            let damage = damage::confusion_damage(state, side);
            let dealt = state.combatant_mut(side).take_damage(damage);
            logger.log("It hurt itself in its confusion!");
            if logger.should_log_details() {
                logger.log(&format!("({} took {} damage)", name, dealt));
            }
            false
        }
        VolatileKind::Infatuation => {
            let partner = state.combatant(side.opponent()).name.clone();
            logger.log(&format!("{} is in love with {}!", name, partner));
            let chance = state.config.infatuation_chance;
            if state.rng.chance(chance, "Infatuation") {
                logger.log(&format!("{} is immobilized by love!", name));
                return false;
            }
            true
        }
        VolatileKind::Flinch => {
            remove_volatile(state, side, kind);
            logger.log(&format!("{} flinched and couldn't move!", name));
            false
        }
        VolatileKind::Trapped | VolatileKind::LeechSeed => true,
    }
}

pub(super) fn turn_end(state: &mut BattleState, side: Side, kind: VolatileKind, logger: &mut dyn BattleLogger) {
    match kind {
        VolatileKind::Trapped => {
            let host = state.combatant_mut(side);
            let damage = host.fraction_of_max(16);
            host.take_damage(damage);
            logger.log(&format!("{} is hurt by the bind!", host.name));
            if tick(state, side, kind) == 0 {
                remove_volatile(state, side, kind);
                let name = &state.combatant(side).name;
                logger.log(&format!("{} was freed from the bind!", name));
            }
        }
        VolatileKind::LeechSeed => {
            let source = state
                .combatant(side)
                .volatiles
                .get(&kind)
                .and_then(|condition| condition.source)
                .unwrap_or(side.opponent());
            let host = state.combatant_mut(side);
            let damage = host.fraction_of_max(8);
            let drained = host.take_damage(damage);
            logger.log(&format!("{}'s health is sapped by Leech Seed!", host.name));
            state.combatant_mut(source).heal(drained);
        }
        _ => {}
    }
}
