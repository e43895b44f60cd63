// In: src/battle/effects/mod.rs
//
// Status conditions, volatile conditions, abilities, held items and weather
// share one plugin shape: an `EffectId` names the plugin, `hook_specs` lists
// the hooks it installs, and the per-kind functions below route a fired hook
// back to the plugin's behavior.

// --- 1. PLUGIN FAMILIES ---
pub mod abilities;
pub mod items;
pub mod status;
pub mod volatile;

// --- 2. IMPORTS ---
use crate::battle::combatant::MoveInfo;
use crate::battle::damage::DamageParams;
use crate::battle::hooks::{HookKind, HookRegistry};
use crate::battle::logger::BattleLogger;
use crate::battle::state::{BattleState, HookHolder, Side};
use crate::battle::weather;
use schema::{Stats, WeatherKind};

pub use abilities::Ability;
pub use items::{HeldItem, HeldItemKind};
pub use status::{StatusCondition, StatusKind};
pub use volatile::{VolatileCondition, VolatileKind};

// --- 3. IDENTITY AND HOOK TABLES ---

/// Identifies the plugin that owns a hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectId {
    Status(StatusKind),
    Volatile(VolatileKind),
    Ability(Ability),
    Item(HeldItemKind),
    Weather(WeatherKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HookSpec {
    pub kind: HookKind,
    pub priority: i32,
    pub persistent: bool,
}

pub(crate) const fn hook(kind: HookKind, priority: i32) -> HookSpec {
    HookSpec {
        kind,
        priority,
        persistent: true,
    }
}

pub(crate) const fn single_use_hook(kind: HookKind, priority: i32) -> HookSpec {
    HookSpec {
        kind,
        priority,
        persistent: false,
    }
}

impl EffectId {
    pub fn label(&self) -> String {
        match self {
            EffectId::Status(kind) => format!("status:{}", kind.label()),
            EffectId::Volatile(kind) => format!("volatile:{}", kind.label()),
            EffectId::Ability(ability) => format!("ability:{}", ability.label()),
            EffectId::Item(kind) => format!("item:{}", kind.label()),
            EffectId::Weather(kind) => format!("weather:{}", weather::label(*kind)),
        }
    }

    pub fn hook_name(&self, kind: HookKind) -> String {
        format!("{}:{}", self.label(), kind.label())
    }

    pub fn hook_specs(&self) -> &'static [HookSpec] {
        match self {
            EffectId::Status(kind) => kind.hook_specs(),
            EffectId::Volatile(kind) => kind.hook_specs(),
            EffectId::Ability(ability) => ability.hook_specs(),
            EffectId::Item(kind) => kind.hook_specs(),
            EffectId::Weather(kind) => weather::hook_specs(*kind),
        }
    }
}

/// Registers every hook the plugin declares.
pub fn attach(registry: &mut HookRegistry, owner: EffectId) {
    for spec in owner.hook_specs() {
        registry.register(
            spec.kind,
            owner.hook_name(spec.kind),
            owner,
            spec.priority,
            spec.persistent,
        );
    }
}

/// Unregisters the same hook names `attach` registered.
pub fn detach(registry: &mut HookRegistry, owner: EffectId) {
    for spec in owner.hook_specs() {
        registry.unregister(spec.kind, &owner.hook_name(spec.kind));
    }
}

// --- 4. HOOK CONTEXTS ---

#[derive(Debug, Clone)]
pub struct BeforeMoveContext {
    /// `None` for Struggle.
    pub move_index: Option<usize>,
    pub mv: MoveInfo,
}

#[derive(Debug, Clone)]
pub struct DamageContext {
    pub attacker: Side,
    pub defender: Side,
    pub mv: MoveInfo,
}

#[derive(Debug, Clone)]
pub struct AfterDamageContext {
    pub attacker: Side,
    pub defender: Side,
    pub mv: MoveInfo,
    pub damage: u16,
}

#[derive(Debug, Clone)]
pub struct PriorityContext {
    pub mv: MoveInfo,
}

// --- 5. ROUTING ---

pub fn before_move(
    state: &mut BattleState,
    side: Side,
    owner: EffectId,
    context: &BeforeMoveContext,
    logger: &mut dyn BattleLogger,
) -> bool {
    match owner {
        EffectId::Status(kind) => status::before_move(state, side, kind, context, logger),
        EffectId::Volatile(kind) => volatile::before_move(state, side, kind, context, logger),
        EffectId::Item(kind) => items::before_move(state, side, kind, context, logger),
        EffectId::Ability(_) | EffectId::Weather(_) => true,
    }
}

/// Read-only: stat calculation never mutates the battle.
pub fn on_stat_calc(state: &BattleState, subject: Side, owner: EffectId, stats: Stats) -> Stats {
    match owner {
        EffectId::Status(kind) => status::on_stat_calc(state, subject, kind, stats),
        EffectId::Ability(ability) => abilities::on_stat_calc(state, subject, ability, stats),
        EffectId::Item(kind) => items::on_stat_calc(kind, stats),
        EffectId::Weather(kind) => weather::on_stat_calc(state, subject, kind, stats),
        EffectId::Volatile(_) => stats,
    }
}

pub fn on_damage_calc(
    state: &mut BattleState,
    holder: HookHolder,
    owner: EffectId,
    context: &DamageContext,
    params: DamageParams,
    logger: &mut dyn BattleLogger,
) -> DamageParams {
    match (holder, owner) {
        (HookHolder::Combatant(side), EffectId::Ability(ability)) => {
            abilities::on_damage_calc(state, side, ability, context, params, logger)
        }
        (HookHolder::Combatant(side), EffectId::Item(kind)) => items::on_damage_calc(side, kind, context, params),
        (_, EffectId::Weather(kind)) => weather::on_damage_calc(kind, context, params),
        _ => params,
    }
}

/// Dispatched on the defender, then the attacker. Returns whether the hook
/// took effect, which is what retires a single-use item.
pub fn after_damage(
    state: &mut BattleState,
    side: Side,
    owner: EffectId,
    context: &AfterDamageContext,
    logger: &mut dyn BattleLogger,
) -> bool {
    match owner {
        EffectId::Ability(ability) => {
            abilities::after_damage(state, side, ability, context, logger);
            true
        }
        EffectId::Item(kind) => items::after_damage(state, side, kind, context, logger),
        _ => false,
    }
}

/// `subject` is the combatant whose end-of-turn is being processed; field
/// hooks fire once per subject.
pub fn turn_end(state: &mut BattleState, subject: Side, owner: EffectId, logger: &mut dyn BattleLogger) {
    match owner {
        EffectId::Status(kind) => status::turn_end(state, subject, kind, logger),
        EffectId::Volatile(kind) => volatile::turn_end(state, subject, kind, logger),
        EffectId::Ability(ability) => abilities::turn_end(state, subject, ability, logger),
        EffectId::Item(kind) => items::turn_end(state, subject, kind, logger),
        EffectId::Weather(kind) => weather::turn_end(state, subject, kind, logger),
    }
}

pub fn on_faint(state: &mut BattleState, side: Side, owner: EffectId, logger: &mut dyn BattleLogger) {
    if let EffectId::Ability(ability) = owner {
        abilities::on_faint(state, side, ability, logger);
    }
}

pub fn on_opponent_faint(state: &mut BattleState, side: Side, owner: EffectId, logger: &mut dyn BattleLogger) {
    if let EffectId::Ability(ability) = owner {
        abilities::on_opponent_faint(state, side, ability, logger);
    }
}

/// Read-only, like stat calculation.
pub fn on_priority_calc(
    state: &BattleState,
    side: Side,
    owner: EffectId,
    context: &PriorityContext,
    priority: f64,
) -> f64 {
    match owner {
        EffectId::Ability(ability) => abilities::on_priority_calc(state, side, ability, context, priority),
        EffectId::Item(kind) => items::on_priority_calc(kind, priority),
        _ => priority,
    }
}
