//! Type effectiveness, critical hits and the damage formula.
//!
//! Every modifier layer outside the core formula (abilities, items,
//! weather) reaches the calculation through `on_damage_calc` hooks, which
//! may rewrite any field of [`DamageParams`].

use crate::battle::combatant::MoveInfo;
use crate::battle::effects::{self, DamageContext};
use crate::battle::hooks::{self, HookKind};
use crate::battle::logger::{BattleLogger, NoOpBattleLogger};
use crate::battle::state::{BattleState, HookHolder, Side};
use schema::{DamageClass, PokemonType, TypeChart};
use tracing::trace;

/// The mutable parameter set threaded through `on_damage_calc` hooks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageParams {
    pub power: f64,
    pub effectiveness: f64,
    pub stab: f64,
    pub crit_mod: f64,
    pub is_crit: bool,
    pub is_immune: bool,
    /// Set by the attacker's Mold Breaker; defender abilities check it.
    pub ignore_abilities: bool,
}

impl Default for DamageParams {
    fn default() -> Self {
        Self {
            power: 0.0,
            effectiveness: 1.0,
            stab: 1.0,
            crit_mod: 1.0,
            is_crit: false,
            is_immune: false,
            ignore_abilities: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageRoll {
    pub raw_damage: f64,
    pub effectiveness: f64,
    pub is_crit: bool,
}

impl DamageRoll {
    pub const IMMUNE: DamageRoll = DamageRoll {
        raw_damage: 0.0,
        effectiveness: 0.0,
        is_crit: false,
    };
}

/// What the AI sees: no crit, no random spread, same hook layering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageEstimate {
    pub damage: f64,
    pub effectiveness: f64,
    pub stab: f64,
}

pub fn type_effectiveness(chart: &TypeChart, move_type: PokemonType, defender_types: &[PokemonType]) -> f64 {
    chart.effectiveness(move_type, defender_types)
}

/// `((2L/5 + 2) * power * atk/def) / 50 + 2`, with defense floored at 1.
pub fn formula(level: u8, power: f64, attack: u16, defense: u16) -> f64 {
    let level_factor = 2.0 * level as f64 / 5.0 + 2.0;
    let defense = defense.max(1) as f64;
    (level_factor * power * attack as f64 / defense) / 50.0 + 2.0
}

/// Attack and defense stats for a move's damage class, after stages and
/// stat hooks.
fn attack_and_defense(state: &BattleState, attacker: Side, mv: &MoveInfo) -> (u16, u16) {
    let attacking = state.effective_stats(attacker);
    let defending = state.effective_stats(attacker.opponent());
    match mv.damage_class {
        DamageClass::Special => (attacking.special_attack, defending.special_defense),
        DamageClass::Physical | DamageClass::Status => (attacking.attack, defending.defense),
    }
}

fn base_params(state: &BattleState, attacker: Side, mv: &MoveInfo) -> DamageParams {
    let defender = state.combatant(attacker.opponent());
    let stab = if mv.move_type != PokemonType::Typeless && state.combatant(attacker).has_type(mv.move_type) {
        state.config.stab_multiplier
    } else {
        1.0
    };
    DamageParams {
        power: mv.power.unwrap_or(0) as f64,
        effectiveness: type_effectiveness(&state.type_chart, mv.move_type, &defender.types),
        stab,
        ..DamageParams::default()
    }
}

/// Runs `on_damage_calc` over the attacker's hooks, then the defender's,
/// then the field's.
pub fn dispatch_damage_calc(
    state: &mut BattleState,
    context: &DamageContext,
    params: DamageParams,
    logger: &mut dyn BattleLogger,
) -> DamageParams {
    let holders = [
        HookHolder::Combatant(context.attacker),
        HookHolder::Combatant(context.defender),
        HookHolder::Field,
    ];
    holders.into_iter().fold(params, |current, holder| {
        hooks::dispatch_value(state, holder, HookKind::OnDamageCalc, current, |state, entry, value| {
            effects::on_damage_calc(state, holder, entry.owner, context, value, logger)
        })
    })
}

/// Rolls crit and spread, layers the hooks, and applies the formula.
///
/// An effectiveness of 0 (or an immunity flag raised by a hook) returns
/// [`DamageRoll::IMMUNE`] without touching the formula.
pub fn compute(state: &mut BattleState, attacker: Side, mv: &MoveInfo, logger: &mut dyn BattleLogger) -> DamageRoll {
    let defender = attacker.opponent();
    let mut params = base_params(state, attacker, mv);

    // --- Step 1: Critical hit and random spread ---
    let crit_chance = state.config.crit_chance * 2f64.powi(mv.meta.crit_rate as i32);
    params.is_crit = state.rng.next_unit("Critical Hit") < crit_chance;
    if params.is_crit {
        params.crit_mod = state.config.crit_multiplier;
    }
    let floor = state.config.random_floor;
    let random_factor = floor + state.rng.next_unit("Damage Spread") * (1.0 - floor);

    // --- Step 2: Hook layering ---
    let context = DamageContext {
        attacker,
        defender,
        mv: mv.clone(),
    };
    let params = dispatch_damage_calc(state, &context, params, logger);
    if params.is_immune || params.effectiveness == 0.0 {
        trace!(%attacker, move_id = %mv.id, "damage short-circuited by immunity");
        return DamageRoll::IMMUNE;
    }

    // --- Step 3: Formula ---
    let (attack, defense) = attack_and_defense(state, attacker, mv);
    let level = state.combatant(attacker).level;
    let base = formula(level, params.power, attack, defense);
    let raw_damage = base * params.effectiveness * params.stab * params.crit_mod * random_factor;

    trace!(
        %attacker,
        move_id = %mv.id,
        power = params.power,
        attack,
        defense,
        effectiveness = params.effectiveness,
        stab = params.stab,
        crit = params.is_crit,
        random_factor,
        raw_damage,
        "damage computed"
    );
    if logger.should_log_details() {
        logger.log(&format!(
            "(power {:.1}, atk {}, def {}, x{:.2} type, x{:.2} stab, x{:.2} crit, x{:.3} roll = {:.1})",
            params.power,
            attack,
            defense,
            params.effectiveness,
            params.stab,
            params.crit_mod,
            random_factor,
            raw_damage
        ));
    }

    DamageRoll {
        raw_damage,
        effectiveness: params.effectiveness,
        is_crit: params.is_crit,
    }
}

/// Effectiveness of a non-damaging move against the opponent: the type chart
/// layered through the same `on_damage_calc` hooks as [`compute`], with no
/// crit or spread rolls. 0 means the move has no effect.
pub fn status_move_effectiveness(
    state: &mut BattleState,
    attacker: Side,
    mv: &MoveInfo,
    logger: &mut dyn BattleLogger,
) -> f64 {
    let context = DamageContext {
        attacker,
        defender: attacker.opponent(),
        mv: mv.clone(),
    };
    let params = base_params(state, attacker, mv);
    let params = dispatch_damage_calc(state, &context, params, logger);
    if params.is_immune {
        0.0
    } else {
        params.effectiveness
    }
}

/// Self-hit damage for confusion: a typeless 40-power physical hit using the
/// combatant's own attack and defense, with no crit or spread.
pub fn confusion_damage(state: &BattleState, side: Side) -> u16 {
    let stats = state.effective_stats(side);
    let level = state.combatant(side).level;
    let damage = formula(level, 40.0, stats.attack, stats.defense).floor();
    (damage as u16).max(1)
}

/// Side-effect-free damage estimate for move scoring. Hooks run against a
/// throwaway copy of the battle with narration discarded.
pub fn expected_damage(state: &BattleState, attacker: Side, mv: &MoveInfo) -> DamageEstimate {
    let mut simulation = state.clone();
    let mut logger = NoOpBattleLogger;
    let context = DamageContext {
        attacker,
        defender: attacker.opponent(),
        mv: mv.clone(),
    };
    let params = base_params(&simulation, attacker, mv);
    let params = dispatch_damage_calc(&mut simulation, &context, params, &mut logger);
    if params.is_immune || params.effectiveness == 0.0 {
        return DamageEstimate {
            damage: 0.0,
            effectiveness: 0.0,
            stab: params.stab,
        };
    }

    let (attack, defense) = attack_and_defense(&simulation, attacker, mv);
    let level = simulation.combatant(attacker).level;
    DamageEstimate {
        damage: formula(level, params.power, attack, defense) * params.effectiveness * params.stab,
        effectiveness: params.effectiveness,
        stab: params.stab,
    }
}
