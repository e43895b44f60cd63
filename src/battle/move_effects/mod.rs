// In: src/battle/move_effects/mod.rs

// --- 1. DECLARE HELPER MODULES ---
mod damage_effects;
mod special_effects;
mod stat_effects;
mod status_effects;

// --- 2. IMPORTS ---
use crate::battle::combatant::MoveInfo;
use crate::battle::damage;
use crate::battle::effects::VolatileKind;
use crate::battle::logger::BattleLogger;
use crate::battle::state::{BattleState, Side};
use crate::battle::stats;
use crate::battle::weather;
use schema::{AilmentId, MoveMetaCategory, MoveTarget, ProtectionKind, StatType, WeatherKind};
use tracing::debug;

use self::{damage_effects::*, special_effects::*, stat_effects::*, status_effects::*};

pub use self::stat_effects::apply_stat_change;
pub use self::status_effects::apply_ailment;

// --- 3. BATTLE-SPECIFIC DATA STRUCTURES ---

#[derive(Debug, Clone)]
pub struct EffectContext {
    pub attacker: Side,
    pub defender: Side,
    pub mv: MoveInfo,
}

impl EffectContext {
    pub fn new(attacker: Side, mv: MoveInfo) -> Self {
        Self {
            attacker,
            defender: attacker.opponent(),
            mv,
        }
    }

    /// The combatant a self- or opponent-targeted effect lands on.
    pub fn target_side(&self, target: MoveTarget) -> Side {
        match target {
            MoveTarget::User | MoveTarget::Field => self.attacker,
            MoveTarget::Selected => self.defender,
        }
    }
}

/// One descriptor per secondary effect, applied in order after the damage.
#[derive(Debug, Clone, PartialEq)]
pub enum SecondaryEffect {
    Ailment {
        target: Side,
        ailment: AilmentId,
        badly_poisons: bool,
    },
    StatChange {
        target: Side,
        stat: StatType,
        change: i8,
    },
    Heal {
        target: Side,
        amount: u16,
    },
    /// Recoil and other self-inflicted damage.
    Damage {
        target: Side,
        amount: u16,
    },
    Ohko {
        target: Side,
        success: bool,
    },
    Flinch {
        target: Side,
    },
    Weather {
        kind: WeatherKind,
    },
    Protect {
        target: Side,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub damage: u16,
    pub is_crit: bool,
}

/// The result of resolving one move, consumed by the turn engine.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveOutcome {
    /// Sum of `hits`.
    pub damage: u16,
    pub hits: Vec<Hit>,
    pub missed: bool,
    pub is_crit: bool,
    pub effectiveness: f64,
    /// False for all-or-nothing moves that failed, such as a missed OHKO.
    pub success: bool,
    pub effects: Vec<SecondaryEffect>,
}

impl Default for MoveOutcome {
    fn default() -> Self {
        Self {
            damage: 0,
            hits: Vec::new(),
            missed: false,
            is_crit: false,
            effectiveness: 1.0,
            success: true,
            effects: Vec::new(),
        }
    }
}

impl MoveOutcome {
    pub fn missed() -> Self {
        Self {
            missed: true,
            success: false,
            ..Self::default()
        }
    }

    pub fn failed() -> Self {
        Self {
            success: false,
            ..Self::default()
        }
    }

    pub fn is_immune(&self) -> bool {
        self.effectiveness == 0.0
    }

    pub fn hit_count(&self) -> usize {
        self.hits.len()
    }
}

// --- 4. RESOLUTION ---

/// Accuracy roll against the move's accuracy scaled by the attacker's
/// accuracy stage minus the defender's evasion stage.
pub fn move_hits(state: &mut BattleState, context: &EffectContext) -> bool {
    let Some(accuracy) = context.mv.accuracy else {
        return true;
    };
    if context.mv.target != MoveTarget::Selected {
        return true;
    }
    let stage = state.combatant(context.attacker).stage(StatType::Accuracy)
        - state.combatant(context.defender).stage(StatType::Evasion);
    let multiplier = stats::accuracy_stage_multiplier(stage.clamp(stats::MIN_STAGE, stats::MAX_STAGE));
    let threshold = (accuracy as f64 * multiplier).round().clamp(1.0, 100.0) as u8;
    state.rng.next_outcome("Accuracy Check") <= threshold
}

/// Resolves a move against the opponent: accuracy, damage for every hit,
/// then the category's secondary effects. Nothing here touches HP; the
/// engine applies the outcome.
pub fn resolve(
    state: &mut BattleState,
    attacker: Side,
    mv: &MoveInfo,
    bypass_accuracy: bool,
    logger: &mut dyn BattleLogger,
) -> MoveOutcome {
    let context = EffectContext::new(attacker, mv.clone());
    let category = mv.category();

    // --- Step 1: Accuracy ---
    if category == MoveMetaCategory::Ohko {
        return resolve_ohko(state, &context);
    }
    if !bypass_accuracy && !move_hits(state, &context) {
        debug!(%attacker, move_id = %mv.id, "move missed");
        return MoveOutcome::missed();
    }

    // --- Step 2: Damage, or the immunity check for moves that deal none ---
    let mut outcome = MoveOutcome::default();
    if category.is_damaging() {
        roll_hits(state, &context, &mut outcome, logger);
        if outcome.is_immune() {
            return outcome;
        }
    } else if mv.targets_opponent() && damage::status_move_effectiveness(state, attacker, mv, logger) == 0.0 {
        debug!(%attacker, move_id = %mv.id, category = category.id(), "target is immune");
        outcome.effectiveness = 0.0;
        return outcome;
    }

    // --- Step 3: Category strategy ---
    let effects = match category {
        MoveMetaCategory::Damage => Vec::new(),
        MoveMetaCategory::Ailment => ailment_effects(&context, state, true),
        MoveMetaCategory::NetGoodStats => {
            let target = context.target_side(mv.target);
            stat_change_effects(&context, state, target, true)
        }
        MoveMetaCategory::Heal => heal_effects(&context, state),
        MoveMetaCategory::DamageAilment => ailment_effects(&context, state, false),
        MoveMetaCategory::Swagger => {
            let mut effects = stat_change_effects(&context, state, context.defender, true);
            effects.extend(ailment_effects(&context, state, true));
            effects
        }
        MoveMetaCategory::DamageLower => stat_change_effects(&context, state, context.defender, false),
        MoveMetaCategory::DamageRaise => stat_change_effects(&context, state, context.attacker, false),
        MoveMetaCategory::DamageHeal => Vec::new(),
        MoveMetaCategory::Ohko => Vec::new(),
        MoveMetaCategory::WholeFieldEffect => weather_effects(&context),
        MoveMetaCategory::FieldEffect | MoveMetaCategory::ForceSwitch | MoveMetaCategory::Unique => {
            protect_effects(&context)
        }
    };
    outcome.effects.extend(effects);

    // --- Step 4: Effects riding on the damage ---
    if category.is_damaging() && outcome.damage > 0 {
        outcome.effects.extend(drain_effects(&context, outcome.damage));
        outcome.effects.extend(flinch_effects(&context, state, &outcome));
    }

    if outcome.effects.is_empty() && !category.is_damaging() {
        outcome.success = false;
    }
    outcome
}

// --- 5. APPLICATION ---

/// Applies one descriptor to the live battle. Returns whether it took hold.
pub fn apply_effect(
    state: &mut BattleState,
    source: Side,
    effect: &SecondaryEffect,
    logger: &mut dyn BattleLogger,
) -> bool {
    match *effect {
        SecondaryEffect::Ailment {
            target,
            ailment,
            badly_poisons,
        } => apply_ailment(state, target, source, ailment, badly_poisons, logger),
        SecondaryEffect::StatChange { target, stat, change } => {
            if state.combatant(target).is_fainted() {
                return false;
            }
            apply_stat_change(state, target, stat, change, logger)
        }
        SecondaryEffect::Heal { target, amount } => {
            let combatant = state.combatant_mut(target);
            if combatant.heal(amount) == 0 {
                if !combatant.is_fainted() {
                    logger.log(&format!("{}'s HP is full!", combatant.name));
                }
                return false;
            }
            logger.log(&format!("{} regained health!", combatant.name));
            true
        }
        SecondaryEffect::Damage { target, amount } => {
            let combatant = state.combatant_mut(target);
            combatant.take_damage(amount);
            logger.log(&format!("{} is damaged by recoil!", combatant.name));
            true
        }
        SecondaryEffect::Ohko { success, .. } => {
            if success {
                logger.log("It's a one-hit KO!");
            }
            success
        }
        SecondaryEffect::Flinch { target } => {
            crate::battle::effects::volatile::apply_volatile(state, target, VolatileKind::Flinch, source, logger)
        }
        SecondaryEffect::Weather { kind } => {
            let turns = state.config.weather_turns;
            weather::set_weather(state, kind, turns, logger)
        }
        SecondaryEffect::Protect { target } => {
            let combatant = state.combatant_mut(target);
            combatant.protection = Some(ProtectionKind::Protected);
            logger.log(&format!("{} protected itself!", combatant.name));
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missed_outcome_is_empty() {
        let outcome = MoveOutcome::missed();
        assert!(outcome.missed);
        assert!(!outcome.success);
        assert_eq!(outcome.hit_count(), 0);
        assert_eq!(outcome.damage, 0);
    }

    #[test]
    fn test_default_outcome_is_neutral() {
        let outcome = MoveOutcome::default();
        assert_eq!(outcome.effectiveness, 1.0);
        assert!(outcome.success);
        assert!(!outcome.is_immune());
    }
}
