// In: src/battle/move_effects/status_effects.rs

// --- IMPORTS ---
use super::{EffectContext, MoveOutcome, SecondaryEffect};
use crate::battle::effects::{status, volatile, StatusKind, VolatileKind};
use crate::battle::logger::BattleLogger;
use crate::battle::state::{BattleState, Side};
use schema::AilmentId;

/// A chance of 0 means "always" for moves whose whole point is the effect.
pub(super) fn effect_chance(chance: u8, pure: bool) -> u8 {
    if chance == 0 && pure {
        100
    } else {
        chance
    }
}

pub(super) fn ailment_effects(context: &EffectContext, state: &mut BattleState, pure: bool) -> Vec<SecondaryEffect> {
    let Some(ailment) = context.mv.meta.ailment else {
        return Vec::new();
    };
    let chance = effect_chance(context.mv.meta.ailment_chance, pure);
    if !state.rng.chance(chance, "Ailment Chance") {
        return Vec::new();
    }
    let target = context.target_side(context.mv.target);
    if !can_inflict(state, target, ailment) {
        return Vec::new();
    }
    vec![SecondaryEffect::Ailment {
        target,
        ailment,
        badly_poisons: context.mv.meta.badly_poisons,
    }]
}

/// An ailment that cannot take hold is never queued, so a pure ailment move
/// against an already-afflicted or immune target fails outright.
fn can_inflict(state: &BattleState, target: Side, ailment: AilmentId) -> bool {
    if ailment.is_volatile() {
        VolatileKind::from_ailment(ailment).is_some_and(|kind| volatile::can_apply(state, target, kind))
    } else {
        StatusKind::from_ailment(ailment).is_some_and(|kind| status::can_apply(state, target, kind))
    }
}

/// Flinch only matters while the target survives the hit.
pub(super) fn flinch_effects(
    context: &EffectContext,
    state: &mut BattleState,
    outcome: &MoveOutcome,
) -> Vec<SecondaryEffect> {
    let chance = context.mv.meta.flinch_chance;
    let defender_hp = state.combatant(context.defender).current_hp();
    if chance == 0 || outcome.damage >= defender_hp {
        return Vec::new();
    }
    if !state.rng.chance(chance, "Flinch Chance") {
        return Vec::new();
    }
    vec![SecondaryEffect::Flinch {
        target: context.defender,
    }]
}

/// Routes an ailment to the status or volatile plugin family.
pub fn apply_ailment(
    state: &mut BattleState,
    target: Side,
    source: Side,
    ailment: AilmentId,
    badly_poisons: bool,
    logger: &mut dyn BattleLogger,
) -> bool {
    if ailment.is_volatile() {
        return match VolatileKind::from_ailment(ailment) {
            Some(kind) => volatile::apply_volatile(state, target, kind, source, logger),
            None => false,
        };
    }
    match StatusKind::from_ailment(ailment) {
        Some(kind) => status::apply_status(state, target, kind, badly_poisons, logger),
        None => false,
    }
}
