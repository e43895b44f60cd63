// In: src/battle/move_effects/damage_effects.rs

// --- IMPORTS ---
use super::{EffectContext, Hit, MoveOutcome, SecondaryEffect};
use crate::battle::combatant::MoveInfo;
use crate::battle::damage;
use crate::battle::logger::BattleLogger;
use crate::battle::state::BattleState;

/// Number of hits for a multi-hit move. 2-5 hit moves use the 33/33/17/17
/// distribution; any other range is uniform.
pub(super) fn hit_count(state: &mut BattleState, mv: &MoveInfo) -> u8 {
    let min = mv.meta.min_hits.unwrap_or(1).max(1);
    let max = mv.meta.max_hits.unwrap_or(min).max(min);
    match (min, max) {
        (2, 5) => match state.rng.next_outcome("Multi-Hit Count") {
            1..=33 => 2,
            34..=66 => 3,
            67..=83 => 4,
            _ => 5,
        },
        _ if max > min => state.rng.range_inclusive(min, max, "Multi-Hit Count"),
        _ => min,
    }
}

/// Rolls damage for every hit. Accuracy was already checked for the first
/// hit; later hits always connect. Stops once the defender would be at 0 HP
/// or the move turns out to have no effect.
pub(super) fn roll_hits(
    state: &mut BattleState,
    context: &EffectContext,
    outcome: &mut MoveOutcome,
    logger: &mut dyn BattleLogger,
) {
    let hits = hit_count(state, &context.mv);
    let mut remaining = state.combatant(context.defender).current_hp();

    for index in 0..hits {
        let roll = damage::compute(state, context.attacker, &context.mv, logger);
        if index == 0 {
            outcome.effectiveness = roll.effectiveness;
        }
        if roll.effectiveness == 0.0 {
            break;
        }

        let damage = (roll.raw_damage.floor() as u16).max(1).min(remaining);
        outcome.hits.push(Hit {
            damage,
            is_crit: roll.is_crit,
        });
        outcome.is_crit |= roll.is_crit;
        outcome.damage += damage;
        remaining -= damage;
        if remaining == 0 {
            break;
        }
    }
}

/// Pure heal: a percentage of the user's max HP.
pub(super) fn heal_effects(context: &EffectContext, state: &BattleState) -> Vec<SecondaryEffect> {
    let user = state.combatant(context.attacker);
    let percent = context.mv.meta.healing.max(0) as u32;
    if percent == 0 || user.current_hp() >= user.max_hp() {
        return Vec::new();
    }
    let amount = ((user.max_hp() as u32 * percent / 100) as u16).max(1);
    vec![SecondaryEffect::Heal {
        target: context.attacker,
        amount,
    }]
}

/// Positive drain heals the user by a share of the damage dealt; negative
/// drain is recoil.
pub(super) fn drain_effects(context: &EffectContext, damage_dealt: u16) -> Vec<SecondaryEffect> {
    let drain = context.mv.meta.drain;
    if drain == 0 || damage_dealt == 0 {
        return Vec::new();
    }
    let amount = ((damage_dealt as u32 * drain.unsigned_abs() as u32 / 100) as u16).max(1);
    let effect = if drain > 0 {
        SecondaryEffect::Heal {
            target: context.attacker,
            amount,
        }
    } else {
        SecondaryEffect::Damage {
            target: context.attacker,
            amount,
        }
    };
    vec![effect]
}
