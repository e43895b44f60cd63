// In: src/battle/move_effects/stat_effects.rs

// --- IMPORTS ---
use super::status_effects::effect_chance;
use super::{EffectContext, SecondaryEffect};
use crate::battle::logger::BattleLogger;
use crate::battle::state::{BattleState, Side};
use crate::battle::stats::{MAX_STAGE, MIN_STAGE};
use schema::StatType;
use tracing::trace;

/// Every stat change the move lists, behind a single chance roll.
pub(super) fn stat_change_effects(
    context: &EffectContext,
    state: &mut BattleState,
    target: Side,
    pure: bool,
) -> Vec<SecondaryEffect> {
    let changes = &context.mv.meta.stat_changes;
    if changes.is_empty() {
        return Vec::new();
    }
    let chance = effect_chance(context.mv.meta.stat_chance, pure);
    if !state.rng.chance(chance, "Stat Change Chance") {
        return Vec::new();
    }
    changes
        .iter()
        .map(|change| SecondaryEffect::StatChange {
            target,
            stat: change.stat,
            change: change.change,
        })
        .collect()
}

fn describe_change(delta: i8) -> &'static str {
    match delta {
        1 => "rose",
        2 => "rose sharply",
        d if d >= 3 => "rose drastically",
        -1 => "fell",
        -2 => "harshly fell",
        _ => "severely fell",
    }
}

/// Moves a stat stage, narrating the result. A change that would push past
/// the cap leaves the stage unchanged and returns false.
pub fn apply_stat_change(
    state: &mut BattleState,
    side: Side,
    stat: StatType,
    delta: i8,
    logger: &mut dyn BattleLogger,
) -> bool {
    if delta == 0 {
        return false;
    }
    let combatant = state.combatant_mut(side);
    let current = combatant.stage(stat);
    if (delta > 0 && current >= MAX_STAGE) || (delta < 0 && current <= MIN_STAGE) {
        let direction = if delta > 0 { "higher" } else { "lower" };
        logger.log(&format!("{}'s {} won't go any {}!", combatant.name, stat, direction));
        return false;
    }

    let new_stage = combatant.change_stage(stat, delta);
    trace!(%side, %stat, from = current, to = new_stage, "stat stage changed");
    logger.log(&format!("{}'s {} {}!", combatant.name, stat, describe_change(new_stage - current)));
    true
}
