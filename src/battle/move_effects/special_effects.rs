// In: src/battle/move_effects/special_effects.rs

// --- IMPORTS ---
use super::{EffectContext, Hit, MoveOutcome, SecondaryEffect};
use crate::battle::damage;
use crate::battle::state::BattleState;
use tracing::debug;

/// One-hit KO: fails outright against a higher-level target, otherwise hits
/// with `30 + level difference` percent and takes all remaining HP.
pub(super) fn resolve_ohko(state: &mut BattleState, context: &EffectContext) -> MoveOutcome {
    let attacker = state.combatant(context.attacker);
    let defender = state.combatant(context.defender);
    let (attacker_level, defender_level) = (attacker.level, defender.level);
    let effectiveness = damage::type_effectiveness(&state.type_chart, context.mv.move_type, &defender.types);

    if effectiveness == 0.0 {
        return MoveOutcome {
            effectiveness,
            ..MoveOutcome::failed()
        };
    }

    let failed = MoveOutcome {
        effects: vec![SecondaryEffect::Ohko {
            target: context.defender,
            success: false,
        }],
        ..MoveOutcome::missed()
    };
    if attacker_level < defender_level {
        debug!(attacker_level, defender_level, "OHKO against a higher level always fails");
        return failed;
    }
    let chance = (30 + (attacker_level - defender_level) as u16).min(100) as u8;
    if !state.rng.chance(chance, "OHKO Accuracy") {
        return failed;
    }

    let damage = state.combatant(context.defender).current_hp();
    MoveOutcome {
        damage,
        hits: vec![Hit { damage, is_crit: false }],
        effects: vec![SecondaryEffect::Ohko {
            target: context.defender,
            success: true,
        }],
        ..MoveOutcome::default()
    }
}

pub(super) fn weather_effects(context: &EffectContext) -> Vec<SecondaryEffect> {
    context
        .mv
        .weather
        .map(|kind| vec![SecondaryEffect::Weather { kind }])
        .unwrap_or_default()
}

/// Covers the move categories with no strategy beyond an optional Protect.
pub(super) fn protect_effects(context: &EffectContext) -> Vec<SecondaryEffect> {
    if context.mv.protects {
        vec![SecondaryEffect::Protect {
            target: context.attacker,
        }]
    } else {
        Vec::new()
    }
}
