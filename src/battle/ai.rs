//! Move-choosing behavior for sides nobody queued an action for.

use crate::battle::combatant::MoveInfo;
use crate::battle::damage;
use crate::battle::effects::{status, volatile, StatusKind, VolatileKind};
use crate::battle::engine;
use crate::battle::state::{BattleState, PlayerAction, Side};
use ordered_float::OrderedFloat;
use schema::{AilmentId, ChargeKind, MoveMetaCategory, MoveTarget, PokemonType};
use tracing::debug;

/// Score for a move the target is immune to.
pub const IMMUNE_SCORE: f64 = -1000.0;
/// Score for a status move when a knockout is on the table.
pub const LETHAL_FORGONE_SCORE: f64 = -900.0;
/// Categories without a scoring model yet (field effects, force switch,
/// one-off moves other than Protect).
pub const UNSCORED_CATEGORY_SCORE: f64 = -500.0;

const LETHAL_BONUS: f64 = 200.0;
const AILMENT_BASE: f64 = 30.0;
const SELF_BOOST_BASE: f64 = 12.0;
const DEBUFF_BASE: f64 = 8.0;
const HEAL_BASE: f64 = 40.0;
const OHKO_SCORE: f64 = 40.0;
const WEATHER_BASE: f64 = 15.0;
const PROTECT_SCORE: f64 = 5.0;
const CHARGE_COUNTER_BONUS: f64 = 20.0;
const CHARGE_BOOST_BONUS: f64 = 15.0;

/// A trait for any system that can decide on a battle action.
pub trait Behavior {
    /// Picks the next action for `side`. Takes the state mutably because
    /// tie-breaking jitter draws from the battle's random source.
    fn decide_action(&self, side: Side, state: &mut BattleState) -> PlayerAction;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringAI;

impl ScoringAI {
    pub fn new() -> Self {
        Self
    }

    /// Heuristic desirability of one move; higher is better.
    /// Only moves the side could actually pick this turn count toward the
    /// "knockout available" check.
    pub fn score_move(&self, state: &BattleState, side: Side, mv: &MoveInfo) -> f64 {
        let lethal_available = legal_candidates(state, side)
            .iter()
            .filter(|(_, other)| other.id != mv.id)
            .any(|(_, other)| would_knock_out(state, side, other));
        self.score_with_context(state, side, mv, lethal_available)
    }

    fn score_with_context(&self, state: &BattleState, side: Side, mv: &MoveInfo, lethal_available: bool) -> f64 {
        let attacker = state.combatant(side);
        let defender = state.combatant(side.opponent());
        let category = mv.category();

        // --- Step 1: Category score ---
        let aimed_status_move = mv.targets_opponent()
            && matches!(
                category,
                MoveMetaCategory::Ailment | MoveMetaCategory::Swagger | MoveMetaCategory::NetGoodStats
            );
        if aimed_status_move && damage::expected_damage(state, side, mv).effectiveness == 0.0 {
            return IMMUNE_SCORE;
        }
        let score = match category {
            c if c.is_damaging() => return score_damaging(state, side, mv),
            MoveMetaCategory::Ohko => {
                let immune = damage::type_effectiveness(&state.type_chart, mv.move_type, &defender.types) == 0.0;
                if immune {
                    return IMMUNE_SCORE;
                }
                if attacker.level < defender.level {
                    0.0
                } else {
                    OHKO_SCORE
                }
            }
            MoveMetaCategory::Ailment => score_ailment(state, side, mv),
            MoveMetaCategory::Swagger => score_ailment(state, side, mv) + DEBUFF_BASE,
            MoveMetaCategory::NetGoodStats => score_stat_changes(state, side, mv),
            MoveMetaCategory::Heal => score_heal(state, side, mv.meta.healing as f64 / 100.0),
            MoveMetaCategory::WholeFieldEffect => score_weather(state, side, mv),
            MoveMetaCategory::Unique if mv.protects => PROTECT_SCORE,
            _ => return UNSCORED_CATEGORY_SCORE,
        };

        // --- Step 2: Adjustments for non-damaging moves ---
        if lethal_available {
            return LETHAL_FORGONE_SCORE;
        }
        let mut score = score;
        if score > 0.0 {
            if attacker.hp_fraction() < 0.4 && category != MoveMetaCategory::Heal {
                score *= 0.1;
            }
            if defender.hp_fraction() < 0.25 {
                score *= 0.1;
            }
        }
        score
    }
}

impl Behavior for ScoringAI {
    fn decide_action(&self, side: Side, state: &mut BattleState) -> PlayerAction {
        let candidates = legal_candidates(state, side);
        if candidates.is_empty() {
            return PlayerAction::Struggle;
        }

        let lethal_available: Vec<bool> = candidates
            .iter()
            .map(|(_, mv)| would_knock_out(state, side, mv))
            .collect();

        let mut best: Option<(PlayerAction, OrderedFloat<f64>)> = None;
        for (index, (action, mv)) in candidates.iter().enumerate() {
            let other_lethal = lethal_available
                .iter()
                .enumerate()
                .any(|(other, lethal)| other != index && *lethal);
            let base = self.score_with_context(state, side, mv, other_lethal);
            let jitter = state.rng.next_unit("AI Jitter") * state.config.ai_jitter;
            let score = OrderedFloat(base + jitter);
            debug!(%side, move_name = %mv.name, base, score = score.0, "scored move");

            // Strictly greater keeps the first-seen candidate on ties.
            if best.as_ref().map_or(true, |(_, top)| score > *top) {
                best = Some((*action, score));
            }
        }

        best.map(|(action, _)| action).unwrap_or(PlayerAction::Struggle)
    }
}

/// Legal move actions paired with the move they use. Empty when the side can
/// only Struggle.
fn legal_candidates(state: &BattleState, side: Side) -> Vec<(PlayerAction, MoveInfo)> {
    engine::legal_moves(state, side)
        .into_iter()
        .filter_map(|action| match action {
            PlayerAction::UseMove { move_index } => state
                .combatant(side)
                .moves
                .get(move_index)
                .map(|info| (action, info.clone())),
            _ => None,
        })
        .collect()
}

fn would_knock_out(state: &BattleState, side: Side, mv: &MoveInfo) -> bool {
    mv.is_damaging() && expected_move_damage(state, side, mv) >= state.combatant(side.opponent()).current_hp() as f64
}

/// Accuracy- and hit-count-weighted damage estimate.
fn expected_move_damage(state: &BattleState, side: Side, mv: &MoveInfo) -> f64 {
    let estimate = damage::expected_damage(state, side, mv);
    let accuracy = mv.accuracy.map_or(1.0, |acc| acc as f64 / 100.0);
    let min_hits = mv.meta.min_hits.unwrap_or(1).max(1) as f64;
    let max_hits = mv.meta.max_hits.map_or(min_hits, |max| max as f64).max(min_hits);
    let hits = if (min_hits, max_hits) == (2.0, 5.0) {
        3.0
    } else {
        (min_hits + max_hits) / 2.0
    };
    estimate.damage * accuracy * hits
}

fn score_damaging(state: &BattleState, side: Side, mv: &MoveInfo) -> f64 {
    let estimate = damage::expected_damage(state, side, mv);
    if estimate.effectiveness == 0.0 {
        return IMMUNE_SCORE;
    }
    let defender = state.combatant(side.opponent());
    let expected = expected_move_damage(state, side, mv);
    let mut score = expected;
    if expected >= defender.current_hp() as f64 {
        score += LETHAL_BONUS;
    }

    // Two-turn moves pay for the idle turn but may dodge the reply.
    if let Some(charge) = mv.charge {
        score *= 0.5;
        if charge_counters(charge, &defender.types) {
            score += CHARGE_COUNTER_BONUS;
        }
        if mv.charge_boost.is_some() {
            score += CHARGE_BOOST_BONUS;
        }
    }

    match mv.category() {
        MoveMetaCategory::DamageAilment => {
            score += score_ailment(state, side, mv) * mv.meta.ailment_chance as f64 / 100.0;
        }
        MoveMetaCategory::DamageHeal => {
            score += score_heal(state, side, mv.meta.drain.max(0) as f64 / 100.0);
        }
        _ => {}
    }
    score
}

/// Types whose natural replies miss during the charge window.
fn charge_counters(charge: ChargeKind, defender_types: &[PokemonType]) -> bool {
    let countered: &[PokemonType] = match charge {
        ChargeKind::InAir => &[PokemonType::Ground, PokemonType::Fighting],
        ChargeKind::Underground => &[PokemonType::Electric, PokemonType::Flying],
        ChargeKind::Underwater => &[PokemonType::Fire],
        ChargeKind::Charge => &[],
    };
    defender_types.iter().any(|t| countered.contains(t))
}

fn score_ailment(state: &BattleState, side: Side, mv: &MoveInfo) -> f64 {
    let Some(ailment) = mv.meta.ailment else {
        return 0.0;
    };
    let target = match mv.target {
        MoveTarget::Selected => side.opponent(),
        MoveTarget::User | MoveTarget::Field => side,
    };

    let (applicable, weight) = match (StatusKind::from_ailment(ailment), VolatileKind::from_ailment(ailment)) {
        (Some(kind), _) => {
            let weight = match ailment {
                AilmentId::Paralysis | AilmentId::Burn | AilmentId::Poison => 1.5,
                _ => 1.2,
            };
            (status::can_apply(state, target, kind), weight)
        }
        (None, Some(kind)) => (volatile::can_apply(state, target, kind), 1.0),
        (None, None) => (false, 0.0),
    };
    if !applicable {
        return 0.0;
    }

    let chance = match mv.meta.ailment_chance {
        0 => 1.0,
        chance => chance as f64 / 100.0,
    };
    let accuracy = mv.accuracy.map_or(1.0, |acc| acc as f64 / 100.0);
    let healthy_bonus = 1.0 + state.combatant(target).hp_fraction();
    AILMENT_BASE * weight * chance * accuracy * healthy_bonus
}

fn score_stat_changes(state: &BattleState, side: Side, mv: &MoveInfo) -> f64 {
    let (target, self_targeted) = match mv.target {
        MoveTarget::User | MoveTarget::Field => (side, true),
        MoveTarget::Selected => (side.opponent(), false),
    };
    let combatant = state.combatant(target);
    mv.meta
        .stat_changes
        .iter()
        .map(|change| {
            let stage = combatant.stage(change.stat);
            match (self_targeted, change.change > 0) {
                (true, true) => {
                    // Diminishing returns on stacking our own boosts.
                    let headroom = (6 - stage).max(0) as f64 / 6.0;
                    SELF_BOOST_BASE * change.change as f64 * headroom
                }
                (false, false) if stage > -6 => DEBUFF_BASE * change.change.unsigned_abs() as f64,
                _ => 0.0,
            }
        })
        .sum()
}

fn score_heal(state: &BattleState, side: Side, fraction: f64) -> f64 {
    let user = state.combatant(side);
    if user.current_hp() >= user.max_hp() {
        return 0.0;
    }
    let score = HEAL_BASE * fraction;
    if user.hp_fraction() < 0.5 {
        score * 2.0
    } else {
        score
    }
}

fn score_weather(state: &BattleState, side: Side, mv: &MoveInfo) -> f64 {
    let Some(kind) = mv.weather else {
        return 0.0;
    };
    if state.field.weather == Some(kind) {
        return 0.0;
    }
    let boosted = match kind {
        schema::WeatherKind::Rain => Some(PokemonType::Water),
        schema::WeatherKind::Sun => Some(PokemonType::Fire),
        _ => None,
    };
    let benefits = boosted.is_some_and(|boosted| {
        state
            .combatant(side)
            .moves
            .iter()
            .any(|other| other.move_type == boosted && other.is_damaging())
    });
    if benefits {
        WEATHER_BASE * 2.0
    } else {
        WEATHER_BASE
    }
}
