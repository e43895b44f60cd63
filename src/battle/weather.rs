//! Battle-wide weather: one active kind at a time, held on the field's own
//! hook registry with a turn countdown.

use crate::battle::damage::DamageParams;
use crate::battle::effects::{self, hook, DamageContext, EffectId, HookSpec};
use crate::battle::hooks::HookKind;
use crate::battle::logger::BattleLogger;
use crate::battle::state::{BattleState, Side};
use crate::battle::stats::scale_stat;
use schema::{PokemonType, Stats, WeatherKind};
use tracing::debug;

const BOOST_HOOKS: &[HookSpec] = &[hook(HookKind::OnDamageCalc, 0)];
const SANDSTORM_HOOKS: &[HookSpec] = &[hook(HookKind::OnStatCalc, 0), hook(HookKind::TurnEnd, 30)];
const HAIL_HOOKS: &[HookSpec] = &[hook(HookKind::TurnEnd, 30)];

pub fn label(kind: WeatherKind) -> &'static str {
    match kind {
        WeatherKind::Rain => "rain",
        WeatherKind::Sun => "sun",
        WeatherKind::Sandstorm => "sandstorm",
        WeatherKind::Hail => "hail",
    }
}

pub(crate) fn hook_specs(kind: WeatherKind) -> &'static [HookSpec] {
    match kind {
        WeatherKind::Rain | WeatherKind::Sun => BOOST_HOOKS,
        WeatherKind::Sandstorm => SANDSTORM_HOOKS,
        WeatherKind::Hail => HAIL_HOOKS,
    }
}

fn start_message(kind: WeatherKind) -> &'static str {
    match kind {
        WeatherKind::Rain => "It started to rain!",
        WeatherKind::Sun => "The sunlight turned harsh!",
        WeatherKind::Sandstorm => "A sandstorm kicked up!",
        WeatherKind::Hail => "It started to hail!",
    }
}

fn end_message(kind: WeatherKind) -> &'static str {
    match kind {
        WeatherKind::Rain => "The rain stopped.",
        WeatherKind::Sun => "The harsh sunlight faded.",
        WeatherKind::Sandstorm => "The sandstorm subsided.",
        WeatherKind::Hail => "The hail stopped.",
    }
}

/// Starts `kind` for `turns` turns, tearing down any other weather first.
/// Returns false if `kind` is already active.
pub fn set_weather(state: &mut BattleState, kind: WeatherKind, turns: u8, logger: &mut dyn BattleLogger) -> bool {
    if state.field.weather == Some(kind) {
        return false;
    }
    clear_weather(state);

    state.field.weather = Some(kind);
    state.field.weather_turns = turns.max(1);
    effects::attach(&mut state.field.hooks, EffectId::Weather(kind));
    debug!(weather = label(kind), turns, "weather started");
    logger.log(start_message(kind));
    true
}

/// Removes the current weather and every hook it registered.
pub fn clear_weather(state: &mut BattleState) -> Option<WeatherKind> {
    let kind = state.field.weather.take()?;
    state.field.weather_turns = 0;
    effects::detach(&mut state.field.hooks, EffectId::Weather(kind));
    Some(kind)
}

/// Runs once at the very end of a full turn.
pub fn tick_weather(state: &mut BattleState, logger: &mut dyn BattleLogger) {
    let Some(kind) = state.field.weather else {
        return;
    };
    state.field.weather_turns = state.field.weather_turns.saturating_sub(1);
    if state.field.weather_turns == 0 {
        clear_weather(state);
        debug!(weather = label(kind), "weather ended");
        logger.log(end_message(kind));
    }
}

// --- Hook behavior ---

pub(crate) fn on_stat_calc(state: &BattleState, subject: Side, kind: WeatherKind, mut stats: Stats) -> Stats {
    if kind == WeatherKind::Sandstorm && state.combatant(subject).has_type(PokemonType::Rock) {
        stats.special_defense = scale_stat(stats.special_defense, 1.5);
    }
    stats
}

pub(crate) fn on_damage_calc(kind: WeatherKind, context: &DamageContext, mut params: DamageParams) -> DamageParams {
    let (boosted, weakened) = match kind {
        WeatherKind::Rain => (PokemonType::Water, PokemonType::Fire),
        WeatherKind::Sun => (PokemonType::Fire, PokemonType::Water),
        WeatherKind::Sandstorm | WeatherKind::Hail => return params,
    };
    if context.mv.move_type == boosted {
        params.power *= 1.5;
    } else if context.mv.move_type == weakened {
        params.power *= 0.5;
    }
    params
}

pub(crate) fn turn_end(state: &mut BattleState, subject: Side, kind: WeatherKind, logger: &mut dyn BattleLogger) {
    let sheltered: &[PokemonType] = match kind {
        WeatherKind::Sandstorm => &[PokemonType::Rock, PokemonType::Ground, PokemonType::Steel],
        WeatherKind::Hail => &[PokemonType::Ice],
        WeatherKind::Rain | WeatherKind::Sun => return,
    };
    let combatant = state.combatant_mut(subject);
    if sheltered.iter().any(|t| combatant.has_type(*t)) {
        return;
    }
    let amount = combatant.fraction_of_max(16);
    combatant.take_damage(amount);
    let line = match kind {
        WeatherKind::Hail => format!("{} is pelted by hail!", combatant.name),
        _ => format!("{} is buffeted by the sandstorm!", combatant.name),
    };
    logger.log(&line);
}
