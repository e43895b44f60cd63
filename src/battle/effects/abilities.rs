use super::{hook, AfterDamageContext, DamageContext, HookSpec, PriorityContext, StatusKind};
use crate::battle::damage::DamageParams;
use crate::battle::hooks::HookKind;
use crate::battle::logger::BattleLogger;
use crate::battle::move_effects::apply_stat_change;
use crate::battle::state::{BattleState, Side};
use crate::battle::stats::scale_stat;
use crate::battle::weather;
use schema::{DamageClass, PokemonType, StatType, Stats, WeatherKind};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ability {
    Drizzle,
    SpeedBoost,
    BattleArmor,
    Limber,
    Static,
    VoltAbsorb,
    WaterAbsorb,
    Insomnia,
    Immunity,
    OwnTempo,
    Intimidate,
    RoughSkin,
    Levitate,
    SwiftSwim,
    Chlorophyll,
    SandStream,
    Guts,
    Overgrow,
    Blaze,
    Torrent,
    Drought,
    ShellArmor,
    MoldBreaker,
    Aftermath,
    Moxie,
    Prankster,
    BeastBoost,
}

const ALL_ABILITIES: [Ability; 27] = [
    Ability::Drizzle,
    Ability::SpeedBoost,
    Ability::BattleArmor,
    Ability::Limber,
    Ability::Static,
    Ability::VoltAbsorb,
    Ability::WaterAbsorb,
    Ability::Insomnia,
    Ability::Immunity,
    Ability::OwnTempo,
    Ability::Intimidate,
    Ability::RoughSkin,
    Ability::Levitate,
    Ability::SwiftSwim,
    Ability::Chlorophyll,
    Ability::SandStream,
    Ability::Guts,
    Ability::Overgrow,
    Ability::Blaze,
    Ability::Torrent,
    Ability::Drought,
    Ability::ShellArmor,
    Ability::MoldBreaker,
    Ability::Aftermath,
    Ability::Moxie,
    Ability::Prankster,
    Ability::BeastBoost,
];

const NO_HOOKS: &[HookSpec] = &[];
const SPEED_BOOST_HOOKS: &[HookSpec] = &[hook(HookKind::TurnEnd, 40)];
const CRIT_BLOCK_HOOKS: &[HookSpec] = &[hook(HookKind::OnDamageCalc, 10)];
const CONTACT_HOOKS: &[HookSpec] = &[hook(HookKind::AfterDamage, 10)];
const TYPE_IMMUNITY_HOOKS: &[HookSpec] = &[hook(HookKind::OnDamageCalc, 0)];
const STAT_HOOKS: &[HookSpec] = &[hook(HookKind::OnStatCalc, 10)];
const PINCH_HOOKS: &[HookSpec] = &[hook(HookKind::OnDamageCalc, 10)];
const MOLD_BREAKER_HOOKS: &[HookSpec] = &[hook(HookKind::OnDamageCalc, -10)];
const FAINT_HOOKS: &[HookSpec] = &[hook(HookKind::OnFaint, 0)];
const KNOCKOUT_HOOKS: &[HookSpec] = &[hook(HookKind::OnOpponentFaint, 0)];
const PRIORITY_HOOKS: &[HookSpec] = &[hook(HookKind::OnPriorityCalc, 0)];

impl Ability {
    pub fn id(self) -> u16 {
        match self {
            Ability::Drizzle => 2,
            Ability::SpeedBoost => 3,
            Ability::BattleArmor => 4,
            Ability::Limber => 7,
            Ability::Static => 9,
            Ability::VoltAbsorb => 10,
            Ability::WaterAbsorb => 11,
            Ability::Insomnia => 15,
            Ability::Immunity => 17,
            Ability::OwnTempo => 20,
            Ability::Intimidate => 22,
            Ability::RoughSkin => 24,
            Ability::Levitate => 26,
            Ability::SwiftSwim => 33,
            Ability::Chlorophyll => 34,
            Ability::SandStream => 45,
            Ability::Guts => 62,
            Ability::Overgrow => 65,
            Ability::Blaze => 66,
            Ability::Torrent => 67,
            Ability::Drought => 70,
            Ability::ShellArmor => 75,
            Ability::MoldBreaker => 104,
            Ability::Aftermath => 106,
            Ability::Moxie => 153,
            Ability::Prankster => 158,
            Ability::BeastBoost => 224,
        }
    }

    /// Unknown ids have no plugin.
    pub fn from_id(id: u16) -> Option<Self> {
        ALL_ABILITIES.iter().copied().find(|ability| ability.id() == id)
    }

    pub fn name(self) -> &'static str {
        match self {
            Ability::Drizzle => "Drizzle",
            Ability::SpeedBoost => "Speed Boost",
            Ability::BattleArmor => "Battle Armor",
            Ability::Limber => "Limber",
            Ability::Static => "Static",
            Ability::VoltAbsorb => "Volt Absorb",
            Ability::WaterAbsorb => "Water Absorb",
            Ability::Insomnia => "Insomnia",
            Ability::Immunity => "Immunity",
            Ability::OwnTempo => "Own Tempo",
            Ability::Intimidate => "Intimidate",
            Ability::RoughSkin => "Rough Skin",
            Ability::Levitate => "Levitate",
            Ability::SwiftSwim => "Swift Swim",
            Ability::Chlorophyll => "Chlorophyll",
            Ability::SandStream => "Sand Stream",
            Ability::Guts => "Guts",
            Ability::Overgrow => "Overgrow",
            Ability::Blaze => "Blaze",
            Ability::Torrent => "Torrent",
            Ability::Drought => "Drought",
            Ability::ShellArmor => "Shell Armor",
            Ability::MoldBreaker => "Mold Breaker",
            Ability::Aftermath => "Aftermath",
            Ability::Moxie => "Moxie",
            Ability::Prankster => "Prankster",
            Ability::BeastBoost => "Beast Boost",
        }
    }

    /// Kebab-case name used in hook names.
    pub fn label(self) -> String {
        self.name().to_lowercase().replace(' ', "-")
    }

    pub(crate) fn hook_specs(self) -> &'static [HookSpec] {
        match self {
            Ability::SpeedBoost => SPEED_BOOST_HOOKS,
            Ability::BattleArmor | Ability::ShellArmor => CRIT_BLOCK_HOOKS,
            Ability::Static | Ability::RoughSkin => CONTACT_HOOKS,
            Ability::VoltAbsorb | Ability::WaterAbsorb | Ability::Levitate => TYPE_IMMUNITY_HOOKS,
            Ability::SwiftSwim | Ability::Chlorophyll | Ability::Guts => STAT_HOOKS,
            Ability::Overgrow | Ability::Blaze | Ability::Torrent => PINCH_HOOKS,
            Ability::MoldBreaker => MOLD_BREAKER_HOOKS,
            Ability::Aftermath => FAINT_HOOKS,
            Ability::Moxie | Ability::BeastBoost => KNOCKOUT_HOOKS,
            Ability::Prankster => PRIORITY_HOOKS,
            Ability::Drizzle
            | Ability::Drought
            | Ability::SandStream
            | Ability::Intimidate
            | Ability::Limber
            | Ability::Insomnia
            | Ability::Immunity
            | Ability::OwnTempo => NO_HOOKS,
        }
    }

    /// Statuses this ability prevents at the application site.
    pub fn blocks_status(self, kind: StatusKind) -> bool {
        matches!(
            (self, kind),
            (Ability::Limber, StatusKind::Paralysis)
                | (Ability::Insomnia, StatusKind::Sleep)
                | (Ability::Immunity, StatusKind::Poison)
        )
    }

    fn pinch_type(self) -> Option<PokemonType> {
        match self {
            Ability::Overgrow => Some(PokemonType::Grass),
            Ability::Blaze => Some(PokemonType::Fire),
            Ability::Torrent => Some(PokemonType::Water),
            _ => None,
        }
    }
}

/// One-shot effects when a combatant enters battle.
pub fn on_battle_entry(state: &mut BattleState, side: Side, logger: &mut dyn BattleLogger) {
    let Some(ability) = state.combatant(side).ability else {
        return;
    };
    let name = state.combatant(side).name.clone();
    debug!(%side, ability = ability.name(), "battle entry ability");

    match ability {
        Ability::Intimidate => {
            let target = side.opponent();
            logger.log(&format!("{}'s Intimidate cuts {}'s attack!", name, state.combatant(target).name));
            apply_stat_change(state, target, StatType::Attack, -1, logger);
        }
        Ability::Drizzle | Ability::Drought | Ability::SandStream => {
            let kind = match ability {
                Ability::Drizzle => WeatherKind::Rain,
                Ability::Drought => WeatherKind::Sun,
                _ => WeatherKind::Sandstorm,
            };
            logger.log(&format!("{}'s {} changed the weather!", name, ability.name()));
            let turns = state.config.weather_turns;
            weather::set_weather(state, kind, turns, logger);
        }
        Ability::MoldBreaker => logger.log(&format!("{} breaks the mold!", name)),
        _ => {}
    }
}

// --- Hook behavior ---

pub(super) fn on_stat_calc(state: &BattleState, side: Side, ability: Ability, mut stats: Stats) -> Stats {
    let weather = state.field.weather;
    match ability {
        Ability::SwiftSwim if weather == Some(WeatherKind::Rain) => stats.speed = scale_stat(stats.speed, 2.0),
        Ability::Chlorophyll if weather == Some(WeatherKind::Sun) => stats.speed = scale_stat(stats.speed, 2.0),
        Ability::Guts if state.combatant(side).status.is_some() => {
            stats.attack = scale_stat(stats.attack, 1.5);
        }
        _ => {}
    }
    stats
}

pub(super) fn on_damage_calc(
    state: &mut BattleState,
    side: Side,
    ability: Ability,
    context: &DamageContext,
    mut params: DamageParams,
    logger: &mut dyn BattleLogger,
) -> DamageParams {
    let defending = side == context.defender;
    let attacking = side == context.attacker;

    match ability {
        Ability::MoldBreaker if attacking => params.ignore_abilities = true,
        Ability::BattleArmor | Ability::ShellArmor if defending && !params.ignore_abilities => {
            params.is_crit = false;
            params.crit_mod = 1.0;
        }
        Ability::Levitate if defending && !params.ignore_abilities => {
            if context.mv.move_type == PokemonType::Ground {
                params.is_immune = true;
                params.effectiveness = 0.0;
            }
        }
        Ability::VoltAbsorb | Ability::WaterAbsorb if defending && !params.ignore_abilities => {
            let absorbed = match ability {
                Ability::VoltAbsorb => PokemonType::Electric,
                _ => PokemonType::Water,
            };
            if context.mv.move_type == absorbed && context.mv.is_damaging() {
                params.is_immune = true;
                params.effectiveness = 0.0;
                let holder = state.combatant_mut(side);
                let amount = holder.fraction_of_max(4);
                let restored = holder.heal(amount);
                let line = if restored > 0 {
                    format!("{}'s {} restored its HP!", holder.name, ability.name())
                } else {
                    format!("{}'s {} made the move useless!", holder.name, ability.name())
                };
                logger.log(&line);
            }
        }
        Ability::Overgrow | Ability::Blaze | Ability::Torrent if attacking => {
            let holder = state.combatant(side);
            let in_pinch = holder.current_hp() as u32 * 3 <= holder.max_hp() as u32;
            if in_pinch && ability.pinch_type() == Some(context.mv.move_type) {
                params.power *= 1.5;
            }
        }
        _ => {}
    }
    params
}

pub(super) fn after_damage(
    state: &mut BattleState,
    side: Side,
    ability: Ability,
    context: &AfterDamageContext,
    logger: &mut dyn BattleLogger,
) {
    if side != context.defender || context.damage == 0 || !context.mv.contact {
        return;
    }
    let attacker = context.attacker;
    if state.combatant(attacker).is_fainted() {
        return;
    }

    match ability {
        Ability::Static => {
            if state.rng.chance(30, "Static") {
                super::status::apply_status(state, attacker, StatusKind::Paralysis, false, logger);
            }
        }
        Ability::RoughSkin => {
            let target = state.combatant_mut(attacker);
            let amount = target.fraction_of_max(8);
            target.take_damage(amount);
            logger.log(&format!("{} was hurt by Rough Skin!", target.name));
        }
        _ => {}
    }
}

pub(super) fn turn_end(state: &mut BattleState, side: Side, ability: Ability, logger: &mut dyn BattleLogger) {
    if ability == Ability::SpeedBoost {
        logger.log(&format!("{}'s Speed Boost activates!", state.combatant(side).name));
        apply_stat_change(state, side, StatType::Speed, 1, logger);
    }
}

pub(super) fn on_faint(state: &mut BattleState, side: Side, ability: Ability, logger: &mut dyn BattleLogger) {
    if ability != Ability::Aftermath {
        return;
    }
    let target = state.combatant_mut(side.opponent());
    if target.is_fainted() {
        return;
    }
    let amount = target.fraction_of_max(4);
    target.take_damage(amount);
    logger.log(&format!("{} was caught in the Aftermath!", target.name));
}

pub(super) fn on_opponent_faint(
    state: &mut BattleState,
    side: Side,
    ability: Ability,
    logger: &mut dyn BattleLogger,
) {
    let stat = match ability {
        Ability::Moxie => StatType::Attack,
        Ability::BeastBoost => highest_stat(&state.combatant(side).stats),
        _ => return,
    };
    logger.log(&format!("{}'s {} activates!", state.combatant(side).name, ability.name()));
    apply_stat_change(state, side, stat, 1, logger);
}

/// Highest non-HP stat; earlier stats win ties.
fn highest_stat(stats: &Stats) -> StatType {
    let candidates = [
        (StatType::Attack, stats.attack),
        (StatType::Defense, stats.defense),
        (StatType::SpecialAttack, stats.special_attack),
        (StatType::SpecialDefense, stats.special_defense),
        (StatType::Speed, stats.speed),
    ];
    candidates
        .iter()
        .fold(candidates[0], |best, candidate| if candidate.1 > best.1 { *candidate } else { best })
        .0
}

pub(super) fn on_priority_calc(
    _state: &BattleState,
    _side: Side,
    ability: Ability,
    context: &PriorityContext,
    priority: f64,
) -> f64 {
    match ability {
        Ability::Prankster if context.mv.damage_class == DamageClass::Status => priority + 1.0,
        _ => priority,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_every_ability_round_trips_through_its_id() {
        for ability in ALL_ABILITIES {
            assert_eq!(Ability::from_id(ability.id()), Some(ability));
        }
        assert_eq!(Ability::from_id(9999), None);
    }

    #[rstest]
    #[case(Ability::Limber, StatusKind::Paralysis, true)]
    #[case(Ability::Insomnia, StatusKind::Sleep, true)]
    #[case(Ability::Immunity, StatusKind::Poison, true)]
    #[case(Ability::Immunity, StatusKind::Burn, false)]
    #[case(Ability::Static, StatusKind::Paralysis, false)]
    fn test_blocks_status(#[case] ability: Ability, #[case] kind: StatusKind, #[case] expected: bool) {
        assert_eq!(ability.blocks_status(kind), expected);
    }

    #[test]
    fn test_labels_are_kebab_case() {
        assert_eq!(Ability::MoldBreaker.label(), "mold-breaker");
        assert_eq!(Ability::Static.label(), "static");
    }

    #[test]
    fn test_highest_stat_prefers_earlier_on_ties() {
        let stats = Stats::new(100, 80, 90, 90, 60, 50);
        assert_eq!(highest_stat(&stats), StatType::Defense);
    }
}
