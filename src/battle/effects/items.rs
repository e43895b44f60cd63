use super::{hook, single_use_hook, AfterDamageContext, BeforeMoveContext, DamageContext, EffectId, HookSpec};
use crate::battle::damage::DamageParams;
use crate::battle::hooks::HookKind;
use crate::battle::logger::BattleLogger;
use crate::battle::state::{BattleState, Side};
use crate::battle::stats::scale_stat;
use schema::{MoveId, PokemonType, Stats};
use tracing::debug;

/// Item ids below this are the fixed items; gems follow in type order.
const FIRST_GEM_ID: u16 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeldItemKind {
    ChoiceBand,
    ChoiceSpecs,
    ChoiceScarf,
    Leftovers,
    SitrusBerry,
    QuickClaw,
    AirBalloon,
    Gem(PokemonType),
}

/// A held item. `kind` is `None` for ids with no battle behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeldItem {
    pub id: u16,
    pub kind: Option<HeldItemKind>,
    /// The move a Choice item has locked its holder into.
    pub choice_lock: Option<MoveId>,
}

const CHOICE_HOOKS: &[HookSpec] = &[hook(HookKind::OnStatCalc, 20), hook(HookKind::BeforeMove, 30)];
const LEFTOVERS_HOOKS: &[HookSpec] = &[hook(HookKind::TurnEnd, 50)];
const SITRUS_HOOKS: &[HookSpec] = &[single_use_hook(HookKind::AfterDamage, 20)];
const QUICK_CLAW_HOOKS: &[HookSpec] = &[hook(HookKind::OnPriorityCalc, 0)];
const AIR_BALLOON_HOOKS: &[HookSpec] = &[
    hook(HookKind::OnDamageCalc, 0),
    single_use_hook(HookKind::AfterDamage, 0),
];
const GEM_HOOKS: &[HookSpec] = &[
    hook(HookKind::OnDamageCalc, 20),
    single_use_hook(HookKind::AfterDamage, 20),
];

impl HeldItemKind {
    pub fn from_id(id: u16) -> Option<Self> {
        match id {
            1 => Some(HeldItemKind::ChoiceBand),
            2 => Some(HeldItemKind::ChoiceSpecs),
            3 => Some(HeldItemKind::ChoiceScarf),
            4 => Some(HeldItemKind::Leftovers),
            5 => Some(HeldItemKind::SitrusBerry),
            6 => Some(HeldItemKind::QuickClaw),
            7 => Some(HeldItemKind::AirBalloon),
            _ => {
                let offset = id.checked_sub(FIRST_GEM_ID)?;
                PokemonType::all().nth(offset as usize).map(HeldItemKind::Gem)
            }
        }
    }

    pub fn name(self) -> String {
        match self {
            HeldItemKind::ChoiceBand => "Choice Band".to_string(),
            HeldItemKind::ChoiceSpecs => "Choice Specs".to_string(),
            HeldItemKind::ChoiceScarf => "Choice Scarf".to_string(),
            HeldItemKind::Leftovers => "Leftovers".to_string(),
            HeldItemKind::SitrusBerry => "Sitrus Berry".to_string(),
            HeldItemKind::QuickClaw => "Quick Claw".to_string(),
            HeldItemKind::AirBalloon => "Air Balloon".to_string(),
            HeldItemKind::Gem(gem_type) => format!("{} Gem", gem_type),
        }
    }

    pub fn label(self) -> String {
        self.name().to_lowercase().replace(' ', "-")
    }

    pub fn is_choice(self) -> bool {
        matches!(
            self,
            HeldItemKind::ChoiceBand | HeldItemKind::ChoiceSpecs | HeldItemKind::ChoiceScarf
        )
    }

    pub(crate) fn hook_specs(self) -> &'static [HookSpec] {
        match self {
            HeldItemKind::ChoiceBand | HeldItemKind::ChoiceSpecs | HeldItemKind::ChoiceScarf => CHOICE_HOOKS,
            HeldItemKind::Leftovers => LEFTOVERS_HOOKS,
            HeldItemKind::SitrusBerry => SITRUS_HOOKS,
            HeldItemKind::QuickClaw => QUICK_CLAW_HOOKS,
            HeldItemKind::AirBalloon => AIR_BALLOON_HOOKS,
            HeldItemKind::Gem(_) => GEM_HOOKS,
        }
    }
}

/// Drops the held item and whatever hooks it still has registered. Consumed
/// items stay gone in the written-back snapshot.
pub fn remove_item(state: &mut BattleState, side: Side) -> Option<HeldItem> {
    let combatant = state.combatant_mut(side);
    let item = combatant.held_item.take()?;
    if let Some(kind) = item.kind {
        combatant.hooks.unregister_owner(EffectId::Item(kind));
    }
    debug!(%side, item = item.id, "held item removed");
    Some(item)
}

/// The move a Choice item currently forces, if any.
pub fn choice_lock(state: &BattleState, side: Side) -> Option<MoveId> {
    state.combatant(side).held_item.as_ref().and_then(|item| item.choice_lock)
}

pub fn on_battle_entry(state: &mut BattleState, side: Side, logger: &mut dyn BattleLogger) {
    let combatant = state.combatant(side);
    if combatant.held_item.as_ref().and_then(|item| item.kind) == Some(HeldItemKind::AirBalloon) {
        logger.log(&format!("{} floats in the air with its Air Balloon!", combatant.name));
    }
}

// --- Hook behavior ---

pub(super) fn before_move(
    state: &mut BattleState,
    side: Side,
    kind: HeldItemKind,
    context: &BeforeMoveContext,
    logger: &mut dyn BattleLogger,
) -> bool {
    if !kind.is_choice() || context.move_index.is_none() {
        return true;
    }
    let combatant = state.combatant_mut(side);
    let name = combatant.name.clone();
    let Some(item) = combatant.held_item.as_mut() else {
        return true;
    };
    match item.choice_lock {
        None => {
            item.choice_lock = Some(context.mv.id);
            true
        }
        Some(locked) if locked == context.mv.id => true,
        Some(_) => {
            logger.log(&format!("{} is locked in by its {}!", name, kind.name()));
            false
        }
    }
}

pub(super) fn on_stat_calc(kind: HeldItemKind, mut stats: Stats) -> Stats {
    match kind {
        HeldItemKind::ChoiceBand => stats.attack = scale_stat(stats.attack, 1.5),
        HeldItemKind::ChoiceSpecs => stats.special_attack = scale_stat(stats.special_attack, 1.5),
        HeldItemKind::ChoiceScarf => stats.speed = scale_stat(stats.speed, 1.5),
        _ => {}
    }
    stats
}

/// Gems only boost here; they are used up in `after_damage` once the hit has
/// landed.
pub(super) fn on_damage_calc(
    side: Side,
    kind: HeldItemKind,
    context: &DamageContext,
    mut params: DamageParams,
) -> DamageParams {
    match kind {
        HeldItemKind::AirBalloon if side == context.defender => {
            if context.mv.move_type == PokemonType::Ground && context.mv.is_damaging() {
                params.is_immune = true;
                params.effectiveness = 0.0;
            }
        }
        HeldItemKind::Gem(gem_type) if side == context.attacker => {
            if context.mv.move_type == gem_type && context.mv.is_damaging() {
                params.power *= 1.3;
            }
        }
        _ => {}
    }
    params
}

/// Returns whether the item was used up by this hit.
pub(super) fn after_damage(
    state: &mut BattleState,
    side: Side,
    kind: HeldItemKind,
    context: &AfterDamageContext,
    logger: &mut dyn BattleLogger,
) -> bool {
    match kind {
        HeldItemKind::AirBalloon if side == context.defender => {
            let name = state.combatant(side).name.clone();
            remove_item(state, side);
            logger.log(&format!("{}'s Air Balloon popped!", name));
            true
        }
        HeldItemKind::SitrusBerry if side == context.defender => {
            let holder = state.combatant(side);
            let at_half = holder.current_hp() as u32 * 2 <= holder.max_hp() as u32;
            if holder.is_fainted() || !at_half {
                return false;
            }
            let holder = state.combatant_mut(side);
            let amount = holder.fraction_of_max(4);
            holder.heal(amount);
            holder.held_item = None;
            logger.log(&format!("{} restored its health using its Sitrus Berry!", holder.name));
            true
        }
        HeldItemKind::Gem(gem_type) if side == context.attacker => {
            if context.mv.move_type != gem_type || !context.mv.is_damaging() {
                return false;
            }
            let name = state.combatant(side).name.clone();
            remove_item(state, side);
            logger.log(&format!("The {} strengthened {}'s power!", kind.name(), name));
            true
        }
        _ => false,
    }
}

pub(super) fn turn_end(state: &mut BattleState, side: Side, kind: HeldItemKind, logger: &mut dyn BattleLogger) {
    if kind != HeldItemKind::Leftovers {
        return;
    }
    let holder = state.combatant_mut(side);
    let amount = holder.fraction_of_max(16);
    if holder.heal(amount) > 0 {
        logger.log(&format!("{} restored a little HP using its Leftovers!", holder.name));
    }
}

/// Quick Claw moves its holder ahead of everything in the same bracket but
/// never into the next one.
pub(super) fn on_priority_calc(kind: HeldItemKind, priority: f64) -> f64 {
    match kind {
        HeldItemKind::QuickClaw => priority + 0.5,
        _ => priority,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(1, Some(HeldItemKind::ChoiceBand))]
    #[case(7, Some(HeldItemKind::AirBalloon))]
    #[case(8, None)]
    #[case(10, Some(HeldItemKind::Gem(PokemonType::Normal)))]
    #[case(19, Some(HeldItemKind::Gem(PokemonType::Fire)))]
    #[case(27, Some(HeldItemKind::Gem(PokemonType::Fairy)))]
    #[case(28, None)]
    fn test_item_ids(#[case] id: u16, #[case] expected: Option<HeldItemKind>) {
        assert_eq!(HeldItemKind::from_id(id), expected);
    }

    #[test]
    fn test_choice_boosts() {
        let stats = Stats::new(100, 100, 100, 100, 100, 100);
        assert_eq!(on_stat_calc(HeldItemKind::ChoiceBand, stats).attack, 150);
        assert_eq!(on_stat_calc(HeldItemKind::ChoiceSpecs, stats).special_attack, 150);
        assert_eq!(on_stat_calc(HeldItemKind::ChoiceScarf, stats).speed, 150);
        assert_eq!(on_stat_calc(HeldItemKind::Leftovers, stats), stats);
    }

    #[test]
    fn test_gem_label() {
        assert_eq!(HeldItemKind::Gem(PokemonType::Electric).label(), "electric-gem");
    }
}
