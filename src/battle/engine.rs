use crate::battle::ai::{Behavior, ScoringAI};
use crate::battle::combatant::{CombatantSnapshot, MoveInfo};
use crate::battle::effects::{
    self, abilities, items, volatile, AfterDamageContext, BeforeMoveContext, PriorityContext, VolatileKind,
};
use crate::battle::hooks::{self, HookKind};
use crate::battle::logger::{BattleLogger, NoOpBattleLogger, TeeLogger};
use crate::battle::move_effects::{self, MoveOutcome};
use crate::battle::state::{BattlePhase, BattleState, HookHolder, PlayerAction, Side, TurnRng};
use crate::battle::weather;
use crate::config::BattleConfig;
use crate::content::ContentRepository;
use crate::errors::{ActionError, BattleResult, BattleStateError};
use ordered_float::OrderedFloat;
use schema::{ChargeKind, ProtectionKind};
use serde::Serialize;
use std::cmp::Ordering;
use tracing::{debug, trace};

/// What one call to [`run_turn`] produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnResult {
    pub narration: Vec<String>,
    pub battle_over: bool,
    pub winner: Option<Side>,
}

/// The outcome of a battle played out to the end. `snapshots` are the
/// write-back records, indexed by [`Side::index`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalResult {
    pub winner: Option<Side>,
    pub turns: u32,
    pub narration: Vec<String>,
    pub snapshots: [CombatantSnapshot; 2],
}

/// A selected action resolved against the combatant's move list.
#[derive(Debug, Clone)]
enum ChosenAction {
    Forfeit,
    /// `move_index` is `None` for Struggle.
    Move { move_index: Option<usize>, mv: MoveInfo },
}

// --- Battle setup ---

/// Builds a battle from two persisted snapshots with the default config.
/// Without a seed the random source is seeded from the OS.
pub fn start_battle(
    content: &dyn ContentRepository,
    player: CombatantSnapshot,
    opponent: CombatantSnapshot,
    seed: Option<u64>,
) -> BattleResult<BattleState> {
    start_battle_with_config(content, player, opponent, seed, BattleConfig::default())
}

pub fn start_battle_with_config(
    content: &dyn ContentRepository,
    player: CombatantSnapshot,
    opponent: CombatantSnapshot,
    seed: Option<u64>,
    config: BattleConfig,
) -> BattleResult<BattleState> {
    let rng = seed.map(TurnRng::seeded).unwrap_or_else(TurnRng::new_random);
    let state = BattleState::new(content, player, opponent, config, rng)?;
    debug!(
        player = %state.combatant(Side::Player).name,
        opponent = %state.combatant(Side::Opponent).name,
        ?seed,
        "battle created"
    );
    Ok(state)
}

/// Runs battle-entry abilities and items in speed order and opens the turn
/// loop. Does nothing once the battle has started.
pub fn handle_battle_start(state: &mut BattleState, logger: &mut dyn BattleLogger) {
    if state.phase != BattlePhase::BattleStart {
        return;
    }
    for side in speed_order(state) {
        abilities::on_battle_entry(state, side, logger);
        items::on_battle_entry(state, side, logger);
        trace!(%side, hooks = ?state.combatant(side).hooks.names(), "entry hooks installed");
    }
    state.phase = BattlePhase::TurnLoop;
    debug!("battle started");
}

// --- Action selection ---

/// The actions a side may queue right now: PP-bearing moves (only the locked
/// one under a Choice lock), or Struggle when none remain.
pub fn legal_moves(state: &BattleState, side: Side) -> Vec<PlayerAction> {
    let combatant = state.combatant(side);
    let lock = items::choice_lock(state, side);
    let usable: Vec<PlayerAction> = combatant
        .usable_move_indices()
        .into_iter()
        .filter(|index| lock.map_or(true, |locked| combatant.moves[*index].id == locked))
        .map(|move_index| PlayerAction::UseMove { move_index })
        .collect();

    if usable.is_empty() {
        vec![PlayerAction::Struggle]
    } else {
        usable
    }
}

fn validate_action(state: &BattleState, side: Side, action: PlayerAction) -> BattleResult<()> {
    match action {
        PlayerAction::Forfeit => Ok(()),
        PlayerAction::UseMove { move_index } => {
            let combatant = state.combatant(side);
            if move_index >= combatant.moves.len() {
                return Err(ActionError::InvalidMoveIndex(move_index).into());
            }
            if combatant.pp[move_index] == 0 {
                return Err(ActionError::NoPpRemaining(move_index).into());
            }
            if !legal_moves(state, side).contains(&action) {
                return Err(ActionError::MoveLocked { side }.into());
            }
            Ok(())
        }
        PlayerAction::Struggle => {
            if legal_moves(state, side) == [PlayerAction::Struggle] {
                Ok(())
            } else {
                Err(ActionError::InvalidAction("Struggle is only legal when no move can be used".to_string()).into())
            }
        }
    }
}

/// Queues an action for an externally controlled side. Sides with nothing
/// queued are driven by the AI when the turn runs.
pub fn queue_action(state: &mut BattleState, side: Side, action: PlayerAction) -> BattleResult<()> {
    if state.is_over() {
        return Err(BattleStateError::BattleOver.into());
    }
    validate_action(state, side, action)?;
    state.action_queue[side.index()] = Some(action);
    Ok(())
}

/// Ends the battle immediately in favor of the other side.
pub fn forfeit(state: &mut BattleState, side: Side) -> BattleResult<()> {
    if state.is_over() {
        return Err(BattleStateError::BattleOver.into());
    }
    debug!(%side, "forfeit");
    state.end_battle(Some(side.opponent()));
    Ok(())
}

fn choose_action(state: &mut BattleState, side: Side, brain: &ScoringAI) -> BattleResult<ChosenAction> {
    // A charged move releases on the next turn whatever was queued.
    if let Some(charging) = state.combatant(side).charging_move {
        let combatant = state.combatant(side);
        let index = combatant.move_index_of(charging).ok_or_else(|| {
            BattleStateError::InconsistentState(format!("{} is charging a move it does not know", combatant.name))
        })?;
        return Ok(ChosenAction::Move {
            move_index: Some(index),
            mv: combatant.moves[index].clone(),
        });
    }

    let action = match state.action_queue[side.index()].take() {
        Some(action) => action,
        None => brain.decide_action(side, state),
    };
    debug!(%side, ?action, "action selected");

    match action {
        PlayerAction::Forfeit => Ok(ChosenAction::Forfeit),
        PlayerAction::Struggle => Ok(ChosenAction::Move {
            move_index: None,
            mv: MoveInfo::struggle(),
        }),
        PlayerAction::UseMove { move_index } => {
            let mv = state
                .combatant(side)
                .moves
                .get(move_index)
                .cloned()
                .ok_or(ActionError::InvalidMoveIndex(move_index))?;
            Ok(ChosenAction::Move {
                move_index: Some(move_index),
                mv,
            })
        }
    }
}

// --- Ordering ---

#[derive(Debug, Clone, Copy)]
struct ActionPriority {
    action_priority: i8, // Forfeit: 10, Move: 0
    move_priority: OrderedFloat<f64>,
    speed: u16,
}

impl ActionPriority {
    fn compare(&self, other: &Self) -> Ordering {
        self.action_priority
            .cmp(&other.action_priority)
            .then(self.move_priority.cmp(&other.move_priority))
            .then(self.speed.cmp(&other.speed))
    }
}

fn calculate_action_priority(state: &BattleState, side: Side, action: &ChosenAction) -> ActionPriority {
    let speed = state.effective_speed(side);
    match action {
        ChosenAction::Forfeit => ActionPriority {
            action_priority: 10,
            move_priority: OrderedFloat(0.0),
            speed,
        },
        ChosenAction::Move { mv, .. } => {
            let context = PriorityContext { mv: mv.clone() };
            let priority = state
                .combatant(side)
                .hooks
                .fold(HookKind::OnPriorityCalc, mv.priority as f64, |entry, current| {
                    effects::on_priority_calc(state, side, entry.owner, &context, current)
                });
            ActionPriority {
                action_priority: 0,
                move_priority: OrderedFloat(priority),
                speed,
            }
        }
    }
}

/// Higher priority first, then higher speed, then a coin flip.
fn determine_action_order(
    state: &mut BattleState,
    player: ChosenAction,
    opponent: ChosenAction,
) -> [(Side, ChosenAction); 2] {
    let player_priority = calculate_action_priority(state, Side::Player, &player);
    let opponent_priority = calculate_action_priority(state, Side::Opponent, &opponent);
    let player_first = match player_priority.compare(&opponent_priority) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => state.rng.chance(50, "Speed Tie"),
    };
    debug!(?player_priority, ?opponent_priority, player_first, "action order");

    if player_first {
        [(Side::Player, player), (Side::Opponent, opponent)]
    } else {
        [(Side::Opponent, opponent), (Side::Player, player)]
    }
}

/// Faster side first; ties go to the player. Used for battle entry and the
/// end-of-turn pass, where no coin is flipped.
fn speed_order(state: &BattleState) -> [Side; 2] {
    if state.effective_speed(Side::Opponent) > state.effective_speed(Side::Player) {
        [Side::Opponent, Side::Player]
    } else {
        [Side::Player, Side::Opponent]
    }
}

// --- Turn resolution ---

/// Advances exactly one turn, discarding narration beyond the returned copy.
pub fn run_turn(state: &mut BattleState) -> BattleResult<TurnResult> {
    let mut sink = NoOpBattleLogger;
    run_turn_with_logger(state, &mut sink)
}

/// Advances exactly one turn, forwarding every narration line to `sink` as
/// it is produced.
pub fn run_turn_with_logger(state: &mut BattleState, sink: &mut dyn BattleLogger) -> BattleResult<TurnResult> {
    if state.is_over() {
        return Err(BattleStateError::BattleOver.into());
    }
    let mut logger = TeeLogger::new(sink);
    handle_battle_start(state, &mut logger);
    debug!(turn = state.turn_number, "turn start");

    // 1. Action selection
    let brain = ScoringAI::new();
    let player = choose_action(state, Side::Player, &brain)?;
    let opponent = choose_action(state, Side::Opponent, &brain)?;

    // 2. Order resolution
    let order = determine_action_order(state, player, opponent);

    // 3. Action execution
    for (side, action) in order {
        if state.is_over() {
            break;
        }
        match action {
            ChosenAction::Forfeit => {
                logger.log(&format!("{} forfeited the battle!", state.combatant(side).name));
                state.end_battle(Some(side.opponent()));
            }
            ChosenAction::Move { move_index, mv } => {
                execute_move(state, side, move_index, mv, &mut logger);
                check_faints(state, side.opponent(), &mut logger);
            }
        }
    }

    // 4-5. Residuals and weather
    if !state.is_over() {
        end_of_turn(state, &mut logger);
    }
    state.action_queue = [None, None];

    Ok(TurnResult {
        narration: logger.list.into_lines(),
        battle_over: state.is_over(),
        winner: state.winner,
    })
}

/// Loops [`run_turn`] until the battle ends, calling it a draw after
/// `max_turns` turns.
pub fn run_to_completion(state: &mut BattleState) -> BattleResult<FinalResult> {
    let mut narration = Vec::new();
    let mut turns = 0;
    while !state.is_over() {
        if turns >= state.config.max_turns {
            debug!(turns, "turn cap reached");
            narration.push("The battle ended in a draw.".to_string());
            state.end_battle(None);
            break;
        }
        let result = run_turn(state)?;
        narration.extend(result.narration);
        turns += 1;
    }

    Ok(FinalResult {
        winner: state.winner,
        turns,
        narration,
        snapshots: [
            state.combatant(Side::Player).to_snapshot(),
            state.combatant(Side::Opponent).to_snapshot(),
        ],
    })
}

fn charge_message(kind: ChargeKind) -> &'static str {
    match kind {
        ChargeKind::Charge => "is charging up power!",
        ChargeKind::InAir => "flew up high!",
        ChargeKind::Underground => "burrowed its way under the ground!",
        ChargeKind::Underwater => "hid underwater!",
    }
}

fn execute_move(
    state: &mut BattleState,
    side: Side,
    move_index: Option<usize>,
    mv: MoveInfo,
    logger: &mut dyn BattleLogger,
) {
    if state.combatant(side).is_fainted() {
        return;
    }
    let releasing = state.combatant(side).charging_move == Some(mv.id);

    // --- Step 1: Gate ---
    let context = BeforeMoveContext {
        move_index,
        mv: mv.clone(),
    };
    let allowed = hooks::dispatch_gate(state, HookHolder::Combatant(side), HookKind::BeforeMove, |state, entry| {
        effects::before_move(state, side, entry.owner, &context, logger)
    });
    if !allowed {
        if releasing {
            let attacker = state.combatant_mut(side);
            attacker.charging_move = None;
            attacker.protection = None;
        }
        check_faints(state, side, logger);
        return;
    }

    let name = state.combatant(side).name.clone();
    logger.log(&format!("{} used {}!", name, mv.name));

    // --- Step 2: Charge and release ---
    match mv.charge {
        Some(kind) if !releasing => {
            if let Some(index) = move_index {
                state.combatant_mut(side).deduct_pp(index);
            }
            let attacker = state.combatant_mut(side);
            attacker.charging_move = Some(mv.id);
            attacker.protection = kind.protection();
            logger.log(&format!("{} {}", name, charge_message(kind)));
            if let Some(boost) = mv.charge_boost {
                move_effects::apply_stat_change(state, side, boost.stat, boost.change, logger);
            }
            return;
        }
        _ if releasing => {
            let attacker = state.combatant_mut(side);
            attacker.charging_move = None;
            attacker.protection = None;
        }
        _ => {
            if let Some(index) = move_index {
                state.combatant_mut(side).deduct_pp(index);
            }
        }
    }

    // --- Step 3: Protection ---
    let defender = side.opponent();
    if mv.targets_opponent() {
        if let Some(protection) = state.combatant(defender).protection {
            if !mv.penetrates.contains(&protection) {
                let line = match protection {
                    ProtectionKind::Protected => format!("{} protected itself!", state.combatant(defender).name),
                    _ => format!("{}'s attack missed!", name),
                };
                logger.log(&line);
                finish_move(state, side, &mv, logger);
                return;
            }
        }
    }

    // --- Step 4: Resolve and apply ---
    let outcome = move_effects::resolve(state, side, &mv, false, logger);
    apply_outcome(state, side, &mv, &outcome, logger);
    finish_move(state, side, &mv, logger);
}

/// Struggle recoil and move bookkeeping once a move has been used.
fn finish_move(state: &mut BattleState, side: Side, mv: &MoveInfo, logger: &mut dyn BattleLogger) {
    let divisor = state.config.struggle_recoil_divisor;
    let attacker = state.combatant_mut(side);
    if mv.is_struggle() && !attacker.is_fainted() {
        let recoil = attacker.fraction_of_max(divisor);
        attacker.take_damage(recoil);
        logger.log(&format!("{} is damaged by recoil!", attacker.name));
    }
    attacker.last_move = Some(mv.id);
}

fn apply_outcome(
    state: &mut BattleState,
    side: Side,
    mv: &MoveInfo,
    outcome: &MoveOutcome,
    logger: &mut dyn BattleLogger,
) {
    let defender = side.opponent();
    if outcome.missed {
        logger.log(&format!("{}'s attack missed!", state.combatant(side).name));
        return;
    }
    if outcome.is_immune() {
        logger.log(&format!("It doesn't affect {}...", state.combatant(defender).name));
        return;
    }
    if !outcome.success {
        logger.log("But it failed!");
        return;
    }

    for hit in &outcome.hits {
        let dealt = state.combatant_mut(defender).take_damage(hit.damage);
        if hit.is_crit {
            logger.log("A critical hit!");
        }
        if logger.should_log_details() {
            logger.log(&format!("({} took {} damage)", state.combatant(defender).name, dealt));
        }
        if dealt > 0 {
            let context = AfterDamageContext {
                attacker: side,
                defender,
                mv: mv.clone(),
                damage: dealt,
            };
            for holder in [defender, side] {
                hooks::dispatch_event(state, HookHolder::Combatant(holder), HookKind::AfterDamage, |state, entry| {
                    effects::after_damage(state, holder, entry.owner, &context, logger)
                });
            }
        }
        if state.combatant(defender).is_fainted() || state.combatant(side).is_fainted() {
            break;
        }
    }

    if !outcome.hits.is_empty() {
        if outcome.effectiveness > 1.0 {
            logger.log("It's super effective!");
        } else if outcome.effectiveness < 1.0 {
            logger.log("It's not very effective...");
        }
        if mv.is_multi_hit() {
            let count = outcome.hit_count();
            logger.log(&format!("Hit {} time{}!", count, if count == 1 { "" } else { "s" }));
        }
    }

    for effect in &outcome.effects {
        move_effects::apply_effect(state, side, effect, logger);
    }
}

/// Announces every fainted combatant, fires faint hooks, and ends the battle
/// if anyone went down. Faint hooks may knock out the other side too, which
/// makes a draw. Returns whether the battle ended.
fn check_faints(state: &mut BattleState, first: Side, logger: &mut dyn BattleLogger) -> bool {
    if state.is_over() {
        return true;
    }
    let order = [first, first.opponent()];
    let mut fainted: Vec<Side> = Vec::new();
    loop {
        let newly: Vec<Side> = order
            .into_iter()
            .filter(|side| state.combatant(*side).is_fainted() && !fainted.contains(side))
            .collect();
        if newly.is_empty() {
            break;
        }
        for side in newly {
            fainted.push(side);
            logger.log(&format!("{} fainted!", state.combatant(side).name));
            hooks::dispatch_event(state, HookHolder::Combatant(side), HookKind::OnFaint, |state, entry| {
                effects::on_faint(state, side, entry.owner, logger);
                true
            });
            let other = side.opponent();
            if !state.combatant(other).is_fainted() {
                hooks::dispatch_event(state, HookHolder::Combatant(other), HookKind::OnOpponentFaint, |state, entry| {
                    effects::on_opponent_faint(state, other, entry.owner, logger);
                    true
                });
            }
        }
    }
    if fainted.is_empty() {
        return false;
    }

    let winner = Side::BOTH
        .into_iter()
        .find(|side| !state.combatant(*side).is_fainted());
    match winner {
        Some(side) => logger.log(&format!("{} wins the battle!", state.combatant(side).name)),
        None => logger.log("The battle ended in a draw."),
    }
    debug!(?winner, "battle over");
    state.end_battle(winner);
    true
}

/// Residual hooks one combatant at a time, faster side first. Field hooks
/// act on the combatant whose pass is running, interleaved with its own hooks
/// by priority. A knockout ends the battle before the next pass starts.
fn end_of_turn(state: &mut BattleState, logger: &mut dyn BattleLogger) {
    let order = speed_order(state);
    for subject in order {
        if state.combatant(subject).is_fainted() {
            continue;
        }
        let holders = [HookHolder::Combatant(subject), HookHolder::Field];
        hooks::dispatch_event_merged(state, &holders, HookKind::TurnEnd, |state, _, entry| {
            if state.combatant(subject).is_fainted() {
                return false;
            }
            effects::turn_end(state, subject, entry.owner, logger);
            true
        });
        if check_faints(state, subject, logger) {
            return;
        }
    }

    for side in Side::BOTH {
        volatile::remove_volatile(state, side, VolatileKind::Flinch);
        let combatant = state.combatant_mut(side);
        if combatant.protection == Some(ProtectionKind::Protected) {
            combatant.protection = None;
        }
    }
    weather::tick_weather(state, logger);
    state.turn_number += 1;
}
