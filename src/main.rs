use creature_battle::{
    run_to_completion, run_turn_with_logger, start_battle, BattleLogger, CombatantSnapshot, ContentRepository,
    MoveId, Side, SpeciesId, StaticContent,
};
use std::error::Error;
use tracing_subscriber::EnvFilter;

/// Prints narration as it happens, optionally with formula breakdowns.
struct StdoutLogger {
    details: bool,
}

impl BattleLogger for StdoutLogger {
    fn log(&mut self, line: &str) {
        println!("  {}", line);
    }

    fn should_log_details(&self) -> bool {
        self.details
    }
}

struct Options {
    seed: Option<u64>,
    json: bool,
    details: bool,
}

fn parse_args() -> Result<Options, String> {
    let mut options = Options {
        seed: None,
        json: false,
        details: false,
    };
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json" => options.json = true,
            "--details" => options.details = true,
            other => {
                let seed = other
                    .parse::<u64>()
                    .map_err(|_| format!("unrecognized argument '{}' (expected a seed, --json or --details)", other))?;
                options.seed = Some(seed);
            }
        }
    }
    Ok(options)
}

fn demo_combatant(
    content: &dyn ContentRepository,
    species: u16,
    level: u8,
    moves: &[u16],
    ability: Option<u16>,
    item: Option<u16>,
) -> Result<CombatantSnapshot, Box<dyn Error>> {
    let moves: Vec<MoveId> = moves.iter().copied().map(MoveId).collect();
    let mut snapshot = CombatantSnapshot::from_species(content, SpeciesId(species), level, &moves)?;
    snapshot.ability = ability;
    snapshot.held_item = item;
    Ok(snapshot)
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let options = parse_args()?;
    let content = StaticContent::bundled()?;

    // Pikachu (Static, Sitrus Berry) against Squirtle (Torrent, Leftovers).
    let player = demo_combatant(&content, 25, 30, &[85, 98, 86, 129], Some(9), Some(5))?;
    let opponent = demo_combatant(&content, 7, 30, &[55, 33, 44, 39], Some(67), Some(4))?;
    let mut state = start_battle(&content, player, opponent, options.seed)?;

    if options.json {
        let result = run_to_completion(&mut state)?;
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!(
        "{} (Lv. {}) vs {} (Lv. {})",
        state.combatant(Side::Player).name,
        state.combatant(Side::Player).level,
        state.combatant(Side::Opponent).name,
        state.combatant(Side::Opponent).level
    );
    let mut logger = StdoutLogger {
        details: options.details,
    };
    while !state.is_over() {
        if state.turn_number > state.config.max_turns {
            println!("  The battle ended in a draw.");
            break;
        }
        println!("Turn {}:", state.turn_number);
        run_turn_with_logger(&mut state, &mut logger)?;
        for side in Side::BOTH {
            let combatant = state.combatant(side);
            println!("    {}: {}/{} HP", combatant.name, combatant.current_hp(), combatant.max_hp());
        }
    }

    match state.winner {
        Some(side) => println!("Winner: {}", state.combatant(side).name),
        None => println!("No winner."),
    }
    Ok(())
}
