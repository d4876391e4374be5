use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use donut_tower_core::solver::{perform_move, plan_for};
use donut_tower_core::{GameSession, PegId, PegSpec, PuzzleRules, RingSpec};
use tracing_subscriber::EnvFilter;

const RING_SIZE_LARGEST: f32 = 1.0;
const RING_SIZE_STEP: f32 = 0.1;
const RING_THICKNESS: f32 = 0.1;
const PEG_SPACING: f32 = 1.0;
const RINGS_MAX: usize = 10;

#[derive(Parser)]
#[command(name = "donut-tower-cli", version, about = "Headless driver for the donut tower puzzle")]
struct Cli {
    /// JSON file with puzzle rules (axis, tolerance, snap radius, ...)
    #[arg(long, global = true, env = "DONUT_TOWER_RULES")]
    rules: Option<PathBuf>,
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play the shortest solution through a session.
    Solve {
        #[arg(long, default_value_t = 3)]
        rings: usize,
        #[arg(long, default_value_t = 3)]
        pegs: usize,
    },
    /// Replay scripted moves, e.g. `--moves 0-2,0-1,2-1`.
    Play {
        #[arg(long, default_value_t = 3)]
        rings: usize,
        #[arg(long, default_value_t = 3)]
        pegs: usize,
        #[arg(long)]
        moves: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let rules = match cli.rules.as_deref() {
        Some(path) => load_rules(path)?,
        None => PuzzleRules::default(),
    };

    match cli.command {
        Commands::Solve { rings, pegs } => {
            let mut session = start(rules, rings, pegs)?;
            let plan = plan_for(&session);
            if plan.is_empty() {
                return Err("solver needs at least 3 pegs".into());
            }
            for (step, planned) in plan.iter().enumerate() {
                perform_move(&mut session, planned.from, planned.to).map_err(|reason| {
                    format!("step {}: {} -> {} rejected: {reason}", step + 1, planned.from, planned.to)
                })?;
                println!("{:>4}: {} -> {}", step + 1, planned.from.index(), planned.to.index());
            }
            print_summary(&session);
        }
        Commands::Play { rings, pegs, moves } => {
            let mut session = start(rules, rings, pegs)?;
            for (step, (from, to)) in parse_moves(&moves)?.into_iter().enumerate() {
                match perform_move(&mut session, PegId(from), PegId(to)) {
                    Ok(_) => println!("{:>4}: {from} -> {to} ok", step + 1),
                    Err(reason) => println!("{:>4}: {from} -> {to} rejected ({reason})", step + 1),
                }
            }
            print_summary(&session);
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_rules(path: &Path) -> Result<PuzzleRules, Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(path)?;
    let rules: PuzzleRules = serde_json::from_str(&raw)?;
    tracing::debug!(path = %path.display(), ?rules, "loaded rules");
    Ok(rules.sanitized())
}

fn start(
    rules: PuzzleRules,
    rings: usize,
    pegs: usize,
) -> Result<GameSession, Box<dyn std::error::Error>> {
    if rings > RINGS_MAX {
        return Err(format!("at most {RINGS_MAX} rings").into());
    }
    let mut session = GameSession::new(rules);
    session.start_session(
        RingSpec::graded(rings, RING_SIZE_LARGEST, RING_SIZE_STEP, RING_THICKNESS),
        PegSpec::row(pegs, PEG_SPACING),
    )?;
    tracing::debug!(rules = ?session.rules(), rings, pegs, "session ready");
    Ok(session)
}

fn print_summary(session: &GameSession) {
    for peg in session.pegs() {
        if let Some(arrangement) = session.arrangement(peg.id) {
            println!("{}: {arrangement}", peg.name);
        }
    }
    println!(
        "moves: {} (optimal {}), solved: {}",
        session.moves(),
        session.optimal_move_count(),
        session.is_session_solved()
    );
}

fn parse_moves(raw: &str) -> Result<Vec<(usize, usize)>, Box<dyn std::error::Error>> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| -> Result<(usize, usize), Box<dyn std::error::Error>> {
            let (from, to) = part
                .split_once('-')
                .ok_or_else(|| format!("move `{part}` must look like `from-to`"))?;
            Ok((from.trim().parse::<usize>()?, to.trim().parse::<usize>()?))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_moves_accepts_spaces_and_trailing_comma() {
        let moves = parse_moves(" 0-2, 0 - 1,2-1,").expect("moves");
        assert_eq!(moves, vec![(0, 2), (0, 1), (2, 1)]);
    }

    #[test]
    fn parse_moves_rejects_garbage() {
        assert!(parse_moves("0to2").is_err());
        assert!(parse_moves("a-1").is_err());
    }

    #[test]
    fn solve_plan_finishes_session() {
        let mut session = start(PuzzleRules::default(), 4, 3).expect("session");
        for planned in plan_for(&session) {
            perform_move(&mut session, planned.from, planned.to).expect("move");
        }
        assert!(session.is_session_solved());
        assert_eq!(u64::from(session.moves()), session.optimal_move_count());
    }

    #[test]
    fn start_rejects_single_peg() {
        assert!(start(PuzzleRules::default(), 3, 1).is_err());
    }
}
