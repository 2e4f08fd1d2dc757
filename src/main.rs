use anyhow::{Context, Result};
use arena_core::engine::eval::checkers::CheckersWeights;
use arena_core::engine::SearchStats;
use arena_core::logic::checkers::Checkers;
use arena_core::logic::gomoku::Gomoku;
use arena_core::logic::tictactoe::TicTacToe;
use arena_core::logic::xiangqi::Xiangqi;
use arena_core::{AiPlayer, Difficulty, EngineConfig, Game, GameStatus, Side};
use clap::{Parser, ValueEnum};
use log::{debug, info, warn};
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum GameKind {
    Checkers,
    Xiangqi,
    Gomoku,
    Tictactoe,
}

/// Self-play between two computer opponents.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Options {
    #[arg(value_enum)]
    game: GameKind,

    /// Tier of the side that moves first.
    #[arg(long, default_value = "hard")]
    first: Difficulty,

    #[arg(long, default_value = "medium")]
    second: Difficulty,

    /// Seed for the easy tier's random choices.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = 200)]
    max_plies: usize,

    /// Engine tuning as JSON. Ordering weights are multipliers.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Checkers evaluation weights as JSON multipliers.
    #[arg(long)]
    checkers_weights: Option<PathBuf>,

    /// Print a JSON summary instead of a line of text.
    #[arg(long)]
    json: bool,
}

struct Summary {
    plies: usize,
    status: GameStatus,
    nodes: u64,
}

fn read(path: &PathBuf) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

#[allow(clippy::indexing_slicing)]
fn play<G: Game>(game: &G, options: &Options, config: Arc<EngineConfig>, seed: u64) -> Summary {
    let mut players = [
        AiPlayer::with_config(game, options.first, Arc::clone(&config)).with_seed(seed),
        AiPlayer::with_config(game, options.second, config).with_seed(seed.wrapping_add(1)),
    ];
    let mut board = game.initial_board();
    let mut side = Side::First;
    let mut nodes = 0;
    let mut plies = 0;

    while plies < options.max_plies {
        if game.status(&board, side).is_terminal() {
            break;
        }
        let Some(decision) = players[side.index()].decide(&board, side) else {
            warn!("{}: {side:?} has no move", G::NAME);
            break;
        };
        let SearchStats {
            depth,
            nodes: searched,
            score,
            ..
        } = decision.stats;
        nodes += searched;
        plies += 1;
        info!(
            "{plies:>3}. {side:?} {:?} (depth {depth}, score {score}, {searched} nodes)",
            decision.mv
        );
        board = game.apply(&board, &decision.mv);
        side = side.opposite();
    }
    debug!("{}: final board {board:?}", G::NAME);

    Summary {
        plies,
        status: game.status(&board, side),
        nodes,
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let options = Options::parse();

    let config = match &options.config {
        Some(path) => EngineConfig::load_from_json(&read(path)?)
            .with_context(|| format!("loading engine config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let config = Arc::new(config);
    let seed = options.seed.unwrap_or_else(rand::random);
    info!(
        "{:?}: {} vs {} (seed {seed})",
        options.game, options.first, options.second
    );

    let summary = match options.game {
        GameKind::Checkers => {
            let game = match &options.checkers_weights {
                Some(path) => Checkers::with_weights(
                    CheckersWeights::load_from_json(&read(path)?)
                        .with_context(|| format!("loading checkers weights {}", path.display()))?,
                ),
                None => Checkers::default(),
            };
            play(&game, &options, config, seed)
        }
        GameKind::Xiangqi => play(&Xiangqi, &options, config, seed),
        GameKind::Gomoku => play(&Gomoku::default(), &options, config, seed),
        GameKind::Tictactoe => play(&TicTacToe, &options, config, seed),
    };

    let outcome = match summary.status {
        GameStatus::Win(Side::First) => "first player wins",
        GameStatus::Win(Side::Second) => "second player wins",
        GameStatus::Draw => "draw",
        GameStatus::Ongoing => "unfinished",
    };
    if options.json {
        let report = json!({
            "game": format!("{:?}", options.game).to_lowercase(),
            "first": options.first,
            "second": options.second,
            "seed": seed,
            "plies": summary.plies,
            "status": summary.status,
            "nodes": summary.nodes,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{outcome} after {} plies ({} nodes searched)", summary.plies, summary.nodes);
    }
    info!("{outcome}");
    Ok(())
}
