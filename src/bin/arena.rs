use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{debug, info};

use gravtwist::ai::{Agent, MoveSelector, RandomAgent};
use gravtwist::arena::{play_match, MatchMetrics};
use gravtwist::config::AppConfig;
use gravtwist::game::Player;

/// Pit the reflex move selector against another agent, headless.
#[derive(Parser)]
#[command(name = "arena", about = "Play Grav-Twist matches between computer agents")]
struct Cli {
    /// Opponent for the reflex selector: reflex or random
    #[arg(long, default_value = "random")]
    opponent: String,

    /// Path to TOML configuration file
    #[arg(long, default_value = "gravtwist.toml")]
    config: PathBuf,

    /// Override number of matches
    #[arg(long)]
    games: Option<usize>,

    /// Seed for the random opponent
    #[arg(long)]
    seed: Option<u64>,

    /// Log level: error, warn, info, debug or trace
    #[arg(long, default_value = "info")]
    log_level: log::LevelFilter,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    simple_logger::SimpleLogger::new()
        .with_level(cli.log_level)
        .init()
        .context("installing logger")?;

    match cli.opponent.as_str() {
        "reflex" | "random" => {}
        other => bail!("unknown opponent '{}' (expected 'reflex' or 'random')", other),
    }

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    if let Some(games) = cli.games {
        config.arena.num_games = games;
    }
    if cli.seed.is_some() {
        config.arena.seed = cli.seed;
    }
    config.validate().context("validating config")?;

    let metrics = run_matches(&config, &cli.opponent)?;
    print_summary(&metrics, config.arena.num_games, &cli.opponent);
    Ok(())
}

/// Play all matches, alternating which side the reflex selector takes.
fn run_matches(config: &AppConfig, opponent: &str) -> Result<MatchMetrics> {
    let arena = &config.arena;
    let mut metrics = MatchMetrics::with_capacity(arena.num_games);
    let mut reflex_wins = 0;

    for game in 0..arena.num_games {
        let reflex_team = if game % 2 == 0 { Player::One } else { Player::Two };
        let mut reflex = MoveSelector::new(reflex_team);
        let mut other: Box<dyn Agent> = match opponent {
            "reflex" => Box::new(MoveSelector::new(reflex_team.other())),
            _ => match arena.seed {
                Some(seed) => Box::new(RandomAgent::with_seed(seed.wrapping_add(game as u64))),
                None => Box::new(RandomAgent::new()),
            },
        };

        let result = match reflex_team {
            Player::One => play_match(&mut reflex, other.as_mut(), config.game.rotate_every),
            Player::Two => play_match(other.as_mut(), &mut reflex, config.game.rotate_every),
        }
        .with_context(|| format!("playing match {}", game + 1))?;

        if result.winner() == Some(reflex_team) {
            reflex_wins += 1;
        }
        debug!(
            "match {}: reflex as {} -> {:?} after {} moves, {} rotations",
            game + 1,
            reflex_team.name(),
            result.outcome,
            result.moves,
            result.rotations
        );
        metrics.record(result);

        if (game + 1) % arena.log_every == 0 {
            info!(
                "{}/{} matches, reflex won {}",
                game + 1,
                arena.num_games,
                reflex_wins
            );
        }
    }

    Ok(metrics)
}

fn print_summary(metrics: &MatchMetrics, window: usize, opponent: &str) {
    println!("Reflex vs {opponent}: {} matches", metrics.total_matches());
    println!(
        "  Player 1 wins: {:.1}%",
        metrics.win_rate(Player::One, window) * 100.0
    );
    println!(
        "  Player 2 wins: {:.1}%",
        metrics.win_rate(Player::Two, window) * 100.0
    );
    println!("  Ties:          {:.1}%", metrics.tie_rate(window) * 100.0);
    println!("  Draws:         {:.1}%", metrics.draw_rate(window) * 100.0);
    println!(
        "  Avg length:    {:.1} moves, {:.1} rotations",
        metrics.average_game_length(window),
        metrics.average_rotations(window)
    );
}
