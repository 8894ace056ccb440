use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use gravtwist::config::AppConfig;
use gravtwist::game::Player;
use gravtwist::ui::App;
use ratatui::{backend::CrosstermBackend, Terminal};

/// Play Connect Four on a board that rotates every few drops.
#[derive(Parser)]
#[command(name = "gravtwist", about = "Play Grav-Twist Connect Four")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "gravtwist.toml")]
    config: PathBuf,

    /// Two humans share the keyboard; no computer opponent
    #[arg(long)]
    two_player: bool,

    /// Let the computer make the first move
    #[arg(long)]
    computer_first: bool,

    /// Override drops between rotations (0 disables rotation)
    #[arg(long)]
    rotate_every: Option<usize>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    if cli.two_player {
        config.opponent.enabled = false;
    }
    if cli.computer_first {
        config.opponent.team = Player::One;
    }
    if let Some(rotate_every) = cli.rotate_every {
        config.game.rotate_every = rotate_every;
    }

    // Setup terminal
    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("creating terminal")?;

    // Create app and run
    let mut app = App::new(&config);
    let res = app.run(&mut terminal);

    // Restore terminal — always runs, even on error
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    res.context("running game")
}
