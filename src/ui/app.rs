use crate::ai::MoveSelector;
use crate::config::AppConfig;
use crate::game::{GameOutcome, GameState, MoveError, TurnReport};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{backend::Backend, Terminal};
use std::io;

pub struct App {
    game_state: GameState,
    rotate_every: usize,
    opponent: Option<MoveSelector>,
    selected_column: usize,
    should_quit: bool,
    message: Option<String>,
}

impl App {
    pub fn new(config: &AppConfig) -> Self {
        let opponent = config
            .opponent
            .enabled
            .then(|| MoveSelector::new(config.opponent.team));
        let mut app = App {
            game_state: GameState::new(config.game.rotate_every),
            rotate_every: config.game.rotate_every,
            opponent,
            selected_column: 3, // Start in middle
            should_quit: false,
            message: None,
        };
        app.opponent_turn();
        app
    }

    /// Main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()>
    where
        B::Error: Into<io::Error>,
    {
        loop {
            terminal.draw(|f| self.render(f)).map_err(Into::<io::Error>::into)?;

            if self.should_quit {
                break;
            }

            self.handle_events()?;
        }
        Ok(())
    }

    /// Handle keyboard events
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    /// Handle key press
    fn handle_key(&mut self, key: KeyEvent) {
        // Clear message on any key press
        self.message = None;

        let last_column = self.game_state.board().width() - 1;
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Left => {
                self.selected_column = self.selected_column.saturating_sub(1);
            }
            KeyCode::Right => {
                self.selected_column = (self.selected_column + 1).min(last_column);
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.drop_piece();
            }
            KeyCode::Char('r') => {
                self.game_state = GameState::new(self.rotate_every);
                self.selected_column = 3;
                self.message = Some("New game started!".to_string());
                self.opponent_turn();
            }
            _ => {}
        }
    }

    /// Drop piece in selected column, then let the computer reply
    fn drop_piece(&mut self) {
        if self.game_state.is_terminal() {
            self.message = Some("Game over! Press 'r' to restart.".to_string());
            return;
        }

        match self.game_state.play(self.selected_column) {
            Ok(report) => {
                self.message = self.describe(&report);
                self.opponent_turn();
            }
            Err(MoveError::ColumnFull(_)) => {
                self.message = Some("Column is full!".to_string());
            }
            Err(MoveError::InvalidColumn(_)) => {
                self.message = Some("Invalid column!".to_string());
            }
            Err(MoveError::GameOver) => {
                self.message = Some("Game is over!".to_string());
            }
        }
    }

    /// Play for the computer if it is enabled and on move
    fn opponent_turn(&mut self) {
        let Some(opponent) = self.opponent else {
            return;
        };
        if self.game_state.is_terminal() || self.game_state.current_player() != opponent.team() {
            return;
        }
        let Some(column) = opponent.select_move(self.game_state.board()) else {
            return;
        };

        if let Ok(report) = self.game_state.play(column) {
            let mut parts = Vec::new();
            if let Some(previous) = self.message.take() {
                parts.push(previous);
            }
            parts.push(format!("Computer played column {}", column + 1));
            parts.extend(self.describe(&report));
            self.message = Some(parts.join("  |  "));
        }
    }

    fn describe(&self, report: &TurnReport) -> Option<String> {
        if let Some(outcome) = self.game_state.outcome() {
            return Some(match outcome {
                GameOutcome::Winner(player) => format!("{} wins!", player.name()),
                GameOutcome::Tie => "Both players lined up, it's a tie!".to_string(),
                GameOutcome::Draw => "The board is full, it's a draw!".to_string(),
            });
        }
        report
            .rotated
            .then(|| format!("Board rotated! {} pieces fell.", report.falls.len()))
    }

    fn mode(&self) -> &'static str {
        if self.opponent.is_some() {
            "vs Computer"
        } else {
            "Two Players"
        }
    }

    /// Render the UI
    fn render(&self, frame: &mut ratatui::Frame) {
        super::game_view::render(
            frame,
            &self.game_state,
            self.selected_column,
            &self.message,
            self.mode(),
        );
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}
