use log::debug;

use super::board::{Fall, Victory};
use super::{Board, Player};
use crate::error::BoardError;

/// Drops between rotations in a standard game.
pub const ROTATE_EVERY: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    /// One player completed more lines than the other.
    Winner(Player),
    /// Both players completed the same number of lines at once.
    Tie,
    /// The board filled up with no line completed.
    Draw,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("column {0} does not exist")]
    InvalidColumn(usize),

    #[error("column {0} is full")]
    ColumnFull(usize),

    #[error("the game is over")]
    GameOver,
}

/// Everything that happened during one call to [`GameState::play`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReport {
    pub player: Player,
    pub column: usize,
    /// Row the piece landed on before any rotation
    pub row: usize,
    pub rotated: bool,
    /// Pieces moved by gravity after the rotation
    pub falls: Vec<Fall>,
    pub victories: Vec<Victory>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    current_player: Player,
    pieces_dropped: usize,
    rotate_every: usize,
    points: [usize; 2],
    victories: Vec<Victory>,
    outcome: Option<GameOutcome>,
}

impl GameState {
    /// Create a game that rotates the board every `rotate_every` drops. Zero
    /// disables rotation.
    pub fn new(rotate_every: usize) -> Self {
        GameState {
            board: Board::standard(),
            current_player: Player::One, // Player 1 starts
            pieces_dropped: 0,
            rotate_every,
            points: [0; 2],
            victories: Vec::new(),
            outcome: None,
        }
    }

    /// Create initial game state with the standard rotation interval
    pub fn initial() -> Self {
        Self::new(ROTATE_EVERY)
    }

    /// Get current player
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Get reference to board
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn pieces_dropped(&self) -> usize {
        self.pieces_dropped
    }

    pub fn rotate_every(&self) -> usize {
        self.rotate_every
    }

    /// Lines completed by `player` when the game ended
    pub fn points(&self, player: Player) -> usize {
        self.points[player.index()]
    }

    /// Winning lines found when the game ended
    pub fn victories(&self) -> &[Victory] {
        &self.victories
    }

    /// Get game outcome if game is over
    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    /// Check if game is over
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    /// Get list of legal columns (not full)
    pub fn legal_columns(&self) -> Vec<usize> {
        if self.is_terminal() {
            return Vec::new();
        }
        self.board.legal_columns()
    }

    /// Drops left before the next rotation, or `None` if rotation is disabled
    pub fn moves_until_rotate(&self) -> Option<usize> {
        if self.rotate_every == 0 {
            return None;
        }
        Some(self.rotate_every - self.pieces_dropped % self.rotate_every)
    }

    /// Drop the current player's piece into `column`, rotate if this drop is
    /// due for it, then score any completed lines.
    pub fn play(&mut self, column: usize) -> Result<TurnReport, MoveError> {
        if self.is_terminal() {
            return Err(MoveError::GameOver);
        }
        if column >= self.board.width() {
            return Err(MoveError::InvalidColumn(column));
        }
        if self.board.column_blocked(column) {
            return Err(MoveError::ColumnFull(column));
        }

        let player = self.current_player;
        let row = self
            .board
            .drop_piece(column, player)
            .map_err(|e| match e {
                BoardError::InvalidMove { column } => MoveError::ColumnFull(column),
                _ => MoveError::InvalidColumn(column),
            })?;

        self.current_player = player.other();
        self.pieces_dropped += 1;

        let rotated = self.rotate_every != 0 && self.pieces_dropped % self.rotate_every == 0;
        let falls = if rotated {
            self.board.rotate();
            let falls: Vec<Fall> = self.board.falls().collect();
            debug!(
                "rotated after {} drops, {} pieces fell",
                self.pieces_dropped,
                falls.len()
            );
            falls
        } else {
            Vec::new()
        };

        let victories = self.board.check_victory();
        self.score(&victories);

        Ok(TurnReport {
            player,
            column,
            row,
            rotated,
            falls,
            victories,
        })
    }

    fn score(&mut self, victories: &[Victory]) {
        if victories.is_empty() {
            if self.board.is_full() {
                debug!("board full after {} drops", self.pieces_dropped);
                self.outcome = Some(GameOutcome::Draw);
            }
            return;
        }

        for victory in victories {
            self.points[victory.player.index()] += 1;
        }
        self.victories = victories.to_vec();

        let (one, two) = (self.points(Player::One), self.points(Player::Two));
        let outcome = match one.cmp(&two) {
            std::cmp::Ordering::Greater => GameOutcome::Winner(Player::One),
            std::cmp::Ordering::Less => GameOutcome::Winner(Player::Two),
            std::cmp::Ordering::Equal => GameOutcome::Tie,
        };
        debug!("game over: {outcome:?} ({one} lines to {two})");
        self.outcome = Some(outcome);
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::initial()
    }
}
