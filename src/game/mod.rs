//! Core game logic: the rotating board, player types, and the turn-by-turn
//! game state that rotates the board every few drops and scores lines.

mod board;
mod player;
mod state;

pub use board::{Board, Cell, Fall, Falls, Position, Victory, BOARD_SIZE, LINE_LEN};
pub use player::Player;
pub use state::{GameOutcome, GameState, MoveError, TurnReport, ROTATE_EVERY};
