use rand::Rng;

use crate::game::{Board, Cell, GameState, Player};

use super::agent::Agent;

/// Who would complete a line if one open column were filled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnProbe {
    pub column: usize,
    /// Players with a line after the selector's own piece lands there
    pub own_piece: Vec<Player>,
    /// Players with a line if the other player's piece sat there instead
    pub other_piece: Vec<Player>,
}

impl ColumnProbe {
    /// True if any player completes a line under either piece
    pub fn is_threat(&self) -> bool {
        !self.own_piece.is_empty() || !self.other_piece.is_empty()
    }
}

/// One-ply opponent: win now if possible, else block the first threat, else
/// play a random open column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveSelector {
    team: Player,
}

impl MoveSelector {
    pub fn new(team: Player) -> Self {
        MoveSelector { team }
    }

    pub fn team(&self) -> Player {
        self.team
    }

    /// Pick a column using the thread-local RNG for the random fallback.
    pub fn select_move(&self, board: &Board) -> Option<usize> {
        self.select_move_with(board, &mut rand::rng())
    }

    /// Pick a column. Returns `None` only when every column is full.
    pub fn select_move_with<R: Rng>(&self, board: &Board, rng: &mut R) -> Option<usize> {
        let probes = self.probe_columns(board);

        if let Some(win) = probes.iter().find(|p| p.own_piece.contains(&self.team)) {
            return Some(win.column);
        }
        if let Some(threat) = probes.iter().find(|p| p.is_threat()) {
            return Some(threat.column);
        }

        let open = board.legal_columns();
        if open.is_empty() {
            return None;
        }
        Some(open[rng.random_range(0..open.len())])
    }

    /// Fill each open column on a scratch copy, first with this team's piece
    /// and then with the other team's, and record who completes a line.
    pub fn probe_columns(&self, board: &Board) -> Vec<ColumnProbe> {
        let mut scratch = board.clone();

        (0..scratch.width())
            .filter_map(|column| {
                let row = scratch.drop_piece(column, self.team).ok()?;
                let own_piece = scratch.winners();

                scratch.set(column, row, self.team.other().to_cell());
                let other_piece = scratch.winners();

                scratch.set(column, row, Cell::Empty);
                Some(ColumnProbe {
                    column,
                    own_piece,
                    other_piece,
                })
            })
            .collect()
    }
}

impl Agent for MoveSelector {
    fn select_action(&mut self, state: &GameState) -> Option<usize> {
        self.select_move(state.board())
    }

    fn name(&self) -> &str {
        "Reflex"
    }
}
