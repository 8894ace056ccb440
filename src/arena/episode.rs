use log::trace;

use crate::ai::Agent;
use crate::error::MatchError;
use crate::game::{GameOutcome, GameState, Player};

/// Result of a single match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchResult {
    pub outcome: GameOutcome,
    pub moves: usize,
    pub rotations: usize,
}

impl MatchResult {
    pub fn winner(&self) -> Option<Player> {
        match self.outcome {
            GameOutcome::Winner(p) => Some(p),
            GameOutcome::Tie | GameOutcome::Draw => None,
        }
    }
}

/// Play one game to completion. `first` plays Player 1, `second` Player 2.
pub fn play_match(
    first: &mut dyn Agent,
    second: &mut dyn Agent,
    rotate_every: usize,
) -> Result<MatchResult, MatchError> {
    let mut state = GameState::new(rotate_every);
    let mut rotations = 0;

    while !state.is_terminal() {
        let agent: &mut dyn Agent = match state.current_player() {
            Player::One => &mut *first,
            Player::Two => &mut *second,
        };

        let column = agent.select_action(&state).ok_or_else(|| MatchError::NoMove {
            agent: agent.name().to_string(),
            legal: state.legal_columns(),
        })?;
        let report = state.play(column).map_err(|source| MatchError::IllegalMove {
            agent: agent.name().to_string(),
            column,
            source,
        })?;

        trace!(
            "{} ({}) played column {column}\n{}",
            agent.name(),
            report.player.name(),
            state.board()
        );
        if report.rotated {
            rotations += 1;
        }
    }

    let outcome = state
        .outcome()
        .expect("terminal state must have an outcome");

    Ok(MatchResult {
        outcome,
        moves: state.pieces_dropped(),
        rotations,
    })
}
