use std::collections::VecDeque;

use crate::game::{GameOutcome, Player};

use super::episode::MatchResult;

/// Match tallies with rolling window computations.
pub struct MatchMetrics {
    results: VecDeque<MatchResult>,
    capacity: usize,
    total_matches: usize, // lifetime count, never capped
}

impl MatchMetrics {
    pub fn with_capacity(capacity: usize) -> Self {
        MatchMetrics {
            results: VecDeque::with_capacity(capacity),
            capacity,
            total_matches: 0,
        }
    }

    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    pub fn record(&mut self, result: MatchResult) {
        self.total_matches += 1;
        self.results.push_back(result);
        if self.results.len() > self.capacity {
            self.results.pop_front();
        }
    }

    fn rate(&self, last_n: usize, pred: impl Fn(&MatchResult) -> bool) -> f32 {
        let n = self.results.len().min(last_n);
        if n == 0 {
            return 0.0;
        }
        let hits = self.results.iter().rev().take(n).filter(|r| pred(r)).count();
        hits as f32 / n as f32
    }

    /// Win rate for `player` in the last N matches.
    pub fn win_rate(&self, player: Player, last_n: usize) -> f32 {
        self.rate(last_n, |r| r.outcome == GameOutcome::Winner(player))
    }

    /// Share of the last N matches where both players lined up equally.
    pub fn tie_rate(&self, last_n: usize) -> f32 {
        self.rate(last_n, |r| r.outcome == GameOutcome::Tie)
    }

    /// Share of the last N matches that filled the board.
    pub fn draw_rate(&self, last_n: usize) -> f32 {
        self.rate(last_n, |r| r.outcome == GameOutcome::Draw)
    }

    fn average(&self, last_n: usize, value: impl Fn(&MatchResult) -> usize) -> f32 {
        let n = self.results.len().min(last_n);
        if n == 0 {
            return 0.0;
        }
        let total: usize = self.results.iter().rev().take(n).map(value).sum();
        total as f32 / n as f32
    }

    /// Average game length over the last N matches.
    pub fn average_game_length(&self, last_n: usize) -> f32 {
        self.average(last_n, |r| r.moves)
    }

    pub fn average_rotations(&self, last_n: usize) -> f32 {
        self.average(last_n, |r| r.rotations)
    }

    pub fn total_matches(&self) -> usize {
        self.total_matches
    }
}

impl Default for MatchMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(outcome: GameOutcome, moves: usize) -> MatchResult {
        MatchResult {
            outcome,
            moves,
            rotations: moves / 3,
        }
    }

    #[test]
    fn test_empty_metrics() {
        let metrics = MatchMetrics::new();
        assert_eq!(metrics.win_rate(Player::One, 100), 0.0);
        assert_eq!(metrics.average_game_length(100), 0.0);
        assert_eq!(metrics.total_matches(), 0);
    }

    #[test]
    fn test_rates() {
        let mut metrics = MatchMetrics::new();
        metrics.record(result(GameOutcome::Winner(Player::One), 9));
        metrics.record(result(GameOutcome::Winner(Player::One), 12));
        metrics.record(result(GameOutcome::Winner(Player::Two), 15));
        metrics.record(result(GameOutcome::Draw, 49));

        assert!((metrics.win_rate(Player::One, 100) - 0.5).abs() < 1e-6);
        assert!((metrics.win_rate(Player::Two, 100) - 0.25).abs() < 1e-6);
        assert!((metrics.draw_rate(100) - 0.25).abs() < 1e-6);
        assert_eq!(metrics.tie_rate(100), 0.0);
        assert!((metrics.average_game_length(100) - 21.25).abs() < 1e-6);
        assert!((metrics.average_rotations(100) - 7.0).abs() < 1e-6);
    }

    #[test]
    fn test_last_n_window() {
        let mut metrics = MatchMetrics::new();
        metrics.record(result(GameOutcome::Winner(Player::One), 9));
        metrics.record(result(GameOutcome::Tie, 21));

        assert_eq!(metrics.tie_rate(1), 1.0);
        assert_eq!(metrics.win_rate(Player::One, 1), 0.0);
    }

    #[test]
    fn test_capacity_caps_window_not_total() {
        let mut metrics = MatchMetrics::with_capacity(2);
        for _ in 0..5 {
            metrics.record(result(GameOutcome::Draw, 49));
        }
        metrics.record(result(GameOutcome::Winner(Player::Two), 10));

        assert_eq!(metrics.total_matches(), 6);
        assert!((metrics.draw_rate(100) - 0.5).abs() < 1e-6);
    }
}
