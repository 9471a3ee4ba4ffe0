use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use super::Termination;

/// Shared flag that stops a running solve from another thread.
///
/// The solver checks it between moves and while bin packing, then returns
/// the best feasible assignment found so far.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Remaining search budget of one solve.
#[derive(Debug)]
pub(crate) struct Budget {
    deadline: Option<Instant>,
    max_moves: Option<usize>,
    moves: usize,
    cancellation: Option<CancellationToken>,
}

impl Budget {
    /// Tightest limit of each kind wins.
    pub fn new(
        started: Instant,
        terminations: &[Termination],
        cancellation: Option<CancellationToken>,
    ) -> Self {
        let mut deadline: Option<Instant> = None;
        let mut max_moves: Option<usize> = None;
        for termination in terminations {
            match termination {
                Termination::Moves(moves) => {
                    max_moves = Some(max_moves.map_or(*moves, |m| m.min(*moves)));
                }
                // past the representable range means no deadline
                Termination::Duration(limit) => {
                    if let Some(at) = started.checked_add(*limit) {
                        deadline = Some(deadline.map_or(at, |d| d.min(at)));
                    }
                }
            }
        }
        Self {
            deadline,
            max_moves,
            moves: 0,
            cancellation,
        }
    }

    /// Deadline passed or cancelled. Move counts are not considered.
    pub fn interrupted(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
            || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    pub fn is_exhausted(&self) -> bool {
        self.max_moves.is_some_and(|max| self.moves >= max) || self.interrupted()
    }

    pub fn record_move(&mut self) {
        self.moves += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_move_budget() {
        let mut budget = Budget::new(
            Instant::now(),
            &[Termination::Moves(3), Termination::Moves(2)],
            None,
        );
        assert!(!budget.is_exhausted());
        budget.record_move();
        budget.record_move();
        assert!(budget.is_exhausted());
        assert!(!budget.interrupted());
    }

    #[test]
    fn test_zero_duration() {
        let budget = Budget::new(Instant::now(), &[Termination::Duration(Duration::ZERO)], None);
        assert!(budget.interrupted());
    }

    #[test]
    fn test_unbounded_duration_has_no_deadline() {
        let budget = Budget::new(Instant::now(), &[Termination::Duration(Duration::MAX)], None);
        assert!(!budget.is_exhausted());

        let budget = Budget::new(
            Instant::now(),
            &[
                Termination::Duration(Duration::MAX),
                Termination::Duration(Duration::ZERO),
            ],
            None,
        );
        assert!(budget.interrupted());
    }

    #[test]
    fn test_cancellation() {
        let token = CancellationToken::new();
        let budget = Budget::new(Instant::now(), &[], Some(token.clone()));
        assert!(!budget.is_exhausted());
        token.cancel();
        assert!(budget.is_exhausted());
    }
}
