//! Uniform random move choice
//!
//! The always-available selector. The HTTP service also calls
//! [`random_move`] directly when a model-backed selector fails.

use rand::seq::IndexedRandom;
use shakmaty::{Chess, Move, Position};

use crate::error::{SelectError, SelectResult};
use crate::MoveSelector;

/// Pick one move uniformly at random, `None` for an empty slice
pub fn random_move(moves: &[Move]) -> Option<Move> {
    moves.choose(&mut rand::rng()).cloned()
}

/// Selector that plays a uniformly random legal move
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSelector;

impl MoveSelector for RandomSelector {
    fn select(&self, pos: &Chess) -> SelectResult<Move> {
        let legal = pos.legal_moves();
        random_move(&legal).ok_or(SelectError::NoLegalMoves)
    }

    fn name(&self) -> &'static str {
        "random"
    }
}
