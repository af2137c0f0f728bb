//! Move selection for the chess move service
//!
//! Provides the [`MoveSelector`] seam used by the HTTP handler, a uniform
//! random selector, and a model-backed selector that runs a bounded tree
//! search over a weights-file evaluator.
//!
//! ## Module Organization
//!
//! - `random` - Uniform choice over legal moves
//! - `evaluator` - Policy/value evaluation and weights loading
//! - `mcts` - Bounded PUCT search
//! - `error` - Selection, evaluation and loading errors

use std::path::Path;

use shakmaty::{Chess, Move};

pub mod error;
pub mod evaluator;
pub mod mcts;
pub mod random;

pub use error::{EvaluatorError, SelectError, SelectResult, WeightsError};
pub use evaluator::{Evaluation, Evaluator, EvaluatorWeights, MaterialEvaluator};
pub use mcts::{MctsConfig, MctsSelector, DEFAULT_SEARCHES};
pub use random::{random_move, RandomSelector};

/// Chooses one move for a position
///
/// Implementations must only return moves from the position's legal move
/// list; callers still verify membership before playing the move.
pub trait MoveSelector: Send + Sync {
    fn select(&self, pos: &Chess) -> SelectResult<Move>;

    /// Short identifier used in logs
    fn name(&self) -> &'static str;
}

/// Load evaluator weights and build the model-backed selector
pub fn load_selector(
    weights: impl AsRef<Path>,
    searches: u32,
) -> Result<MctsSelector<MaterialEvaluator>, WeightsError> {
    let weights = EvaluatorWeights::load(weights)?;
    Ok(MctsSelector::new(
        MaterialEvaluator::new(weights),
        MctsConfig::default().with_searches(searches),
    ))
}
