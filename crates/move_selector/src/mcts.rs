//! Bounded PUCT tree search over an [`Evaluator`]
//!
//! Each call to [`MctsSelector::select`] builds a fresh arena tree, runs a
//! fixed number of searches and returns the most visited root move. The
//! selector itself is never mutated, so one instance can serve concurrent
//! requests.

use shakmaty::{Chess, Move, Position};
use tracing::debug;

use crate::error::{EvaluatorError, SelectError, SelectResult};
use crate::evaluator::Evaluator;
use crate::MoveSelector;

/// Search budget used by the HTTP service
pub const DEFAULT_SEARCHES: u32 = 75;

/// Search parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MctsConfig {
    /// Number of select/expand/backup passes per call
    pub searches: u32,
    /// PUCT exploration constant
    pub exploration: f32,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            searches: DEFAULT_SEARCHES,
            exploration: 1.5,
        }
    }
}

impl MctsConfig {
    pub fn with_searches(mut self, searches: u32) -> Self {
        self.searches = searches;
        self
    }
}

#[derive(Debug)]
struct Edge {
    mv: Move,
    prior: f32,
    visits: u32,
    /// Accumulated value from the perspective of the side to move at the owning node
    value_sum: f32,
    child: Option<usize>,
}

#[derive(Debug)]
struct Node {
    edges: Vec<Edge>,
    visits: u32,
    /// Evaluator estimate for the side to move, used as first-play value
    value: f32,
}

struct Tree<'e, E: Evaluator> {
    evaluator: &'e E,
    exploration: f32,
    nodes: Vec<Node>,
}

impl<'e, E: Evaluator> Tree<'e, E> {
    /// Create a node for `pos` and return its id with the leaf value
    fn expand(&mut self, pos: &Chess) -> Result<(usize, f32), EvaluatorError> {
        let legal = pos.legal_moves();
        let (edges, value) = if legal.is_empty() {
            let value = if pos.is_checkmate() { -1.0 } else { 0.0 };
            (Vec::new(), value)
        } else if pos.is_insufficient_material() {
            (Vec::new(), 0.0)
        } else {
            let eval = self.evaluator.evaluate(pos, &legal)?;
            if eval.priors.len() != legal.len() {
                return Err(EvaluatorError::PolicyShape {
                    expected: legal.len(),
                    got: eval.priors.len(),
                });
            }
            let edges = legal
                .into_iter()
                .zip(eval.priors)
                .map(|(mv, prior)| Edge {
                    mv,
                    prior,
                    visits: 0,
                    value_sum: 0.0,
                    child: None,
                })
                .collect();
            (edges, eval.value)
        };
        self.nodes.push(Node {
            edges,
            visits: 0,
            value,
        });
        Ok((self.nodes.len() - 1, value))
    }

    fn select_edge(&self, node: usize) -> usize {
        let node = &self.nodes[node];
        let sqrt_visits = (node.visits as f32).sqrt().max(1.0);
        let mut best = 0;
        let mut best_score = f32::NEG_INFINITY;
        for (i, edge) in node.edges.iter().enumerate() {
            let q = if edge.visits == 0 {
                node.value
            } else {
                edge.value_sum / edge.visits as f32
            };
            let u = self.exploration * edge.prior * sqrt_visits / (1.0 + edge.visits as f32);
            if q + u > best_score {
                best_score = q + u;
                best = i;
            }
        }
        best
    }

    /// One select/expand/backup pass from the root
    fn search_once(&mut self, root: &Chess) -> Result<(), EvaluatorError> {
        let mut pos = root.clone();
        let mut path: Vec<(usize, usize)> = Vec::new();
        let mut node = 0;

        let leaf_value = loop {
            if self.nodes[node].edges.is_empty() {
                // Terminal: re-score exactly rather than trusting the stored value
                break if pos.is_checkmate() { -1.0 } else { 0.0 };
            }
            let edge = self.select_edge(node);
            path.push((node, edge));
            pos.play_unchecked(&self.nodes[node].edges[edge].mv);
            match self.nodes[node].edges[edge].child {
                Some(child) => node = child,
                None => {
                    let (child, value) = self.expand(&pos)?;
                    self.nodes[node].edges[edge].child = Some(child);
                    break value;
                }
            }
        };

        let mut value = leaf_value;
        for &(node, edge) in path.iter().rev() {
            value = -value;
            let n = &mut self.nodes[node];
            n.visits += 1;
            n.edges[edge].visits += 1;
            n.edges[edge].value_sum += value;
        }
        Ok(())
    }
}

/// Tree-search selector backed by an evaluator
#[derive(Debug, Clone)]
pub struct MctsSelector<E> {
    evaluator: E,
    config: MctsConfig,
}

impl<E: Evaluator> MctsSelector<E> {
    pub fn new(evaluator: E, config: MctsConfig) -> Self {
        Self { evaluator, config }
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }
}

impl<E: Evaluator> MoveSelector for MctsSelector<E> {
    fn select(&self, pos: &Chess) -> SelectResult<Move> {
        let mut tree = Tree {
            evaluator: &self.evaluator,
            exploration: self.config.exploration,
            nodes: Vec::new(),
        };
        tree.expand(pos)?;

        let root = &tree.nodes[0];
        match root.edges.len() {
            0 => return Err(SelectError::NoLegalMoves),
            1 => return Ok(root.edges[0].mv.clone()),
            _ => {}
        }

        for _ in 0..self.config.searches {
            tree.search_once(pos)?;
        }

        let root = &tree.nodes[0];
        let best = root
            .edges
            .iter()
            .filter(|edge| edge.visits > 0)
            .max_by(|a, b| a.visits.cmp(&b.visits).then(a.prior.total_cmp(&b.prior)))
            .ok_or(SelectError::EmptySearch {
                searches: self.config.searches,
            })?;

        debug!(
            nodes = tree.nodes.len(),
            visits = best.visits,
            "search finished"
        );
        Ok(best.mv.clone())
    }

    fn name(&self) -> &'static str {
        "mcts"
    }
}
