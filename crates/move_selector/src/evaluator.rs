//! Position evaluation for the tree search
//!
//! An [`Evaluator`] returns a prior over the legal moves and a value for the
//! side to move. [`MaterialEvaluator`] is the bundled implementation: a small
//! hand-weighted model whose weights ship as a JSON file next to the service.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use shakmaty::{Chess, Color, Move, Position, Role};

use crate::error::{EvaluatorError, WeightsError};

/// Output of a single evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Probability per legal move, same order as the move slice
    pub priors: Vec<f32>,
    /// Expected result for the side to move in `[-1, 1]`
    pub value: f32,
}

/// Policy/value oracle consulted by [`crate::MctsSelector`]
///
/// Shared read-only across requests, so evaluation takes `&self`.
pub trait Evaluator: Send + Sync {
    fn evaluate(&self, pos: &Chess, moves: &[Move]) -> Result<Evaluation, EvaluatorError>;
}

/// Weights for [`MaterialEvaluator`]
///
/// Missing fields fall back to their defaults, so a weights file only needs
/// the values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorWeights {
    pub pawn: f32,
    pub knight: f32,
    pub bishop: f32,
    pub rook: f32,
    pub queen: f32,
    /// Prior bonus per unit of captured material
    pub capture_bonus: f32,
    /// Prior bonus per unit of promoted material
    pub promotion_bonus: f32,
    /// Softmax temperature for the move prior
    pub temperature: f32,
    /// Material difference mapped to a value of `tanh(1)`
    pub value_scale: f32,
}

impl Default for EvaluatorWeights {
    fn default() -> Self {
        Self {
            pawn: 1.0,
            knight: 3.0,
            bishop: 3.2,
            rook: 5.0,
            queen: 9.0,
            capture_bonus: 1.0,
            promotion_bonus: 0.8,
            temperature: 1.0,
            value_scale: 4.0,
        }
    }
}

impl EvaluatorWeights {
    /// Read and validate weights from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, WeightsError> {
        let raw = fs::read_to_string(path)?;
        let weights: Self = serde_json::from_str(&raw)?;
        weights.validate()?;
        Ok(weights)
    }

    /// Reject weights the search cannot use
    pub fn validate(&self) -> Result<(), WeightsError> {
        let fields = [
            ("pawn", self.pawn),
            ("knight", self.knight),
            ("bishop", self.bishop),
            ("rook", self.rook),
            ("queen", self.queen),
            ("capture_bonus", self.capture_bonus),
            ("promotion_bonus", self.promotion_bonus),
            ("temperature", self.temperature),
            ("value_scale", self.value_scale),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(WeightsError::Invalid {
                    field,
                    reason: format!("{value} is not finite"),
                });
            }
        }
        for (field, value) in [("temperature", self.temperature), ("value_scale", self.value_scale)] {
            if value <= 0.0 {
                return Err(WeightsError::Invalid {
                    field,
                    reason: format!("must be positive, got {value}"),
                });
            }
        }
        Ok(())
    }

    fn role_value(&self, role: Role) -> f32 {
        match role {
            Role::Pawn => self.pawn,
            Role::Knight => self.knight,
            Role::Bishop => self.bishop,
            Role::Rook => self.rook,
            Role::Queen => self.queen,
            Role::King => 0.0,
        }
    }
}

/// Material-count evaluator with capture/promotion-biased priors
#[derive(Debug, Clone, Default)]
pub struct MaterialEvaluator {
    weights: EvaluatorWeights,
}

impl MaterialEvaluator {
    pub fn new(weights: EvaluatorWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &EvaluatorWeights {
        &self.weights
    }

    fn material(&self, pos: &Chess, color: Color) -> f32 {
        let board = pos.board();
        board
            .occupied()
            .into_iter()
            .filter_map(|sq| board.piece_at(sq))
            .filter(|piece| piece.color == color)
            .map(|piece| self.weights.role_value(piece.role))
            .sum()
    }

    fn move_score(&self, mv: &Move) -> f32 {
        let w = &self.weights;
        let mut score = 0.0;
        if let Some(victim) = mv.capture() {
            // Prefer cheap attackers on expensive victims
            score += w.capture_bonus * (w.role_value(victim) - 0.1 * w.role_value(mv.role()));
        }
        if let Some(promoted) = mv.promotion() {
            score += w.promotion_bonus * w.role_value(promoted);
        }
        score
    }
}

impl Evaluator for MaterialEvaluator {
    fn evaluate(&self, pos: &Chess, moves: &[Move]) -> Result<Evaluation, EvaluatorError> {
        let us = pos.turn();
        let diff = self.material(pos, us) - self.material(pos, !us);
        let value = (diff / self.weights.value_scale).tanh();

        let logits: Vec<f32> = moves
            .iter()
            .map(|mv| self.move_score(mv) / self.weights.temperature)
            .collect();
        let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let exp: Vec<f32> = logits.iter().map(|l| (l - max).exp()).collect();
        let total: f32 = exp.iter().sum();
        let priors: Vec<f32> = exp.iter().map(|e| e / total).collect();

        if !value.is_finite() || priors.iter().any(|p| !p.is_finite()) {
            return Err(EvaluatorError::NonFinite);
        }
        Ok(Evaluation { priors, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakmaty::fen::Fen;
    use shakmaty::CastlingMode;
    use std::io::Write;

    fn position(fen: &str) -> Chess {
        fen.parse::<Fen>()
            .expect("valid fen")
            .into_position(CastlingMode::Standard)
            .expect("legal position")
    }

    fn temp_file(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("{}-{}", std::process::id(), name));
        let mut file = fs::File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes()).expect("write temp file");
        path
    }

    #[test]
    fn test_start_position_is_balanced() {
        let pos = Chess::default();
        let moves = pos.legal_moves();
        let eval = MaterialEvaluator::default()
            .evaluate(&pos, &moves)
            .expect("evaluates");
        assert!(eval.value.abs() < 1e-6);
        assert_eq!(eval.priors.len(), 20);
        let sum: f32 = eval.priors.iter().sum();
        assert!((sum - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_value_favors_side_with_extra_queen() {
        // White queen up, white to move
        let pos = position("4k3/8/8/8/8/8/8/3QK3 w - - 0 1");
        let moves = pos.legal_moves();
        let eval = MaterialEvaluator::default()
            .evaluate(&pos, &moves)
            .expect("evaluates");
        assert!(eval.value > 0.9);
    }

    #[test]
    fn test_capture_gets_highest_prior() {
        // Rook on a1 can take the undefended queen on a8
        let pos = position("q3k3/8/8/8/8/8/8/R3K3 w - - 0 1");
        let moves = pos.legal_moves();
        let eval = MaterialEvaluator::default()
            .evaluate(&pos, &moves)
            .expect("evaluates");
        let best = eval
            .priors
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .expect("non-empty");
        assert_eq!(moves[best].capture(), Some(Role::Queen));
    }

    #[test]
    fn test_load_partial_weights_uses_defaults() {
        let path = temp_file("partial-weights.json", r#"{"queen": 10.0}"#);
        let weights = EvaluatorWeights::load(&path).expect("loads");
        assert_eq!(weights.queen, 10.0);
        assert_eq!(weights.rook, EvaluatorWeights::default().rook);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = EvaluatorWeights::load("/nonexistent/weights.json").unwrap_err();
        assert!(matches!(err, WeightsError::Io(_)));
    }

    #[test]
    fn test_load_garbage_is_parse_error() {
        let path = temp_file("garbage-weights.json", "not json");
        let err = EvaluatorWeights::load(&path).unwrap_err();
        assert!(matches!(err, WeightsError::Parse(_)));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_zero_temperature_rejected() {
        let weights = EvaluatorWeights {
            temperature: 0.0,
            ..EvaluatorWeights::default()
        };
        let err = weights.validate().unwrap_err();
        assert!(matches!(err, WeightsError::Invalid { field: "temperature", .. }));
    }
}
