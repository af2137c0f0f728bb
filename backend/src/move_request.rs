//! `POST /api/move` pipeline
//!
//! One request walks `received → parsed → terminal | move-selected → applied`
//! and nothing survives it. The selector is asked first; any failure, panic
//! or out-of-list answer falls back to a uniformly random legal move.

use std::sync::Arc;

use move_selector::{random_move, MoveSelector, SelectError};
use serde::Serialize;
use serde_json::Value;
use shakmaty::{CastlingMode, Chess, Move, Position};
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::{ApiError, ApiResult};
use crate::rules::{self, PlayedMove};

/// Reason returned when a finished game has no explicit termination
const GENERIC_GAME_OVER: &str = "game_over";

/// Body of a successful `/api/move` response
///
/// `in_check` is omitted entirely when the submitted game was already over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveResponse {
    pub uci: Option<String>,
    pub san: Option<String>,
    pub fen: String,
    pub game_over: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_check: Option<bool>,
    pub result: Option<&'static str>,
    pub reason: Option<&'static str>,
}

impl MoveResponse {
    /// Response for a position with no legal moves
    pub fn game_over(position: &Chess) -> Self {
        let (result, reason) = match rules::outcome(position) {
            Some(outcome) => (outcome.result.as_str(), outcome.termination.as_str()),
            None => (rules::claimed_result(position).as_str(), GENERIC_GAME_OVER),
        };
        Self {
            uci: None,
            san: None,
            fen: rules::to_fen(position),
            game_over: true,
            in_check: None,
            result: Some(result),
            reason: Some(reason),
        }
    }

    /// Response after the service played `played`
    pub fn after_move(played: PlayedMove) -> Self {
        let outcome = rules::outcome(&played.position);
        Self {
            game_over: rules::is_game_over_with_claim(&played.position),
            in_check: Some(played.position.is_check()),
            result: outcome.map(|o| o.result.as_str()),
            reason: outcome.map(|o| o.termination.as_str()),
            fen: rules::to_fen(&played.position),
            uci: Some(played.uci),
            san: Some(played.san),
        }
    }
}

/// Why the selector's answer was not used
#[derive(Error, Debug)]
pub enum SelectionFailure {
    #[error(transparent)]
    Selector(#[from] SelectError),

    #[error("selector returned illegal move {0}")]
    IllegalMove(String),

    #[error("selector task failed: {0}")]
    Task(String),
}

/// Pull the `fen` field out of a raw request body
///
/// Bodies that are not JSON objects count as having no `fen`.
pub fn fen_from_body(body: &[u8]) -> ApiResult<String> {
    let payload: Value = serde_json::from_slice(body).unwrap_or(Value::Null);
    match payload.get("fen") {
        None | Some(Value::Null) => Err(ApiError::MissingFen),
        Some(Value::String(fen)) if fen.is_empty() => Err(ApiError::MissingFen),
        Some(Value::String(fen)) => Ok(fen.clone()),
        Some(other) => Err(ApiError::InvalidFen(format!(
            "expected a string, got {other}"
        ))),
    }
}

/// Run the selector on a blocking worker and check its answer
pub async fn run_selector(
    selector: Arc<dyn MoveSelector>,
    position: &Chess,
    legal: &[Move],
) -> Result<Move, SelectionFailure> {
    let pos = position.clone();
    let mv = tokio::task::spawn_blocking(move || selector.select(&pos))
        .await
        .map_err(|e| SelectionFailure::Task(e.to_string()))??;

    if !legal.contains(&mv) {
        return Err(SelectionFailure::IllegalMove(
            mv.to_uci(CastlingMode::Standard).to_string(),
        ));
    }
    Ok(mv)
}

/// Compute the service's reply for `fen`
pub async fn respond(selector: Option<Arc<dyn MoveSelector>>, fen: &str) -> ApiResult<MoveResponse> {
    let position = rules::parse_position(fen)?;
    let legal: Vec<Move> = position.legal_moves().into_iter().collect();

    let Some(fallback) = random_move(&legal) else {
        return Ok(MoveResponse::game_over(&position));
    };

    let mv = match selector {
        None => {
            debug!("no move selector loaded, playing random move");
            fallback
        }
        Some(selector) => {
            let name = selector.name();
            match run_selector(selector, &position, &legal).await {
                Ok(mv) => mv,
                Err(failure) => {
                    warn!(selector = name, "Selector failed, falling back to random: {}", failure);
                    fallback
                }
            }
        }
    };

    Ok(MoveResponse::after_move(rules::play(position, &mv)))
}
