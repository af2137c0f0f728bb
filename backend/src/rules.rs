//! Rules-engine adapter over `shakmaty`
//!
//! Parsing, notation and game-status queries used by the move handler.
//! Status semantics follow the usual server conventions: an outcome is only
//! reported when the game is over without any claim, while the claim-aware
//! queries also accept a fifty-move draw claim. Repetition needs move history
//! and cannot be detected from a single FEN.

use shakmaty::fen::Fen;
use shakmaty::san::SanPlus;
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, Move, Position, PositionError};

use crate::error::{ApiError, ApiResult};

/// Halfmove clock at which a draw may be claimed
const FIFTY_MOVE_HALFMOVES: u32 = 100;
/// Halfmove clock at which the game is drawn without a claim
const SEVENTYFIVE_MOVE_HALFMOVES: u32 = 150;

/// Final score of a game in PGN notation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    WhiteWins,
    BlackWins,
    Draw,
    Undetermined,
}

impl GameResult {
    pub fn as_str(self) -> &'static str {
        match self {
            GameResult::WhiteWins => "1-0",
            GameResult::BlackWins => "0-1",
            GameResult::Draw => "1/2-1/2",
            GameResult::Undetermined => "*",
        }
    }

    fn win_for(color: Color) -> Self {
        match color {
            Color::White => GameResult::WhiteWins,
            Color::Black => GameResult::BlackWins,
        }
    }
}

/// Why a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Checkmate,
    Stalemate,
    InsufficientMaterial,
    SeventyfiveMoves,
}

impl Termination {
    pub fn as_str(self) -> &'static str {
        match self {
            Termination::Checkmate => "CHECKMATE",
            Termination::Stalemate => "STALEMATE",
            Termination::InsufficientMaterial => "INSUFFICIENT_MATERIAL",
            Termination::SeventyfiveMoves => "SEVENTYFIVE_MOVES",
        }
    }
}

/// Result and termination of a finished game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub result: GameResult,
    pub termination: Termination,
}

impl Outcome {
    fn draw(termination: Termination) -> Self {
        Self {
            result: GameResult::Draw,
            termination,
        }
    }
}

/// A move rendered in both notations with the position it leads to
#[derive(Debug, Clone)]
pub struct PlayedMove {
    pub uci: String,
    pub san: String,
    pub position: Chess,
}

/// Parse a FEN into a playable position
///
/// Irregular castling rights, en passant squares, impossible checks and
/// excess material are tolerated by dropping or ignoring the offending field.
/// Anything else shakmaty refuses to set up is rejected, which is stricter
/// than some engines: a missing king, pawns on the back rank or the side not
/// to move standing in check all give `invalid fen`.
pub fn parse_position(fen: &str) -> ApiResult<Chess> {
    let fen: Fen = fen
        .trim()
        .parse()
        .map_err(|e| ApiError::InvalidFen(format!("{e}")))?;
    fen.into_position(CastlingMode::Standard)
        .or_else(PositionError::ignore_invalid_castling_rights)
        .or_else(PositionError::ignore_invalid_ep_square)
        .or_else(PositionError::ignore_impossible_check)
        .or_else(PositionError::ignore_too_much_material)
        .map_err(|e| ApiError::InvalidFen(format!("{e}")))
}

/// Render a position as FEN, keeping the en passant square only when a
/// capture is actually possible
pub fn to_fen(pos: &Chess) -> String {
    Fen::from_position(pos.clone(), EnPassantMode::Legal).to_string()
}

/// Outcome reached without any draw claim
pub fn outcome(pos: &Chess) -> Option<Outcome> {
    if pos.is_checkmate() {
        return Some(Outcome {
            result: GameResult::win_for(!pos.turn()),
            termination: Termination::Checkmate,
        });
    }
    if pos.is_insufficient_material() {
        return Some(Outcome::draw(Termination::InsufficientMaterial));
    }
    if pos.is_stalemate() {
        return Some(Outcome::draw(Termination::Stalemate));
    }
    if pos.halfmoves() >= SEVENTYFIVE_MOVE_HALFMOVES {
        return Some(Outcome::draw(Termination::SeventyfiveMoves));
    }
    None
}

/// Whether the side to move may claim a fifty-move draw
///
/// A claim is available once the clock reaches 100 halfmoves, or at 99 when
/// some legal move would not reset the clock.
pub fn can_claim_draw(pos: &Chess) -> bool {
    let halfmoves = pos.halfmoves();
    if halfmoves >= FIFTY_MOVE_HALFMOVES {
        return !pos.legal_moves().is_empty();
    }
    halfmoves + 1 == FIFTY_MOVE_HALFMOVES && pos.legal_moves().iter().any(|mv| !mv.is_zeroing())
}

/// Game result, counting an available draw claim as a draw
pub fn claimed_result(pos: &Chess) -> GameResult {
    match outcome(pos) {
        Some(outcome) => outcome.result,
        None if can_claim_draw(pos) => GameResult::Draw,
        None => GameResult::Undetermined,
    }
}

/// Whether the game is over, counting an available draw claim
pub fn is_game_over_with_claim(pos: &Chess) -> bool {
    outcome(pos).is_some() || can_claim_draw(pos)
}

/// Render `mv` in UCI and SAN against the current position, then play it
///
/// `mv` must come from `pos.legal_moves()`.
pub fn play(mut pos: Chess, mv: &Move) -> PlayedMove {
    let uci = mv.to_uci(CastlingMode::Standard).to_string();
    let san = SanPlus::from_move_and_play_unchecked(&mut pos, mv).to_string();
    PlayedMove {
        uci,
        san,
        position: pos,
    }
}
