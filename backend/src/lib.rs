//! Chess move service
//!
//! Accepts a FEN over HTTP, picks a reply move and reports the resulting
//! position and game status.

pub mod api;
pub mod config;
pub mod cors;
pub mod error;

#[cfg(feature = "chess-rules")]
pub mod move_request;
#[cfg(feature = "chess-rules")]
pub mod rules;
