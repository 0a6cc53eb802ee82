use thiserror::Error;

use crate::world::EntityId;

/// Errors raised by the engine core.
///
/// Application-level code (the engine loop, file loading, `Game` callbacks)
/// works with `anyhow::Result`; these convert into it with `?`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("invalid box dimensions {width}x{height} (must be finite and non-negative)")]
    InvalidDimensions { width: f32, height: f32 },
    #[error("invalid speed {0} (must be finite and non-negative)")]
    InvalidSpeed(f32),
    #[error("invalid gravity {0} (must be finite)")]
    InvalidGravity(f32),
    #[error("no active player")]
    NoActivePlayer,
    #[error("unknown entity {0:?}")]
    UnknownEntity(EntityId),
    #[error("invalid colour {0:?} (expected #RGB or #RRGGBB)")]
    InvalidColor(String),
    #[error("invalid font {0:?} (expected \"<size>px <family>\")")]
    InvalidFont(String),
}
