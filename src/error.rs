//! Error types for pointgrad.

use thiserror::Error;

/// Faults surfaced by the node layer during forward or backward.
///
/// Every variant carries the name of the operation it originated from, so a
/// failing backward pass identifies its node. Shape and numeric faults are
/// never retried; pointwise math is deterministic.
#[derive(Debug, Error)]
pub enum Error {
    /// Backward was invoked before forward ran, or the node's saved state
    /// was already consumed by a previous backward or a repeated forward.
    #[error("{op}: backward invoked before forward, or saved state already consumed")]
    InvalidState { op: &'static str },

    /// An in-place mutation touched storage whose pre-mutation value the
    /// backward formula depends on.
    #[error("{op}: in-place mutation of storage whose pre-mutation value is required for backward")]
    AliasingViolation { op: &'static str },

    /// The upstream gradient's shape is incompatible with the shapes saved
    /// during forward.
    #[error("{op}: gradient shape {got:?} incompatible with saved shape {expected:?}")]
    ShapeMismatch {
        op: &'static str,
        expected: Vec<usize>,
        got: Vec<usize>,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
