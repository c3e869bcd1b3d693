//! Shared error infrastructure for gnome-core.
//!
//! Each action defines its own error enum next to the transition it
//! validates. This module holds the classification every one of them shares.

/// How a rejected action should be treated by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ErrorSeverity {
    /// The same intent may succeed later or from another position.
    ///
    /// Examples: destination is a wall, enemy out of reach
    Recoverable,

    /// The intent references something that does not exist.
    ///
    /// Examples: unknown enemy, item not in inventory, no dungeon entered
    Validation,

    /// State was inconsistent with itself. Indicates a bug.
    Internal,
}

impl ErrorSeverity {
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all gnome-core errors.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier for the variant, used in logs and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Error type for actions that never fail.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("this error should never be constructed")]
pub enum NeverError {}

impl GameError for NeverError {
    fn severity(&self) -> ErrorSeverity {
        match *self {}
    }

    fn error_code(&self) -> &'static str {
        match *self {}
    }
}
