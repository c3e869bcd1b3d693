//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from repositories, the session provider, and the player
//! boundary so clients can bubble them up with a stable code.

use gnome_core::{ExecuteError, MineError, TransitionPhaseError};
use thiserror::Error;

pub use crate::intent::IntentError;
pub use crate::rate_limit::RateLimited;
pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Stable codes shown to clients and written to logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InitFailed,
    AuthFailed,
    NetworkError,
    StorageFailed,
    RateLimitExceeded,
    InvalidConfig,
    InvalidIntent,
    InvalidReferral,
    InsufficientFunds,
}

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("failed to initialize session: {0}")]
    Init(String),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("session provider unreachable: {0}")]
    Network(String),

    #[error("referral rejected: {0}")]
    Referral(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    RateLimited(#[from] RateLimited),

    #[error("invalid dungeon configuration")]
    InvalidConfig(#[source] gnome_core::DungeonError),

    #[error(transparent)]
    Intent(#[from] IntentError),

    #[error(transparent)]
    Rejected(#[from] ExecuteError),

    #[error("session has not been started")]
    NotStarted,
}

impl RuntimeError {
    pub fn code(&self) -> ErrorCode {
        match self {
            RuntimeError::Init(_) | RuntimeError::NotStarted => ErrorCode::InitFailed,
            RuntimeError::Auth(_) => ErrorCode::AuthFailed,
            RuntimeError::Network(_) => ErrorCode::NetworkError,
            RuntimeError::Repository(_) => ErrorCode::StorageFailed,
            RuntimeError::RateLimited(_) => ErrorCode::RateLimitExceeded,
            RuntimeError::Referral(_) => ErrorCode::InvalidReferral,
            RuntimeError::InvalidConfig(_) => ErrorCode::InvalidConfig,
            RuntimeError::Rejected(ExecuteError::UpgradeMine(TransitionPhaseError {
                error: MineError::InsufficientFunds { .. },
                ..
            })) => ErrorCode::InsufficientFunds,
            RuntimeError::Intent(_) | RuntimeError::Rejected(_) => ErrorCode::InvalidIntent,
        }
    }

    /// Message safe to show a player.
    pub fn user_message(&self) -> &'static str {
        match self.code() {
            ErrorCode::InitFailed => "Failed to initialize game.",
            ErrorCode::AuthFailed => "Please restart the app and try again.",
            ErrorCode::NetworkError => "Please check your internet connection and try again.",
            ErrorCode::StorageFailed => "Failed to save progress.",
            ErrorCode::RateLimitExceeded => match self {
                RuntimeError::RateLimited(limited) if limited.key == "tap" => {
                    "Tapping too fast! Please slow down."
                }
                _ => "Too many attempts. Please wait a moment.",
            },
            ErrorCode::InvalidReferral => "This referral code cannot be used.",
            ErrorCode::InsufficientFunds => "Not enough GNOME.",
            ErrorCode::InvalidConfig | ErrorCode::InvalidIntent => {
                "An unexpected error occurred. Please try again."
            }
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RuntimeError::Network(_) | RuntimeError::RateLimited(_) | RuntimeError::Repository(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_render_screaming_snake_case() {
        assert_eq!(ErrorCode::RateLimitExceeded.to_string(), "RATE_LIMIT_EXCEEDED");
        assert_eq!(ErrorCode::InitFailed.as_ref(), "INIT_FAILED");
    }

    #[test]
    fn rate_limit_maps_to_its_code() {
        let error = RuntimeError::from(RateLimited {
            key: "tap".into(),
            retry_after_ms: 10,
        });
        assert_eq!(error.code(), ErrorCode::RateLimitExceeded);
        assert_eq!(error.user_message(), "Tapping too fast! Please slow down.");
        assert!(error.is_retryable());
        assert!(!RuntimeError::NotStarted.is_retryable());
    }

    #[test]
    fn short_balance_on_upgrade_is_insufficient_funds() {
        let error = RuntimeError::Rejected(ExecuteError::UpgradeMine(TransitionPhaseError::new(
            gnome_core::TransitionPhase::PreValidate,
            MineError::InsufficientFunds {
                price: 100.0,
                balance: 3.0,
            },
        )));
        assert_eq!(error.code(), ErrorCode::InsufficientFunds);
        assert_eq!(error.user_message(), "Not enough GNOME.");

        let other = RuntimeError::Rejected(ExecuteError::UpgradeMine(TransitionPhaseError::new(
            gnome_core::TransitionPhase::PreValidate,
            MineError::UnknownMine(gnome_core::MineId(2)),
        )));
        assert_eq!(other.code(), ErrorCode::InvalidIntent);
    }

    #[test]
    fn non_tap_limits_get_a_generic_message() {
        let error = RuntimeError::from(RateLimited {
            key: "mine:1".into(),
            retry_after_ms: 10,
        });
        assert_eq!(error.user_message(), "Too many attempts. Please wait a moment.");
    }
}
