use crate::action::ActionTransition;
use crate::economy;
use crate::error::{ErrorSeverity, GameError, NeverError};
use crate::state::{Booster, GameState, Millis};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TapError {
    #[error("tap at {at} precedes the last tap at {last}")]
    OutOfOrder { last: Millis, at: Millis },
}

impl GameError for TapError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            TapError::OutOfOrder { .. } => "TAP_OUT_OF_ORDER",
        }
    }
}

/// One tap, stamped with the caller's clock.
///
/// Rate limiting happens before the action reaches the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TapAction {
    pub at: Millis,
}

impl TapAction {
    pub fn new(at: Millis) -> Self {
        Self { at }
    }
}

impl ActionTransition for TapAction {
    type Error = TapError;
    type Result = f64;

    fn pre_validate(&self, state: &GameState) -> Result<(), Self::Error> {
        match state.last_tap_at {
            Some(last) if self.at < last => Err(TapError::OutOfOrder { last, at: self.at }),
            _ => Ok(()),
        }
    }

    /// Tap power is recomputed at `at`, so boosters that expired since the
    /// last profile sync stop counting. The reward goes to both the lifetime
    /// total and the GNOME balance.
    fn apply(&self, state: &mut GameState) -> Result<Self::Result, Self::Error> {
        state.tap_power = economy::tap_power(state.rank, &state.boosters, self.at);
        let reward = economy::tap_reward(state.tap_power, &state.boosters, self.at);
        state.credit_gnome(reward);
        state.last_tap_at = Some(self.at);
        Ok(reward)
    }
}

/// Refreshes rank-derived economy values from the session profile.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SyncProfileAction {
    pub rank: u32,
    pub boosters: Vec<Booster>,
    pub at: Millis,
}

impl SyncProfileAction {
    pub fn new(rank: u32, boosters: Vec<Booster>, at: Millis) -> Self {
        Self {
            rank,
            boosters,
            at,
        }
    }
}

impl ActionTransition for SyncProfileAction {
    type Error = NeverError;
    type Result = f64;

    fn apply(&self, state: &mut GameState) -> Result<Self::Result, Self::Error> {
        state.rank = self.rank;
        state.tap_power = economy::tap_power(self.rank, &self.boosters, self.at);
        state.boosters = self.boosters.clone();
        Ok(state.tap_power)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tap_credits_boosted_reward() {
        let mut state = GameState::new();
        SyncProfileAction::new(0, vec![Booster::new("b", "Pickaxe", 1.0)], 0)
            .apply(&mut state)
            .expect("sync");
        assert_eq!(state.tap_power, 2.0);

        let reward = TapAction::new(1_000).apply(&mut state).expect("tap");
        assert_eq!(reward, 4.0);
        assert_eq!(state.total_earned, 4.0);
        assert_eq!(state.gnome_balance, 4.0);
        assert_eq!(state.last_tap_at, Some(1_000));
    }

    #[test]
    fn expired_boosters_stop_paying_without_a_resync() {
        let mut state = GameState::new();
        let drill = Booster::new("d", "Drill", 1.0).expiring_at(2_000);
        SyncProfileAction::new(0, vec![drill], 0)
            .apply(&mut state)
            .expect("sync");
        assert_eq!(state.tap_power, 2.0);

        let reward = TapAction::new(2_000).apply(&mut state).expect("tap");
        assert_eq!(state.tap_power, 1.0);
        assert_eq!(reward, 1.0);
    }

    #[test]
    fn taps_must_not_go_back_in_time() {
        let mut state = GameState::new();
        state.last_tap_at = Some(5_000);
        assert_eq!(
            TapAction::new(4_999).pre_validate(&state),
            Err(TapError::OutOfOrder {
                last: 5_000,
                at: 4_999
            })
        );
        assert_eq!(TapAction::new(5_000).pre_validate(&state), Ok(()));
    }
}
