use crate::action::ActionTransition;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{GameState, Millis, MineId};

#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MineError {
    #[error("{0} is not owned by the player")]
    UnknownMine(MineId),

    #[error("upgrade costs {price} GNOME but the balance is {balance}")]
    InsufficientFunds { price: f64, balance: f64 },

    #[error("collection at {at} precedes the last collection at {last}")]
    OutOfOrder { last: Millis, at: Millis },
}

impl GameError for MineError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            MineError::UnknownMine(_) => ErrorSeverity::Validation,
            MineError::InsufficientFunds { .. } | MineError::OutOfOrder { .. } => {
                ErrorSeverity::Recoverable
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            MineError::UnknownMine(_) => "MINE_UNKNOWN",
            MineError::InsufficientFunds { .. } => "MINE_INSUFFICIENT_FUNDS",
            MineError::OutOfOrder { .. } => "MINE_OUT_OF_ORDER",
        }
    }
}

/// Pays the upgrade price from the GNOME balance and levels the mine up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UpgradeMineAction {
    pub mine: MineId,
}

impl UpgradeMineAction {
    pub fn new(mine: MineId) -> Self {
        Self { mine }
    }
}

impl ActionTransition for UpgradeMineAction {
    type Error = MineError;
    type Result = u32;

    fn pre_validate(&self, state: &GameState) -> Result<(), Self::Error> {
        let mine = state
            .mine(self.mine)
            .ok_or(MineError::UnknownMine(self.mine))?;
        if state.gnome_balance < mine.upgrade_price {
            return Err(MineError::InsufficientFunds {
                price: mine.upgrade_price,
                balance: state.gnome_balance,
            });
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState) -> Result<Self::Result, Self::Error> {
        let mine = state
            .mine_mut(self.mine)
            .ok_or(MineError::UnknownMine(self.mine))?;
        let price = mine.upgrade_price;
        mine.upgrade();
        let level = mine.level;
        state.gnome_balance -= price;
        Ok(level)
    }
}

/// Credits everything a mine produced since its last collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CollectMineAction {
    pub mine: MineId,
    pub at: Millis,
}

impl CollectMineAction {
    pub fn new(mine: MineId, at: Millis) -> Self {
        Self { mine, at }
    }
}

impl ActionTransition for CollectMineAction {
    type Error = MineError;
    type Result = f64;

    fn pre_validate(&self, state: &GameState) -> Result<(), Self::Error> {
        let mine = state
            .mine(self.mine)
            .ok_or(MineError::UnknownMine(self.mine))?;
        if self.at < mine.last_collected {
            return Err(MineError::OutOfOrder {
                last: mine.last_collected,
                at: self.at,
            });
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState) -> Result<Self::Result, Self::Error> {
        let mine = state
            .mine_mut(self.mine)
            .ok_or(MineError::UnknownMine(self.mine))?;
        let amount = mine.pending(self.at);
        mine.last_collected = self.at;
        state.credit_gnome(amount);
        Ok(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: Millis = 3_600_000;

    fn miner() -> GameState {
        GameState::for_profile(0, 0.0, Vec::new(), None, 0)
    }

    #[test]
    fn upgrade_is_paid_from_the_balance() {
        let mut state = miner();
        state.gnome_balance = 150.0;

        assert_eq!(UpgradeMineAction::new(MineId(1)).apply(&mut state), Ok(2));
        assert_eq!(state.gnome_balance, 50.0);

        let mine = state.mine(MineId(1)).expect("mine");
        assert_eq!(mine.current_production, 1.5);
        assert_eq!(mine.upgrade_price, 200.0);

        assert_eq!(
            UpgradeMineAction::new(MineId(1)).pre_validate(&state),
            Err(MineError::InsufficientFunds {
                price: 200.0,
                balance: 50.0
            })
        );
    }

    #[test]
    fn collection_credits_accrued_output_once() {
        let mut state = miner();
        let collect = CollectMineAction::new(MineId(1), 2 * HOUR);

        assert_eq!(collect.apply(&mut state), Ok(2.0));
        assert_eq!(state.gnome_balance, 2.0);
        assert_eq!(state.total_earned, 2.0);

        assert_eq!(collect.apply(&mut state), Ok(0.0));
        assert_eq!(state.gnome_balance, 2.0);
    }

    #[test]
    fn unknown_mines_and_stale_timestamps_are_rejected() {
        let mut state = miner();
        assert_eq!(
            CollectMineAction::new(MineId(9), HOUR).pre_validate(&state),
            Err(MineError::UnknownMine(MineId(9)))
        );

        CollectMineAction::new(MineId(1), HOUR)
            .apply(&mut state)
            .expect("collect");
        assert_eq!(
            CollectMineAction::new(MineId(1), HOUR - 1).pre_validate(&state),
            Err(MineError::OutOfOrder {
                last: HOUR,
                at: HOUR - 1
            })
        );
    }
}
