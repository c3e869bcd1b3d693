//! Entering and leaving dungeons.
//!
//! The current dungeon is always replaced wholesale. Sigil effects follow the
//! dungeon: the outgoing sigil is deactivated before the incoming one is
//! activated.

use crate::action::ActionTransition;
use crate::dungeon::{Dungeon, sigil};
use crate::error::{ErrorSeverity, GameError};
use crate::state::{GameState, Position};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExpeditionError {
    #[error("dungeon has no entrance")]
    MissingEntrance,

    #[error("no dungeon entered")]
    NoDungeon,
}

impl GameError for ExpeditionError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            ExpeditionError::MissingEntrance => "EXPEDITION_MISSING_ENTRANCE",
            ExpeditionError::NoDungeon => "EXPEDITION_NO_DUNGEON",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnterDungeonAction {
    pub dungeon: Dungeon,
}

impl EnterDungeonAction {
    pub fn new(dungeon: Dungeon) -> Self {
        Self { dungeon }
    }
}

fn leave_current(state: &mut GameState) -> Option<Dungeon> {
    let previous = state.current_dungeon.take()?;
    if let Some(active) = previous.sigil() {
        sigil::deactivate(active, &mut state.active_buffs);
    }
    Some(previous)
}

impl ActionTransition for EnterDungeonAction {
    type Error = ExpeditionError;
    type Result = Position;

    fn pre_validate(&self, _state: &GameState) -> Result<(), Self::Error> {
        self.dungeon
            .entrance()
            .map(|_| ())
            .ok_or(ExpeditionError::MissingEntrance)
    }

    fn apply(&self, state: &mut GameState) -> Result<Self::Result, Self::Error> {
        let entrance = self
            .dungeon
            .entrance()
            .ok_or(ExpeditionError::MissingEntrance)?;

        leave_current(state);
        if let Some(incoming) = self.dungeon.sigil() {
            sigil::activate(incoming, &mut state.active_buffs);
        }

        state.current_dungeon = Some(self.dungeon.discovered_at(entrance));
        state.player.position = entrance;
        Ok(entrance)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LeaveDungeonAction;

impl ActionTransition for LeaveDungeonAction {
    type Error = ExpeditionError;
    type Result = ();

    fn pre_validate(&self, state: &GameState) -> Result<(), Self::Error> {
        state
            .dungeon()
            .map(|_| ())
            .ok_or(ExpeditionError::NoDungeon)
    }

    fn apply(&self, state: &mut GameState) -> Result<Self::Result, Self::Error> {
        leave_current(state)
            .map(|_| ())
            .ok_or(ExpeditionError::NoDungeon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::{Sigil, SigilKind};

    fn level(sigil: Option<SigilKind>) -> Dungeon {
        Dungeon::from_ascii("#E###\n#...#\n###X#", 0)
            .expect("valid map")
            .with_sigil(sigil.map(Sigil::from_kind))
    }

    #[test]
    fn entering_resets_position_and_activates_sigil() {
        let mut state = GameState::new();
        state.player.position = Position::new(9, 9);

        let entrance = EnterDungeonAction::new(level(Some(SigilKind::DoubleRewards)))
            .apply(&mut state)
            .expect("enter");

        assert_eq!(entrance, Position::new(1, 0));
        assert_eq!(state.player.position, entrance);
        assert_eq!(state.active_buffs.token_bonus, 2.0);
    }

    #[test]
    fn replacing_dungeon_swaps_sigils() {
        let mut state = GameState::new();
        EnterDungeonAction::new(level(Some(SigilKind::DoubleRewards)))
            .apply(&mut state)
            .expect("first");
        EnterDungeonAction::new(level(Some(SigilKind::CursedTokens)))
            .apply(&mut state)
            .expect("second");
        assert_eq!(state.active_buffs.token_bonus, 1.5);

        LeaveDungeonAction.apply(&mut state).expect("leave");
        assert_eq!(state.active_buffs.token_bonus, 1.0);
        assert!(state.dungeon().is_none());
    }

    #[test]
    fn leaving_without_dungeon_is_rejected() {
        assert_eq!(
            LeaveDungeonAction.pre_validate(&GameState::new()),
            Err(ExpeditionError::NoDungeon)
        );
    }

    #[test]
    fn dungeon_without_entrance_is_rejected() {
        let closed = Dungeon::from_ascii("###\n#.#\n###", 0).expect("valid map");
        assert_eq!(
            EnterDungeonAction::new(closed).pre_validate(&GameState::new()),
            Err(ExpeditionError::MissingEntrance)
        );
    }
}
