use crate::action::ActionTransition;
use crate::dungeon::Dungeon;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{GameState, Position};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveError {
    #[error("no dungeon entered")]
    NoDungeon,

    #[error("cannot move {direction} from {origin}: edge of the dungeon")]
    OutOfBounds {
        origin: Position,
        direction: CardinalDirection,
    },

    #[error("destination {destination} is a wall")]
    Blocked { destination: Position },
}

impl GameError for MoveError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            MoveError::NoDungeon => ErrorSeverity::Validation,
            MoveError::OutOfBounds { .. } | MoveError::Blocked { .. } => {
                ErrorSeverity::Recoverable
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            MoveError::NoDungeon => "MOVE_NO_DUNGEON",
            MoveError::OutOfBounds { .. } => "MOVE_OUT_OF_BOUNDS",
            MoveError::Blocked { .. } => "MOVE_BLOCKED",
        }
    }
}

/// Step of one tile in a cardinal direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveAction {
    pub direction: CardinalDirection,
}

impl MoveAction {
    pub fn new(direction: CardinalDirection) -> Self {
        Self { direction }
    }

    /// Destination clamped to the dungeon bounds.
    fn destination_from(&self, origin: Position, dungeon: &Dungeon) -> Position {
        let (dx, dy) = self.direction.delta();
        let max_x = dungeon.width() as i32 - 1;
        let max_y = dungeon.height() as i32 - 1;
        Position::new(
            (origin.x + dx).clamp(0, max_x),
            (origin.y + dy).clamp(0, max_y),
        )
    }
}

/// Screen-oriented directions: north is up, toward `y = 0`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CardinalDirection {
    #[strum(to_string = "north", serialize = "up")]
    North,
    #[strum(to_string = "south", serialize = "down")]
    South,
    #[strum(to_string = "east", serialize = "right")]
    East,
    #[strum(to_string = "west", serialize = "left")]
    West,
}

impl CardinalDirection {
    pub const ALL: [CardinalDirection; 4] = [
        CardinalDirection::North,
        CardinalDirection::South,
        CardinalDirection::East,
        CardinalDirection::West,
    ];

    pub fn delta(self) -> (i32, i32) {
        match self {
            CardinalDirection::North => (0, -1),
            CardinalDirection::South => (0, 1),
            CardinalDirection::East => (1, 0),
            CardinalDirection::West => (-1, 0),
        }
    }
}

impl ActionTransition for MoveAction {
    type Error = MoveError;
    type Result = Position;

    fn pre_validate(&self, state: &GameState) -> Result<(), Self::Error> {
        let dungeon = state.dungeon().ok_or(MoveError::NoDungeon)?;
        let origin = state.player.position;
        let destination = self.destination_from(origin, dungeon);

        if destination == origin {
            return Err(MoveError::OutOfBounds {
                origin,
                direction: self.direction,
            });
        }
        if !dungeon.is_passable(destination) {
            return Err(MoveError::Blocked { destination });
        }

        Ok(())
    }

    fn apply(&self, state: &mut GameState) -> Result<Self::Result, Self::Error> {
        let dungeon = state.dungeon().ok_or(MoveError::NoDungeon)?;
        let destination = self.destination_from(state.player.position, dungeon);

        let explored = dungeon.discovered_at(destination);
        state.current_dungeon = Some(explored);
        state.player.position = destination;

        Ok(destination)
    }

    fn post_validate(&self, state: &GameState) -> Result<(), Self::Error> {
        let dungeon = state.dungeon().ok_or(MoveError::NoDungeon)?;
        let position = state.player.position;
        if dungeon.is_passable(position) {
            Ok(())
        } else {
            Err(MoveError::Blocked {
                destination: position,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::TileKind;

    fn state_at(map: &str, position: Position) -> GameState {
        let mut state =
            GameState::new().with_dungeon(Dungeon::from_ascii(map, 0).expect("valid map"));
        state.player.position = position;
        state
    }

    #[test]
    fn moves_one_tile_in_screen_coordinates() {
        let mut state = state_at("#E#\n#..\n#.#", Position::new(1, 1));

        let to = MoveAction::new(CardinalDirection::North)
            .apply(&mut state)
            .expect("apply");
        assert_eq!(to, Position::new(1, 0));

        let dungeon = state.dungeon().expect("dungeon");
        assert_eq!(dungeon.kind_at(to), Some(TileKind::Entrance));
        assert!(dungeon.tile(to).is_some_and(|tile| tile.discovered));
    }

    #[test]
    fn rejects_walls_and_edges() {
        let state = state_at("#E#\n#..\n#.#", Position::new(1, 1));
        assert_eq!(
            MoveAction::new(CardinalDirection::West).pre_validate(&state),
            Err(MoveError::Blocked {
                destination: Position::new(0, 1)
            })
        );

        let edge = state_at("#E#\n#..\n#.#", Position::new(2, 1));
        assert!(matches!(
            MoveAction::new(CardinalDirection::East).pre_validate(&edge),
            Err(MoveError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn requires_a_dungeon() {
        let state = GameState::new();
        assert_eq!(
            MoveAction::new(CardinalDirection::South).pre_validate(&state),
            Err(MoveError::NoDungeon)
        );
    }

    #[test]
    fn directions_parse_from_aliases() {
        assert_eq!("up".parse::<CardinalDirection>(), Ok(CardinalDirection::North));
        assert_eq!("WEST".parse::<CardinalDirection>(), Ok(CardinalDirection::West));
        assert!("northeast".parse::<CardinalDirection>().is_err());
    }
}
