/// Terrain classes for dungeon tiles. `Wall` is the background; everything
/// else is carved by the generator.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TileKind {
    Floor,
    #[default]
    Wall,
    Entrance,
    Exit,
    Shop,
    Forge,
    Shrine,
}

impl TileKind {
    /// Special rooms placed once per dungeon, in placement order.
    pub const ROOMS: [TileKind; 3] = [TileKind::Shop, TileKind::Forge, TileKind::Shrine];

    pub const fn is_passable(self) -> bool {
        !matches!(self, TileKind::Wall)
    }

    pub const fn is_room(self) -> bool {
        matches!(self, TileKind::Shop | TileKind::Forge | TileKind::Shrine)
    }

    pub const fn glyph(self) -> char {
        match self {
            TileKind::Floor => '.',
            TileKind::Wall => '#',
            TileKind::Entrance => 'E',
            TileKind::Exit => 'X',
            TileKind::Shop => '$',
            TileKind::Forge => 'F',
            TileKind::Shrine => 'S',
        }
    }

    pub const fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '.' => Some(TileKind::Floor),
            '#' => Some(TileKind::Wall),
            'E' => Some(TileKind::Entrance),
            'X' => Some(TileKind::Exit),
            '$' => Some(TileKind::Shop),
            'F' => Some(TileKind::Forge),
            'S' => Some(TileKind::Shrine),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    pub kind: TileKind,
    pub discovered: bool,
}

impl Tile {
    pub const fn new(kind: TileKind) -> Self {
        Self {
            kind,
            discovered: false,
        }
    }

    pub const fn wall() -> Self {
        Self::new(TileKind::Wall)
    }

    pub const fn is_passable(self) -> bool {
        self.kind.is_passable()
    }
}
