use std::fmt;

/// Discrete grid position expressed in tile coordinates.
///
/// Coordinates follow screen order: `x` grows to the right, `y` grows
/// downward, and `(0, 0)` is the top-left corner of the dungeon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance between two positions.
    pub fn manhattan(self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Identifier of an enemy inside a single generated dungeon.
///
/// Ids are assigned sequentially at generation time and are never reused
/// within the same dungeon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyId(pub u32);

impl fmt::Display for EnemyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "enemy#{}", self.0)
    }
}

/// Identifier of an item held by the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemId(pub u32);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item#{}", self.0)
    }
}

/// Integer resource meter (e.g., health) tracked for the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceMeter {
    pub current: u32,
    pub maximum: u32,
}

impl ResourceMeter {
    pub fn new(current: u32, maximum: u32) -> Self {
        Self { current, maximum }
    }

    /// Full meter at the given maximum.
    pub fn full(maximum: u32) -> Self {
        Self::new(maximum, maximum)
    }

    pub fn is_empty(&self) -> bool {
        self.current == 0
    }

    /// Restores up to `amount`, clamped at the maximum. Returns the amount restored.
    pub fn restore(&mut self, amount: u32) -> u32 {
        let before = self.current;
        self.current = self.current.saturating_add(amount).min(self.maximum);
        self.current.saturating_sub(before)
    }

    /// Drains up to `amount`, saturating at zero. Returns the amount drained.
    pub fn drain(&mut self, amount: u32) -> u32 {
        let before = self.current;
        self.current = self.current.saturating_sub(amount);
        before - self.current
    }
}

/// Milliseconds since the Unix epoch.
///
/// The core never reads a clock; timestamps always arrive as action input.
pub type Millis = u64;
