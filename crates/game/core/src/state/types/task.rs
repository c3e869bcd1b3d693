use std::fmt;

/// Backend-assigned task identifier.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TaskId(pub String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task#{}", self.0)
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum TaskKind {
    Youtube,
    TelegramGroup,
    TelegramChannel,
    Airdrop,
}

/// Social task that pays its reward once.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Task {
    pub id: TaskId,
    pub kind: TaskKind,
    pub title: String,
    pub reward: f64,
    pub completed: bool,
}

impl Task {
    pub fn new(id: TaskId, kind: TaskKind, title: impl Into<String>, reward: f64) -> Self {
        Self {
            id,
            kind,
            title: title.into(),
            reward,
            completed: false,
        }
    }

    #[must_use]
    pub fn completed(mut self) -> Self {
        self.completed = true;
        self
    }
}
