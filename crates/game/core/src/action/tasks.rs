use crate::action::ActionTransition;
use crate::error::{ErrorSeverity, GameError, NeverError};
use crate::state::{GameState, Task, TaskId};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TaskError {
    #[error("{0} is not offered to the player")]
    UnknownTask(TaskId),

    #[error("{0} was already completed")]
    AlreadyCompleted(TaskId),
}

impl GameError for TaskError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            TaskError::UnknownTask(_) => ErrorSeverity::Validation,
            TaskError::AlreadyCompleted(_) => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            TaskError::UnknownTask(_) => "TASK_UNKNOWN",
            TaskError::AlreadyCompleted(_) => "TASK_ALREADY_COMPLETED",
        }
    }
}

/// Marks a task completed and pays its reward. A task pays at most once.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompleteTaskAction {
    pub task: TaskId,
}

impl CompleteTaskAction {
    pub fn new(task: TaskId) -> Self {
        Self { task }
    }
}

impl ActionTransition for CompleteTaskAction {
    type Error = TaskError;
    type Result = f64;

    fn pre_validate(&self, state: &GameState) -> Result<(), Self::Error> {
        match state.task(&self.task) {
            None => Err(TaskError::UnknownTask(self.task.clone())),
            Some(task) if task.completed => Err(TaskError::AlreadyCompleted(self.task.clone())),
            Some(_) => Ok(()),
        }
    }

    fn apply(&self, state: &mut GameState) -> Result<Self::Result, Self::Error> {
        let task = state
            .task_mut(&self.task)
            .ok_or_else(|| TaskError::UnknownTask(self.task.clone()))?;
        task.completed = true;
        let reward = task.reward;
        state.credit_gnome(reward);
        Ok(reward)
    }
}

/// Replaces the task list with the backend's catalogue.
///
/// A task completed locally stays completed even if the backend has not
/// caught up yet.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SyncTasksAction {
    pub tasks: Vec<Task>,
}

impl SyncTasksAction {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }
}

impl ActionTransition for SyncTasksAction {
    type Error = NeverError;
    /// Number of tasks still open.
    type Result = usize;

    fn apply(&self, state: &mut GameState) -> Result<Self::Result, Self::Error> {
        let tasks: Vec<Task> = self
            .tasks
            .iter()
            .map(|task| {
                let done_locally = state
                    .task(&task.id)
                    .is_some_and(|local| local.completed);
                Task {
                    completed: task.completed || done_locally,
                    ..task.clone()
                }
            })
            .collect();
        state.tasks = tasks;
        Ok(state.tasks.iter().filter(|task| !task.completed).count())
    }
}
