use thiserror::Error;

/// Errors raised while registering scheduled work
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("Repeating task '{0}' needs a non-zero period")]
    ZeroPeriod(String),

    #[error("Duration out of range: {0}")]
    DurationOutOfRange(String),

    #[error("No async runtime available to drive task '{0}'")]
    NoRuntime(String),

    #[error("Scheduler shut down; cannot arm task '{0}'")]
    ShutDown(String),
}

pub type SchedulerResult<T> = std::result::Result<T, SchedulerError>;
