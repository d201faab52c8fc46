use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{SchedulerError, SchedulerResult};

/// Boxed unit of scheduled work
pub type TaskFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Future returned by [`TaskScheduler::delay`]; may borrow the scheduler
pub type DelayFuture<'a> = Pin<Box<dyn Future<Output = ()> + Send + 'a>>;

/// Factory producing a fresh future every time the task fires
pub type Task = Arc<dyn Fn() -> TaskFuture + Send + Sync>;

/// Wrap an async closure into a [`Task`]
pub fn task<F, Fut>(f: F) -> Task
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Arc::new(move || Box::pin(f()))
}

/// Identifier assigned by a scheduler at registration time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task-{}", self.0)
    }
}

/// When a task fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// Every `period`, first firing one period after registration
    Repeating(Duration),
    /// Exactly once, after the delay
    Once(Duration),
}

impl Schedule {
    /// Delay before the first firing
    pub fn first_delay(&self) -> Duration {
        match self {
            Schedule::Repeating(period) => *period,
            Schedule::Once(delay) => *delay,
        }
    }

    /// Period between firings, `None` for one-shot tasks
    pub fn period(&self) -> Option<Duration> {
        match self {
            Schedule::Repeating(period) => Some(*period),
            Schedule::Once(_) => None,
        }
    }

    /// Reject schedules that would spin without yielding
    pub fn validate(&self, name: &str) -> SchedulerResult<()> {
        match self {
            Schedule::Repeating(period) if period.is_zero() => {
                Err(SchedulerError::ZeroPeriod(name.to_string()))
            }
            _ => Ok(()),
        }
    }
}

/// Receipt for a registered task; pass the id back to cancel it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskHandle {
    pub id: TaskId,
    pub name: String,
    pub schedule: Schedule,
}

/// Port for cancellable timed work
///
/// Implementations decide what "time" means: the tokio timer wheel for
/// live runs, or a manually advanced clock for deterministic tests.
pub trait TaskScheduler: Send + Sync {
    /// Register a task; it stays armed until cancelled (or fired, for one-shots)
    fn schedule(&self, name: &str, schedule: Schedule, task: Task) -> SchedulerResult<TaskHandle>;

    /// Cancel a task. Returns false if it was unknown or already finished.
    fn cancel(&self, id: TaskId) -> bool;

    /// Number of tasks still armed
    fn armed(&self) -> usize;

    /// Let `duration` of this scheduler's time pass.
    ///
    /// Simulated latency goes through here so that it is measured on the
    /// same clock as the scheduled tasks.
    fn delay(&self, duration: Duration) -> DelayFuture<'_>;

    fn schedule_repeating(
        &self,
        name: &str,
        period: Duration,
        task: Task,
    ) -> SchedulerResult<TaskHandle> {
        self.schedule(name, Schedule::Repeating(period), task)
    }

    fn schedule_once(&self, name: &str, delay: Duration, task: Task) -> SchedulerResult<TaskHandle> {
        self.schedule(name, Schedule::Once(delay), task)
    }

    /// Get the scheduler's name/identifier for debugging
    fn name(&self) -> &str {
        "TaskScheduler"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_zero_period_rejected() {
        let schedule = Schedule::Repeating(Duration::ZERO);
        assert_eq!(
            schedule.validate("tips"),
            Err(SchedulerError::ZeroPeriod("tips".to_string()))
        );

        assert!(Schedule::Once(Duration::ZERO).validate("offers").is_ok());
        assert!(Schedule::Repeating(Duration::from_secs(5)).validate("stock").is_ok());
    }

    #[test]
    fn test_schedule_delays() {
        let repeating = Schedule::Repeating(Duration::from_secs(8));
        assert_eq!(repeating.first_delay(), Duration::from_secs(8));
        assert_eq!(repeating.period(), Some(Duration::from_secs(8)));

        let once = Schedule::Once(Duration::from_secs(12));
        assert_eq!(once.first_delay(), Duration::from_secs(12));
        assert_eq!(once.period(), None);
    }

    #[tokio::test]
    async fn test_task_produces_fresh_futures() {
        let counter = Arc::new(AtomicUsize::new(0));
        let c = counter.clone();
        let job = task(move || {
            let c = c.clone();
            async move {
                c.fetch_add(1, Ordering::SeqCst);
            }
        });

        job().await;
        job().await;

        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }
}
