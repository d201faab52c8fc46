use dashmap::DashMap;
use kirana_ports::{
    DelayFuture, Schedule, SchedulerError, SchedulerResult, Task, TaskHandle, TaskId,
    TaskScheduler,
};
use log::{debug, trace};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at, sleep};

/// Wall-clock scheduler backed by the tokio timer wheel
///
/// Each task runs in its own spawned tokio task; cancelling aborts it.
/// Under `#[tokio::test(start_paused = true)]` the same code runs on
/// tokio's paused clock.
pub struct TokioScheduler {
    tasks: DashMap<TaskId, (String, JoinHandle<()>)>,
    next_id: AtomicU64,
    shut_down: AtomicBool,
}

impl TokioScheduler {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            tasks: DashMap::new(),
            next_id: AtomicU64::new(1),
            shut_down: AtomicBool::new(false),
        })
    }

    /// Abort every task still armed. Returns how many were live.
    pub fn cancel_all(&self) -> usize {
        let ids: Vec<TaskId> = self.tasks.iter().map(|entry| *entry.key()).collect();
        ids.into_iter().filter(|id| self.cancel(*id)).count()
    }

    /// Abort every task and refuse new ones. Returns how many were live.
    pub fn shutdown(&self) -> usize {
        self.shut_down.store(true, Ordering::SeqCst);
        let cancelled = self.cancel_all();
        debug!("[TokioScheduler] shut down ({} tasks aborted)", cancelled);
        cancelled
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::SeqCst)
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for entry in self.tasks.iter() {
            entry.value().1.abort();
        }
    }
}

impl TaskScheduler for TokioScheduler {
    fn schedule(&self, name: &str, schedule: Schedule, task: Task) -> SchedulerResult<TaskHandle> {
        schedule.validate(name)?;
        if self.is_shut_down() {
            return Err(SchedulerError::ShutDown(name.to_string()));
        }
        let runtime = Handle::try_current().map_err(|_| SchedulerError::NoRuntime(name.to_string()))?;

        // Forget one-shots that already ran
        self.tasks.retain(|_, (_, join)| !join.is_finished());

        let id = TaskId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let join = match schedule {
            Schedule::Repeating(period) => runtime.spawn(async move {
                let mut ticker = interval_at(Instant::now() + period, period);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                loop {
                    ticker.tick().await;
                    trace!("[TokioScheduler] firing {}", id);
                    task().await;
                }
            }),
            Schedule::Once(delay) => runtime.spawn(async move {
                sleep(delay).await;
                trace!("[TokioScheduler] firing {}", id);
                task().await;
            }),
        };

        debug!("[TokioScheduler] armed {} '{}' ({:?})", id, name, schedule);
        self.tasks.insert(id, (name.to_string(), join));

        Ok(TaskHandle {
            id,
            name: name.to_string(),
            schedule,
        })
    }

    fn cancel(&self, id: TaskId) -> bool {
        match self.tasks.remove(&id) {
            Some((_, (name, join))) => {
                let live = !join.is_finished();
                join.abort();
                debug!("[TokioScheduler] cancelled {} '{}'", id, name);
                live
            }
            None => false,
        }
    }

    fn armed(&self) -> usize {
        self.tasks
            .iter()
            .filter(|entry| !entry.value().1.is_finished())
            .count()
    }

    fn delay(&self, duration: Duration) -> DelayFuture<'_> {
        Box::pin(sleep(duration))
    }

    fn name(&self) -> &str {
        "TokioScheduler"
    }
}
