use chrono::Duration;
use kirana_core::Timestamp;
use kirana_ports::{
    Clock, DelayFuture, Schedule, SchedulerError, SchedulerResult, Task, TaskHandle, TaskId,
    TaskScheduler,
};
use log::{debug, trace, warn};
use parking_lot::Mutex;
use priority_queue::PriorityQueue;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::ManualClock;

struct ArmedTask {
    name: String,
    period: Option<Duration>,
    task: Task,
}

#[derive(Default)]
struct TaskQueue {
    /// Earliest due time first; equal due times fire in registration order
    due: PriorityQueue<TaskId, Reverse<(Timestamp, TaskId)>>,
    armed: HashMap<TaskId, ArmedTask>,
}

/// Deterministic scheduler driven by a [`ManualClock`]
///
/// Nothing fires on its own. `advance` walks simulated time forward,
/// running every task that falls due in chronological order and stamping
/// the clock with each task's due time before it runs.
pub struct ManualScheduler {
    clock: Arc<ManualClock>,
    queue: Mutex<TaskQueue>,
    next_id: AtomicU64,
}

impl ManualScheduler {
    pub fn new(clock: Arc<ManualClock>) -> Arc<Self> {
        Arc::new(Self {
            clock,
            queue: Mutex::new(TaskQueue::default()),
            next_id: AtomicU64::new(1),
        })
    }

    /// Get reference to the clock this scheduler drives
    pub fn clock(&self) -> &Arc<ManualClock> {
        &self.clock
    }

    /// Advance simulated time by `duration`, firing every task due on the way.
    ///
    /// Returns the number of task invocations.
    pub async fn advance(&self, duration: std::time::Duration) -> SchedulerResult<usize> {
        let target = offset(self.clock.now(), to_chrono(duration)?)?;
        let mut fired = 0;

        while let Some((id, due, task, period)) = self.pop_due(target) {
            self.clock.advance_to(due);
            trace!("[ManualScheduler] firing {} at {}", id, due);
            task().await;
            fired += 1;

            if let Some(period) = period {
                let mut queue = self.queue.lock();
                // A task may cancel itself while running
                if queue.armed.contains_key(&id) {
                    match offset(due, period) {
                        Ok(next) => {
                            queue.due.push(id, Reverse((next, id)));
                        }
                        Err(e) => {
                            warn!("[ManualScheduler] disarming {}: {}", id, e);
                            queue.armed.remove(&id);
                        }
                    }
                }
            }
        }

        self.clock.advance_to(target);
        Ok(fired)
    }

    /// Due time of the next armed task, if any
    pub fn next_due(&self) -> Option<Timestamp> {
        let queue = self.queue.lock();
        queue.due.peek().map(|(_, Reverse((due, _)))| *due)
    }

    fn pop_due(&self, target: Timestamp) -> Option<(TaskId, Timestamp, Task, Option<Duration>)> {
        let mut queue = self.queue.lock();
        let is_due = matches!(queue.due.peek(), Some((_, Reverse((due, _)))) if *due <= target);
        if !is_due {
            return None;
        }

        let (id, Reverse((due, _))) = queue.due.pop()?;
        let armed = queue.armed.get(&id)?;
        let task = armed.task.clone();
        let period = armed.period;
        if period.is_none() {
            queue.armed.remove(&id);
        }
        Some((id, due, task, period))
    }
}

fn to_chrono(duration: std::time::Duration) -> SchedulerResult<Duration> {
    Duration::from_std(duration).map_err(|e| SchedulerError::DurationOutOfRange(e.to_string()))
}

/// `from + by`, failing instead of overflowing the representable calendar
fn offset(from: Timestamp, by: Duration) -> SchedulerResult<Timestamp> {
    from.checked_add_signed(by)
        .ok_or_else(|| SchedulerError::DurationOutOfRange(format!("{} + {}", from, by)))
}

impl TaskScheduler for ManualScheduler {
    fn schedule(&self, name: &str, schedule: Schedule, task: Task) -> SchedulerResult<TaskHandle> {
        schedule.validate(name)?;
        let first_delay = to_chrono(schedule.first_delay())?;
        let period = schedule.period().map(to_chrono).transpose()?;

        let id = TaskId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let due = offset(self.clock.now(), first_delay)?;

        let mut queue = self.queue.lock();
        queue.due.push(id, Reverse((due, id)));
        queue.armed.insert(
            id,
            ArmedTask {
                name: name.to_string(),
                period,
                task,
            },
        );
        debug!("[ManualScheduler] armed {} '{}' due at {}", id, name, due);

        Ok(TaskHandle {
            id,
            name: name.to_string(),
            schedule,
        })
    }

    fn cancel(&self, id: TaskId) -> bool {
        let mut queue = self.queue.lock();
        queue.due.remove(&id);
        match queue.armed.remove(&id) {
            Some(armed) => {
                debug!("[ManualScheduler] cancelled {} '{}'", id, armed.name);
                true
            }
            None => false,
        }
    }

    fn armed(&self) -> usize {
        self.queue.lock().armed.len()
    }

    /// Advance simulated time by `duration` instead of waiting.
    ///
    /// Tasks falling due during the delay fire before it resolves.
    fn delay(&self, duration: std::time::Duration) -> DelayFuture<'_> {
        Box::pin(async move {
            if let Err(e) = self.advance(duration).await {
                warn!("[ManualScheduler] delay of {:?} skipped: {}", duration, e);
            }
        })
    }

    fn name(&self) -> &str {
        "ManualScheduler"
    }
}
