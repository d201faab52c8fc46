//! Kirana Ports
//!
//! Port definitions (traits) for the Kirana Mesh simulator.
//! These define the boundaries between the simulated market and the
//! infrastructure that drives it (time sources and task schedulers).

mod clock;
mod error;
mod scheduler;

pub use clock::Clock;
pub use error::{SchedulerError, SchedulerResult};
pub use scheduler::{DelayFuture, Schedule, Task, TaskFuture, TaskHandle, TaskId, TaskScheduler, task};
