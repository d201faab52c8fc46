//! Kirana Clock Infrastructure
//!
//! Provides time sources and task schedulers for live runs and tests:
//!
//! ## Pairings
//!
//! ```text
//! SystemClock  ──  TokioScheduler   (wall clock, tokio timer wheel)
//! ManualClock  ──  ManualScheduler  (simulated time, advanced explicitly)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use kirana_clock::{ManualClock, ManualScheduler};
//! use std::time::Duration;
//!
//! let clock = ManualClock::new(None);
//! let scheduler = ManualScheduler::new(clock.clone());
//!
//! scheduler.schedule_repeating("restock", Duration::from_secs(5), task)?;
//! scheduler.advance(Duration::from_secs(12)).await?; // fires twice, at 5s and 10s
//! ```

mod manual;
mod manual_scheduler;
mod system;
mod tokio_scheduler;

pub use manual::ManualClock;
pub use manual_scheduler::ManualScheduler;
pub use system::SystemClock;
pub use tokio_scheduler::TokioScheduler;

// Re-export the ports for convenience
pub use kirana_ports::{Clock, Schedule, Task, TaskHandle, TaskId, TaskScheduler, task};
