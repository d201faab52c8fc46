use kirana_core::Timestamp;

/// Source of "now" for everything the simulator stamps
///
/// Tip ids, tip creation times, request arrival times and product expiry
/// all read this clock, so a shop can run on wall time or on simulated
/// time that only moves when the scheduler is advanced.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;

    fn name(&self) -> &str {
        "Clock"
    }
}
