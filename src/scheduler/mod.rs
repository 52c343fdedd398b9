pub mod planner;

use tokio::sync::{Mutex, MutexGuard};

/// Serializes the multi-step read-then-write engines (auto-schedule and the
/// alert check) process-wide. Both walk a jobs snapshot and write results
/// back; two concurrent runs could otherwise double-book a machine's time
/// window.
pub struct EngineGate {
    lock: Mutex<()>,
}

impl EngineGate {
    pub fn new() -> Self {
        Self { lock: Mutex::new(()) }
    }

    pub async fn acquire(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().await
    }
}

impl Default for EngineGate {
    fn default() -> Self {
        Self::new()
    }
}
