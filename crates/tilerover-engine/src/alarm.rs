//! The alarm signaler – the stack's only concurrent activity.
//!
//! The round loop is the single producer of [`AlarmFlag`]; the alarm task
//! is its only consumer and performs no motion, so no lock is needed beyond
//! the atomic itself.  The task mirrors the flag into the audible output at
//! a fixed cadence; a brief staleness between a flag write and the sound
//! changing is acceptable by contract.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tilerover_hal::signal::AlarmOutput;
use tracing::warn;

/// Shared single-producer alarm flag.
///
/// Written only by the round loop's inventory transitions (raised on item
/// pickup, cleared on delivery); read by the alarm task.
#[derive(Clone, Debug, Default)]
pub struct AlarmFlag(Arc<AtomicBool>);

impl AlarmFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn clear(&self) {
        self.0.store(false, Ordering::Release);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Mirror `flag` into `output` every `poll` interval, forever.
///
/// Spawn this on the runtime and abort the handle on shutdown; the loop
/// itself never returns.  Output faults are logged and retried on the next
/// poll rather than killing the task.
pub async fn run_alarm_task(flag: AlarmFlag, mut output: Box<dyn AlarmOutput>, poll: Duration) {
    let mut sounding = false;
    loop {
        let wanted = flag.is_raised();
        if wanted != sounding {
            match output.set_active(wanted) {
                Ok(()) => sounding = wanted,
                Err(e) => warn!(error = %e, "alarm output rejected command"),
            }
        }
        tokio::time::sleep(poll).await;
    }
}
