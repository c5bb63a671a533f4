//! The harness's trust boundary. Everything above this layer may assume
//! candidate code behaves; everything at or below must assume it does not.

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use tracing::warn;

#[derive(Debug)]
pub enum GuardOutcome<T> {
    Completed(T),
    TimedOut,
    Panicked(String),
}

/// Run `f` on a dedicated thread under a hard wall-clock bound. A panic is
/// captured as a message; on expiry the thread is abandoned and whatever
/// partial state it owns is never looked at again.
pub fn guarded_call<T, F>(limit: Duration, f: F) -> GuardOutcome<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    let spawned = thread::Builder::new()
        .name("cobench-candidate".to_string())
        .spawn(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(f));
            let _ = tx.send(result);
        });
    let handle = match spawned {
        Ok(handle) => handle,
        Err(e) => return GuardOutcome::Panicked(format!("failed to spawn candidate thread: {}", e)),
    };
    match rx.recv_timeout(limit) {
        Ok(Ok(value)) => {
            let _ = handle.join();
            GuardOutcome::Completed(value)
        }
        Ok(Err(payload)) => {
            let _ = handle.join();
            GuardOutcome::Panicked(panic_message(payload.as_ref()))
        }
        Err(mpsc::RecvTimeoutError::Timeout) => {
            warn!(limit_secs = limit.as_secs_f64(), "candidate exceeded its time limit");
            GuardOutcome::TimedOut
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => {
            GuardOutcome::Panicked("candidate thread exited without reporting a result".to_string())
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "candidate panicked".to_string()
    }
}
