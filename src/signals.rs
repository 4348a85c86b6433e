//! Interrupt bookkeeping for a run.
//!
//! Children share the runner's process group, so a terminal Ctrl-C already
//! reaches them. The runner records SIGINT/SIGTERM instead of dying, lets the
//! in-flight child finish, and stops evaluating steps. SIGTERM is not
//! delivered group-wide, so it is forwarded to the tracked child.
use std::sync::atomic::{AtomicI32, Ordering};

static INTERRUPT: AtomicI32 = AtomicI32::new(0);
static CHILD_PID: AtomicI32 = AtomicI32::new(0);

/// First signal received since [`install`], if any.
pub fn interrupted() -> Option<i32> {
    match INTERRUPT.load(Ordering::SeqCst) {
        0 => None,
        signo => Some(signo),
    }
}

pub(crate) fn track_child(pid: u32) {
    CHILD_PID.store(i32::try_from(pid).unwrap_or(0), Ordering::SeqCst);
}

pub(crate) fn untrack_child() {
    CHILD_PID.store(0, Ordering::SeqCst);
}

/// Deliver `signo` to `pid`, for signals recorded before the child was tracked.
#[cfg(unix)]
pub(crate) fn forward(pid: u32, signo: i32) {
    let Ok(pid) = libc::pid_t::try_from(pid) else {
        return;
    };
    // SAFETY: plain kill(2) on a child we spawned and have not yet reaped.
    unsafe {
        libc::kill(pid, signo);
    }
}

#[cfg(not(unix))]
pub(crate) fn forward(_pid: u32, _signo: i32) {}

#[cfg(unix)]
extern "C" fn record_signal(signo: libc::c_int) {
    let _ = INTERRUPT.compare_exchange(0, signo, Ordering::SeqCst, Ordering::SeqCst);
    if signo == libc::SIGTERM {
        let pid = CHILD_PID.load(Ordering::SeqCst);
        if pid > 0 {
            // SAFETY: kill(2) is async-signal-safe.
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

/// Restores the previous signal dispositions when dropped.
pub struct SignalGuard {
    #[cfg(unix)]
    previous: Vec<(libc::c_int, libc::sighandler_t)>,
}

#[cfg(unix)]
pub fn install() -> SignalGuard {
    let handler = record_signal as extern "C" fn(libc::c_int) as libc::sighandler_t;
    let previous = [libc::SIGINT, libc::SIGTERM]
        .into_iter()
        .map(|signo| {
            // SAFETY: the handler only touches atomics and calls kill(2).
            let prev = unsafe { libc::signal(signo, handler) };
            (signo, prev)
        })
        .collect();
    SignalGuard { previous }
}

#[cfg(not(unix))]
pub fn install() -> SignalGuard {
    SignalGuard {}
}

impl Drop for SignalGuard {
    fn drop(&mut self) {
        #[cfg(unix)]
        for &(signo, prev) in &self.previous {
            if prev != libc::SIG_ERR {
                // SAFETY: restoring a disposition returned by signal(2).
                unsafe {
                    libc::signal(signo, prev);
                }
            }
        }
    }
}

