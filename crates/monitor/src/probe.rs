use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use sysinfo::{Pid, ProcessRefreshKind, System};

/// Readings younger than this are served from cache.
pub const DEFAULT_MAX_AGE: Duration = Duration::from_millis(50);

/// Process-level resource usage source.
pub trait ResourceProbe: Send + Sync {
    fn memory_used_bytes(&self) -> Option<u64>;
}

struct ProbeState {
    sys: System,
    refreshed: Option<Instant>,
}

/// Reads the resident memory of the current process. Only memory is
/// refreshed, at most once per `max_age`; callers that find a refresh in
/// progress get the last reading instead of waiting.
pub struct SysinfoProbe {
    state: Mutex<ProbeState>,
    pid: Option<Pid>,
    max_age: Duration,
    // 0 until the first successful read
    last_bytes: AtomicU64,
}

impl Default for SysinfoProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl SysinfoProbe {
    pub fn new() -> Self {
        Self::with_max_age(DEFAULT_MAX_AGE)
    }

    pub fn with_max_age(max_age: Duration) -> Self {
        let pid = match sysinfo::get_current_pid() {
            Ok(pid) => Some(pid),
            Err(e) => {
                tracing::warn!("resource probe unavailable: {e}");
                None
            }
        };
        Self {
            state: Mutex::new(ProbeState {
                sys: System::new(),
                refreshed: None,
            }),
            pid,
            max_age,
            last_bytes: AtomicU64::new(0),
        }
    }

    fn cached(&self) -> Option<u64> {
        match self.last_bytes.load(Ordering::Relaxed) {
            0 => None,
            bytes => Some(bytes),
        }
    }
}

impl ResourceProbe for SysinfoProbe {
    fn memory_used_bytes(&self) -> Option<u64> {
        let pid = self.pid?;
        let Some(mut state) = self.state.try_lock() else {
            return self.cached();
        };
        if state.refreshed.is_some_and(|at| at.elapsed() < self.max_age) {
            return self.cached();
        }
        if !state
            .sys
            .refresh_process_specifics(pid, ProcessRefreshKind::new().with_memory())
        {
            return None;
        }
        let bytes = state.sys.process(pid)?.memory();
        state.refreshed = Some(Instant::now());
        self.last_bytes.store(bytes, Ordering::Relaxed);
        Some(bytes)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProbe;

impl ResourceProbe for NoopProbe {
    fn memory_used_bytes(&self) -> Option<u64> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sysinfo_reports_own_memory() {
        let probe = SysinfoProbe::new();
        let bytes = probe.memory_used_bytes();
        assert!(bytes.is_some_and(|b| b > 0));
    }

    #[test]
    fn fresh_reading_is_reused() {
        let probe = SysinfoProbe::with_max_age(Duration::from_secs(60));
        let first = probe.memory_used_bytes();
        assert!(first.is_some());
        let refreshed = probe.state.lock().refreshed;
        assert_eq!(probe.memory_used_bytes(), first);
        assert_eq!(probe.state.lock().refreshed, refreshed);
    }

    #[test]
    fn contended_read_returns_last_reading_without_waiting() {
        let probe = SysinfoProbe::with_max_age(Duration::ZERO);
        let first = probe.memory_used_bytes();
        assert!(first.is_some());

        let _held = probe.state.lock();
        assert_eq!(probe.memory_used_bytes(), first);
    }

    #[test]
    fn contended_read_before_first_reading_reports_nothing() {
        let probe = SysinfoProbe::new();
        let _held = probe.state.lock();
        assert_eq!(probe.memory_used_bytes(), None);
    }

    #[test]
    fn noop_reports_nothing() {
        assert_eq!(NoopProbe.memory_used_bytes(), None);
    }
}
