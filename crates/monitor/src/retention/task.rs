use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Aborts the background task when stopped or dropped.
pub struct SweepHandle {
    handle: JoinHandle<()>,
}

impl SweepHandle {
    pub fn abort(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for SweepHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Runs `tick` every `interval` on the current tokio runtime. Returns `None`
/// when called outside a runtime.
pub fn spawn_sweeper<F>(interval: Duration, mut tick: F) -> Option<SweepHandle>
where
    F: FnMut() + Send + 'static,
{
    let runtime = match tokio::runtime::Handle::try_current() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::warn!("retention sweeper not started: {e}");
            return None;
        }
    };

    let handle = runtime.spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // the first tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            tick();
        }
    });
    Some(SweepHandle { handle })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn ticks_until_aborted() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let handle = spawn_sweeper(Duration::from_millis(10), move || {
            c.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

        tokio::time::timeout(Duration::from_secs(2), async {
            while count.load(Ordering::SeqCst) < 2 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("sweeper never ticked");

        handle.abort();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(handle.is_finished());
    }

    #[test]
    fn outside_runtime_returns_none() {
        assert!(spawn_sweeper(Duration::from_secs(1), || {}).is_none());
    }
}
