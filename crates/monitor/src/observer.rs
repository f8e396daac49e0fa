use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::alert::Alert;
use crate::sample::Sample;

pub trait MetricObserver: Send + Sync {
    fn on_metric(&self, sample: &Sample) -> Result<(), ObserverError>;
}

pub trait AlertObserver: Send + Sync {
    fn on_alert(&self, alert: &Alert) -> Result<(), ObserverError>;
}

#[derive(Debug)]
pub struct ObserverError(pub String);

impl std::fmt::Display for ObserverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "observer: {}", self.0)
    }
}

impl std::error::Error for ObserverError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Forwards events into a bounded channel without blocking the producer.
/// A full or closed channel drops the event and reports an error.
pub struct ChannelObserver<T> {
    tx: mpsc::Sender<T>,
}

impl<T> ChannelObserver<T> {
    pub fn channel(capacity: usize) -> (Arc<Self>, mpsc::Receiver<T>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Arc::new(Self { tx }), rx)
    }

    fn forward(&self, event: T) -> Result<(), ObserverError> {
        self.tx.try_send(event).map_err(|e| match e {
            TrySendError::Full(_) => ObserverError("channel full, event dropped".into()),
            TrySendError::Closed(_) => ObserverError("channel closed".into()),
        })
    }
}

impl MetricObserver for ChannelObserver<Sample> {
    fn on_metric(&self, sample: &Sample) -> Result<(), ObserverError> {
        self.forward(sample.clone())
    }
}

impl AlertObserver for ChannelObserver<Alert> {
    fn on_alert(&self, alert: &Alert) -> Result<(), ObserverError> {
        self.forward(alert.clone())
    }
}

/// Subscriber lists. Notification is synchronous, in subscription order.
#[derive(Default)]
pub struct Observers {
    next_id: AtomicU64,
    metric: RwLock<Vec<(SubscriptionId, Arc<dyn MetricObserver>)>>,
    alert: RwLock<Vec<(SubscriptionId, Arc<dyn AlertObserver>)>>,
}

impl Observers {
    fn next_id(&self) -> SubscriptionId {
        SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    pub fn subscribe_metrics(&self, observer: Arc<dyn MetricObserver>) -> SubscriptionId {
        let id = self.next_id();
        self.metric.write().push((id, observer));
        id
    }

    pub fn subscribe_alerts(&self, observer: Arc<dyn AlertObserver>) -> SubscriptionId {
        let id = self.next_id();
        self.alert.write().push((id, observer));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut removed = false;
        self.metric.write().retain(|(sid, _)| {
            let keep = *sid != id;
            removed |= !keep;
            keep
        });
        self.alert.write().retain(|(sid, _)| {
            let keep = *sid != id;
            removed |= !keep;
            keep
        });
        removed
    }

    /// Returns the number of observers that failed.
    pub fn notify_metric(&self, sample: &Sample) -> usize {
        let observers = self.metric.read().clone();
        observers
            .iter()
            .filter(|(_, o)| match o.on_metric(sample) {
                Ok(()) => false,
                Err(e) => {
                    tracing::warn!(operation = %sample.operation, "metric {e}");
                    true
                }
            })
            .count()
    }

    /// Returns the number of observers that failed.
    pub fn notify_alert(&self, alert: &Alert) -> usize {
        let observers = self.alert.read().clone();
        observers
            .iter()
            .filter(|(_, o)| match o.on_alert(alert) {
                Ok(()) => false,
                Err(e) => {
                    tracing::warn!(alert_id = %alert.id, "alert {e}");
                    true
                }
            })
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Recording {
        seen: Mutex<Vec<String>>,
    }

    impl MetricObserver for Recording {
        fn on_metric(&self, sample: &Sample) -> Result<(), ObserverError> {
            self.seen.lock().push(sample.operation.clone());
            Ok(())
        }
    }

    struct Failing;

    impl MetricObserver for Failing {
        fn on_metric(&self, _sample: &Sample) -> Result<(), ObserverError> {
            Err(ObserverError("boom".into()))
        }
    }

    #[test]
    fn notifies_in_order_and_counts_failures() {
        let observers = Observers::default();
        let rec = Arc::new(Recording::default());
        observers.subscribe_metrics(rec.clone());
        observers.subscribe_metrics(Arc::new(Failing));

        let failed = observers.notify_metric(&Sample::new("op", 1.0, true, 0));
        assert_eq!(failed, 1);
        assert_eq!(*rec.seen.lock(), vec!["op".to_string()]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let observers = Observers::default();
        let rec = Arc::new(Recording::default());
        let id = observers.subscribe_metrics(rec.clone());
        assert!(observers.unsubscribe(id));
        assert!(!observers.unsubscribe(id));
        observers.notify_metric(&Sample::new("op", 1.0, true, 0));
        assert!(rec.seen.lock().is_empty());
    }

    #[tokio::test]
    async fn channel_observer_drops_when_full() {
        let (obs, mut rx) = ChannelObserver::<Sample>::channel(1);
        assert!(obs.on_metric(&Sample::new("a", 1.0, true, 0)).is_ok());
        assert!(obs.on_metric(&Sample::new("b", 1.0, true, 0)).is_err());
        let got = rx.recv().await.unwrap();
        assert_eq!(got.operation, "a");
    }

    #[test]
    fn channel_observer_reports_closed() {
        let (obs, rx) = ChannelObserver::<Sample>::channel(4);
        drop(rx);
        let err = obs.on_metric(&Sample::new("a", 1.0, true, 0)).unwrap_err();
        assert!(err.to_string().contains("closed"));
    }
}
