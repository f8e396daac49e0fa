use dashmap::DashMap;
use std::collections::VecDeque;
use std::sync::Arc;

use super::event::Alert;

pub const MAX_ALERTS_PER_OPERATION: usize = 1000;

/// Fired alerts, kept per operation in firing order.
#[derive(Clone)]
pub struct AlertStore {
    alerts: Arc<DashMap<String, VecDeque<Alert>>>,
    max_per_operation: usize,
}

impl Default for AlertStore {
    fn default() -> Self {
        Self::new(MAX_ALERTS_PER_OPERATION)
    }
}

impl AlertStore {
    pub fn new(max_per_operation: usize) -> Self {
        Self {
            alerts: Arc::new(DashMap::new()),
            max_per_operation: max_per_operation.max(1),
        }
    }

    pub fn push(&self, alert: Alert) {
        let mut list = self.alerts.entry(alert.operation.clone()).or_default();
        list.push_back(alert);
        while list.len() > self.max_per_operation {
            list.pop_front();
        }
    }

    /// Newest first. `None` lists alerts across all operations.
    pub fn list(&self, operation: Option<&str>) -> Vec<Alert> {
        let mut out: Vec<Alert> = match operation {
            Some(op) => self
                .alerts
                .get(op)
                .map(|l| l.iter().cloned().collect())
                .unwrap_or_default(),
            None => self
                .alerts
                .iter()
                .flat_map(|e| e.value().iter().cloned().collect::<Vec<_>>())
                .collect(),
        };
        out.sort_by(|a, b| b.triggered_at_ms.cmp(&a.triggered_at_ms));
        out
    }

    /// Alerts triggered after `since_ms`, newest first.
    pub fn since(&self, since_ms: i64) -> Vec<Alert> {
        let mut out = self.list(None);
        out.retain(|a| a.triggered_at_ms > since_ms);
        out
    }

    pub fn clear(&self, operation: Option<&str>) {
        match operation {
            Some(op) => {
                self.alerts.remove(op);
            }
            None => self.alerts.clear(),
        }
    }

    pub fn count(&self) -> usize {
        self.alerts.iter().map(|e| e.value().len()).sum()
    }

    pub fn prune_before(&self, cutoff_ms: i64) -> usize {
        let mut dropped = 0;
        self.alerts.retain(|_, list| {
            let before = list.len();
            list.retain(|a| a.triggered_at_ms >= cutoff_ms);
            dropped += before - list.len();
            !list.is_empty()
        });
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::Severity;

    fn alert(op: &str, at: i64) -> Alert {
        Alert {
            id: format!("r-{at}"),
            rule_id: "r".into(),
            operation: op.into(),
            triggered_at_ms: at,
            observed_value: 1.0,
            threshold: 0.5,
            severity: Severity::Critical,
            message: String::new(),
        }
    }

    #[test]
    fn list_is_newest_first() {
        let store = AlertStore::default();
        store.push(alert("a", 100));
        store.push(alert("b", 300));
        store.push(alert("a", 200));
        let all: Vec<i64> = store.list(None).iter().map(|a| a.triggered_at_ms).collect();
        assert_eq!(all, vec![300, 200, 100]);
        assert_eq!(store.list(Some("a")).len(), 2);
    }

    #[test]
    fn clear_one_or_all() {
        let store = AlertStore::default();
        store.push(alert("a", 1));
        store.push(alert("b", 2));
        store.clear(Some("a"));
        assert_eq!(store.count(), 1);
        store.clear(None);
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn cap_drops_oldest() {
        let store = AlertStore::new(2);
        for at in 1..=3 {
            store.push(alert("a", at));
        }
        let ts: Vec<i64> = store.list(Some("a")).iter().map(|a| a.triggered_at_ms).collect();
        assert_eq!(ts, vec![3, 2]);
    }

    #[test]
    fn prune_and_since() {
        let store = AlertStore::default();
        store.push(alert("a", 100));
        store.push(alert("b", 900));
        assert_eq!(store.since(500).len(), 1);
        assert_eq!(store.prune_before(500), 1);
        assert!(store.list(Some("a")).is_empty());
        assert_eq!(store.count(), 1);
    }
}
