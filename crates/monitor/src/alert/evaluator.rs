use dashmap::DashMap;
use parking_lot::RwLock;

use super::error::RuleError;
use super::event::Alert;
use super::rule::AlertRule;
use super::state::CooldownState;
use crate::aggregator::aggregate;
use crate::sample::SampleStore;

/// Owns the rule set and the cooldown state of every `(rule, operation)`
/// pair that has fired.
#[derive(Default)]
pub struct AlertEngine {
    rules: RwLock<Vec<AlertRule>>,
    states: DashMap<(String, String), CooldownState>,
}

impl AlertEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rules(rules: Vec<AlertRule>) -> Result<Self, RuleError> {
        let engine = Self::new();
        for rule in rules {
            engine.add_rule(rule)?;
        }
        Ok(engine)
    }

    pub fn add_rule(&self, rule: AlertRule) -> Result<(), RuleError> {
        rule.validate()?;
        let mut rules = self.rules.write();
        if rules.iter().any(|r| r.id == rule.id) {
            return Err(RuleError::DuplicateId(rule.id));
        }
        tracing::info!(rule_id = %rule.id, operation = %rule.operation, metric = rule.metric.as_str(), "alert rule added");
        rules.push(rule);
        Ok(())
    }

    pub fn remove_rule(&self, id: &str) -> bool {
        let removed = {
            let mut rules = self.rules.write();
            let before = rules.len();
            rules.retain(|r| r.id != id);
            rules.len() != before
        };
        if removed {
            self.states.retain(|(rule_id, _), _| rule_id != id);
            tracing::info!(rule_id = %id, "alert rule removed");
        }
        removed
    }

    pub fn list_rules(&self) -> Vec<AlertRule> {
        self.rules.read().clone()
    }

    pub fn rule_count(&self) -> usize {
        self.rules.read().len()
    }

    /// Evaluates every enabled rule bound to `operation` or to the wildcard.
    pub fn on_sample_recorded(
        &self,
        operation: &str,
        samples: &SampleStore,
        now_ms: i64,
    ) -> Vec<Alert> {
        let matching: Vec<AlertRule> = self
            .rules
            .read()
            .iter()
            .filter(|r| r.enabled && r.applies_to(operation))
            .cloned()
            .collect();

        matching
            .iter()
            .filter_map(|rule| self.evaluate(rule, operation, samples, now_ms))
            .collect()
    }

    pub fn evaluate(
        &self,
        rule: &AlertRule,
        operation: &str,
        samples: &SampleStore,
        now_ms: i64,
    ) -> Option<Alert> {
        let window = samples.query(operation, Some(rule.time_window_ms), now_ms);
        let stats = aggregate(&window)?;
        let value = rule.metric.extract(&stats);

        let condition_met = rule.comparison.evaluate(value, rule.threshold);
        tracing::debug!(rule_id = %rule.id, %operation, value, condition_met, "rule evaluated");
        if !condition_met {
            return None;
        }

        let mut state = self
            .states
            .entry((rule.id.clone(), operation.to_string()))
            .or_insert(CooldownState::Idle);
        if !state.can_fire(now_ms, rule.cooldown_ms) {
            return None;
        }
        *state = CooldownState::fire(now_ms);
        drop(state);

        Some(Alert::fire(rule, operation, value, now_ms))
    }

    #[cfg(test)]
    pub(crate) fn state(&self, rule_id: &str, operation: &str, now_ms: i64) -> CooldownState {
        let cooldown_ms = self
            .rules
            .read()
            .iter()
            .find(|r| r.id == rule_id)
            .map(|r| r.cooldown_ms)
            .unwrap_or(0);
        self.states
            .get(&(rule_id.to_string(), operation.to_string()))
            .map(|s| s.at(now_ms, cooldown_ms))
            .unwrap_or(CooldownState::Idle)
    }
}
