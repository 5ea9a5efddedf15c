use dashmap::DashMap;
use monitor_common::AlertRuleResource;
use std::sync::Arc;

use super::ScopeKey;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct RuleKey {
    scope: ScopeKey,
    name: String,
}

impl RuleKey {
    fn new(scope: &ScopeKey, name: &str) -> Self {
        Self {
            scope: scope.clone(),
            name: name.to_ascii_lowercase(),
        }
    }
}

/// Alert rules keyed by subscription, resource group and rule name.
/// Every part of the key is case-insensitive.
#[derive(Clone)]
pub struct RuleStore {
    rules: Arc<DashMap<RuleKey, AlertRuleResource>>,
}

impl Default for RuleStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleStore {
    pub fn new() -> Self {
        Self {
            rules: Arc::new(DashMap::new()),
        }
    }

    /// Inserts or replaces; returns `true` when the rule did not exist.
    pub fn upsert(&self, scope: &ScopeKey, name: &str, rule: AlertRuleResource) -> bool {
        self.rules.insert(RuleKey::new(scope, name), rule).is_none()
    }

    pub fn get(&self, scope: &ScopeKey, name: &str) -> Option<AlertRuleResource> {
        self.rules.get(&RuleKey::new(scope, name)).map(|r| r.clone())
    }

    /// Rules of one resource group, ordered by name.
    pub fn list(&self, scope: &ScopeKey) -> Vec<AlertRuleResource> {
        let mut rules: Vec<(String, AlertRuleResource)> = self
            .rules
            .iter()
            .filter(|r| &r.key().scope == scope)
            .map(|r| (r.key().name.clone(), r.value().clone()))
            .collect();
        rules.sort_by(|a, b| a.0.cmp(&b.0));
        rules.into_iter().map(|(_, r)| r).collect()
    }

    pub fn delete(&self, scope: &ScopeKey, name: &str) -> bool {
        self.rules.remove(&RuleKey::new(scope, name)).is_some()
    }

    /// Drops every rule of a resource group; returns how many were removed.
    pub fn delete_scope(&self, scope: &ScopeKey) -> usize {
        let before = self.rules.len();
        self.rules.retain(|k, _| &k.scope != scope);
        before.saturating_sub(self.rules.len())
    }

    pub fn count(&self) -> usize {
        self.rules.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use monitor_common::action::build_actions;
    use monitor_common::ConditionSpec;

    fn sample_rule(name: &str) -> AlertRuleResource {
        let spec: ConditionSpec = "Percentage CPU > 80 avg 5m".parse().unwrap();
        AlertRuleResource::new(name, "global", spec.into_condition("/subscriptions/s/vm"), build_actions(&[], false))
    }

    fn scope(group: &str) -> ScopeKey {
        ScopeKey::new("sub", group)
    }

    #[test]
    fn upsert_and_get() {
        let store = RuleStore::new();
        assert!(store.upsert(&scope("rg"), "High-CPU", sample_rule("High-CPU")));
        let r = store.get(&scope("RG"), "high-cpu").unwrap();
        assert_eq!(r.alert_rule_resource_name, "High-CPU");
    }

    #[test]
    fn upsert_existing_reports_replace() {
        let store = RuleStore::new();
        store.upsert(&scope("rg"), "r1", sample_rule("r1"));
        let mut updated = sample_rule("r1");
        updated.threshold_condition_mut().threshold = 90.0;
        assert!(!store.upsert(&scope("rg"), "R1", updated));
        assert_eq!(store.count(), 1);
        assert_eq!(store.get(&scope("rg"), "r1").unwrap().threshold_condition().threshold, 90.0);
    }

    #[test]
    fn list_is_scoped_and_sorted() {
        let store = RuleStore::new();
        store.upsert(&scope("rg"), "b", sample_rule("b"));
        store.upsert(&scope("rg"), "A", sample_rule("A"));
        store.upsert(&scope("other"), "c", sample_rule("c"));
        let names: Vec<String> = store
            .list(&scope("rg"))
            .into_iter()
            .map(|r| r.alert_rule_resource_name)
            .collect();
        assert_eq!(names, vec!["A", "b"]);
    }

    #[test]
    fn delete_existing() {
        let store = RuleStore::new();
        store.upsert(&scope("rg"), "r1", sample_rule("r1"));
        assert!(store.delete(&scope("rg"), "r1"));
        assert!(store.get(&scope("rg"), "r1").is_none());
    }

    #[test]
    fn delete_missing_returns_false() {
        let store = RuleStore::new();
        assert!(!store.delete(&scope("rg"), "nope"));
    }

    #[test]
    fn delete_scope_removes_only_that_group() {
        let store = RuleStore::new();
        store.upsert(&scope("rg"), "a", sample_rule("a"));
        store.upsert(&scope("rg"), "b", sample_rule("b"));
        store.upsert(&scope("keep"), "c", sample_rule("c"));
        assert_eq!(store.delete_scope(&scope("rg")), 2);
        assert_eq!(store.count(), 1);
    }
}
