use std::collections::BTreeMap;

use crate::action::{ActionArg, ActionRemoval, ActionSet};
use crate::condition::{ConditionOperator, ConditionSpec, TimeAggregation};
use crate::model::AlertRuleResource;
use crate::window::WindowSize;

/// Changes requested by `alert update`, applied to a fetched rule before it
/// is written back.
#[derive(Debug, Clone, Default)]
pub struct RuleUpdate {
    pub description: Option<String>,
    pub enabled: Option<bool>,
    pub tags: Option<BTreeMap<String, String>>,
    pub condition: Option<ConditionSpec>,
    pub metric: Option<String>,
    pub operator: Option<ConditionOperator>,
    pub threshold: Option<f64>,
    pub aggregation: Option<TimeAggregation>,
    pub period: Option<WindowSize>,
    pub target: Option<String>,
    pub email_service_owners: Option<bool>,
    pub add_actions: Vec<ActionArg>,
    pub remove_actions: Vec<ActionRemoval>,
}

impl RuleUpdate {
    pub fn apply(self, rule: &mut AlertRuleResource) {
        if let Some(description) = self.description {
            rule.description = Some(description);
        }
        if let Some(enabled) = self.enabled {
            rule.is_enabled = enabled;
        }
        if let Some(tags) = self.tags {
            rule.tags = tags;
        }

        if let Some(spec) = self.condition {
            let previous_uri = rule
                .threshold_condition()
                .data_source
                .resource_uri()
                .to_string();
            rule.condition = spec.into_condition(previous_uri);
        }

        let condition = rule.threshold_condition_mut();
        if let Some(metric) = self.metric {
            condition.data_source.set_metric_name(metric);
        }
        if let Some(operator) = self.operator {
            condition.operator = operator;
        }
        if let Some(threshold) = self.threshold {
            condition.threshold = threshold;
        }
        if let Some(aggregation) = self.aggregation {
            condition.time_aggregation = aggregation;
        }
        if let Some(period) = self.period {
            condition.window_size = period;
        }
        if let Some(target) = self.target {
            condition.data_source.set_resource_uri(target);
        }

        let mut actions = ActionSet::from_actions(&rule.actions);
        actions.remove(&self.remove_actions);
        actions.add(&self.add_actions);
        if let Some(flag) = self.email_service_owners {
            actions.send_to_service_owners = flag;
        }
        rule.actions = actions.into_actions();
    }
}
