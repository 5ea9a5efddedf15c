use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::condition::{ConditionOperator, TimeAggregation};
use crate::window::WindowSize;

pub const ALERT_RULE_TYPE: &str = "Microsoft.Insights/alertRules";
pub const RESOURCE_GROUP_TYPE: &str = "Microsoft.Resources/resourceGroups";

/// A classic metric alert rule as exchanged with the resource API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRuleResource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    #[serde(default)]
    pub alert_rule_resource_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_enabled: bool,
    pub condition: RuleCondition,
    #[serde(default)]
    pub actions: Vec<RuleAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated_time: Option<DateTime<Utc>>,
}

impl AlertRuleResource {
    pub fn new(
        name: impl Into<String>,
        location: impl Into<String>,
        condition: RuleCondition,
        actions: Vec<RuleAction>,
    ) -> Self {
        Self {
            id: None,
            name: None,
            resource_type: None,
            location: location.into(),
            tags: BTreeMap::new(),
            alert_rule_resource_name: name.into(),
            description: None,
            is_enabled: true,
            condition,
            actions,
            last_updated_time: None,
        }
    }

    pub fn threshold_condition(&self) -> &ThresholdRuleCondition {
        match &self.condition {
            RuleCondition::Threshold(c) => c,
        }
    }

    pub fn threshold_condition_mut(&mut self) -> &mut ThresholdRuleCondition {
        match &mut self.condition {
            RuleCondition::Threshold(c) => c,
        }
    }

    pub fn email_action(&self) -> Option<&RuleEmailAction> {
        self.actions.iter().find_map(RuleAction::as_email)
    }

    pub fn webhook_actions(&self) -> impl Iterator<Item = &RuleWebhookAction> {
        self.actions.iter().filter_map(RuleAction::as_webhook)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "odatatype")]
pub enum RuleCondition {
    #[serde(rename = "Microsoft.Azure.Management.Insights.Models.ThresholdRuleCondition")]
    Threshold(ThresholdRuleCondition),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdRuleCondition {
    pub data_source: RuleDataSource,
    pub operator: ConditionOperator,
    pub threshold: f64,
    pub window_size: WindowSize,
    pub time_aggregation: TimeAggregation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "odatatype")]
pub enum RuleDataSource {
    #[serde(rename = "Microsoft.Azure.Management.Insights.Models.RuleMetricDataSource")]
    Metric(RuleMetricDataSource),
}

impl RuleDataSource {
    pub fn resource_uri(&self) -> &str {
        match self {
            Self::Metric(m) => &m.resource_uri,
        }
    }

    pub fn metric_name(&self) -> &str {
        match self {
            Self::Metric(m) => &m.metric_name,
        }
    }

    pub fn set_resource_uri(&mut self, uri: impl Into<String>) {
        match self {
            Self::Metric(m) => m.resource_uri = uri.into(),
        }
    }

    pub fn set_metric_name(&mut self, name: impl Into<String>) {
        match self {
            Self::Metric(m) => m.metric_name = name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleMetricDataSource {
    #[serde(default)]
    pub resource_uri: String,
    pub metric_name: String,
}

/// Side effect fired when a rule is breached, discriminated by `odatatype`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "odatatype")]
pub enum RuleAction {
    #[serde(rename = "Microsoft.Azure.Management.Insights.Models.RuleEmailAction")]
    Email(RuleEmailAction),
    #[serde(rename = "Microsoft.Azure.Management.Insights.Models.RuleWebhookAction")]
    Webhook(RuleWebhookAction),
}

impl RuleAction {
    pub fn as_email(&self) -> Option<&RuleEmailAction> {
        match self {
            Self::Email(e) => Some(e),
            Self::Webhook(_) => None,
        }
    }

    pub fn as_webhook(&self) -> Option<&RuleWebhookAction> {
        match self {
            Self::Webhook(w) => Some(w),
            Self::Email(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleEmailAction {
    #[serde(default)]
    pub send_to_service_owners: bool,
    #[serde(default)]
    pub custom_emails: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleWebhookAction {
    pub service_uri: String,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

/// Envelope used by list endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceList<T> {
    pub value: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    pub location: String,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}
