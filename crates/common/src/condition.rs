use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::model::{RuleCondition, RuleDataSource, RuleMetricDataSource, ThresholdRuleCondition};
use crate::window::{WindowParseError, WindowSize};

pub const CONDITION_USAGE: &str =
    "METRIC {>,>=,<,<=} THRESHOLD {avg,min,max,total,last} PERIOD";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionOperator {
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
}

impl ConditionOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
        }
    }
}

impl fmt::Display for ConditionOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid operator '{0}': expected one of >, >=, <, <=")]
pub struct OperatorParseError(pub String);

impl FromStr for ConditionOperator {
    type Err = OperatorParseError;

    /// Accepts the CLI symbols as well as the API names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            ">" | "GreaterThan" => Ok(Self::GreaterThan),
            ">=" | "GreaterThanOrEqual" => Ok(Self::GreaterThanOrEqual),
            "<" | "LessThan" => Ok(Self::LessThan),
            "<=" | "LessThanOrEqual" => Ok(Self::LessThanOrEqual),
            other => Err(OperatorParseError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeAggregation {
    Average,
    Minimum,
    Maximum,
    Total,
    Last,
}

impl TimeAggregation {
    pub fn shorthand(&self) -> &'static str {
        match self {
            Self::Average => "avg",
            Self::Minimum => "min",
            Self::Maximum => "max",
            Self::Total => "total",
            Self::Last => "last",
        }
    }
}

impl fmt::Display for TimeAggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.shorthand())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid aggregation '{0}': expected one of avg, min, max, total, last")]
pub struct AggregationParseError(pub String);

impl FromStr for TimeAggregation {
    type Err = AggregationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "avg" | "average" => Ok(Self::Average),
            "min" | "minimum" => Ok(Self::Minimum),
            "max" | "maximum" => Ok(Self::Maximum),
            "total" => Ok(Self::Total),
            "last" => Ok(Self::Last),
            _ => Err(AggregationParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConditionParseError {
    #[error("usage error: --condition {}", CONDITION_USAGE)]
    TooFewTokens,
    #[error("usage error: --condition {}: {}", CONDITION_USAGE, .0)]
    Operator(#[from] OperatorParseError),
    #[error("usage error: --condition {}: invalid threshold '{}'", CONDITION_USAGE, .0)]
    Threshold(String),
    #[error("usage error: --condition {}: {}", CONDITION_USAGE, .0)]
    Aggregation(#[from] AggregationParseError),
    #[error("usage error: --condition {}: {}", CONDITION_USAGE, .0)]
    Period(#[from] WindowParseError),
}

/// A parsed `--condition` expression, before a target is attached.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionSpec {
    pub metric_name: String,
    pub operator: ConditionOperator,
    pub threshold: f64,
    pub aggregation: TimeAggregation,
    pub window: WindowSize,
}

impl ConditionSpec {
    pub fn into_condition(self, resource_uri: impl Into<String>) -> RuleCondition {
        RuleCondition::Threshold(ThresholdRuleCondition {
            data_source: RuleDataSource::Metric(RuleMetricDataSource {
                resource_uri: resource_uri.into(),
                metric_name: self.metric_name,
            }),
            operator: self.operator,
            threshold: self.threshold,
            window_size: self.window,
            time_aggregation: self.aggregation,
        })
    }
}

impl FromStr for ConditionSpec {
    type Err = ConditionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        if tokens.len() < 5 {
            return Err(ConditionParseError::TooFewTokens);
        }

        let (metric, tail) = tokens.split_at(tokens.len() - 4);
        let [op, threshold, aggregation, period] = tail else {
            return Err(ConditionParseError::TooFewTokens);
        };

        let threshold = threshold
            .parse::<f64>()
            .ok()
            .filter(|t| t.is_finite())
            .ok_or_else(|| ConditionParseError::Threshold(threshold.to_string()))?;

        Ok(Self {
            metric_name: metric.join(" "),
            operator: op.parse()?,
            threshold,
            aggregation: aggregation.parse()?,
            window: period.parse()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_multi_word_metric() {
        let spec: ConditionSpec = "Percentage CPU > 90 avg 5m".parse().unwrap();
        assert_eq!(spec.metric_name, "Percentage CPU");
        assert_eq!(spec.operator, ConditionOperator::GreaterThan);
        assert_eq!(spec.threshold, 90.0);
        assert_eq!(spec.aggregation, TimeAggregation::Average);
        assert_eq!(spec.window.to_string(), "0:05:00");
    }

    #[test]
    fn parses_single_word_metric_and_hour_window() {
        let spec: ConditionSpec = "Requests >= 60 total 1h".parse().unwrap();
        assert_eq!(spec.metric_name, "Requests");
        assert_eq!(spec.operator, ConditionOperator::GreaterThanOrEqual);
        assert_eq!(spec.aggregation, TimeAggregation::Total);
        assert_eq!(spec.window.to_string(), "1:00:00");
    }

    #[test]
    fn collapses_extra_whitespace() {
        let spec: ConditionSpec = "  Disk   Read  Bytes  <  1.5  MAX  PT10M ".parse().unwrap();
        assert_eq!(spec.metric_name, "Disk Read Bytes");
        assert_eq!(spec.threshold, 1.5);
        assert_eq!(spec.aggregation, TimeAggregation::Maximum);
    }

    #[test]
    fn too_few_tokens() {
        assert_eq!(
            "> 90 avg 5m".parse::<ConditionSpec>(),
            Err(ConditionParseError::TooFewTokens)
        );
    }

    #[test]
    fn bad_operator() {
        let err = "CPU => 90 avg 5m".parse::<ConditionSpec>().unwrap_err();
        assert!(matches!(err, ConditionParseError::Operator(_)));
        assert!(err.to_string().contains("usage error"));
    }

    #[test]
    fn bad_threshold() {
        assert!(matches!(
            "CPU > ninety avg 5m".parse::<ConditionSpec>(),
            Err(ConditionParseError::Threshold(_))
        ));
        assert!(matches!(
            "CPU > NaN avg 5m".parse::<ConditionSpec>(),
            Err(ConditionParseError::Threshold(_))
        ));
    }

    #[test]
    fn bad_aggregation_and_period() {
        assert!(matches!(
            "CPU > 90 mean 5m".parse::<ConditionSpec>(),
            Err(ConditionParseError::Aggregation(_))
        ));
        assert!(matches!(
            "CPU > 90 avg soon".parse::<ConditionSpec>(),
            Err(ConditionParseError::Period(_))
        ));
    }

    #[test]
    fn operator_accepts_api_names() {
        assert_eq!(
            "LessThanOrEqual".parse::<ConditionOperator>().unwrap(),
            ConditionOperator::LessThanOrEqual
        );
        assert!("!=".parse::<ConditionOperator>().is_err());
    }

    #[test]
    fn operator_serializes_as_api_name() {
        let json = serde_json::to_string(&ConditionOperator::GreaterThanOrEqual).unwrap();
        assert_eq!(json, "\"GreaterThanOrEqual\"");
    }

    #[test]
    fn into_condition_attaches_target() {
        let spec: ConditionSpec = "Percentage CPU < 10 min 15m".parse().unwrap();
        let RuleCondition::Threshold(c) = spec.into_condition("/subscriptions/s/vm");
        assert_eq!(c.data_source.resource_uri(), "/subscriptions/s/vm");
        assert_eq!(c.data_source.metric_name(), "Percentage CPU");
        assert_eq!(c.time_aggregation, TimeAggregation::Minimum);
    }
}
