//! Event query filter
//!
//! Builds the vManage query-builder document sent as the `query` parameter
//! of `dataservice/event`.

use crate::Result;
use serde::{Deserialize, Serialize};

/// Default look-back window in hours
pub const DEFAULT_HOURS: u32 = 24;
/// Default maximum number of records
pub const DEFAULT_SIZE: u32 = 1000;

/// Event log filter. Optional predicates left unset produce no rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFilter {
    pub hours: u32,
    pub size: u32,
    pub system_ip: Option<String>,
    pub severity: Option<String>,
    pub event_name: Option<String>,
}

impl Default for EventFilter {
    fn default() -> Self {
        Self {
            hours: DEFAULT_HOURS,
            size: DEFAULT_SIZE,
            system_ip: None,
            severity: None,
            event_name: None,
        }
    }
}

impl EventFilter {
    pub fn builder() -> EventFilterBuilder {
        EventFilterBuilder::default()
    }

    /// Rules in the order vManage receives them; the time window is always first
    pub fn rules(&self) -> Vec<QueryRule> {
        let mut rules = vec![QueryRule::last_n_hours(self.hours)];

        let optional = [
            ("system_ip", &self.system_ip),
            ("severity_level", &self.severity),
            ("eventname", &self.event_name),
        ];
        for (field, value) in optional {
            if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                rules.push(QueryRule::string_in(field, value));
            }
        }

        rules
    }

    pub fn to_query(&self) -> EventQuery {
        EventQuery {
            query: RuleGroup {
                condition: Condition::And,
                rules: self.rules(),
            },
            size: self.size,
        }
    }

    /// Compact JSON document for the `query` parameter
    pub fn to_query_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_query())?)
    }
}

/// Builder for EventFilter
#[derive(Debug, Clone, Default)]
pub struct EventFilterBuilder {
    filter: EventFilter,
}

impl EventFilterBuilder {
    pub fn hours(mut self, hours: u32) -> Self {
        self.filter.hours = hours;
        self
    }

    pub fn size(mut self, size: u32) -> Self {
        self.filter.size = size;
        self
    }

    pub fn system_ip(mut self, system_ip: impl Into<String>) -> Self {
        self.filter.system_ip = Some(system_ip.into());
        self
    }

    pub fn severity(mut self, severity: impl Into<String>) -> Self {
        self.filter.severity = Some(severity.into());
        self
    }

    pub fn event_name(mut self, event_name: impl Into<String>) -> Self {
        self.filter.event_name = Some(event_name.into());
        self
    }

    pub fn build(self) -> EventFilter {
        self.filter
    }
}

/// `{"query": {...}, "size": N}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventQuery {
    pub query: RuleGroup,
    pub size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleGroup {
    pub condition: Condition,
    pub rules: Vec<QueryRule>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Condition {
    And,
    Or,
}

/// Single query-builder rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRule {
    pub value: Vec<String>,
    pub field: String,
    #[serde(rename = "type")]
    pub rule_type: RuleType,
    pub operator: Operator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleType {
    Date,
    String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    LastNHours,
    In,
}

impl QueryRule {
    pub fn last_n_hours(hours: u32) -> Self {
        Self {
            value: vec![hours.to_string()],
            field: "entry_time".to_string(),
            rule_type: RuleType::Date,
            operator: Operator::LastNHours,
        }
    }

    pub fn string_in(field: &str, value: &str) -> Self {
        Self {
            value: vec![value.to_string()],
            field: field.to_string(),
            rule_type: RuleType::String,
            operator: Operator::In,
        }
    }
}
