//! Report rows handed to the exporters by upstream collectors.
//!
//! Rows are plain data: they are built once, read by the exporters and
//! dropped at the end of the call.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Audit findings for one profile/account.
///
/// The five finding fields each hold a newline- or comma-separated list
/// encoded as a single string; the PDF composer splits them back into items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditRow {
    pub profile: String,
    pub account_id: String,
    pub untagged_resources: String,
    pub stopped_instances: String,
    pub unused_volumes: String,
    pub unused_eips: String,
    pub budget_alerts: String,
}

impl AuditRow {
    pub fn new(profile: impl Into<String>, account_id: impl Into<String>) -> Self {
        Self {
            profile: profile.into(),
            account_id: account_id.into(),
            ..Self::default()
        }
    }

    /// Fields in CSV column order.
    pub fn fields(&self) -> [&str; 7] {
        [
            self.profile.as_str(),
            self.account_id.as_str(),
            self.untagged_resources.as_str(),
            self.stopped_instances.as_str(),
            self.unused_volumes.as_str(),
            self.unused_eips.as_str(),
            self.budget_alerts.as_str(),
        ]
    }

    /// Titled finding sections in report order.
    pub fn sections(&self) -> [(&'static str, &str); 5] {
        [
            ("Untagged Resources", self.untagged_resources.as_str()),
            ("Stopped EC2 Instances", self.stopped_instances.as_str()),
            ("Unused Volumes", self.unused_volumes.as_str()),
            ("Unused EIPs", self.unused_eips.as_str()),
            ("Budget Alerts", self.budget_alerts.as_str()),
        ]
    }
}

/// Cost summary for one profile/account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostProfileRow {
    pub profile: String,
    pub account_id: String,
    pub last_month: f64,
    pub current_month: f64,
    pub service_costs: BTreeMap<String, f64>,
    pub budget_info: Vec<String>,
    pub ec2_summary: BTreeMap<String, u64>,
}

impl CostProfileRow {
    /// Services ordered by descending cost, ties broken by name.
    pub fn services_by_cost(&self) -> Vec<(&str, f64)> {
        let mut services: Vec<(&str, f64)> = self
            .service_costs
            .iter()
            .map(|(name, cost)| (name.as_str(), *cost))
            .collect();
        services.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        services
    }

    /// Instance states with a non-zero count.
    pub fn active_ec2_states(&self) -> impl Iterator<Item = (&str, u64)> {
        self.ec2_summary
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(state, count)| (state.as_str(), *count))
    }
}

/// Opaque trend data, serialized verbatim.
pub type TrendRow = serde_json::Map<String, serde_json::Value>;

/// Format an amount as `$1234.50`.
pub fn format_currency(amount: f64) -> String {
    format!("${amount:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(150.5), "$150.50");
        assert_eq!(format_currency(100.0), "$100.00");
        assert_eq!(format_currency(0.004), "$0.00");
    }

    #[test]
    fn test_audit_row_missing_fields_default_to_empty() {
        let row: AuditRow =
            serde_json::from_str(r#"{"profile": "dev", "account_id": "123"}"#).unwrap();
        assert_eq!(row.stopped_instances, "");
        assert_eq!(row.fields()[6], "");
    }

    #[test]
    fn test_services_by_cost_is_stable() {
        let mut row = CostProfileRow::default();
        row.service_costs.insert("Amazon S3".into(), 12.0);
        row.service_costs.insert("Amazon EC2".into(), 80.25);
        row.service_costs.insert("AWS Lambda".into(), 12.0);

        let names: Vec<&str> = row.services_by_cost().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["Amazon EC2", "AWS Lambda", "Amazon S3"]);
    }

    #[test]
    fn test_active_ec2_states_skips_zero_counts() {
        let mut row = CostProfileRow::default();
        row.ec2_summary.insert("running".into(), 3);
        row.ec2_summary.insert("stopped".into(), 0);

        let states: Vec<_> = row.active_ec2_states().collect();
        assert_eq!(states, vec![("running", 3)]);
    }
}
