//! Normalized response shapes
//!
//! Provider clients rename and default the provider's response fields into
//! these types; nothing downstream sees the raw wire format.

use serde::Serialize;

/// Balance below which the console warns the user to top up
pub const LOW_BALANCE_THRESHOLD: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Region {
    pub region_id: String,
    pub local_name: String,
    pub region_endpoint: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecurityGroup {
    pub security_group_id: String,
    pub security_group_name: String,
    pub description: String,
    pub vpc_id: String,
    pub creation_time: String,
    pub security_group_type: String,
}

/// One page of `DescribeSecurityGroups`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecurityGroupPage {
    pub request_id: Option<String>,
    pub total_count: u32,
    pub page_number: u32,
    pub page_size: u32,
    pub security_groups: Vec<SecurityGroup>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecurityRule {
    /// `all/all` when the provider reports `-1/-1`
    pub port_range: String,
    pub ip_protocol: String,
    pub source_cidr_ip: String,
}

/// A security group together with its ingress rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecurityGroupRules {
    pub security_group_id: String,
    pub description: String,
    pub rules: Vec<SecurityRule>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstanceTypeInfo {
    pub instance_type_id: String,
    pub cpu_core_count: Option<u32>,
    /// Rendered memory size, e.g. `"2 GiB"`
    pub memory_size: Option<String>,
    pub gpu_amount: u32,
    pub gpu_spec: String,
    pub local_storage_category: String,
    pub local_storage_amount: Option<u32>,
    /// Capacity of one local disk in GiB
    pub local_storage_capacity: Option<u64>,
    pub eni_quantity: u32,
    pub eni_private_ip_address_quantity: u32,
    pub instance_type_family: Option<String>,
}

/// One page of `DescribeInstanceTypes`
///
/// `next_token` is surfaced as-is; fetching the following page is up to the
/// caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstanceTypePage {
    pub request_id: Option<String>,
    pub next_token: Option<String>,
    pub instance_types: Vec<InstanceTypeInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchTemplate {
    pub launch_template_id: String,
    pub launch_template_name: String,
    pub default_version_number: Option<i64>,
    pub latest_version_number: Option<i64>,
    pub created_by: Option<String>,
    pub create_time: Option<String>,
    pub modified_time: Option<String>,
    pub resource_group_id: Option<String>,
    pub tags: Vec<Tag>,
}

/// One page of `DescribeLaunchTemplates`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchTemplatePage {
    pub request_id: Option<String>,
    pub total_count: u32,
    pub page_number: u32,
    pub page_size: u32,
    pub launch_templates: Vec<LaunchTemplate>,
}

impl LaunchTemplatePage {
    pub fn total_pages(&self) -> u32 {
        total_pages(self.total_count, self.page_size)
    }
}

/// Number of pages needed for `total_count` items, `page_size` per page
pub fn total_pages(total_count: u32, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    total_count.div_ceil(page_size)
}

/// Parameters for instantiating a stored launch template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateLaunch {
    pub region_id: String,
    pub launch_template_name: String,
    pub launch_template_version: u32,
    pub amount: u32,
    pub password: Option<String>,
}

/// Result of a `RunInstances` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedInstances {
    pub request_id: Option<String>,
    pub instance_ids: Vec<String>,
}

impl CreatedInstances {
    pub fn first_id(&self) -> Option<&str> {
        self.instance_ids.first().map(String::as_str)
    }
}

/// Instance id with its reachable public address
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstanceAddress {
    pub instance_id: String,
    /// Elastic IP when bound, else the first public address
    pub public_ip: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstanceStatus {
    pub instance_id: String,
    pub status: String,
}

/// One page of `DescribeInstanceStatus`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstanceStatusPage {
    pub request_id: Option<String>,
    pub total_count: u32,
    pub page_number: u32,
    pub page_size: u32,
    pub statuses: Vec<InstanceStatus>,
}

impl InstanceStatusPage {
    pub fn is_empty(&self) -> bool {
        self.total_count == 0 && self.statuses.is_empty()
    }

    /// Status of the first reported instance
    pub fn first_status(&self) -> Option<&str> {
        self.statuses.first().map(|s| s.status.as_str())
    }

    /// True when exactly one instance is reported and it is `Running`
    pub fn is_single_running(&self) -> bool {
        self.total_count == 1 && self.first_status() == Some("Running")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstanceSummary {
    pub instance_id: String,
    pub public_ip: Option<String>,
    pub os_name: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VSwitch {
    pub v_switch_id: String,
    pub zone_id: String,
    pub vpc_id: String,
    pub v_switch_name: Option<String>,
    pub cidr_block: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountBalance {
    /// Amount as reported by the billing service, e.g. `"50.00"`
    pub available_amount: String,
    pub available_cash_amount: Option<String>,
    pub credit_amount: Option<String>,
    pub mybank_credit_amount: Option<String>,
    pub currency: Option<String>,
    pub request_id: Option<String>,
}

impl AccountBalance {
    pub fn available(&self) -> Option<f64> {
        self.available_amount.trim().replace(',', "").parse().ok()
    }

    /// Whether the available amount is below [`LOW_BALANCE_THRESHOLD`]
    ///
    /// An amount that cannot be parsed is never considered low.
    pub fn is_low(&self) -> bool {
        self.available()
            .map(|amount| amount < LOW_BALANCE_THRESHOLD)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balance(amount: &str) -> AccountBalance {
        AccountBalance {
            available_amount: amount.to_string(),
            available_cash_amount: None,
            credit_amount: None,
            mybank_credit_amount: None,
            currency: Some("CNY".to_string()),
            request_id: None,
        }
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(25, 10), 3);
        assert_eq!(total_pages(20, 10), 2);
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(5, 0), 0);
    }

    #[test]
    fn test_low_balance() {
        assert!(balance("50.00").is_low());
        assert!(!balance("100.00").is_low());
        assert!(!balance("1,234.50").is_low());
        assert!(!balance("n/a").is_low());
    }

    #[test]
    fn test_status_page_helpers() {
        let page = InstanceStatusPage {
            request_id: None,
            total_count: 1,
            page_number: 1,
            page_size: 10,
            statuses: vec![InstanceStatus {
                instance_id: "i-1".to_string(),
                status: "Running".to_string(),
            }],
        };
        assert!(page.is_single_running());
        assert!(!page.is_empty());

        let empty = InstanceStatusPage {
            total_count: 0,
            statuses: vec![],
            ..page
        };
        assert!(empty.is_empty());
        assert!(!empty.is_single_running());
    }
}
