//! Raw response bodies and their normalization
//!
//! Aliyun wraps every list in a container object (`{"Regions": {"Region": [...]}}`)
//! and omits fields freely, so every field here is optional. The `into_*`
//! methods apply the documented defaults and return the normalized model.

use ecsflow_cloud::{
    AccountBalance, CloudError, CreatedInstances, InstanceAddress, InstanceStatus,
    InstanceStatusPage, InstanceSummary, InstanceTypeInfo, InstanceTypePage, LaunchTemplate,
    LaunchTemplatePage, PriceComponent, PriceQuote, Region, Result, SecurityGroup,
    SecurityGroupPage, SecurityRule, Tag, VSwitch,
};
use serde::Deserialize;

fn malformed(what: &str) -> CloudError {
    CloudError::MalformedResponse(format!("missing {}", what))
}

fn or_empty(value: Option<String>) -> String {
    value.unwrap_or_default()
}

// ---------------------------------------------------------------------------
// DescribeRegions
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RegionsBody {
    pub regions: Option<RegionList>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RegionList {
    #[serde(default)]
    pub region: Vec<RawRegion>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawRegion {
    pub region_id: Option<String>,
    pub local_name: Option<String>,
    pub region_endpoint: Option<String>,
}

impl RegionsBody {
    pub fn into_regions(self) -> Result<Vec<Region>> {
        let list = self.regions.ok_or_else(|| malformed("Regions"))?;
        if list.region.is_empty() {
            return Err(malformed("Regions.Region"));
        }
        Ok(list
            .region
            .into_iter()
            .map(|r| Region {
                region_id: or_empty(r.region_id),
                local_name: or_empty(r.local_name),
                region_endpoint: or_empty(r.region_endpoint),
            })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// DescribePrice
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PriceBody {
    pub price_info: Option<PriceInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PriceInfo {
    pub price: Option<RawPrice>,
    pub rules: Option<RuleList>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawPrice {
    pub trade_price: Option<f64>,
    pub currency: Option<String>,
    pub detail_infos: Option<DetailInfoList>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DetailInfoList {
    #[serde(default)]
    pub detail_info: Vec<RawDetailInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawDetailInfo {
    pub resource: Option<String>,
    pub trade_price: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RuleList {
    #[serde(default)]
    pub rule: Vec<RawRule>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawRule {
    pub description: Option<String>,
}

impl PriceBody {
    pub fn into_quote(self) -> PriceQuote {
        let (price, rules) = match self.price_info {
            Some(info) => (info.price, info.rules),
            None => (None, None),
        };

        let total = price.as_ref().and_then(|p| p.trade_price).unwrap_or(0.0);
        let currency = price.as_ref().and_then(|p| p.currency.clone());
        let components = price
            .and_then(|p| p.detail_infos)
            .map(|d| d.detail_info)
            .unwrap_or_default()
            .into_iter()
            .map(|d| PriceComponent {
                resource: d.resource.unwrap_or_else(|| "unknown".to_string()),
                trade_price: d.trade_price.unwrap_or(0.0),
            })
            .collect();
        let discounts = rules
            .map(|r| r.rule)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|r| r.description)
            .collect();

        PriceQuote {
            total,
            currency,
            components,
            discounts,
        }
    }
}

// ---------------------------------------------------------------------------
// DescribeSecurityGroups / DescribeSecurityGroupAttribute
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SecurityGroupsBody {
    pub request_id: Option<String>,
    pub total_count: Option<u32>,
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
    pub security_groups: Option<SecurityGroupList>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SecurityGroupList {
    #[serde(default)]
    pub security_group: Vec<RawSecurityGroup>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawSecurityGroup {
    pub security_group_id: Option<String>,
    pub security_group_name: Option<String>,
    pub description: Option<String>,
    pub vpc_id: Option<String>,
    pub creation_time: Option<String>,
    pub security_group_type: Option<String>,
}

impl SecurityGroupsBody {
    pub fn into_page(self) -> Result<SecurityGroupPage> {
        let list = self
            .security_groups
            .ok_or_else(|| malformed("SecurityGroups"))?;

        let security_groups: Vec<SecurityGroup> = list
            .security_group
            .into_iter()
            .map(|g| SecurityGroup {
                security_group_id: or_empty(g.security_group_id),
                security_group_name: or_empty(g.security_group_name),
                description: or_empty(g.description),
                vpc_id: or_empty(g.vpc_id),
                creation_time: or_empty(g.creation_time),
                security_group_type: or_empty(g.security_group_type),
            })
            .collect();

        Ok(SecurityGroupPage {
            request_id: self.request_id,
            total_count: self.total_count.unwrap_or(security_groups.len() as u32),
            page_number: self.page_number.unwrap_or(1),
            page_size: self.page_size.unwrap_or(security_groups.len() as u32),
            security_groups,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SecurityGroupAttributeBody {
    pub permissions: Option<PermissionList>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PermissionList {
    #[serde(default)]
    pub permission: Vec<RawPermission>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawPermission {
    pub port_range: Option<String>,
    pub ip_protocol: Option<String>,
    pub source_cidr_ip: Option<String>,
}

impl SecurityGroupAttributeBody {
    pub fn into_rules(self) -> Result<Vec<SecurityRule>> {
        let list = self.permissions.ok_or_else(|| malformed("Permissions"))?;
        Ok(list
            .permission
            .into_iter()
            .map(|p| {
                let port_range = match p.port_range.as_deref() {
                    Some("-1/-1") => "all/all".to_string(),
                    _ => or_empty(p.port_range),
                };
                SecurityRule {
                    port_range,
                    ip_protocol: or_empty(p.ip_protocol),
                    source_cidr_ip: or_empty(p.source_cidr_ip),
                }
            })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// DescribeInstanceTypes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstanceTypesBody {
    pub request_id: Option<String>,
    pub next_token: Option<String>,
    pub instance_types: Option<InstanceTypeList>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstanceTypeList {
    #[serde(default)]
    pub instance_type: Vec<RawInstanceType>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawInstanceType {
    pub instance_type_id: Option<String>,
    pub cpu_core_count: Option<u32>,
    pub memory_size: Option<f64>,
    #[serde(rename = "GPUAmount")]
    pub gpu_amount: Option<u32>,
    #[serde(rename = "GPUSpec")]
    pub gpu_spec: Option<String>,
    pub local_storage_category: Option<String>,
    pub local_storage_amount: Option<u32>,
    pub local_storage_capacity: Option<u64>,
    pub eni_quantity: Option<u32>,
    pub eni_private_ip_address_quantity: Option<u32>,
    pub instance_type_family: Option<String>,
}

impl InstanceTypesBody {
    pub fn into_page(self) -> InstanceTypePage {
        let instance_types = self
            .instance_types
            .map(|l| l.instance_type)
            .unwrap_or_default()
            .into_iter()
            .map(|t| InstanceTypeInfo {
                instance_type_id: or_empty(t.instance_type_id),
                cpu_core_count: t.cpu_core_count,
                memory_size: t.memory_size.map(format_gib),
                gpu_amount: t.gpu_amount.unwrap_or(0),
                gpu_spec: t
                    .gpu_spec
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| "N/A".to_string()),
                local_storage_category: t
                    .local_storage_category
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| "cloud".to_string()),
                local_storage_amount: t.local_storage_amount,
                local_storage_capacity: t.local_storage_capacity,
                eni_quantity: t.eni_quantity.unwrap_or(0),
                eni_private_ip_address_quantity: t.eni_private_ip_address_quantity.unwrap_or(0),
                instance_type_family: t.instance_type_family,
            })
            .collect();

        InstanceTypePage {
            request_id: self.request_id,
            next_token: self.next_token.filter(|t| !t.is_empty()),
            instance_types,
        }
    }
}

/// `2.0` renders as `2 GiB`, `0.5` as `0.5 GiB`
pub fn format_gib(size: f64) -> String {
    let formatted = format!("{:.3}", size);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    format!("{} GiB", trimmed)
}

// ---------------------------------------------------------------------------
// DescribeLaunchTemplates
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LaunchTemplatesBody {
    pub request_id: Option<String>,
    pub total_count: Option<u32>,
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
    pub launch_template_sets: Option<LaunchTemplateList>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LaunchTemplateList {
    #[serde(default)]
    pub launch_template_set: Vec<RawLaunchTemplate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawLaunchTemplate {
    pub launch_template_id: Option<String>,
    pub launch_template_name: Option<String>,
    pub default_version_number: Option<i64>,
    pub latest_version_number: Option<i64>,
    pub created_by: Option<String>,
    pub create_time: Option<String>,
    pub modified_time: Option<String>,
    pub resource_group_id: Option<String>,
    pub tags: Option<TagList>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TagList {
    #[serde(default)]
    pub tag: Vec<RawTag>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawTag {
    pub tag_key: Option<String>,
    pub tag_value: Option<String>,
}

impl LaunchTemplatesBody {
    pub fn into_page(self) -> LaunchTemplatePage {
        let launch_templates: Vec<LaunchTemplate> = self
            .launch_template_sets
            .map(|l| l.launch_template_set)
            .unwrap_or_default()
            .into_iter()
            .map(|t| LaunchTemplate {
                launch_template_id: or_empty(t.launch_template_id),
                launch_template_name: or_empty(t.launch_template_name),
                default_version_number: t.default_version_number,
                latest_version_number: t.latest_version_number,
                created_by: t.created_by,
                create_time: t.create_time,
                modified_time: t.modified_time,
                resource_group_id: t.resource_group_id,
                tags: t
                    .tags
                    .map(|l| l.tag)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|tag| Tag {
                        key: or_empty(tag.tag_key),
                        value: or_empty(tag.tag_value),
                    })
                    .collect(),
            })
            .collect();

        LaunchTemplatePage {
            request_id: self.request_id,
            total_count: self.total_count.unwrap_or(launch_templates.len() as u32),
            page_number: self.page_number.unwrap_or(1),
            page_size: self.page_size.unwrap_or(10),
            launch_templates,
        }
    }
}

// ---------------------------------------------------------------------------
// RunInstances / DeleteInstance
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RunInstancesBody {
    pub request_id: Option<String>,
    pub instance_id_sets: Option<InstanceIdSets>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstanceIdSets {
    #[serde(default)]
    pub instance_id_set: Vec<String>,
}

impl RunInstancesBody {
    pub fn into_created(self) -> Result<CreatedInstances> {
        let ids = self
            .instance_id_sets
            .ok_or_else(|| malformed("InstanceIdSets"))?;
        Ok(CreatedInstances {
            request_id: self.request_id,
            instance_ids: ids.instance_id_set,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RequestIdBody {
    pub request_id: Option<String>,
}

impl RequestIdBody {
    pub fn into_request_id(self) -> Result<String> {
        self.request_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| malformed("RequestId"))
    }
}

// ---------------------------------------------------------------------------
// DescribeInstanceAttribute / DescribeInstances
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EipAddress {
    pub ip_address: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IpAddressList {
    #[serde(default)]
    pub ip_address: Vec<String>,
}

/// Elastic IP when bound, else the first public address
fn public_ip(eip: Option<EipAddress>, public: Option<IpAddressList>) -> Option<String> {
    eip.and_then(|e| e.ip_address)
        .filter(|ip| !ip.is_empty())
        .or_else(|| public.and_then(|p| p.ip_address.into_iter().find(|ip| !ip.is_empty())))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstanceAttributeBody {
    pub instance_id: Option<String>,
    pub status: Option<String>,
    pub eip_address: Option<EipAddress>,
    pub public_ip_address: Option<IpAddressList>,
}

impl InstanceAttributeBody {
    pub fn into_address(self) -> Result<InstanceAddress> {
        let instance_id = self
            .instance_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| malformed("InstanceId"))?;
        Ok(InstanceAddress {
            instance_id,
            public_ip: public_ip(self.eip_address, self.public_ip_address),
            status: self.status,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstancesBody {
    pub instances: Option<InstanceList>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstanceList {
    #[serde(default)]
    pub instance: Vec<RawInstance>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawInstance {
    pub instance_id: Option<String>,
    #[serde(rename = "OSName")]
    pub os_name: Option<String>,
    pub status: Option<String>,
    pub eip_address: Option<EipAddress>,
    pub public_ip_address: Option<IpAddressList>,
}

impl InstancesBody {
    pub fn into_summaries(self) -> Vec<InstanceSummary> {
        self.instances
            .map(|l| l.instance)
            .unwrap_or_default()
            .into_iter()
            .map(|i| InstanceSummary {
                instance_id: or_empty(i.instance_id),
                public_ip: public_ip(i.eip_address, i.public_ip_address),
                os_name: i
                    .os_name
                    .filter(|n| !n.is_empty())
                    .unwrap_or_else(|| "Unknown".to_string()),
                status: or_empty(i.status),
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// DescribeInstanceStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstanceStatusBody {
    pub request_id: Option<String>,
    pub total_count: Option<u32>,
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
    pub instance_statuses: Option<InstanceStatusList>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstanceStatusList {
    #[serde(default)]
    pub instance_status: Vec<RawInstanceStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawInstanceStatus {
    pub instance_id: Option<String>,
    pub status: Option<String>,
}

impl InstanceStatusBody {
    pub fn into_page(self) -> InstanceStatusPage {
        let statuses: Vec<InstanceStatus> = self
            .instance_statuses
            .map(|l| l.instance_status)
            .unwrap_or_default()
            .into_iter()
            .map(|s| InstanceStatus {
                instance_id: or_empty(s.instance_id),
                status: or_empty(s.status),
            })
            .collect();

        InstanceStatusPage {
            request_id: self.request_id,
            total_count: self.total_count.unwrap_or(statuses.len() as u32),
            page_number: self.page_number.unwrap_or(1),
            page_size: self.page_size.unwrap_or(10),
            statuses,
        }
    }
}

// ---------------------------------------------------------------------------
// DescribeVSwitches
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VSwitchesBody {
    pub v_switches: Option<VSwitchList>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VSwitchList {
    #[serde(rename = "VSwitch", default)]
    pub v_switch: Vec<RawVSwitch>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawVSwitch {
    pub v_switch_id: Option<String>,
    pub zone_id: Option<String>,
    pub vpc_id: Option<String>,
    pub v_switch_name: Option<String>,
    pub cidr_block: Option<String>,
}

impl VSwitchesBody {
    pub fn into_vswitches(self) -> Result<Vec<VSwitch>> {
        let list = self.v_switches.ok_or_else(|| malformed("VSwitches"))?;
        Ok(list
            .v_switch
            .into_iter()
            .map(|v| VSwitch {
                v_switch_id: or_empty(v.v_switch_id),
                zone_id: or_empty(v.zone_id),
                vpc_id: or_empty(v.vpc_id),
                v_switch_name: v.v_switch_name.filter(|n| !n.is_empty()),
                cidr_block: v.cidr_block,
            })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// QueryAccountBalance
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BalanceBody {
    pub request_id: Option<String>,
    pub data: Option<RawBalance>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawBalance {
    pub available_amount: Option<String>,
    pub available_cash_amount: Option<String>,
    pub credit_amount: Option<String>,
    pub mybank_credit_amount: Option<String>,
    pub currency: Option<String>,
}

impl BalanceBody {
    pub fn into_balance(self) -> Result<AccountBalance> {
        let data = self.data.ok_or_else(|| malformed("Data"))?;
        let available_amount = data
            .available_amount
            .filter(|a| !a.is_empty())
            .ok_or_else(|| malformed("Data.AvailableAmount"))?;

        Ok(AccountBalance {
            available_amount,
            available_cash_amount: data.available_cash_amount,
            credit_amount: data.credit_amount,
            mybank_credit_amount: data.mybank_credit_amount,
            currency: data.currency,
            request_id: self.request_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> T {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_instance_type_defaults() {
        let body: InstanceTypesBody = parse(json!({
            "RequestId": "r-1",
            "NextToken": "",
            "InstanceTypes": {"InstanceType": [
                {"InstanceTypeId": "ecs.t6-c1m1.large", "CpuCoreCount": 2, "MemorySize": 2.0},
                {
                    "InstanceTypeId": "ecs.gn6i-c4g1.xlarge",
                    "MemorySize": 15.5,
                    "GPUAmount": 1,
                    "GPUSpec": "NVIDIA T4",
                    "LocalStorageCategory": "local_ssd_pro",
                    "LocalStorageAmount": 2,
                    "LocalStorageCapacity": 1788,
                    "EniQuantity": 2,
                    "EniPrivateIpAddressQuantity": 10
                }
            ]}
        }));

        let page = body.into_page();
        assert_eq!(page.next_token, None);

        let plain = &page.instance_types[0];
        assert_eq!(plain.memory_size.as_deref(), Some("2 GiB"));
        assert_eq!(plain.gpu_amount, 0);
        assert_eq!(plain.gpu_spec, "N/A");
        assert_eq!(plain.local_storage_category, "cloud");
        assert_eq!(plain.local_storage_amount, None);
        assert_eq!(plain.eni_quantity, 0);

        let gpu = &page.instance_types[1];
        assert_eq!(gpu.memory_size.as_deref(), Some("15.5 GiB"));
        assert_eq!(gpu.gpu_spec, "NVIDIA T4");
        assert_eq!(gpu.local_storage_capacity, Some(1788));
        assert_eq!(gpu.cpu_core_count, None);
    }

    #[test]
    fn test_price_defaults() {
        let body: PriceBody = parse(json!({
            "PriceInfo": {
                "Price": {
                    "Currency": "CNY",
                    "DetailInfos": {"DetailInfo": [
                        {"Resource": "instanceType", "TradePrice": 0.1},
                        {"TradePrice": 0.02},
                        {"Resource": "bandwidth"}
                    ]}
                },
                "Rules": {"Rule": [{"Description": "抢占式实例折扣", "RuleId": 1}, {"RuleId": 2}]}
            }
        }));

        let quote = body.into_quote();
        assert_eq!(quote.total, 0.0);
        assert_eq!(quote.components[1].resource, "unknown");
        assert_eq!(quote.components[2].trade_price, 0.0);
        assert_eq!(quote.discounts, vec!["抢占式实例折扣".to_string()]);
    }

    #[test]
    fn test_empty_price_body() {
        let quote = parse::<PriceBody>(json!({"RequestId": "r"})).into_quote();
        assert_eq!(quote.total, 0.0);
        assert!(quote.components.is_empty());
        assert!(quote.discounts.is_empty());
    }

    #[test]
    fn test_public_ip_prefers_eip() {
        let body: InstancesBody = parse(json!({
            "Instances": {"Instance": [
                {
                    "InstanceId": "i-1",
                    "OSName": "Ubuntu 22.04 64位",
                    "Status": "Running",
                    "EipAddress": {"IpAddress": "47.1.1.1"},
                    "PublicIpAddress": {"IpAddress": ["118.2.2.2"]}
                },
                {
                    "InstanceId": "i-2",
                    "Status": "Stopped",
                    "EipAddress": {"IpAddress": ""},
                    "PublicIpAddress": {"IpAddress": ["118.3.3.3"]}
                },
                {"InstanceId": "i-3", "Status": "Pending"}
            ]}
        }));

        let instances = body.into_summaries();
        assert_eq!(instances[0].public_ip.as_deref(), Some("47.1.1.1"));
        assert_eq!(instances[1].public_ip.as_deref(), Some("118.3.3.3"));
        assert_eq!(instances[1].os_name, "Unknown");
        assert_eq!(instances[2].public_ip, None);
    }

    #[test]
    fn test_port_range_all() {
        let body: SecurityGroupAttributeBody = parse(json!({
            "Permissions": {"Permission": [
                {"PortRange": "-1/-1", "IpProtocol": "ICMP", "SourceCidrIp": "0.0.0.0/0"},
                {"PortRange": "22/22", "IpProtocol": "TCP", "SourceCidrIp": "10.0.0.0/8"}
            ]}
        }));

        let rules = body.into_rules().unwrap();
        assert_eq!(rules[0].port_range, "all/all");
        assert_eq!(rules[1].port_range, "22/22");
    }

    #[test]
    fn test_balance_requires_amount() {
        let err = parse::<BalanceBody>(json!({"Data": {"Currency": "CNY"}}))
            .into_balance()
            .unwrap_err();
        assert!(matches!(err, CloudError::MalformedResponse(_)));
    }

    #[test]
    fn test_format_gib() {
        assert_eq!(format_gib(1.0), "1 GiB");
        assert_eq!(format_gib(0.5), "0.5 GiB");
        assert_eq!(format_gib(192.0), "192 GiB");
    }
}
