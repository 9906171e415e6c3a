//! Aliyun provider client
//!
//! One method per provider action. Every method recovers from failures on
//! its own: the fault is logged, reported on stderr, and the caller gets
//! `None` (or an empty list). Nothing here returns an error to the console.

use crate::endpoint::{DEFAULT_REGION, ServiceConnection, ServiceGroup};
use crate::http::AliyunHttpTransport;
use crate::wire;
use colored::Colorize;
use ecsflow_cloud::{
    AccountBalance, CloudError, CreatedInstances, FaultClass, InstanceAddress, InstanceSpec,
    InstanceStatusPage, InstanceSummary, InstanceTypePage, LaunchTemplatePage, PriceQuery,
    PriceQuote, Region, Result, RpcRequest, RpcTransport, SecurityGroupPage,
    SecurityGroupRules, SecurityRule, TemplateLaunch, VSwitch,
};
use serde::de::DeserializeOwned;

const SECURITY_GROUP_PAGE_SIZE: u32 = 50;
const INSTANCE_PAGE_SIZE: u32 = 100;
const SPOT_AS_PRICE_GO: &str = "SpotAsPriceGo";

/// Friendlier explanation for instance fault codes
pub fn fault_hint(code: &str) -> Option<&'static str> {
    match code {
        "InvalidInstanceId.NotFound" => Some("实例ID不存在，请检查ID是否正确"),
        "IncorrectInstanceStatus" => Some("实例状态不正确，无法执行该操作"),
        "OperationDenied" => Some("操作被拒绝，可能是因为实例有关联资源或受保护"),
        _ => None,
    }
}

/// Session client for ECS, VPC and BSS
///
/// The compute and networking connections follow the active region; the
/// billing connection never changes.
pub struct AliyunClient<T = AliyunHttpTransport> {
    transport: T,
    region_id: String,
    compute: ServiceConnection,
    networking: ServiceConnection,
    billing: ServiceConnection,
}

impl AliyunClient<AliyunHttpTransport> {
    /// Build a client that talks to Aliyun over HTTPS
    pub fn connect(access_key_id: &str, access_key_secret: &str, region_id: &str) -> Result<Self> {
        let transport = AliyunHttpTransport::new(access_key_id, access_key_secret)?;
        Self::with_transport(transport, region_id)
    }
}

impl<T: RpcTransport> AliyunClient<T> {
    pub fn with_transport(transport: T, region_id: &str) -> Result<Self> {
        let region_id = match region_id.trim() {
            "" => DEFAULT_REGION,
            region => region,
        };
        let (compute, networking) = regional_connections(region_id)?;

        Ok(Self {
            transport,
            region_id: region_id.to_string(),
            compute,
            networking,
            billing: ServiceConnection::billing(),
        })
    }

    /// The active region
    pub fn region_id(&self) -> &str {
        &self.region_id
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Switch the active region
    ///
    /// Both regional connections are rebuilt before anything is replaced; on
    /// failure the previous region stays active and `false` is returned.
    pub fn set_region(&mut self, region_id: &str) -> bool {
        let region_id = match region_id.trim() {
            "" => {
                tracing::warn!("Empty region id, falling back to {}", DEFAULT_REGION);
                eprintln!(
                    "{}",
                    format!("区域ID不能为空，使用默认区域: {}", DEFAULT_REGION)
                        .yellow()
                        .bold()
                );
                DEFAULT_REGION
            }
            region => region,
        };

        match regional_connections(region_id) {
            Ok((compute, networking)) => {
                self.compute = compute;
                self.networking = networking;
                self.region_id = region_id.to_string();
                tracing::info!(region = %self.region_id, "Region switched");
                true
            }
            Err(e) => {
                report_failure("set_region", "设置区域", &e);
                false
            }
        }
    }

    fn region_or_active<'a>(&'a self, region_id: &'a str) -> &'a str {
        match region_id.trim() {
            "" => &self.region_id,
            region => region,
        }
    }

    async fn fetch<W: DeserializeOwned>(&self, request: RpcRequest) -> Result<W> {
        let value = self.transport.invoke(&request).await?;
        serde_json::from_value(value)
            .map_err(|e| CloudError::MalformedResponse(format!("{}: {}", request.action, e)))
    }

    /// List the regions available for instances
    pub async fn describe_regions(&self) -> Option<Vec<Region>> {
        let request = self
            .compute
            .request("DescribeRegions")
            .param("ResourceType", "instance")
            .param("AcceptLanguage", "zh-CN");

        let result = self
            .fetch::<wire::RegionsBody>(request)
            .await
            .and_then(wire::RegionsBody::into_regions);
        settle("describe_regions", "查询地域列表", result)
    }

    /// Quote the price of an instance configuration
    pub async fn describe_price(&self, query: &PriceQuery) -> Option<PriceQuote> {
        let region_id = self.region_or_active(query.region_id.as_deref().unwrap_or_default());
        let spot_duration =
            (query.spot_strategy == SPOT_AS_PRICE_GO).then_some(query.spot_duration);

        let request = self
            .compute
            .request("DescribePrice")
            .param("RegionId", region_id)
            .param_opt("ImageId", query.image_id.as_deref())
            .param_opt("InstanceType", query.instance_type.as_deref())
            .param("SystemDisk.Category", &query.system_disk_category)
            .param("SystemDisk.Size", query.system_disk_size)
            .param("InternetMaxBandwidthOut", query.internet_max_bandwidth_out)
            .param("InternetChargeType", &query.internet_charge_type)
            .param("SpotStrategy", &query.spot_strategy)
            .param_opt("SpotDuration", spot_duration)
            .param("ResourceType", &query.resource_type)
            .param("Amount", query.amount);

        let result = self
            .fetch::<wire::PriceBody>(request)
            .await
            .map(wire::PriceBody::into_quote);
        settle("describe_price", "查询价格", result)
    }

    /// First page of security groups, up to 50 entries
    pub async fn describe_security_groups(&self, region_id: &str) -> Option<SecurityGroupPage> {
        let request = self
            .compute
            .request("DescribeSecurityGroups")
            .param("RegionId", self.region_or_active(region_id))
            .param("PageSize", SECURITY_GROUP_PAGE_SIZE);

        let result = self
            .fetch::<wire::SecurityGroupsBody>(request)
            .await
            .and_then(wire::SecurityGroupsBody::into_page);
        settle("describe_security_groups", "查询安全组列表", result)
    }

    /// Ingress rules of one security group
    pub async fn describe_security_group_attribute(
        &self,
        region_id: &str,
        security_group_id: &str,
    ) -> Option<Vec<SecurityRule>> {
        let label = format!("安全组属性查询[{}]", security_group_id);
        if security_group_id.trim().is_empty() {
            let err = CloudError::InvalidInput("安全组ID不能为空".to_string());
            return settle("describe_security_group_attribute", &label, Err(err));
        }

        let request = self
            .compute
            .request("DescribeSecurityGroupAttribute")
            .param("RegionId", self.region_or_active(region_id))
            .param("SecurityGroupId", security_group_id.trim());

        let result = self
            .fetch::<wire::SecurityGroupAttributeBody>(request)
            .await
            .and_then(wire::SecurityGroupAttributeBody::into_rules);
        settle("describe_security_group_attribute", &label, result)
    }

    /// Every listed security group with its rules
    ///
    /// One list call, then one detail call per returned group, in order.
    /// A single failed detail call fails the whole listing.
    pub async fn describe_all_security_group_rules(
        &self,
        region_id: &str,
    ) -> Option<Vec<SecurityGroupRules>> {
        let page = self.describe_security_groups(region_id).await?;

        let mut groups = Vec::with_capacity(page.security_groups.len());
        for group in page.security_groups {
            let Some(rules) = self
                .describe_security_group_attribute(region_id, &group.security_group_id)
                .await
            else {
                tracing::warn!(
                    security_group_id = %group.security_group_id,
                    "Security group listing aborted"
                );
                return None;
            };

            groups.push(SecurityGroupRules {
                security_group_id: group.security_group_id,
                description: group.description,
                rules,
            });
        }

        Some(groups)
    }

    /// One page of instance types; `next_token` continues a previous page
    pub async fn describe_instance_types(
        &self,
        next_token: Option<&str>,
        max_results: Option<u32>,
    ) -> Option<InstanceTypePage> {
        let request = self
            .compute
            .request("DescribeInstanceTypes")
            .param_opt("NextToken", next_token.filter(|t| !t.is_empty()))
            .param_opt("MaxResults", max_results);

        let result = self
            .fetch::<wire::InstanceTypesBody>(request)
            .await
            .map(wire::InstanceTypesBody::into_page);
        settle("describe_instance_types", "查询实例规格", result)
    }

    pub async fn describe_launch_templates(
        &self,
        region_id: &str,
        page_number: u32,
    ) -> Option<LaunchTemplatePage> {
        let request = self
            .compute
            .request("DescribeLaunchTemplates")
            .param("RegionId", self.region_or_active(region_id))
            .param("PageNumber", page_number.max(1));

        let result = self
            .fetch::<wire::LaunchTemplatesBody>(request)
            .await
            .map(wire::LaunchTemplatesBody::into_page);
        settle("describe_launch_templates", "查询启动模板", result)
    }

    /// Instantiate a stored launch template
    pub async fn create_instances_from_template(
        &self,
        launch: &TemplateLaunch,
    ) -> Option<CreatedInstances> {
        let request = self
            .compute
            .request("RunInstances")
            .param("RegionId", self.region_or_active(&launch.region_id))
            .param("LaunchTemplateName", &launch.launch_template_name)
            .param("LaunchTemplateVersion", launch.launch_template_version)
            .param("Amount", launch.amount)
            .param_opt(
                "Password",
                launch.password.as_deref().filter(|p| !p.is_empty()),
            );

        let result = self
            .fetch::<wire::RunInstancesBody>(request)
            .await
            .and_then(wire::RunInstancesBody::into_created);
        settle("create_instances_from_template", "创建实例", result)
    }

    /// Create instances from a full spec
    pub async fn run_instances(&self, spec: &InstanceSpec) -> Option<CreatedInstances> {
        let request = self
            .compute
            .request("RunInstances")
            .param("RegionId", spec.region_id())
            .param("ImageId", spec.image_id())
            .param("InstanceType", spec.instance_type())
            .param("SecurityGroupId", spec.security_group_id())
            .param("VSwitchId", spec.v_switch_id())
            .param_opt("Password", spec.password())
            .param_opt("InstanceName", spec.instance_name())
            .param("HostName", spec.host_name())
            .param("InternetMaxBandwidthOut", spec.internet_max_bandwidth_out())
            .param("InternetChargeType", spec.internet_charge_type())
            .param("SystemDisk.Category", spec.system_disk_category())
            .param("SystemDisk.Size", spec.system_disk_size())
            .param("SpotStrategy", spec.spot_strategy())
            .param_opt("SpotDuration", spec.spot_duration())
            .param("InstanceChargeType", spec.instance_charge_type())
            .param("Amount", spec.amount());

        let result = self
            .fetch::<wire::RunInstancesBody>(request)
            .await
            .and_then(wire::RunInstancesBody::into_created);
        settle("run_instances", "创建实例", result)
    }

    /// Force-delete an instance, returning the request id
    pub async fn delete_instance(&self, instance_id: &str) -> Option<String> {
        let result = match non_empty_id(instance_id) {
            Ok(id) => {
                let request = self
                    .compute
                    .request("DeleteInstance")
                    .param("InstanceId", id)
                    .param("Force", true);
                self.fetch::<wire::RequestIdBody>(request)
                    .await
                    .and_then(wire::RequestIdBody::into_request_id)
            }
            Err(e) => Err(e),
        };
        settle_with_hint("delete_instance", "删除实例", result)
    }

    /// Public address of an instance
    pub async fn describe_instance_attribute(&self, instance_id: &str) -> Option<InstanceAddress> {
        let result = match non_empty_id(instance_id) {
            Ok(id) => {
                let request = self
                    .compute
                    .request("DescribeInstanceAttribute")
                    .param("InstanceId", id);
                self.fetch::<wire::InstanceAttributeBody>(request)
                    .await
                    .and_then(wire::InstanceAttributeBody::into_address)
            }
            Err(e) => Err(e),
        };
        settle_with_hint("describe_instance_attribute", "查询实例公网IP", result)
    }

    /// Status of one instance; an unknown id yields an empty page
    pub async fn describe_instance_status(
        &self,
        region_id: &str,
        instance_id: &str,
    ) -> Option<InstanceStatusPage> {
        let result = match non_empty_id(instance_id) {
            Ok(id) => {
                let request = self
                    .compute
                    .request("DescribeInstanceStatus")
                    .param("RegionId", self.region_or_active(region_id))
                    .param("InstanceId.1", id);
                self.fetch::<wire::InstanceStatusBody>(request)
                    .await
                    .map(wire::InstanceStatusBody::into_page)
            }
            Err(e) => Err(e),
        };
        settle_with_hint("describe_instance_status", "查询实例", result)
    }

    /// Instances in a region, up to 100
    pub async fn describe_instances(&self, region_id: &str) -> Vec<InstanceSummary> {
        let request = self
            .compute
            .request("DescribeInstances")
            .param("RegionId", self.region_or_active(region_id))
            .param("PageSize", INSTANCE_PAGE_SIZE);

        let result = self
            .fetch::<wire::InstancesBody>(request)
            .await
            .map(wire::InstancesBody::into_summaries);
        settle("describe_instances", "查询实例", result).unwrap_or_default()
    }

    /// Subnets of a region, via the networking service
    pub async fn describe_vswitches(&self, region_id: &str) -> Option<Vec<VSwitch>> {
        let request = self
            .networking
            .request("DescribeVSwitches")
            .param("RegionId", self.region_or_active(region_id));

        let result = self
            .fetch::<wire::VSwitchesBody>(request)
            .await
            .and_then(wire::VSwitchesBody::into_vswitches);
        settle("describe_vswitches", "查询交换机", result)
    }

    pub async fn account_balance(&self) -> Option<AccountBalance> {
        let request = self.billing.request("QueryAccountBalance");

        let result = self
            .fetch::<wire::BalanceBody>(request)
            .await
            .and_then(wire::BalanceBody::into_balance);
        settle("account_balance", "查询账户余额", result)
    }
}

fn regional_connections(region_id: &str) -> Result<(ServiceConnection, ServiceConnection)> {
    Ok((
        ServiceConnection::new(ServiceGroup::Compute, region_id)?,
        ServiceConnection::new(ServiceGroup::Networking, region_id)?,
    ))
}

fn non_empty_id(instance_id: &str) -> Result<&str> {
    match instance_id.trim() {
        "" => Err(CloudError::InvalidInput("实例ID不能为空".to_string())),
        id => Ok(id),
    }
}

fn settle<R>(operation: &str, label: &str, result: Result<R>) -> Option<R> {
    result
        .map_err(|e| report_failure(operation, label, &e))
        .ok()
}

fn settle_with_hint<R>(operation: &str, label: &str, result: Result<R>) -> Option<R> {
    result
        .map_err(|e| {
            report_failure(operation, label, &e);
            if let Some(hint) = e.code().and_then(fault_hint) {
                eprintln!("{}", hint.yellow().bold());
            }
        })
        .ok()
}

fn report_failure(operation: &str, label: &str, err: &CloudError) {
    tracing::warn!(
        operation,
        code = err.code().unwrap_or("-"),
        "Provider call failed: {}",
        err
    );

    let line = match (err.class(), err) {
        (FaultClass::Remote | FaultClass::Transport, _) => err.to_string(),
        (_, CloudError::InvalidInput(_)) => err.to_string(),
        (_, CloudError::MalformedResponse(_)) => format!("{}返回数据格式异常", label),
        _ => format!("{}失败: {}", label, err),
    };
    eprintln!("{}", line.red().bold());
}
