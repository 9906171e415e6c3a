//! Service groups and their connections

use ecsflow_cloud::{CloudError, Result, RpcRequest};

/// Region used when an empty region id is given
pub const DEFAULT_REGION: &str = "cn-hangzhou";

/// The remote service groups the client talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceGroup {
    /// ECS
    Compute,
    /// VPC
    Networking,
    /// BSS OpenAPI, region-agnostic
    Billing,
}

impl ServiceGroup {
    pub fn version(&self) -> &'static str {
        match self {
            ServiceGroup::Compute => "2014-05-26",
            ServiceGroup::Networking => "2016-04-28",
            ServiceGroup::Billing => "2017-12-14",
        }
    }

    pub fn is_regional(&self) -> bool {
        !matches!(self, ServiceGroup::Billing)
    }

    fn host(&self, region_id: &str) -> String {
        match self {
            ServiceGroup::Compute => format!("ecs.{}.aliyuncs.com", region_id),
            ServiceGroup::Networking => format!("vpc.{}.aliyuncs.com", region_id),
            ServiceGroup::Billing => "business.aliyuncs.com".to_string(),
        }
    }
}

/// A service group bound to a host and API version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConnection {
    group: ServiceGroup,
    host: String,
}

impl ServiceConnection {
    /// Bind `group` to `region_id`; the billing group ignores the region
    pub fn new(group: ServiceGroup, region_id: &str) -> Result<Self> {
        if group.is_regional() {
            validate_region(region_id)?;
        }
        Ok(Self {
            group,
            host: group.host(region_id),
        })
    }

    pub fn billing() -> Self {
        Self {
            group: ServiceGroup::Billing,
            host: ServiceGroup::Billing.host(""),
        }
    }

    pub fn group(&self) -> ServiceGroup {
        self.group
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Start a request for `action` on this connection
    pub fn request(&self, action: &str) -> RpcRequest {
        RpcRequest::new(self.host.clone(), self.group.version(), action)
    }
}

/// Region ids are lowercase ASCII alphanumerics and `-`
pub fn validate_region(region_id: &str) -> Result<()> {
    let valid = !region_id.is_empty()
        && !region_id.starts_with('-')
        && !region_id.ends_with('-')
        && region_id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');

    if valid {
        Ok(())
    } else {
        Err(CloudError::InvalidRegion(region_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hosts_and_versions() {
        let compute = ServiceConnection::new(ServiceGroup::Compute, "cn-beijing").unwrap();
        assert_eq!(compute.host(), "ecs.cn-beijing.aliyuncs.com");

        let request = compute.request("DescribeRegions");
        assert_eq!(request.version, "2014-05-26");
        assert_eq!(request.action, "DescribeRegions");

        let vpc = ServiceConnection::new(ServiceGroup::Networking, "cn-beijing").unwrap();
        assert_eq!(vpc.host(), "vpc.cn-beijing.aliyuncs.com");
        assert_eq!(vpc.request("DescribeVSwitches").version, "2016-04-28");

        let billing = ServiceConnection::billing();
        assert_eq!(billing.host(), "business.aliyuncs.com");
        assert_eq!(billing.request("QueryAccountBalance").version, "2017-12-14");
    }

    #[test]
    fn test_validate_region() {
        assert!(validate_region("cn-hangzhou").is_ok());
        assert!(validate_region("ap-southeast-1").is_ok());
        assert!(validate_region("").is_err());
        assert!(validate_region("CN-Hangzhou").is_err());
        assert!(validate_region("cn hangzhou").is_err());
        assert!(validate_region("evil.com/x").is_err());
        assert!(validate_region("-cn").is_err());
    }

    #[test]
    fn test_invalid_region_rejected_for_regional_groups_only() {
        assert!(matches!(
            ServiceConnection::new(ServiceGroup::Compute, "bad region"),
            Err(CloudError::InvalidRegion(_))
        ));
        assert!(ServiceConnection::new(ServiceGroup::Billing, "bad region").is_ok());
    }
}
