//! Instance provisioning parameters

use crate::error::{CloudError, Result};
use crate::price::{
    DEFAULT_BANDWIDTH_OUT, DEFAULT_INTERNET_CHARGE_TYPE, DEFAULT_SPOT_STRATEGY,
    DEFAULT_SYSTEM_DISK_CATEGORY, DEFAULT_SYSTEM_DISK_SIZE,
};

pub const DEFAULT_INSTANCE_CHARGE_TYPE: &str = "PostPaid";
pub const DEFAULT_HOST_NAME: &str = "vps";

/// Everything needed to provision one or more instances
///
/// Built through [`InstanceSpec::builder`]; immutable afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct InstanceSpec {
    region_id: String,
    image_id: String,
    instance_type: String,
    security_group_id: String,
    v_switch_id: String,
    password: Option<String>,
    instance_name: Option<String>,
    host_name: String,
    internet_max_bandwidth_out: u32,
    internet_charge_type: String,
    system_disk_category: String,
    system_disk_size: u32,
    spot_strategy: String,
    spot_duration: u32,
    instance_charge_type: String,
    amount: u32,
}

impl InstanceSpec {
    pub fn builder() -> InstanceSpecBuilder {
        InstanceSpecBuilder::default()
    }

    pub fn region_id(&self) -> &str {
        &self.region_id
    }

    pub fn image_id(&self) -> &str {
        &self.image_id
    }

    pub fn instance_type(&self) -> &str {
        &self.instance_type
    }

    pub fn security_group_id(&self) -> &str {
        &self.security_group_id
    }

    pub fn v_switch_id(&self) -> &str {
        &self.v_switch_id
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    pub fn instance_name(&self) -> Option<&str> {
        self.instance_name.as_deref()
    }

    pub fn host_name(&self) -> &str {
        &self.host_name
    }

    pub fn internet_max_bandwidth_out(&self) -> u32 {
        self.internet_max_bandwidth_out
    }

    pub fn internet_charge_type(&self) -> &str {
        &self.internet_charge_type
    }

    pub fn system_disk_category(&self) -> &str {
        &self.system_disk_category
    }

    pub fn system_disk_size(&self) -> u32 {
        self.system_disk_size
    }

    pub fn spot_strategy(&self) -> &str {
        &self.spot_strategy
    }

    /// Spot duration in hours, only meaningful for `SpotAsPriceGo`
    pub fn spot_duration(&self) -> Option<u32> {
        (self.spot_strategy == DEFAULT_SPOT_STRATEGY).then_some(self.spot_duration)
    }

    pub fn instance_charge_type(&self) -> &str {
        &self.instance_charge_type
    }

    pub fn amount(&self) -> u32 {
        self.amount
    }
}

// The password never shows up in logs or confirmation screens.
impl std::fmt::Debug for InstanceSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}

impl std::fmt::Display for InstanceSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let spot_duration = self
            .spot_duration()
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        let rows: [(&str, String); 16] = [
            ("RegionId", self.region_id.clone()),
            ("ImageId", self.image_id.clone()),
            ("InstanceType", self.instance_type.clone()),
            ("InstanceName", self.instance_name.clone().unwrap_or_else(|| "-".to_string())),
            ("HostName", self.host_name.clone()),
            ("Password", if self.password.is_some() { "********".to_string() } else { "-".to_string() }),
            ("InternetMaxBandwidthOut", self.internet_max_bandwidth_out.to_string()),
            ("InternetChargeType", self.internet_charge_type.clone()),
            ("SystemDiskCategory", self.system_disk_category.clone()),
            ("SystemDiskSize", self.system_disk_size.to_string()),
            ("SpotStrategy", self.spot_strategy.clone()),
            ("SpotDuration", spot_duration),
            ("InstanceChargeType", self.instance_charge_type.clone()),
            ("SecurityGroupId", self.security_group_id.clone()),
            ("VSwitchId", self.v_switch_id.clone()),
            ("Amount", self.amount.to_string()),
        ];

        for (i, (key, value)) in rows.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{:<24} {}", format!("{}:", key), value)?;
        }
        Ok(())
    }
}

/// Builder for [`InstanceSpec`]
#[derive(Debug, Clone, Default)]
pub struct InstanceSpecBuilder {
    region_id: Option<String>,
    image_id: Option<String>,
    instance_type: Option<String>,
    security_group_id: Option<String>,
    v_switch_id: Option<String>,
    password: Option<String>,
    instance_name: Option<String>,
    host_name: Option<String>,
    internet_max_bandwidth_out: Option<u32>,
    internet_charge_type: Option<String>,
    system_disk_category: Option<String>,
    system_disk_size: Option<u32>,
    spot_strategy: Option<String>,
    spot_duration: Option<u32>,
    instance_charge_type: Option<String>,
    amount: Option<u32>,
}

macro_rules! string_setter {
    ($($name:ident),* $(,)?) => {
        $(
            pub fn $name(mut self, value: impl Into<String>) -> Self {
                self.$name = Some(value.into());
                self
            }
        )*
    };
}

impl InstanceSpecBuilder {
    string_setter!(
        region_id,
        image_id,
        instance_type,
        security_group_id,
        v_switch_id,
        host_name,
        internet_charge_type,
        system_disk_category,
        spot_strategy,
        instance_charge_type,
    );

    /// Empty passwords are treated as "not set"
    pub fn password(mut self, value: Option<String>) -> Self {
        self.password = value.filter(|p| !p.is_empty());
        self
    }

    pub fn instance_name(mut self, value: Option<String>) -> Self {
        self.instance_name = value.filter(|n| !n.is_empty());
        self
    }

    pub fn internet_max_bandwidth_out(mut self, value: u32) -> Self {
        self.internet_max_bandwidth_out = Some(value);
        self
    }

    pub fn system_disk_size(mut self, value: u32) -> Self {
        self.system_disk_size = Some(value);
        self
    }

    pub fn spot_duration(mut self, value: u32) -> Self {
        self.spot_duration = Some(value);
        self
    }

    pub fn amount(mut self, value: u32) -> Self {
        self.amount = Some(value);
        self
    }

    /// Validate and build the spec
    pub fn build(self) -> Result<InstanceSpec> {
        let amount = self.amount.unwrap_or(1);
        if amount == 0 {
            return Err(CloudError::InvalidInput("Amount 必须大于 0".to_string()));
        }

        Ok(InstanceSpec {
            region_id: required("RegionId", self.region_id)?,
            image_id: required("ImageId", self.image_id)?,
            instance_type: required("InstanceType", self.instance_type)?,
            security_group_id: required("SecurityGroupId", self.security_group_id)?,
            v_switch_id: required("VSwitchId", self.v_switch_id)?,
            password: self.password,
            instance_name: self.instance_name,
            host_name: or_default(self.host_name, DEFAULT_HOST_NAME),
            internet_max_bandwidth_out: self
                .internet_max_bandwidth_out
                .unwrap_or(DEFAULT_BANDWIDTH_OUT),
            internet_charge_type: or_default(
                self.internet_charge_type,
                DEFAULT_INTERNET_CHARGE_TYPE,
            ),
            system_disk_category: or_default(
                self.system_disk_category,
                DEFAULT_SYSTEM_DISK_CATEGORY,
            ),
            system_disk_size: self.system_disk_size.unwrap_or(DEFAULT_SYSTEM_DISK_SIZE),
            spot_strategy: or_default(self.spot_strategy, DEFAULT_SPOT_STRATEGY),
            spot_duration: self.spot_duration.unwrap_or(0),
            instance_charge_type: or_default(
                self.instance_charge_type,
                DEFAULT_INSTANCE_CHARGE_TYPE,
            ),
            amount,
        })
    }
}

fn required(field: &str, value: Option<String>) -> Result<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| CloudError::InvalidInput(format!("{} 不能为空", field)))
}

fn or_default(value: Option<String>, default: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> InstanceSpecBuilder {
        InstanceSpec::builder()
            .region_id("cn-hangzhou")
            .image_id("ubuntu_22_04_x64_20G_alibase_20240101.vhd")
            .instance_type("ecs.e-c1m2.xlarge")
            .security_group_id("sg-bp1")
            .v_switch_id("vsw-bp1")
    }

    #[test]
    fn test_build_applies_defaults() {
        let spec = base().build().unwrap();
        assert_eq!(spec.internet_max_bandwidth_out(), 5);
        assert_eq!(spec.system_disk_size(), 40);
        assert_eq!(spec.system_disk_category(), "cloud_essd_entry");
        assert_eq!(spec.spot_strategy(), "SpotAsPriceGo");
        assert_eq!(spec.spot_duration(), Some(0));
        assert_eq!(spec.instance_charge_type(), "PostPaid");
        assert_eq!(spec.host_name(), "vps");
        assert_eq!(spec.amount(), 1);
        assert_eq!(spec.password(), None);
    }

    #[test]
    fn test_missing_required_field() {
        let err = InstanceSpec::builder()
            .region_id("cn-hangzhou")
            .image_id("img")
            .instance_type("ecs.t6")
            .v_switch_id("vsw-1")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("SecurityGroupId"));

        let err = base().v_switch_id("   ").build().unwrap_err();
        assert!(err.to_string().contains("VSwitchId"));
    }

    #[test]
    fn test_zero_amount_rejected() {
        assert!(matches!(
            base().amount(0).build(),
            Err(CloudError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_spot_duration_only_for_price_go() {
        let spec = base().spot_strategy("NoSpot").spot_duration(2).build().unwrap();
        assert_eq!(spec.spot_duration(), None);

        let spec = base().spot_duration(2).build().unwrap();
        assert_eq!(spec.spot_duration(), Some(2));
    }

    #[test]
    fn test_display_masks_password() {
        let spec = base()
            .password(Some("S3cret!pass".to_string()))
            .instance_name(Some(String::new()))
            .build()
            .unwrap();
        assert_eq!(spec.instance_name(), None);

        let shown = spec.to_string();
        assert!(shown.contains("Password:"));
        assert!(shown.contains("********"));
        assert!(!shown.contains("S3cret!pass"));
        assert!(shown.contains("SecurityGroupId:"));
        assert!(!format!("{:?}", spec).contains("S3cret!pass"));
    }
}
