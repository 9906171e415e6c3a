//! ecsflow settings
//!
//! Loads the YAML settings file that supplies the Aliyun credentials, the
//! starting region and the defaults offered by the provisioning wizard.

pub mod error;

pub use error::*;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Region used when neither the settings file nor the command line names one
pub const DEFAULT_REGION: &str = "cn-hangzhou";

/// Environment variable holding an explicit settings path
pub const CONFIG_ENV: &str = "ECSFLOW_CONFIG";

const CANDIDATES: [&str; 2] = ["config.yml", "config.yaml"];

/// Fully loaded settings, immutable for the rest of the session
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub credentials: Credentials,
    pub region_id: String,
    pub instance: InstanceDefaults,
    pub console: ConsoleSettings,
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub access_key_secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("access_key_secret", &"***")
            .finish()
    }
}

/// Defaults offered by the `create` and `price` wizards
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InstanceDefaults {
    pub instance_type: String,
    pub password: Option<String>,
    pub internet_charge_type: String,
    pub internet_max_bandwidth_out: u32,
    pub image_id: String,
    pub resource_type: String,
    pub instance_name: String,
    pub system_disk_size: u32,
    pub system_disk_category: String,
    pub spot_strategy: String,
    pub spot_duration: u32,
    pub region_id: Option<String>,
    pub v_switch_id: Option<String>,
    pub security_group_id: Option<String>,
    pub amount: u32,
    pub host_name: String,
    pub instance_charge_type: String,
}

impl Default for InstanceDefaults {
    fn default() -> Self {
        Self {
            instance_type: "ecs.e-c1m2.xlarge".to_string(),
            password: None,
            internet_charge_type: "PayByBandwidth".to_string(),
            internet_max_bandwidth_out: 5,
            image_id: "ubuntu_20_04_x64_20G_alibase_20250625.vhd".to_string(),
            resource_type: "instance".to_string(),
            instance_name: "ecsflow".to_string(),
            system_disk_size: 40,
            system_disk_category: "cloud_essd_entry".to_string(),
            spot_strategy: "SpotAsPriceGo".to_string(),
            spot_duration: 0,
            region_id: None,
            v_switch_id: None,
            security_group_id: None,
            amount: 1,
            host_name: "vps".to_string(),
            instance_charge_type: "PostPaid".to_string(),
        }
    }
}

/// Console behaviour knobs
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConsoleSettings {
    /// Seconds between status checks after a create or delete
    pub poll_interval_secs: u64,
    /// Status checks before giving up and advising a manual check
    pub poll_max_attempts: u32,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            poll_interval_secs: 10,
            poll_max_attempts: 6,
        }
    }
}

#[derive(Deserialize)]
struct RawSettings {
    aliyun: Option<RawCredentials>,
    #[serde(default)]
    instance: InstanceDefaults,
    #[serde(default)]
    console: ConsoleSettings,
}

#[derive(Deserialize)]
struct RawCredentials {
    access_key_id: Option<String>,
    access_key_secret: Option<String>,
    region_id: Option<String>,
}

/// Locate the settings file
///
/// Search order:
/// 1. `explicit` (the `--config` flag, which clap also fills from `ECSFLOW_CONFIG`)
/// 2. current directory: config.yml, config.yaml
/// 3. ~/.config/ecsflow/config.yml
///
/// An explicit path that does not exist is reported as such instead of
/// silently falling back to the other locations.
pub fn find_settings_file(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let current_dir = std::env::current_dir()?;
    for filename in &CANDIDATES {
        let path = current_dir.join(filename);
        if path.exists() {
            return Ok(path);
        }
    }

    if let Some(config_dir) = dirs::config_dir() {
        let global = config_dir.join("ecsflow").join("config.yml");
        if global.exists() {
            return Ok(global);
        }
    }

    Err(ConfigError::NoSettingsFile)
}

/// Read and validate the settings file at `path`
pub fn load_settings(path: &Path) -> Result<Settings> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };
    tracing::debug!("Loaded settings from {}", path.display());
    parse_settings(&content)
}

/// Parse a settings document
pub fn parse_settings(content: &str) -> Result<Settings> {
    if content.trim().is_empty() {
        return Err(ConfigError::Empty);
    }

    let value: serde_yaml::Value = serde_yaml::from_str(content)?;
    if value.is_null() {
        return Err(ConfigError::Empty);
    }

    let raw: RawSettings = serde_yaml::from_value(value)?;
    let aliyun = raw.aliyun.ok_or(ConfigError::MissingCredentials)?;

    let access_key_id = non_empty(aliyun.access_key_id).ok_or(ConfigError::MissingCredentials)?;
    let access_key_secret =
        non_empty(aliyun.access_key_secret).ok_or(ConfigError::MissingCredentials)?;

    let region_id = non_empty(aliyun.region_id).unwrap_or_else(|| DEFAULT_REGION.to_string());

    Ok(Settings {
        credentials: Credentials {
            access_key_id,
            access_key_secret,
        },
        region_id,
        instance: raw.instance,
        console: raw.console,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
