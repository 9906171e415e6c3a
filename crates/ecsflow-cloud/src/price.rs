//! Price quotes and the price report

use serde::Serialize;

pub const DEFAULT_BANDWIDTH_OUT: u32 = 5;
pub const DEFAULT_SYSTEM_DISK_SIZE: u32 = 40;
pub const DEFAULT_SYSTEM_DISK_CATEGORY: &str = "cloud_essd_entry";
pub const DEFAULT_SPOT_STRATEGY: &str = "SpotAsPriceGo";
pub const DEFAULT_INTERNET_CHARGE_TYPE: &str = "PayByBandwidth";
pub const DEFAULT_RESOURCE_TYPE: &str = "instance";

/// Parameters of a price query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceQuery {
    /// Falls back to the client's active region when `None`
    pub region_id: Option<String>,
    pub image_id: Option<String>,
    pub instance_type: Option<String>,
    pub internet_max_bandwidth_out: u32,
    pub system_disk_category: String,
    pub system_disk_size: u32,
    pub spot_strategy: String,
    pub spot_duration: u32,
    pub internet_charge_type: String,
    pub resource_type: String,
    pub amount: u32,
}

impl Default for PriceQuery {
    fn default() -> Self {
        Self {
            region_id: None,
            image_id: None,
            instance_type: None,
            internet_max_bandwidth_out: DEFAULT_BANDWIDTH_OUT,
            system_disk_category: DEFAULT_SYSTEM_DISK_CATEGORY.to_string(),
            system_disk_size: DEFAULT_SYSTEM_DISK_SIZE,
            spot_strategy: DEFAULT_SPOT_STRATEGY.to_string(),
            spot_duration: 0,
            internet_charge_type: DEFAULT_INTERNET_CHARGE_TYPE.to_string(),
            resource_type: DEFAULT_RESOURCE_TYPE.to_string(),
            amount: 1,
        }
    }
}

/// Price of one billed resource component
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceComponent {
    pub resource: String,
    pub trade_price: f64,
}

/// Normalized result of a price query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceQuote {
    pub total: f64,
    pub currency: Option<String>,
    pub components: Vec<PriceComponent>,
    pub discounts: Vec<String>,
}

impl PriceQuote {
    /// Human-readable price report
    pub fn report(&self) -> String {
        let total = format_price(self.total);

        let components = if self.components.is_empty() {
            "    (无明细信息)".to_string()
        } else {
            self.components
                .iter()
                .map(|c| {
                    format!(
                        "    ├─ {}: {} 元",
                        resource_label(&c.resource),
                        format_price(c.trade_price)
                    )
                })
                .collect::<Vec<_>>()
                .join("\n")
        };

        let discounts = if self.discounts.is_empty() {
            "    • 无额外优惠".to_string()
        } else {
            self.discounts
                .iter()
                .map(|d| format!("    • {}", d))
                .collect::<Vec<_>>()
                .join("\n")
        };

        format!(
            "📊 服务器价格明细报告\n\
             =======================\n\
             💳 总费用: {total} 元\n\
             \n\
             🧾 费用明细:\n\
             {components}\n    └─ 合计: {total} 元\n\
             \n\
             🎁 优惠信息:\n\
             {discounts}"
        )
    }
}

/// Display name of a billed resource component
pub fn resource_label(resource: &str) -> &str {
    match resource {
        "instanceType" => "实例规格",
        "bandwidth" => "网络带宽",
        "image" => "系统镜像",
        "systemDisk" => "系统磁盘",
        "dataDisk" => "数据磁盘",
        "snapshot" => "磁盘快照",
        other => other,
    }
}

/// Format a price with five decimals, trailing zeros and dot stripped
pub fn format_price(value: f64) -> String {
    let formatted = format!("{:.5}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "" | "-0" => "0".to_string(),
        other => other.to_string(),
    }
}
