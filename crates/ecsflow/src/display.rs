//! Text rendering of provider results
//!
//! Every function here is pure: it builds a `String` and leaves printing to
//! the caller. Empty input renders as a short message instead of an empty
//! table; absent optional fields render as `N/A` or `无`.

use colored::Colorize;
use ecsflow_cloud::{
    InstanceAddress, InstanceSummary, InstanceTypeInfo, InstanceTypePage, LaunchTemplatePage,
    Region, SecurityGroupRules, VSwitch,
};
use unicode_width::UnicodeWidthStr;

const NA: &str = "N/A";
const NONE: &str = "无";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// Render a grid table sized by display width, so CJK text lines up
pub fn grid(headers: &[&str], rows: &[Vec<String>], align: Align) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.width());
        }
    }

    let border = |fill: &str| {
        let mut line = String::from("+");
        for width in &widths {
            line.push_str(&fill.repeat(width + 2));
            line.push('+');
        }
        line
    };
    let render_row = |cells: &mut dyn Iterator<Item = &str>| {
        let mut line = String::from("|");
        for width in &widths {
            let cell = cells.next().unwrap_or("");
            line.push(' ');
            line.push_str(&pad(cell, *width, align));
            line.push_str(" |");
        }
        line
    };

    let mut lines = vec![
        border("-"),
        render_row(&mut headers.iter().copied()),
        border("="),
    ];
    for row in rows {
        lines.push(render_row(&mut row.iter().map(String::as_str)));
        lines.push(border("-"));
    }
    if rows.is_empty() {
        lines.pop();
        lines.push(border("-"));
    }
    lines.join("\n")
}

fn pad(cell: &str, width: usize, align: Align) -> String {
    let gap = width.saturating_sub(cell.width());
    match align {
        Align::Left => format!("{}{}", cell, " ".repeat(gap)),
        Align::Center => {
            let left = gap / 2;
            format!("{}{}{}", " ".repeat(left), cell, " ".repeat(gap - left))
        }
    }
}

fn or_placeholder<T: ToString>(value: Option<T>, placeholder: &str) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| placeholder.to_string())
}

/// Startup banner listing the commands
pub fn banner(commands: &[(&str, &str)]) -> String {
    let title = format!("阿里云ECS管理工具 v{}", env!("CARGO_PKG_VERSION"));
    let entries: Vec<(String, String)> = commands
        .iter()
        .map(|(name, desc)| {
            let plain = format!("  {:<16}- {}", name, desc);
            let styled = format!("  {}- {}", format!("{:<16}", name).green().bold(), desc);
            (plain, styled)
        })
        .collect();

    let inner = entries
        .iter()
        .map(|(plain, _)| plain.width())
        .chain([title.width(), "  可用命令:".width()])
        .max()
        .unwrap_or(0)
        + 4;

    let line = |plain: &str, styled: &str| {
        format!(
            "║{}{}║",
            styled,
            " ".repeat(inner.saturating_sub(plain.width()))
        )
    };
    let title_gap = inner.saturating_sub(title.width());
    let title_line = format!(
        "║{}{}{}║",
        " ".repeat(title_gap / 2),
        title.bold(),
        " ".repeat(title_gap - title_gap / 2)
    );

    let mut lines = vec![
        format!("╔{}╗", "═".repeat(inner)),
        line("", ""),
        title_line,
        line("", ""),
        line("  可用命令:", "  可用命令:"),
    ];
    for (plain, styled) in &entries {
        lines.push(line(plain, styled));
    }
    lines.push(line("", ""));
    lines.push(format!("╚{}╝", "═".repeat(inner)));
    lines.join("\n")
}

pub fn instances_table(instances: &[InstanceSummary]) -> String {
    if instances.is_empty() {
        return "暂无实例数据".to_string();
    }

    let rows: Vec<Vec<String>> = instances
        .iter()
        .map(|i| {
            vec![
                i.instance_id.clone(),
                or_placeholder(i.public_ip.as_deref(), NONE),
                i.os_name.clone(),
                i.status.clone(),
            ]
        })
        .collect();

    grid(&["实例ID", "公网IP", "操作系统", "状态"], &rows, Align::Left)
}

/// Instance id and reachable address, e.g. after a create
pub fn address_table(address: Option<&InstanceAddress>) -> String {
    let Some(address) = address else {
        return "暂无实例数据".to_string();
    };

    let rows = vec![vec![
        address.instance_id.clone(),
        or_placeholder(address.public_ip.as_deref(), NONE),
    ]];
    grid(&["实例ID", "公网IP"], &rows, Align::Left)
}

/// `2×1788GiB` for local disks, `-` for cloud-disk-only types
pub fn storage_display(info: &InstanceTypeInfo) -> String {
    match (info.local_storage_amount, info.local_storage_capacity) {
        (Some(amount), Some(capacity)) => format!("{}×{}GiB", amount, capacity),
        (Some(amount), None) => format!("{}×?", amount),
        (None, _) if info.local_storage_category == "cloud" => "-".to_string(),
        (None, _) => NA.to_string(),
    }
}

pub fn instance_types_table(page: &InstanceTypePage) -> String {
    if page.instance_types.is_empty() {
        return "未获取到有效的实例规格数据".to_string();
    }

    let rows: Vec<Vec<String>> = page
        .instance_types
        .iter()
        .map(|t| {
            vec![
                t.instance_type_id.clone(),
                or_placeholder(t.cpu_core_count, NA),
                or_placeholder(t.memory_size.as_deref(), NA),
                t.gpu_amount.to_string(),
                t.gpu_spec.clone(),
                t.local_storage_category.clone(),
                storage_display(t),
                t.eni_quantity.to_string(),
                t.eni_private_ip_address_quantity.to_string(),
                or_placeholder(t.instance_type_family.as_deref(), NA),
            ]
        })
        .collect();

    let headers = [
        "规格ID",
        "CPU(核)",
        "内存(GiB)",
        "GPU数量",
        "GPU规格",
        "本地存储",
        "存储容量",
        "网卡数",
        "IP数量",
        "规格族",
    ];

    let rule = "=".repeat(80);
    format!(
        "{}\nECS实例规格列表\n{}\n{}",
        rule,
        rule,
        grid(&headers, &rows, Align::Center)
    )
}

pub fn launch_templates_table(page: &LaunchTemplatePage) -> String {
    if page.launch_templates.is_empty() {
        return "未获取到有效的启动模板数据".to_string();
    }

    let rows: Vec<Vec<String>> = page
        .launch_templates
        .iter()
        .map(|t| {
            let tags = t
                .tags
                .iter()
                .map(|tag| format!("{}:{}", tag.key, tag.value))
                .collect::<Vec<_>>()
                .join(", ");
            vec![
                t.launch_template_id.clone(),
                t.launch_template_name.clone(),
                or_placeholder(t.default_version_number, NA),
                or_placeholder(t.latest_version_number, NA),
                or_placeholder(t.created_by.as_deref(), NA),
                or_placeholder(t.create_time.as_deref(), NA),
                tags,
            ]
        })
        .collect();

    let table = grid(
        &["模板ID", "模板名称", "默认版本", "最新版本", "创建者", "创建时间", "标签"],
        &rows,
        Align::Left,
    );

    format!(
        "{}\n启动模板总数: {}\n页码: {}/{} (每页 {} 条)",
        table,
        page.total_count,
        page.page_number,
        page.total_pages(),
        page.page_size
    )
}

pub fn security_groups_table(groups: &[SecurityGroupRules]) -> String {
    if groups.is_empty() {
        return "暂无安全组数据".to_string();
    }

    groups
        .iter()
        .map(|group| {
            let mut header = format!("安全组ID: {}", group.security_group_id);
            if !group.description.is_empty() {
                header.push_str(&format!(" | 描述: {}", group.description));
            }

            let body = if group.rules.is_empty() {
                "此安全组暂无规则".to_string()
            } else {
                let rows: Vec<Vec<String>> = group
                    .rules
                    .iter()
                    .map(|rule| {
                        let protocol = match rule.ip_protocol.as_str() {
                            "ALL" => "全部协议".to_string(),
                            other => other.to_string(),
                        };
                        vec![rule.port_range.clone(), protocol, rule.source_cidr_ip.clone()]
                    })
                    .collect();
                grid(&["端口范围", "协议", "源IP网段"], &rows, Align::Left)
            };

            format!("\n{}\n{}", header, body)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn vswitches_table(vswitches: &[VSwitch]) -> String {
    if vswitches.is_empty() {
        return "未找到虚拟交换机信息".to_string();
    }

    let rows: Vec<Vec<String>> = vswitches
        .iter()
        .enumerate()
        .map(|(i, v)| {
            vec![
                format!("#{}", i + 1),
                v.v_switch_id.clone(),
                v.zone_id.clone(),
                v.vpc_id.clone(),
                or_placeholder(v.cidr_block.as_deref(), NA),
                or_placeholder(v.v_switch_name.as_deref(), NA),
            ]
        })
        .collect();

    grid(
        &["序号", "VSwitch ID", "可用区", "VPC ID", "网段", "名称"],
        &rows,
        Align::Left,
    )
}

pub fn regions_table(regions: &[Region]) -> String {
    if regions.is_empty() {
        return "未获取到地域信息".to_string();
    }

    let rows: Vec<Vec<String>> = regions
        .iter()
        .map(|r| {
            vec![
                r.region_id.clone(),
                r.local_name.clone(),
                r.region_endpoint.clone(),
            ]
        })
        .collect();

    grid(&["地域ID", "名称", "接入地址"], &rows, Align::Left)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecsflow_cloud::{LaunchTemplate, SecurityRule};

    #[test]
    fn test_grid_aligns_wide_characters() {
        let rows = vec![
            vec!["i-1".to_string(), "运行中".to_string()],
            vec!["i-22".to_string(), "ok".to_string()],
        ];
        let table = grid(&["实例ID", "状态"], &rows, Align::Left);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], "+--------+--------+");
        assert_eq!(lines[1], "| 实例ID | 状态   |");
        assert_eq!(lines[2], "+========+========+");
        assert_eq!(lines[3], "| i-1    | 运行中 |");
        assert_eq!(lines[5], "| i-22   | ok     |");
        assert_eq!(lines.len(), 7);
        assert!(lines.iter().all(|l| l.width() == lines[0].width()));
    }

    #[test]
    fn test_grid_center() {
        let rows = vec![vec!["a".to_string()]];
        let table = grid(&["abcd"], &rows, Align::Center);
        assert!(table.contains("|  a   |"));
    }

    #[test]
    fn test_empty_placeholders() {
        assert_eq!(instances_table(&[]), "暂无实例数据");
        assert_eq!(address_table(None), "暂无实例数据");
        assert_eq!(security_groups_table(&[]), "暂无安全组数据");
        assert_eq!(vswitches_table(&[]), "未找到虚拟交换机信息");
        assert_eq!(regions_table(&[]), "未获取到地域信息");
    }

    #[test]
    fn test_instances_missing_ip() {
        let table = instances_table(&[InstanceSummary {
            instance_id: "i-bp1".to_string(),
            public_ip: None,
            os_name: "Unknown".to_string(),
            status: "Stopped".to_string(),
        }]);
        assert!(table.contains("| 无"));
        assert!(table.contains("Stopped"));
    }

    #[test]
    fn test_storage_display() {
        let mut info = InstanceTypeInfo {
            instance_type_id: "ecs.i2.xlarge".to_string(),
            cpu_core_count: Some(4),
            memory_size: Some("32 GiB".to_string()),
            gpu_amount: 0,
            gpu_spec: "N/A".to_string(),
            local_storage_category: "local_ssd_pro".to_string(),
            local_storage_amount: Some(1),
            local_storage_capacity: Some(894),
            eni_quantity: 3,
            eni_private_ip_address_quantity: 10,
            instance_type_family: None,
        };
        assert_eq!(storage_display(&info), "1×894GiB");

        info.local_storage_capacity = None;
        assert_eq!(storage_display(&info), "1×?");

        info.local_storage_amount = None;
        assert_eq!(storage_display(&info), "N/A");

        info.local_storage_category = "cloud".to_string();
        assert_eq!(storage_display(&info), "-");

        let table = instance_types_table(&InstanceTypePage {
            request_id: None,
            next_token: None,
            instance_types: vec![info],
        });
        assert!(table.contains("ECS实例规格列表"));
        assert!(table.contains("ecs.i2.xlarge"));
    }

    #[test]
    fn test_templates_footer() {
        let page = LaunchTemplatePage {
            request_id: None,
            total_count: 25,
            page_number: 2,
            page_size: 10,
            launch_templates: vec![LaunchTemplate {
                launch_template_id: "lt-1".to_string(),
                launch_template_name: "web".to_string(),
                default_version_number: Some(1),
                latest_version_number: None,
                created_by: None,
                create_time: None,
                modified_time: None,
                resource_group_id: None,
                tags: vec![],
            }],
        };

        let table = launch_templates_table(&page);
        assert!(table.contains("页码: 2/3 (每页 10 条)"));
        assert!(table.contains("N/A"));
    }

    #[test]
    fn test_security_groups() {
        let groups = vec![
            SecurityGroupRules {
                security_group_id: "sg-1".to_string(),
                description: "web".to_string(),
                rules: vec![SecurityRule {
                    port_range: "all/all".to_string(),
                    ip_protocol: "ALL".to_string(),
                    source_cidr_ip: "0.0.0.0/0".to_string(),
                }],
            },
            SecurityGroupRules {
                security_group_id: "sg-2".to_string(),
                description: String::new(),
                rules: vec![],
            },
        ];

        let rendered = security_groups_table(&groups);
        assert!(rendered.contains("安全组ID: sg-1 | 描述: web"));
        assert!(rendered.contains("全部协议"));
        assert!(rendered.contains("安全组ID: sg-2\n此安全组暂无规则"));
    }

    #[test]
    fn test_banner_box_is_rectangular() {
        colored::control::set_override(false);
        let banner = banner(&[("create", "创建新的ECS实例"), ("exit", "退出程序")]);
        let widths: Vec<usize> = banner.lines().map(|l| l.width()).collect();
        assert!(widths.iter().all(|w| *w == widths[0]));
        assert!(banner.contains("create"));
    }
}
