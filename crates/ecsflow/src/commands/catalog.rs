//! Read-only listings: instance types, launch templates, vswitches and
//! security groups

use crate::console::Console;
use crate::display;
use crate::prompt::Prompter;
use ecsflow_cloud::RpcTransport;
use std::io::Write;

/// Show instance types one page at a time, asking before each next page
pub async fn instance_types<T, P, W>(console: &mut Console<T, P, W>) -> anyhow::Result<()>
where
    T: RpcTransport,
    P: Prompter,
    W: Write,
{
    let mut next_token: Option<String> = None;

    loop {
        let Some(page) = console
            .client
            .describe_instance_types(next_token.as_deref(), None)
            .await
        else {
            writeln!(console.out, "未获取到有效的实例规格数据")?;
            return Ok(());
        };
        writeln!(console.out, "\n{}", display::instance_types_table(&page))?;

        match page.next_token {
            Some(token) if console.ask_yes("是否加载下一页?", false)? => next_token = Some(token),
            _ => return Ok(()),
        }
    }
}

pub async fn templates<T, P, W>(console: &mut Console<T, P, W>, arg: &str) -> anyhow::Result<()>
where
    T: RpcTransport,
    P: Prompter,
    W: Write,
{
    let page_number = match arg {
        "" => 1,
        arg => match arg.parse::<u32>() {
            Ok(n) if n > 0 => n,
            _ => {
                console.error(format!("页码必须是正整数: {}", arg))?;
                return Ok(());
            }
        },
    };

    let rendered = match console
        .client
        .describe_launch_templates("", page_number)
        .await
    {
        Some(page) => display::launch_templates_table(&page),
        None => "未获取到有效的启动模板数据".to_string(),
    };
    writeln!(console.out, "{}", rendered)?;
    Ok(())
}

pub async fn vswitches<T, P, W>(console: &mut Console<T, P, W>) -> anyhow::Result<()>
where
    T: RpcTransport,
    P: Prompter,
    W: Write,
{
    let vswitches = console
        .client
        .describe_vswitches("")
        .await
        .unwrap_or_default();
    writeln!(console.out, "{}", display::vswitches_table(&vswitches))?;
    Ok(())
}

pub async fn security_groups<T, P, W>(console: &mut Console<T, P, W>) -> anyhow::Result<()>
where
    T: RpcTransport,
    P: Prompter,
    W: Write,
{
    let groups = console
        .client
        .describe_all_security_group_rules("")
        .await
        .unwrap_or_default();
    writeln!(console.out, "{}", display::security_groups_table(&groups))?;
    Ok(())
}
