use crate::console::Console;
use crate::display;
use crate::prompt::Prompter;
use colored::Colorize;
use ecsflow_cloud::RpcTransport;
use std::io::Write;

pub fn set<T, P, W>(console: &mut Console<T, P, W>, region_id: &str) -> anyhow::Result<()>
where
    T: RpcTransport,
    P: Prompter,
    W: Write,
{
    if region_id.is_empty() {
        console.warn("请指定区域ID")?;
        writeln!(console.out, "用法: {}", "setregion <region_id>".green().bold())?;
        return Ok(());
    }

    if console.client.set_region(region_id) {
        console.success(format!("当前区域已设置为: {}", console.client.region_id()))?;
    } else {
        console.error(format!("区域设置失败，当前区域仍为: {}", console.client.region_id()))?;
    }
    Ok(())
}

pub fn show<T, P, W>(console: &mut Console<T, P, W>) -> anyhow::Result<()>
where
    T: RpcTransport,
    P: Prompter,
    W: Write,
{
    console.info(format!("当前区域: {}", console.client.region_id()))?;
    Ok(())
}

pub async fn list<T, P, W>(console: &mut Console<T, P, W>) -> anyhow::Result<()>
where
    T: RpcTransport,
    P: Prompter,
    W: Write,
{
    let regions = console.client.describe_regions().await.unwrap_or_default();
    writeln!(console.out, "{}", display::regions_table(&regions))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::console::tests::{console, output};
    use ecsflow_cloud::MockTransport;
    use serde_json::json;

    #[tokio::test]
    async fn test_setregion_moves_session() {
        let mock = MockTransport::new().with_reply("DescribeInstances", json!({"Instances": {"Instance": []}}));
        let mut console = console(mock, &[]);
        console.execute("setregion cn-beijing").await.unwrap();
        console.execute("instances").await.unwrap();

        assert!(output(&console).contains("当前区域已设置为: cn-beijing"));
        let call = &console.client.transport().calls_for("DescribeInstances")[0];
        assert_eq!(call.host, "ecs.cn-beijing.aliyuncs.com");
        assert_eq!(call.get("RegionId"), Some("cn-beijing"));
    }

    #[tokio::test]
    async fn test_setregion_invalid_keeps_region() {
        let mut console = console(MockTransport::new(), &[]);
        console.execute("setregion cn_beijing!").await.unwrap();

        assert!(output(&console).contains("区域设置失败，当前区域仍为: cn-hangzhou"));
        assert_eq!(console.client.region_id(), "cn-hangzhou");
    }

    #[tokio::test]
    async fn test_setregion_requires_argument() {
        let mut console = console(MockTransport::new(), &[]);
        console.execute("setregion").await.unwrap();
        assert!(output(&console).contains("请指定区域ID"));
    }

    #[tokio::test]
    async fn test_regions() {
        let mock = MockTransport::new().with_reply(
            "DescribeRegions",
            json!({"Regions": {"Region": [
                {"RegionId": "cn-hangzhou", "LocalName": "华东1（杭州）", "RegionEndpoint": "ecs.cn-hangzhou.aliyuncs.com"},
                {"RegionId": "ap-southeast-1", "LocalName": "新加坡", "RegionEndpoint": "ecs.ap-southeast-1.aliyuncs.com"}
            ]}}),
        );
        let mut console = console(mock, &[]);
        console.execute("regions").await.unwrap();

        let out = output(&console);
        assert!(out.contains("华东1（杭州）"));
        assert!(out.contains("ap-southeast-1"));
    }
}
