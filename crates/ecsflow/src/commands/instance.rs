use crate::console::Console;
use crate::display;
use crate::prompt::Prompter;
use ecsflow_cloud::RpcTransport;
use std::io::Write;

pub async fn status<T, P, W>(console: &mut Console<T, P, W>, instance_id: &str) -> anyhow::Result<()>
where
    T: RpcTransport,
    P: Prompter,
    W: Write,
{
    if instance_id.is_empty() {
        console.usage("status <instance_id>")?;
        return Ok(());
    }

    let Some(page) = console.client.describe_instance_status("", instance_id).await else {
        console.error(format!("查询实例 {} 状态失败", instance_id))?;
        return Ok(());
    };

    match page.first_status() {
        Some(status) if !page.is_empty() => console.success(status)?,
        _ => console.error("实例不存在")?,
    }
    Ok(())
}

pub async fn query<T, P, W>(console: &mut Console<T, P, W>, instance_id: &str) -> anyhow::Result<()>
where
    T: RpcTransport,
    P: Prompter,
    W: Write,
{
    if instance_id.is_empty() {
        console.usage("query <instance_id>")?;
        return Ok(());
    }

    let address = console.client.describe_instance_attribute(instance_id).await;
    writeln!(console.out, "{}", display::address_table(address.as_ref()))?;
    Ok(())
}

pub async fn list<T, P, W>(console: &mut Console<T, P, W>) -> anyhow::Result<()>
where
    T: RpcTransport,
    P: Prompter,
    W: Write,
{
    let instances = console.client.describe_instances("").await;
    writeln!(console.out, "{}", display::instances_table(&instances))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::console::tests::{console, output};
    use ecsflow_cloud::MockTransport;
    use serde_json::json;

    #[tokio::test]
    async fn test_status_unknown_instance() {
        let mock = MockTransport::new().with_reply(
            "DescribeInstanceStatus",
            json!({"TotalCount": 0, "PageNumber": 1, "PageSize": 10,
                   "InstanceStatuses": {"InstanceStatus": []}}),
        );
        let mut console = console(mock, &[]);
        console.execute("status i-missing").await.unwrap();

        let out = output(&console);
        assert!(out.contains("实例不存在"));
        assert!(!out.contains('+'));
    }

    #[tokio::test]
    async fn test_status_running() {
        let mock = MockTransport::new().with_reply(
            "DescribeInstanceStatus",
            json!({"TotalCount": 1, "InstanceStatuses": {"InstanceStatus": [
                {"InstanceId": "i-bp1", "Status": "Running"}
            ]}}),
        );
        let mut console = console(mock, &[]);
        console.execute("status i-bp1").await.unwrap();

        assert_eq!(output(&console).trim(), "Running");
        let call = &console.client.transport().calls_for("DescribeInstanceStatus")[0];
        assert_eq!(call.get("RegionId"), Some("cn-hangzhou"));
    }

    #[tokio::test]
    async fn test_status_failure_is_reported() {
        let mock = MockTransport::new().with_transport_error("DescribeInstanceStatus", "connection reset");
        let mut console = console(mock, &[]);
        console.execute("status i-bp1").await.unwrap();

        let out = output(&console);
        assert!(out.contains("查询实例 i-bp1 状态失败"));
        assert!(!out.contains("实例不存在"));
    }

    #[tokio::test]
    async fn test_query_prefers_eip() {
        let mock = MockTransport::new().with_reply(
            "DescribeInstanceAttribute",
            json!({"InstanceId": "i-bp1",
                   "EipAddress": {"IpAddress": "39.0.0.9"},
                   "PublicIpAddress": {"IpAddress": ["47.1.2.3"]}}),
        );
        let mut console = console(mock, &[]);
        console.execute("query i-bp1").await.unwrap();

        let out = output(&console);
        assert!(out.contains("39.0.0.9"));
        assert!(!out.contains("47.1.2.3"));
    }

    #[tokio::test]
    async fn test_query_failure_shows_placeholder() {
        let mock = MockTransport::new().with_fault(
            "DescribeInstanceAttribute",
            "InvalidInstanceId.NotFound",
            "The specified InstanceId does not exist.",
        );
        let mut console = console(mock, &[]);
        console.execute("query i-gone").await.unwrap();

        assert!(output(&console).contains("暂无实例数据"));
    }

    #[tokio::test]
    async fn test_status_requires_id() {
        let mut console = console(MockTransport::new(), &[]);
        console.execute("status").await.unwrap();

        assert!(output(&console).contains("错误: 请指定实例ID"));
        assert!(console.client.transport().calls().is_empty());
    }
}
