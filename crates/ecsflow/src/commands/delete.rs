use crate::commands::wait_until_gone;
use crate::console::Console;
use crate::prompt::Prompter;
use colored::Colorize;
use ecsflow_cloud::{PollOutcome, RpcTransport};
use std::io::Write;

/// Delete an instance after a yes/no gate and an exact id re-entry
pub async fn handle<T, P, W>(console: &mut Console<T, P, W>, instance_id: &str) -> anyhow::Result<()>
where
    T: RpcTransport,
    P: Prompter,
    W: Write,
{
    if instance_id.is_empty() {
        console.usage("delete <instance_id>")?;
        return Ok(());
    }

    console.error("警告: 删除操作不可恢复，实例数据将永久丢失!")?;
    console.warn(format!("您即将删除实例: {}", instance_id))?;

    let confirm = console.ask(&format!("确认删除实例 {}? (yes/no)", instance_id), "no")?;
    if !confirm.eq_ignore_ascii_case("yes") {
        console.success("已取消删除操作")?;
        return Ok(());
    }

    let typed = console.ask("最终确认: 输入实例ID以确认删除", "")?;
    if typed != instance_id {
        console.success("实例ID不匹配，已取消删除操作")?;
        return Ok(());
    }

    console.warn(format!("正在删除实例 {}...", instance_id))?;
    tracing::info!(instance_id, "Deleting instance");

    if console.client.delete_instance(instance_id).await.is_none() {
        console.error(format!("删除实例 {} 失败", instance_id))?;
        console.warn("可能的原因:")?;
        for (i, reason) in [
            "实例ID不存在或输入错误",
            "实例当前状态不允许删除",
            "没有足够的权限执行此操作",
            "阿里云API服务异常",
        ]
        .iter()
        .enumerate()
        {
            writeln!(console.out, "{}. {}", i + 1, reason.cyan())?;
        }
        return Ok(());
    }

    console.success(format!("删除实例 {} 的请求已发送", instance_id))?;
    console.warn("实例删除需要一段时间完成，请耐心等待...")?;

    let region_id = console.client.region_id().to_string();
    match wait_until_gone(console, &region_id, instance_id).await? {
        PollOutcome::Reached(_) => {
            console.success(format!("实例 {} 已成功删除", instance_id))?;
            console.warn("所有关联资源（如磁盘和弹性IP）也已释放")?;
        }
        PollOutcome::Exhausted { .. } => {
            console.error("实例删除尚未完成，可能需要更多时间")?;
            console.warn(format!("建议稍后使用 'status {}' 命令手动检查状态", instance_id))?;
        }
    }

    Ok(())
}
