pub mod account;
pub mod catalog;
pub mod create;
pub mod delete;
pub mod instance;
pub mod region;

use crate::console::Console;
use crate::prompt::Prompter;
use ecsflow_cloud::{InstanceStatusPage, PollOutcome, Probe, RpcTransport, poll_until};
use std::io::{self, Write};

/// Poll until `instance_id` is the only record and reports `Running`
pub(crate) async fn wait_until_running<T, P, W>(
    console: &mut Console<T, P, W>,
    region_id: &str,
    instance_id: &str,
) -> io::Result<PollOutcome<InstanceStatusPage>>
where
    T: RpcTransport,
    P: Prompter,
    W: Write,
{
    wait_for(console, region_id, instance_id, |page| page.is_single_running()).await
}

/// Poll until the status query succeeds with no records for `instance_id`
pub(crate) async fn wait_until_gone<T, P, W>(
    console: &mut Console<T, P, W>,
    region_id: &str,
    instance_id: &str,
) -> io::Result<PollOutcome<InstanceStatusPage>>
where
    T: RpcTransport,
    P: Prompter,
    W: Write,
{
    wait_for(console, region_id, instance_id, InstanceStatusPage::is_empty).await
}

async fn wait_for<T, P, W>(
    console: &mut Console<T, P, W>,
    region_id: &str,
    instance_id: &str,
    terminal: fn(&InstanceStatusPage) -> bool,
) -> io::Result<PollOutcome<InstanceStatusPage>>
where
    T: RpcTransport,
    P: Prompter,
    W: Write,
{
    writeln!(console.out, "等待系统处理中...")?;

    let config = console.poll;
    let attempts = config.attempts();
    let client = &console.client;
    let out = &mut console.out;
    let mut write_error = None;

    let outcome = poll_until(
        &config,
        move || async move {
            match client.describe_instance_status(region_id, instance_id).await {
                Some(page) if terminal(&page) => Probe::Ready(page),
                Some(page) => Probe::Pending(Some(page)),
                None => Probe::Pending(None),
            }
        },
        |attempt, probe| {
            let state = match probe {
                Probe::Ready(page) | Probe::Pending(Some(page)) => {
                    page.first_status().unwrap_or("-").to_string()
                }
                Probe::Pending(None) => "查询失败".to_string(),
            };
            if let Err(e) = writeln!(out, "等待中 ({}/{})... {}", attempt, attempts, state) {
                write_error.get_or_insert(e);
            }
        },
    )
    .await;

    match write_error {
        Some(e) => Err(e),
        None => Ok(outcome),
    }
}
