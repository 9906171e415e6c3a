use crate::commands::create;
use crate::console::Console;
use crate::prompt::Prompter;
use colored::Colorize;
use ecsflow_cloud::{InstanceSpec, PriceQuery, RpcTransport};
use std::io::Write;

const SPOT_AS_PRICE_GO: &str = "SpotAsPriceGo";

pub async fn balance<T, P, W>(console: &mut Console<T, P, W>) -> anyhow::Result<()>
where
    T: RpcTransport,
    P: Prompter,
    W: Write,
{
    console.warn("正在查询账户余额...")?;

    let Some(balance) = console.client.account_balance().await else {
        console.error("查询账户余额失败")?;
        console.warn("可能原因:")?;
        writeln!(console.out, "1. {}", "AccessKey无效或已过期".cyan())?;
        writeln!(console.out, "2. {}", "网络连接问题".cyan())?;
        writeln!(console.out, "3. {}", "阿里云API服务异常".cyan())?;
        return Ok(());
    };

    writeln!(
        console.out,
        "{} {} 元",
        "当前账户可用余额:".green().bold(),
        balance.available_amount.cyan().bold()
    )?;
    if balance.is_low() {
        console.error("警告: 账户余额较低，请及时充值以避免服务中断")?;
    }

    Ok(())
}

/// Price wizard, optionally followed by a purchase with the quoted settings
pub async fn price<T, P, W>(console: &mut Console<T, P, W>) -> anyhow::Result<()>
where
    T: RpcTransport,
    P: Prompter,
    W: Write,
{
    console.section("ECS查价向导")?;
    let defaults = console.settings.instance.clone();
    let current_region = console.client.region_id().to_string();

    let region_id = console.ask("请输入区域ID", &current_region)?;
    let image_id = console.ask("请输入镜像ID", &defaults.image_id)?;
    let instance_type = console.ask("请输入实例的资源规格", &defaults.instance_type)?;
    let system_disk_category = console.ask("请输入系统盘云盘类型", &defaults.system_disk_category)?;
    let Some(system_disk_size) = console.ask_number("请输入系统盘大小(GB)", defaults.system_disk_size)? else {
        return Ok(());
    };
    let spot_strategy = console.ask("请输入按量付费实例的抢占策略", &defaults.spot_strategy)?;
    let spot_duration = if spot_strategy == SPOT_AS_PRICE_GO {
        let Some(duration) = console.ask_number("请输入实例使用时长(小时), 0表示不限制", defaults.spot_duration)? else {
            return Ok(());
        };
        duration
    } else {
        0
    };
    let internet_charge_type = console.ask("请输入网络带宽计费方式", &defaults.internet_charge_type)?;
    let Some(bandwidth) = console.ask_number("请输入公网出带宽最大值(Mbps)", defaults.internet_max_bandwidth_out)? else {
        return Ok(());
    };
    let Some(amount) = console.ask_number("请输入实例数量", defaults.amount)? else {
        return Ok(());
    };

    let query = PriceQuery {
        region_id: Some(region_id.clone()),
        image_id: Some(image_id.clone()),
        instance_type: Some(instance_type.clone()),
        internet_max_bandwidth_out: bandwidth,
        system_disk_category: system_disk_category.clone(),
        system_disk_size,
        spot_strategy: spot_strategy.clone(),
        spot_duration,
        internet_charge_type: internet_charge_type.clone(),
        resource_type: defaults.resource_type.clone(),
        amount,
    };

    let Some(quote) = console.client.describe_price(&query).await else {
        console.error("查询价格失败")?;
        return Ok(());
    };
    writeln!(console.out, "\n{}\n", quote.report())?;

    if !console.ask_yes("是否根据该价格创建实例?", false)? {
        return Ok(());
    }

    let password = console.ask("请输入root密码", defaults.password.as_deref().unwrap_or_default())?;
    let instance_charge_type = console.ask("请输入实例的付费方式", &defaults.instance_charge_type)?;
    let Some(v_switch_id) = create::choose_vswitch(console, &region_id).await? else {
        return Ok(());
    };
    let Some(security_group_id) = create::choose_security_group(console, &region_id).await? else {
        return Ok(());
    };

    let spec = InstanceSpec::builder()
        .region_id(region_id)
        .image_id(image_id)
        .instance_type(instance_type)
        .security_group_id(security_group_id)
        .v_switch_id(v_switch_id)
        .password(Some(password))
        .instance_name(Some(defaults.instance_name.clone()))
        .host_name(defaults.host_name.clone())
        .internet_max_bandwidth_out(bandwidth)
        .internet_charge_type(internet_charge_type)
        .system_disk_category(system_disk_category)
        .system_disk_size(system_disk_size)
        .spot_strategy(spot_strategy)
        .spot_duration(spot_duration)
        .instance_charge_type(instance_charge_type)
        .amount(amount)
        .build();

    match spec {
        Ok(spec) => create::provision(console, &spec).await,
        Err(e) => {
            console.error(e)?;
            Ok(())
        }
    }
}
