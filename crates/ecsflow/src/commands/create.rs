use crate::commands::{account, catalog, wait_until_running};
use crate::console::Console;
use crate::display;
use crate::prompt::Prompter;
use ecsflow_cloud::{InstanceSpec, PollOutcome, RpcTransport, TemplateLaunch};
use std::io::{self, Write};

const SPOT_AS_PRICE_GO: &str = "SpotAsPriceGo";

/// Creation wizard: from a launch template or field by field
pub async fn handle<T, P, W>(console: &mut Console<T, P, W>) -> anyhow::Result<()>
where
    T: RpcTransport,
    P: Prompter,
    W: Write,
{
    console.section("创建ECS实例向导")?;
    account::balance(console).await?;
    writeln!(console.out)?;

    if console.ask_yes("是否从模板创建?", false)? {
        from_template(console).await
    } else {
        manual(console).await
    }
}

async fn from_template<T, P, W>(console: &mut Console<T, P, W>) -> anyhow::Result<()>
where
    T: RpcTransport,
    P: Prompter,
    W: Write,
{
    catalog::templates(console, "").await?;

    let current_region = console.client.region_id().to_string();
    let region_id = console.ask("请输入模板所在区域ID", &current_region)?;
    let template_name = console.ask("选择模板名称", "")?;
    if template_name.is_empty() {
        console.error("模板名称不能为空，创建实例失败")?;
        return Ok(());
    }
    let Some(version) = console.ask_number("选择模板版本", 1u32)? else {
        return Ok(());
    };
    let Some(amount) = console.ask_number("创建数量", 1u32)? else {
        return Ok(());
    };
    if amount == 0 {
        console.error("创建数量必须大于 0")?;
        return Ok(());
    }
    let password = console.ask("输入root密码", "")?;

    let launch = TemplateLaunch {
        region_id: region_id.clone(),
        launch_template_name: template_name,
        launch_template_version: version,
        amount,
        password: Some(password).filter(|p| !p.is_empty()),
    };

    console.warn("正在创建实例...")?;
    let created = console.client.create_instances_from_template(&launch).await;
    match created.as_ref().and_then(|c| c.first_id()) {
        Some(instance_id) => finish(console, &region_id, instance_id).await?,
        None => console.error("创建实例失败")?,
    }
    Ok(())
}

async fn manual<T, P, W>(console: &mut Console<T, P, W>) -> anyhow::Result<()>
where
    T: RpcTransport,
    P: Prompter,
    W: Write,
{
    let defaults = console.settings.instance.clone();

    let current_region = console.client.region_id().to_string();
    if console.ask_yes(&format!("是否更改区域? 当前区域为 > {}", current_region), false)? {
        let Some(regions) = console.client.describe_regions().await else {
            console.error("获取地域列表失败，已取消创建")?;
            return Ok(());
        };
        writeln!(console.out, "{}", display::regions_table(&regions))?;

        let fallback = defaults
            .region_id
            .clone()
            .unwrap_or_else(|| console.settings.region_id.clone());
        let region_id = console.ask("请输入区域ID", &fallback)?;
        if !console.client.set_region(&region_id) {
            console.error("区域切换失败，已取消创建")?;
            return Ok(());
        }
        console.success(format!("当前区域已设置为: {}", console.client.region_id()))?;
    }
    let region_id = console.client.region_id().to_string();

    console.section("选择镜像")?;
    let image_id = console.ask("请输入镜像ID", &defaults.image_id)?;

    console.section("选择实例规格")?;
    let instance_type = console.ask("请输入实例规格", &defaults.instance_type)?;

    console.section("输入密码")?;
    let password = console.ask("请输入密码", defaults.password.as_deref().unwrap_or_default())?;

    console.section("设置带宽")?;
    let Some(bandwidth) = console.ask_number("请输入公网出带宽(Mbps)", defaults.internet_max_bandwidth_out)? else {
        return Ok(());
    };

    let Some(security_group_id) = choose_security_group(console, &region_id).await? else {
        return Ok(());
    };
    let Some(v_switch_id) = choose_vswitch(console, &region_id).await? else {
        return Ok(());
    };

    console.section("选择磁盘")?;
    let system_disk_category = console.ask("请输入系统盘类型", &defaults.system_disk_category)?;
    let Some(system_disk_size) = console.ask_number("请输入系统盘大小(GB)", defaults.system_disk_size)? else {
        return Ok(());
    };

    console.section("选择实例付费模式")?;
    let instance_charge_type = console.ask("请输入实例的付费方式", &defaults.instance_charge_type)?;

    console.section("选择网络带宽付费模式")?;
    let internet_charge_type = console.ask("请输入网络带宽计费方式", &defaults.internet_charge_type)?;

    console.section("选择竞价策略")?;
    let spot_strategy = console.ask("请输入竞价策略", &defaults.spot_strategy)?;
    let mut spot_duration = 0;
    if spot_strategy == SPOT_AS_PRICE_GO {
        console.section("竞价时长")?;
        let Some(duration) = console.ask_number("请输入竞价时长(小时), 0表示不限制", defaults.spot_duration)? else {
            return Ok(());
        };
        spot_duration = duration;
    }

    console.section("输入主机名称")?;
    let host_name = console.ask("请输入主机名称", &defaults.host_name)?;

    console.section("输入实例名称")?;
    let instance_name = console.ask("请输入实例名称", &defaults.instance_name)?;

    console.section("选择创建数量")?;
    let Some(amount) = console.ask_number("请输入创建数量", defaults.amount)? else {
        return Ok(());
    };

    let spec = InstanceSpec::builder()
        .region_id(region_id)
        .image_id(image_id)
        .instance_type(instance_type)
        .security_group_id(security_group_id)
        .v_switch_id(v_switch_id)
        .password(Some(password))
        .instance_name(Some(instance_name))
        .host_name(host_name)
        .internet_max_bandwidth_out(bandwidth)
        .internet_charge_type(internet_charge_type)
        .system_disk_category(system_disk_category)
        .system_disk_size(system_disk_size)
        .spot_strategy(spot_strategy)
        .spot_duration(spot_duration)
        .instance_charge_type(instance_charge_type)
        .amount(amount)
        .build();
    let spec = match spec {
        Ok(spec) => spec,
        Err(e) => {
            console.error(e)?;
            return Ok(());
        }
    };

    console.section("实例配置信息")?;
    writeln!(console.out, "{}", spec)?;

    if !console.ask_yes("确认创建实例?", true)? {
        console.error("取消创建实例")?;
        return Ok(());
    }

    provision(console, &spec).await
}

/// Show the security groups and read the chosen id; `None` aborts
pub(crate) async fn choose_security_group<T, P, W>(
    console: &mut Console<T, P, W>,
    region_id: &str,
) -> io::Result<Option<String>>
where
    T: RpcTransport,
    P: Prompter,
    W: Write,
{
    console.section("选择安全组")?;
    let groups = console
        .client
        .describe_all_security_group_rules(region_id)
        .await
        .unwrap_or_default();
    writeln!(console.out, "{}", display::security_groups_table(&groups))?;

    let default = console
        .settings
        .instance
        .security_group_id
        .clone()
        .unwrap_or_default();
    let security_group_id = console.ask("请输入安全组ID", &default)?;
    if security_group_id.is_empty() {
        console.error("安全组ID不能为空，创建实例失败")?;
        return Ok(None);
    }
    Ok(Some(security_group_id))
}

/// Show the vswitches and read the chosen id; `None` aborts
pub(crate) async fn choose_vswitch<T, P, W>(
    console: &mut Console<T, P, W>,
    region_id: &str,
) -> io::Result<Option<String>>
where
    T: RpcTransport,
    P: Prompter,
    W: Write,
{
    console.section("选择交换机")?;
    let vswitches = console
        .client
        .describe_vswitches(region_id)
        .await
        .unwrap_or_default();
    writeln!(console.out, "{}", display::vswitches_table(&vswitches))?;

    let default = console
        .settings
        .instance
        .v_switch_id
        .clone()
        .unwrap_or_default();
    let v_switch_id = console.ask("请输入VSwitchId", &default)?;
    if v_switch_id.is_empty() {
        console.error("虚拟交换机ID不能为空，创建实例失败")?;
        return Ok(None);
    }
    Ok(Some(v_switch_id))
}

/// Create instances from `spec` and wait for the first one to run
pub(crate) async fn provision<T, P, W>(
    console: &mut Console<T, P, W>,
    spec: &InstanceSpec,
) -> anyhow::Result<()>
where
    T: RpcTransport,
    P: Prompter,
    W: Write,
{
    console.warn("正在创建实例...")?;
    tracing::info!(
        region = spec.region_id(),
        instance_type = spec.instance_type(),
        amount = spec.amount(),
        "Creating instances"
    );

    let created = console.client.run_instances(spec).await;
    match created.as_ref().and_then(|c| c.first_id()) {
        Some(instance_id) => finish(console, spec.region_id(), instance_id).await?,
        None => console.error("创建实例失败")?,
    }
    Ok(())
}

async fn finish<T, P, W>(
    console: &mut Console<T, P, W>,
    region_id: &str,
    instance_id: &str,
) -> io::Result<()>
where
    T: RpcTransport,
    P: Prompter,
    W: Write,
{
    console.success(format!("实例创建请求已发送，实例ID: {}", instance_id))?;

    match wait_until_running(console, region_id, instance_id).await? {
        PollOutcome::Reached(_) => {
            console.success("实例创建成功，状态为 Running")?;
            let address = console.client.describe_instance_attribute(instance_id).await;
            writeln!(console.out, "{}", display::address_table(address.as_ref()))
        }
        PollOutcome::Exhausted { attempts, last } => {
            tracing::info!(
                instance_id,
                attempts,
                last = last.as_ref().and_then(|p| p.first_status()).unwrap_or("-"),
                "Instance not running yet"
            );
            console.error("实例创建尚未完成，可能需要更多时间")?;
            console.warn(format!("建议稍后使用 'status {}' 命令手动检查状态", instance_id))
        }
    }
}
