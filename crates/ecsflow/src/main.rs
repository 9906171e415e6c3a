mod commands;
mod console;
mod display;
mod prompt;

use clap::{Parser, Subcommand};
use colored::Colorize;
use console::{COMMANDS, Console};
use ecsflow_cloud_aliyun::AliyunClient;
use ecsflow_config::Settings;
use prompt::StdinPrompter;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "ecsflow")]
#[command(about = "阿里云ECS交互式管理工具", long_about = None)]
#[command(version)]
struct Cli {
    /// 配置文件路径
    #[arg(short, long, env = "ECSFLOW_CONFIG")]
    config: Option<PathBuf>,

    /// 启动时使用的区域（覆盖配置文件）
    #[arg(short, long)]
    region: Option<String>,

    /// 不显示启动横幅
    #[arg(long)]
    no_banner: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// 显示版本信息
    Version,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // stdout belongs to the console, diagnostics go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    if matches!(cli.command, Some(Commands::Version)) {
        println!("ecsflow {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    println!("{}", "正在初始化阿里云ECS管理工具...".blue());

    let settings = match load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{} {}", "初始化失败:".red().bold(), e);
            return ExitCode::FAILURE;
        }
    };

    let region = cli
        .region
        .clone()
        .unwrap_or_else(|| settings.region_id.clone());
    let credentials = &settings.credentials;
    let client = match AliyunClient::connect(
        &credentials.access_key_id,
        &credentials.access_key_secret,
        &region,
    ) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("{} {}", "初始化失败:".red().bold(), e);
            return ExitCode::FAILURE;
        }
    };

    println!(
        "{}",
        format!("成功连接到阿里云API，当前区域: {}", client.region_id())
            .green()
            .bold()
    );

    if !cli.no_banner {
        let entries: Vec<(&str, &str)> = COMMANDS.iter().map(|c| (c.name, c.summary)).collect();
        println!("{}", display::banner(&entries));
    }

    let mut console = Console::new(client, settings, StdinPrompter::new(), std::io::stdout());
    let result = console.run().await;

    if let Err(e) = &result {
        tracing::error!("Console stopped: {:#}", e);
        eprintln!("{}", format!("程序出错: {:#}", e).red().bold());
    }
    println!("{}", "感谢使用阿里云ECS管理工具，再见！".green().bold());

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

fn load(explicit: Option<&Path>) -> ecsflow_config::Result<Settings> {
    let path = ecsflow_config::find_settings_file(explicit)?;
    tracing::debug!(path = %path.display(), "Loading settings");
    ecsflow_config::load_settings(&path)
}
