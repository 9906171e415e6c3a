//! Interactive command loop
//!
//! One command runs to completion, including any status polling, before the
//! next line is read. The only state carried between commands is the client's
//! active region.

use crate::commands;
use crate::prompt::Prompter;
use colored::Colorize;
use ecsflow_cloud::{PollConfig, RpcTransport};
use ecsflow_cloud_aliyun::AliyunClient;
use ecsflow_config::Settings;
use std::fmt::Display;
use std::io::{self, Write};
use std::str::FromStr;

pub struct CommandInfo {
    pub name: &'static str,
    pub usage: &'static str,
    pub summary: &'static str,
}

pub const COMMANDS: &[CommandInfo] = &[
    CommandInfo { name: "create", usage: "create", summary: "创建新的ECS实例" },
    CommandInfo { name: "delete", usage: "delete <instance_id>", summary: "删除指定的ECS实例" },
    CommandInfo { name: "balance", usage: "balance", summary: "查询账户余额" },
    CommandInfo { name: "status", usage: "status <instance_id>", summary: "查询ECS状态" },
    CommandInfo { name: "query", usage: "query <instance_id>", summary: "查询ECS信息" },
    CommandInfo { name: "instances", usage: "instances", summary: "查询所有ECS信息" },
    CommandInfo { name: "instance_type", usage: "instance_type", summary: "查询规格信息列表" },
    CommandInfo { name: "templates", usage: "templates [page]", summary: "查询模板信息" },
    CommandInfo { name: "price", usage: "price", summary: "查询ECS价格" },
    CommandInfo { name: "regions", usage: "regions", summary: "查询可用地域" },
    CommandInfo { name: "region", usage: "region", summary: "显示当前区域" },
    CommandInfo { name: "setregion", usage: "setregion <region_id>", summary: "设置当前区域" },
    CommandInfo { name: "vswitches", usage: "vswitches", summary: "查询当前区域的交换机" },
    CommandInfo { name: "groups", usage: "groups", summary: "查询安全组及规则" },
    CommandInfo { name: "help", usage: "help [command]", summary: "显示帮助信息" },
    CommandInfo { name: "exit", usage: "exit | quit", summary: "退出程序" },
];

pub struct Console<T, P, W> {
    pub(crate) client: AliyunClient<T>,
    pub(crate) settings: Settings,
    pub(crate) prompter: P,
    pub(crate) out: W,
    pub(crate) poll: PollConfig,
}

impl<T, P, W> Console<T, P, W>
where
    T: RpcTransport,
    P: Prompter,
    W: Write,
{
    pub fn new(client: AliyunClient<T>, settings: Settings, prompter: P, out: W) -> Self {
        let poll = PollConfig::from_secs(
            settings.console.poll_interval_secs,
            settings.console.poll_max_attempts,
        );
        Self {
            client,
            settings,
            prompter,
            out,
            poll,
        }
    }

    /// Read and execute commands until `exit`, `quit` or end of input
    pub async fn run(&mut self) -> anyhow::Result<()> {
        let prompt = format!("{} ", "阿里云ECS >".cyan().bold());

        loop {
            let Some(line) = self.prompter.read_line(&prompt)? else {
                writeln!(self.out)?;
                break;
            };

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if !self.execute(line).await? {
                break;
            }
        }

        self.out.flush()?;
        Ok(())
    }

    /// Execute one command line; `false` ends the session
    ///
    /// Input closing while a command still waits for answers cancels that
    /// command and ends the session.
    pub async fn execute(&mut self, line: &str) -> anyhow::Result<bool> {
        match self.dispatch(line).await {
            Err(e) if is_input_closed(&e) => {
                tracing::info!(line, "Input closed mid-command");
                writeln!(self.out)?;
                self.warn("输入已结束，已取消当前操作")?;
                self.out.flush()?;
                Ok(false)
            }
            result => result,
        }
    }

    async fn dispatch(&mut self, line: &str) -> anyhow::Result<bool> {
        let (command, arg) = match line.split_once(char::is_whitespace) {
            Some((command, arg)) => (command, arg.trim()),
            None => (line, ""),
        };
        tracing::debug!(command, arg, "Executing command");

        match command {
            "create" => commands::create::handle(self).await?,
            "delete" => commands::delete::handle(self, arg).await?,
            "status" => commands::instance::status(self, arg).await?,
            "query" => commands::instance::query(self, arg).await?,
            "instances" => commands::instance::list(self).await?,
            "instance_type" => commands::catalog::instance_types(self).await?,
            "templates" => commands::catalog::templates(self, arg).await?,
            "vswitches" => commands::catalog::vswitches(self).await?,
            "groups" => commands::catalog::security_groups(self).await?,
            "balance" => commands::account::balance(self).await?,
            "price" => commands::account::price(self).await?,
            "setregion" => commands::region::set(self, arg)?,
            "region" => commands::region::show(self)?,
            "regions" => commands::region::list(self).await?,
            "help" => self.help(arg)?,
            "exit" | "quit" => return Ok(false),
            _ => {
                self.error(format!("未知命令: {}", line))?;
                writeln!(self.out, "输入 {} 查看可用命令", "help".green().bold())?;
            }
        }

        self.out.flush()?;
        Ok(true)
    }

    fn help(&mut self, arg: &str) -> io::Result<()> {
        if arg.is_empty() {
            self.info("可用命令:")?;
            for command in COMMANDS {
                writeln!(
                    self.out,
                    "  {} - {}",
                    format!("{:<14}", command.name).green().bold(),
                    command.summary
                )?;
            }
            return Ok(());
        }

        let found = COMMANDS
            .iter()
            .find(|c| c.name == arg || (c.name == "exit" && arg == "quit"));
        match found {
            Some(command) => {
                writeln!(self.out, "{}", command.summary)?;
                writeln!(self.out, "用法: {}", command.usage.green().bold())
            }
            None => self.error(format!("未知命令: {}", arg)),
        }
    }

    // Output helpers

    pub(crate) fn success(&mut self, message: impl Display) -> io::Result<()> {
        writeln!(self.out, "{}", message.to_string().green().bold())
    }

    pub(crate) fn warn(&mut self, message: impl Display) -> io::Result<()> {
        writeln!(self.out, "{}", message.to_string().yellow().bold())
    }

    pub(crate) fn error(&mut self, message: impl Display) -> io::Result<()> {
        writeln!(self.out, "{}", message.to_string().red().bold())
    }

    pub(crate) fn info(&mut self, message: impl Display) -> io::Result<()> {
        writeln!(self.out, "{}", message.to_string().cyan().bold())
    }

    pub(crate) fn section(&mut self, title: &str) -> io::Result<()> {
        writeln!(self.out, "\n{}", format!("===== {} =====", title).cyan().bold())
    }

    pub(crate) fn usage(&mut self, usage: &str) -> io::Result<()> {
        self.error("错误: 请指定实例ID")?;
        writeln!(self.out, "用法: {}", usage.green().bold())
    }

    // Input helpers

    /// Ask for a value; an empty answer yields `default`
    ///
    /// End of input is an `UnexpectedEof` error, never a default.
    pub(crate) fn ask(&mut self, label: &str, default: &str) -> io::Result<String> {
        let prompt = if default.is_empty() {
            format!("{}: ", label)
        } else {
            format!("{} [默认: {}]: ", label, default)
        };

        let Some(answer) = self.prompter.read_line(&prompt)? else {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "输入已结束"));
        };
        let answer = answer.trim();
        Ok(if answer.is_empty() {
            default.to_string()
        } else {
            answer.to_string()
        })
    }

    pub(crate) fn ask_yes(&mut self, label: &str, default_yes: bool) -> io::Result<bool> {
        let default = if default_yes { "y" } else { "n" };
        let answer = self.ask(&format!("{} (y/n)", label), default)?;
        Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
    }

    /// Ask for a number; `None` after reporting an unparsable answer
    pub(crate) fn ask_number<N>(&mut self, label: &str, default: N) -> io::Result<Option<N>>
    where
        N: FromStr + Display,
    {
        let answer = self.ask(label, &default.to_string())?;
        match answer.parse() {
            Ok(value) => Ok(Some(value)),
            Err(_) => {
                self.error(format!("{} 必须是有效的数字，输入值: {}", label, answer))?;
                Ok(None)
            }
        }
    }
}

fn is_input_closed(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<io::Error>()
        .is_some_and(|e| e.kind() == io::ErrorKind::UnexpectedEof)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::prompt::ScriptedPrompter;
    use ecsflow_cloud::MockTransport;
    use serde_json::json;

    pub(crate) type TestConsole = Console<MockTransport, ScriptedPrompter, Vec<u8>>;

    const SETTINGS: &str = "\
aliyun:
  access_key_id: AKID
  access_key_secret: SECRET
instance:
  security_group_id: sg-default
console:
  poll_interval_secs: 0
  poll_max_attempts: 2
";

    pub(crate) fn console(mock: MockTransport, script: &[&str]) -> TestConsole {
        console_with(SETTINGS, mock, script)
    }

    pub(crate) fn console_with(settings: &str, mock: MockTransport, script: &[&str]) -> TestConsole {
        colored::control::set_override(false);
        let settings = ecsflow_config::parse_settings(settings).unwrap();
        let client = AliyunClient::with_transport(mock, &settings.region_id).unwrap();
        Console::new(
            client,
            settings,
            ScriptedPrompter::new(script.iter().copied()),
            Vec::new(),
        )
    }

    pub(crate) fn output(console: &TestConsole) -> String {
        String::from_utf8_lossy(&console.out).into_owned()
    }

    #[tokio::test]
    async fn test_run_until_exit() {
        let mut console = console(MockTransport::new(), &["", "  ", "region", "exit", "region"]);
        console.run().await.unwrap();

        assert!(output(&console).contains("当前区域: cn-hangzhou"));
        // the line after exit is never read
        assert_eq!(console.prompter.remaining(), 1);
    }

    #[tokio::test]
    async fn test_run_ends_at_end_of_input() {
        let mut console = console(MockTransport::new(), &[]);
        console.run().await.unwrap();
        assert_eq!(console.prompter.prompts, vec!["阿里云ECS > ".to_string()]);
    }

    #[tokio::test]
    async fn test_unknown_command() {
        let mut console = console(MockTransport::new(), &[]);
        assert!(console.execute("launch now").await.unwrap());

        let out = output(&console);
        assert!(out.contains("未知命令: launch now"));
        assert!(out.contains("输入 help 查看可用命令"));
    }

    #[tokio::test]
    async fn test_quit_ends_session() {
        let mut console = console(MockTransport::new(), &[]);
        assert!(!console.execute("quit").await.unwrap());
        assert!(!console.execute("exit").await.unwrap());
    }

    #[tokio::test]
    async fn test_help() {
        let mut console = console(MockTransport::new(), &[]);
        console.execute("help").await.unwrap();
        let out = output(&console);
        for command in COMMANDS {
            assert!(out.contains(command.name), "missing {}", command.name);
        }

        let mut console = console_with_help("delete").await;
        assert!(output(&console).contains("用法: delete <instance_id>"));

        console.out.clear();
        console.execute("help nothing").await.unwrap();
        assert!(output(&console).contains("未知命令: nothing"));
    }

    async fn console_with_help(command: &str) -> TestConsole {
        let mut console = console(MockTransport::new(), &[]);
        console.execute(&format!("help {}", command)).await.unwrap();
        console
    }

    #[test]
    fn test_ask_defaults() {
        let mut console = console(MockTransport::new(), &["", "  value  "]);

        assert_eq!(console.ask("镜像ID", "img-1").unwrap(), "img-1");
        assert_eq!(console.ask("镜像ID", "img-1").unwrap(), "value");
        assert_eq!(console.prompter.prompts[0], "镜像ID [默认: img-1]: ");
    }

    #[test]
    fn test_ask_at_end_of_input_is_not_a_default() {
        let mut console = console(MockTransport::new(), &[]);

        let err = console.ask("镜像ID", "img-1").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
        assert!(console.ask_yes("确认?", true).is_err());
    }

    #[tokio::test]
    async fn test_input_closed_mid_command_ends_session() {
        let mut console = console(MockTransport::new(), &["delete i-bp1", "yes"]);
        console.run().await.unwrap();

        assert!(output(&console).contains("输入已结束，已取消当前操作"));
        assert!(console.client.transport().calls().is_empty());
    }

    #[test]
    fn test_ask_number_rejects_garbage() {
        let mut console = console(MockTransport::new(), &["abc", "8"]);

        assert_eq!(console.ask_number("带宽", 5u32).unwrap(), None);
        assert!(output(&console).contains("带宽 必须是有效的数字，输入值: abc"));
        assert_eq!(console.ask_number("带宽", 5u32).unwrap(), Some(8));
    }

    #[tokio::test]
    async fn test_command_failure_keeps_loop_alive() {
        let mock = MockTransport::new().with_transport_error("DescribeInstances", "connection refused");
        let mut console = console(mock, &["instances", "exit"]);

        console.run().await.unwrap();
        assert!(output(&console).contains("暂无实例数据"));
    }

    #[tokio::test]
    async fn test_instances_table() {
        let mock = MockTransport::new().with_reply(
            "DescribeInstances",
            json!({"Instances": {"Instance": [{
                "InstanceId": "i-bp1",
                "OSName": "Ubuntu 20.04 64位",
                "Status": "Running",
                "PublicIpAddress": {"IpAddress": ["47.1.2.3"]}
            }]}}),
        );
        let mut console = console(mock, &[]);
        console.execute("instances").await.unwrap();

        let out = output(&console);
        assert!(out.contains("i-bp1"));
        assert!(out.contains("47.1.2.3"));
    }
}
