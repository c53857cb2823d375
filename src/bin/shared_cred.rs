//! 共享凭据管理命令行工具：
//! - 列出控制台上的共享凭据
//! - 查看单个凭据详情（默认脱敏）
//! - 从 XML 文件保存凭据
//! - 删除凭据
//!
//! 安全原则：密码默认从环境变量读取（避免进入 shell history），详情输出默认隐藏密钥类字段。

use std::env;
use std::fmt::{Display, Formatter};
use std::fs;

use nexpose_shared_cred::config::LoggingConfig;
use nexpose_shared_cred::features::shared_credential::{
    SharedCredential, SharedCredentialSummary, delete_shared_credential, list_shared_credentials,
};
use nexpose_shared_cred::{AppConfig, ConsoleConnection, ConsoleError};

const DEFAULT_PASSWORD_ENV: &str = "NEXPOSE_PASSWORD";
const MASK: &str = "******";

#[derive(Debug, Clone)]
struct Args {
    help: bool,
    json: bool,
    reveal: bool,
    base_url: Option<String>,
    user: Option<String>,
    password_env: String,
    timeout_secs: Option<u64>,
    cmd: Option<Command>,
}

#[derive(Debug, Clone)]
enum Command {
    Help,
    List,
    Show { id: i64, xml: bool },
    Delete { id: i64 },
    Save { path: String },
}

#[derive(Debug)]
enum CliError {
    Args(String),
    Config(String),
    Io(String),
    Console(ConsoleError),
    NotSaved,
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Args(msg) => write!(f, "参数错误: {msg}"),
            CliError::Config(msg) => write!(f, "配置错误: {msg}"),
            CliError::Io(msg) => write!(f, "文件读取失败: {msg}"),
            CliError::Console(err) => write!(f, "控制台错误: {err}"),
            CliError::NotSaved => write!(f, "控制台未确认保存（响应中没有成功标记）"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<ConsoleError> for CliError {
    fn from(err: ConsoleError) -> Self {
        CliError::Console(err)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse(env::args().skip(1).collect())?;
    let cmd = match args.cmd.clone() {
        Some(cmd) if !args.help && !matches!(cmd, Command::Help) => cmd,
        _ => {
            print_help();
            return Ok(());
        }
    };

    let mut config = AppConfig::load()?;
    init_tracing(&config.logging);

    if let Some(base_url) = args.base_url.clone() {
        config.console.base_url = base_url;
    }
    if let Some(user) = args.user.clone() {
        config.console.username = Some(user);
    }
    if let Some(timeout) = args.timeout_secs {
        config.console.timeout_secs = timeout;
    }
    if let Ok(password) = env::var(&args.password_env) {
        config.console.password = Some(password);
    }
    if config.console.password.is_none() {
        return Err(CliError::Config(format!(
            "未找到密码：请设置环境变量 `{}` 或 console.password",
            args.password_env
        ))
        .into());
    }

    let console = ConsoleConnection::login(&config.console).await?;

    let outcome = match cmd {
        Command::Help => {
            print_help();
            Ok(())
        }
        Command::List => run_list(&console, args.json).await,
        Command::Show { id, xml } => run_show(&console, id, xml, &args).await,
        Command::Delete { id } => run_delete(&console, id).await,
        Command::Save { path } => run_save(&console, &path).await,
    };

    if let Err(err) = console.logout().await {
        tracing::warn!("注销会话失败: {}", err);
    }

    if let Err(err) = outcome {
        eprintln!("{err}");
        std::process::exit(2);
    }
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let _ = if logging.format == "compact" {
        builder.compact().try_init()
    } else {
        builder.try_init()
    };
}

impl Args {
    fn parse(argv: Vec<String>) -> Result<Self, CliError> {
        let mut args = Self {
            help: false,
            json: false,
            reveal: false,
            base_url: None,
            user: None,
            password_env: DEFAULT_PASSWORD_ENV.to_string(),
            timeout_secs: None,
            cmd: None,
        };

        let mut idx = 0usize;
        while idx < argv.len() {
            match argv[idx].as_str() {
                "-h" | "--help" => args.help = true,
                "--json" => args.json = true,
                "--reveal" => args.reveal = true,
                "--base-url" => {
                    idx += 1;
                    args.base_url = Some(flag_value(&argv, idx, "--base-url")?);
                }
                "--user" => {
                    idx += 1;
                    args.user = Some(flag_value(&argv, idx, "--user")?);
                }
                "--password-env" => {
                    idx += 1;
                    args.password_env = flag_value(&argv, idx, "--password-env")?;
                }
                "--timeout-secs" => {
                    idx += 1;
                    let raw = flag_value(&argv, idx, "--timeout-secs")?;
                    args.timeout_secs = Some(raw.parse::<u64>().map_err(|_| {
                        CliError::Args(format!("--timeout-secs 需要整数，收到: {raw}"))
                    })?);
                }
                _ => break,
            }
            idx += 1;
        }

        if idx < argv.len() {
            args.cmd = Some(parse_command(&argv[idx], &argv[(idx + 1)..])?);
        }
        Ok(args)
    }
}

fn flag_value(argv: &[String], idx: usize, flag: &str) -> Result<String, CliError> {
    argv.get(idx)
        .cloned()
        .ok_or_else(|| CliError::Args(format!("缺少 {flag} 的值")))
}

fn parse_command(name: &str, rest: &[String]) -> Result<Command, CliError> {
    match name {
        "list" => Ok(Command::List),
        "show" => {
            let id = parse_id(rest.first(), "show")?;
            let xml = rest[1..].iter().any(|a| a == "--xml");
            Ok(Command::Show { id, xml })
        }
        "delete" => Ok(Command::Delete {
            id: parse_id(rest.first(), "delete")?,
        }),
        "save" => Ok(Command::Save {
            path: rest
                .first()
                .cloned()
                .ok_or_else(|| CliError::Args("save 需要 XML 文件路径".to_string()))?,
        }),
        "help" => Ok(Command::Help),
        _ => Err(CliError::Args(format!("未知命令: {name}"))),
    }
}

fn parse_id(raw: Option<&String>, cmd_name: &str) -> Result<i64, CliError> {
    let raw = raw.ok_or_else(|| CliError::Args(format!("{cmd_name} 需要凭据 ID")))?;
    raw.parse::<i64>()
        .map_err(|_| CliError::Args(format!("凭据 ID 需要整数，收到: {raw}")))
}

async fn run_list(console: &ConsoleConnection, json: bool) -> Result<(), CliError> {
    let creds = list_shared_credentials(console).await?;
    if json {
        println!("{}", to_json(&creds)?);
        return Ok(());
    }

    println!("{:>6}  {:<12}  {:<5}  {:<20}  name", "id", "type", "all", "last_modified");
    for c in &creds {
        print_summary_row(c);
    }
    println!("共 {} 条", creds.len());
    Ok(())
}

fn print_summary_row(c: &SharedCredentialSummary) {
    println!(
        "{:>6}  {:<12}  {:<5}  {:<20}  {}",
        c.identity.id,
        c.identity.service.as_str(),
        c.identity.all_sites,
        c.last_modified.format("%Y-%m-%d %H:%M:%S"),
        c.identity.name
    );
}

async fn run_show(
    console: &ConsoleConnection,
    id: i64,
    xml: bool,
    args: &Args,
) -> Result<(), CliError> {
    let mut cred = SharedCredential::load(console, id).await?;
    if !args.reveal {
        redact(&mut cred);
    }

    if xml {
        println!("{}", cred.to_xml()?);
    } else if args.json {
        println!("{}", to_json(&cred)?);
    } else {
        print!("{}", render_text(&cred));
    }
    Ok(())
}

async fn run_delete(console: &ConsoleConnection, id: i64) -> Result<(), CliError> {
    delete_shared_credential(console, id).await?;
    println!("已提交删除: credid={id}");
    Ok(())
}

async fn run_save(console: &ConsoleConnection, path: &str) -> Result<(), CliError> {
    let raw = fs::read_to_string(path).map_err(|e| CliError::Io(format!("{path}: {e}")))?;
    let cred = SharedCredential::parse(&raw)?
        .ok_or_else(|| CliError::Args(format!("{path} 中没有 Credential 元素")))?;

    if cred.save(console).await? {
        println!("已保存: {}", cred.identity.name);
        Ok(())
    } else {
        Err(CliError::NotSaved)
    }
}

/// 隐藏密钥类字段（只替换有值的字段，保留“是否设置”的信息）
fn redact(cred: &mut SharedCredential) {
    for secret in [
        &mut cred.password,
        &mut cred.ntlm_hash,
        &mut cred.pem_key,
        &mut cred.privilege_password,
        &mut cred.privacy_password,
    ] {
        if secret.is_some() {
            *secret = Some(MASK.to_string());
        }
    }
}

fn render_text(cred: &SharedCredential) -> String {
    let opt = |v: &Option<String>| v.clone().unwrap_or_default();
    let mut out = String::new();
    out.push_str(&format!("id: {}\n", cred.identity.id));
    out.push_str(&format!("name: {}\n", cred.identity.name));
    out.push_str(&format!("type: {}\n", cred.identity.service));
    out.push_str(&format!("description: {}\n", opt(&cred.description)));
    out.push_str(&format!("domain: {}\n", opt(&cred.identity.domain)));
    out.push_str(&format!("username: {}\n", opt(&cred.identity.username)));
    out.push_str(&format!("password: {}\n", opt(&cred.password)));
    out.push_str(&format!(
        "privilege: type={} username={} password={}\n",
        opt(&cred.privilege_type),
        opt(&cred.identity.privilege_username),
        opt(&cred.privilege_password)
    ));
    if let Some(host) = cred.host.as_deref() {
        out.push_str(&format!("host: {host}\n"));
    }
    if let Some(port) = cred.port {
        out.push_str(&format!("port: {port}\n"));
    }
    out.push_str(&format!("all_sites: {}\n", cred.identity.all_sites));
    out.push_str(&format!("sites: {:?}\n", cred.sites));
    out.push_str(&format!("disabled: {:?}\n", cred.disabled));
    out
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, CliError> {
    serde_json::to_string_pretty(value).map_err(|e| CliError::Console(e.into()))
}

fn print_help() {
    println!(
        r#"shared-cred（共享凭据管理工具）

用法（推荐：通过环境变量提供密码）：
  NEXPOSE_PASSWORD='...' shared-cred --base-url https://console:3780 --user nxadmin list

命令：
  list                  列出全部共享凭据
  show <id> [--xml]     查看凭据详情（--xml 输出保存载荷）
  delete <id>           删除凭据
  save <file.xml>       从 XML 文件保存凭据
  help                  显示帮助

全局参数：
  --base-url URL        控制台地址（默认取 config.toml / NEXPOSE_CONSOLE__BASE_URL）
  --user NAME           登录用户名
  --password-env NAME   密码环境变量名（默认 NEXPOSE_PASSWORD）
  --timeout-secs N      请求超时（秒）
  --json                以 JSON 输出
  --reveal              详情中显示密码/私钥等敏感字段
"#
    );
}
