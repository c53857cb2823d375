use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 控制台连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// 控制台基地址（不含尾部斜杠），例如 https://nexpose.example.com:3780
    #[serde(default = "ConsoleConfig::default_base_url")]
    pub base_url: String,
    /// 登录用户名
    #[serde(default)]
    pub username: Option<String>,
    /// 登录密码（建议通过环境变量提供，不要写入配置文件）
    #[serde(default)]
    pub password: Option<String>,
    /// 多租户控制台的 silo 标识
    #[serde(default)]
    pub silo_id: Option<String>,
    /// 单次请求超时（秒）
    #[serde(default = "ConsoleConfig::default_timeout_secs")]
    pub timeout_secs: u64,
    /// 是否接受自签名证书（控制台默认使用自签名证书）
    #[serde(default = "ConsoleConfig::default_accept_invalid_certs")]
    pub accept_invalid_certs: bool,
    /// 请求 User-Agent
    #[serde(default = "ConsoleConfig::default_user_agent")]
    pub user_agent: String,
}

impl ConsoleConfig {
    fn default_base_url() -> String {
        "https://localhost:3780".to_string()
    }
    fn default_timeout_secs() -> u64 {
        120
    }
    fn default_accept_invalid_certs() -> bool {
        true
    }
    fn default_user_agent() -> String {
        concat!("nexpose-shared-cred/", env!("CARGO_PKG_VERSION")).to_string()
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            username: None,
            password: None,
            silo_id: None,
            timeout_secs: Self::default_timeout_secs(),
            accept_invalid_certs: Self::default_accept_invalid_certs(),
            user_agent: Self::default_user_agent(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别（EnvFilter 语法，RUST_LOG 优先）
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,
    /// 日志格式：full|compact
    #[serde(default = "LoggingConfig::default_format")]
    pub format: String,
}

impl LoggingConfig {
    fn default_level() -> String {
        "nexpose_shared_cred=info".to_string()
    }
    fn default_format() -> String {
        "full".to_string()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            format: Self::default_format(),
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// 控制台连接配置
    #[serde(default)]
    pub console: ConsoleConfig,
    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// 从当前目录的 config.toml 加载配置（文件可缺省），支持环境变量覆盖
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::get_config_path())
    }

    /// 从指定路径加载配置，环境变量覆盖，例如：NEXPOSE_CONSOLE__BASE_URL
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        tracing::debug!("正在从 {:?} 加载配置文件", path);

        let builder = ConfigBuilder::builder()
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix("NEXPOSE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = builder.try_deserialize()?;

        tracing::debug!(
            "配置加载完成: base_url = {}, username = {:?}, password = {}",
            config.console.base_url,
            config.console.username,
            if config.console.password.is_some() {
                "<已设置>"
            } else {
                "<未设置>"
            }
        );

        Ok(config)
    }

    /// 获取配置文件路径
    fn get_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }
}
