use reqwest::Client;
use std::time::Duration;

use crate::config::ConsoleConfig;

/// 按控制台配置构建 HTTP Client。
///
/// 说明：
/// - timeout 由传输层统一负责，上层操作不再单独设置；
/// - 控制台默认使用自签名证书，`accept_invalid_certs` 默认开启；
/// - `Client` 内部带连接池，一个 `ConsoleConnection` 复用同一个实例。
pub fn console_client(config: &ConsoleConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(config.user_agent.clone())
        .danger_accept_invalid_certs(config.accept_invalid_certs)
        .build()
}
