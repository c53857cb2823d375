use thiserror::Error;

/// 控制台访问统一错误类型
///
/// 区分三类失败：
/// - 请求未到达控制台（`Network` / `Timeout`）或 HTTP 层失败（`Http` / `Unauthorized`）；
/// - 控制台有响应但内容结构不符合预期（`Json` / `Xml` / `MissingField` / `InvalidField`）；
/// - 响应中没有目标记录（`NotFound`）。
///
/// 保存失败（响应中没有成功标记）不属于错误，由 `save` 返回 `false` 表示。
#[derive(Error, Debug)]
pub enum ConsoleError {
    /// 网络请求错误
    #[error("网络错误: {0}")]
    Network(String),

    /// 请求超时（包含 connect/read 等阶段）
    #[error("请求超时")]
    Timeout,

    /// 控制台返回非 2xx 状态码
    #[error("HTTP 错误: status={status} body={body}")]
    Http { status: u16, body: String },

    /// 会话失效或未登录（HTTP 401）
    #[error("未授权: {0}")]
    Unauthorized(String),

    /// 登录被控制台拒绝
    #[error("登录失败: {0}")]
    Auth(String),

    /// JSON 解析错误
    #[error("JSON 解析错误: {0}")]
    Json(String),

    /// XML 解析/生成错误
    #[error("XML 错误: {0}")]
    Xml(String),

    /// 缺少必需字段
    #[error("缺少必需字段: {0}")]
    MissingField(String),

    /// 字段取值非法
    #[error("字段 {field} 取值非法: {value}")]
    InvalidField { field: String, value: String },

    /// 未找到目标记录
    #[error("未找到: {0}")]
    NotFound(String),

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),
}

impl ConsoleError {
    /// 是否为“请求未能到达控制台”类错误
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ConsoleError::Network(_)
                | ConsoleError::Timeout
                | ConsoleError::Http { .. }
                | ConsoleError::Unauthorized(_)
        )
    }

    pub(crate) fn missing(field: impl Into<String>) -> Self {
        ConsoleError::MissingField(field.into())
    }

    pub(crate) fn invalid(field: impl Into<String>, value: impl Into<String>) -> Self {
        ConsoleError::InvalidField {
            field: field.into(),
            value: value.into(),
        }
    }
}

// =============== Error conversions for common external errors ===============

impl From<reqwest::Error> for ConsoleError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ConsoleError::Timeout
        } else {
            ConsoleError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ConsoleError {
    fn from(err: serde_json::Error) -> Self {
        ConsoleError::Json(err.to_string())
    }
}

impl From<config::ConfigError> for ConsoleError {
    fn from(err: config::ConfigError) -> Self {
        ConsoleError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::ConsoleError;

    #[test]
    fn malformed_response_errors_are_not_transport_errors() {
        let err: ConsoleError = serde_json::from_str::<serde_json::Value>("{")
            .expect_err("invalid json")
            .into();
        assert!(matches!(err, ConsoleError::Json(_)));
        assert!(!err.is_transport());
        assert!(!ConsoleError::NotFound("credid=1".into()).is_transport());
    }
}
