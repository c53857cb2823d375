/// 统一错误处理模块
pub mod error;

/// 配置模块
pub mod config;

/// 功能聚合模块
pub mod features;

/// HTTP Client 构建
pub mod http;

/// 控制台传输层契约
pub mod transport;

/// 分页 JSON 表格拉取
pub mod data_table;

/// 轻量 XML 元素树
pub mod xml;

// 导出常用类型供外部使用
pub use config::AppConfig;
pub use error::ConsoleError;
pub use features::session::ConsoleConnection;
pub use features::shared_credential::{SharedCredential, SharedCredentialSummary};
pub use transport::{ConsoleResponse, ConsoleTransport};
