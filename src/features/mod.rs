/// 控制台会话与传输实现
pub mod session;

/// 共享凭据
pub mod shared_credential;
