use std::future::Future;

use crate::error::ConsoleError;

/// 控制台原始响应：状态码与响应体文本。
///
/// 传输层不解释状态码，由各操作自行决定（例如保存操作只看响应体中的成功标记）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleResponse {
    pub status: u16,
    pub body: String,
}

impl ConsoleResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 要求 2xx，返回响应体；401 归为会话失效，其余非 2xx 归为 HTTP 错误
    pub fn into_success_body(self) -> Result<String, ConsoleError> {
        match self.status {
            s if (200..300).contains(&s) => Ok(self.body),
            401 => Err(ConsoleError::Unauthorized(
                "会话无效或已过期，请重新登录".to_string(),
            )),
            status => Err(ConsoleError::Http {
                status,
                body: self.body,
            }),
        }
    }
}

/// 控制台传输层契约。
///
/// 路径均为相对控制台根的路径（可带查询串），实现负责附加会话信息。
/// 返回 `Err` 仅表示请求未能完成（网络/超时等）。
pub trait ConsoleTransport {
    /// GET 请求
    fn get(&self, path: &str) -> impl Future<Output = Result<ConsoleResponse, ConsoleError>> + Send;

    /// POST 请求，`body` 为 XML 载荷（可为空）
    fn post(
        &self,
        path: &str,
        body: Option<String>,
    ) -> impl Future<Output = Result<ConsoleResponse, ConsoleError>> + Send;

    /// 表单 POST（application/x-www-form-urlencoded）
    fn post_form(
        &self,
        path: &str,
        form: &[(String, String)],
    ) -> impl Future<Output = Result<ConsoleResponse, ConsoleError>> + Send;
}


/// 单元测试用的内存控制台：按顺序回放预置响应，并记录收到的请求。
#[cfg(test)]
pub(crate) mod fake {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::{ConsoleResponse, ConsoleTransport};
    use crate::error::ConsoleError;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub(crate) enum Recorded {
        Get(String),
        Post(String, Option<String>),
        PostForm(String, Vec<(String, String)>),
    }

    #[derive(Default)]
    pub(crate) struct FakeConsole {
        responses: Mutex<VecDeque<Result<ConsoleResponse, ConsoleError>>>,
        requests: Mutex<Vec<Recorded>>,
    }

    impl FakeConsole {
        pub(crate) fn with_responses(
            responses: impl IntoIterator<Item = Result<ConsoleResponse, ConsoleError>>,
        ) -> Self {
            Self {
                responses: Mutex::new(responses.into_iter().collect()),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn ok(bodies: &[&str]) -> Self {
            Self::with_responses(bodies.iter().map(|b| Ok(ConsoleResponse::new(200, *b))))
        }

        pub(crate) fn requests(&self) -> Vec<Recorded> {
            self.requests.lock().unwrap().clone()
        }

        fn next(&self, request: Recorded) -> Result<ConsoleResponse, ConsoleError> {
            self.requests.lock().unwrap().push(request);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ConsoleError::Network("没有预置响应".to_string())))
        }
    }

    impl ConsoleTransport for FakeConsole {
        async fn get(&self, path: &str) -> Result<ConsoleResponse, ConsoleError> {
            self.next(Recorded::Get(path.to_string()))
        }

        async fn post(
            &self,
            path: &str,
            body: Option<String>,
        ) -> Result<ConsoleResponse, ConsoleError> {
            self.next(Recorded::Post(path.to_string(), body))
        }

        async fn post_form(
            &self,
            path: &str,
            form: &[(String, String)],
        ) -> Result<ConsoleResponse, ConsoleError> {
            self.next(Recorded::PostForm(path.to_string(), form.to_vec()))
        }
    }
}
