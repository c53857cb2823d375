use reqwest::header::{CONTENT_TYPE, COOKIE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, RequestBuilder};

use super::models::{
    login_request_xml, logout_request_xml, parse_login_response, parse_logout_response,
};
use crate::config::ConsoleConfig;
use crate::error::ConsoleError;
use crate::transport::{ConsoleResponse, ConsoleTransport};

/// 会话请求头/Cookie 名称
pub const SESSION_HEADER: &str = "nexposeCCSessionID";
/// XML API 1.1 入口
pub const API_XML_PATH: &str = "/api/1.1/xml";

const XML_CONTENT_TYPE: &str = "text/xml; charset=UTF-8";

/// 已登录的控制台连接
#[derive(Clone)]
pub struct ConsoleConnection {
    client: Client,
    base_url: String,
    session_id: String,
    session_headers: HeaderMap,
}

impl std::fmt::Debug for ConsoleConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // session id 等同凭据，不输出
        f.debug_struct("ConsoleConnection")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ConsoleConnection {
    /// 使用已有 session id 构建连接（不发起登录）
    pub fn with_session(
        config: &ConsoleConfig,
        session_id: impl Into<String>,
    ) -> Result<Self, ConsoleError> {
        let client = crate::http::console_client(config)?;
        Self::from_parts(client, &config.base_url, session_id.into())
    }

    fn from_parts(client: Client, base_url: &str, session_id: String) -> Result<Self, ConsoleError> {
        let invalid = |_| ConsoleError::Auth("session id 含非法字符".to_string());

        let mut session_headers = HeaderMap::new();
        session_headers.insert(
            HeaderName::from_static("nexposeccsessionid"),
            HeaderValue::from_str(&session_id).map_err(invalid)?,
        );
        session_headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("{SESSION_HEADER}={session_id}")).map_err(invalid)?,
        );

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session_id,
            session_headers,
        })
    }

    /// 使用配置中的用户名/密码登录
    pub async fn login(config: &ConsoleConfig) -> Result<Self, ConsoleError> {
        let username = config
            .username
            .as_deref()
            .ok_or_else(|| ConsoleError::Config("未配置 console.username".to_string()))?;
        let password = config
            .password
            .as_deref()
            .ok_or_else(|| ConsoleError::Config("未配置 console.password".to_string()))?;

        let client = crate::http::console_client(config)?;
        let base_url = config.base_url.trim_end_matches('/');
        let payload = login_request_xml(username, password, config.silo_id.as_deref())?;

        tracing::info!("登录控制台 {} (user={})", base_url, username);
        let response = client
            .post(format!("{base_url}{API_XML_PATH}"))
            .header(CONTENT_TYPE, XML_CONTENT_TYPE)
            .body(payload)
            .send()
            .await?;
        let body = read_response(response).await?.into_success_body()?;
        let session_id = parse_login_response(&body)?;
        tracing::debug!("登录成功");

        Self::from_parts(client, base_url, session_id)
    }

    /// 注销当前会话
    pub async fn logout(&self) -> Result<(), ConsoleError> {
        let payload = logout_request_xml(&self.session_id)?;
        let body = self
            .post(API_XML_PATH, Some(payload))
            .await?
            .into_success_body()?;
        parse_logout_response(&body)?;
        tracing::info!("已注销控制台会话 {}", self.base_url);
        Ok(())
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.headers(self.session_headers.clone())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn read_response(response: reqwest::Response) -> Result<ConsoleResponse, ConsoleError> {
    let status = response.status().as_u16();
    let body = response.text().await?;
    Ok(ConsoleResponse { status, body })
}

impl ConsoleTransport for ConsoleConnection {
    async fn get(&self, path: &str) -> Result<ConsoleResponse, ConsoleError> {
        tracing::debug!("GET {}", path);
        let response = self.request(self.client.get(self.url(path))).send().await?;
        read_response(response).await
    }

    async fn post(&self, path: &str, body: Option<String>) -> Result<ConsoleResponse, ConsoleError> {
        tracing::debug!("POST {}", path);
        let mut builder = self.request(self.client.post(self.url(path)));
        if let Some(body) = body {
            builder = builder.header(CONTENT_TYPE, XML_CONTENT_TYPE).body(body);
        }
        read_response(builder.send().await?).await
    }

    async fn post_form(
        &self,
        path: &str,
        form: &[(String, String)],
    ) -> Result<ConsoleResponse, ConsoleError> {
        tracing::debug!("POST(form) {}", path);
        let response = self
            .request(self.client.post(self.url(path)))
            .form(form)
            .send()
            .await?;
        read_response(response).await
    }
}
