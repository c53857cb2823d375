use crate::error::ConsoleError;
use crate::xml::XmlElement;

/// 构建 API 1.1 登录请求
pub fn login_request_xml(
    username: &str,
    password: &str,
    silo_id: Option<&str>,
) -> Result<String, ConsoleError> {
    let mut request = XmlElement::new("LoginRequest")
        .with_attribute("user-id", username)
        .with_attribute("password", password);
    if let Some(silo) = silo_id {
        request = request.with_attribute("silo-id", silo);
    }
    request.to_xml_string()
}

/// 构建 API 1.1 登出请求
pub fn logout_request_xml(session_id: &str) -> Result<String, ConsoleError> {
    XmlElement::new("LogoutRequest")
        .with_attribute("session-id", session_id)
        .to_xml_string()
}

/// 解析登录响应，返回 session id
pub fn parse_login_response(body: &str) -> Result<String, ConsoleError> {
    let root = expect_success(body, "LoginResponse")?;
    root.attribute("session-id")
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ConsoleError::missing("LoginResponse@session-id"))
}

/// 解析登出响应
pub fn parse_logout_response(body: &str) -> Result<(), ConsoleError> {
    expect_success(body, "LogoutResponse").map(|_| ())
}

fn expect_success(body: &str, root_name: &str) -> Result<XmlElement, ConsoleError> {
    let root = XmlElement::parse_document(body)?
        .ok_or_else(|| ConsoleError::Xml(format!("响应中缺少 {root_name}")))?;

    if root.name == root_name && root.attribute("success") == Some("1") {
        return Ok(root);
    }

    let message = failure_message(&root).unwrap_or_else(|| format!("{root_name} 未返回成功标记"));
    Err(ConsoleError::Auth(message))
}

/// 提取控制台失败信息（`Failure/message` 或 `Failure/Exception/message`）
fn failure_message(root: &XmlElement) -> Option<String> {
    let failure = if root.name == "Failure" {
        Some(root)
    } else {
        root.child("Failure")
    }?;
    failure
        .child("message")
        .or_else(|| failure.find("Exception/message"))
        .or_else(|| failure.child("Message"))
        .and_then(|m| m.text())
        .map(|m| m.trim().to_string())
}
