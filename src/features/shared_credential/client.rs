use super::models::{SharedCredential, SharedCredentialSummary};
use crate::data_table::{DEFAULT_PAGE_SIZE, fetch_json_table};
use crate::error::ConsoleError;
use crate::transport::ConsoleTransport;

pub const LISTING_PATH: &str = "/data/credential/shared/listing";
pub const LISTING_TABLE_ID: &str = "credential-listing";
pub const DELETE_PATH: &str = "/data/credential/shared/delete";
pub const GET_PATH: &str = "/data/credential/shared/get";
pub const SAVE_PATH: &str = "/data/credential/shared/save";

/// 保存成功时响应中出现的标记
pub const SAVE_SUCCESS_MARKER: &str = r#"success="1""#;

/// 列出控制台上的全部共享凭据
pub async fn list_shared_credentials<T: ConsoleTransport>(
    console: &T,
) -> Result<Vec<SharedCredentialSummary>, ConsoleError> {
    let rows = fetch_json_table(
        console,
        LISTING_PATH,
        &[
            ("sort", "-1".to_string()),
            ("table-id", LISTING_TABLE_ID.to_string()),
        ],
        DEFAULT_PAGE_SIZE,
    )
    .await?;

    tracing::debug!("共享凭据列表返回 {} 条", rows.len());
    rows.iter().map(SharedCredentialSummary::from_json).collect()
}

/// 删除指定 ID 的共享凭据；响应内容不做校验
pub async fn delete_shared_credential<T: ConsoleTransport>(
    console: &T,
    id: i64,
) -> Result<(), ConsoleError> {
    tracing::info!("删除共享凭据 credid={}", id);
    console
        .post(&format!("{DELETE_PATH}?credid={id}"), None)
        .await?
        .into_success_body()?;
    Ok(())
}

impl SharedCredentialSummary {
    /// 从控制台删除该凭据（本地对象不受影响）
    pub async fn delete<T: ConsoleTransport>(&self, console: &T) -> Result<(), ConsoleError> {
        delete_shared_credential(console, self.identity.id).await
    }
}

impl SharedCredential {
    /// 按 ID 加载完整凭据；响应中没有 `Credential` 元素时返回 NotFound
    pub async fn load<T: ConsoleTransport>(console: &T, id: i64) -> Result<Self, ConsoleError> {
        tracing::debug!("加载共享凭据 credid={}", id);
        let body = console
            .get(&format!("{GET_PATH}?credid={id}"))
            .await?
            .into_success_body()?;
        Self::parse(&body)?
            .ok_or_else(|| ConsoleError::NotFound(format!("共享凭据 credid={id}")))
    }

    /// 保存到控制台，返回控制台是否确认成功。
    ///
    /// 只要响应体包含 `success="1"` 即视为成功，HTTP 状态码不参与判断；
    /// 仅在请求未能完成时返回 `Err`。
    pub async fn save<T: ConsoleTransport>(&self, console: &T) -> Result<bool, ConsoleError> {
        let payload = self.to_xml()?;
        let response = console.post(SAVE_PATH, Some(payload)).await?;
        let saved = response.body.contains(SAVE_SUCCESS_MARKER);
        if saved {
            tracing::info!(
                "共享凭据已保存: id={} name={}",
                self.identity.id,
                self.identity.name
            );
        } else {
            tracing::warn!(
                "控制台未确认保存共享凭据: id={} status={}",
                self.identity.id,
                response.status
            );
        }
        Ok(saved)
    }

    /// 从控制台删除该凭据（本地对象不受影响）
    pub async fn delete<T: ConsoleTransport>(&self, console: &T) -> Result<(), ConsoleError> {
        delete_shared_credential(console, self.identity.id).await
    }
}
