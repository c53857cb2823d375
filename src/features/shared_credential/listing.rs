use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use super::models::{CredentialIdentity, ServiceType, SharedCredentialSummary};
use crate::error::ConsoleError;

/// 凭据对所有站点生效时的 scope 取值
pub const ALL_SITES_SCOPE: &str = "ALL_SITES_ENABLED_DEFAULT";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListingRecord {
    #[serde(rename = "credentialID")]
    credential_id: CredentialIdRef,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    service: Option<String>,
    #[serde(default)]
    domain: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    privilege_elevation_username: Option<String>,
    #[serde(default)]
    scope: Option<String>,
    last_modified: LastModified,
}

#[derive(Debug, Deserialize)]
struct CredentialIdRef {
    #[serde(rename = "ID")]
    id: i64,
}

#[derive(Debug, Deserialize)]
struct LastModified {
    /// 毫秒时间戳
    time: i64,
}

impl SharedCredentialSummary {
    /// 解析凭据列表中的一条 JSON 记录
    pub fn from_json(value: &Value) -> Result<Self, ConsoleError> {
        let record = ListingRecord::deserialize(value)?;

        // 控制台给的是毫秒，向下取整到秒
        let secs = record.last_modified.time.div_euclid(1000);
        let last_modified: DateTime<Utc> = DateTime::from_timestamp(secs, 0).ok_or_else(|| {
            ConsoleError::invalid("lastModified.time", record.last_modified.time.to_string())
        })?;

        Ok(Self {
            identity: CredentialIdentity {
                id: record.credential_id.id,
                name: record.name.unwrap_or_default(),
                service: ServiceType::from(record.service.as_deref().unwrap_or_default()),
                domain: record.domain,
                username: record.username,
                privilege_username: record.privilege_elevation_username,
                all_sites: record.scope.as_deref() == Some(ALL_SITES_SCOPE),
            },
            last_modified,
        })
    }
}
