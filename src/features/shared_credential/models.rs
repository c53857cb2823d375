use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

/// 尚未保存到控制台的凭据 ID
pub const NEW_CREDENTIAL_ID: i64 = -1;

/// 凭据服务类型（控制台的 service 名称）
///
/// 未识别的名称保存在 `Other` 中，原样回写。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ServiceType {
    As400,
    Cifs,
    CifsHash,
    Cvs,
    Db2,
    Ftp,
    Http,
    MsSql,
    MySql,
    Notes,
    Ntlm,
    Oracle,
    Pop,
    PostgreSql,
    RemoteExec,
    Snmp,
    SnmpV3,
    Ssh,
    SshKey,
    Sybase,
    Telnet,
    Other(String),
}

impl ServiceType {
    pub fn as_str(&self) -> &str {
        match self {
            ServiceType::As400 => "as400",
            ServiceType::Cifs => "cifs",
            ServiceType::CifsHash => "cifshash",
            ServiceType::Cvs => "cvs",
            ServiceType::Db2 => "db2",
            ServiceType::Ftp => "ftp",
            ServiceType::Http => "http",
            ServiceType::MsSql => "ms-sql",
            ServiceType::MySql => "mysql",
            ServiceType::Notes => "notes",
            ServiceType::Ntlm => "ntlm",
            ServiceType::Oracle => "oracle",
            ServiceType::Pop => "pop",
            ServiceType::PostgreSql => "postgresql",
            ServiceType::RemoteExec => "remote-exec",
            ServiceType::Snmp => "snmp",
            ServiceType::SnmpV3 => "snmpv3",
            ServiceType::Ssh => "ssh",
            ServiceType::SshKey => "ssh-key",
            ServiceType::Sybase => "sybase",
            ServiceType::Telnet => "telnet",
            ServiceType::Other(name) => name.as_str(),
        }
    }
}

impl From<&str> for ServiceType {
    fn from(value: &str) -> Self {
        match value {
            "as400" => ServiceType::As400,
            "cifs" => ServiceType::Cifs,
            "cifshash" => ServiceType::CifsHash,
            "cvs" => ServiceType::Cvs,
            "db2" => ServiceType::Db2,
            "ftp" => ServiceType::Ftp,
            "http" => ServiceType::Http,
            "ms-sql" => ServiceType::MsSql,
            "mysql" => ServiceType::MySql,
            "notes" => ServiceType::Notes,
            "ntlm" => ServiceType::Ntlm,
            "oracle" => ServiceType::Oracle,
            "pop" => ServiceType::Pop,
            "postgresql" => ServiceType::PostgreSql,
            "remote-exec" => ServiceType::RemoteExec,
            "snmp" => ServiceType::Snmp,
            "snmpv3" => ServiceType::SnmpV3,
            "ssh" => ServiceType::Ssh,
            "ssh-key" => ServiceType::SshKey,
            "sybase" => ServiceType::Sybase,
            "telnet" => ServiceType::Telnet,
            other => ServiceType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ServiceType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// 列表视图与详情视图共享的身份字段
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CredentialIdentity {
    /// 控制台分配的唯一 ID，保存前为 -1
    pub id: i64,
    /// 凭据名称
    pub name: String,
    /// 服务类型
    #[serde(rename = "type")]
    pub service: ServiceType,
    /// 域或 realm
    pub domain: Option<String>,
    /// 用户名
    pub username: Option<String>,
    /// 提权用户名（如 sudo）
    pub privilege_username: Option<String>,
    /// 是否适用于全部站点
    pub all_sites: bool,
}

impl CredentialIdentity {
    pub fn new(name: impl Into<String>, service: ServiceType) -> Self {
        Self {
            id: NEW_CREDENTIAL_ID,
            name: name.into(),
            service,
            domain: None,
            username: None,
            privilege_username: None,
            all_sites: false,
        }
    }
}

/// 凭据列表中的一条摘要
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SharedCredentialSummary {
    #[serde(flatten)]
    pub identity: CredentialIdentity,
    /// 最后修改时间（秒级精度）
    pub last_modified: DateTime<Utc>,
}

/// 共享凭据完整记录（读写视图）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SharedCredential {
    #[serde(flatten)]
    pub identity: CredentialIdentity,
    /// 可选描述
    pub description: Option<String>,
    /// 数据库名或 SID
    pub database: Option<String>,
    /// Windows/Samba LM/NTLM 哈希
    pub ntlm_hash: Option<String>,
    /// 密码或 SNMP community
    pub password: Option<String>,
    /// PEM 格式私钥
    pub pem_key: Option<String>,
    /// 提权密码
    pub privilege_password: Option<String>,
    /// 提权方式（sudo/su/pbrun 等）
    pub privilege_type: Option<String>,
    /// SNMPv3 privacy 密码
    pub privacy_password: Option<String>,
    /// SNMPv3 认证类型
    pub auth_type: Option<String>,
    /// SNMPv3 privacy 类型
    pub privacy_type: Option<String>,
    /// 限定的主机（IP 或主机名）
    pub host: Option<String>,
    /// 限定的单个端口
    pub port: Option<u16>,
    /// 限定的站点 ID（有序）
    pub sites: Vec<i64>,
    /// 临时禁用的站点 ID（有序）
    pub disabled: Vec<i64>,
}

impl SharedCredential {
    /// 新建本地凭据，ID 为 -1，保存后由控制台分配
    pub fn new(name: impl Into<String>, service: ServiceType) -> Self {
        Self::with_identity(CredentialIdentity::new(name, service))
    }

    pub fn with_identity(identity: CredentialIdentity) -> Self {
        Self {
            identity,
            description: None,
            database: None,
            ntlm_hash: None,
            password: None,
            pem_key: None,
            privilege_password: None,
            privilege_type: None,
            privacy_password: None,
            auth_type: None,
            privacy_type: None,
            host: None,
            port: None,
            sites: Vec::new(),
            disabled: Vec::new(),
        }
    }

    pub fn id(&self) -> i64 {
        self.identity.id
    }

    pub fn is_new(&self) -> bool {
        self.identity.id == NEW_CREDENTIAL_ID
    }
}
