//! 共享凭据与控制台 XML 载荷之间的映射。
//!
//! 载荷结构：
//! `Credential[id] > Name, Description, Services/Service[type],
//! Account[type=nexpose]/Field[name], Restrictions/Restriction[type],
//! Sites[all]/Site[id][enabled]`

use super::models::{CredentialIdentity, ServiceType, SharedCredential};
use crate::error::ConsoleError;
use crate::xml::XmlElement;

/// `Account` 下 `Field` 的 name 与记录字段的对应关系（按写出顺序排列）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountField {
    Database,
    Domain,
    Username,
    NtlmHash,
    Password,
    PemKey,
    PrivilegeUsername,
    PrivilegePassword,
    PrivilegeType,
    AuthType,
    PrivacyType,
    PrivacyPassword,
}

impl AccountField {
    pub const ALL: [AccountField; 12] = [
        AccountField::Database,
        AccountField::Domain,
        AccountField::Username,
        AccountField::NtlmHash,
        AccountField::Password,
        AccountField::PemKey,
        AccountField::PrivilegeUsername,
        AccountField::PrivilegePassword,
        AccountField::PrivilegeType,
        AccountField::AuthType,
        AccountField::PrivacyType,
        AccountField::PrivacyPassword,
    ];

    pub fn wire_name(self) -> &'static str {
        match self {
            AccountField::Database => "database",
            AccountField::Domain => "domain",
            AccountField::Username => "username",
            AccountField::NtlmHash => "ntlmhash",
            AccountField::Password => "password",
            AccountField::PemKey => "pemkey",
            AccountField::PrivilegeUsername => "privilegeelevationusername",
            AccountField::PrivilegePassword => "privilegeelevationpassword",
            AccountField::PrivilegeType => "privilegeelevationtype",
            AccountField::AuthType => "snmpv3authtype",
            AccountField::PrivacyType => "snmpv3privtype",
            AccountField::PrivacyPassword => "snmpv3privpassword",
        }
    }

    pub fn from_wire_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.wire_name() == name)
    }

    /// 无论是否有值都写出的字段
    pub fn always_emitted(self) -> bool {
        matches!(
            self,
            AccountField::Database
                | AccountField::Domain
                | AccountField::Username
                | AccountField::PrivilegeUsername
        )
    }

    fn value(self, cred: &SharedCredential) -> Option<&str> {
        match self {
            AccountField::Database => cred.database.as_deref(),
            AccountField::Domain => cred.identity.domain.as_deref(),
            AccountField::Username => cred.identity.username.as_deref(),
            AccountField::NtlmHash => cred.ntlm_hash.as_deref(),
            AccountField::Password => cred.password.as_deref(),
            AccountField::PemKey => cred.pem_key.as_deref(),
            AccountField::PrivilegeUsername => cred.identity.privilege_username.as_deref(),
            AccountField::PrivilegePassword => cred.privilege_password.as_deref(),
            AccountField::PrivilegeType => cred.privilege_type.as_deref(),
            AccountField::AuthType => cred.auth_type.as_deref(),
            AccountField::PrivacyType => cred.privacy_type.as_deref(),
            AccountField::PrivacyPassword => cred.privacy_password.as_deref(),
        }
    }

    fn slot(self, cred: &mut SharedCredential) -> &mut Option<String> {
        match self {
            AccountField::Database => &mut cred.database,
            AccountField::Domain => &mut cred.identity.domain,
            AccountField::Username => &mut cred.identity.username,
            AccountField::NtlmHash => &mut cred.ntlm_hash,
            AccountField::Password => &mut cred.password,
            AccountField::PemKey => &mut cred.pem_key,
            AccountField::PrivilegeUsername => &mut cred.identity.privilege_username,
            AccountField::PrivilegePassword => &mut cred.privilege_password,
            AccountField::PrivilegeType => &mut cred.privilege_type,
            AccountField::AuthType => &mut cred.auth_type,
            AccountField::PrivacyType => &mut cred.privacy_type,
            AccountField::PrivacyPassword => &mut cred.privacy_password,
        }
    }
}

impl SharedCredential {
    /// 构建 XML 元素树
    pub fn as_xml(&self) -> XmlElement {
        let mut account = XmlElement::new("Account").with_attribute("type", "nexpose");
        for field in AccountField::ALL {
            let value = field.value(self);
            if value.is_some() || field.always_emitted() {
                account.push(
                    XmlElement::new("Field")
                        .with_attribute("name", field.wire_name())
                        .with_text(value),
                );
            }
        }

        let mut restrictions = XmlElement::new("Restrictions");
        if let Some(host) = self.host.as_deref() {
            restrictions.push(
                XmlElement::new("Restriction")
                    .with_attribute("type", "host")
                    .with_text(Some(host)),
            );
        }
        if let Some(port) = self.port {
            restrictions.push(
                XmlElement::new("Restriction")
                    .with_attribute("type", "port")
                    .with_text(Some(port.to_string().as_str())),
            );
        }

        XmlElement::new("Credential")
            .with_attribute("id", self.identity.id)
            .with_child(XmlElement::new("Name").with_text(Some(self.identity.name.as_str())))
            .with_child(XmlElement::new("Description").with_text(self.description.as_deref()))
            .with_child(
                XmlElement::new("Services").with_child(
                    XmlElement::new("Service").with_attribute("type", &self.identity.service),
                ),
            )
            .with_child(account)
            .with_child(restrictions)
            .with_child(self.sites_xml())
    }

    /// `Sites` 元素。
    ///
    /// 全站点模式下不写出 `sites` 中的条目；仅当 `sites` 为空时，
    /// 改为逐个写出 `disabled` 中的站点并标记 `enabled="0"`。
    fn sites_xml(&self) -> XmlElement {
        let all = self.identity.all_sites;
        let mut sites = XmlElement::new("Sites").with_attribute("all", if all { 1 } else { 0 });

        if self.sites.is_empty() {
            for id in &self.disabled {
                sites.push(
                    XmlElement::new("Site")
                        .with_attribute("id", id)
                        .with_attribute("enabled", 0),
                );
            }
        } else if !all {
            for id in &self.sites {
                let mut site = XmlElement::new("Site").with_attribute("id", id);
                if self.disabled.contains(id) {
                    site = site.with_attribute("enabled", 0);
                }
                sites.push(site);
            }
        }
        sites
    }

    /// 序列化为保存接口的 XML 载荷
    pub fn to_xml(&self) -> Result<String, ConsoleError> {
        self.as_xml().to_xml_string()
    }

    /// 解析控制台返回的凭据 XML；文档根元素不是 `Credential` 时返回 None
    pub fn parse(xml: &str) -> Result<Option<Self>, ConsoleError> {
        match XmlElement::parse_document(xml)? {
            Some(root) if root.name == "Credential" => Self::from_xml(&root).map(Some),
            _ => Ok(None),
        }
    }

    /// 从 `Credential` 元素构建记录
    pub fn from_xml(element: &XmlElement) -> Result<Self, ConsoleError> {
        let id = parse_int::<i64>(
            "Credential@id",
            element
                .attribute("id")
                .ok_or_else(|| ConsoleError::missing("Credential@id"))?,
        )?;
        let name = element
            .child("Name")
            .ok_or_else(|| ConsoleError::missing("Name"))?
            .text()
            .unwrap_or_default();
        let service = element
            .find("Services/Service")
            .and_then(|s| s.attribute("type"))
            .ok_or_else(|| ConsoleError::missing("Services/Service@type"))?;

        let mut cred = SharedCredential::with_identity(CredentialIdentity {
            id,
            ..CredentialIdentity::new(name, ServiceType::from(service))
        });

        if let Some(desc) = element.child("Description") {
            cred.description = desc.text().map(str::to_string);
        }

        for field in element.find_all("Account/Field") {
            let Some(target) = field.attribute("name").and_then(AccountField::from_wire_name)
            else {
                continue;
            };
            *target.slot(&mut cred) = field.text().map(str::to_string);
        }

        for restriction in element.find_all("Restrictions/Restriction") {
            match restriction.attribute("type") {
                Some("host") => cred.host = restriction.text().map(str::to_string),
                Some("port") => {
                    cred.port = restriction
                        .text()
                        .map(|raw| parse_int::<u16>("Restriction[port]", raw))
                        .transpose()?;
                }
                _ => {}
            }
        }

        let sites = element
            .child("Sites")
            .ok_or_else(|| ConsoleError::missing("Sites"))?;
        cred.identity.all_sites = sites.attribute("all") == Some("1");
        for site in sites.children("Site") {
            let site_id = parse_int::<i64>(
                "Site@id",
                site.attribute("id")
                    .ok_or_else(|| ConsoleError::missing("Site@id"))?,
            )?;
            if !cred.identity.all_sites {
                cred.sites.push(site_id);
            }
            if site.attribute("enabled") == Some("0") {
                cred.disabled.push(site_id);
            }
        }

        Ok(cred)
    }
}

fn parse_int<T: std::str::FromStr>(field: &str, raw: &str) -> Result<T, ConsoleError> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| ConsoleError::invalid(field, raw))
}

#[cfg(test)]
mod tests {
    use super::AccountField;
    use crate::error::ConsoleError;
    use crate::features::shared_credential::models::{ServiceType, SharedCredential};

    #[test]
    fn wire_names_map_back_to_fields() {
        for field in AccountField::ALL {
            assert_eq!(AccountField::from_wire_name(field.wire_name()), Some(field));
        }
        assert_eq!(AccountField::from_wire_name("kerberosrealm"), None);
    }

    #[test]
    fn minimal_credential_emits_fixed_skeleton() {
        let cred = SharedCredential::new("c", ServiceType::Ssh);
        let xml = cred.to_xml().expect("serialize");
        assert_eq!(
            xml,
            concat!(
                r#"<Credential id="-1"><Name>c</Name><Description/>"#,
                r#"<Services><Service type="ssh"/></Services>"#,
                r#"<Account type="nexpose">"#,
                r#"<Field name="database"/><Field name="domain"/><Field name="username"/>"#,
                r#"<Field name="privilegeelevationusername"/>"#,
                r#"</Account><Restrictions/><Sites all="0"/></Credential>"#
            )
        );
    }

    #[test]
    fn unknown_account_fields_are_ignored() {
        let xml = r#"<Credential id="3"><Name>n</Name>
            <Services><Service type="cifs"/></Services>
            <Account type="nexpose">
              <Field name="username">admin</Field>
              <Field name="kerberosrealm">EXAMPLE</Field>
            </Account>
            <Sites all="0"/></Credential>"#;
        let cred = SharedCredential::parse(xml).expect("parse").expect("record");
        assert_eq!(cred.identity.username.as_deref(), Some("admin"));
        assert_eq!(cred.identity.service, ServiceType::Cifs);
        assert_eq!(cred.description, None);
    }

    #[test]
    fn invalid_port_is_reported() {
        let xml = r#"<Credential id="3"><Name>n</Name>
            <Services><Service type="ssh"/></Services>
            <Restrictions><Restriction type="port">ssh</Restriction></Restrictions>
            <Sites all="0"/></Credential>"#;
        let err = SharedCredential::parse(xml).expect_err("should fail");
        assert!(
            matches!(&err, ConsoleError::InvalidField { field, .. } if field == "Restriction[port]"),
            "got {err:?}"
        );
    }

    #[test]
    fn missing_service_is_reported() {
        let xml = r#"<Credential id="3"><Name>n</Name><Sites all="0"/></Credential>"#;
        let err = SharedCredential::parse(xml).expect_err("should fail");
        assert!(matches!(err, ConsoleError::MissingField(_)), "got {err:?}");
    }
}
