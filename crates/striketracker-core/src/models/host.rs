use serde::{Deserialize, Serialize};

/// Platform of the scope every host is created with
pub const CDS_PLATFORM: &str = "CDS";

/// A CDN host and the scopes attached to it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Host {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub hash_code: String,
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub host_type: String,
    pub services: Vec<DeliveryService>,
    #[serde(skip_serializing)]
    pub scopes: Vec<HostScope>,
}

impl Host {
    /// The root scope of the CDS platform, created alongside the host
    pub fn cds_root_scope(&self) -> Option<&HostScope> {
        self.scopes
            .iter()
            .find(|scope| scope.platform == CDS_PLATFORM && scope.path == "/")
    }
}

/// A delivery service enabled on a host
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeliveryService {
    pub id: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub service_type: String,
}

/// Summary of a scope as listed on its host
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HostScope {
    pub id: u64,
    pub platform: String,
    pub path: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope(id: u64, platform: &str, path: &str) -> HostScope {
        HostScope {
            id,
            platform: platform.to_string(),
            path: path.to_string(),
            name: String::new(),
        }
    }

    #[test]
    fn finds_cds_root_scope() {
        let host = Host {
            scopes: vec![
                scope(1, "CDS", "/images"),
                scope(2, "ALL", "/"),
                scope(3, "CDS", "/"),
            ],
            ..Default::default()
        };
        assert_eq!(host.cds_root_scope().map(|s| s.id), Some(3));
    }

    #[test]
    fn no_root_scope_on_bare_host() {
        assert!(Host::default().cds_root_scope().is_none());
    }
}
