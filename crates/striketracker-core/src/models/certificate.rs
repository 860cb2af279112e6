use serde::{Deserialize, Serialize};

/// An uploaded x.509 certificate
///
/// `Debug` leaves out the private key and the certificate text.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Certificate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub ca_bundle: String,
    pub certificate: String,
    pub key: String,
    pub ciphers: String,
    pub trusted: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub common_name: String,
    #[serde(skip_serializing)]
    pub created_date: String,
    #[serde(skip_serializing)]
    pub updated_date: String,
    #[serde(skip_serializing)]
    pub expiration_date: String,
    #[serde(skip_serializing)]
    pub fingerprint: String,
    #[serde(skip_serializing)]
    pub issuer: String,
    #[serde(skip_serializing)]
    pub certificate_information: serde_json::Map<String, serde_json::Value>,
    #[serde(skip_serializing)]
    pub requester: serde_json::Map<String, serde_json::Value>,
}

impl std::fmt::Debug for Certificate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Certificate")
            .field("id", &self.id)
            .field("common_name", &self.common_name)
            .field("fingerprint", &self.fingerprint)
            .field("key", &"<REDACTED>")
            .finish_non_exhaustive()
    }
}
