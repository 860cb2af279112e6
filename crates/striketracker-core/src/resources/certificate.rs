//! `striketracker_certificate`

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{found, from_state, roll_back, to_state, vanished};
use crate::config::OperationContext;
use crate::error::Result;
use crate::ids;
use crate::models::Certificate;
use crate::traits::{CdnApi, Resource};

pub const TYPE_NAME: &str = "striketracker_certificate";

/// Terraform state of a certificate
///
/// `ca_bundle`, `certificate` and `key` are sensitive and never appear in
/// `Debug` output or logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CertificateState {
    pub id: String,
    pub account_hash: String,
    pub ca_bundle: String,
    pub certificate: String,
    pub key: String,
    pub ciphers: String,
    pub trusted: bool,
    pub common_name: String,
    pub created_date: String,
    pub updated_date: String,
    pub expiration_date: String,
    pub fingerprint: String,
    pub issuer: String,
    pub certificate_information: BTreeMap<String, String>,
    pub requester: BTreeMap<String, String>,
}

impl Default for CertificateState {
    fn default() -> Self {
        Self {
            id: String::new(),
            account_hash: String::new(),
            ca_bundle: String::new(),
            certificate: String::new(),
            key: String::new(),
            ciphers: String::new(),
            trusted: true,
            common_name: String::new(),
            created_date: String::new(),
            updated_date: String::new(),
            expiration_date: String::new(),
            fingerprint: String::new(),
            issuer: String::new(),
            certificate_information: BTreeMap::new(),
            requester: BTreeMap::new(),
        }
    }
}

impl std::fmt::Debug for CertificateState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CertificateState")
            .field("id", &self.id)
            .field("account_hash", &self.account_hash)
            .field("ca_bundle", &"<REDACTED>")
            .field("certificate", &"<REDACTED>")
            .field("key", &"<REDACTED>")
            .field("common_name", &self.common_name)
            .field("fingerprint", &self.fingerprint)
            .finish_non_exhaustive()
    }
}

/// Flatten a JSON object into the string map Terraform stores
fn string_map(object: serde_json::Map<String, Value>) -> BTreeMap<String, String> {
    object
        .into_iter()
        .map(|(k, v)| {
            let v = match v {
                Value::String(s) => s,
                Value::Null => String::new(),
                other => other.to_string(),
            };
            (k, v)
        })
        .collect()
}

impl CertificateState {
    fn to_wire(&self) -> Certificate {
        Certificate {
            ca_bundle: self.ca_bundle.clone(),
            certificate: self.certificate.clone(),
            key: self.key.clone(),
            ciphers: self.ciphers.clone(),
            trusted: self.trusted,
            common_name: self.common_name.clone(),
            ..Default::default()
        }
    }

    fn from_wire(account_hash: &str, id: &str, cert: Certificate) -> Self {
        Self {
            id: cert.id.map(|i| i.to_string()).unwrap_or_else(|| id.to_string()),
            account_hash: account_hash.to_string(),
            ca_bundle: cert.ca_bundle,
            certificate: cert.certificate,
            key: cert.key,
            ciphers: cert.ciphers,
            trusted: cert.trusted,
            common_name: cert.common_name,
            created_date: cert.created_date,
            updated_date: cert.updated_date,
            expiration_date: cert.expiration_date,
            fingerprint: cert.fingerprint,
            issuer: cert.issuer,
            certificate_information: string_map(cert.certificate_information),
            requester: string_map(cert.requester),
        }
    }
}

/// TLS certificates served by the CDN edge
pub struct CertificateResource {
    api: Arc<dyn CdnApi>,
}

impl CertificateResource {
    pub fn new(api: Arc<dyn CdnApi>) -> Self {
        Self { api }
    }

    async fn fetch(
        &self,
        ctx: &OperationContext,
        state: &CertificateState,
    ) -> Result<Option<Value>> {
        let id = ids::parse_numeric(&state.id, "Certificate")?;
        let cert = found(self.api.get_certificate(ctx, &state.account_hash, id).await)?;
        cert.map(|c| to_state(&CertificateState::from_wire(&state.account_hash, &state.id, c)))
            .transpose()
    }
}

#[async_trait]
impl Resource for CertificateResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    async fn create(&self, ctx: &OperationContext, planned: Value) -> Result<Value> {
        let mut state: CertificateState = from_state(TYPE_NAME, planned)?;

        tracing::info!("Uploading certificate to account {}", state.account_hash);
        let uploaded = self
            .api
            .upload_certificate(ctx, &state.account_hash, &state.to_wire())
            .await?;
        let id = uploaded.id.ok_or_else(|| vanished(TYPE_NAME, "(no id returned)"))?;
        state.id = id.to_string();

        let fetched = self
            .fetch(ctx, &state)
            .await
            .and_then(|fresh| fresh.ok_or_else(|| vanished(TYPE_NAME, &state.id)));
        match fetched {
            Ok(fresh) => Ok(fresh),
            Err(err) => {
                let cleanup = self.api.delete_certificate(ctx, &state.account_hash, id);
                Err(roll_back(TYPE_NAME, &state.id, err, cleanup).await)
            }
        }
    }

    async fn read(&self, ctx: &OperationContext, current: Value) -> Result<Option<Value>> {
        let state: CertificateState = from_state(TYPE_NAME, current)?;
        tracing::debug!("Reading certificate {}/{}", state.account_hash, state.id);
        self.fetch(ctx, &state).await
    }

    async fn update(&self, ctx: &OperationContext, planned: Value) -> Result<Value> {
        let state: CertificateState = from_state(TYPE_NAME, planned)?;
        let id = ids::parse_numeric(&state.id, "Certificate")?;

        tracing::info!("Updating certificate {}/{}", state.account_hash, id);
        let mut cert = state.to_wire();
        cert.id = Some(id);
        self.api
            .update_certificate(ctx, &state.account_hash, id, &cert)
            .await?;

        self.fetch(ctx, &state)
            .await?
            .ok_or_else(|| vanished(TYPE_NAME, &state.id))
    }

    async fn delete(&self, ctx: &OperationContext, current: Value) -> Result<()> {
        let state: CertificateState = from_state(TYPE_NAME, current)?;
        let id = ids::parse_numeric(&state.id, "Certificate")?;

        tracing::info!("Deleting certificate {}/{}", state.account_hash, id);
        self.api.delete_certificate(ctx, &state.account_hash, id).await
    }

    async fn exists(&self, ctx: &OperationContext, current: Value) -> Result<bool> {
        let state: CertificateState = from_state(TYPE_NAME, current)?;
        let id = ids::parse_numeric(&state.id, "Certificate")?;
        Ok(found(self.api.get_certificate(ctx, &state.account_hash, id).await)?.is_some())
    }

    fn import(&self, id: &str) -> Result<Value> {
        let parsed = ids::parse_account_scoped(id)?;
        ids::parse_numeric(&parsed.id, "Certificate")?;
        Ok(serde_json::json!({ "id": parsed.id, "account_hash": parsed.account_hash }))
    }
}
