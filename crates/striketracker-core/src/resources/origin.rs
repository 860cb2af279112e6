//! `striketracker_origin`

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{found, from_state, roll_back, to_state, vanished};
use crate::config::OperationContext;
use crate::error::Result;
use crate::ids;
use crate::models::Origin;
use crate::traits::{CdnApi, Resource};

pub const TYPE_NAME: &str = "striketracker_origin";

/// Terraform state of an origin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OriginState {
    pub id: String,
    pub account_hash: String,
    pub name: String,
    pub hostname: String,
    pub port: i64,
    pub path: String,
    pub authentication_type: String,
    pub certificate_cn: String,
    pub error_cache_ttl_seconds: i64,
    pub max_connections_per_edge: i64,
    pub max_connections_per_edge_enabled: bool,
    pub maximum_origin_pull_seconds: i64,
    pub max_retry_count: i64,
    pub origin_cache_headers: String,
    pub origin_default_keep_alive: i64,
    pub origin_pull_headers: String,
    pub origin_pull_neg_linger: String,
    pub request_timeout_seconds: i64,
    pub secure_port: i64,
    pub verify_certificate: bool,
}

impl Default for OriginState {
    fn default() -> Self {
        Self {
            id: String::new(),
            account_hash: String::new(),
            name: String::new(),
            hostname: String::new(),
            port: 0,
            path: "/".to_string(),
            authentication_type: "NONE".to_string(),
            certificate_cn: String::new(),
            error_cache_ttl_seconds: 100,
            max_connections_per_edge: 0,
            max_connections_per_edge_enabled: false,
            maximum_origin_pull_seconds: 0,
            max_retry_count: 1,
            origin_cache_headers: String::new(),
            origin_default_keep_alive: 0,
            origin_pull_headers: String::new(),
            origin_pull_neg_linger: String::new(),
            request_timeout_seconds: 15,
            secure_port: 0,
            verify_certificate: false,
        }
    }
}

impl OriginState {
    fn to_wire(&self) -> Origin {
        Origin {
            id: None,
            name: self.name.clone(),
            hostname: self.hostname.clone(),
            port: self.port,
            path: self.path.clone(),
            authentication_type: self.authentication_type.clone(),
            certificate_cn: self.certificate_cn.clone(),
            error_cache_ttl_seconds: self.error_cache_ttl_seconds,
            max_connections_per_edge: self.max_connections_per_edge,
            max_connections_per_edge_enabled: self.max_connections_per_edge_enabled,
            maximum_origin_pull_seconds: self.maximum_origin_pull_seconds,
            max_retry_count: self.max_retry_count,
            origin_cache_headers: self.origin_cache_headers.clone(),
            origin_default_keep_alive: self.origin_default_keep_alive,
            origin_pull_headers: self.origin_pull_headers.clone(),
            origin_pull_neg_linger: self.origin_pull_neg_linger.clone(),
            request_timeout_seconds: self.request_timeout_seconds,
            secure_port: self.secure_port,
            verify_certificate: self.verify_certificate,
        }
    }

    fn from_wire(account_hash: &str, id: &str, origin: Origin) -> Self {
        Self {
            id: origin.id.map(|i| i.to_string()).unwrap_or_else(|| id.to_string()),
            account_hash: account_hash.to_string(),
            name: origin.name,
            hostname: origin.hostname,
            port: origin.port,
            path: origin.path,
            authentication_type: origin.authentication_type,
            certificate_cn: origin.certificate_cn,
            error_cache_ttl_seconds: origin.error_cache_ttl_seconds,
            max_connections_per_edge: origin.max_connections_per_edge,
            max_connections_per_edge_enabled: origin.max_connections_per_edge_enabled,
            maximum_origin_pull_seconds: origin.maximum_origin_pull_seconds,
            max_retry_count: origin.max_retry_count,
            origin_cache_headers: origin.origin_cache_headers,
            origin_default_keep_alive: origin.origin_default_keep_alive,
            origin_pull_headers: origin.origin_pull_headers,
            origin_pull_neg_linger: origin.origin_pull_neg_linger,
            request_timeout_seconds: origin.request_timeout_seconds,
            secure_port: origin.secure_port,
            verify_certificate: origin.verify_certificate,
        }
    }
}

/// Origin servers the CDN pulls content from
pub struct OriginResource {
    api: Arc<dyn CdnApi>,
}

impl OriginResource {
    pub fn new(api: Arc<dyn CdnApi>) -> Self {
        Self { api }
    }

    async fn fetch(&self, ctx: &OperationContext, state: &OriginState) -> Result<Option<Value>> {
        let id = ids::parse_numeric(&state.id, "Origin")?;
        let origin = found(self.api.get_origin(ctx, &state.account_hash, id).await)?;
        origin
            .map(|o| to_state(&OriginState::from_wire(&state.account_hash, &state.id, o)))
            .transpose()
    }
}

#[async_trait]
impl Resource for OriginResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    async fn create(&self, ctx: &OperationContext, planned: Value) -> Result<Value> {
        let mut state: OriginState = from_state(TYPE_NAME, planned)?;

        tracing::info!("Creating origin {} in account {}", state.name, state.account_hash);
        let created = self
            .api
            .create_origin(ctx, &state.account_hash, &state.to_wire())
            .await?;
        let id = created.id.ok_or_else(|| vanished(TYPE_NAME, "(no id returned)"))?;
        state.id = id.to_string();

        let fetched = self
            .fetch(ctx, &state)
            .await
            .and_then(|fresh| fresh.ok_or_else(|| vanished(TYPE_NAME, &state.id)));
        match fetched {
            Ok(fresh) => Ok(fresh),
            Err(err) => {
                let cleanup = self.api.delete_origin(ctx, &state.account_hash, id);
                Err(roll_back(TYPE_NAME, &state.id, err, cleanup).await)
            }
        }
    }

    async fn read(&self, ctx: &OperationContext, current: Value) -> Result<Option<Value>> {
        let state: OriginState = from_state(TYPE_NAME, current)?;
        tracing::debug!("Reading origin {}/{}", state.account_hash, state.id);
        self.fetch(ctx, &state).await
    }

    async fn update(&self, ctx: &OperationContext, planned: Value) -> Result<Value> {
        let state: OriginState = from_state(TYPE_NAME, planned)?;
        let id = ids::parse_numeric(&state.id, "Origin")?;

        tracing::info!("Updating origin {}/{}", state.account_hash, id);
        let mut origin = state.to_wire();
        origin.id = Some(id);
        self.api
            .update_origin(ctx, &state.account_hash, id, &origin)
            .await?;

        self.fetch(ctx, &state)
            .await?
            .ok_or_else(|| vanished(TYPE_NAME, &state.id))
    }

    async fn delete(&self, ctx: &OperationContext, current: Value) -> Result<()> {
        let state: OriginState = from_state(TYPE_NAME, current)?;
        let id = ids::parse_numeric(&state.id, "Origin")?;

        tracing::info!("Deleting origin {}/{}", state.account_hash, id);
        self.api.delete_origin(ctx, &state.account_hash, id).await
    }

    async fn exists(&self, ctx: &OperationContext, current: Value) -> Result<bool> {
        let state: OriginState = from_state(TYPE_NAME, current)?;
        let id = ids::parse_numeric(&state.id, "Origin")?;
        Ok(found(self.api.get_origin(ctx, &state.account_hash, id).await)?.is_some())
    }

    fn import(&self, id: &str) -> Result<Value> {
        let parsed = ids::parse_account_scoped(id)?;
        ids::parse_numeric(&parsed.id, "Origin")?;
        Ok(serde_json::json!({ "id": parsed.id, "account_hash": parsed.account_hash }))
    }
}
