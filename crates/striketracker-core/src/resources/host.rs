//! `striketracker_host`

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{found, from_state, roll_back, to_state, vanished};
use crate::config::OperationContext;
use crate::error::{Error, Result};
use crate::ids;
use crate::models::{DeliveryService, Host};
use crate::traits::{CdnApi, Resource};

pub const TYPE_NAME: &str = "striketracker_host";

/// Terraform state of a host
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostState {
    /// Host hash
    pub id: String,
    pub account_hash: String,
    pub name: String,
    /// Delivery service ids
    pub services: Vec<i64>,
    #[serde(rename = "type")]
    pub host_type: String,
    pub hash_code: String,
    /// Scope id to scope path
    pub scopes: BTreeMap<String, String>,
    /// Id of the CDS `/` scope
    pub root_scope_id: Option<u64>,
}

impl HostState {
    fn to_wire(&self) -> Host {
        Host {
            hash_code: String::new(),
            name: self.name.clone(),
            host_type: self.host_type.clone(),
            services: self
                .services
                .iter()
                .map(|id| DeliveryService {
                    id: *id,
                    ..Default::default()
                })
                .collect(),
            scopes: Vec::new(),
        }
    }

    fn from_wire(account_hash: &str, host: Host) -> Self {
        let root_scope_id = host.cds_root_scope().map(|scope| scope.id);
        Self {
            id: host.hash_code.clone(),
            account_hash: account_hash.to_string(),
            name: host.name,
            services: host.services.iter().map(|s| s.id).collect(),
            host_type: host.host_type,
            hash_code: host.hash_code,
            scopes: host
                .scopes
                .into_iter()
                .map(|scope| (scope.id.to_string(), scope.path))
                .collect(),
            root_scope_id,
        }
    }
}

/// CDN hosts
pub struct HostResource {
    api: Arc<dyn CdnApi>,
}

impl HostResource {
    pub fn new(api: Arc<dyn CdnApi>) -> Self {
        Self { api }
    }

    async fn fetch(&self, ctx: &OperationContext, state: &HostState) -> Result<Option<Value>> {
        let host = found(self.api.get_host(ctx, &state.account_hash, &state.id).await)?;
        host.map(|mut h| {
            if h.hash_code.is_empty() {
                h.hash_code = state.id.clone();
            }
            to_state(&HostState::from_wire(&state.account_hash, h))
        })
        .transpose()
    }
}

fn require_hash(state: &HostState) -> Result<()> {
    if state.id.is_empty() {
        return Err(Error::invalid_input("host state has no host hash"));
    }
    Ok(())
}

#[async_trait]
impl Resource for HostResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    async fn create(&self, ctx: &OperationContext, planned: Value) -> Result<Value> {
        let mut state: HostState = from_state(TYPE_NAME, planned)?;

        tracing::info!("Creating host {} in account {}", state.name, state.account_hash);
        let created = self
            .api
            .create_host(ctx, &state.account_hash, &state.to_wire())
            .await?;
        if created.hash_code.is_empty() {
            return Err(Error::missing_remote(format!(
                "host {} created in {} has no hash code",
                state.name, state.account_hash
            )));
        }
        state.id = created.hash_code;

        let fetched = self
            .fetch(ctx, &state)
            .await
            .and_then(|fresh| fresh.ok_or_else(|| vanished(TYPE_NAME, &state.id)));
        match fetched {
            Ok(fresh) => Ok(fresh),
            Err(err) => {
                let cleanup = self.api.delete_host(ctx, &state.account_hash, &state.id);
                Err(roll_back(TYPE_NAME, &state.id, err, cleanup).await)
            }
        }
    }

    async fn read(&self, ctx: &OperationContext, current: Value) -> Result<Option<Value>> {
        let state: HostState = from_state(TYPE_NAME, current)?;
        require_hash(&state)?;
        tracing::debug!("Reading host {}/{}", state.account_hash, state.id);
        self.fetch(ctx, &state).await
    }

    async fn update(&self, ctx: &OperationContext, planned: Value) -> Result<Value> {
        let state: HostState = from_state(TYPE_NAME, planned)?;
        require_hash(&state)?;

        tracing::info!("Updating host {}/{}", state.account_hash, state.id);
        let mut host = state.to_wire();
        host.hash_code = state.id.clone();
        self.api
            .update_host(ctx, &state.account_hash, &state.id, &host)
            .await?;

        self.fetch(ctx, &state)
            .await?
            .ok_or_else(|| vanished(TYPE_NAME, &state.id))
    }

    async fn delete(&self, ctx: &OperationContext, current: Value) -> Result<()> {
        let state: HostState = from_state(TYPE_NAME, current)?;
        require_hash(&state)?;

        tracing::info!("Deleting host {}/{}", state.account_hash, state.id);
        self.api.delete_host(ctx, &state.account_hash, &state.id).await
    }

    async fn exists(&self, ctx: &OperationContext, current: Value) -> Result<bool> {
        let state: HostState = from_state(TYPE_NAME, current)?;
        require_hash(&state)?;
        Ok(found(self.api.get_host(ctx, &state.account_hash, &state.id).await)?.is_some())
    }

    fn import(&self, id: &str) -> Result<Value> {
        let parsed = ids::parse_account_scoped(id)?;
        Ok(serde_json::json!({ "id": parsed.id, "account_hash": parsed.account_hash }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HostScope;

    #[test]
    fn computes_scope_map_and_root() {
        let host = Host {
            hash_code: "y7k8p9m2".to_string(),
            name: "www".to_string(),
            host_type: "HOST".to_string(),
            services: vec![DeliveryService {
                id: 40,
                ..Default::default()
            }],
            scopes: vec![
                HostScope {
                    id: 5,
                    platform: "CDS".to_string(),
                    path: "/".to_string(),
                    name: "root".to_string(),
                },
                HostScope {
                    id: 6,
                    platform: "CDS".to_string(),
                    path: "/images".to_string(),
                    name: "images".to_string(),
                },
            ],
        };

        let state = HostState::from_wire("acct", host);
        assert_eq!(state.id, "y7k8p9m2");
        assert_eq!(state.services, vec![40]);
        assert_eq!(state.root_scope_id, Some(5));
        assert_eq!(state.scopes["6"], "/images");
    }

    #[test]
    fn type_attribute_is_named_type() {
        let state: HostState = serde_json::from_value(serde_json::json!({
            "account_hash": "acct",
            "name": "www",
            "type": "HOST",
            "services": [40, 41]
        }))
        .unwrap();
        assert_eq!(state.host_type, "HOST");
        assert_eq!(state.to_wire().services.len(), 2);
    }
}
