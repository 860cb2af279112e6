//! `striketracker_configuration` and `striketracker_default_configuration`
//!
//! Both resources share one schema. They differ in how the scope comes to
//! exist: the first creates a new scope on the host, the second adopts the
//! host's root CDS scope, which the API creates along with the host and never
//! lets go of.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::blocks::{
    CacheControlBlock, CacheExtensionBlock, CacheKeysBlock, LogsBlock, OriginBlock,
    OriginPullPolicyBlock, RequestModificationBlock, ResponseModificationBlock, ScopeBlock,
    StaticHeaderBlock,
};
use super::{found, from_state, roll_back, to_state, vanished};
use crate::codec::{self, RuleFamily, Weighted};
use crate::config::OperationContext;
use crate::error::{Error, Result};
use crate::ids;
use crate::models::{Configuration, ConfigurationHostname, ScopeCreate};
use crate::traits::{CdnApi, Resource};

pub const TYPE_NAME: &str = "striketracker_configuration";

pub const DEFAULT_TYPE_NAME: &str = "striketracker_default_configuration";

/// Terraform state of a scope configuration
///
/// The seven rule families are weighted sets. Their order on the wire comes
/// from the weights alone. `dns_hostnames` is computed and ignored on write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigurationState {
    /// Scope id
    pub id: String,
    pub account_hash: String,
    pub host_hash: String,
    pub scope: ScopeBlock,
    pub hostnames: Vec<String>,
    pub dns_hostnames: Vec<String>,
    pub origin: Option<OriginBlock>,
    pub origin_pull_cache_extension: Option<CacheExtensionBlock>,
    pub cache_keys: Option<CacheKeysBlock>,
    pub logs: Option<LogsBlock>,
    pub cache_control: Vec<Weighted<CacheControlBlock>>,
    pub origin_pull_policy: Vec<Weighted<OriginPullPolicyBlock>>,
    pub origin_request_edge_rule: Vec<Weighted<RequestModificationBlock>>,
    pub origin_response_edge_rule: Vec<Weighted<ResponseModificationBlock>>,
    pub client_request_edge_rule: Vec<Weighted<RequestModificationBlock>>,
    pub client_response_edge_rule: Vec<Weighted<ResponseModificationBlock>>,
    pub static_header: Vec<Weighted<StaticHeaderBlock>>,
}

fn request_rules(
    family: RuleFamily,
    records: &[Weighted<RequestModificationBlock>],
) -> Result<Vec<crate::models::RequestModification>> {
    let ordered = codec::decode(family, records.to_vec())?;
    for (index, rule) in ordered.iter().enumerate() {
        rule.validate(family, index)?;
    }
    Ok(ordered.into_iter().map(Into::into).collect())
}

fn response_rules(
    family: RuleFamily,
    records: &[Weighted<ResponseModificationBlock>],
) -> Result<Vec<crate::models::ResponseModification>> {
    let ordered = codec::decode(family, records.to_vec())?;
    for (index, rule) in ordered.iter().enumerate() {
        rule.validate(family, index)?;
    }
    Ok(ordered.into_iter().map(Into::into).collect())
}

impl ConfigurationState {
    /// Build the API document for this state
    ///
    /// Every weight and enumerated value is checked here, so a bad
    /// configuration fails before the first remote call.
    pub fn to_wire(&self) -> Result<Configuration> {
        let policies = codec::decode(RuleFamily::OriginPullPolicy, self.origin_pull_policy.clone())?;
        for (index, policy) in policies.iter().enumerate() {
            policy.validate(index)?;
        }
        let cache_control = codec::decode(RuleFamily::CacheControl, self.cache_control.clone())?;
        for (index, policy) in cache_control.iter().enumerate() {
            policy.validate(index)?;
        }

        let origin_request_modification =
            request_rules(RuleFamily::OriginRequestEdgeRule, &self.origin_request_edge_rule)?;
        let origin_response_modification =
            response_rules(RuleFamily::OriginResponseEdgeRule, &self.origin_response_edge_rule)?;
        let client_request_modification =
            request_rules(RuleFamily::ClientRequestEdgeRule, &self.client_request_edge_rule)?;
        let client_response_modification =
            response_rules(RuleFamily::ClientResponseEdgeRule, &self.client_response_edge_rule)?;
        let static_header = codec::decode_into(RuleFamily::StaticHeader, self.static_header.clone())?;

        let (origin_pull_host, origin_pull_protocol, origin_pull) = match &self.origin {
            Some(origin) => {
                let mut origin = origin.clone();
                origin.normalize()?;
                let (host, protocol, pull) = origin.to_wire();
                (Some(host), Some(protocol), Some(pull))
            }
            None => (None, None, None),
        };
        let (access_logs, origin_pull_logs) = match &self.logs {
            Some(logs) => {
                let (access, pull) = logs.to_wire();
                (Some(access), Some(pull))
            }
            None => (None, None),
        };

        Ok(Configuration {
            id: self.scope.id,
            name: self.scope.name.clone(),
            platform: self.scope.platform.clone(),
            path: self.scope.path.clone(),
            hostname: self.hostname_list(),
            origin_pull_host,
            origin_pull_protocol,
            origin_pull,
            origin_pull_cache_extension: self.origin_pull_cache_extension.clone().map(Into::into),
            access_logs,
            origin_pull_logs,
            cache_key_modification: self.cache_keys.clone().map(Into::into),
            cache_control: cache_control.into_iter().map(Into::into).collect(),
            origin_pull_policy: policies.into_iter().map(Into::into).collect(),
            origin_request_modification,
            origin_response_modification,
            client_request_modification,
            client_response_modification,
            static_header,
        })
    }

    /// Body of the request that creates the scope
    pub fn scope_create(&self) -> ScopeCreate {
        ScopeCreate {
            name: self.scope.name.clone(),
            platform: self.scope.platform.clone(),
            path: self.scope.path.clone(),
            hostname: self.hostname_list(),
        }
    }

    /// Rebuild state from the API document
    ///
    /// A scope without id, platform or path cannot be addressed again and is
    /// reported as a remote-state error.
    pub fn from_wire(
        account_hash: &str,
        host_hash: &str,
        scope_id: u64,
        config: Configuration,
    ) -> Result<Self> {
        let id = match config.id {
            Some(id) if id != 0 && !config.platform.is_empty() && !config.path.is_empty() => id,
            _ => {
                return Err(Error::missing_remote(format!(
                    "Scope is nil on {}/{}/{}",
                    account_hash, host_hash, scope_id
                )));
            }
        };
        let hostnames = config.domains();
        let dns_hostnames = config.actionable_domains();

        Ok(Self {
            id: id.to_string(),
            account_hash: account_hash.to_string(),
            host_hash: host_hash.to_string(),
            scope: ScopeBlock {
                id: Some(id),
                name: config.name,
                platform: config.platform,
                path: config.path,
            },
            hostnames,
            dns_hostnames,
            origin: OriginBlock::from_wire(
                config.origin_pull_host,
                config.origin_pull_protocol,
                config.origin_pull,
            ),
            origin_pull_cache_extension: config.origin_pull_cache_extension.map(Into::into),
            cache_keys: config.cache_key_modification.map(Into::into),
            logs: LogsBlock::from_wire(config.access_logs, config.origin_pull_logs),
            cache_control: codec::encode_from(config.cache_control),
            origin_pull_policy: codec::encode_from(config.origin_pull_policy),
            origin_request_edge_rule: codec::encode_from(config.origin_request_modification),
            origin_response_edge_rule: codec::encode_from(config.origin_response_modification),
            client_request_edge_rule: codec::encode_from(config.client_request_modification),
            client_response_edge_rule: codec::encode_from(config.client_response_modification),
            static_header: codec::encode_from(config.static_header),
        })
    }

    fn hostname_list(&self) -> Vec<ConfigurationHostname> {
        self.hostnames
            .iter()
            .map(|domain| ConfigurationHostname {
                domain: domain.clone(),
            })
            .collect()
    }
}

/// Scopes on a host and their full configuration
pub struct ConfigurationResource {
    api: Arc<dyn CdnApi>,
    type_name: &'static str,
}

impl ConfigurationResource {
    pub fn new(api: Arc<dyn CdnApi>) -> Self {
        Self {
            api,
            type_name: TYPE_NAME,
        }
    }

    async fn fetch(
        &self,
        ctx: &OperationContext,
        state: &ConfigurationState,
    ) -> Result<Option<Value>> {
        let scope_id = ids::parse_numeric(&state.id, "Scope")?;
        let config = found(
            self.api
                .get_configuration(ctx, &state.account_hash, &state.host_hash, scope_id)
                .await,
        )?;
        match config {
            Some(config) => {
                let fresh = ConfigurationState::from_wire(
                    &state.account_hash,
                    &state.host_hash,
                    scope_id,
                    config,
                )?;
                Ok(Some(to_state(&fresh)?))
            }
            None => Ok(None),
        }
    }

    /// Replace the scope's configuration with `configuration`, then read back
    async fn push(
        &self,
        ctx: &OperationContext,
        state: &ConfigurationState,
        mut configuration: Configuration,
    ) -> Result<Value> {
        let scope_id = ids::parse_numeric(&state.id, "Scope")?;
        configuration.id = Some(scope_id);

        tracing::info!(
            "Updating configuration {}/{}/{}",
            state.account_hash,
            state.host_hash,
            scope_id
        );
        self.api
            .update_configuration(
                ctx,
                &state.account_hash,
                &state.host_hash,
                scope_id,
                &configuration,
            )
            .await?;

        self.fetch(ctx, state)
            .await?
            .ok_or_else(|| vanished(self.type_name, &state.id))
    }
}

#[async_trait]
impl Resource for ConfigurationResource {
    fn type_name(&self) -> &'static str {
        self.type_name
    }

    async fn create(&self, ctx: &OperationContext, planned: Value) -> Result<Value> {
        let mut state: ConfigurationState = from_state(self.type_name, planned)?;
        let configuration = state.to_wire()?;

        tracing::info!(
            "Creating scope {} on {}/{}",
            state.scope.path,
            state.account_hash,
            state.host_hash
        );
        let created = self
            .api
            .create_scope(ctx, &state.account_hash, &state.host_hash, &state.scope_create())
            .await?;
        let scope_id = created.id.filter(|id| *id != 0).ok_or_else(|| {
            Error::missing_remote(format!(
                "scope created on {}/{} has no id",
                state.account_hash, state.host_hash
            ))
        })?;
        state.id = scope_id.to_string();

        match self.push(ctx, &state, configuration).await {
            Ok(fresh) => Ok(fresh),
            Err(err) => {
                let cleanup = self
                    .api
                    .delete_scope(ctx, &state.account_hash, &state.host_hash, scope_id);
                Err(roll_back(self.type_name, &state.id, err, cleanup).await)
            }
        }
    }

    async fn read(&self, ctx: &OperationContext, current: Value) -> Result<Option<Value>> {
        let state: ConfigurationState = from_state(self.type_name, current)?;
        tracing::debug!(
            "Reading configuration {}/{}/{}",
            state.account_hash,
            state.host_hash,
            state.id
        );
        self.fetch(ctx, &state).await
    }

    async fn update(&self, ctx: &OperationContext, planned: Value) -> Result<Value> {
        let state: ConfigurationState = from_state(self.type_name, planned)?;
        let configuration = state.to_wire()?;
        self.push(ctx, &state, configuration).await
    }

    async fn delete(&self, ctx: &OperationContext, current: Value) -> Result<()> {
        let state: ConfigurationState = from_state(self.type_name, current)?;
        let scope_id = ids::parse_numeric(&state.id, "Scope")?;

        tracing::info!(
            "Deleting scope {}/{}/{}",
            state.account_hash,
            state.host_hash,
            scope_id
        );
        self.api
            .delete_scope(ctx, &state.account_hash, &state.host_hash, scope_id)
            .await
    }

    async fn exists(&self, ctx: &OperationContext, current: Value) -> Result<bool> {
        let state: ConfigurationState = from_state(self.type_name, current)?;
        let scope_id = ids::parse_numeric(&state.id, "Scope")?;
        let config = found(
            self.api
                .get_configuration(ctx, &state.account_hash, &state.host_hash, scope_id)
                .await,
        )?;
        Ok(config.is_some())
    }

    fn import(&self, id: &str) -> Result<Value> {
        let parsed = ids::parse_scope_configuration(id)?;
        Ok(serde_json::json!({
            "id": parsed.scope_id.to_string(),
            "account_hash": parsed.account_hash,
            "host_hash": parsed.host_hash,
        }))
    }
}

/// The root CDS scope of a host
///
/// Create adopts the existing scope instead of making one. Delete forgets the
/// resource and leaves the scope in place.
pub struct DefaultConfigurationResource {
    inner: ConfigurationResource,
}

impl DefaultConfigurationResource {
    pub fn new(api: Arc<dyn CdnApi>) -> Self {
        Self {
            inner: ConfigurationResource {
                api,
                type_name: DEFAULT_TYPE_NAME,
            },
        }
    }
}

#[async_trait]
impl Resource for DefaultConfigurationResource {
    fn type_name(&self) -> &'static str {
        DEFAULT_TYPE_NAME
    }

    async fn create(&self, ctx: &OperationContext, planned: Value) -> Result<Value> {
        let mut state: ConfigurationState = from_state(DEFAULT_TYPE_NAME, planned)?;
        // Validate before touching the API
        state.to_wire()?;

        tracing::debug!("Fetching host {}/{}", state.account_hash, state.host_hash);
        let host = self
            .inner
            .api
            .get_host(ctx, &state.account_hash, &state.host_hash)
            .await?;
        let root = host.cds_root_scope().ok_or_else(|| {
            Error::missing_remote(format!(
                "Could not fetch root scope on parent host {}/{}",
                state.account_hash, state.host_hash
            ))
        })?;

        state.id = root.id.to_string();
        state.scope.id = Some(root.id);
        state.scope.platform = root.platform.clone();
        state.scope.path = root.path.clone();
        if state.scope.name.is_empty() {
            state.scope.name = root.name.clone();
        }

        tracing::info!(
            "Adopting root scope {} of {}/{}",
            root.id,
            state.account_hash,
            state.host_hash
        );
        let configuration = state.to_wire()?;
        self.inner.push(ctx, &state, configuration).await
    }

    async fn read(&self, ctx: &OperationContext, current: Value) -> Result<Option<Value>> {
        self.inner.read(ctx, current).await
    }

    async fn update(&self, ctx: &OperationContext, planned: Value) -> Result<Value> {
        self.inner.update(ctx, planned).await
    }

    async fn delete(&self, _ctx: &OperationContext, current: Value) -> Result<()> {
        let state: ConfigurationState = from_state(DEFAULT_TYPE_NAME, current)?;
        tracing::warn!(
            "Cannot destroy default scope configuration {}/{}/{}. It is removed from state but remains on the host",
            state.account_hash,
            state.host_hash,
            state.id
        );
        Ok(())
    }

    async fn exists(&self, ctx: &OperationContext, current: Value) -> Result<bool> {
        self.inner.exists(ctx, current).await
    }

    fn import(&self, id: &str) -> Result<Value> {
        self.inner.import(id)
    }
}
