//! Test doubles and common utilities for contract tests
//!
//! `FakeCdnApi` keeps every object in memory and answers like the real API:
//! unknown ids are `Error::NotFound`, created objects get fresh ids, and a new
//! host comes with its root CDS scope. Individual methods can be made to fail
//! or stall.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use striketracker_core::config::OperationContext;
use striketracker_core::error::{Error, Result};
use striketracker_core::models::{
    Certificate, Configuration, Host, HostScope, Origin, ScopeCreate, CDS_PLATFORM,
};
use striketracker_core::traits::CdnApi;
use striketracker_core::{ProviderConfig, StrikeTrackerProvider};

#[derive(Default)]
struct Store {
    next_id: u64,
    origins: HashMap<u64, Origin>,
    certificates: HashMap<u64, Certificate>,
    hosts: HashMap<String, Host>,
    configurations: HashMap<(String, u64), Configuration>,
}

impl Store {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory StrikeTracker API that counts calls
#[derive(Default)]
pub struct FakeCdnApi {
    store: Mutex<Store>,
    calls: AtomicUsize,
    writes: AtomicUsize,
    updates: Mutex<Vec<Configuration>>,
    log: Mutex<Vec<&'static str>>,
    failing: Mutex<HashSet<&'static str>>,
    stalled: Mutex<HashMap<&'static str, Duration>>,
}

impl FakeCdnApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Number of API calls of any kind
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of create/update/delete calls
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Every configuration document received by `update_configuration`
    pub fn configuration_updates(&self) -> Vec<Configuration> {
        self.updates.lock().unwrap().clone()
    }

    /// Insert or overwrite a scope configuration directly
    pub fn put_configuration(&self, host_hash: &str, scope_id: u64, config: Configuration) {
        self.store
            .lock()
            .unwrap()
            .configurations
            .insert((host_hash.to_string(), scope_id), config);
    }

    /// Stored configuration of a scope
    pub fn configuration(&self, host_hash: &str, scope_id: u64) -> Option<Configuration> {
        self.store
            .lock()
            .unwrap()
            .configurations
            .get(&(host_hash.to_string(), scope_id))
            .cloned()
    }

    /// Remove an origin behind the provider's back
    pub fn forget_origin(&self, id: u64) {
        self.store.lock().unwrap().origins.remove(&id);
    }

    /// Make every call to `method` fail with a transport error
    pub fn fail(&self, method: &'static str) {
        self.failing.lock().unwrap().insert(method);
    }

    /// Make every call to `method` take `delay` before answering
    pub fn stall(&self, method: &'static str, delay: Duration) {
        self.stalled.lock().unwrap().insert(method, delay);
    }

    /// Number of calls made to `method`
    pub fn calls_to(&self, method: &str) -> usize {
        self.log.lock().unwrap().iter().filter(|m| **m == method).count()
    }

    /// Scope ids present on a host
    pub fn scope_ids(&self, host_hash: &str) -> Vec<u64> {
        let store = self.store.lock().unwrap();
        let mut ids: Vec<u64> = store
            .configurations
            .keys()
            .filter(|(hash, _)| hash == host_hash)
            .map(|(_, id)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn origin_count(&self) -> usize {
        self.store.lock().unwrap().origins.len()
    }

    pub fn host_count(&self) -> usize {
        self.store.lock().unwrap().hosts.len()
    }

    async fn enter(&self, method: &'static str, write: bool) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if write {
            self.writes.fetch_add(1, Ordering::SeqCst);
        }
        self.log.lock().unwrap().push(method);

        let delay = self.stalled.lock().unwrap().get(method).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.lock().unwrap().contains(method) {
            return Err(Error::http(format!("{}: connection reset", method)));
        }
        Ok(())
    }
}

fn missing(kind: &str, id: impl std::fmt::Display) -> Error {
    Error::not_found(format!("{} {} not found", kind, id))
}

#[async_trait::async_trait]
impl CdnApi for FakeCdnApi {
    async fn get_origin(&self, _ctx: &OperationContext, _account: &str, id: u64) -> Result<Origin> {
        self.enter("get_origin", false).await?;
        let store = self.store.lock().unwrap();
        store.origins.get(&id).cloned().ok_or_else(|| missing("origin", id))
    }

    async fn create_origin(
        &self,
        _ctx: &OperationContext,
        _account: &str,
        origin: &Origin,
    ) -> Result<Origin> {
        self.enter("create_origin", true).await?;
        let mut store = self.store.lock().unwrap();
        let id = store.next_id();
        let mut created = origin.clone();
        created.id = Some(id);
        store.origins.insert(id, created.clone());
        Ok(created)
    }

    async fn update_origin(
        &self,
        _ctx: &OperationContext,
        _account: &str,
        id: u64,
        origin: &Origin,
    ) -> Result<Origin> {
        self.enter("update_origin", true).await?;
        let mut store = self.store.lock().unwrap();
        let slot = store.origins.get_mut(&id).ok_or_else(|| missing("origin", id))?;
        *slot = origin.clone();
        slot.id = Some(id);
        Ok(slot.clone())
    }

    async fn delete_origin(&self, _ctx: &OperationContext, _account: &str, id: u64) -> Result<()> {
        self.enter("delete_origin", true).await?;
        let mut store = self.store.lock().unwrap();
        store.origins.remove(&id).map(|_| ()).ok_or_else(|| missing("origin", id))
    }

    async fn get_certificate(
        &self,
        _ctx: &OperationContext,
        _account: &str,
        id: u64,
    ) -> Result<Certificate> {
        self.enter("get_certificate", false).await?;
        let store = self.store.lock().unwrap();
        store
            .certificates
            .get(&id)
            .cloned()
            .ok_or_else(|| missing("certificate", id))
    }

    async fn upload_certificate(
        &self,
        _ctx: &OperationContext,
        _account: &str,
        certificate: &Certificate,
    ) -> Result<Certificate> {
        self.enter("upload_certificate", true).await?;
        let mut store = self.store.lock().unwrap();
        let id = store.next_id();
        let mut created = certificate.clone();
        created.id = Some(id);
        created.common_name = "cdn.example.com".to_string();
        created.fingerprint = "AB:CD".to_string();
        store.certificates.insert(id, created.clone());
        Ok(created)
    }

    async fn update_certificate(
        &self,
        _ctx: &OperationContext,
        _account: &str,
        id: u64,
        certificate: &Certificate,
    ) -> Result<Certificate> {
        self.enter("update_certificate", true).await?;
        let mut store = self.store.lock().unwrap();
        let slot = store
            .certificates
            .get_mut(&id)
            .ok_or_else(|| missing("certificate", id))?;
        slot.certificate = certificate.certificate.clone();
        slot.key = certificate.key.clone();
        slot.ca_bundle = certificate.ca_bundle.clone();
        slot.trusted = certificate.trusted;
        Ok(slot.clone())
    }

    async fn delete_certificate(
        &self,
        _ctx: &OperationContext,
        _account: &str,
        id: u64,
    ) -> Result<()> {
        self.enter("delete_certificate", true).await?;
        let mut store = self.store.lock().unwrap();
        store
            .certificates
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| missing("certificate", id))
    }

    async fn get_host(&self, _ctx: &OperationContext, _account: &str, host_hash: &str) -> Result<Host> {
        self.enter("get_host", false).await?;
        let store = self.store.lock().unwrap();
        let mut host = store
            .hosts
            .get(host_hash)
            .cloned()
            .ok_or_else(|| missing("host", host_hash))?;
        let mut scopes: Vec<HostScope> = store
            .configurations
            .iter()
            .filter(|((hash, _), _)| hash == host_hash)
            .map(|((_, id), config)| HostScope {
                id: *id,
                platform: config.platform.clone(),
                path: config.path.clone(),
                name: config.name.clone(),
            })
            .collect();
        scopes.sort_by_key(|scope| scope.id);
        host.scopes = scopes;
        Ok(host)
    }

    async fn create_host(&self, _ctx: &OperationContext, _account: &str, host: &Host) -> Result<Host> {
        self.enter("create_host", true).await?;
        let mut store = self.store.lock().unwrap();
        let hash = format!("h{}", store.next_id());
        let root = store.next_id();
        let mut created = host.clone();
        created.hash_code = hash.clone();
        created.host_type = "HOST".to_string();
        store.hosts.insert(hash.clone(), created.clone());
        store.configurations.insert(
            (hash, root),
            Configuration {
                id: Some(root),
                name: "Default".to_string(),
                platform: CDS_PLATFORM.to_string(),
                path: "/".to_string(),
                ..Default::default()
            },
        );
        Ok(created)
    }

    async fn update_host(
        &self,
        _ctx: &OperationContext,
        _account: &str,
        host_hash: &str,
        host: &Host,
    ) -> Result<Host> {
        self.enter("update_host", true).await?;
        let mut store = self.store.lock().unwrap();
        let slot = store
            .hosts
            .get_mut(host_hash)
            .ok_or_else(|| missing("host", host_hash))?;
        slot.name = host.name.clone();
        slot.services = host.services.clone();
        Ok(slot.clone())
    }

    async fn delete_host(&self, _ctx: &OperationContext, _account: &str, host_hash: &str) -> Result<()> {
        self.enter("delete_host", true).await?;
        let mut store = self.store.lock().unwrap();
        store
            .hosts
            .remove(host_hash)
            .ok_or_else(|| missing("host", host_hash))?;
        store.configurations.retain(|(hash, _), _| hash != host_hash);
        Ok(())
    }

    async fn get_configuration(
        &self,
        _ctx: &OperationContext,
        _account: &str,
        host_hash: &str,
        scope_id: u64,
    ) -> Result<Configuration> {
        self.enter("get_configuration", false).await?;
        let store = self.store.lock().unwrap();
        store
            .configurations
            .get(&(host_hash.to_string(), scope_id))
            .cloned()
            .ok_or_else(|| missing("scope", scope_id))
    }

    async fn create_scope(
        &self,
        _ctx: &OperationContext,
        _account: &str,
        host_hash: &str,
        scope: &ScopeCreate,
    ) -> Result<Configuration> {
        self.enter("create_scope", true).await?;
        let mut store = self.store.lock().unwrap();
        if !store.hosts.contains_key(host_hash) {
            return Err(missing("host", host_hash));
        }
        let id = store.next_id();
        let config = Configuration {
            id: Some(id),
            name: scope.name.clone(),
            platform: scope.platform.clone(),
            path: scope.path.clone(),
            hostname: scope.hostname.clone(),
            ..Default::default()
        };
        store
            .configurations
            .insert((host_hash.to_string(), id), config.clone());
        Ok(config)
    }

    async fn update_configuration(
        &self,
        _ctx: &OperationContext,
        _account: &str,
        host_hash: &str,
        scope_id: u64,
        configuration: &Configuration,
    ) -> Result<Configuration> {
        self.enter("update_configuration", true).await?;
        self.updates.lock().unwrap().push(configuration.clone());
        let mut store = self.store.lock().unwrap();
        let slot = store
            .configurations
            .get_mut(&(host_hash.to_string(), scope_id))
            .ok_or_else(|| missing("scope", scope_id))?;
        *slot = configuration.clone();
        slot.id = Some(scope_id);
        Ok(slot.clone())
    }

    async fn delete_scope(
        &self,
        _ctx: &OperationContext,
        _account: &str,
        host_hash: &str,
        scope_id: u64,
    ) -> Result<()> {
        self.enter("delete_scope", true).await?;
        let mut store = self.store.lock().unwrap();
        store
            .configurations
            .remove(&(host_hash.to_string(), scope_id))
            .map(|_| ())
            .ok_or_else(|| missing("scope", scope_id))
    }

    fn api_name(&self) -> &'static str {
        "fake"
    }
}

/// Provider wired to a fresh fake API
pub fn provider() -> (StrikeTrackerProvider, Arc<FakeCdnApi>) {
    let api = FakeCdnApi::new();
    let provider = StrikeTrackerProvider::new(api.clone(), &ProviderConfig::new("test-token"));
    (provider, api)
}

/// Context for calling resources directly
pub fn ctx(operation: &str) -> OperationContext {
    OperationContext::new(operation, std::time::Duration::from_secs(8))
}
