//! Backend selection
//!
//! Every logical service resolves to exactly one [`Route`] when the selector
//! is built. Emulated stores are constructed lazily, at most once per
//! selector, and seeded with the baseline fixtures on construction.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use shimstack_glue::GlueStorage;
use shimstack_secretsmanager::SecretsManagerStorage;
use shimstack_ssm::SsmStorage;
use tracing::{debug, info};
use url::Url;

use crate::config::{ExecutionMode, Settings, DEFAULT_REGION};
use crate::error::SelectorError;
use crate::fixtures;
use crate::service::Service;

/// Access key and secret the local emulator accepts
pub const LOCAL_ACCESS_KEY_ID: &str = "test";
pub const LOCAL_SECRET_ACCESS_KEY: &str = "test";

/// Where a service's calls go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// In-memory store owned by the selector
    Emulated,
    /// Local network emulator
    NetworkBacked,
    /// The real service
    Real,
}

impl Route {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Emulated => "emulated",
            Self::NetworkBacked => "network",
            Self::Real => "real",
        }
    }

    fn resolve(service: Service, mode: ExecutionMode) -> Option<Self> {
        match mode {
            ExecutionMode::Aws => Some(Self::Real),
            _ if service.has_emulation() => Some(Self::Emulated),
            ExecutionMode::Hybrid if service.is_network_capable() => Some(Self::NetworkBacked),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl StaticCredentials {
    fn local() -> Self {
        Self {
            access_key_id: LOCAL_ACCESS_KEY_ID.to_string(),
            secret_access_key: LOCAL_SECRET_ACCESS_KEY.to_string(),
        }
    }
}

/// Everything an SDK client needs to reach a remote service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEndpoint {
    pub service: Service,
    pub region: String,
    /// Endpoint override; `None` means the service's public endpoint
    pub endpoint_url: Option<Url>,
    /// Static credentials; `None` means the default credential chain
    pub credentials: Option<StaticCredentials>,
    /// Bucket in the path rather than the host name
    pub force_path_style: bool,
}

impl RemoteEndpoint {
    fn local(service: Service, endpoint: &Url) -> Self {
        Self {
            service,
            region: DEFAULT_REGION.to_string(),
            endpoint_url: Some(endpoint.clone()),
            credentials: Some(StaticCredentials::local()),
            force_path_style: service == Service::S3,
        }
    }

    fn real(service: Service, region: &str) -> Self {
        Self {
            service,
            region: region.to_string(),
            endpoint_url: None,
            credentials: None,
            force_path_style: false,
        }
    }

    pub fn is_local(&self) -> bool {
        self.endpoint_url.is_some()
    }
}

/// Backend of a service that has an emulated store
#[derive(Debug, Clone)]
pub enum Backend<S> {
    Emulated(Arc<S>),
    Remote(RemoteEndpoint),
}

impl<S> Backend<S> {
    pub fn as_emulated(&self) -> Option<&Arc<S>> {
        match self {
            Self::Emulated(store) => Some(store),
            Self::Remote(_) => None,
        }
    }

    pub fn as_remote(&self) -> Option<&RemoteEndpoint> {
        match self {
            Self::Emulated(_) => None,
            Self::Remote(endpoint) => Some(endpoint),
        }
    }

    pub fn is_emulated(&self) -> bool {
        matches!(self, Self::Emulated(_))
    }
}

/// Client handle for any logical service
#[derive(Debug, Clone)]
pub enum ClientHandle {
    Catalog(Arc<GlueStorage>),
    Secrets(Arc<SecretsManagerStorage>),
    Parameters(Arc<SsmStorage>),
    Remote(RemoteEndpoint),
}

impl ClientHandle {
    pub fn route(&self) -> Route {
        match self {
            Self::Catalog(_) | Self::Secrets(_) | Self::Parameters(_) => Route::Emulated,
            Self::Remote(endpoint) if endpoint.is_local() => Route::NetworkBacked,
            Self::Remote(_) => Route::Real,
        }
    }
}

/// Hands out service clients according to the execution mode
pub struct BackendSelector {
    settings: Settings,
    routes: BTreeMap<Service, Option<Route>>,
    catalog: OnceCell<Arc<GlueStorage>>,
    secrets: OnceCell<Arc<SecretsManagerStorage>>,
    parameters: OnceCell<Arc<SsmStorage>>,
}

impl BackendSelector {
    pub fn new(settings: Settings) -> Self {
        let routes: BTreeMap<Service, Option<Route>> = Service::ALL
            .into_iter()
            .map(|service| (service, Route::resolve(service, settings.mode)))
            .collect();

        info!(mode = %settings.mode, region = %settings.region, "Backend selector ready");
        for (service, route) in &routes {
            match route {
                Some(route) => debug!(service = %service, route = %route, "Resolved route"),
                None => debug!(service = %service, "No route in this mode"),
            }
        }

        Self {
            settings,
            routes,
            catalog: OnceCell::new(),
            secrets: OnceCell::new(),
            parameters: OnceCell::new(),
        }
    }

    /// Build a selector from the environment and configuration files
    pub fn from_env() -> Result<Self, SelectorError> {
        Ok(Self::new(Settings::load()?))
    }

    pub fn mode(&self) -> ExecutionMode {
        self.settings.mode
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Route for a service, or an error if the mode has none
    pub fn route(&self, service: Service) -> Result<Route, SelectorError> {
        self.routes
            .get(&service)
            .copied()
            .flatten()
            .ok_or_else(|| self.unsupported(service))
    }

    /// All services with their resolved route, `None` where unsupported
    pub fn routes(&self) -> impl Iterator<Item = (Service, Option<Route>)> + '_ {
        self.routes.iter().map(|(service, route)| (*service, *route))
    }

    pub fn catalog(&self) -> Result<Backend<GlueStorage>, SelectorError> {
        self.backend(Service::Glue, || self.catalog_store())
    }

    pub fn secrets(&self) -> Result<Backend<SecretsManagerStorage>, SelectorError> {
        self.backend(Service::SecretsManager, || self.secrets_store())
    }

    pub fn parameters(&self) -> Result<Backend<SsmStorage>, SelectorError> {
        self.backend(Service::Ssm, || self.parameters_store())
    }

    /// Client handle for any service
    pub fn client(&self, service: Service) -> Result<ClientHandle, SelectorError> {
        let route = self.route(service)?;
        Ok(match (route, service) {
            (Route::Emulated, Service::Glue) => ClientHandle::Catalog(self.catalog_store()),
            (Route::Emulated, Service::SecretsManager) => {
                ClientHandle::Secrets(self.secrets_store())
            }
            (Route::Emulated, Service::Ssm) => ClientHandle::Parameters(self.parameters_store()),
            (Route::Emulated, _) => return Err(self.unsupported(service)),
            (route, _) => ClientHandle::Remote(self.remote(service, route)),
        })
    }

    /// Emulated catalog for fixture setup; unavailable against real services
    pub fn emulated_catalog(&self) -> Result<Arc<GlueStorage>, SelectorError> {
        self.require_emulation(Service::Glue)?;
        Ok(self.catalog_store())
    }

    pub fn emulated_secrets(&self) -> Result<Arc<SecretsManagerStorage>, SelectorError> {
        self.require_emulation(Service::SecretsManager)?;
        Ok(self.secrets_store())
    }

    pub fn emulated_parameters(&self) -> Result<Arc<SsmStorage>, SelectorError> {
        self.require_emulation(Service::Ssm)?;
        Ok(self.parameters_store())
    }

    /// Clear every store that has been constructed. Unconstructed stores stay that way.
    pub fn cleanup(&self) {
        if let Some(catalog) = self.catalog.get() {
            catalog.clear();
        }
        if let Some(secrets) = self.secrets.get() {
            secrets.clear();
        }
        if let Some(parameters) = self.parameters.get() {
            parameters.clear();
        }
        debug!(constructed = ?self.constructed(), "Cleaned up emulated stores");
    }

    /// Services whose emulated store has been constructed
    pub fn constructed(&self) -> Vec<Service> {
        let mut services = Vec::new();
        if self.catalog.get().is_some() {
            services.push(Service::Glue);
        }
        if self.secrets.get().is_some() {
            services.push(Service::SecretsManager);
        }
        if self.parameters.get().is_some() {
            services.push(Service::Ssm);
        }
        services
    }

    fn backend<S>(
        &self,
        service: Service,
        store: impl FnOnce() -> Arc<S>,
    ) -> Result<Backend<S>, SelectorError> {
        match self.route(service)? {
            Route::Emulated => Ok(Backend::Emulated(store())),
            route => Ok(Backend::Remote(self.remote(service, route))),
        }
    }

    fn remote(&self, service: Service, route: Route) -> RemoteEndpoint {
        match route {
            Route::NetworkBacked => RemoteEndpoint::local(service, &self.settings.local_endpoint),
            _ => RemoteEndpoint::real(service, &self.settings.region),
        }
    }

    fn require_emulation(&self, service: Service) -> Result<(), SelectorError> {
        match self.route(service)? {
            Route::Emulated => Ok(()),
            _ => Err(self.unsupported(service)),
        }
    }

    fn unsupported(&self, service: Service) -> SelectorError {
        let hint = match (self.settings.mode, service.is_network_capable()) {
            (ExecutionMode::Aws, _) => "emulated stores are not available against real services",
            (ExecutionMode::Mock, true) => "set TEST_ENVIRONMENT=hybrid to use the local emulator",
            _ => "set TEST_ENVIRONMENT=aws to use the real service",
        };
        SelectorError::UnsupportedInMode {
            service,
            mode: self.settings.mode,
            hint,
        }
    }

    fn catalog_store(&self) -> Arc<GlueStorage> {
        Arc::clone(self.catalog.get_or_init(|| {
            info!(duplicate_policy = ?self.settings.catalog.duplicate_policy, "Constructing emulated catalog");
            Arc::new(GlueStorage::with_duplicate_policy(
                self.settings.catalog.duplicate_policy,
            ))
        }))
    }

    fn secrets_store(&self) -> Arc<SecretsManagerStorage> {
        Arc::clone(self.secrets.get_or_init(|| {
            info!("Constructing emulated secret store");
            let storage = SecretsManagerStorage::new();
            fixtures::seed_secrets(&storage);
            Arc::new(storage)
        }))
    }

    fn parameters_store(&self) -> Arc<SsmStorage> {
        Arc::clone(self.parameters.get_or_init(|| {
            info!("Constructing emulated parameter store");
            let storage = SsmStorage::new();
            fixtures::seed_parameters(&storage);
            Arc::new(storage)
        }))
    }
}

impl fmt::Debug for BackendSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendSelector")
            .field("mode", &self.settings.mode)
            .field("constructed", &self.constructed())
            .finish()
    }
}
