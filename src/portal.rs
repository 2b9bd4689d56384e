//! Application context.
//!
//! [`Portal`] is built once at startup and owns every piece of process-wide
//! state: the tenant registry, the session and both entity stores. Switching
//! tenant goes through here so the stores always follow the active namespace.

use tracing::debug;

use crate::auth::{AuthState, Role, SessionHolder, User};
use crate::error::PortalResult;
use crate::promises::PromiseStore;
use crate::storage::KeyValueStore;
use crate::tenant::{TenantConfig, TenantConfigSource, TenantKey, TenantRegistry};
use crate::trips::TripStore;

pub struct Portal {
    registry: TenantRegistry,
    session: SessionHolder,
    trips: TripStore,
    promises: PromiseStore,
}

impl Portal {
    pub fn open(
        kv: KeyValueStore,
        source: impl TenantConfigSource + 'static,
        default_tenant: TenantKey,
    ) -> Self {
        let mut registry = TenantRegistry::new(kv.clone(), source, default_tenant);
        registry.initialize();
        let session = SessionHolder::load(kv.clone());
        let trips = TripStore::open(kv.clone(), &registry);
        let promises = PromiseStore::open(kv, &registry);
        debug!(
            tenant = %registry.current_tenant(),
            trips = trips.len(),
            promises = promises.len(),
            "portal opened"
        );
        Self {
            registry,
            session,
            trips,
            promises,
        }
    }

    /// Switches the active tenant and rebinds both stores to its namespace.
    pub fn switch_tenant(&mut self, key: &str) -> PortalResult<TenantConfig> {
        let config = self.registry.switch_tenant(key)?;
        self.trips.rebind(&self.registry);
        self.promises.rebind(&self.registry);
        Ok(config)
    }

    /// Logs in and moves to the user's own tenant.
    pub fn login(&mut self, email: &str, password: &str) -> PortalResult<AuthState> {
        let state = self.session.login(email, password)?;
        if let Some(user) = state.user.as_ref() {
            self.switch_tenant(&user.tenant_key)?;
        }
        Ok(state)
    }

    pub fn logout(&mut self) {
        self.session.logout();
    }

    pub fn require(&self, roles: &[Role]) -> PortalResult<&User> {
        self.session.authorize(roles)
    }

    pub fn registry(&self) -> &TenantRegistry {
        &self.registry
    }

    pub fn session(&self) -> &SessionHolder {
        &self.session
    }

    pub fn trips(&self) -> &TripStore {
        &self.trips
    }

    pub fn trips_mut(&mut self) -> &mut TripStore {
        &mut self.trips
    }

    pub fn promises(&self) -> &PromiseStore {
        &self.promises
    }

    pub fn promises_mut(&mut self) -> &mut PromiseStore {
        &mut self.promises
    }
}
