use tracing::{info, warn};

use crate::error::PortalResult;
use crate::metadata::STORAGE_PREFIX;
use crate::observer::{Subscribers, Subscription};
use crate::storage::KeyValueStore;
use crate::tenant::config::{TenantConfig, TenantKey};
use crate::tenant::source::TenantConfigSource;

pub const DEFAULT_TENANT: &str = "amani";
pub const AVAILABLE_TENANTS: [&str; 3] = ["amani", "generic", "demo-ngo"];

const CURRENT_TENANT: &str = "currentTenant";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TenantChange {
    pub key: TenantKey,
    pub config: TenantConfig,
}

/// Tracks the single active tenant and its config, and derives the storage
/// namespace for that tenant. Knows nothing about entity stores.
pub struct TenantRegistry {
    kv: KeyValueStore,
    source: Box<dyn TenantConfigSource>,
    prefix: String,
    default_tenant: TenantKey,
    active: TenantKey,
    config: Option<TenantConfig>,
    subscribers: Subscribers<TenantChange>,
}

impl TenantRegistry {
    pub fn new(
        kv: KeyValueStore,
        source: impl TenantConfigSource + 'static,
        default_tenant: TenantKey,
    ) -> Self {
        Self {
            kv,
            source: Box::new(source),
            prefix: STORAGE_PREFIX.to_string(),
            active: default_tenant.clone(),
            default_tenant,
            config: None,
            subscribers: Subscribers::new(),
        }
    }

    /// Loads the persisted tenant (or the default) and its config. Nothing is
    /// written: only an explicit switch records a tenant choice.
    pub fn initialize(&mut self) -> TenantConfig {
        let key = self.resolve_active_tenant();
        self.activate(key, false)
    }

    /// The last explicitly switched-to tenant if one was persisted, else the
    /// default.
    pub fn resolve_active_tenant(&self) -> TenantKey {
        match self.kv.read(&self.global_key(CURRENT_TENANT)) {
            Some(saved) => TenantKey::parse(&saved).unwrap_or_else(|err| {
                warn!(error = %err, "ignoring persisted tenant choice");
                self.default_tenant.clone()
            }),
            None => self.default_tenant.clone(),
        }
    }

    /// Loads `key`'s config, falling back to a synthesized one, then makes
    /// `key` active, persists the choice and notifies subscribers. Only an
    /// invalid key is an error.
    pub fn switch_tenant(&mut self, key: &str) -> PortalResult<TenantConfig> {
        let key = TenantKey::parse(key)?;
        Ok(self.activate(key, true))
    }

    fn activate(&mut self, key: TenantKey, persist: bool) -> TenantConfig {
        let config = self.load_config(&key);

        self.active = key.clone();
        self.config = Some(config.clone());
        if persist {
            self.kv.write(&self.global_key(CURRENT_TENANT), key.as_str());
        }
        info!(tenant = %key, name = %config.name, "active tenant switched");

        self.subscribers.notify(&TenantChange {
            key,
            config: config.clone(),
        });
        config
    }

    fn load_config(&self, key: &TenantKey) -> TenantConfig {
        match self.source.load(key) {
            Ok(config) => config,
            Err(err) => {
                warn!(tenant = %key, error = %err, "failed to load tenant config, using fallback");
                TenantConfig::fallback(key)
            }
        }
    }

    pub fn current_tenant(&self) -> &TenantKey {
        &self.active
    }

    /// Absent only before the first load.
    pub fn current_config(&self) -> Option<&TenantConfig> {
        self.config.as_ref()
    }

    /// `<prefix><tenant>::<collection>`
    pub fn storage_key_for(&self, collection: &str) -> String {
        format!("{}{}::{}", self.prefix, self.active, collection)
    }

    /// Key outside any tenant namespace, e.g. the active-tenant marker.
    pub fn global_key(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }

    pub fn available_tenants(&self) -> &'static [&'static str] {
        &AVAILABLE_TENANTS
    }

    pub fn subscribe(
        &self,
        callback: impl Fn(&TenantChange) + Send + Sync + 'static,
    ) -> Subscription {
        self.subscribers.subscribe(callback)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::error::PortalError;
    use crate::tenant::config::TextBlocks;
    use crate::tenant::source::StaticConfigSource;

    fn key(raw: &str) -> TenantKey {
        TenantKey::parse(raw).unwrap()
    }

    fn generic_config() -> TenantConfig {
        TenantConfig {
            name: "Generic Charity".into(),
            logo_url: "/assets/tenants/generic/logo.svg".into(),
            primary_color: "#3f51b5".into(),
            accent_color: "#e91e63".into(),
            text_blocks: TextBlocks {
                welcome_message: "Welcome".into(),
                about_us: "About".into(),
                mission_statement: "Mission".into(),
                contact_info: "Contact".into(),
            },
        }
    }

    fn registry(kv: &KeyValueStore) -> TenantRegistry {
        let source = StaticConfigSource::new().with(key("generic"), generic_config());
        TenantRegistry::new(kv.clone(), source, key(DEFAULT_TENANT))
    }

    #[test]
    fn config_is_absent_before_first_load() {
        let kv = KeyValueStore::in_memory();
        let mut registry = registry(&kv);
        assert!(registry.current_config().is_none());
        registry.initialize();
        assert!(registry.current_config().is_some());
    }

    #[test]
    fn defaults_then_remembers_switches() {
        let kv = KeyValueStore::in_memory();
        let mut first = registry(&kv);
        assert_eq!(first.resolve_active_tenant().as_str(), "amani");

        let config = first.switch_tenant("generic").unwrap();
        assert_eq!(config, generic_config());
        assert_eq!(first.current_tenant().as_str(), "generic");

        let mut second = registry(&kv);
        assert_eq!(second.resolve_active_tenant().as_str(), "generic");
        second.initialize();
        assert_eq!(second.current_config(), Some(&generic_config()));
    }

    #[test]
    fn initialize_does_not_record_a_choice() {
        let kv = KeyValueStore::in_memory();
        registry(&kv).initialize();
        assert_eq!(kv.read("donors-app::currentTenant"), None);

        let mut other_default =
            TenantRegistry::new(kv.clone(), StaticConfigSource::new(), key("demo-ngo"));
        other_default.initialize();
        assert_eq!(other_default.current_tenant().as_str(), "demo-ngo");
    }

    #[test]
    fn missing_config_degrades_to_fallback() {
        let kv = KeyValueStore::in_memory();
        let mut registry = registry(&kv);
        let config = registry.switch_tenant("demo-ngo").unwrap();
        assert_eq!(config.name, "Demo-ngo");
        assert_eq!(registry.current_tenant().as_str(), "demo-ngo");
        assert_eq!(
            kv.read("donors-app::currentTenant").as_deref(),
            Some("demo-ngo")
        );
    }

    #[test]
    fn invalid_key_leaves_tenant_unchanged() {
        let kv = KeyValueStore::in_memory();
        let mut registry = registry(&kv);
        registry.initialize();
        let err = registry.switch_tenant("evil::trips").unwrap_err();
        assert!(matches!(err, PortalError::InvalidTenantKey(_)));
        assert_eq!(registry.current_tenant().as_str(), "amani");
    }

    #[test]
    fn garbage_persisted_choice_falls_back_to_default() {
        let kv = KeyValueStore::in_memory();
        kv.write("donors-app::currentTenant", "Not A Key");
        assert_eq!(registry(&kv).resolve_active_tenant().as_str(), "amani");
    }

    #[test]
    fn storage_keys_are_namespaced_per_tenant() {
        let kv = KeyValueStore::in_memory();
        let mut registry = registry(&kv);
        registry.initialize();
        assert_eq!(registry.storage_key_for("trips"), "donors-app::amani::trips");
        registry.switch_tenant("generic").unwrap();
        assert_eq!(
            registry.storage_key_for("promises"),
            "donors-app::generic::promises"
        );
    }

    #[test]
    fn subscribers_see_every_switch() {
        let kv = KeyValueStore::in_memory();
        let mut registry = registry(&kv);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let handle = registry.subscribe(move |change| {
            sink.lock().unwrap().push(change.key.to_string());
        });

        registry.initialize();
        registry.switch_tenant("generic").unwrap();
        handle.unsubscribe();
        registry.switch_tenant("demo-ngo").unwrap();

        assert_eq!(*seen.lock().unwrap(), vec!["amani", "generic"]);
    }

    #[test]
    fn lists_known_tenants() {
        let kv = KeyValueStore::in_memory();
        let tenants = registry(&kv).available_tenants();
        assert!(tenants.contains(&"amani"));
        assert!(tenants.contains(&"generic"));
        assert!(tenants.contains(&"demo-ngo"));
    }
}
