//! Tenant config loaders.
//!
//! The registry only consumes a loaded config or its absence; each source
//! reports why it could not produce one and the registry decides what to do.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{PortalError, PortalResult};
use crate::tenant::config::{TenantConfig, TenantKey};

pub trait TenantConfigSource: Send + Sync {
    fn load(&self, key: &TenantKey) -> PortalResult<TenantConfig>;
}

impl<S: TenantConfigSource + ?Sized> TenantConfigSource for Box<S> {
    fn load(&self, key: &TenantKey) -> PortalResult<TenantConfig> {
        (**self).load(key)
    }
}

/// Reads `<root>/<key>/config.json`.
#[derive(Debug, Clone)]
pub struct DirectoryConfigSource {
    root: PathBuf,
}

impl DirectoryConfigSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl TenantConfigSource for DirectoryConfigSource {
    fn load(&self, key: &TenantKey) -> PortalResult<TenantConfig> {
        let path = self.root.join(key.as_str()).join("config.json");
        let contents = fs::read_to_string(&path).map_err(|e| {
            PortalError::ConfigUnavailable(format!("{}: {}", path.display(), e))
        })?;
        let config = serde_json::from_str(&contents)?;
        Ok(config)
    }
}

/// Fetches `<base_url>/assets/tenants/<key>/config.json`.
pub struct HttpConfigSource {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpConfigSource {
    pub fn new(base_url: &str) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(5))
            .build();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent,
        }
    }

    pub fn config_url(&self, key: &TenantKey) -> String {
        format!("{}/assets/tenants/{}/config.json", self.base_url, key)
    }
}

impl TenantConfigSource for HttpConfigSource {
    fn load(&self, key: &TenantKey) -> PortalResult<TenantConfig> {
        let url = self.config_url(key);
        // ureq reports 4xx/5xx responses as errors
        let response = self.agent.get(&url).call().map_err(|e| {
            PortalError::ConfigUnavailable(format!("Failed to fetch {url}: {e}"))
        })?;

        response
            .into_json::<TenantConfig>()
            .map_err(|e| PortalError::ConfigUnavailable(format!("Malformed config at {url}: {e}")))
    }
}

/// In-memory configs keyed by tenant; unknown keys are unavailable.
#[derive(Debug, Clone, Default)]
pub struct StaticConfigSource {
    configs: HashMap<TenantKey, TenantConfig>,
}

impl StaticConfigSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: TenantKey, config: TenantConfig) -> Self {
        self.configs.insert(key, config);
        self
    }
}

impl TenantConfigSource for StaticConfigSource {
    fn load(&self, key: &TenantKey) -> PortalResult<TenantConfig> {
        self.configs
            .get(key)
            .cloned()
            .ok_or_else(|| PortalError::ConfigUnavailable(format!("no config for tenant {key}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tenant::config::TextBlocks;

    fn key(raw: &str) -> TenantKey {
        TenantKey::parse(raw).unwrap()
    }

    fn amani() -> TenantConfig {
        TenantConfig {
            name: "Amani Foundation".into(),
            logo_url: "/assets/tenants/amani/logo.svg".into(),
            primary_color: "#2e7d32".into(),
            accent_color: "#ffc107".into(),
            text_blocks: TextBlocks {
                welcome_message: "Karibu".into(),
                about_us: "About".into(),
                mission_statement: "Mission".into(),
                contact_info: "Contact".into(),
            },
        }
    }

    #[test]
    fn directory_source_reads_tenant_folder() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("amani")).unwrap();
        fs::write(
            dir.path().join("amani").join("config.json"),
            serde_json::to_string(&amani()).unwrap(),
        )
        .unwrap();

        let source = DirectoryConfigSource::new(dir.path());
        assert_eq!(source.load(&key("amani")).unwrap(), amani());
        assert!(matches!(
            source.load(&key("generic")),
            Err(PortalError::ConfigUnavailable(_))
        ));
    }

    #[test]
    fn directory_source_surfaces_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("amani")).unwrap();
        fs::write(dir.path().join("amani").join("config.json"), "{").unwrap();
        let source = DirectoryConfigSource::new(dir.path());
        assert!(matches!(
            source.load(&key("amani")),
            Err(PortalError::SerdeJsonError(_))
        ));
    }

    #[test]
    fn http_source_builds_asset_url() {
        let source = HttpConfigSource::new("https://portal.example.org/");
        assert_eq!(
            source.config_url(&key("demo-ngo")),
            "https://portal.example.org/assets/tenants/demo-ngo/config.json"
        );
    }

    #[test]
    fn http_source_reports_unreachable_host_as_unavailable() {
        let source = HttpConfigSource::new("http://127.0.0.1:1");
        let err = source.load(&key("amani")).unwrap_err();
        assert!(matches!(
            err,
            PortalError::ConfigUnavailable(ref msg) if msg.contains("/assets/tenants/amani/config.json")
        ));
    }

    #[test]
    fn static_source_only_knows_registered_tenants() {
        let source = StaticConfigSource::new().with(key("amani"), amani());
        assert_eq!(source.load(&key("amani")).unwrap().name, "Amani Foundation");
        assert!(source.load(&key("generic")).is_err());
    }
}
