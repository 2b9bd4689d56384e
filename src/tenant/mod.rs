//! Tenant registry: the active tenant, its branding config and the storage
//! namespace derived from it.

pub mod config;
pub mod registry;
pub mod source;

pub use config::{TenantConfig, TenantKey, TextBlocks};
pub use registry::{AVAILABLE_TENANTS, DEFAULT_TENANT, TenantChange, TenantRegistry};
pub use source::{DirectoryConfigSource, HttpConfigSource, StaticConfigSource, TenantConfigSource};
