//! Multi-tenant donor portal core.
//!
//! Tenant selection and branding, a namespaced key-value persistence layer,
//! mock session handling, and two tenant-scoped collections: donor trips with
//! checklists and donation promises with CSV export.

pub mod auth;
pub mod cli;
pub mod entity_store;
pub mod error;
pub mod metadata;
pub mod observer;
pub mod portal;
pub mod promises;
pub mod storage;
pub mod tenant;
pub mod trips;

pub use auth::{AuthState, Role, SessionHolder, User};
pub use entity_store::{Entity, EntityStore};
pub use error::{PortalError, PortalResult};
pub use portal::Portal;
pub use storage::{FileBackend, KeyValueBackend, KeyValueStore, MemoryBackend, StorageError};
pub use tenant::{TenantConfig, TenantKey, TenantRegistry};
