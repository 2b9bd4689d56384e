use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{PortalError, PortalResult};

static TENANT_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9-]*$").expect("tenant key pattern is valid"));

/// Short identifier selecting both a tenant's branding and its storage
/// namespace, e.g. `amani` or `demo-ngo`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TenantKey(String);

impl TenantKey {
    pub fn parse(raw: &str) -> PortalResult<Self> {
        let trimmed = raw.trim();
        if TENANT_KEY_RE.is_match(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(PortalError::InvalidTenantKey(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TenantKey {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TenantKey {
    type Error = PortalError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TenantKey> for String {
    fn from(key: TenantKey) -> Self {
        key.0
    }
}

impl AsRef<str> for TenantKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBlocks {
    pub welcome_message: String,
    pub about_us: String,
    pub mission_statement: String,
    pub contact_info: String,
}

/// Branding for one tenant, as published in `<key>/config.json`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantConfig {
    pub name: String,
    pub logo_url: String,
    pub primary_color: String,
    pub accent_color: String,
    pub text_blocks: TextBlocks,
}

pub const FALLBACK_LOGO_URL: &str = "/assets/logo-placeholder.svg";
pub const FALLBACK_PRIMARY_COLOR: &str = "#1976d2";
pub const FALLBACK_ACCENT_COLOR: &str = "#ff5722";

impl TenantConfig {
    /// Config synthesized when a tenant's published config cannot be loaded.
    pub fn fallback(key: &TenantKey) -> Self {
        Self {
            name: capitalize(key.as_str()),
            logo_url: FALLBACK_LOGO_URL.to_string(),
            primary_color: FALLBACK_PRIMARY_COLOR.to_string(),
            accent_color: FALLBACK_ACCENT_COLOR.to_string(),
            text_blocks: TextBlocks {
                welcome_message: format!("Welcome to {key}"),
                about_us: "About our organization".to_string(),
                mission_statement: "Our mission statement".to_string(),
                contact_info: "Contact us for more information".to_string(),
            },
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
