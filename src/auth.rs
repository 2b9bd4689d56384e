//! Mock login and session state.
//!
//! There is no real authentication: users come from a fixed directory and
//! share one demo password. The session only gates who may reach trip and
//! promise operations; the stores themselves never look at identity.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use ulid::Ulid;

use crate::error::{PortalError, PortalResult};
use crate::metadata::STORAGE_PREFIX;
use crate::observer::{Subscribers, Subscription};
use crate::storage::KeyValueStore;

pub const DEMO_PASSWORD: &str = "password123";

const AUTH_KEY: &str = "auth";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Donor,
    Staff,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Donor => "donor",
            Role::Staff => "staff",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "donor" => Ok(Role::Donor),
            "staff" => Ok(Role::Staff),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("Unknown role: {s}")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub tenant_key: String,
}

impl User {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    pub is_logged_in: bool,
    pub user: Option<User>,
    pub token: Option<String>,
}

fn mock_user(
    id: &str,
    email: &str,
    role: Role,
    first_name: &str,
    last_name: &str,
    tenant_key: &str,
) -> User {
    User {
        id: id.to_string(),
        username: email.to_string(),
        email: email.to_string(),
        role,
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        tenant_key: tenant_key.to_string(),
    }
}

fn mock_directory() -> Vec<User> {
    vec![
        mock_user("1", "admin@amani.org", Role::Admin, "Admin", "User", "amani"),
        mock_user("2", "donor@amani.org", Role::Donor, "John", "Donor", "amani"),
        mock_user("3", "staff@generic.org", Role::Staff, "Jane", "Staff", "generic"),
        mock_user("4", "admin@demo-ngo.org", Role::Admin, "Demo", "Admin", "demo-ngo"),
    ]
}

pub struct SessionHolder {
    kv: KeyValueStore,
    storage_key: String,
    state: AuthState,
    users: Vec<User>,
    subscribers: Subscribers<AuthState>,
}

impl SessionHolder {
    /// Restores the persisted session, if any. A malformed one is discarded.
    pub fn load(kv: KeyValueStore) -> Self {
        let mut holder = Self {
            kv,
            storage_key: format!("{STORAGE_PREFIX}{AUTH_KEY}"),
            state: AuthState::default(),
            users: mock_directory(),
            subscribers: Subscribers::new(),
        };

        if let Some(raw) = holder.kv.read(&holder.storage_key) {
            match serde_json::from_str::<AuthState>(&raw) {
                Ok(state) => holder.state = state,
                Err(err) => {
                    warn!(error = %err, "failed to parse saved auth state");
                    holder.logout();
                }
            }
        }
        holder
    }

    pub fn login(&mut self, email: &str, password: &str) -> PortalResult<AuthState> {
        let email = email.trim();
        let user = self
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .filter(|_| password == DEMO_PASSWORD)
            .cloned()
            .ok_or(PortalError::InvalidCredentials)?;

        info!(email = %user.email, role = %user.role, tenant = %user.tenant_key, "logged in");
        self.state = AuthState {
            is_logged_in: true,
            user: Some(user),
            token: Some(format!("session-{}", Ulid::new())),
        };
        match serde_json::to_string(&self.state) {
            Ok(raw) => self.kv.write(&self.storage_key, &raw),
            Err(err) => warn!(error = %err, "failed to serialize auth state"),
        }
        self.subscribers.notify(&self.state);
        Ok(self.state.clone())
    }

    pub fn logout(&mut self) {
        if let Some(user) = self.state.user.as_ref() {
            info!(email = %user.email, "logged out");
        }
        self.state = AuthState::default();
        self.kv.remove(&self.storage_key);
        self.subscribers.notify(&self.state);
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn current_user(&self) -> Option<&User> {
        self.state.user.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.state.is_logged_in
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.current_user().is_some_and(|u| u.role == role)
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        self.current_user().is_some_and(|u| roles.contains(&u.role))
    }

    /// Route-guard decision: any logged-in user passes an empty role list.
    pub fn authorize(&self, required: &[Role]) -> PortalResult<&User> {
        let user = self
            .current_user()
            .filter(|_| self.is_logged_in())
            .ok_or(PortalError::Unauthenticated)?;
        if !required.is_empty() && !required.contains(&user.role) {
            let roles = required
                .iter()
                .map(Role::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            return Err(PortalError::Forbidden(roles));
        }
        Ok(user)
    }

    pub fn mock_users(&self) -> &[User] {
        &self.users
    }

    pub fn subscribe(&self, callback: impl Fn(&AuthState) + Send + Sync + 'static) -> Subscription {
        self.subscribers.subscribe(callback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_requires_known_user_and_demo_password() {
        let mut session = SessionHolder::load(KeyValueStore::in_memory());
        assert!(matches!(
            session.login("donor@amani.org", "wrong"),
            Err(PortalError::InvalidCredentials)
        ));
        assert!(matches!(
            session.login("nobody@amani.org", DEMO_PASSWORD),
            Err(PortalError::InvalidCredentials)
        ));
        assert!(!session.is_logged_in());

        let state = session.login(" Donor@Amani.org ", DEMO_PASSWORD).unwrap();
        assert!(state.is_logged_in);
        assert!(state.token.as_deref().unwrap().starts_with("session-"));
        assert_eq!(session.current_user().unwrap().display_name(), "John Donor");
    }

    #[test]
    fn session_survives_reload_and_logout_clears_it() {
        let kv = KeyValueStore::in_memory();
        let mut session = SessionHolder::load(kv.clone());
        session.login("staff@generic.org", DEMO_PASSWORD).unwrap();

        let mut restored = SessionHolder::load(kv.clone());
        assert!(restored.is_logged_in());
        assert_eq!(restored.current_user().unwrap().tenant_key, "generic");

        restored.logout();
        assert_eq!(kv.read("donors-app::auth"), None);
        assert!(!SessionHolder::load(kv).is_logged_in());
    }

    #[test]
    fn malformed_saved_state_is_discarded() {
        let kv = KeyValueStore::in_memory();
        kv.write("donors-app::auth", "{\"isLoggedIn\": tru");
        let session = SessionHolder::load(kv.clone());
        assert!(!session.is_logged_in());
        assert_eq!(kv.read("donors-app::auth"), None);
    }

    #[test]
    fn role_checks_and_authorization() {
        let mut session = SessionHolder::load(KeyValueStore::in_memory());
        assert!(matches!(
            session.authorize(&[]),
            Err(PortalError::Unauthenticated)
        ));
        assert!(!session.has_role(Role::Donor));

        session.login("donor@amani.org", DEMO_PASSWORD).unwrap();
        assert!(session.has_role(Role::Donor));
        assert!(!session.has_any_role(&[Role::Admin, Role::Staff]));
        assert_eq!(session.authorize(&[]).unwrap().email, "donor@amani.org");
        let err = session.authorize(&[Role::Admin, Role::Staff]).unwrap_err();
        assert_eq!(err.to_string(), "Access denied: requires one of [admin, staff]");

        session.login("admin@demo-ngo.org", DEMO_PASSWORD).unwrap();
        assert!(session.authorize(&[Role::Admin, Role::Staff]).is_ok());
    }

    #[test]
    fn directory_has_one_user_per_demo_account() {
        let session = SessionHolder::load(KeyValueStore::unavailable());
        let emails: Vec<_> = session.mock_users().iter().map(|u| u.email.as_str()).collect();
        assert_eq!(
            emails,
            vec![
                "admin@amani.org",
                "donor@amani.org",
                "staff@generic.org",
                "admin@demo-ngo.org"
            ]
        );
    }
}
