use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::metadata::{DATA_DIR_NAME, PKG_DESCRIPTION, PKG_NAME, PKG_VERSION};
use crate::promises::{PromiseCategory, PromiseStatus};
use crate::tenant::{DEFAULT_TENANT, TenantKey};
use crate::trips::{ChecklistCategory, Priority, TripStatus};

#[derive(Parser, Debug, Clone)]
#[command(name = PKG_NAME)]
#[command(version = PKG_VERSION)]
#[command(about = PKG_DESCRIPTION, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub settings: PortalSettings,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List known tenants and show the active one
    Tenants,
    /// Switch the active tenant
    Switch { key: String },
    /// Log in with a demo account
    Login {
        email: String,
        #[arg(long, env = "DONORS_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// End the current session
    Logout,
    /// Show the logged-in user and active tenant
    Whoami,
    /// Plan trips and work through their checklists
    #[command(subcommand)]
    Trips(TripCommand),
    /// Track donation promises
    #[command(subcommand)]
    Promises(PromiseCommand),
    /// Print version information
    Version,
}

#[derive(Subcommand, Debug, Clone)]
pub enum TripCommand {
    /// List trips, optionally by status
    List {
        #[arg(long)]
        status: Option<TripStatus>,
    },
    /// Show one trip with its checklist
    Show { id: String },
    /// Create a trip
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        destination: String,
        /// First day, YYYY-MM-DD
        #[arg(long)]
        start: NaiveDate,
        /// Last day, YYYY-MM-DD
        #[arg(long)]
        end: NaiveDate,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "planning")]
        status: TripStatus,
    },
    /// Change a trip's status
    UpdateStatus { id: String, status: TripStatus },
    /// Delete a trip
    Delete { id: String },
    /// Add a checklist item to a trip
    AddItem {
        trip_id: String,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "other")]
        category: ChecklistCategory,
        #[arg(long, default_value = "medium")]
        priority: Priority,
        /// Due date, YYYY-MM-DD
        #[arg(long)]
        due: Option<NaiveDate>,
    },
    /// Mark a checklist item done (or not done with --undo)
    Check {
        trip_id: String,
        item_id: String,
        #[arg(long, default_value_t = false)]
        undo: bool,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum PromiseCommand {
    /// List promises, optionally by status and/or category
    List {
        #[arg(long)]
        status: Option<PromiseStatus>,
        #[arg(long)]
        category: Option<PromiseCategory>,
    },
    /// Record a new promise
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        category: PromiseCategory,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        amount: Option<f64>,
        #[arg(long)]
        currency: Option<String>,
        /// Due date, YYYY-MM-DD
        #[arg(long)]
        due: Option<NaiveDate>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Change a promise's status
    UpdateStatus { id: String, status: PromiseStatus },
    /// Mark a promise fulfilled, replacing its notes
    Fulfil {
        id: String,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete a promise
    Delete { id: String },
    /// Write all promises as CSV to stdout or a file
    ExportCsv {
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct PortalSettings {
    /// Directory holding storage.json (default: ~/.donors-app)
    #[arg(long, env = "DONORS_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Directory with one <tenant>/config.json per tenant (default: <data-dir>/tenants)
    #[arg(long, env = "DONORS_TENANT_CONFIG_DIR", global = true)]
    pub tenant_config_dir: Option<PathBuf>,

    /// Base URL serving /assets/tenants/<tenant>/config.json; overrides the directory
    #[arg(long, env = "DONORS_TENANT_CONFIG_URL", global = true)]
    pub tenant_config_url: Option<String>,

    /// Tenant used until one is explicitly switched to
    #[arg(long, env = "DONORS_DEFAULT_TENANT", default_value = DEFAULT_TENANT, global = true)]
    pub default_tenant: String,

    /// Keep everything in memory for this run only
    #[arg(long, env = "DONORS_EPHEMERAL", default_value_t = false, global = true)]
    pub ephemeral: bool,
}

impl PortalSettings {
    pub fn default_settings() -> Self {
        Self {
            data_dir: None,
            tenant_config_dir: None,
            tenant_config_url: None,
            default_tenant: DEFAULT_TENANT.to_string(),
            ephemeral: false,
        }
    }

    /// Validate CLI/environment-derived settings.
    pub fn validate(&self) -> Result<(), String> {
        TenantKey::parse(&self.default_tenant).map_err(|e| {
            format!("Invalid DONORS_DEFAULT_TENANT '{}': {e}", self.default_tenant)
        })?;

        if let Some(url) = &self.tenant_config_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(format!(
                    "Invalid DONORS_TENANT_CONFIG_URL '{url}': expected an http(s) URL"
                ));
            }
        }
        if let Some(dir) = &self.data_dir {
            if dir.as_os_str().is_empty() {
                return Err("DONORS_DATA_DIR cannot be empty".to_string());
            }
        }
        Ok(())
    }

    pub fn resolved_data_dir(&self) -> Option<PathBuf> {
        self.data_dir
            .clone()
            .or_else(|| dirs::home_dir().map(|home| home.join(DATA_DIR_NAME)))
    }

    pub fn storage_path(&self) -> Option<PathBuf> {
        self.resolved_data_dir().map(|dir| dir.join("storage.json"))
    }

    pub fn resolved_tenant_config_dir(&self) -> Option<PathBuf> {
        self.tenant_config_dir
            .clone()
            .or_else(|| self.resolved_data_dir().map(|dir| dir.join("tenants")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(PortalSettings::default_settings().validate().is_ok());
    }

    #[test]
    fn rejects_bad_tenant_and_url() {
        let mut settings = PortalSettings::default_settings();
        settings.default_tenant = "Bad Tenant".into();
        assert!(settings.validate().unwrap_err().contains("DONORS_DEFAULT_TENANT"));

        let mut settings = PortalSettings::default_settings();
        settings.tenant_config_url = Some("ftp://configs.example.org".into());
        assert!(settings.validate().unwrap_err().contains("DONORS_TENANT_CONFIG_URL"));
    }

    #[test]
    fn paths_derive_from_data_dir() {
        let mut settings = PortalSettings::default_settings();
        settings.data_dir = Some(PathBuf::from("/srv/donors"));
        assert_eq!(
            settings.storage_path(),
            Some(PathBuf::from("/srv/donors/storage.json"))
        );
        assert_eq!(
            settings.resolved_tenant_config_dir(),
            Some(PathBuf::from("/srv/donors/tenants"))
        );

        settings.tenant_config_dir = Some(PathBuf::from("/etc/donors/tenants"));
        assert_eq!(
            settings.resolved_tenant_config_dir(),
            Some(PathBuf::from("/etc/donors/tenants"))
        );
    }

    #[test]
    fn parses_nested_commands() {
        let cli = Cli::try_parse_from([
            "donor-portal",
            "--ephemeral",
            "promises",
            "list",
            "--status",
            "in-progress",
        ])
        .unwrap();
        assert!(cli.settings.ephemeral);
        match cli.command {
            Command::Promises(PromiseCommand::List { status, category }) => {
                assert_eq!(status, Some(PromiseStatus::InProgress));
                assert_eq!(category, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }

        let cli = Cli::try_parse_from([
            "donor-portal",
            "trips",
            "create",
            "--title",
            "T1",
            "--destination",
            "D1",
            "--start",
            "2024-06-01",
            "--end",
            "2024-06-10",
        ])
        .unwrap();
        match cli.command {
            Command::Trips(TripCommand::Create { start, status, .. }) => {
                assert_eq!(start, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
                assert_eq!(status, TripStatus::Planning);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_status() {
        assert!(
            Cli::try_parse_from(["donor-portal", "trips", "list", "--status", "done"]).is_err()
        );
    }
}
