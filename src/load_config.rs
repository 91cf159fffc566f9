/// `load_config` module: reads every setting from the environment into a [`NavSyncConfig`].
///
/// This is the only place the process environment is consulted. Required settings that
/// are missing or empty fail the run before any file or network I/O happens; optional
/// settings that are missing or empty fall back to the defaults in [`crate::config`].
///
/// The loader is generic over a lookup function so tests can feed settings without
/// mutating the process environment; [`load_config`] binds it to `std::env::var`.
use crate::config::{
    NavSyncConfig, PathsConfig, SharePointConfig, DEFAULT_ACCOUNTS_URL, DEFAULT_INPUT_FILE,
    DEFAULT_OUTPUT_FILE, DEFAULT_REMOTE_FILE, DEFAULT_SITE_PATH,
};
use crate::error::SyncError;
use reqwest::Url;
use std::path::PathBuf;
use tracing::{error, info};
use uuid::Uuid;

pub const ENV_TENANT: &str = "SHAREPOINT_TENANT";
pub const ENV_SITE_PATH: &str = "SHAREPOINT_SITE_PATH";
pub const ENV_CLIENT_ID: &str = "SHAREPOINT_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "SHAREPOINT_CLIENT_SECRET";
pub const ENV_FILE_PATH: &str = "SHAREPOINT_FILE_PATH";
pub const ENV_TENANT_ID: &str = "SHAREPOINT_TENANT_ID";
pub const ENV_ACCOUNTS_URL: &str = "SHAREPOINT_ACCOUNTS_URL";
pub const ENV_EXCEL_FILE: &str = "EXCEL_FILE";
pub const ENV_OUTPUT_FILE: &str = "OUTPUT_FILE";

/// Loads the configuration from the process environment.
pub fn load_config() -> Result<NavSyncConfig, SyncError> {
    load_config_from(|name| std::env::var(name).ok())
}

/// Reads a single setting. Empty values count as absent.
///
/// Returns `Ok(None)` for an absent optional setting and a [`SyncError::Configuration`]
/// for an absent required one.
pub fn get<F>(lookup: &F, name: &str, required: bool) -> Result<Option<String>, SyncError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name).filter(|v| !v.is_empty()) {
        Some(value) => Ok(Some(value)),
        None if required => {
            error!(variable = name, "Required environment variable not set");
            Err(SyncError::missing_variable(name))
        }
        None => Ok(None),
    }
}

/// Loads the configuration through an arbitrary lookup function.
pub fn load_config_from<F>(lookup: F) -> Result<NavSyncConfig, SyncError>
where
    F: Fn(&str) -> Option<String>,
{
    let required = |name: &str| -> Result<String, SyncError> {
        get(&lookup, name, true)?.ok_or_else(|| SyncError::missing_variable(name))
    };
    let optional = |name: &str, default: &str| -> Result<String, SyncError> {
        Ok(get(&lookup, name, false)?.unwrap_or_else(|| default.to_string()))
    };

    let tenant_url = required(ENV_TENANT)?;
    let site_path = normalise_site_path(&optional(ENV_SITE_PATH, DEFAULT_SITE_PATH)?);
    let client_id = required(ENV_CLIENT_ID)?;
    let client_secret = required(ENV_CLIENT_SECRET)?;
    let remote_file = optional(ENV_FILE_PATH, DEFAULT_REMOTE_FILE)?;
    let input = PathBuf::from(optional(ENV_EXCEL_FILE, DEFAULT_INPUT_FILE)?);
    let output = PathBuf::from(optional(ENV_OUTPUT_FILE, DEFAULT_OUTPUT_FILE)?);
    let tenant_id = get(&lookup, ENV_TENANT_ID, false)?;
    let accounts_url = optional(ENV_ACCOUNTS_URL, DEFAULT_ACCOUNTS_URL)?;

    if let Err(e) = Url::parse(&tenant_url) {
        error!(error = ?e, tenant_url = %tenant_url, "Tenant URL is not a valid URL");
        return Err(SyncError::Configuration {
            variable: ENV_TENANT.to_string(),
            reason: format!("invalid URL {tenant_url:?}: {e}"),
        });
    }

    if let Some(id) = &tenant_id {
        if let Err(e) = Uuid::parse_str(id) {
            error!(error = ?e, tenant_id = %id, "Tenant id is not a GUID");
            return Err(SyncError::Configuration {
                variable: ENV_TENANT_ID.to_string(),
                reason: format!("expected a GUID, got {id:?}: {e}"),
            });
        }
    }

    info!(
        client_secret_len = client_secret.len(),
        tenant_id_set = tenant_id.is_some(),
        "Configuration read from environment"
    );

    Ok(NavSyncConfig {
        sharepoint: SharePointConfig {
            tenant_url,
            site_path,
            client_id,
            client_secret,
            tenant_id,
            accounts_url,
        },
        paths: PathsConfig {
            remote_file,
            input,
            output,
        },
    })
}

/// `sites/x/` and `/sites/x` both become `/sites/x`.
fn normalise_site_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}
