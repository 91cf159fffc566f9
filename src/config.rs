// nav-sync/src/config.rs

use std::fmt;
use std::path::PathBuf;
use tracing::{debug, info};

pub const DEFAULT_SITE_PATH: &str = "/sites/shan";
pub const DEFAULT_REMOTE_FILE: &str = "SiteAssets/monarchNavConfig.json";
pub const DEFAULT_INPUT_FILE: &str = "sample_top_nav.xlsx";
pub const DEFAULT_OUTPUT_FILE: &str = "updated_monarchNavConfig.json";
pub const DEFAULT_ACCOUNTS_URL: &str = "https://accounts.accesscontrol.windows.net";

/// Everything a run needs, read once at startup.
#[derive(Debug, Clone)]
pub struct NavSyncConfig {
    pub sharepoint: SharePointConfig,
    pub paths: PathsConfig,
}

impl NavSyncConfig {
    pub fn trace_loaded(&self) {
        info!(
            site_url = %self.sharepoint.site_url(),
            remote_file = %self.paths.remote_file,
            input = %self.paths.input.display(),
            output = %self.paths.output.display(),
            "Loaded NavSyncConfig"
        );
        debug!(?self, "Config loaded (full debug)");
    }
}

/// Connection and app-only credential settings for the SharePoint site.
#[derive(Clone)]
pub struct SharePointConfig {
    pub tenant_url: String,
    pub site_path: String,
    pub client_id: String,
    pub client_secret: String,
    /// Realm (tenant GUID). Discovered from the site when absent.
    pub tenant_id: Option<String>,
    /// Base URL of the access control service issuing app-only tokens.
    pub accounts_url: String,
}

impl SharePointConfig {
    /// Tenant URL joined with the site path, e.g. `https://contoso.sharepoint.com/sites/shan`.
    pub fn site_url(&self) -> String {
        format!("{}{}", self.tenant_url.trim_end_matches('/'), self.site_path)
    }
}

impl fmt::Debug for SharePointConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharePointConfig")
            .field("tenant_url", &self.tenant_url)
            .field("site_path", &self.site_path)
            .field("client_id", &self.client_id)
            .field("client_secret_len", &self.client_secret.len())
            .field("tenant_id", &self.tenant_id)
            .field("accounts_url", &self.accounts_url)
            .finish()
    }
}

/// Local and remote file locations.
#[derive(Debug, Clone)]
pub struct PathsConfig {
    /// Path of the navigation document on the site, e.g. `SiteAssets/monarchNavConfig.json`.
    pub remote_file: String,
    /// Spreadsheet holding the navigation rows.
    pub input: PathBuf,
    /// Where the updated document is written before upload.
    pub output: PathBuf,
}
