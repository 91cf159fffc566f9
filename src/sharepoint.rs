#![doc = "SharePoint implementation of the remote store: app-only authentication plus file download/upload over the REST API."]
//
//! # SharePoint client
//!
//! [`SharePointClient`] authenticates once, in [`SharePointClient::connect`], using the
//! app-only (access control service) client-credential flow:
//!
//! - the realm (tenant GUID) comes from configuration, or is read from the
//!   `WWW-Authenticate` challenge the site returns for an empty bearer token;
//! - a token is requested from `{accounts_url}/{realm}/tokens/OAuth/2` for the
//!   SharePoint principal on the tenant host.
//!
//! The token is reused for every later call. Files are addressed by server-relative
//! paths; a path without a leading `/` is taken relative to the site path.

use crate::config::SharePointConfig;
use crate::contract::RemoteStore;
use crate::error::BoxError;
use async_trait::async_trait;
use regex::Regex;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, WWW_AUTHENTICATE};
use reqwest::{Client, Response, Url};
use serde::Deserialize;
use tracing::{debug, error, info};
use uuid::Uuid;

/// Well-known app principal id of SharePoint Online.
const SHAREPOINT_PRINCIPAL: &str = "00000003-0000-0ff1-ce00-000000000000";
const ODATA_JSON: &str = "application/json;odata=nometadata";

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<String>,
}

pub struct SharePointClient {
    http: Client,
    site_url: String,
    site_path: String,
    access_token: String,
}

impl SharePointClient {
    /// Authenticates against the configured site and returns a ready client.
    pub async fn connect(config: &SharePointConfig) -> Result<Self, BoxError> {
        let http = Client::new();
        let site_url = config.site_url();
        let host = Url::parse(&config.tenant_url)?
            .host_str()
            .ok_or("tenant URL has no host")?
            .to_string();

        let realm = match &config.tenant_id {
            Some(id) => {
                debug!(realm = %id, "Using configured tenant id as realm");
                id.clone()
            }
            None => discover_realm(&http, &site_url).await?,
        };

        let access_token = request_token(&http, config, &host, &realm).await?;

        info!(
            site_url = %site_url,
            realm = %realm,
            "Authenticated against SharePoint with app-only credentials"
        );

        Ok(SharePointClient {
            http,
            site_url,
            site_path: config.site_path.clone(),
            access_token,
        })
    }

    /// Resolves `path` to a server-relative path on this client's site.
    pub fn server_relative(&self, path: &str) -> String {
        server_relative(&self.site_path, path)
    }
}

#[async_trait]
impl RemoteStore for SharePointClient {
    async fn download(&self, path: &str) -> Result<Vec<u8>, BoxError> {
        let server_path = self.server_relative(path);
        let url = format!(
            "{}/_api/web/GetFileByServerRelativeUrl('{}')/$value",
            self.site_url,
            odata_literal(&server_path)
        );
        info!(path = %server_path, "Downloading file from SharePoint");

        let resp = self
            .http
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, path = %server_path, "Transport error downloading file");
                e
            })?;
        let resp = ensure_success(resp, "download", &server_path).await?;
        let bytes = resp.bytes().await?;

        info!(path = %server_path, bytes = bytes.len(), "Downloaded file");
        Ok(bytes.to_vec())
    }

    async fn upload(&self, folder: &str, file_name: &str, content: &[u8]) -> Result<(), BoxError> {
        let folder_path = self.server_relative(folder);
        let folder_url = format!(
            "{}/_api/web/GetFolderByServerRelativeUrl('{}')",
            self.site_url,
            odata_literal(&folder_path)
        );

        let resp = self
            .http
            .get(&folder_url)
            .bearer_auth(&self.access_token)
            .header(ACCEPT, ODATA_JSON)
            .send()
            .await?;
        ensure_success(resp, "folder lookup", &folder_path).await?;
        debug!(folder = %folder_path, "Target folder exists");

        let add_url = format!(
            "{folder_url}/Files/add(url='{}',overwrite=true)",
            odata_literal(file_name)
        );
        info!(folder = %folder_path, file = file_name, bytes = content.len(), "Uploading file to SharePoint");

        let resp = self
            .http
            .post(&add_url)
            .bearer_auth(&self.access_token)
            .header(ACCEPT, ODATA_JSON)
            .header(CONTENT_TYPE, "application/json")
            .body(content.to_vec())
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, folder = %folder_path, file = file_name, "Transport error uploading file");
                e
            })?;
        ensure_success(resp, "upload", &format!("{folder_path}/{file_name}")).await?;

        info!(folder = %folder_path, file = file_name, "Uploaded file");
        Ok(())
    }
}

async fn discover_realm(http: &Client, site_url: &str) -> Result<String, BoxError> {
    let url = format!("{site_url}/_vti_bin/client.svc");
    debug!(url = %url, "Discovering realm from bearer challenge");

    let resp = http.get(&url).header(AUTHORIZATION, "Bearer ").send().await?;
    let status = resp.status();
    let challenge = resp
        .headers()
        .get(WWW_AUTHENTICATE)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            error!(%status, url = %url, "No WWW-Authenticate challenge returned");
            format!("no WWW-Authenticate challenge from {url} (status {status})")
        })?;

    parse_realm(challenge)
}

/// Extracts the realm GUID from a `WWW-Authenticate: Bearer realm="…"` challenge.
pub fn parse_realm(challenge: &str) -> Result<String, BoxError> {
    let re = Regex::new(r#"realm="([^"]*)""#)?;
    let realm = re
        .captures(challenge)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| format!("no realm in challenge {challenge:?}"))?;
    Uuid::parse_str(&realm).map_err(|e| format!("realm {realm:?} is not a GUID: {e}"))?;
    Ok(realm)
}

async fn request_token(
    http: &Client,
    config: &SharePointConfig,
    host: &str,
    realm: &str,
) -> Result<String, BoxError> {
    let url = format!(
        "{}/{}/tokens/OAuth/2",
        config.accounts_url.trim_end_matches('/'),
        realm
    );
    let client_id = format!("{}@{}", config.client_id, realm);
    let resource = format!("{SHAREPOINT_PRINCIPAL}/{host}@{realm}");
    let params = [
        ("grant_type", "client_credentials"),
        ("client_id", client_id.as_str()),
        ("client_secret", config.client_secret.as_str()),
        ("resource", resource.as_str()),
    ];

    info!(url = %url, client_id = %config.client_id, "Requesting app-only access token");
    let resp = http.post(&url).form(&params).send().await?;
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        error!(%status, url = %url, body = %body, "Token request rejected");
        return Err(format!("token request to {url} failed with {status}: {body}").into());
    }

    let token: TokenResponse = resp.json().await?;
    debug!(expires_in = ?token.expires_in, "Received access token");
    Ok(token.access_token)
}

async fn ensure_success(resp: Response, operation: &str, path: &str) -> Result<Response, BoxError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    error!(%status, operation, path, body = %body, "SharePoint request failed");
    Err(format!("{operation} of {path} failed with {status}: {body}").into())
}

/// Server-relative form of `path` on the site at `site_path`.
///
/// Absolute paths pass through; relative ones are joined onto the site path.
pub fn server_relative(site_path: &str, path: &str) -> String {
    let absolute = path.starts_with('/');
    let path = path.trim_end_matches('/');
    let resolved = if absolute {
        path.to_string()
    } else if path.is_empty() {
        site_path.to_string()
    } else {
        format!("{site_path}/{path}")
    };
    if resolved.is_empty() {
        "/".to_string()
    } else {
        resolved
    }
}

/// Quotes doubled for OData string literals; `%`, `#` and `?` escaped so the
/// path survives as part of the request URL.
fn odata_literal(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('#', "%23")
        .replace('?', "%3F")
        .replace('\'', "''")
}
