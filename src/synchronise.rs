//! High-level pipeline: download → rebuild `items` → save → upload.
//!
//! # Steps
//! 1. Download the navigation document from the remote store.
//! 2. Parse it as a JSON object (any other JSON value is rejected).
//! 3. Load the spreadsheet rows and build the two-level navigation tree.
//! 4. Replace the document's `items` key; every other key keeps its value and position.
//! 5. Serialize with two-space indentation and write the local copy.
//! 6. Upload the same bytes to the folder the document was downloaded from.
//!
//! # Error Handling
//! Each step returns immediately on failure; nothing is retried or rolled back. A
//! local copy written in step 5 stays on disk if the upload fails.

use crate::config::NavSyncConfig;
use crate::contract::RemoteStore;
use crate::error::SyncError;
use crate::navigation::{build_navigation_items, missing_parents, NavigationItem};
use crate::table::load_rows;
use serde_json::{Map, Value};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, error, info};

/// Key of the navigation document that this tool owns.
pub const ITEMS_KEY: &str = "items";

/// Summary of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynchroniseReport {
    pub remote_file: String,
    pub output: PathBuf,
    pub top_level_items: usize,
    pub child_items: usize,
    pub placeholder_parents: usize,
    pub bytes_uploaded: usize,
}

pub async fn synchronise<S>(
    config: &NavSyncConfig,
    store: &S,
) -> Result<SynchroniseReport, SyncError>
where
    S: RemoteStore + ?Sized,
{
    let remote_file = config.paths.remote_file.as_str();
    let display_name = split_remote_path(remote_file).1;
    info!(remote_file, "[SYNC] Starting navigation synchronisation");

    // Step 1-2: Download and parse
    println!("Downloading current JSON from SharePoint...");
    let raw = store.download(remote_file).await.map_err(|e| {
        error!(error = %e, remote_file, "[SYNC][ERROR] Download failed");
        SyncError::remote("download", e)
    })?;
    let mut document = parse_document(&raw)?;
    println!("✅ Downloaded {display_name}");

    // Step 3: Rows → tree
    let rows = load_rows(&config.paths.input)?;
    let items = build_navigation_items(&rows);
    let placeholder_parents = missing_parents(&rows).len();

    // Step 4: Merge
    merge_items(&mut document, &items)?;

    // Step 5: Serialize and save locally
    let serialized = serialize_document(&document)?;
    fs::write(&config.paths.output, &serialized).map_err(|source| {
        error!(error = ?source, path = %config.paths.output.display(), "[SYNC][ERROR] Failed to write local copy");
        SyncError::OutputWrite {
            path: config.paths.output.clone(),
            source,
        }
    })?;
    info!(path = %config.paths.output.display(), bytes = serialized.len(), "[SYNC] Saved local copy");
    println!("✅ Saved updated JSON to {}", config.paths.output.display());

    // Step 6: Upload
    println!("Uploading JSON to SharePoint...");
    let (folder, file_name) = split_remote_path(remote_file);
    store
        .upload(folder, file_name, serialized.as_bytes())
        .await
        .map_err(|e| {
            error!(error = %e, folder, file_name, "[SYNC][ERROR] Upload failed");
            SyncError::remote("upload", e)
        })?;
    println!("✅ Uploaded updated {display_name} to SharePoint");

    let report = SynchroniseReport {
        remote_file: remote_file.to_string(),
        output: config.paths.output.clone(),
        top_level_items: items.len(),
        child_items: items.iter().map(NavigationItem::child_count).sum(),
        placeholder_parents,
        bytes_uploaded: serialized.len(),
    };
    info!(?report, "[SYNC] Synchronisation complete");
    Ok(report)
}

/// Parses downloaded bytes as a JSON object. A leading UTF-8 BOM is ignored.
pub fn parse_document(raw: &[u8]) -> Result<Value, SyncError> {
    let raw = raw.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(raw);
    let document: Value = serde_json::from_slice(raw).map_err(|e| {
        error!(error = ?e, "[SYNC][ERROR] Downloaded content is not valid JSON");
        SyncError::DataFormat {
            reason: format!("invalid JSON: {e}"),
        }
    })?;
    if !document.is_object() {
        error!("[SYNC][ERROR] Downloaded JSON is not an object");
        return Err(SyncError::DataFormat {
            reason: "expected a JSON object at the top level".to_string(),
        });
    }
    debug!(keys = document.as_object().map_or(0, Map::len), "Parsed navigation document");
    Ok(document)
}

/// Replaces `items` on `document` with `items`, leaving every other key untouched.
pub fn merge_items(document: &mut Value, items: &[NavigationItem]) -> Result<(), SyncError> {
    let object = document.as_object_mut().ok_or_else(|| SyncError::DataFormat {
        reason: "expected a JSON object at the top level".to_string(),
    })?;
    let value = serde_json::to_value(items).map_err(|e| SyncError::DataFormat {
        reason: format!("failed to encode navigation items: {e}"),
    })?;
    object.insert(ITEMS_KEY.to_string(), value);
    Ok(())
}

/// Two-space indented JSON, as stored on the site.
pub fn serialize_document(document: &Value) -> Result<String, SyncError> {
    serde_json::to_string_pretty(document).map_err(|e| SyncError::DataFormat {
        reason: format!("failed to serialize document: {e}"),
    })
}

/// Splits `SiteAssets/nav.json` into `("SiteAssets", "nav.json")`.
/// A path without `/` has an empty folder.
pub fn split_remote_path(path: &str) -> (&str, &str) {
    match path.rsplit_once('/') {
        Some(("", file_name)) => ("/", file_name),
        Some((folder, file_name)) => (folder, file_name),
        None => ("", path),
    }
}
