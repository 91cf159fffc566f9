/// CLI glue for nav-sync: argument parsing, configuration, client construction and the
/// user-visible summary. The pipeline itself lives in [`crate::synchronise`].
use crate::error::SyncError;
use crate::load_config::load_config;
use crate::sharepoint::SharePointClient;
use crate::synchronise::synchronise;
use anyhow::Result;
use clap::Parser;

/// Rebuild the SharePoint navigation menu config from a spreadsheet.
///
/// All settings come from the environment (or a `.env` file).
#[derive(Parser, Debug)]
#[clap(
    name = "nav-sync",
    version,
    about = "Rebuild the items of a SharePoint-hosted navigation config from a spreadsheet and upload it"
)]
pub struct Cli {}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(_cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    let config = load_config()?;
    config.trace_loaded();

    let client = SharePointClient::connect(&config.sharepoint)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Authentication against SharePoint failed");
            SyncError::remote("authentication", e)
        })?;

    match synchronise(&config, &client).await {
        Ok(report) => {
            tracing::info!(?report, "Synchronisation complete");
            println!(
                "Synchronise complete: {} top-level items ({} children, {} placeholder parents), {} bytes uploaded to {}",
                report.top_level_items,
                report.child_items,
                report.placeholder_parents,
                report.bytes_uploaded,
                report.remote_file
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "Synchronisation failed");
            Err(e.into())
        }
    }
}
