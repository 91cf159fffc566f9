#![doc = "nav-sync: rebuild a SharePoint-hosted navigation config from spreadsheet rows."]

//! Modules, in pipeline order:
//! - [`load_config`] / [`config`]: settings from the environment
//! - [`table`]: spreadsheet / CSV rows
//! - [`navigation`]: two-level navigation tree
//! - [`contract`] / [`sharepoint`]: remote store capability and its SharePoint client
//! - [`synchronise`]: the download → merge → save → upload pipeline
//! - [`cli`]: binary entrypoint logic

pub mod cli;
pub mod config;
pub mod contract;
pub mod error;
pub mod load_config;
pub mod navigation;
pub mod sharepoint;
pub mod synchronise;
pub mod table;

pub use error::SyncError;
