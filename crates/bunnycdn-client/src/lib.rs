//! # BunnyCDN Client SDK
//!
//! Async bindings for the BunnyCDN account management API and the
//! per-zone edge storage API.
//!
//! ## Result contract
//!
//! - Remote outcomes are data: every network method yields an
//!   [`ApiResult`], whose error side is an [`ApiFailure`] carrying the
//!   observed HTTP status (or none, for transport failures).
//! - Local misuse and filesystem errors are hard failures: constructors and
//!   methods with local preconditions return [`Result`] with a
//!   [`ClientError`] before anything is sent.
//!
//! ## Example
//!
//! ```rust,ignore
//! use bunnycdn_client::{ManagementClient, StorageClient, StorageConfig};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let cdn = ManagementClient::with_api_key("account-api-key")?;
//!     match cdn.get_pull_zone_list().await {
//!         Ok(zones) => println!("{}", serde_json::to_string(&zones)?),
//!         Err(failure) => eprintln!("listing failed: {}", failure),
//!     }
//!
//!     let storage = StorageClient::new(StorageConfig::new("zone-password", "assets"))?;
//!     let outcome = storage.put_file("logo.png", Some("/img/logo.png"), Path::new("."))
//!         .await?;
//!     println!("{:?}", outcome);
//!     Ok(())
//! }
//! ```

mod config;
mod endpoint;
mod envelope;
mod error;
mod http;
mod management;
mod storage;
mod types;

pub use config::{ManagementConfig, StorageConfig, MANAGEMENT_API_BASE, STORAGE_API_HOST};
pub use endpoint::{normalize_path, UrlBuilder};
pub use envelope::Envelope;
pub use error::{ApiFailure, ApiResult, ClientError, Result};
pub use management::ManagementClient;
pub use storage::StorageClient;
pub use types::*;
