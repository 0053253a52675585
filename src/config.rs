//! # Settings
//!
//! Connection settings for the vault, loaded once at process start from a
//! local `appsettings.json` file:
//!
//! ```json
//! {
//!     "AzureKeyVault": {
//!         "TenantId": "…",
//!         "ClientId": "…",
//!         "ClientSecret": "…",
//!         "KeyVaultUri": "https://my-vault.vault.azure.net/",
//!         "WaitTime": 1000
//!     }
//! }
//! ```
//!
//! Absent keys are not validated here: every field defaults, and missing
//! credentials surface only when the vault rejects authentication.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Default settings file name, looked up in the current directory.
pub const SETTINGS_FILE: &str = "appsettings.json";

const DEFAULT_WAIT_TIME_MS: u64 = 1_000;

#[derive(Debug, Deserialize)]
struct SettingsFile {
    #[serde(rename = "AzureKeyVault", default)]
    azure_key_vault: VaultSettings,
}

/// The `AzureKeyVault` section of the settings file. Immutable once loaded.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct VaultSettings {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub key_vault_uri: String,
    /// Polling interval in milliseconds between soft-delete status checks.
    /// Only the delete-and-wait flows read it.
    pub wait_time: u64,
}

impl Default for VaultSettings {
    fn default() -> Self {
        VaultSettings {
            tenant_id: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
            key_vault_uri: String::new(),
            wait_time: DEFAULT_WAIT_TIME_MS,
        }
    }
}

impl VaultSettings {
    /// Load the `AzureKeyVault` section from a settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        let file: SettingsFile = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse settings file {}", path.display()))?;
        Ok(file.azure_key_vault)
    }

    /// Polling interval for the delete-and-wait flows.
    pub fn wait_interval(&self) -> Duration {
        Duration::from_millis(self.wait_time)
    }
}
