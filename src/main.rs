//! # kv-console
//!
//! Interactive console for managing keys and secrets in Azure Key Vault.
//!
//! Settings are read once at startup from `appsettings.json` in the current
//! directory. Missing settings keys are not validated here; bad or absent
//! credentials surface when the vault rejects the first call.

use std::sync::Arc;

use anyhow::{Context, Result};

use keyvault_services::azure::{AzureKeys, AzureSecrets};
use keyvault_services::config::{VaultSettings, SETTINGS_FILE};
use keyvault_services::console::Menus;
use keyvault_services::{KeysManagement, SecretsManagement};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kv_console=info".into()),
        )
        .init();

    let settings = VaultSettings::load(SETTINGS_FILE).context("Failed to load settings")?;

    let keys = KeysManagement::new(Arc::new(
        AzureKeys::new(&settings).context("Failed to create keys client")?,
    ));
    let secrets = SecretsManagement::new(Arc::new(
        AzureSecrets::new(&settings).context("Failed to create secrets client")?,
    ));

    Menus::new(keys, secrets).main_menu().await;
    Ok(())
}
