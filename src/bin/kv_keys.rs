//! # kv-keys
//!
//! Standalone command-line tool for vault keys:
//!
//! ```bash
//! kv-keys create <keyName>
//! kv-keys get <keyName>
//! kv-keys update <keyName> <tagName> <tagValue>
//! kv-keys delete <keyName>
//! kv-keys purge <keyName>
//! ```
//!
//! Fewer than two arguments prints usage and returns normally. An
//! unrecognised command prints an error line and returns normally; there is
//! no distinct exit-code taxonomy. `delete` blocks until the vault reports
//! the soft delete complete, polling at the configured `WaitTime` interval;
//! `purge` waits for the soft delete to complete and then permanently
//! removes the key.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use keyvault_services::azure::AzureKeys;
use keyvault_services::config::{VaultSettings, SETTINGS_FILE};
use keyvault_services::response::{KeyPayload, KeysResponse};
use keyvault_services::{KeyKind, KeysManagement};

const COMMAND_ACTIONS: [&str; 5] = ["create", "get", "update", "delete", "purge"];

/// Azure Key Vault keys tool
#[derive(Parser, Debug)]
#[command(name = "kv-keys", about = "Manage keys in Azure Key Vault")]
struct Cli {
    /// Command action: create, get, update, delete, purge
    command: Option<String>,

    /// Key name
    key_name: Option<String>,

    /// Tag name (update only)
    tag_name: Option<String>,

    /// Tag value (update only)
    tag_value: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kv_keys=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let (Some(command), Some(key_name)) = (cli.command, cli.key_name) else {
        display_usage();
        return Ok(());
    };

    let settings = VaultSettings::load(SETTINGS_FILE).context("Failed to load settings")?;
    let manager = KeysManagement::new(Arc::new(
        AzureKeys::new(&settings).context("Failed to create keys client")?,
    ));

    match command.to_lowercase().as_str() {
        "create" => {
            println!("create key");
            println!();
            render(&manager.create(&key_name, KeyKind::Rsa).await);
        }
        "get" => {
            println!("get key");
            println!();
            render(&manager.retrieve(&key_name).await);
        }
        "update" => {
            println!("update key");
            println!();
            let tag_name = cli.tag_name.unwrap_or_default();
            let tag_value = cli.tag_value.unwrap_or_default();
            match manager.update(&key_name, &tag_name, &tag_value).await {
                Ok(KeyPayload::Key(key)) => {
                    let updated_on = key
                        .properties
                        .updated_on
                        .map(|t| t.to_string())
                        .unwrap_or_default();
                    println!(
                        "name: {} version: {} updated on: {}",
                        key.name(),
                        key.properties.version,
                        updated_on
                    );
                }
                other => render(&other),
            }
        }
        "delete" => {
            println!("delete key");
            println!();
            render(
                &manager
                    .delete_and_wait(&key_name, settings.wait_interval())
                    .await,
            );
        }
        "purge" => {
            println!("purge key");
            println!();
            // The key must be fully soft-deleted before the purge call; wait
            // for the delete operation, then purge.
            match manager
                .delete_and_wait(&key_name, settings.wait_interval())
                .await
            {
                Ok(_) => render(&manager.purge(&key_name).await),
                Err(e) => println!("error-> {e}"),
            }
        }
        other => {
            println!("error-> invalid command action: {other}");
        }
    }

    Ok(())
}

fn render(response: &KeysResponse) {
    match response {
        Ok(KeyPayload::Key(key)) => println!("name: {} type: {}", key.name(), key.kind),
        Ok(KeyPayload::List(entries)) => {
            for properties in entries {
                println!("name: {}", properties.name);
            }
        }
        Ok(KeyPayload::Purged(name)) => println!("name: {name}"),
        Err(e) => println!("error-> {e}"),
    }
}

fn display_usage() {
    let actions = format!("[{}]", COMMAND_ACTIONS.join("|"));
    println!("usage: kv-keys {actions} <key name> (optional tag name) (optional tag value)");
}
