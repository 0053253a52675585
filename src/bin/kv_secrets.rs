//! # kv-secrets
//!
//! Standalone command-line tool for vault secrets:
//!
//! ```bash
//! kv-secrets set <secretName> <secretValue>
//! kv-secrets get <secretName>
//! kv-secrets delete <secretName>
//! kv-secrets purge <secretName>
//! ```
//!
//! Fewer than two arguments prints usage and returns normally; an
//! unrecognised command prints an error line and returns normally.
//! `delete` blocks until the vault reports the soft delete complete;
//! `purge` permanently removes an already soft-deleted secret.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use keyvault_services::azure::AzureSecrets;
use keyvault_services::config::{VaultSettings, SETTINGS_FILE};
use keyvault_services::response::{SecretPayload, SecretsResponse};
use keyvault_services::SecretsManagement;

const COMMAND_ACTIONS: [&str; 4] = ["set", "get", "delete", "purge"];

/// Azure Key Vault secrets tool
#[derive(Parser, Debug)]
#[command(name = "kv-secrets", about = "Manage secrets in Azure Key Vault")]
struct Cli {
    /// Command action: set, get, delete, purge
    command: Option<String>,

    /// Secret name
    secret_name: Option<String>,

    /// Secret value (set only)
    secret_value: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kv_secrets=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let (Some(command), Some(secret_name)) = (cli.command, cli.secret_name) else {
        display_usage();
        return Ok(());
    };

    let settings = VaultSettings::load(SETTINGS_FILE).context("Failed to load settings")?;
    let manager = SecretsManagement::new(Arc::new(
        AzureSecrets::new(&settings).context("Failed to create secrets client")?,
    ));

    match command.to_lowercase().as_str() {
        "set" => {
            println!("set secret");
            println!();
            let secret_value = cli.secret_value.unwrap_or_default();
            render(&manager.create(&secret_name, &secret_value).await);
        }
        "get" => {
            println!("get secret");
            println!();
            render(&manager.retrieve(&secret_name).await);
        }
        "delete" => {
            println!("delete secret");
            println!();
            match manager
                .delete_and_wait(&secret_name, settings.wait_interval())
                .await
            {
                Ok(_) => println!("name: {secret_name}"),
                Err(e) => println!("error-> {e}"),
            }
        }
        "purge" => {
            println!("purge secret");
            println!();
            render(&manager.purge(&secret_name).await);
        }
        other => {
            println!("error-> invalid command action: {other}");
        }
    }

    Ok(())
}

fn render(response: &SecretsResponse) {
    match response {
        Ok(SecretPayload::Secret(secret)) => {
            println!("name: {} value: {}", secret.name(), secret.value);
        }
        Ok(SecretPayload::List(entries)) => {
            for properties in entries {
                println!("name: {}", properties.name);
            }
        }
        Ok(SecretPayload::Purged(name)) => println!("name: {name}"),
        Err(e) => println!("error-> {e}"),
    }
}

fn display_usage() {
    let actions = format!("[{}]", COMMAND_ACTIONS.join("|"));
    println!("usage: kv-secrets {actions} <secret name> <secret value>");
}
