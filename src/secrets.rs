//! # Secrets Management
//!
//! Resource manager for vault secrets. Same calling discipline as
//! [`crate::keys::KeysManagement`]: validate locally, one vault call per
//! operation, every outcome normalised into a [`SecretsResponse`] envelope.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::response::{OperationError, SecretPayload, SecretsResponse};
use crate::vault::{SecretVault, VaultError};

/// Manager for create/read/update/delete/purge of vault secrets.
pub struct SecretsManagement {
    vault: Arc<dyn SecretVault>,
}

impl std::fmt::Debug for SecretsManagement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretsManagement").finish_non_exhaustive()
    }
}

impl SecretsManagement {
    pub fn new(vault: Arc<dyn SecretVault>) -> Self {
        SecretsManagement { vault }
    }

    /// List metadata for all secrets in the vault. Values are never fetched.
    pub async fn list(&self) -> SecretsResponse {
        debug!("listing secrets");
        match self.vault.list_secrets().await {
            Ok(entries) => Ok(SecretPayload::List(entries)),
            Err(e) => Err(request_error(e)),
        }
    }

    /// Create a secret, or a new version of it if the name already exists.
    pub async fn create(&self, secret_name: &str, secret_value: &str) -> SecretsResponse {
        if secret_name.is_empty() {
            return Err(OperationError::empty("secret name"));
        }
        if secret_value.is_empty() {
            return Err(OperationError::empty("secret value"));
        }

        info!(secret.name = secret_name, "setting secret");
        match self.vault.set_secret(secret_name, secret_value).await {
            Ok(secret) => Ok(SecretPayload::Secret(secret)),
            Err(e) => Err(request_error(e)),
        }
    }

    /// Fetch the current version of a secret.
    pub async fn retrieve(&self, secret_name: &str) -> SecretsResponse {
        if secret_name.is_empty() {
            return Err(OperationError::empty("secret name"));
        }

        debug!(secret.name = secret_name, "retrieving secret");
        match self.vault.get_secret(secret_name).await {
            Ok(secret) => Ok(SecretPayload::Secret(secret)),
            Err(e) => Err(request_error(e)),
        }
    }

    /// Merge one tag into a secret's tag map.
    ///
    /// Same two-round-trip read-modify-write as the keys manager, with the
    /// same unguarded write: the full tag map read in the first round trip
    /// is sent back in the second.
    pub async fn update(
        &self,
        secret_name: &str,
        tag_name: &str,
        tag_value: &str,
    ) -> SecretsResponse {
        if secret_name.is_empty() {
            return Err(OperationError::empty("secret name"));
        }
        if tag_name.is_empty() {
            return Err(OperationError::empty("tag name"));
        }
        if tag_value.is_empty() {
            return Err(OperationError::empty("tag value"));
        }

        info!(
            secret.name = secret_name,
            tag.name = tag_name,
            "updating secret tag"
        );
        let mut secret = match self.vault.get_secret(secret_name).await {
            Ok(secret) => secret,
            Err(e) => return Err(request_error(e)),
        };
        secret
            .properties
            .tags
            .insert(tag_name.to_string(), tag_value.to_string());

        match self
            .vault
            .update_secret_properties(&secret.properties)
            .await
        {
            Ok(updated) => Ok(SecretPayload::Secret(updated)),
            Err(e) => Err(request_error(e)),
        }
    }

    /// Start a soft delete and return as soon as the vault accepts it.
    pub async fn delete_accepted(&self, secret_name: &str) -> SecretsResponse {
        if secret_name.is_empty() {
            return Err(OperationError::empty("secret name"));
        }

        info!(secret.name = secret_name, "deleting secret (accepted)");
        match self.vault.start_delete_secret(secret_name).await {
            Ok(operation) => Ok(SecretPayload::Secret(operation.resource().clone())),
            Err(e) => Err(request_error(e)),
        }
    }

    /// Start a soft delete and block until the vault reports completion,
    /// sleeping `wait` between status checks. No cap, no timeout.
    pub async fn delete_and_wait(&self, secret_name: &str, wait: Duration) -> SecretsResponse {
        if secret_name.is_empty() {
            return Err(OperationError::empty("secret name"));
        }

        info!(
            secret.name = secret_name,
            "deleting secret (waiting for completion)"
        );
        let mut operation = match self.vault.start_delete_secret(secret_name).await {
            Ok(operation) => operation,
            Err(e) => return Err(request_error(e)),
        };

        while !operation.has_completed() {
            tokio::time::sleep(wait).await;
            if let Err(e) = operation.update_status().await {
                return Err(request_error(e));
            }
        }

        debug!(secret.name = secret_name, "delete operation completed");
        Ok(SecretPayload::Secret(operation.resource().clone()))
    }

    /// Permanently remove a soft-deleted secret. Irreversible, single call,
    /// no local safety net.
    pub async fn purge(&self, secret_name: &str) -> SecretsResponse {
        if secret_name.is_empty() {
            return Err(OperationError::empty("secret name"));
        }

        info!(secret.name = secret_name, "purging deleted secret");
        match self.vault.purge_deleted_secret(secret_name).await {
            Ok(()) => Ok(SecretPayload::Purged(secret_name.to_string())),
            Err(e) => Err(request_error(e)),
        }
    }
}

fn request_error(e: VaultError) -> OperationError {
    OperationError::Request(e.0)
}
