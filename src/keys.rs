//! # Keys Management
//!
//! Resource manager for vault keys: validates inputs, invokes the vault
//! client once per operation, and normalises every outcome into a
//! [`KeysResponse`] envelope. A request failure never escapes as a panic or
//! a raw error; it becomes the envelope's error side. Nothing is retried.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::model::KeyKind;
use crate::response::{KeyPayload, KeysResponse, OperationError};
use crate::vault::{KeyVault, VaultError};

/// Manager for create/read/update/delete/purge of vault keys.
pub struct KeysManagement {
    vault: Arc<dyn KeyVault>,
}

impl std::fmt::Debug for KeysManagement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeysManagement").finish_non_exhaustive()
    }
}

impl KeysManagement {
    pub fn new(vault: Arc<dyn KeyVault>) -> Self {
        KeysManagement { vault }
    }

    /// List metadata for all keys in the vault. Single attempt.
    pub async fn list(&self) -> KeysResponse {
        debug!("listing keys");
        match self.vault.list_keys().await {
            Ok(entries) => Ok(KeyPayload::List(entries)),
            Err(e) => Err(request_error(e)),
        }
    }

    /// Create a key of the given kind. The vault assigns id and version.
    pub async fn create(&self, key_name: &str, kind: KeyKind) -> KeysResponse {
        if key_name.is_empty() {
            return Err(OperationError::empty("key name"));
        }

        info!(key.name = key_name, key.kind = %kind, "creating key");
        match self.vault.create_key(key_name, kind).await {
            Ok(key) => Ok(KeyPayload::Key(key)),
            Err(e) => Err(request_error(e)),
        }
    }

    /// Fetch the current version of a key. A vault-side "not found" surfaces
    /// as the vault's own failure text.
    pub async fn retrieve(&self, key_name: &str) -> KeysResponse {
        if key_name.is_empty() {
            return Err(OperationError::empty("key name"));
        }

        debug!(key.name = key_name, "retrieving key");
        match self.vault.get_key(key_name).await {
            Ok(key) => Ok(KeyPayload::Key(key)),
            Err(e) => Err(request_error(e)),
        }
    }

    /// Merge one tag into a key's tag map.
    ///
    /// Read-modify-write in two round trips: fetch the current property set,
    /// insert or overwrite the tag in the fetched map, and send the whole
    /// mutated set back. There is no version check between the read and the
    /// write, so a concurrent writer's tag changes are overwritten by the
    /// map read here. Failure at either round trip aborts; the vault commits
    /// nothing on a failed write.
    pub async fn update(&self, key_name: &str, tag_name: &str, tag_value: &str) -> KeysResponse {
        if key_name.is_empty() {
            return Err(OperationError::empty("key name"));
        }
        if tag_name.is_empty() {
            return Err(OperationError::empty("tag name"));
        }
        if tag_value.is_empty() {
            return Err(OperationError::empty("tag value"));
        }

        info!(key.name = key_name, tag.name = tag_name, "updating key tag");
        let mut key = match self.vault.get_key(key_name).await {
            Ok(key) => key,
            Err(e) => return Err(request_error(e)),
        };
        key.properties
            .tags
            .insert(tag_name.to_string(), tag_value.to_string());

        match self.vault.update_key_properties(&key.properties).await {
            Ok(updated) => Ok(KeyPayload::Key(updated)),
            Err(e) => Err(request_error(e)),
        }
    }

    /// Start a soft delete and return as soon as the vault accepts it. The
    /// deletion itself completes asynchronously on the vault side.
    pub async fn delete_accepted(&self, key_name: &str) -> KeysResponse {
        if key_name.is_empty() {
            return Err(OperationError::empty("key name"));
        }

        info!(key.name = key_name, "deleting key (accepted)");
        match self.vault.start_delete_key(key_name).await {
            Ok(operation) => Ok(KeyPayload::Key(operation.resource().clone())),
            Err(e) => Err(request_error(e)),
        }
    }

    /// Start a soft delete and block until the vault reports the operation
    /// complete, sleeping `wait` between status checks.
    ///
    /// No iteration cap and no timeout: a vault that never completes the
    /// deletion keeps this polling until process termination.
    pub async fn delete_and_wait(&self, key_name: &str, wait: Duration) -> KeysResponse {
        if key_name.is_empty() {
            return Err(OperationError::empty("key name"));
        }

        info!(key.name = key_name, "deleting key (waiting for completion)");
        let mut operation = match self.vault.start_delete_key(key_name).await {
            Ok(operation) => operation,
            Err(e) => return Err(request_error(e)),
        };

        while !operation.has_completed() {
            tokio::time::sleep(wait).await;
            if let Err(e) = operation.update_status().await {
                return Err(request_error(e));
            }
        }

        debug!(key.name = key_name, "delete operation completed");
        Ok(KeyPayload::Key(operation.resource().clone()))
    }

    /// Permanently remove a soft-deleted key. Irreversible; issued as a
    /// single call. Purging a key that is not soft-deleted is rejected by
    /// the vault and surfaces as the envelope's error side.
    pub async fn purge(&self, key_name: &str) -> KeysResponse {
        if key_name.is_empty() {
            return Err(OperationError::empty("key name"));
        }

        info!(key.name = key_name, "purging deleted key");
        match self.vault.purge_deleted_key(key_name).await {
            Ok(()) => Ok(KeyPayload::Purged(key_name.to_string())),
            Err(e) => Err(request_error(e)),
        }
    }
}

fn request_error(e: VaultError) -> OperationError {
    OperationError::Request(e.0)
}
