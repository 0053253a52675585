//! # Vault Contract
//!
//! Abstract interface over the remote key/secret vault.
//!
//! The traits mirror the operations the application consumes: list metadata,
//! create, get, set properties, start soft delete, purge. Each method is a
//! single authenticated network call; retries and timeouts beyond the
//! transport defaults are deliberately absent. Implementations live in
//! [`crate::azure`]; tests substitute in-process mocks.

use async_trait::async_trait;

use crate::model::{KeyKind, KeyProperties, SecretProperties, VaultKey, VaultSecret};

/// Failure reported by the vault or its transport. The message is the
/// vault's own failure text, carried opaquely.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct VaultError(pub String);

impl VaultError {
    pub fn new(message: impl Into<String>) -> Self {
        VaultError(message.into())
    }
}

/// Pollable handle for an in-progress soft delete.
///
/// The vault accepts a delete synchronously but completes it asynchronously.
/// The handle carries the deleted-resource snapshot from the acceptance
/// response and refreshes its completion state on demand. There is no
/// cancellation: a started delete runs to completion on the vault side.
#[async_trait]
pub trait DeleteOperation<R>: Send {
    /// Snapshot of the resource as returned when the delete was accepted.
    fn resource(&self) -> &R;

    /// Whether the vault has finished the soft delete, as of the last
    /// status refresh.
    fn has_completed(&self) -> bool;

    /// Refresh the completion state from the vault.
    async fn update_status(&mut self) -> Result<(), VaultError>;
}

/// Client contract for the keys collection of a vault.
#[async_trait]
pub trait KeyVault: Send + Sync {
    /// Fetch metadata for all keys. Names, tags and version pointers only;
    /// never key material.
    async fn list_keys(&self) -> Result<Vec<KeyProperties>, VaultError>;

    /// Create a key of the given kind. The vault assigns id and version.
    async fn create_key(&self, name: &str, kind: KeyKind) -> Result<VaultKey, VaultError>;

    /// Fetch the current version of a key.
    async fn get_key(&self, name: &str) -> Result<VaultKey, VaultError>;

    /// Write a key's full mutable property set back to the vault.
    async fn update_key_properties(
        &self,
        properties: &KeyProperties,
    ) -> Result<VaultKey, VaultError>;

    /// Start a soft delete and return the pollable operation handle.
    async fn start_delete_key(
        &self,
        name: &str,
    ) -> Result<Box<dyn DeleteOperation<VaultKey>>, VaultError>;

    /// Permanently remove a soft-deleted key. Irreversible; rejected by the
    /// vault if the key is not in the soft-deleted state.
    async fn purge_deleted_key(&self, name: &str) -> Result<(), VaultError>;
}

/// Client contract for the secrets collection of a vault.
#[async_trait]
pub trait SecretVault: Send + Sync {
    /// Fetch metadata for all secrets. Never secret values.
    async fn list_secrets(&self) -> Result<Vec<SecretProperties>, VaultError>;

    /// Create a secret or a new version of an existing one.
    async fn set_secret(&self, name: &str, value: &str) -> Result<VaultSecret, VaultError>;

    /// Fetch the current version of a secret.
    async fn get_secret(&self, name: &str) -> Result<VaultSecret, VaultError>;

    /// Write a secret's full mutable property set back to the vault.
    async fn update_secret_properties(
        &self,
        properties: &SecretProperties,
    ) -> Result<VaultSecret, VaultError>;

    /// Start a soft delete and return the pollable operation handle.
    async fn start_delete_secret(
        &self,
        name: &str,
    ) -> Result<Box<dyn DeleteOperation<VaultSecret>>, VaultError>;

    /// Permanently remove a soft-deleted secret.
    async fn purge_deleted_secret(&self, name: &str) -> Result<(), VaultError>;
}
