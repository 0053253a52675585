//! # Key Vault Services
//!
//! Console front-end and CLI utilities for managing keys and secrets in
//! Azure Key Vault.
//!
//! The crate is organised around three layers:
//!
//! 1. **Vault clients** - the [`vault`] module defines the calling contract
//!    against the remote vault ([`vault::KeyVault`], [`vault::SecretVault`]);
//!    the [`azure`] module implements it with the Azure Key Vault data-plane
//!    SDK.
//! 2. **Resource managers** - [`keys::KeysManagement`] and
//!    [`secrets::SecretsManagement`] validate inputs, invoke the vault client
//!    once per operation, and normalise every outcome into a response
//!    envelope ([`response`]).
//! 3. **Front ends** - the interactive menu ([`console`]) and the two
//!    standalone tools (`kv-keys`, `kv-secrets`) collect arguments and render
//!    envelopes.
//!
//! Soft delete is an asynchronous vault-side operation: the managers expose
//! both `delete_accepted` (return as soon as the vault accepts the delete)
//! and `delete_and_wait` (poll the operation at a fixed interval until the
//! vault reports completion). Purge is irreversible and is issued as a single
//! call with no local safety net.

pub mod azure;
pub mod config;
pub mod console;
pub mod keys;
pub mod model;
pub mod response;
pub mod secrets;
pub mod vault;

pub use config::VaultSettings;
pub use keys::KeysManagement;
pub use model::{KeyKind, KeyProperties, SecretProperties, VaultKey, VaultSecret};
pub use response::{KeyPayload, KeysResponse, OperationError, SecretPayload, SecretsResponse};
pub use secrets::SecretsManagement;
pub use vault::{DeleteOperation, KeyVault, SecretVault, VaultError};
