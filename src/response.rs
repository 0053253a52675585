//! # Response Envelopes
//!
//! Every resource-manager operation returns a success-or-error envelope. The
//! envelope is a plain `Result`, so a populated payload and a populated error
//! message cannot coexist. The payload side is a tagged variant over the
//! closed set of resource kinds rather than an opaque object, so front ends
//! match on it instead of downcasting.

use crate::model::{KeyProperties, SecretProperties, VaultKey, VaultSecret};

/// Errors reported through the envelope.
///
/// Local validation failures name the empty field and are raised before any
/// network call. Remote failures carry the vault's own message text; this
/// layer does not classify them further and never retries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OperationError {
    /// A required input field was empty.
    #[error("{field} is empty")]
    EmptyField { field: &'static str },

    /// The vault rejected or could not service the call.
    #[error("{0}")]
    Request(String),
}

impl OperationError {
    pub fn empty(field: &'static str) -> Self {
        OperationError::EmptyField { field }
    }

    /// True for local validation errors, false for remote failures.
    pub fn is_validation(&self) -> bool {
        matches!(self, OperationError::EmptyField { .. })
    }
}

/// Success payload of a keys operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyPayload {
    /// A single key (create, retrieve, update, delete results).
    Key(VaultKey),
    /// Metadata entries from a list operation; no key material.
    List(Vec<KeyProperties>),
    /// Name of a permanently removed key.
    Purged(String),
}

/// Success payload of a secrets operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretPayload {
    Secret(VaultSecret),
    List(Vec<SecretProperties>),
    Purged(String),
}

/// Envelope returned by every [`crate::keys::KeysManagement`] operation.
pub type KeysResponse = Result<KeyPayload, OperationError>;

/// Envelope returned by every [`crate::secrets::SecretsManagement`] operation.
pub type SecretsResponse = Result<SecretPayload, OperationError>;
