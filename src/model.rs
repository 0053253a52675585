//! # Resource Model
//!
//! Plain data types for the resources the vault stores. Key material is
//! opaque to this layer; secrets carry their value as a string. Every
//! resource has a vault-assigned id URI of the form
//! `https://{vault-host}/{collection}/{name}[/{version}]`, a tag map, and an
//! `updated_on` timestamp maintained by the vault.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

/// User-defined name/value annotations attached to a resource's current
/// property set. Keys are unique; insertion order is irrelevant.
pub type Tags = BTreeMap<String, String>;

/// Key algorithm selector used at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    /// Elliptic-curve key.
    Ec,
    /// RSA key.
    Rsa,
}

impl KeyKind {
    /// Wire name used by the vault (`kty` field).
    pub fn as_str(self) -> &'static str {
        match self {
            KeyKind::Ec => "EC",
            KeyKind::Rsa => "RSA",
        }
    }

    /// Parse the vault's `kty` value. Anything unrecognised is treated as
    /// RSA, matching the creation default.
    pub fn parse(value: &str) -> Self {
        match value {
            "EC" | "EC-HSM" => KeyKind::Ec,
            _ => KeyKind::Rsa,
        }
    }
}

impl std::fmt::Display for KeyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutable metadata of a key: the full property set sent back to the vault
/// on update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyProperties {
    pub name: String,
    pub version: String,
    pub tags: Tags,
    pub updated_on: Option<DateTime<Utc>>,
}

/// A key as returned by the vault. The material itself never leaves the
/// vault; only the id and metadata are visible here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultKey {
    pub id: String,
    pub kind: KeyKind,
    pub properties: KeyProperties,
}

impl VaultKey {
    pub fn name(&self) -> &str {
        &self.properties.name
    }
}

/// Mutable metadata of a secret.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretProperties {
    pub name: String,
    pub version: String,
    pub tags: Tags,
    pub updated_on: Option<DateTime<Utc>>,
}

/// A secret with its current value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultSecret {
    pub id: String,
    pub value: String,
    pub properties: SecretProperties,
}

impl VaultSecret {
    pub fn name(&self) -> &str {
        &self.properties.name
    }
}

/// Split a vault id URI into `(name, version)`.
///
/// List entries carry unversioned ids (`…/secrets/{name}`); the version is
/// then empty.
pub fn parse_vault_id(id: &str) -> (String, String) {
    // scheme://host/collection/name[/version]
    let mut segments = id.trim_end_matches('/').split('/').skip(3);
    let _collection = segments.next();
    let name = segments.next().unwrap_or_default().to_string();
    let version = segments.next().unwrap_or_default().to_string();
    (name, version)
}
