//! # Azure Key Vault Clients
//!
//! Azure implementations of the [`KeyVault`] and [`SecretVault`] contracts,
//! built on the Azure Key Vault data-plane SDK.
//!
//! Authentication is a client-secret credential (tenant id, client id,
//! client secret) exchanged for a bearer token by `azure_identity`; token
//! refresh is the credential's concern. Every trait method is a single call
//! with no retry and no added timeout. Vault failure text is carried
//! opaquely in [`VaultError`].
//!
//! Azure accepts a delete synchronously and finishes it asynchronously; the
//! delete-operation handles poll `get_deleted_key`/`get_deleted_secret`
//! until the vault exposes the deleted resource, mapping "not found yet" to
//! not-complete.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use azure_core::credentials::{Secret, TokenCredential};
use azure_identity::ClientSecretCredential;
use azure_security_keyvault_keys::models::{
    CreateKeyParameters, KeyClientUpdateKeyPropertiesOptions, KeyType,
    UpdateKeyPropertiesParameters,
};
use azure_security_keyvault_keys::KeyClient;
use azure_security_keyvault_secrets::models::{
    SecretClientUpdateSecretPropertiesOptions, SetSecretParameters,
    UpdateSecretPropertiesParameters,
};
use azure_security_keyvault_secrets::SecretClient;
use futures::TryStreamExt;
use tracing::debug;

use crate::config::VaultSettings;
use crate::model::{
    parse_vault_id, KeyKind, KeyProperties, SecretProperties, VaultKey, VaultSecret,
};
use crate::vault::{DeleteOperation, KeyVault, SecretVault, VaultError};

/// Build the client-secret credential shared by both clients.
fn build_credential(settings: &VaultSettings) -> Result<Arc<dyn TokenCredential>> {
    let credential = ClientSecretCredential::new(
        &settings.tenant_id,
        settings.client_id.clone(),
        Secret::new(settings.client_secret.clone()),
        None,
    )
    .context("Failed to create ClientSecretCredential")?;
    Ok(credential)
}

/// Azure Key Vault keys client.
pub struct AzureKeys {
    client: Arc<KeyClient>,
}

impl std::fmt::Debug for AzureKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureKeys").finish_non_exhaustive()
    }
}

impl AzureKeys {
    /// Create a keys client against the configured vault URI.
    pub fn new(settings: &VaultSettings) -> Result<Self> {
        let credential = build_credential(settings)?;
        let client = KeyClient::new(&settings.key_vault_uri, credential, None)
            .context("Failed to create Azure Key Vault KeyClient")?;
        Ok(AzureKeys {
            client: Arc::new(client),
        })
    }
}

/// Azure Key Vault secrets client.
pub struct AzureSecrets {
    client: Arc<SecretClient>,
}

impl std::fmt::Debug for AzureSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureSecrets").finish_non_exhaustive()
    }
}

impl AzureSecrets {
    /// Create a secrets client against the configured vault URI.
    pub fn new(settings: &VaultSettings) -> Result<Self> {
        let credential = build_credential(settings)?;
        let client = SecretClient::new(&settings.key_vault_uri, credential, None)
            .context("Failed to create Azure Key Vault SecretClient")?;
        Ok(AzureSecrets {
            client: Arc::new(client),
        })
    }
}

#[async_trait]
impl KeyVault for AzureKeys {
    async fn list_keys(&self) -> Result<Vec<KeyProperties>, VaultError> {
        let mut pager = self
            .client
            .list_key_properties(None)
            .map_err(to_vault_error)?;

        let mut entries = Vec::new();
        while let Some(item) = pager.try_next().await.map_err(to_vault_error)? {
            let id = item.kid.unwrap_or_default();
            let (name, version) = parse_vault_id(&id);
            entries.push(KeyProperties {
                name,
                version,
                tags: collect_tags(item.tags),
                updated_on: None,
            });
        }
        debug!(count = entries.len(), "listed keys");
        Ok(entries)
    }

    async fn create_key(&self, name: &str, kind: KeyKind) -> Result<VaultKey, VaultError> {
        let parameters = CreateKeyParameters {
            kty: Some(match kind {
                KeyKind::Ec => KeyType::Ec,
                KeyKind::Rsa => KeyType::Rsa,
            }),
            ..Default::default()
        };
        let response = self
            .client
            .create_key(name, parameters.try_into().map_err(to_vault_error)?, None)
            .await
            .map_err(to_vault_error)?;
        key_from_body(&response.into_body())
    }

    async fn get_key(&self, name: &str) -> Result<VaultKey, VaultError> {
        let response = self
            .client
            .get_key(name, None)
            .await
            .map_err(to_vault_error)?;
        key_from_body(&response.into_body())
    }

    async fn update_key_properties(
        &self,
        properties: &KeyProperties,
    ) -> Result<VaultKey, VaultError> {
        let parameters = UpdateKeyPropertiesParameters {
            tags: Some(properties.tags.clone().into_iter().collect()),
            ..Default::default()
        };
        let response = self
            .client
            .update_key_properties(
                &properties.name,
                parameters.try_into().map_err(to_vault_error)?,
                Some(KeyClientUpdateKeyPropertiesOptions {
                    key_version: Some(properties.version.clone()),
                    ..Default::default()
                }),
            )
            .await
            .map_err(to_vault_error)?;
        key_from_body(&response.into_body())
    }

    async fn start_delete_key(
        &self,
        name: &str,
    ) -> Result<Box<dyn DeleteOperation<VaultKey>>, VaultError> {
        let response = self
            .client
            .delete_key(name, None)
            .await
            .map_err(to_vault_error)?;
        let resource = key_from_body(&response.into_body())?;
        Ok(Box::new(AzureKeyDeleteOperation {
            client: Arc::clone(&self.client),
            resource,
            completed: false,
        }))
    }

    async fn purge_deleted_key(&self, name: &str) -> Result<(), VaultError> {
        self.client
            .purge_deleted_key(name, None)
            .await
            .map_err(to_vault_error)?;
        Ok(())
    }
}

#[async_trait]
impl SecretVault for AzureSecrets {
    async fn list_secrets(&self) -> Result<Vec<SecretProperties>, VaultError> {
        let mut pager = self
            .client
            .list_secret_properties(None)
            .map_err(to_vault_error)?;

        let mut entries = Vec::new();
        while let Some(item) = pager.try_next().await.map_err(to_vault_error)? {
            let id = item.id.unwrap_or_default();
            let (name, version) = parse_vault_id(&id);
            entries.push(SecretProperties {
                name,
                version,
                tags: collect_tags(item.tags),
                updated_on: None,
            });
        }
        debug!(count = entries.len(), "listed secrets");
        Ok(entries)
    }

    async fn set_secret(&self, name: &str, value: &str) -> Result<VaultSecret, VaultError> {
        let parameters = SetSecretParameters {
            value: Some(value.to_string()),
            ..Default::default()
        };
        let response = self
            .client
            .set_secret(name, parameters.try_into().map_err(to_vault_error)?, None)
            .await
            .map_err(to_vault_error)?;
        secret_from_body(&response.into_body())
    }

    async fn get_secret(&self, name: &str) -> Result<VaultSecret, VaultError> {
        let response = self
            .client
            .get_secret(name, None)
            .await
            .map_err(to_vault_error)?;
        secret_from_body(&response.into_body())
    }

    async fn update_secret_properties(
        &self,
        properties: &SecretProperties,
    ) -> Result<VaultSecret, VaultError> {
        let parameters = UpdateSecretPropertiesParameters {
            tags: Some(properties.tags.clone().into_iter().collect()),
            ..Default::default()
        };
        let response = self
            .client
            .update_secret_properties(
                &properties.name,
                parameters.try_into().map_err(to_vault_error)?,
                Some(SecretClientUpdateSecretPropertiesOptions {
                    secret_version: Some(properties.version.clone()),
                    ..Default::default()
                }),
            )
            .await
            .map_err(to_vault_error)?;
        secret_from_body(&response.into_body())
    }

    async fn start_delete_secret(
        &self,
        name: &str,
    ) -> Result<Box<dyn DeleteOperation<VaultSecret>>, VaultError> {
        let response = self
            .client
            .delete_secret(name, None)
            .await
            .map_err(to_vault_error)?;
        let resource = secret_from_body(&response.into_body())?;
        Ok(Box::new(AzureSecretDeleteOperation {
            client: Arc::clone(&self.client),
            resource,
            completed: false,
        }))
    }

    async fn purge_deleted_secret(&self, name: &str) -> Result<(), VaultError> {
        self.client
            .purge_deleted_secret(name, None)
            .await
            .map_err(to_vault_error)?;
        Ok(())
    }
}

/// Soft-delete handle for a key. Completion is observed by asking the vault
/// for the deleted key: while the delete is still in flight the deleted
/// entry does not exist yet.
struct AzureKeyDeleteOperation {
    client: Arc<KeyClient>,
    resource: VaultKey,
    completed: bool,
}

#[async_trait]
impl DeleteOperation<VaultKey> for AzureKeyDeleteOperation {
    fn resource(&self) -> &VaultKey {
        &self.resource
    }

    fn has_completed(&self) -> bool {
        self.completed
    }

    async fn update_status(&mut self) -> Result<(), VaultError> {
        match self
            .client
            .get_deleted_key(self.resource.name(), None)
            .await
        {
            Ok(_) => {
                self.completed = true;
                Ok(())
            }
            Err(e) => {
                let message = e.to_string();
                if is_not_found(&message) {
                    Ok(())
                } else {
                    Err(VaultError(message))
                }
            }
        }
    }
}

/// Soft-delete handle for a secret.
struct AzureSecretDeleteOperation {
    client: Arc<SecretClient>,
    resource: VaultSecret,
    completed: bool,
}

#[async_trait]
impl DeleteOperation<VaultSecret> for AzureSecretDeleteOperation {
    fn resource(&self) -> &VaultSecret {
        &self.resource
    }

    fn has_completed(&self) -> bool {
        self.completed
    }

    async fn update_status(&mut self) -> Result<(), VaultError> {
        match self
            .client
            .get_deleted_secret(self.resource.name(), None)
            .await
        {
            Ok(_) => {
                self.completed = true;
                Ok(())
            }
            Err(e) => {
                let message = e.to_string();
                if is_not_found(&message) {
                    Ok(())
                } else {
                    Err(VaultError(message))
                }
            }
        }
    }
}

fn to_vault_error(e: impl std::fmt::Display) -> VaultError {
    VaultError(e.to_string())
}

fn is_not_found(message: &str) -> bool {
    message.contains("NotFound") || message.contains("404") || message.contains("not found")
}

fn collect_tags<T>(tags: Option<T>) -> BTreeMap<String, String>
where
    T: IntoIterator<Item = (String, String)>,
{
    tags.map(|t| t.into_iter().collect()).unwrap_or_default()
}

/// Wire shapes of the vault's JSON response bodies. Only the fields this
/// application reads; everything else is ignored.
mod wire {
    use serde::Deserialize;
    use std::collections::BTreeMap;

    #[derive(Debug, Default, Deserialize)]
    pub struct KeyBundle {
        #[serde(default)]
        pub key: JsonWebKey,
        #[serde(default)]
        pub tags: BTreeMap<String, String>,
        #[serde(default)]
        pub attributes: Attributes,
    }

    #[derive(Debug, Default, Deserialize)]
    pub struct JsonWebKey {
        pub kid: Option<String>,
        pub kty: Option<String>,
    }

    #[derive(Debug, Default, Deserialize)]
    pub struct SecretBundle {
        pub id: Option<String>,
        pub value: Option<String>,
        #[serde(default)]
        pub tags: BTreeMap<String, String>,
        #[serde(default)]
        pub attributes: Attributes,
    }

    #[derive(Debug, Default, Deserialize)]
    pub struct Attributes {
        /// Last-update time as a Unix timestamp in seconds.
        pub updated: Option<i64>,
    }
}

fn key_from_body(body: &[u8]) -> Result<VaultKey, VaultError> {
    let bundle: wire::KeyBundle = serde_json::from_slice(body)
        .map_err(|e| VaultError(format!("Failed to deserialize key response: {e}")))?;

    let id = bundle.key.kid.unwrap_or_default();
    let (name, version) = parse_vault_id(&id);
    Ok(VaultKey {
        kind: KeyKind::parse(bundle.key.kty.as_deref().unwrap_or_default()),
        properties: KeyProperties {
            name,
            version,
            tags: bundle.tags,
            updated_on: bundle
                .attributes
                .updated
                .and_then(|ts| chrono::DateTime::from_timestamp(ts, 0)),
        },
        id,
    })
}

fn secret_from_body(body: &[u8]) -> Result<VaultSecret, VaultError> {
    let bundle: wire::SecretBundle = serde_json::from_slice(body)
        .map_err(|e| VaultError(format!("Failed to deserialize secret response: {e}")))?;

    let id = bundle.id.unwrap_or_default();
    let (name, version) = parse_vault_id(&id);
    Ok(VaultSecret {
        value: bundle.value.unwrap_or_default(),
        properties: SecretProperties {
            name,
            version,
            tags: bundle.tags,
            updated_on: bundle
                .attributes
                .updated
                .and_then(|ts| chrono::DateTime::from_timestamp(ts, 0)),
        },
        id,
    })
}
