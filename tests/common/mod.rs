//! Shared test doubles for the manager scenario tests.
//!
//! In-process mock vaults implementing the vault traits over a map, with
//! per-operation call counters so tests can assert how many network calls an
//! operation would have made, and scripted delete operations that stay
//! incomplete for a configurable number of status refreshes.

// Each integration-test binary compiles this module and uses only one of the
// two mocks.
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use keyvault_services::model::{
    KeyKind, KeyProperties, SecretProperties, Tags, VaultKey, VaultSecret,
};
use keyvault_services::vault::{DeleteOperation, KeyVault, SecretVault, VaultError};

/// Per-operation call counters.
#[derive(Debug, Default)]
pub struct Calls {
    pub list: AtomicUsize,
    pub create: AtomicUsize,
    pub get: AtomicUsize,
    pub update: AtomicUsize,
    pub start_delete: AtomicUsize,
    pub purge: AtomicUsize,
}

impl Calls {
    pub fn total(&self) -> usize {
        self.list.load(Ordering::SeqCst)
            + self.create.load(Ordering::SeqCst)
            + self.get.load(Ordering::SeqCst)
            + self.update.load(Ordering::SeqCst)
            + self.start_delete.load(Ordering::SeqCst)
            + self.purge.load(Ordering::SeqCst)
    }
}

pub fn tags(pairs: &[(&str, &str)]) -> Tags {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Scripted soft-delete handle: reports incomplete until `needed` status
/// refreshes have happened. The refresh counter is shared with the mock
/// vault so tests can read it after the manager consumed the handle.
struct ScriptedDeleteOperation<R> {
    resource: R,
    refreshes: Arc<AtomicUsize>,
    needed: usize,
}

#[async_trait]
impl<R: Send + Sync> DeleteOperation<R> for ScriptedDeleteOperation<R> {
    fn resource(&self) -> &R {
        &self.resource
    }

    fn has_completed(&self) -> bool {
        self.refreshes.load(Ordering::SeqCst) >= self.needed
    }

    async fn update_status(&mut self) -> Result<(), VaultError> {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Mock keys vault.
pub struct MockKeyVault {
    store: Mutex<BTreeMap<String, VaultKey>>,
    deleted: Mutex<BTreeMap<String, VaultKey>>,
    pub calls: Calls,
    /// Status refreshes a delete operation needs before completing.
    delete_completes_after: usize,
    /// Refreshes performed by delete operations handed out by this vault.
    pub delete_refreshes: Arc<AtomicUsize>,
    /// Tag map received by the last update call.
    pub last_written_tags: Mutex<Option<Tags>>,
}

impl MockKeyVault {
    pub fn new() -> Self {
        MockKeyVault {
            store: Mutex::new(BTreeMap::new()),
            deleted: Mutex::new(BTreeMap::new()),
            calls: Calls::default(),
            delete_completes_after: 0,
            delete_refreshes: Arc::new(AtomicUsize::new(0)),
            last_written_tags: Mutex::new(None),
        }
    }

    pub fn delete_completes_after(mut self, refreshes: usize) -> Self {
        self.delete_completes_after = refreshes;
        self
    }

    pub fn with_key(self, name: &str, kind: KeyKind, key_tags: Tags) -> Self {
        let key = make_key(name, kind, key_tags);
        self.store.lock().unwrap().insert(name.to_string(), key);
        self
    }
}

fn make_key(name: &str, kind: KeyKind, key_tags: Tags) -> VaultKey {
    VaultKey {
        id: format!("https://mock-vault.vault.azure.net/keys/{name}/v1"),
        kind,
        properties: KeyProperties {
            name: name.to_string(),
            version: "v1".to_string(),
            tags: key_tags,
            updated_on: None,
        },
    }
}

#[async_trait]
impl KeyVault for MockKeyVault {
    async fn list_keys(&self) -> Result<Vec<KeyProperties>, VaultError> {
        self.calls.list.fetch_add(1, Ordering::SeqCst);
        let store = self.store.lock().unwrap();
        Ok(store.values().map(|k| k.properties.clone()).collect())
    }

    async fn create_key(&self, name: &str, kind: KeyKind) -> Result<VaultKey, VaultError> {
        self.calls.create.fetch_add(1, Ordering::SeqCst);
        let key = make_key(name, kind, Tags::new());
        self.store
            .lock()
            .unwrap()
            .insert(name.to_string(), key.clone());
        Ok(key)
    }

    async fn get_key(&self, name: &str) -> Result<VaultKey, VaultError> {
        self.calls.get.fetch_add(1, Ordering::SeqCst);
        self.store
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| VaultError::new(format!("KeyNotFound: a key with name {name} was not found")))
    }

    async fn update_key_properties(
        &self,
        properties: &KeyProperties,
    ) -> Result<VaultKey, VaultError> {
        self.calls.update.fetch_add(1, Ordering::SeqCst);
        *self.last_written_tags.lock().unwrap() = Some(properties.tags.clone());

        let mut store = self.store.lock().unwrap();
        let key = store.get_mut(&properties.name).ok_or_else(|| {
            VaultError::new(format!(
                "KeyNotFound: a key with name {} was not found",
                properties.name
            ))
        })?;
        key.properties.tags = properties.tags.clone();
        key.properties.updated_on = chrono::DateTime::from_timestamp(1_700_000_000, 0);
        Ok(key.clone())
    }

    async fn start_delete_key(
        &self,
        name: &str,
    ) -> Result<Box<dyn DeleteOperation<VaultKey>>, VaultError> {
        self.calls.start_delete.fetch_add(1, Ordering::SeqCst);
        let key = self
            .store
            .lock()
            .unwrap()
            .remove(name)
            .ok_or_else(|| VaultError::new(format!("KeyNotFound: a key with name {name} was not found")))?;
        self.deleted
            .lock()
            .unwrap()
            .insert(name.to_string(), key.clone());
        Ok(Box::new(ScriptedDeleteOperation {
            resource: key,
            refreshes: Arc::clone(&self.delete_refreshes),
            needed: self.delete_completes_after,
        }))
    }

    async fn purge_deleted_key(&self, name: &str) -> Result<(), VaultError> {
        self.calls.purge.fetch_add(1, Ordering::SeqCst);
        if self.deleted.lock().unwrap().remove(name).is_none() {
            return Err(VaultError::new(format!(
                "Conflict: key {name} is not in a deleted state"
            )));
        }
        Ok(())
    }
}

/// Mock secrets vault.
pub struct MockSecretVault {
    store: Mutex<BTreeMap<String, VaultSecret>>,
    deleted: Mutex<BTreeMap<String, VaultSecret>>,
    pub calls: Calls,
    delete_completes_after: usize,
    pub delete_refreshes: Arc<AtomicUsize>,
    pub last_written_tags: Mutex<Option<Tags>>,
}

impl MockSecretVault {
    pub fn new() -> Self {
        MockSecretVault {
            store: Mutex::new(BTreeMap::new()),
            deleted: Mutex::new(BTreeMap::new()),
            calls: Calls::default(),
            delete_completes_after: 0,
            delete_refreshes: Arc::new(AtomicUsize::new(0)),
            last_written_tags: Mutex::new(None),
        }
    }

    pub fn delete_completes_after(mut self, refreshes: usize) -> Self {
        self.delete_completes_after = refreshes;
        self
    }

    pub fn with_secret(self, name: &str, value: &str, secret_tags: Tags) -> Self {
        let secret = make_secret(name, value, secret_tags);
        self.store.lock().unwrap().insert(name.to_string(), secret);
        self
    }
}

fn make_secret(name: &str, value: &str, secret_tags: Tags) -> VaultSecret {
    VaultSecret {
        id: format!("https://mock-vault.vault.azure.net/secrets/{name}/v1"),
        value: value.to_string(),
        properties: SecretProperties {
            name: name.to_string(),
            version: "v1".to_string(),
            tags: secret_tags,
            updated_on: None,
        },
    }
}

#[async_trait]
impl SecretVault for MockSecretVault {
    async fn list_secrets(&self) -> Result<Vec<SecretProperties>, VaultError> {
        self.calls.list.fetch_add(1, Ordering::SeqCst);
        let store = self.store.lock().unwrap();
        Ok(store.values().map(|s| s.properties.clone()).collect())
    }

    async fn set_secret(&self, name: &str, value: &str) -> Result<VaultSecret, VaultError> {
        self.calls.create.fetch_add(1, Ordering::SeqCst);
        let secret = make_secret(name, value, Tags::new());
        self.store
            .lock()
            .unwrap()
            .insert(name.to_string(), secret.clone());
        Ok(secret)
    }

    async fn get_secret(&self, name: &str) -> Result<VaultSecret, VaultError> {
        self.calls.get.fetch_add(1, Ordering::SeqCst);
        self.store.lock().unwrap().get(name).cloned().ok_or_else(|| {
            VaultError::new(format!("SecretNotFound: a secret with name {name} was not found"))
        })
    }

    async fn update_secret_properties(
        &self,
        properties: &SecretProperties,
    ) -> Result<VaultSecret, VaultError> {
        self.calls.update.fetch_add(1, Ordering::SeqCst);
        *self.last_written_tags.lock().unwrap() = Some(properties.tags.clone());

        let mut store = self.store.lock().unwrap();
        let secret = store.get_mut(&properties.name).ok_or_else(|| {
            VaultError::new(format!(
                "SecretNotFound: a secret with name {} was not found",
                properties.name
            ))
        })?;
        secret.properties.tags = properties.tags.clone();
        secret.properties.updated_on = chrono::DateTime::from_timestamp(1_700_000_000, 0);
        Ok(secret.clone())
    }

    async fn start_delete_secret(
        &self,
        name: &str,
    ) -> Result<Box<dyn DeleteOperation<VaultSecret>>, VaultError> {
        self.calls.start_delete.fetch_add(1, Ordering::SeqCst);
        let secret = self.store.lock().unwrap().remove(name).ok_or_else(|| {
            VaultError::new(format!("SecretNotFound: a secret with name {name} was not found"))
        })?;
        self.deleted
            .lock()
            .unwrap()
            .insert(name.to_string(), secret.clone());
        Ok(Box::new(ScriptedDeleteOperation {
            resource: secret,
            refreshes: Arc::clone(&self.delete_refreshes),
            needed: self.delete_completes_after,
        }))
    }

    async fn purge_deleted_secret(&self, name: &str) -> Result<(), VaultError> {
        self.calls.purge.fetch_add(1, Ordering::SeqCst);
        if self.deleted.lock().unwrap().remove(name).is_none() {
            return Err(VaultError::new(format!(
                "Conflict: secret {name} is not in a deleted state"
            )));
        }
        Ok(())
    }
}
