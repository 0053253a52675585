//! Scenario tests for the secrets resource manager against a mock vault.

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use keyvault_services::response::{OperationError, SecretPayload};
use keyvault_services::SecretsManagement;

use common::{tags, MockSecretVault};

const WAIT: Duration = Duration::from_millis(1);

fn manager(vault: &Arc<MockSecretVault>) -> SecretsManagement {
    let vault: Arc<dyn keyvault_services::vault::SecretVault> = vault.clone();
    SecretsManagement::new(vault)
}

#[tokio::test]
async fn set_then_retrieve_round_trip() {
    let vault = Arc::new(MockSecretVault::new());
    let manager = manager(&vault);

    manager.create("dbPass", "hunter2").await.unwrap();

    match manager.retrieve("dbPass").await.unwrap() {
        SecretPayload::Secret(secret) => {
            assert_eq!(secret.name(), "dbPass");
            assert_eq!(secret.value, "hunter2");
        }
        other => panic!("expected a secret payload, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_fields_fail_without_vault_calls() {
    let vault = Arc::new(MockSecretVault::new());
    let manager = manager(&vault);

    let name_err = OperationError::empty("secret name");
    assert_eq!(manager.create("", "v").await.unwrap_err(), name_err);
    assert_eq!(manager.retrieve("").await.unwrap_err(), name_err);
    assert_eq!(manager.update("", "t", "v").await.unwrap_err(), name_err);
    assert_eq!(manager.delete_accepted("").await.unwrap_err(), name_err);
    assert_eq!(manager.delete_and_wait("", WAIT).await.unwrap_err(), name_err);
    assert_eq!(manager.purge("").await.unwrap_err(), name_err);

    assert_eq!(
        manager.create("db", "").await.unwrap_err(),
        OperationError::empty("secret value")
    );
    assert_eq!(
        manager.update("db", "", "v").await.unwrap_err(),
        OperationError::empty("tag name")
    );
    assert_eq!(
        manager.update("db", "env", "").await.unwrap_err(),
        OperationError::empty("tag value")
    );

    assert_eq!(vault.calls.total(), 0, "no vault call may happen");
}

#[tokio::test]
async fn update_tag_on_untagged_secret_then_retrieve() {
    let vault = Arc::new(MockSecretVault::new().with_secret("dbPass", "hunter2", tags(&[])));
    let manager = manager(&vault);

    manager.update("dbPass", "env", "prod").await.unwrap();

    match manager.retrieve("dbPass").await.unwrap() {
        SecretPayload::Secret(secret) => {
            assert_eq!(secret.properties.tags, tags(&[("env", "prod")]));
        }
        other => panic!("expected a secret payload, got {other:?}"),
    }
}

#[tokio::test]
async fn update_sends_the_full_merged_tag_set() {
    let vault = Arc::new(
        MockSecretVault::new().with_secret("dbPass", "hunter2", tags(&[("a", "1")])),
    );
    let manager = manager(&vault);

    manager.update("dbPass", "b", "2").await.unwrap();

    let written = vault.last_written_tags.lock().unwrap().clone().unwrap();
    assert_eq!(written, tags(&[("a", "1"), ("b", "2")]));
    assert_eq!(vault.calls.get.load(Ordering::SeqCst), 1);
    assert_eq!(vault.calls.update.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn list_returns_metadata_without_values() {
    let vault = Arc::new(
        MockSecretVault::new()
            .with_secret("alpha", "a-value", tags(&[("team", "core")]))
            .with_secret("beta", "b-value", tags(&[])),
    );
    let manager = manager(&vault);

    match manager.list().await.unwrap() {
        SecretPayload::List(entries) => {
            let names: Vec<&str> = entries.iter().map(|p| p.name.as_str()).collect();
            assert_eq!(names, vec!["alpha", "beta"]);
            // Property entries carry no value field at all; only metadata.
            assert_eq!(entries[0].tags, tags(&[("team", "core")]));
        }
        other => panic!("expected a list payload, got {other:?}"),
    }
}

#[tokio::test]
async fn delete_and_wait_refreshes_until_completion_and_stops() {
    let vault = Arc::new(
        MockSecretVault::new()
            .delete_completes_after(2)
            .with_secret("stale", "v", tags(&[])),
    );
    let manager = manager(&vault);

    match manager.delete_and_wait("stale", WAIT).await.unwrap() {
        SecretPayload::Secret(secret) => assert_eq!(secret.name(), "stale"),
        other => panic!("expected a secret payload, got {other:?}"),
    }
    assert_eq!(vault.delete_refreshes.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn delete_accepted_does_not_poll() {
    let vault = Arc::new(
        MockSecretVault::new()
            .delete_completes_after(5)
            .with_secret("stale", "v", tags(&[])),
    );
    let manager = manager(&vault);

    manager.delete_accepted("stale").await.unwrap();
    assert_eq!(vault.delete_refreshes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn purge_without_a_soft_delete_is_rejected_as_an_envelope_error() {
    let vault = Arc::new(MockSecretVault::new().with_secret("live", "v", tags(&[])));
    let manager = manager(&vault);

    let err = manager.purge("live").await.unwrap_err();
    assert!(matches!(err, OperationError::Request(_)));
    assert!(err.to_string().contains("not in a deleted state"));
}

#[tokio::test]
async fn purge_after_completed_delete_succeeds() {
    let vault = Arc::new(
        MockSecretVault::new()
            .delete_completes_after(1)
            .with_secret("stale", "v", tags(&[])),
    );
    let manager = manager(&vault);

    manager.delete_and_wait("stale", WAIT).await.unwrap();
    assert_eq!(
        manager.purge("stale").await.unwrap(),
        SecretPayload::Purged("stale".to_string())
    );
}
