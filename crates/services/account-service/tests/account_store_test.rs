//! Provisioning against a real SeaORM store (in-memory SQLite).

use std::sync::Arc;

use account_service_lib::infra::Database;
use account_service_lib::repository::{AccountRepository, AccountStore};
use account_service_lib::service::AccountProvisioner;
use common::{AppError, DatabaseConfig};
use domain::{Argon2Hasher, CredentialHasher};

/// Create an in-memory SQLite database with migrations applied
async fn setup_test_db() -> Database {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
    };

    Database::connect(&config)
        .await
        .expect("Failed to connect to in-memory database")
}

fn test_hasher() -> Arc<Argon2Hasher> {
    Arc::new(Argon2Hasher::new(8, 1, 1).expect("valid argon2 params"))
}

async fn setup() -> (Arc<AccountProvisioner>, Arc<AccountStore>) {
    let db = setup_test_db().await;
    let store = Arc::new(AccountStore::new(db.get_connection()));
    let provisioner = AccountProvisioner::new(store.clone(), test_hasher());
    (Arc::new(provisioner), store)
}

#[tokio::test]
async fn test_create_account_scenario() {
    let (provisioner, store) = setup().await;

    let account = provisioner
        .create_account("User@Example.COM", "Ann", Some("pw123"))
        .await
        .unwrap();

    assert_eq!(account.email, "User@example.com");
    assert!(account.is_active);
    assert!(!account.is_staff);
    assert!(!account.is_superuser);

    let stored = store
        .find_by_identity("User@example.com")
        .await
        .unwrap()
        .expect("account persisted");
    assert_eq!(stored.id, account.id);
    assert_ne!(stored.password_hash.as_str(), "pw123");
    assert!(test_hasher().verify("pw123", &stored.password_hash));
}

#[tokio::test]
async fn test_empty_identity_persists_nothing() {
    let (provisioner, store) = setup().await;

    let result = provisioner.create_account("", "Ann", Some("pw123")).await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_superuser_scenario() {
    let (provisioner, store) = setup().await;

    provisioner
        .create_superuser("admin@x.com", "Admin", "s3cret")
        .await
        .unwrap();

    let stored = store
        .find_by_identity("admin@x.com")
        .await
        .unwrap()
        .expect("superuser persisted");
    assert!(stored.is_staff);
    assert!(stored.is_superuser);
    assert!(stored.can_access_admin());
    assert!(test_hasher().verify("s3cret", &stored.password_hash));
}

#[tokio::test]
async fn test_duplicate_identity_after_normalization() {
    let (provisioner, store) = setup().await;

    provisioner
        .create_account("ann@example.com", "Ann", Some("pw123"))
        .await
        .unwrap();
    let result = provisioner
        .create_account("ann@EXAMPLE.COM", "Other Ann", Some("pw456"))
        .await;

    assert!(matches!(result, Err(AppError::DuplicateIdentity(ref id)) if id == "ann@example.com"));
    assert_eq!(store.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_local_part_case_is_significant() {
    let (provisioner, store) = setup().await;

    provisioner
        .create_account("Ann@example.com", "Ann", None)
        .await
        .unwrap();
    provisioner
        .create_account("ann@example.com", "Ann", None)
        .await
        .unwrap();

    assert_eq!(store.list().await.unwrap().len(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_creation_single_winner() {
    let (provisioner, store) = setup().await;

    let first = {
        let provisioner = provisioner.clone();
        tokio::spawn(async move {
            provisioner
                .create_account("race@Example.com", "First", Some("pw1"))
                .await
        })
    };
    let second = {
        let provisioner = provisioner.clone();
        tokio::spawn(async move {
            provisioner
                .create_account("race@EXAMPLE.COM", "Second", Some("pw2"))
                .await
        })
    };

    let results = vec![first.await.unwrap(), second.await.unwrap()];

    let succeeded = results.iter().filter(|r| r.is_ok()).count();
    let duplicates = results
        .iter()
        .filter(|r| matches!(r, Err(AppError::DuplicateIdentity(_))))
        .count();
    assert_eq!(succeeded, 1);
    assert_eq!(duplicates, 1);
    assert_eq!(store.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_display_is_normalized_identity() {
    let (provisioner, _store) = setup().await;

    provisioner
        .create_account("Zed@B.ORG", "not-an-email@x.com", None)
        .await
        .unwrap();

    let accounts = provisioner.list_accounts().await.unwrap();
    assert_eq!(accounts[0].to_string(), "Zed@b.org");
    assert_eq!(accounts[0].full_name(), "not-an-email@x.com");
}

#[tokio::test]
async fn test_list_is_ordered_by_identity() {
    let (provisioner, _store) = setup().await;

    for email in ["carol@x.com", "alice@x.com", "bob@x.com"] {
        provisioner.create_account(email, "User", None).await.unwrap();
    }

    let emails: Vec<String> = provisioner
        .list_accounts()
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.email)
        .collect();
    assert_eq!(emails, vec!["alice@x.com", "bob@x.com", "carol@x.com"]);
}

#[tokio::test]
async fn test_grant_superuser_retry_is_idempotent() {
    let (provisioner, store) = setup().await;

    provisioner
        .create_account("ops@x.com", "Ops", Some("pw123"))
        .await
        .unwrap();

    let first = provisioner.grant_superuser("ops@X.com").await.unwrap();
    let second = provisioner.grant_superuser("ops@x.com").await.unwrap();

    assert!(first.is_staff && first.is_superuser);
    assert!(second.is_staff && second.is_superuser);
    let stored = store.find_by_identity("ops@x.com").await.unwrap().unwrap();
    assert!(stored.is_staff && stored.is_superuser);
}

#[tokio::test]
async fn test_authenticate_against_store() {
    let (provisioner, store) = setup().await;

    provisioner
        .create_account("Ann@Example.com", "Ann", Some("pw123"))
        .await
        .unwrap();

    let account = provisioner
        .authenticate("Ann@EXAMPLE.com", "pw123")
        .await
        .unwrap();
    assert_eq!(account.email, "Ann@example.com");

    assert!(matches!(
        provisioner.authenticate("Ann@example.com", "wrong").await,
        Err(AppError::InvalidCredentials)
    ));

    let mut deactivated = account.clone();
    deactivated.is_active = false;
    store.update(&deactivated).await.unwrap();
    assert!(matches!(
        provisioner.authenticate("Ann@example.com", "pw123").await,
        Err(AppError::InvalidCredentials)
    ));
}

#[tokio::test]
async fn test_account_without_secret_never_authenticates() {
    let (provisioner, _store) = setup().await;

    let account = provisioner
        .create_account("nopw@x.com", "No Password", None)
        .await
        .unwrap();

    assert!(!account.has_usable_password());
    assert!(matches!(
        provisioner.authenticate("nopw@x.com", "").await,
        Err(AppError::InvalidCredentials)
    ));
}

#[tokio::test]
async fn test_change_secret_rehashes() {
    let (provisioner, _store) = setup().await;

    provisioner
        .create_account("ann@x.com", "Ann", None)
        .await
        .unwrap();
    provisioner
        .change_secret("ann@x.com", Some("fresh-secret"))
        .await
        .unwrap();

    assert!(provisioner.authenticate("ann@x.com", "fresh-secret").await.is_ok());
}

#[tokio::test]
async fn test_delete_account() {
    let (provisioner, store) = setup().await;

    let account = provisioner
        .create_account("gone@x.com", "Gone", None)
        .await
        .unwrap();
    provisioner.delete_account("gone@x.com").await.unwrap();

    assert!(store.find_by_id(account.id).await.unwrap().is_none());
    assert!(matches!(store.delete(account.id).await, Err(AppError::NotFound)));
    assert!(matches!(
        provisioner.get_account("gone@x.com").await,
        Err(AppError::NotFound)
    ));
}

#[tokio::test]
async fn test_update_unknown_account_is_not_found() {
    let (provisioner, store) = setup().await;

    let account = provisioner
        .create_account("temp@x.com", "Temp", None)
        .await
        .unwrap();
    store.delete(account.id).await.unwrap();

    assert!(matches!(store.update(&account).await, Err(AppError::NotFound)));
}
