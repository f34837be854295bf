//! Account provisioner - builds accounts with normalized identity and hashed credentials.
//!
//! The provisioner does not serialize concurrent calls. Identity uniqueness is
//! owned by the record store, which rejects the losing insert.

use std::sync::Arc;

use tracing::{error, info, warn};

use common::{AppError, AppResult, OptionExt};
use domain::{
    normalize_identity, require_identity, Account, CredentialHasher, NewAccount, Password,
    DUMMY_PASSWORD_HASH,
};

use crate::repository::AccountRepository;

/// Creates, elevates and authenticates accounts.
pub struct AccountProvisioner {
    repo: Arc<dyn AccountRepository>,
    hasher: Arc<dyn CredentialHasher>,
}

impl AccountProvisioner {
    /// Create new provisioner with a record store and a credential hasher
    pub fn new(repo: Arc<dyn AccountRepository>, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self { repo, hasher }
    }

    /// Create a regular account.
    ///
    /// An absent `secret` leaves the account with an unusable credential.
    ///
    /// # Errors
    /// - `Validation` if the identity is empty or a field is too long; nothing is persisted
    /// - `DuplicateIdentity` if the store already holds the normalized identity
    /// - store failures are returned unchanged
    pub async fn create_account(
        &self,
        identity: &str,
        name: &str,
        secret: Option<&str>,
    ) -> AppResult<Account> {
        let email = require_identity(identity)?;
        NewAccount::check_fields(&email, name)?;

        let new_account = NewAccount {
            email,
            name: name.to_string(),
            password_hash: self.hasher.hash_optional(secret)?,
        };

        match self.repo.insert(new_account).await {
            Ok(account) => {
                info!(account = %account, usable_password = account.has_usable_password(), "Account created");
                Ok(account)
            }
            Err(AppError::DuplicateIdentity(identity)) => {
                warn!(%identity, "Account identity already taken");
                Err(AppError::DuplicateIdentity(identity))
            }
            Err(e) => Err(e),
        }
    }

    /// Create an account with staff and superuser rights.
    ///
    /// # Errors
    /// - `Validation` if `secret` is empty, plus everything [`Self::create_account`] returns
    /// - `ElevationIncomplete` if the account was stored but the elevation write failed;
    ///   [`Self::grant_superuser`] finishes the job
    pub async fn create_superuser(
        &self,
        identity: &str,
        name: &str,
        secret: &str,
    ) -> AppResult<Account> {
        if secret.is_empty() {
            return Err(AppError::validation("Superuser must have a password"));
        }

        let mut account = self.create_account(identity, name, Some(secret)).await?;
        account.grant_superuser();

        match self.repo.update(&account).await {
            Ok(account) => {
                info!(account = %account, "Superuser created");
                Ok(account)
            }
            Err(e) => {
                error!(account = %account, error = %e, "Account stored without superuser rights");
                Err(AppError::elevation_incomplete(account.email, e))
            }
        }
    }

    /// Grant staff and superuser rights to an existing account.
    ///
    /// Safe to repeat; an already elevated account is returned untouched.
    pub async fn grant_superuser(&self, identity: &str) -> AppResult<Account> {
        let mut account = self.find(identity).await?;
        if account.is_staff && account.is_superuser {
            return Ok(account);
        }

        account.grant_superuser();
        let account = self.repo.update(&account).await?;
        info!(account = %account, "Superuser rights granted");
        Ok(account)
    }

    /// Check a secret against the stored credential.
    ///
    /// Unknown identities, inactive accounts and wrong secrets all fail the
    /// same way. A hash is verified even when the identity is unknown.
    pub async fn authenticate(&self, identity: &str, secret: &str) -> AppResult<Account> {
        let account = self
            .repo
            .find_by_identity(&normalize_identity(identity))
            .await?;

        let verified = match &account {
            Some(account) => self.hasher.verify(secret, &account.password_hash),
            None => {
                let _ = self
                    .hasher
                    .verify(secret, &Password::from_hash(DUMMY_PASSWORD_HASH));
                false
            }
        };

        match account {
            Some(account) if verified && account.is_active => Ok(account),
            _ => Err(AppError::InvalidCredentials),
        }
    }

    /// Replace an account's credential; `None` makes it unusable.
    pub async fn change_secret(&self, identity: &str, secret: Option<&str>) -> AppResult<Account> {
        let mut account = self.find(identity).await?;
        account.set_password(self.hasher.hash_optional(secret)?);

        let account = self.repo.update(&account).await?;
        info!(account = %account, usable_password = account.has_usable_password(), "Credential changed");
        Ok(account)
    }

    /// Delete an account by identity.
    pub async fn delete_account(&self, identity: &str) -> AppResult<()> {
        let account = self.find(identity).await?;
        self.repo.delete(account.id).await?;
        info!(account = %account, "Account deleted");
        Ok(())
    }

    /// Get account by identity
    pub async fn get_account(&self, identity: &str) -> AppResult<Account> {
        self.find(identity).await
    }

    /// List all accounts ordered by identity
    pub async fn list_accounts(&self) -> AppResult<Vec<Account>> {
        self.repo.list().await
    }

    async fn find(&self, identity: &str) -> AppResult<Account> {
        let email = require_identity(identity)?;
        self.repo.find_by_identity(&email).await?.ok_or_not_found()
    }
}
