//! Account repository: the record store behind provisioning.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};
use uuid::Uuid;

use super::entities::account::{self, ActiveModel, Entity as AccountEntity};
use common::{AppError, AppResult};
use domain::{Account, NewAccount};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Account repository trait for dependency injection.
///
/// Implementations must reject a second account with the same identity
/// atomically at insert time, returning [`AppError::DuplicateIdentity`].
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find account by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>>;

    /// Find account by normalized identity
    async fn find_by_identity(&self, identity: &str) -> AppResult<Option<Account>>;

    /// Persist a new account; the store assigns its ID
    async fn insert(&self, account: NewAccount) -> AppResult<Account>;

    /// Write back name, credential and flags of an existing account
    async fn update(&self, account: &Account) -> AppResult<Account>;

    /// Permanently delete account by ID
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// List all accounts ordered by identity
    async fn list(&self) -> AppResult<Vec<Account>>;
}

/// SeaORM implementation of AccountRepository
pub struct AccountStore {
    db: DatabaseConnection,
}

impl AccountStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Translate a unique-constraint violation into a duplicate identity error.
fn map_insert_error(identity: &str, err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::duplicate_identity(identity),
        _ => AppError::from(err),
    }
}

#[async_trait]
impl AccountRepository for AccountStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        let result = AccountEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Account::from))
    }

    async fn find_by_identity(&self, identity: &str) -> AppResult<Option<Account>> {
        let result = AccountEntity::find()
            .filter(account::Column::Email.eq(identity))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Account::from))
    }

    async fn insert(&self, account: NewAccount) -> AppResult<Account> {
        let now = chrono::Utc::now();
        let identity = account.email.clone();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(account.email),
            password_hash: Set(account.password_hash.into_string()),
            name: Set(account.name),
            is_active: Set(true),
            is_staff: Set(false),
            is_superuser: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| map_insert_error(&identity, e))?;
        Ok(Account::from(model))
    }

    async fn update(&self, account: &Account) -> AppResult<Account> {
        let existing = AccountEntity::find_by_id(account.id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        // Identity is immutable after creation
        let mut active: ActiveModel = existing.into();
        active.name = Set(account.name.clone());
        active.password_hash = Set(account.password_hash.as_str().to_string());
        active.is_active = Set(account.is_active);
        active.is_staff = Set(account.is_staff);
        active.is_superuser = Set(account.is_superuser);
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Account::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = AccountEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn list(&self) -> AppResult<Vec<Account>> {
        let models = AccountEntity::find()
            .order_by_asc(account::Column::Email)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Account::from).collect())
    }
}
