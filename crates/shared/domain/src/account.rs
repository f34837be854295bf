//! Account domain entity and related types.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::error::DomainResult;
use crate::password::Password;

/// Account domain entity
///
/// `email` is the identity: unique across accounts and already normalized.
#[derive(Debug, Clone, Serialize)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: Password,
    pub name: String,
    /// Inactive accounts never authenticate
    pub is_active: bool,
    /// Elevated account, allowed on the administrative surface
    pub is_staff: bool,
    /// Bypasses every permission check
    pub is_superuser: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Full human-readable label.
    pub fn full_name(&self) -> &str {
        &self.name
    }

    /// Short human-readable label.
    ///
    /// Same as [`Account::full_name`]: accounts carry a single display name.
    pub fn short_name(&self) -> &str {
        &self.name
    }

    /// Check if the stored credential can ever verify
    pub fn has_usable_password(&self) -> bool {
        self.password_hash.is_usable()
    }

    /// Check if account may use the administrative surface
    pub fn can_access_admin(&self) -> bool {
        self.is_active && self.is_staff
    }

    /// Check if account bypasses permission checks
    pub fn has_unrestricted_permissions(&self) -> bool {
        self.is_active && self.is_superuser
    }

    /// Mark account as superuser. Staff and superuser are always set together.
    pub fn grant_superuser(&mut self) {
        self.is_staff = true;
        self.is_superuser = true;
        self.updated_at = Utc::now();
    }

    /// Replace the stored credential
    pub fn set_password(&mut self, password: Password) {
        self.password_hash = password;
        self.updated_at = Utc::now();
    }
}

impl std::fmt::Display for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.email)
    }
}

/// Account creation data, not yet persisted.
#[derive(Debug, Clone, Validate)]
pub struct NewAccount {
    /// Normalized identity
    #[validate(length(min = 1, max = 255))]
    pub email: String,
    /// Display name
    #[validate(length(max = 255))]
    pub name: String,
    /// Hashed or unusable credential
    pub password_hash: Password,
}

impl NewAccount {
    /// Build creation data, checking field lengths.
    pub fn new(email: String, name: String, password_hash: Password) -> DomainResult<Self> {
        let account = Self {
            email,
            name,
            password_hash,
        };
        account.validate()?;
        Ok(account)
    }

    /// Check field lengths without building a value.
    pub fn check_fields(email: &str, name: &str) -> DomainResult<()> {
        Self::new(email.to_string(), name.to_string(), Password::from_hash(String::new()))
            .map(|_| ())
    }
}

/// Account listing view (safe to print or serialize)
#[derive(Debug, Clone, Serialize)]
pub struct AccountSummary {
    /// Unique account identifier
    pub id: Uuid,
    /// Normalized identity
    pub email: String,
    /// Display name
    pub name: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub has_usable_password: bool,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for AccountSummary {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            email: account.email.clone(),
            name: account.name.clone(),
            is_active: account.is_active,
            is_staff: account.is_staff,
            is_superuser: account.is_superuser,
            has_usable_password: account.has_usable_password(),
            created_at: account.created_at,
        }
    }
}
