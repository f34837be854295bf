//! Unified error handling for account provisioning.
//!
//! Every failure a caller of the provisioner can observe is one [`AppError`]
//! variant. Store transport failures keep their original [`sea_orm::DbErr`].

use domain::DomainError;
use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Input
    #[error("{0}")]
    Validation(String),

    // Resource errors
    #[error("Account {0} already exists")]
    DuplicateIdentity(String),

    #[error("Account not found")]
    NotFound,

    // Authentication
    #[error("Invalid credentials")]
    InvalidCredentials,

    // Partial provisioning
    #[error("Account {identity} was created but could not be elevated")]
    ElevationIncomplete {
        identity: String,
        #[source]
        source: Box<AppError>,
    },

    // External service errors
    #[cfg(feature = "database")]
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    // Internal
    #[error("Internal error")]
    Internal(String),
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::DuplicateIdentity(_) => "DUPLICATE_IDENTITY",
            AppError::NotFound => "NOT_FOUND",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::ElevationIncomplete { .. } => "ELEVATION_INCOMPLETE",
            #[cfg(feature = "database")]
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether repeating the same call may succeed without changing input.
    pub fn is_retriable(&self) -> bool {
        match self {
            AppError::ElevationIncomplete { .. } => true,
            #[cfg(feature = "database")]
            AppError::Database(_) => true,
            _ => false,
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            // Show full message for client errors
            AppError::Validation(msg) => msg.clone(),
            AppError::ElevationIncomplete { identity, source } => {
                tracing::error!(%identity, "Elevation failed: {:?}", source);
                format!(
                    "Account {} exists without superuser rights; retry the elevation",
                    identity
                )
            }

            // Hide details for internal errors
            #[cfg(feature = "database")]
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }

            // Use default message for others
            _ => self.to_string(),
        }
    }
}

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => AppError::Validation(msg),
            DomainError::Password(msg) => AppError::Validation(msg),
            DomainError::NotFound(_) => AppError::NotFound,
            DomainError::DuplicateIdentity(identity) => AppError::DuplicateIdentity(identity),
            DomainError::InvalidCredentials => AppError::InvalidCredentials,
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self) -> AppResult<T> {
        self.ok_or(AppError::NotFound)
    }
}

/// Convenience constructors
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn duplicate_identity(identity: impl Into<String>) -> Self {
        AppError::DuplicateIdentity(identity.into())
    }

    pub fn elevation_incomplete(identity: impl Into<String>, source: AppError) -> Self {
        AppError::ElevationIncomplete {
            identity: identity.into(),
            source: Box::new(source),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
