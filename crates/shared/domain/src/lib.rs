//! Domain layer - Core account entity and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.

pub mod account;
pub mod constants;
pub mod error;
pub mod identity;
pub mod password;

pub use account::{Account, AccountSummary, NewAccount};
pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use identity::{normalize_identity, require_identity};
pub use password::{Argon2Hasher, CredentialHasher, Password};
