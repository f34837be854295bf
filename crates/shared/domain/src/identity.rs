//! Account identity (email) normalization.

use crate::constants::IDENTITY_DOMAIN_SEPARATOR;
use crate::error::{DomainError, DomainResult};

/// Normalize an email-shaped identity.
///
/// Only the domain part, everything after the last `@`, is folded to
/// lowercase. The local part is kept byte-for-byte. Identities without
/// a separator are returned unchanged.
pub fn normalize_identity(identity: &str) -> String {
    match identity.rsplit_once(IDENTITY_DOMAIN_SEPARATOR) {
        Some((local, domain)) => {
            format!("{}{}{}", local, IDENTITY_DOMAIN_SEPARATOR, domain.to_lowercase())
        }
        None => identity.to_string(),
    }
}

/// Reject an empty or blank identity, otherwise return it normalized.
pub fn require_identity(identity: &str) -> DomainResult<String> {
    if identity.trim().is_empty() {
        return Err(DomainError::validation("Account must have an email address"));
    }

    Ok(normalize_identity(identity))
}
