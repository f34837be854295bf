//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Identity
// =============================================================================

/// Separator between the local part and the domain part of an identity
pub const IDENTITY_DOMAIN_SEPARATOR: char = '@';

// =============================================================================
// Credentials
// =============================================================================

/// Prefix marking a stored credential that can never verify
pub const UNUSABLE_PASSWORD_PREFIX: &str = "!";

/// Argon2 memory cost in KiB (argon2 crate default)
pub const DEFAULT_ARGON2_MEMORY_KIB: u32 = 19_456;

/// Argon2 iteration count (argon2 crate default)
pub const DEFAULT_ARGON2_ITERATIONS: u32 = 2;

/// Argon2 lane count (argon2 crate default)
pub const DEFAULT_ARGON2_PARALLELISM: u32 = 1;

/// Well-formed hash that never matches, verified against when an identity is unknown
pub const DUMMY_PASSWORD_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$ZHVtbXlzYWx0MTIzNDU2$4QAmYtyMdyH4Ibmvk8ymZuHgRWFvcrVjpOMGRjCALsQ";
