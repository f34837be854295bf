//! Password value object and the credential hashing capability.
//!
//! The account layer never sees plaintext after provisioning: secrets go
//! through a [`CredentialHasher`] and only the resulting [`Password`] is kept.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use crate::constants::UNUSABLE_PASSWORD_PREFIX;
use crate::error::{DomainError, DomainResult};

/// Stored credential of an account.
///
/// Either a PHC-formatted hash or an unusable marker that never verifies.
#[derive(Clone)]
pub struct Password {
    hash: String,
}

// Don't expose hash in debug output (security)
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .field("usable", &self.is_usable())
            .finish()
    }
}

impl Password {
    /// Create a Password from an existing hash (from database).
    pub fn from_hash(hash: impl Into<String>) -> Self {
        Self { hash: hash.into() }
    }

    /// Create a credential that no secret can ever match.
    ///
    /// The random suffix keeps two unusable credentials from comparing equal.
    pub fn unusable() -> Self {
        let marker = SaltString::generate(&mut OsRng);
        Self {
            hash: format!("{}{}", UNUSABLE_PASSWORD_PREFIX, marker.as_str()),
        }
    }

    /// Whether this credential can ever verify.
    pub fn is_usable(&self) -> bool {
        !self.hash.starts_with(UNUSABLE_PASSWORD_PREFIX)
    }

    /// Get the hash string for storage.
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Consume and return the hash string.
    pub fn into_string(self) -> String {
        self.hash
    }
}

impl From<Password> for String {
    fn from(password: Password) -> Self {
        password.hash
    }
}

impl PartialEq for Password {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for Password {}

/// One-way, salted hashing of account secrets.
pub trait CredentialHasher: Send + Sync {
    /// Hash a plaintext secret.
    fn hash(&self, plain_text: &str) -> DomainResult<Password>;

    /// Check a plaintext secret against a stored credential.
    fn verify(&self, plain_text: &str, password: &Password) -> bool;

    /// Hash the secret if one is given, otherwise produce an unusable credential.
    fn hash_optional(&self, plain_text: Option<&str>) -> DomainResult<Password> {
        match plain_text {
            Some(secret) => self.hash(secret),
            None => Ok(Password::unusable()),
        }
    }
}

/// Argon2id implementation of [`CredentialHasher`].
#[derive(Clone)]
pub struct Argon2Hasher {
    params: Params,
}

impl std::fmt::Debug for Argon2Hasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Argon2Hasher")
            .field("memory_kib", &self.params.m_cost())
            .field("iterations", &self.params.t_cost())
            .field("parallelism", &self.params.p_cost())
            .finish()
    }
}

impl Argon2Hasher {
    /// Create a hasher with explicit cost parameters.
    ///
    /// # Errors
    /// Returns a password error if argon2 rejects the parameters.
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> DomainResult<Self> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| DomainError::password(format!("Invalid Argon2 parameters: {}", e)))?;
        Ok(Self { params })
    }

    /// Get Argon2 instance with the configured params.
    #[inline]
    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, plain_text: &str) -> DomainResult<Password> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| DomainError::internal(format!("Password hash failed: {}", e)))?;
        Ok(Password::from_hash(hash.to_string()))
    }

    fn verify(&self, plain_text: &str, password: &Password) -> bool {
        if !password.is_usable() {
            return false;
        }

        // Cost params come from the stored hash, not from self.params
        match PasswordHash::new(password.as_str()) {
            Ok(parsed) => self
                .argon2()
                .verify_password(plain_text.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}
