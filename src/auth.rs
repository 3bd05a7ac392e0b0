//! Admin authorization for destructive operations.
//!
//! The admin secret is never stored in clear: the config file carries an
//! Argon2id PHC string and candidate tokens are verified against it.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

/// Decides whether a caller-supplied token grants admin rights.
pub trait Authorizer: Send + Sync {
    fn authorize(&self, token: &str) -> bool;
}

/// Verifies tokens against a stored Argon2id hash.
#[derive(Debug, Clone)]
pub struct AdminSecret {
    phc: String,
}

impl AdminSecret {
    /// Wrap a PHC hash string, rejecting anything that doesn't parse.
    pub fn from_hash(phc: impl Into<String>) -> Result<Self, argon2::password_hash::Error> {
        let phc = phc.into();
        PasswordHash::new(&phc)?;
        Ok(Self { phc })
    }
}

impl Authorizer for AdminSecret {
    fn authorize(&self, token: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(&self.phc) else {
            return false;
        };
        match Argon2::default().verify_password(token.as_bytes(), &parsed) {
            Ok(()) => true,
            Err(argon2::password_hash::Error::Password) => false,
            Err(e) => {
                log::warn!("Admin secret verification error: {}", e);
                false
            }
        }
    }
}

/// Used when no admin secret is configured: nothing may be deleted.
#[derive(Debug, Clone, Copy, Default)]
pub struct DenyAll;

impl Authorizer for DenyAll {
    fn authorize(&self, _token: &str) -> bool {
        false
    }
}

/// Hash an admin secret for the config file.
pub fn hash_admin_secret(secret: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(secret.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashed_secret_accepts_only_the_same_secret() {
        let phc = hash_admin_secret("open sesame").unwrap();
        assert!(phc.starts_with("$argon2id$"));

        let admin = AdminSecret::from_hash(phc).unwrap();
        assert!(admin.authorize("open sesame"));
        assert!(!admin.authorize("open sesame "));
        assert!(!admin.authorize(""));
    }

    #[test]
    fn plaintext_is_not_a_valid_hash() {
        assert!(AdminSecret::from_hash("admin123").is_err());
    }

    #[test]
    fn deny_all_rejects_everything() {
        assert!(!DenyAll.authorize("anything"));
        assert!(!DenyAll.authorize(""));
    }
}
