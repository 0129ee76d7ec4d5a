use bcrypt::BcryptError;

use crate::app::AppError;

#[cfg(not(test))]
const COST: u32 = bcrypt::DEFAULT_COST;
// Keeps the test suite fast, the format is the same.
#[cfg(test)]
const COST: u32 = 4;

/// Hashes a password with bcrypt, the salt is generated and embedded in the result.
///
/// Slow on purpose, call it off the async executor.
///
/// # Example
/// ```
/// let stored = hash("hunter22")?;
/// assert!(verify("hunter22", &stored));
/// ```
pub fn hash(password: &str) -> Result<String, AppError> {
    Ok(bcrypt::hash(password, COST)?)
}

/// Checks a plaintext password against a value produced by [hash].
/// Malformed stored values never verify.
pub fn verify(password: &str, stored: &str) -> bool {
    bcrypt::verify(password, stored).unwrap_or(false)
}

impl From<BcryptError> for AppError {
    fn from(err: BcryptError) -> Self {
        AppError::TransactionFailure(format!("password hashing failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let stored = hash("test_password123").unwrap();

        assert!(verify("test_password123", &stored));
        assert!(!verify("test_password124", &stored));
    }

    #[test]
    fn test_hash_never_contains_plaintext() {
        let stored = hash("test_password123").unwrap();

        assert!(!stored.contains("test_password123"));
        assert!(stored.starts_with("$2"));
    }

    #[test]
    fn test_same_password_gets_different_salts() {
        assert_ne!(hash("asd123").unwrap(), hash("asd123").unwrap());
    }

    #[test]
    fn test_malformed_hash_does_not_verify() {
        assert!(!verify("asd123", "no separator here"));
        assert!(!verify("asd123", "asd123"));
        assert!(!verify("asd123", ""));
    }
}
