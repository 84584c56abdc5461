//! Key-value backend abstraction.
//!
//! The journal treats durable storage as an opaque string store with three
//! operations. Backends live alongside this trait: SQLite, a directory of
//! JSON files, and an in-memory map.

use async_trait::async_trait;

use crate::error::StorageError;

/// Asynchronous string-keyed store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a key that does not exist is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Keys double as file names in the file backend, so they are restricted to
/// a conservative character set everywhere.
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key() {
        assert!(validate_key("appData").is_ok());
        assert!(validate_key("theme_preference-2").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("../etc/passwd").is_err());
        assert!(validate_key("a b").is_err());
    }
}
