//! Key-value store trait.
//!
//! Defines the interface for the local persistent key-value substrate.
//! Implementations live in personachat-infra.

use personachat_types::error::RepositoryError;

/// Trait for a local persistent key-value substrate.
///
/// Values are opaque strings; a read returns the last written value or
/// `None`. Uses RPITIT (native async fn in traits, Rust 2024 edition).
pub trait KvStore: Send + Sync {
    /// Get a value by key. Returns None if the key does not exist.
    fn get(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>, RepositoryError>> + Send;

    /// Set a value for a key (upsert).
    fn set(
        &self,
        key: &str,
        value: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Delete a key. No-op if key does not exist. Used when a collection
    /// becomes empty.
    fn delete(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
