// Service exports
pub mod cache;
pub mod firestore;
pub mod postgres;

pub use cache::{CacheManager, CacheKey, CacheError};
pub use firestore::{FirestoreClient, StoreCollections, StoreError};
pub use postgres::{PostgresClient, PostgresError, ActionType, SwipeStats};
