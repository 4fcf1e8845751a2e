pub mod app_config;
pub mod factory;
pub mod file_store;
pub mod memory_store;
pub mod redis_repo;

pub use app_config::{Config, MatchingRules, StorageKeys, StoreBackend, StoreConfig};
pub use factory::open_store;
pub use file_store::FileStore;
pub use memory_store::MemoryStore;
pub use redis_repo::RedisStore;
