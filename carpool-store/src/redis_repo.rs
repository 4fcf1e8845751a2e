use async_trait::async_trait;
use carpool_core::{KeyValueStore, StoreError};
use redis::AsyncCommands;
use tracing::info;

#[derive(Clone)]
pub struct RedisStore {
    client: redis::Client,
    namespace: String,
}

fn backend(e: redis::RedisError) -> StoreError {
    StoreError::Backend(e.to_string())
}

impl RedisStore {
    pub async fn new(connection_string: &str, namespace: &str) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(connection_string)?;
        info!("Redis store configured with namespace {}", namespace);
        Ok(Self {
            client,
            namespace: namespace.to_string(),
        })
    }

    fn key(&self, key: &str) -> String {
        format!("{}:{}", self.namespace, key)
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError> {
        let mut conn = self.client.get_multiplexed_async_connection().await.map_err(backend)?;
        let raw: Option<String> = conn.get(self.key(key)).await.map_err(backend)?;
        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &serde_json::Value) -> Result<(), StoreError> {
        let payload = serde_json::to_string(value)?;
        let mut conn = self.client.get_multiplexed_async_connection().await.map_err(backend)?;
        conn.set::<_, _, ()>(self.key(key), payload).await.map_err(backend)?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut conn = self.client.get_multiplexed_async_connection().await.map_err(backend)?;
        conn.del::<_, ()>(self.key(key)).await.map_err(backend)?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let mut conn = self.client.get_multiplexed_async_connection().await.map_err(backend)?;
        let keys: Vec<String> = conn.keys(format!("{}:*", self.namespace)).await.map_err(backend)?;
        if !keys.is_empty() {
            conn.del::<_, ()>(&keys).await.map_err(backend)?;
        }
        info!("Cleared {} keys under {}", keys.len(), self.namespace);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_keys_are_namespaced() {
        // Client::open only parses the URL, no server needed
        let store = RedisStore::new("redis://127.0.0.1:6379", "carpool").await.unwrap();
        assert_eq!(store.key("transportRides"), "carpool:transportRides");
    }

    #[tokio::test]
    async fn test_rejects_bad_url() {
        assert!(RedisStore::new("not a url", "carpool").await.is_err());
    }
}
