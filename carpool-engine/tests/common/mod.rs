#![allow(dead_code)]

use async_trait::async_trait;
use carpool_core::models::{NewRide, VehicleType};
use carpool_core::{KeyValueStore, StoreError};
use carpool_engine::RideEngine;
use carpool_store::{MatchingRules, MemoryStore, StorageKeys};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn offer(vehicle_type: VehicleType, seats: u32, time: &str) -> NewRide {
    NewRide {
        vehicle_type,
        vehicle_no: "KA01 AB 1234".to_string(),
        vacant_seats: seats,
        time: time.to_string(),
        pickup_point: "Main Gate".to_string(),
        destination: "Tech Park".to_string(),
    }
}

pub async fn engine_over(store: Arc<dyn KeyValueStore>) -> RideEngine {
    init_tracing();
    RideEngine::load(store, StorageKeys::default(), MatchingRules::default()).await
}

pub async fn memory_engine() -> (RideEngine, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let engine = engine_over(store.clone()).await;
    (engine, store)
}

/// Store whose writes can be switched to fail.
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    failing: AtomicBool,
}

impl FlakyStore {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl KeyValueStore for FlakyStore {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &serde_json::Value) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("disk full".to_string()));
        }
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.inner.remove(key).await
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.inner.clear().await
    }
}
