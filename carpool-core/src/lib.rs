pub mod models;
pub mod repository;
pub mod time;
pub mod validation;

pub use models::{NewRide, Ride, RideBooking, VehicleType};
pub use repository::KeyValueStore;
pub use validation::{FieldError, ValidationErrors};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Storage backend error: {0}")]
    Backend(String),
    #[error("Invalid storage configuration: {0}")]
    Config(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
