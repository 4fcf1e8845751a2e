pub mod models;

pub use models::events::{EngineEvent, PersistenceFailedEvent, RideBookedEvent, RideCreatedEvent};
