use uuid::Uuid;

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
pub struct RideCreatedEvent {
    pub ride_id: Uuid,
    pub employee_id: String,
    pub vacant_seats: u32,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
pub struct RideBookedEvent {
    pub ride_id: Uuid,
    pub employee_id: String,
    pub vacant_seats: u32,
    pub timestamp: i64,
}

/// A snapshot write that did not reach the store. The in-memory state is kept.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
pub struct PersistenceFailedEvent {
    pub key: String,
    pub error: String,
    pub timestamp: i64,
}

/// Everything the engine pushes to its subscribers after a state transition.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EngineEvent {
    RideCreated(RideCreatedEvent),
    RideBooked(RideBookedEvent),
    PersistenceFailed(PersistenceFailedEvent),
}

impl EngineEvent {
    pub fn ride_id(&self) -> Option<Uuid> {
        match self {
            EngineEvent::RideCreated(e) => Some(e.ride_id),
            EngineEvent::RideBooked(e) => Some(e.ride_id),
            EngineEvent::PersistenceFailed(_) => None,
        }
    }
}
