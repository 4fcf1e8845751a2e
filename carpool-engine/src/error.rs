use carpool_core::ValidationErrors;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RideError {
    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationErrors),

    #[error("Employee {0} already has a ride for today")]
    DuplicateRide(String),

    #[error("Ride not found: {0}")]
    RideNotFound(Uuid),

    #[error("Employee {0} cannot book their own ride")]
    OwnRide(String),

    #[error("Ride is full: {0}")]
    RideFull(Uuid),

    #[error("Employee {employee_id} already booked ride {ride_id}")]
    AlreadyBooked {
        ride_id: Uuid,
        employee_id: String,
    },
}

impl RideError {
    /// Rejections that come from the booking rules rather than malformed input.
    pub fn is_business_rule(&self) -> bool {
        !matches!(self, RideError::ValidationFailed(_))
    }
}
