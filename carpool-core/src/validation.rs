//! Field checks applied before a ride offer is accepted.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use crate::models::NewRide;
use crate::time::is_valid_time_format;

static EMPLOYEE_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9]{1,10}$").expect("employee id pattern compiles"));
static VEHICLE_NO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9\- ]{2,15}$").expect("vehicle number pattern compiles"));

const MIN_PLACE_LEN: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<String>>()
            .join("; ");
        write!(f, "{}", joined)
    }
}

impl std::error::Error for ValidationErrors {}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }
}

pub fn is_valid_employee_id(employee_id: &str) -> bool {
    EMPLOYEE_ID.is_match(employee_id)
}

pub fn is_valid_vehicle_no(vehicle_no: &str) -> bool {
    VEHICLE_NO.is_match(vehicle_no)
}

/// Collects every problem with an offer rather than stopping at the first.
pub fn validate_new_ride(ride: &NewRide, employee_id: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let employee_id = employee_id.trim();
    if employee_id.is_empty() {
        errors.push("employeeId", "employee id is required");
    } else if !is_valid_employee_id(employee_id) {
        errors.push("employeeId", "employee id must be at most 10 letters or digits");
    }

    if ride.vehicle_no.trim().is_empty() {
        errors.push("vehicleNo", "vehicle number is required");
    } else if !is_valid_vehicle_no(&ride.vehicle_no) {
        errors.push("vehicleNo", "vehicle number must be 2-15 letters, digits, spaces or dashes");
    }

    if ride.vacant_seats < 1 {
        errors.push("vacantSeats", "at least one seat must be offered");
    }

    if !is_valid_time_format(&ride.time) {
        errors.push("time", format!("'{}' is not a valid HH:MM time", ride.time));
    }

    if ride.pickup_point.trim().chars().count() < MIN_PLACE_LEN {
        errors.push("pickupPoint", "pickup point must be at least 2 characters");
    }

    if ride.destination.trim().chars().count() < MIN_PLACE_LEN {
        errors.push("destination", "destination must be at least 2 characters");
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VehicleType;

    fn valid() -> NewRide {
        NewRide {
            vehicle_type: VehicleType::Bike,
            vehicle_no: "MH-12 4567".to_string(),
            vacant_seats: 1,
            time: "18:30".to_string(),
            pickup_point: "Tower B".to_string(),
            destination: "Central Station".to_string(),
        }
    }

    #[test]
    fn test_valid_ride_passes() {
        assert!(validate_new_ride(&valid(), "EMP001").is_ok());
    }

    #[test]
    fn test_collects_all_field_errors() {
        let ride = NewRide {
            vehicle_no: "#".to_string(),
            vacant_seats: 0,
            time: "25:00".to_string(),
            pickup_point: " ".to_string(),
            destination: "X".to_string(),
            ..valid()
        };

        let errors = validate_new_ride(&ride, "").unwrap_err();
        assert_eq!(errors.errors().len(), 6);
        for field in ["employeeId", "vehicleNo", "vacantSeats", "time", "pickupPoint", "destination"] {
            assert!(errors.has_field(field), "expected error on {}", field);
        }
    }

    #[test]
    fn test_employee_id_format() {
        assert!(is_valid_employee_id("E1"));
        assert!(is_valid_employee_id("abcDEF1234"));
        assert!(!is_valid_employee_id("E-123"));
        assert!(!is_valid_employee_id("E 1"));
        assert!(!is_valid_employee_id("ABCDEFGHIJK"));

        let errors = validate_new_ride(&valid(), "EMP-01").unwrap_err();
        assert!(errors.has_field("employeeId"));
        assert_eq!(errors.errors().len(), 1);
    }

    #[test]
    fn test_display_joins_messages() {
        let ride = NewRide {
            vacant_seats: 0,
            ..valid()
        };
        let errors = validate_new_ride(&ride, "EMP001").unwrap_err();
        assert_eq!(errors.to_string(), "vacantSeats: at least one seat must be offered");
    }
}
