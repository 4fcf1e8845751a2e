use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::validation::FieldError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum VehicleType {
    Car,
    Bike,
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VehicleType::Car => write!(f, "Car"),
            VehicleType::Bike => write!(f, "Bike"),
        }
    }
}

impl FromStr for VehicleType {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "car" => Ok(VehicleType::Car),
            "bike" => Ok(VehicleType::Bike),
            other => Err(FieldError::new(
                "vehicleType",
                format!("unknown vehicle type '{}'", other),
            )),
        }
    }
}

/// What an employee fills in when offering a ride.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewRide {
    pub vehicle_type: VehicleType,
    pub vehicle_no: String,
    pub vacant_seats: u32,
    pub time: String,
    pub pickup_point: String,
    pub destination: String,
}

/// A ride offer for a single day.
///
/// `vacant_seats` only ever goes down, one seat per entry appended to
/// `booked_employees`, so `original_seats - booked_employees.len()` always
/// equals `vacant_seats`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Ride {
    pub id: Uuid,
    pub employee_id: String,
    pub vehicle_type: VehicleType,
    pub vehicle_no: String,
    pub pickup_point: String,
    pub destination: String,
    pub time: String,
    pub original_seats: u32,
    pub vacant_seats: u32,
    pub date: NaiveDate,
    pub booked_employees: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Ride {
    pub fn new(data: NewRide, employee_id: String, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            employee_id,
            vehicle_type: data.vehicle_type,
            vehicle_no: data.vehicle_no,
            pickup_point: data.pickup_point,
            destination: data.destination,
            time: data.time,
            original_seats: data.vacant_seats,
            vacant_seats: data.vacant_seats,
            date,
            booked_employees: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn is_full(&self) -> bool {
        self.vacant_seats == 0
    }

    pub fn has_booked(&self, employee_id: &str) -> bool {
        self.booked_employees.iter().any(|e| e == employee_id)
    }

    /// Claim one seat. Callers check `is_full` and `has_booked` first.
    pub fn claim_seat(&mut self, employee_id: String) {
        self.vacant_seats = self.vacant_seats.saturating_sub(1);
        self.booked_employees.push(employee_id);
    }

    pub fn seats_consistent(&self) -> bool {
        self.original_seats as usize >= self.booked_employees.len()
            && self.vacant_seats as usize == self.original_seats as usize - self.booked_employees.len()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RideBooking {
    pub ride_id: Uuid,
    pub employee_id: String,
    pub booking_time: DateTime<Utc>,
}

impl RideBooking {
    pub fn new(ride_id: Uuid, employee_id: String) -> Self {
        Self {
            ride_id,
            employee_id,
            booking_time: Utc::now(),
        }
    }
}
