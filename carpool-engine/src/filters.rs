use carpool_core::models::{Ride, VehicleType};
use carpool_core::time::{is_time_in_buffer, is_valid_time_format};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Search criteria for available rides. Every field is optional and only
/// narrows the result when set to a non-blank value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RideFilters {
    pub vehicle_type: Option<VehicleType>,
    #[serde(alias = "timeInString")]
    pub time: Option<String>,
    /// The searcher. Their own offers are left out.
    pub employee_id: Option<String>,
}

impl RideFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vehicle_type(mut self, vehicle_type: VehicleType) -> Self {
        self.vehicle_type = Some(vehicle_type);
        self
    }

    pub fn time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    pub fn employee_id(mut self, employee_id: impl Into<String>) -> Self {
        self.employee_id = Some(employee_id.into());
        self
    }

    fn active_time(&self) -> Option<&str> {
        let time = self.time.as_deref().map(str::trim).filter(|t| !t.is_empty())?;
        if is_valid_time_format(time) {
            Some(time)
        } else {
            debug!("Ignoring malformed time filter {:?}", time);
            None
        }
    }

    fn active_employee(&self) -> Option<&str> {
        self.employee_id.as_deref().map(str::trim).filter(|e| !e.is_empty())
    }

    /// True if `ride` has a free seat and passes every set criterion.
    pub fn matches(&self, ride: &Ride, buffer_minutes: u32) -> bool {
        if ride.vacant_seats == 0 {
            return false;
        }

        if let Some(vehicle_type) = self.vehicle_type {
            if ride.vehicle_type != vehicle_type {
                return false;
            }
        }

        if let Some(time) = self.active_time() {
            if !is_time_in_buffer(&ride.time, time, buffer_minutes) {
                return false;
            }
        }

        if let Some(employee_id) = self.active_employee() {
            if ride.employee_id == employee_id {
                return false;
            }
        }

        true
    }

    pub fn apply<'a>(
        &'a self,
        rides: &'a [Ride],
        buffer_minutes: u32,
    ) -> impl Iterator<Item = &'a Ride> + 'a {
        rides
            .iter()
            .filter(move |ride| self.matches(ride, buffer_minutes))
    }
}
