use carpool_core::models::{NewRide, Ride, RideBooking};
use carpool_core::repository::{load_json, save_json};
use carpool_core::validation::{validate_new_ride, FieldError, ValidationErrors};
use carpool_core::{time, KeyValueStore, StoreError};
use carpool_shared::{EngineEvent, PersistenceFailedEvent, RideBookedEvent, RideCreatedEvent};
use carpool_store::{open_store, Config, MatchingRules, StorageKeys};
use chrono::{NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex, MutexGuard};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::error::RideError;
use crate::filters::RideFilters;

const EVENT_CAPACITY: usize = 100;

#[derive(Default)]
struct EngineState {
    rides: Vec<Ride>,
    bookings: Vec<RideBooking>,
    // Not operated on: dated before today or unreadable. Written back untouched.
    past_rides: Vec<Ride>,
    past_bookings: Vec<RideBooking>,
}

impl EngineState {
    fn ride_snapshot(&self) -> Vec<&Ride> {
        self.past_rides.iter().chain(self.rides.iter()).collect()
    }

    fn booking_snapshot(&self) -> Vec<&RideBooking> {
        self.past_bookings.iter().chain(self.bookings.iter()).collect()
    }

    /// Move rides not dated `today`, or with a malformed departure time, out
    /// of the working set together with their bookings. Returns how many
    /// rides were moved.
    fn retire_stale(&mut self, today: NaiveDate) -> usize {
        let rides_current = self
            .rides
            .iter()
            .all(|r| r.date == today && time::is_valid_time_format(&r.time));
        let bookings_current = self
            .bookings
            .iter()
            .all(|b| self.rides.iter().any(|r| r.id == b.ride_id));
        if rides_current && bookings_current {
            return 0;
        }

        let (current, stale): (Vec<Ride>, Vec<Ride>) = std::mem::take(&mut self.rides)
            .into_iter()
            .partition(|r| r.date == today && time::is_valid_time_format(&r.time));
        for ride in stale.iter().filter(|r| !time::is_valid_time_format(&r.time)) {
            warn!("Ride {} has malformed time {:?}, keeping it out of matching", ride.id, ride.time);
        }

        let (bookings, stale_bookings): (Vec<RideBooking>, Vec<RideBooking>) =
            std::mem::take(&mut self.bookings)
                .into_iter()
                .partition(|b| current.iter().any(|r| r.id == b.ride_id));

        let retired = stale.len();
        self.rides = current;
        self.bookings = bookings;
        self.past_rides.extend(stale);
        self.past_bookings.extend(stale_bookings);
        retired
    }
}

/// Today's rides and bookings, and the rules for offering and booking seats.
///
/// Every mutation runs its checks, the state change, the store write and the
/// event broadcast while holding the state lock, so two bookings for the same
/// ride can never both see the last free seat.
pub struct RideEngine {
    state: Mutex<EngineState>,
    store: Arc<dyn KeyValueStore>,
    keys: StorageKeys,
    rules: MatchingRules,
    events: broadcast::Sender<EngineEvent>,
}

impl RideEngine {
    /// Open the configured store and load today's working set from it.
    pub async fn from_config(config: &Config) -> Result<Self, StoreError> {
        let store = open_store(&config.store).await?;
        Ok(Self::load(store, config.keys.clone(), config.matching.clone()).await)
    }

    /// Build an engine over `store`. Rides dated before today are kept out of
    /// the working set; unreadable snapshots are logged and treated as empty.
    pub async fn load(store: Arc<dyn KeyValueStore>, keys: StorageKeys, rules: MatchingRules) -> Self {
        let today = time::current_date();
        let all_rides: Vec<Ride> = load_or_empty(store.as_ref(), &keys.rides).await;
        let all_bookings: Vec<RideBooking> = load_or_empty(store.as_ref(), &keys.bookings).await;

        let state = split_by_day(all_rides, all_bookings, today);
        info!(
            "Loaded {} rides and {} bookings for {} ({} past rides retained)",
            state.rides.len(),
            state.bookings.len(),
            today,
            state.past_rides.len()
        );

        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            state: Mutex::new(state),
            store,
            keys,
            rules,
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.events.subscribe()
    }

    pub fn rules(&self) -> &MatchingRules {
        &self.rules
    }

    pub async fn create_ride(&self, data: NewRide, employee_id: &str) -> Result<Ride, RideError> {
        let employee_id = employee_id.trim();
        validate_new_ride(&data, employee_id)?;

        let today = time::current_date();
        let mut state = self.lock_today().await;

        if state
            .rides
            .iter()
            .any(|r| r.employee_id == employee_id && r.date == today)
        {
            warn!("Rejected second ride offer from {}", employee_id);
            return Err(RideError::DuplicateRide(employee_id.to_string()));
        }

        let ride = Ride::new(data, employee_id.to_string(), today);
        state.rides.push(ride.clone());
        info!("Ride {} offered by {} at {} ({} seats)", ride.id, employee_id, ride.time, ride.vacant_seats);

        self.persist(&self.keys.rides, &state.ride_snapshot()).await;
        self.publish(EngineEvent::RideCreated(RideCreatedEvent {
            ride_id: ride.id,
            employee_id: ride.employee_id.clone(),
            vacant_seats: ride.vacant_seats,
            timestamp: Utc::now().timestamp(),
        }));

        Ok(ride)
    }

    pub async fn book_ride(&self, ride_id: Uuid, employee_id: &str) -> Result<RideBooking, RideError> {
        let employee_id = employee_id.trim();
        let mut state = self.lock_today().await;

        let index = match check_booking(&state.rides, ride_id, employee_id) {
            Ok(index) => index,
            Err(e) => {
                debug!("Booking of {} by {} rejected: {}", ride_id, employee_id, e);
                return Err(e);
            }
        };

        let booking = RideBooking::new(ride_id, employee_id.to_string());
        let ride = &mut state.rides[index];
        ride.claim_seat(employee_id.to_string());
        debug_assert!(ride.seats_consistent());
        let vacant_seats = ride.vacant_seats;
        state.bookings.push(booking.clone());
        info!("Ride {} booked by {} ({} seats left)", ride_id, employee_id, vacant_seats);

        self.persist(&self.keys.rides, &state.ride_snapshot()).await;
        self.persist(&self.keys.bookings, &state.booking_snapshot()).await;
        self.publish(EngineEvent::RideBooked(RideBookedEvent {
            ride_id,
            employee_id: employee_id.to_string(),
            vacant_seats,
            timestamp: booking.booking_time.timestamp(),
        }));

        Ok(booking)
    }

    /// Rides with a free seat that pass `filters`, in creation order.
    pub async fn available_rides(&self, filters: &RideFilters) -> Vec<Ride> {
        let state = self.lock_today().await;
        filters
            .apply(&state.rides, self.rules.time_buffer_minutes)
            .cloned()
            .collect()
    }

    /// Same rules `book_ride` enforces, without booking.
    pub async fn booking_eligibility(&self, ride_id: Uuid, employee_id: &str) -> Result<(), RideError> {
        let state = self.lock_today().await;
        check_booking(&state.rides, ride_id, employee_id.trim()).map(|_| ())
    }

    pub async fn can_book_ride(&self, ride_id: Uuid, employee_id: &str) -> bool {
        self.booking_eligibility(ride_id, employee_id).await.is_ok()
    }

    pub async fn rides_by_employee(&self, employee_id: &str) -> Vec<Ride> {
        let employee_id = employee_id.trim();
        let state = self.lock_today().await;
        state
            .rides
            .iter()
            .filter(|r| r.employee_id == employee_id)
            .cloned()
            .collect()
    }

    pub async fn bookings_by_employee(&self, employee_id: &str) -> Vec<RideBooking> {
        let employee_id = employee_id.trim();
        let state = self.lock_today().await;
        state
            .bookings
            .iter()
            .filter(|b| b.employee_id == employee_id)
            .cloned()
            .collect()
    }

    pub async fn get_ride(&self, ride_id: Uuid) -> Option<Ride> {
        let state = self.lock_today().await;
        state.rides.iter().find(|r| r.id == ride_id).cloned()
    }

    pub async fn rides(&self) -> Vec<Ride> {
        self.lock_today().await.rides.clone()
    }

    pub async fn bookings(&self) -> Vec<RideBooking> {
        self.lock_today().await.bookings.clone()
    }

    /// Take the state lock, first retiring anything left over from a
    /// previous day.
    async fn lock_today(&self) -> MutexGuard<'_, EngineState> {
        let mut state = self.state.lock().await;
        let retired = state.retire_stale(time::current_date());
        if retired > 0 {
            info!("Retired {} rides from the working set", retired);
        }
        state
    }

    /// Best effort: a failed write is reported but the in-memory change stands.
    async fn persist<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        if let Err(e) = save_json(self.store.as_ref(), key, value).await {
            error!("Failed to persist {}: {}", key, e);
            self.publish(EngineEvent::PersistenceFailed(PersistenceFailedEvent {
                key: key.to_string(),
                error: e.to_string(),
                timestamp: Utc::now().timestamp(),
            }));
        }
    }

    fn publish(&self, event: EngineEvent) {
        // No subscribers is not an error
        let _ = self.events.send(event);
    }
}

/// Index of the ride if `employee_id` may book it. Rules are checked in
/// order and the first violation wins.
fn check_booking(rides: &[Ride], ride_id: Uuid, employee_id: &str) -> Result<usize, RideError> {
    if employee_id.is_empty() {
        return Err(ValidationErrors(vec![FieldError::new("employeeId", "employee id is required")]).into());
    }

    let index = rides
        .iter()
        .position(|r| r.id == ride_id)
        .ok_or(RideError::RideNotFound(ride_id))?;
    let ride = &rides[index];

    if ride.employee_id == employee_id {
        return Err(RideError::OwnRide(employee_id.to_string()));
    }

    if ride.is_full() {
        return Err(RideError::RideFull(ride_id));
    }

    if ride.has_booked(employee_id) {
        return Err(RideError::AlreadyBooked {
            ride_id,
            employee_id: employee_id.to_string(),
        });
    }

    Ok(index)
}

fn split_by_day(rides: Vec<Ride>, bookings: Vec<RideBooking>, today: NaiveDate) -> EngineState {
    let mut state = EngineState {
        rides,
        bookings,
        ..EngineState::default()
    };
    state.retire_stale(today);
    state
}

async fn load_or_empty<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Vec<T> {
    match load_json::<Vec<T>>(store, key).await {
        Ok(Some(items)) => items,
        Ok(None) => Vec::new(),
        Err(e) => {
            error!("Failed to load {}, starting empty: {}", key, e);
            Vec::new()
        }
    }
}
