//! Availability engine: merges first-party bookings and mirrored calendar
//! events into a set of occupied "HH:MM" buckets for a day, then derives the
//! open slots against the fixed business-hours grid.

use std::collections::HashSet;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::AppError;
use crate::store::models::{BookedAppointment, CalendarEventMirror};
use crate::store::Datastore;

pub const BUSINESS_OPEN_HOUR: u32 = 9;
pub const BUSINESS_CLOSE_HOUR: u32 = 17;
pub const SLOT_MINUTES: i64 = 30;

/// `[date 00:00:00, date 23:59:59]`, naive local time. Timestamps are stored
/// and compared without timezone conversion.
pub fn day_window(date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let start = date.and_time(NaiveTime::MIN);
    let end = start + Duration::days(1) - Duration::seconds(1);
    (start, end)
}

/// The canonical bookable grid: 16 slots, 09:00 inclusive to 17:00 exclusive.
pub fn slot_grid() -> Vec<String> {
    let mut grid = Vec::with_capacity(16);
    for hour in BUSINESS_OPEN_HOUR..BUSINESS_CLOSE_HOUR {
        for minute in [0u32, 30] {
            grid.push(format!("{hour:02}:{minute:02}"));
        }
    }
    grid
}

fn label(t: NaiveDateTime) -> String {
    t.format("%H:%M").to_string()
}

/// Occupied buckets for one day's rows. Bookings contribute their literal
/// "HH:MM" minute. Events are walked from their own start instant in
/// 30-minute steps while `t < end` — the start is NOT re-aligned to the grid,
/// so an event starting at 10:15 yields 10:15, 10:45, … labels that never
/// match the canonical marks. Existing clients consume these labels as-is,
/// so the phase is kept.
pub fn occupied_labels(
    booked: &[BookedAppointment],
    events: &[CalendarEventMirror],
) -> HashSet<String> {
    let mut occupied = HashSet::new();
    for booking in booked {
        occupied.insert(label(booking.appointment_time));
    }
    for event in events {
        let mut t = event.start_time;
        while t < event.end_time {
            occupied.insert(label(t));
            t += Duration::minutes(SLOT_MINUTES);
        }
    }
    occupied
}

/// Grid slots whose label is absent from the occupied set, in grid order.
/// Comparison is exact string equality, never time-range overlap.
pub fn open_labels(occupied: &HashSet<String>) -> Vec<String> {
    slot_grid()
        .into_iter()
        .filter(|slot| !occupied.contains(slot))
        .collect()
}

/// Occupied buckets for the agent's day, sorted for stable display. May
/// contain labels outside the canonical grid; downstream ignores those.
pub async fn occupied_slots(
    store: &dyn Datastore,
    agent_id: i64,
    date: NaiveDate,
) -> Result<Vec<String>, AppError> {
    let (start, end) = day_window(date);
    let booked = store.booked_between(agent_id, start, end).await?;
    let events = store.events_overlapping(agent_id, start, end).await?;
    let mut labels: Vec<String> = occupied_labels(&booked, &events).into_iter().collect();
    labels.sort();
    Ok(labels)
}

/// Open slots for the agent's day: the canonical grid minus occupied labels.
pub async fn open_slots(
    store: &dyn Datastore,
    agent_id: i64,
    date: NaiveDate,
) -> Result<Vec<String>, AppError> {
    let (start, end) = day_window(date);
    let booked = store.booked_between(agent_id, start, end).await?;
    let events = store.events_overlapping(agent_id, start, end).await?;
    Ok(open_labels(&occupied_labels(&booked, &events)))
}
