//! Reservation time-window utilities
//!
//! Pure wall-clock math for the hall-map reservation screen. The venue
//! opens at 12:00 and closes at 04:00 the following calendar day; all
//! reservation times sit on a 15-minute grid.
//!
//! Everything here operates on `NaiveDateTime` (venue-local wall clock).
//! Timezone conversion happens at the API boundary, never in here.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use thiserror::Error;

/// Venue opening hour (local)
pub const OPENING_HOUR: u32 = 12;

/// Venue closing hour (local, on the following calendar day)
pub const CLOSING_HOUR: u32 = 4;

/// Minimum reservation length in minutes
pub const MIN_RESERVATION_MINUTES: i64 = 60;

const QUARTER_SECS: i64 = 15 * 60;

/// Time-window validation error, surfaced to the user as an alert
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeWindowError {
    #[error("Reservations are only possible between 12:00 and 04:00")]
    OutsideWorkingHours,

    #[error("A reservation must last at least one hour")]
    TooShort,

    #[error("The reservation must end before closing time (04:00)")]
    EndsAfterClosing,

    #[error("The end time must be after the start time")]
    EndBeforeStart,
}

/// A candidate reservation window, end exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Opening boundary for the given calendar day: 12:00:00.000 local.
pub fn opening_time(day: NaiveDate) -> NaiveDateTime {
    day.and_time(NaiveTime::from_hms_opt(OPENING_HOUR, 0, 0).unwrap_or(NaiveTime::MIN))
}

/// Closing boundary for the given calendar day: 04:00:00.000 on the
/// following day. Closing is always on the day after the reference day.
pub fn closing_time(day: NaiveDate) -> NaiveDateTime {
    let next = day.succ_opt().unwrap_or(day);
    next.and_time(NaiveTime::from_hms_opt(CLOSING_HOUR, 0, 0).unwrap_or(NaiveTime::MIN))
}

/// Round to the nearest quarter-hour, ties rounding up. Seconds and
/// sub-second precision are zeroed.
pub fn round_to_nearest_15(t: NaiveDateTime) -> NaiveDateTime {
    let base = t.date().and_time(NaiveTime::MIN);
    let since_midnight = i64::from(t.num_seconds_from_midnight());
    let rounded = (since_midnight + QUARTER_SECS / 2) / QUARTER_SECS * QUARTER_SECS;
    base + Duration::seconds(rounded)
}

/// Snap a time onto the quarter-hour grid.
///
/// Minutes already in {0, 15, 30, 45} only get their seconds zeroed.
/// Off-grid minutes snap down when the remainder is below 8, up
/// otherwise.
pub fn enforce_quarter_grid(t: NaiveDateTime) -> NaiveDateTime {
    let minute = t.minute();
    let rem = minute % 15;
    let base = t
        .date()
        .and_time(NaiveTime::MIN)
        + Duration::hours(i64::from(t.hour()));
    let snapped = if rem == 0 {
        minute
    } else if rem < 8 {
        minute - rem
    } else {
        minute - rem + 15
    };
    base + Duration::minutes(i64::from(snapped))
}

/// Default window offered when the reservation screen opens.
///
/// Before today's opening the whole window [opening, closing) is offered.
/// Otherwise the start is the next quarter-hour strictly after `now`; the
/// end is always that day's closing time. A start past closing rolls the
/// slot to the next day's full window.
pub fn nearest_available_slot(now: NaiveDateTime) -> TimeSlot {
    let day = now.date();
    let opening = opening_time(day);
    let closing = closing_time(day);

    if now < opening {
        return TimeSlot {
            start: opening,
            end: closing,
        };
    }

    let base = day.and_time(NaiveTime::MIN);
    let since_midnight = i64::from(now.num_seconds_from_midnight());
    // Strictly after `now`: an on-grid instant advances to the next slot.
    let next = (since_midnight / QUARTER_SECS + 1) * QUARTER_SECS;
    let candidate = base + Duration::seconds(next);

    if candidate > closing {
        let tomorrow = day.succ_opt().unwrap_or(day);
        TimeSlot {
            start: opening_time(tomorrow),
            end: closing_time(tomorrow),
        }
    } else {
        TimeSlot {
            start: candidate,
            end: closing,
        }
    }
}

/// Resolve the business day a start time belongs to. Times before the
/// closing hour sit in the previous calendar day's window.
fn business_day(start: NaiveDateTime) -> NaiveDate {
    if start.hour() < CLOSING_HOUR || (start.hour() == CLOSING_HOUR && start.minute() == 0 && start.second() == 0)
    {
        start.date().pred_opt().unwrap_or(start.date())
    } else {
        start.date()
    }
}

/// Validate a full reservation range against the working-hours window.
///
/// Nothing is corrected silently; every violation comes back as a
/// [`TimeWindowError`] with a user-facing message.
pub fn validate_time_range(start: NaiveDateTime, end: NaiveDateTime) -> Result<(), TimeWindowError> {
    if end <= start {
        return Err(TimeWindowError::EndBeforeStart);
    }

    let day = business_day(start);
    if start < opening_time(day) || start > closing_time(day) {
        return Err(TimeWindowError::OutsideWorkingHours);
    }

    clamp_end_time(end, start).map(|_| ())
}

/// Check a candidate end time against a fixed start.
///
/// The end must leave at least [`MIN_RESERVATION_MINUTES`] after `start` and may
/// not pass the closing boundary of the start's business day. Violations
/// are reported, not corrected; callers on input paths that deliver
/// off-grid minutes snap via [`enforce_quarter_grid`] first and show a
/// notice.
pub fn clamp_end_time(
    candidate: NaiveDateTime,
    start: NaiveDateTime,
) -> Result<NaiveDateTime, TimeWindowError> {
    if candidate <= start {
        return Err(TimeWindowError::EndBeforeStart);
    }
    if candidate - start < Duration::minutes(MIN_RESERVATION_MINUTES) {
        return Err(TimeWindowError::TooShort);
    }
    if candidate > closing_time(business_day(start)) {
        return Err(TimeWindowError::EndsAfterClosing);
    }
    Ok(candidate)
}
