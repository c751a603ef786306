//! Weekly cadence handling for recurring recordings.
//!
//! A cadence is the subset of weekdays on which a recurring recording takes
//! place, stored as a seven-bit mask (Monday = bit 0 .. Sunday = bit 6).
//! Source files encode it as a compact string of day letters; a single
//! unrecognized letter poisons the whole cadence to the empty mask so that
//! validity checking reports it instead of silently dropping a day.

use chrono::{DateTime, Datelike, Days, Local, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// Subset of weekdays, Monday through Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Weekdays(u8);

const FULL_WEEK: u8 = 0x7f;

/// All seven days in stable Monday-to-Sunday order.
const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

impl Weekdays {
    /// The empty cadence. Never valid for a recurring recording.
    pub const EMPTY: Weekdays = Weekdays(0);

    /// Every day of the week.
    pub const EVERY_DAY: Weekdays = Weekdays(FULL_WEEK);

    /// Decode a cadence string of single-letter day codes
    /// (M, T, W, R, F, S, U for Monday through Sunday, case-insensitive).
    ///
    /// Any unrecognized character returns [`Weekdays::EMPTY`] so the entry
    /// fails validation with `BadCadence` rather than losing one day.
    pub fn from_day_codes(codes: &str) -> Weekdays {
        let mut result = Weekdays::EMPTY;
        for ch in codes.trim().to_uppercase().chars() {
            let day = match ch {
                'M' => Weekday::Mon,
                'T' => Weekday::Tue,
                'W' => Weekday::Wed,
                'R' => Weekday::Thu,
                'F' => Weekday::Fri,
                'S' => Weekday::Sat,
                'U' => Weekday::Sun,
                _ => return Weekdays::EMPTY,
            };
            result.insert(day);
        }
        result
    }

    pub fn insert(&mut self, day: Weekday) {
        self.0 |= 1 << day.num_days_from_monday();
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & (1 << day.num_days_from_monday()) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// A cadence is well-formed when at least one day is set and no bit
    /// beyond Sunday is set.
    pub fn is_valid(&self) -> bool {
        !self.is_empty() && self.0 <= FULL_WEEK
    }

    /// The set days in stable Monday-to-Sunday order, as the remote
    /// scheduling service expects them.
    pub fn to_weekday_array(&self) -> Vec<Weekday> {
        WEEK.iter().copied().filter(|d| self.contains(*d)).collect()
    }
}

/// The cadence mask handed to [`align_to_cadence`] was empty or out of range.
///
/// This is a programming-contract violation, not a data-validity outcome:
/// an unguarded empty mask would make the alignment loop spin forever.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("cadence mask is empty or out of range")]
pub struct InvalidCadence;

/// Advance `start` one day at a time until its local weekday is on the
/// cadence. Returns `start` unchanged when it already is.
pub fn align_to_cadence(
    start: DateTime<Utc>,
    cadence: Weekdays,
) -> Result<DateTime<Utc>, InvalidCadence> {
    if !cadence.is_valid() {
        return Err(InvalidCadence);
    }
    let mut result = start;
    while !cadence.contains(result.with_timezone(&Local).weekday()) {
        result = result
            .checked_add_days(Days::new(1))
            .ok_or(InvalidCadence)?;
    }
    Ok(result)
}
