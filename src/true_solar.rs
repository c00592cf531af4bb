// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! True solar time and the twelve double hours.
//!
//! Civil time in China is kept on the 120°E meridian (UTC+8). Local solar
//! time runs 4 minutes ahead of it per degree east and 4 minutes behind per
//! degree west; no equation-of-time term is applied.

use crate::error::{Error, Result};
use crate::sexagenary::Branch;
use chrono::{Duration, NaiveTime, Timelike};
use qtty::{Degrees, Minutes};

/// Meridian of the UTC+8 reference clock.
pub const REFERENCE_MERIDIAN: Degrees = Degrees::new(120.0);

const MINUTES_PER_DEGREE: f64 = 4.0;

/// Offset of local solar time from UTC+8 clock time, positive east.
///
/// ```
/// use bazi::true_solar::offset_minutes;
/// use qtty::{Degrees, Minutes};
///
/// assert_eq!(offset_minutes(Degrees::new(135.0)), Minutes::new(60.0));
/// ```
pub fn offset_minutes(longitude: Degrees) -> Minutes {
    Minutes::new((longitude - REFERENCE_MERIDIAN).value() * MINUTES_PER_DEGREE)
}

/// A longitude, if it is finite and within −180°..=180°.
pub fn check_longitude(longitude: Degrees) -> Result<Degrees> {
    let value = longitude.value();
    if value.is_finite() && (-180.0..=180.0).contains(&value) {
        Ok(longitude)
    } else {
        Err(Error::invalid(format!("longitude {value} not in -180..=180")))
    }
}

/// Shifts a clock time to true solar time at `longitude`.
///
/// The result wraps around midnight and is truncated to the minute. A
/// longitude rejected by [`check_longitude`] is [`Error::InvalidInput`].
pub fn apply_correction(time: NaiveTime, longitude: Degrees) -> Result<NaiveTime> {
    let offset = offset_minutes(check_longitude(longitude)?);
    // |offset| <= 1200 min once the longitude is checked.
    let shifted = time + Duration::seconds((offset.value() * 60.0).round() as i64);
    let corrected = shifted.with_second(0).unwrap_or(shifted);
    log::trace!("true solar time at {longitude}: {time} -> {corrected} ({offset})");
    Ok(corrected)
}

/// Double-hour branch of a time of day.
///
/// 子 spans 23:00–00:59, 丑 01:00–02:59, and so on in two-hour steps.
pub fn hour_to_branch(time: NaiveTime) -> Branch {
    let minutes = time.hour() * 60 + time.minute();
    Branch::new(i64::from((minutes + 60) / 120))
}

/// Validated clock time from an hour (0–23) and minute (0–59).
pub fn clock_time(hour: u32, minute: u32) -> Result<NaiveTime> {
    NaiveTime::from_hms_opt(hour, minute, 0)
        .ok_or_else(|| Error::invalid(format!("clock time {hour}:{minute:02} is not valid")))
}
