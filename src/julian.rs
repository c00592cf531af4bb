// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Julian Day Number (`JulianDay`) and proleptic Gregorian conversions.
//!
//! A [`JulianDay`] is the integer, noon-referenced day count used by every
//! other module: day pillars, lunar-table offsets and solar-term boundaries
//! are all differences or comparisons between two `JulianDay` values.
//!
//! The conversion works on the proleptic Gregorian calendar for any signed
//! year (astronomical numbering, 1 BC is year `0`) and performs no range
//! validation; pair it with [`chrono::NaiveDate`] when the input has to be
//! checked for existence first.

use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::ops::{Add, Sub};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Days in a 400-year Gregorian cycle.
const DAYS_PER_ERA: i64 = 146_097;

/// Day number of 0000-03-01 counted from 1970-01-01, the origin of the
/// March-based year used internally.
const MARCH_0000_FROM_UNIX: i64 = 719_468;

/// An integer Julian Day Number.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct JulianDay(i64);

impl JulianDay {
    /// 2000-01-01, JDN 2 451 545.
    pub const J2000: Self = Self(2_451_545);

    /// 1970-01-01, JDN 2 440 588.
    pub const UNIX_EPOCH: Self = Self(2_440_588);

    #[inline]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// The raw day count.
    #[inline]
    pub const fn value(&self) -> i64 {
        self.0
    }

    /// Julian Day Number of a proleptic Gregorian date.
    ///
    /// Total over its inputs: `month` and `day` are not checked, so
    /// out-of-range values roll into neighbouring months.
    ///
    /// ```
    /// use bazi::JulianDay;
    ///
    /// assert_eq!(JulianDay::from_gregorian(2000, 1, 1).value(), 2_451_545);
    /// ```
    pub fn from_gregorian(year: i32, month: u32, day: u32) -> Self {
        let m = i64::from(month);
        let y = i64::from(year) - i64::from(m <= 2);
        let era = y.div_euclid(400);
        let yoe = y - era * 400;
        let mp = (m + 9) % 12;
        let doy = (153 * mp + 2) / 5 + i64::from(day) - 1;
        let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
        Self(era * DAYS_PER_ERA + doe - MARCH_0000_FROM_UNIX + Self::UNIX_EPOCH.0)
    }

    /// Proleptic Gregorian `(year, month, day)` of this day.
    ///
    /// Exact inverse of [`JulianDay::from_gregorian`] for every valid date.
    pub fn to_gregorian(&self) -> (i32, u32, u32) {
        let z = self.0 - Self::UNIX_EPOCH.0 + MARCH_0000_FROM_UNIX;
        let era = z.div_euclid(DAYS_PER_ERA);
        let doe = z - era * DAYS_PER_ERA;
        let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
        let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
        let mp = (5 * doy + 2) / 153;
        let day = doy - (153 * mp + 2) / 5 + 1;
        let month = if mp < 10 { mp + 3 } else { mp - 9 };
        let year = yoe + era * 400 + i64::from(month <= 2);
        (year as i32, month as u32, day as u32)
    }

    /// Julian Day of a `chrono` date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self::from_gregorian(date.year(), date.month(), date.day())
    }

    /// The `chrono` date of this day, or `None` outside chrono's range.
    pub fn to_date(&self) -> Option<NaiveDate> {
        let (y, m, d) = self.to_gregorian();
        NaiveDate::from_ymd_opt(y, m, d)
    }
}

impl fmt::Display for JulianDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JDN {}", self.0)
    }
}

impl Add<i64> for JulianDay {
    type Output = Self;
    #[inline]
    fn add(self, rhs: i64) -> Self::Output {
        Self(self.0 + rhs)
    }
}

impl Sub<i64> for JulianDay {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: i64) -> Self::Output {
        Self(self.0 - rhs)
    }
}

impl Sub for JulianDay {
    type Output = i64;
    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        self.0 - rhs.0
    }
}

impl From<NaiveDate> for JulianDay {
    fn from(date: NaiveDate) -> Self {
        Self::from_date(date)
    }
}

impl From<JulianDay> for i64 {
    fn from(jd: JulianDay) -> Self {
        jd.0
    }
}
