// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! # Lunar calendar 1900–2100
//!
//! Conversion between the traditional Chinese lunisolar calendar and
//! [`JulianDay`], backed by a packed per-year table covering lunar years
//! 1900 through 2100.
//!
//! ## Table layout
//!
//! Each entry of `LUNAR_YEARS` is a 20-bit word:
//!
//! | Bits | Meaning |
//! |------|---------|
//! | 0–3 | leap month number, `0` if the year has none |
//! | 4–15 | months 12 … 1 (bit 15 is month 1): `1` = 30 days, `0` = 29 |
//! | 16 | leap month length: `1` = 30 days, `0` = 29 |
//!
//! Day counting starts at the first day of lunar year 1900, Gregorian
//! 1900-01-31.
//!
//! ## Quick Example
//! ```rust
//! use bazi::lunar::{julian_day_to_lunar, LunarDate};
//! use bazi::JulianDay;
//!
//! let new_year = LunarDate::new(2000, 1, 1, false).unwrap();
//! let jd = new_year.to_julian_day().unwrap();
//! assert_eq!(jd, JulianDay::from_gregorian(2000, 2, 5));
//! assert_eq!(julian_day_to_lunar(jd).unwrap(), new_year);
//! ```

use crate::error::{Error, Result};
use crate::julian::JulianDay;
use chrono::NaiveDate;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// First lunar year in the table.
pub const MIN_YEAR: i32 = 1900;

/// Last lunar year in the table.
pub const MAX_YEAR: i32 = 2100;

/// Gregorian 1900-01-31, day 1 of month 1 of lunar year 1900.
pub const EPOCH: JulianDay = JulianDay::new(2_415_051);

/// Total number of tabulated years (1900–2100).
const YEARS: usize = 201;

#[rustfmt::skip]
const LUNAR_YEARS: [u32; YEARS] = [
    0x04bd8, 0x04ae0, 0x0a570, 0x054d5, 0x0d260, 0x0d950, 0x16554, 0x056a0, 0x09ad0, 0x055d2,
    0x04ae0, 0x0a5b6, 0x0a4d0, 0x0d250, 0x1d255, 0x0b540, 0x0d6a0, 0x0ada2, 0x095b0, 0x14977,
    0x04970, 0x0a4b0, 0x0b4b5, 0x06a50, 0x06d40, 0x1ab54, 0x02b60, 0x09570, 0x052f2, 0x04970,
    0x06566, 0x0d4a0, 0x0ea50, 0x06e95, 0x05ad0, 0x02b60, 0x186e3, 0x092e0, 0x1c8d7, 0x0c950,
    0x0d4a0, 0x1d8a6, 0x0b550, 0x056a0, 0x1a5b4, 0x025d0, 0x092d0, 0x0d2b2, 0x0a950, 0x0b557,
    0x06ca0, 0x0b550, 0x15355, 0x04da0, 0x0a5b0, 0x14573, 0x052b0, 0x0a9a8, 0x0e950, 0x06aa0,
    0x0aea6, 0x0ab50, 0x04b60, 0x0aae4, 0x0a570, 0x05260, 0x0f263, 0x0d950, 0x05b57, 0x056a0,
    0x096d0, 0x04dd5, 0x04ad0, 0x0a4d0, 0x0d4d4, 0x0d250, 0x0d558, 0x0b540, 0x0b6a0, 0x195a6,
    0x095b0, 0x049b0, 0x0a974, 0x0a4b0, 0x0b27a, 0x06a50, 0x06d40, 0x0af46, 0x0ab60, 0x09570,
    0x04af5, 0x04970, 0x064b0, 0x074a3, 0x0ea50, 0x06b58, 0x05ac0, 0x0ab60, 0x096d5, 0x092e0,
    0x0c960, 0x0d954, 0x0d4a0, 0x0da50, 0x07552, 0x056a0, 0x0abb7, 0x025d0, 0x092d0, 0x0cab5,
    0x0a950, 0x0b4a0, 0x0baa4, 0x0ad50, 0x055d9, 0x04ba0, 0x0a5b0, 0x15176, 0x052b0, 0x0a930,
    0x07954, 0x06aa0, 0x0ad50, 0x05b52, 0x04b60, 0x0a6e6, 0x0a4e0, 0x0d260, 0x0ea65, 0x0d530,
    0x05aa0, 0x076a3, 0x096d0, 0x04afb, 0x04ad0, 0x0a4d0, 0x1d0b6, 0x0d250, 0x0d520, 0x0dd45,
    0x0b5a0, 0x056d0, 0x055b2, 0x049b0, 0x0a577, 0x0a4b0, 0x0aa50, 0x1b255, 0x06d20, 0x0ada0,
    0x14b63, 0x09370, 0x049f8, 0x04970, 0x064b0, 0x168a6, 0x0ea50, 0x06b20, 0x1a6c4, 0x0aae0,
    0x0a2e0, 0x0d2e3, 0x0c960, 0x0d557, 0x0d4a0, 0x0da50, 0x05d55, 0x056a0, 0x0a6d0, 0x055d4,
    0x052d0, 0x0a9b8, 0x0a950, 0x0b4a0, 0x0b6a6, 0x0ad50, 0x055a0, 0x0aba4, 0x0a5b0, 0x052b0,
    0x0b273, 0x06930, 0x07337, 0x06aa0, 0x0ad50, 0x14b55, 0x04b60, 0x0a570, 0x054e4, 0x0d160,
    0x0e968, 0x0d520, 0x0daa0, 0x16aa6, 0x056d0, 0x04ae0, 0x0a9d4, 0x0a2d0, 0x0d150, 0x0f252,
    0x0d520,
];

// ═══════════════════════════════════════════════════════════════════════════
// LunarYear decoded table entry
// ═══════════════════════════════════════════════════════════════════════════

/// Month structure of one lunar year.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LunarYear {
    year: i32,
    leap_month: Option<u8>,
    leap_days: u32,
    month_days: [u32; 12],
}

impl LunarYear {
    /// Decoded table entry for `year`.
    ///
    /// Fails with [`Error::OutOfRange`] outside 1900–2100.
    pub fn get(year: i32) -> Result<Self> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(Error::out_of_range("lunar year", year));
        }
        let packed = LUNAR_YEARS[(year - MIN_YEAR) as usize];

        let mut month_days = [29; 12];
        for (i, days) in month_days.iter_mut().enumerate() {
            if packed & (0x8000 >> i) != 0 {
                *days = 30;
            }
        }
        let leap_month = match (packed & 0xf) as u8 {
            0 => None,
            m => Some(m),
        };
        let leap_days = match leap_month {
            Some(_) if packed & 0x1_0000 != 0 => 30,
            Some(_) => 29,
            None => 0,
        };

        Ok(Self {
            year,
            leap_month,
            leap_days,
            month_days,
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Number (1–12) of the month that is followed by a leap month.
    pub fn leap_month(&self) -> Option<u8> {
        self.leap_month
    }

    /// Length of the leap month, `0` when the year has none.
    pub fn leap_days(&self) -> u32 {
        self.leap_days
    }

    /// Length of a month; `leap` selects the leap month with that number.
    pub fn month_days(&self, month: u8, leap: bool) -> Result<u32> {
        if !(1..=12).contains(&month) {
            return Err(Error::invalid(format!("lunar month {month} not in 1..=12")));
        }
        if leap {
            if self.leap_month != Some(month) {
                return Err(Error::invalid(format!(
                    "lunar year {} has no leap month {month}",
                    self.year
                )));
            }
            return Ok(self.leap_days);
        }
        Ok(self.month_days[usize::from(month) - 1])
    }

    /// Total days in the year, 353–385.
    pub fn days(&self) -> u32 {
        self.month_days.iter().sum::<u32>() + self.leap_days
    }

    /// Days from the first of the year to the first of the given month.
    fn days_before(&self, month: u8, leap: bool) -> u32 {
        let idx = usize::from(month) - 1;
        let mut days: u32 = self.month_days[..idx].iter().sum();
        if matches!(self.leap_month, Some(l) if l < month) {
            days += self.leap_days;
        }
        if leap {
            days += self.month_days[idx];
        }
        days
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// LunarDate
// ═══════════════════════════════════════════════════════════════════════════

/// A validated date of the lunar calendar.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LunarDate {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub is_leap_month: bool,
}

impl LunarDate {
    /// Builds a lunar date, checking it against the year table.
    ///
    /// Fails with [`Error::OutOfRange`] for a year outside 1900–2100 and
    /// with [`Error::InvalidInput`] for a month outside 1–12, a leap flag on
    /// a month that is not leap that year, or a day past the month's end.
    pub fn new(year: i32, month: u8, day: u8, is_leap_month: bool) -> Result<Self> {
        let info = LunarYear::get(year)?;
        let len = info.month_days(month, is_leap_month)?;
        if day == 0 || u32::from(day) > len {
            return Err(Error::invalid(format!(
                "lunar day {day} not in 1..={len} for {year}/{month}{}",
                if is_leap_month { " (leap)" } else { "" }
            )));
        }
        Ok(Self {
            year,
            month,
            day,
            is_leap_month,
        })
    }

    /// Julian Day of this lunar date.
    pub fn to_julian_day(&self) -> Result<JulianDay> {
        lunar_to_julian_day(self.year, self.month, self.day, self.is_leap_month)
    }

    /// Lunar date of a Julian Day.
    pub fn from_julian_day(jd: JulianDay) -> Result<Self> {
        julian_day_to_lunar(jd)
    }

    /// Gregorian date of this lunar date.
    pub fn to_gregorian(&self) -> Result<NaiveDate> {
        let jd = self.to_julian_day()?;
        jd.to_date()
            .ok_or_else(|| Error::out_of_range("julian day", jd.value()))
    }

    /// Lunar date of a Gregorian date.
    pub fn from_gregorian(date: NaiveDate) -> Result<Self> {
        julian_day_to_lunar(JulianDay::from_date(date))
    }
}

impl fmt::Display for LunarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}年{}月{}日", self.year, self.month, self.day)?;
        if self.is_leap_month {
            f.write_str("（闰月）")?;
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Conversions
// ═══════════════════════════════════════════════════════════════════════════

/// Julian Day of a lunar date.
///
/// Validates the date as [`LunarDate::new`] does, then counts whole years
/// from 1900, whole months within the year (including a leap month that
/// precedes the target), and the day within the month.
pub fn lunar_to_julian_day(year: i32, month: u8, day: u8, is_leap_month: bool) -> Result<JulianDay> {
    let date = LunarDate::new(year, month, day, is_leap_month)?;
    let mut offset: i64 = 0;
    for y in MIN_YEAR..date.year {
        offset += i64::from(LunarYear::get(y)?.days());
    }
    let info = LunarYear::get(date.year)?;
    offset += i64::from(info.days_before(date.month, date.is_leap_month));
    offset += i64::from(date.day) - 1;
    Ok(EPOCH + offset)
}

/// Lunar date of a Julian Day.
///
/// Fails with [`Error::OutOfRange`] before 1900-01-31 or after the last day
/// of lunar year 2100.
pub fn julian_day_to_lunar(jd: JulianDay) -> Result<LunarDate> {
    let mut offset = jd - EPOCH;
    if offset < 0 {
        return Err(Error::out_of_range("julian day", jd.value()));
    }

    let mut year = MIN_YEAR;
    let info = loop {
        let info = LunarYear::get(year).map_err(|_| Error::out_of_range("julian day", jd.value()))?;
        let days = i64::from(info.days());
        if offset < days {
            break info;
        }
        offset -= days;
        year += 1;
    };

    for month in 1..=12u8 {
        let days = i64::from(info.month_days[usize::from(month) - 1]);
        if offset < days {
            return Ok(LunarDate {
                year,
                month,
                day: (offset + 1) as u8,
                is_leap_month: false,
            });
        }
        offset -= days;
        if info.leap_month == Some(month) {
            let days = i64::from(info.leap_days);
            if offset < days {
                return Ok(LunarDate {
                    year,
                    month,
                    day: (offset + 1) as u8,
                    is_leap_month: true,
                });
            }
            offset -= days;
        }
    }

    // `offset < info.days()` guarantees a month was found above.
    Err(Error::out_of_range("julian day", jd.value()))
}

/// Gregorian date of a lunar date.
pub fn lunar_to_gregorian(year: i32, month: u8, day: u8, is_leap_month: bool) -> Result<NaiveDate> {
    LunarDate::new(year, month, day, is_leap_month)?.to_gregorian()
}

/// Lunar date of a Gregorian date.
pub fn gregorian_to_lunar(date: NaiveDate) -> Result<LunarDate> {
    LunarDate::from_gregorian(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn table_covers_every_year() {
        assert_eq!(LUNAR_YEARS.len() as i32, MAX_YEAR - MIN_YEAR + 1);
        for y in MIN_YEAR..=MAX_YEAR {
            let days = LunarYear::get(y).unwrap().days();
            assert!((353..=385).contains(&days), "{y}: {days} days");
        }
    }

    #[test]
    fn year_out_of_table_fails() {
        assert!(LunarYear::get(1899).unwrap_err().is_out_of_range());
        assert!(LunarYear::get(2101).unwrap_err().is_out_of_range());
    }

    #[test]
    fn leap_month_decoding() {
        let y1900 = LunarYear::get(1900).unwrap();
        assert_eq!(y1900.leap_month(), Some(8));
        assert_eq!(y1900.leap_days(), 29);
        assert_eq!(LunarYear::get(2020).unwrap().leap_month(), Some(4));
        assert_eq!(LunarYear::get(2023).unwrap().leap_month(), Some(2));
        assert_eq!(LunarYear::get(2000).unwrap().leap_month(), None);
        assert_eq!(LunarYear::get(2000).unwrap().leap_days(), 0);
    }

    #[test]
    fn epoch_is_first_lunar_day() {
        assert_eq!(lunar_to_julian_day(1900, 1, 1, false).unwrap(), EPOCH);
        assert_eq!(lunar_to_gregorian(1900, 1, 1, false).unwrap(), ymd(1900, 1, 31));
    }

    #[test]
    fn known_new_years() {
        assert_eq!(lunar_to_gregorian(2000, 1, 1, false).unwrap(), ymd(2000, 2, 5));
        assert_eq!(lunar_to_gregorian(1984, 1, 1, false).unwrap(), ymd(1984, 2, 2));
        assert_eq!(lunar_to_gregorian(2024, 1, 1, false).unwrap(), ymd(2024, 2, 10));
    }

    #[test]
    fn leap_month_follows_ordinary_month() {
        // 2020 has a leap 4th month: 四月 starts 2020-04-23, 闰四月 2020-05-23.
        assert_eq!(lunar_to_gregorian(2020, 4, 1, false).unwrap(), ymd(2020, 4, 23));
        assert_eq!(lunar_to_gregorian(2020, 4, 1, true).unwrap(), ymd(2020, 5, 23));
        assert_eq!(lunar_to_gregorian(2020, 5, 1, false).unwrap(), ymd(2020, 6, 21));
    }

    #[test]
    fn gregorian_to_lunar_known_dates() {
        assert_eq!(
            gregorian_to_lunar(ymd(2000, 1, 1)).unwrap(),
            LunarDate::new(1999, 11, 25, false).unwrap()
        );
        assert_eq!(
            gregorian_to_lunar(ymd(2020, 6, 1)).unwrap(),
            LunarDate::new(2020, 4, 10, true).unwrap()
        );
    }

    #[test]
    fn invalid_dates_are_rejected() {
        assert!(matches!(LunarDate::new(2000, 13, 1, false), Err(Error::InvalidInput(_))));
        assert!(matches!(LunarDate::new(2000, 0, 1, false), Err(Error::InvalidInput(_))));
        assert!(matches!(LunarDate::new(2000, 1, 31, false), Err(Error::InvalidInput(_))));
        assert!(matches!(LunarDate::new(2000, 1, 0, false), Err(Error::InvalidInput(_))));
        assert!(matches!(LunarDate::new(2000, 4, 1, true), Err(Error::InvalidInput(_))));
        assert!(LunarDate::new(1899, 1, 1, false).unwrap_err().is_out_of_range());
        assert!(LunarDate::new(2101, 1, 1, false).unwrap_err().is_out_of_range());
    }

    #[test]
    fn julian_days_outside_table_fail() {
        assert!(julian_day_to_lunar(EPOCH - 1).unwrap_err().is_out_of_range());
        let last = LunarYear::get(MAX_YEAR).unwrap();
        let last_day = lunar_to_julian_day(MAX_YEAR, 12, last.month_days(12, false).unwrap() as u8, false)
            .unwrap();
        assert_eq!(julian_day_to_lunar(last_day).unwrap().year, MAX_YEAR);
        assert!(julian_day_to_lunar(last_day + 1).unwrap_err().is_out_of_range());
    }

    #[test]
    fn display() {
        let d = LunarDate::new(2020, 4, 1, true).unwrap();
        assert_eq!(d.to_string(), "2020年4月1日（闰月）");
    }

    proptest! {
        #[test]
        fn prop_lunar_roundtrip(year in MIN_YEAR..=MAX_YEAR, month in 1u8..=12, day in 1u8..=30, leap in any::<bool>()) {
            if let Ok(date) = LunarDate::new(year, month, day, leap) {
                let jd = date.to_julian_day().unwrap();
                prop_assert_eq!(julian_day_to_lunar(jd).unwrap(), date);
            }
        }

        #[test]
        fn prop_consecutive_days_are_consecutive(offset in 0i64..73_000) {
            let a = julian_day_to_lunar(EPOCH + offset).unwrap();
            let b = julian_day_to_lunar(EPOCH + offset + 1).unwrap();
            prop_assert!(b.day == a.day + 1 || b.day == 1);
        }
    }
}
