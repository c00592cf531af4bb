// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Four Pillars (四柱) of a birth moment.
//!
//! The day pillar is pure Julian Day arithmetic. The year and month pillars
//! depend on where a year and its months begin, which is reckoned one of two
//! ways:
//!
//! | [`YearMode`] | Year starts at | Month branch from |
//! |--------------|----------------|-------------------|
//! | `Solar` | 立春 (Start of Spring) | node solar terms |
//! | `Lunar` | lunar New Year (正月初一) | lunar month number |
//!
//! [`Reckoning`] carries the data each mode needs, and the year and month
//! pillars are computed from it in one place.

use crate::error::{Error, Result};
use crate::julian::JulianDay;
use crate::lunar::{julian_day_to_lunar, LunarDate};
use crate::sexagenary::{Branch, ElementTally, Pillar, Stem};
use crate::solar_terms::{month_branch_for_julian_day, start_of_spring};
use chrono::NaiveDate;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Cycle index of the day pillar on 2000-01-01.
const J2000_DAY_INDEX: i64 = 16;

/// First hour stem (for 子) by `day stem mod 5`: 甲己→甲, 乙庚→丙, 丙辛→戊, 丁壬→庚, 戊癸→壬.
const RAT_HOUR_STEMS: [i64; 5] = [0, 2, 4, 6, 8];

/// Which boundary convention sets the year and the month.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "lowercase"))]
pub enum YearMode {
    /// Year from 立春, months from the node solar terms.
    #[default]
    Solar,
    /// Year from the lunar New Year, months from the lunar month number.
    Lunar,
}

/// Year/month boundary data for one computation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Reckoning {
    /// Solar-term boundaries; `year` is the solar year containing `julian_day`.
    Solar { julian_day: JulianDay, year: i32 },
    /// Lunar calendar boundaries.
    Lunar(LunarDate),
}

impl Reckoning {
    /// Solar reckoning of a day, resolving its solar year.
    pub fn solar(julian_day: JulianDay) -> Self {
        Reckoning::Solar {
            julian_day,
            year: solar_year(julian_day),
        }
    }

    /// The year whose stem drives both the year and the month stem.
    pub fn year(&self) -> i32 {
        match self {
            Reckoning::Solar { year, .. } => *year,
            Reckoning::Lunar(date) => date.year,
        }
    }

    pub fn year_pillar(&self) -> Pillar {
        Pillar::new(i64::from(self.year()) - 4)
    }

    pub fn month_pillar(&self) -> Pillar {
        let branch = match self {
            Reckoning::Solar { julian_day, year } => month_branch_for_julian_day(*julian_day, *year).0,
            Reckoning::Lunar(date) => Branch::new(i64::from(date.month) + 1),
        };
        let year_stem = Stem::of_year(self.year());
        let stem = Stem::new(i64::from(year_stem.index()) * 2 + i64::from(branch.index()));
        pair(stem, branch)
    }
}

/// Solar year of a day: the Gregorian year, moved back before that year's
/// 立春 and forward on or after the next one.
pub fn solar_year(jd: JulianDay) -> i32 {
    let (year, _, _) = jd.to_gregorian();
    if jd < start_of_spring(year) {
        year - 1
    } else if jd >= start_of_spring(year + 1) {
        year + 1
    } else {
        year
    }
}

/// Day pillar of a Julian Day; repeats every 60 days.
pub fn day_pillar(jd: JulianDay) -> Pillar {
    Pillar::new(J2000_DAY_INDEX + (jd - JulianDay::J2000).rem_euclid(Pillar::CYCLE))
}

/// Hour pillar from the day stem and the double-hour branch (五鼠遁).
pub fn hour_pillar(day_stem: Stem, hour: Branch) -> Pillar {
    let start = RAT_HOUR_STEMS[usize::from(day_stem.index() % 5)];
    let stem = Stem::new(start + i64::from(hour.index()));
    pair(stem, hour)
}

/// Pillar of a stem and branch known to share parity.
fn pair(stem: Stem, branch: Branch) -> Pillar {
    debug_assert_eq!(stem.index() % 2, branch.index() % 2);
    Pillar::new(i64::from(stem.index()) * 6 - i64::from(branch.index()) * 5)
}

/// The computed chart pillars for one birth moment.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FourPillars {
    pub year: Pillar,
    pub month: Pillar,
    pub day: Pillar,
    /// `None` when the birth time is unknown.
    pub hour: Option<Pillar>,
    pub julian_day: JulianDay,
    /// `None` for a solar-mode date outside the 1900–2100 lunar table.
    pub lunar: Option<LunarDate>,
    pub mode: YearMode,
}

impl FourPillars {
    /// Computes the pillars of a Gregorian date.
    ///
    /// `lunar` is the lunar date the caller started from, if any; otherwise
    /// it is derived from `date`. Lunar mode needs it, so there a date
    /// outside the lunar table fails with [`Error::OutOfRange`]. A supplied
    /// lunar date that is not the same day as `date` is rejected.
    pub fn compute(
        date: NaiveDate,
        hour: Option<Branch>,
        mode: YearMode,
        lunar: Option<LunarDate>,
    ) -> Result<Self> {
        let julian_day = JulianDay::from_date(date);

        let lunar = match lunar {
            Some(given) => {
                if given.to_julian_day()? != julian_day {
                    return Err(Error::invalid(format!(
                        "lunar date {given} is not the same day as {date}"
                    )));
                }
                Some(given)
            }
            None => match mode {
                YearMode::Lunar => Some(julian_day_to_lunar(julian_day)?),
                YearMode::Solar => julian_day_to_lunar(julian_day).ok(),
            },
        };

        let reckoning = match (mode, lunar) {
            (YearMode::Lunar, Some(l)) => Reckoning::Lunar(l),
            (YearMode::Lunar, None) => return Err(Error::out_of_range("julian day", julian_day.value())),
            (YearMode::Solar, _) => Reckoning::solar(julian_day),
        };

        let day = day_pillar(julian_day);
        let pillars = Self {
            year: reckoning.year_pillar(),
            month: reckoning.month_pillar(),
            day,
            hour: hour.map(|h| hour_pillar(day.stem(), h)),
            julian_day,
            lunar,
            mode,
        };
        log::debug!(
            "{date} ({julian_day}, {mode:?}): {} {} {} {}",
            pillars.year,
            pillars.month,
            pillars.day,
            pillars.hour.map_or_else(|| "--".to_owned(), |h| h.to_string()),
        );
        Ok(pillars)
    }

    /// The day stem (日主) every Ten-Gods label is relative to.
    pub fn day_master(&self) -> Stem {
        self.day.stem()
    }

    /// Year, month, day and, when known, hour pillars in that order.
    pub fn iter(&self) -> impl Iterator<Item = Pillar> {
        [Some(self.year), Some(self.month), Some(self.day), self.hour]
            .into_iter()
            .flatten()
    }

    /// Element counts over the stems and branches of the present pillars.
    pub fn elements(&self) -> ElementTally {
        let pillars: Vec<Pillar> = self.iter().collect();
        ElementTally::of_pillars(&pillars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn day_pillar_anchor() {
        let p = day_pillar(JulianDay::from_gregorian(2000, 1, 1));
        assert_eq!(p.index(), 16);
        assert_eq!(p.to_string(), "庚辰");
        assert_eq!(day_pillar(JulianDay::from_gregorian(2000, 1, 2)).index(), 17);
        assert_eq!(day_pillar(JulianDay::from_gregorian(1999, 12, 31)).index(), 15);
    }

    #[test]
    fn hour_stems_five_rats() {
        let zi = Branch::new(0);
        assert_eq!(hour_pillar(Stem::new(0), zi).to_string(), "甲子");
        assert_eq!(hour_pillar(Stem::new(5), zi).to_string(), "甲子");
        assert_eq!(hour_pillar(Stem::new(1), zi).to_string(), "丙子");
        assert_eq!(hour_pillar(Stem::new(4), zi).to_string(), "壬子");
        assert_eq!(hour_pillar(Stem::new(0), Branch::new(11)).to_string(), "乙亥");
    }

    #[test]
    fn solar_year_moves_at_start_of_spring() {
        assert_eq!(solar_year(JulianDay::from_gregorian(2000, 2, 3)), 1999);
        assert_eq!(solar_year(JulianDay::from_gregorian(2000, 2, 4)), 2000);
        assert_eq!(solar_year(JulianDay::from_gregorian(2000, 12, 31)), 2000);
    }

    #[test]
    fn solar_mode_year_and_month() {
        let p = FourPillars::compute(ymd(2000, 2, 4), None, YearMode::Solar, None).unwrap();
        assert_eq!(p.year.to_string(), "庚辰");
        // month stem = (6 * 2 + 2) mod 10 = 4
        assert_eq!(p.month.to_string(), "戊寅");

        let p = FourPillars::compute(ymd(2000, 2, 3), None, YearMode::Solar, None).unwrap();
        assert_eq!(p.year.to_string(), "己卯");
        // 丑 month of a 己 reference year: (5 * 2 + 1) mod 10 = 1
        assert_eq!(p.month.to_string(), "乙丑");
    }

    #[test]
    fn lunar_mode_uses_lunar_new_year() {
        // 2000-02-04 is still lunar 1999/12/29.
        let p = FourPillars::compute(ymd(2000, 2, 4), None, YearMode::Lunar, None).unwrap();
        assert_eq!(p.lunar, Some(LunarDate::new(1999, 12, 29, false).unwrap()));
        assert_eq!(p.year.to_string(), "己卯");
        // branch (12 + 1) mod 12 = 丑, stem (5 * 2 + 1) mod 10 = 乙
        assert_eq!(p.month.to_string(), "乙丑");

        let p = FourPillars::compute(ymd(2000, 2, 5), None, YearMode::Lunar, None).unwrap();
        assert_eq!(p.year.to_string(), "庚辰");
        assert_eq!(p.month.to_string(), "戊寅");
    }

    #[test]
    fn lunar_mode_leap_month_takes_its_month_number() {
        // 闰四月初一 2020 is 2020-05-23; it shares 巳 with the ordinary fourth month.
        let leap = LunarDate::new(2020, 4, 1, true).unwrap();
        let p = FourPillars::compute(ymd(2020, 5, 23), None, YearMode::Lunar, Some(leap)).unwrap();
        assert_eq!(p.lunar, Some(leap));
        assert_eq!(p.year.to_string(), "庚子");
        assert_eq!(p.month.branch().name(), "巳");
        // stem (6 * 2 + 5) mod 10 = 辛
        assert_eq!(p.month.to_string(), "辛巳");

        let derived = FourPillars::compute(ymd(2020, 5, 23), None, YearMode::Lunar, None).unwrap();
        assert_eq!(derived, p);

        let ordinary = FourPillars::compute(ymd(2020, 4, 23), None, YearMode::Lunar, None).unwrap();
        assert_eq!(ordinary.lunar, Some(LunarDate::new(2020, 4, 1, false).unwrap()));
        assert_eq!(ordinary.month, p.month);
    }

    #[test]
    fn unknown_hour_leaves_three_pillars() {
        let p = FourPillars::compute(ymd(2000, 1, 1), None, YearMode::Solar, None).unwrap();
        assert_eq!(p.hour, None);
        assert_eq!(p.iter().count(), 3);
        assert_eq!(p.elements().total(), 6);
    }

    #[test]
    fn hour_pillar_from_day_stem() {
        let p = FourPillars::compute(ymd(2000, 1, 1), Some(Branch::new(0)), YearMode::Solar, None)
            .unwrap();
        // 庚 day: 乙庚 start at 丙子
        assert_eq!(p.hour.map(|h| h.to_string()), Some("丙子".to_owned()));
        assert_eq!(p.elements().total(), 8);
        assert_eq!(p.day_master().name(), "庚");
    }

    #[test]
    fn lunar_mode_outside_table_fails() {
        let err = FourPillars::compute(ymd(1850, 6, 1), None, YearMode::Lunar, None).unwrap_err();
        assert!(err.is_out_of_range());
        let p = FourPillars::compute(ymd(1850, 6, 1), None, YearMode::Solar, None).unwrap();
        assert_eq!(p.lunar, None);
    }

    #[test]
    fn mismatched_lunar_input_is_rejected() {
        let lunar = LunarDate::new(2000, 1, 1, false).unwrap();
        assert!(FourPillars::compute(ymd(2000, 2, 5), None, YearMode::Lunar, Some(lunar)).is_ok());
        let err = FourPillars::compute(ymd(2000, 2, 6), None, YearMode::Lunar, Some(lunar));
        assert!(matches!(err, Err(Error::InvalidInput(_))));
    }

    proptest! {
        #[test]
        fn prop_day_pillar_period(n in 2_000_000i64..3_000_000) {
            let jd = JulianDay::new(n);
            prop_assert_eq!(day_pillar(jd), day_pillar(jd + 60));
            prop_assert_eq!(day_pillar(jd + 1), day_pillar(jd).step(1));
        }

        #[test]
        fn prop_pillars_keep_parity(n in 2_415_051i64..2_488_000, h in 0i64..12) {
            let date = JulianDay::new(n).to_date().unwrap();
            for mode in [YearMode::Solar, YearMode::Lunar] {
                let p = FourPillars::compute(date, Some(Branch::new(h)), mode, None).unwrap();
                for pillar in p.iter() {
                    prop_assert_eq!(pillar.stem().index() % 2, pillar.branch().index() % 2);
                }
            }
        }
    }
}
