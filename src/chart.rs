// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! # Chart requests and results
//!
//! [`compute_chart`] takes a birth moment as a caller would collect it (a
//! Gregorian or lunar date, an optional clock time or double-hour, an
//! optional longitude and gender) and returns a [`Chart`]: the Four Pillars
//! plus everything derived from them.
//!
//! ## Resolution order
//!
//! 1. A lunar date is validated and converted to its Gregorian day.
//! 2. A clock time is validated, shifted to true solar time when
//!    [`ChartOptions::true_solar_time`] is set and a longitude is known, and
//!    mapped to its double-hour branch. A directly chosen branch is used
//!    as is.
//! 3. The pillars are computed under [`ChartOptions::year_mode`].
//! 4. Hidden stems, Ten Gods and the element tally are derived for every
//!    present pillar; the solar term, the correction applied and the luck
//!    pillars are added according to [`Density`].
//!
//! ## Example
//!
//! ```
//! use bazi::chart::{compute_chart, ChartRequest, DateInput, TimeInput};
//!
//! let request = ChartRequest::new(DateInput::Gregorian { year: 2000, month: 1, day: 1 })
//!     .with_time(TimeInput::Clock { hour: 12, minute: 0 });
//! let chart = compute_chart(&request).unwrap();
//! assert_eq!(chart.pillars_text(), "己卯 甲子 庚辰 壬午");
//! ```

use crate::error::{Error, Result};
use crate::fmt::birth_date_label;
use crate::julian::JulianDay;
use crate::luck::{luck_pillars, Gender, LuckPillar};
use crate::lunar::LunarDate;
use crate::pillars::{solar_year, FourPillars, YearMode};
use crate::sexagenary::{Branch, ElementTally, HiddenStems, Pillar, Stem};
use crate::solar_terms::{month_branch_for_julian_day, NodeTerm};
use crate::ten_gods::TenGod;
use crate::true_solar::{
    apply_correction, check_longitude, clock_time, hour_to_branch, offset_minutes,
};
use chrono::{NaiveDate, NaiveTime};
use qtty::{Degrees, Minutes};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Text written in place of the hour pillar when the birth time is unknown.
pub const UNKNOWN_HOUR: &str = "未知";

// ═══════════════════════════════════════════════════════════════════════════
// Request
// ═══════════════════════════════════════════════════════════════════════════

/// Birth date as entered.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "lowercase"))]
pub enum DateInput {
    Gregorian {
        year: i32,
        month: u32,
        day: u32,
    },
    Lunar {
        year: i32,
        month: u8,
        day: u8,
        #[cfg_attr(feature = "serde", serde(default))]
        is_leap_month: bool,
    },
}

impl DateInput {
    /// Gregorian day of the input and, for lunar input, the validated lunar date.
    pub fn resolve(&self) -> Result<(NaiveDate, Option<LunarDate>)> {
        match *self {
            DateInput::Gregorian { year, month, day } => NaiveDate::from_ymd_opt(year, month, day)
                .map(|date| (date, None))
                .ok_or_else(|| {
                    Error::invalid(format!("{year}-{month:02}-{day:02} is not a Gregorian date"))
                }),
            DateInput::Lunar {
                year,
                month,
                day,
                is_leap_month,
            } => {
                let lunar = LunarDate::new(year, month, day, is_leap_month)?;
                let date = lunar.to_gregorian()?;
                log::debug!("lunar {lunar} resolved to {date}");
                Ok((date, Some(lunar)))
            }
        }
    }
}

/// Birth time as entered.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum TimeInput {
    /// No hour pillar is computed.
    #[default]
    Unknown,
    /// Civil clock time on the UTC+8 reference meridian.
    Clock { hour: u32, minute: u32 },
    /// Double-hour branch index chosen directly, 0 (子) through 11 (亥).
    Branch(u8),
}

/// How much derived detail a chart carries.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "lowercase"))]
pub enum Density {
    /// Pillars, hidden stems, Ten Gods and element tally.
    #[default]
    Basic = 1,
    /// Adds the month's solar term and the true-solar correction.
    Advanced = 2,
    /// Adds the luck pillars when a gender is given.
    Deep = 3,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct ChartOptions {
    pub year_mode: YearMode,
    /// Shift clock times by longitude before choosing the hour branch.
    pub true_solar_time: bool,
    pub density: Density,
}

/// Everything needed to compute one chart.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChartRequest {
    pub date: DateInput,
    #[cfg_attr(feature = "serde", serde(default))]
    pub time: TimeInput,
    /// Degrees east of Greenwich, negative west.
    #[cfg_attr(feature = "serde", serde(default))]
    pub longitude: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub gender: Option<Gender>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub options: ChartOptions,
}

impl ChartRequest {
    /// Request for a date with unknown time and default options.
    pub fn new(date: DateInput) -> Self {
        Self {
            date,
            time: TimeInput::Unknown,
            longitude: None,
            gender: None,
            options: ChartOptions::default(),
        }
    }

    pub fn with_time(mut self, time: TimeInput) -> Self {
        self.time = time;
        self
    }

    pub fn with_longitude(mut self, longitude: f64) -> Self {
        self.longitude = Some(longitude);
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn with_options(mut self, options: ChartOptions) -> Self {
        self.options = options;
        self
    }

    fn checked_longitude(&self) -> Result<Option<Degrees>> {
        self.longitude
            .map(|lon| check_longitude(Degrees::new(lon)))
            .transpose()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Result
// ═══════════════════════════════════════════════════════════════════════════

/// A pillar with its hidden stems and their relations to the day stem.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PillarDetail {
    pub pillar: Pillar,
    /// Relation of the pillar's stem to the day stem.
    pub ten_god: TenGod,
    pub hidden: HiddenStems,
    pub hidden_ten_gods: Vec<(Stem, TenGod)>,
}

impl PillarDetail {
    fn new(pillar: Pillar, day_master: Stem) -> Self {
        let hidden = pillar.branch().hidden_stems();
        Self {
            pillar,
            ten_god: TenGod::classify(day_master, pillar.stem()),
            hidden,
            hidden_ten_gods: TenGod::of_hidden(day_master, &hidden),
        }
    }
}

/// A true-solar-time shift that was applied to the birth time.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolarCorrection {
    pub longitude: Degrees,
    pub offset: Minutes,
    pub clock: NaiveTime,
    pub corrected: NaiveTime,
}

/// A computed birth chart.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Chart {
    pub pillars: FourPillars,
    pub date: NaiveDate,
    pub year: PillarDetail,
    pub month: PillarDetail,
    pub day: PillarDetail,
    pub hour: Option<PillarDetail>,
    pub elements: ElementTally,
    /// Node term opening the birth month; [`Density::Advanced`] and up.
    pub solar_term: Option<NodeTerm>,
    /// Applied true-solar correction; [`Density::Advanced`] and up.
    pub correction: Option<SolarCorrection>,
    /// [`Density::Deep`] with a gender.
    pub luck: Option<Vec<LuckPillar>>,
}

impl Chart {
    pub fn julian_day(&self) -> JulianDay {
        self.pillars.julian_day
    }

    pub fn lunar(&self) -> Option<LunarDate> {
        self.pillars.lunar
    }

    pub fn day_master(&self) -> Stem {
        self.pillars.day_master()
    }

    /// Zodiac animal of the year pillar.
    pub fn zodiac(&self) -> &'static str {
        self.pillars.year.branch().zodiac()
    }

    /// Details of the present pillars in year, month, day, hour order.
    pub fn details(&self) -> impl Iterator<Item = &PillarDetail> {
        [Some(&self.year), Some(&self.month), Some(&self.day), self.hour.as_ref()]
            .into_iter()
            .flatten()
    }

    /// The four pillar names separated by spaces, e.g. `"庚辰 戊寅 庚辰 未知"`.
    pub fn pillars_text(&self) -> String {
        let hour = self
            .pillars
            .hour
            .map_or_else(|| UNKNOWN_HOUR.to_owned(), |p| p.to_string());
        format!(
            "{} {} {} {hour}",
            self.pillars.year, self.pillars.month, self.pillars.day
        )
    }
}

/// Computes the chart for a request.
pub fn compute_chart(request: &ChartRequest) -> Result<Chart> {
    let (date, lunar) = request.date.resolve()?;
    let longitude = request.checked_longitude()?;
    let options = request.options;

    let mut correction = None;
    let hour = match request.time {
        TimeInput::Unknown => None,
        TimeInput::Branch(index) => Some(Branch::try_from(index)?),
        TimeInput::Clock { hour, minute } => {
            let clock = clock_time(hour, minute)?;
            let time = match longitude {
                Some(lon) if options.true_solar_time => {
                    let corrected = apply_correction(clock, lon)?;
                    correction = Some(SolarCorrection {
                        longitude: lon,
                        offset: offset_minutes(lon),
                        clock,
                        corrected,
                    });
                    corrected
                }
                _ => clock,
            };
            Some(hour_to_branch(time))
        }
    };

    let pillars = FourPillars::compute(date, hour, options.year_mode, lunar)?;
    let day_master = pillars.day_master();
    let advanced = options.density >= Density::Advanced;

    let solar_term = advanced.then(|| {
        let jd = pillars.julian_day;
        month_branch_for_julian_day(jd, solar_year(jd)).1
    });
    let luck = match request.gender {
        Some(gender) if options.density >= Density::Deep => {
            Some(luck_pillars(pillars.year, pillars.month, gender))
        }
        _ => None,
    };

    let chart = Chart {
        date,
        year: PillarDetail::new(pillars.year, day_master),
        month: PillarDetail::new(pillars.month, day_master),
        day: PillarDetail::new(pillars.day, day_master),
        hour: pillars.hour.map(|p| PillarDetail::new(p, day_master)),
        elements: pillars.elements(),
        solar_term,
        correction: correction.filter(|_| advanced),
        luck,
        pillars,
    };
    log::debug!(
        "chart for {}: {} ({:?})",
        birth_date_label(&request.date),
        chart.pillars_text(),
        options.density
    );
    Ok(chart)
}

/// One row for the spreadsheet export collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExportRecord {
    pub name: String,
    pub birth_date: String,
    pub pillars: String,
    pub address: String,
}

impl ExportRecord {
    /// Column headers in [`ExportRecord::fields`] order.
    pub const HEADERS: [&'static str; 4] = ["姓名", "出生日期", "八字信息", "地址"];

    pub fn new(
        name: impl Into<String>,
        request: &ChartRequest,
        chart: &Chart,
        address: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            birth_date: birth_date_label(&request.date),
            pillars: chart.pillars_text(),
            address: address.into(),
        }
    }

    pub fn fields(&self) -> [&str; 4] {
        [&self.name, &self.birth_date, &self.pillars, &self.address]
    }
}
