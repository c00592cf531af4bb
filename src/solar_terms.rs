// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! # Node solar terms (节) and month branches
//!
//! The twelve node terms split the solar year into the twelve months of the
//! Four Pillars calendar: the month of 寅 runs from 立春 to 惊蛰, the month of
//! 卯 from 惊蛰 to 清明, and so on around to 丑 (小寒 → 立春).
//!
//! ## Model
//!
//! Each term is pinned to its Gregorian date in 2000 and shifted by a linear
//! drift of 0.2422 days per year:
//!
//! ```text
//! term(year, t) = JD(year, anchor_month[t], anchor_day[t]) + round((year − 2000) × 0.2422)
//! ```
//!
//! This is not an apparent-sun computation. Boundaries can be a day off near
//! a transition, and callers that need exact term instants should use an
//! ephemeris instead. Changing the model changes month and year pillars near
//! boundaries, so the formula is part of the engine's observable behaviour.

use crate::julian::JulianDay;
use crate::sexagenary::Branch;
use qtty::Days;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Reference year of the anchor table.
const ANCHOR_YEAR: i32 = 2000;

/// Linear per-year drift applied to the anchors.
const DRIFT_PER_YEAR: Days = Days::new(0.2422);

/// `(month, day)` of each node term in 2000, in [`NodeTerm`] order.
#[rustfmt::skip]
const ANCHORS: [(u32, u32); 12] = [
    (2, 4), (3, 5), (4, 5), (5, 5), (6, 6), (7, 7),
    (8, 7), (9, 7), (10, 8), (11, 7), (12, 7), (1, 6),
];

#[rustfmt::skip]
const NAMES: [&str; 12] = [
    "立春", "惊蛰", "清明", "立夏", "芒种", "小暑",
    "立秋", "白露", "寒露", "立冬", "大雪", "小寒",
];

/// The twelve node terms, numbered from Start of Spring.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NodeTerm {
    /// 立春
    StartOfSpring,
    /// 惊蛰
    AwakeningOfInsects,
    /// 清明
    PureBrightness,
    /// 立夏
    StartOfSummer,
    /// 芒种
    GrainInEar,
    /// 小暑
    MinorHeat,
    /// 立秋
    StartOfAutumn,
    /// 白露
    WhiteDew,
    /// 寒露
    ColdDew,
    /// 立冬
    StartOfWinter,
    /// 大雪
    MajorSnow,
    /// 小寒
    MinorCold,
}

impl NodeTerm {
    pub const ALL: [NodeTerm; 12] = [
        NodeTerm::StartOfSpring,
        NodeTerm::AwakeningOfInsects,
        NodeTerm::PureBrightness,
        NodeTerm::StartOfSummer,
        NodeTerm::GrainInEar,
        NodeTerm::MinorHeat,
        NodeTerm::StartOfAutumn,
        NodeTerm::WhiteDew,
        NodeTerm::ColdDew,
        NodeTerm::StartOfWinter,
        NodeTerm::MajorSnow,
        NodeTerm::MinorCold,
    ];

    /// Term index, 0 (立春) through 11 (小寒).
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Term with the given index, wrapped modulo 12.
    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index % 12]
    }

    pub const fn name(self) -> &'static str {
        NAMES[self.index()]
    }

    /// Month branch of the segment this term opens: 立春 → 寅 … 小寒 → 丑.
    pub const fn month_branch(self) -> Branch {
        Branch::new(self.index() as i64 + 2)
    }

    /// Approximate Julian Day of this term in `year`.
    pub fn julian_day(self, year: i32) -> JulianDay {
        term_julian_day(year, self)
    }
}

impl fmt::Display for NodeTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Approximate Julian Day of `term` in `year`.
pub fn term_julian_day(year: i32, term: NodeTerm) -> JulianDay {
    let (month, day) = ANCHORS[term.index()];
    let drift = (DRIFT_PER_YEAR * f64::from(year - ANCHOR_YEAR)).value().round() as i64;
    JulianDay::from_gregorian(year, month, day) + drift
}

/// Julian Day of 立春 in `year`, the solar-mode year boundary.
pub fn start_of_spring(year: i32) -> JulianDay {
    term_julian_day(year, NodeTerm::StartOfSpring)
}

/// The twelve node-term boundaries of one year, sorted ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolarTermSet {
    year: i32,
    boundaries: [(JulianDay, NodeTerm); 12],
}

impl SolarTermSet {
    pub fn for_year(year: i32) -> Self {
        let mut boundaries = NodeTerm::ALL.map(|t| (t.julian_day(year), t));
        boundaries.sort_unstable();
        Self { year, boundaries }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// `(julian_day, term)` pairs in ascending order.
    pub fn boundaries(&self) -> &[(JulianDay, NodeTerm)] {
        &self.boundaries
    }

    /// Latest boundary of this set at or before `jd`, if any.
    fn last_at_or_before(&self, jd: JulianDay) -> Option<(JulianDay, NodeTerm)> {
        let n = self.boundaries.partition_point(|(b, _)| *b <= jd);
        n.checked_sub(1).map(|i| self.boundaries[i])
    }
}

/// Month branch of `jd` and the node term that opened its month.
///
/// `year` is the solar year whose boundaries anchor the lookup. A day
/// before that year's first term falls into the segment opened by the
/// previous year's last term, and a day past `year` is resolved against the
/// following year's boundaries, so a reference year that trails the
/// calendar year near 立春 still yields the right segment.
pub fn month_branch_for_julian_day(jd: JulianDay, year: i32) -> (Branch, NodeTerm) {
    let (calendar_year, _, _) = jd.to_gregorian();
    let first = year.min(calendar_year) - 1;
    let last = year.max(calendar_year) + 1;

    let term = (first..=last)
        .rev()
        .find_map(|y| SolarTermSet::for_year(y).last_at_or_before(jd))
        .map(|(_, term)| term)
        // Unreachable: `first` lies a full year before `jd`.
        .unwrap_or(NodeTerm::MajorSnow);

    log::trace!("{jd} (ref year {year}) falls after {term}");
    (term.month_branch(), term)
}
