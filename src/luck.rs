// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Luck pillars (大运).
//!
//! Ten decade pillars stepped one at a time from the month pillar: forward
//! for a male chart, backward otherwise. Every step covers exactly ten years
//! starting at age ten; no start-age offset from the distance to the next
//! node term is applied.

use crate::sexagenary::Pillar;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of luck pillars in a sequence.
pub const STEPS: u8 = 10;

/// Years covered by one luck pillar.
pub const YEARS_PER_STEP: u32 = 10;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "lowercase"))]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// `+1` (forward through the cycle) or `-1`.
    pub const fn direction(self) -> i64 {
        match self {
            Gender::Male => 1,
            Gender::Female => -1,
        }
    }
}

/// Half-open age range `[start, end)` in years.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AgeRange {
    pub start: u32,
    pub end: u32,
}

impl AgeRange {
    pub const fn contains(&self, age: u32) -> bool {
        self.start <= age && age < self.end
    }
}

impl fmt::Display for AgeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "约 {}-{} 岁", self.start, self.end)
    }
}

/// One decade of the luck sequence.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LuckPillar {
    /// 1 through 10.
    pub step: u8,
    pub pillar: Pillar,
    pub ages: AgeRange,
}

impl LuckPillar {
    /// Display hint for the decade, e.g. `"约 10-20 岁"`.
    pub fn age_label(&self) -> String {
        self.ages.to_string()
    }
}

impl fmt::Display for LuckPillar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "第{}步 {} {}", self.step, self.pillar, self.ages)
    }
}

/// The ten luck pillars of a chart.
///
/// The year pillar is not consulted yet: the direction depends on `gender`
/// alone.
pub fn luck_pillars(_year: Pillar, month: Pillar, gender: Gender) -> Vec<LuckPillar> {
    let direction = gender.direction();
    (1..=STEPS)
        .map(|step| {
            let start = u32::from(step) * YEARS_PER_STEP;
            LuckPillar {
                step,
                pillar: month.step(direction * i64::from(step)),
                ages: AgeRange {
                    start,
                    end: start + YEARS_PER_STEP,
                },
            }
        })
        .collect()
}
