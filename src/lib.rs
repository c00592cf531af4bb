// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Four Pillars (八字) calendar engine
//!
//! This crate turns a birth moment into the year, month, day and hour pillars
//! of the Chinese sexagenary calendar, together with the facts derived from
//! them.
//!
//! # Core types
//!
//! - [`JulianDay`]: integer Julian Day Number, the common currency of every module.
//! - [`Stem`], [`Branch`], [`Pillar`]: the sexagenary cycle.
//! - [`LunarDate`]: a date of the 1900–2100 lunar calendar table.
//! - [`FourPillars`]: the pillars of one birth moment.
//! - [`ChartRequest`] / [`Chart`]: the request/response boundary for callers.
//!
//! # Modules
//!
//! | Module | Concern |
//! |--------|---------|
//! | [`julian`] | Gregorian ↔ Julian Day |
//! | [`sexagenary`] | stems, branches, elements, hidden stems, pillars |
//! | [`lunar`] | lunar ↔ Gregorian, leap months |
//! | [`solar_terms`] | node-term boundaries and month branches |
//! | [`true_solar`] | longitude correction and double hours |
//! | [`pillars`] | year/month/day/hour pillars under both year modes |
//! | [`ten_gods`] | relation of a stem to the day stem |
//! | [`luck`] | decade luck pillars |
//! | [`chart`] | requests, charts, export rows |
//! | [`fmt`] | Chinese display strings |
//!
//! # Year modes
//!
//! [`YearMode::Solar`] starts the year at 立春 and the months at the node
//! solar terms; [`YearMode::Lunar`] starts both at the lunar calendar's
//! month boundaries. The day and hour pillars do not depend on the mode.
//!
//! # Logging
//!
//! Diagnostics go through the [`log`] facade: chart computation and lunar
//! resolution at `debug`, solar-term segments and true-solar shifts at
//! `trace`. No logger is installed by the crate.

pub mod chart;
mod error;
pub mod fmt;
pub mod julian;
pub mod luck;
pub mod lunar;
pub mod pillars;
pub mod sexagenary;
pub mod solar_terms;
pub mod ten_gods;
pub mod true_solar;

// ── Re-exports ────────────────────────────────────────────────────────────

pub use chart::{
    compute_chart, Chart, ChartOptions, ChartRequest, DateInput, Density, ExportRecord,
    PillarDetail, SolarCorrection, TimeInput,
};
pub use error::{Error, Result};
pub use julian::JulianDay;
pub use luck::{luck_pillars, AgeRange, Gender, LuckPillar};
pub use lunar::{
    gregorian_to_lunar, julian_day_to_lunar, lunar_to_gregorian, lunar_to_julian_day, LunarDate,
    LunarYear,
};
pub use pillars::{FourPillars, YearMode};
pub use sexagenary::{Branch, Element, ElementTally, HiddenStems, Pillar, Polarity, Stem};
pub use solar_terms::{NodeTerm, SolarTermSet};
pub use ten_gods::TenGod;
