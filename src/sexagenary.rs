// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Stems, branches and the sexagenary cycle.
//!
//! | Type | Range | Identity |
//! |------|-------|----------|
//! | [`Stem`] | 0–9 | 甲 乙 丙 丁 戊 己 庚 辛 壬 癸 |
//! | [`Branch`] | 0–11 | 子 丑 寅 卯 辰 巳 午 未 申 酉 戌 亥 |
//! | [`Pillar`] | 0–59 | cycle index; stem = i mod 10, branch = i mod 12 |
//!
//! Every constructor normalises its argument into range, so a value of these
//! types is always a valid table index. Where a raw integer comes from the
//! outside and wrapping would hide a mistake (an hour branch of `12`), use
//! the `TryFrom<u8>` impls, which reject out-of-range input instead.

use crate::error::{Error, Result};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[rustfmt::skip]
const STEM_NAMES: [&str; 10] = ["甲", "乙", "丙", "丁", "戊", "己", "庚", "辛", "壬", "癸"];

#[rustfmt::skip]
const BRANCH_NAMES: [&str; 12] = [
    "子", "丑", "寅", "卯", "辰", "巳", "午", "未", "申", "酉", "戌", "亥",
];

#[rustfmt::skip]
const ZODIAC_NAMES: [&str; 12] = [
    "鼠", "牛", "虎", "兔", "龙", "蛇", "马", "羊", "猴", "鸡", "狗", "猪",
];

use Element::*;

#[rustfmt::skip]
const BRANCH_ELEMENTS: [Element; 12] = [
    Water, Earth, Wood, Wood, Earth, Fire, Fire, Earth, Metal, Metal, Earth, Water,
];

/// Hidden stems per branch: primary, secondary, residual.
#[rustfmt::skip]
const HIDDEN_STEMS: [(u8, Option<u8>, Option<u8>); 12] = [
    (9, None,    None),    // 子 癸
    (5, Some(9), Some(7)), // 丑 己癸辛
    (0, Some(2), Some(4)), // 寅 甲丙戊
    (1, None,    None),    // 卯 乙
    (4, Some(1), Some(9)), // 辰 戊乙癸
    (2, Some(4), Some(6)), // 巳 丙戊庚
    (3, None,    None),    // 午 丁
    (5, Some(3), Some(1)), // 未 己丁乙
    (6, Some(4), Some(8)), // 申 庚戊壬
    (7, None,    None),    // 酉 辛
    (4, Some(7), Some(3)), // 戌 戊辛丁
    (8, Some(0), Some(4)), // 亥 壬甲戊
];

// ═══════════════════════════════════════════════════════════════════════════
// Element / Polarity
// ═══════════════════════════════════════════════════════════════════════════

/// The five elements (五行), in generation order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Element {
    Wood,
    Fire,
    Earth,
    Metal,
    Water,
}

impl Element {
    pub const ALL: [Element; 5] = [Wood, Fire, Earth, Metal, Water];

    /// Position in generation order, 0–4.
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Wood => "木",
            Fire => "火",
            Earth => "土",
            Metal => "金",
            Water => "水",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Yang (even stem index) or yin (odd stem index).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Polarity {
    Yang,
    Yin,
}

// ═══════════════════════════════════════════════════════════════════════════
// Stem
// ═══════════════════════════════════════════════════════════════════════════

/// One of the ten heavenly stems (天干).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct Stem(u8);

impl Stem {
    /// Stem with the given index, wrapped modulo 10.
    #[inline]
    pub const fn new(index: i64) -> Self {
        Self(index.rem_euclid(10) as u8)
    }

    /// Stem of a year under the `(year - 4) mod 10` convention (4 CE = 甲).
    #[inline]
    pub const fn of_year(year: i32) -> Self {
        Self::new(year as i64 - 4)
    }

    #[inline]
    pub const fn index(self) -> u8 {
        self.0
    }

    pub const fn element(self) -> Element {
        Element::ALL[(self.0 / 2) as usize]
    }

    pub const fn polarity(self) -> Polarity {
        if self.0 % 2 == 0 {
            Polarity::Yang
        } else {
            Polarity::Yin
        }
    }

    pub const fn name(self) -> &'static str {
        STEM_NAMES[self.0 as usize]
    }

    pub fn all() -> impl Iterator<Item = Stem> {
        (0..10).map(Stem::new)
    }
}

impl TryFrom<u8> for Stem {
    type Error = Error;

    fn try_from(index: u8) -> Result<Self> {
        if index < 10 {
            Ok(Self(index))
        } else {
            Err(Error::invalid(format!("stem {index} not in 0..=9")))
        }
    }
}

impl fmt::Display for Stem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Branch
// ═══════════════════════════════════════════════════════════════════════════

/// One of the twelve earthly branches (地支).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct Branch(u8);

impl Branch {
    /// Branch with the given index, wrapped modulo 12.
    #[inline]
    pub const fn new(index: i64) -> Self {
        Self(index.rem_euclid(12) as u8)
    }

    /// Branch of a year under the `(year - 4) mod 12` convention (4 CE = 子).
    #[inline]
    pub const fn of_year(year: i32) -> Self {
        Self::new(year as i64 - 4)
    }

    #[inline]
    pub const fn index(self) -> u8 {
        self.0
    }

    pub const fn element(self) -> Element {
        BRANCH_ELEMENTS[self.0 as usize]
    }

    pub const fn name(self) -> &'static str {
        BRANCH_NAMES[self.0 as usize]
    }

    /// Zodiac animal (生肖) of the branch.
    pub const fn zodiac(self) -> &'static str {
        ZODIAC_NAMES[self.0 as usize]
    }

    /// The stems traditionally contained in this branch (藏干).
    pub const fn hidden_stems(self) -> HiddenStems {
        let (primary, secondary, residual) = HIDDEN_STEMS[self.0 as usize];
        HiddenStems {
            primary: Stem(primary),
            secondary: match secondary {
                Some(s) => Some(Stem(s)),
                None => None,
            },
            residual: match residual {
                Some(s) => Some(Stem(s)),
                None => None,
            },
        }
    }

    pub fn all() -> impl Iterator<Item = Branch> {
        (0..12).map(Branch::new)
    }
}

impl TryFrom<u8> for Branch {
    type Error = Error;

    fn try_from(index: u8) -> Result<Self> {
        if index < 12 {
            Ok(Self(index))
        } else {
            Err(Error::invalid(format!("branch {index} not in 0..=11")))
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Primary, secondary and residual hidden stems of a branch.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HiddenStems {
    pub primary: Stem,
    pub secondary: Option<Stem>,
    pub residual: Option<Stem>,
}

impl HiddenStems {
    /// Present stems in primary → residual order.
    pub fn iter(&self) -> impl Iterator<Item = Stem> {
        std::iter::once(self.primary).chain(self.secondary).chain(self.residual)
    }

    /// Concatenated names, e.g. `"己癸辛"`.
    pub fn text(&self) -> String {
        self.iter().map(Stem::name).collect()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Pillar
// ═══════════════════════════════════════════════════════════════════════════

/// A stem–branch pair of the sexagenary cycle, stored as its cycle index.
///
/// Only pairs with `stem mod 2 == branch mod 2` exist; the 60 of them are
/// numbered so that index `i` has stem `i mod 10` and branch `i mod 12`
/// (0 = 甲子, 16 = 庚辰, 59 = 癸亥).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct Pillar(u8);

impl Pillar {
    pub const CYCLE: i64 = 60;

    /// Pillar with the given cycle index, wrapped modulo 60.
    #[inline]
    pub const fn new(index: i64) -> Self {
        Self(index.rem_euclid(Self::CYCLE) as u8)
    }

    /// Pillar of a stem and branch, if the pair belongs to the cycle.
    pub fn from_parts(stem: Stem, branch: Branch) -> Result<Self> {
        if stem.0 % 2 != branch.0 % 2 {
            return Err(Error::invalid(format!(
                "{stem}{branch} is not a sexagenary pair (mixed polarity)"
            )));
        }
        Ok(Self::new(i64::from(stem.0) * 6 - i64::from(branch.0) * 5))
    }

    #[inline]
    pub const fn index(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn stem(self) -> Stem {
        Stem(self.0 % 10)
    }

    #[inline]
    pub const fn branch(self) -> Branch {
        Branch(self.0 % 12)
    }

    /// The pillar `steps` positions further along the cycle (negative = back).
    #[inline]
    pub const fn step(self, steps: i64) -> Self {
        Self::new(self.0 as i64 + steps)
    }

    /// Two-character name, e.g. `"庚辰"`.
    pub fn name(self) -> String {
        format!("{}{}", self.stem().name(), self.branch().name())
    }
}

impl fmt::Display for Pillar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.stem(), self.branch())
    }
}

impl From<Pillar> for (Stem, Branch) {
    fn from(p: Pillar) -> Self {
        (p.stem(), p.branch())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Element tally
// ═══════════════════════════════════════════════════════════════════════════

/// Per-element counts over a set of stems and branches.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ElementTally {
    counts: [u32; 5],
}

impl ElementTally {
    /// Tally of the stem and branch elements of every pillar given.
    pub fn of_pillars<'a>(pillars: impl IntoIterator<Item = &'a Pillar>) -> Self {
        let mut tally = Self::default();
        for p in pillars {
            tally.add(p.stem().element());
            tally.add(p.branch().element());
        }
        tally
    }

    pub fn add(&mut self, element: Element) {
        self.counts[element.index()] += 1;
    }

    pub fn get(&self, element: Element) -> u32 {
        self.counts[element.index()]
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// `(element, count)` pairs in generation order.
    pub fn iter(&self) -> impl Iterator<Item = (Element, u32)> + '_ {
        Element::ALL.iter().map(move |&e| (e, self.get(e)))
    }
}

impl fmt::Display for ElementTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (element, count) in self.iter() {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{element} {count}")?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn stem_elements_and_polarity() {
        assert_eq!(Stem::new(0).element(), Wood);
        assert_eq!(Stem::new(3).element(), Fire);
        assert_eq!(Stem::new(5).element(), Earth);
        assert_eq!(Stem::new(6).element(), Metal);
        assert_eq!(Stem::new(9).element(), Water);
        assert_eq!(Stem::new(4).polarity(), Polarity::Yang);
        assert_eq!(Stem::new(7).polarity(), Polarity::Yin);
    }

    #[test]
    fn constructors_normalise() {
        assert_eq!(Stem::new(-1), Stem::new(9));
        assert_eq!(Branch::new(25), Branch::new(1));
        assert_eq!(Pillar::new(-1).index(), 59);
        assert_eq!(Stem::of_year(1984).name(), "甲");
        assert_eq!(Branch::of_year(1984).name(), "子");
        assert_eq!(Stem::of_year(3).name(), "癸");
    }

    #[test]
    fn try_from_rejects_out_of_range() {
        assert!(Stem::try_from(10).is_err());
        assert!(Branch::try_from(12).is_err());
        assert_eq!(Branch::try_from(11).unwrap().name(), "亥");
    }

    #[test]
    fn hidden_stem_text() {
        assert_eq!(Branch::new(0).hidden_stems().text(), "癸");
        assert_eq!(Branch::new(1).hidden_stems().text(), "己癸辛");
        assert_eq!(Branch::new(7).hidden_stems().text(), "己丁乙");
        assert_eq!(Branch::new(8).hidden_stems().text(), "庚戊壬");
        assert_eq!(Branch::new(10).hidden_stems().text(), "戊辛丁");
        assert_eq!(Branch::new(11).hidden_stems().text(), "壬甲戊");
        assert_eq!(Branch::new(11).hidden_stems().iter().count(), 3);
        assert_eq!(Branch::new(6).hidden_stems().secondary, None);
    }

    #[test]
    fn zodiac_and_branch_elements() {
        assert_eq!(Branch::new(4).zodiac(), "龙");
        assert_eq!(Branch::new(0).element(), Water);
        assert_eq!(Branch::new(2).element(), Wood);
        assert_eq!(Branch::new(8).element(), Metal);
    }

    #[test]
    fn pillar_names() {
        assert_eq!(Pillar::new(0).to_string(), "甲子");
        assert_eq!(Pillar::new(16).name(), "庚辰");
        assert_eq!(Pillar::new(59).to_string(), "癸亥");
    }

    #[test]
    fn pillar_from_parts() {
        let p = Pillar::from_parts(Stem::new(6), Branch::new(4)).unwrap();
        assert_eq!(p.index(), 16);
        assert!(Pillar::from_parts(Stem::new(0), Branch::new(1)).is_err());
    }

    #[test]
    fn pillar_step_wraps() {
        assert_eq!(Pillar::new(59).step(1).index(), 0);
        assert_eq!(Pillar::new(0).step(-1).index(), 59);
        assert_eq!(Pillar::new(10).step(-70).index(), 0);
    }

    #[test]
    fn element_tally() {
        // 甲子: Wood + Water, 丙午: Fire + Fire
        let tally = ElementTally::of_pillars(&[Pillar::new(0), Pillar::new(42)]);
        assert_eq!(tally.get(Wood), 1);
        assert_eq!(tally.get(Water), 1);
        assert_eq!(tally.get(Fire), 2);
        assert_eq!(tally.total(), 4);
        assert_eq!(tally.to_string(), "木 1 火 2 土 0 金 0 水 1");
    }

    proptest! {
        #[test]
        fn prop_pillar_parity(i in 0i64..60) {
            let p = Pillar::new(i);
            prop_assert_eq!(p.stem().index() % 2, p.branch().index() % 2);
        }

        #[test]
        fn prop_pillar_recovers_from_parts(i in 0i64..60) {
            let p = Pillar::new(i);
            prop_assert_eq!(Pillar::from_parts(p.stem(), p.branch()).unwrap(), p);
        }
    }
}
