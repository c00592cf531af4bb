// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Ten Gods (十神): how a stem relates to the day stem.
//!
//! Stem distance around the ten-stem ring stands in for the element cycle:
//! two steps per element, in generation order.

use crate::sexagenary::{HiddenStems, Stem};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One of the ten relations to the day stem.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TenGod {
    /// 比肩
    Rival,
    /// 劫财
    RobWealth,
    /// 食神
    EatingGod,
    /// 伤官
    HurtingOfficer,
    /// 偏财
    IndirectWealth,
    /// 正财
    DirectWealth,
    /// 偏官
    IndirectOfficer,
    /// 正官
    DirectOfficer,
    /// 偏印
    IndirectResource,
    /// 正印
    DirectResource,
}

use TenGod::*;

impl TenGod {
    /// Relation of `other` to `day`.
    ///
    /// Keyed on `diff = (other − day) mod 10` and on whether the two stems
    /// share polarity. Any shift applied to both stems gives the same result.
    ///
    /// Stems an even distance apart always share polarity, so the table
    /// yields one category per pair of differences (0/1, 2/3, 4/5, 6/7, 8/9).
    pub fn classify(day: Stem, other: Stem) -> Self {
        let diff = (i32::from(other.index()) - i32::from(day.index())).rem_euclid(10);
        let same = other.polarity() == day.polarity();
        match (diff, same) {
            (0, _) => Rival,
            (1, true) => RobWealth,
            (1, false) => Rival,
            (2, true) | (3, false) => EatingGod,
            (2, false) | (3, true) => HurtingOfficer,
            (4, true) | (5, false) => IndirectWealth,
            (4, false) | (5, true) => DirectWealth,
            (6, true) | (7, false) => IndirectOfficer,
            (6, false) | (7, true) => DirectOfficer,
            (8, true) | (9, false) => IndirectResource,
            _ => DirectResource,
        }
    }

    /// Chinese name, e.g. `"食神"`.
    pub const fn name(self) -> &'static str {
        match self {
            Rival => "比肩",
            RobWealth => "劫财",
            EatingGod => "食神",
            HurtingOfficer => "伤官",
            IndirectWealth => "偏财",
            DirectWealth => "正财",
            IndirectOfficer => "偏官",
            DirectOfficer => "正官",
            IndirectResource => "偏印",
            DirectResource => "正印",
        }
    }

    /// English label, e.g. `"Eating-God"`.
    pub const fn label(self) -> &'static str {
        match self {
            Rival => "Rival",
            RobWealth => "Rob-Wealth",
            EatingGod => "Eating-God",
            HurtingOfficer => "Hurting-Officer",
            IndirectWealth => "Indirect-Wealth",
            DirectWealth => "Direct-Wealth",
            IndirectOfficer => "Indirect-Officer",
            DirectOfficer => "Direct-Officer",
            IndirectResource => "Indirect-Resource",
            DirectResource => "Direct-Resource",
        }
    }

    /// Relations of each hidden stem of a branch to `day`.
    pub fn of_hidden(day: Stem, hidden: &HiddenStems) -> Vec<(Stem, TenGod)> {
        hidden.iter().map(|s| (s, Self::classify(day, s))).collect()
    }
}

impl fmt::Display for TenGod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sexagenary::Branch;
    use proptest::prelude::*;

    fn s(i: i64) -> Stem {
        Stem::new(i)
    }

    #[test]
    fn jia_day_master() {
        let day = s(0); // 甲
        let expected = [
            Rival,            // 甲 diff 0
            Rival,            // 乙 diff 1, mixed
            EatingGod,        // 丙 diff 2, same
            EatingGod,        // 丁 diff 3, mixed
            IndirectWealth,   // 戊 diff 4, same
            IndirectWealth,   // 己 diff 5, mixed
            IndirectOfficer,  // 庚 diff 6, same
            IndirectOfficer,  // 辛 diff 7, mixed
            IndirectResource, // 壬 diff 8, same
            IndirectResource, // 癸 diff 9, mixed
        ];
        for (i, want) in expected.into_iter().enumerate() {
            assert_eq!(TenGod::classify(day, s(i as i64)), want, "other stem {i}");
        }
    }

    #[test]
    fn yin_day_master_uses_the_same_table() {
        let day = s(1); // 乙
        assert_eq!(TenGod::classify(day, s(1)), Rival); // diff 0
        assert_eq!(TenGod::classify(day, s(2)), Rival); // diff 1, mixed
        assert_eq!(TenGod::classify(day, s(3)), EatingGod); // diff 2, same
        assert_eq!(TenGod::classify(day, s(4)), EatingGod); // diff 3, mixed
        assert_eq!(TenGod::classify(day, s(6)), IndirectWealth); // diff 5, mixed
        assert_eq!(TenGod::classify(day, s(9)), IndirectResource); // diff 8, same
        assert_eq!(TenGod::classify(day, s(0)), IndirectResource); // diff 9, mixed
    }

    #[test]
    fn names_and_labels() {
        assert_eq!(EatingGod.name(), "食神");
        assert_eq!(EatingGod.label(), "Eating-God");
        assert_eq!(DirectResource.to_string(), "正印");
    }

    #[test]
    fn hidden_stem_relations() {
        // 丑 hides 己癸辛
        let gods = TenGod::of_hidden(s(0), &Branch::new(1).hidden_stems());
        let gods: Vec<_> = gods.into_iter().map(|(_, g)| g).collect();
        assert_eq!(gods, vec![IndirectWealth, IndirectResource, IndirectOfficer]);
    }

    #[test]
    fn polarity_match_follows_diff_parity() {
        for day in Stem::all() {
            for other in Stem::all() {
                let diff = (i32::from(other.index()) - i32::from(day.index())).rem_euclid(10);
                assert_eq!(other.polarity() == day.polarity(), diff % 2 == 0);
            }
        }
    }

    proptest! {
        #[test]
        fn prop_shift_invariant(day in 0i64..10, other in 0i64..10, k in 0i64..10) {
            prop_assert_eq!(
                TenGod::classify(s(day), s(other)),
                TenGod::classify(s(day + k), s(other + k))
            );
        }
    }
}
