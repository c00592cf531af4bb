// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Chinese display strings for dates and charts.

use crate::chart::DateInput;
use crate::error::{Error, Result};
use crate::lunar::LunarDate;
use crate::sexagenary::Pillar;

/// Chinese numerals; index 0 is 十 so that `n % 10` indexes the final digit.
const NUMERALS: [&str; 10] = ["十", "一", "二", "三", "四", "五", "六", "七", "八", "九"];

/// Month name including 月: 正月, 二月 … 十月, 冬月, 腊月, prefixed with 闰
/// for a leap month.
///
/// ```
/// use bazi::fmt::lunar_month_name;
///
/// assert_eq!(lunar_month_name(1, false).unwrap(), "正月");
/// assert_eq!(lunar_month_name(4, true).unwrap(), "闰四月");
/// assert_eq!(lunar_month_name(12, false).unwrap(), "腊月");
/// ```
pub fn lunar_month_name(month: u8, is_leap: bool) -> Result<String> {
    let num = match month {
        1 => "正",
        2..=10 => NUMERALS[usize::from(month % 10)],
        11 => "冬",
        12 => "腊",
        _ => return Err(Error::invalid(format!("lunar month {month} not in 1..=12"))),
    };
    let leap = if is_leap { "闰" } else { "" };
    Ok(format!("{leap}{num}月"))
}

/// Day name: 初一 … 初十, 十一 … 十九, 二十, 廿一 … 廿九, 三十.
pub fn lunar_day_name(day: u8) -> Result<String> {
    let prefix = match day {
        1..=10 => "初",
        11..=19 => "十",
        20 => "二",
        21..=29 => "廿",
        30 => "三",
        _ => return Err(Error::invalid(format!("lunar day {day} not in 1..=30"))),
    };
    Ok(format!("{prefix}{}", NUMERALS[usize::from(day % 10)]))
}

/// Traditional rendering of a lunar date, e.g. `"庚辰年正月初一"`.
pub fn lunar_date_text(date: &LunarDate) -> Result<String> {
    let year = Pillar::new(i64::from(date.year) - 4);
    Ok(format!(
        "{year}年{}{}",
        lunar_month_name(date.month, date.is_leap_month)?,
        lunar_day_name(date.day)?
    ))
}

/// Birth date as entered, e.g. `"公历 2000年1月1日"` or
/// `"农历 2000年1月1日（闰月）"`.
pub fn birth_date_label(date: &DateInput) -> String {
    match *date {
        DateInput::Gregorian { year, month, day } => format!("公历 {year}年{month}月{day}日"),
        DateInput::Lunar {
            year,
            month,
            day,
            is_leap_month,
        } => {
            let leap = if is_leap_month { "（闰月）" } else { "" };
            format!("农历 {year}年{month}月{day}日{leap}")
        }
    }
}
