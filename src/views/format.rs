//! Persian digits, Jalali dates and HTML escaping for rendered pages.

use chrono::{DateTime, Datelike, FixedOffset, Timelike};

/// Iran Standard Time, UTC+03:30 (no daylight saving since 2022)
const TEHRAN_OFFSET_SECONDS: i32 = 3 * 3600 + 30 * 60;

const PERSIAN_DIGITS: [char; 10] = ['۰', '۱', '۲', '۳', '۴', '۵', '۶', '۷', '۸', '۹'];

/// Replace ASCII digits with Persian digits; everything else is kept
pub fn to_persian_digits(value: &str) -> String {
    value
        .chars()
        .map(|c| match c.to_digit(10) {
            Some(d) => PERSIAN_DIGITS[d as usize],
            _ => c,
        })
        .collect()
}

/// Convert a Gregorian date into (year, month, day) of the Solar Hijri calendar
pub fn gregorian_to_jalali(gy: i32, gm: u32, gd: u32) -> (i32, u32, u32) {
    const DAYS_BEFORE_MONTH: [i64; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

    let gy = i64::from(gy);
    let gy2 = if gm > 2 { gy + 1 } else { gy };
    let mut days = 355_666 + 365 * gy + (gy2 + 3) / 4 - (gy2 + 99) / 100 + (gy2 + 399) / 400
        + i64::from(gd)
        + DAYS_BEFORE_MONTH[(gm as usize).clamp(1, 12) - 1];

    let mut jy = -1595 + 33 * (days / 12_053);
    days %= 12_053;
    jy += 4 * (days / 1461);
    days %= 1461;
    if days > 365 {
        jy += (days - 1) / 365;
        days = (days - 1) % 365;
    }

    let (jm, jd) = if days < 186 {
        (1 + days / 31, 1 + days % 31)
    } else {
        (7 + (days - 186) / 30, 1 + (days - 186) % 30)
    };

    (jy as i32, jm as u32, jd as u32)
}

/// Render a unix timestamp as `YYYY/MM/DD HH:MM` in Tehran time with Persian digits
pub fn format_timestamp(timestamp: i64) -> String {
    let Some(offset) = FixedOffset::east_opt(TEHRAN_OFFSET_SECONDS) else {
        return String::new();
    };
    let Some(local) = DateTime::from_timestamp(timestamp, 0).map(|utc| utc.with_timezone(&offset)) else {
        return String::new();
    };

    let (jy, jm, jd) = gregorian_to_jalali(local.year(), local.month(), local.day());
    to_persian_digits(&format!(
        "{:04}/{:02}/{:02} {:02}:{:02}",
        jy,
        jm,
        jd,
        local.hour(),
        local.minute()
    ))
}

/// Escape a value for interpolation into HTML text or a quoted attribute
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
