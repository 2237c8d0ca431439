//! Strict ISO-8601 reader used as the fast path of date parsing.
//!
//! Accepted shapes:
//!
//! - Date: `YYYY`, `YYYY-MM`, `YYYY-MM-DD`, `YYYYMMDD`, ordinal `YYYY-DDD`,
//!   week `YYYY-Www` / `YYYY-Www-D`
//! - Optional time after a single `T` or space: `HH`, `HH:mm`, `HH:mm:ss`
//!   (colons optional), the last component may carry a `.`/`,` fraction.
//!   `24:00:00` is the end of the day
//! - Optional offset on the time: `Z`, `±HH`, `±HH:mm`, `±HHmm`. Values with
//!   an offset are converted to UTC wall time; values without one are
//!   returned as written
//!
//! Anything else, including surrounding whitespace, is rejected.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Weekday};

const MILLIS_PER_DAY: u64 = 86_400_000;

/// Read an ISO-8601 date or date-time.
///
/// ```rust
/// use helper_kit::iso8601::parse_iso8601;
///
/// let parsed = parse_iso8601("2019-10-21T10:30:00+02:00").unwrap();
/// assert_eq!(parsed.to_string(), "2019-10-21 08:30:00");
/// assert!(parse_iso8601("10/21/2019").is_none());
/// ```
pub fn parse_iso8601(input: &str) -> Option<NaiveDateTime> {
    let mut parts = input.split(['T', ' ']);
    let date_text = parts.next()?;
    let time_text = parts.next();
    if parts.next().is_some() {
        return None;
    }

    let date = parse_date(date_text)?;
    let Some(time_text) = time_text else {
        return Some(date.and_time(NaiveTime::MIN));
    };

    let (clock_text, offset_text) = match time_text.find(['Z', '+', '-']) {
        Some(index) => time_text.split_at(index),
        None => (time_text, ""),
    };

    let (time, next_day) = parse_time(clock_text)?;
    let date = if next_day { date.succ_opt()? } else { date };
    let local = date.and_time(time);

    if offset_text.is_empty() {
        return Some(local);
    }
    let offset = parse_offset(offset_text)?;
    local.checked_sub_signed(offset)
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    let (year_digits, rest) = split_digits(text, 4)?;
    if year_digits.len() != 4 {
        return None;
    }
    let year = number(year_digits) as i32;
    let rest = rest.strip_prefix('-').unwrap_or(rest);

    if rest.is_empty() {
        return NaiveDate::from_ymd_opt(year, 1, 1);
    }

    if let Some(week_text) = rest.strip_prefix('W') {
        let (week_digits, tail) = split_digits(week_text, 2)?;
        if week_digits.len() != 2 {
            return None;
        }
        let tail = tail.strip_prefix('-').unwrap_or(tail);
        let weekday = match tail.as_bytes() {
            [] => Weekday::Mon,
            [digit @ b'1'..=b'7'] => Weekday::try_from(digit - b'1').ok()?,
            _ => return None,
        };
        return NaiveDate::from_isoywd_opt(year, number(week_digits), weekday);
    }

    if rest.len() == 3 && rest.bytes().all(|b| b.is_ascii_digit()) {
        return NaiveDate::from_yo_opt(year, number(rest));
    }

    let (month_digits, tail) = split_digits(rest, 2)?;
    if month_digits.len() != 2 {
        return None;
    }
    let month = number(month_digits);
    if tail.is_empty() {
        return NaiveDate::from_ymd_opt(year, month, 1);
    }

    let tail = tail.strip_prefix('-').unwrap_or(tail);
    if tail.len() != 2 || !tail.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, number(tail))
}

/// Returns the time of day and whether it rolled over into the next day.
fn parse_time(text: &str) -> Option<(NaiveTime, bool)> {
    const UNIT_MILLIS: [u64; 3] = [3_600_000, 60_000, 1_000];

    let mut rest = text;
    let mut components = [0_u64; 3];
    let mut count = 0;
    let mut fraction_millis = 0;

    while count < 3 && !rest.is_empty() {
        if count > 0 {
            rest = rest.strip_prefix(':').unwrap_or(rest);
        }
        let (digits, tail) = split_digits(rest, 2)?;
        if digits.len() != 2 {
            return None;
        }
        components[count] = u64::from(number(digits));
        count += 1;
        rest = tail;

        if let Some(fraction) = rest.strip_prefix(['.', ',']) {
            fraction_millis = fraction_to_millis(fraction, UNIT_MILLIS[count - 1])?;
            rest = "";
        }
    }

    if count == 0 || !rest.is_empty() {
        return None;
    }

    let [hours, minutes, seconds] = components;
    if hours == 24 {
        return (minutes == 0 && seconds == 0 && fraction_millis == 0).then_some((NaiveTime::MIN, true));
    }
    if hours > 23 || minutes > 59 || seconds > 59 {
        return None;
    }

    let total = hours * UNIT_MILLIS[0] + minutes * UNIT_MILLIS[1] + seconds * UNIT_MILLIS[2] + fraction_millis;
    let rolled_over = total >= MILLIS_PER_DAY;
    let total = total % MILLIS_PER_DAY;
    let time = NaiveTime::from_num_seconds_from_midnight_opt(
        (total / 1_000) as u32,
        ((total % 1_000) * 1_000_000) as u32,
    )?;
    Some((time, rolled_over))
}

/// Round a decimal fraction of `unit_millis` to whole milliseconds.
fn fraction_to_millis(fraction: &str, unit_millis: u64) -> Option<u64> {
    if !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let significant = &fraction[..fraction.len().min(9)];
    let numerator = u128::from(number(significant));
    let denominator = 10_u128.pow(significant.len() as u32);
    let millis = (numerator * u128::from(unit_millis) + denominator / 2) / denominator;
    u64::try_from(millis).ok()
}

fn parse_offset(text: &str) -> Option<TimeDelta> {
    if text == "Z" {
        return Some(TimeDelta::zero());
    }

    let (sign, rest) = match text.as_bytes().first()? {
        b'+' => (1, &text[1..]),
        b'-' => (-1, &text[1..]),
        _ => return None,
    };

    let (hour_digits, tail) = split_digits(rest, 2)?;
    if hour_digits.len() != 2 {
        return None;
    }
    let tail = tail.strip_prefix(':').unwrap_or(tail);
    let minutes = match tail.len() {
        0 => 0,
        2 if tail.bytes().all(|b| b.is_ascii_digit()) => number(tail),
        _ => return None,
    };

    let hours = number(hour_digits);
    if hours > 23 || minutes > 59 {
        return None;
    }
    TimeDelta::try_seconds(sign * i64::from(hours * 3_600 + minutes * 60))
}

/// Split off up to `max` leading ASCII digits; `None` when there are none.
fn split_digits(text: &str, max: usize) -> Option<(&str, &str)> {
    let len = text
        .bytes()
        .take(max)
        .take_while(u8::is_ascii_digit)
        .count();
    (len > 0).then(|| text.split_at(len))
}

/// Value of an all-digit string of at most nine digits.
fn number(digits: &str) -> u32 {
    digits
        .bytes()
        .fold(0, |acc, b| acc * 10 + u32::from(b - b'0'))
}
