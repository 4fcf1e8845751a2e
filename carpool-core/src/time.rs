//! "HH:MM" helpers used for ride matching and date stamping.

use chrono::{Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

pub const DEFAULT_BUFFER_MINUTES: u32 = 60;

static TIME_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01]?[0-9]|2[0-3]):[0-5][0-9]$").expect("time pattern compiles"));

/// Minutes since midnight. Expects a string that already passed
/// [`is_valid_time_format`]; unparsable parts count as zero and oversized
/// ones saturate.
pub fn time_to_minutes(time: &str) -> u32 {
    let mut parts = time.split(':').map(|p| p.trim().parse::<u32>().unwrap_or(0));
    let hours = parts.next().unwrap_or(0);
    let minutes = parts.next().unwrap_or(0);
    hours.saturating_mul(60).saturating_add(minutes)
}

pub fn is_time_in_buffer(t1: &str, t2: &str, buffer_minutes: u32) -> bool {
    time_to_minutes(t1).abs_diff(time_to_minutes(t2)) <= buffer_minutes
}

pub fn current_time() -> String {
    Local::now().format("%H:%M").to_string()
}

pub fn current_date() -> NaiveDate {
    Local::now().date_naive()
}

pub fn current_date_string() -> String {
    current_date().format("%Y-%m-%d").to_string()
}

pub fn is_valid_time_format(s: &str) -> bool {
    TIME_FORMAT.is_match(s)
}
