//! Chinese-language time labels for article timestamps.
//!
//! Every formatter takes `now` explicitly so output is deterministic; the
//! handlers pass the local wall clock.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime, Timelike};

pub const UNKNOWN_TIME: &str = "未知时间";

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a backend timestamp into local wall-clock time
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Local).naive_local());
    }

    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Local wall-clock time, the `now` used by request handlers
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn period(hour: u32) -> &'static str {
    match hour {
        0..=5 => "凌晨",
        6..=11 => "上午",
        12 => "中午",
        13..=17 => "下午",
        _ => "晚上",
    }
}

fn twelve_hour(hour: u32) -> u32 {
    match hour {
        0 => 12,
        h if h > 12 => h - 12,
        h => h,
    }
}

fn clock_label(dt: &NaiveDateTime) -> String {
    format!(
        "{}{}:{:02}",
        period(dt.hour()),
        twelve_hour(dt.hour()),
        dt.minute()
    )
}

/// Resolve the raw value, or produce the label used in its place
fn resolve(value: Option<&str>) -> Result<NaiveDateTime, String> {
    let raw = match value {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => return Err(UNKNOWN_TIME.to_string()),
    };
    parse_timestamp(raw).ok_or_else(|| raw.to_string())
}

/// `今天下午2:05`, `昨天晚上9:30` or `08-11 上午10:00`
pub fn format_chinese_time(value: Option<&str>, now: NaiveDateTime) -> String {
    let dt = match resolve(value) {
        Ok(dt) => dt,
        Err(label) => return label,
    };

    let clock = clock_label(&dt);
    let date = dt.date();

    if date == now.date() {
        format!("今天{}", clock)
    } else if date == (now - Duration::hours(24)).date() {
        format!("昨天{}", clock)
    } else {
        format!("{:02}-{:02} {}", date.month(), date.day(), clock)
    }
}

/// Full timestamp as `2025/8/11 14:05:00`
pub fn format_time(value: Option<&str>) -> String {
    match resolve(value) {
        Ok(dt) => dt.format("%Y/%-m/%-d %H:%M:%S").to_string(),
        Err(label) => label,
    }
}

/// Relative label (`刚刚`, `5分钟前`, ...) for the last week, full time after
pub fn format_time_ago(value: Option<&str>, now: NaiveDateTime) -> String {
    let dt = match resolve(value) {
        Ok(dt) => dt,
        Err(label) => return label,
    };

    let minutes = (now - dt).num_minutes();
    let hours = minutes / 60;
    let days = hours / 24;

    if minutes < 1 {
        "刚刚".to_string()
    } else if minutes < 60 {
        format!("{}分钟前", minutes)
    } else if hours < 24 {
        format!("{}小时前", hours)
    } else if days < 7 {
        format!("{}天前", days)
    } else {
        format_time(value)
    }
}
