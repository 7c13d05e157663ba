//! Number and date formatting shared by the digest and the data report.

use chrono::{DateTime, Utc};

pub fn format_price(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}${}", group_thousands(value.abs(), 2))
}

/// Share counts: 1.2M, 45.0K, 999.
pub fn format_volume(value: f64) -> String {
    let v = value.abs();
    if v >= 1_000_000_000.0 {
        format!("{:.1}B", value / 1_000_000_000.0)
    } else if v >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if v >= 1_000.0 {
        format!("{:.1}K", value / 1_000.0)
    } else {
        group_thousands(value, 0)
    }
}

pub fn format_market_cap(value: f64) -> String {
    if value >= 1_000_000_000_000.0 {
        format!("${:.2}T", value / 1_000_000_000_000.0)
    } else if value >= 1_000_000_000.0 {
        format!("${:.1}B", value / 1_000_000_000.0)
    } else if value >= 1_000_000.0 {
        format!("${:.1}M", value / 1_000_000.0)
    } else {
        format!("${}", group_thousands(value, 0))
    }
}

pub fn format_signed(value: f64) -> String {
    format!("{value:+.2}")
}

pub fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(p) => format!("{p:+.2}%"),
        None => "n/a".to_string(),
    }
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M UTC").to_string()
}

fn group_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{value:.decimals$}");
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (formatted.clone(), None),
    };
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest.to_string()),
        None => ("", int_part),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}
