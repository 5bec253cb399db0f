// src/format.rs
//! Display helpers shared by the pane renderers: time labels, source names,
//! tag chips and HTML escaping.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;
use thiserror::Error;

use crate::article::TagsField;

/// At most this many tags are shown per article.
pub const TAG_CAP: usize = 3;

/// Machine source id -> display name. Several crawler ids share one outlet.
const SOURCE_NAMES: &[(&str, &str)] = &[
    ("cankaoxiaoxi", "参考消息"),
    ("thepaper", "澎湃新闻"),
    ("36kr", "36氪"),
    ("wallstreetcn", "华尔街见闻"),
    ("wallstreetcn_live", "华尔街见闻"),
    ("wallstreetcn_news", "华尔街见闻"),
    ("jin10", "金十数据"),
    ("cls", "财联社"),
    ("cls_telegraph", "财联社"),
    ("cls_depth", "财联社"),
    ("ifeng", "凤凰网"),
    ("toutiao", "今日头条"),
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimestampError {
    #[error("empty timestamp")]
    Empty,
    #[error("unrecognised timestamp: {0}")]
    Unparseable(String),
}

#[derive(Debug, Error)]
pub enum TagsError {
    #[error("tags are not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("tags do not decode to an array")]
    NotAnArray,
}

/// Escape text for element content.
pub fn escape_text(s: &str) -> String {
    html_escape::encode_text(s).into_owned()
}

/// Escape text for a double-quoted attribute value.
pub fn escape_attr(s: &str) -> String {
    html_escape::encode_double_quoted_attribute(s).into_owned()
}

/// Parse an ISO-8601 timestamp into `tz`.
///
/// Accepts RFC 3339 with an offset, naive date-times (taken as wall-clock
/// time in `tz`) and bare dates (UTC midnight).
pub fn parse_timestamp_in<Tz: TimeZone>(raw: &str, tz: &Tz) -> Result<DateTime<Tz>, TimestampError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(TimestampError::Empty);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(tz));
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return tz
                .from_local_datetime(&naive)
                .earliest()
                .ok_or_else(|| TimestampError::Unparseable(raw.to_string()));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&midnight).with_timezone(tz));
        }
    }

    Err(TimestampError::Unparseable(raw.to_string()))
}

/// `MM-DD HH:MM` in `tz`; empty for missing or unparseable input.
pub fn format_time_in<Tz: TimeZone>(raw: Option<&str>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let Some(raw) = raw else {
        return String::new();
    };
    match parse_timestamp_in(raw, tz) {
        Ok(dt) => dt.format("%m-%d %H:%M").to_string(),
        Err(TimestampError::Empty) => String::new(),
        Err(e) => {
            tracing::debug!(target: "feed", error = %e, "time label left empty");
            String::new()
        }
    }
}

/// `MM-DD HH:MM` in the local time zone.
pub fn format_time(raw: Option<&str>) -> String {
    format_time_in(raw, &Local)
}

/// Display name for a source id; unknown ids pass through unchanged.
pub fn resolve_source_name(id: &str) -> &str {
    SOURCE_NAMES
        .iter()
        .find(|(k, _)| *k == id)
        .map(|(_, name)| *name)
        .unwrap_or(id)
}

/// Decode the raw tags column into display strings.
pub fn decode_tags(field: &TagsField) -> Result<Vec<String>, TagsError> {
    let items = match field {
        TagsField::Encoded(s) => match serde_json::from_str::<Value>(s)? {
            Value::Array(items) => items,
            _ => return Err(TagsError::NotAnArray),
        },
        TagsField::List(items) => items.clone(),
        TagsField::Other(_) => return Err(TagsError::NotAnArray),
    };
    Ok(items
        .into_iter()
        .map(|v| match v {
            Value::String(s) => s,
            other => other.to_string(),
        })
        .collect())
}

/// Tag chips for the first [`TAG_CAP`] tags; empty when tags are absent or
/// malformed.
pub fn render_tags(field: Option<&TagsField>) -> String {
    let Some(field) = field else {
        return String::new();
    };
    let tags = match decode_tags(field) {
        Ok(tags) => tags,
        Err(e) => {
            tracing::debug!(target: "feed", error = %e, "tags dropped");
            return String::new();
        }
    };
    tags.iter()
        .take(TAG_CAP)
        .map(|t| tag_chip(t))
        .collect()
}

/// A single `timeline-tag` chip (also used for the legend badge).
pub fn tag_chip(label: &str) -> String {
    format!(
        r#"<span class="timeline-tag news-tag">{}</span>"#,
        escape_text(label)
    )
}
