// src/article.rs
//! Article data model as delivered by `/api/articles/latest`.
//!
//! Optional fields are decoded leniently: a field carrying an unexpected JSON
//! type becomes `None` instead of failing the whole envelope, so one odd
//! article never takes the batch down with it.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Result code the article API uses for success.
pub const SUCCESS_CODE: i64 = 200;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Article {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub timestamp: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub source: String,
    #[serde(default)]
    pub tags: Option<TagsField>,
    #[serde(default, deserialize_with = "truthy_legend")]
    pub legend: Option<String>,
}

impl Article {
    /// Legend value if it routes to the timeline lane (present and non-empty).
    pub fn legend(&self) -> Option<&str> {
        self.legend.as_deref().filter(|l| !l.is_empty())
    }

    /// Summary, or the title when the summary is missing or empty.
    pub fn summary_or_title(&self) -> &str {
        match self.summary.as_deref() {
            Some(s) if !s.is_empty() => s,
            _ => &self.title,
        }
    }
}

/// Raw `tags` column: the backend stores a JSON-encoded array string, but
/// already-decoded arrays show up too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagsField {
    Encoded(String),
    List(Vec<Value>),
    Other(Value),
}

impl From<Vec<&str>> for TagsField {
    fn from(v: Vec<&str>) -> Self {
        TagsField::List(v.into_iter().map(|s| Value::String(s.to_string())).collect())
    }
}

impl From<&str> for TagsField {
    fn from(s: &str) -> Self {
        TagsField::Encoded(s.to_string())
    }
}

/// Response envelope: `{ code, data, message }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Envelope {
    pub code: i64,
    #[serde(default)]
    pub data: Option<Vec<Article>>,
    #[serde(default)]
    pub message: Option<String>,
}

impl Envelope {
    pub fn ok(articles: Vec<Article>) -> Self {
        Self {
            code: SUCCESS_CODE,
            data: Some(articles),
            message: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }
}

fn scalar_to_string(v: Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn lenient_opt_string<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(d)?;
    Ok(v.and_then(scalar_to_string))
}

/// Legend follows truthiness: `false`, `0` and `null` mean no legend, `true`
/// and other numbers keep their text.
fn truthy_legend<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(d)?;
    Ok(match v {
        Some(Value::Bool(true)) => Some("true".to_string()),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => None,
        Some(other) => scalar_to_string(other),
        None => None,
    })
}

fn lenient_string<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_opt_string(d)?.unwrap_or_default())
}
