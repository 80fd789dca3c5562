//! Front-matter parsing

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_yaml::Value;

/// Opening and closing fence of a YAML front-matter block
const FENCE: &str = "---";

/// Render a YAML scalar as text. Empty strings count as missing.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        _ => None,
    }
}

/// Accept any YAML value for a text field; anything that isn't a usable
/// scalar becomes `None` instead of failing the whole block
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_to_string(&value))
}

/// Handles both a single string and a list of strings
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let tags = match value {
        Value::Sequence(items) => items.iter().filter_map(scalar_to_string).collect(),
        other => scalar_to_string(&other).into_iter().collect(),
    };
    Ok(tags)
}

/// Booleans, plus the usual spellings of "true" as strings or numbers
fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let flag = match value {
        Value::Bool(b) => b,
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "yes" | "on" | "1"
        ),
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        _ => false,
    };
    Ok(flag)
}

/// Front-matter data from a content file
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    #[serde(deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub date: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub author: Option<String>,
    #[serde(deserialize_with = "string_or_vec")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub image: Option<String>,
    #[serde(rename = "imageAlt", deserialize_with = "lenient_string")]
    pub image_alt: Option<String>,
    #[serde(deserialize_with = "lenient_bool")]
    pub draft: bool,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, body)
    ///
    /// Only YAML syntax errors are reported; a missing or unterminated
    /// block yields the defaults and the whole input as body.
    pub fn parse(content: &str) -> Result<(Self, &str), serde_yaml::Error> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        let Some((yaml_content, body)) = split_block(content) else {
            return Ok((FrontMatter::default(), content));
        };

        if yaml_content.trim().is_empty() {
            return Ok((FrontMatter::default(), body));
        }

        let value: Value = serde_yaml::from_str(yaml_content)?;
        let Value::Mapping(mut mapping) = value else {
            tracing::debug!("Front-matter is not a mapping, using defaults");
            return Ok((FrontMatter::default(), body));
        };

        // Keys such as `2024:` or `? [a, b]` are valid YAML but can't name a field
        mapping.retain(|key, _| key.is_string());
        let fm = serde_yaml::from_value(Value::Mapping(mapping))?;
        Ok((fm, body))
    }

    /// Parse the date string into a timestamp
    pub fn parse_date(&self) -> Option<DateTime<Utc>> {
        self.date.as_deref().and_then(parse_date_string)
    }
}

/// Split `content` into the YAML between the fences and the body after the
/// closing fence line
fn split_block(content: &str) -> Option<(&str, &str)> {
    let (first_line, rest) = match content.find('\n') {
        Some(pos) => (&content[..pos], &content[pos + 1..]),
        None => (content, ""),
    };
    if first_line.trim_end() != FENCE {
        return None;
    }

    // The closing fence is either the very next line or follows a newline
    let end_pos = if rest.starts_with(FENCE) {
        0
    } else {
        rest.find("\n---")? + 1
    };

    let yaml_content = &rest[..end_pos];
    let after_fence = &rest[end_pos + FENCE.len()..];
    let body = match after_fence.find('\n') {
        Some(pos) => &after_fence[pos + 1..],
        None => "",
    };

    Some((yaml_content, body))
}

/// Parse a date string in various formats. Values without an offset are
/// taken as UTC.
pub fn parse_date_string(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    let offset_formats = [
        "%Y-%m-%dT%H:%M:%S%.f%:z",
        "%Y-%m-%dT%H:%M:%S%.f%z",
        "%Y-%m-%d %H:%M:%S%.f%:z",
        "%Y-%m-%d %H:%M:%S%.f%z",
        "%Y-%m-%d %H:%M:%S %z",
    ];
    for fmt in offset_formats {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    let naive_formats = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%Y/%m/%d %H:%M",
    ];
    for fmt in naive_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc());
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d.and_hms_opt(0, 0, 0)?.and_utc());
        }
    }

    None
}
