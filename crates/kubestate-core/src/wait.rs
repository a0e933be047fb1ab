//! Wait-condition configuration
//!
//! Resource apply and delete paths can poll the API server until a condition
//! holds. This module carries the configuration side of that: timeouts and
//! poll intervals parsed from configuration strings, and field matchers that
//! compare a dotted path inside the live object against a pattern. The
//! polling loops themselves live in kubestate-client.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::time::Duration;

use crate::error::{CoreError, Result};

/// Timeout and poll interval for a wait loop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitConfig {
    /// Total time to wait. Zero means "check once, don't wait".
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,

    /// Sleep between polling attempts
    #[serde(default = "default_poll_interval", with = "humantime_serde")]
    pub poll_interval: Duration,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            poll_interval: default_poll_interval(),
        }
    }
}

fn default_timeout() -> Duration {
    Duration::from_secs(300)
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(5)
}

impl WaitConfig {
    /// Create a config with an explicit timeout and poll interval
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }

    /// A config that performs a single check and never sleeps
    pub fn check_once() -> Self {
        Self {
            timeout: Duration::ZERO,
            ..Default::default()
        }
    }

    /// Whether this config means "check once, don't wait"
    pub fn is_check_once(&self) -> bool {
        self.timeout.is_zero()
    }
}

/// Wait condition for the create/update path: poll until every field
/// matcher matches the live object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertWait {
    /// Matchers that must all hold before the wait succeeds
    #[serde(default)]
    pub fields: Vec<FieldMatch>,

    #[serde(flatten)]
    pub config: WaitConfig,
}

impl UpsertWait {
    /// Wait for the given matchers with default timing
    pub fn on_fields(fields: Vec<FieldMatch>) -> Self {
        Self {
            fields,
            config: WaitConfig::default(),
        }
    }
}

/// Parse a timeout from a configuration string.
///
/// Accepts `ms`, `s`, `m`, `h`, and `d` suffixes; a bare number is seconds.
/// Negative values are rejected as a misconfiguration.
pub fn parse_timeout(value: &str) -> Result<Duration> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::InvalidDuration {
            value: value.to_string(),
            message: "empty duration".to_string(),
        });
    }
    if trimmed.starts_with('-') {
        return Err(CoreError::InvalidDuration {
            value: value.to_string(),
            message: "negative durations are not supported".to_string(),
        });
    }

    // "ms" must be peeled off before the single-letter suffixes
    let (num_str, unit) = if let Some(stripped) = trimmed.strip_suffix("ms") {
        (stripped, "ms")
    } else if let Some(stripped) = trimmed.strip_suffix('s') {
        (stripped, "s")
    } else if let Some(stripped) = trimmed.strip_suffix('m') {
        (stripped, "m")
    } else if let Some(stripped) = trimmed.strip_suffix('h') {
        (stripped, "h")
    } else if let Some(stripped) = trimmed.strip_suffix('d') {
        (stripped, "d")
    } else {
        (trimmed, "s")
    };

    let amount: u64 = num_str
        .trim()
        .parse()
        .map_err(|_| CoreError::InvalidDuration {
            value: value.to_string(),
            message: format!("{:?} is not a whole number", num_str.trim()),
        })?;

    Ok(match unit {
        "ms" => Duration::from_millis(amount),
        "s" => Duration::from_secs(amount),
        "m" => Duration::from_secs(amount * 60),
        "h" => Duration::from_secs(amount * 3600),
        _ => Duration::from_secs(amount * 86400),
    })
}

/// Matches one field of the live object against a pattern
///
/// The path is dotted, descending through map keys and numeric list indices
/// (`status.conditions.0.type`). The resolved value is rendered as a string
/// (strings unquoted, booleans and numbers via their display form) and
/// matched against the pattern as an anchored regular expression. A path
/// that resolves to nothing, to null, or to a non-scalar does not match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMatch {
    /// Dotted path into the object's JSON representation
    pub path: String,

    /// Anchored regular expression the rendered value must match
    pub pattern: String,
}

impl FieldMatch {
    pub fn new(path: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            pattern: pattern.into(),
        }
    }

    /// Check the matcher against an object
    pub fn matches(&self, obj: &JsonValue) -> Result<bool> {
        let regex = Regex::new(&format!("^(?:{})$", self.pattern)).map_err(|e| {
            CoreError::InvalidWaitPattern {
                pattern: self.pattern.clone(),
                message: e.to_string(),
            }
        })?;

        let Some(value) = lookup_path(obj, &self.path) else {
            return Ok(false);
        };
        let rendered = match value {
            JsonValue::String(s) => s.clone(),
            JsonValue::Bool(b) => b.to_string(),
            JsonValue::Number(n) => n.to_string(),
            _ => return Ok(false),
        };

        Ok(regex.is_match(&rendered))
    }
}

/// Resolve a dotted path against a JSON value
pub fn lookup_path<'a>(obj: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    let mut current = obj;
    for segment in path.split('.') {
        current = match current {
            JsonValue::Object(map) => map.get(segment)?,
            JsonValue::Array(items) => {
                let index: usize = segment.parse().ok()?;
                items.get(index)?
            }
            _ => return None,
        };
    }
    Some(current)
}
