//! Validated field values
//!
//! Contact and scheduling attributes on user records are typed wrappers whose
//! constructors run the validation predicate. A [`Field`] slot holds at most one
//! validated value; a rejected write never touches the slot, so readers always
//! observe the last value that passed validation.

use crate::errors::ValidationError;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A value type that can be parsed from raw text with validation
pub trait FieldValue: Sized + Clone + fmt::Debug {
    /// Attribute name used in logs and errors
    const FIELD: &'static str;

    /// Validate raw input and build the value
    fn parse(raw: &str) -> Result<Self, ValidationError>;
}

/// Email address shaped like `local@domain.tld`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Borrow the address
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Part before the `@`
    pub fn local_part(&self) -> &str {
        self.0.split_once('@').map(|(local, _)| local).unwrap_or_default()
    }

    /// Part after the `@`
    pub fn domain(&self) -> &str {
        self.0.split_once('@').map(|(_, domain)| domain).unwrap_or_default()
    }
}

// Literal patterns; compilation cannot fail at runtime.
#[allow(clippy::expect_used)]
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern")
});

#[allow(clippy::expect_used)]
static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+[0-9]{10,15}$").expect("phone pattern"));

impl FieldValue for Email {
    const FIELD: &'static str = "email";

    fn parse(raw: &str) -> Result<Self, ValidationError> {
        if !EMAIL_PATTERN.is_match(raw) {
            return Err(ValidationError::Email {
                value: raw.to_string(),
            });
        }
        Ok(Self(raw.to_string()))
    }
}

impl TryFrom<String> for Email {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// International phone number: `+` followed by 10-15 digits
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Phone(String);

impl Phone {
    /// Shortest accepted digit count
    pub const MIN_DIGITS: usize = 10;
    /// Longest accepted digit count
    pub const MAX_DIGITS: usize = 15;

    /// Borrow the number including the leading `+`
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Digits without the leading `+`
    pub fn digits(&self) -> &str {
        &self.0[1..]
    }
}

impl FieldValue for Phone {
    const FIELD: &'static str = "phone";

    fn parse(raw: &str) -> Result<Self, ValidationError> {
        if !PHONE_PATTERN.is_match(raw) {
            return Err(ValidationError::Phone {
                value: raw.to_string(),
            });
        }
        Ok(Self(raw.to_string()))
    }
}

impl TryFrom<String> for Phone {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Phone> for String {
    fn from(phone: Phone) -> Self {
        phone.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Delivery priority of a user or notification
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    /// Default when nothing was set
    #[default]
    Low,
    /// Routine but relevant
    Medium,
    /// Needs attention today
    High,
    /// Needs attention now
    Urgent,
}

impl Priority {
    /// Every priority, lowest first
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Urgent,
    ];

    /// Canonical uppercase label
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
            Priority::Urgent => "URGENT",
        }
    }
}

impl FieldValue for Priority {
    const FIELD: &'static str = "priority";

    fn parse(raw: &str) -> Result<Self, ValidationError> {
        Self::ALL
            .into_iter()
            .find(|priority| priority.as_str() == raw)
            .ok_or_else(|| ValidationError::Priority {
                value: raw.to_string(),
            })
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Availability window with `end` strictly after `start`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTimeWindow")]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RawTimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<RawTimeWindow> for TimeWindow {
    type Error = ValidationError;

    fn try_from(raw: RawTimeWindow) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl TimeWindow {
    /// Build a window, rejecting `end <= start`
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, ValidationError> {
        if end <= start {
            return Err(ValidationError::time_window(format!(
                "end {end} is not after start {start}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Build a window from a slice that must hold exactly two timestamps
    pub fn from_slice(bounds: &[DateTime<Utc>]) -> Result<Self, ValidationError> {
        match bounds {
            [start, end] => Self::new(*start, *end),
            other => Err(ValidationError::time_window(format!(
                "expected a (start, end) pair, got {} values",
                other.len()
            ))),
        }
    }

    /// Start of the window
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// End of the window
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Whether `instant` falls in `[start, end)`
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    /// Length of the window
    pub fn duration(&self) -> chrono::Duration {
        self.end - self.start
    }
}

impl TryFrom<(DateTime<Utc>, DateTime<Utc>)> for TimeWindow {
    type Error = ValidationError;

    fn try_from((start, end): (DateTime<Utc>, DateTime<Utc>)) -> Result<Self, Self::Error> {
        Self::new(start, end)
    }
}

impl FieldValue for TimeWindow {
    const FIELD: &'static str = "time_window";

    /// Parse an RFC 3339 interval written `start/end`
    fn parse(raw: &str) -> Result<Self, ValidationError> {
        let parts: Vec<&str> = raw.split('/').collect();
        let [start, end] = parts.as_slice() else {
            return Err(ValidationError::time_window(format!(
                "expected 'start/end', got {} part(s)",
                parts.len()
            )));
        };
        let parse_bound = |text: &str| {
            DateTime::parse_from_rfc3339(text.trim())
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| ValidationError::time_window(format!("bad timestamp '{text}': {e}")))
        };
        Self::new(parse_bound(start)?, parse_bound(end)?)
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}

/// Slot holding at most one validated value
///
/// `set` validates first and only then replaces the stored value, so a
/// rejected write leaves the previous value in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Field<V> {
    value: Option<V>,
}

impl<V> Default for Field<V> {
    fn default() -> Self {
        Self { value: None }
    }
}

impl<V: FieldValue> Field<V> {
    /// Create an empty slot
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a slot holding an already validated value
    pub fn with_value(value: V) -> Self {
        Self { value: Some(value) }
    }

    /// Last validated value, if any
    pub fn get(&self) -> Option<&V> {
        self.value.as_ref()
    }

    /// Whether a value has been committed
    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    /// Validate `raw` and commit it; on error the slot is unchanged
    pub fn set(&mut self, raw: &str) -> Result<(), ValidationError> {
        let value = V::parse(raw).map_err(|e| {
            tracing::debug!(field = V::FIELD, error = %e, "Rejected field write");
            e
        })?;
        self.value = Some(value);
        Ok(())
    }

    /// Commit a value that was validated on construction
    pub fn set_value(&mut self, value: V) {
        self.value = Some(value);
    }

    /// Empty the slot, returning the previous value
    pub fn clear(&mut self) -> Option<V> {
        self.value.take()
    }
}

impl<V: FieldValue + Default> Field<V> {
    /// Last validated value, or the type's default when unset
    pub fn get_or_default(&self) -> V {
        self.value.clone().unwrap_or_default()
    }
}
