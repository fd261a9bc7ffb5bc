//! User records with validated contact fields

use crate::errors::ValidationError;
use crate::fields::{Email, Field, Phone, Priority, TimeWindow};
use serde::{Deserialize, Serialize};

/// Campus user who receives notifications
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    username: String,
    first_name: Option<String>,
    last_name: Option<String>,
    bio: String,
    email: Field<Email>,
    personal_email: Field<Email>,
    phone: Field<Phone>,
    priority: Field<Priority>,
    time_window: Field<TimeWindow>,
}

impl User {
    /// Create a user with no contact details
    pub fn new(username: impl Into<String>) -> Result<Self, ValidationError> {
        let username = username.into();
        if username.trim().is_empty() {
            return Err(ValidationError::empty("username"));
        }
        Ok(Self {
            username,
            first_name: None,
            last_name: None,
            bio: String::new(),
            email: Field::empty(),
            personal_email: Field::empty(),
            phone: Field::empty(),
            priority: Field::empty(),
            time_window: Field::empty(),
        })
    }

    /// Set first and last name
    pub fn with_names(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = Some(first.into());
        self.last_name = Some(last.into());
        self
    }

    /// Set the free-text bio
    pub fn with_bio(mut self, bio: impl Into<String>) -> Self {
        self.bio = bio.into();
        self
    }

    /// Login name
    pub fn username(&self) -> &str {
        &self.username
    }

    /// `first last`, or the username when no names are set
    pub fn full_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(name), None) | (None, Some(name)) => name.clone(),
            (None, None) => self.username.clone(),
        }
    }

    /// Free-text bio
    pub fn bio(&self) -> &str {
        &self.bio
    }

    /// Institutional email address
    pub fn email(&self) -> Option<&Email> {
        self.email.get()
    }

    /// Validate and store the institutional email
    pub fn set_email(&mut self, raw: &str) -> Result<(), ValidationError> {
        self.email.set(raw)
    }

    /// Personal email address
    pub fn personal_email(&self) -> Option<&Email> {
        self.personal_email.get()
    }

    /// Validate and store the personal email
    pub fn set_personal_email(&mut self, raw: &str) -> Result<(), ValidationError> {
        self.personal_email.set(raw)
    }

    /// Phone number
    pub fn phone(&self) -> Option<&Phone> {
        self.phone.get()
    }

    /// Validate and store the phone number
    pub fn set_phone(&mut self, raw: &str) -> Result<(), ValidationError> {
        self.phone.set(raw)
    }

    /// Delivery priority, LOW when never set
    pub fn priority(&self) -> Priority {
        self.priority.get_or_default()
    }

    /// Validate and store the priority from its label
    pub fn set_priority(&mut self, raw: &str) -> Result<(), ValidationError> {
        self.priority.set(raw)
    }

    /// Store an already typed priority
    pub fn set_priority_level(&mut self, priority: Priority) {
        self.priority.set_value(priority);
    }

    /// Availability window
    pub fn time_window(&self) -> Option<&TimeWindow> {
        self.time_window.get()
    }

    /// Validate and store the availability window from `start/end` text
    pub fn set_time_window(&mut self, raw: &str) -> Result<(), ValidationError> {
        self.time_window.set(raw)
    }

    /// Store an already validated availability window
    pub fn set_time_window_value(&mut self, window: TimeWindow) {
        self.time_window.set_value(window);
    }
}
