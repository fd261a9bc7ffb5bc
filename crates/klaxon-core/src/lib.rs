//! # Klaxon Core
//!
//! Shared vocabulary for the campus alert system: the error taxonomy,
//! validated field values (email, phone, priority, time window), emergency
//! kinds, clocks and execution windows, runtime configuration, and the
//! user/notification records the delivery side reads.

pub mod config;
pub mod errors;
pub mod fields;
pub mod kind;
pub mod notification;
pub mod time;
pub mod user;

pub use config::{DispatchConfig, KlaxonConfig, LoggingConfig};
pub use errors::{ConfigurationError, KlaxonError, OperationError, Result, ValidationError};
pub use fields::{Email, Field, FieldValue, Phone, Priority, TimeWindow};
pub use kind::EmergencyKind;
pub use notification::{Channel, Notification, NotificationLog};
pub use time::{Clock, ExecutionWindow, ManualClock, SystemClock};
pub use user::User;
