//! The emergency variant
//!
//! One [`Emergency`] is built per dispatch. Construction runs required-field
//! validation; [`Emergency::evacuate`] is the base operation that the
//! composition layers wrap.

use crate::actions::{AlertActions, PublicAddress};
use klaxon_composition::{
    construct_validated, traced, Operation, RecordsExecution, RequiredFields, VariantDescriptor,
};
use klaxon_core::{ConfigurationError, EmergencyKind, ExecutionWindow, OperationError};
use serde::Serialize;
use tracing::info;

const REQUIRED_FIELDS: &[&str] = &["name"];

/// Registry descriptor for `kind`
pub fn descriptor(kind: EmergencyKind) -> VariantDescriptor {
    VariantDescriptor::new(kind.display_name())
        .with_required_fields(REQUIRED_FIELDS.iter().copied())
        .with_operation(kind.operation_name())
        .with_description(format!(
            "{kind} evacuation: alarm, speaker, notify \"{}\"",
            kind.notification_message()
        ))
}

/// Outputs of one evacuation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvacuationReport {
    /// Kind evacuated
    pub kind: EmergencyKind,
    /// Instance name
    pub name: String,
    /// Alarm confirmation
    pub alarm: String,
    /// Speaker confirmation
    pub speaker: String,
    /// Notification confirmation
    pub notification: String,
}

/// A single emergency instance
#[derive(Debug, Clone)]
pub struct Emergency<A = PublicAddress> {
    kind: EmergencyKind,
    name: String,
    recipient: Option<String>,
    execution_window: Option<ExecutionWindow>,
    actions: A,
}

impl<A: AlertActions> Emergency<A> {
    /// Build an instance named after its kind
    ///
    /// # Errors
    ///
    /// Fails if the instance does not pass required-field validation.
    pub fn new(kind: EmergencyKind, actions: A) -> Result<Self, ConfigurationError> {
        Self::with_name(kind, kind.display_name(), actions)
    }

    /// Build an instance with an explicit name
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MissingField`] when `name` is blank.
    pub fn with_name(
        kind: EmergencyKind,
        name: impl Into<String>,
        actions: A,
    ) -> Result<Self, ConfigurationError> {
        let name = name.into();
        construct_validated(|| Self {
            kind,
            name,
            recipient: None,
            execution_window: None,
            actions,
        })
    }

    /// Direct the notification at one user instead of broadcasting
    pub fn with_recipient(mut self, recipient: impl Into<String>) -> Self {
        self.recipient = Some(recipient.into());
        self
    }

    /// Kind of this instance
    pub fn kind(&self) -> EmergencyKind {
        self.kind
    }

    /// Instance name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Notification recipient, `None` for broadcast
    pub fn recipient(&self) -> Option<&str> {
        self.recipient.as_deref()
    }

    /// Sound the alarm, announce, then notify
    ///
    /// Stops at the first failing action.
    pub fn evacuate(&self) -> Result<EvacuationReport, OperationError> {
        info!(kind = %self.kind, name = %self.name, "Evacuation due to {}", self.name);

        let alarm = traced("set_alarm", || self.actions.set_alarm())?;
        let speaker = traced("speaker", || self.actions.speaker())?;
        let notification = traced("send_notification", || {
            self.actions
                .send_notification(self.kind.notification_message(), self.recipient())
        })?;

        Ok(EvacuationReport {
            kind: self.kind,
            name: self.name.clone(),
            alarm,
            speaker,
            notification,
        })
    }
}

impl<A: AlertActions> Operation for Emergency<A> {
    type Output = EvacuationReport;

    fn operation_name(&self) -> &str {
        self.kind.operation_name()
    }

    fn invoke(&mut self) -> Result<EvacuationReport, OperationError> {
        self.evacuate()
    }
}

impl<A> RecordsExecution for Emergency<A> {
    fn record_execution(&mut self, window: ExecutionWindow) {
        self.execution_window = Some(window);
    }

    fn execution_window(&self) -> Option<&ExecutionWindow> {
        self.execution_window.as_ref()
    }
}

impl<A> RequiredFields for Emergency<A> {
    fn type_name(&self) -> &str {
        self.kind.display_name()
    }

    fn required_fields(&self) -> &'static [&'static str] {
        REQUIRED_FIELDS
    }

    fn has_field(&self, field: &str) -> bool {
        match field {
            "name" => !self.name.trim().is_empty(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{DateTime, Duration, Utc};
    use klaxon_composition::compose;
    use klaxon_core::ManualClock;
    use std::sync::Arc;

    #[test]
    fn test_every_kind_constructs_with_default_name() {
        for kind in EmergencyKind::ALL {
            let emergency = Emergency::new(kind, PublicAddress).unwrap();
            assert_eq!(emergency.name(), kind.display_name());
            assert!(emergency.execution_window().is_none());
        }
    }

    #[test]
    fn test_blank_name_rejected() {
        for kind in EmergencyKind::ALL {
            for name in ["", "   "] {
                let result = Emergency::with_name(kind, name, PublicAddress);
                assert_matches!(
                    result,
                    Err(ConfigurationError::MissingField { type_name, field })
                        if type_name == kind.display_name() && field == "name"
                );
            }
            assert!(Emergency::with_name(kind, "Block D", PublicAddress).is_ok());
        }
    }

    #[test]
    fn test_evacuate_runs_actions_in_order() {
        let report = Emergency::with_name(EmergencyKind::Epidemic, "Ward B outbreak", PublicAddress)
            .unwrap()
            .evacuate()
            .unwrap();

        assert_eq!(report.name, "Ward B outbreak");
        assert_eq!(report.alarm, "Alarm activated");
        assert_eq!(report.speaker, "Speaker activated");
        assert_eq!(report.notification, "Notification sent: wear a mask");
    }

    #[test]
    fn test_second_run_overwrites_window() {
        let start = DateTime::<Utc>::from_timestamp(1_750_000_000, 0).unwrap();
        let clock = Arc::new(ManualClock::new(start).with_step(Duration::milliseconds(40)));
        let mut chain = compose(Emergency::new(EmergencyKind::Fire, PublicAddress).unwrap(), clock);

        assert!(chain.run().is_completed());
        let first = chain.execution_window().copied().unwrap();
        assert!(chain.run().is_completed());
        let second = chain.execution_window().copied().unwrap();

        assert!(second.started_at() > first.finished_at());
        assert_eq!(second.elapsed(), Duration::milliseconds(40));
    }

    #[test]
    fn test_descriptor_names_operation() {
        let descriptor = descriptor(EmergencyKind::Security);
        assert_eq!(descriptor.type_name, "Security");
        assert_eq!(descriptor.operation, "Security.evacuate");
        assert_eq!(descriptor.required_fields, vec!["name".to_string()]);
    }
}
