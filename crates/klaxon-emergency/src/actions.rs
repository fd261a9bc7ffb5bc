//! Alert actions performed during an evacuation

use klaxon_core::OperationError;
use tracing::info;

/// Physical and messaging actions an evacuation drives
///
/// Implementations return a short confirmation on success. Errors are not
/// handled here; they surface through the evacuation and are absorbed by the
/// outer containment layer.
pub trait AlertActions {
    /// Sound the building alarm
    fn set_alarm(&self) -> Result<String, OperationError>;

    /// Announce over the speaker system
    fn speaker(&self) -> Result<String, OperationError>;

    /// Push a notification, to one recipient or broadcast when `None`
    fn send_notification(
        &self,
        message: &str,
        recipient: Option<&str>,
    ) -> Result<String, OperationError>;
}

/// Default actions: log and confirm
#[derive(Debug, Clone, Copy, Default)]
pub struct PublicAddress;

impl AlertActions for PublicAddress {
    fn set_alarm(&self) -> Result<String, OperationError> {
        Ok("Alarm activated".to_string())
    }

    fn speaker(&self) -> Result<String, OperationError> {
        Ok("Speaker activated".to_string())
    }

    fn send_notification(
        &self,
        message: &str,
        recipient: Option<&str>,
    ) -> Result<String, OperationError> {
        let sent = format!("Notification sent: {message}");
        info!(recipient = recipient.unwrap_or("all"), "{sent}");
        Ok(sent)
    }
}
