//! Entry/exit tracing for sub-actions

use klaxon_core::OperationError;
use std::fmt::Debug;
use tracing::debug;

/// Run `action`, logging its entry and its result
///
/// Failures are logged and returned unchanged; containment is left to the
/// outer chain.
pub fn traced<T, F>(name: &str, action: F) -> Result<T, OperationError>
where
    T: Debug,
    F: FnOnce() -> Result<T, OperationError>,
{
    debug!(action = name, "[Message] {name} called");
    let result = action();
    match &result {
        Ok(value) => debug!(action = name, result = ?value, "[Message] {name} returned"),
        Err(e) => debug!(action = name, error = %e, "[Message] {name} failed"),
    }
    result
}
