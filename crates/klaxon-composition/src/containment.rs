//! Fault containment layer
//!
//! The outermost wrap. Any [`OperationError`] from the inner chain is logged
//! and turned into [`Outcome::Contained`]; nothing propagates to the caller.
//! A panic inside the chain is caught and reported as
//! [`OperationError::Interrupted`] carrying the panic message.

use crate::layer::{Layer, Operation, RecordsExecution};
use klaxon_core::{ExecutionWindow, OperationError};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::warn;

/// Result of a contained run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The chain finished and produced a value
    Completed(T),
    /// The chain failed; the failure was absorbed here
    Contained {
        /// Operation that failed
        operation: String,
        /// Why it failed
        reason: OperationError,
    },
}

impl<T> Outcome<T> {
    /// Whether the chain finished
    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed(_))
    }

    /// Completed value, discarding the failure reason
    pub fn into_option(self) -> Option<T> {
        match self {
            Outcome::Completed(value) => Some(value),
            Outcome::Contained { .. } => None,
        }
    }

    /// Borrow the completed value
    pub fn as_option(&self) -> Option<&T> {
        match self {
            Outcome::Completed(value) => Some(value),
            Outcome::Contained { .. } => None,
        }
    }

    /// Failure reason when contained
    pub fn failure(&self) -> Option<&OperationError> {
        match self {
            Outcome::Completed(_) => None,
            Outcome::Contained { reason, .. } => Some(reason),
        }
    }

    /// Transform the completed value
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Completed(value) => Outcome::Completed(f(value)),
            Outcome::Contained { operation, reason } => Outcome::Contained { operation, reason },
        }
    }
}

/// Layer that absorbs failures
#[derive(Debug, Clone, Copy, Default)]
pub struct FaultContainment;

impl<H: Operation> Layer<H> for FaultContainment {
    type Wrapped = FaultContained<H>;

    fn layer(self, inner: H) -> Self::Wrapped {
        FaultContained { inner }
    }
}

/// Operation wrapped by [`FaultContainment`]
#[derive(Debug)]
pub struct FaultContained<H> {
    inner: H,
}

impl<H: Operation> FaultContained<H> {
    /// Run the chain; never returns an error
    pub fn run(&mut self) -> Outcome<H::Output> {
        let result = panic::catch_unwind(AssertUnwindSafe(|| self.inner.invoke()))
            .unwrap_or_else(|payload| Err(OperationError::interrupted(panic_message(&*payload))));

        match result {
            Ok(value) => Outcome::Completed(value),
            Err(reason) => {
                let operation = self.inner.operation_name().to_string();
                warn!(
                    operation = %operation,
                    error = %reason,
                    "[Circuit Breaker] {operation} failed; returning empty result"
                );
                Outcome::Contained { operation, reason }
            }
        }
    }

    /// Name of the wrapped operation
    pub fn operation_name(&self) -> &str {
        self.inner.operation_name()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panicked: {message}")
    } else {
        "panicked".to_string()
    }
}

impl<H> FaultContained<H> {
    /// Borrow the wrapped chain
    pub fn inner(&self) -> &H {
        &self.inner
    }

    /// Unwrap the chain
    pub fn into_inner(self) -> H {
        self.inner
    }
}

impl<H: RecordsExecution> FaultContained<H> {
    /// Window of the target's last completed run
    pub fn execution_window(&self) -> Option<&ExecutionWindow> {
        self.inner.execution_window()
    }
}
