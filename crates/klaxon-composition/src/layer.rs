//! Operation and layer traits
//!
//! A variant exposes its base behavior as an [`Operation`]. Cross-cutting
//! behavior is added by wrapping it in a [`Layer`]; each layer returns a new
//! type that is itself an operation (or, for fault containment, the outermost
//! runner), so the composed chain is fixed at compile time.

use klaxon_core::{ExecutionWindow, OperationError};

/// A fallible, parameterless operation on a mutable target
pub trait Operation {
    /// Successful result
    type Output;

    /// Qualified name used in logs, e.g. `Fire.evacuate`
    fn operation_name(&self) -> &str;

    /// Run the operation
    fn invoke(&mut self) -> Result<Self::Output, OperationError>;
}

/// Target that stores the window of its last completed run
pub trait RecordsExecution {
    /// Overwrite the stored window
    fn record_execution(&mut self, window: ExecutionWindow);

    /// Window of the last completed run
    fn execution_window(&self) -> Option<&ExecutionWindow>;
}

/// Wraps an inner handler in additional behavior
pub trait Layer<H> {
    /// Type produced by wrapping
    type Wrapped;

    /// Wrap `inner`
    fn layer(self, inner: H) -> Self::Wrapped;
}

/// Fluent layering: `op.with(a).with(b)` wraps `a` first, then `b` outside it
pub trait OperationExt: Operation + Sized {
    /// Wrap `self` in `layer`
    fn with<L: Layer<Self>>(self, layer: L) -> L::Wrapped {
        layer.layer(self)
    }
}

impl<T: Operation> OperationExt for T {}
