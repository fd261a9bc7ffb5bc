//! Performance instrumentation layer
//!
//! Reads the clock around the inner call and, if the call succeeds, writes the
//! resulting [`ExecutionWindow`] onto the target. A failed call returns before
//! the window is written, so the target keeps whatever window it had.

use crate::layer::{Layer, Operation, RecordsExecution};
use klaxon_core::{Clock, ExecutionWindow, OperationError, SystemClock};
use std::sync::Arc;
use tracing::info;

/// Layer that times each call
#[derive(Clone)]
pub struct Instrumentation {
    clock: Arc<dyn Clock>,
}

impl Instrumentation {
    /// Time calls with `clock`
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Time calls with the system clock
    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl std::fmt::Debug for Instrumentation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Instrumentation").finish_non_exhaustive()
    }
}

impl<H: Operation + RecordsExecution> Layer<H> for Instrumentation {
    type Wrapped = Instrumented<H>;

    fn layer(self, inner: H) -> Self::Wrapped {
        Instrumented {
            inner,
            clock: self.clock,
        }
    }
}

/// Operation wrapped by [`Instrumentation`]
pub struct Instrumented<H> {
    inner: H,
    clock: Arc<dyn Clock>,
}

impl<H> Instrumented<H> {
    /// Borrow the wrapped target
    pub fn inner(&self) -> &H {
        &self.inner
    }

    /// Mutably borrow the wrapped target
    pub fn inner_mut(&mut self) -> &mut H {
        &mut self.inner
    }

    /// Unwrap the target
    pub fn into_inner(self) -> H {
        self.inner
    }
}

impl<H: Operation + RecordsExecution> Operation for Instrumented<H> {
    type Output = H::Output;

    fn operation_name(&self) -> &str {
        self.inner.operation_name()
    }

    fn invoke(&mut self) -> Result<Self::Output, OperationError> {
        let started_at = self.clock.now();
        let output = self.inner.invoke()?;
        let finished_at = self.clock.now();

        let window = ExecutionWindow::capture(started_at, finished_at);
        let elapsed = window.elapsed();
        let seconds = elapsed.num_microseconds().unwrap_or(i64::MAX) as f64 / 1_000_000.0;
        info!(
            operation = self.inner.operation_name(),
            elapsed_ms = elapsed.num_milliseconds(),
            "[Performance] {} took {seconds:.3}s",
            self.inner.operation_name()
        );

        self.inner.record_execution(window);
        Ok(output)
    }
}

impl<H: RecordsExecution> RecordsExecution for Instrumented<H> {
    fn record_execution(&mut self, window: ExecutionWindow) {
        self.inner.record_execution(window);
    }

    fn execution_window(&self) -> Option<&ExecutionWindow> {
        self.inner.execution_window()
    }
}
