//! # Klaxon Composition
//!
//! Cross-cutting behavior composed around variant operations at startup:
//!
//! - [`registry`]: process-wide map of composed variant types
//! - [`instrument`]: timing layer that records an execution window on success
//! - [`containment`]: outermost layer that turns failures into an [`Outcome`]
//! - [`validate`]: required-field checks run after construction
//! - [`trace`]: entry/exit logging for sub-actions
//!
//! The chain is always `FaultContainment(Instrumentation(operation))`; see
//! [`compose`].

pub mod containment;
pub mod instrument;
pub mod layer;
pub mod registry;
pub mod trace;
pub mod validate;

pub use containment::{FaultContained, FaultContainment, Outcome};
pub use instrument::{Instrumentation, Instrumented};
pub use layer::{Layer, Operation, OperationExt, RecordsExecution};
pub use registry::{global, RegistryError, VariantDescriptor, VariantRegistry};
pub use trace::traced;
pub use validate::{construct_validated, RequiredFields};

use klaxon_core::Clock;
use std::sync::Arc;

/// Fully composed operation
pub type Composed<H> = FaultContained<Instrumented<H>>;

/// Wrap `operation` in instrumentation, then fault containment
pub fn compose<H>(operation: H, clock: Arc<dyn Clock>) -> Composed<H>
where
    H: Operation + RecordsExecution,
{
    operation
        .with(Instrumentation::new(clock))
        .with(FaultContainment)
}
