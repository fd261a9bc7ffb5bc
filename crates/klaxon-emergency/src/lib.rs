//! # Klaxon Emergency
//!
//! The four emergency variants and the facade that dispatches them.
//!
//! ```text
//! dispatch(kind) -> registry lookup -> Emergency::new (validated)
//!                -> FaultContainment(Instrumentation(evacuate))
//!                -> DispatchOutcome { outcome, execution_window }
//! ```

pub mod actions;
pub mod dispatch;
pub mod variant;

pub use actions::{AlertActions, PublicAddress};
pub use dispatch::{DispatchError, DispatchOutcome, Dispatcher, ReadyProbe, StatusEnvelope};
pub use klaxon_core::EmergencyKind;
pub use variant::{descriptor, Emergency, EvacuationReport};
