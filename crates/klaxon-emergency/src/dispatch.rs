//! Dispatch facade
//!
//! External entry point for triggering evacuations. Each dispatch checks the
//! registry, builds a fresh [`Emergency`], wraps it in the composed chain and
//! runs it once. Failures inside the chain come back as a contained
//! [`Outcome`]; only lookup and construction errors are returned as `Err`.

use crate::actions::AlertActions;
use crate::variant::{descriptor, Emergency, EvacuationReport};
use klaxon_composition::{compose, Outcome, RegistryError, VariantRegistry};
use klaxon_core::{
    Clock, ConfigurationError, DispatchConfig, EmergencyKind, ExecutionWindow, OperationError,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

/// Errors raised before an evacuation runs
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// Kind or name absent from the registry
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Instance failed post-construction validation
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Registered name does not correspond to an emergency kind
    #[error("Registered variant '{name}' is not an emergency kind")]
    UnknownKind {
        /// Registry key that was looked up
        name: String,
    },
}

/// Response body for a trigger request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatusEnvelope {
    /// Evacuation completed
    Triggered {
        /// Human-readable status
        status: String,
    },
    /// Evacuation failed and was contained
    Failed {
        /// Failure description
        error: String,
    },
}

/// Response body for the read-only probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadyProbe {
    /// `Evacuation <Name> ready`
    pub message: String,
}

/// Result of one dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    dispatch_id: Uuid,
    kind: EmergencyKind,
    name: String,
    outcome: Outcome<EvacuationReport>,
    execution_window: Option<ExecutionWindow>,
}

impl DispatchOutcome {
    /// Unique id of this dispatch, carried in logs
    pub fn dispatch_id(&self) -> Uuid {
        self.dispatch_id
    }

    /// Kind dispatched
    pub fn kind(&self) -> EmergencyKind {
        self.kind
    }

    /// Whether the evacuation completed
    pub fn is_completed(&self) -> bool {
        self.outcome.is_completed()
    }

    /// Completed report
    pub fn report(&self) -> Option<&EvacuationReport> {
        self.outcome.as_option()
    }

    /// Why the evacuation was contained
    pub fn failure(&self) -> Option<&OperationError> {
        self.outcome.failure()
    }

    /// Full outcome
    pub fn outcome(&self) -> &Outcome<EvacuationReport> {
        &self.outcome
    }

    /// Completed report, discarding the failure reason
    pub fn into_report(self) -> Option<EvacuationReport> {
        self.outcome.into_option()
    }

    /// Window recorded on the instance; `None` when the run was contained
    pub fn execution_window(&self) -> Option<&ExecutionWindow> {
        self.execution_window.as_ref()
    }

    /// Status envelope for the trigger response
    pub fn status(&self) -> StatusEnvelope {
        match &self.outcome {
            Outcome::Completed(_) => StatusEnvelope::Triggered {
                status: format!("Evacuation {} triggered", self.name),
            },
            Outcome::Contained { operation, reason } => StatusEnvelope::Failed {
                error: format!("{operation}: {reason}"),
            },
        }
    }
}

/// Builds and runs composed emergency variants
pub struct Dispatcher<A> {
    registry: Arc<VariantRegistry>,
    clock: Arc<dyn Clock>,
    actions: A,
}

impl<A> std::fmt::Debug for Dispatcher<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl<A: AlertActions + Clone> Dispatcher<A> {
    /// Dispatcher over `registry`; nothing is registered yet
    pub fn new(registry: Arc<VariantRegistry>, clock: Arc<dyn Clock>, actions: A) -> Self {
        Self {
            registry,
            clock,
            actions,
        }
    }

    /// Register `enabled_kinds` and freeze the registry if configured
    ///
    /// # Errors
    ///
    /// Fails if the registry is already frozen.
    pub fn from_config(
        config: &DispatchConfig,
        registry: Arc<VariantRegistry>,
        clock: Arc<dyn Clock>,
        actions: A,
    ) -> Result<Self, DispatchError> {
        let dispatcher = Self::new(registry, clock, actions);
        dispatcher.compose_variants(&config.enabled_kinds)?;
        if config.freeze_registry {
            dispatcher.registry.freeze();
        }
        Ok(dispatcher)
    }

    /// Register each kind's descriptor, in order
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Frozen`] if the registry no longer accepts writes.
    pub fn compose_variants(&self, kinds: &[EmergencyKind]) -> Result<(), RegistryError> {
        for kind in kinds {
            self.registry.register(kind.display_name(), descriptor(*kind))?;
        }
        Ok(())
    }

    /// Registry this dispatcher reads
    pub fn registry(&self) -> &Arc<VariantRegistry> {
        &self.registry
    }

    /// Read-only readiness check for a registered kind
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotRegistered`] for a kind that was not composed.
    pub fn probe(&self, kind: EmergencyKind) -> Result<ReadyProbe, DispatchError> {
        self.registry.lookup(kind.display_name())?;
        Ok(ReadyProbe {
            message: format!("Evacuation {kind} ready"),
        })
    }

    /// Trigger an evacuation broadcast to everyone
    ///
    /// # Errors
    ///
    /// Fails if `kind` is not registered or the instance fails validation.
    pub fn dispatch(&self, kind: EmergencyKind) -> Result<DispatchOutcome, DispatchError> {
        self.dispatch_to(kind, None)
    }

    /// Trigger an evacuation, notifying only `recipient` when given
    ///
    /// # Errors
    ///
    /// Fails if `kind` is not registered or the instance fails validation.
    pub fn dispatch_to(
        &self,
        kind: EmergencyKind,
        recipient: Option<&str>,
    ) -> Result<DispatchOutcome, DispatchError> {
        self.registry.lookup(kind.display_name())?;
        self.run(kind, recipient)
    }

    /// Trigger an evacuation by registry name
    ///
    /// # Errors
    ///
    /// Fails with not-registered before anything is constructed, or with
    /// [`DispatchError::UnknownKind`] if the entry is not an emergency kind.
    pub fn dispatch_by_name(&self, name: &str) -> Result<DispatchOutcome, DispatchError> {
        let entry = self.registry.lookup(name)?;
        let kind = entry
            .type_name
            .parse::<EmergencyKind>()
            .map_err(|_| DispatchError::UnknownKind {
                name: name.to_string(),
            })?;
        self.run(kind, None)
    }

    fn run(
        &self,
        kind: EmergencyKind,
        recipient: Option<&str>,
    ) -> Result<DispatchOutcome, DispatchError> {
        let dispatch_id = Uuid::new_v4();
        let mut emergency = Emergency::new(kind, self.actions.clone())?;
        if let Some(recipient) = recipient {
            emergency = emergency.with_recipient(recipient);
        }
        let name = emergency.name().to_string();
        debug!(%dispatch_id, %kind, "Variant constructed");

        let mut chain = compose(emergency, Arc::clone(&self.clock));
        let outcome = chain.run();
        let execution_window = chain.execution_window().copied();

        info!(
            %dispatch_id,
            %kind,
            completed = outcome.is_completed(),
            "Dispatch finished"
        );

        Ok(DispatchOutcome {
            dispatch_id,
            kind,
            name,
            outcome,
            execution_window,
        })
    }
}
