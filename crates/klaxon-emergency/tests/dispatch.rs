//! Dispatch facade end to end

use assert_matches::assert_matches;
use chrono::{DateTime, Duration, Utc};
use klaxon_composition::{global, RegistryError, VariantDescriptor, VariantRegistry};
use klaxon_core::{DispatchConfig, ManualClock, OperationError};
use klaxon_emergency::{
    AlertActions, DispatchError, Dispatcher, EmergencyKind, PublicAddress, StatusEnvelope,
};
use serial_test::serial;
use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(1_760_000_000, 0).unwrap()
}

fn stepping_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(epoch()).with_step(Duration::milliseconds(15)))
}

fn dispatcher<A: AlertActions + Clone>(actions: A) -> Dispatcher<A> {
    let dispatcher = Dispatcher::new(Arc::new(VariantRegistry::new()), stepping_clock(), actions);
    dispatcher.compose_variants(&EmergencyKind::ALL).unwrap();
    dispatcher
}

/// Speaker system that is always down
#[derive(Clone)]
struct DeadSpeaker;

impl AlertActions for DeadSpeaker {
    fn set_alarm(&self) -> Result<String, OperationError> {
        Ok("Alarm activated".into())
    }

    fn speaker(&self) -> Result<String, OperationError> {
        Err(OperationError::action_failed("speaker", "amplifier offline"))
    }

    fn send_notification(&self, _: &str, _: Option<&str>) -> Result<String, OperationError> {
        Ok("unreachable".into())
    }
}

/// Relay driver that panics instead of returning an error
#[derive(Clone)]
struct PanickingSpeaker;

impl AlertActions for PanickingSpeaker {
    fn set_alarm(&self) -> Result<String, OperationError> {
        Ok("Alarm activated".into())
    }

    fn speaker(&self) -> Result<String, OperationError> {
        panic!("relay driver fault")
    }

    fn send_notification(&self, _: &str, _: Option<&str>) -> Result<String, OperationError> {
        Ok("unreachable".into())
    }
}

/// Counts every action and records the last notification target
#[derive(Clone, Default)]
struct Counting {
    calls: Rc<Cell<u32>>,
    last_recipient: Rc<Cell<Option<&'static str>>>,
}

impl AlertActions for Counting {
    fn set_alarm(&self) -> Result<String, OperationError> {
        self.calls.set(self.calls.get() + 1);
        PublicAddress.set_alarm()
    }

    fn speaker(&self) -> Result<String, OperationError> {
        self.calls.set(self.calls.get() + 1);
        PublicAddress.speaker()
    }

    fn send_notification(
        &self,
        message: &str,
        recipient: Option<&str>,
    ) -> Result<String, OperationError> {
        self.calls.set(self.calls.get() + 1);
        self.last_recipient.set(match recipient {
            Some("abi") => Some("abi"),
            Some(_) => Some("other"),
            None => None,
        });
        PublicAddress.send_notification(message, recipient)
    }
}

#[test]
fn test_fire_dispatch_completes_with_window() {
    let outcome = dispatcher(PublicAddress)
        .dispatch(EmergencyKind::Fire)
        .unwrap();

    assert!(outcome.is_completed());
    let report = outcome.report().unwrap();
    assert!(report.notification.contains("evacuate immediately"));

    let window = outcome.execution_window().unwrap();
    assert!(window.finished_at() >= window.started_at());
    assert_eq!(window.started_at(), epoch());
}

#[test]
fn test_every_kind_dispatches() {
    let dispatcher = dispatcher(PublicAddress);
    for kind in EmergencyKind::ALL {
        let outcome = dispatcher.dispatch(kind).unwrap();
        assert_eq!(outcome.kind(), kind);
        assert_eq!(
            outcome.report().map(|r| r.notification.clone()),
            Some(format!("Notification sent: {}", kind.notification_message()))
        );
    }
}

#[test]
fn test_status_envelope_shapes() {
    let ok = dispatcher(PublicAddress)
        .dispatch(EmergencyKind::Flood)
        .unwrap();
    assert_eq!(
        serde_json::to_value(ok.status()).unwrap(),
        serde_json::json!({ "status": "Evacuation Flood triggered" })
    );

    let failed = dispatcher(DeadSpeaker)
        .dispatch(EmergencyKind::Flood)
        .unwrap();
    assert_eq!(
        serde_json::to_value(failed.status()).unwrap(),
        serde_json::json!({ "error": "Flood.evacuate: speaker failed: amplifier offline" })
    );
}

#[test]
fn test_inner_failure_is_contained() {
    let outcome = dispatcher(DeadSpeaker)
        .dispatch(EmergencyKind::Security)
        .unwrap();

    assert!(!outcome.is_completed());
    assert!(outcome.execution_window().is_none());
    assert_matches!(
        outcome.failure(),
        Some(OperationError::ActionFailed { action, .. }) if action == "speaker"
    );
    assert_matches!(outcome.status(), StatusEnvelope::Failed { .. });
    assert_eq!(outcome.into_report(), None);
}

#[test]
fn test_panicking_action_is_contained() {
    let dispatcher = dispatcher(PanickingSpeaker);
    let outcome = dispatcher.dispatch(EmergencyKind::Fire).unwrap();

    assert!(!outcome.is_completed());
    assert!(outcome.execution_window().is_none());
    assert_matches!(
        outcome.failure(),
        Some(OperationError::Interrupted { reason }) if reason.contains("relay driver fault")
    );
    assert_matches!(outcome.status(), StatusEnvelope::Failed { error } if error.starts_with("Fire.evacuate"));

    // The dispatcher keeps working after the panic
    assert!(dispatcher.dispatch(EmergencyKind::Fire).is_ok());
}

#[test]
fn test_unregistered_kind_fails_before_construction() {
    let actions = Counting::default();
    let dispatcher = Dispatcher::new(
        Arc::new(VariantRegistry::new()),
        stepping_clock(),
        actions.clone(),
    );
    dispatcher
        .compose_variants(&[EmergencyKind::Fire])
        .unwrap();

    assert_matches!(
        dispatcher.dispatch(EmergencyKind::Epidemic),
        Err(DispatchError::Registry(RegistryError::NotRegistered { name })) if name == "Epidemic"
    );
    assert_matches!(
        dispatcher.dispatch_by_name("Earthquake"),
        Err(DispatchError::Registry(RegistryError::NotRegistered { .. }))
    );
    assert_eq!(actions.calls.get(), 0);

    dispatcher.dispatch(EmergencyKind::Fire).unwrap();
    assert_eq!(actions.calls.get(), 3);
}

#[test]
fn test_dispatch_by_name_resolves_registered_kind() {
    let dispatcher = dispatcher(PublicAddress);
    let outcome = dispatcher.dispatch_by_name("Epidemic").unwrap();
    assert_eq!(outcome.kind(), EmergencyKind::Epidemic);

    dispatcher
        .registry()
        .register("Drill", VariantDescriptor::new("Drill"))
        .unwrap();
    assert_matches!(
        dispatcher.dispatch_by_name("Drill"),
        Err(DispatchError::UnknownKind { name }) if name == "Drill"
    );
}

#[test]
fn test_recipient_is_forwarded() {
    let actions = Counting::default();
    let dispatcher = dispatcher(actions.clone());

    dispatcher
        .dispatch_to(EmergencyKind::Security, Some("abi"))
        .unwrap();
    assert_eq!(actions.last_recipient.get(), Some("abi"));

    dispatcher.dispatch(EmergencyKind::Security).unwrap();
    assert_eq!(actions.last_recipient.get(), None);
}

#[test]
fn test_probe_reports_ready() {
    let dispatcher = dispatcher(PublicAddress);
    assert_eq!(
        dispatcher.probe(EmergencyKind::Epidemic).unwrap().message,
        "Evacuation Epidemic ready"
    );
}

#[test]
fn test_each_dispatch_gets_its_own_id() {
    let dispatcher = dispatcher(PublicAddress);
    let a = dispatcher.dispatch(EmergencyKind::Fire).unwrap();
    let b = dispatcher.dispatch(EmergencyKind::Fire).unwrap();
    assert_ne!(a.dispatch_id(), b.dispatch_id());
}

#[test]
fn test_from_config_registers_enabled_kinds_and_freezes() {
    let config = DispatchConfig {
        enabled_kinds: vec![EmergencyKind::Fire, EmergencyKind::Flood],
        freeze_registry: true,
    };
    let dispatcher = Dispatcher::from_config(
        &config,
        Arc::new(VariantRegistry::new()),
        stepping_clock(),
        PublicAddress,
    )
    .unwrap();

    assert_eq!(dispatcher.registry().list(), vec!["Fire", "Flood"]);
    assert!(dispatcher.registry().is_frozen());
    assert_matches!(
        dispatcher.probe(EmergencyKind::Security),
        Err(DispatchError::Registry(RegistryError::NotRegistered { .. }))
    );
    assert_matches!(
        dispatcher.compose_variants(&[EmergencyKind::Security]),
        Err(RegistryError::Frozen { .. })
    );
}

#[test]
fn test_duplicate_composition_overwrites_in_place() {
    let dispatcher = dispatcher(PublicAddress);
    dispatcher
        .compose_variants(&[EmergencyKind::Fire, EmergencyKind::Epidemic])
        .unwrap();
    assert_eq!(
        dispatcher.registry().list(),
        vec!["Epidemic", "Fire", "Flood", "Security"]
    );
}

#[test]
#[serial]
fn test_global_registry_dispatch() {
    let registry = global();
    registry.clear();

    let dispatcher = Dispatcher::from_config(
        &DispatchConfig::default(),
        Arc::clone(&registry),
        stepping_clock(),
        PublicAddress,
    )
    .unwrap();
    assert_eq!(
        global().list(),
        vec!["Epidemic", "Fire", "Flood", "Security"]
    );
    assert!(dispatcher.dispatch(EmergencyKind::Fire).unwrap().is_completed());

    registry.clear();
}
