//! Dispatch and probe handlers

use anyhow::{Context, Result};
use klaxon_emergency::{Dispatcher, EmergencyKind, PublicAddress};
use tracing::info;

/// Trigger `kind` and print the status envelope
pub fn run(
    dispatcher: &Dispatcher<PublicAddress>,
    kind: &str,
    recipient: Option<&str>,
) -> Result<()> {
    let kind: EmergencyKind = kind.parse()?;
    let outcome = dispatcher.dispatch_to(kind, recipient)?;

    if let Some(window) = outcome.execution_window() {
        info!(
            dispatch_id = %outcome.dispatch_id(),
            started_at = %window.started_at(),
            elapsed_ms = window.elapsed().num_milliseconds(),
            "Evacuation window recorded"
        );
    }

    let body = serde_json::to_string_pretty(&outcome.status())
        .context("Failed to encode status envelope")?;
    println!("{body}");
    Ok(())
}

/// Print the ready message for `kind`
pub fn probe(dispatcher: &Dispatcher<PublicAddress>, kind: &str) -> Result<()> {
    let kind: EmergencyKind = kind.parse()?;
    let ready = dispatcher.probe(kind)?;
    println!("{}", ready.message);
    Ok(())
}
