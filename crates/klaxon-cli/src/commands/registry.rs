//! Registry listing

use anyhow::{Context, Result};
use klaxon_emergency::{Dispatcher, PublicAddress};

/// Print registered variant names, or full descriptors with `describe`
pub fn run(dispatcher: &Dispatcher<PublicAddress>, describe: bool) -> Result<()> {
    let registry = dispatcher.registry();

    if !describe {
        for name in registry.list() {
            println!("{name}");
        }
        return Ok(());
    }

    let descriptors = registry
        .list()
        .iter()
        .map(|name| registry.lookup(name))
        .collect::<Result<Vec<_>, _>>()?;
    let body =
        serde_json::to_string_pretty(&descriptors).context("Failed to encode descriptors")?;
    println!("{body}");
    Ok(())
}
