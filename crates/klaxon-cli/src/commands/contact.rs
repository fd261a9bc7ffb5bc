//! Contact field checks
//!
//! Runs operator-supplied values through the same validated fields a user
//! record uses, in the order email, phone, priority, window.

use anyhow::{bail, Result};
use clap::Args;
use klaxon_core::{User, ValidationError};

/// Values to validate
#[derive(Debug, Default, Args)]
pub struct CheckContactArgs {
    /// Email address, e.g. manda@campus.com
    #[arg(long)]
    pub email: Option<String>,

    /// Phone number in international form, e.g. +243997026364
    #[arg(long)]
    pub phone: Option<String>,

    /// Priority (LOW, MEDIUM, HIGH, URGENT)
    #[arg(long)]
    pub priority: Option<String>,

    /// Availability window as <rfc3339>/<rfc3339>
    #[arg(long)]
    pub window: Option<String>,
}

impl CheckContactArgs {
    fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.phone.is_none()
            && self.priority.is_none()
            && self.window.is_none()
    }
}

/// Validate each supplied value, returning one line per accepted field
pub fn check(args: &CheckContactArgs) -> Result<Vec<String>, ValidationError> {
    let mut user = User::new("contact-check")?;
    let mut accepted = Vec::new();

    if let Some(raw) = &args.email {
        user.set_email(raw)?;
        accepted.push(format!("email    ok  {raw}"));
    }
    if let Some(raw) = &args.phone {
        user.set_phone(raw)?;
        accepted.push(format!("phone    ok  {raw}"));
    }
    if let Some(raw) = &args.priority {
        user.set_priority(raw)?;
        accepted.push(format!("priority ok  {}", user.priority()));
    }
    if let Some(raw) = &args.window {
        user.set_time_window(raw)?;
        if let Some(window) = user.time_window() {
            let seconds = window.duration().num_seconds();
            accepted.push(format!("window   ok  {window} ({seconds}s)"));
        }
    }

    Ok(accepted)
}

/// Print accepted fields; error on the first rejected one
pub fn run(args: &CheckContactArgs) -> Result<()> {
    if args.is_empty() {
        bail!("Nothing to check; pass at least one of --email, --phone, --priority, --window");
    }
    for line in check(args)? {
        println!("{line}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_all_fields_accepted() {
        let args = CheckContactArgs {
            email: Some("abi@campus.com".into()),
            phone: Some("+243997026364".into()),
            priority: Some("HIGH".into()),
            window: Some("2026-03-01T08:00:00Z/2026-03-01T17:00:00Z".into()),
        };
        let lines = check(&args).unwrap();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[2], "priority ok  HIGH");
        assert!(lines[3].ends_with("(32400s)"));
    }

    #[test]
    fn test_stops_at_first_rejection() {
        let args = CheckContactArgs {
            email: Some("not-an-email".into()),
            phone: Some("12".into()),
            ..Default::default()
        };
        assert_matches!(check(&args), Err(ValidationError::Email { .. }));
    }

    #[test]
    fn test_lowercase_priority_rejected() {
        let args = CheckContactArgs {
            priority: Some("high".into()),
            ..Default::default()
        };
        assert_matches!(check(&args), Err(ValidationError::Priority { value }) if value == "high");
    }

    #[test]
    fn test_run_requires_some_input() {
        assert!(run(&CheckContactArgs::default()).is_err());
    }
}
