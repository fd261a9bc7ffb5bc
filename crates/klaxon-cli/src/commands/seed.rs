//! Demo seeding

use crate::demo;
use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use tracing::info;

/// Build the demo set and print per-user and per-priority counts
pub fn run(now: DateTime<Utc>) -> Result<()> {
    let demo = demo::build(now)?;
    info!(
        users = demo.users.len(),
        notifications = demo.log.len(),
        "Demo data built"
    );

    println!("Users:");
    for user in &demo.users {
        let email = user.email().map_or("-", |e| e.as_str());
        let received = demo.log.for_recipient(user.username()).len();
        println!("  {:<8} {email:<20} {received} notifications", user.username());
    }

    println!("By priority:");
    for (priority, count) in demo.log.count_by_priority() {
        println!("  {priority:<8} {count}");
    }

    let today = demo.log.count_since(now, Duration::days(1));
    println!("Last 24h: {today}");
    if let Some(latest) = demo.log.iter().max_by_key(|n| n.created_at()) {
        println!("Latest: {}", latest.summary());
    }
    Ok(())
}
