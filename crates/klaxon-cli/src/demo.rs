//! Demo campus data
//!
//! Four users and thirteen notifications spread over the last six days.

use chrono::{DateTime, Duration, Utc};
use klaxon_core::{Notification, NotificationLog, Priority, User, ValidationError};

const DEMO_PHONE: &str = "+243997026364";

/// (username, email, first name, last name)
const DEMO_USERS: [(&str, &str, &str, &str); 4] = [
    ("manda", "manda@campus.com", "manda", "b"),
    ("david", "david@campus.com", "david", "b"),
    ("abi", "abi@campus.com", "abi", "b"),
    ("plamse", "plams@campus.com", "plamse", "b"),
];

/// (user index, message, priority, days ago)
const DEMO_NOTIFICATIONS: [(usize, &str, Priority, i64); 13] = [
    (0, "FIRE ALERT - Immediate evacuation of building A required. Go to the main assembly point.", Priority::High, 0),
    (0, "Scheduled electrical maintenance tomorrow 9:00-12:00 in rooms 201-210. Plan an alternative.", Priority::Medium, 0),
    (0, "Reminder: quarterly evacuation drill next Friday at 14:30.", Priority::Low, 1),
    (0, "FLOOD ALERT - The basement is flooded. Evacuate the affected areas immediately.", Priority::High, 2),
    (1, "New sanitary procedure: masks are mandatory in the laboratories.", Priority::Medium, 0),
    (1, "Renovation work: parking B is closed from the 15th to the 20th.", Priority::Low, 1),
    (1, "Planned power cut: save your work before 17:00 today.", Priority::High, 3),
    (2, "SECURITY EMERGENCY - Intrusion reported in building C. Stay in your rooms.", Priority::High, 0),
    (2, "Updated evacuation plan available on the intranet.", Priority::Low, 2),
    (2, "Heatwave expected: precautions are active. Drink water regularly.", Priority::Medium, 4),
    (3, "New access control procedure: badge required from Monday.", Priority::Medium, 1),
    (3, "Emergency numbers updated. See the notices in the halls.", Priority::Low, 3),
    (3, "Fire alarm test this Thursday at 10:00. Estimated duration: 15 minutes.", Priority::Medium, 5),
];

/// Seeded users and their notifications
#[derive(Debug)]
pub struct DemoData {
    /// Users in seeding order
    pub users: Vec<User>,
    /// Every seeded notification
    pub log: NotificationLog,
}

/// Build the demo set relative to `now`
pub fn build(now: DateTime<Utc>) -> Result<DemoData, ValidationError> {
    let users = DEMO_USERS
        .iter()
        .map(|(username, email, first, last)| -> Result<User, ValidationError> {
            let mut user = User::new(*username)?.with_names(*first, *last);
            user.set_email(email)?;
            user.set_phone(DEMO_PHONE)?;
            Ok(user)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut log = NotificationLog::new();
    for (index, message, priority, days_ago) in DEMO_NOTIFICATIONS {
        let created_at = now - Duration::days(days_ago);
        log.push(Notification::new(&users[index], message, created_at).with_priority(priority));
    }

    Ok(DemoData { users, log })
}
