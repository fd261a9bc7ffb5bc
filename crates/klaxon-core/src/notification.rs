//! Notifications and delivery channels
//!
//! A notification copies its recipient's priority and time window when it is
//! created. Later changes to the user do not flow into existing notifications.

use crate::fields::{Priority, TimeWindow};
use crate::user::User;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Characters of the message shown by [`Notification::summary`]
const SUMMARY_CHARS: usize = 30;

/// Delivery channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Text message
    Sms,
    /// Mobile push
    #[default]
    Push,
    /// Email
    Email,
}

impl Channel {
    /// Lowercase channel name
    pub fn channel_name(&self) -> &'static str {
        match self {
            Channel::Sms => "sms",
            Channel::Push => "push",
            Channel::Email => "email",
        }
    }
}

impl Channel {
    /// Notification attributes this channel's template carries, in order
    pub fn template_fields(&self) -> &'static [&'static str] {
        match self {
            Channel::Sms => &["recipient", "message"],
            Channel::Push => &["recipient", "message", "priority"],
            Channel::Email => &["recipient", "message", "priority", "time_window"],
        }
    }

    /// Template description, e.g. `sms template: recipient, message`
    pub fn render_template(&self) -> String {
        format!("{self} template: {}", self.template_fields().join(", "))
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.channel_name())
    }
}

/// Message sent to one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    id: Uuid,
    recipient: Option<String>,
    message: String,
    priority: Priority,
    time_window: Option<TimeWindow>,
    created_at: DateTime<Utc>,
    channel: Channel,
}

impl Notification {
    /// Create a notification, snapshotting the recipient's priority and window
    pub fn new(recipient: &User, message: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            recipient: Some(recipient.username().to_string()),
            message: message.into(),
            priority: recipient.priority(),
            time_window: recipient.time_window().copied(),
            created_at,
            channel: Channel::default(),
        }
    }

    /// Override the snapshotted priority
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Choose the delivery channel
    pub fn with_channel(mut self, channel: Channel) -> Self {
        self.channel = channel;
        self
    }

    /// Unique identifier
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Recipient username, `None` once the user was removed
    pub fn recipient(&self) -> Option<&str> {
        self.recipient.as_deref()
    }

    /// Message body
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Priority at creation time
    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// Recipient's availability window at creation time
    pub fn time_window(&self) -> Option<&TimeWindow> {
        self.time_window.as_ref()
    }

    /// Creation timestamp
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Delivery channel
    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// One-line description: `Notification to <user> : <start of message>`
    pub fn summary(&self) -> String {
        let recipient = self.recipient.as_deref().unwrap_or("nobody");
        let preview: String = self.message.chars().take(SUMMARY_CHARS).collect();
        format!("Notification to {recipient} : {preview}")
    }
}

impl Notification {
    /// Fill the channel template with this notification's values
    ///
    /// Produces one `field=value` pair per template field, joined by `; `.
    /// Missing optional values render as `-`.
    pub fn render(&self) -> String {
        self.channel
            .template_fields()
            .iter()
            .map(|field| {
                let value = match *field {
                    "recipient" => self.recipient.clone().unwrap_or_else(|| "-".to_string()),
                    "message" => self.message.clone(),
                    "priority" => self.priority.to_string(),
                    "time_window" => self
                        .time_window
                        .map_or_else(|| "-".to_string(), |window| window.to_string()),
                    _ => "-".to_string(),
                };
                format!("{field}={value}")
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// In-memory, creation-ordered notification list
#[derive(Debug, Clone, Default)]
pub struct NotificationLog {
    entries: Vec<Notification>,
}

impl NotificationLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a notification
    pub fn push(&mut self, notification: Notification) {
        self.entries.push(notification);
    }

    /// Number of notifications
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All notifications in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter()
    }

    /// Notifications addressed to `username`, newest first
    pub fn for_recipient(&self, username: &str) -> Vec<&Notification> {
        let mut matching: Vec<&Notification> = self
            .entries
            .iter()
            .filter(|n| n.recipient() == Some(username))
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching
    }

    /// Notification count per priority; every priority is present
    pub fn count_by_priority(&self) -> BTreeMap<Priority, usize> {
        let mut counts: BTreeMap<Priority, usize> =
            Priority::ALL.into_iter().map(|p| (p, 0)).collect();
        for notification in &self.entries {
            *counts.entry(notification.priority).or_default() += 1;
        }
        counts
    }

    /// Notifications created in `[now - window, now]`
    pub fn count_since(&self, now: DateTime<Utc>, window: Duration) -> usize {
        let cutoff = now - window;
        self.entries
            .iter()
            .filter(|n| n.created_at >= cutoff && n.created_at <= now)
            .count()
    }

    /// Detach a removed user; their notifications stay with no recipient
    pub fn detach_recipient(&mut self, username: &str) -> usize {
        let mut detached = 0;
        for notification in &mut self.entries {
            if notification.recipient.as_deref() == Some(username) {
                notification.recipient = None;
                detached += 1;
            }
        }
        detached
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_channel_templates() {
        assert_eq!(Channel::Sms.render_template(), "sms template: recipient, message");
        assert_eq!(
            Channel::Email.render_template(),
            "email template: recipient, message, priority, time_window"
        );
    }

    #[test]
    fn test_render_fills_channel_fields() {
        let user = user_with_priority("david", Priority::Urgent);
        let notification = Notification::new(&user, "power cut at 17:00", base_time());
        assert_eq!(
            notification.render(),
            "recipient=david; message=power cut at 17:00; priority=URGENT"
        );

        let sms = notification.clone().with_channel(Channel::Sms);
        assert_eq!(sms.render(), "recipient=david; message=power cut at 17:00");

        let email = notification.with_channel(Channel::Email);
        assert!(email.render().ends_with("priority=URGENT; time_window=-"));
    }

    fn user_with_priority(name: &str, priority: Priority) -> User {
        let mut user = User::new(name).unwrap();
        user.set_priority_level(priority);
        user
    }

    #[test]
    fn test_snapshot_is_not_live() {
        let mut user = user_with_priority("abi", Priority::High);
        let window = TimeWindow::new(base_time(), base_time() + Duration::hours(8)).unwrap();
        user.set_time_window_value(window);

        let notification = Notification::new(&user, "Intrusion reported in building C", base_time());
        user.set_priority_level(Priority::Low);
        user.set_time_window("2026-06-01T00:00:00Z/2026-06-02T00:00:00Z").unwrap();

        assert_eq!(notification.priority(), Priority::High);
        assert_eq!(notification.time_window(), Some(&window));
    }

    #[test]
    fn test_summary_truncates_by_characters() {
        let user = User::new("plamse").unwrap();
        let notification = Notification::new(
            &user,
            "Évacuation immédiate du bâtiment A requise maintenant",
            base_time(),
        );
        assert_eq!(
            notification.summary(),
            "Notification to plamse : Évacuation immédiate du bâtime"
        );
    }

    #[test]
    fn test_log_queries() {
        let manda = user_with_priority("manda", Priority::High);
        let david = user_with_priority("david", Priority::Medium);
        let now = base_time();

        let mut log = NotificationLog::new();
        log.push(Notification::new(&manda, "older", now - Duration::days(3)));
        log.push(Notification::new(&manda, "newer", now - Duration::hours(1)));
        log.push(Notification::new(&david, "today", now).with_channel(Channel::Sms));

        let for_manda = log.for_recipient("manda");
        assert_eq!(for_manda.len(), 2);
        assert_eq!(for_manda[0].message(), "newer");

        let counts = log.count_by_priority();
        assert_eq!(counts[&Priority::High], 2);
        assert_eq!(counts[&Priority::Medium], 1);
        assert_eq!(counts[&Priority::Urgent], 0);

        assert_eq!(log.count_since(now, Duration::hours(24)), 2);
        assert_eq!(log.count_since(now, Duration::days(7)), 3);
    }

    #[test]
    fn test_detach_keeps_notifications() {
        let user = User::new("abi").unwrap();
        let mut log = NotificationLog::new();
        log.push(Notification::new(&user, "hello", base_time()));

        assert_eq!(log.detach_recipient("abi"), 1);
        assert_eq!(log.len(), 1);
        assert!(log.iter().all(|n| n.recipient().is_none()));
        assert!(log.iter().all(|n| n.summary().starts_with("Notification to nobody")));
    }

    #[test]
    fn test_channel_names() {
        assert_eq!(Channel::Sms.channel_name(), "sms");
        assert_eq!(Channel::Email.to_string(), "email");
        assert_eq!(Channel::default(), Channel::Push);
    }
}
