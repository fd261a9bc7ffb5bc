//! Emergency kinds
//!
//! The closed set of emergencies an operator can trigger. Each kind owns its
//! display name and the fixed notification text sent during evacuation.

use crate::errors::KlaxonError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of campus emergency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum EmergencyKind {
    /// Outbreak requiring sanitary measures
    Epidemic,
    /// Fire in a building
    Fire,
    /// Water ingress on lower floors
    Flood,
    /// Intrusion or other security incident
    Security,
}

impl EmergencyKind {
    /// Every kind, in registration order
    pub const ALL: [EmergencyKind; 4] = [
        EmergencyKind::Epidemic,
        EmergencyKind::Fire,
        EmergencyKind::Flood,
        EmergencyKind::Security,
    ];

    /// Default instance name and registry key
    pub fn display_name(&self) -> &'static str {
        match self {
            EmergencyKind::Epidemic => "Epidemic",
            EmergencyKind::Fire => "Fire",
            EmergencyKind::Flood => "Flood",
            EmergencyKind::Security => "Security",
        }
    }

    /// Fixed notification body sent on evacuation
    pub fn notification_message(&self) -> &'static str {
        match self {
            EmergencyKind::Epidemic => "wear a mask",
            EmergencyKind::Fire => "evacuate immediately",
            EmergencyKind::Flood => "move to upper floor",
            EmergencyKind::Security => "follow security instructions",
        }
    }

    /// Qualified name of the evacuation operation, used in logs
    pub fn operation_name(&self) -> &'static str {
        match self {
            EmergencyKind::Epidemic => "Epidemic.evacuate",
            EmergencyKind::Fire => "Fire.evacuate",
            EmergencyKind::Flood => "Flood.evacuate",
            EmergencyKind::Security => "Security.evacuate",
        }
    }
}

impl fmt::Display for EmergencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for EmergencyKind {
    type Err = KlaxonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.display_name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| KlaxonError::not_found(format!("unknown emergency kind '{s}'")))
    }
}

impl TryFrom<String> for EmergencyKind {
    type Error = KlaxonError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
