use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Package lifecycle status
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PackageStatus {
    #[default]
    Created,
    PickedUp,
    InTransit,
    OutForDelivery,
    Delivered,
    Exception,
    Cancelled,
}

impl PackageStatus {
    pub const ALL: [PackageStatus; 7] = [
        PackageStatus::Created,
        PackageStatus::PickedUp,
        PackageStatus::InTransit,
        PackageStatus::OutForDelivery,
        PackageStatus::Delivered,
        PackageStatus::Exception,
        PackageStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PackageStatus::Created => "CREATED",
            PackageStatus::PickedUp => "PICKED_UP",
            PackageStatus::InTransit => "IN_TRANSIT",
            PackageStatus::OutForDelivery => "OUT_FOR_DELIVERY",
            PackageStatus::Delivered => "DELIVERED",
            PackageStatus::Exception => "EXCEPTION",
            PackageStatus::Cancelled => "CANCELLED",
        }
    }

    /// Human readable label ("OUT FOR DELIVERY")
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }

    /// Delivered and cancelled packages no longer move
    pub fn is_terminal(&self) -> bool {
        matches!(self, PackageStatus::Delivered | PackageStatus::Cancelled)
    }

    pub fn active() -> impl Iterator<Item = PackageStatus> {
        Self::ALL.into_iter().filter(|s| !s.is_terminal())
    }

    pub fn next(&self) -> PackageStatus {
        let idx = Self::ALL.iter().position(|s| s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> PackageStatus {
        let idx = Self::ALL.iter().position(|s| s == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// One reported status transition
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PackageEvent {
    pub status: PackageStatus,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl PackageEvent {
    pub fn location(&self) -> Option<(f64, f64)> {
        self.lat.zip(self.lon)
    }
}

/// A tracked shipment as reported by the backend.
///
/// `event_history` is appended to by the server only; the client never edits it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Package {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,
    pub package_id: String,
    pub current_status: PackageStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_lon: Option<f64>,
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub event_history: Vec<PackageEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eta: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_status_timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_stuck_alert_triggered: bool,
}

impl Package {
    pub fn location(&self) -> Option<(f64, f64)> {
        self.current_lat.zip(self.current_lon)
    }

    /// Event history ordered newest first. Events sharing a timestamp keep
    /// their server order.
    pub fn history_newest_first(&self) -> Vec<&PackageEvent> {
        let mut events: Vec<&PackageEvent> = self.event_history.iter().collect();
        events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        events
    }
}

/// Backend-generated notification that a package looks stuck
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(alias = "_id")]
    pub id: String,
    pub package_id: String,
    pub message: String,
    #[serde(alias = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub resolved: bool,
}

/// Payload submitted to create a package or record a new event for one.
/// A missing `package_id` asks the backend to create a new package.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PackageUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_id: Option<String>,
    pub status: PackageStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// What the backend answers to a create/update.
///
/// Decoded leniently: the server returns either the stored package or a
/// short acknowledgement, and only these two fields matter to the client.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct SubmitReceipt {
    #[serde(default)]
    pub package_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
