use chrono::{DateTime, Utc};
use serde::Serialize;

/// What initiated a refresh of the dashboard collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshTrigger {
    /// First display of the dashboard.
    Mount,
    /// The host window regained input focus.
    Focus,
    /// Periodic timer.
    Tick,
    /// Explicit request by the caller.
    Manual,
}

/// Transport-agnostic dashboard event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DashboardEvent {
    Refreshed {
        seq: u64,
        trigger: RefreshTrigger,
        at: DateTime<Utc>,
    },
    RefreshFailed {
        seq: u64,
        trigger: RefreshTrigger,
        reason: String,
        at: DateTime<Utc>,
    },
    StaleDiscarded {
        seq: u64,
        latest_applied: u64,
        at: DateTime<Utc>,
    },
}

impl DashboardEvent {
    pub fn seq(&self) -> u64 {
        match self {
            DashboardEvent::Refreshed { seq, .. }
            | DashboardEvent::RefreshFailed { seq, .. }
            | DashboardEvent::StaleDiscarded { seq, .. } => *seq,
        }
    }
}
