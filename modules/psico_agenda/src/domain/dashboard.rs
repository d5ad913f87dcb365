use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::contract::{
    client::SchedulingApi,
    error::SchedulingError,
    model::{Appointment, Patient, Request, Role, Session},
};
use crate::domain::events::{DashboardEvent, RefreshTrigger};
use crate::domain::ports::{Clock, EventPublisher};
use crate::domain::view::{derive_view_by, DashboardView, DEFAULT_UPCOMING_LIMIT};

/// How a completed fetch is treated when a later-issued fetch already landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StalePolicy {
    /// Apply every completion in the order completions run.
    #[default]
    LastWriterWins,
    /// Drop completions whose sequence number is older than the last applied one.
    DiscardStale,
}

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub upcoming_limit: usize,
    pub stale_policy: StalePolicy,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            upcoming_limit: DEFAULT_UPCOMING_LIMIT,
            stale_policy: StalePolicy::default(),
        }
    }
}

/// The three collections fetched on every refresh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardData {
    pub appointments: Vec<Appointment>,
    pub patients: Vec<Patient>,
    pub requests: Vec<Request>,
}

/// Immutable picture of the dashboard state at one point in time.
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub data: Arc<DashboardData>,
    pub view: Arc<DashboardView>,
    /// Sequence number of the refresh that produced this state (0 before any).
    pub applied_seq: u64,
    /// True until the first refresh completes, successfully or not.
    pub loading: bool,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    Applied { seq: u64 },
    /// The fetch failed and the dashboard fell back to empty collections.
    AppliedEmpty { seq: u64, error: SchedulingError },
    Discarded { seq: u64, latest_applied: u64 },
}

/// Psychologist dashboard view-model.
///
/// Fetches appointments, patients and requests for the session user and keeps
/// the derived view. All state changes are whole-snapshot replacements.
pub struct Dashboard {
    api: Arc<dyn SchedulingApi>,
    session: Arc<Session>,
    events: Arc<dyn EventPublisher<DashboardEvent>>,
    clock: Arc<dyn Clock>,
    config: DashboardConfig,
    issued: AtomicU64,
    state: RwLock<DashboardSnapshot>,
}

impl Dashboard {
    pub fn new(
        api: Arc<dyn SchedulingApi>,
        session: Arc<Session>,
        events: Arc<dyn EventPublisher<DashboardEvent>>,
        clock: Arc<dyn Clock>,
        config: DashboardConfig,
    ) -> Self {
        let initial = DashboardSnapshot {
            data: Arc::new(DashboardData::default()),
            view: Arc::new(DashboardView::empty(&session.user, &clock.now())),
            applied_seq: 0,
            loading: true,
            last_error: None,
        };
        Self {
            api,
            session,
            events,
            clock,
            config,
            issued: AtomicU64::new(0),
            state: RwLock::new(initial),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        self.state.read().clone()
    }

    pub fn view(&self) -> Arc<DashboardView> {
        self.state.read().view.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.read().loading
    }

    /// Number of refreshes issued so far.
    pub fn issued(&self) -> u64 {
        self.issued.load(Ordering::Acquire)
    }

    /// Fetch the three collections for `user_id` concurrently.
    #[instrument(name = "psico_agenda.dashboard.load", skip(self))]
    pub async fn load(&self, user_id: &str) -> Result<DashboardData, SchedulingError> {
        let (appointments, patients, requests) = tokio::try_join!(
            self.api.get_appointments(user_id, Role::Psychologist),
            self.api.get_patients(user_id),
            self.api.get_requests(user_id),
        )?;
        debug!(
            appointments = appointments.len(),
            patients = patients.len(),
            requests = requests.len(),
            "collections fetched"
        );
        Ok(DashboardData {
            appointments,
            patients,
            requests,
        })
    }

    /// Re-fetch everything and replace the state with the result.
    ///
    /// Never fails: a fetch error is logged and the dashboard shows empty
    /// collections until the next refresh.
    #[instrument(
        name = "psico_agenda.dashboard.refresh",
        skip(self),
        fields(user_id = %self.session.user.id, seq = tracing::field::Empty)
    )]
    pub async fn refresh(&self, trigger: RefreshTrigger) -> RefreshOutcome {
        let seq = self.issued.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::Span::current().record("seq", seq);
        debug!(?trigger, "refresh issued");

        let result = self.load(&self.session.user.id).await;
        self.complete(seq, trigger, result)
    }

    fn complete(
        &self,
        seq: u64,
        trigger: RefreshTrigger,
        result: Result<DashboardData, SchedulingError>,
    ) -> RefreshOutcome {
        let now = self.clock.now();
        let at = now.with_timezone(&Utc);

        let (data, error) = match result {
            Ok(data) => (data, None),
            Err(e) => {
                warn!(error = %e, ?trigger, "failed to load dashboard data");
                (DashboardData::default(), Some(e))
            }
        };

        let view = derive_view_by(
            &data.appointments,
            &data.patients,
            &data.requests,
            &self.session.user,
            &now,
            |day| self.clock.calendar_day(day),
            self.config.upcoming_limit,
        );

        let mut state = self.state.write();
        if self.config.stale_policy == StalePolicy::DiscardStale && seq < state.applied_seq {
            let latest_applied = state.applied_seq;
            drop(state);
            debug!(latest_applied, "stale completion discarded");
            self.events.publish(&DashboardEvent::StaleDiscarded {
                seq,
                latest_applied,
                at,
            });
            return RefreshOutcome::Discarded {
                seq,
                latest_applied,
            };
        }

        *state = DashboardSnapshot {
            data: Arc::new(data),
            view: Arc::new(view),
            applied_seq: seq,
            loading: false,
            last_error: error.as_ref().map(ToString::to_string),
        };
        drop(state);

        match error {
            None => {
                info!(?trigger, "dashboard refreshed");
                self.events
                    .publish(&DashboardEvent::Refreshed { seq, trigger, at });
                RefreshOutcome::Applied { seq }
            }
            Some(error) => {
                self.events.publish(&DashboardEvent::RefreshFailed {
                    seq,
                    trigger,
                    reason: error.to_string(),
                    at,
                });
                RefreshOutcome::AppliedEmpty { seq, error }
            }
        }
    }
}
