use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::domain::dashboard::Dashboard;
use crate::domain::events::RefreshTrigger;

/// Default period of the timer trigger.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5);

/// Drives a dashboard's refresh triggers: mount, focus regain and timer.
///
/// Every trigger starts an independent refresh. Refreshes are never coalesced
/// or cancelled, so two in flight at once both complete and apply their
/// results in completion order (subject to the dashboard's stale policy).
pub struct RefreshLoop;

/// Control handle for a running refresh loop.
pub struct RefreshHandle {
    focus_tx: mpsc::UnboundedSender<()>,
    cancel: CancellationToken,
    join: JoinHandle<()>,
}

impl RefreshLoop {
    /// A zero `interval` falls back to [`DEFAULT_REFRESH_INTERVAL`].
    pub fn spawn(
        dashboard: Arc<Dashboard>,
        interval: Duration,
        cancel: CancellationToken,
    ) -> RefreshHandle {
        let interval = if interval.is_zero() {
            warn!(
                fallback_ms = DEFAULT_REFRESH_INTERVAL.as_millis() as u64,
                "zero refresh interval, using default"
            );
            DEFAULT_REFRESH_INTERVAL
        } else {
            interval
        };
        let (focus_tx, focus_rx) = mpsc::unbounded_channel();
        let join = tokio::spawn(run(dashboard, interval, cancel.clone(), focus_rx));
        RefreshHandle {
            focus_tx,
            cancel,
            join,
        }
    }
}

impl RefreshHandle {
    /// Host window regained input focus.
    pub fn focus(&self) {
        if self.focus_tx.send(()).is_err() {
            debug!("focus ignored: refresh loop already stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        !self.join.is_finished()
    }

    /// Stop firing triggers and wait for refreshes already in flight.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(e) = self.join.await {
            warn!(error = %e, "refresh loop task ended abnormally");
        }
    }
}

async fn run(
    dashboard: Arc<Dashboard>,
    period: Duration,
    cancel: CancellationToken,
    mut focus_rx: mpsc::UnboundedReceiver<()>,
) {
    info!(
        user_id = %dashboard.session().user.id,
        interval_ms = period.as_millis() as u64,
        "refresh loop started"
    );

    let mut inflight = JoinSet::new();
    let fire = |inflight: &mut JoinSet<()>, trigger: RefreshTrigger| {
        let dashboard = dashboard.clone();
        inflight.spawn(async move {
            dashboard.refresh(trigger).await;
        });
    };

    fire(&mut inflight, RefreshTrigger::Mount);

    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut focus_open = true;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => fire(&mut inflight, RefreshTrigger::Tick),
            msg = focus_rx.recv(), if focus_open => match msg {
                Some(()) => fire(&mut inflight, RefreshTrigger::Focus),
                None => focus_open = false,
            },
            Some(res) = inflight.join_next(), if !inflight.is_empty() => {
                if let Err(e) = res {
                    warn!(error = %e, "refresh task failed");
                }
            }
        }
    }

    // Triggers are gone; fetches already issued still land.
    while let Some(res) = inflight.join_next().await {
        if let Err(e) = res {
            warn!(error = %e, "refresh task failed");
        }
    }
    info!("refresh loop stopped");
}
