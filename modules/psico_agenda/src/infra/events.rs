use tokio::sync::broadcast;
use tracing::trace;

use crate::domain::events::DashboardEvent;
use crate::domain::ports::EventPublisher;

/// Adapter: implements the domain port and fans events out to subscribers.
/// Publishing with no subscriber is not an error.
#[derive(Clone)]
pub struct BroadcastPublisher {
    tx: broadcast::Sender<DashboardEvent>,
}

impl BroadcastPublisher {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.tx.subscribe()
    }
}

impl EventPublisher<DashboardEvent> for BroadcastPublisher {
    fn publish(&self, event: &DashboardEvent) {
        if self.tx.send(event.clone()).is_err() {
            trace!(seq = event.seq(), "no dashboard event subscribers");
        }
    }
}
