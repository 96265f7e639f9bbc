use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::broadcast;

use ecocore_types::events::GatewayEvent;

/// Fans telemetry events out to every connected dashboard client.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

struct DispatcherInner {
    /// Broadcast channel for gateway events; all connected clients receive all events
    broadcast_tx: broadcast::Sender<GatewayEvent>,

    /// Connected-client gauge, for logging only.
    connected: AtomicUsize,
}

impl Dispatcher {
    pub fn new() -> Self {
        let (broadcast_tx, _) = broadcast::channel(64);
        Self {
            inner: Arc::new(DispatcherInner {
                broadcast_tx,
                connected: AtomicUsize::new(0),
            }),
        }
    }

    /// Subscribe to gateway events. Returns a broadcast receiver.
    pub fn subscribe(&self) -> broadcast::Receiver<GatewayEvent> {
        self.inner.broadcast_tx.subscribe()
    }

    /// Broadcast an event to all connected clients. Never blocks; with no
    /// subscribers the event is simply dropped.
    pub fn broadcast(&self, event: GatewayEvent) {
        let _ = self.inner.broadcast_tx.send(event);
    }

    /// Record a new connection. Returns the new client count.
    pub fn client_connected(&self) -> usize {
        self.inner.connected.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Record a disconnect. Returns the new client count.
    pub fn client_disconnected(&self) -> usize {
        self.inner
            .connected
            .fetch_sub(1, Ordering::Relaxed)
            .saturating_sub(1)
    }

    pub fn client_count(&self) -> usize {
        self.inner.connected.load(Ordering::Relaxed)
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecocore_types::telemetry::TelemetrySnapshot;

    #[tokio::test]
    async fn broadcast_reaches_all_subscribers() {
        let dispatcher = Dispatcher::new();
        let mut rx_a = dispatcher.subscribe();
        let mut rx_b = dispatcher.subscribe();

        dispatcher.broadcast(GatewayEvent::UpdateData(TelemetrySnapshot::baseline()));

        assert!(matches!(rx_a.recv().await, Ok(GatewayEvent::UpdateData(_))));
        assert!(matches!(rx_b.recv().await, Ok(GatewayEvent::UpdateData(_))));
    }

    #[test]
    fn client_gauge_tracks_connections() {
        let dispatcher = Dispatcher::new();
        assert_eq!(dispatcher.client_count(), 0);
        assert_eq!(dispatcher.client_connected(), 1);
        assert_eq!(dispatcher.client_connected(), 2);
        assert_eq!(dispatcher.client_disconnected(), 1);
        assert_eq!(dispatcher.client_count(), 1);
    }
}
