use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::core::api::ApiClient;
use crate::core::state::{ViewEvent, ViewState};

/// Issues the view's network calls and reports their outcomes on a queue.
///
/// Requests run in spawned tasks; whoever owns the view subscribes and feeds
/// the events through [`ViewState::apply`]. Each subscriber gets its own
/// unbounded queue, so no outcome is ever dropped while it is listening.
/// Once a receiver is gone, its sender is pruned and late outcomes are dropped.
#[derive(Clone)]
pub struct EchoSession {
    client: Arc<ApiClient>,
    subscribers: Arc<Mutex<Vec<mpsc::UnboundedSender<ViewEvent>>>>,
    next_seq: Arc<AtomicU64>,
    initialized: Arc<AtomicBool>,
}

impl EchoSession {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client: Arc::new(client),
            subscribers: Arc::default(),
            next_seq: Arc::new(AtomicU64::new(0)),
            initialized: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<ViewEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.lock_subscribers().push(tx);
        rx
    }

    fn lock_subscribers(&self) -> std::sync::MutexGuard<'_, Vec<mpsc::UnboundedSender<ViewEvent>>> {
        self.subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Deliver `event` to every live subscriber. Returns how many got it.
    fn publish(&self, event: ViewEvent) -> usize {
        let mut subscribers = self.lock_subscribers();
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        subscribers.len()
    }

    /// Start the greeting fetch. Only the first call does anything.
    pub fn initialize(&self) -> bool {
        if self.initialized.swap(true, Ordering::SeqCst) {
            return false;
        }

        let session = self.clone();
        tokio::spawn(async move {
            let result = session.client.fetch_message().await;
            match &result {
                Ok(message) => info!(%message, "greeting loaded"),
                Err(e) => warn!(error = %e, "greeting request failed"),
            }
            if session.publish(ViewEvent::GreetingLoaded(result)) == 0 {
                debug!("view gone, dropping greeting");
            }
        });
        true
    }

    /// Send `text` to the echo endpoint and return the request's sequence number.
    pub fn submit_echo(&self, text: String) -> u64 {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;

        let session = self.clone();
        tokio::spawn(async move {
            let result = session.client.echo(&text).await;
            match &result {
                Ok(_) => info!(seq, "echo received"),
                Err(e) => warn!(seq, error = %e, "echo request failed"),
            }
            if session.publish(ViewEvent::EchoLoaded { seq, result }) == 0 {
                debug!(seq, "view gone, dropping echo");
            }
        });
        seq
    }
}

/// Headless MessageEchoView: owns the state and applies the session's events.
pub struct EchoView {
    session: EchoSession,
    events: mpsc::UnboundedReceiver<ViewEvent>,
    state: ViewState,
}

impl EchoView {
    pub fn new(client: ApiClient) -> Self {
        Self::with_session(EchoSession::new(client))
    }

    /// Attach a view to an existing session.
    pub fn with_session(session: EchoSession) -> Self {
        let default_text = session.client().config().default_text.clone();
        let events = session.subscribe();
        Self {
            session,
            events,
            state: ViewState::new(default_text),
        }
    }

    pub fn session(&self) -> &EchoSession {
        &self.session
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn initialize(&mut self) -> bool {
        let started = self.session.initialize();
        if started {
            self.state = self.state.apply(ViewEvent::GreetingRequested);
        }
        started
    }

    pub fn update_input_text(&mut self, value: impl Into<String>) {
        self.state = self.state.apply(ViewEvent::InputChanged(value.into()));
    }

    pub fn submit_echo(&mut self) -> u64 {
        let seq = self.session.submit_echo(self.state.input.clone());
        self.state = self.state.apply(ViewEvent::EchoRequested { seq });
        seq
    }

    /// Wait for the next network outcome and apply it.
    pub async fn next_event(&mut self) -> Option<ViewEvent> {
        let event = self.events.recv().await?;
        self.state = self.state.apply(event.clone());
        Some(event)
    }

    /// Apply events until nothing is in flight.
    pub async fn settle(&mut self) {
        while self.state.is_busy() {
            if self.next_event().await.is_none() {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ViewConfig;
    use serde_json::json;

    fn session() -> EchoSession {
        EchoSession::new(ApiClient::new(ViewConfig::default()))
    }

    #[test]
    fn publish_reaches_every_subscriber_without_dropping() {
        let session = session();
        let mut a = session.subscribe();
        let mut b = session.subscribe();

        for seq in 1..=200 {
            let event = ViewEvent::EchoLoaded {
                seq,
                result: Ok(json!(seq)),
            };
            assert_eq!(session.publish(event), 2);
        }

        for rx in [&mut a, &mut b] {
            let mut count = 0;
            while rx.try_recv().is_ok() {
                count += 1;
            }
            assert_eq!(count, 200);
        }
    }

    #[test]
    fn closed_subscribers_are_pruned() {
        let session = session();
        let kept = session.subscribe();
        drop(session.subscribe());

        assert_eq!(session.publish(ViewEvent::GreetingRequested), 1);
        drop(kept);
        assert_eq!(session.publish(ViewEvent::GreetingRequested), 0);
    }
}
