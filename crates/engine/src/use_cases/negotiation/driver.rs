//! Tokio harness around a [`NegotiationSession`].
//!
//! Inbound frames and fired timers arrive on one channel, so the session is
//! only ever mutated from the driver task.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::{ActionDecider, Effect, NegotiationSession, TimerEvent};

/// Buffer size for the driver's event channel.
const EVENT_CHANNEL_BUFFER: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub enum DriverEvent {
    /// Raw text frame from the game
    Inbound(String),
    Timer(TimerEvent),
}

/// Owns a session and its decider; runs until the outbound channel closes.
pub struct SessionDriver<D> {
    session: NegotiationSession,
    decider: D,
    outbound: mpsc::Sender<String>,
    events_tx: mpsc::Sender<DriverEvent>,
    events_rx: mpsc::Receiver<DriverEvent>,
}

/// Handle to a running driver. Dropping it stops the driver.
pub struct SessionHandle {
    events: mpsc::Sender<DriverEvent>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    /// Forwards an inbound text frame. Returns false once the driver has stopped.
    pub async fn send_text(&self, text: String) -> bool {
        self.events.send(DriverEvent::Inbound(text)).await.is_ok()
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl<D> SessionDriver<D>
where
    D: ActionDecider + 'static,
{
    /// `outbound` receives encoded JSON frames for the game.
    pub fn new(session: NegotiationSession, decider: D, outbound: mpsc::Sender<String>) -> Self {
        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_BUFFER);
        Self {
            session,
            decider,
            outbound,
            events_tx,
            events_rx,
        }
    }

    pub fn spawn(self) -> SessionHandle {
        let events = self.events_tx.clone();
        let task = tokio::spawn(self.run());
        SessionHandle { events, task }
    }

    pub async fn run(mut self) {
        while let Some(event) = self.events_rx.recv().await {
            let effects = match event {
                DriverEvent::Inbound(text) => self.session.handle_text(&text, &mut self.decider),
                DriverEvent::Timer(timer) => self.session.handle_timer(timer, &mut self.decider),
            };
            if !self.apply(effects).await {
                tracing::debug!("Outbound channel closed, stopping session driver");
                break;
            }
        }
    }

    async fn apply(&mut self, effects: Vec<Effect>) -> bool {
        for effect in effects {
            match effect {
                Effect::Send(message) => {
                    let json = match message.to_json() {
                        Ok(json) => json,
                        Err(e) => {
                            tracing::error!(error = %e, "Failed to encode outgoing message");
                            continue;
                        }
                    };
                    if self.outbound.send(json).await.is_err() {
                        return false;
                    }
                }
                Effect::Schedule { after, event } => {
                    let events = self.events_tx.clone();
                    tokio::spawn(async move {
                        tokio::time::sleep(after).await;
                        // The driver may be gone by now; that is fine.
                        let _ = events.send(DriverEvent::Timer(event)).await;
                    });
                }
            }
        }
        true
    }
}
