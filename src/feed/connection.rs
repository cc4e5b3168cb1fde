#![expect(
    clippy::module_name_repetitions,
    reason = "Connection types expose their domain in the name for clarity"
)]

use std::future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_stream::try_stream;
use futures::Stream;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, watch};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at, sleep, timeout};
use tokio_util::sync::CancellationToken;

use super::frame;
use super::machine::{Action, ConnectionState, FeedEvent, FeedMachine};
use super::types::response::MatchLiveUpdate;
use crate::Result;
use crate::discovery::DiscoveryTarget;
use crate::error::Error;
use crate::ws::{Config, Socket, Transport, TransportEvent, TungsteniteTransport, WsError};

/// Broadcast channel capacity for decoded live updates.
const BROADCAST_CAPACITY: usize = 1024;

/// Owns the feed connection for one [`DiscoveryTarget`].
///
/// A background task opens the socket, drives the protocol through
/// [`FeedMachine`], and reconnects according to [`Config::reconnect`] whenever
/// the socket closes or fails. Only one socket is ever live; every reconnect
/// opens a new one.
///
/// Dropping the connection disconnects it.
///
/// # Example
///
/// ```no_run
/// use futures::StreamExt as _;
/// use live_match_feed::discovery::Client;
/// use live_match_feed::feed::FeedConnection;
/// use live_match_feed::ws::Config;
///
/// # async fn run() -> live_match_feed::Result<()> {
/// let target = Client::default().discover("31234567").await?;
/// let connection = FeedConnection::new(target, Config::default())?;
/// connection.connect()?;
///
/// let mut updates = Box::pin(connection.updates());
/// while let Some(update) = updates.next().await {
///     let update = update?;
///     println!("{} {}-{}", update.en, update.sch, update.sca);
/// }
/// # Ok(())
/// # }
/// ```
pub struct FeedConnection<T: Transport = TungsteniteTransport> {
    inner: Arc<Inner<T>>,
}

struct Inner<T: Transport> {
    target: DiscoveryTarget,
    config: Config,
    transport: T,
    machine: Mutex<FeedMachine>,
    state_tx: watch::Sender<ConnectionState>,
    updates_tx: broadcast::Sender<MatchLiveUpdate>,
    cancel: CancellationToken,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl FeedConnection {
    /// Creates a connection over `tokio-tungstenite`. Nothing is opened until
    /// [`Self::connect`].
    pub fn new(target: DiscoveryTarget, config: Config) -> Result<Self> {
        Self::with_transport(target, config, TungsteniteTransport)
    }
}

impl<T: Transport> FeedConnection<T> {
    /// Creates a connection that opens its sockets through `transport`.
    pub fn with_transport(target: DiscoveryTarget, config: Config, transport: T) -> Result<Self> {
        let machine = FeedMachine::new(&target.topic)?;
        let (state_tx, _) = watch::channel(machine.state());
        let (updates_tx, _) = broadcast::channel(BROADCAST_CAPACITY);

        Ok(Self {
            inner: Arc::new(Inner {
                target,
                config,
                transport,
                machine: Mutex::new(machine),
                state_tx,
                updates_tx,
                cancel: CancellationToken::new(),
                task: Mutex::new(None),
            }),
        })
    }

    /// Starts the connection task on the current Tokio runtime.
    ///
    /// No-op while the task is already running. After the task gave up
    /// (see [`crate::ws::ReconnectConfig::max_attempts`]) this starts a new one.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::error::Kind::Validation`] error once
    /// [`Self::disconnect`] has been called, or when called outside a Tokio runtime.
    pub fn connect(&self) -> Result<()> {
        let runtime = Handle::try_current()
            .map_err(|_e| Error::validation("feed connection requires a Tokio runtime"))?;
        let mut task = lock(&self.inner.task);

        if lock(&self.inner.machine).is_disconnected() {
            return Err(Error::validation(
                "feed connection was explicitly disconnected",
            ));
        }
        if task.as_ref().is_some_and(|handle| !handle.is_finished()) {
            tracing::debug!("feed connection already running");
            return Ok(());
        }

        self.inner.transition(FeedMachine::connect);
        tracing::debug!(url = %self.inner.target.web_socket_url, "starting feed connection");
        *task = Some(runtime.spawn(run(Arc::clone(&self.inner))));

        Ok(())
    }

    /// Moves to [`ConnectionState::Disconnected`] for good: the open socket is
    /// asked to close and nothing is retried. Safe to call at any time.
    pub fn disconnect(&self) {
        self.inner.transition(FeedMachine::disconnect);
        self.inner.cancel.cancel();
    }

    /// Get the current connection state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        *self.inner.state_tx.borrow()
    }

    /// Subscribe to connection state changes.
    #[must_use]
    pub fn state_receiver(&self) -> watch::Receiver<ConnectionState> {
        self.inner.state_tx.subscribe()
    }

    /// Subscribe to decoded live updates.
    ///
    /// Each call returns a new independent receiver.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<MatchLiveUpdate> {
        self.inner.updates_tx.subscribe()
    }

    /// Stream of decoded live updates, ending on [`Self::disconnect`].
    ///
    /// A subscriber that falls behind gets a [`WsError::Lagged`] error, which
    /// ends the stream; [`Self::subscribe`] gives finer control over lagging.
    pub fn updates(&self) -> impl Stream<Item = Result<MatchLiveUpdate>> + use<T> {
        let mut rx = self.inner.updates_tx.subscribe();
        let cancel = self.inner.cancel.clone();

        try_stream! {
            loop {
                let received = tokio::select! {
                    biased;
                    received = rx.recv() => received,
                    () = cancel.cancelled() => break,
                };

                match received {
                    Ok(update) => yield update,
                    Err(RecvError::Lagged(n)) => {
                        tracing::warn!("Subscription lagged, missed {n} messages");
                        Err(WsError::Lagged { count: n })?;
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }
    }

    #[must_use]
    pub fn target(&self) -> &DiscoveryTarget {
        &self.inner.target
    }
}

impl<T: Transport> Drop for FeedConnection<T> {
    fn drop(&mut self) {
        self.disconnect();
    }
}

impl<T: Transport> Inner<T> {
    /// Runs `f` on the machine and publishes the resulting state if it changed.
    fn transition<R, F: FnOnce(&mut FeedMachine) -> R>(&self, f: F) -> R {
        let mut machine = lock(&self.machine);
        let result = f(&mut machine);
        let state = machine.state();

        self.state_tx.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                tracing::debug!(from = %current, to = %state, "feed connection state changed");
                *current = state;
                true
            }
        });

        result
    }

    /// Feeds `event` to the machine, publishes its updates and returns the
    /// frames to send, in order.
    fn dispatch(&self, event: FeedEvent) -> Vec<String> {
        self.transition(|machine| {
            machine
                .handle(event)
                .into_iter()
                .filter_map(|action| match action {
                    Action::Send(text) => Some(text),
                    Action::Publish(update) => {
                        // no receivers is fine
                        _ = self.updates_tx.send(update);
                        None
                    }
                })
                .collect()
        })
    }
}

enum Step {
    Cancelled,
    Event(TransportEvent),
    Ping,
}

/// Connection loop with automatic reconnection.
async fn run<T: Transport>(inner: Arc<Inner<T>>) {
    let reconnect = &inner.config.reconnect;
    let mut backoff = reconnect.backoff();
    let mut failures = 0_u32;

    loop {
        let attempt = tokio::select! {
            biased;
            () = inner.cancel.cancelled() => return,
            attempt = timeout(
                inner.config.connect_timeout,
                inner.transport.connect(&inner.target.web_socket_url),
            ) => attempt,
        };

        match attempt {
            Ok(Ok(socket)) => {
                failures = 0;
                backoff.reset();
                inner.dispatch(FeedEvent::Opened);
                drive(&inner, socket).await;
            }
            Ok(Err(e)) => {
                failures = failures.saturating_add(1);
                tracing::warn!("Unable to connect: {e}");
                inner.dispatch(FeedEvent::Errored(e.to_string()));
            }
            Err(_elapsed) => {
                failures = failures.saturating_add(1);
                tracing::warn!(timeout = ?inner.config.connect_timeout, "Unable to connect: {}", WsError::Timeout);
                inner.dispatch(FeedEvent::Errored(WsError::Timeout.to_string()));
            }
        }

        if inner.cancel.is_cancelled() {
            return;
        }
        if let Some(max) = reconnect.max_attempts
            && failures >= max
        {
            tracing::warn!(attempts = failures, "giving up on feed connection");
            return;
        }

        let Some(delay) = backoff.next_backoff() else {
            return;
        };
        tracing::debug!(?delay, failures, "scheduling reconnect");

        tokio::select! {
            biased;
            () = inner.cancel.cancelled() => return,
            () = sleep(delay) => {}
        }

        if !inner.transition(FeedMachine::connect) {
            return;
        }
    }
}

/// First tick one `period` from now; ticks missed during a stall are not replayed.
fn ping_timer(period: Duration) -> Interval {
    let mut timer = interval_at(Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}

/// Pumps one open socket until it ends or the connection is cancelled.
async fn drive<T: Transport>(inner: &Inner<T>, mut socket: T::Socket) {
    let mut ping = inner.config.ping_interval.map(ping_timer);

    loop {
        let step = tokio::select! {
            biased;
            () = inner.cancel.cancelled() => Step::Cancelled,
            event = socket.next_event() => Step::Event(event),
            () = tick(ping.as_mut()) => Step::Ping,
        };

        match step {
            Step::Cancelled => {
                socket.close().await;
                return;
            }
            Step::Ping => {
                if let Err(e) = socket.send(frame::encode_ping()).await {
                    inner.dispatch(FeedEvent::Errored(e.to_string()));
                    return;
                }
            }
            Step::Event(event) => {
                let (event, terminal) = match event {
                    TransportEvent::Text(text) => {
                        (FeedEvent::FrameReceived(frame::decode(&text)), false)
                    }
                    TransportEvent::Closed(reason) => (FeedEvent::Closed(reason), true),
                    TransportEvent::Errored(cause) => (FeedEvent::Errored(cause), true),
                };

                for text in inner.dispatch(event) {
                    if let Err(e) = socket.send(text).await {
                        inner.dispatch(FeedEvent::Errored(e.to_string()));
                        return;
                    }
                }

                if terminal {
                    return;
                }
            }
        }
    }
}

async fn tick(ping: Option<&mut Interval>) {
    match ping {
        Some(interval) => {
            interval.tick().await;
        }
        None => future::pending().await,
    }
}

fn lock<V>(mutex: &Mutex<V>) -> MutexGuard<'_, V> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
