//! Session runtime: one task per tracked page.
//!
//! The task owns the [`PresenceSession`] and every timer. Page events,
//! timer fires, and dispatch completions are handled one at a time inside a
//! single `select!` loop, so no state is shared and nothing is locked.
//! Network writes run concurrently as futures polled by the same loop.

use std::sync::Arc;

use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use presence_core::config::TrackerConfig;
use presence_database::PresenceStore;
use presence_entity::PresenceStatus;

use crate::dispatch::{DispatchOutcome, UpdateDispatcher};
use crate::event::{InteractionKind, PageEvent, Visibility};
use crate::presence::session::{DispatchRequest, PresenceSession, SkipReason};
use crate::presence::state::{self, Transition, Trigger};
use crate::presence::visibility;
use crate::presence::{ActivityAggregator, HeartbeatScheduler, VisibilityMonitor};
use crate::transport::{BeaconTransport, PresenceGateway};

/// Messages from the handle to the session task.
#[derive(Debug)]
enum Command {
    Page(PageEvent),
    Dispatch {
        is_online: bool,
        force: bool,
        reply: Option<oneshot::Sender<DispatchOutcome>>,
    },
    SetEnabled(bool),
    Shutdown,
}

struct Completed {
    request: DispatchRequest,
    outcome: DispatchOutcome,
    reply: Option<oneshot::Sender<DispatchOutcome>>,
}

/// The session task's state.
pub struct PresenceTracker {
    config: TrackerConfig,
    session: PresenceSession,
    activity: ActivityAggregator,
    heartbeat: HeartbeatScheduler,
    visibility: VisibilityMonitor,
    dispatcher: UpdateDispatcher,
    beacon: Arc<dyn BeaconTransport>,
    in_flight: FuturesUnordered<BoxFuture<'static, Completed>>,
    commands: mpsc::UnboundedReceiver<Command>,
    status: watch::Sender<PresenceStatus>,
}

impl std::fmt::Debug for PresenceTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresenceTracker")
            .field("session", &self.session)
            .field("in_flight", &self.in_flight.len())
            .finish()
    }
}

impl PresenceTracker {
    /// Build a tracker and the handle that drives it. Nothing runs until
    /// [`PresenceTracker::run`] is awaited.
    pub fn new(
        config: TrackerConfig,
        dispatcher: UpdateDispatcher,
        beacon: Arc<dyn BeaconTransport>,
    ) -> (Self, PresenceHandle) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (status_tx, status_rx) = watch::channel(PresenceStatus::Offline);

        let tracker = Self {
            session: PresenceSession::new(&config, Instant::now()),
            activity: ActivityAggregator::new(config.activity_quiet()),
            heartbeat: HeartbeatScheduler::new(config.heartbeat_interval()),
            visibility: VisibilityMonitor::new(config.hidden_grace()),
            config,
            dispatcher,
            beacon,
            in_flight: FuturesUnordered::new(),
            commands: command_rx,
            status: status_tx,
        };
        let handle = PresenceHandle {
            commands: command_tx,
            status: status_rx,
        };
        (tracker, handle)
    }

    /// Spawn a tracker on the current runtime.
    pub fn spawn(
        config: TrackerConfig,
        gateway: Arc<dyn PresenceGateway>,
        fallback: Arc<dyn PresenceStore>,
        beacon: Arc<dyn BeaconTransport>,
    ) -> (PresenceHandle, JoinHandle<()>) {
        let dispatcher = UpdateDispatcher::new(gateway, fallback);
        let (tracker, handle) = Self::new(config, dispatcher, beacon);
        let task = tokio::spawn(tracker.run());
        (handle, task)
    }

    /// Run the session until it is unloaded, shut down, or every handle
    /// is dropped.
    pub async fn run(mut self) {
        self.start();

        loop {
            tokio::select! {
                biased;

                command = self.commands.recv() => match command {
                    Some(Command::Page(PageEvent::Unload)) => {
                        self.unload();
                        break;
                    }
                    Some(Command::Shutdown) | None => break,
                    Some(command) => self.handle_command(command),
                },
                Some(done) = self.in_flight.next(), if !self.in_flight.is_empty() => {
                    self.complete(done);
                }
                _ = self.visibility.grace_expired() => self.apply(Trigger::HiddenGraceExpired),
                _ = self.activity.pulse() => self.apply(Trigger::ActivityPulse),
                _ = self.heartbeat.tick() => self.apply(Trigger::HeartbeatTick),
            }
        }

        self.teardown();
    }

    fn start(&mut self) {
        if !self.session.is_tracking() {
            debug!(user_id = %self.session.user_id(), "Presence tracking inactive");
            return;
        }
        info!(
            user_id = %self.session.user_id(),
            heartbeat_ms = self.config.heartbeat_interval_ms,
            "Presence tracking started"
        );
        self.heartbeat.start();
        self.apply(Trigger::Initialize);
    }

    fn teardown(&mut self) {
        self.activity.cancel();
        self.heartbeat.stop();
        self.visibility.cancel();
        debug!(user_id = %self.session.user_id(), "Presence session torn down");
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Page(PageEvent::Interaction(kind)) => self.on_interaction(kind),
            Command::Page(PageEvent::VisibilityChanged(visibility)) => {
                self.on_visibility(visibility)
            }
            Command::Dispatch {
                is_online,
                force,
                reply,
            } => self.dispatch(is_online, force, reply),
            Command::SetEnabled(enabled) => self.set_enabled(enabled),
            Command::Page(PageEvent::Unload) | Command::Shutdown => {}
        }
    }

    fn on_interaction(&mut self, kind: InteractionKind) {
        if self.session.is_tracking() {
            self.activity.on_interaction(kind);
        }
    }

    fn on_visibility(&mut self, visibility: Visibility) {
        if !self.session.is_tracking() {
            return;
        }
        if self.visibility.on_change(&mut self.session, visibility) {
            self.apply(Trigger::PageVisible);
        }
    }

    fn set_enabled(&mut self, enabled: bool) {
        if enabled == self.config.enabled {
            return;
        }
        self.config.enabled = enabled;

        if enabled {
            self.session = PresenceSession::new(&self.config, Instant::now());
            self.start();
        } else {
            self.teardown();
            self.session.set_enabled(false);
            self.status.send_replace(PresenceStatus::Offline);
            info!(user_id = %self.session.user_id(), "Presence tracking disabled");
        }
    }

    fn apply(&mut self, trigger: Trigger) {
        let transition = state::on_trigger(&mut self.session, trigger, Instant::now());

        match transition {
            Transition::GoOnline | Transition::GoOffline => info!(
                user_id = %self.session.user_id(),
                ?trigger,
                ?transition,
                "Presence transition"
            ),
            Transition::Refresh | Transition::StayOffline | Transition::Ignore => {}
        }

        if let Some((is_online, force)) = transition.dispatch() {
            self.dispatch(is_online, force, None);
        }
    }

    fn dispatch(
        &mut self,
        is_online: bool,
        force: bool,
        reply: Option<oneshot::Sender<DispatchOutcome>>,
    ) {
        let request = match self.session.begin_dispatch(is_online, force, Instant::now()) {
            Ok(request) => request,
            Err(reason) => {
                if reason == SkipReason::Debounced {
                    debug!(user_id = %self.session.user_id(), "Presence refresh debounced");
                }
                if let Some(reply) = reply {
                    let _ = reply.send(DispatchOutcome::Skipped(reason));
                }
                return;
            }
        };

        let dispatcher = self.dispatcher.clone();
        self.in_flight.push(Box::pin(async move {
            let outcome = dispatcher.deliver(&request).await;
            Completed {
                request,
                outcome,
                reply,
            }
        }));
    }

    fn complete(&mut self, done: Completed) {
        // a write landing after disable must not revive the published status
        if done.outcome.is_delivered() && self.session.is_tracking() {
            self.session.confirm_dispatch(&done.request);
            self.status.send_replace(self.session.status());
        }
        if let Some(reply) = done.reply {
            let _ = reply.send(done.outcome);
        }
    }

    fn unload(&mut self) {
        let Some(payload) = visibility::teardown_payload(&self.session) else {
            return;
        };
        if !self.beacon.send_beacon(&payload) {
            warn!(user_id = %payload.user_id, "Offline beacon could not be queued");
        }
    }
}

/// Handle the embedding page uses to drive its session.
#[derive(Debug, Clone)]
pub struct PresenceHandle {
    commands: mpsc::UnboundedSender<Command>,
    status: watch::Receiver<PresenceStatus>,
}

impl PresenceHandle {
    /// Forward a page event. Returns `false` once the session is gone.
    pub fn page_event(&self, event: PageEvent) -> bool {
        self.commands.send(Command::Page(event)).is_ok()
    }

    pub fn interaction(&self, kind: InteractionKind) -> bool {
        self.page_event(PageEvent::Interaction(kind))
    }

    pub fn set_visibility(&self, visibility: Visibility) -> bool {
        self.page_event(PageEvent::VisibilityChanged(visibility))
    }

    /// Page teardown: send the offline beacon and end the session.
    pub fn unload(&self) -> bool {
        self.page_event(PageEvent::Unload)
    }

    /// Dispatch a presence write and wait for its outcome.
    pub async fn update_presence(&self, is_online: bool, force: bool) -> DispatchOutcome {
        let (tx, rx) = oneshot::channel();
        let command = Command::Dispatch {
            is_online,
            force,
            reply: Some(tx),
        };
        if self.commands.send(command).is_err() {
            return DispatchOutcome::Skipped(SkipReason::Disabled);
        }
        // the session ended with the write still in flight
        rx.await.unwrap_or(DispatchOutcome::Failed)
    }

    /// Forced offline write.
    pub async fn mark_offline(&self) -> DispatchOutcome {
        self.update_presence(false, true).await
    }

    /// Enable or disable tracking. Disabling tears the session down;
    /// re-enabling starts a fresh one.
    pub fn set_enabled(&self, enabled: bool) -> bool {
        self.commands.send(Command::SetEnabled(enabled)).is_ok()
    }

    /// The session's locally believed presence.
    pub fn status(&self) -> PresenceStatus {
        *self.status.borrow()
    }

    pub fn is_online(&self) -> bool {
        self.status().is_online()
    }

    /// Receiver notified whenever a delivered write changes the local status.
    pub fn subscribe(&self) -> watch::Receiver<PresenceStatus> {
        self.status.clone()
    }

    /// End the session without sending a beacon.
    pub fn shutdown(&self) {
        let _ = self.commands.send(Command::Shutdown);
    }
}
