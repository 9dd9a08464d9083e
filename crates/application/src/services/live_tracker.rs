//! Live bus tracking
//!
//! Polls the transit directory for one bus's position on a fixed interval,
//! recomputes distance and ETA against the rider's last known position, and
//! raises a one-shot proximity alert through [`TrackingEventsPort`].
//!
//! Every session owns its own state. Stopping a session (explicitly or by
//! dropping its [`TrackingHandle`]) marks it stopped under the session lock,
//! so no update, alert or notice is emitted after that point even if a
//! request is still in flight.

use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use domain::{Coordinate, ProximityAlert, TrackingPolicy, TrackingSession, TransitId};
use parking_lot::ReentrantMutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::error::ApplicationError;
use crate::ports::{
    LocationPort, PermissionStatus, TrackingEventsPort, TrackingNotice, TransitDirectoryPort,
};

/// Default time between two directory polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Tracking loop settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackingConfig {
    /// Time between two directory polls
    pub poll_interval: Duration,
    /// Speed and alert threshold
    pub policy: TrackingPolicy,
    /// Re-read the device position on every tick instead of only until the first fix
    pub follow_user: bool,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            policy: TrackingPolicy::default(),
            follow_user: false,
        }
    }
}

/// Starts tracking sessions
pub struct LiveTracker {
    directory: Arc<dyn TransitDirectoryPort>,
    location: Arc<dyn LocationPort>,
    config: TrackingConfig,
}

impl fmt::Debug for LiveTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveTracker")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl LiveTracker {
    /// Create a tracker over the given directory and location provider
    pub fn new(
        directory: Arc<dyn TransitDirectoryPort>,
        location: Arc<dyn LocationPort>,
        config: TrackingConfig,
    ) -> Self {
        Self {
            directory,
            location,
            config,
        }
    }

    /// Tracking settings in use
    #[must_use]
    pub const fn config(&self) -> &TrackingConfig {
        &self.config
    }

    /// Start polling for one bus
    ///
    /// The first poll runs immediately, then every `poll_interval`. Must be
    /// called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot enter its waiting phase.
    #[instrument(skip(self, events), fields(bus = %tracked_id))]
    pub fn start(
        &self,
        tracked_id: TransitId,
        events: Arc<dyn TrackingEventsPort>,
    ) -> Result<TrackingHandle, ApplicationError> {
        let mut session = TrackingSession::new(tracked_id.clone());
        session.begin()?;
        let session_id = session.id();

        let shared = Arc::new(SharedSession {
            session: ReentrantMutex::new(RefCell::new(session)),
            events,
            policy: self.config.policy,
        });
        let (stop_tx, stop_rx) = watch::channel(false);

        let worker = TrackingWorker {
            directory: Arc::clone(&self.directory),
            location: Arc::clone(&self.location),
            shared: Arc::clone(&shared),
            tracked_id,
            follow_user: self.config.follow_user,
            permission: None,
        };

        info!(
            session_id = %session_id,
            interval_secs = self.config.poll_interval.as_secs_f64(),
            "Starting live tracking"
        );
        let task = tokio::spawn(worker.run(self.config.poll_interval, stop_rx));

        Ok(TrackingHandle {
            shared,
            stop_tx,
            task: Some(task),
        })
    }
}

/// Owner of a running tracking session
///
/// Dropping the handle cancels the session.
pub struct TrackingHandle {
    shared: Arc<SharedSession>,
    stop_tx: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl fmt::Debug for TrackingHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackingHandle")
            .field("session_id", &self.session_id())
            .field("running", &!self.is_finished())
            .finish_non_exhaustive()
    }
}

impl TrackingHandle {
    /// Identifier of the underlying session
    #[must_use]
    pub fn session_id(&self) -> Uuid {
        self.shared.read(TrackingSession::id)
    }

    /// Copy of the current session state
    #[must_use]
    pub fn snapshot(&self) -> TrackingSession {
        self.shared.read(TrackingSession::clone)
    }

    /// Push a fresh rider position from the presentation layer
    ///
    /// Ignored once the session is stopped.
    pub fn update_user_coordinate(&self, coordinate: Coordinate) {
        self.shared
            .apply(|session, policy| session.update_user_coordinate(coordinate, policy));
    }

    /// Whether the polling task has exited
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Mark the session stopped and signal the polling task
    ///
    /// Takes effect immediately: nothing is emitted once this returns.
    pub fn cancel(&self) {
        let was_running = {
            let guard = self.shared.session.lock();
            let mut session = guard.borrow_mut();
            let was_running = !session.is_stopped();
            session.stop();
            was_running
        };
        if was_running {
            debug!(session_id = %self.session_id(), "Tracking session cancelled");
        }
        // Receiver is gone only if the task already exited
        let _ = self.stop_tx.send(true);
    }

    /// Cancel the session and wait for the polling task to exit
    pub async fn stop(mut self) -> TrackingSession {
        self.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    warn!(error = %e, "Tracking task ended abnormally");
                }
            }
        }
        self.snapshot()
    }
}

impl Drop for TrackingHandle {
    fn drop(&mut self) {
        self.cancel();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// State shared by the handle and the polling task
///
/// The lock is re-entrant and held while events are emitted, so a sink may
/// read the session or cancel it from inside a callback. The `RefCell`
/// borrow is always released before an event goes out.
struct SharedSession {
    session: ReentrantMutex<RefCell<TrackingSession>>,
    events: Arc<dyn TrackingEventsPort>,
    policy: TrackingPolicy,
}

impl SharedSession {
    fn read<R>(&self, f: impl FnOnce(&TrackingSession) -> R) -> R {
        let guard = self.session.lock();
        let session = guard.borrow();
        f(&session)
    }

    /// Mutate the session and emit the resulting events, unless stopped
    fn apply(
        &self,
        mutate: impl FnOnce(&mut TrackingSession, &TrackingPolicy) -> Option<ProximityAlert>,
    ) {
        let guard = self.session.lock();
        let (snapshot, alert) = {
            let mut session = guard.borrow_mut();
            if session.is_stopped() {
                return;
            }
            let alert = mutate(&mut session, &self.policy);
            (session.clone(), alert)
        };
        self.events.on_update(&snapshot);

        let Some(alert) = alert else { return };
        if guard.borrow().is_stopped() {
            return;
        }
        info!(
            bus = %alert.tracked_id,
            distance_km = alert.distance_km,
            eta_minutes = alert.eta_minutes,
            "Bus within alert threshold"
        );
        self.events.on_proximity_alert(&alert);
    }

    fn notice(&self, notice: &TrackingNotice) {
        let guard = self.session.lock();
        if guard.borrow().is_stopped() {
            return;
        }
        self.events.on_notice(notice);
    }

    fn is_stopped(&self) -> bool {
        self.read(TrackingSession::is_stopped)
    }

    fn has_user_coordinate(&self) -> bool {
        self.read(|session| session.last_user_coordinate().is_some())
    }
}

struct TrackingWorker {
    directory: Arc<dyn TransitDirectoryPort>,
    location: Arc<dyn LocationPort>,
    shared: Arc<SharedSession>,
    tracked_id: TransitId,
    follow_user: bool,
    permission: Option<PermissionStatus>,
}

impl TrackingWorker {
    async fn run(mut self, poll_interval: Duration, mut stop_rx: watch::Receiver<bool>) {
        let mut ticker = interval(poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = stop_rx.changed() => break,
                _ = ticker.tick() => {},
            }
            if self.shared.is_stopped() {
                break;
            }

            // An in-flight poll is dropped as soon as a stop arrives
            tokio::select! {
                biased;
                _ = stop_rx.changed() => break,
                () = self.poll_once() => {},
            }
        }

        debug!(bus = %self.tracked_id, "Live tracking loop exited");
    }

    async fn poll_once(&mut self) {
        if self.follow_user || !self.shared.has_user_coordinate() {
            self.refresh_user_coordinate().await;
        }
        self.refresh_bus_coordinate().await;
    }

    async fn refresh_user_coordinate(&mut self) {
        let status = match self.permission {
            Some(status) => status,
            None => {
                let status = self.location.request_permission().await;
                self.permission = Some(status);
                if !status.is_granted() {
                    warn!("Location permission denied, distance cannot be computed");
                    self.shared.notice(&TrackingNotice::PermissionDenied);
                }
                status
            },
        };
        if !status.is_granted() {
            return;
        }

        match self.location.current_coordinate().await {
            Ok(coordinate) => {
                self.shared
                    .apply(|session, policy| session.update_user_coordinate(coordinate, policy));
            },
            Err(e) if e.is_permission_denied() => {
                warn!(error = %e, "Location permission revoked");
                self.permission = Some(PermissionStatus::Denied);
                self.shared.notice(&TrackingNotice::PermissionDenied);
            },
            Err(e) => {
                if e.is_retryable() {
                    warn!(error = %e, "Failed to read device location");
                } else {
                    error!(error = %e, "Device location lookup failed");
                }
                self.shared
                    .notice(&TrackingNotice::UserLocationUnavailable(e.to_string()));
            },
        }
    }

    async fn refresh_bus_coordinate(&self) {
        let detail = match self.directory.get_bus(&self.tracked_id).await {
            Ok(Some(record)) => match record.current_location() {
                Some(coordinate) => {
                    debug!(bus = %self.tracked_id, location = %coordinate, "Bus position received");
                    self.shared
                        .apply(|session, policy| session.record_bus_coordinate(coordinate, policy));
                    return;
                },
                None => "bus has not reported a location".to_string(),
            },
            Ok(None) => format!("bus {} not found", self.tracked_id),
            Err(e) if e.is_retryable() => e.to_string(),
            Err(e) => {
                error!(bus = %self.tracked_id, error = %e, "Directory lookup failed");
                e.to_string()
            },
        };

        warn!(bus = %self.tracked_id, reason = %detail, "Failed to fetch bus location");
        self.shared
            .notice(&TrackingNotice::BusLocationUnavailable(detail));
    }
}
