//! Shared application state and the countdown/command domain model.

pub mod countdown;
pub mod effects;
pub mod settings;
mod sse;
pub mod target;
pub mod viewers;

use std::{sync::Arc, time::Instant};

use dashmap::DashMap;
use tokio::sync::{Mutex, RwLock, watch};
use uuid::Uuid;

use crate::{
    config::AppConfig,
    dao::relay_store::RelayStore,
    state::{
        countdown::CountdownEngine,
        effects::EffectDispatcher,
        settings::{CommandTracker, SettingsRecord},
        viewers::ViewerEstimator,
    },
};

pub use self::sse::SseHub;
use self::sse::SseState;

/// Cheaply-cloneable handle to the central application state.
pub type SharedState = Arc<AppState>;

/// Countdown engine and effect dispatcher, locked together so one tick
/// observes and mutates both atomically.
#[derive(Debug, Default)]
pub struct CountdownRuntime {
    /// Phase computation and celebration latch.
    pub engine: CountdownEngine,
    /// At-most-once effect decisions.
    pub dispatcher: EffectDispatcher,
}

/// Central application state shared by routes, services, and background
/// tasks.
///
/// The settings row held here is the last-known image; it keeps the
/// countdown ticking even while the storage layer is unavailable.
pub struct AppState {
    config: AppConfig,
    relay: RwLock<Option<Arc<dyn RelayStore>>>,
    sse: SseState,
    settings: RwLock<SettingsRecord>,
    tracker: Mutex<CommandTracker>,
    runtime: Mutex<CountdownRuntime>,
    estimator: Mutex<ViewerEstimator>,
    viewers_online: DashMap<Uuid, Instant>,
    degraded: watch::Sender<bool>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application starts in degraded mode until a storage backend is installed.
    pub fn new(config: AppConfig) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        let estimator = ViewerEstimator::new(config.viewer_seed(), config.viewer_floor());
        // The baseline matches the initial in-memory row, so the first
        // admin bump is a real edge even while storage is still down.
        let mut tracker = CommandTracker::new();
        tracker.reseed(&SettingsRecord::default());
        Arc::new(Self {
            config,
            relay: RwLock::new(None),
            sse: SseState::new(16, 16),
            settings: RwLock::new(SettingsRecord::default()),
            tracker: Mutex::new(tracker),
            runtime: Mutex::new(CountdownRuntime::default()),
            estimator: Mutex::new(estimator),
            viewers_online: DashMap::new(),
            degraded: degraded_tx,
        })
    }

    /// Immutable runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Obtain a handle to the current relay store, if one is installed.
    pub async fn relay_store(&self) -> Option<Arc<dyn RelayStore>> {
        let guard = self.relay.read().await;
        guard.as_ref().cloned()
    }

    /// Install a new relay store implementation and leave degraded mode.
    pub async fn install_relay_store(&self, store: Arc<dyn RelayStore>) {
        {
            let mut guard = self.relay.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false).await;
    }

    /// Remove the current relay store and enter degraded mode.
    pub async fn clear_relay_store(&self) {
        {
            let mut guard = self.relay.write().await;
            guard.take();
        }
        self.update_degraded(true).await;
    }

    /// Current degraded flag.
    pub async fn is_degraded(&self) -> bool {
        let guard = self.relay.read().await;
        guard.is_none()
    }

    /// Subscribe to degraded mode updates.
    pub fn degraded_watcher(&self) -> watch::Receiver<bool> {
        self.degraded.subscribe()
    }

    /// Broadcast hub used for the public SSE stream.
    pub fn public_sse(&self) -> &SseHub {
        self.sse.public()
    }

    /// Broadcast hub used for the admin SSE stream.
    pub fn admin_sse(&self) -> &SseHub {
        self.sse.admin().hub()
    }

    /// Token guard that ensures a single admin SSE subscriber at a time.
    pub fn admin_token(&self) -> &Mutex<Option<String>> {
        self.sse.admin().token()
    }

    /// Last-known image of the settings row.
    pub fn settings(&self) -> &RwLock<SettingsRecord> {
        &self.settings
    }

    /// Clone the last-known settings row.
    pub async fn settings_snapshot(&self) -> SettingsRecord {
        self.settings.read().await.clone()
    }

    /// Command-channel edge tracker for the one-shot settings fields.
    pub fn tracker(&self) -> &Mutex<CommandTracker> {
        &self.tracker
    }

    /// Countdown engine plus effect dispatcher.
    pub fn runtime(&self) -> &Mutex<CountdownRuntime> {
        &self.runtime
    }

    /// Viewer-count random walk.
    pub fn estimator(&self) -> &Mutex<ViewerEstimator> {
        &self.estimator
    }

    /// Registry of live public SSE connections keyed by connection id.
    pub fn viewers_online(&self) -> &DashMap<Uuid, Instant> {
        &self.viewers_online
    }

    /// Update and broadcast the degraded flag when the value changes.
    async fn update_degraded(&self, value: bool) {
        if *self.degraded.borrow() == value {
            return;
        }

        let _ = self.degraded.send(value);
    }
}
