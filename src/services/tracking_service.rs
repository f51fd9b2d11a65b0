// src/services/tracking_service.rs
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::{
    errors::{TawsilError, TawsilResult},
    map::{map_channel, MapMessage, MapReceiver, MapSender},
    models::tracking::{TrackingSnapshot, TrackingView},
};

/// Map messages buffered for a slow renderer before older ones are dropped
const MAP_CHANNEL_CAPACITY: usize = 16;

/// Where tracking snapshots come from (the backend, or a fake in tests)
#[async_trait]
pub trait TrackingSource: Send + Sync {
    async fn fetch_snapshot(&self, order_id: &str) -> TawsilResult<TrackingSnapshot>;
}

/// Liveness shared by a tracking handle, its polling task and the service registry
struct Control {
    generation: AtomicU64,
    refresh: Notify,
    shutdown: watch::Sender<bool>,
}

impl Control {
    fn new() -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            generation: AtomicU64::new(1),
            refresh: Notify::new(),
            shutdown,
        }
    }

    fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn is_open(&self) -> bool {
        !*self.shutdown.borrow()
    }

    /// Invalidates every in-flight response and stops the loop. Returns false if already closed.
    fn close(&self) -> bool {
        let was_open = self.is_open();
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.shutdown.send_replace(true);
        was_open
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PublishOutcome {
    Published,
    Stale,
    Closed,
}

/// Turns fetch results into view state and map messages for one tracking view
pub(crate) struct Publisher {
    control: Arc<Control>,
    generation: u64,
    last_sequence: u64,
    view: watch::Sender<TrackingView>,
    map: MapSender,
}

impl Publisher {
    fn new(control: Arc<Control>, view: watch::Sender<TrackingView>, map: MapSender) -> Self {
        let generation = control.current_generation();
        Self {
            control,
            generation,
            last_sequence: 0,
            view,
            map,
        }
    }

    /// Applies the result of fetch number `sequence`.
    ///
    /// Results from a closed view or older than the last published one are dropped.
    pub(crate) fn publish(&mut self, sequence: u64, result: TawsilResult<TrackingSnapshot>) -> PublishOutcome {
        if self.control.current_generation() != self.generation {
            tracing::debug!("Dropping tracking result #{} for a closed view", sequence);
            return PublishOutcome::Closed;
        }
        if sequence <= self.last_sequence {
            tracing::debug!("Dropping stale tracking result #{} (have #{})", sequence, self.last_sequence);
            return PublishOutcome::Stale;
        }
        self.last_sequence = sequence;

        let view = match result {
            Ok(snapshot) => {
                if let Some(location) = snapshot.driver_location.filter(|_| snapshot.has_location) {
                    self.send_map(MapMessage::update(location.lat, location.lng));
                }
                TrackingView::from_snapshot(snapshot)
            }
            Err(e) => {
                tracing::warn!("Driver location fetch failed: {}", e);
                TrackingView::failed()
            }
        };

        self.view.send_replace(view);
        PublishOutcome::Published
    }

    fn send_map(&mut self, message: MapMessage) {
        if let Err(e) = self.map.try_send(message) {
            if e.is_full() {
                tracing::debug!("Map renderer is behind, dropping update");
            }
            // a disconnected receiver means nobody renders a map for this view
        }
    }
}

/// Starts and tracks live driver-location views
pub struct TrackingService {
    source: Arc<dyn TrackingSource>,
    poll_interval: Duration,
    open: Mutex<Vec<Weak<Control>>>,
}

impl TrackingService {
    pub fn new(source: Arc<dyn TrackingSource>, poll_interval: Duration) -> Self {
        Self {
            source,
            poll_interval,
            open: Mutex::new(Vec::new()),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Fetches immediately, then every poll interval until the handle is closed or dropped.
    pub fn start(&self, order_id: &str) -> TrackingHandle {
        tracing::info!("Starting live tracking for order {} every {:?}", order_id, self.poll_interval);

        let control = Arc::new(Control::new());
        let (view_tx, view_rx) = watch::channel(TrackingView::Loading);
        let (map_tx, map_rx) = map_channel(MAP_CHANNEL_CAPACITY);
        let publisher = Publisher::new(control.clone(), view_tx, map_tx);

        let task = tokio::spawn(poll_loop(
            self.source.clone(),
            order_id.to_string(),
            self.poll_interval,
            control.clone(),
            publisher,
        ));

        if let Ok(mut open) = self.open.lock() {
            open.retain(|weak| weak.strong_count() > 0);
            open.push(Arc::downgrade(&control));
        }

        TrackingHandle {
            order_id: order_id.to_string(),
            control,
            view: view_rx,
            map: Some(map_rx),
            task: Some(task),
        }
    }

    /// Number of tracking views still polling
    pub fn open_count(&self) -> usize {
        self.open
            .lock()
            .map(|open| {
                open.iter()
                    .filter_map(Weak::upgrade)
                    .filter(|control| control.is_open())
                    .count()
            })
            .unwrap_or(0)
    }

    /// Closes every open tracking view (logout)
    pub fn close_all(&self) {
        let Ok(mut open) = self.open.lock() else {
            return;
        };
        let closed = open
            .drain(..)
            .filter_map(|weak| weak.upgrade())
            .filter(|control| control.close())
            .count();
        if closed > 0 {
            tracing::info!("Closed {} live tracking views", closed);
        }
    }
}

async fn poll_loop(
    source: Arc<dyn TrackingSource>,
    order_id: String,
    poll_interval: Duration,
    control: Arc<Control>,
    mut publisher: Publisher,
) {
    let mut shutdown = control.shutdown.subscribe();
    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut sequence = 0u64;

    loop {
        if *shutdown.borrow() {
            break;
        }

        tokio::select! {
            biased;
            _ = shutdown.changed() => break,
            _ = control.refresh.notified() => tracing::debug!("Manual refresh for order {}", order_id),
            _ = ticker.tick() => {}
        }

        sequence += 1;
        let result = tokio::select! {
            biased;
            _ = shutdown.changed() => break,
            result = source.fetch_snapshot(&order_id) => result,
        };

        if publisher.publish(sequence, result) == PublishOutcome::Closed {
            break;
        }
    }

    tracing::info!("Stopped live tracking for order {}", order_id);
}

/// An open tracking view. Polling stops on [`close`](Self::close) or drop.
pub struct TrackingHandle {
    order_id: String,
    control: Arc<Control>,
    view: watch::Receiver<TrackingView>,
    map: Option<MapReceiver>,
    task: Option<JoinHandle<()>>,
}

impl TrackingHandle {
    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    /// Latest view state
    pub fn view(&self) -> TrackingView {
        self.view.borrow().clone()
    }

    /// A receiver that wakes on every view change
    pub fn subscribe(&self) -> watch::Receiver<TrackingView> {
        self.view.clone()
    }

    /// Waits for the next view change
    pub async fn changed(&mut self) -> TawsilResult<TrackingView> {
        self.view.changed().await.map_err(|_| TawsilError::TrackingClosed)?;
        Ok(self.view.borrow_and_update().clone())
    }

    /// The map update stream; can be taken once
    pub fn take_map_updates(&mut self) -> Option<MapReceiver> {
        self.map.take()
    }

    /// User-triggered retry: fetch now without waiting for the next tick
    pub fn refresh(&self) {
        if self.control.is_open() {
            self.control.refresh.notify_one();
        }
    }

    pub fn is_open(&self) -> bool {
        self.control.is_open()
    }

    pub fn close(&mut self) {
        if self.control.close() {
            tracing::debug!("Closing tracking view for order {}", self.order_id);
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for TrackingHandle {
    fn drop(&mut self) {
        self.close();
    }
}
