// src/map/mod.rs
//! One-way driver-location channel from a tracking view to an embedded map

pub mod leaflet;
pub mod state;

pub use leaflet::LeafletSurface;
pub use state::{MapState, Marker, RouteLine, Viewport};

use futures::channel::mpsc;
use futures::StreamExt;
use serde::{Deserialize, Serialize};

use crate::errors::TawsilResult;

pub type MapSender = mpsc::Sender<MapMessage>;
pub type MapReceiver = mpsc::Receiver<MapMessage>;

pub fn map_channel(capacity: usize) -> (MapSender, MapReceiver) {
    mpsc::channel(capacity)
}

/// Messages a map surface understands. Serialized as `{"type":"update","lat":..,"lng":..}`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MapMessage {
    Update { lat: f64, lng: f64 },
}

impl MapMessage {
    pub fn update(lat: f64, lng: f64) -> Self {
        MapMessage::Update { lat, lng }
    }

    pub fn to_json(&self) -> TawsilResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses a message posted to the surface; anything unrecognised is ignored by callers
    pub fn from_json(raw: &str) -> TawsilResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Something that draws driver positions
pub trait MapSurface: Send {
    fn apply(&mut self, message: &MapMessage) -> TawsilResult<()>;
}

/// Drains a map channel into a surface until the tracking view closes
pub struct MapRenderer<S: MapSurface> {
    surface: S,
    applied: usize,
}

impl<S: MapSurface> MapRenderer<S> {
    pub fn new(surface: S) -> Self {
        Self { surface, applied: 0 }
    }

    /// Runs until every sender is gone and hands the surface back
    pub async fn run(mut self, mut updates: MapReceiver) -> S {
        while let Some(message) = updates.next().await {
            match self.surface.apply(&message) {
                Ok(()) => self.applied += 1,
                Err(e) => tracing::warn!("Map surface rejected {:?}: {}", message, e),
            }
        }
        tracing::debug!("Map channel closed after {} updates", self.applied);
        self.surface
    }
}
