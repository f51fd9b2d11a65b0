// src/map/state.rs
use std::time::Duration;

use crate::{
    errors::{TawsilError, TawsilResult},
    map::{MapMessage, MapSurface},
    models::tracking::{LatLng, TrackingSnapshot},
    utils::geo,
};

pub const DRIVER_ZOOM: u8 = 15;
pub const FIT_PADDING_PX: u32 = 50;
pub const PAN_ANIMATION: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub position: LatLng,
    pub label: String,
}

/// Dashed line from the restaurant to the driver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteLine {
    pub from: LatLng,
    pub to: LatLng,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Viewport {
    Centered { center: LatLng, zoom: u8 },
    FitBounds { south_west: LatLng, north_east: LatLng, padding_px: u32 },
    PanTo { center: LatLng, animation: Duration },
}

/// What a tracking map currently shows
#[derive(Debug, Clone, PartialEq)]
pub struct MapState {
    pub driver: Marker,
    pub restaurant: Option<Marker>,
    pub route: Option<RouteLine>,
    /// How the map was first framed; never a pan
    pub initial_view: Viewport,
    pub viewport: Viewport,
}

impl MapState {
    /// Both points known: fit them. Driver only: center on it.
    pub fn new(driver: Marker, restaurant: Option<Marker>) -> Self {
        let (route, viewport) = match &restaurant {
            Some(restaurant) => {
                let (south_west, north_east) = geo::bounds(&driver.position, &restaurant.position);
                (
                    Some(RouteLine { from: restaurant.position, to: driver.position }),
                    Viewport::FitBounds { south_west, north_east, padding_px: FIT_PADDING_PX },
                )
            }
            None => (None, Viewport::Centered { center: driver.position, zoom: DRIVER_ZOOM }),
        };

        Self { driver, restaurant, route, initial_view: viewport, viewport }
    }

    /// Initial map for a snapshot; `None` until the driver has a location
    pub fn from_snapshot(snapshot: &TrackingSnapshot) -> Option<Self> {
        let position = snapshot.driver_location.filter(|_| snapshot.has_location)?;
        let driver = Marker {
            position,
            label: snapshot.driver_name.clone().unwrap_or_else(|| "السائق".to_string()),
        };
        let restaurant = snapshot.restaurant_location().map(|position| Marker {
            position,
            label: snapshot.restaurant_name.clone().unwrap_or_else(|| "المطعم".to_string()),
        });
        Some(Self::new(driver, restaurant))
    }

    /// Moves the driver, redraws the route end and pans to the new position
    pub fn move_driver(&mut self, position: LatLng) -> TawsilResult<()> {
        if !position.is_valid() {
            return Err(TawsilError::InvalidFieldValue {
                field: "driver_location".to_string(),
                value: format!("{}, {}", position.lat, position.lng),
                reason: "coordinates out of range".to_string(),
            });
        }
        self.driver.position = position;
        if let Some(route) = self.route.as_mut() {
            route.to = position;
        }
        self.viewport = Viewport::PanTo { center: position, animation: PAN_ANIMATION };
        Ok(())
    }
}

impl MapSurface for MapState {
    fn apply(&mut self, message: &MapMessage) -> TawsilResult<()> {
        match *message {
            MapMessage::Update { lat, lng } => self.move_driver(LatLng::new(lat, lng)),
        }
    }
}
