// src/models/tracking.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{TawsilError, TawsilResult};
use crate::models::order::OrderStatus;
use crate::utils::geo;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Delivery phase reported by the backend for a tracked order
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TrackingPhase {
    Waiting,           // No driver on the way yet
    GoingToRestaurant, // Driver heading to pick up
    AtRestaurant,      // Driver collected the order
    Delivering,        // Driver heading to the customer
    Arrived,           // Delivered
    #[serde(other)]
    Unknown,
}

impl TrackingPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackingPhase::Waiting => "waiting",
            TrackingPhase::GoingToRestaurant => "going_to_restaurant",
            TrackingPhase::AtRestaurant => "at_restaurant",
            TrackingPhase::Delivering => "delivering",
            TrackingPhase::Arrived => "arrived",
            TrackingPhase::Unknown => "unknown",
        }
    }

    /// Position in [`PHASE_STEPS`]; `None` for phases outside the progress bar.
    pub fn step_index(&self) -> Option<usize> {
        PHASE_STEPS.iter().position(|step| step.phase == *self)
    }
}

/// Wire shape of `GET /orders/{id}/driver-location`.
///
/// The "no driver" variants of this response only carry `driver_assigned`,
/// `driver_location` and `message`, so everything else is optional here.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct DriverLocationResponse {
    #[serde(default)]
    pub driver_assigned: bool,
    #[serde(default)]
    pub driver_location: Option<LatLng>,
    #[serde(default)]
    pub has_location: Option<bool>,
    #[serde(default)]
    pub driver_name: Option<String>,
    #[serde(default)]
    pub driver_phone: Option<String>,
    #[serde(default)]
    pub location_updated_at: Option<String>,
    #[serde(default)]
    pub order_status: Option<OrderStatus>,
    #[serde(default)]
    pub restaurant_name: Option<String>,
    #[serde(default)]
    pub restaurant_lat: Option<f64>,
    #[serde(default)]
    pub restaurant_lng: Option<f64>,
    #[serde(default)]
    pub distance_to_restaurant_km: Option<f64>,
    #[serde(default)]
    pub distance_to_customer_km: Option<f64>,
    #[serde(default)]
    pub eta_to_restaurant_min: Option<u32>,
    #[serde(default)]
    pub eta_to_customer_min: Option<u32>,
    #[serde(default)]
    pub phase: Option<TrackingPhase>,
    #[serde(default)]
    pub phase_text: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// One point-in-time view of a driver's assignment, location and phase for an order
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct TrackingSnapshot {
    pub order_id: String,
    pub driver_assigned: bool,
    pub driver_name: Option<String>,
    pub driver_phone: Option<String>,
    pub has_location: bool,
    pub driver_location: Option<LatLng>,
    pub restaurant_name: Option<String>,
    pub restaurant_lat: Option<f64>,
    pub restaurant_lng: Option<f64>,
    pub order_status: Option<OrderStatus>,
    pub phase: TrackingPhase,
    pub phase_text: Option<String>,
    pub eta_to_restaurant_min: Option<u32>,
    pub eta_to_customer_min: Option<u32>,
    pub distance_to_restaurant_km: Option<f64>,
    pub distance_to_customer_km: Option<f64>,
    pub location_updated_at: Option<String>,
    pub message: Option<String>,
    pub received_at: DateTime<Utc>,
}

impl TrackingSnapshot {
    /// Validates a backend response into a snapshot.
    ///
    /// `has_location` must imply a usable `driver_location`; when the backend
    /// omits `has_location` it is derived from the location itself.
    pub fn from_response(order_id: &str, response: DriverLocationResponse) -> TawsilResult<Self> {
        if let Some(location) = response.driver_location {
            if !location.is_valid() {
                return Err(TawsilError::MalformedSnapshot(format!(
                    "driver location out of range: {}, {}",
                    location.lat, location.lng
                )));
            }
        }

        let has_location = match response.has_location {
            Some(true) if response.driver_location.is_none() => {
                return Err(TawsilError::MalformedSnapshot(
                    "has_location is true but driver_location is null".to_string(),
                ));
            }
            Some(flag) => flag,
            None => response.driver_location.is_some(),
        };

        if has_location && !response.driver_assigned {
            return Err(TawsilError::MalformedSnapshot(
                "location reported without an assigned driver".to_string(),
            ));
        }

        Ok(Self {
            order_id: order_id.to_string(),
            driver_assigned: response.driver_assigned,
            driver_name: response.driver_name.filter(|name| !name.is_empty()),
            driver_phone: response.driver_phone.filter(|phone| !phone.is_empty()),
            has_location,
            driver_location: if has_location { response.driver_location } else { None },
            restaurant_name: response.restaurant_name.filter(|name| !name.is_empty()),
            restaurant_lat: response.restaurant_lat,
            restaurant_lng: response.restaurant_lng,
            order_status: response.order_status,
            phase: response.phase.unwrap_or(TrackingPhase::Waiting),
            phase_text: response.phase_text,
            eta_to_restaurant_min: response.eta_to_restaurant_min,
            eta_to_customer_min: response.eta_to_customer_min,
            distance_to_restaurant_km: response.distance_to_restaurant_km,
            distance_to_customer_km: response.distance_to_customer_km,
            location_updated_at: response.location_updated_at.filter(|ts| !ts.is_empty()),
            message: response.message,
            received_at: Utc::now(),
        })
    }

    pub fn restaurant_location(&self) -> Option<LatLng> {
        match (self.restaurant_lat, self.restaurant_lng) {
            (Some(lat), Some(lng)) => Some(LatLng::new(lat, lng)),
            _ => None,
        }
    }

    /// Distance reported by the backend, or the straight-line distance when it sent none.
    pub fn distance_to_restaurant(&self) -> Option<f64> {
        self.distance_to_restaurant_km.or_else(|| {
            let driver = self.driver_location?;
            let restaurant = self.restaurant_location()?;
            Some(geo::round_to_tenth(geo::haversine_km(&driver, &restaurant)))
        })
    }

    /// ETA for the step the driver is currently on
    pub fn current_eta_min(&self) -> Option<u32> {
        match self.phase {
            TrackingPhase::GoingToRestaurant => self.eta_to_restaurant_min,
            TrackingPhase::AtRestaurant | TrackingPhase::Delivering => self.eta_to_customer_min,
            _ => None,
        }
    }

    pub fn call_uri(&self) -> Option<String> {
        self.driver_phone.as_ref().map(|phone| format!("tel:{}", phone))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseStep {
    pub phase: TrackingPhase,
    pub label: &'static str,
    pub icon: &'static str,
}

/// The fixed progress bar shown while tracking, in delivery order
pub const PHASE_STEPS: [PhaseStep; 4] = [
    PhaseStep { phase: TrackingPhase::GoingToRestaurant, label: "في الطريق للمطعم", icon: "bicycle" },
    PhaseStep { phase: TrackingPhase::AtRestaurant, label: "استلم الطلب", icon: "restaurant" },
    PhaseStep { phase: TrackingPhase::Delivering, label: "في الطريق إليك", icon: "navigate" },
    PhaseStep { phase: TrackingPhase::Arrived, label: "تم التوصيل", icon: "checkmark-circle" },
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepStatus {
    pub step: PhaseStep,
    /// At or before the current step
    pub active: bool,
    /// Exactly the current step (pulsing ETA badge)
    pub current: bool,
    pub eta_min: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhaseProgress {
    pub current_index: Option<usize>,
    pub steps: Vec<StepStatus>,
}

impl PhaseProgress {
    pub fn from_phase(phase: TrackingPhase) -> Self {
        Self::build(phase, None)
    }

    pub fn for_snapshot(snapshot: &TrackingSnapshot) -> Self {
        Self::build(snapshot.phase, snapshot.current_eta_min())
    }

    fn build(phase: TrackingPhase, eta_min: Option<u32>) -> Self {
        let current_index = phase.step_index();
        let steps = PHASE_STEPS
            .iter()
            .enumerate()
            .map(|(index, step)| {
                let current = current_index == Some(index);
                StepStatus {
                    step: *step,
                    active: current_index.is_some_and(|cur| index <= cur),
                    current,
                    eta_min: if current { eta_min } else { None },
                }
            })
            .collect();

        Self { current_index, steps }
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.steps.get(index).is_some_and(|s| s.active)
    }

    pub fn is_current(&self, index: usize) -> bool {
        self.steps.get(index).is_some_and(|s| s.current)
    }

    pub fn current_step(&self) -> Option<&StepStatus> {
        self.current_index.and_then(|index| self.steps.get(index))
    }
}

/// What a tracking view shows, derived from the latest poll
#[derive(Debug, Clone, PartialEq)]
pub enum TrackingView {
    Loading,
    NoDriver { message: String },
    AwaitingLocation { snapshot: TrackingSnapshot },
    Live { snapshot: TrackingSnapshot, progress: PhaseProgress },
    Failed { message: String },
}

impl TrackingView {
    pub const NO_DRIVER_MESSAGE: &'static str = "لم يتم تعيين سائق بعد";
    pub const AWAITING_LOCATION_MESSAGE: &'static str = "تم تعيين السائق، بانتظار تحديد موقعه";
    pub const FETCH_FAILED_MESSAGE: &'static str = "فشل تحميل موقع السائق";

    pub fn from_snapshot(snapshot: TrackingSnapshot) -> Self {
        if !snapshot.driver_assigned {
            let message = snapshot
                .message
                .clone()
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| Self::NO_DRIVER_MESSAGE.to_string());
            TrackingView::NoDriver { message }
        } else if !snapshot.has_location {
            TrackingView::AwaitingLocation { snapshot }
        } else {
            let progress = PhaseProgress::for_snapshot(&snapshot);
            TrackingView::Live { snapshot, progress }
        }
    }

    pub fn failed() -> Self {
        TrackingView::Failed { message: Self::FETCH_FAILED_MESSAGE.to_string() }
    }

    pub fn snapshot(&self) -> Option<&TrackingSnapshot> {
        match self {
            TrackingView::AwaitingLocation { snapshot } | TrackingView::Live { snapshot, .. } => Some(snapshot),
            _ => None,
        }
    }

    /// Whether a map surface should be shown for this state
    pub fn shows_map(&self) -> bool {
        matches!(self, TrackingView::Live { .. })
    }

    pub fn status_line(&self) -> String {
        match self {
            TrackingView::Loading => "جاري تحميل موقع السائق...".to_string(),
            TrackingView::NoDriver { message } | TrackingView::Failed { message } => message.clone(),
            TrackingView::AwaitingLocation { snapshot } => snapshot
                .message
                .clone()
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| Self::AWAITING_LOCATION_MESSAGE.to_string()),
            TrackingView::Live { snapshot, .. } => snapshot
                .phase_text
                .clone()
                .unwrap_or_else(|| snapshot.phase.as_str().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(json: serde_json::Value) -> DriverLocationResponse {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_no_driver_response() {
        let raw = response(serde_json::json!({
            "driver_location": null,
            "driver_assigned": false,
            "message": "لم يتم تعيين سائق بعد"
        }));
        let snapshot = TrackingSnapshot::from_response("o1", raw).unwrap();
        assert!(!snapshot.has_location);
        assert_eq!(snapshot.phase, TrackingPhase::Waiting);

        let view = TrackingView::from_snapshot(snapshot);
        assert!(matches!(view, TrackingView::NoDriver { .. }));
        assert!(!view.shows_map());
    }

    #[test]
    fn test_has_location_requires_coordinates() {
        let raw = response(serde_json::json!({
            "driver_assigned": true,
            "has_location": true,
            "driver_location": null
        }));
        assert!(matches!(
            TrackingSnapshot::from_response("o1", raw),
            Err(TawsilError::MalformedSnapshot(_))
        ));
    }

    #[test]
    fn test_location_without_flag_is_dropped() {
        let raw = response(serde_json::json!({
            "driver_assigned": true,
            "has_location": false,
            "driver_location": {"lat": 33.5, "lng": 36.3}
        }));
        let snapshot = TrackingSnapshot::from_response("o1", raw).unwrap();
        assert!(snapshot.driver_location.is_none());
        assert!(matches!(TrackingView::from_snapshot(snapshot), TrackingView::AwaitingLocation { .. }));
    }

    #[test]
    fn test_awaiting_location_keeps_backend_message() {
        let raw = response(serde_json::json!({
            "driver_assigned": true,
            "driver_location": null,
            "message": "السائق غير موجود في النظام"
        }));
        let view = TrackingView::from_snapshot(TrackingSnapshot::from_response("o1", raw).unwrap());
        assert!(matches!(view, TrackingView::AwaitingLocation { .. }));
        assert_eq!(view.status_line(), "السائق غير موجود في النظام");

        let raw = response(serde_json::json!({
            "driver_assigned": true,
            "has_location": false,
            "driver_location": null
        }));
        let view = TrackingView::from_snapshot(TrackingSnapshot::from_response("o1", raw).unwrap());
        assert_eq!(view.status_line(), TrackingView::AWAITING_LOCATION_MESSAGE);
    }

    #[test]
    fn test_out_of_range_location_rejected() {
        let raw = response(serde_json::json!({
            "driver_assigned": true,
            "driver_location": {"lat": 133.5, "lng": 36.3}
        }));
        assert!(TrackingSnapshot::from_response("o1", raw).is_err());
    }

    #[test]
    fn test_delivering_progress() {
        let progress = PhaseProgress::from_phase(TrackingPhase::Delivering);
        assert_eq!(progress.current_index, Some(2));
        assert!(progress.is_active(0));
        assert!(progress.is_active(1));
        assert!(progress.is_active(2));
        assert!(progress.is_current(2));
        assert!(!progress.is_current(0));
        assert!(!progress.is_current(1));
        assert!(!progress.is_active(3));
        assert!(!progress.is_current(3));
    }

    #[test]
    fn test_unknown_phase_marks_nothing() {
        let phase: TrackingPhase = serde_json::from_str("\"unknown_value\"").unwrap();
        assert_eq!(phase, TrackingPhase::Unknown);

        let progress = PhaseProgress::from_phase(phase);
        assert_eq!(progress.current_index, None);
        assert!(progress.steps.iter().all(|s| !s.active && !s.current));
        assert!(progress.current_step().is_none());
    }

    #[test]
    fn test_waiting_phase_is_outside_progress() {
        let progress = PhaseProgress::from_phase(TrackingPhase::Waiting);
        assert_eq!(progress.current_index, None);
        assert_eq!(progress.steps.len(), 4);
    }

    #[test]
    fn test_eta_badge_follows_phase() {
        let raw = response(serde_json::json!({
            "driver_assigned": true,
            "has_location": true,
            "driver_location": {"lat": 33.51, "lng": 36.29},
            "restaurant_lat": 33.52,
            "restaurant_lng": 36.31,
            "eta_to_restaurant_min": 7,
            "eta_to_customer_min": 20,
            "phase": "going_to_restaurant"
        }));
        let snapshot = TrackingSnapshot::from_response("o1", raw).unwrap();
        let progress = PhaseProgress::for_snapshot(&snapshot);
        assert_eq!(progress.current_step().unwrap().eta_min, Some(7));
        assert_eq!(progress.steps[1].eta_min, None);
    }

    #[test]
    fn test_distance_falls_back_to_haversine() {
        let raw = response(serde_json::json!({
            "driver_assigned": true,
            "driver_location": {"lat": 33.5138, "lng": 36.2765},
            "restaurant_lat": 33.5138,
            "restaurant_lng": 36.2965
        }));
        let snapshot = TrackingSnapshot::from_response("o1", raw).unwrap();
        assert!(snapshot.has_location);
        let distance = snapshot.distance_to_restaurant().unwrap();
        assert!((distance - 1.9).abs() < 0.11, "distance was {}", distance);
    }
}
