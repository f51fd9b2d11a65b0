// src/services/driver_service.rs
use std::sync::Arc;

use crate::{
    errors::{TawsilError as AppError, TawsilResult},
    models::{
        driver::{AcceptOrderAck, DriverOrder, DriverStats, DriverStatusUpdate, LocationUpdateAck},
        order::{MessageResponse, OrderStatus, StatusChange},
        tracking::LatLng,
    },
    services::api_client::ApiClient,
};

/// The driver app's side of the backend: availability, position reports and deliveries
pub struct DriverService {
    api: Arc<ApiClient>,
}

impl DriverService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn set_online(&self, is_online: bool) -> TawsilResult<DriverStatusUpdate> {
        tracing::info!("Driver going {}", if is_online { "online" } else { "offline" });
        self.api.put("/driver/status", &DriverStatusUpdate { is_online }).await
    }

    /// Reports the driver's position; this is what customers see on the tracking map
    pub async fn update_location(&self, location: LatLng) -> TawsilResult<LocationUpdateAck> {
        if !location.is_valid() {
            return Err(AppError::InvalidFieldValue {
                field: "location".to_string(),
                value: format!("{}, {}", location.lat, location.lng),
                reason: "coordinates out of range".to_string(),
            });
        }
        tracing::debug!("Reporting driver location {}, {}", location.lat, location.lng);
        self.api.put("/driver/location", &location).await
    }

    /// Ready orders in the driver's city nobody has taken yet
    pub async fn available_orders(&self) -> TawsilResult<Vec<DriverOrder>> {
        self.api.get_list("/driver/available-orders", "available order").await
    }

    pub async fn my_orders(&self) -> TawsilResult<Vec<DriverOrder>> {
        self.api.get_list("/driver/my-orders", "assigned order").await
    }

    pub async fn history(&self) -> TawsilResult<Vec<DriverOrder>> {
        self.api.get_list("/driver/history", "delivered order").await
    }

    pub async fn accept_order(&self, order_id: &str) -> TawsilResult<AcceptOrderAck> {
        tracing::info!("Driver accepting order {}", order_id);
        self.api
            .post_empty(&format!("/driver/accept-order/{}", order_id))
            .await
    }

    /// Rejects statuses a driver may not set before anything is sent
    pub async fn update_order_status(&self, order_id: &str, status: OrderStatus) -> TawsilResult<MessageResponse> {
        let status = status.ensure_driver_settable()?;
        tracing::info!("Driver moving order {} to {}", order_id, status.as_str());
        self.api
            .put(&format!("/driver/orders/{}/status", order_id), &StatusChange { status })
            .await
    }

    pub async fn stats(&self) -> TawsilResult<DriverStats> {
        self.api.get("/driver/stats").await
    }
}
