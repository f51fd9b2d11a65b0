// src/services/order_service.rs
use async_trait::async_trait;
use std::sync::Arc;

use crate::{
    errors::{TawsilError as AppError, TawsilResult},
    models::{
        cart::Cart,
        order::{
            Address, AddressCreate, MessageResponse, Order, OrderCreate, PaymentInfo, PaymentVerification,
            RatingCreate, ShamCashInfo,
        },
        tracking::{DriverLocationResponse, TrackingSnapshot},
    },
    services::{api_client::ApiClient, tracking_service::TrackingSource},
};

/// Customer orders, addresses, payments and ratings
pub struct OrderService {
    api: Arc<ApiClient>,
}

impl OrderService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn create_order(&self, order: &OrderCreate) -> TawsilResult<Order> {
        order.validate()?;
        tracing::info!(
            "Placing order at restaurant {} with {} items",
            order.restaurant_id,
            order.items.len()
        );
        let created: Order = self.api.post("/orders", order).await?;
        tracing::info!("Order placed: {} - {} SYP", created.id, created.total);
        Ok(created)
    }

    /// Places the cart's contents as one order; the cart is consumed either way
    pub async fn checkout(
        &self,
        cart: Cart,
        address_id: &str,
        payment_method: &str,
        payment_info: Option<PaymentInfo>,
        notes: Option<String>,
    ) -> TawsilResult<Order> {
        let order = cart.into_order_create(address_id, payment_method, payment_info, notes)?;
        self.create_order(&order).await
    }

    /// The customer's orders, newest first. Unreadable entries are skipped.
    pub async fn get_orders(&self) -> TawsilResult<Vec<Order>> {
        let mut orders: Vec<Order> = self.api.get_list("/orders", "order").await?;
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    pub async fn get_order(&self, order_id: &str) -> TawsilResult<Order> {
        tracing::debug!("Getting order: {}", order_id);
        self.api.get(&format!("/orders/{}", order_id)).await
    }

    pub async fn cancel_order(&self, order_id: &str) -> TawsilResult<MessageResponse> {
        tracing::info!("Cancelling order: {}", order_id);
        self.api.post_empty(&format!("/orders/{}/cancel", order_id)).await
    }

    pub async fn driver_location(&self, order_id: &str) -> TawsilResult<TrackingSnapshot> {
        if order_id.trim().is_empty() {
            return Err(AppError::MissingRequiredField("order_id".to_string()));
        }
        let response: DriverLocationResponse = self
            .api
            .get(&format!("/orders/{}/driver-location", order_id))
            .await?;
        TrackingSnapshot::from_response(order_id, response)
    }

    pub async fn verify_payment(&self, verification: &PaymentVerification) -> TawsilResult<serde_json::Value> {
        if verification.reference.trim().is_empty() {
            return Err(AppError::validation_error("reference", "يرجى إدخال رقم العملية"));
        }
        tracing::info!("Submitting payment reference for order {}", verification.order_id);
        self.api.post("/payments/verify", verification).await
    }

    pub async fn shamcash_info(&self) -> TawsilResult<ShamCashInfo> {
        self.api.get("/payments/shamcash-info").await
    }

    pub async fn rate_order(&self, rating: &RatingCreate) -> TawsilResult<serde_json::Value> {
        rating.validate()?;
        self.api.post("/ratings", rating).await
    }

    pub async fn get_addresses(&self) -> TawsilResult<Vec<Address>> {
        self.api.get_list("/addresses", "address").await
    }

    pub async fn create_address(&self, address: &AddressCreate) -> TawsilResult<Address> {
        if address.address_line.trim().is_empty() {
            return Err(AppError::MissingRequiredField("address_line".to_string()));
        }
        self.api.post("/addresses", address).await
    }

    pub async fn delete_address(&self, address_id: &str) -> TawsilResult<MessageResponse> {
        self.api.delete(&format!("/addresses/{}", address_id)).await
    }
}

#[async_trait]
impl TrackingSource for OrderService {
    async fn fetch_snapshot(&self, order_id: &str) -> TawsilResult<TrackingSnapshot> {
        self.driver_location(order_id).await
    }
}
