// src/services/restaurant_panel_service.rs
use std::sync::Arc;

use crate::{
    errors::{TawsilError as AppError, TawsilResult},
    models::{
        order::{MessageResponse, Order, OrderStatus, StatusChange},
        restaurant::{AddOnGroup, AddOnGroupCreate, MenuItem, MenuItemCreate, MenuItemUpdate, OpenState, RestaurantStats},
    },
    services::api_client::ApiClient,
};

/// Endpoints behind the restaurant owner's panel
pub struct RestaurantPanelService {
    api: Arc<ApiClient>,
}

impl RestaurantPanelService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Incoming orders that still need the kitchen's attention
    pub async fn orders(&self) -> TawsilResult<Vec<Order>> {
        self.api.get_list("/restaurant/orders", "order").await
    }

    pub async fn order_history(&self) -> TawsilResult<Vec<Order>> {
        self.api.get_list("/restaurant/orders/history", "order").await
    }

    /// Rejects statuses the panel may not set before anything is sent
    pub async fn update_order_status(&self, order_id: &str, status: OrderStatus) -> TawsilResult<MessageResponse> {
        let status = status.ensure_restaurant_settable()?;
        tracing::info!("Restaurant moving order {} to {}", order_id, status.as_str());
        self.api
            .put(&format!("/restaurant/orders/{}/status", order_id), &StatusChange { status })
            .await
    }

    pub async fn toggle_open(&self) -> TawsilResult<OpenState> {
        let state: OpenState = self.api.put_empty("/restaurant/toggle-status").await?;
        tracing::info!("Restaurant is now {}", if state.is_open { "open" } else { "closed" });
        Ok(state)
    }

    pub async fn stats(&self) -> TawsilResult<RestaurantStats> {
        self.api.get("/restaurant/stats").await
    }

    pub async fn menu(&self) -> TawsilResult<Vec<MenuItem>> {
        self.api.get_list("/restaurant/menu", "menu item").await
    }

    pub async fn add_menu_item(&self, item: &MenuItemCreate) -> TawsilResult<MenuItem> {
        if item.name.trim().is_empty() {
            return Err(AppError::MissingRequiredField("name".to_string()));
        }
        if !(item.price.is_finite() && item.price > 0.0) {
            return Err(AppError::InvalidFieldValue {
                field: "price".to_string(),
                value: item.price.to_string(),
                reason: "must be positive".to_string(),
            });
        }
        self.api.post("/restaurant/menu", item).await
    }

    pub async fn update_menu_item(&self, item_id: &str, update: &MenuItemUpdate) -> TawsilResult<MessageResponse> {
        self.api.put(&format!("/restaurant/menu/{}", item_id), update).await
    }

    pub async fn delete_menu_item(&self, item_id: &str) -> TawsilResult<MessageResponse> {
        tracing::info!("Deleting menu item {}", item_id);
        self.api.delete(&format!("/restaurant/menu/{}", item_id)).await
    }

    pub async fn addon_groups(&self, item_id: &str) -> TawsilResult<Vec<AddOnGroup>> {
        self.api
            .get_list(&format!("/restaurant/menu/{}/addons", item_id), "add-on group")
            .await
    }

    pub async fn create_addon_group(&self, item_id: &str, group: &AddOnGroupCreate) -> TawsilResult<AddOnGroup> {
        group.validate()?;
        self.api
            .post(&format!("/restaurant/menu/{}/addons", item_id), group)
            .await
    }

    pub async fn update_addon_group(&self, group_id: &str, group: &AddOnGroupCreate) -> TawsilResult<MessageResponse> {
        group.validate()?;
        self.api.put(&format!("/restaurant/addons/{}", group_id), group).await
    }

    pub async fn delete_addon_group(&self, group_id: &str) -> TawsilResult<MessageResponse> {
        self.api.delete(&format!("/restaurant/addons/{}", group_id)).await
    }
}
