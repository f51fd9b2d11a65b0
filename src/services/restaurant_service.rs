// src/services/restaurant_service.rs
use std::sync::Arc;

use crate::{
    errors::TawsilResult,
    models::restaurant::{AddOnGroup, MenuItem, Restaurant, RestaurantFilter},
    services::api_client::ApiClient,
};

/// Customer-facing restaurant browsing
pub struct RestaurantService {
    api: Arc<ApiClient>,
}

impl RestaurantService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn list(&self, filter: &RestaurantFilter) -> TawsilResult<Vec<Restaurant>> {
        tracing::debug!("Listing restaurants with {:?}", filter);
        let value: serde_json::Value = self.api.get_with_query("/restaurants", filter).await?;
        let decoded = crate::utils::decode::decode_each(value, "restaurant")?;
        Ok(decoded.items)
    }

    pub async fn get(&self, restaurant_id: &str) -> TawsilResult<Restaurant> {
        self.api.get(&format!("/restaurants/{}", restaurant_id)).await
    }

    pub async fn menu(&self, restaurant_id: &str, category: Option<&str>) -> TawsilResult<Vec<MenuItem>> {
        let path = format!("/restaurants/{}/menu", restaurant_id);
        let value: serde_json::Value = match category {
            Some(category) => self.api.get_with_query(&path, &[("category", category)]).await?,
            None => self.api.get(&path).await?,
        };
        Ok(crate::utils::decode::decode_each(value, "menu item")?.items)
    }

    pub async fn menu_item_addons(&self, restaurant_id: &str, menu_item_id: &str) -> TawsilResult<Vec<AddOnGroup>> {
        self.api
            .get(&format!("/restaurants/{}/menu/{}/addons", restaurant_id, menu_item_id))
            .await
    }
}
