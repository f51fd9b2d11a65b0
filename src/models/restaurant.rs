// src/models/restaurant.rs
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Restaurant {
    pub id: String,
    #[serde(default)]
    pub owner_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub name_en: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub city_id: Option<String>,
    #[serde(default)]
    pub cuisine_type: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub is_open: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub delivery_fee: f64, // SYP
    #[serde(default)]
    pub min_order: f64, // SYP
    #[serde(default)]
    pub delivery_time: Option<String>, // e.g. "30-45 دقيقة"
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

/// Query filters for the restaurant listing
#[derive(Debug, Serialize, Default, Clone)]
pub struct RestaurantFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_open: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MenuItem {
    pub id: String,
    pub restaurant_id: String,
    pub name: String,
    #[serde(default)]
    pub name_en: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub image: Option<String>,
    pub category: String,
    #[serde(default = "default_true")]
    pub is_available: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MenuItemCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct MenuItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AddOnOption {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub price: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AddOnGroup {
    pub id: String,
    pub menu_item_id: String,
    #[serde(default)]
    pub restaurant_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default = "default_max_selections")]
    pub max_selections: u32,
    #[serde(default)]
    pub options: Vec<AddOnOption>,
}

fn default_max_selections() -> u32 {
    1
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AddOnGroupCreate {
    pub name: String,
    pub is_required: bool,
    pub max_selections: u32,
    pub options: Vec<AddOnOption>,
}

impl AddOnGroupCreate {
    pub fn validate(&self) -> Result<(), crate::TawsilError> {
        if self.name.trim().is_empty() {
            return Err(crate::TawsilError::MissingRequiredField("name".to_string()));
        }
        if self.options.is_empty() {
            return Err(crate::TawsilError::validation_error("options", "يجب إضافة خيار واحد على الأقل"));
        }
        if self.max_selections == 0 || self.max_selections as usize > self.options.len() {
            return Err(crate::TawsilError::InvalidFieldValue {
                field: "max_selections".to_string(),
                value: self.max_selections.to_string(),
                reason: format!("must be between 1 and {}", self.options.len()),
            });
        }
        Ok(())
    }
}

/// Reply to `PUT /restaurant/toggle-status`
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct OpenState {
    pub is_open: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct RestaurantStats {
    #[serde(default)]
    pub restaurant: Option<Restaurant>,
    #[serde(default)]
    pub today_orders: u32,
    #[serde(default)]
    pub pending_orders: u32,
    #[serde(default)]
    pub today_revenue: f64,
}
