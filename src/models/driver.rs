// src/models/driver.rs
use serde::{Deserialize, Serialize};

use crate::models::order::Order;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct DriverStatusUpdate {
    pub is_online: bool,
}

/// Reply to `PUT /driver/location`; the backend also snaps the driver to the nearest city
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct LocationUpdateAck {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub city_id: Option<String>,
}

/// An order as a driver sees it, with pickup and drop-off contacts
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DriverOrder {
    #[serde(flatten)]
    pub order: Order,
    #[serde(default)]
    pub restaurant_address: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct AcceptOrderAck {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub order_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct DriverStats {
    #[serde(default)]
    pub is_online: bool,
    #[serde(default)]
    pub today_deliveries: u32,
    #[serde(default)]
    pub today_earnings: f64,
    #[serde(default)]
    pub total_deliveries: u32,
    #[serde(default)]
    pub total_earnings: f64,
    #[serde(default)]
    pub average_rating: f64,
}
