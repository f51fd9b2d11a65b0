// src/models/order.rs
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::{TawsilError, TawsilResult};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,        // Placed, waiting for the restaurant
    Accepted,       // Restaurant accepted the order
    Preparing,      // Kitchen is preparing it
    Ready,          // Ready for pickup
    DriverAssigned, // Driver took the order and heads to the restaurant
    PickedUp,       // Driver collected it
    OutForDelivery, // On the way to the customer
    Delivered,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    /// Statuses a restaurant may set through its panel
    pub const RESTAURANT_SETTABLE: [OrderStatus; 4] = [
        OrderStatus::Accepted,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Cancelled,
    ];

    /// Statuses a driver may set on an order assigned to them
    pub const DRIVER_SETTABLE: [OrderStatus; 3] = [
        OrderStatus::PickedUp,
        OrderStatus::OutForDelivery,
        OrderStatus::Delivered,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Accepted => "accepted",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::DriverAssigned => "driver_assigned",
            OrderStatus::PickedUp => "picked_up",
            OrderStatus::OutForDelivery => "out_for_delivery",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Unknown => "unknown",
        }
    }

    /// Arabic label shown in order lists
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "بانتظار التأكيد",
            OrderStatus::Accepted => "تم القبول",
            OrderStatus::Preparing => "قيد التحضير",
            OrderStatus::Ready => "جاهز للاستلام",
            OrderStatus::DriverAssigned => "في الطريق للمطعم",
            OrderStatus::PickedUp => "استلم الطلب",
            OrderStatus::OutForDelivery => "في الطريق إليك",
            OrderStatus::Delivered => "تم التوصيل",
            OrderStatus::Cancelled => "ملغي",
            OrderStatus::Unknown => "غير معروف",
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// A driver is on the order and can be tracked live
    pub fn is_trackable(&self) -> bool {
        matches!(
            self,
            OrderStatus::DriverAssigned | OrderStatus::PickedUp | OrderStatus::OutForDelivery
        )
    }

    /// Customers may cancel only before the kitchen starts
    pub fn is_cancellable(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Accepted)
    }

    pub fn ensure_restaurant_settable(self) -> TawsilResult<Self> {
        Self::ensure_in(self, &Self::RESTAURANT_SETTABLE)
    }

    pub fn ensure_driver_settable(self) -> TawsilResult<Self> {
        Self::ensure_in(self, &Self::DRIVER_SETTABLE)
    }

    fn ensure_in(status: Self, allowed: &[OrderStatus]) -> TawsilResult<Self> {
        if allowed.contains(&status) {
            Ok(status)
        } else {
            Err(TawsilError::InvalidFieldValue {
                field: "status".to_string(),
                value: status.as_str().to_string(),
                reason: format!(
                    "expected one of {}",
                    allowed.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", ")
                ),
            })
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AddOnSelection {
    pub group_name: String,
    pub option_name: String,
    pub price: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OrderItem {
    pub menu_item_id: String,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub addons: Option<Vec<AddOnSelection>>,
    pub subtotal: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub restaurant_id: String,
    pub restaurant_name: String,
    #[serde(default)]
    pub driver_id: Option<String>,
    #[serde(default)]
    pub driver_name: Option<String>,
    #[serde(default)]
    pub driver_phone: Option<String>,
    pub items: Vec<OrderItem>,
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub total: f64,
    pub payment_method: String,
    #[serde(default)]
    pub payment_status: Option<String>,
    pub order_status: OrderStatus,
    #[serde(default)]
    pub address: serde_json::Value,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

// Request Models
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OrderItemCreate {
    pub menu_item_id: String,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub addons: Vec<AddOnSelection>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PaymentInfo {
    pub transaction_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_screenshot: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OrderCreate {
    pub restaurant_id: String,
    pub items: Vec<OrderItemCreate>,
    pub address_id: String,
    pub payment_method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_info: Option<PaymentInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl OrderCreate {
    pub fn validate(&self) -> TawsilResult<()> {
        if self.restaurant_id.is_empty() {
            return Err(TawsilError::MissingRequiredField("restaurant_id".to_string()));
        }
        if self.address_id.is_empty() {
            return Err(TawsilError::MissingRequiredField("address_id".to_string()));
        }
        if self.items.is_empty() {
            return Err(TawsilError::validation_error("items", "السلة فارغة"));
        }
        if let Some(item) = self.items.iter().find(|item| item.quantity == 0) {
            return Err(TawsilError::InvalidFieldValue {
                field: "quantity".to_string(),
                value: "0".to_string(),
                reason: format!("item {} must have a positive quantity", item.menu_item_id),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StatusChange {
    pub status: OrderStatus,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Address {
    pub id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    pub label: String,
    pub address_line: String,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AddressCreate {
    pub label: String,
    pub address_line: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RatingCreate {
    pub order_id: String,
    pub restaurant_rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl RatingCreate {
    pub fn validate(&self) -> TawsilResult<()> {
        let in_range = |value: u8| (1..=5).contains(&value);
        if !in_range(self.restaurant_rating) {
            return Err(TawsilError::validation_error("restaurant_rating", "التقييم يجب أن يكون بين 1 و 5"));
        }
        if let Some(rating) = self.driver_rating {
            if !in_range(rating) {
                return Err(TawsilError::validation_error("driver_rating", "التقييم يجب أن يكون بين 1 و 5"));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PaymentVerification {
    pub order_id: String,
    pub reference: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot_base64: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ShamCashInfo {
    pub merchant_name: String,
    pub merchant_phone: String,
    #[serde(default)]
    pub instructions: Vec<String>,
}

/// Generic `{"message": "..."}` acknowledgement returned by mutating endpoints
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names() {
        let status: OrderStatus = serde_json::from_str("\"out_for_delivery\"").unwrap();
        assert_eq!(status, OrderStatus::OutForDelivery);
        assert_eq!(serde_json::to_string(&OrderStatus::DriverAssigned).unwrap(), "\"driver_assigned\"");

        let unknown: OrderStatus = serde_json::from_str("\"on_the_moon\"").unwrap();
        assert_eq!(unknown, OrderStatus::Unknown);
    }

    #[test]
    fn test_settable_statuses() {
        assert!(OrderStatus::Ready.ensure_restaurant_settable().is_ok());
        assert!(OrderStatus::Delivered.ensure_restaurant_settable().is_err());
        assert!(OrderStatus::PickedUp.ensure_driver_settable().is_ok());
        assert!(OrderStatus::Cancelled.ensure_driver_settable().is_err());
    }

    #[test]
    fn test_order_create_rejects_empty_cart() {
        let order = OrderCreate {
            restaurant_id: "r1".to_string(),
            items: vec![],
            address_id: "a1".to_string(),
            payment_method: "cash".to_string(),
            payment_info: None,
            notes: None,
        };
        assert!(matches!(order.validate(), Err(TawsilError::ValidationFailed(_))));
    }

    #[test]
    fn test_rating_range() {
        let rating = RatingCreate {
            order_id: "o1".to_string(),
            restaurant_rating: 5,
            driver_rating: Some(0),
            comment: None,
        };
        assert!(rating.validate().is_err());
    }
}
