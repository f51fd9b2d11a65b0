// src/models/admin.rs
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::{TawsilError, TawsilResult};
use crate::models::user::UserRole;

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct UserCounts {
    #[serde(default)]
    pub customers: u64,
    #[serde(default)]
    pub restaurants: u64,
    #[serde(default)]
    pub drivers: u64,
    #[serde(default)]
    pub online_drivers: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct OrderCounts {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub pending: u64,
    #[serde(default)]
    pub delivered: u64,
    #[serde(default)]
    pub cancelled: u64,
    #[serde(default)]
    pub today: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct RevenueTotals {
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub today: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ComplaintCounts {
    #[serde(default)]
    pub open: u64,
    #[serde(default)]
    pub total: u64,
}

/// Dashboard totals from `GET /admin/stats`
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct AdminStats {
    #[serde(default)]
    pub users: UserCounts,
    #[serde(default)]
    pub orders: OrderCounts,
    #[serde(default)]
    pub revenue: RevenueTotals,
    #[serde(default)]
    pub complaints: ComplaintCounts,
}

/// Filters shared by the admin list endpoints; unset fields are left out of the query
#[derive(Debug, Serialize, Clone, Default)]
pub struct AdminListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// One page of an admin listing
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    /// Entries the backend sent that could not be read
    pub skipped: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Complaint {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub user_phone: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub subject: String,
    pub message: String,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub restaurant_id: Option<String>,
    #[serde(default)]
    pub driver_id: Option<String>,
    pub status: ComplaintStatus,
    #[serde(default)]
    pub admin_response: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ComplaintReply {
    pub response: String,
    pub status: ComplaintStatus,
}

impl ComplaintReply {
    pub fn resolved(response: impl Into<String>) -> Self {
        Self { response: response.into(), status: ComplaintStatus::Resolved }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Advertisement {
    pub id: String,
    pub title: String,
    pub image_url: String,
    #[serde(default)]
    pub link_type: Option<String>,
    #[serde(default)]
    pub link_value: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(rename = "order", default)]
    pub position: i32,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RoleRequestStatus {
    Pending,
    Approved,
    Rejected,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RoleRequest {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub user_phone: String,
    pub requested_role: UserRole,
    pub status: RoleRequestStatus,
    pub full_name: String,
    pub phone: String,
    #[serde(default)]
    pub restaurant_name: Option<String>,
    #[serde(default)]
    pub restaurant_address: Option<String>,
    #[serde(default)]
    pub restaurant_area: Option<String>,
    #[serde(default)]
    pub vehicle_type: Option<String>,
    #[serde(default)]
    pub license_number: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub admin_notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

/// Review queue from `GET /admin/role-requests`
#[derive(Debug, Clone, PartialEq)]
pub struct RoleRequestQueue {
    pub requests: Page<RoleRequest>,
    pub pending_count: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct RoleRequestCreate {
    pub requested_role: UserRole,
    pub full_name: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant_area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl RoleRequestCreate {
    /// Customers may only apply to become a driver or a restaurant owner
    pub fn validate(&self) -> TawsilResult<()> {
        if !matches!(self.requested_role, UserRole::Driver | UserRole::Restaurant) {
            return Err(TawsilError::InvalidFieldValue {
                field: "requested_role".to_string(),
                value: self.requested_role.as_str().to_string(),
                reason: "only driver or restaurant may be requested".to_string(),
            });
        }
        if self.full_name.trim().is_empty() {
            return Err(TawsilError::MissingRequiredField("full_name".to_string()));
        }
        if self.phone.trim().is_empty() {
            return Err(TawsilError::MissingRequiredField("phone".to_string()));
        }
        if self.requested_role == UserRole::Restaurant
            && self.restaurant_name.as_deref().is_none_or(|name| name.trim().is_empty())
        {
            return Err(TawsilError::MissingRequiredField("restaurant_name".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_stats_nested_shape() {
        let raw = serde_json::json!({
            "users": {"customers": 120, "restaurants": 8, "drivers": 14, "online_drivers": 5},
            "orders": {"total": 900, "pending": 4, "delivered": 850, "cancelled": 46, "today": 31},
            "revenue": {"total": 15000000.0, "today": 420000.0},
            "complaints": {"open": 2, "total": 19}
        });
        let stats: AdminStats = serde_json::from_value(raw).unwrap();
        assert_eq!(stats.users.online_drivers, 5);
        assert_eq!(stats.orders.today, 31);
        assert_eq!(stats.complaints.open, 2);
    }

    #[test]
    fn test_list_query_skips_unset() {
        let query = AdminListQuery { role: Some(UserRole::Driver), limit: Some(20), ..Default::default() };
        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(value, serde_json::json!({"role": "driver", "limit": 20}));
    }

    #[test]
    fn test_role_request_validation() {
        let mut request = RoleRequestCreate {
            requested_role: UserRole::Admin,
            full_name: "Sami".to_string(),
            phone: "0944000000".to_string(),
            ..Default::default()
        };
        assert!(matches!(request.validate(), Err(TawsilError::InvalidFieldValue { .. })));

        request.requested_role = UserRole::Restaurant;
        assert!(matches!(request.validate(), Err(TawsilError::MissingRequiredField(_))));

        request.restaurant_name = Some("Bab Touma Grill".to_string());
        assert!(request.validate().is_ok());

        request.requested_role = UserRole::Driver;
        request.restaurant_name = None;
        assert!(request.validate().is_ok());
    }
}
