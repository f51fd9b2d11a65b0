// src/services/admin_service.rs
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::{
    errors::{TawsilError as AppError, TawsilResult},
    models::{
        admin::{
            AdminListQuery, AdminStats, Advertisement, Complaint, ComplaintReply, Page, RoleRequest,
            RoleRequestCreate, RoleRequestQueue,
        },
        order::{MessageResponse, Order},
        user::User,
    },
    services::api_client::ApiClient,
    utils::decode::{decode_each, Decoded},
};

/// Admin and moderator dashboard, plus the customer side of role requests
pub struct AdminService {
    api: Arc<ApiClient>,
}

impl AdminService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn stats(&self) -> TawsilResult<AdminStats> {
        self.api.get("/admin/stats").await
    }

    pub async fn users(&self, query: &AdminListQuery) -> TawsilResult<Page<User>> {
        let body: serde_json::Value = self.api.get_with_query("/admin/users", query).await?;
        page_from(body, "users", "user")
    }

    pub async fn orders(&self, query: &AdminListQuery) -> TawsilResult<Page<Order>> {
        let body: serde_json::Value = self.api.get_with_query("/admin/orders", query).await?;
        page_from(body, "orders", "order")
    }

    pub async fn complaints(&self, query: &AdminListQuery) -> TawsilResult<Page<Complaint>> {
        let body: serde_json::Value = self.api.get_with_query("/admin/complaints", query).await?;
        page_from(body, "complaints", "complaint")
    }

    pub async fn respond_to_complaint(&self, complaint_id: &str, reply: &ComplaintReply) -> TawsilResult<MessageResponse> {
        if reply.response.trim().is_empty() {
            return Err(AppError::MissingRequiredField("response".to_string()));
        }
        tracing::info!("Responding to complaint {}", complaint_id);
        self.api
            .put(&format!("/admin/complaints/{}/respond", complaint_id), reply)
            .await
    }

    /// Public banner list, ordered by position
    pub async fn advertisements(&self) -> TawsilResult<Vec<Advertisement>> {
        let mut ads: Vec<Advertisement> = self.api.get_list("/advertisements", "advertisement").await?;
        ads.sort_by_key(|ad| ad.position);
        Ok(ads)
    }

    pub async fn role_requests(&self, query: &AdminListQuery) -> TawsilResult<RoleRequestQueue> {
        let body: serde_json::Value = self.api.get_with_query("/admin/role-requests", query).await?;
        let pending_count = body.get("pending_count").and_then(|v| v.as_u64()).unwrap_or(0);
        Ok(RoleRequestQueue {
            requests: page_from(body, "requests", "role request")?,
            pending_count,
        })
    }

    pub async fn approve_role_request(&self, request_id: &str) -> TawsilResult<MessageResponse> {
        tracing::info!("Approving role request {}", request_id);
        self.api
            .put_empty(&format!("/admin/role-requests/{}/approve", request_id))
            .await
    }

    pub async fn reject_role_request(&self, request_id: &str) -> TawsilResult<MessageResponse> {
        tracing::info!("Rejecting role request {}", request_id);
        self.api
            .put_empty(&format!("/admin/role-requests/{}/reject", request_id))
            .await
    }

    /// A customer applying to become a driver or restaurant owner
    pub async fn submit_role_request(&self, request: &RoleRequestCreate) -> TawsilResult<serde_json::Value> {
        request.validate()?;
        tracing::info!("Submitting request to become {}", request.requested_role.as_str());
        self.api.post("/role-requests", request).await
    }

    pub async fn my_role_requests(&self) -> TawsilResult<Vec<RoleRequest>> {
        self.api.get_list("/role-requests/my", "role request").await
    }
}

/// Reads `{"<key>": [...], "total": n}` listings, skipping unreadable entries
fn page_from<T: DeserializeOwned>(mut body: serde_json::Value, key: &str, what: &str) -> TawsilResult<Page<T>> {
    let total = body.get("total").and_then(|v| v.as_u64());
    let list = body
        .get_mut(key)
        .map(serde_json::Value::take)
        .ok_or_else(|| AppError::InvalidFormat(format!("listing has no `{}` field", key)))?;

    let Decoded { items, skipped } = decode_each(list, what)?;
    if skipped > 0 {
        tracing::warn!("{} {} entries could not be read", skipped, what);
    }
    let total = total.unwrap_or(items.len() as u64);
    Ok(Page { items, total, skipped })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_skips_bad_entries() {
        let body = serde_json::json!({
            "complaints": [
                {"id": "c1", "user_id": "u1", "type": "order", "subject": "late", "message": "cold food", "status": "open"},
                {"id": "c2"}
            ],
            "total": 2
        });
        let page: Page<Complaint> = page_from(body, "complaints", "complaint").unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total, 2);
        assert_eq!(page.skipped, 1);
    }

    #[test]
    fn test_page_without_key_is_invalid() {
        let body = serde_json::json!({"total": 0});
        let result: TawsilResult<Page<Complaint>> = page_from(body, "complaints", "complaint");
        assert!(matches!(result, Err(AppError::InvalidFormat(_))));
    }
}
