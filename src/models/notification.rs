// src/models/notification.rs
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    OrderUpdate,
    NewOrder,
    Promotion,
    #[default]
    General,
    #[serde(other)]
    Other,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Notification {
    pub id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub body: String,
    /// Older records carry their text here instead of `body`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: NotificationType,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

impl Notification {
    pub fn text(&self) -> &str {
        if self.body.is_empty() {
            self.message.as_deref().unwrap_or_default()
        } else {
            &self.body
        }
    }

    /// Order this notification refers to, if any
    pub fn order_id(&self) -> Option<&str> {
        self.data.as_ref()?.get("order_id")?.as_str()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnreadCount {
    pub count: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PushPlatform {
    Android,
    Ios,
    Web,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PushTokenRegistration {
    pub push_token: String,
    pub platform: PushPlatform,
}
