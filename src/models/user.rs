// src/models/user.rs
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    Customer,   // Orders food
    Restaurant, // Runs the restaurant panel
    Driver,     // Delivers orders
    Admin,      // Platform administrator
    Moderator,  // Admin panel with reduced rights
    #[serde(other)]
    Unknown,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Customer => "customer",
            UserRole::Restaurant => "restaurant",
            UserRole::Driver => "driver",
            UserRole::Admin => "admin",
            UserRole::Moderator => "moderator",
            UserRole::Unknown => "unknown",
        }
    }

    pub fn is_staff(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Moderator)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub city_id: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

// Request/Response Models
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RegisterRequest {
    pub name: String,
    pub phone: String,
    pub password: String,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoginRequest {
    pub phone: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub user: User,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl RegisterRequest {
    /// Minimum password length enforced by the registration form
    pub const MIN_PASSWORD_LEN: usize = 6;

    pub fn validate(&self) -> Vec<crate::ValidationError> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(crate::ValidationError {
                field: "name".to_string(),
                message: "يرجى ملء جميع الحقول المطلوبة".to_string(),
            });
        }
        if self.phone.trim().is_empty() {
            errors.push(crate::ValidationError {
                field: "phone".to_string(),
                message: "يرجى ملء جميع الحقول المطلوبة".to_string(),
            });
        }
        if self.password.chars().count() < Self::MIN_PASSWORD_LEN {
            errors.push(crate::ValidationError {
                field: "password".to_string(),
                message: "كلمة المرور يجب أن تكون 6 أحرف على الأقل".to_string(),
            });
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_role_fails_closed() {
        let user: User = serde_json::from_str(
            r#"{"id":"u1","name":"سامر","phone":"0933000000","role":"superuser","created_at":"2025-01-10T12:00:00.123456"}"#,
        )
        .unwrap();
        assert_eq!(user.role, UserRole::Unknown);
        assert!(!user.role.is_staff());
        assert!(user.created_at.is_some());
    }

    #[test]
    fn test_register_validation() {
        let request = RegisterRequest {
            name: "".to_string(),
            phone: "0933000000".to_string(),
            password: "123".to_string(),
            role: UserRole::Customer,
            city_id: None,
        };
        let errors = request.validate();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "name");
        assert_eq!(errors[1].field, "password");
    }
}
