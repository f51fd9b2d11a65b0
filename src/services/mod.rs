// src/services/mod.rs
pub mod admin_service;
pub mod api_client;
pub mod auth_service;
pub mod driver_service;
pub mod notification_service;
pub mod order_service;
pub mod restaurant_panel_service;
pub mod restaurant_service;
pub mod session;
pub mod tracking_service;
