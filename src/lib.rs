pub mod errors;
pub mod map;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use errors::{TawsilError, TawsilResult, ValidationError};
pub use services::tracking_service::{TrackingHandle, TrackingService, TrackingSource};
pub use state::{ClientConfig, ClientState};
