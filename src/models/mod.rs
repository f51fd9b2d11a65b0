// src/models/mod.rs
pub mod admin;
pub mod cart;
pub mod driver;
pub mod notification;
pub mod order;
pub mod restaurant;
pub mod tracking;
pub mod user;

pub use admin::*;
pub use cart::*;
pub use driver::*;
pub use notification::*;
pub use order::*;
pub use restaurant::*;
pub use tracking::*;
pub use user::*;
