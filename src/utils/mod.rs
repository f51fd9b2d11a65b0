// src/utils/mod.rs
pub mod decode;
pub mod geo;
pub mod price;
