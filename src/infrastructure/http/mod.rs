//! HTTP backend adapter

pub mod client;
pub mod wire;

pub use client::{HttpBackendConfig, HttpCallBackend};
