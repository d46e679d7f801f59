//! Domain layer for the device lending backend.
//!
//! This crate contains:
//! - Domain models (Device, DeviceRequest, Caller)
//! - The device/request lifecycle state machine
//! - Domain error types

pub mod errors;
pub mod models;
pub mod services;

pub use errors::DomainError;
