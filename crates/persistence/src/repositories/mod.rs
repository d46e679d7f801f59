//! Repository implementations for database operations.

pub mod device;
pub mod device_request;

pub use device::{DeviceRepository, NewDevice};
pub use device_request::DeviceRequestRepository;
