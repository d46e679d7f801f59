//! Application services coordinating repositories, transactions and notifications.

pub mod device_registry;
pub mod request_workflow;

pub use device_registry::DeviceRegistry;
pub use request_workflow::RequestWorkflow;
