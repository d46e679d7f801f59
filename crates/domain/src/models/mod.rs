//! Domain models for the device lending service.

pub mod caller;
pub mod device;
pub mod device_request;
pub mod pagination;

pub use caller::Caller;
pub use device::{
    CreateDeviceRequest, Device, DeviceCategory, DeviceFilter, DeviceStatus, DeviceType,
    LifecycleState, ListDevicesQuery, ListDevicesResponse, UpdateDeviceRequest,
};
pub use device_request::{
    Decision, DeviceRequest, ListRequestsQuery, ListRequestsResponse, ProcessRequestRequest,
    ProcessRequestResponse, ReportType, RequestFilter, RequestStatus, RequestType,
    SubmitDeviceRequest, SubmitRequestPayload,
};
pub use pagination::{PageRequest, Pagination};
