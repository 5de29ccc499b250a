//! HTTP middleware components

pub mod body_limit;
pub mod request_id;

pub use body_limit::payload_too_large_as_json;
pub use request_id::{REQUEST_ID_HEADER, RequestId, propagate_request_id};
