//! HTTP layer: request/response values and the transport seam
//!
//! The suite only needs `request(method, url, json?, params?) -> {status, text, json()}`.
//! [`HttpTransport`] is that seam; [`ReqwestTransport`] is the default implementation.

pub use request::ApiRequest;
pub use response::ApiResponse;
pub use transport::{HttpTransport, ReqwestTransport};

mod request;
mod response;
mod transport;

// Re-export HTTP types from the http crate for convenience
pub use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
