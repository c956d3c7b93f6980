//! API resource endpoints
//!
//! Each resource returns the raw [`ApiResponse`](crate::http::ApiResponse):
//! deciding whether a status or body honours the contract is the job of the
//! [`assertions`](crate::assertions) layer, not of the endpoint wrappers.

pub mod pet;
pub mod store;

pub use pet::Pets;
pub use store::Store;

use crate::client::ApiClient;
use std::fmt;

/// Base trait for API resources.
pub trait Resource {
    /// Get a reference to the client.
    fn client(&self) -> &ApiClient;
}

/// Resource families served by the API, used to pick literal error wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// `/pet`
    Pet,
    /// `/store/order`
    Order,
}

impl ResourceKind {
    /// Body the service sends with a 404 for this resource.
    pub fn not_found_message(self) -> &'static str {
        match self {
            ResourceKind::Pet => "Pet not found",
            ResourceKind::Order => "Order not found",
        }
    }

    /// Lower-case name used in logs and fixture errors.
    pub fn name(self) -> &'static str {
        match self {
            ResourceKind::Pet => "pet",
            ResourceKind::Order => "order",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
