//! Wire-level resource representations
//!
//! These types mirror what the service sends and accepts. They live in the
//! remote service; the suite only builds payloads and reads echoes.

mod order;
mod pet;

pub use order::{Inventory, Order, OrderStatus};
pub use pet::{Category, Pet, PetStatus, Tag};

/// Error returned when parsing an unknown status string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl std::fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown status `{}`", self.0)
    }
}

impl std::error::Error for UnknownStatus {}
