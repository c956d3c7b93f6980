//! # Petstore Contract
//!
//! Building blocks for end-to-end contract tests of a Petstore REST service:
//! - A thin async client for the `/pet` and `/store` endpoints
//! - Closed JSON schemas for pets, orders and the inventory
//! - Fixtures that create prerequisite entities, with scoped teardown
//! - Assertions that turn a divergent response into a descriptive failure
//! - Step narration and data-driven scenario tables
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use petstore_contract::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = ApiClient::new("http://localhost:8080/api/v3")?;
//!
//!     let response = client.pets().create(&Pet::new(1, "Buddy", PetStatus::Available)).await?;
//!     expect(&response)
//!         .status(200)?
//!         .schema(SchemaKind::Pet)?
//!         .echoes(&Pet::new(1, "Buddy", PetStatus::Available), &["id", "name", "status"])?;
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Re-export commonly used types
pub use client::{ApiClient, ApiClientBuilder};
pub use config::ContractConfig;
pub use error::{Error, FailureKind, Result};
pub use crate::http::{ApiRequest, ApiResponse};
pub use resources::ResourceKind;
pub use schema::{SchemaKind, SchemaRegistry};
pub use types::*;

// Module declarations
pub mod assertions;
pub mod client;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod http;
pub mod observability;
pub mod resources;
pub mod runner;
pub mod schema;
pub mod steps;
pub mod types;

#[cfg(feature = "trace")]
#[cfg_attr(docsrs, doc(cfg(feature = "trace")))]
pub use observability::init_tracing;

pub use serde_json::Value as JsonValue;

/// Prelude module for common imports
///
/// # Examples
///
/// ```rust
/// use petstore_contract::prelude::*;
/// ```
pub mod prelude {

    pub use crate::{
        ApiClient, ContractConfig, Error, FailureKind, Result, SchemaKind,
        assertions::{JsonShape, expect},
        fixtures::{OrderFixture, PetFixture, scoped, with_order, with_pet},
        resources::ResourceKind,
        runner::ScenarioTable,
        steps::Scenario,
        types::{Category, Inventory, Order, OrderStatus, Pet, PetStatus, Tag},
    };
}

/// Crate version, taken from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Base URL used when none is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api/v3";
