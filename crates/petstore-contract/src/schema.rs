//! Closed JSON Schema contracts for the Pet, Order and Inventory representations
//!
//! Schemas are used purely for validation, never for constructing values. Every
//! schema is closed (`additionalProperties: false`), so an undeclared field in a
//! response is a violation just like a missing required one.
//!
//! ```rust
//! use petstore_contract::schema::{self, SchemaKind};
//! use serde_json::json;
//!
//! let order = json!({
//!     "id": 1, "petId": 1, "quantity": 1, "status": "placed", "complete": true
//! });
//! schema::validate(&order, SchemaKind::Order)?;
//!
//! let extra = json!({"approved": 1, "delivered": 2, "placed": 3});
//! assert!(schema::validate(&extra, SchemaKind::Inventory).is_err());
//! # Ok::<(), petstore_contract::Error>(())
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::{LazyLock, OnceLock};

use jsonschema::Validator;
use serde_json::{Value, json};
use tracing::debug;

use crate::error::{Error, Result};

/// Resource representations that carry a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    /// A pet as returned by `/pet` endpoints
    Pet,
    /// A store order
    Order,
    /// Store inventory status counts
    Inventory,
}

impl SchemaKind {
    /// Every schema in the registry.
    pub const ALL: [SchemaKind; 3] = [SchemaKind::Pet, SchemaKind::Order, SchemaKind::Inventory];

    /// The JSON Schema document for this resource.
    pub fn definition(self) -> &'static Value {
        match self {
            SchemaKind::Pet => &PET_SCHEMA,
            SchemaKind::Order => &ORDER_SCHEMA,
            SchemaKind::Inventory => &INVENTORY_SCHEMA,
        }
    }

    /// Name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            SchemaKind::Pet => "Pet",
            SchemaKind::Order => "Order",
            SchemaKind::Inventory => "Inventory",
        }
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

static PET_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "type": "object",
        "properties": {
            "id": {"type": "integer"},
            "name": {"type": "string"},
            "category": {
                "type": "object",
                "properties": {
                    "id": {"type": "integer"},
                    "name": {"type": "string"}
                },
                "additionalProperties": false
            },
            "photoUrls": {
                "type": "array",
                "items": {"type": "string"}
            },
            "tags": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "id": {"type": "integer"},
                        "name": {"type": "string"}
                    },
                    "additionalProperties": false
                }
            },
            "status": {
                "type": "string",
                "enum": ["available", "pending", "sold"]
            }
        },
        "required": ["id", "name", "status"],
        "additionalProperties": false
    })
});

static ORDER_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "type": "object",
        "properties": {
            "id": {"type": "integer"},
            "petId": {"type": "integer"},
            "quantity": {"type": "integer"},
            "status": {
                "type": "string",
                "enum": ["placed", "approved", "delivered", "canceled"]
            },
            "complete": {"type": "boolean"}
        },
        "required": ["id", "petId", "quantity", "status", "complete"],
        "additionalProperties": false
    })
});

static INVENTORY_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "type": "object",
        "properties": {
            "approved": {"type": "integer"},
            "delivered": {"type": "integer"}
        },
        "required": ["approved", "delivered"],
        "additionalProperties": false
    })
});

/// Compiled validators, one per [`SchemaKind`].
pub struct SchemaRegistry {
    validators: HashMap<SchemaKind, Validator>,
}

impl fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("schemas", &self.validators.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl SchemaRegistry {
    /// Compile every schema.
    ///
    /// # Errors
    ///
    /// Returns `Error::SchemaCompile` if a schema document is malformed.
    pub fn new() -> Result<Self> {
        let mut validators = HashMap::with_capacity(SchemaKind::ALL.len());
        for kind in SchemaKind::ALL {
            validators.insert(kind, compile(kind.definition(), kind.name())?);
        }
        debug!(count = validators.len(), "Compiled resource schemas");
        Ok(Self { validators })
    }

    /// The process-wide registry, compiled on first use.
    pub fn shared() -> Result<&'static SchemaRegistry> {
        static SHARED: OnceLock<SchemaRegistry> = OnceLock::new();

        if let Some(registry) = SHARED.get() {
            return Ok(registry);
        }
        let registry = SchemaRegistry::new()?;
        Ok(SHARED.get_or_init(|| registry))
    }

    /// Validate `instance` against the schema of `kind`.
    ///
    /// # Errors
    ///
    /// Returns `Error::SchemaViolation` listing every violated clause.
    pub fn validate(&self, instance: &Value, kind: SchemaKind) -> Result<()> {
        let validator = self
            .validators
            .get(&kind)
            .ok_or_else(|| Error::MissingConfig(format!("no schema registered for {kind}")))?;

        let violations = collect_violations(validator, instance);
        if violations.is_empty() {
            return Ok(());
        }

        debug!(schema = %kind, violations = violations.len(), "Schema validation failed");
        Err(Error::SchemaViolation {
            schema: kind.name().to_string(),
            instance: instance.clone(),
            violations,
        })
    }
}

/// Validate `instance` against a registered resource schema.
pub fn validate(instance: &Value, kind: SchemaKind) -> Result<()> {
    SchemaRegistry::shared()?.validate(instance, kind)
}

/// Validate `instance` against an ad-hoc schema document.
///
/// Violations are reported like registered schemas, with `label` as the
/// schema name.
pub fn validate_against(instance: &Value, schema: &Value, label: &str) -> Result<()> {
    let validator = compile(schema, label)?;
    let violations = collect_violations(&validator, instance);
    if violations.is_empty() {
        return Ok(());
    }

    debug!(schema = label, violations = violations.len(), "Schema validation failed");
    Err(Error::SchemaViolation {
        schema: label.to_string(),
        instance: instance.clone(),
        violations,
    })
}

fn compile(schema: &Value, name: &str) -> Result<Validator> {
    jsonschema::validator_for(schema).map_err(|e| Error::SchemaCompile {
        schema: name.to_string(),
        message: e.to_string(),
    })
}

fn collect_violations(validator: &Validator, instance: &Value) -> Vec<String> {
    validator
        .iter_errors(instance)
        .map(|e| {
            let path = e.instance_path.to_string();
            let path = if path.is_empty() { "/".to_string() } else { path };
            format!("{e} (at {path})")
        })
        .collect()
}
