//! Contract checks shared by every scenario
//!
//! Each check returns `Err(Error::Assertion { .. })` naming the aspect of the
//! contract that was violated together with the expected and observed values,
//! so a failure report is readable without re-running the scenario. Schema
//! checks return `Error::SchemaViolation` instead.
//!
//! Checks come in two forms: free functions, and the fluent [`Expectation`]
//! chain started with [`expect`].
//!
//! ```rust
//! use petstore_contract::assertions::expect;
//! use petstore_contract::http::{ApiResponse, HeaderMap, StatusCode};
//! use petstore_contract::schema::SchemaKind;
//! use serde_json::json;
//! use std::time::Duration;
//!
//! let body = br#"{"approved": 3, "delivered": 9}"#.to_vec();
//! let response = ApiResponse::new(StatusCode::OK, HeaderMap::new(), body, Duration::ZERO);
//!
//! let inventory = expect(&response)
//!     .status(200)?
//!     .schema(SchemaKind::Inventory)?
//!     .field("approved", &json!(3))?
//!     .into_body()?;
//! assert_eq!(inventory["delivered"], 9);
//! # Ok::<(), petstore_contract::Error>(())
//! ```

use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::error::{Error, Result};
use crate::http::ApiResponse;
use crate::resources::ResourceKind;
use crate::schema::{self, SchemaKind};

/// Top-level JSON shape of a response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonShape {
    /// A JSON array
    Array,
    /// A JSON object
    Object,
}

impl JsonShape {
    /// Shape of `value`, if it is an array or an object.
    pub fn of(value: &Value) -> Option<JsonShape> {
        match value {
            Value::Array(_) => Some(JsonShape::Array),
            Value::Object(_) => Some(JsonShape::Object),
            _ => None,
        }
    }
}

impl fmt::Display for JsonShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            JsonShape::Array => "array",
            JsonShape::Object => "object",
        })
    }
}

/// Check the status code.
pub fn expect_status(response: &ApiResponse, expected: u16) -> Result<()> {
    let actual = response.status_code();
    if actual == expected {
        Ok(())
    } else {
        Err(Error::assertion(
            "status code",
            expected,
            format!("{actual} (body: {})", excerpt(&response.text())),
        ))
    }
}

/// Check that the body is exactly `expected`.
pub fn expect_text(response: &ApiResponse, expected: &str) -> Result<()> {
    let actual = response.text();
    if actual == expected {
        Ok(())
    } else {
        Err(Error::assertion(
            "response text",
            format!("{expected:?}"),
            format!("{:?}", excerpt(&actual)),
        ))
    }
}

/// Decode the body as JSON, reporting a non-JSON body as a contract violation.
pub fn expect_json(response: &ApiResponse) -> Result<Value> {
    response.json_value().map_err(|_| {
        Error::assertion(
            "response body",
            "a JSON document",
            format!("{:?}", excerpt(&response.text())),
        )
    })
}

/// Decode the body and validate it against the closed schema of `kind`.
pub fn expect_schema(response: &ApiResponse, kind: SchemaKind) -> Result<Value> {
    let body = expect_json(response)?;
    schema::validate(&body, kind)?;
    Ok(body)
}

/// Decode the body and check its top-level shape.
pub fn expect_shape(response: &ApiResponse, shape: JsonShape) -> Result<Value> {
    let body = expect_json(response)?;
    check_shape(&body, shape)?;
    Ok(body)
}

fn check_shape(body: &Value, shape: JsonShape) -> Result<()> {
    match JsonShape::of(body) {
        Some(actual) if actual == shape => Ok(()),
        Some(actual) => Err(Error::assertion("response shape", shape, actual)),
        None => Err(Error::assertion("response shape", shape, body)),
    }
}

/// Check a single top-level field of a decoded body.
pub fn expect_field(body: &Value, field: &str, expected: &Value) -> Result<()> {
    match body.get(field) {
        Some(actual) if actual == expected => Ok(()),
        Some(actual) => Err(Error::assertion(
            format!("field `{field}`"),
            expected,
            actual,
        )),
        None => Err(Error::assertion(
            format!("field `{field}`"),
            expected,
            "<missing>",
        )),
    }
}

/// Check that `body` echoes each of `fields` exactly as sent in `payload`.
///
/// Only fields present in the serialised payload are compared. The service
/// may fill in defaults (such as empty `photoUrls`) for the rest.
pub fn expect_echoed<P: Serialize + ?Sized>(
    payload: &P,
    body: &Value,
    fields: &[&str],
) -> Result<()> {
    let sent = serde_json::to_value(payload)?;
    for field in fields {
        if let Some(expected) = sent.get(*field) {
            expect_field(body, field, expected)?;
        }
    }
    Ok(())
}

/// Check the error message of a failed response.
///
/// When the body is a JSON object carrying a `message` string, that string is
/// compared. Otherwise the whole body is compared as literal text, which is
/// how the service reports missing entities today.
pub fn expect_error_message(response: &ApiResponse, expected: &str) -> Result<()> {
    if let Ok(Value::Object(body)) = response.json_value()
        && let Some(Value::String(message)) = body.get("message")
    {
        return if message == expected {
            Ok(())
        } else {
            Err(Error::assertion(
                "error message",
                format!("{expected:?}"),
                format!("{message:?}"),
            ))
        };
    }
    expect_text(response, expected)
}

/// Check the 404 contract of `resource`: status 404 with its literal message.
pub fn expect_not_found(response: &ApiResponse, resource: ResourceKind) -> Result<()> {
    expect_status(response, 404)?;
    expect_error_message(response, resource.not_found_message())
}

/// Start a fluent chain of checks on `response`.
pub fn expect(response: &ApiResponse) -> Expectation<'_> {
    Expectation {
        response,
        body: None,
    }
}

/// Fluent contract checks on one response.
///
/// Each step consumes the chain and returns it back on success, so `?` stops
/// at the first violated aspect. The decoded body is cached between steps.
#[derive(Debug)]
pub struct Expectation<'a> {
    response: &'a ApiResponse,
    body: Option<Value>,
}

impl<'a> Expectation<'a> {
    /// See [`expect_status`].
    pub fn status(self, expected: u16) -> Result<Self> {
        expect_status(self.response, expected)?;
        Ok(self)
    }

    /// See [`expect_text`].
    pub fn text(self, expected: &str) -> Result<Self> {
        expect_text(self.response, expected)?;
        Ok(self)
    }

    /// See [`expect_schema`].
    pub fn schema(mut self, kind: SchemaKind) -> Result<Self> {
        schema::validate(self.body()?, kind)?;
        Ok(self)
    }

    /// See [`expect_shape`].
    pub fn shape(mut self, shape: JsonShape) -> Result<Self> {
        check_shape(self.body()?, shape)?;
        Ok(self)
    }

    /// See [`expect_field`].
    pub fn field(mut self, field: &str, expected: &Value) -> Result<Self> {
        expect_field(self.body()?, field, expected)?;
        Ok(self)
    }

    /// See [`expect_echoed`].
    pub fn echoes<P: Serialize + ?Sized>(mut self, payload: &P, fields: &[&str]) -> Result<Self> {
        expect_echoed(payload, self.body()?, fields)?;
        Ok(self)
    }

    /// See [`expect_not_found`].
    pub fn not_found(self, resource: ResourceKind) -> Result<Self> {
        expect_not_found(self.response, resource)?;
        Ok(self)
    }

    /// Finish the chain, yielding the decoded body.
    pub fn into_body(mut self) -> Result<Value> {
        self.body()?;
        Ok(self.body.take().unwrap_or(Value::Null))
    }

    fn body(&mut self) -> Result<&Value> {
        if self.body.is_none() {
            self.body = Some(expect_json(self.response)?);
        }
        Ok(self.body.get_or_insert(Value::Null))
    }
}

fn excerpt(text: &str) -> String {
    const LIMIT: usize = 200;
    match text.char_indices().nth(LIMIT) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HeaderMap, StatusCode};
    use crate::types::{Pet, PetStatus};
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::time::Duration;

    fn response(status: u16, body: &str) -> ApiResponse {
        ApiResponse::new(
            StatusCode::from_u16(status).unwrap(),
            HeaderMap::new(),
            body.as_bytes().to_vec(),
            Duration::ZERO,
        )
    }

    #[test]
    fn test_status_mismatch_names_aspect() {
        let error = expect_status(&response(404, "Pet not found"), 200).unwrap_err();
        assert_eq!(
            error.to_string(),
            "status code mismatch: expected 200, got 404 (body: Pet not found)"
        );
    }

    #[test]
    fn test_text_exact_match() {
        let resp = response(200, "Pet deleted");
        assert!(expect_text(&resp, "Pet deleted").is_ok());
        assert!(expect_text(&resp, "pet deleted").is_err());
        assert!(expect_text(&resp, "Pet deleted ").is_err());
    }

    #[test]
    fn test_schema_requires_json() {
        let error = expect_schema(&response(200, "<html>"), SchemaKind::Pet).unwrap_err();
        assert_matches!(error, Error::Assertion { ref aspect, .. } => assert_eq!(aspect, "response body"));
    }

    #[test]
    fn test_schema_violation_propagates() {
        let body = r#"{"id": 1, "name": "Buddy", "status": "available", "owner": "me"}"#;
        let error = expect_schema(&response(200, body), SchemaKind::Pet).unwrap_err();
        assert_matches!(error, Error::SchemaViolation { ref schema, .. } => assert_eq!(schema, "Pet"));
    }

    #[test]
    fn test_shape() {
        assert!(expect_shape(&response(200, "[]"), JsonShape::Array).is_ok());
        assert!(expect_shape(&response(400, r#"{"code": 400}"#), JsonShape::Object).is_ok());

        let error = expect_shape(&response(200, "{}"), JsonShape::Array).unwrap_err();
        assert_eq!(
            error.to_string(),
            "response shape mismatch: expected array, got object"
        );

        let error = expect_shape(&response(200, "42"), JsonShape::Array).unwrap_err();
        assert_eq!(
            error.to_string(),
            "response shape mismatch: expected array, got 42"
        );
    }

    #[test]
    fn test_field_mismatch_and_missing() {
        let body = json!({"id": 1, "name": "Buddy"});

        assert!(expect_field(&body, "id", &json!(1)).is_ok());

        let error = expect_field(&body, "name", &json!("Rex")).unwrap_err();
        assert_eq!(
            error.to_string(),
            r#"field `name` mismatch: expected "Rex", got "Buddy""#
        );

        let error = expect_field(&body, "status", &json!("sold")).unwrap_err();
        assert_eq!(
            error.to_string(),
            r#"field `status` mismatch: expected "sold", got <missing>"#
        );
    }

    #[test]
    fn test_echoed_payload() {
        let payload = Pet::new(10, "doggie", PetStatus::Available)
            .with_category(1, "Dogs")
            .with_tag(0, "string");
        let body = json!({
            "id": 10,
            "name": "doggie",
            "category": {"id": 1, "name": "Dogs"},
            "photoUrls": [],
            "tags": [{"id": 0, "name": "string"}],
            "status": "available"
        });

        assert!(expect_echoed(&payload, &body, &["id", "name", "category", "tags", "status"]).is_ok());
    }

    #[test]
    fn test_echoed_ignores_defaults_for_unsent_fields() {
        let payload = Pet::new(1, "Buddy", PetStatus::Available);
        let body = json!({
            "id": 1,
            "name": "Buddy",
            "photoUrls": [],
            "tags": [],
            "status": "available"
        });

        let fields = ["id", "name", "category", "photoUrls", "tags", "status"];
        assert!(expect_echoed(&payload, &body, &fields).is_ok());
    }

    #[test]
    fn test_echoed_detects_changed_or_dropped_field() {
        let payload = Pet::new(1, "Buddy", PetStatus::Available);

        let renamed = json!({"id": 1, "name": "Max", "status": "available"});
        let error = expect_echoed(&payload, &renamed, &["id", "name"]).unwrap_err();
        assert_eq!(error.to_string(), r#"field `name` mismatch: expected "Buddy", got "Max""#);

        let dropped = json!({"id": 1, "name": "Buddy"});
        let error = expect_echoed(&payload, &dropped, &["status"]).unwrap_err();
        assert_matches!(error, Error::Assertion { ref actual, .. } => assert_eq!(actual, "<missing>"));
    }

    #[test]
    fn test_error_message_text_and_structured() {
        assert!(expect_error_message(&response(404, "Order not found"), "Order not found").is_ok());

        let structured = response(404, r#"{"code": 1, "message": "Order not found"}"#);
        assert!(expect_error_message(&structured, "Order not found").is_ok());

        let wrong = response(404, r#"{"code": 1, "message": "Nope"}"#);
        let error = expect_error_message(&wrong, "Order not found").unwrap_err();
        assert_matches!(error, Error::Assertion { ref aspect, .. } => assert_eq!(aspect, "error message"));
    }

    #[test]
    fn test_not_found_contract() {
        assert!(expect_not_found(&response(404, "Pet not found"), ResourceKind::Pet).is_ok());
        assert!(expect_not_found(&response(404, "Pet not found"), ResourceKind::Order).is_err());
        assert!(expect_not_found(&response(200, "Pet not found"), ResourceKind::Pet).is_err());
    }

    #[test]
    fn test_fluent_chain() {
        let payload = json!({"id": 1, "petId": 1, "quantity": 1, "status": "placed", "complete": true});
        let resp = response(200, &payload.to_string());

        let body = expect(&resp)
            .status(200)
            .unwrap()
            .schema(SchemaKind::Order)
            .unwrap()
            .shape(JsonShape::Object)
            .unwrap()
            .echoes(&payload, &["id", "petId", "quantity", "status", "complete"])
            .unwrap()
            .into_body()
            .unwrap();

        assert_eq!(body, payload);
    }

    #[test]
    fn test_fluent_chain_stops_at_first_failure() {
        let resp = response(404, "Order not found");
        let error = expect(&resp).status(200).and_then(|e| e.schema(SchemaKind::Order));
        assert_matches!(error, Err(Error::Assertion { ref aspect, .. }) => assert_eq!(aspect, "status code"));
    }

    #[test]
    fn test_excerpt_truncates_long_bodies() {
        let long = "x".repeat(500);
        let cut = excerpt(&long);
        assert_eq!(cut.len(), 203);
        assert!(cut.ends_with("..."));
        assert_eq!(excerpt("short"), "short");
    }
}
