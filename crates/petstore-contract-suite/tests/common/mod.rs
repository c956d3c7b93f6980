//! Common test utilities: an in-memory Petstore behind wiremock

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use petstore_contract::ApiClient;
use serde_json::{Value, json};
use wiremock::matchers::path_regex;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

const PREFIX: &str = "/api/v3";
const VALID_PET_STATUSES: [&str; 3] = ["available", "pending", "sold"];

/// Ways the fake can break its contract.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quirk {
    /// Behave like the real service
    #[default]
    None,
    /// Every pet body carries an undeclared `nickname` field
    ExtraPetField,
    /// Creation endpoints answer 500
    FailingCreate,
    /// Missing entities answer 404 with a different wording
    RewordedNotFound,
    /// Every response is delayed
    Slow(Duration),
}

#[derive(Debug, Default)]
struct State {
    pets: BTreeMap<i64, Value>,
    orders: BTreeMap<i64, Value>,
}

/// Stateful stand-in for the service, mounted as one catch-all responder.
#[derive(Debug, Clone, Default)]
pub struct FakePetstore {
    state: Arc<Mutex<State>>,
    quirk: Quirk,
}

#[allow(dead_code)]
impl FakePetstore {
    pub fn with_quirk(quirk: Quirk) -> Self {
        Self {
            quirk,
            ..Self::default()
        }
    }

    pub fn has_pet(&self, id: i64) -> bool {
        self.state.lock().unwrap().pets.contains_key(&id)
    }

    pub fn has_order(&self, id: i64) -> bool {
        self.state.lock().unwrap().orders.contains_key(&id)
    }

    pub fn seed_order(&self, order: Value) {
        let id = order["id"].as_i64().expect("order id");
        self.state.lock().unwrap().orders.insert(id, order);
    }

    fn route(&self, request: &Request) -> ResponseTemplate {
        let path = request.url.path().trim_start_matches(PREFIX);
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        let mut state = self.state.lock().unwrap();

        match (request.method.as_str(), segments.as_slice()) {
            ("POST", ["pet"]) => match self.create_failure() {
                Some(failure) => failure,
                None => match normalize_pet(&request.body) {
                    Some(pet) => {
                        let id = pet["id"].as_i64().unwrap_or_default();
                        state.pets.insert(id, pet.clone());
                        self.pet_response(pet)
                    }
                    None => ResponseTemplate::new(400).set_body_string("Invalid input"),
                },
            },
            ("PUT", ["pet"]) => match normalize_pet(&request.body) {
                Some(pet) => {
                    let id = pet["id"].as_i64().unwrap_or_default();
                    if state.pets.contains_key(&id) {
                        state.pets.insert(id, pet.clone());
                        self.pet_response(pet)
                    } else {
                        self.not_found("Pet not found")
                    }
                }
                None => ResponseTemplate::new(400).set_body_string("Invalid input"),
            },
            ("GET", ["pet", "findByStatus"]) => {
                let status = request
                    .url
                    .query_pairs()
                    .find(|(k, _)| k == "status")
                    .map(|(_, v)| v.into_owned())
                    .unwrap_or_default();
                if VALID_PET_STATUSES.contains(&status.as_str()) {
                    let pets: Vec<Value> = state
                        .pets
                        .values()
                        .filter(|p| p["status"] == status.as_str())
                        .cloned()
                        .collect();
                    ResponseTemplate::new(200).set_body_json(pets)
                } else {
                    ResponseTemplate::new(400).set_body_json(json!({
                        "code": 400,
                        "message": format!(
                            "Input error: query parameter `status value `{status}` is not in the allowable values `[available, pending, sold]`"
                        )
                    }))
                }
            }
            ("GET", ["pet", id]) => match id.parse::<i64>().ok().and_then(|id| state.pets.get(&id)) {
                Some(pet) => self.pet_response(pet.clone()),
                None => self.not_found("Pet not found"),
            },
            ("DELETE", ["pet", id]) => {
                if let Ok(id) = id.parse::<i64>() {
                    state.pets.remove(&id);
                }
                ResponseTemplate::new(200).set_body_string("Pet deleted")
            }
            ("POST", ["store", "order"]) => match self.create_failure() {
                Some(failure) => failure,
                None => match serde_json::from_slice::<Value>(&request.body) {
                    Ok(order) if order["id"].is_i64() => {
                        let id = order["id"].as_i64().unwrap_or_default();
                        state.orders.insert(id, order.clone());
                        ResponseTemplate::new(200).set_body_json(order)
                    }
                    _ => ResponseTemplate::new(400).set_body_string("Invalid input"),
                },
            },
            ("GET", ["store", "order", id]) => {
                match id.parse::<i64>().ok().and_then(|id| state.orders.get(&id)) {
                    Some(order) => ResponseTemplate::new(200).set_body_json(order),
                    None => self.not_found("Order not found"),
                }
            }
            ("DELETE", ["store", "order", id]) => {
                if let Ok(id) = id.parse::<i64>() {
                    state.orders.remove(&id);
                }
                ResponseTemplate::new(200)
            }
            ("GET", ["store", "inventory"]) => {
                let count = |status: &str| {
                    state
                        .orders
                        .values()
                        .filter(|o| o["status"] == status)
                        .count()
                };
                ResponseTemplate::new(200).set_body_json(json!({
                    "approved": count("approved"),
                    "delivered": count("delivered"),
                }))
            }
            _ => ResponseTemplate::new(404),
        }
    }

    fn create_failure(&self) -> Option<ResponseTemplate> {
        (self.quirk == Quirk::FailingCreate)
            .then(|| ResponseTemplate::new(500).set_body_string("boom"))
    }

    fn pet_response(&self, mut pet: Value) -> ResponseTemplate {
        if self.quirk == Quirk::ExtraPetField {
            pet["nickname"] = json!("Bud");
        }
        ResponseTemplate::new(200).set_body_json(pet)
    }

    fn not_found(&self, message: &str) -> ResponseTemplate {
        let message = match self.quirk {
            Quirk::RewordedNotFound => message.replace("not found", "missing"),
            _ => message.to_string(),
        };
        ResponseTemplate::new(404).set_body_string(message)
    }
}

impl Respond for FakePetstore {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let response = self.route(request);
        match self.quirk {
            Quirk::Slow(delay) => response.set_delay(delay),
            _ => response,
        }
    }
}

/// The service fills in empty `photoUrls` and `tags` on every pet it returns.
fn normalize_pet(body: &[u8]) -> Option<Value> {
    let mut pet: Value = serde_json::from_slice(body).ok()?;
    let object = pet.as_object_mut()?;
    if !object.get("id")?.is_i64() || !object.get("name")?.is_string() {
        return None;
    }
    object.entry("photoUrls").or_insert_with(|| json!([]));
    object.entry("tags").or_insert_with(|| json!([]));
    Some(pet)
}

/// Start a mock server backed by `fake`.
pub async fn start(fake: &FakePetstore) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(path_regex(r"^/api/v3/.*"))
        .respond_with(fake.clone())
        .mount(&server)
        .await;
    server
}

/// Client pointed at the mock server's `/api/v3`
pub fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::builder()
        .base_url(format!("{}{PREFIX}", server.uri()))
        .timeout(Duration::from_secs(5))
        .build()
        .expect("Failed to build client")
}

/// A fake service and a client for it.
#[allow(dead_code)]
pub async fn petstore(quirk: Quirk) -> (FakePetstore, MockServer, ApiClient) {
    let fake = FakePetstore::with_quirk(quirk);
    let server = start(&fake).await;
    let client = client_for(&server);
    (fake, server, client)
}
