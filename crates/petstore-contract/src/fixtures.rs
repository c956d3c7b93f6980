//! Fixture provider: prerequisite entities created through the service itself
//!
//! [`create_pet`] and [`create_order`] POST a canonical payload and hand back the
//! decoded response. One call creates one fresh entity; nothing is cached or
//! shared between scenarios, and nothing is cleaned up unless the scenario does
//! it.
//!
//! [`scoped`] (and the [`with_pet`] / [`with_order`] shorthands) adds guaranteed
//! teardown: the entity is deleted when the body finishes, whether it returned
//! `Ok`, returned `Err`, or panicked.

use async_trait::async_trait;
use futures::FutureExt;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use tracing::{debug, warn};

use crate::client::ApiClient;
use crate::error::{Error, Result};
use crate::http::ApiResponse;
use crate::resources::ResourceKind;
use crate::types::{Order, OrderStatus, Pet, PetStatus};

/// Id of the canonical fixture pet.
pub const FIXTURE_PET_ID: i64 = 1;

/// Id of the canonical fixture order.
pub const FIXTURE_ORDER_ID: i64 = 1;

/// The canonical pet payload: `{id: 1, name: "Buddy", status: "available"}`.
pub fn canonical_pet() -> Pet {
    Pet::new(FIXTURE_PET_ID, "Buddy", PetStatus::Available)
}

/// The canonical order payload.
pub fn canonical_order() -> Order {
    Order::new(FIXTURE_ORDER_ID, FIXTURE_PET_ID, 1, OrderStatus::Placed, true)
}

/// An entity created by a fixture.
#[derive(Debug, Clone, PartialEq)]
pub struct Created<T> {
    /// Identifier echoed by the service
    pub id: i64,
    /// The response decoded into the resource type
    pub entity: T,
    /// The full response body, including fields the typed view drops
    pub body: Value,
}

/// A pet created by [`create_pet`].
pub type PetRecord = Created<Pet>;

/// An order created by [`create_order`].
pub type OrderRecord = Created<Order>;

/// Create the canonical pet.
pub async fn create_pet(client: &ApiClient) -> Result<PetRecord> {
    create_pet_from(client, &canonical_pet()).await
}

/// Create a pet from a caller-chosen payload.
///
/// # Errors
///
/// Returns `Error::FixtureSetup` if the service does not answer 2xx with a
/// decodable pet.
pub async fn create_pet_from(client: &ApiClient, pet: &Pet) -> Result<PetRecord> {
    let response = client
        .pets()
        .create(pet)
        .await
        .map_err(|e| e.context("pet fixture"))?;
    let record = decode_created(ResourceKind::Pet, "POST /pet", &response, |p: &Pet| p.id)?;
    debug!(pet_id = record.id, "Pet fixture created");
    Ok(record)
}

/// Create the canonical order.
pub async fn create_order(client: &ApiClient) -> Result<OrderRecord> {
    create_order_from(client, &canonical_order()).await
}

/// Create an order from a caller-chosen payload.
///
/// # Errors
///
/// Returns `Error::FixtureSetup` if the service does not answer 2xx with a
/// decodable order.
pub async fn create_order_from(client: &ApiClient, order: &Order) -> Result<OrderRecord> {
    let response = client
        .store()
        .place_order(order)
        .await
        .map_err(|e| e.context("order fixture"))?;
    let record = decode_created(
        ResourceKind::Order,
        "POST /store/order",
        &response,
        |o: &Order| o.id,
    )?;
    debug!(order_id = record.id, "Order fixture created");
    Ok(record)
}

fn decode_created<T: DeserializeOwned>(
    resource: ResourceKind,
    call: &str,
    response: &ApiResponse,
    id_of: impl Fn(&T) -> i64,
) -> Result<Created<T>> {
    if !response.is_success() {
        return Err(Error::fixture(
            resource.name(),
            format!(
                "{call} returned {}: {}",
                response.status_code(),
                response.text()
            ),
        ));
    }

    let body = response.json_value().map_err(|e| {
        Error::fixture(resource.name(), format!("{call} returned a non-JSON body: {e}"))
    })?;
    let entity: T = serde_json::from_value(body.clone()).map_err(|e| {
        Error::fixture(
            resource.name(),
            format!("{call} returned an undecodable {resource}: {e}; body: {body}"),
        )
    })?;

    Ok(Created {
        id: id_of(&entity),
        entity,
        body,
    })
}

/// An entity a scenario needs, with matching setup and teardown.
#[async_trait]
pub trait Fixture: Send + Sync {
    /// What setup hands to the scenario.
    type Record: Clone + Send + Sync;

    /// Create the entity.
    async fn setup(&self, client: &ApiClient) -> Result<Self::Record>;

    /// Delete the entity. An entity that is already gone is not an error.
    async fn teardown(&self, client: &ApiClient, record: &Self::Record) -> Result<()>;
}

/// A pet that is deleted when its scope ends.
#[derive(Debug, Clone)]
pub struct PetFixture {
    pet: Pet,
}

impl PetFixture {
    /// Create from a payload.
    pub fn new(pet: Pet) -> Self {
        Self { pet }
    }
}

impl Default for PetFixture {
    fn default() -> Self {
        Self::new(canonical_pet())
    }
}

#[async_trait]
impl Fixture for PetFixture {
    type Record = PetRecord;

    async fn setup(&self, client: &ApiClient) -> Result<PetRecord> {
        create_pet_from(client, &self.pet).await
    }

    async fn teardown(&self, client: &ApiClient, record: &PetRecord) -> Result<()> {
        let response = client.pets().delete(record.id).await?;
        check_teardown(ResourceKind::Pet, record.id, &response)
    }
}

/// An order that is deleted when its scope ends.
#[derive(Debug, Clone)]
pub struct OrderFixture {
    order: Order,
}

impl OrderFixture {
    /// Create from a payload.
    pub fn new(order: Order) -> Self {
        Self { order }
    }
}

impl Default for OrderFixture {
    fn default() -> Self {
        Self::new(canonical_order())
    }
}

#[async_trait]
impl Fixture for OrderFixture {
    type Record = OrderRecord;

    async fn setup(&self, client: &ApiClient) -> Result<OrderRecord> {
        create_order_from(client, &self.order).await
    }

    async fn teardown(&self, client: &ApiClient, record: &OrderRecord) -> Result<()> {
        let response = client.store().delete_order(record.id).await?;
        check_teardown(ResourceKind::Order, record.id, &response)
    }
}

fn check_teardown(resource: ResourceKind, id: i64, response: &ApiResponse) -> Result<()> {
    if response.is_success() || response.status_code() == 404 {
        debug!(%resource, id, status = response.status_code(), "Fixture torn down");
        Ok(())
    } else {
        Err(Error::assertion(
            format!("{resource} {id} teardown status"),
            "2xx or 404",
            response.status_code(),
        ))
    }
}

/// Run `body` with a freshly created entity, deleting it on every exit path.
///
/// Setup failures abort before `body` runs. A teardown failure is logged and
/// never replaces the body's own outcome. If `body` panics, the entity is still
/// deleted and the panic then resumes.
pub async fn scoped<X, F, Fut, T>(client: &ApiClient, fixture: &X, body: F) -> Result<T>
where
    X: Fixture,
    F: FnOnce(X::Record) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let record = fixture.setup(client).await?;

    let outcome = AssertUnwindSafe(body(record.clone())).catch_unwind().await;

    if let Err(e) = fixture.teardown(client, &record).await {
        warn!(error = %e, "Fixture teardown failed");
    }

    match outcome {
        Ok(result) => result,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}

/// [`scoped`] with the canonical pet.
pub async fn with_pet<F, Fut, T>(client: &ApiClient, body: F) -> Result<T>
where
    F: FnOnce(PetRecord) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    scoped(client, &PetFixture::default(), body).await
}

/// [`scoped`] with the canonical order.
pub async fn with_order<F, Fut, T>(client: &ApiClient, body: F) -> Result<T>
where
    F: FnOnce(OrderRecord) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    scoped(client, &OrderFixture::default(), body).await
}
