//! `/store` scenarios

use petstore_contract::assertions::expect;
use petstore_contract::fixtures::{OrderRecord, canonical_order, with_order};
use petstore_contract::steps::Scenario;
use petstore_contract::{ApiClient, Inventory, ResourceKind, Result, SchemaKind};
use serde_json::json;
use tracing::{info, warn};

use crate::NONEXISTENT_ID;

/// Feature name reported for every store scenario.
pub const FEATURE: &str = "Store";

/// An order echoes every field it was placed with.
const ORDER_FIELDS: &[&str] = &["id", "petId", "quantity", "status", "complete"];

/// POST the canonical order: 200, closed Order schema, every field echoed.
pub async fn place_order(client: &ApiClient) -> Result<()> {
    let scenario = Scenario::new(FEATURE, "Place an order");
    let payload = canonical_order();

    let response = scenario
        .step("Send POST /store/order", client.store().place_order(&payload))
        .await?;
    let checked = scenario
        .step("Check status code, schema and echoed fields", async {
            expect(&response)
                .status(200)?
                .schema(SchemaKind::Order)?
                .echoes(&payload, ORDER_FIELDS)
                .map(drop)
        })
        .await;

    match client.store().delete_order(payload.id).await {
        Ok(response) if response.is_success() || response.status_code() == 404 => {}
        Ok(response) => warn!(
            order_id = payload.id,
            status = response.status_code(),
            "Order cleanup failed"
        ),
        Err(e) => warn!(order_id = payload.id, error = %e, "Order cleanup failed"),
    }
    checked
}

/// GET a freshly placed order by id.
pub async fn get_order_by_id(client: &ApiClient) -> Result<()> {
    let scenario = Scenario::new(FEATURE, "Get an order by id");

    with_order(client, |order: OrderRecord| {
        let scenario = &scenario;
        async move {
            let response = scenario
                .step(
                    format!("Send GET /store/order/{}", order.id),
                    client.store().get_order(order.id),
                )
                .await?;
            scenario
                .step("Check status code, schema and id", async {
                    expect(&response)
                        .status(200)?
                        .schema(SchemaKind::Order)?
                        .field("id", &json!(order.id))
                        .map(drop)
                })
                .await
        }
    })
    .await
}

/// Delete an order, then check it can no longer be fetched.
pub async fn delete_order(client: &ApiClient) -> Result<()> {
    let scenario = Scenario::new(FEATURE, "Delete an order");

    with_order(client, |order: OrderRecord| {
        let scenario = &scenario;
        async move {
            let deleted = scenario
                .step(
                    format!("Send DELETE /store/order/{}", order.id),
                    client.store().delete_order(order.id),
                )
                .await?;
            scenario
                .step("Check status code", async {
                    expect(&deleted).status(200).map(drop)
                })
                .await?;

            let fetched = scenario
                .step(
                    "Send GET for the deleted order",
                    client.store().get_order(order.id),
                )
                .await?;
            scenario
                .step("Check the order is gone", async {
                    expect(&fetched).not_found(ResourceKind::Order).map(drop)
                })
                .await
        }
    })
    .await
}

/// GET an order that does not exist: 404 with the literal not-found text.
pub async fn get_nonexistent_order(client: &ApiClient) -> Result<()> {
    let scenario = Scenario::new(FEATURE, "Get a nonexistent order");

    let response = scenario
        .step(
            "Send GET /store/order/9999",
            client.store().get_order(NONEXISTENT_ID),
        )
        .await?;
    scenario
        .step("Check not-found contract", async {
            expect(&response).not_found(ResourceKind::Order).map(drop)
        })
        .await
}

/// GET the inventory: 200 and exactly `approved` and `delivered` counts.
pub async fn get_inventory(client: &ApiClient) -> Result<()> {
    let scenario = Scenario::new(FEATURE, "Get the store inventory");

    let response = scenario
        .step("Send GET /store/inventory", client.store().inventory())
        .await?;
    let body = scenario
        .step("Check status code and schema", async {
            expect(&response)
                .status(200)?
                .schema(SchemaKind::Inventory)?
                .into_body()
        })
        .await?;

    let inventory: Inventory = serde_json::from_value(body)?;
    info!(
        approved = inventory.approved,
        delivered = inventory.delivered,
        "Inventory counts"
    );
    Ok(())
}
