//! `/pet` scenarios

use petstore_contract::assertions::{JsonShape, expect, expect_status, expect_text};
use petstore_contract::fixtures::{PetRecord, with_pet};
use petstore_contract::resources::pet::PET_DELETED_MESSAGE;
use petstore_contract::runner::{ScenarioTable, TableReport};
use petstore_contract::steps::Scenario;
use petstore_contract::{ApiClient, Pet, PetStatus, ResourceKind, Result, SchemaKind};
use serde_json::json;
use tracing::warn;

use crate::NONEXISTENT_ID;

/// Feature name reported for every pet scenario.
pub const FEATURE: &str = "Pet";

/// Fields a created or updated pet must echo back.
const ECHOED_FIELDS: &[&str] = &["id", "name", "category", "photoUrls", "tags", "status"];

/// DELETE a pet that does not exist: 404 with the literal not-found text.
pub async fn delete_nonexistent_pet(client: &ApiClient) -> Result<()> {
    let scenario = Scenario::new(FEATURE, "Delete a nonexistent pet");

    let response = scenario
        .step(
            "Send DELETE /pet/9999",
            client.pets().delete(NONEXISTENT_ID),
        )
        .await?;
    scenario
        .step("Check status code", async { expect_status(&response, 200) })
        .await?;
    scenario
        .step("Check response text", async {
            expect_text(&response, PET_DELETED_MESSAGE)
        })
        .await
}

/// PUT a pet that does not exist: 404 with the literal not-found text.
pub async fn update_nonexistent_pet(client: &ApiClient) -> Result<()> {
    let scenario = Scenario::new(FEATURE, "Update a nonexistent pet");

    let payload = Pet::new(NONEXISTENT_ID, "Non-existent Pet", PetStatus::Available);
    let response = scenario
        .step("Send PUT /pet", client.pets().update(&payload))
        .await?;
    scenario
        .step("Check not-found contract", async {
            expect(&response).not_found(ResourceKind::Pet).map(drop)
        })
        .await
}

/// GET a pet that does not exist: 404 with the literal not-found text.
pub async fn get_nonexistent_pet(client: &ApiClient) -> Result<()> {
    let scenario = Scenario::new(FEATURE, "Get a nonexistent pet");

    let response = scenario
        .step("Send GET /pet/9999", client.pets().get(NONEXISTENT_ID))
        .await?;
    scenario
        .step("Check not-found contract", async {
            expect(&response).not_found(ResourceKind::Pet).map(drop)
        })
        .await
}

/// POST the canonical pet and check the echo.
pub async fn add_pet(client: &ApiClient) -> Result<()> {
    let scenario = Scenario::new(FEATURE, "Add a new pet");
    let payload = Pet::new(1, "Buddy", PetStatus::Available);
    add_and_check(client, &scenario, &payload).await
}

/// POST a pet with every optional field set and check the echo.
pub async fn add_full_data_pet(client: &ApiClient) -> Result<()> {
    let scenario = Scenario::new(FEATURE, "Add a new pet with full data");
    let payload = Pet::new(10, "doggie", PetStatus::Available)
        .with_category(1, "Dogs")
        .with_photo_url("string")
        .with_tag(0, "string");
    add_and_check(client, &scenario, &payload).await
}

async fn add_and_check(client: &ApiClient, scenario: &Scenario, payload: &Pet) -> Result<()> {
    let response = scenario
        .step("Send POST /pet", client.pets().create(payload))
        .await?;

    let checked = scenario
        .step("Check status code and schema", async {
            expect(&response).status(200)?.schema(SchemaKind::Pet).map(drop)
        })
        .await;
    let checked = match checked {
        Ok(()) => {
            scenario
                .step("Check echoed pet fields", async {
                    expect(&response).echoes(payload, ECHOED_FIELDS).map(drop)
                })
                .await
        }
        Err(e) => Err(e),
    };

    discard_pet(client, payload.id).await;
    checked
}

/// Best-effort delete of a pet the scenario created outside a fixture.
async fn discard_pet(client: &ApiClient, pet_id: i64) {
    match client.pets().delete(pet_id).await {
        Ok(response) if response.is_success() || response.status_code() == 404 => {}
        Ok(response) => warn!(pet_id, status = response.status_code(), "Pet cleanup failed"),
        Err(e) => warn!(pet_id, error = %e, "Pet cleanup failed"),
    }
}

/// GET a freshly created pet by id.
pub async fn get_pet_by_id(client: &ApiClient) -> Result<()> {
    let scenario = Scenario::new(FEATURE, "Get a pet by id");

    with_pet(client, |pet: PetRecord| {
        let scenario = &scenario;
        async move {
            let response = scenario
                .step(format!("Send GET /pet/{}", pet.id), client.pets().get(pet.id))
                .await?;
            scenario
                .step("Check status code, schema and id", async {
                    expect(&response)
                        .status(200)?
                        .schema(SchemaKind::Pet)?
                        .field("id", &json!(pet.id))?
                        .field("name", &json!(pet.entity.name))
                        .map(drop)
                })
                .await
        }
    })
    .await
}

/// PUT a new name and status on a fixture pet and check the echo.
pub async fn update_pet(client: &ApiClient) -> Result<()> {
    let scenario = Scenario::new(FEATURE, "Update a pet");

    with_pet(client, |pet: PetRecord| {
        let scenario = &scenario;
        async move {
            let update = Pet::new(pet.id, "Buddy Updated", PetStatus::Sold);
            let response = scenario
                .step("Send PUT /pet", client.pets().update(&update))
                .await?;
            scenario
                .step("Check updated pet", async {
                    expect(&response)
                        .status(200)?
                        .schema(SchemaKind::Pet)?
                        .echoes(&update, &["id", "name", "status"])
                        .map(drop)
                })
                .await
        }
    })
    .await
}

/// Delete a fixture pet, then check it is gone.
pub async fn delete_pet(client: &ApiClient) -> Result<()> {
    let scenario = Scenario::new(FEATURE, "Delete a pet");

    with_pet(client, |pet: PetRecord| {
        let scenario = &scenario;
        async move {
            let deleted = scenario
                .step(
                    format!("Send DELETE /pet/{}", pet.id),
                    client.pets().delete(pet.id),
                )
                .await?;
            scenario
                .step("Check deletion", async {
                    expect(&deleted).status(200)?.text(PET_DELETED_MESSAGE).map(drop)
                })
                .await?;

            let fetched = scenario
                .step("Send GET for the deleted pet", client.pets().get(pet.id))
                .await?;
            scenario
                .step("Check the pet is gone", async {
                    expect(&fetched).not_found(ResourceKind::Pet).map(drop)
                })
                .await
        }
    })
    .await
}

/// One `findByStatus` case: the status sent, then the expected status code
/// and body shape.
pub async fn find_by_status(
    client: &ApiClient,
    status: &str,
    expected_code: u16,
    expected_shape: JsonShape,
) -> Result<()> {
    let scenario = Scenario::new(FEATURE, format!("Find pets by status {status:?}"));

    let response = scenario
        .step(
            "Send GET /pet/findByStatus",
            client.pets().find_by_status(status),
        )
        .await?;
    scenario
        .step("Check status code and body shape", async {
            expect(&response)
                .status(expected_code)?
                .shape(expected_shape)
                .map(drop)
        })
        .await
}

/// Every `findByStatus` case: the three valid statuses list pets, anything
/// else is rejected with an error object.
pub fn find_by_status_table() -> ScenarioTable<&'static str, (u16, JsonShape)> {
    let table = PetStatus::ALL
        .into_iter()
        .fold(ScenarioTable::new("Find pets by status"), |table, status| {
            table.case(status.as_str(), status.as_str(), (200, JsonShape::Array))
        });

    table
        .case("dash", "-", (400, JsonShape::Object))
        .case("empty", "", (400, JsonShape::Object))
}

/// Run [`find_by_status_table`], one independent outcome per case.
pub async fn find_by_status_all(client: &ApiClient) -> TableReport {
    find_by_status_table()
        .run(|case| {
            let status = case.input;
            let (code, shape) = case.expected;
            async move { find_by_status(client, status, code, shape).await }
        })
        .await
}
