//! Scenarios against a real Petstore service
//!
//! These tests mutate the target service's data and are ignored by default.
//!
//! Run with:
//!   PETSTORE_BASE_URL=http://host:port/api/v3 cargo test -p petstore-contract-suite \
//!       --test live -- --ignored --test-threads=1 --nocapture

use petstore_contract::ApiClient;
use petstore_contract::assertions::JsonShape;
use petstore_contract_suite::{live_client, pet, run_all, store};
use rstest::rstest;

fn client() -> ApiClient {
    live_client().expect("PETSTORE_BASE_URL must name a reachable http(s) service")
}

#[tokio::test]
#[ignore = "requires a live Petstore service"]
async fn live_delete_nonexistent_pet() {
    pet::delete_nonexistent_pet(&client()).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a live Petstore service"]
async fn live_update_nonexistent_pet() {
    pet::update_nonexistent_pet(&client()).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a live Petstore service"]
async fn live_get_nonexistent_pet() {
    pet::get_nonexistent_pet(&client()).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a live Petstore service"]
async fn live_add_pet() {
    pet::add_pet(&client()).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a live Petstore service"]
async fn live_add_full_data_pet() {
    pet::add_full_data_pet(&client()).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a live Petstore service"]
async fn live_get_pet_by_id() {
    pet::get_pet_by_id(&client()).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a live Petstore service"]
async fn live_update_pet() {
    pet::update_pet(&client()).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a live Petstore service"]
async fn live_delete_pet() {
    pet::delete_pet(&client()).await.unwrap();
}

#[rstest]
#[case::available("available", 200, JsonShape::Array)]
#[case::pending("pending", 200, JsonShape::Array)]
#[case::sold("sold", 200, JsonShape::Array)]
#[case::dash("-", 400, JsonShape::Object)]
#[case::empty("", 400, JsonShape::Object)]
#[tokio::test]
#[ignore = "requires a live Petstore service"]
async fn live_find_by_status(
    #[case] status: &str,
    #[case] expected_code: u16,
    #[case] expected_shape: JsonShape,
) {
    pet::find_by_status(&client(), status, expected_code, expected_shape)
        .await
        .unwrap();
}

#[tokio::test]
#[ignore = "requires a live Petstore service"]
async fn live_place_order() {
    store::place_order(&client()).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a live Petstore service"]
async fn live_get_order_by_id() {
    store::get_order_by_id(&client()).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a live Petstore service"]
async fn live_delete_order() {
    store::delete_order(&client()).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a live Petstore service"]
async fn live_get_nonexistent_order() {
    store::get_nonexistent_order(&client()).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a live Petstore service"]
async fn live_get_inventory() {
    store::get_inventory(&client()).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a live Petstore service"]
async fn live_full_run() {
    let report = run_all(&client()).await;
    println!("{report}");
    report.assert_all_passed();
}
