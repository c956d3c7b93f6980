//! # Petstore contract scenarios
//!
//! Every Pet and Store scenario, written once as an async function over an
//! [`ApiClient`]. The crate's own tests run them against a wiremock stand-in
//! for the service; the ignored `live` tests run the very same functions
//! against the service named by `PETSTORE_BASE_URL`.
//!
//! Each scenario returns `Ok(())` when the service honours its contract and
//! an [`Error`](petstore_contract::Error) naming the violated aspect when it
//! does not. Scenarios are independent: [`run_all`] keeps going after a
//! failure and reports every scenario on its own.

#![warn(missing_docs)]

pub mod pet;
pub mod store;

use futures::FutureExt;
use futures::future::BoxFuture;
use petstore_contract::runner::{ScenarioTable, TableReport};
use petstore_contract::{ApiClient, ContractConfig, Result};

/// Id no scenario ever creates.
pub const NONEXISTENT_ID: i64 = 9999;

/// A scenario as a plain function pointer.
pub type ScenarioFn = for<'a> fn(&'a ApiClient) -> BoxFuture<'a, Result<()>>;

/// Build a client for the service named by the environment (and `.env`).
///
/// Also installs the tracing subscriber, so step markers show up under
/// `RUST_LOG=info`.
pub fn live_client() -> Result<ApiClient> {
    petstore_contract::init_tracing();
    ApiClient::from_config(ContractConfig::from_env()?)
}

/// Every scenario, labelled `feature/title`.
pub fn catalog() -> ScenarioTable<ScenarioFn, ()> {
    ScenarioTable::<ScenarioFn, ()>::new("Petstore contract")
        .case("pet/delete nonexistent", |c| pet::delete_nonexistent_pet(c).boxed(), ())
        .case("pet/update nonexistent", |c| pet::update_nonexistent_pet(c).boxed(), ())
        .case("pet/get nonexistent", |c| pet::get_nonexistent_pet(c).boxed(), ())
        .case("pet/add", |c| pet::add_pet(c).boxed(), ())
        .case("pet/add full data", |c| pet::add_full_data_pet(c).boxed(), ())
        .case("pet/get by id", |c| pet::get_pet_by_id(c).boxed(), ())
        .case("pet/update", |c| pet::update_pet(c).boxed(), ())
        .case("pet/delete", |c| pet::delete_pet(c).boxed(), ())
        .case("pet/find by status", |c| find_by_status_all(c).boxed(), ())
        .case("store/place order", |c| store::place_order(c).boxed(), ())
        .case("store/get order by id", |c| store::get_order_by_id(c).boxed(), ())
        .case("store/delete order", |c| store::delete_order(c).boxed(), ())
        .case("store/get nonexistent order", |c| store::get_nonexistent_order(c).boxed(), ())
        .case("store/get inventory", |c| store::get_inventory(c).boxed(), ())
}

async fn find_by_status_all(client: &ApiClient) -> Result<()> {
    let report = pet::find_by_status_all(client).await;
    if report.all_passed() {
        Ok(())
    } else {
        Err(petstore_contract::Error::assertion(
            "findByStatus table",
            "every case passing",
            report,
        ))
    }
}

/// Run every scenario in [`catalog`] order, sequentially.
pub async fn run_all(client: &ApiClient) -> TableReport {
    catalog().run(|case| (case.input)(client)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_labels_are_unique() {
        let catalog = catalog();
        let mut labels: Vec<_> = catalog.cases().iter().map(|c| c.label.as_str()).collect();
        let total = labels.len();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), total);
        assert_eq!(total, 14);
    }

    #[test]
    fn test_find_by_status_table_cases() {
        let table = pet::find_by_status_table();
        let inputs: Vec<_> = table.cases().iter().map(|c| c.input).collect();
        assert_eq!(inputs, vec!["available", "pending", "sold", "-", ""]);
        assert!(
            table.cases()[..3]
                .iter()
                .all(|c| c.expected.0 == 200)
        );
        assert!(table.cases()[3..].iter().all(|c| c.expected.0 == 400));
    }
}
