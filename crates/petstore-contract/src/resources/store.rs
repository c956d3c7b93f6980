//! `/store` endpoints

use serde::Serialize;

use super::Resource;
use crate::{
    client::ApiClient,
    error::Result,
    http::{ApiRequest, ApiResponse},
};

/// Store API resource.
#[derive(Clone)]
pub struct Store {
    client: ApiClient,
}

impl Store {
    /// Create a new Store resource.
    pub(crate) fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// `POST /store/order`
    pub async fn place_order<B: Serialize + ?Sized>(&self, order: &B) -> Result<ApiResponse> {
        self.client
            .send(ApiRequest::post("/store/order").json(order)?)
            .await
    }

    /// `GET /store/order/{id}`
    pub async fn get_order(&self, order_id: i64) -> Result<ApiResponse> {
        self.client
            .send(ApiRequest::get(format!("/store/order/{order_id}")))
            .await
    }

    /// `DELETE /store/order/{id}`
    pub async fn delete_order(&self, order_id: i64) -> Result<ApiResponse> {
        self.client
            .send(ApiRequest::delete(format!("/store/order/{order_id}")))
            .await
    }

    /// `GET /store/inventory`
    pub async fn inventory(&self) -> Result<ApiResponse> {
        self.client.send(ApiRequest::get("/store/inventory")).await
    }
}

impl Resource for Store {
    fn client(&self) -> &ApiClient {
        &self.client
    }
}
