//! `/pet` endpoints

use serde::Serialize;

use super::Resource;
use crate::{
    client::ApiClient,
    error::Result,
    http::{ApiRequest, ApiResponse},
};

/// Literal body of a successful `DELETE /pet/{id}`.
pub const PET_DELETED_MESSAGE: &str = "Pet deleted";

/// Pet API resource.
#[derive(Clone)]
pub struct Pets {
    client: ApiClient,
}

impl Pets {
    /// Create a new Pets resource.
    pub(crate) fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// `POST /pet`
    ///
    /// `pet` is usually a [`Pet`](crate::types::Pet), but any serializable
    /// body is accepted so malformed payloads can be sent on purpose.
    pub async fn create<B: Serialize + ?Sized>(&self, pet: &B) -> Result<ApiResponse> {
        self.client.send(ApiRequest::post("/pet").json(pet)?).await
    }

    /// `GET /pet/{id}`
    pub async fn get(&self, pet_id: i64) -> Result<ApiResponse> {
        self.client
            .send(ApiRequest::get(format!("/pet/{pet_id}")))
            .await
    }

    /// `PUT /pet`
    pub async fn update<B: Serialize + ?Sized>(&self, pet: &B) -> Result<ApiResponse> {
        self.client.send(ApiRequest::put("/pet").json(pet)?).await
    }

    /// `DELETE /pet/{id}`
    pub async fn delete(&self, pet_id: i64) -> Result<ApiResponse> {
        self.client
            .send(ApiRequest::delete(format!("/pet/{pet_id}")))
            .await
    }

    /// `GET /pet/findByStatus?status=...`
    ///
    /// Takes the raw string so values outside `available|pending|sold`
    /// (including the empty string) can be exercised.
    pub async fn find_by_status(&self, status: &str) -> Result<ApiResponse> {
        self.client
            .send(ApiRequest::get("/pet/findByStatus").query("status", status))
            .await
    }
}

impl Resource for Pets {
    fn client(&self) -> &ApiClient {
        &self.client
    }
}
