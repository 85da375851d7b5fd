//! Category CRUD.

use serde::de::IgnoredAny;

use crate::client::{ApiClient, NO_BODY};
use crate::endpoint::Endpoint;
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::transport::Transport;
use crate::types::{Category, CategoryInput, Id};

pub const LIST: Endpoint = Endpoint::new(HttpMethod::Get, "/categories");
pub const GET: Endpoint = Endpoint::new(HttpMethod::Get, "/categories/{}");
pub const CREATE: Endpoint = Endpoint::new(HttpMethod::Post, "/categories");
pub const UPDATE: Endpoint = Endpoint::new(HttpMethod::Put, "/categories/{}");
pub const DELETE: Endpoint = Endpoint::new(HttpMethod::Delete, "/categories/{}");

pub struct Categories<'a, T> {
    client: &'a ApiClient<T>,
}

impl<'a, T: Transport> Categories<'a, T> {
    pub(crate) fn new(client: &'a ApiClient<T>) -> Self {
        Self { client }
    }

    /// All categories. A missing `data` member reads as an empty list.
    pub async fn list(&self) -> Result<Vec<Category>, ApiError> {
        let categories: Option<Vec<Category>> = self.client.call(LIST, &[], NO_BODY).await?;
        Ok(categories.unwrap_or_default())
    }

    pub async fn get(&self, id: Id) -> Result<Category, ApiError> {
        self.client.call(GET, &[&id], NO_BODY).await
    }

    pub async fn create(&self, input: &CategoryInput) -> Result<Category, ApiError> {
        self.client.call(CREATE, &[], Some(input)).await
    }

    pub async fn update(&self, id: Id, input: &CategoryInput) -> Result<Category, ApiError> {
        self.client.call(UPDATE, &[&id], Some(input)).await
    }

    pub async fn delete(&self, id: Id) -> Result<(), ApiError> {
        let _: IgnoredAny = self.client.call(DELETE, &[&id], NO_BODY).await?;
        Ok(())
    }
}
