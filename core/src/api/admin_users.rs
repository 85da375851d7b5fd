//! Admin user management.

use serde::de::IgnoredAny;

use crate::client::{ApiClient, NO_BODY};
use crate::endpoint::Endpoint;
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::transport::Transport;
use crate::types::{ActiveFlag, AdminUser, AdminUserInput, Id, PasswordReset};

pub const LIST: Endpoint = Endpoint::new(HttpMethod::Get, "/admin-users");
pub const GET: Endpoint = Endpoint::new(HttpMethod::Get, "/admin-users/{}");
pub const CREATE: Endpoint = Endpoint::new(HttpMethod::Post, "/admin-users");
pub const UPDATE: Endpoint = Endpoint::new(HttpMethod::Put, "/admin-users/{}");
pub const RESET_PASSWORD: Endpoint =
    Endpoint::new(HttpMethod::Post, "/admin-users/{}/reset-password");

pub struct AdminUsers<'a, T> {
    client: &'a ApiClient<T>,
}

impl<'a, T: Transport> AdminUsers<'a, T> {
    pub(crate) fn new(client: &'a ApiClient<T>) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<AdminUser>, ApiError> {
        let users: Option<Vec<AdminUser>> = self.client.call(LIST, &[], NO_BODY).await?;
        Ok(users.unwrap_or_default())
    }

    pub async fn get(&self, id: Id) -> Result<AdminUser, ApiError> {
        self.client.call(GET, &[&id], NO_BODY).await
    }

    pub async fn create(&self, input: &AdminUserInput) -> Result<AdminUser, ApiError> {
        self.client.call(CREATE, &[], Some(input)).await
    }

    pub async fn update(&self, id: Id, input: &AdminUserInput) -> Result<AdminUser, ApiError> {
        self.client.call(UPDATE, &[&id], Some(input)).await
    }

    /// Toggle an account on or off. Sends only `{active}` to the update route.
    pub async fn set_active(&self, id: Id, active: bool) -> Result<AdminUser, ApiError> {
        self.client
            .call(UPDATE, &[&id], Some(&ActiveFlag { active }))
            .await
    }

    /// Ask the backend to reset a password, optionally to a chosen value.
    pub async fn reset_password(&self, id: Id, password: Option<&str>) -> Result<(), ApiError> {
        let body = PasswordReset {
            password: password.map(str::to_string),
        };
        let _: IgnoredAny = self
            .client
            .call(RESET_PASSWORD, &[&id], Some(&body))
            .await?;
        Ok(())
    }
}
