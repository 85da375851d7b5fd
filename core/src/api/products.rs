//! Product CRUD, publishing and response reshaping.
//!
//! The backend nests price and stock under `pricing` and `inventory` and does
//! not always denormalize the category name. Reads flatten those into the
//! top-level fields `Product` exposes; an explicit top-level value always wins
//! over the nested one, and a JSON `null` counts as absent.

use serde::de::IgnoredAny;
use serde_json::{Map, Value};

use crate::client::{ApiClient, NO_BODY};
use crate::endpoint::Endpoint;
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::transport::Transport;
use crate::types::{Id, Page, Product, ProductInput, ProductQuery};

pub const LIST: Endpoint = Endpoint::new(HttpMethod::Get, "/products");
pub const GET: Endpoint = Endpoint::new(HttpMethod::Get, "/products/{}");
pub const CREATE: Endpoint = Endpoint::new(HttpMethod::Post, "/products");
pub const UPDATE: Endpoint = Endpoint::new(HttpMethod::Put, "/products/{}");
pub const PUBLISH: Endpoint = Endpoint::new(HttpMethod::Post, "/products/{}/publish");
pub const UNPUBLISH: Endpoint = Endpoint::new(HttpMethod::Post, "/products/{}/unpublish");
pub const DELETE: Endpoint = Endpoint::new(HttpMethod::Delete, "/products/{}");
pub const DELETE_IMAGE: Endpoint = Endpoint::new(HttpMethod::Delete, "/products/{}/images/{}");

pub const IMAGE_ACCEPT: &str = "image/*";

pub struct Products<'a, T> {
    client: &'a ApiClient<T>,
}

impl<'a, T: Transport> Products<'a, T> {
    pub(crate) fn new(client: &'a ApiClient<T>) -> Self {
        Self { client }
    }

    /// One page of products, flattened to its `content` list.
    pub async fn list(&self, query: &ProductQuery) -> Result<Vec<Product>, ApiError> {
        let qs = query.to_query_string();
        let mut path = LIST.path(&[])?;
        if !qs.is_empty() {
            path = format!("{path}?{qs}");
        }
        let page: Page<Value> = self.client.execute(LIST.method, &path, NO_BODY).await?;
        page.content.into_iter().map(reshape_list_item).collect()
    }

    pub async fn get(&self, id: Id) -> Result<Product, ApiError> {
        let raw: Value = self.client.call(GET, &[&id], NO_BODY).await?;
        reshape_detail(raw)
    }

    pub async fn create(&self, input: &ProductInput) -> Result<Product, ApiError> {
        let raw: Value = self.client.call(CREATE, &[], Some(input)).await?;
        reshape_detail(raw)
    }

    pub async fn update(&self, id: Id, input: &ProductInput) -> Result<Product, ApiError> {
        let raw: Value = self.client.call(UPDATE, &[&id], Some(input)).await?;
        reshape_detail(raw)
    }

    pub async fn publish(&self, id: Id) -> Result<(), ApiError> {
        let _: IgnoredAny = self.client.call(PUBLISH, &[&id], NO_BODY).await?;
        Ok(())
    }

    pub async fn unpublish(&self, id: Id) -> Result<(), ApiError> {
        let _: IgnoredAny = self.client.call(UNPUBLISH, &[&id], NO_BODY).await?;
        Ok(())
    }

    pub async fn delete(&self, id: Id) -> Result<(), ApiError> {
        let _: IgnoredAny = self.client.call(DELETE, &[&id], NO_BODY).await?;
        Ok(())
    }

    pub async fn delete_image(&self, id: Id, image_id: &str) -> Result<(), ApiError> {
        let _: IgnoredAny = self
            .client
            .call(DELETE_IMAGE, &[&id, &image_id], NO_BODY)
            .await?;
        Ok(())
    }

    /// Download a product image or thumbnail with the session credential.
    ///
    /// `url` is the reference the backend returned (e.g. `thumbnailUrl`),
    /// usually a server-root path such as `/uploads/saree.jpg`.
    pub async fn image(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        self.client.fetch_asset(url, IMAGE_ACCEPT).await
    }
}

/// Reshape one item of a product listing.
pub fn reshape_list_item(raw: Value) -> Result<Product, ApiError> {
    decode(flatten(raw, false))
}

/// Reshape a single product read, additionally surfacing
/// `attributes.workerAssigned`.
pub fn reshape_detail(raw: Value) -> Result<Product, ApiError> {
    decode(flatten(raw, true))
}

fn decode(value: Value) -> Result<Product, ApiError> {
    serde_json::from_value(value)
        .map_err(|e| ApiError::transport(format!("unexpected product shape: {e}")))
}

fn flatten(raw: Value, detail: bool) -> Value {
    let mut product = match raw {
        Value::Object(map) => map,
        other => return other,
    };

    if present(&product, "categoryName").is_none() {
        if let Some(id) = present(&product, "categoryId") {
            let name = match id {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            product.insert("categoryName".to_string(), Value::String(name));
        }
    }

    let price = present(&product, "price")
        .or_else(|| nested(&product, "pricing", "price"))
        .cloned()
        .unwrap_or_else(|| Value::from(0));
    product.insert("price".to_string(), price);

    let stock = present(&product, "stockQuantity")
        .or_else(|| nested(&product, "inventory", "stockQuantity"))
        .cloned()
        .unwrap_or_else(|| Value::from(0));
    product.insert("stockQuantity".to_string(), stock);

    if detail {
        let worker = nested(&product, "attributes", "workerAssigned")
            .cloned()
            .unwrap_or(Value::Null);
        product.insert("workerAssigned".to_string(), worker);
    }

    Value::Object(product)
}

fn present<'v>(map: &'v Map<String, Value>, key: &str) -> Option<&'v Value> {
    map.get(key).filter(|v| !v.is_null())
}

fn nested<'v>(map: &'v Map<String, Value>, outer: &str, inner: &str) -> Option<&'v Value> {
    present(map, outer)
        .and_then(Value::as_object)
        .and_then(|o| present(o, inner))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;
    use crate::transport::testing::ScriptedTransport;
    use serde_json::json;

    #[test]
    fn nested_pricing_and_inventory_are_flattened() {
        let product = reshape_list_item(json!({
            "id": 3,
            "pricing": {"price": 500},
            "inventory": {"stockQuantity": 2}
        }))
        .unwrap();
        assert_eq!(product.id, 3);
        assert_eq!(product.price, 500.0);
        assert_eq!(product.stock_quantity, 2);
        assert_eq!(product.extra["pricing"], json!({"price": 500}));
    }

    #[test]
    fn top_level_values_win_over_nested_ones() {
        let product = reshape_list_item(json!({
            "id": 4,
            "price": 120.5,
            "stockQuantity": 9,
            "pricing": {"price": 500},
            "inventory": {"stockQuantity": 2}
        }))
        .unwrap();
        assert_eq!(product.price, 120.5);
        assert_eq!(product.stock_quantity, 9);
    }

    #[test]
    fn missing_price_and_stock_default_to_zero() {
        let product = reshape_list_item(json!({"id": 5, "price": null, "pricing": {}})).unwrap();
        assert_eq!(product.price, 0.0);
        assert_eq!(product.stock_quantity, 0);
    }

    #[test]
    fn category_name_defaults_to_category_id() {
        let product = reshape_list_item(json!({"id": 6, "categoryId": 12})).unwrap();
        assert_eq!(product.category_id, Some(12));
        assert_eq!(product.category_name.as_deref(), Some("12"));

        let named =
            reshape_list_item(json!({"id": 7, "categoryId": 12, "categoryName": "Sarees"})).unwrap();
        assert_eq!(named.category_name.as_deref(), Some("Sarees"));
    }

    #[test]
    fn category_id_sent_as_text_is_accepted() {
        let product = reshape_list_item(json!({"id": 6, "categoryId": "12"})).unwrap();
        assert_eq!(product.category_id, Some(12));
        assert_eq!(product.category_name.as_deref(), Some("12"));

        let odd = reshape_list_item(json!({"id": 7, "categoryId": "sarees"})).unwrap();
        assert!(odd.category_id.is_none());
        assert_eq!(odd.category_name.as_deref(), Some("sarees"));
    }

    #[tokio::test]
    async fn list_tolerates_mixed_category_id_types() {
        let transport = ScriptedTransport::json(
            200,
            json!({
                "success": true,
                "data": {"content": [
                    {"id": 3, "categoryId": 1, "pricing": {"price": 500}},
                    {"id": 4, "categoryId": "3", "inventory": {"stockQuantity": 40}}
                ]}
            }),
        );
        let c = ApiClient::new("http://admin.test/api/admin/v1", Session::new(), transport);

        let products = c.products().list(&ProductQuery::default()).await.unwrap();

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].category_id, Some(1));
        assert_eq!(products[1].category_id, Some(3));
        assert_eq!(products[1].category_name.as_deref(), Some("3"));
        assert_eq!(products[1].stock_quantity, 40);
    }

    #[test]
    fn detail_surfaces_worker_assigned() {
        let product = reshape_detail(json!({
            "id": 8,
            "attributes": {"workerAssigned": "Ravi"}
        }))
        .unwrap();
        assert_eq!(product.worker_assigned, Some(json!("Ravi")));

        let without = reshape_detail(json!({"id": 9})).unwrap();
        assert!(without.worker_assigned.is_none());
    }

    #[tokio::test]
    async fn list_flattens_paginated_content() {
        let transport = ScriptedTransport::json(
            200,
            json!({
                "success": true,
                "data": {
                    "content": [{"id": 3, "pricing": {"price": 500}, "inventory": {"stockQuantity": 2}}],
                    "totalElements": 1
                }
            }),
        );
        let c = ApiClient::new("http://admin.test/api/admin/v1", Session::new(), transport);
        let query = ProductQuery {
            page: Some(1),
            status: Some("PUBLISHED".to_string()),
            ..ProductQuery::default()
        };

        let products = c.products().list(&query).await.unwrap();

        assert_eq!(products.len(), 1);
        assert_eq!(products[0].price, 500.0);
        assert_eq!(products[0].stock_quantity, 2);
        assert_eq!(
            c.transport().requests()[0].url,
            "http://admin.test/api/admin/v1/products?page=1&status=PUBLISHED"
        );
    }

    #[tokio::test]
    async fn delete_image_encodes_image_id() {
        let transport = ScriptedTransport::json(200, json!({"success": true}));
        let c = ApiClient::new("http://admin.test/api/admin/v1", Session::new(), transport);

        c.products().delete_image(3, "../../admin-users/2").await.unwrap();
        assert_eq!(
            c.transport().requests()[0].url,
            "http://admin.test/api/admin/v1/products/3/images/..%2F..%2Fadmin-users%2F2"
        );

        let err = c.products().delete_image(3, "..").await.unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Transport);
        assert_eq!(c.transport().requests().len(), 1);
    }

    #[tokio::test]
    async fn image_is_fetched_from_api_origin_with_credential() {
        let transport = ScriptedTransport::new(vec![Ok(crate::http::HttpResponse {
            status: 200,
            headers: vec![("content-type".to_string(), "image/jpeg".to_string())],
            body: b"\xff\xd8jpeg".to_vec(),
        })]);
        let c = ApiClient::new("http://admin.test/api/admin/v1", Session::new(), transport);
        c.session().set(crate::session::Credential::new("tok"));

        let bytes = c.products().image("/uploads/saree.jpg").await.unwrap();

        assert_eq!(bytes, b"\xff\xd8jpeg");
        let sent = c.transport().requests();
        assert_eq!(sent[0].method, HttpMethod::Get);
        assert_eq!(sent[0].url, "http://admin.test/uploads/saree.jpg");
        assert_eq!(sent[0].header(crate::http::AUTHORIZATION), Some("Bearer tok"));
        assert_eq!(sent[0].header(crate::http::ACCEPT), Some(IMAGE_ACCEPT));
    }

    #[tokio::test]
    async fn image_on_another_host_is_refused() {
        let c = ApiClient::new(
            "http://admin.test/api/admin/v1",
            Session::new(),
            ScriptedTransport::default(),
        );
        c.session().set(crate::session::Credential::new("tok"));

        let err = c.products().image("http://cdn.example/saree.jpg").await.unwrap_err();

        assert_eq!(err.kind(), crate::error::ErrorKind::Transport);
        assert!(c.transport().requests().is_empty());
        assert!(c.session().is_authenticated());
    }

    #[tokio::test]
    async fn rejected_image_read_invalidates_session() {
        let transport = ScriptedTransport::json(
            401,
            json!({"success": false, "error": {"code": "INVALID_TOKEN", "message": "expired"}}),
        );
        let c = ApiClient::new("http://admin.test/api/admin/v1", Session::new(), transport);
        c.session().set(crate::session::Credential::new("stale"));

        let err = c.products().image("/uploads/saree.jpg").await.unwrap_err();

        assert!(err.is_invalid_token());
        assert!(!c.session().is_authenticated());
    }

    #[tokio::test]
    async fn delete_image_builds_nested_path() {
        let transport = ScriptedTransport::json(200, json!({"success": true}));
        let c = ApiClient::new("http://admin.test/api/admin/v1", Session::new(), transport);
        c.products().delete_image(3, "img-9").await.unwrap();
        assert_eq!(
            c.transport().requests()[0].url,
            "http://admin.test/api/admin/v1/products/3/images/img-9"
        );
    }
}
