//! In-memory stand-in for the catalog admin backend.
//!
//! Speaks the same `{success, data, error}` envelope as the real API. Every
//! route except `POST /auth/login` requires `Authorization: Bearer <token>`
//! with a token issued by this server; anything else is answered with 401
//! and `INVALID_TOKEN`.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "secret";

/// Bytes served for every stored product image.
pub const PRODUCT_IMAGE: &[u8] = b"\xff\xd8\xff\xe0 catalog admin mock image";

/// Minimal PDF returned by the invoice route.
pub const INVOICE_PDF: &[u8] = b"%PDF-1.4\n% catalog admin mock invoice\n%%EOF\n";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub parent_id: Option<i64>,
    #[serde(default)]
    pub description: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    pub name: String,
    pub slug: String,
    pub parent_id: Option<i64>,
    #[serde(default)]
    pub description: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
    pub active: bool,
    pub last_login_at: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub active: Option<bool>,
}

#[derive(Deserialize)]
pub struct Login {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct ListParams {
    pub page: Option<usize>,
    pub size: Option<usize>,
    pub status: Option<String>,
}

/// Backend state. Products are kept as raw JSON in the backend's nested
/// shape (`pricing.price`, `inventory.stockQuantity`).
#[derive(Default)]
pub struct Store {
    pub tokens: HashSet<String>,
    pub categories: HashMap<i64, Category>,
    pub products: HashMap<i64, Map<String, Value>>,
    pub admin_users: HashMap<i64, AdminUser>,
    next_id: i64,
}

impl Store {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    /// A store holding one category (id 1), one admin account (id 2) and two
    /// products (ids 3 and 4).
    pub fn seeded() -> Self {
        let mut store = Store::default();

        let silk = store.next_id();
        store.categories.insert(
            silk,
            Category {
                id: silk,
                name: "Silk".to_string(),
                slug: "silk".to_string(),
                parent_id: None,
                description: "Silk sarees".to_string(),
            },
        );

        let admin_id = store.next_id();
        store.admin_users.insert(
            admin_id,
            AdminUser {
                id: admin_id,
                name: "Store Admin".to_string(),
                email: ADMIN_EMAIL.to_string(),
                role: "SUPER_ADMIN".to_string(),
                active: true,
                last_login_at: None,
            },
        );

        for (name, price, stock, status, image) in [
            ("Kanjivaram Saree", 500, 2, "PUBLISHED", "kanjivaram.jpg"),
            ("Banarasi Saree", 1200, 40, "DRAFT", "banarasi.jpg"),
        ] {
            let id = store.next_id();
            let product = json!({
                "id": id,
                "name": name,
                "status": status,
                "categoryId": silk,
                "pricing": {"price": price},
                "inventory": {"stockQuantity": stock},
                "attributes": {"workerAssigned": "Ravi"},
                "thumbnailUrl": format!("/uploads/{image}"),
                "images": [{"id": format!("img-{id}"), "url": format!("/uploads/{image}")}]
            });
            if let Value::Object(map) = product {
                store.products.insert(id, map);
            }
        }
        store
    }
}

pub type Db = Arc<RwLock<Store>>;

type ApiResult = Result<Response, Response>;

fn ok(data: impl Serialize) -> Response {
    (StatusCode::OK, Json(json!({"success": true, "data": data}))).into_response()
}

fn created(data: impl Serialize) -> Response {
    (StatusCode::CREATED, Json(json!({"success": true, "data": data}))).into_response()
}

fn fail(status: StatusCode, code: &str, message: &str) -> Response {
    (
        status,
        Json(json!({
            "success": false,
            "data": null,
            "error": {"code": code, "message": message}
        })),
    )
        .into_response()
}

fn not_found(what: &str) -> Response {
    fail(StatusCode::NOT_FOUND, "NOT_FOUND", &format!("{what} not found"))
}

pub fn app() -> Router {
    app_with(Store::seeded())
}

pub fn app_with(store: Store) -> Router {
    let db: Db = Arc::new(RwLock::new(store));

    let protected = Router::new()
        .route("/auth/me", get(me))
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/{id}",
            get(get_category).put(update_category).delete(delete_category),
        )
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/products/{id}/publish", post(publish_product))
        .route("/products/{id}/unpublish", post(unpublish_product))
        .route("/products/{id}/images/{image_id}", delete(delete_image))
        .route("/admin-users", get(list_admin_users).post(create_admin_user))
        .route(
            "/admin-users/{id}",
            get(get_admin_user).put(update_admin_user),
        )
        .route("/admin-users/{id}/reset-password", post(reset_password))
        .route("/dashboard/summary", get(dashboard_summary))
        .route("/dashboard/top-products", get(top_products))
        .route("/inventory/low-stock-summary", get(low_stock_summary))
        .route("/invoice/generate", post(generate_invoice))
        .route("/uploads/{name}", get(product_image))
        .route_layer(middleware::from_fn_with_state(db.clone(), require_token));

    Router::new()
        .route("/auth/login", post(login))
        .merge(protected)
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn require_token(State(db): State<Db>, request: Request, next: Next) -> Response {
    let token = bearer(request.headers()).map(str::to_string);
    let known = match token {
        Some(token) => db.read().await.tokens.contains(&token),
        None => false,
    };
    if !known {
        debug!(path = %request.uri().path(), "rejected credential");
        return fail(StatusCode::UNAUTHORIZED, "INVALID_TOKEN", "expired");
    }
    next.run(request).await
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .filter(|t| !t.is_empty())
}

// --- auth ---

async fn login(State(db): State<Db>, Json(input): Json<Login>) -> Response {
    let mut guard = db.write().await;
    let store = &mut *guard;
    let account = store
        .admin_users
        .values_mut()
        .find(|u| u.email == input.email && u.active);
    match account {
        Some(user) if input.password == ADMIN_PASSWORD => {
            user.last_login_at = Some("2026-01-01T00:00:00Z".to_string());
            let token = Uuid::new_v4().to_string();
            store.tokens.insert(token.clone());
            info!("issued token");
            ok(json!({"token": token}))
        }
        _ => fail(
            StatusCode::UNAUTHORIZED,
            "BAD_CREDENTIALS",
            "Invalid email or password",
        ),
    }
}

async fn me(State(db): State<Db>) -> Response {
    let store = db.read().await;
    let admin = store.admin_users.values().find(|u| u.email == ADMIN_EMAIL);
    match admin {
        Some(user) => ok(user),
        None => not_found("admin user"),
    }
}

// --- categories ---

async fn list_categories(State(db): State<Db>) -> Response {
    let store = db.read().await;
    let mut categories: Vec<_> = store.categories.values().cloned().collect();
    categories.sort_by_key(|c| c.id);
    ok(categories)
}

async fn get_category(State(db): State<Db>, Path(id): Path<i64>) -> ApiResult {
    let store = db.read().await;
    let category = store.categories.get(&id).ok_or_else(|| not_found("category"))?;
    Ok(ok(category))
}

async fn create_category(State(db): State<Db>, Json(input): Json<CategoryInput>) -> Response {
    let mut store = db.write().await;
    let id = store.next_id();
    let category = Category {
        id,
        name: input.name,
        slug: input.slug,
        parent_id: input.parent_id,
        description: input.description,
    };
    store.categories.insert(id, category.clone());
    created(category)
}

async fn update_category(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<CategoryInput>,
) -> ApiResult {
    let mut store = db.write().await;
    let category = store.categories.get_mut(&id).ok_or_else(|| not_found("category"))?;
    category.name = input.name;
    category.slug = input.slug;
    category.parent_id = input.parent_id;
    category.description = input.description;
    Ok(ok(category.clone()))
}

async fn delete_category(State(db): State<Db>, Path(id): Path<i64>) -> ApiResult {
    let mut store = db.write().await;
    if !store.categories.contains_key(&id) {
        return Err(not_found("category"));
    }
    if store.categories.values().any(|c| c.parent_id == Some(id)) {
        return Err(fail(
            StatusCode::CONFLICT,
            "CATEGORY_HAS_CHILDREN",
            "category has sub-categories",
        ));
    }
    store.categories.remove(&id);
    Ok(ok(Value::Null))
}

// --- products ---

async fn list_products(State(db): State<Db>, Query(params): Query<ListParams>) -> Response {
    let store = db.read().await;
    let mut products: Vec<_> = store
        .products
        .values()
        .filter(|p| match &params.status {
            Some(status) => p.get("status").and_then(Value::as_str) == Some(status.as_str()),
            None => true,
        })
        .cloned()
        .collect();
    products.sort_by_key(|p| p.get("id").and_then(Value::as_i64).unwrap_or_default());

    let total = products.len();
    let size = params.size.unwrap_or(20).max(1);
    let page = params.page.unwrap_or(0);
    let content: Vec<_> = products.into_iter().skip(page * size).take(size).collect();
    ok(json!({
        "content": content,
        "totalElements": total,
        "totalPages": total.div_ceil(size),
    }))
}

async fn get_product(State(db): State<Db>, Path(id): Path<i64>) -> ApiResult {
    let store = db.read().await;
    let product = store.products.get(&id).ok_or_else(|| not_found("product"))?;
    Ok(ok(product))
}

async fn create_product(State(db): State<Db>, Json(mut input): Json<Map<String, Value>>) -> Response {
    let mut store = db.write().await;
    let id = store.next_id();
    input.insert("id".to_string(), json!(id));
    input.entry("status").or_insert_with(|| json!("DRAFT"));
    store.products.insert(id, input.clone());
    created(input)
}

async fn update_product(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<Map<String, Value>>,
) -> ApiResult {
    let mut store = db.write().await;
    let product = store.products.get_mut(&id).ok_or_else(|| not_found("product"))?;
    for (key, value) in input {
        if key != "id" {
            product.insert(key, value);
        }
    }
    Ok(ok(product.clone()))
}

async fn set_status(db: &Db, id: i64, status: &str) -> ApiResult {
    let mut store = db.write().await;
    let product = store.products.get_mut(&id).ok_or_else(|| not_found("product"))?;
    product.insert("status".to_string(), json!(status));
    Ok(ok(product.clone()))
}

async fn publish_product(State(db): State<Db>, Path(id): Path<i64>) -> ApiResult {
    set_status(&db, id, "PUBLISHED").await
}

async fn unpublish_product(State(db): State<Db>, Path(id): Path<i64>) -> ApiResult {
    set_status(&db, id, "DRAFT").await
}

async fn delete_product(State(db): State<Db>, Path(id): Path<i64>) -> ApiResult {
    let mut store = db.write().await;
    store.products.remove(&id).ok_or_else(|| not_found("product"))?;
    Ok(ok(Value::Null))
}

async fn delete_image(
    State(db): State<Db>,
    Path((id, image_id)): Path<(i64, String)>,
) -> ApiResult {
    let mut store = db.write().await;
    let product = store.products.get_mut(&id).ok_or_else(|| not_found("product"))?;
    if let Some(Value::Array(images)) = product.get_mut("images") {
        images.retain(|img| img.get("id").and_then(Value::as_str) != Some(image_id.as_str()));
    }
    Ok(ok(Value::Null))
}

async fn product_image(State(db): State<Db>, Path(name): Path<String>) -> ApiResult {
    let url = format!("/uploads/{name}");
    let store = db.read().await;
    let known = store.products.values().any(|p| {
        p.get("thumbnailUrl").and_then(Value::as_str) == Some(url.as_str())
            || p.get("images")
                .and_then(Value::as_array)
                .is_some_and(|images| {
                    images
                        .iter()
                        .any(|img| img.get("url").and_then(Value::as_str) == Some(url.as_str()))
                })
    });
    if !known {
        return Err(not_found("image"));
    }
    Ok(([(header::CONTENT_TYPE, "image/jpeg")], PRODUCT_IMAGE).into_response())
}

// --- admin users ---

async fn list_admin_users(State(db): State<Db>) -> Response {
    let store = db.read().await;
    let mut users: Vec<_> = store.admin_users.values().cloned().collect();
    users.sort_by_key(|u| u.id);
    ok(users)
}

async fn get_admin_user(State(db): State<Db>, Path(id): Path<i64>) -> ApiResult {
    let store = db.read().await;
    let user = store.admin_users.get(&id).ok_or_else(|| not_found("admin user"))?;
    Ok(ok(user))
}

async fn create_admin_user(State(db): State<Db>, Json(input): Json<Value>) -> ApiResult {
    let field = |name: &str| input.get(name).and_then(Value::as_str).map(str::to_string);
    let (Some(name), Some(email), Some(_password)) = (field("name"), field("email"), field("password"))
    else {
        return Err(fail(
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            "name, email and password are required",
        ));
    };
    let mut store = db.write().await;
    let id = store.next_id();
    let user = AdminUser {
        id,
        name,
        email,
        role: field("role").unwrap_or_else(|| "ADMIN".to_string()),
        active: input.get("active").and_then(Value::as_bool).unwrap_or(true),
        last_login_at: None,
    };
    store.admin_users.insert(id, user.clone());
    Ok(created(user))
}

async fn update_admin_user(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(patch): Json<AdminUserPatch>,
) -> ApiResult {
    let mut store = db.write().await;
    let user = store.admin_users.get_mut(&id).ok_or_else(|| not_found("admin user"))?;
    if let Some(name) = patch.name {
        user.name = name;
    }
    if let Some(email) = patch.email {
        user.email = email;
    }
    if let Some(role) = patch.role {
        user.role = role;
    }
    if let Some(active) = patch.active {
        user.active = active;
    }
    Ok(ok(user.clone()))
}

async fn reset_password(State(db): State<Db>, Path(id): Path<i64>) -> ApiResult {
    let store = db.read().await;
    if !store.admin_users.contains_key(&id) {
        return Err(not_found("admin user"));
    }
    Ok(ok(json!({"reset": true})))
}

// --- dashboard & inventory ---

fn stock_of(product: &Map<String, Value>) -> i64 {
    product
        .get("inventory")
        .and_then(|i| i.get("stockQuantity"))
        .and_then(Value::as_i64)
        .unwrap_or_default()
}

async fn dashboard_summary(State(db): State<Db>) -> Response {
    let store = db.read().await;
    let published = store
        .products
        .values()
        .filter(|p| p.get("status").and_then(Value::as_str) == Some("PUBLISHED"))
        .count();
    let out_of_stock = store.products.values().filter(|p| stock_of(p) == 0).count();
    ok(json!({
        "totalProducts": store.products.len(),
        "publishedProducts": published,
        "outOfStockProducts": out_of_stock,
        "totalCategories": store.categories.len(),
        "totalOrders": 0,
        "todayOrders": 0,
        "todayRevenue": 0.0,
    }))
}

async fn top_products(State(db): State<Db>) -> Response {
    let store = db.read().await;
    let mut top: Vec<_> = store
        .products
        .values()
        .map(|p| {
            json!({
                "productId": p.get("id"),
                "name": p.get("name"),
                "thumbnailUrl": p.get("thumbnailUrl"),
                "soldQuantity": 0,
            })
        })
        .collect();
    top.sort_by_key(|p| p.get("productId").and_then(Value::as_i64).unwrap_or_default());
    ok(top)
}

/// Products at or below this stock level are reported as low.
const LOW_STOCK_LEVEL: i64 = 5;

async fn low_stock_summary(State(db): State<Db>) -> Response {
    let store = db.read().await;
    let mut items: Vec<_> = store
        .products
        .values()
        .filter(|p| stock_of(p) <= LOW_STOCK_LEVEL)
        .map(|p| {
            json!({
                "productId": p.get("id"),
                "name": p.get("name"),
                "stockQuantity": stock_of(p),
            })
        })
        .collect();
    items.sort_by_key(|p| p.get("productId").and_then(Value::as_i64).unwrap_or_default());
    ok(json!({"items": items}))
}

// --- invoice ---

async fn generate_invoice(Json(input): Json<Value>) -> Response {
    let has_items = input
        .get("items")
        .and_then(Value::as_array)
        .is_some_and(|items| !items.is_empty());
    if !has_items {
        return fail(
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            "invoice needs at least one item",
        );
    }
    ([(header::CONTENT_TYPE, "application/pdf")], INVOICE_PDF).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_store_has_nested_product_shape() {
        let store = Store::seeded();
        let product = store.products.values().next().unwrap();
        assert!(product.get("price").is_none());
        assert!(product["pricing"]["price"].is_number());
        assert!(product["inventory"]["stockQuantity"].is_number());
    }

    #[test]
    fn ids_are_unique_across_resources() {
        let store = Store::seeded();
        let mut ids: Vec<i64> = store.categories.keys().copied().collect();
        ids.extend(store.products.keys().copied());
        ids.extend(store.admin_users.keys().copied());
        let before = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), before);
    }

    #[test]
    fn bearer_requires_prefix_and_value() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer abc".parse().unwrap());
        assert_eq!(bearer(&headers), Some("abc"));
        headers.insert(header::AUTHORIZATION, "Bearer ".parse().unwrap());
        assert_eq!(bearer(&headers), None);
        headers.insert(header::AUTHORIZATION, "abc".parse().unwrap());
        assert_eq!(bearer(&headers), None);
    }

    #[test]
    fn category_input_defaults_description() {
        let input: CategoryInput =
            serde_json::from_str(r#"{"name":"Cotton","slug":"cotton","parentId":null}"#).unwrap();
        assert_eq!(input.description, "");
        assert!(input.parent_id.is_none());
    }
}
