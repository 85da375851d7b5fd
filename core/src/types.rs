//! Domain DTOs for the catalog admin API.
//!
//! # Design
//! These types mirror the backend's camelCase JSON. Read models default every
//! field the backend has been seen to omit; input models skip `None` fields so
//! partial updates only send what changed. The mock-server crate defines its
//! own copies so integration tests catch schema drift.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub type Id = i64;

/// Accept an id sent as a number or as numeric text. Anything else reads as
/// absent rather than failing the whole record.
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<Id>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// The `data` member of a login response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginData {
    #[serde(default, alias = "accessToken", alias = "jwt")]
    pub token: Option<String>,
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub parent_id: Option<Id>,
    #[serde(default)]
    pub parent_category_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    pub name: String,
    pub slug: String,
    /// Serialized as `null` for top-level categories.
    pub parent_id: Option<Id>,
    #[serde(default)]
    pub description: String,
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

/// A product after reshaping. Fields the backend nests (`pricing`,
/// `inventory`, `attributes`, `images`) stay available in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Id,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    /// Older records carry the id as text.
    #[serde(default, deserialize_with = "lenient_id")]
    pub category_id: Option<Id>,
    /// Falls back to the category id, rendered as text, when absent.
    #[serde(default)]
    pub category_name: Option<String>,
    pub price: f64,
    pub stock_quantity: i64,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    /// Surfaced from `attributes.workerAssigned` on detail reads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_assigned: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Create/update payload. The backend stores whatever nested structure the
/// form sends, so this stays loosely typed apart from the known fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Id>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing: Option<Pricing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory: Option<Inventory>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pricing {
    pub price: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inventory {
    pub stock_quantity: i64,
}

/// Query string for the product list. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub status: Option<String>,
    pub category_id: Option<Id>,
    pub search: Option<String>,
}

impl ProductQuery {
    /// URL-encoded pairs, without the leading `?`. Empty when nothing is set.
    pub fn to_query_string(&self) -> String {
        let mut out = url::form_urlencoded::Serializer::new(String::new());
        if let Some(page) = self.page {
            out.append_pair("page", &page.to_string());
        }
        if let Some(size) = self.size {
            out.append_pair("size", &size.to_string());
        }
        if let Some(status) = &self.status {
            out.append_pair("status", status);
        }
        if let Some(category_id) = self.category_id {
            out.append_pair("categoryId", &category_id.to_string());
        }
        if let Some(search) = &self.search {
            out.append_pair("search", search);
        }
        out.finish()
    }
}

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    #[serde(default)]
    pub total_elements: Option<u64>,
    #[serde(default)]
    pub total_pages: Option<u32>,
}

// ---------------------------------------------------------------------------
// Admin users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    pub id: Id,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub last_login_at: Option<String>,
}

/// Create/update payload. `password` is only sent on create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserInput {
    pub name: String,
    pub email: String,
    pub role: String,
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveFlag {
    pub active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordReset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

// ---------------------------------------------------------------------------
// Dashboard & inventory
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardSummary {
    pub total_products: u64,
    pub published_products: u64,
    pub out_of_stock_products: u64,
    pub total_categories: u64,
    pub total_orders: u64,
    pub today_orders: u64,
    pub today_revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
    #[serde(default)]
    pub product_id: Option<Id>,
    pub name: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub sold_quantity: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LowStockSummary {
    #[serde(default)]
    pub items: Vec<LowStockItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LowStockItem {
    pub product_id: Id,
    pub name: String,
    pub stock_quantity: i64,
}

// ---------------------------------------------------------------------------
// Invoice
// ---------------------------------------------------------------------------

/// Invoice generation request. Amounts are computed by the caller; the
/// client forwards them unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRequest {
    pub invoice_date: String,
    pub receiver: Party,
    pub consignee: Party,
    pub items: Vec<InvoiceLine>,
    pub tax: TaxRates,
    pub total_summary: TotalSummary,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    pub name: String,
    pub address: String,
    pub place_of_supply: String,
    pub transport_mode: String,
    pub gst_in: String,
    pub state: String,
    pub state_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLine {
    pub serial_no: u32,
    pub description: String,
    pub hsn_code: String,
    pub quantity: f64,
    pub rate: f64,
    pub amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxRates {
    pub cgst_percent: f64,
    pub sgst_percent: f64,
    pub igst_percent: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalSummary {
    pub total_before_tax: f64,
    pub cgst_amount: f64,
    pub sgst_amount: f64,
    pub igst_amount: f64,
    pub freight_charge: f64,
    pub total_after_tax: f64,
}
