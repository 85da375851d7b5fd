//! Inventory reads.

use crate::client::{ApiClient, NO_BODY};
use crate::endpoint::Endpoint;
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::transport::Transport;
use crate::types::{LowStockItem, LowStockSummary};

pub const LOW_STOCK_SUMMARY: Endpoint =
    Endpoint::new(HttpMethod::Get, "/inventory/low-stock-summary");

pub struct InventoryApi<'a, T> {
    client: &'a ApiClient<T>,
}

impl<'a, T: Transport> InventoryApi<'a, T> {
    pub(crate) fn new(client: &'a ApiClient<T>) -> Self {
        Self { client }
    }

    pub async fn low_stock_summary(&self) -> Result<LowStockSummary, ApiError> {
        let summary: Option<LowStockSummary> =
            self.client.call(LOW_STOCK_SUMMARY, &[], NO_BODY).await?;
        Ok(summary.unwrap_or_default())
    }

    /// The low-stock items alone.
    pub async fn low_stock(&self) -> Result<Vec<LowStockItem>, ApiError> {
        Ok(self.low_stock_summary().await?.items)
    }
}
