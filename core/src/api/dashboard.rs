//! Dashboard reads.
//!
//! The three reads are independent: each has its own envelope and may reflect
//! a different instant. [`Dashboard::load_all`] runs them concurrently and
//! reports each outcome separately, so a failure in one never hides the
//! others.

use crate::api::inventory::LOW_STOCK_SUMMARY;
use crate::client::{ApiClient, NO_BODY};
use crate::endpoint::Endpoint;
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::transport::Transport;
use crate::types::{DashboardSummary, LowStockSummary, TopProduct};

pub const SUMMARY: Endpoint = Endpoint::new(HttpMethod::Get, "/dashboard/summary");
pub const TOP_PRODUCTS: Endpoint = Endpoint::new(HttpMethod::Get, "/dashboard/top-products");

/// Outcome of the three dashboard reads.
#[derive(Debug)]
pub struct DashboardSnapshot {
    pub summary: Result<DashboardSummary, ApiError>,
    pub top_products: Result<Vec<TopProduct>, ApiError>,
    pub low_stock: Result<LowStockSummary, ApiError>,
}

pub struct Dashboard<'a, T> {
    client: &'a ApiClient<T>,
}

impl<'a, T: Transport> Dashboard<'a, T> {
    pub(crate) fn new(client: &'a ApiClient<T>) -> Self {
        Self { client }
    }

    pub async fn summary(&self) -> Result<DashboardSummary, ApiError> {
        let summary: Option<DashboardSummary> = self.client.call(SUMMARY, &[], NO_BODY).await?;
        Ok(summary.unwrap_or_default())
    }

    pub async fn top_products(&self) -> Result<Vec<TopProduct>, ApiError> {
        let products: Option<Vec<TopProduct>> =
            self.client.call(TOP_PRODUCTS, &[], NO_BODY).await?;
        Ok(products.unwrap_or_default())
    }

    pub async fn low_stock_summary(&self) -> Result<LowStockSummary, ApiError> {
        let summary: Option<LowStockSummary> =
            self.client.call(LOW_STOCK_SUMMARY, &[], NO_BODY).await?;
        Ok(summary.unwrap_or_default())
    }

    /// Issue all three reads at once.
    pub async fn load_all(&self) -> DashboardSnapshot {
        let (summary, top_products, low_stock) = tokio::join!(
            self.summary(),
            self.top_products(),
            self.low_stock_summary()
        );
        DashboardSnapshot {
            summary,
            top_products,
            low_stock,
        }
    }
}
